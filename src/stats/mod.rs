//! Stats module - descriptive statistics for the summary page

mod calculator;

pub use calculator::{DISPLAY_VALUE, DisplayUnit, ExecutiveSummary, SeriesStats, StatsCalculator};
