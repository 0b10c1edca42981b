//! GDP Dashboard - reshape, clean and aggregate a wide GDP CSV
//!
//! The pipeline runs load → reshape → clean → validate → filter/aggregate and
//! hands a [`DashboardContext`] of named result tables to the presentation layer.

pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod stats;

pub use config::{ConfigError, ConfigRecord, ConfigValidator};
pub use data::{
    CleanOptions, CleanerError, CleaningSummary, DataCleaner, DataFilter, DataInfo, DataLoader,
    DataReshaper, FilterError, GroupBy, LoaderError, MissingStrategy, Operation, ReshapeError,
};
pub use error::PipelineError;
pub use pipeline::{DashboardContext, DashboardTables, PipelineOptions};
pub use stats::{DisplayUnit, ExecutiveSummary, SeriesStats, StatsCalculator};
