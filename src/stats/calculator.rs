//! Statistics Calculator Module
//! Descriptive statistics over aggregated GDP tables and the executive summary.

use crate::config::ConfigRecord;
use crate::data::schema::GDP_VALUE;
use polars::prelude::*;
use serde::Serialize;
use std::fmt;

pub const DISPLAY_VALUE: &str = "Display_Val";

/// Descriptive statistics for one value column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesStats {
    pub count: usize,
    pub total: f64,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for SeriesStats {
    fn default() -> Self {
        Self {
            count: 0,
            total: 0.0,
            mean: f64::NAN,
            min: f64::NAN,
            max: f64::NAN,
        }
    }
}

/// Scale used to print large GDP figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DisplayUnit {
    Trillions,
    Billions,
    Millions,
    Value,
}

impl DisplayUnit {
    /// Pick the unit from the largest value being shown.
    pub fn for_max(max: f64) -> Self {
        if max >= 1e12 {
            DisplayUnit::Trillions
        } else if max >= 1e9 {
            DisplayUnit::Billions
        } else if max >= 1e6 {
            DisplayUnit::Millions
        } else {
            DisplayUnit::Value
        }
    }

    pub fn divisor(self) -> f64 {
        match self {
            DisplayUnit::Trillions => 1e12,
            DisplayUnit::Billions => 1e9,
            DisplayUnit::Millions => 1e6,
            DisplayUnit::Value => 1.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DisplayUnit::Trillions => "Trillions",
            DisplayUnit::Billions => "Billions",
            DisplayUnit::Millions => "Millions",
            DisplayUnit::Value => "Value",
        }
    }
}

/// Figures for the text summary page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutiveSummary {
    pub regional_total: f64,
    pub regional_average: f64,
    pub peak_year_value: f64,
    pub minimum_year_value: f64,
    pub config: ConfigRecord,
}

impl fmt::Display for ExecutiveSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "EXECUTIVE SUMMARY")?;
        writeln!(f, "  Total Regional GDP   {}", money(self.regional_total))?;
        writeln!(f, "  Average GDP          {}", money(self.regional_average))?;
        writeln!(f, "  Peak Year Value      {}", money(self.peak_year_value))?;
        writeln!(f, "  Minimum Year Value   {}", money(self.minimum_year_value))?;
        writeln!(f)?;
        writeln!(f, "SYSTEM CONFIGURATION")?;
        writeln!(f, "{}", "-".repeat(20))?;
        for (key, value) in self.config.entries() {
            writeln!(f, "  {}: {}", key.to_uppercase(), value)?;
        }
        Ok(())
    }
}

/// `$1,234,567.89`, or `n/a` for NaN.
fn money(value: f64) -> String {
    if value.is_nan() {
        return "n/a".to_string();
    }
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}${grouped}.{frac}")
}

/// Handles statistical calculations over result tables.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute descriptive statistics for an array of values.
    pub fn compute_descriptive_stats(values: &[f64]) -> SeriesStats {
        let n = values.len();
        if n == 0 {
            return SeriesStats::default();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let total = values.iter().sum::<f64>();

        SeriesStats {
            count: n,
            total,
            mean: total / n as f64,
            min: sorted[0],
            max: sorted[n - 1],
        }
    }

    /// Non-missing values of a column as floats.
    pub fn column_values(df: &DataFrame, column: &str) -> Vec<f64> {
        df.column(column)
            .ok()
            .and_then(|col| col.cast(&DataType::Float64).ok())
            .map(|col| {
                col.f64()
                    .ok()
                    .map(|ca| ca.into_iter().flatten().filter(|v| !v.is_nan()).collect())
                    .unwrap_or_default()
            })
            .unwrap_or_default()
    }

    /// Add a `Display_Val` column holding GDP scaled to a readable unit.
    pub fn with_display_values(df: &DataFrame) -> PolarsResult<(DataFrame, DisplayUnit)> {
        let max = Self::compute_descriptive_stats(&Self::column_values(df, GDP_VALUE)).max;
        let unit = DisplayUnit::for_max(max);
        let scaled = df
            .clone()
            .lazy()
            .with_column((col(GDP_VALUE) / lit(unit.divisor())).alias(DISPLAY_VALUE))
            .collect()?;
        Ok((scaled, unit))
    }

    /// Summary figures from the region time series and the year breakdown.
    pub fn executive_summary(
        region_series: &DataFrame,
        year_breakdown: &DataFrame,
        config: &ConfigRecord,
    ) -> ExecutiveSummary {
        let region = Self::compute_descriptive_stats(&Self::column_values(region_series, GDP_VALUE));
        let year = Self::compute_descriptive_stats(&Self::column_values(year_breakdown, GDP_VALUE));

        ExecutiveSummary {
            regional_total: region.total,
            regional_average: region.mean,
            peak_year_value: year.max,
            minimum_year_value: year.min,
            config: config.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Operation;

    #[test]
    fn test_descriptive_stats() {
        let stats = StatsCalculator::compute_descriptive_stats(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(stats.count, 4);
        assert_eq!(stats.total, 10.0);
        assert_eq!(stats.mean, 2.5);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 4.0);

        let empty = StatsCalculator::compute_descriptive_stats(&[]);
        assert_eq!(empty.count, 0);
        assert!(empty.mean.is_nan());
    }

    #[test]
    fn test_display_unit() {
        assert_eq!(DisplayUnit::for_max(2.5e13), DisplayUnit::Trillions);
        assert_eq!(DisplayUnit::for_max(7e9), DisplayUnit::Billions);
        assert_eq!(DisplayUnit::for_max(1e6), DisplayUnit::Millions);
        assert_eq!(DisplayUnit::for_max(999.0).divisor(), 1.0);
    }

    #[test]
    fn test_display_values_scaled() {
        let df = DataFrame::new(vec![Column::new(GDP_VALUE.into(), vec![2.0e9, 5.0e8])]).unwrap();
        let (scaled, unit) = StatsCalculator::with_display_values(&df).unwrap();
        assert_eq!(unit, DisplayUnit::Billions);
        let shown: Vec<f64> = StatsCalculator::column_values(&scaled, DISPLAY_VALUE);
        assert_eq!(shown, vec![2.0, 0.5]);
    }

    #[test]
    fn test_money_format() {
        assert_eq!(money(1234567.891), "$1,234,567.89");
        assert_eq!(money(-999.5), "-$999.50");
        assert_eq!(money(f64::NAN), "n/a");
    }

    #[test]
    fn test_executive_summary() {
        let series = DataFrame::new(vec![Column::new(GDP_VALUE.into(), vec![Some(10.0), Some(30.0), None])])
            .unwrap();
        let breakdown = DataFrame::new(vec![Column::new(GDP_VALUE.into(), vec![5.0, 50.0, 20.0])]).unwrap();
        let config = ConfigRecord {
            region: "Asia".to_string(),
            operation: Operation::Sum,
            year: 2020,
            output: "dashboard".to_string(),
        };

        let summary = StatsCalculator::executive_summary(&series, &breakdown, &config);
        assert_eq!(summary.regional_total, 40.0);
        assert_eq!(summary.regional_average, 20.0);
        assert_eq!(summary.peak_year_value, 50.0);
        assert_eq!(summary.minimum_year_value, 5.0);

        let text = summary.to_string();
        assert!(text.contains("$40.00"));
        assert!(text.contains("REGION: Asia"));
    }
}
