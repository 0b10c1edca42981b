//! Data Cleaner Module
//! Duplicate removal and missing-value handling over a long table.

use super::strategy::MissingStrategy;
use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum CleanerError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Unknown strategy: {name}. Available: {}", MissingStrategy::names().join(", "))]
    UnknownStrategy { name: String },
}

/// Which cleaning passes to run. Duplicates always go before missing values.
#[derive(Debug, Clone)]
pub struct CleanOptions {
    pub handle_missing: bool,
    pub missing_strategy: MissingStrategy,
    pub remove_duplicates: bool,
    /// Key columns for duplicate detection; `None` compares whole rows.
    pub duplicate_subset: Option<Vec<String>>,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            handle_missing: true,
            missing_strategy: MissingStrategy::Mean,
            remove_duplicates: true,
            duplicate_subset: None,
        }
    }
}

/// Report comparing a table before and after cleaning.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleaningSummary {
    pub rows_before: usize,
    pub rows_after: usize,
    pub rows_removed: i64,
    pub columns_total: usize,
    pub columns_with_missing_before: usize,
    pub columns_with_missing_after: usize,
    pub columns_improved: usize,
    pub improved_columns: Vec<String>,
}

impl fmt::Display for CleaningSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Rows before:                 {}", self.rows_before)?;
        writeln!(f, "Rows after:                  {}", self.rows_after)?;
        writeln!(f, "Rows removed:                {}", self.rows_removed)?;
        writeln!(f, "Columns:                     {}", self.columns_total)?;
        writeln!(f, "Columns with missing before: {}", self.columns_with_missing_before)?;
        writeln!(f, "Columns with missing after:  {}", self.columns_with_missing_after)?;
        write!(
            f,
            "Columns improved:            {} [{}]",
            self.columns_improved,
            self.improved_columns.join(", ")
        )
    }
}

/// Handles duplicate removal and missing-value filling.
pub struct DataCleaner;

impl DataCleaner {
    /// Per-cell missing flags. NaN counts as missing in float columns.
    fn missing_flags(column: &Column) -> Vec<bool> {
        let floats = match column.dtype() {
            DataType::Float32 | DataType::Float64 => column.cast(&DataType::Float64).ok(),
            _ => None,
        };

        match floats.as_ref().and_then(|c| c.f64().ok()) {
            Some(ca) => ca.into_iter().map(|v| v.map_or(true, f64::is_nan)).collect(),
            None => {
                let nulls = column.is_null();
                (&nulls).into_iter().map(|v| v.unwrap_or(true)).collect()
            }
        }
    }

    /// Percentage of missing cells per column, in column order.
    pub fn detect_missing(df: &DataFrame) -> Vec<(String, f64)> {
        let height = df.height();
        df.get_columns()
            .iter()
            .map(|column| {
                let pct = if height == 0 {
                    0.0
                } else {
                    let missing = Self::missing_flags(column).iter().filter(|m| **m).count();
                    missing as f64 / height as f64 * 100.0
                };
                (column.name().to_string(), pct)
            })
            .collect()
    }

    /// Get list of numeric column names.
    pub fn numeric_columns(df: &DataFrame) -> Vec<String> {
        df.get_columns()
            .iter()
            .filter(|col| {
                matches!(
                    col.dtype(),
                    DataType::Float32
                        | DataType::Float64
                        | DataType::Int8
                        | DataType::Int16
                        | DataType::Int32
                        | DataType::Int64
                        | DataType::UInt8
                        | DataType::UInt16
                        | DataType::UInt32
                        | DataType::UInt64
                )
            })
            .map(|col| col.name().to_string())
            .collect()
    }

    /// Column names paired with their data type.
    pub fn column_types(df: &DataFrame) -> Vec<(String, String)> {
        df.get_columns()
            .iter()
            .map(|col| (col.name().to_string(), col.dtype().to_string()))
            .collect()
    }

    /// Keep the first row for each key, preserving input order.
    ///
    /// Without a subset (or with an empty one) whole rows are compared.
    pub fn remove_duplicates(
        df: &DataFrame,
        subset: Option<&[String]>,
    ) -> Result<DataFrame, CleanerError> {
        let subset = subset.filter(|keys| !keys.is_empty());
        let result = df.unique_stable(subset, UniqueKeepStrategy::First, None)?;
        debug!(
            removed = df.height() - result.height(),
            "removed duplicate rows"
        );
        Ok(result)
    }

    /// Drop all-missing rows and columns, then fill each numeric column.
    pub fn handle_missing(
        df: &DataFrame,
        strategy: MissingStrategy,
        drop_all_missing: bool,
    ) -> Result<DataFrame, CleanerError> {
        let mut result = df.clone();

        if drop_all_missing && result.height() > 0 {
            let mut any_present = vec![false; result.height()];
            for column in result.get_columns() {
                for (row, missing) in Self::missing_flags(column).into_iter().enumerate() {
                    any_present[row] |= !missing;
                }
            }
            let mask = BooleanChunked::from_slice("present".into(), &any_present);
            result = result.filter(&mask)?;
        }

        if drop_all_missing && result.height() > 0 {
            let keep: Vec<String> = result
                .get_columns()
                .iter()
                .filter(|column| !Self::missing_flags(column).iter().all(|m| *m))
                .map(|column| column.name().to_string())
                .collect();
            result = result.select(keep)?;
        }

        let numeric = Self::numeric_columns(&result);
        let filled = numeric
            .par_iter()
            .map(|name| Self::fill_column(result.column(name)?, strategy))
            .collect::<PolarsResult<Vec<Column>>>()?;
        for column in filled {
            result.with_column(column)?;
        }

        debug!(%strategy, columns = numeric.len(), "filled numeric columns");
        Ok(result)
    }

    /// A column with gaps comes back as Float64 so a fractional fill survives.
    fn fill_column(column: &Column, strategy: MissingStrategy) -> PolarsResult<Column> {
        let values: Vec<Option<f64>> = column
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();
        if values.iter().all(Option::is_some) {
            return Ok(column.clone());
        }

        Ok(Column::new(column.name().clone(), strategy.fill(&values)))
    }

    /// Run the enabled passes and return a new table.
    pub fn clean(df: &DataFrame, options: &CleanOptions) -> Result<DataFrame, CleanerError> {
        let mut result = df.clone();

        if options.remove_duplicates {
            result = Self::remove_duplicates(&result, options.duplicate_subset.as_deref())?;
        }

        if options.handle_missing {
            result = Self::handle_missing(&result, options.missing_strategy, true)?;
        }

        info!(
            rows_before = df.height(),
            rows_after = result.height(),
            strategy = %options.missing_strategy,
            "cleaned long table"
        );
        Ok(result)
    }

    pub fn cleaning_summary(before: &DataFrame, after: &DataFrame) -> CleaningSummary {
        let missing_before = Self::detect_missing(before);
        let missing_after: HashMap<String, f64> =
            Self::detect_missing(after).into_iter().collect();

        let improved_columns: Vec<String> = missing_before
            .iter()
            .filter(|(name, pct)| missing_after.get(name).is_some_and(|after| after < pct))
            .map(|(name, _)| name.clone())
            .collect();

        CleaningSummary {
            rows_before: before.height(),
            rows_after: after.height(),
            rows_removed: before.height() as i64 - after.height() as i64,
            columns_total: before.width(),
            columns_with_missing_before: missing_before.iter().filter(|(_, p)| *p > 0.0).count(),
            columns_with_missing_after: missing_after.values().filter(|p| **p > 0.0).count(),
            columns_improved: improved_columns.len(),
            improved_columns,
        }
    }
}
