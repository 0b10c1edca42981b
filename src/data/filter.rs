//! Filter / Aggregate Module
//! Row selection by region, country or year and grouped sum/average of GDP.

use super::schema::{CONTINENT, COUNTRY_NAME, GDP_VALUE, YEAR};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Aggregation applied to `GDP_Value` within each group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Sum,
    Average,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Operation::Sum => "sum",
            Operation::Average => "average",
        }
    }

    fn expr(self) -> Expr {
        match self {
            Operation::Sum => col(GDP_VALUE).sum(),
            Operation::Average => col(GDP_VALUE).mean(),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Dimension to group on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupBy {
    Country,
    Continent,
    Year,
}

impl GroupBy {
    pub fn column(self) -> &'static str {
        match self {
            GroupBy::Country => COUNTRY_NAME,
            GroupBy::Continent => CONTINENT,
            GroupBy::Year => YEAR,
        }
    }
}

/// Filtering and aggregation over the cleaned long table.
///
/// Every call returns a fresh frame; the input is never modified.
pub struct DataFilter;

impl DataFilter {
    fn matching(df: &DataFrame, predicate: Expr) -> Result<DataFrame, FilterError> {
        let filtered = df.clone().lazy().filter(predicate).collect()?;
        Ok(filtered)
    }

    /// Rows whose `Continent` equals `region`. No match gives an empty frame.
    pub fn by_region(df: &DataFrame, region: &str) -> Result<DataFrame, FilterError> {
        Self::matching(df, col(CONTINENT).eq(lit(region)))
    }

    pub fn by_country(df: &DataFrame, country: &str) -> Result<DataFrame, FilterError> {
        Self::matching(df, col(COUNTRY_NAME).eq(lit(country)))
    }

    /// Rows for a single year. No match gives an empty frame.
    pub fn by_year(df: &DataFrame, year: i32) -> Result<DataFrame, FilterError> {
        Self::matching(df, col(YEAR).eq(lit(year)))
    }

    /// Everything except `region`; rows without a continent are kept.
    pub fn excluding_region(df: &DataFrame, region: &str) -> Result<DataFrame, FilterError> {
        Self::matching(
            df,
            col(CONTINENT)
                .neq(lit(region))
                .or(col(CONTINENT).is_null()),
        )
    }

    /// One row per distinct value of `group_by` with the aggregated GDP.
    ///
    /// Output order is unspecified; use [`DataFilter::sorted`] before display.
    pub fn aggregate(
        df: &DataFrame,
        operation: Operation,
        group_by: GroupBy,
    ) -> Result<DataFrame, FilterError> {
        let grouped = df
            .clone()
            .lazy()
            .group_by([col(group_by.column())])
            .agg([operation.expr()])
            .collect()?;
        Ok(grouped)
    }

    pub fn sorted(df: &DataFrame, by: &str, descending: bool) -> Result<DataFrame, FilterError> {
        let sorted = df
            .clone()
            .lazy()
            .sort_by_exprs(
                [col(by)],
                SortMultipleOptions::default().with_order_descending(descending),
            )
            .collect()?;
        Ok(sorted)
    }
}
