//! Data Reshaper Module
//! Converts the wide year-per-column table into long (country, year, value) rows.

use super::schema::{CONTINENT, COUNTRY_NAME, GDP_VALUE, MAX_YEAR, MIN_YEAR, YEAR};
use polars::prelude::*;
use serde::Serialize;
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ReshapeError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Metadata column '{0}' clashes with a long-format output column")]
    ReservedColumn(String),
}

/// Overview of a dataset before and after reshaping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataInfo {
    pub total_countries: usize,
    pub total_regions: usize,
    pub year_range: Option<(i32, i32)>,
    pub total_years: usize,
    pub total_records_original: usize,
    pub total_records_long: usize,
}

/// Handles wide-to-long transformation and value-domain extraction.
pub struct DataReshaper;

impl DataReshaper {
    /// Parse a column label as a year in the supported range.
    pub fn parse_year_label(label: &str) -> Option<i32> {
        if label.is_empty() || !label.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let year: i32 = label.parse().ok()?;
        (MIN_YEAR..=MAX_YEAR).contains(&year).then_some(year)
    }

    fn labelled_years(df: &DataFrame) -> Vec<(i32, String)> {
        let mut years: Vec<(i32, String)> = df
            .get_column_names()
            .iter()
            .filter_map(|name| Self::parse_year_label(name.as_str()).map(|y| (y, name.to_string())))
            .collect();
        years.sort_by_key(|(year, _)| *year);
        years
    }

    /// Columns whose label is a year, ascending.
    pub fn year_columns(df: &DataFrame) -> Vec<String> {
        Self::labelled_years(df)
            .into_iter()
            .map(|(_, label)| label)
            .collect()
    }

    /// Every non-year column, in original order.
    pub fn metadata_columns(df: &DataFrame) -> Vec<String> {
        df.get_column_names()
            .iter()
            .filter(|name| Self::parse_year_label(name.as_str()).is_none())
            .map(|name| name.to_string())
            .collect()
    }

    /// Unpivot the year columns into `Year` (Int32) and `GDP_Value` (Float64).
    ///
    /// Rows come out year-major: every country for the first year, then every
    /// country for the next. Cells that do not parse as numbers become nulls.
    pub fn to_long(df: &DataFrame) -> Result<DataFrame, ReshapeError> {
        let years = Self::labelled_years(df);
        let metadata = Self::metadata_columns(df);

        if let Some(clash) = metadata
            .iter()
            .find(|name| name.as_str() == YEAR || name.as_str() == GDP_VALUE)
        {
            return Err(ReshapeError::ReservedColumn(clash.clone()));
        }

        let meta = df.select(metadata.iter().map(String::as_str))?;
        let height = df.height();

        let mut long: Option<DataFrame> = None;
        for (year, label) in &years {
            let values = Self::numeric_values(df.column(label)?)?;

            let mut part = meta.clone();
            part.with_column(Column::new(YEAR.into(), vec![*year; height]))?;
            part.with_column(Column::new(GDP_VALUE.into(), values))?;

            match long.as_mut() {
                Some(acc) => {
                    acc.vstack_mut(&part)?;
                }
                None => long = Some(part),
            }
        }

        let long = match long {
            Some(long) => long,
            None => {
                let mut empty = meta.slice(0, 0);
                empty.with_column(Column::new(YEAR.into(), Vec::<i32>::new()))?;
                empty.with_column(Column::new(GDP_VALUE.into(), Vec::<Option<f64>>::new()))?;
                empty
            }
        };

        info!(
            wide_rows = height,
            year_columns = years.len(),
            long_rows = long.height(),
            "reshaped to long format"
        );
        Ok(long)
    }

    /// Cast a column to floats; NaN is folded into null.
    fn numeric_values(column: &Column) -> PolarsResult<Vec<Option<f64>>> {
        let cast = column.cast(&DataType::Float64)?;
        Ok(cast
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect())
    }

    fn distinct_values(df: &DataFrame, column: &str) -> Vec<String> {
        let Ok(col) = df.column(column) else {
            return Vec::new();
        };
        let Ok(strings) = col.cast(&DataType::String) else {
            return Vec::new();
        };
        strings
            .str()
            .map(|ca| {
                ca.into_iter()
                    .flatten()
                    .map(str::to_string)
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Distinct continents, sorted.
    pub fn regions(df: &DataFrame) -> Vec<String> {
        Self::distinct_values(df, CONTINENT)
    }

    /// Distinct country names, sorted.
    pub fn countries(df: &DataFrame) -> Vec<String> {
        Self::distinct_values(df, COUNTRY_NAME)
    }

    /// Distinct values of the `Year` column, ascending.
    pub fn years(long: &DataFrame) -> Vec<i32> {
        let Ok(col) = long.column(YEAR) else {
            return Vec::new();
        };
        let Ok(years) = col.cast(&DataType::Int32) else {
            return Vec::new();
        };
        years
            .i32()
            .map(|ca| {
                ca.into_iter()
                    .flatten()
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// (min, max) year of a long table, `None` when it has no years.
    pub fn year_range(long: &DataFrame) -> Option<(i32, i32)> {
        let years = Self::years(long);
        Some((*years.first()?, *years.last()?))
    }

    pub fn data_info(wide: &DataFrame, long: &DataFrame) -> DataInfo {
        DataInfo {
            total_countries: Self::countries(wide).len(),
            total_regions: Self::regions(wide).len(),
            year_range: Self::year_range(long),
            total_years: Self::year_columns(wide).len(),
            total_records_original: wide.height(),
            total_records_long: long.height(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wide() -> DataFrame {
        DataFrame::new(vec![
            Column::new(COUNTRY_NAME.into(), vec!["Aland", "Borea"]),
            Column::new(CONTINENT.into(), vec!["Europe", "Asia"]),
            Column::new("2021".into(), vec![Some(3.0), None]),
            Column::new("2020".into(), vec![1.0, 2.0]),
        ])
        .unwrap()
    }

    #[test]
    fn test_year_columns_sorted_and_bounded() {
        let df = DataFrame::new(vec![
            Column::new("2001".into(), vec![1.0]),
            Column::new("1899".into(), vec![1.0]),
            Column::new("Indicator".into(), vec!["x"]),
            Column::new("1950".into(), vec![1.0]),
            Column::new("2101".into(), vec![1.0]),
            Column::new("20a0".into(), vec![1.0]),
        ])
        .unwrap();

        assert_eq!(DataReshaper::year_columns(&df), vec!["1950", "2001"]);
        assert_eq!(
            DataReshaper::metadata_columns(&df),
            vec!["1899", "Indicator", "2101", "20a0"]
        );
    }

    #[test]
    fn test_to_long_two_rows_two_years() {
        let long = DataReshaper::to_long(&wide()).unwrap();
        assert_eq!(long.height(), 4);
        assert_eq!(long.column(YEAR).unwrap().dtype(), &DataType::Int32);

        let years: Vec<i32> = long
            .column(YEAR)
            .unwrap()
            .i32()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(years, vec![2020, 2020, 2021, 2021]);

        let values: Vec<Option<f64>> = long
            .column(GDP_VALUE)
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(values, vec![Some(1.0), Some(2.0), Some(3.0), None]);
    }

    #[test]
    fn test_to_long_non_numeric_cell_is_missing() {
        let df = DataFrame::new(vec![
            Column::new(COUNTRY_NAME.into(), vec!["Aland", "Borea"]),
            Column::new("2020".into(), vec!["12.5", "n/a"]),
        ])
        .unwrap();

        let long = DataReshaper::to_long(&df).unwrap();
        let values: Vec<Option<f64>> = long
            .column(GDP_VALUE)
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(values, vec![Some(12.5), None]);
    }

    #[test]
    fn test_to_long_without_year_columns() {
        let df = DataFrame::new(vec![Column::new(COUNTRY_NAME.into(), vec!["Aland"])]).unwrap();
        let long = DataReshaper::to_long(&df).unwrap();
        assert_eq!(long.height(), 0);
        assert!(long.column(YEAR).is_ok());
        assert!(long.column(GDP_VALUE).is_ok());
        assert_eq!(DataReshaper::year_range(&long), None);
    }

    #[test]
    fn test_reserved_metadata_column_rejected() {
        let df = DataFrame::new(vec![
            Column::new(YEAR.into(), vec!["x"]),
            Column::new("2020".into(), vec![1.0]),
        ])
        .unwrap();
        assert!(matches!(
            DataReshaper::to_long(&df),
            Err(ReshapeError::ReservedColumn(_))
        ));
    }

    #[test]
    fn test_domains_and_info() {
        let df = DataFrame::new(vec![
            Column::new(COUNTRY_NAME.into(), vec![Some("Cyra"), Some("Aland"), None]),
            Column::new(CONTINENT.into(), vec![Some("Europe"), None, Some("Asia")]),
            Column::new("2020".into(), vec![1.0, 2.0, 3.0]),
            Column::new("2019".into(), vec![1.0, 2.0, 3.0]),
        ])
        .unwrap();
        assert_eq!(DataReshaper::regions(&df), vec!["Asia", "Europe"]);
        assert_eq!(DataReshaper::countries(&df), vec!["Aland", "Cyra"]);

        let long = DataReshaper::to_long(&df).unwrap();
        assert_eq!(DataReshaper::year_range(&long), Some((2019, 2020)));

        let info = DataReshaper::data_info(&df, &long);
        assert_eq!(info.total_countries, 2);
        assert_eq!(info.total_regions, 2);
        assert_eq!(info.total_years, 2);
        assert_eq!(info.total_records_original, 3);
        assert_eq!(info.total_records_long, 6);
    }
}
