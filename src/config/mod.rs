//! Run configuration - parsing `config.json` and checking it against the data

use crate::data::{DataReshaper, Operation};
use polars::prelude::DataFrame;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found at {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid JSON format: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
    #[error("Region '{region}' is not in the dataset. Valid regions: {}", .available.join(", "))]
    UnknownRegion {
        region: String,
        available: Vec<String>,
    },
    #[error("Year {year} is not in the dataset. Available years: {}", describe_years(.available))]
    UnknownYear { year: i32, available: Vec<i32> },
}

fn describe_years(years: &[i32]) -> String {
    match (years.first(), years.last()) {
        (Some(first), Some(last)) if years.len() as i64 == i64::from(*last - *first) + 1 => {
            format!("{first}-{last}")
        }
        (Some(_), Some(_)) => years
            .iter()
            .map(|y| y.to_string())
            .collect::<Vec<_>>()
            .join(", "),
        _ => "none".to_string(),
    }
}

/// Validated `{region, operation, year, output}` record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigRecord {
    pub region: String,
    pub operation: Operation,
    #[serde(deserialize_with = "deserialize_year")]
    pub year: i32,
    pub output: String,
}

/// Accepts `2020`, `2020.0` or `"2020"`.
fn deserialize_year<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let year = match &value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    year.and_then(|y| i32::try_from(y).ok())
        .ok_or_else(|| de::Error::custom(format!("year must be an integer, got {value}")))
}

impl ConfigRecord {
    /// Parse a config document. Syntax errors are `Parse`, shape errors `Invalid`.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|err| match err.classify() {
            serde_json::error::Category::Data => ConfigError::Invalid(err.to_string()),
            _ => ConfigError::Parse(err),
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text)?;
        debug!(?config, "parsed config");
        Ok(config)
    }

    /// Field/value pairs for display, in declaration order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("region", self.region.clone()),
            ("operation", self.operation.to_string()),
            ("year", self.year.to_string()),
            ("output", self.output.clone()),
        ]
    }
}

/// Cross-checks a config against the value domains of the cleaned table.
pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(config: &ConfigRecord, long: &DataFrame) -> Result<(), ConfigError> {
        let regions = DataReshaper::regions(long);
        if !regions.iter().any(|r| r == &config.region) {
            return Err(ConfigError::UnknownRegion {
                region: config.region.clone(),
                available: regions,
            });
        }

        let years = DataReshaper::years(long);
        if years.binary_search(&config.year).is_err() {
            return Err(ConfigError::UnknownYear {
                year: config.year,
                available: years,
            });
        }

        info!(region = %config.region, year = config.year, "config validated");
        Ok(())
    }
}
