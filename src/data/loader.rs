//! CSV Data Loader Module
//! Reads the wide GDP-by-country-by-year table using Polars.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("CSV file not found at {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to parse CSV {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
}

/// Loads the wide input table from disk.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file into a wide DataFrame.
    ///
    /// The whole file is scanned for schema inference so a year column with a
    /// stray non-numeric cell comes back as text instead of failing the read;
    /// the reshaper turns such cells into missing values.
    pub fn load_csv(path: impl AsRef<Path>) -> Result<DataFrame, LoaderError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(LoaderError::NotFound(path.to_path_buf()));
        }

        debug!(path = %path.display(), "reading CSV");
        let df = LazyCsvReader::new(path)
            .with_infer_schema_length(None)
            .finish()
            .and_then(|lazy| lazy.collect())
            .map_err(|source| LoaderError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        info!(
            path = %path.display(),
            rows = df.height(),
            columns = df.width(),
            "loaded wide table"
        );
        Ok(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_file_is_not_found() {
        let err = DataLoader::load_csv("definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, LoaderError::NotFound(_)));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_load_wide_table() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            "Country Name,Country Code,Continent,2020,2021\n\
             Aland,ALA,Europe,1.5,2.5\n\
             Borea,BOR,Asia,,4.0\n"
        )
        .unwrap();

        let df = DataLoader::load_csv(file.path()).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(
            df.get_column_names_str(),
            vec!["Country Name", "Country Code", "Continent", "2020", "2021"]
        );
    }
}
