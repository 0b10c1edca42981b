//! Data module - CSV loading, reshaping, cleaning and filtering

mod cleaner;
mod filter;
mod loader;
mod reshaper;
pub mod schema;
mod strategy;

pub use cleaner::{CleanOptions, CleanerError, CleaningSummary, DataCleaner};
pub use filter::{DataFilter, FilterError, GroupBy, Operation};
pub use loader::{DataLoader, LoaderError};
pub use reshaper::{DataInfo, DataReshaper, ReshapeError};
pub use strategy::MissingStrategy;
