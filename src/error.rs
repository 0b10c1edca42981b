//! Errors surfaced at the pipeline boundary.

use crate::config::ConfigError;
use crate::data::{CleanerError, FilterError, LoaderError, ReshapeError};
use thiserror::Error;

/// Any failure that aborts a run before results reach the presentation layer.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Loader(#[from] LoaderError),
    #[error(transparent)]
    Reshape(#[from] ReshapeError),
    #[error(transparent)]
    Cleaner(#[from] CleanerError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Filter(#[from] FilterError),
}
