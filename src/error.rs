//! Error types for the analysis pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Result type used by the library modules
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Failures raised by the loader, the views and the rule miner
#[derive(Error, Debug)]
pub enum DashboardError {
    /// The dataset file could not be located
    #[error("source unavailable: {0}")]
    SourceUnavailable(PathBuf),

    /// The dataset exists but could not be parsed as CSV
    #[error("failed to read dataset: {0}")]
    Csv(#[from] polars::prelude::PolarsError),

    /// A view needs columns the dataset does not have
    #[error("{view} unavailable: missing column(s) {}", missing.join(", "))]
    ColumnMissing {
        view: &'static str,
        missing: Vec<&'static str>,
    },

    /// A tuning parameter is outside its accepted range
    #[error("invalid {name} = {value}: {constraint}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        constraint: &'static str,
    },
}

impl DashboardError {
    /// True for the scoped "optional column absent" case
    pub fn is_column_missing(&self) -> bool {
        matches!(self, DashboardError::ColumnMissing { .. })
    }
}
