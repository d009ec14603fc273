/// Error types shared across the crate.
///
/// Only ingestion and boundary parsing can fail. Aggregation, filtering,
/// sorting and pagination are total over any dataset, including the empty one.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    /// The dataset file could not be opened or read
    #[error("failed to read dataset '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The delimited text could not be decoded into records
    #[error("error parsing CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {index} out of range [0, {len})")]
    RowOutOfRange { index: usize, len: usize },

    /// Sort column outside the table whitelist
    #[error("unknown sort column '{0}'")]
    UnknownColumn(String),

    #[error("unknown facet '{0}'")]
    UnknownFacet(String),

    #[error("invalid sort order '{0}', expected 'asc' or 'desc'")]
    InvalidSortOrder(String),

    #[error("invalid page '{0}', expected a positive integer")]
    InvalidPage(String),
}

impl DashboardError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DashboardError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for failures that happen while loading the dataset.
    ///
    /// These are terminal for the current load; everything else is a
    /// rejected request parameter.
    pub fn is_load_failure(&self) -> bool {
        matches!(self, DashboardError::Io { .. } | DashboardError::Csv(_))
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
