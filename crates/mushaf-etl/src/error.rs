//! Error types for dataset import and export.

use thiserror::Error;

/// Errors that can occur while importing or exporting data.
#[derive(Debug, Error)]
pub enum EtlError {
    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV reader or writer failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A JSON document could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An error propagated from the core domain layer.
    #[error("database error: {0}")]
    Core(#[from] mushaf_core::Error),

    /// The dataset cannot be used at all (unknown format and the like).
    #[error("invalid dataset {path}: {message}")]
    InvalidDataset { path: String, message: String },
}

impl EtlError {
    /// Returns `true` when the failure came from the persistence layer.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Core(_))
    }
}

/// Convenience alias for ETL results.
pub type EtlResult<T> = std::result::Result<T, EtlError>;
