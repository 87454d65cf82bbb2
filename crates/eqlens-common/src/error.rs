//! Error types shared across eqlens crates

use thiserror::Error;

/// Result type alias for eqlens operations
pub type Result<T> = std::result::Result<T, EqlensError>;

/// Main error type for eqlens
#[derive(Error, Debug)]
pub enum EqlensError {
    #[error("Invalid dataset id: {0}")]
    InvalidDatasetId(String),

    #[error("Dataset {dataset_id} declares {declared} records but {actual} were loaded")]
    RecordCountMismatch {
        dataset_id: String,
        declared: usize,
        actual: usize,
    },
}
