//! Error types for the eqlens CLI
//!
//! Messages are user-facing and say what to do next where there is
//! something to do.

use eqlens_analytics::ReportError;
use eqlens_ingest::IngestError;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    /// Input file is missing
    #[error("File not found: '{0}'. Verify the file path exists and you have read permissions.")]
    FileNotFound(String),

    /// The CSV could not be read as a table
    #[error("{0}. Check that the file is a comma-separated table with a header row.")]
    Ingest(#[from] IngestError),

    /// The CSV has a header but no data rows
    #[error("'{0}' contains no equipment records")]
    NoEquipmentData(String),

    /// Report rendering failed
    #[error("Report rendering failed: {0}")]
    Render(String),

    /// Refusing to replace an existing report
    #[error("Output file '{0}' already exists. Use --force to overwrite it.")]
    OutputExists(String),

    /// File system operation failed
    #[error("File operation failed: {0}. Check file permissions and disk space.")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed
    #[error("Failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map a report failure for the file it was rendered from
    pub fn from_report(err: ReportError, source: &str) -> Self {
        match err {
            ReportError::NoEquipmentData => Self::NoEquipmentData(source.to_string()),
            ReportError::InternalRender(message) => Self::Render(message),
        }
    }
}
