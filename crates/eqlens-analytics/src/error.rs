//! Error types for aggregation and report rendering

use thiserror::Error;

/// Errors raised by the statistics pipeline
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    /// Aggregation was asked to summarise zero records
    #[error("Dataset has no equipment records")]
    EmptyDataset,
}

/// Errors raised while producing the PDF report
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("No equipment data to report")]
    NoEquipmentData,

    #[error("Failed to render report: {0}")]
    InternalRender(String),
}

impl From<AnalyticsError> for ReportError {
    fn from(err: AnalyticsError) -> Self {
        match err {
            AnalyticsError::EmptyDataset => ReportError::NoEquipmentData,
        }
    }
}

impl From<crate::render::RenderError> for ReportError {
    fn from(err: crate::render::RenderError) -> Self {
        ReportError::InternalRender(err.to_string())
    }
}

impl From<printpdf::Error> for ReportError {
    fn from(err: printpdf::Error) -> Self {
        ReportError::InternalRender(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
