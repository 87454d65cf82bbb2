use eqlens_analytics::{render_report, ReportError};
use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::features::shared::dataset_id_from_path;
use crate::repository::{load_owned, RepositoryError, SharedRepository};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateReportQuery {
    pub user_id: String,
    pub id: String,
}

/// A rendered PDF and the name it is downloaded under
#[derive(Debug, Clone)]
pub struct ReportDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum GenerateReportError {
    #[error("Dataset '{0}' not found")]
    NotFound(String),
    #[error("Dataset has no equipment records to report on")]
    NoEquipmentData,
    #[error("Report rendering failed: {0}")]
    Render(String),
    #[error("Report task failed: {0}")]
    Task(String),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<ReportError> for GenerateReportError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::NoEquipmentData => Self::NoEquipmentData,
            ReportError::InternalRender(message) => Self::Render(message),
        }
    }
}

impl Request<Result<ReportDocument, GenerateReportError>> for GenerateReportQuery {}

impl crate::cqrs::middleware::Query for GenerateReportQuery {}

#[tracing::instrument(skip(repo))]
pub async fn handle(
    repo: SharedRepository,
    query: GenerateReportQuery,
) -> Result<ReportDocument, GenerateReportError> {
    let not_found = || GenerateReportError::NotFound(query.id.clone());

    let id = dataset_id_from_path(&query.id).ok_or_else(not_found)?;
    let (dataset, records) = load_owned(repo.as_ref(), &query.user_id, id)
        .await?
        .ok_or_else(not_found)?;

    if records.is_empty() {
        return Err(GenerateReportError::NoEquipmentData);
    }

    let bytes = tokio::task::spawn_blocking(move || render_report(&dataset, &records))
        .await
        .map_err(|e| GenerateReportError::Task(e.to_string()))??;

    tracing::info!(bytes = bytes.len(), "Report generated");

    Ok(ReportDocument {
        filename: format!("report_{id}.pdf"),
        bytes,
    })
}
