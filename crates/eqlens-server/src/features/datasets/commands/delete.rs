use eqlens_common::DatasetId;
use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::features::shared::dataset_id_from_path;
use crate::repository::{RepositoryError, SharedRepository};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteDatasetCommand {
    pub user_id: String,
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteDatasetResponse {
    pub id: DatasetId,
    pub deleted: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteDatasetError {
    #[error("Dataset '{0}' not found")]
    NotFound(String),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl Request<Result<DeleteDatasetResponse, DeleteDatasetError>> for DeleteDatasetCommand {}

impl crate::cqrs::middleware::Command for DeleteDatasetCommand {}

#[tracing::instrument(skip(repo), fields(user_id = %command.user_id, id = %command.id))]
pub async fn handle(
    repo: SharedRepository,
    command: DeleteDatasetCommand,
) -> Result<DeleteDatasetResponse, DeleteDatasetError> {
    let id = dataset_id_from_path(&command.id)
        .ok_or_else(|| DeleteDatasetError::NotFound(command.id.clone()))?;

    if !repo.delete_dataset(&command.user_id, id).await? {
        return Err(DeleteDatasetError::NotFound(command.id));
    }

    Ok(DeleteDatasetResponse { id, deleted: true })
}
