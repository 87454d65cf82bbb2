use eqlens_common::EquipmentRecord;
use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::features::datasets::types::DatasetResponse;
use crate::features::shared::dataset_id_from_path;
use crate::repository::{load_owned, RepositoryError, SharedRepository};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetDatasetQuery {
    pub user_id: String,
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetDatasetResponse {
    #[serde(flatten)]
    pub dataset: DatasetResponse,
    /// In upload row order
    pub records: Vec<EquipmentRecord>,
}

#[derive(Debug, thiserror::Error)]
pub enum GetDatasetError {
    #[error("Dataset '{0}' not found")]
    NotFound(String),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl Request<Result<GetDatasetResponse, GetDatasetError>> for GetDatasetQuery {}

impl crate::cqrs::middleware::Query for GetDatasetQuery {}

#[tracing::instrument(skip(repo))]
pub async fn handle(
    repo: SharedRepository,
    query: GetDatasetQuery,
) -> Result<GetDatasetResponse, GetDatasetError> {
    let not_found = || GetDatasetError::NotFound(query.id.clone());

    let id = dataset_id_from_path(&query.id).ok_or_else(not_found)?;
    let (dataset, records) = load_owned(repo.as_ref(), &query.user_id, id)
        .await?
        .ok_or_else(not_found)?;

    Ok(GetDatasetResponse {
        dataset: DatasetResponse::from(&dataset),
        records,
    })
}
