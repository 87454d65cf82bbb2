use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::features::datasets::types::DatasetResponse;
use crate::repository::{RepositoryError, SharedRepository};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListDatasetsQuery {
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListDatasetsResponse {
    /// Newest first
    pub items: Vec<DatasetResponse>,
    pub total: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ListDatasetsError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl Request<Result<ListDatasetsResponse, ListDatasetsError>> for ListDatasetsQuery {}

impl crate::cqrs::middleware::Query for ListDatasetsQuery {}

#[tracing::instrument(skip(repo))]
pub async fn handle(
    repo: SharedRepository,
    query: ListDatasetsQuery,
) -> Result<ListDatasetsResponse, ListDatasetsError> {
    let datasets = repo.list_datasets(&query.user_id).await?;
    let items: Vec<DatasetResponse> = datasets.iter().map(DatasetResponse::from).collect();

    Ok(ListDatasetsResponse {
        total: items.len(),
        items,
    })
}
