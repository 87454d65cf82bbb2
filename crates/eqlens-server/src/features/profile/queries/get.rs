use eqlens_common::DatasetSummary;
use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::repository::{RepositoryError, SharedRepository};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetProfileQuery {
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetProfileResponse {
    pub user_id: String,
    pub total_datasets: usize,
    /// Newest first
    pub datasets: Vec<DatasetSummary>,
}

#[derive(Debug, thiserror::Error)]
pub enum GetProfileError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl Request<Result<GetProfileResponse, GetProfileError>> for GetProfileQuery {}

impl crate::cqrs::middleware::Query for GetProfileQuery {}

#[tracing::instrument(skip(repo))]
pub async fn handle(
    repo: SharedRepository,
    query: GetProfileQuery,
) -> Result<GetProfileResponse, GetProfileError> {
    let datasets: Vec<DatasetSummary> = repo
        .list_datasets(&query.user_id)
        .await?
        .iter()
        .map(|d| d.summary())
        .collect();

    Ok(GetProfileResponse {
        user_id: query.user_id,
        total_datasets: datasets.len(),
        datasets,
    })
}
