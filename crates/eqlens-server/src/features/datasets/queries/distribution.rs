use eqlens_analytics::DistributionPayload;
use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::features::shared::dataset_id_from_path;
use crate::repository::{load_owned, RepositoryError, SharedRepository};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetDistributionQuery {
    pub user_id: String,
    pub id: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GetDistributionError {
    #[error("Dataset '{0}' not found")]
    NotFound(String),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl Request<Result<DistributionPayload, GetDistributionError>> for GetDistributionQuery {}

impl crate::cqrs::middleware::Query for GetDistributionQuery {}

/// Type distribution of a dataset; an empty dataset yields an empty list
#[tracing::instrument(skip(repo))]
pub async fn handle(
    repo: SharedRepository,
    query: GetDistributionQuery,
) -> Result<DistributionPayload, GetDistributionError> {
    let not_found = || GetDistributionError::NotFound(query.id.clone());

    let id = dataset_id_from_path(&query.id).ok_or_else(not_found)?;
    let (dataset, records) = load_owned(repo.as_ref(), &query.user_id, id)
        .await?
        .ok_or_else(not_found)?;

    Ok(DistributionPayload::new(dataset.id, &records))
}
