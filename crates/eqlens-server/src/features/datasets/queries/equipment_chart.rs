use eqlens_analytics::{charts::GroupedBarChart, equipment_bar, Chart};
use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::features::shared::dataset_id_from_path;
use crate::repository::{load_owned, RepositoryError, SharedRepository};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetEquipmentChartQuery {
    pub user_id: String,
    pub id: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GetEquipmentChartError {
    #[error("Dataset '{0}' not found")]
    NotFound(String),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl Request<Result<Chart<GroupedBarChart>, GetEquipmentChartError>> for GetEquipmentChartQuery {}

impl crate::cqrs::middleware::Query for GetEquipmentChartQuery {}

/// Per-equipment parameter bars for the detail view
#[tracing::instrument(skip(repo))]
pub async fn handle(
    repo: SharedRepository,
    query: GetEquipmentChartQuery,
) -> Result<Chart<GroupedBarChart>, GetEquipmentChartError> {
    let not_found = || GetEquipmentChartError::NotFound(query.id.clone());

    let id = dataset_id_from_path(&query.id).ok_or_else(not_found)?;
    let (_, records) = load_owned(repo.as_ref(), &query.user_id, id)
        .await?
        .ok_or_else(not_found)?;

    Ok(equipment_bar(&records))
}
