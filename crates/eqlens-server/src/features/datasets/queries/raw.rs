use eqlens_common::{DatasetId, EquipmentRecord};
use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::features::shared::dataset_id_from_path;
use crate::repository::{load_owned, RepositoryError, SharedRepository};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetRawDataQuery {
    pub user_id: String,
    pub id: String,
}

/// Records of a dataset as parallel column arrays, for client-side charting
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDataResponse {
    pub dataset_id: DatasetId,
    pub names: Vec<String>,
    pub types: Vec<String>,
    pub flowrates: Vec<f64>,
    pub pressures: Vec<f64>,
    pub temperatures: Vec<f64>,
}

impl RawDataResponse {
    pub fn from_records(dataset_id: DatasetId, records: Vec<EquipmentRecord>) -> Self {
        let mut raw = RawDataResponse {
            dataset_id,
            ..Default::default()
        };
        for record in records {
            raw.names.push(record.name);
            raw.types.push(record.equipment_type);
            raw.flowrates.push(record.flowrate);
            raw.pressures.push(record.pressure);
            raw.temperatures.push(record.temperature);
        }
        raw
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GetRawDataError {
    #[error("Dataset '{0}' not found")]
    NotFound(String),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl Request<Result<RawDataResponse, GetRawDataError>> for GetRawDataQuery {}

impl crate::cqrs::middleware::Query for GetRawDataQuery {}

#[tracing::instrument(skip(repo))]
pub async fn handle(
    repo: SharedRepository,
    query: GetRawDataQuery,
) -> Result<RawDataResponse, GetRawDataError> {
    let not_found = || GetRawDataError::NotFound(query.id.clone());

    let id = dataset_id_from_path(&query.id).ok_or_else(not_found)?;
    let (dataset, records) = load_owned(repo.as_ref(), &query.user_id, id)
        .await?
        .ok_or_else(not_found)?;

    Ok(RawDataResponse::from_records(dataset.id, records))
}
