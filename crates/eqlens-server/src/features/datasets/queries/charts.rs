use eqlens_analytics::{compose_charts, distribution, ChartSet};
use mediator::Request;
use serde::{Deserialize, Serialize};

use crate::features::shared::dataset_id_from_path;
use crate::repository::{load_owned, RepositoryError, SharedRepository};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetChartsQuery {
    pub user_id: String,
    pub id: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GetChartsError {
    #[error("Dataset '{0}' not found")]
    NotFound(String),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl Request<Result<ChartSet, GetChartsError>> for GetChartsQuery {}

impl crate::cqrs::middleware::Query for GetChartsQuery {}

/// Dashboard chart specifications. Empty datasets get placeholder charts.
#[tracing::instrument(skip(repo))]
pub async fn handle(repo: SharedRepository, query: GetChartsQuery) -> Result<ChartSet, GetChartsError> {
    let not_found = || GetChartsError::NotFound(query.id.clone());

    let id = dataset_id_from_path(&query.id).ok_or_else(not_found)?;
    let (_, records) = load_owned(repo.as_ref(), &query.user_id, id)
        .await?
        .ok_or_else(not_found)?;

    let entries = distribution(&records);
    Ok(compose_charts(&records, &entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::{memory_repo, TestDataset};
    use eqlens_common::EquipmentRecord;

    fn query(id: impl ToString) -> GetChartsQuery {
        GetChartsQuery {
            user_id: "alice".to_string(),
            id: id.to_string(),
        }
    }

    #[tokio::test]
    async fn test_handle_builds_all_charts() {
        let repo = memory_repo();
        let dataset = TestDataset::new("alice", "pumps.csv").insert(&repo).await;

        let charts = handle(repo, query(dataset.id)).await.unwrap();
        assert!(!charts.type_distribution.is_placeholder());
        assert!(!charts.type_averages.is_placeholder());
        assert!(!charts.flowrate_pressure.is_placeholder());
        assert!(!charts.temperature_histogram.is_placeholder());
    }

    #[tokio::test]
    async fn test_handle_empty_dataset_gives_placeholders() {
        let repo = memory_repo();
        let dataset = TestDataset::new("alice", "empty.csv")
            .with_records(vec![])
            .insert(&repo)
            .await;

        let charts = handle(repo, query(dataset.id)).await.unwrap();
        assert!(charts.type_distribution.is_placeholder());
        assert!(charts.temperature_histogram.is_placeholder());
    }

    #[tokio::test]
    async fn test_handle_flat_temperatures() {
        let repo = memory_repo();
        let dataset = TestDataset::new("alice", "flat.csv")
            .with_records(vec![
                EquipmentRecord::new("A", "Pump", 1.0, 1.0, 25.0),
                EquipmentRecord::new("B", "Pump", 2.0, 2.0, 25.0),
            ])
            .insert(&repo)
            .await;

        let charts = handle(repo, query(dataset.id)).await.unwrap();
        assert!(charts.temperature_histogram.is_placeholder());
        assert!(!charts.flowrate_pressure.is_placeholder());
    }
}
