//! In-memory dataset storage

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use eqlens_analytics::{retain, RetentionCandidate};
use eqlens_common::{Dataset, DatasetId, EquipmentRecord};
use tokio::sync::RwLock;

use super::{DatasetRepository, InsertOutcome, RepositoryResult};

#[derive(Debug, Clone)]
struct StoredDataset {
    dataset: Dataset,
    records: Arc<Vec<EquipmentRecord>>,
}

/// Process-local repository; contents are lost on restart
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    datasets: RwLock<HashMap<DatasetId, StoredDataset>>,
    sequence: AtomicI64,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted_newest_first(mut datasets: Vec<Dataset>) -> Vec<Dataset> {
        datasets.sort_by(|a, b| {
            b.uploaded_at
                .cmp(&a.uploaded_at)
                .then_with(|| b.sequence.cmp(&a.sequence))
        });
        datasets
    }
}

#[async_trait]
impl DatasetRepository for InMemoryRepository {
    async fn insert_with_retention(
        &self,
        mut dataset: Dataset,
        records: Vec<EquipmentRecord>,
        cap: usize,
    ) -> RepositoryResult<InsertOutcome> {
        // Sequence is assigned under the write guard so insertion order matches it.
        let mut datasets = self.datasets.write().await;
        dataset.sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;

        let existing: Vec<RetentionCandidate> = datasets
            .values()
            .filter(|stored| stored.dataset.user_id == dataset.user_id)
            .map(|stored| RetentionCandidate::from(&stored.dataset))
            .collect();
        let evicted = retain(&existing, RetentionCandidate::from(&dataset), cap);

        datasets.insert(
            dataset.id,
            StoredDataset {
                dataset: dataset.clone(),
                records: Arc::new(records),
            },
        );
        for id in &evicted {
            datasets.remove(id);
        }

        Ok(InsertOutcome { dataset, evicted })
    }

    async fn list_datasets(&self, user_id: &str) -> RepositoryResult<Vec<Dataset>> {
        let datasets = self.datasets.read().await;
        let owned = datasets
            .values()
            .filter(|stored| stored.dataset.user_id == user_id)
            .map(|stored| stored.dataset.clone())
            .collect();
        Ok(Self::sorted_newest_first(owned))
    }

    async fn get_dataset(&self, user_id: &str, id: DatasetId) -> RepositoryResult<Option<Dataset>> {
        let datasets = self.datasets.read().await;
        Ok(datasets
            .get(&id)
            .filter(|stored| stored.dataset.user_id == user_id)
            .map(|stored| stored.dataset.clone()))
    }

    async fn load_records(&self, id: DatasetId) -> RepositoryResult<Vec<EquipmentRecord>> {
        let datasets = self.datasets.read().await;
        Ok(datasets
            .get(&id)
            .map(|stored| stored.records.as_ref().clone())
            .unwrap_or_default())
    }

    async fn delete_dataset(&self, user_id: &str, id: DatasetId) -> RepositoryResult<bool> {
        let mut datasets = self.datasets.write().await;
        let owned = datasets
            .get(&id)
            .is_some_and(|stored| stored.dataset.user_id == user_id);
        if owned {
            datasets.remove(&id);
        }
        Ok(owned)
    }

    async fn health_check(&self) -> RepositoryResult<()> {
        Ok(())
    }
}
