//! Test fixtures for feature handlers
//!
//! # Examples
//!
//! ```rust,ignore
//! use eqlens_server::features::shared::test_helpers::*;
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let repo = memory_repo();
//!     let dataset = TestDataset::new("alice", "pumps.csv").insert(&repo).await;
//!     // ... test logic ...
//! }
//! ```

use std::sync::Arc;

use eqlens_analytics::aggregate;
use eqlens_common::{Averages, Dataset, EquipmentRecord};

use crate::repository::{InMemoryRepository, SharedRepository};

pub const SAMPLE_CSV: &str = "\
Equipment Name,Type,Flowrate,Pressure,Temperature
Pump-1,Pump,10,5,40
Valve-1,Valve,20,3,30
Pump-2,Pump,30,7,50
";

pub fn memory_repo() -> SharedRepository {
    Arc::new(InMemoryRepository::new())
}

pub fn sample_records() -> Vec<EquipmentRecord> {
    vec![
        EquipmentRecord::new("Pump-1", "Pump", 10.0, 5.0, 40.0),
        EquipmentRecord::new("Valve-1", "Valve", 20.0, 3.0, 30.0),
        EquipmentRecord::new("Pump-2", "Pump", 30.0, 7.0, 50.0),
    ]
}

/// Builder for datasets stored directly through the repository
#[derive(Debug, Clone)]
pub struct TestDataset {
    pub user_id: String,
    pub filename: String,
    pub records: Vec<EquipmentRecord>,
}

impl TestDataset {
    pub fn new(user_id: &str, filename: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            filename: filename.to_string(),
            records: sample_records(),
        }
    }

    pub fn with_records(mut self, records: Vec<EquipmentRecord>) -> Self {
        self.records = records;
        self
    }

    /// Insert the dataset with the default retention cap
    pub async fn insert(self, repo: &SharedRepository) -> Dataset {
        let averages = aggregate(&self.records)
            .map(|stats| stats.averages())
            .unwrap_or_else(|_| Averages::default());
        let dataset = Dataset::new(self.user_id, self.filename, self.records.len(), averages);

        repo.insert_with_retention(dataset, self.records, eqlens_analytics::RETENTION_CAP)
            .await
            .expect("insert test dataset")
            .dataset
    }
}
