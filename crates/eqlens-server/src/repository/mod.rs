//! Dataset persistence
//!
//! Handlers talk to storage through [`DatasetRepository`]. Two backends are
//! provided: [`InMemoryRepository`] for tests and database-less runs, and
//! [`PgRepository`] on PostgreSQL.
//!
//! Inserting a dataset and enforcing the per-user retention cap happen as
//! one atomic unit per user, so concurrent uploads by the same user never
//! leave more than `cap` datasets behind.

use std::sync::Arc;

use async_trait::async_trait;
use eqlens_common::{Dataset, DatasetId, EquipmentRecord};
use thiserror::Error;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryRepository;
pub use postgres::PgRepository;

/// Storage operation errors
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// SQL query or connection error
    #[error("Database query failed: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Database migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// A stored row cannot be mapped back to the domain model
    #[error("Stored data is inconsistent: {0}")]
    Corrupt(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// What an insert did to the user's dataset set
#[derive(Debug, Clone)]
pub struct InsertOutcome {
    /// The stored dataset with its repository-assigned sequence
    pub dataset: Dataset,
    /// Datasets removed to honour the retention cap, possibly including
    /// the one just inserted
    pub evicted: Vec<DatasetId>,
}

impl InsertOutcome {
    pub fn kept(&self) -> bool {
        !self.evicted.contains(&self.dataset.id)
    }
}

#[async_trait]
pub trait DatasetRepository: Send + Sync + 'static {
    /// Store a dataset with its records, then evict the user's oldest
    /// datasets beyond `cap`.
    async fn insert_with_retention(
        &self,
        dataset: Dataset,
        records: Vec<EquipmentRecord>,
        cap: usize,
    ) -> RepositoryResult<InsertOutcome>;

    /// The user's datasets, newest first
    async fn list_datasets(&self, user_id: &str) -> RepositoryResult<Vec<Dataset>>;

    /// A dataset if it exists and belongs to `user_id`
    async fn get_dataset(&self, user_id: &str, id: DatasetId) -> RepositoryResult<Option<Dataset>>;

    /// Records of a dataset in their original row order
    async fn load_records(&self, id: DatasetId) -> RepositoryResult<Vec<EquipmentRecord>>;

    /// Delete a dataset owned by `user_id`; `false` when nothing matched
    async fn delete_dataset(&self, user_id: &str, id: DatasetId) -> RepositoryResult<bool>;

    async fn health_check(&self) -> RepositoryResult<()>;
}

/// Shared handle used as handler state
pub type SharedRepository = Arc<dyn DatasetRepository>;

/// Load a dataset and its records, hiding datasets owned by other users
pub async fn load_owned(
    repo: &dyn DatasetRepository,
    user_id: &str,
    id: DatasetId,
) -> RepositoryResult<Option<(Dataset, Vec<EquipmentRecord>)>> {
    let Some(dataset) = repo.get_dataset(user_id, id).await? else {
        return Ok(None);
    };
    let records = repo.load_records(id).await?;

    if let Err(e) = dataset.ensure_record_count(records.len()) {
        tracing::warn!(error = %e, "Dataset record count drifted from stored value");
    }

    Ok(Some((dataset, records)))
}
