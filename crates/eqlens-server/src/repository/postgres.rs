//! PostgreSQL dataset storage
//!
//! Queries are checked at runtime so the crate builds without a live
//! database. Retention runs inside the insert transaction while holding a
//! transaction-scoped advisory lock keyed on the user id.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eqlens_analytics::{retain, RetentionCandidate};
use eqlens_common::{Dataset, DatasetId, EquipmentRecord};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::FromRow;

use super::{DatasetRepository, InsertOutcome, RepositoryError, RepositoryResult};
use crate::config::DatabaseConfig;

#[derive(Debug, Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a connection pool and bring the schema up to date
    pub async fn connect(config: &DatabaseConfig) -> RepositoryResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .connect(&config.url)
            .await?;

        tracing::info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Database connection pool created"
        );

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations completed");

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(Debug, FromRow)]
struct DatasetRow {
    id: DatasetId,
    user_id: String,
    filename: String,
    uploaded_at: DateTime<Utc>,
    sequence: i64,
    total_count: i32,
    avg_flowrate: f64,
    avg_pressure: f64,
    avg_temperature: f64,
}

impl TryFrom<DatasetRow> for Dataset {
    type Error = RepositoryError;

    fn try_from(row: DatasetRow) -> Result<Self, Self::Error> {
        let total_count = usize::try_from(row.total_count)
            .map_err(|_| RepositoryError::Corrupt(format!("negative total_count for {}", row.id)))?;
        Ok(Dataset {
            id: row.id,
            user_id: row.user_id,
            filename: row.filename,
            uploaded_at: row.uploaded_at,
            sequence: row.sequence,
            total_count,
            avg_flowrate: row.avg_flowrate,
            avg_pressure: row.avg_pressure,
            avg_temperature: row.avg_temperature,
        })
    }
}

#[derive(Debug, FromRow)]
struct RecordRow {
    name: String,
    equipment_type: String,
    flowrate: f64,
    pressure: f64,
    temperature: f64,
}

impl From<RecordRow> for EquipmentRecord {
    fn from(row: RecordRow) -> Self {
        EquipmentRecord::new(row.name, row.equipment_type, row.flowrate, row.pressure, row.temperature)
    }
}

#[derive(Debug, FromRow)]
struct CandidateRow {
    id: DatasetId,
    uploaded_at: DateTime<Utc>,
    sequence: i64,
}

const DATASET_COLUMNS: &str = "id, user_id, filename, uploaded_at, sequence, total_count, \
                               avg_flowrate, avg_pressure, avg_temperature";

#[async_trait]
impl DatasetRepository for PgRepository {
    #[tracing::instrument(skip(self, dataset, records), fields(dataset_id = %dataset.id, user_id = %dataset.user_id))]
    async fn insert_with_retention(
        &self,
        mut dataset: Dataset,
        records: Vec<EquipmentRecord>,
        cap: usize,
    ) -> RepositoryResult<InsertOutcome> {
        let total_count = i32::try_from(dataset.total_count)
            .map_err(|_| RepositoryError::Corrupt(format!("total_count {} out of range", dataset.total_count)))?;

        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(&dataset.user_id)
            .execute(&mut *tx)
            .await?;

        let (sequence,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO datasets (id, user_id, filename, uploaded_at, total_count,
                                  avg_flowrate, avg_pressure, avg_temperature)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING sequence
            "#,
        )
        .bind(dataset.id)
        .bind(&dataset.user_id)
        .bind(&dataset.filename)
        .bind(dataset.uploaded_at)
        .bind(total_count)
        .bind(dataset.avg_flowrate)
        .bind(dataset.avg_pressure)
        .bind(dataset.avg_temperature)
        .fetch_one(&mut *tx)
        .await?;
        dataset.sequence = sequence;

        if !records.is_empty() {
            let positions: Vec<i32> = (0..records.len() as i32).collect();
            let mut names = Vec::with_capacity(records.len());
            let mut types = Vec::with_capacity(records.len());
            let mut flowrates = Vec::with_capacity(records.len());
            let mut pressures = Vec::with_capacity(records.len());
            let mut temperatures = Vec::with_capacity(records.len());
            for record in records {
                names.push(record.name);
                types.push(record.equipment_type);
                flowrates.push(record.flowrate);
                pressures.push(record.pressure);
                temperatures.push(record.temperature);
            }

            sqlx::query(
                r#"
                INSERT INTO equipment_records
                    (dataset_id, position, name, equipment_type, flowrate, pressure, temperature)
                SELECT $1, * FROM UNNEST($2::int4[], $3::text[], $4::text[],
                                         $5::float8[], $6::float8[], $7::float8[])
                "#,
            )
            .bind(dataset.id)
            .bind(&positions)
            .bind(&names)
            .bind(&types)
            .bind(&flowrates)
            .bind(&pressures)
            .bind(&temperatures)
            .execute(&mut *tx)
            .await?;
        }

        let existing: Vec<CandidateRow> =
            sqlx::query_as("SELECT id, uploaded_at, sequence FROM datasets WHERE user_id = $1")
                .bind(&dataset.user_id)
                .fetch_all(&mut *tx)
                .await?;
        let existing: Vec<RetentionCandidate> = existing
            .into_iter()
            .map(|row| RetentionCandidate {
                id: row.id,
                uploaded_at: row.uploaded_at,
                sequence: row.sequence,
            })
            .collect();

        let evicted = retain(&existing, RetentionCandidate::from(&dataset), cap);
        if !evicted.is_empty() {
            sqlx::query("DELETE FROM datasets WHERE id = ANY($1)")
                .bind(&evicted)
                .execute(&mut *tx)
                .await?;
            tracing::info!(evicted = evicted.len(), "Evicted datasets beyond retention cap");
        }

        tx.commit().await?;

        Ok(InsertOutcome { dataset, evicted })
    }

    async fn list_datasets(&self, user_id: &str) -> RepositoryResult<Vec<Dataset>> {
        let rows: Vec<DatasetRow> = sqlx::query_as(&format!(
            "SELECT {DATASET_COLUMNS} FROM datasets WHERE user_id = $1 \
             ORDER BY uploaded_at DESC, sequence DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Dataset::try_from).collect()
    }

    async fn get_dataset(&self, user_id: &str, id: DatasetId) -> RepositoryResult<Option<Dataset>> {
        let row: Option<DatasetRow> = sqlx::query_as(&format!(
            "SELECT {DATASET_COLUMNS} FROM datasets WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Dataset::try_from).transpose()
    }

    async fn load_records(&self, id: DatasetId) -> RepositoryResult<Vec<EquipmentRecord>> {
        let rows: Vec<RecordRow> = sqlx::query_as(
            r#"
            SELECT name, equipment_type, flowrate, pressure, temperature
            FROM equipment_records
            WHERE dataset_id = $1
            ORDER BY position
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(EquipmentRecord::from).collect())
    }

    async fn delete_dataset(&self, user_id: &str, id: DatasetId) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM datasets WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> RepositoryResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
