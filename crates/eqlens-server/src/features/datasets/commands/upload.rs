use eqlens_analytics::aggregate;
use eqlens_common::{Dataset, DatasetId};
use eqlens_ingest::{parse_csv, FieldWarning, IngestError};
use mediator::Request;
use serde::Serialize;

use crate::features::datasets::types::DatasetResponse;
use crate::repository::{RepositoryError, SharedRepository};

/// Name stored when the multipart part carries no filename
pub const DEFAULT_FILENAME: &str = "upload.csv";

pub const MAX_FILENAME_LENGTH: usize = 255;

#[derive(Debug, Clone)]
pub struct UploadDatasetCommand {
    pub user_id: String,
    pub filename: String,
    pub content: Vec<u8>,
    pub retention_cap: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadDatasetResponse {
    pub dataset: DatasetResponse,
    pub warning_count: usize,
    pub warnings: Vec<FieldWarning>,
    /// Datasets deleted to keep the user within the retention cap
    pub evicted: Vec<DatasetId>,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadDatasetError {
    #[error("Filename must not exceed {MAX_FILENAME_LENGTH} characters")]
    FilenameLength,
    #[error("Retention cap must keep at least one dataset")]
    InvalidRetentionCap,
    #[error("{0}")]
    Malformed(#[from] IngestError),
    #[error("Parser task failed: {0}")]
    Task(String),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl Request<Result<UploadDatasetResponse, UploadDatasetError>> for UploadDatasetCommand {}

impl crate::cqrs::middleware::Command for UploadDatasetCommand {}

impl UploadDatasetCommand {
    pub fn validate(&self) -> Result<(), UploadDatasetError> {
        if self.filename.chars().count() > MAX_FILENAME_LENGTH {
            return Err(UploadDatasetError::FilenameLength);
        }
        if self.retention_cap == 0 {
            return Err(UploadDatasetError::InvalidRetentionCap);
        }
        Ok(())
    }
}

/// Reduce a client-supplied filename to its last path component
pub fn clean_filename(raw: Option<&str>) -> String {
    raw.and_then(|name| name.rsplit(['/', '\\']).next())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_FILENAME)
        .to_string()
}

#[tracing::instrument(
    skip(repo, command),
    fields(user_id = %command.user_id, filename = %command.filename, bytes = command.content.len())
)]
pub async fn handle(
    repo: SharedRepository,
    command: UploadDatasetCommand,
) -> Result<UploadDatasetResponse, UploadDatasetError> {
    command.validate()?;

    let UploadDatasetCommand {
        user_id,
        filename,
        content,
        retention_cap,
    } = command;

    let parsed = tokio::task::spawn_blocking(move || parse_csv(&content))
        .await
        .map_err(|e| UploadDatasetError::Task(e.to_string()))??;

    // Empty uploads are stored with placeholder averages
    let averages = aggregate(&parsed.records)
        .map(|stats| stats.averages())
        .unwrap_or_default();
    let dataset = Dataset::new(user_id, filename, parsed.count(), averages);

    let outcome = repo
        .insert_with_retention(dataset, parsed.records, retention_cap)
        .await?;

    if !outcome.evicted.is_empty() {
        tracing::info!(
            evicted = outcome.evicted.len(),
            kept_new = outcome.kept(),
            "Retention cap removed older datasets"
        );
    }

    Ok(UploadDatasetResponse {
        dataset: DatasetResponse::from(&outcome.dataset),
        warning_count: parsed.warnings.len(),
        warnings: parsed.warnings,
        evicted: outcome.evicted,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::shared::test_helpers::{memory_repo, SAMPLE_CSV};

    fn command(user_id: &str, content: &str) -> UploadDatasetCommand {
        UploadDatasetCommand {
            user_id: user_id.to_string(),
            filename: "pumps.csv".to_string(),
            content: content.as_bytes().to_vec(),
            retention_cap: 5,
        }
    }

    #[test]
    fn test_validation_success() {
        assert!(command("alice", SAMPLE_CSV).validate().is_ok());
    }

    #[test]
    fn test_validation_long_filename() {
        let mut cmd = command("alice", SAMPLE_CSV);
        cmd.filename = "a".repeat(MAX_FILENAME_LENGTH + 1);
        assert!(matches!(cmd.validate(), Err(UploadDatasetError::FilenameLength)));
    }

    #[test]
    fn test_validation_zero_cap() {
        let mut cmd = command("alice", SAMPLE_CSV);
        cmd.retention_cap = 0;
        assert!(matches!(cmd.validate(), Err(UploadDatasetError::InvalidRetentionCap)));
    }

    #[test]
    fn test_clean_filename() {
        assert_eq!(clean_filename(Some("pumps.csv")), "pumps.csv");
        assert_eq!(clean_filename(Some("C:\\data\\pumps.csv")), "pumps.csv");
        assert_eq!(clean_filename(Some("../../etc/pumps.csv")), "pumps.csv");
        assert_eq!(clean_filename(Some("  ")), DEFAULT_FILENAME);
        assert_eq!(clean_filename(None), DEFAULT_FILENAME);
    }

    #[tokio::test]
    async fn test_handle_stores_dataset_with_averages() {
        let repo = memory_repo();
        let response = handle(repo.clone(), command("alice", SAMPLE_CSV)).await.unwrap();

        assert_eq!(response.dataset.total_count, 3);
        assert_eq!(response.dataset.avg_flowrate, Some(20.0));
        assert_eq!(response.dataset.avg_pressure, Some(5.0));
        assert_eq!(response.dataset.avg_temperature, Some(40.0));
        assert_eq!(response.warning_count, 0);
        assert!(response.evicted.is_empty());

        let records = repo.load_records(response.dataset.id).await.unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].name, "Pump-1");
    }

    #[tokio::test]
    async fn test_handle_reports_coercion_warnings() {
        let csv = "Equipment Name,Type,Flowrate,Pressure,Temperature\nP1,Pump,abc,5,\n";
        let response = handle(memory_repo(), command("alice", csv)).await.unwrap();
        assert_eq!(response.dataset.total_count, 1);
        assert_eq!(response.warning_count, 2);
        assert_eq!(response.warnings.len(), 2);
    }

    #[tokio::test]
    async fn test_handle_header_only_upload() {
        let csv = "Equipment Name,Type,Flowrate,Pressure,Temperature\n";
        let response = handle(memory_repo(), command("alice", csv)).await.unwrap();
        assert_eq!(response.dataset.total_count, 0);
        assert_eq!(response.dataset.avg_flowrate, None);
    }

    #[tokio::test]
    async fn test_handle_malformed_input() {
        let result = handle(memory_repo(), command("alice", "")).await;
        assert!(matches!(result, Err(UploadDatasetError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_handle_enforces_retention_cap() {
        let repo = memory_repo();
        let mut first = None;
        for _ in 0..5 {
            let response = handle(repo.clone(), command("alice", SAMPLE_CSV)).await.unwrap();
            first.get_or_insert(response.dataset.id);
        }

        let sixth = handle(repo.clone(), command("alice", SAMPLE_CSV)).await.unwrap();
        assert_eq!(sixth.evicted, vec![first.unwrap()]);
        assert_eq!(repo.list_datasets("alice").await.unwrap().len(), 5);
    }
}
