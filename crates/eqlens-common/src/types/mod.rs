//! Domain types shared by ingestion, analytics and the server

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EqlensError, Result};

/// Identifier of a stored dataset
pub type DatasetId = Uuid;

/// Label substituted for a missing equipment name or type
pub const UNKNOWN_LABEL: &str = "Unknown/NA";

/// One row of equipment measurements.
///
/// Records are immutable once ingested and are owned by exactly one
/// [`Dataset`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentRecord {
    pub name: String,
    pub equipment_type: String,
    pub flowrate: f64,
    pub pressure: f64,
    pub temperature: f64,
}

impl EquipmentRecord {
    pub fn new(
        name: impl Into<String>,
        equipment_type: impl Into<String>,
        flowrate: f64,
        pressure: f64,
        temperature: f64,
    ) -> Self {
        Self {
            name: name.into(),
            equipment_type: equipment_type.into(),
            flowrate,
            pressure,
            temperature,
        }
    }
}

impl Default for EquipmentRecord {
    fn default() -> Self {
        Self::new(UNKNOWN_LABEL, UNKNOWN_LABEL, 0.0, 0.0, 0.0)
    }
}

/// Dataset-level means, computed once at ingestion time
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Averages {
    pub flowrate: f64,
    pub pressure: f64,
    pub temperature: f64,
}

/// One uploaded CSV worth of equipment records, owned by a single user.
///
/// The averages are cached at ingestion and never recomputed on read. For an
/// empty dataset they hold `0.0` placeholders; callers must check
/// [`Dataset::is_empty`] before treating them as statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub id: DatasetId,
    pub user_id: String,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
    /// Insertion order assigned by the repository; breaks `uploaded_at` ties
    pub sequence: i64,
    pub total_count: usize,
    pub avg_flowrate: f64,
    pub avg_pressure: f64,
    pub avg_temperature: f64,
}

impl Dataset {
    /// Create a dataset stamped with the current time and a fresh id
    pub fn new(
        user_id: impl Into<String>,
        filename: impl Into<String>,
        total_count: usize,
        averages: Averages,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            filename: filename.into(),
            uploaded_at: Utc::now(),
            sequence: 0,
            total_count,
            avg_flowrate: averages.flowrate,
            avg_pressure: averages.pressure,
            avg_temperature: averages.temperature,
        }
    }

    /// Override the upload timestamp (imports, fixtures)
    pub fn with_uploaded_at(mut self, uploaded_at: DateTime<Utc>) -> Self {
        self.uploaded_at = uploaded_at;
        self
    }

    pub fn averages(&self) -> Averages {
        Averages {
            flowrate: self.avg_flowrate,
            pressure: self.avg_pressure,
            temperature: self.avg_temperature,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }

    /// Check that a loaded record set matches the count stored at ingestion
    pub fn ensure_record_count(&self, actual: usize) -> Result<()> {
        if self.total_count != actual {
            return Err(EqlensError::RecordCountMismatch {
                dataset_id: self.id.to_string(),
                declared: self.total_count,
                actual,
            });
        }
        Ok(())
    }

    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            id: self.id,
            filename: self.filename.clone(),
            uploaded_at: self.uploaded_at,
            total_count: self.total_count,
        }
    }
}

/// Lightweight listing view of a dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub id: DatasetId,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
    pub total_count: usize,
}

/// Parse a dataset id received from an external surface
pub fn parse_dataset_id(raw: &str) -> Result<DatasetId> {
    Uuid::parse_str(raw.trim()).map_err(|_| EqlensError::InvalidDatasetId(raw.to_string()))
}
