use chrono::{DateTime, Utc};
use eqlens_common::{Dataset, DatasetId};
use serde::{Deserialize, Serialize};

/// Dataset metadata as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetResponse {
    pub id: DatasetId,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
    pub total_count: usize,
    /// `None` for an empty dataset, whose stored averages are placeholders
    pub avg_flowrate: Option<f64>,
    pub avg_pressure: Option<f64>,
    pub avg_temperature: Option<f64>,
}

impl From<&Dataset> for DatasetResponse {
    fn from(dataset: &Dataset) -> Self {
        let cached = |value: f64| (!dataset.is_empty()).then_some(value);
        Self {
            id: dataset.id,
            filename: dataset.filename.clone(),
            uploaded_at: dataset.uploaded_at,
            total_count: dataset.total_count,
            avg_flowrate: cached(dataset.avg_flowrate),
            avg_pressure: cached(dataset.avg_pressure),
            avg_temperature: cached(dataset.avg_temperature),
        }
    }
}
