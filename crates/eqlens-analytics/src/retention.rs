//! Per-user dataset retention
//!
//! Each user keeps at most [`RETENTION_CAP`] datasets. After an insert the
//! whole set, including the new dataset, is ordered newest first and
//! everything past the cap is evicted. Eviction is a hard delete.

use chrono::{DateTime, Utc};
use eqlens_common::{Dataset, DatasetId};

/// Default number of datasets kept per user
pub const RETENTION_CAP: usize = 5;

/// The fields retention ordering looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionCandidate {
    pub id: DatasetId,
    pub uploaded_at: DateTime<Utc>,
    pub sequence: i64,
}

impl From<&Dataset> for RetentionCandidate {
    fn from(dataset: &Dataset) -> Self {
        Self {
            id: dataset.id,
            uploaded_at: dataset.uploaded_at,
            sequence: dataset.sequence,
        }
    }
}

/// Ids to evict after inserting `new` into a user's `existing` datasets.
///
/// Ordering is `uploaded_at` descending, then `sequence` descending, so two
/// uploads stamped with the same instant still resolve deterministically.
/// `existing` may or may not already contain `new`.
pub fn retain(
    existing: &[RetentionCandidate],
    new: RetentionCandidate,
    cap: usize,
) -> Vec<DatasetId> {
    let mut all: Vec<RetentionCandidate> = existing.iter().copied().filter(|c| c.id != new.id).collect();
    all.push(new);

    all.sort_by(|a, b| {
        b.uploaded_at
            .cmp(&a.uploaded_at)
            .then_with(|| b.sequence.cmp(&a.sequence))
            .then_with(|| b.id.cmp(&a.id))
    });

    let evicted: Vec<DatasetId> = all.into_iter().skip(cap).map(|c| c.id).collect();
    if !evicted.is_empty() {
        tracing::debug!(cap, evicted = evicted.len(), "Retention cap exceeded");
    }
    evicted
}
