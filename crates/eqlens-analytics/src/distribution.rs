//! Equipment type distribution

use std::collections::HashMap;

use eqlens_common::{DatasetId, EquipmentRecord};
use serde::{Deserialize, Serialize};

/// Count and member names of one equipment type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionEntry {
    pub equipment_type: String,
    pub count: usize,
    pub equipment_names: Vec<String>,
}

/// Distribution as exposed at the HTTP and CLI boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionPayload {
    pub dataset_id: DatasetId,
    pub distribution: Vec<DistributionEntry>,
}

impl DistributionPayload {
    pub fn new(dataset_id: DatasetId, records: &[EquipmentRecord]) -> Self {
        Self {
            dataset_id,
            distribution: distribution(records),
        }
    }
}

/// Group records by type and rank by descending count.
///
/// Ties keep first-appearance order and names keep source order. The counts
/// always sum to `records.len()`.
pub fn distribution(records: &[EquipmentRecord]) -> Vec<DistributionEntry> {
    let mut entries: Vec<DistributionEntry> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let slot = *index.entry(record.equipment_type.as_str()).or_insert_with(|| {
            entries.push(DistributionEntry {
                equipment_type: record.equipment_type.clone(),
                count: 0,
                equipment_names: Vec::new(),
            });
            entries.len() - 1
        });
        let entry = &mut entries[slot];
        entry.count += 1;
        entry.equipment_names.push(record.name.clone());
    }

    // stable: equal counts stay in first-appearance order
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn records(rows: &[(&str, &str)]) -> Vec<EquipmentRecord> {
        rows.iter()
            .map(|(name, kind)| EquipmentRecord::new(*name, *kind, 1.0, 1.0, 1.0))
            .collect()
    }

    #[test]
    fn test_ranked_by_count() {
        let result = distribution(&records(&[
            ("V1", "Valve"),
            ("P1", "Pump"),
            ("P2", "Pump"),
            ("H1", "Heater"),
            ("P3", "Pump"),
        ]));

        assert_eq!(result[0].equipment_type, "Pump");
        assert_eq!(result[0].count, 3);
        assert_eq!(result[0].equipment_names, vec!["P1", "P2", "P3"]);
        // Valve and Heater tie; Valve appeared first
        assert_eq!(result[1].equipment_type, "Valve");
        assert_eq!(result[2].equipment_type, "Heater");
    }

    #[test]
    fn test_empty_input() {
        assert!(distribution(&[]).is_empty());
    }

    #[test]
    fn test_payload_shape() {
        let id = uuid::Uuid::new_v4();
        let payload = DistributionPayload::new(id, &records(&[("P1", "Pump")]));
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["dataset_id"], id.to_string());
        assert_eq!(json["distribution"][0]["equipment_type"], "Pump");
        assert_eq!(json["distribution"][0]["count"], 1);
        assert_eq!(json["distribution"][0]["equipment_names"][0], "P1");
    }

    proptest! {
        #[test]
        fn prop_distribution_partitions_records(kinds in prop::collection::vec(0u8..5, 0..80)) {
            let input: Vec<EquipmentRecord> = kinds
                .iter()
                .enumerate()
                .map(|(i, k)| EquipmentRecord::new(format!("E{i}"), format!("T{k}"), 0.0, 0.0, 0.0))
                .collect();
            let result = distribution(&input);

            let total: usize = result.iter().map(|e| e.count).sum();
            prop_assert_eq!(total, input.len());
            for entry in &result {
                prop_assert_eq!(entry.count, entry.equipment_names.len());
            }
            for pair in result.windows(2) {
                prop_assert!(pair[0].count >= pair[1].count);
            }
        }
    }
}
