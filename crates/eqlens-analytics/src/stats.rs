//! Dataset statistics
//!
//! Pure functions over record slices. The dataset-level means computed here
//! are cached on the [`Dataset`](eqlens_common::Dataset) at ingestion and
//! never recomputed on read.

use std::collections::HashMap;

use eqlens_common::{Averages, EquipmentRecord};
use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, Result};

/// Mean, median, population standard deviation and range of one column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DescriptiveStats {
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl DescriptiveStats {
    /// Summarise a column, `None` when it is empty
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let mean = mean(values);
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };

        Some(Self {
            mean,
            median,
            std_dev: variance.sqrt(),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
        })
    }
}

/// Summary statistics for a whole dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetStats {
    pub total_count: usize,
    pub avg_flowrate: f64,
    pub avg_pressure: f64,
    pub avg_temperature: f64,
    pub flowrate: DescriptiveStats,
}

impl DatasetStats {
    pub fn averages(&self) -> Averages {
        Averages {
            flowrate: self.avg_flowrate,
            pressure: self.avg_pressure,
            temperature: self.avg_temperature,
        }
    }
}

/// Compute dataset statistics.
///
/// # Errors
///
/// Returns [`AnalyticsError::EmptyDataset`] when `records` is empty; a mean
/// over zero records is undefined rather than zero.
pub fn aggregate(records: &[EquipmentRecord]) -> Result<DatasetStats> {
    let flowrates: Vec<f64> = records.iter().map(|r| r.flowrate).collect();
    let flowrate = DescriptiveStats::from_values(&flowrates).ok_or(AnalyticsError::EmptyDataset)?;

    let pressures: Vec<f64> = records.iter().map(|r| r.pressure).collect();
    let temperatures: Vec<f64> = records.iter().map(|r| r.temperature).collect();

    Ok(DatasetStats {
        total_count: records.len(),
        avg_flowrate: flowrate.mean,
        avg_pressure: mean(&pressures),
        avg_temperature: mean(&temperatures),
        flowrate,
    })
}

/// Records of one equipment type, columns split out for charting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeStats {
    pub equipment_type: String,
    pub names: Vec<String>,
    pub flowrates: Vec<f64>,
    pub pressures: Vec<f64>,
    pub temperatures: Vec<f64>,
}

impl TypeStats {
    fn new(equipment_type: &str) -> Self {
        Self {
            equipment_type: equipment_type.to_string(),
            names: Vec::new(),
            flowrates: Vec::new(),
            pressures: Vec::new(),
            temperatures: Vec::new(),
        }
    }

    pub fn count(&self) -> usize {
        self.names.len()
    }

    pub fn mean_flowrate(&self) -> f64 {
        mean(&self.flowrates)
    }

    pub fn mean_pressure(&self) -> f64 {
        mean(&self.pressures)
    }

    pub fn mean_temperature(&self) -> f64 {
        mean(&self.temperatures)
    }
}

/// Partition records by exact `equipment_type`, in first-appearance order
pub fn per_type_stats(records: &[EquipmentRecord]) -> Vec<TypeStats> {
    let mut groups: Vec<TypeStats> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let slot = *index.entry(record.equipment_type.as_str()).or_insert_with(|| {
            groups.push(TypeStats::new(&record.equipment_type));
            groups.len() - 1
        });
        let group = &mut groups[slot];
        group.names.push(record.name.clone());
        group.flowrates.push(record.flowrate);
        group.pressures.push(record.pressure);
        group.temperatures.push(record.temperature);
    }

    groups
}

/// Arithmetic mean; zero for an empty slice
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let sum = values.iter().sum::<f64>();
    if sum.is_finite() {
        sum / n
    } else {
        // finite values whose sum overflows
        values.iter().map(|v| v / n).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_mean_of_values_near_f64_max() {
        assert_eq!(mean(&[f64::MAX, f64::MAX]), f64::MAX);
        assert_eq!(mean(&[-1e308, 1e308]), 0.0);
    }

    fn record(name: &str, kind: &str, flowrate: f64, pressure: f64, temperature: f64) -> EquipmentRecord {
        EquipmentRecord::new(name, kind, flowrate, pressure, temperature)
    }

    fn sample() -> Vec<EquipmentRecord> {
        vec![
            record("P1", "Pump", 10.0, 5.0, 40.0),
            record("V1", "Valve", 20.0, 3.0, 30.0),
            record("P2", "Pump", 30.0, 7.0, 50.0),
            record("H1", "Heater", 40.0, 1.0, 120.0),
        ]
    }

    #[test]
    fn test_aggregate_means() {
        let stats = aggregate(&sample()).unwrap();
        assert_eq!(stats.total_count, 4);
        assert!((stats.avg_flowrate - 25.0).abs() < 1e-9);
        assert!((stats.avg_pressure - 4.0).abs() < 1e-9);
        assert!((stats.avg_temperature - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_aggregate_flowrate_spread() {
        let stats = aggregate(&sample()).unwrap();
        assert_eq!(stats.flowrate.median, 25.0);
        assert_eq!(stats.flowrate.min, 10.0);
        assert_eq!(stats.flowrate.max, 40.0);
        // population variance of 10,20,30,40 is 125
        assert!((stats.flowrate.std_dev - 125f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_aggregate_empty_fails() {
        assert_eq!(aggregate(&[]), Err(AnalyticsError::EmptyDataset));
    }

    #[test]
    fn test_median_odd_count() {
        let stats = DescriptiveStats::from_values(&[9.0, 1.0, 5.0]).unwrap();
        assert_eq!(stats.median, 5.0);
        assert_eq!(stats.std_dev, (32.0f64 / 3.0).sqrt());
    }

    #[test]
    fn test_single_record_has_zero_spread() {
        let stats = aggregate(&[record("P1", "Pump", 7.5, 1.0, 2.0)]).unwrap();
        assert_eq!(stats.flowrate.std_dev, 0.0);
        assert_eq!(stats.flowrate.median, 7.5);
        assert_eq!(stats.averages().pressure, 1.0);
    }

    #[test]
    fn test_per_type_first_appearance_order() {
        let groups = per_type_stats(&sample());
        let types: Vec<&str> = groups.iter().map(|g| g.equipment_type.as_str()).collect();
        assert_eq!(types, vec!["Pump", "Valve", "Heater"]);

        let pumps = &groups[0];
        assert_eq!(pumps.names, vec!["P1", "P2"]);
        assert_eq!(pumps.count(), 2);
        assert_eq!(pumps.mean_flowrate(), 20.0);
        assert_eq!(pumps.mean_pressure(), 6.0);
        assert_eq!(pumps.mean_temperature(), 45.0);
    }

    #[test]
    fn test_per_type_is_case_sensitive() {
        let records = vec![record("a", "pump", 1.0, 1.0, 1.0), record("b", "Pump", 1.0, 1.0, 1.0)];
        assert_eq!(per_type_stats(&records).len(), 2);
    }

    proptest! {
        #[test]
        fn prop_mean_matches_sum_over_count(values in prop::collection::vec(-1.0e6f64..1.0e6, 1..64)) {
            let records: Vec<EquipmentRecord> = values
                .iter()
                .map(|v| record("x", "T", *v, 0.0, 0.0))
                .collect();
            let stats = aggregate(&records).unwrap();
            let expected = values.iter().sum::<f64>() / values.len() as f64;
            prop_assert!((stats.avg_flowrate - expected).abs() <= 1e-6 * (1.0 + expected.abs()));
            prop_assert!(stats.flowrate.min <= stats.flowrate.median);
            prop_assert!(stats.flowrate.median <= stats.flowrate.max);
        }
    }
}
