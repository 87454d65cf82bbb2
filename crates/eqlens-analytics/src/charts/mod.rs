//! Chart specifications
//!
//! A [`ChartSet`] describes the four dashboard charts as plain data. The
//! report renderer rasterises it, the HTTP API serves it as JSON for
//! interactive viewers. Each chart is independent: a degenerate input turns
//! that one chart into a [`Chart::Placeholder`] and leaves the others alone.

pub mod color;

use eqlens_common::EquipmentRecord;
use serde::Serialize;

use crate::distribution::DistributionEntry;
use crate::stats::{mean, per_type_stats};

pub use color::Rgb;

/// Number of equal-width temperature bins
pub const HISTOGRAM_BINS: usize = 8;

pub const NO_DATA_MESSAGE: &str = "No data to show";
pub const NO_VARIATION_MESSAGE: &str = "Not enough temperature variation";

/// A chart ready to draw, or the message to show in its place
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "chart", rename_all = "snake_case")]
pub enum Chart<T> {
    Ready(T),
    Placeholder { message: String },
}

impl<T> Chart<T> {
    pub fn placeholder(message: impl Into<String>) -> Self {
        Chart::Placeholder {
            message: message.into(),
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Chart::Ready(spec) => Some(spec),
            Chart::Placeholder { .. } => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Chart::Placeholder { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub count: usize,
    pub percentage: f64,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChart {
    pub title: String,
    pub slices: Vec<PieSlice>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub label: String,
    pub color: Rgb,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedBarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub categories: Vec<String>,
    pub series: Vec<BarSeries>,
}

impl GroupedBarChart {
    /// Smallest and largest value across all series
    pub fn value_range(&self) -> (f64, f64) {
        self.series
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .fold((0.0, 0.0), |(lo, hi), v| (lo.min(v), hi.max(v)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub name: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterSeries {
    pub label: String,
    pub color: Rgb,
    pub points: Vec<ScatterPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<ScatterSeries>,
}

impl ScatterChart {
    pub fn points(&self) -> impl Iterator<Item = &ScatterPoint> {
        self.series.iter().flat_map(|s| s.points.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
    pub equipment_names: Vec<String>,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bins: Vec<HistogramBin>,
    /// Mean temperature, drawn as a vertical marker
    pub average: Option<f64>,
}

/// The four dashboard charts for one dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSet {
    pub type_distribution: Chart<PieChart>,
    pub type_averages: Chart<GroupedBarChart>,
    pub flowrate_pressure: Chart<ScatterChart>,
    pub temperature_histogram: Chart<HistogramChart>,
}

/// Build every dashboard chart for a dataset.
///
/// `distribution` must come from [`crate::distribution::distribution`] over
/// the same records; the pie keeps its ranking.
pub fn compose_charts(records: &[EquipmentRecord], distribution: &[DistributionEntry]) -> ChartSet {
    if records.is_empty() {
        return ChartSet {
            type_distribution: Chart::placeholder(NO_DATA_MESSAGE),
            type_averages: Chart::placeholder(NO_DATA_MESSAGE),
            flowrate_pressure: Chart::placeholder(NO_DATA_MESSAGE),
            temperature_histogram: Chart::placeholder(NO_DATA_MESSAGE),
        };
    }

    ChartSet {
        type_distribution: type_pie(distribution),
        type_averages: type_averages(records),
        flowrate_pressure: flowrate_pressure(records),
        temperature_histogram: temperature_histogram(records),
    }
}

fn type_pie(distribution: &[DistributionEntry]) -> Chart<PieChart> {
    let total: usize = distribution.iter().map(|e| e.count).sum();
    if total == 0 {
        return Chart::placeholder(NO_DATA_MESSAGE);
    }

    let slices = distribution
        .iter()
        .enumerate()
        .map(|(i, entry)| PieSlice {
            label: entry.equipment_type.clone(),
            count: entry.count,
            percentage: entry.count as f64 * 100.0 / total as f64,
            color: color::slice_color(i),
        })
        .collect();

    Chart::Ready(PieChart {
        title: "Equipment Type Distribution".to_string(),
        slices,
    })
}

fn type_averages(records: &[EquipmentRecord]) -> Chart<GroupedBarChart> {
    let groups = per_type_stats(records);

    Chart::Ready(GroupedBarChart {
        title: "Average Parameters by Type".to_string(),
        x_label: "Equipment Type".to_string(),
        y_label: "Average Value".to_string(),
        categories: groups.iter().map(|g| g.equipment_type.clone()).collect(),
        series: vec![
            BarSeries {
                label: "Flowrate".to_string(),
                color: color::FLOWRATE,
                values: groups.iter().map(|g| g.mean_flowrate()).collect(),
            },
            BarSeries {
                label: "Pressure".to_string(),
                color: color::PRESSURE,
                values: groups.iter().map(|g| g.mean_pressure()).collect(),
            },
            BarSeries {
                label: "Temperature".to_string(),
                color: color::TEMPERATURE,
                values: groups.iter().map(|g| g.mean_temperature()).collect(),
            },
        ],
    })
}

fn flowrate_pressure(records: &[EquipmentRecord]) -> Chart<ScatterChart> {
    let series = per_type_stats(records)
        .into_iter()
        .enumerate()
        .map(|(i, group)| {
            let mut points: Vec<ScatterPoint> = group
                .names
                .into_iter()
                .zip(group.flowrates.iter().zip(group.pressures.iter()))
                .map(|(name, (x, y))| ScatterPoint { name, x: *x, y: *y })
                .collect();
            points.sort_by(|a, b| a.x.total_cmp(&b.x));

            ScatterSeries {
                label: group.equipment_type,
                color: color::series_color(i),
                points,
            }
        })
        .collect();

    Chart::Ready(ScatterChart {
        title: "Flowrate vs Pressure".to_string(),
        x_label: "Flowrate".to_string(),
        y_label: "Pressure".to_string(),
        series,
    })
}

fn temperature_histogram(records: &[EquipmentRecord]) -> Chart<HistogramChart> {
    let temperatures: Vec<f64> = records.iter().map(|r| r.temperature).collect();
    let Some(min) = temperatures.iter().copied().reduce(f64::min) else {
        return Chart::placeholder(NO_DATA_MESSAGE);
    };
    let max = temperatures.iter().copied().fold(min, f64::max);

    if min == max {
        return Chart::placeholder(NO_VARIATION_MESSAGE);
    }

    // edges are computed from pre-divided bounds so a range wider than
    // f64::MAX still yields finite bins
    let n = HISTOGRAM_BINS as f64;
    let step = max / n - min / n;
    let mut bins: Vec<HistogramBin> = (0..HISTOGRAM_BINS)
        .map(|i| {
            let lower = min + step * i as f64;
            let upper = if i + 1 == HISTOGRAM_BINS {
                max
            } else {
                min + step * (i + 1) as f64
            };
            HistogramBin {
                lower,
                upper,
                count: 0,
                equipment_names: Vec::new(),
                color: color::gradient(color::normalize(lower, min, max)),
            }
        })
        .collect();

    for record in records {
        let fraction = (record.temperature / n - min / n) / step;
        // the last bin is closed on both ends
        let slot = ((fraction * n).floor() as usize).min(HISTOGRAM_BINS - 1);
        bins[slot].count += 1;
        bins[slot].equipment_names.push(record.name.clone());
    }

    Chart::Ready(HistogramChart {
        title: "Temperature Distribution".to_string(),
        x_label: "Temperature".to_string(),
        y_label: "Count".to_string(),
        bins,
        average: Some(mean(&temperatures)),
    })
}

/// Per-equipment grouped bar of raw flowrate, pressure and temperature,
/// one category per record in source order
pub fn equipment_bar(records: &[EquipmentRecord]) -> Chart<GroupedBarChart> {
    if records.is_empty() {
        return Chart::placeholder(NO_DATA_MESSAGE);
    }

    Chart::Ready(GroupedBarChart {
        title: "Equipment Parameters".to_string(),
        x_label: "Equipment".to_string(),
        y_label: "Value".to_string(),
        categories: records.iter().map(|r| r.name.clone()).collect(),
        series: vec![
            BarSeries {
                label: "Flowrate".to_string(),
                color: color::FLOWRATE,
                values: records.iter().map(|r| r.flowrate).collect(),
            },
            BarSeries {
                label: "Pressure".to_string(),
                color: color::PRESSURE,
                values: records.iter().map(|r| r.pressure).collect(),
            },
            BarSeries {
                label: "Temperature".to_string(),
                color: color::TEMPERATURE,
                values: records.iter().map(|r| r.temperature).collect(),
            },
        ],
    })
}
