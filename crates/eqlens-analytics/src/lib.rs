//! eqlens analytics
//!
//! Pure computations over parsed equipment records: summary statistics, the
//! type distribution, per-user retention, chart specifications and the PDF
//! report. Nothing in this crate performs I/O; callers hand in records
//! loaded from wherever they live.
//!
//! # Example
//!
//! ```
//! use eqlens_analytics::{aggregate, distribution};
//! use eqlens_common::EquipmentRecord;
//!
//! let records = vec![
//!     EquipmentRecord::new("P-101", "Pump", 120.0, 4.5, 60.0),
//!     EquipmentRecord::new("V-201", "Valve", 80.0, 3.0, 40.0),
//! ];
//! let stats = aggregate(&records).unwrap();
//! assert_eq!(stats.avg_flowrate, 100.0);
//! assert_eq!(distribution(&records).len(), 2);
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod charts;
pub mod distribution;
pub mod error;
pub mod render;
pub mod report;
pub mod retention;
pub mod stats;

pub use charts::{compose_charts, equipment_bar, Chart, ChartSet};
pub use distribution::{distribution, DistributionEntry, DistributionPayload};
pub use error::{AnalyticsError, ReportError};
pub use render::{render_grid, RenderError, RenderedGrid};
pub use report::{render_report, summary_lines};
pub use retention::{retain, RetentionCandidate, RETENTION_CAP};
pub use stats::{aggregate, per_type_stats, DatasetStats, DescriptiveStats, TypeStats};
