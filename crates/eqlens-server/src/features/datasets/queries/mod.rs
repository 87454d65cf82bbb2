pub mod charts;
pub mod distribution;
pub mod equipment_chart;
pub mod get;
pub mod list;
pub mod raw;
pub mod report;

pub use charts::{GetChartsError, GetChartsQuery};
pub use distribution::{GetDistributionError, GetDistributionQuery};
pub use equipment_chart::{GetEquipmentChartError, GetEquipmentChartQuery};
pub use get::{GetDatasetError, GetDatasetQuery, GetDatasetResponse};
pub use list::{ListDatasetsError, ListDatasetsQuery, ListDatasetsResponse};
pub use raw::{GetRawDataError, GetRawDataQuery, RawDataResponse};
pub use report::{GenerateReportError, GenerateReportQuery, ReportDocument};
