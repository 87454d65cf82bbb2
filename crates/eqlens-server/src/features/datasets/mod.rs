//! Uploaded equipment datasets and everything derived from them

pub mod commands;
pub mod queries;
pub mod routes;
pub mod types;

pub use commands::{
    DeleteDatasetCommand, DeleteDatasetError, DeleteDatasetResponse, UploadDatasetCommand,
    UploadDatasetError, UploadDatasetResponse,
};

pub use queries::{
    GenerateReportError, GenerateReportQuery, GetChartsError, GetChartsQuery, GetDatasetError,
    GetDatasetQuery, GetDatasetResponse, GetDistributionError, GetDistributionQuery,
    GetEquipmentChartError, GetEquipmentChartQuery, GetRawDataError, GetRawDataQuery,
    ListDatasetsError, ListDatasetsQuery, ListDatasetsResponse, RawDataResponse, ReportDocument,
};

pub use routes::datasets_routes;
pub use types::DatasetResponse;
