//! Dataset API routes
//!
//! # Route Structure
//!
//! - `POST /api/v1/datasets` - Upload a CSV (multipart field `file`)
//! - `GET /api/v1/datasets` - List the caller's datasets, newest first
//! - `GET /api/v1/datasets/:id` - Dataset metadata with its records
//! - `DELETE /api/v1/datasets/:id` - Delete a dataset
//! - `GET /api/v1/datasets/:id/type-distribution` - Records per equipment type
//! - `GET /api/v1/datasets/:id/raw` - Records as column arrays
//! - `GET /api/v1/datasets/:id/charts` - Dashboard chart specifications
//! - `GET /api/v1/datasets/:id/charts/equipment` - Per-equipment bar chart
//! - `GET /api/v1/datasets/:id/report` - PDF report download
//!
//! Every route requires the `x-user-id` header. A dataset that belongs to
//! another user answers exactly like one that does not exist.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection}, Multipart, Path, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use crate::api::response::{ApiResponse, ErrorResponse};
use crate::features::shared::UserId;
use crate::features::FeatureState;

use super::{
    commands::{
        upload::clean_filename, DeleteDatasetCommand, DeleteDatasetError, UploadDatasetCommand,
        UploadDatasetError,
    },
    queries::{
        GenerateReportError, GenerateReportQuery, GetChartsError, GetChartsQuery,
        GetDatasetError, GetDatasetQuery, GetDistributionError, GetDistributionQuery,
        GetEquipmentChartError, GetEquipmentChartQuery, GetRawDataError, GetRawDataQuery,
        ListDatasetsError, ListDatasetsQuery,
    },
};

/// Multipart field holding the CSV
pub const FILE_FIELD: &str = "file";

// ============================================================================
// Router Configuration
// ============================================================================

pub fn datasets_routes() -> Router<FeatureState> {
    Router::new()
        .route("/", post(upload_dataset).get(list_datasets))
        .route("/:id", get(get_dataset).delete(delete_dataset))
        .route("/:id/type-distribution", get(get_distribution))
        .route("/:id/raw", get(get_raw_data))
        .route("/:id/charts", get(get_charts))
        .route("/:id/charts/equipment", get(get_equipment_chart))
        .route("/:id/report", get(download_report))
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

/// Upload a CSV as a new dataset
///
/// # Response
///
/// - `201 Created` - Dataset stored; body carries coercion warnings and the
///   ids evicted by the retention cap
/// - `400 Bad Request` - Not a multipart body, missing `file` field or
///   unreadable CSV
/// - `413 Payload Too Large` - Body exceeds the upload limit
#[tracing::instrument(skip(state, multipart), fields(user_id = %user))]
async fn upload_dataset(
    State(state): State<FeatureState>,
    user: UserId,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, DatasetApiError> {
    let mut multipart = multipart?;
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = clean_filename(field.file_name());
        let data = field.bytes().await?;
        upload = Some((filename, data.to_vec()));
    }

    let (filename, content) = upload.ok_or(DatasetApiError::MissingFile)?;

    let command = UploadDatasetCommand {
        user_id: user.into_inner(),
        filename,
        content,
        retention_cap: state.retention_cap,
    };

    let response = super::commands::upload::handle(state.repo, command).await?;

    tracing::info!(
        dataset_id = %response.dataset.id,
        records = response.dataset.total_count,
        warnings = response.warning_count,
        "Dataset uploaded via API"
    );

    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state), fields(user_id = %user))]
async fn delete_dataset(
    State(state): State<FeatureState>,
    user: UserId,
    Path(id): Path<String>,
) -> Result<Response, DatasetApiError> {
    let command = DeleteDatasetCommand {
        user_id: user.into_inner(),
        id,
    };

    let response = super::commands::delete::handle(state.repo, command).await?;

    tracing::info!(dataset_id = %response.id, "Dataset deleted via API");

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

#[tracing::instrument(skip(state), fields(user_id = %user))]
async fn list_datasets(
    State(state): State<FeatureState>,
    user: UserId,
) -> Result<Response, DatasetApiError> {
    let query = ListDatasetsQuery {
        user_id: user.into_inner(),
    };

    let response = super::queries::list::handle(state.repo, query).await?;

    let meta = json!({ "total": response.total });

    Ok((StatusCode::OK, Json(ApiResponse::success_with_meta(response.items, meta))).into_response())
}

#[tracing::instrument(skip(state), fields(user_id = %user))]
async fn get_dataset(
    State(state): State<FeatureState>,
    user: UserId,
    Path(id): Path<String>,
) -> Result<Response, DatasetApiError> {
    let query = GetDatasetQuery {
        user_id: user.into_inner(),
        id,
    };

    let response = super::queries::get::handle(state.repo, query).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state), fields(user_id = %user))]
async fn get_distribution(
    State(state): State<FeatureState>,
    user: UserId,
    Path(id): Path<String>,
) -> Result<Response, DatasetApiError> {
    let query = GetDistributionQuery {
        user_id: user.into_inner(),
        id,
    };

    let response = super::queries::distribution::handle(state.repo, query).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state), fields(user_id = %user))]
async fn get_raw_data(
    State(state): State<FeatureState>,
    user: UserId,
    Path(id): Path<String>,
) -> Result<Response, DatasetApiError> {
    let query = GetRawDataQuery {
        user_id: user.into_inner(),
        id,
    };

    let response = super::queries::raw::handle(state.repo, query).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state), fields(user_id = %user))]
async fn get_charts(
    State(state): State<FeatureState>,
    user: UserId,
    Path(id): Path<String>,
) -> Result<Response, DatasetApiError> {
    let query = GetChartsQuery {
        user_id: user.into_inner(),
        id,
    };

    let response = super::queries::charts::handle(state.repo, query).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[tracing::instrument(skip(state), fields(user_id = %user))]
async fn get_equipment_chart(
    State(state): State<FeatureState>,
    user: UserId,
    Path(id): Path<String>,
) -> Result<Response, DatasetApiError> {
    let query = GetEquipmentChartQuery {
        user_id: user.into_inner(),
        id,
    };

    let response = super::queries::equipment_chart::handle(state.repo, query).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

/// Download the PDF report
///
/// # Response
///
/// - `200 OK` - `application/pdf` attachment named `report_{id}.pdf`
/// - `404 Not Found` - Unknown dataset
/// - `422 Unprocessable Entity` - Dataset has no records
/// - `500 Internal Server Error` - Rendering failed
#[tracing::instrument(skip(state), fields(user_id = %user))]
async fn download_report(
    State(state): State<FeatureState>,
    user: UserId,
    Path(id): Path<String>,
) -> Result<Response, DatasetApiError> {
    let query = GenerateReportQuery {
        user_id: user.into_inner(),
        id,
    };

    let document = super::queries::report::handle(state.repo, query).await?;
    let disposition = format!("attachment; filename=\"{}\"", document.filename);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document.bytes,
    )
        .into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Unified error type for dataset API endpoints
#[derive(Debug)]
enum DatasetApiError {
    Multipart { status: StatusCode, message: String },
    MissingFile,
    UploadError(UploadDatasetError),
    DeleteError(DeleteDatasetError),
    ListError(ListDatasetsError),
    GetError(GetDatasetError),
    DistributionError(GetDistributionError),
    RawError(GetRawDataError),
    ChartsError(GetChartsError),
    EquipmentChartError(GetEquipmentChartError),
    ReportError(GenerateReportError),
}

impl From<MultipartRejection> for DatasetApiError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::Multipart {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<MultipartError> for DatasetApiError {
    fn from(err: MultipartError) -> Self {
        Self::Multipart {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

macro_rules! from_feature_error {
    ($($error:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$error> for DatasetApiError {
                fn from(err: $error) -> Self {
                    Self::$variant(err)
                }
            }
        )*
    };
}

from_feature_error! {
    UploadDatasetError => UploadError,
    DeleteDatasetError => DeleteError,
    ListDatasetsError => ListError,
    GetDatasetError => GetError,
    GetDistributionError => DistributionError,
    GetRawDataError => RawError,
    GetChartsError => ChartsError,
    GetEquipmentChartError => EquipmentChartError,
    GenerateReportError => ReportError,
}

fn not_found(message: String) -> Response {
    ErrorResponse::new("NOT_FOUND", message).into_response_with(StatusCode::NOT_FOUND)
}

fn storage_failure(error: &dyn std::fmt::Display) -> Response {
    tracing::error!("Repository error in dataset API: {}", error);
    ErrorResponse::new("INTERNAL_ERROR", "A storage error occurred")
        .into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
}

impl IntoResponse for DatasetApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            DatasetApiError::Multipart { status, .. } if status == StatusCode::PAYLOAD_TOO_LARGE => {
                ErrorResponse::new("PAYLOAD_TOO_LARGE", message).into_response_with(status)
            },
            DatasetApiError::Multipart { .. }
            | DatasetApiError::MissingFile
            | DatasetApiError::UploadError(UploadDatasetError::FilenameLength)
            | DatasetApiError::UploadError(UploadDatasetError::InvalidRetentionCap) => {
                ErrorResponse::new("VALIDATION_ERROR", message).into_response_with(StatusCode::BAD_REQUEST)
            },
            DatasetApiError::UploadError(UploadDatasetError::Malformed(_)) => {
                ErrorResponse::new("MALFORMED_INPUT", message).into_response_with(StatusCode::BAD_REQUEST)
            },
            DatasetApiError::UploadError(UploadDatasetError::Task(_)) => {
                tracing::error!("Upload parsing task failed: {}", message);
                ErrorResponse::new("INTERNAL_ERROR", "An internal error occurred")
                    .into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
            },

            DatasetApiError::DeleteError(DeleteDatasetError::NotFound(_))
            | DatasetApiError::GetError(GetDatasetError::NotFound(_))
            | DatasetApiError::DistributionError(GetDistributionError::NotFound(_))
            | DatasetApiError::RawError(GetRawDataError::NotFound(_))
            | DatasetApiError::ChartsError(GetChartsError::NotFound(_))
            | DatasetApiError::EquipmentChartError(GetEquipmentChartError::NotFound(_))
            | DatasetApiError::ReportError(GenerateReportError::NotFound(_)) => not_found(message),

            DatasetApiError::ReportError(GenerateReportError::NoEquipmentData) => {
                ErrorResponse::new("NO_EQUIPMENT_DATA", message)
                    .into_response_with(StatusCode::UNPROCESSABLE_ENTITY)
            },
            DatasetApiError::ReportError(GenerateReportError::Render(_))
            | DatasetApiError::ReportError(GenerateReportError::Task(_)) => {
                tracing::error!("Report generation failed: {}", message);
                ErrorResponse::new("RENDER_ERROR", "The report could not be generated")
                    .into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
            },

            DatasetApiError::UploadError(UploadDatasetError::Repository(e))
            | DatasetApiError::DeleteError(DeleteDatasetError::Repository(e))
            | DatasetApiError::ListError(ListDatasetsError::Repository(e))
            | DatasetApiError::GetError(GetDatasetError::Repository(e))
            | DatasetApiError::DistributionError(GetDistributionError::Repository(e))
            | DatasetApiError::RawError(GetRawDataError::Repository(e))
            | DatasetApiError::ChartsError(GetChartsError::Repository(e))
            | DatasetApiError::EquipmentChartError(GetEquipmentChartError::Repository(e))
            | DatasetApiError::ReportError(GenerateReportError::Repository(e)) => storage_failure(&e),
        }
    }
}

impl std::fmt::Display for DatasetApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Multipart { message, .. } => write!(f, "Invalid multipart body: {}", message),
            Self::MissingFile => write!(f, "Multipart field '{}' is required", FILE_FIELD),
            Self::UploadError(e) => write!(f, "{}", e),
            Self::DeleteError(e) => write!(f, "{}", e),
            Self::ListError(e) => write!(f, "{}", e),
            Self::GetError(e) => write!(f, "{}", e),
            Self::DistributionError(e) => write!(f, "{}", e),
            Self::RawError(e) => write!(f, "{}", e),
            Self::ChartsError(e) => write!(f, "{}", e),
            Self::EquipmentChartError(e) => write!(f, "{}", e),
            Self::ReportError(e) => write!(f, "{}", e),
        }
    }
}
