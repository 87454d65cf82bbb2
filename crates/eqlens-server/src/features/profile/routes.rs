//! Profile API routes
//!
//! - `GET /api/v1/profile` - The caller's id and dataset history

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use crate::api::response::{ApiResponse, ErrorResponse};
use crate::features::shared::UserId;
use crate::repository::SharedRepository;

use super::queries::{GetProfileError, GetProfileQuery};

pub fn profile_routes() -> Router<SharedRepository> {
    Router::new().route("/", get(get_profile))
}

#[tracing::instrument(skip(repo), fields(user_id = %user))]
async fn get_profile(
    State(repo): State<SharedRepository>,
    user: UserId,
) -> Result<Response, ProfileApiError> {
    let query = GetProfileQuery {
        user_id: user.into_inner(),
    };

    let response = super::queries::get::handle(repo, query).await?;

    Ok((StatusCode::OK, Json(ApiResponse::success(response))).into_response())
}

#[derive(Debug)]
enum ProfileApiError {
    GetError(GetProfileError),
}

impl From<GetProfileError> for ProfileApiError {
    fn from(err: GetProfileError) -> Self {
        Self::GetError(err)
    }
}

impl IntoResponse for ProfileApiError {
    fn into_response(self) -> Response {
        match self {
            ProfileApiError::GetError(GetProfileError::Repository(e)) => {
                tracing::error!("Repository error during profile retrieval: {}", e);
                ErrorResponse::new("INTERNAL_ERROR", "A storage error occurred")
                    .into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
            },
        }
    }
}
