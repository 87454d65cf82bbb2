//! Feature modules implementing the eqlens API
//!
//! Each feature is a vertical slice following the CQRS pattern, with its own
//! commands, queries and routes.
//!
//! # Features
//!
//! - **datasets**: CSV upload, listing, deletion and everything derived from
//!   a dataset (distribution, raw columns, chart specs, PDF report)
//! - **profile**: the caller's identity and dataset history
//!
//! # Architecture
//!
//! Each feature module follows the structure:
//! - `commands/` - Write operations (upload, delete)
//! - `queries/` - Read operations (get, list, reports)
//! - `routes.rs` - HTTP route definitions
//! - `types.rs` - Shared types (if needed)
//!
//! Commands and queries implement `mediator::Request`, and their `handle`
//! functions take the repository explicitly so they can be called from
//! routes, the mediator or tests alike.

pub mod datasets;
pub mod profile;
pub mod shared;

use axum::{extract::DefaultBodyLimit, Router};

use crate::middleware;
use crate::repository::SharedRepository;

/// Shared state for all feature routes
#[derive(Clone)]
pub struct FeatureState {
    pub repo: SharedRepository,
    /// Datasets kept per user after an upload
    pub retention_cap: usize,
}

/// Creates the main API router with all feature routes mounted
///
/// - `/datasets` - Dataset upload and analysis, with the upload body limit
/// - `/profile` - Caller profile
pub fn router(state: FeatureState, max_upload_bytes: usize) -> Router<()> {
    let datasets = datasets::datasets_routes()
        .layer(DefaultBodyLimit::disable())
        .layer(middleware::body_limit_layer(max_upload_bytes))
        .with_state(state.clone());

    Router::new()
        .nest("/datasets", datasets)
        .nest("/profile", profile::profile_routes().with_state(state.repo))
}
