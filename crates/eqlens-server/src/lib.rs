//! eqlens Server Library
//!
//! HTTP API over uploaded equipment datasets.
//!
//! # Overview
//!
//! - **API Endpoints**: upload CSVs, list and delete datasets, and fetch the
//!   type distribution, raw columns, chart specifications and PDF report
//!   derived from a dataset
//! - **Persistence**: the [`repository::DatasetRepository`] trait with an
//!   in-memory backend and a PostgreSQL backend on SQLx
//! - **Configuration**: Environment-based configuration management
//! - **Middleware**: CORS, request tracing, compression and upload limits
//!
//! # Architecture
//!
//! Features follow a **CQRS** layout:
//!
//! - **Commands** (write operations): upload and delete a dataset
//! - **Queries** (read operations): everything else
//!
//! Each command or query is a plain struct with a `handle(repo, request)`
//! function. Uploading enforces the per-user retention cap atomically
//! inside the repository.
//!
//! Callers are identified by the `x-user-id` header set by an upstream
//! authentication proxy.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use eqlens_server::{api, config::Config, repository::InMemoryRepository};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let app = api::create_router(Arc::new(InMemoryRepository::new()), &config);
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod cqrs;
pub mod error;
pub mod features;
pub mod middleware;
pub mod repository;
pub mod shutdown;

// Re-export commonly used types
pub use error::{AppError, AppResult};
