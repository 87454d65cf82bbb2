//! eqlens Common Library
//!
//! Shared types, logging and error handling for the eqlens workspace.
//!
//! # Overview
//!
//! - **Types**: the equipment record and dataset model shared by ingestion,
//!   analytics and the server
//! - **Error Handling**: [`EqlensError`] and the crate-wide [`Result`] alias
//! - **Logging**: environment-driven `tracing` initialisation
//!
//! # Example
//!
//! ```no_run
//! use eqlens_common::logging::{init_logging, LogConfig};
//! use tracing::info;
//!
//! fn main() -> anyhow::Result<()> {
//!     let _guard = init_logging(&LogConfig::from_env()?)?;
//!     info!("ready");
//!     Ok(())
//! }
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{EqlensError, Result};
pub use types::{
    parse_dataset_id, Averages, Dataset, DatasetId, DatasetSummary, EquipmentRecord, UNKNOWN_LABEL,
};
