//! Shared utilities and types for feature modules
//!
//! # Contents
//!
//! - **user**: the [`UserId`] extractor for the trusted `x-user-id` header
//! - **test_helpers**: Test fixtures and utilities (test-only)

pub mod user;

#[cfg(test)]
pub mod test_helpers;

use eqlens_common::{parse_dataset_id, DatasetId};

pub use user::{validate_user_id, UserId, UserIdError, MAX_USER_ID_LENGTH, USER_HEADER};

/// Parse a dataset id taken from a path segment.
///
/// Returns `None` for anything that is not a UUID; handlers answer those the
/// same way as a missing dataset.
pub fn dataset_id_from_path(raw: &str) -> Option<DatasetId> {
    parse_dataset_id(raw).ok()
}
