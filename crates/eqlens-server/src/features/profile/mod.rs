//! The caller's profile: identity and dataset history

pub mod queries;
pub mod routes;

pub use queries::{GetProfileError, GetProfileQuery, GetProfileResponse};
pub use routes::profile_routes;
