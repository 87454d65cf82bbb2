pub mod get;

pub use get::{GetProfileError, GetProfileQuery, GetProfileResponse};
