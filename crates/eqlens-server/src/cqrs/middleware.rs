//! Marker traits separating writes from reads
//!
//! Every mediator request implements exactly one of these. Commands change
//! a user's stored datasets; queries only read them.

/// A request that mutates stored state
pub trait Command {}

/// A request that only reads stored state
pub trait Query {}
