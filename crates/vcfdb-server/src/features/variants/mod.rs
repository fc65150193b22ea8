//! Variant lookup feature
//!
//! Read-only queries over stored variant records, keyed by chromosome and
//! position.

pub mod queries;
pub mod routes;


pub use routes::{protected_routes, public_routes};
