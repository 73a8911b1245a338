//! # shelf-api
//!
//! Page loaders and form actions for Shelf RS.
//!
//! Loaders answer `GET` with the JSON a page renders from. Actions take form
//! posts, answer validation failures with `400 {"errors": ...}` and redirect
//! (303) on success.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod routes;

pub use extractors::{ApiConfig, AppState};
pub use routes::router;

#[cfg(test)]
pub(crate) mod test_support;
