//! # shelf-contracts
//!
//! Form schemas and contract validation for Shelf RS.
//!
//! A form is first checked against its schema (`validator` derive) and
//! normalized into a payload. Contracts then check the payload against the
//! signed-in user before anything is written.

pub mod base;
pub mod sessions;
pub mod users;

pub use base::*;
