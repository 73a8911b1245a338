//! # shelf-core
//!
//! Core types, traits, and utilities for Shelf RS.
//!
//! This crate provides the foundational building blocks used across all other crates:
//! - Common error types
//! - Result type alias
//! - The `UserContext` trait for the signed-in user
//! - Pagination and page-meta math for list loaders
//! - Configuration types

pub mod config;
pub mod error;
pub mod pagination;
pub mod result;
pub mod traits;

pub use error::*;
pub use pagination::*;
pub use result::*;
pub use traits::*;
