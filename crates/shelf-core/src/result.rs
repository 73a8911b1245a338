//! Result type alias

use crate::error::ShelfError;

/// Standard Result type for Shelf operations
pub type ShelfResult<T> = Result<T, ShelfError>;
