//! # shelf-db
//!
//! Database layer for Shelf RS.
//!
//! This crate provides PostgreSQL access using SQLx against the externally
//! owned schema, including:
//!
//! - Connection pool management
//! - Store traits consumed by services (`LocationStore`, `UserStore`, `AssetStore`)
//! - Postgres repositories implementing them
//! - An in-memory store for tests and local development
//!
//! ## Example
//!
//! ```ignore
//! use shelf_db::{Database, LocationRepository, LocationStore, Pagination};
//!
//! let db = Database::connect(&config.database).await?;
//! let locations = LocationRepository::new(db.pool().clone());
//! let page = locations
//!     .find_with_assets(user_id, location_id, Pagination::page(1, 8), None)
//!     .await?;
//! ```

pub mod assets;
pub mod locations;
pub mod memory;
pub mod pool;
pub mod repository;
pub mod users;

// Re-exports
pub use assets::{AssetRepository, AssetStore};
pub use locations::{LocationRepository, LocationStore, LocationWithAssets};
pub use memory::MemoryStore;
pub use pool::{Database, PoolStats};
pub use repository::{Pagination, RepositoryError, RepositoryResult};
pub use users::{UpdateUserDto, UserRepository, UserStore};
