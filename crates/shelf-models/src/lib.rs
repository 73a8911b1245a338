//! # shelf-models
//!
//! Domain models for Shelf RS.
//!
//! These structs mirror the rows of the externally owned relational schema
//! (`Asset`, `Category`, `Tag`, `Location`, `User`) plus the small value types
//! shared by loaders and actions: organization roles, permission checks,
//! flash notifications and dashboard series.

pub use shelf_core::traits::Id;

pub mod asset;
pub mod dashboard;
pub mod location;
pub mod notification;
pub mod organization;
pub mod user;

pub use asset::{Asset, AssetListItem, AssetStatus, Category, Tag};
pub use dashboard::MonthlyAssetTotal;
pub use location::Location;
pub use notification::{Notification, NotificationIcon, NotificationVariant};
pub use organization::{
    OrganizationRoles, ParseEnumError, PermissionAction, PermissionCheckProps, PermissionEntity,
};
pub use user::User;
