//! Location services

mod delete;
mod show;

pub use delete::DeleteLocationService;
pub use show::{AssetRow, LocationPage, LocationPageService, ModelName, PageHeader, PageTitle};
