//! Location page loader

use serde::Serialize;
use shelf_auth::{require_permission, AuthSession};
use shelf_core::{ShelfError, ShelfResult};
use shelf_core::pagination::{append_to_meta_title, PageMeta, PageParams};
use shelf_db::{LocationStore, Pagination};
use shelf_models::{AssetListItem, Location, PermissionAction, PermissionEntity, Tag};
use tracing::debug;

use crate::permission_props;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageHeader {
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageTitle {
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelName {
    pub singular: &'static str,
    pub plural: &'static str,
}

/// An asset row whose tag column shows a few tags and a `+N` badge
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRow {
    #[serde(flatten)]
    pub item: AssetListItem,
    pub visible_tags: Vec<Tag>,
    pub remaining_tag_count: usize,
    /// Tooltip of the `+N` badge
    pub remaining_tags_title: Option<String>,
}

impl From<AssetListItem> for AssetRow {
    fn from(item: AssetListItem) -> Self {
        Self {
            visible_tags: item.visible_tags().to_vec(),
            remaining_tag_count: item.remaining_tag_count(),
            remaining_tags_title: item.remaining_tags_title(),
            item,
        }
    }
}

/// Data for the single location page
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationPage {
    pub location: Location,
    pub header: PageHeader,
    pub meta: PageTitle,
    pub model_name: ModelName,
    pub items: Vec<AssetRow>,
    pub page: i64,
    pub total_items: i64,
    pub per_page: i64,
    pub total_pages: i64,
    pub next: String,
    pub prev: String,
}

pub struct LocationPageService<'a> {
    user: &'a AuthSession,
    locations: &'a dyn LocationStore,
    app_title: &'a str,
}

impl<'a> LocationPageService<'a> {
    pub fn new(user: &'a AuthSession, locations: &'a dyn LocationStore, app_title: &'a str) -> Self {
        Self {
            user,
            locations,
            app_title,
        }
    }

    pub async fn load(&self, location_id: &str, params: &PageParams) -> ShelfResult<LocationPage> {
        require_permission(&permission_props(
            self.user,
            PermissionAction::Read,
            PermissionEntity::Location,
        ))?;

        let found = self
            .locations
            .find_with_assets(
                &self.user.user_id,
                location_id,
                Pagination::from(params),
                params.search.as_deref(),
            )
            .await?
            .ok_or_else(|| ShelfError::not_found("Location", location_id))?;

        let meta = PageMeta::new(params, found.total_assets);
        debug!(
            location_id,
            total = found.total_assets,
            page = params.page,
            "Loaded location page"
        );

        Ok(LocationPage {
            header: PageHeader {
                title: found.location.name.clone(),
            },
            meta: PageTitle {
                title: append_to_meta_title(Some(&found.location.name), self.app_title),
            },
            model_name: ModelName {
                singular: "asset",
                plural: "assets",
            },
            location: found.location,
            items: found.assets.into_iter().map(AssetRow::from).collect(),
            page: meta.page,
            total_items: meta.total_items,
            per_page: meta.per_page,
            total_pages: meta.total_pages,
            next: meta.next,
            prev: meta.prev,
        })
    }
}
