//! Location repository
//!
//! Database operations for locations and the assets stored in them.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use shelf_models::{Asset, AssetListItem, AssetStatus, Category, Location, Tag};
use sqlx::{FromRow, PgPool};

use crate::repository::{like_pattern, Pagination, RepositoryError, RepositoryResult};

/// A location with one page of its assets
#[derive(Debug, Clone)]
pub struct LocationWithAssets {
    pub location: Location,
    pub assets: Vec<AssetListItem>,
    /// Assets in the location matching the search, across all pages
    pub total_assets: i64,
}

#[async_trait]
pub trait LocationStore: Send + Sync {
    /// Find a location owned by `user_id` together with a page of its assets.
    ///
    /// Assets are filtered by a case-insensitive title substring and ordered
    /// newest first.
    async fn find_with_assets(
        &self,
        user_id: &str,
        id: &str,
        pagination: Pagination,
        search: Option<&str>,
    ) -> RepositoryResult<Option<LocationWithAssets>>;

    /// Delete a location owned by `user_id`
    async fn delete(&self, user_id: &str, id: &str) -> RepositoryResult<()>;
}

/// Location database row
#[derive(Debug, Clone, FromRow)]
pub struct LocationRow {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub image_id: Option<String>,
    pub user_id: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<LocationRow> for Location {
    fn from(row: LocationRow) -> Self {
        Location {
            id: row.id,
            name: row.name,
            description: row.description,
            address: row.address,
            image_id: row.image_id,
            user_id: row.user_id,
            created_at: row.created_at.and_utc(),
            updated_at: row.updated_at.and_utc(),
        }
    }
}

/// Asset database row. `status` is read as text.
#[derive(Debug, Clone, FromRow)]
pub struct AssetRow {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub main_image: Option<String>,
    pub main_image_expiration: Option<NaiveDateTime>,
    pub status: String,
    pub location_id: Option<String>,
    pub category_id: Option<String>,
    pub user_id: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<AssetRow> for Asset {
    type Error = RepositoryError;

    fn try_from(row: AssetRow) -> Result<Self, Self::Error> {
        let status: AssetStatus = row
            .status
            .parse()
            .map_err(|e: shelf_models::ParseEnumError| RepositoryError::Validation(e.to_string()))?;

        Ok(Asset {
            id: row.id,
            title: row.title,
            description: row.description,
            main_image: row.main_image,
            main_image_expiration: row.main_image_expiration.map(|t| t.and_utc()),
            status,
            location_id: row.location_id,
            category_id: row.category_id,
            user_id: row.user_id,
            created_at: row.created_at.and_utc(),
            updated_at: row.updated_at.and_utc(),
        })
    }
}

#[derive(Debug, Clone, FromRow)]
struct CategoryRow {
    id: String,
    name: String,
    description: Option<String>,
    color: String,
    user_id: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            name: row.name,
            description: row.description,
            color: row.color,
            user_id: row.user_id,
            created_at: row.created_at.and_utc(),
            updated_at: row.updated_at.and_utc(),
        }
    }
}

/// Tag row joined through `"_AssetToTag"` (A = asset id, B = tag id)
#[derive(Debug, Clone, FromRow)]
struct AssetTagRow {
    asset_id: String,
    id: String,
    name: String,
    description: Option<String>,
    user_id: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

impl AssetTagRow {
    fn into_tag(self) -> (String, Tag) {
        (
            self.asset_id,
            Tag {
                id: self.id,
                name: self.name,
                description: self.description,
                user_id: self.user_id,
                created_at: self.created_at.and_utc(),
                updated_at: self.updated_at.and_utc(),
            },
        )
    }
}

/// Location repository implementation
pub struct LocationRepository {
    pool: PgPool,
}

impl LocationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_location(&self, user_id: &str, id: &str) -> RepositoryResult<Option<Location>> {
        let row = sqlx::query_as::<_, LocationRow>(
            r#"
            SELECT id, name, description, address, "imageId" AS image_id,
                   "userId" AS user_id, "createdAt" AS created_at, "updatedAt" AS updated_at
            FROM "Location"
            WHERE id = $1 AND "userId" = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Location::from))
    }

    async fn find_assets(
        &self,
        location_id: &str,
        pagination: Pagination,
        pattern: Option<&str>,
    ) -> RepositoryResult<Vec<Asset>> {
        let rows = sqlx::query_as::<_, AssetRow>(
            r#"
            SELECT id, title, description, "mainImage" AS main_image,
                   "mainImageExpiration" AS main_image_expiration, status::text AS status,
                   "locationId" AS location_id, "categoryId" AS category_id,
                   "userId" AS user_id, "createdAt" AS created_at, "updatedAt" AS updated_at
            FROM "Asset"
            WHERE "locationId" = $1
              AND ($2::text IS NULL OR title ILIKE $2)
            ORDER BY "createdAt" DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(location_id)
        .bind(pattern)
        .bind(pagination.limit)
        .bind(pagination.offset)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Asset::try_from).collect()
    }

    async fn count_assets(&self, location_id: &str, pattern: Option<&str>) -> RepositoryResult<i64> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM "Asset"
            WHERE "locationId" = $1
              AND ($2::text IS NULL OR title ILIKE $2)
            "#,
        )
        .bind(location_id)
        .bind(pattern)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    async fn categories_by_id(&self, ids: Vec<String>) -> RepositoryResult<HashMap<String, Category>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, CategoryRow>(
            r#"
            SELECT id, name, description, color, "userId" AS user_id,
                   "createdAt" AS created_at, "updatedAt" AS updated_at
            FROM "Category"
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| (row.id.clone(), Category::from(row)))
            .collect())
    }

    async fn tags_by_asset(&self, asset_ids: Vec<String>) -> RepositoryResult<HashMap<String, Vec<Tag>>> {
        if asset_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, AssetTagRow>(
            r#"
            SELECT at."A" AS asset_id, t.id, t.name, t.description, t."userId" AS user_id,
                   t."createdAt" AS created_at, t."updatedAt" AS updated_at
            FROM "Tag" t
            JOIN "_AssetToTag" at ON at."B" = t.id
            WHERE at."A" = ANY($1)
            ORDER BY t.name ASC
            "#,
        )
        .bind(asset_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut tags: HashMap<String, Vec<Tag>> = HashMap::new();
        for row in rows {
            let (asset_id, tag) = row.into_tag();
            tags.entry(asset_id).or_default().push(tag);
        }
        Ok(tags)
    }
}

#[async_trait]
impl LocationStore for LocationRepository {
    async fn find_with_assets(
        &self,
        user_id: &str,
        id: &str,
        pagination: Pagination,
        search: Option<&str>,
    ) -> RepositoryResult<Option<LocationWithAssets>> {
        let Some(location) = self.find_location(user_id, id).await? else {
            return Ok(None);
        };

        let pattern = search.map(like_pattern);
        let assets = self
            .find_assets(&location.id, pagination, pattern.as_deref())
            .await?;
        let total_assets = self.count_assets(&location.id, pattern.as_deref()).await?;

        let category_ids: Vec<String> = assets
            .iter()
            .filter_map(|a| a.category_id.clone())
            .collect();
        let asset_ids: Vec<String> = assets.iter().map(|a| a.id.clone()).collect();

        let categories = self.categories_by_id(category_ids).await?;
        let mut tags = self.tags_by_asset(asset_ids).await?;

        let assets = assets
            .into_iter()
            .map(|asset| AssetListItem {
                category: asset
                    .category_id
                    .as_ref()
                    .and_then(|cid| categories.get(cid).cloned()),
                tags: tags.remove(&asset.id).unwrap_or_default(),
                asset,
            })
            .collect();

        Ok(Some(LocationWithAssets {
            location,
            assets,
            total_assets,
        }))
    }

    async fn delete(&self, user_id: &str, id: &str) -> RepositoryResult<()> {
        let result = sqlx::query(r#"DELETE FROM "Location" WHERE id = $1 AND "userId" = $2"#)
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id.to_string()));
        }

        Ok(())
    }
}
