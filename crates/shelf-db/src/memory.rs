//! In-memory store (for testing and local development)
//!
//! Implements every store trait over a single map-backed dataset so
//! handlers and services can run without PostgreSQL.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shelf_models::{AssetListItem, Location, User};
use tokio::sync::RwLock;

use crate::assets::AssetStore;
use crate::locations::{LocationStore, LocationWithAssets};
use crate::repository::{Pagination, RepositoryError, RepositoryResult};
use crate::users::{UpdateUserDto, UserStore};

#[derive(Default)]
struct MemoryData {
    locations: HashMap<String, Location>,
    assets: Vec<AssetListItem>,
    users: HashMap<String, User>,
}

/// In-memory store
#[derive(Default)]
pub struct MemoryStore {
    data: RwLock<MemoryData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_location(&self, location: Location) {
        let mut data = self.data.write().await;
        data.locations.insert(location.id.clone(), location);
    }

    pub async fn insert_asset(&self, asset: AssetListItem) {
        let mut data = self.data.write().await;
        data.assets.push(asset);
    }

    pub async fn insert_user(&self, user: User) {
        let mut data = self.data.write().await;
        data.users.insert(user.id.clone(), user);
    }

    pub async fn location_count(&self) -> usize {
        self.data.read().await.locations.len()
    }
}

#[async_trait]
impl LocationStore for MemoryStore {
    async fn find_with_assets(
        &self,
        user_id: &str,
        id: &str,
        pagination: Pagination,
        search: Option<&str>,
    ) -> RepositoryResult<Option<LocationWithAssets>> {
        let data = self.data.read().await;

        let Some(location) = data
            .locations
            .get(id)
            .filter(|l| l.user_id == user_id)
            .cloned()
        else {
            return Ok(None);
        };

        let needle = search.map(str::to_lowercase);
        let mut matching: Vec<&AssetListItem> = data
            .assets
            .iter()
            .filter(|a| a.asset.location_id.as_deref() == Some(id))
            .filter(|a| match &needle {
                Some(n) => a.asset.title.to_lowercase().contains(n),
                None => true,
            })
            .collect();
        matching.sort_by(|a, b| b.asset.created_at.cmp(&a.asset.created_at));

        let total_assets = matching.len() as i64;
        let assets = matching
            .into_iter()
            .skip(pagination.offset.max(0) as usize)
            .take(pagination.limit.max(0) as usize)
            .cloned()
            .collect();

        Ok(Some(LocationWithAssets {
            location,
            assets,
            total_assets,
        }))
    }

    async fn delete(&self, user_id: &str, id: &str) -> RepositoryResult<()> {
        let mut data = self.data.write().await;

        let owned = data
            .locations
            .get(id)
            .map(|l| l.user_id == user_id)
            .unwrap_or(false);
        if !owned {
            return Err(RepositoryError::NotFound(id.to_string()));
        }

        data.locations.remove(id);
        for item in data.assets.iter_mut() {
            if item.asset.location_id.as_deref() == Some(id) {
                item.asset.location_id = None;
            }
        }

        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<User>> {
        Ok(self.data.read().await.users.get(id).cloned())
    }

    async fn update(&self, id: &str, dto: UpdateUserDto) -> RepositoryResult<User> {
        let mut data = self.data.write().await;

        if !data.users.contains_key(id) {
            return Err(RepositoryError::NotFound(id.to_string()));
        }

        for other in data.users.values().filter(|u| u.id != id) {
            if dto.email.as_deref() == Some(other.email.as_str()) {
                return Err(RepositoryError::UniqueViolation {
                    field: "email".to_string(),
                });
            }
            if dto.username.as_deref() == Some(other.username.as_str()) {
                return Err(RepositoryError::UniqueViolation {
                    field: "username".to_string(),
                });
            }
        }

        let user = data
            .users
            .get_mut(id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;

        if let Some(email) = dto.email {
            user.email = email;
        }
        if let Some(username) = dto.username {
            user.username = username;
        }
        if let Some(first_name) = dto.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = dto.last_name {
            user.last_name = last_name;
        }
        if let Some(profile_picture) = dto.profile_picture {
            user.profile_picture = Some(profile_picture);
        }
        user.updated_at = Utc::now();

        Ok(user.clone())
    }
}

#[async_trait]
impl AssetStore for MemoryStore {
    async fn count_for_user(&self, user_id: &str) -> RepositoryResult<i64> {
        let data = self.data.read().await;
        Ok(data
            .assets
            .iter()
            .filter(|a| a.asset.user_id == user_id)
            .count() as i64)
    }

    async fn count_created_before(
        &self,
        user_id: &str,
        before: DateTime<Utc>,
    ) -> RepositoryResult<i64> {
        let data = self.data.read().await;
        Ok(data
            .assets
            .iter()
            .filter(|a| a.asset.user_id == user_id && a.asset.created_at < before)
            .count() as i64)
    }

    async fn creation_dates_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> RepositoryResult<Vec<DateTime<Utc>>> {
        let data = self.data.read().await;
        let mut dates: Vec<DateTime<Utc>> = data
            .assets
            .iter()
            .filter(|a| a.asset.user_id == user_id && a.asset.created_at >= since)
            .map(|a| a.asset.created_at)
            .collect();
        dates.sort();
        Ok(dates)
    }
}
