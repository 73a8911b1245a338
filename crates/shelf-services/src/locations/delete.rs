//! Location delete action

use shelf_auth::{require_permission, AuthSession};
use shelf_core::{ShelfError, ShelfResult};
use shelf_db::{LocationStore, RepositoryError};
use shelf_models::{Notification, NotificationVariant, PermissionAction, PermissionEntity};
use tracing::info;

use crate::permission_props;

pub struct DeleteLocationService<'a> {
    user: &'a AuthSession,
    locations: &'a dyn LocationStore,
}

impl<'a> DeleteLocationService<'a> {
    pub fn new(user: &'a AuthSession, locations: &'a dyn LocationStore) -> Self {
        Self { user, locations }
    }

    /// Delete the location. Returns the notification to flash on success.
    pub async fn call(self, location_id: &str) -> ShelfResult<Notification> {
        require_permission(&permission_props(
            self.user,
            PermissionAction::Delete,
            PermissionEntity::Location,
        ))?;

        self.locations
            .delete(&self.user.user_id, location_id)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound(_) => ShelfError::not_found("Location", location_id),
                other => other.into(),
            })?;

        info!(location_id, user_id = %self.user.user_id, "Location deleted");

        Ok(
            Notification::new("Location deleted", "Your location has been deleted successfully")
                .with_icon("trash", NotificationVariant::Error),
        )
    }
}
