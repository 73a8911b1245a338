//! Replace a user's profile picture

use std::fmt::Display;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::Stream;
use shelf_core::{ShelfError, ShelfResult};
use shelf_core::traits::UserContext;
use shelf_db::{UpdateUserDto, UserStore};
use shelf_models::User;
use shelf_storage::{ProfilePictureService, UploadRequest};
use tracing::{info, warn};

pub struct ReplaceProfilePictureService<'a, U: UserContext> {
    user: &'a U,
    users: &'a dyn UserStore,
    pictures: &'a ProfilePictureService,
}

impl<'a, U: UserContext> ReplaceProfilePictureService<'a, U> {
    pub fn new(user: &'a U, users: &'a dyn UserStore, pictures: &'a ProfilePictureService) -> Self {
        Self {
            user,
            users,
            pictures,
        }
    }

    /// Upload the new picture, store its URL on the user, then remove the
    /// previous picture. Failing to remove the old file does not fail the call.
    pub async fn call<S, E>(self, stream: S, content_type: &str, now: DateTime<Utc>) -> ShelfResult<User>
    where
        S: Stream<Item = Result<Bytes, E>> + Send,
        E: Display,
    {
        let user_id = self.user.user_id();
        let existing = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ShelfError::not_found("User", user_id))?;

        let url = self
            .pictures
            .upload_file(
                stream,
                UploadRequest {
                    user_id: user_id.to_string(),
                    content_type: content_type.to_string(),
                    uploaded_at: now,
                },
            )
            .await?;

        let updated = self
            .users
            .update(
                user_id,
                UpdateUserDto {
                    profile_picture: Some(url.clone()),
                    ..Default::default()
                },
            )
            .await?;

        if let Some(previous) = existing.profile_picture.filter(|p| *p != url) {
            if let Err(e) = self.pictures.delete_profile_picture(&previous).await {
                warn!(user_id, previous = %previous, error = %e, "Failed to remove previous profile picture");
            }
        }

        info!(user_id, "Profile picture replaced");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{owner, user};
    use chrono::TimeZone;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use shelf_db::MemoryStore;
    use shelf_storage::MemoryStorage;
    use std::io::Cursor;
    use std::sync::Arc;

    const BASE: &str = "https://abc.supabase.co";

    fn png_stream() -> impl Stream<Item = Result<Bytes, std::io::Error>> + Send {
        let img = RgbImage::from_pixel(200, 200, Rgb([0, 120, 255]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        futures::stream::iter(vec![Ok(Bytes::from(out.into_inner()))])
    }

    #[tokio::test]
    async fn test_replace_profile_picture() {
        let storage = Arc::new(MemoryStorage::new(BASE));
        let pictures = ProfilePictureService::new(storage.clone(), "profile-pictures", 1 << 20);
        let store = MemoryStore::new();
        store.insert_user(user("u_1", "jane@example.com", "janedoe")).await;
        let session = owner("u_1");

        let first = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let updated = ReplaceProfilePictureService::new(&session, &store, &pictures)
            .call(png_stream(), "image/png", first)
            .await
            .unwrap();
        assert_eq!(
            updated.profile_picture.as_deref(),
            Some("https://abc.supabase.co/storage/v1/object/public/profile-pictures/u_1/profile-1700000000.png")
        );

        let second = Utc.timestamp_opt(1_700_000_100, 0).unwrap();
        ReplaceProfilePictureService::new(&session, &store, &pictures)
            .call(png_stream(), "image/png", second)
            .await
            .unwrap();

        assert!(!storage.exists("profile-pictures", "u_1/profile-1700000000.png").await);
        assert!(storage.exists("profile-pictures", "u_1/profile-1700000100.png").await);
    }

    #[tokio::test]
    async fn test_foreign_previous_picture_is_kept() {
        let storage = Arc::new(MemoryStorage::new(BASE));
        let pictures = ProfilePictureService::new(storage.clone(), "profile-pictures", 1 << 20);
        let store = MemoryStore::new();
        let mut existing = user("u_1", "jane@example.com", "janedoe");
        existing.profile_picture = Some("https://gravatar.example.com/avatar.png".into());
        store.insert_user(existing).await;
        let session = owner("u_1");

        let updated = ReplaceProfilePictureService::new(&session, &store, &pictures)
            .call(png_stream(), "image/png", Utc::now())
            .await
            .unwrap();

        assert!(updated
            .profile_picture
            .unwrap()
            .starts_with("https://abc.supabase.co/storage/v1/object/public/profile-pictures/u_1/"));
    }
}
