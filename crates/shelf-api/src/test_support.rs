use std::sync::Arc;

use axum::Router;
use chrono::{Duration, Utc};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use shelf_auth::{MemoryAuthenticator, MemorySessionStore, Session, SessionStore};
use shelf_db::MemoryStore;
use shelf_models::{Asset, AssetListItem, AssetStatus, Location, User};
use shelf_storage::{MemoryStorage, ProfilePictureService};

use crate::extractors::{ApiConfig, AppState};
use crate::routes::router;

pub struct TestApp {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub storage: Arc<MemoryStorage>,
    pub sessions: Arc<MemorySessionStore>,
}

impl TestApp {
    pub async fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let now = Utc::now();

        store.insert_user(user("u_1", "jane@example.com", "janedoe")).await;
        store.insert_user(user("u_2", "john@example.com", "johndoe")).await;
        store
            .insert_location(Location {
                id: "loc_1".into(),
                name: "Garage".into(),
                description: None,
                address: None,
                image_id: None,
                user_id: "u_1".into(),
                created_at: now,
                updated_at: now,
            })
            .await;
        for i in 0..3 {
            store
                .insert_asset(asset(&format!("a_{i}"), now - Duration::days(i)))
                .await;
        }

        let storage = Arc::new(MemoryStorage::new("https://abc.supabase.co"));
        let sessions = Arc::new(MemorySessionStore::new());
        let authenticator =
            MemoryAuthenticator::new().with_user("u_1", "jane@example.com", "secret123");

        let state = AppState {
            locations: store.clone(),
            users: store.clone(),
            assets: store.clone(),
            sessions: sessions.clone(),
            authenticator: Arc::new(authenticator),
            pictures: Arc::new(ProfilePictureService::new(
                storage.clone(),
                "profile-pictures",
                1024 * 1024,
            )),
            config: Arc::new(ApiConfig::default()),
        };

        Self {
            state,
            store,
            storage,
            sessions,
        }
    }

    pub fn router(&self) -> Router {
        router().with_state(self.state.clone())
    }

    /// Store a session for `user_id` and return the matching `Cookie` header
    pub fn login(&self, user_id: &str) -> String {
        let session = Session::authenticated(user_id, "jane@example.com", 3600);
        let cookie = format!("__authSession={}", session.id);
        self.sessions.set(session).unwrap();
        cookie
    }
}

fn user(id: &str, email: &str, username: &str) -> User {
    let now = Utc::now();
    User {
        id: id.into(),
        email: email.into(),
        username: username.into(),
        first_name: None,
        last_name: None,
        profile_picture: None,
        created_at: now,
        updated_at: now,
    }
}

fn asset(id: &str, created_at: chrono::DateTime<Utc>) -> AssetListItem {
    AssetListItem {
        asset: Asset {
            id: id.into(),
            title: format!("Drill {id}"),
            description: None,
            main_image: None,
            main_image_expiration: None,
            status: AssetStatus::Available,
            location_id: Some("loc_1".into()),
            category_id: None,
            user_id: "u_1".into(),
            created_at,
            updated_at: created_at,
        },
        category: None,
        tags: vec![],
    }
}

pub fn png_bytes() -> Vec<u8> {
    let img = RgbImage::from_pixel(200, 160, Rgb([30, 160, 90]));
    let mut out = std::io::Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut out, ImageFormat::Png)
        .unwrap();
    out.into_inner()
}
