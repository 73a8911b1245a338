//! Axum extractors for loaders and actions

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Query},
    http::{header, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use shelf_auth::{
    extract_session_id, AuthSession, CookieConfig, PasswordAuthenticator, Session, SessionStore,
};
use shelf_core::pagination::{PageParams, PageQuery};
use shelf_db::{AssetStore, LocationStore, UserStore};
use shelf_storage::ProfilePictureService;
use tracing::debug;

use crate::error::ApiError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub locations: Arc<dyn LocationStore>,
    pub users: Arc<dyn UserStore>,
    pub assets: Arc<dyn AssetStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub authenticator: Arc<dyn PasswordAuthenticator>,
    pub pictures: Arc<ProfilePictureService>,
    pub config: Arc<ApiConfig>,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Suffix of every page title
    pub app_title: String,
    pub cookie: CookieConfig,
    pub session_lifetime_seconds: i64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            app_title: "shelf.nu".into(),
            cookie: CookieConfig::default(),
            session_lifetime_seconds: 60 * 60 * 24 * 30,
        }
    }
}

impl AppState {
    /// Change the stored session behind the request's session id
    pub fn update_session(
        &self,
        session_id: &str,
        mut apply: impl FnMut(&mut Session),
    ) -> Result<Session, ApiError> {
        self.sessions
            .update(session_id, &mut apply)?
            .ok_or_else(|| ApiError::unauthorized("Session expired"))
    }

    /// `Set-Cookie` value that keeps `session` alive in the browser
    pub fn session_cookie(&self, session: &Session) -> String {
        self.config.cookie.build_cookie(&session.id)
    }
}

/// Signed-in user of the request.
///
/// Without a valid session the request is redirected to the login page,
/// carrying the requested path in `redirectTo`.
pub struct RequireAuth(pub AuthSession);

#[async_trait]
impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let session = parts
            .headers
            .get(header::COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|cookies| extract_session_id(cookies, &app_state.config.cookie.name))
            .and_then(|id| app_state.sessions.get(&id));

        match session {
            Some(session) => Ok(RequireAuth(AuthSession::from(&session))),
            None => {
                let path = parts
                    .uri
                    .path_and_query()
                    .map(|pq| pq.as_str())
                    .unwrap_or("/");
                debug!(path, "No session, redirecting to login");
                Err(login_redirect(path).into_response())
            }
        }
    }
}

impl std::ops::Deref for RequireAuth {
    type Target = AuthSession;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

pub fn login_redirect(path: &str) -> Redirect {
    let encoded: String = url::form_urlencoded::byte_serialize(path.as_bytes()).collect();
    Redirect::to(&format!("/login?redirectTo={}", encoded))
}

/// `?page=&per_page=&s=` of list loaders
pub struct Pagination(pub PageParams);

#[async_trait]
impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<PageQuery>::from_request_parts(parts, state)
            .await
            .unwrap_or_else(|_| Query(PageQuery::default()));
        Ok(Pagination(query.into()))
    }
}

impl std::ops::Deref for Pagination {
    type Target = PageParams;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
