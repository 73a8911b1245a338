//! Cookie sessions
//!
//! The browser only holds an opaque id in an HttpOnly cookie. Everything else,
//! including flash notifications waiting for the next page view, stays on the
//! server.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockWriteGuard};

use chrono::{DateTime, Duration, Utc};
use rand::distr::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use shelf_core::config::AuthConfig;
use shelf_core::traits::UserContext;
use shelf_models::{Notification, OrganizationRoles};
use thiserror::Error;

const SESSION_ID_LENGTH: usize = 64;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session store unavailable")]
    Unavailable,
}

/// A signed-in browser session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub email: String,
    /// Workspace the user acts in
    pub organization_id: String,
    pub roles: Vec<OrganizationRoles>,
    /// Shown once on the next page view
    #[serde(default)]
    pub flash: Vec<Notification>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// New session for a user who just signed in.
    ///
    /// Every account starts out owning its personal workspace, whose id is
    /// the user id.
    pub fn authenticated(
        user_id: impl Into<String>,
        email: impl Into<String>,
        lifetime_seconds: i64,
    ) -> Self {
        let user_id = user_id.into();
        let now = Utc::now();
        Self {
            id: new_session_id(),
            organization_id: user_id.clone(),
            roles: vec![OrganizationRoles::Owner],
            user_id,
            email: email.into(),
            flash: Vec::new(),
            created_at: now,
            expires_at: now + Duration::seconds(lifetime_seconds),
        }
    }

    pub fn with_organization(
        mut self,
        organization_id: impl Into<String>,
        roles: Vec<OrganizationRoles>,
    ) -> Self {
        self.organization_id = organization_id.into();
        self.roles = roles;
        self
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    pub fn push_notification(&mut self, notification: Notification) {
        self.flash.push(notification);
    }

    /// Queued notifications, oldest first. The queue is left empty.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.flash)
    }
}

fn new_session_id() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_ID_LENGTH)
        .map(char::from)
        .collect()
}

/// The signed-in user of a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub session_id: String,
    pub user_id: String,
    pub email: String,
    pub organization_id: String,
    pub roles: Vec<OrganizationRoles>,
}

impl From<&Session> for AuthSession {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.id.clone(),
            user_id: session.user_id.clone(),
            email: session.email.clone(),
            organization_id: session.organization_id.clone(),
            roles: session.roles.clone(),
        }
    }
}

impl UserContext for AuthSession {
    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn email(&self) -> &str {
        &self.email
    }
}

pub trait SessionStore: Send + Sync {
    /// Live session by id; expired sessions are never returned
    fn get(&self, session_id: &str) -> Option<Session>;

    /// Insert or replace
    fn set(&self, session: Session) -> Result<(), SessionError>;

    fn delete(&self, session_id: &str) -> Result<(), SessionError>;

    /// Modify a live session in place, atomically with respect to other
    /// writers. `None` when the session is missing or expired.
    fn update(
        &self,
        session_id: &str,
        apply: &mut dyn FnMut(&mut Session),
    ) -> Result<Option<Session>, SessionError>;

    /// Drop expired sessions, returning how many went
    fn cleanup_expired(&self) -> Result<usize, SessionError>;
}

/// Process-local store. Sessions do not survive a restart.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, Session>>, SessionError> {
        self.sessions.write().map_err(|_| SessionError::Unavailable)
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, session_id: &str) -> Option<Session> {
        let sessions = self.sessions.read().ok()?;
        sessions
            .get(session_id)
            .filter(|session| !session.is_expired())
            .cloned()
    }

    fn set(&self, session: Session) -> Result<(), SessionError> {
        self.write()?.insert(session.id.clone(), session);
        Ok(())
    }

    fn delete(&self, session_id: &str) -> Result<(), SessionError> {
        self.write()?.remove(session_id);
        Ok(())
    }

    fn update(
        &self,
        session_id: &str,
        apply: &mut dyn FnMut(&mut Session),
    ) -> Result<Option<Session>, SessionError> {
        let mut sessions = self.write()?;
        Ok(sessions
            .get_mut(session_id)
            .filter(|session| !session.is_expired())
            .map(|session| {
                apply(session);
                session.clone()
            }))
    }

    fn cleanup_expired(&self) -> Result<usize, SessionError> {
        let mut sessions = self.write()?;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired());
        Ok(before - sessions.len())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    fn as_str(self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Attributes of the session cookie
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: String,
    pub path: String,
    pub secure: bool,
    pub same_site: SameSite,
    /// `Max-Age` in seconds; a browser-session cookie when `None`
    pub max_age: Option<i64>,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: "__authSession".to_string(),
            path: "/".to_string(),
            secure: true,
            same_site: SameSite::Lax,
            max_age: None,
        }
    }
}

impl From<&AuthConfig> for CookieConfig {
    fn from(config: &AuthConfig) -> Self {
        Self {
            name: config.cookie_name.clone(),
            secure: config.cookie_secure,
            max_age: Some(config.session_lifetime_seconds),
            ..Default::default()
        }
    }
}

impl CookieConfig {
    /// `Set-Cookie` value carrying the session id
    pub fn build_cookie(&self, session_id: &str) -> String {
        self.render(session_id, self.max_age)
    }

    /// `Set-Cookie` value that removes the session cookie
    pub fn build_clear_cookie(&self) -> String {
        self.render("", Some(0))
    }

    fn render(&self, value: &str, max_age: Option<i64>) -> String {
        let mut cookie = format!(
            "{}={}; Path={}; HttpOnly; SameSite={}",
            self.name,
            value,
            self.path,
            self.same_site.as_str()
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        if let Some(max_age) = max_age {
            cookie.push_str(&format!("; Max-Age={}", max_age));
        }
        cookie
    }
}

/// Value of the `cookie_name` cookie in a `Cookie` request header
pub fn extract_session_id(cookie_header: &str, cookie_name: &str) -> Option<String> {
    cookie_header
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .find(|(name, _)| name.trim() == cookie_name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
