//! Password sign-in
//!
//! Credentials are checked by Supabase auth; the app only keeps a session.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use shelf_core::error::ShelfError;
use thiserror::Error;
use tracing::{debug, instrument, warn};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Incorrect email or password")]
    InvalidCredentials,
    #[error("Auth provider error: {0}")]
    Provider(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl From<AuthError> for ShelfError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => ShelfError::Unauthorized {
                message: err.to_string(),
            },
            other => ShelfError::ExternalService {
                service: "supabase-auth".to_string(),
                message: other.to_string(),
            },
        }
    }
}

/// A user whose credentials were accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: String,
}

#[async_trait]
pub trait PasswordAuthenticator: Send + Sync {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedUser, AuthError>;
}

/// Supabase auth (GoTrue) client
pub struct SupabaseAuth {
    client: Client,
    base_url: String,
    anon_key: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    user: TokenUser,
}

#[derive(Debug, Deserialize)]
struct TokenUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

impl SupabaseAuth {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
        }
    }
}

#[async_trait]
impl PasswordAuthenticator for SupabaseAuth {
    #[instrument(skip(self, password))]
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedUser, AuthError> {
        let url = format!("{}/auth/v1/token?grant_type=password", self.base_url);

        let resp = self
            .client
            .post(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .json(&serde_json::json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await?;

        match resp.status() {
            status if status.is_success() => {}
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
                debug!("Sign-in rejected");
                return Err(AuthError::InvalidCredentials);
            }
            status => {
                let body = resp.text().await.unwrap_or_default();
                warn!(status = status.as_u16(), "Auth provider error");
                return Err(AuthError::Provider(format!("{}: {}", status.as_u16(), body)));
            }
        }

        let body: TokenResponse = resp.json().await?;
        Ok(AuthenticatedUser {
            user_id: body.user.id,
            email: body.user.email.unwrap_or_else(|| email.to_string()),
        })
    }
}

/// In-memory credentials (for testing and local development)
#[derive(Debug, Default)]
pub struct MemoryAuthenticator {
    users: HashMap<String, (String, String)>,
}

impl MemoryAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(
        mut self,
        user_id: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.users
            .insert(email.into().to_lowercase(), (user_id.into(), password.into()));
        self
    }
}

#[async_trait]
impl PasswordAuthenticator for MemoryAuthenticator {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedUser, AuthError> {
        let email = email.to_lowercase();
        match self.users.get(&email) {
            Some((user_id, expected)) if expected == password => Ok(AuthenticatedUser {
                user_id: user_id.clone(),
                email,
            }),
            _ => Err(AuthError::InvalidCredentials),
        }
    }
}
