//! Login and logout actions

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Redirect},
    Form,
};
use shelf_auth::Session;
use shelf_contracts::sessions::LoginForm;
use shelf_core::error::ShelfError;
use tracing::info;
use url::Url;

use crate::error::{ApiError, ApiResult};
use crate::extractors::{AppState, RequireAuth};

/// Where a successful login lands without `redirectTo`
const DEFAULT_REDIRECT: &str = "/assets";

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> ApiResult<impl IntoResponse> {
    let credentials = form.parse().map_err(ApiError::Validation)?;

    let user = state
        .authenticator
        .sign_in_with_password(&credentials.email, &credentials.password)
        .await
        .map_err(ShelfError::from)?;

    let session = Session::authenticated(
        user.user_id.as_str(),
        user.email.as_str(),
        state.config.session_lifetime_seconds,
    );
    let cookie = state.session_cookie(&session);
    state.sessions.set(session)?;

    info!(user_id = %user.user_id, "User logged in");
    let target = safe_redirect(credentials.redirect_to.as_deref());
    Ok(([(header::SET_COOKIE, cookie)], Redirect::to(target)))
}

/// POST /logout
pub async fn logout(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> ApiResult<impl IntoResponse> {
    state.sessions.delete(&user.session_id)?;

    info!(user_id = %user.user_id, "User logged out");
    Ok((
        [(header::SET_COOKIE, state.config.cookie.build_clear_cookie())],
        Redirect::to("/"),
    ))
}

/// Only same-site paths are followed after login.
///
/// Browsers read `\` as `/`, so `/\host` is as external as `//host`.
fn safe_redirect(target: Option<&str>) -> &str {
    match target {
        Some(path) if is_local_path(path) => path,
        _ => DEFAULT_REDIRECT,
    }
}

fn is_local_path(path: &str) -> bool {
    if !path.starts_with('/') || path.contains('\\') || path.chars().any(char::is_control) {
        return false;
    }
    let Ok(base) = Url::parse("http://shelf.local/") else {
        return false;
    };
    base.join(path)
        .map(|joined| joined.origin() == base.origin())
        .unwrap_or(false)
}
