//! Location page loader and delete action

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Redirect},
    Form, Json,
};
use serde::Deserialize;
use shelf_auth::AuthSession;
use shelf_services::{DeleteLocationService, LocationPage, LocationPageService};

use crate::error::{ApiError, ApiResult};
use crate::extractors::{AppState, Pagination, RequireAuth};

/// GET /locations/:locationId
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(location_id): Path<String>,
    pagination: Pagination,
) -> ApiResult<Json<LocationPage>> {
    let page = LocationPageService::new(&user, state.locations.as_ref(), &state.config.app_title)
        .load(&location_id, &pagination)
        .await?;
    Ok(Json(page))
}

/// DELETE /locations/:locationId
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(location_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    delete_location(&state, &user, &location_id).await
}

/// Browser forms can only POST; `_method=delete` stands in for DELETE
#[derive(Debug, Default, Deserialize)]
pub struct MethodOverride {
    #[serde(rename = "_method")]
    pub method: Option<String>,
}

/// POST /locations/:locationId
pub async fn action(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(location_id): Path<String>,
    Form(form): Form<MethodOverride>,
) -> ApiResult<impl IntoResponse> {
    match form.method.as_deref() {
        Some(method) if method.eq_ignore_ascii_case("delete") => {
            delete_location(&state, &user, &location_id).await
        }
        _ => Err(ApiError::MethodNotAllowed),
    }
}

async fn delete_location(
    state: &AppState,
    user: &AuthSession,
    location_id: &str,
) -> ApiResult<impl IntoResponse> {
    let notification = DeleteLocationService::new(user, state.locations.as_ref())
        .call(location_id)
        .await?;

    let session = state.update_session(&user.session_id, |session| {
        session.push_notification(notification.clone())
    })?;
    let cookie = state.session_cookie(&session);

    Ok(([(header::SET_COOKIE, cookie)], Redirect::to("/locations")))
}
