//! Account settings

use axum::{
    extract::{Multipart, State},
    Form, Json,
};
use chrono::Utc;
use serde::Serialize;
use shelf_contracts::users::UpdateUserForm;
use shelf_core::error::{ShelfError, ValidationErrors};
use shelf_core::pagination::append_to_meta_title;
use shelf_models::User;
use shelf_services::{ReplaceProfilePictureService, UpdateUserService};
use shelf_storage::resolve_content_type;
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::extractors::{AppState, RequireAuth};

/// Multipart field carrying the picture
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct SettingsPage {
    pub title: String,
    pub user: User,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePictureResponse {
    pub url: String,
    pub updated_user: User,
}

/// GET /settings
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> ApiResult<Json<SettingsPage>> {
    let current = state
        .users
        .find_by_id(&user.user_id)
        .await
        .map_err(ShelfError::from)?
        .ok_or_else(|| ApiError::not_found("User", &user.user_id))?;

    Ok(Json(SettingsPage {
        title: append_to_meta_title(Some("Settings"), &state.config.app_title),
        user: current,
    }))
}

/// POST /settings
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<UpdateUserForm>,
) -> ApiResult<Json<User>> {
    let updated = UpdateUserService::new(&user, state.users.as_ref())
        .call(form)
        .await?;
    Ok(Json(updated))
}

/// POST /settings/profile-picture
pub async fn upload_profile_picture(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    mut multipart: Multipart,
) -> ApiResult<Json<ProfilePictureResponse>> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let content_type = resolve_content_type(field.content_type(), field.file_name());
        debug!(user_id = %user.user_id, content_type = %content_type, "Receiving profile picture");

        let updated = ReplaceProfilePictureService::new(&user, state.users.as_ref(), &state.pictures)
            .call(field, &content_type, Utc::now())
            .await?;

        let url = updated
            .profile_picture
            .clone()
            .ok_or_else(|| ApiError::internal("profile picture missing after upload"))?;
        return Ok(Json(ProfilePictureResponse {
            url,
            updated_user: updated,
        }));
    }

    Err(ApiError::Validation(ValidationErrors::single(
        FILE_FIELD,
        "Please select a file",
    )))
}
