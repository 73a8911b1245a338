//! Flash notifications queued by earlier actions

use axum::{extract::State, Json};
use shelf_models::Notification;

use crate::error::ApiResult;
use crate::extractors::{AppState, RequireAuth};

/// GET /notifications
///
/// Each notification is returned once.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> ApiResult<Json<Vec<Notification>>> {
    let mut notifications = Vec::new();
    state.update_session(&user.session_id, |session| {
        notifications = session.take_notifications()
    })?;
    Ok(Json(notifications))
}
