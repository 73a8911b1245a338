//! Dashboard loader

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;
use shelf_core::pagination::append_to_meta_title;
use shelf_services::{DashboardData, DashboardService};

use crate::error::ApiResult;
use crate::extractors::{AppState, RequireAuth};

#[derive(Debug, Serialize)]
pub struct DashboardPage {
    pub title: String,
    #[serde(flatten)]
    pub data: DashboardData,
}

/// GET /dashboard
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> ApiResult<Json<DashboardPage>> {
    let data = DashboardService::new(&user, state.assets.as_ref())
        .monthly_totals(Utc::now())
        .await?;

    Ok(Json(DashboardPage {
        title: append_to_meta_title(Some("Dashboard"), &state.config.app_title),
        data,
    }))
}
