//! Dashboard loader
//!
//! Total assets plus the cumulative count at the end of each of the last
//! twelve months, oldest first.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;
use shelf_auth::{require_permission, AuthSession};
use shelf_core::{ShelfError, ShelfResult};
use shelf_db::AssetStore;
use shelf_models::{MonthlyAssetTotal, PermissionAction, PermissionEntity};
use tracing::debug;

use crate::permission_props;

const MONTHS: i32 = 12;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub total_assets: i64,
    pub total_assets_at_end_of_each_month: Vec<MonthlyAssetTotal>,
}

pub struct DashboardService<'a> {
    user: &'a AuthSession,
    assets: &'a dyn AssetStore,
}

impl<'a> DashboardService<'a> {
    pub fn new(user: &'a AuthSession, assets: &'a dyn AssetStore) -> Self {
        Self { user, assets }
    }

    pub async fn monthly_totals(&self, now: DateTime<Utc>) -> ShelfResult<DashboardData> {
        require_permission(&permission_props(
            self.user,
            PermissionAction::Read,
            PermissionEntity::Asset,
        ))?;

        let user_id = self.user.user_id.as_str();
        let current = now.year() * 12 + now.month0() as i32;
        let first = current - (MONTHS - 1);
        let start = month_start(first)?;

        let total_assets = self.assets.count_for_user(user_id).await?;
        let mut running = self.assets.count_created_before(user_id, start).await?;
        let dates = self.assets.creation_dates_since(user_id, start).await?;

        let mut series = Vec::with_capacity(MONTHS as usize);
        let mut remaining = dates.iter().peekable();
        for index in first..=current {
            let end = month_start(index + 1)?;
            while remaining.next_if(|created| **created < end).is_some() {
                running += 1;
            }
            series.push(MonthlyAssetTotal {
                month: month_start(index)?.format("%b %Y").to_string(),
                total: running,
            });
        }

        debug!(user_id, total_assets, "Dashboard totals loaded");
        Ok(DashboardData {
            total_assets,
            total_assets_at_end_of_each_month: series,
        })
    }
}

/// First instant of the month with absolute index `year * 12 + month0`
fn month_start(index: i32) -> ShelfResult<DateTime<Utc>> {
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
        .ok_or_else(|| ShelfError::Internal(format!("month out of range: {year}-{month}")))
}
