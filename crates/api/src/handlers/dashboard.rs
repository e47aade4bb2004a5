//! Handler for `/dashboard/metrics`.

use axum::extract::State;
use axum::Json;
use gemelli_core::dashboard::DashboardMetrics;
use gemelli_db::repositories::DashboardRepo;

use crate::error::AppResult;
use crate::middleware::auth::CurrentUser;
use crate::state::AppState;

/// GET /dashboard/metrics
///
/// Device and ticket totals are limited to the caller's org unit unless
/// they are `LIDER_TI`; the backup total is global.
pub async fn metrics(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<DashboardMetrics>> {
    let metrics = DashboardRepo::metrics(&state.pool, user.org_scope()).await?;
    Ok(Json(metrics))
}
