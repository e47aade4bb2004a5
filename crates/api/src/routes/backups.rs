use axum::routing::get;
use axum::Router;

use crate::handlers::backups;
use crate::state::AppState;

/// Routes mounted at `/backups`.
///
/// ```text
/// GET    /                        -> list_backups
/// POST   /                        -> create_backup
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(backups::list_backups).post(backups::create_backup))
}
