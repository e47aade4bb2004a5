use axum::routing::get;
use axum::Router;

use crate::handlers::health;
use crate::state::AppState;

/// Banner and health probe, mounted at the root.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
}
