//! Route definitions for the `/admin` resource.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// All routes require `LIDER_TI` (enforced by handler extractors).
///
/// ```text
/// GET    /users                   -> list_users
/// POST   /users                   -> create_user
/// PATCH  /users/{id}              -> update_user
/// GET    /org-units               -> list_org_units
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::list_users).post(admin::create_user))
        .route("/users/{id}", patch(admin::update_user))
        .route("/org-units", get(admin::list_org_units))
}
