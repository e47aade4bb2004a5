//! Route definitions for the `/inventory` resource.

use axum::routing::{delete, get, put};
use axum::Router;

use crate::handlers::{devices, permissions};
use crate::state::AppState;

/// Routes mounted at `/inventory`.
///
/// ```text
/// GET    /devices                 -> list_devices
/// POST   /devices                 -> create_device
/// PUT    /devices/{id}            -> update_device
/// GET    /devices/{id}/cv         -> get_device_cv
/// GET    /permissions             -> list_permissions
/// POST   /permissions             -> grant_permission
/// GET    /permissions/check       -> check_permission
/// DELETE /permissions/{id}        -> revoke_permission
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/devices",
            get(devices::list_devices).post(devices::create_device),
        )
        .route("/devices/{id}", put(devices::update_device))
        .route("/devices/{id}/cv", get(devices::get_device_cv))
        .route(
            "/permissions",
            get(permissions::list_permissions).post(permissions::grant_permission),
        )
        .route("/permissions/check", get(permissions::check_permission))
        .route("/permissions/{id}", delete(permissions::revoke_permission))
}
