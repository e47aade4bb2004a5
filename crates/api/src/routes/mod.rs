pub mod admin;
pub mod audit;
pub mod auth;
pub mod backups;
pub mod dashboard;
pub mod health;
pub mod inventory;
pub mod tickets;

use axum::Router;

use crate::state::AppState;

/// Build the API route tree. Routes are served at the root, without a
/// version prefix.
///
/// Route hierarchy:
///
/// ```text
/// /                                   service banner (public)
/// /health                             health probe (public)
///
/// /auth/login                         password login (public)
/// /auth/register                      self-registration (public)
/// /auth/profile                       current profile (auth)
///
/// /admin/users                        list, create (LIDER_TI)
/// /admin/users/{id}                   partial update (LIDER_TI)
/// /admin/org-units                    list (LIDER_TI)
///
/// /inventory/devices                  list (auth), create (inventory manager)
/// /inventory/devices/{id}             update (inventory manager)
/// /inventory/devices/{id}/cv          hoja de vida (auth)
/// /inventory/permissions              list, grant (LIDER_TI)
/// /inventory/permissions/check        caller's access (auth)
/// /inventory/permissions/{id}         revoke (LIDER_TI)
///
/// /backups                            list (auth), register (TI)
///
/// /tickets                            list, open (auth)
/// /tickets/{id}                       detail (auth), update (TI)
/// /tickets/{id}/comments              comment (auth)
///
/// /dashboard/metrics                  totals (auth)
///
/// /audit/hash                         register event (TI)
/// /audit/verify/{hash}                verify one block (public)
/// /audit/chain/verify                 verify the chain (TI)
/// /audit/entity/{entity_id}           entity history (auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
        .nest("/inventory", inventory::router())
        .nest("/backups", backups::router())
        .nest("/tickets", tickets::router())
        .nest("/dashboard", dashboard::router())
        .nest("/audit", audit::router())
}
