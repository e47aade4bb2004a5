//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{auth, registration};
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST   /login                   -> login
/// POST   /register                -> register
/// GET    /profile                 -> profile
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(registration::register))
        .route("/profile", get(auth::profile))
}
