//! Route definitions for the `/audit` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::audit;
use crate::state::AppState;

/// Routes mounted at `/audit`.
///
/// ```text
/// POST   /hash                    -> register_event
/// GET    /verify/{hash}           -> verify_hash
/// GET    /chain/verify            -> verify_full_chain
/// GET    /entity/{entity_id}      -> entity_history
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/hash", post(audit::register_event))
        .route("/verify/{hash}", get(audit::verify_hash))
        .route("/chain/verify", get(audit::verify_full_chain))
        .route("/entity/{entity_id}", get(audit::entity_history))
}
