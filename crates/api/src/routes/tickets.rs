//! Route definitions for the `/tickets` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::tickets;
use crate::state::AppState;

/// Routes mounted at `/tickets`.
///
/// ```text
/// GET    /                        -> list_tickets
/// POST   /                        -> create_ticket
/// GET    /{id}                    -> get_ticket
/// PUT    /{id}                    -> update_ticket
/// POST   /{id}/comments           -> add_comment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tickets::list_tickets).post(tickets::create_ticket))
        .route("/{id}", get(tickets::get_ticket).put(tickets::update_ticket))
        .route("/{id}/comments", post(tickets::add_comment))
}
