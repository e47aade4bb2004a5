use std::sync::Arc;

use crate::config::ServerConfig;
use crate::identity::IdentityProvider;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: gemelli_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Account management at the identity service.
    pub identity: Arc<dyn IdentityProvider>,
}
