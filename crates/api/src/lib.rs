//! Gemelli IT API server library.
//!
//! Exposes the building blocks (config, state, error handling, identity
//! client, routes) so integration tests and the binary entrypoint can both
//! access them.

pub mod audit_log;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
