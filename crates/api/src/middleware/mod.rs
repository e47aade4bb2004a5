//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the token subject from a JWT Bearer token.
//! - [`auth::CurrentUser`] -- Loads the caller's profile and normalized role.
//! - [`rbac::RequireGlobalAdmin`] -- Requires `LIDER_TI`.
//! - [`rbac::RequireItStaff`] -- Requires `TI` or `LIDER_TI`.
//! - [`rbac::RequireInventoryManager`] -- Requires an inventory role or grant.

pub mod auth;
pub mod rbac;
