//! Authentication primitives.
//!
//! - [`jwt`] -- validation of the identity service's HS256 access tokens.

pub mod jwt;
