//! Client side of Gemelli IT: the REST API client, the identity-service
//! session helper, and the state behind the admin screens.

pub mod api;
pub mod base_url;
pub mod client;
pub mod error;
pub mod screens;
pub mod session;
pub mod token_store;

pub use client::ApiClient;
pub use error::{ClientError, TokenStoreError};
