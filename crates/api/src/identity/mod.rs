//! Identity-service integration.
//!
//! Accounts (email + password) live in the hosted identity service; the
//! `users` table only mirrors their profile. Handlers talk to the service
//! through the [`IdentityProvider`] trait so tests can substitute a fake.
//!
//! - [`config`] -- resolves URL and service key from the environment.
//! - [`supabase`] -- the HTTP implementation.

pub mod config;
pub mod supabase;

use async_trait::async_trait;
use gemelli_core::types::DbId;
use serde::{Deserialize, Serialize};

pub use config::IdentitySettings;
pub use supabase::SupabaseAuth;

/// Errors from the identity service.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// No URL or service key was configured at startup.
    #[error("Supabase no está configurado correctamente")]
    NotConfigured,

    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("{message}")]
    Api {
        status: u16,
        /// Message extracted from the error body.
        message: String,
    },
}

/// An account as returned by the identity service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityUser {
    pub id: DbId,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

/// Body of an admin account creation.
#[derive(Debug, Clone, Serialize)]
pub struct NewIdentity {
    pub email: String,
    pub password: String,
    pub email_confirm: bool,
    pub user_metadata: serde_json::Value,
}

/// Admin account update. `None` fields are not sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IdentityUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_metadata: Option<serde_json::Value>,
}

impl IdentityUpdate {
    pub fn is_empty(&self) -> bool {
        self.password.is_none() && self.user_metadata.is_none()
    }
}

/// Tokens issued by a password grant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub user: IdentityUser,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn create_user(&self, input: &NewIdentity) -> Result<IdentityUser, IdentityError>;

    async fn update_user(&self, id: DbId, update: &IdentityUpdate) -> Result<(), IdentityError>;

    async fn delete_user(&self, id: DbId) -> Result<(), IdentityError>;

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SessionTokens, IdentityError>;
}

/// Stand-in used when the service is not configured; every call fails with
/// [`IdentityError::NotConfigured`].
pub struct UnconfiguredIdentity;

#[async_trait]
impl IdentityProvider for UnconfiguredIdentity {
    async fn create_user(&self, _input: &NewIdentity) -> Result<IdentityUser, IdentityError> {
        Err(IdentityError::NotConfigured)
    }

    async fn update_user(&self, _id: DbId, _update: &IdentityUpdate) -> Result<(), IdentityError> {
        Err(IdentityError::NotConfigured)
    }

    async fn delete_user(&self, _id: DbId) -> Result<(), IdentityError> {
        Err(IdentityError::NotConfigured)
    }

    async fn sign_in_with_password(
        &self,
        _email: &str,
        _password: &str,
    ) -> Result<SessionTokens, IdentityError> {
        Err(IdentityError::NotConfigured)
    }
}

/// Build the provider for `settings`, falling back to [`UnconfiguredIdentity`].
pub fn provider_from_settings(
    settings: Option<&IdentitySettings>,
) -> std::sync::Arc<dyn IdentityProvider> {
    match settings {
        Some(settings) => std::sync::Arc::new(SupabaseAuth::new(settings.clone())),
        None => std::sync::Arc::new(UnconfiguredIdentity),
    }
}
