//! HTTP client for the identity service's auth endpoints.
//!
//! Admin calls authenticate with the service key sent both as `apikey` and
//! as a bearer token.

use async_trait::async_trait;
use gemelli_core::types::DbId;
use serde::de::DeserializeOwned;

use super::{
    IdentityError, IdentityProvider, IdentitySettings, IdentityUpdate, IdentityUser, NewIdentity,
    SessionTokens,
};

pub struct SupabaseAuth {
    client: reqwest::Client,
    settings: IdentitySettings,
}

impl SupabaseAuth {
    pub fn new(settings: IdentitySettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            settings,
        }
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, settings: IdentitySettings) -> Self {
        Self { client, settings }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1{path}", self.settings.url)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.settings.service_key)
            .bearer_auth(&self.settings.service_key)
    }

    // ---- private helpers ----

    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, IdentityError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(IdentityError::Api {
                status: status.as_u16(),
                message: error_message(&body, status.as_u16()),
            });
        }
        Ok(response)
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, IdentityError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    async fn check_status(response: reqwest::Response) -> Result<(), IdentityError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

/// Pull the human-readable message out of an error body. The service uses
/// `msg`, `message`, `error_description` or `error` depending on endpoint.
pub fn error_message(body: &str, status: u16) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["msg", "message", "error_description", "error"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                if !text.is_empty() {
                    return text.to_string();
                }
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("Identity service error ({status})")
    } else {
        trimmed.to_string()
    }
}

#[async_trait]
impl IdentityProvider for SupabaseAuth {
    async fn create_user(&self, input: &NewIdentity) -> Result<IdentityUser, IdentityError> {
        let response = self
            .authorized(self.client.post(self.endpoint("/admin/users")))
            .json(input)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    async fn update_user(&self, id: DbId, update: &IdentityUpdate) -> Result<(), IdentityError> {
        let response = self
            .authorized(self.client.put(self.endpoint(&format!("/admin/users/{id}"))))
            .json(update)
            .send()
            .await?;
        Self::check_status(response).await
    }

    async fn delete_user(&self, id: DbId) -> Result<(), IdentityError> {
        let response = self
            .authorized(self.client.delete(self.endpoint(&format!("/admin/users/{id}"))))
            .send()
            .await?;
        Self::check_status(response).await
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SessionTokens, IdentityError> {
        let body = serde_json::json!({ "email": email, "password": password });
        let response = self
            .authorized(self.client.post(self.endpoint("/token?grant_type=password")))
            .json(&body)
            .send()
            .await?;
        Self::parse_response(response).await
    }
}
