//! Session helper for the backend service's auth API.
//!
//! One [`AuthClient`] is built lazily from the environment and cached. When
//! the configured URL or anon key changes the cached client is replaced
//! wholesale on the next access.

use std::sync::{Arc, Mutex, PoisonError};

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ClientError;
use crate::token_store::{TokenStore, ACCESS_TOKEN_KEY};

pub const MISSING_ENV_MESSAGE: &str = "Supabase no está configurado. Define PUBLIC_SUPABASE_URL y \
     PUBLIC_SUPABASE_ANON_KEY (o sus equivalentes SUPABASE_URL y SUPABASE_ANON_KEY para builds).";

/// Reads one configuration value by name.
pub type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Backend-service URL and public anon key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub url: String,
    pub anon_key: String,
}

impl SessionConfig {
    /// `PUBLIC_SUPABASE_URL` ?? `SUPABASE_URL` and
    /// `PUBLIC_SUPABASE_ANON_KEY` ?? `SUPABASE_ANON_KEY`.
    ///
    /// The first variable that is set wins even if it is empty; an empty
    /// winner means unconfigured.
    pub fn resolve(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let url = lookup("PUBLIC_SUPABASE_URL").or_else(|| lookup("SUPABASE_URL"))?;
        let anon_key =
            lookup("PUBLIC_SUPABASE_ANON_KEY").or_else(|| lookup("SUPABASE_ANON_KEY"))?;
        if url.trim().is_empty() || anon_key.trim().is_empty() {
            return None;
        }
        Some(Self {
            url: url.trim_end_matches('/').to_string(),
            anon_key,
        })
    }
}

/// Account returned by `GET /auth/v1/user`.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

/// Tokens returned by the password grant.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionTokens {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub user: Option<SessionUser>,
}

/// Thin client over `{url}/auth/v1`, authenticated with the anon key.
pub struct AuthClient {
    http: reqwest::Client,
    config: SessionConfig,
}

impl AuthClient {
    pub fn new(config: SessionConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(http: reqwest::Client, config: SessionConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1{path}", self.config.url)
    }

    pub async fn get_user(&self, access_token: &str) -> Result<SessionUser, ClientError> {
        let response = self
            .http
            .get(self.endpoint("/user"))
            .header("apikey", &self.config.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SessionTokens, ClientError> {
        let body = serde_json::json!({ "email": email, "password": password });
        let response = self
            .http
            .post(self.endpoint("/token?grant_type=password"))
            .header("apikey", &self.config.anon_key)
            .json(&body)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    pub async fn sign_out(&self, access_token: &str) -> Result<(), ClientError> {
        let response = self
            .http
            .post(self.endpoint("/logout"))
            .header("apikey", &self.config.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    // ---- private helpers ----

    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status,
                message: auth_error_message(&body, status),
            });
        }
        Ok(response)
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let response = Self::ensure_success(response).await?;
        response.json::<T>().await.map_err(|e| {
            tracing::debug!(error = %e, "Unexpected auth response shape");
            ClientError::InvalidBody
        })
    }
}

/// The auth API reports errors under `msg`, `message`, `error_description`
/// or `error`.
fn auth_error_message(body: &str, status: StatusCode) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["msg", "message", "error_description", "error"] {
            if let Some(text) = value.get(key).and_then(|v| v.as_str()) {
                if !text.is_empty() {
                    return text.to_string();
                }
            }
        }
    }
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()))
}

/// Owns the cached [`AuthClient`] and the stored bearer token.
pub struct SessionManager {
    tokens: Arc<dyn TokenStore>,
    lookup: EnvLookup,
    cached: Mutex<Option<(SessionConfig, Arc<AuthClient>)>>,
}

impl SessionManager {
    pub fn new(tokens: Arc<dyn TokenStore>, lookup: EnvLookup) -> Self {
        Self {
            tokens,
            lookup,
            cached: Mutex::new(None),
        }
    }

    /// Read configuration from the process environment on every access.
    pub fn from_env(tokens: Arc<dyn TokenStore>) -> Self {
        Self::new(tokens, Arc::new(|key: &str| std::env::var(key).ok()))
    }

    /// The cached client, rebuilt if the configuration changed; `None` when
    /// unconfigured.
    pub fn try_client(&self) -> Option<Arc<AuthClient>> {
        let config = SessionConfig::resolve(|key| (self.lookup)(key))?;
        let mut cached = self.cached.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((current, client)) = cached.as_ref() {
            if *current == config {
                return Some(Arc::clone(client));
            }
        }
        tracing::debug!(url = %config.url, "Building auth client");
        let client = Arc::new(AuthClient::new(config.clone()));
        *cached = Some((config, Arc::clone(&client)));
        Some(client)
    }

    pub fn client(&self) -> Result<Arc<AuthClient>, ClientError> {
        self.try_client()
            .ok_or_else(|| ClientError::MissingConfig(MISSING_ENV_MESSAGE.to_string()))
    }

    /// The backend-service user for the stored token, or `None` when there
    /// is no token or the service rejects it.
    pub async fn current_user(&self) -> Result<Option<SessionUser>, ClientError> {
        let Some(token) = self.tokens.get(ACCESS_TOKEN_KEY)? else {
            return Ok(None);
        };
        match self.client()?.get_user(&token).await {
            Ok(user) => Ok(Some(user)),
            Err(ClientError::Status { status, .. })
                if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN =>
            {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn is_authenticated(&self) -> Result<bool, ClientError> {
        Ok(self.current_user().await?.is_some())
    }

    /// Password grant; the access token is stored for later API calls.
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SessionTokens, ClientError> {
        let tokens = self
            .client()?
            .sign_in_with_password(email.trim(), password)
            .await?;
        self.tokens.set(ACCESS_TOKEN_KEY, &tokens.access_token)?;
        tracing::info!(email = %email.trim(), "Signed in");
        Ok(tokens)
    }

    /// Revoke the session at the backend service, then forget the token.
    pub async fn sign_out(&self) -> Result<(), ClientError> {
        let client = self.client()?;
        if let Some(token) = self.tokens.get(ACCESS_TOKEN_KEY)? {
            client.sign_out(&token).await?;
        }
        self.tokens.remove(ACCESS_TOKEN_KEY)?;
        Ok(())
    }
}
