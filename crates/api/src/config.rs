use crate::auth::jwt::JwtConfig;
use crate::identity::IdentitySettings;

/// Placeholder used when `AUDIT_SECRET` is unset. Chains signed with it are
/// only trustworthy in development.
pub const DEFAULT_AUDIT_SECRET: &str = "change-this-secret-key-in-production";

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Bearer token validation.
    pub jwt: JwtConfig,
    /// HMAC key for audit chain signatures.
    pub audit_secret: String,
    /// Identity-service admin endpoint; `None` when not configured.
    pub identity: Option<IdentitySettings>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `8000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:4321`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `AUDIT_SECRET`         | development placeholder    |
    ///
    /// Identity-service settings are resolved by [`IdentitySettings::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:4321".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let audit_secret = std::env::var("AUDIT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| {
                tracing::warn!("AUDIT_SECRET not set, using the development placeholder");
                DEFAULT_AUDIT_SECRET.to_string()
            });

        let identity = IdentitySettings::from_env();
        if identity.is_none() {
            tracing::warn!("Identity service not configured; account operations will return 503");
        }

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            audit_secret,
            identity,
        }
    }
}
