//! Resolution of the REST API base URL.
//!
//! The result depends on the configured `PUBLIC_API_URL` and, when the
//! client runs behind a web origin, on that origin's host.

use reqwest::Url;

/// Base URL of a locally running API server.
pub const LOCAL_API_URL: &str = "http://localhost:8000";

/// The origin the client is served from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLocation {
    /// Scheme, host and port, e.g. `https://gemelli.vercel.app`.
    pub origin: String,
    pub hostname: String,
}

impl PageLocation {
    pub fn new(origin: impl Into<String>, hostname: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            hostname: hostname.into(),
        }
    }

    /// Parse an origin or full URL. Returns `None` for anything without a host.
    pub fn parse(raw: &str) -> Option<Self> {
        let url = Url::parse(raw.trim()).ok()?;
        let hostname = url.host_str()?.to_string();
        Some(Self {
            origin: url.origin().ascii_serialization(),
            hostname,
        })
    }
}

fn strip_trailing_slash(value: &str) -> &str {
    value.strip_suffix('/').unwrap_or(value)
}

fn resolve_for_host(origin: &str, hostname: &str) -> String {
    let origin = strip_trailing_slash(origin);
    if hostname.ends_with("vercel.app") {
        return format!("{origin}/api");
    }
    if hostname == "localhost" || hostname == "127.0.0.1" {
        return LOCAL_API_URL.to_string();
    }
    format!("{origin}/api")
}

/// Pick the API base URL.
///
/// A configured URL wins unless it points at the page origin itself, in
/// which case the per-host rule applies. Without configuration the page
/// origin decides, and without either the local server is assumed.
pub fn resolve_base_url(env_url: Option<&str>, page: Option<&PageLocation>) -> String {
    if let Some(env) = env_url.map(str::trim).filter(|v| !v.is_empty()) {
        let env = strip_trailing_slash(env);
        if let Some(page) = page {
            if env == strip_trailing_slash(&page.origin) {
                return resolve_for_host(&page.origin, &page.hostname);
            }
        }
        return env.to_string();
    }

    match page {
        Some(page) => resolve_for_host(&page.origin, &page.hostname),
        None => LOCAL_API_URL.to_string(),
    }
}

/// Resolve from `PUBLIC_API_URL` and the optional `GEMELLI_PAGE_ORIGIN`.
pub fn base_url_from_env() -> String {
    let env_url = std::env::var("PUBLIC_API_URL").ok();
    let page = std::env::var("GEMELLI_PAGE_ORIGIN")
        .ok()
        .and_then(|raw| PageLocation::parse(&raw));
    resolve_base_url(env_url.as_deref(), page.as_ref())
}
