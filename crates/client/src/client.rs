//! HTTP client for the Gemelli REST API.
//!
//! Every call is a single request: no retries, no timeout, no caching.
//! Bodies are read as text first so HTML error pages and empty bodies can
//! be told apart from JSON.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::base_url::base_url_from_env;
use crate::error::ClientError;
use crate::token_store::{TokenStore, ACCESS_TOKEN_KEY};

/// Authenticated JSON client bound to one API base URL.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenStore>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, tokens)
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(
        http: reqwest::Client,
        base_url: impl Into<String>,
        tokens: Arc<dyn TokenStore>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            tokens,
        }
    }

    /// Base URL from `PUBLIC_API_URL` / `GEMELLI_PAGE_ORIGIN`.
    pub fn from_env(tokens: Arc<dyn TokenStore>) -> Self {
        Self::new(base_url_from_env(), tokens)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    /// Send one request and interpret the response.
    ///
    /// Returns `None` for 204 responses and empty bodies.
    pub async fn fetch(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<Option<Value>, ClientError> {
        let url = format!("{}{}", self.base_url, endpoint);

        let mut request = self
            .http
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = self.tokens.get(ACCESS_TOKEN_KEY)? {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        if let Some(body) = body {
            request = request.body(body.to_string());
        }

        tracing::debug!(%method, %url, "API request");
        let response = request.send().await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let text = response.text().await?;

        let result = interpret_response(&url, status, &content_type, &text);
        if let Err(err) = &result {
            tracing::debug!(%url, status = status.as_u16(), error = %err, "API request failed");
        }
        result
    }

    // ---- typed helpers used by the endpoint groups ----

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
    ) -> Result<T, ClientError> {
        let value = self.fetch(Method::GET, endpoint, None).await?;
        decode(value)
    }

    pub(crate) async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let body = serde_json::to_value(body).map_err(|_| ClientError::InvalidBody)?;
        let value = self.fetch(method, endpoint, Some(&body)).await?;
        decode(value)
    }

    /// Send a request whose response body is ignored.
    pub(crate) async fn send_empty(
        &self,
        method: Method,
        endpoint: &str,
    ) -> Result<(), ClientError> {
        self.fetch(method, endpoint, None).await?;
        Ok(())
    }
}

fn decode<T: DeserializeOwned>(value: Option<Value>) -> Result<T, ClientError> {
    serde_json::from_value(value.unwrap_or(Value::Null)).map_err(|e| {
        tracing::debug!(error = %e, "Unexpected response shape");
        ClientError::InvalidBody
    })
}

/// Turn a raw response into a JSON value or an error.
///
/// Rules, in order: HTML bodies are a configuration error; non-2xx statuses
/// become [`ClientError::Status`]; 204 or an empty body yields `None`;
/// anything else must parse as JSON.
pub fn interpret_response(
    url: &str,
    status: StatusCode,
    content_type: &str,
    text: &str,
) -> Result<Option<Value>, ClientError> {
    let trimmed = text.trim();
    let is_html = content_type.contains("text/html")
        || trimmed.starts_with("<!DOCTYPE")
        || trimmed.starts_with("<html");
    if is_html {
        return Err(ClientError::HtmlResponse {
            url: url.to_string(),
        });
    }

    if !status.is_success() {
        return Err(ClientError::Status {
            status,
            message: error_detail(status, text),
        });
    }

    if status == StatusCode::NO_CONTENT || text.is_empty() {
        return Ok(None);
    }

    serde_json::from_str(text)
        .map(Some)
        .map_err(|_| ClientError::InvalidBody)
}

/// Message for a failed response: the first truthy `detail`, `message` or
/// `error` field of a JSON body, else the status text, else the raw body.
fn error_detail(status: StatusCode, text: &str) -> String {
    let status_text = status.canonical_reason().unwrap_or_default();

    let detail = match serde_json::from_str::<Value>(text) {
        Ok(parsed) => ["detail", "message", "error"]
            .iter()
            .find_map(|key| message_field(parsed.get(key)?))
            .unwrap_or_else(|| status_text.to_string()),
        Err(_) if status_text.is_empty() => text.to_string(),
        Err(_) => status_text.to_string(),
    };

    if detail.is_empty() {
        format!("HTTP error! status: {}", status.as_u16())
    } else {
        detail
    }
}

fn message_field(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    const URL: &str = "http://localhost:8000/tickets";

    fn interpret(
        status: u16,
        content_type: &str,
        body: &str,
    ) -> Result<Option<Value>, ClientError> {
        interpret_response(URL, StatusCode::from_u16(status).unwrap(), content_type, body)
    }

    #[test]
    fn no_content_is_none() {
        assert_matches!(interpret(204, "", ""), Ok(None));
        assert_matches!(interpret(200, "application/json", ""), Ok(None));
    }

    #[test]
    fn json_body_is_parsed() {
        let value = interpret(200, "application/json", r#"{"data": []}"#).unwrap();
        assert_eq!(value, Some(json!({"data": []})));
    }

    #[test]
    fn html_is_a_configuration_error() {
        let err = interpret(200, "text/html; charset=utf-8", "<p>hi</p>").unwrap_err();
        assert_matches!(&err, ClientError::HtmlResponse { url } if url == URL);
        assert!(err.to_string().contains("PUBLIC_API_URL"));
        assert!(err.to_string().ends_with(&format!("({URL}).")));

        assert_matches!(
            interpret(404, "", "  <!DOCTYPE html><html></html>"),
            Err(ClientError::HtmlResponse { .. })
        );
        assert_matches!(interpret(200, "", "<html>"), Err(ClientError::HtmlResponse { .. }));
    }

    #[test]
    fn error_prefers_detail_then_message() {
        let err = interpret(400, "application/json", r#"{"detail": "Nope", "message": "x"}"#)
            .unwrap_err();
        assert_eq!(err.to_string(), "Nope");

        let err = interpret(409, "application/json", r#"{"message": "Ya existe"}"#).unwrap_err();
        assert_eq!(err.to_string(), "Ya existe");
        assert_eq!(err.status(), Some(StatusCode::CONFLICT));
    }

    #[test]
    fn error_envelope_field_is_used_last() {
        let err = interpret(
            403,
            "application/json",
            r#"{"error": "Permisos insuficientes", "code": "FORBIDDEN"}"#,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Permisos insuficientes");
    }

    #[test]
    fn non_json_error_uses_status_text() {
        let err = interpret(500, "text/plain", "boom").unwrap_err();
        assert_eq!(err.to_string(), "Internal Server Error");
    }

    #[test]
    fn json_without_known_fields_uses_status_text() {
        let err = interpret(422, "application/json", r#"{"errors": []}"#).unwrap_err();
        assert_eq!(err.to_string(), "Unprocessable Entity");
    }

    #[test]
    fn unknown_status_falls_back_to_body_then_code() {
        let err = interpret(599, "text/plain", "upstream exploded").unwrap_err();
        assert_eq!(err.to_string(), "upstream exploded");

        let err = interpret(599, "text/plain", "").unwrap_err();
        assert_eq!(err.to_string(), "HTTP error! status: 599");
    }

    #[test]
    fn falsy_fields_are_skipped() {
        let err = interpret(
            400,
            "application/json",
            r#"{"detail": 0, "message": "", "error": "Datos inválidos"}"#,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Datos inválidos");

        let err = interpret(400, "application/json", r#"{"detail": 0.0, "message": false}"#)
            .unwrap_err();
        assert_eq!(err.to_string(), "Bad Request");

        let err = interpret(400, "application/json", r#"{"detail": 7}"#).unwrap_err();
        assert_eq!(err.to_string(), "7");
    }

    #[test]
    fn non_string_detail_is_serialized() {
        let err = interpret(422, "application/json", r#"{"detail": [{"loc": ["body"]}]}"#)
            .unwrap_err();
        assert_eq!(err.to_string(), r#"[{"loc":["body"]}]"#);
    }

    #[test]
    fn unparseable_success_body() {
        assert_matches!(
            interpret(200, "application/json", "{oops"),
            Err(ClientError::InvalidBody)
        );
    }
}
