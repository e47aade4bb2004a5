//! `SessionManager` against a stub of the backend service's auth API.

mod common;

use std::sync::{Arc, Mutex};

use assert_matches::assert_matches;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use gemelli_client::session::{EnvLookup, SessionManager};
use gemelli_client::token_store::{MemoryTokenStore, TokenStore, ACCESS_TOKEN_KEY};
use gemelli_client::ClientError;
use serde_json::{json, Value};
use uuid::Uuid;

use common::{bearer, serve, Recorder};

const ANON_KEY: &str = "anon-key";
const ISSUED: &str = "issued-access-token";

#[derive(Clone, Default)]
struct AuthStub {
    seen: Recorder,
    /// Status returned by `/logout`.
    logout_status: Arc<Mutex<Option<StatusCode>>>,
}

async fn token(
    State(stub): State<AuthStub>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    stub.seen.push("POST", "/auth/v1/token", Some(body.clone()));
    if headers.get("apikey").and_then(|v| v.to_str().ok()) != Some(ANON_KEY) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "No API key found in request" })),
        );
    }
    if body["password"] != "correcta123" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid login credentials",
            })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "access_token": ISSUED,
            "refresh_token": "refresh",
            "expires_in": 3600,
            "user": { "id": Uuid::nil(), "email": body["email"] },
        })),
    )
}

async fn user(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if bearer(&headers) == Some(format!("Bearer {ISSUED}")) {
        (
            StatusCode::OK,
            Json(json!({ "id": Uuid::nil(), "email": "ti@colegio.edu" })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "msg": "invalid JWT" })),
        )
    }
}

async fn logout(State(stub): State<AuthStub>, headers: HeaderMap) -> StatusCode {
    stub.seen
        .push("POST", "/auth/v1/logout", bearer(&headers).map(Value::String));
    stub.logout_status
        .lock()
        .unwrap()
        .unwrap_or(StatusCode::NO_CONTENT)
}

async fn start(stub: AuthStub) -> String {
    let app = Router::new()
        .route("/auth/v1/token", post(token))
        .route("/auth/v1/user", get(user))
        .route("/auth/v1/logout", post(logout))
        .with_state(stub);
    serve(app).await
}

fn manager(url: String, tokens: Arc<dyn TokenStore>) -> SessionManager {
    let lookup: EnvLookup = Arc::new(move |key: &str| match key {
        "PUBLIC_SUPABASE_URL" => Some(url.clone()),
        "PUBLIC_SUPABASE_ANON_KEY" => Some(ANON_KEY.to_string()),
        _ => None,
    });
    SessionManager::new(tokens, lookup)
}

#[tokio::test]
async fn sign_in_stores_the_access_token() {
    let stub = AuthStub::default();
    let url = start(stub.clone()).await;
    let tokens: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
    let session = manager(url, Arc::clone(&tokens));

    assert!(!session.is_authenticated().await.unwrap());

    let issued = session
        .sign_in_with_password(" ti@colegio.edu ", "correcta123")
        .await
        .unwrap();
    assert_eq!(issued.access_token, ISSUED);
    assert_eq!(tokens.get(ACCESS_TOKEN_KEY).unwrap().as_deref(), Some(ISSUED));
    assert_eq!(
        stub.seen.last_body("POST").unwrap()["email"],
        "ti@colegio.edu"
    );

    assert!(session.is_authenticated().await.unwrap());
    let current = session.current_user().await.unwrap().unwrap();
    assert_eq!(current.email.as_deref(), Some("ti@colegio.edu"));
}

#[tokio::test]
async fn rejected_credentials_store_nothing() {
    let url = start(AuthStub::default()).await;
    let tokens: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
    let session = manager(url, Arc::clone(&tokens));

    let err = session
        .sign_in_with_password("ti@colegio.edu", "incorrecta")
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    assert_eq!(err.to_string(), "Invalid login credentials");
    assert_eq!(tokens.get(ACCESS_TOKEN_KEY).unwrap(), None);
}

#[tokio::test]
async fn stale_token_is_not_a_session() {
    let url = start(AuthStub::default()).await;
    let session = manager(url, Arc::new(MemoryTokenStore::with_token("expired")));

    assert!(!session.is_authenticated().await.unwrap());
    assert!(session.current_user().await.unwrap().is_none());
}

#[tokio::test]
async fn sign_out_revokes_then_clears_token() {
    let stub = AuthStub::default();
    let url = start(stub.clone()).await;
    let tokens: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::with_token(ISSUED));
    let session = manager(url, Arc::clone(&tokens));

    session.sign_out().await.unwrap();

    assert_eq!(stub.seen.count("POST", "/auth/v1/logout"), 1);
    assert_eq!(
        stub.seen.last_body("POST"),
        Some(Value::String(format!("Bearer {ISSUED}")))
    );
    assert_eq!(tokens.get(ACCESS_TOKEN_KEY).unwrap(), None);
    assert!(!session.is_authenticated().await.unwrap());
}

#[tokio::test]
async fn sign_out_failure_is_propagated() {
    let stub = AuthStub::default();
    *stub.logout_status.lock().unwrap() = Some(StatusCode::INTERNAL_SERVER_ERROR);
    let url = start(stub).await;
    let tokens: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::with_token(ISSUED));
    let session = manager(url, Arc::clone(&tokens));

    let err = session.sign_out().await.unwrap_err();
    assert_matches!(
        err,
        ClientError::Status { status, .. } if status == StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(tokens.get(ACCESS_TOKEN_KEY).unwrap().as_deref(), Some(ISSUED));
}

#[tokio::test]
async fn unconfigured_session_fails_loudly() {
    let session = SessionManager::new(
        Arc::new(MemoryTokenStore::with_token(ISSUED)),
        Arc::new(|_: &str| None),
    );
    let err = session.sign_out().await.unwrap_err();
    assert_matches!(&err, ClientError::MissingConfig(_));
    assert!(err.to_string().contains("PUBLIC_SUPABASE_URL"));
}
