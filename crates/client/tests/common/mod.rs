#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::http::HeaderMap;
use axum::Router;
use gemelli_client::token_store::MemoryTokenStore;
use gemelli_client::ApiClient;
use serde_json::Value;

pub const TOKEN: &str = "test-access-token";

/// Serve `app` on an ephemeral local port and return its base URL.
pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Client holding [`TOKEN`].
pub fn client(base_url: &str) -> ApiClient {
    ApiClient::new(base_url, Arc::new(MemoryTokenStore::with_token(TOKEN)))
}

pub fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// One request seen by a stub.
#[derive(Debug, Clone)]
pub struct Seen {
    pub method: String,
    pub path: String,
    pub body: Option<Value>,
}

/// Requests recorded by a stub, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<Seen>>>);

impl Recorder {
    pub fn push(&self, method: &str, path: &str, body: Option<Value>) {
        self.0.lock().unwrap().push(Seen {
            method: method.to_string(),
            path: path.to_string(),
            body,
        });
    }

    pub fn all(&self) -> Vec<Seen> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.all()
            .iter()
            .filter(|s| s.method == method && s.path == path)
            .count()
    }

    pub fn last_body(&self, method: &str) -> Option<Value> {
        self.all()
            .into_iter()
            .rev()
            .find(|s| s.method == method)
            .and_then(|s| s.body)
    }
}
