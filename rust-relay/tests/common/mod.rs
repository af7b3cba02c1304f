//! Shared helpers for relay integration tests.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use serde_json::Value;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use ticket_relay::web::{compute_signature, DigestAlgorithm, SIGNATURE_HEADER};
use ticket_relay::{create_router, AppState, Config};

pub const SECRET: &str = "test-webhook-secret";
pub const TICKET_BASE_URL: &str = "https://tickets.example/#ticket/zoom/";

/// Configuration pointing every target at `base`.
pub fn test_config(base: &str) -> Config {
    let base = base.to_string();
    Config::from_lookup(|name| match name {
        "WEBHOOK_SECRET" => Some(SECRET.to_string()),
        "REPORTS_WEBHOOK" => Some(format!("{}/reports", base)),
        "CONTACTS_WEBHOOK" => Some(format!("{}/contacts", base)),
        "WIKI_WEBHOOK" => Some(format!("{}/wiki", base)),
        "MODELS_WEBHOOK" => Some(format!("{}/models", base)),
        "APPLICATIONS_WEBHOOK" => Some(format!("{}/applications", base)),
        "TICKET_BASE_URL" => Some(TICKET_BASE_URL.to_string()),
        _ => None,
    })
    .expect("test configuration is complete")
}

/// Router wired to a mock chat service answering every POST with `status`.
pub async fn setup_with_status(status: u16) -> (MockServer, Router) {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(status))
        .mount(&server)
        .await;

    let app = create_router(AppState::new(test_config(&server.uri())));
    (server, app)
}

pub async fn setup() -> (MockServer, Router) {
    setup_with_status(204).await
}

/// POST `body` to `path` with a valid sha256 signature.
pub fn signed_request(path: &str, body: &str) -> Request<Body> {
    let signature = compute_signature(body.as_bytes(), SECRET.as_bytes(), DigestAlgorithm::Sha256);
    request_with_signature(path, body, Some(&signature))
}

pub fn request_with_signature(path: &str, body: &str, signature: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header("content-type", "application/json");

    if let Some(signature) = signature {
        builder = builder.header(SIGNATURE_HEADER, signature);
    }

    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Bodies the mock chat service received on `path`, in arrival order.
pub async fn delivered(server: &MockServer, path: &str) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.url.path() == path)
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect()
}

pub async fn delivery_count(server: &MockServer) -> usize {
    server.received_requests().await.unwrap_or_default().len()
}

/// `(name, value)` pairs of the first embed in a delivered message.
pub fn field_pairs(message: &Value) -> Vec<(String, String)> {
    message["embeds"][0]["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| {
            (
                f["name"].as_str().unwrap().to_string(),
                f["value"].as_str().unwrap().to_string(),
            )
        })
        .collect()
}
