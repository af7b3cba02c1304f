//! Signature admission tests at the HTTP boundary.

mod common;

use axum::http::{HeaderValue, StatusCode};
use tower::ServiceExt; // For `oneshot`

use common::{delivery_count, read_json, request_with_signature, setup, SECRET};
use ticket_relay::web::{compute_signature, DigestAlgorithm, SIGNATURE_HEADER};

const BODY: &str = r#"{"ticket":{"id":"42","customer":{"firstname":"Ann"}},"article":{"body":"hello"}}"#;

async fn status_for(signature: Option<&str>) -> (StatusCode, usize) {
    let (server, app) = setup().await;

    let response = app
        .oneshot(request_with_signature("/reports", BODY, signature))
        .await
        .unwrap();
    let status = response.status();

    if status != StatusCode::OK {
        assert_eq!(read_json(response).await["success"], false);
    }

    (status, delivery_count(&server).await)
}

#[tokio::test]
async fn test_missing_signature_is_forbidden() {
    assert_eq!(status_for(None).await, (StatusCode::FORBIDDEN, 0));
}

#[tokio::test]
async fn test_malformed_signature_is_bad_request() {
    assert_eq!(status_for(Some("garbage")).await, (StatusCode::BAD_REQUEST, 0));
}

#[tokio::test]
async fn test_unsupported_algorithm_is_bad_request() {
    assert_eq!(
        status_for(Some("md5=5d41402abc4b2a76b9719d911017c592")).await,
        (StatusCode::BAD_REQUEST, 0)
    );
}

#[tokio::test]
async fn test_signature_mismatch_is_forbidden() {
    let wrong = compute_signature(BODY.as_bytes(), b"another-secret", DigestAlgorithm::Sha256);
    assert_eq!(status_for(Some(&wrong)).await, (StatusCode::FORBIDDEN, 0));
}

#[tokio::test]
async fn test_sha1_signature_accepted() {
    let signature = compute_signature(BODY.as_bytes(), SECRET.as_bytes(), DigestAlgorithm::Sha1);
    assert_eq!(status_for(Some(&signature)).await, (StatusCode::OK, 1));
}

#[tokio::test]
async fn test_signature_covers_exact_body() {
    let signature = compute_signature(
        format!("{} ", BODY).as_bytes(),
        SECRET.as_bytes(),
        DigestAlgorithm::Sha256,
    );
    assert_eq!(status_for(Some(&signature)).await, (StatusCode::FORBIDDEN, 0));
}

#[tokio::test]
async fn test_non_ascii_signature_is_bad_request() {
    let (server, app) = setup().await;

    let mut request = request_with_signature("/reports", BODY, None);
    request.headers_mut().insert(
        SIGNATURE_HEADER,
        HeaderValue::from_bytes(b"sha256=caf\xe9").unwrap(),
    );

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["success"], false);
    assert_eq!(delivery_count(&server).await, 0);
}
