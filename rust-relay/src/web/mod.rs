//! Web server module for inbound ticket webhooks.
//!
//! ```text
//! POST /:route → verify signature → build embed → forward → {"success": true}
//! ```

pub mod error;
pub mod handlers;
pub mod signature;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use error::RelayError;
pub use handlers::{
    dispatch, index, not_found, relay_ticket, relay_webhook, AppState, IndexResponse,
    RelayResponse,
};
pub use signature::{
    compute_signature, verify_signature, DigestAlgorithm, SignatureError, SIGNATURE_HEADER,
};

/// Build the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/:route", post(relay_webhook))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
