//! HTTP handlers.
//!
//! Every ticket route runs through [`dispatch`]: look up the route, verify
//! the signature, parse, build the embed, forward it once.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, Uri},
    Json,
};
use serde::Serialize;
use tracing::{info, warn};

use super::error::RelayError;
use super::signature::{verify_signature, SignatureError, SIGNATURE_HEADER};
use crate::embed::{build_embed, TicketPayload};
use crate::forward::Forwarder;
use crate::routes::{find_route, Route};
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub forwarder: Forwarder,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let forwarder = Forwarder::new(config.targets.clone());
        Self::with_forwarder(config, forwarder)
    }

    pub fn with_forwarder(config: Config, forwarder: Forwarder) -> Self {
        Self {
            config: Arc::new(config),
            forwarder,
        }
    }
}

// =============================================================================
// Index
// =============================================================================

#[derive(Serialize)]
pub struct IndexResponse {
    pub msg: &'static str,
}

/// Liveness endpoint.
pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        msg: "Service is running",
    })
}

// =============================================================================
// Ticket Routes
// =============================================================================

/// Relay response body.
#[derive(Debug, Serialize)]
pub struct RelayResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RelayResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failure(error: String) -> Self {
        Self {
            success: false,
            error: Some(error),
        }
    }
}

/// `POST /:route` endpoint.
pub async fn relay_webhook(
    State(state): State<AppState>,
    Path(route_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<RelayResponse>, RelayError> {
    dispatch(&state, &route_id, &headers, &body).await?;
    Ok(Json(RelayResponse::ok()))
}

/// Fallback for paths outside the route table.
pub async fn not_found(uri: Uri) -> RelayError {
    warn!(path = %uri.path(), "route_not_found");
    RelayError::NotFound(uri.path().to_string())
}

/// Resolve `route_id` and relay the ticket it carries.
pub async fn dispatch(
    state: &AppState,
    route_id: &str,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<(), RelayError> {
    let route = find_route(route_id).ok_or_else(|| {
        warn!(route = %route_id, "route_not_found");
        RelayError::NotFound(route_id.to_string())
    })?;

    relay_ticket(state, route, headers, body).await
}

/// Verify, build and forward one ticket for `route`.
///
/// Any rejection before forwarding leaves the downstream webhook untouched.
pub async fn relay_ticket(
    state: &AppState,
    route: &Route,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<(), RelayError> {
    info!(
        route = route.id,
        body_length = body.len(),
        has_signature = headers.contains_key(SIGNATURE_HEADER),
        "ticket_webhook_received"
    );

    let signature = match headers.get(SIGNATURE_HEADER) {
        Some(value) => Some(value.to_str().map_err(|_| {
            info!(
                route = route.id,
                header = %String::from_utf8_lossy(value.as_bytes()),
                "signature_header_not_ascii"
            );
            SignatureError::Malformed
        })?),
        None => None,
    };

    verify_signature(body, signature, state.config.webhook_secret.as_bytes())?;

    let payload = TicketPayload::from_slice(body).map_err(|e| {
        warn!(route = route.id, error = %e, "ticket_payload_invalid_json");
        RelayError::InvalidPayload(e)
    })?;

    let embed = build_embed(&payload, route, &state.config.ticket_base_url).map_err(|e| {
        warn!(route = route.id, error = %e, "ticket_payload_incomplete");
        RelayError::from(e)
    })?;

    state.forwarder.forward(route.target, &embed).await?;

    info!(route = route.id, title = %embed.title, "ticket_relayed");

    Ok(())
}
