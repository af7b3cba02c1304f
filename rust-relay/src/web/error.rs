//! Request-level errors and their HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use super::handlers::RelayResponse;
use super::signature::SignatureError;
use crate::embed::PayloadError;
use crate::forward::ForwardError;

/// Everything that can stop a relay request.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("not found")]
    NotFound(String),

    #[error(transparent)]
    Signature(#[from] SignatureError),

    #[error("invalid JSON payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),

    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error("downstream delivery failed")]
    Delivery(#[from] ForwardError),
}

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::NotFound(_) => StatusCode::NOT_FOUND,
            RelayError::Signature(SignatureError::Missing)
            | RelayError::Signature(SignatureError::Mismatch) => StatusCode::FORBIDDEN,
            RelayError::Signature(SignatureError::Malformed)
            | RelayError::Signature(SignatureError::UnsupportedAlgorithm) => {
                StatusCode::BAD_REQUEST
            }
            RelayError::InvalidPayload(_) | RelayError::Payload(_) => StatusCode::BAD_REQUEST,
            RelayError::Delivery(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            Json(RelayResponse::failure(self.to_string())),
        )
            .into_response()
    }
}
