//! `X-Hub-Signature` verification.
//!
//! The ticketing system signs each webhook body with HMAC using the shared
//! secret and sends `algorithm=hexdigest` in the `X-Hub-Signature` header.

use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::{Sha256, Sha384, Sha512};
use subtle::ConstantTimeEq;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Header carrying the body signature.
pub const SIGNATURE_HEADER: &str = "X-Hub-Signature";

/// Why a signature was rejected.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("missing signature")]
    Missing,

    #[error("malformed header")]
    Malformed,

    #[error("unsupported algorithm")]
    UnsupportedAlgorithm,

    #[error("signature mismatch")]
    Mismatch,
}

/// Digests accepted in the signature header.
///
/// The header's algorithm name is untrusted; only these names are honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestAlgorithm {
    Sha1,
    Sha256,
    Sha384,
    Sha512,
}

impl DigestAlgorithm {
    /// Parse an algorithm name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "sha1" => Some(Self::Sha1),
            "sha256" => Some(Self::Sha256),
            "sha384" => Some(Self::Sha384),
            "sha512" => Some(Self::Sha512),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
        }
    }

    /// Lowercase hex HMAC of `body` keyed with `secret`.
    fn hex_mac(&self, secret: &[u8], body: &[u8]) -> Option<String> {
        match self {
            Self::Sha1 => hex_mac::<Hmac<Sha1>>(secret, body),
            Self::Sha256 => hex_mac::<Hmac<Sha256>>(secret, body),
            Self::Sha384 => hex_mac::<Hmac<Sha384>>(secret, body),
            Self::Sha512 => hex_mac::<Hmac<Sha512>>(secret, body),
        }
    }
}

fn hex_mac<M>(secret: &[u8], body: &[u8]) -> Option<String>
where
    M: Mac + KeyInit,
{
    let mut mac = <M as Mac>::new_from_slice(secret).ok()?;
    mac.update(body);
    Some(hex::encode(mac.finalize().into_bytes()))
}

/// Verify `body` against the `X-Hub-Signature` header value.
///
/// Accepts only when the header names an allowed digest and carries the
/// matching HMAC of the exact raw body. Comparison is constant-time.
pub fn verify_signature(
    body: &[u8],
    header: Option<&str>,
    secret: &[u8],
) -> Result<(), SignatureError> {
    let header = match header {
        Some(h) => h,
        None => {
            info!("signature_missing");
            return Err(SignatureError::Missing);
        }
    };

    let (algorithm_name, provided) = match header.split_once('=') {
        Some((name, digest)) if !digest.contains('=') => (name, digest),
        _ => {
            info!(header = %header, "signature_malformed");
            return Err(SignatureError::Malformed);
        }
    };

    let algorithm = match DigestAlgorithm::from_name(algorithm_name) {
        Some(a) => a,
        None => {
            info!(header = %header, "signature_unsupported_algorithm");
            return Err(SignatureError::UnsupportedAlgorithm);
        }
    };

    let expected = match algorithm.hex_mac(secret, body) {
        Some(e) => e,
        None => {
            warn!(algorithm = algorithm.name(), "signature_invalid_key");
            return Err(SignatureError::Mismatch);
        }
    };

    let provided = provided.to_ascii_lowercase();
    let valid: bool = expected.as_bytes().ct_eq(provided.as_bytes()).into();

    if !valid {
        info!(
            header = %header,
            expected_length = expected.len(),
            actual_length = provided.len(),
            "signature_mismatch"
        );
        return Err(SignatureError::Mismatch);
    }

    debug!(algorithm = algorithm.name(), "signature_verified");
    Ok(())
}

/// Header value signing `body` with `secret`, e.g. `sha256=ab12...`.
pub fn compute_signature(body: &[u8], secret: &[u8], algorithm: DigestAlgorithm) -> String {
    let digest = algorithm.hex_mac(secret, body).unwrap_or_default();
    format!("{}={}", algorithm.name(), digest)
}
