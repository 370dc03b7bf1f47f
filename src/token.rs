//! Bearer-token claim inspection.
//!
//! The gateway never verifies token signatures — the backend owns that. The
//! only claim read here is `exp`, used to give each session cookie the same
//! lifetime as the token it carries.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use time::OffsetDateTime;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// The token is not three dot-separated segments.
    #[error("malformed token: expected header.payload.signature")]
    Malformed,
    /// The payload segment is not valid base64url.
    #[error("token payload is not base64url: {0}")]
    Encoding(String),
    /// The decoded payload is not a JSON object.
    #[error("token payload is not JSON: {0}")]
    Payload(String),
    /// The payload carries no numeric `exp` claim.
    #[error("token has no numeric exp claim")]
    MissingExp,
    /// The `exp` claim does not fit a valid timestamp.
    #[error("token exp claim out of range: {0}")]
    ExpOutOfRange(i64),
}

/// Decode the `exp` claim (seconds since epoch) of an unverified JWT and
/// return it as an absolute instant.
///
/// # Errors
///
/// Fails closed on any shape problem: wrong segment count, bad base64url,
/// non-JSON payload, or a missing/non-numeric/out-of-range `exp`.
pub fn expiry(token: &str) -> Result<OffsetDateTime, TokenError> {
    let payload = payload_segment(token)?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| TokenError::Encoding(e.to_string()))?;
    let claims: serde_json::Value =
        serde_json::from_slice(&bytes).map_err(|e| TokenError::Payload(e.to_string()))?;
    let exp = claims
        .get("exp")
        .and_then(serde_json::Value::as_i64)
        .ok_or(TokenError::MissingExp)?;
    OffsetDateTime::from_unix_timestamp(exp).map_err(|_| TokenError::ExpOutOfRange(exp))
}

fn payload_segment(token: &str) -> Result<&str, TokenError> {
    let mut segments = token.split('.');
    match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(_), Some(payload), Some(_), None) => Ok(payload),
        _ => Err(TokenError::Malformed),
    }
}

#[cfg(test)]
#[path = "token_test.rs"]
mod tests;
