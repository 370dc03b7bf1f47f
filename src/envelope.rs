//! Backend response envelope.
//!
//! DESIGN
//! ======
//! Every backend JSON body follows `{ success, message?, data? }`. The
//! extractors here validate that shape at the gateway boundary and fail
//! closed: a missing or mistyped field yields `None`/`Err`, never a
//! half-populated value.

use serde::Deserialize;
use serde_json::Value;

/// The backend's `{ success, message?, data? }` response shape.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    /// The backend reported `success: false` (or omitted the flag).
    #[error("backend rejected the request: {message}")]
    Rejected { message: String },
    /// `success` was true but `data` was absent or of the wrong shape.
    #[error("backend response data has unexpected shape: {0}")]
    Shape(String),
}

impl Envelope {
    /// Parse an envelope from a raw JSON body. Non-object bodies fail closed.
    pub fn parse(body: &Value) -> Result<Self, EnvelopeError> {
        serde_json::from_value(body.clone()).map_err(|e| EnvelopeError::Shape(e.to_string()))
    }

    /// Unwrap `data` into a typed value, requiring `success: true`.
    ///
    /// # Errors
    ///
    /// `Rejected` when the backend did not report success, `Shape` when
    /// `data` is absent or does not deserialize into `T`.
    pub fn into_data<T: serde::de::DeserializeOwned>(self) -> Result<T, EnvelopeError> {
        if !self.success {
            let message = self
                .message
                .unwrap_or_else(|| "request failed".to_owned());
            return Err(EnvelopeError::Rejected { message });
        }
        let data = self.data.ok_or_else(|| EnvelopeError::Shape("missing data".to_owned()))?;
        serde_json::from_value(data).map_err(|e| EnvelopeError::Shape(e.to_string()))
    }
}

/// Local gateway error body: `{ success: false, message }`.
#[must_use]
pub fn error_body(message: &str) -> Value {
    serde_json::json!({ "success": false, "message": message })
}

// =============================================================================
// TOKEN EXTRACTORS
// =============================================================================

/// Access/refresh token pair carried by a successful auth response
/// (`data.access` + `data.refresh`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

impl TokenPair {
    /// Extract the pair from an auth response body. Both members must be
    /// present, strings, and non-empty; anything else yields `None` and no
    /// cookies get minted.
    #[must_use]
    pub fn from_body(body: &Value) -> Option<Self> {
        let data = body.get("data")?;
        let access = non_empty_str(data.get("access")?)?;
        let refresh = non_empty_str(data.get("refresh")?)?;
        Some(Self { access: access.to_owned(), refresh: refresh.to_owned() })
    }
}

/// New access token carried by a successful refresh response
/// (`success: true` + `data.access_token`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshGrant {
    pub access_token: String,
}

impl RefreshGrant {
    /// Extract the grant from a refresh response body, requiring the
    /// success flag. Shape mismatches yield `None`.
    #[must_use]
    pub fn from_body(body: &Value) -> Option<Self> {
        if body.get("success").and_then(Value::as_bool) != Some(true) {
            return None;
        }
        let token = non_empty_str(body.get("data")?.get("access_token")?)?;
        Some(Self { access_token: token.to_owned() })
    }
}

fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|s| !s.is_empty())
}

#[cfg(test)]
#[path = "envelope_test.rs"]
mod tests;
