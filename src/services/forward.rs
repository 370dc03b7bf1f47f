//! Backend forwarding — outbound request construction and execution.
//!
//! DESIGN
//! ======
//! Building the outbound request is a pure function over
//! `(method, path, query, body, bearer)` so routing behavior tests without a
//! transport. `send` is the only code that touches the network, and it
//! collapses every transport/parse failure into `ForwardError` for the
//! routes to convert into the local 500 envelope.

use axum::http::{Method, StatusCode};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    /// The request never produced a backend response (DNS, connect, timeout).
    #[error("backend request failed: {0}")]
    Transport(String),
    /// The backend responded with a body that is not JSON.
    #[error("backend returned non-JSON body: {0}")]
    Decode(String),
}

/// Everything needed to re-issue a browser request against the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: String,
    /// JSON body to forward; `None` for GET or body-less requests.
    pub body: Option<Value>,
    /// Bearer token to attach, when a session cookie was present.
    pub bearer: Option<String>,
}

/// Backend status plus parsed JSON body.
#[derive(Debug, Clone)]
pub struct BackendReply {
    pub status: StatusCode,
    pub body: Value,
}

/// Reconstruct the backend URL for a proxied path, preserving the query
/// string verbatim.
#[must_use]
pub fn target_url(base: &str, path: &str, query: Option<&str>) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    match query {
        Some(q) if !q.is_empty() => format!("{base}/{path}?{q}"),
        _ => format!("{base}/{path}"),
    }
}

/// Parse a browser request body leniently: GET never forwards a body, and a
/// missing or non-JSON body forwards as no body rather than as an error.
#[must_use]
pub fn lenient_json_body(method: &Method, bytes: &[u8]) -> Option<Value> {
    if *method == Method::GET || bytes.is_empty() {
        return None;
    }
    serde_json::from_slice(bytes).ok()
}

/// Build the outbound request descriptor for a proxied browser request.
#[must_use]
pub fn outbound(
    base: &str,
    path: &str,
    query: Option<&str>,
    method: Method,
    body: Option<Value>,
    bearer: Option<String>,
) -> OutboundRequest {
    let url = target_url(base, path, query);
    // GET requests never carry a forwarded body.
    let body = if method == Method::GET { None } else { body };
    OutboundRequest { method, url, body, bearer }
}

/// Execute an outbound request and parse the backend's JSON reply.
///
/// # Errors
///
/// `Transport` when the backend is unreachable or times out, `Decode` when
/// the response body is not JSON.
pub async fn send(http: &reqwest::Client, request: OutboundRequest) -> Result<BackendReply, ForwardError> {
    let mut builder = http
        .request(request.method, &request.url)
        .header(reqwest::header::CONTENT_TYPE, "application/json");
    if let Some(token) = &request.bearer {
        builder = builder.bearer_auth(token);
    }
    if let Some(body) = &request.body {
        builder = builder.json(body);
    }

    let response = builder
        .send()
        .await
        .map_err(|e| ForwardError::Transport(e.to_string()))?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| ForwardError::Transport(e.to_string()))?;
    let body: Value = serde_json::from_str(&text).map_err(|e| ForwardError::Decode(e.to_string()))?;

    Ok(BackendReply { status, body })
}

#[cfg(test)]
#[path = "forward_test.rs"]
mod tests;
