//! Authentication gateway — pre-auth forwarding and session cookie minting.
//!
//! ARCHITECTURE
//! ============
//! Login, signup, OTP and OAuth-callback calls pass through here without a
//! bearer token and without the proxy's redirect-on-401 policy. This is the
//! only place new sessions are minted: a success body carrying both
//! `data.access` and `data.refresh` sets the two http-only session cookies,
//! each expiring at its own token's `exp` claim.

use axum::body::Bytes;
use axum::extract::{Path, RawQuery, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::{Duration, OffsetDateTime};

use crate::envelope::{self, TokenPair};
use crate::services::forward;
use crate::state::AppState;
use crate::token;

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

// =============================================================================
// COOKIE BUILDERS
// =============================================================================

/// Session cookie carrying a bearer token, expiring at the token's own
/// `exp` instant.
pub(crate) fn session_cookie(
    name: &'static str,
    value: String,
    expires_at: OffsetDateTime,
    secure: bool,
) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .expires(expires_at)
        .build()
}

/// Replacement cookie that immediately expires, clearing the original.
pub(crate) fn expired_cookie(name: &'static str, secure: bool) -> Cookie<'static> {
    Cookie::build((name, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::ZERO)
        .build()
}

// =============================================================================
// HANDLER
// =============================================================================

/// `ANY /api/authentication/{*path}` — forward to the backend verbatim;
/// mint both session cookies when the reply carries a token pair.
pub async fn forward_authentication(
    State(state): State<AppState>,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
    method: Method,
    jar: CookieJar,
    body: Bytes,
) -> Response {
    let body = forward::lenient_json_body(&method, &body);
    let outbound = forward::outbound(&state.config.backend_api_url, &path, query.as_deref(), method, body, None);

    let reply = match forward::send(&state.http, outbound).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::error!(error = %e, %path, "authentication forward failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(envelope::error_body("authentication request failed")),
            )
                .into_response();
        }
    };

    // No token pair → plain relay. Shape mismatches mint nothing.
    let Some(pair) = TokenPair::from_body(&reply.body) else {
        return (reply.status, Json(reply.body)).into_response();
    };

    let (access_exp, refresh_exp) = match (token::expiry(&pair.access), token::expiry(&pair.refresh)) {
        (Ok(access_exp), Ok(refresh_exp)) => (access_exp, refresh_exp),
        (Err(e), _) | (_, Err(e)) => {
            tracing::error!(error = %e, %path, "undecodable token expiry, refusing to mint session");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(envelope::error_body("invalid token in backend response")),
            )
                .into_response();
        }
    };

    let secure = state.config.cookie_secure;
    let jar = jar
        .add(session_cookie(ACCESS_TOKEN_COOKIE, pair.access, access_exp, secure))
        .add(session_cookie(REFRESH_TOKEN_COOKIE, pair.refresh, refresh_exp, secure));

    (jar, (reply.status, Json(reply.body))).into_response()
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
