//! Fixed user routes — details lookup, token refresh, logout.
//!
//! Unlike the catch-all proxy, the details route relays a backend 401 as
//! JSON: its caller is the client session store, which turns the 401 into
//! the silent-refresh attempt rather than a page redirect.

use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde_json::Value;

use crate::envelope::{self, RefreshGrant};
use crate::routes::auth::{ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE, expired_cookie, session_cookie};
use crate::services::forward;
use crate::state::AppState;
use crate::token;

const DETAILS_PATH: &str = "user/details";
const REFRESH_PATH: &str = "user/token/refresh";

// =============================================================================
// RESPONSE BODIES
// =============================================================================

pub(crate) fn refresh_success_body() -> Value {
    serde_json::json!({ "success": true, "message": "Access token refreshed successfully" })
}

pub(crate) fn refresh_failure_body(data: Value) -> Value {
    serde_json::json!({ "success": false, "message": "Failed to refresh token", "data": data })
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `GET /api/user/details` — forward with the cookie bearer; local 401 when
/// no session cookie exists.
pub async fn user_details(State(state): State<AppState>, jar: CookieJar) -> Response {
    let Some(token) = jar.get(ACCESS_TOKEN_COOKIE).map(Cookie::value).filter(|v| !v.is_empty()) else {
        return (StatusCode::UNAUTHORIZED, Json(envelope::error_body("Not authenticated"))).into_response();
    };

    let outbound = forward::outbound(
        &state.config.backend_api_url,
        DETAILS_PATH,
        None,
        Method::GET,
        None,
        Some(token.to_owned()),
    );

    match forward::send(&state.http, outbound).await {
        Ok(reply) => (reply.status, Json(reply.body)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "user details forward failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(envelope::error_body("failed to fetch user details")),
            )
                .into_response()
        }
    }
}

/// `POST /api/user/token/refresh` — exchange the refresh cookie for a new
/// access token and re-issue the access cookie. The refresh cookie itself
/// is never rotated.
pub async fn refresh_token(State(state): State<AppState>, jar: CookieJar) -> Response {
    let Some(refresh) = jar.get(REFRESH_TOKEN_COOKIE).map(Cookie::value).filter(|v| !v.is_empty()) else {
        return (StatusCode::UNAUTHORIZED, Json(envelope::error_body("No refresh token found"))).into_response();
    };

    let body = serde_json::json!({ "refresh_token": refresh });
    let outbound = forward::outbound(
        &state.config.backend_api_url,
        REFRESH_PATH,
        None,
        Method::POST,
        Some(body),
        None,
    );

    let reply = match forward::send(&state.http, outbound).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::error!(error = %e, "token refresh forward failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(envelope::error_body("failed to refresh token")),
            )
                .into_response();
        }
    };

    // Anything but a well-formed grant relays the backend's verdict.
    let Some(grant) = RefreshGrant::from_body(&reply.body) else {
        return (reply.status, Json(refresh_failure_body(reply.body))).into_response();
    };

    let expires_at = match token::expiry(&grant.access_token) {
        Ok(at) => at,
        Err(e) => {
            tracing::error!(error = %e, "refreshed token has undecodable expiry");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(envelope::error_body("invalid token in backend response")),
            )
                .into_response();
        }
    };

    let jar = jar.add(session_cookie(
        ACCESS_TOKEN_COOKIE,
        grant.access_token,
        expires_at,
        state.config.cookie_secure,
    ));
    (jar, Json(refresh_success_body())).into_response()
}

/// `POST /api/user/logout` — expire both session cookies. Tokens are
/// bearer-only; there is no backend session row to delete.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let secure = state.config.cookie_secure;
    let jar = jar
        .add(expired_cookie(ACCESS_TOKEN_COOKIE, secure))
        .add(expired_cookie(REFRESH_TOKEN_COOKIE, secure));
    (jar, Json(serde_json::json!({ "success": true })))
}

#[cfg(test)]
#[path = "user_test.rs"]
mod tests;
