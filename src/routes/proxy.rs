//! Proxy gateway — authenticated catch-all pass-through to the backend.
//!
//! RESPONSE POLICY
//! ===============
//! Non-401 backend replies relay status and JSON body unchanged. A backend
//! 401 means the session is dead: the access cookie is cleared and the
//! browser is redirected to the registration page — the backend body is
//! never relayed on that path. Transport/parse failures become a local 500
//! with the generic error envelope.

use axum::body::Bytes;
use axum::extract::{Path, RawQuery, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Json, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar};

use crate::envelope;
use crate::routes::auth::{ACCESS_TOKEN_COOKIE, expired_cookie};
use crate::services::forward;
use crate::state::AppState;

pub const REGISTER_REDIRECT: &str = "/register";

/// Bearer token from the session cookie. An empty cookie value counts as
/// absent — no Authorization header gets attached for it.
pub(crate) fn bearer_from_jar(jar: &CookieJar) -> Option<String> {
    jar.get(ACCESS_TOKEN_COOKIE)
        .map(Cookie::value)
        .filter(|v| !v.is_empty())
        .map(ToOwned::to_owned)
}

/// `ANY /api/{*path}` — forward an authenticated API call to the backend.
pub async fn forward_api(
    State(state): State<AppState>,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
    method: Method,
    jar: CookieJar,
    body: Bytes,
) -> Response {
    let bearer = bearer_from_jar(&jar);
    let body = forward::lenient_json_body(&method, &body);
    let outbound = forward::outbound(&state.config.backend_api_url, &path, query.as_deref(), method, body, bearer);

    match forward::send(&state.http, outbound).await {
        Ok(reply) if reply.status == StatusCode::UNAUTHORIZED => {
            let jar = jar.add(expired_cookie(ACCESS_TOKEN_COOKIE, state.config.cookie_secure));
            (jar, Redirect::temporary(REGISTER_REDIRECT)).into_response()
        }
        Ok(reply) => (reply.status, Json(reply.body)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, %path, "proxy forward failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(envelope::error_body("proxy request failed")),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
#[path = "proxy_test.rs"]
mod tests;
