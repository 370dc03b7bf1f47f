//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The gateway exposes three route families: the fixed user routes, the
//! authentication wildcard, and the catch-all proxy. All are registered on
//! one router; Axum prefers the most specific match, so the fixed routes
//! and `/api/authentication/...` shadow the `/api/{*path}` catch-all.

pub mod auth;
pub mod proxy;
pub mod user;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{any, get, post};
use tower_http::cors::{Any, CorsLayer};

use crate::state::AppState;

/// Build the gateway router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/user/details", get(user::user_details))
        .route("/api/user/token/refresh", post(user::refresh_token))
        .route("/api/user/logout", post(user::logout))
        .route("/api/authentication/{*path}", any(auth::forward_authentication))
        .route("/api/{*path}", any(proxy::forward_api))
        .route("/healthz", get(healthz))
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
