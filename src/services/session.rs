//! Client session store.
//!
//! ARCHITECTURE
//! ============
//! The browser-side "am I logged in" state, modeled as an explicit store
//! instead of ambient context so it tests without a rendering tree. The
//! gateway dependency sits behind `AccountGateway`; production uses the HTTP
//! implementation against the gateway origin, tests script a mock.
//!
//! STATE MACHINE
//! =============
//! `init` runs once per mount: fetch user details; on a single 401, attempt
//! exactly one silent refresh and, if it succeeds, exactly one retried
//! fetch. Every other outcome — refresh failure, retry failure, any network
//! error — lands in the terminal anonymous state. No periodic refresh.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::envelope::Envelope;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The gateway was unreachable or the request failed mid-flight.
    #[error("gateway request failed: {0}")]
    Transport(String),
    /// The gateway replied with a body that is not JSON.
    #[error("gateway returned non-JSON body: {0}")]
    Decode(String),
}

/// User record held in memory by the session store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub profile_img: Option<String>,
    #[serde(default)]
    pub is_verified: Option<bool>,
}

/// Outcome of a user-details fetch against the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFetch {
    /// Success envelope carrying the user payload.
    User(UserProfile),
    /// HTTP 401 — access token missing or expired.
    Unauthorized,
    /// Any other unsuccessful reply.
    Denied,
}

/// Gateway operations the session store depends on.
#[async_trait]
pub trait AccountGateway: Send + Sync {
    /// `GET /api/user/details`.
    async fn fetch_user(&self) -> Result<UserFetch, GatewayError>;
    /// `POST /api/user/token/refresh`. Returns the reported success flag.
    async fn refresh_session(&self) -> Result<bool, GatewayError>;
}

// =============================================================================
// SESSION STORE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum SessionState {
    Authenticating,
    Authenticated(UserProfile),
    Anonymous,
}

/// Per-mount session state with an explicit lifecycle:
/// `new` → `init().await` → `current_user`/`set_user` → `teardown`.
pub struct SessionStore {
    gateway: Arc<dyn AccountGateway>,
    state: Mutex<SessionState>,
}

impl SessionStore {
    #[must_use]
    pub fn new(gateway: Arc<dyn AccountGateway>) -> Self {
        Self { gateway, state: Mutex::new(SessionState::Authenticating) }
    }

    /// Resolve the session once. Terminal state is either authenticated
    /// (user populated) or anonymous; `is_authenticating` is false after
    /// this returns.
    pub async fn init(&self) {
        let resolved = self.resolve().await;
        let mut state = self.lock();
        *state = match resolved {
            Some(user) => SessionState::Authenticated(user),
            None => SessionState::Anonymous,
        };
    }

    async fn resolve(&self) -> Option<UserProfile> {
        match self.gateway.fetch_user().await {
            Ok(UserFetch::User(user)) => Some(user),
            Ok(UserFetch::Unauthorized) => self.refresh_and_retry().await,
            Ok(UserFetch::Denied) => None,
            Err(e) => {
                tracing::warn!(error = %e, "user details fetch failed");
                None
            }
        }
    }

    /// The single silent-refresh attempt, followed by at most one retry.
    async fn refresh_and_retry(&self) -> Option<UserProfile> {
        match self.gateway.refresh_session().await {
            Ok(true) => {}
            Ok(false) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "session refresh failed");
                return None;
            }
        }
        match self.gateway.fetch_user().await {
            Ok(UserFetch::User(user)) => Some(user),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(error = %e, "retried user details fetch failed");
                None
            }
        }
    }

    /// Current user, if the store has reached the authenticated state.
    #[must_use]
    pub fn current_user(&self) -> Option<UserProfile> {
        match &*self.lock() {
            SessionState::Authenticated(user) => Some(user.clone()),
            _ => None,
        }
    }

    /// True until `init` has resolved the session one way or the other.
    #[must_use]
    pub fn is_authenticating(&self) -> bool {
        *self.lock() == SessionState::Authenticating
    }

    /// Replace the held user directly (login/logout flows outside `init`).
    pub fn set_user(&self, user: Option<UserProfile>) {
        let mut state = self.lock();
        *state = match user {
            Some(user) => SessionState::Authenticated(user),
            None => SessionState::Anonymous,
        };
    }

    /// Drop the held user. The store ends anonymous, as after a logout.
    pub fn teardown(&self) {
        *self.lock() = SessionState::Anonymous;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// =============================================================================
// HTTP GATEWAY
// =============================================================================

/// `AccountGateway` over the real gateway origin. Cookie-carrying, like the
/// browser runtime it stands in for.
pub struct HttpAccountGateway {
    http: reqwest::Client,
    origin: String,
}

impl HttpAccountGateway {
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client fails to build.
    pub fn new(origin: &str) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        Ok(Self { http, origin: origin.trim_end_matches('/').to_owned() })
    }
}

#[async_trait]
impl AccountGateway for HttpAccountGateway {
    async fn fetch_user(&self) -> Result<UserFetch, GatewayError> {
        let response = self
            .http
            .get(format!("{}/api/user/details", self.origin))
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Ok(UserFetch::Unauthorized);
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))?;
        let Ok(envelope) = Envelope::parse(&body) else {
            return Ok(UserFetch::Denied);
        };
        match envelope.into_data::<UserProfile>() {
            Ok(user) => Ok(UserFetch::User(user)),
            Err(_) => Ok(UserFetch::Denied),
        }
    }

    async fn refresh_session(&self) -> Result<bool, GatewayError> {
        let response = self
            .http
            .post(format!("{}/api/user/token/refresh", self.origin))
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))?;
        Ok(body.get("success").and_then(serde_json::Value::as_bool) == Some(true))
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
