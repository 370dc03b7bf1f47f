//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the gateway config and one shared `reqwest::Client` so connection
//! pools and timeouts are set up once at startup, not per request.

use std::time::Duration;

use crate::config::GatewayConfig;

#[derive(Debug, thiserror::Error)]
#[error("HTTP client build failed: {0}")]
pub struct HttpClientBuild(String);

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; both fields are cheaply clonable.
#[derive(Clone)]
pub struct AppState {
    pub config: GatewayConfig,
    pub http: reqwest::Client,
}

impl AppState {
    /// Build the state, constructing the shared backend HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying TLS/client setup fails.
    pub fn new(config: GatewayConfig) -> Result<Self, HttpClientBuild> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| HttpClientBuild(e.to_string()))?;
        Ok(Self { config, http })
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
