//! Client configuration.

use std::env;
use std::time::Duration;

use krishi_core::{OrderError, Result};

/// Default base URL of the order API.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Settings for [`crate::OrderClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL including the `/api` prefix, without a trailing slash.
    pub base_url: String,

    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl ClientConfig {
    /// Config pointing at `base_url` with default settings otherwise.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Default::default()
        }
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Load from `KRISHI_API_URL` and `KRISHI_REQUEST_TIMEOUT_MS`, reading `.env` if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let base_url = env::var("KRISHI_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let timeout_ms = match env::var("KRISHI_REQUEST_TIMEOUT_MS") {
            Ok(raw) => raw.parse::<u64>().map_err(|e| {
                OrderError::Config(format!("Invalid KRISHI_REQUEST_TIMEOUT_MS '{}': {}", raw, e))
            })?,
            Err(_) => DEFAULT_TIMEOUT_MS,
        };

        tracing::debug!(%base_url, timeout_ms, "Client configuration loaded");

        Ok(Self::new(base_url).with_timeout(Duration::from_millis(timeout_ms)))
    }
}
