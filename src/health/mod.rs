//! Bounded-retry health polling
//!
//! One-shot status checks against the backend's REST health endpoint. A
//! check makes a bounded number of attempts with a fixed delay between them;
//! an unreachable backend is reported as [`BackendStatus::Offline`], never as
//! an error.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;
use tokio::time::sleep;

/// Health check configuration
#[derive(Debug, Clone)]
pub struct HealthConfig {
    /// Health endpoint URL
    pub url: String,
    /// Number of attempts before reporting the backend offline
    pub max_attempts: u32,
    /// Delay between failed attempts
    pub retry_delay: Duration,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_attempts: 3,
            retry_delay: Duration::from_secs(2),
            timeout: Duration::from_secs(5),
        }
    }
}

impl HealthConfig {
    /// Create a new config with the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the number of attempts
    pub fn max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n.max(1);
        self
    }

    /// Set the delay between attempts
    pub fn retry_delay(mut self, d: Duration) -> Self {
        self.retry_delay = d;
        self
    }
}

/// Body of a successful health response
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatusPayload {
    /// Whether the apply bot holds a live login session
    pub logged_in: bool,
    /// Free-form status message from the backend
    #[serde(default)]
    pub message: Option<String>,
}

/// Observed backend status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendStatus {
    /// Backend answered a health probe
    Online {
        payload: StatusPayload,
        checked_at: DateTime<Utc>,
    },
    /// All attempts failed
    Offline { checked_at: DateTime<Utc> },
    /// No check has completed yet
    Unknown,
}

impl std::fmt::Display for BackendStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendStatus::Online { .. } => write!(f, "online"),
            BackendStatus::Offline { .. } => write!(f, "offline"),
            BackendStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// Health poller with bounded retry
pub struct HealthPoller {
    config: HealthConfig,
    client: reqwest::Client,
}

impl HealthPoller {
    /// Create a new poller with the given configuration
    pub fn new(config: HealthConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Run one bounded-retry health check.
    ///
    /// Returns after the first successful probe, or after `max_attempts`
    /// failures. Degraded backends surface as `Offline`; this method never
    /// fails.
    pub async fn check(&self) -> BackendStatus {
        for attempt in 1..=self.config.max_attempts {
            match self.probe().await {
                Ok(payload) => {
                    tracing::debug!(attempt, logged_in = payload.logged_in, "health probe ok");
                    return BackendStatus::Online {
                        payload,
                        checked_at: Utc::now(),
                    };
                }
                Err(e) => {
                    tracing::warn!(
                        attempt,
                        max_attempts = self.config.max_attempts,
                        error = %e,
                        "health probe failed"
                    );
                    if attempt < self.config.max_attempts {
                        sleep(self.config.retry_delay).await;
                    }
                }
            }
        }

        BackendStatus::Offline {
            checked_at: Utc::now(),
        }
    }

    async fn probe(&self) -> anyhow::Result<StatusPayload> {
        let response = self.client.get(&self.config.url).send().await?;

        if !response.status().is_success() {
            anyhow::bail!("health endpoint returned {}", response.status());
        }

        Ok(response.json().await?)
    }
}
