//! Stream client types and configuration

use std::time::Duration;
use thiserror::Error;

/// Reconnecting stream client configuration
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Event stream URL to connect to
    pub url: String,
    /// Delay before the first reconnection attempt
    pub initial_delay: Duration,
    /// Maximum delay between reconnection attempts
    pub max_delay: Duration,
    /// Multiplier applied to the delay after each failed attempt
    pub factor: f64,
    /// Randomize delays to avoid reconnecting in lockstep
    pub jitter: bool,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(30_000),
            factor: 1.7,
            jitter: true,
        }
    }
}

impl StreamConfig {
    /// Create a new config with the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the initial reconnection delay
    pub fn initial_delay(mut self, d: Duration) -> Self {
        self.initial_delay = d;
        self
    }

    /// Set the maximum reconnection delay
    pub fn max_delay(mut self, d: Duration) -> Self {
        self.max_delay = d;
        self
    }

    /// Set the backoff growth factor
    pub fn factor(mut self, factor: f64) -> Self {
        self.factor = factor;
        self
    }

    /// Enable or disable reconnection jitter
    pub fn jitter(mut self, enabled: bool) -> Self {
        self.jitter = enabled;
        self
    }
}

/// A named event received on the stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamEvent {
    /// Event name (`message` when the server does not name it)
    pub name: String,
    /// Raw payload text, typically JSON
    pub data: String,
    /// Last event id seen on the stream, if any
    pub id: Option<String>,
}

/// Stream transport errors
///
/// Both variants feed the same backoff/reconnect path; the split is purely
/// informational.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The connection could not be established
    #[error("connect failed: {0}")]
    ConnectFailed(String),
    /// An established connection errored or ended
    #[error("stream disconnected: {0}")]
    Disconnected(String),
}

/// Handler invoked for each event of a registered name.
///
/// An `Err` is logged and dispatch continues; it never affects the
/// connection or the reconnect loop.
pub type EventHandler = Box<dyn Fn(StreamEvent) -> anyhow::Result<()> + Send + Sync>;

/// Invoked on every successful (re)connection.
pub type OpenHandler = Box<dyn Fn() + Send + Sync>;

/// Invoked on every failure with the error, the 1-based attempt counter and
/// the delay before the next attempt.
pub type ErrorHandler = Box<dyn Fn(&StreamError, u32, Duration) + Send + Sync>;
