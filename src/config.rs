//! Configuration types for jobwatch

use serde::Deserialize;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub backend: BackendConfig,
    #[serde(default)]
    pub stream: StreamSettings,
    #[serde(default)]
    pub health: HealthSettings,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Backend endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the apply-bot backend
    pub base_url: String,
    /// Request timeout for REST calls
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Status stream configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StreamSettings {
    /// Path of the event stream endpoint
    #[serde(default = "default_stream_path")]
    pub path: String,

    /// Initial reconnect delay (milliseconds)
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Maximum reconnect delay (milliseconds)
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Backoff growth factor
    #[serde(default = "default_factor")]
    pub factor: f64,

    /// Randomize reconnect delays
    #[serde(default = "default_true")]
    pub jitter: bool,
}

/// Health check configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HealthSettings {
    /// Path of the health endpoint
    #[serde(default = "default_health_path")]
    pub path: String,

    /// Attempts before reporting the backend offline
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay between attempts (milliseconds)
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_timeout_secs() -> u64 {
    10
}
fn default_stream_path() -> String {
    "/api/events".to_string()
}
fn default_initial_delay_ms() -> u64 {
    1000
}
fn default_max_delay_ms() -> u64 {
    30_000
}
fn default_factor() -> f64 {
    1.7
}
fn default_true() -> bool {
    true
}
fn default_health_path() -> String {
    "/api/health".to_string()
}
fn default_max_attempts() -> u32 {
    3
}
fn default_retry_delay_ms() -> u64 {
    2000
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            path: default_stream_path(),
            initial_delay_ms: 1000,
            max_delay_ms: 30_000,
            factor: 1.7,
            jitter: true,
        }
    }
}

impl Default for HealthSettings {
    fn default() -> Self {
        Self {
            path: default_health_path(),
            max_attempts: 3,
            retry_delay_ms: 2000,
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Full URL of the status stream endpoint
    pub fn stream_url(&self) -> String {
        join_url(&self.backend.base_url, &self.stream.path)
    }

    /// Full URL of the health endpoint
    pub fn health_url(&self) -> String {
        join_url(&self.backend.base_url, &self.health.path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_deserialize() {
        let toml = r#"
            [backend]
            base_url = "http://127.0.0.1:8080"
            timeout_secs = 5

            [stream]
            path = "/api/events"
            initial_delay_ms = 500
            max_delay_ms = 10000
            factor = 2.0
            jitter = false

            [health]
            path = "/api/health"
            max_attempts = 5
            retry_delay_ms = 1000

            [telemetry]
            log_level = "debug"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.backend.base_url, "http://127.0.0.1:8080");
        assert_eq!(config.backend.timeout_secs, 5);
        assert_eq!(config.stream.initial_delay_ms, 500);
        assert_eq!(config.stream.factor, 2.0);
        assert!(!config.stream.jitter);
        assert_eq!(config.health.max_attempts, 5);
        assert_eq!(config.telemetry.log_level, "debug");
    }

    #[test]
    fn test_optional_sections_default() {
        let toml = r#"
            [backend]
            base_url = "http://127.0.0.1:8080"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.backend.timeout_secs, 10);
        assert_eq!(config.stream.path, "/api/events");
        assert_eq!(config.stream.initial_delay_ms, 1000);
        assert_eq!(config.stream.max_delay_ms, 30_000);
        assert_eq!(config.stream.factor, 1.7);
        assert!(config.stream.jitter);
        assert_eq!(config.health.max_attempts, 3);
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn test_url_joining() {
        let toml = r#"
            [backend]
            base_url = "http://127.0.0.1:8080/"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.stream_url(), "http://127.0.0.1:8080/api/events");
        assert_eq!(config.health_url(), "http://127.0.0.1:8080/api/health");
    }

    #[test]
    fn test_config_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "[backend]\nbase_url = \"http://localhost:9999\"\n"
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.backend.base_url, "http://localhost:9999");
    }

    #[test]
    fn test_config_load_nonexistent() {
        let result = Config::load("/nonexistent/path/config.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_example_config_parses() {
        let config: Config = toml::from_str(include_str!("../config.toml.example")).unwrap();
        assert!(!config.backend.base_url.is_empty());
    }
}
