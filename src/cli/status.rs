//! Status command implementation

use crate::config::Config;
use crate::health::{BackendStatus, HealthConfig, HealthPoller};
use clap::Args;
use std::time::Duration;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Override the configured number of attempts
    #[arg(long)]
    pub attempts: Option<u32>,
}

impl StatusArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let health_config = HealthConfig::new(config.health_url())
            .max_attempts(self.attempts.unwrap_or(config.health.max_attempts))
            .retry_delay(Duration::from_millis(config.health.retry_delay_ms));

        let poller = HealthPoller::new(health_config);
        let status = poller.check().await;

        match &status {
            BackendStatus::Online {
                payload,
                checked_at,
            } => {
                println!(
                    "backend: online (checked {})",
                    checked_at.format("%Y-%m-%d %H:%M:%S UTC")
                );
                println!(
                    "  logged in: {}",
                    if payload.logged_in { "yes" } else { "no" }
                );
                if let Some(msg) = &payload.message {
                    println!("  message: {msg}");
                }
            }
            BackendStatus::Offline { .. } => {
                println!("backend: offline");
            }
            BackendStatus::Unknown => {
                println!("backend: unknown");
            }
        }

        // An offline backend is a finding, not a command failure.
        Ok(())
    }
}
