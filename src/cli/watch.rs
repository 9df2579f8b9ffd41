//! Watch command implementation
//!
//! Tails the backend status stream until interrupted. Each named event the
//! backend emits is decoded into a [`StatusUpdate`] variant and printed.

use crate::config::Config;
use crate::stream::{StreamClient, StreamConfig};
use clap::Args;
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Print keep-alive pings as they arrive
    #[arg(long)]
    pub show_pings: bool,
}

/// Payload of the `connected` event
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConnectedPayload {
    #[serde(default)]
    message: Option<String>,
}

/// Payload of the `login-status` event
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginPayload {
    logged_in: bool,
    #[serde(default)]
    account: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Decoded status updates, one variant per stream event
#[derive(Debug)]
enum StatusUpdate {
    Connected(ConnectedPayload),
    Login(LoginPayload),
    Ping,
    /// Unnamed event, payload passed through as-is
    Other(String),
}

impl WatchArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let url = config.stream_url();
        let stream_config = StreamConfig::new(&url)
            .initial_delay(Duration::from_millis(config.stream.initial_delay_ms))
            .max_delay(Duration::from_millis(config.stream.max_delay_ms))
            .factor(config.stream.factor)
            .jitter(config.stream.jitter);

        let (tx, mut rx) = mpsc::unbounded_channel();
        let connected_tx = tx.clone();
        let login_tx = tx.clone();
        let ping_tx = tx.clone();
        let other_tx = tx;

        let handle = StreamClient::new(stream_config)
            .on_open(|| tracing::info!("status stream connected"))
            .on_error(|err, attempt, delay| {
                tracing::warn!(
                    error = %err,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "status stream lost, retrying"
                );
            })
            .on_event("connected", move |event| {
                let payload: ConnectedPayload = serde_json::from_str(&event.data)?;
                connected_tx.send(StatusUpdate::Connected(payload)).ok();
                Ok(())
            })
            .on_event("login-status", move |event| {
                let payload: LoginPayload = serde_json::from_str(&event.data)?;
                login_tx.send(StatusUpdate::Login(payload)).ok();
                Ok(())
            })
            .on_event("ping", move |_| {
                ping_tx.send(StatusUpdate::Ping).ok();
                Ok(())
            })
            .on_event("message", move |event| {
                other_tx.send(StatusUpdate::Other(event.data)).ok();
                Ok(())
            })
            .connect();

        tracing::info!(url = %url, "watching backend status, press ctrl-c to stop");

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => break,
                update = rx.recv() => match update {
                    Some(update) => print_update(update, self.show_pings),
                    None => break,
                },
            }
        }

        handle.close();
        Ok(())
    }
}

fn print_update(update: StatusUpdate, show_pings: bool) {
    match update {
        StatusUpdate::Connected(p) => {
            println!(
                "connected: {}",
                p.message.as_deref().unwrap_or("backend online")
            );
        }
        StatusUpdate::Login(p) => {
            let state = if p.logged_in { "logged in" } else { "logged out" };
            match (&p.account, &p.message) {
                (Some(account), Some(msg)) => println!("login: {state} ({account}) - {msg}"),
                (Some(account), None) => println!("login: {state} ({account})"),
                (None, Some(msg)) => println!("login: {state} - {msg}"),
                (None, None) => println!("login: {state}"),
            }
        }
        StatusUpdate::Ping => {
            if show_pings {
                println!("ping");
            }
        }
        StatusUpdate::Other(data) => {
            println!("event: {data}");
        }
    }
}
