//! jobwatch: monitoring companion for an automated job-application backend
//!
//! This library provides the core components for:
//! - A reconnecting status stream client with exponential backoff and jitter
//! - Bounded-retry health polling against the backend status endpoint
//! - A REST client for the dashboard config and job-record endpoints
//! - Salary range and keyword list parsing for the dashboard formats
//! - CLI subcommands for watching, health checks and job listings
//! - Structured logging setup

pub mod api;
pub mod cli;
pub mod config;
pub mod health;
pub mod stream;
pub mod telemetry;
