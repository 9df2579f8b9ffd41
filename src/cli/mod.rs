//! CLI interface for jobwatch
//!
//! Provides subcommands for:
//! - `watch`: tail the backend status stream
//! - `status`: one-shot backend health check
//! - `jobs`: list paginated job records
//! - `show`: show the backend dashboard configuration

mod jobs;
mod show;
mod status;
mod watch;

pub use jobs::JobsArgs;
pub use show::ShowArgs;
pub use status::StatusArgs;
pub use watch::WatchArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "jobwatch")]
#[command(about = "Monitoring companion for an automated job-application backend")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Tail the backend status stream
    Watch(WatchArgs),
    /// Check backend health
    Status(StatusArgs),
    /// List job records
    Jobs(JobsArgs),
    /// Show the backend dashboard configuration
    Show(ShowArgs),
}
