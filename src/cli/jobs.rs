//! Jobs command implementation

use crate::api::{ApiClient, ApiClientConfig};
use crate::config::Config;
use clap::Args;
use std::time::Duration;

#[derive(Args, Debug)]
pub struct JobsArgs {
    /// Page to fetch (1-based)
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Records per page
    #[arg(long, default_value_t = 20)]
    pub page_size: u32,
}

impl JobsArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let client = ApiClient::with_config(ApiClientConfig {
            base_url: config.backend.base_url.clone(),
            timeout: Duration::from_secs(config.backend.timeout_secs),
        });

        let jobs = client.fetch_jobs(self.page, self.page_size).await?;

        if jobs.items.is_empty() {
            println!("no job records on page {}", jobs.page);
            return Ok(());
        }

        println!(
            "{:<8} {:<32} {:<20} {:<12} {:<10} {:<8}",
            "ID", "TITLE", "COMPANY", "CITY", "SALARY", "STATUS"
        );
        for job in &jobs.items {
            println!(
                "{:<8} {:<32} {:<20} {:<12} {:<10} {:<8}",
                job.id,
                truncate(&job.title, 32),
                truncate(&job.company, 20),
                truncate(&job.city, 12),
                job.salary.as_deref().unwrap_or("-"),
                job.status,
            );
        }
        println!(
            "page {} of {} ({} records total)",
            jobs.page,
            jobs.page_count(),
            jobs.total
        );

        Ok(())
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let head: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{head}…")
}
