//! REST client for the dashboard backend
//!
//! Thin wrapper over the backend's config and job-record endpoints. The
//! backend stores list-valued config fields as JSON arrays embedded in
//! string fields; conversion to and from the domain types happens here.

use super::parse::{decode_string_list, encode_string_list, parse_salary_range};
use super::types::{DashboardConfig, JobPage, SearchFilters};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL of the backend
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Client for the dashboard backend REST API
pub struct ApiClient {
    config: ApiClientConfig,
    client: Client,
}

impl ApiClient {
    /// Create a new client for the given base URL with default settings
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_config(ApiClientConfig {
            base_url: base_url.into(),
            ..Default::default()
        })
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ApiClientConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Fetch the dashboard configuration
    pub async fn fetch_config(&self) -> anyhow::Result<DashboardConfig> {
        let url = format!("{}/api/config", self.config.base_url);

        tracing::debug!(url = %url, "Fetching dashboard config");

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Backend API error: {} - {}", status, body);
        }

        let wire: WireConfig = response.json().await?;
        wire_to_config(wire)
    }

    /// Write the dashboard configuration back to the backend
    pub async fn update_config(&self, config: &DashboardConfig) -> anyhow::Result<()> {
        let url = format!("{}/api/config", self.config.base_url);

        tracing::debug!(url = %url, "Updating dashboard config");

        let response = self
            .client
            .put(&url)
            .json(&config_to_wire(config))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Backend API error: {} - {}", status, body);
        }

        Ok(())
    }

    /// Fetch one page of job records
    pub async fn fetch_jobs(&self, page: u32, page_size: u32) -> anyhow::Result<JobPage> {
        let url = format!("{}/api/jobs", self.config.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("page", page), ("pageSize", page_size)])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Backend API error: {} - {}", status, body);
        }

        let jobs: JobPage = response.json().await?;

        tracing::debug!(
            page = jobs.page,
            items = jobs.items.len(),
            total = jobs.total,
            "Fetched job records"
        );

        Ok(jobs)
    }
}

/// Config document as the backend serves it
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireConfig {
    api_key: Option<String>,
    /// JSON array embedded in a string, e.g. `"[\"rust\",\"backend\"]"`
    keywords: Option<String>,
    /// Same embedded-array encoding as `keywords`
    cities: Option<String>,
    /// Compact range string, e.g. `"15k-25k"`
    salary: Option<String>,
}

fn wire_to_config(wire: WireConfig) -> anyhow::Result<DashboardConfig> {
    let keywords = match wire.keywords.as_deref() {
        Some(raw) => decode_string_list(raw)?,
        None => Vec::new(),
    };

    let cities = match wire.cities.as_deref() {
        Some(raw) => decode_string_list(raw)?,
        None => Vec::new(),
    };

    // A malformed stored salary filter degrades to "no filter" rather than
    // failing the whole config read.
    let salary = wire.salary.as_deref().and_then(|s| {
        parse_salary_range(s)
            .map_err(|e| tracing::warn!(raw = s, error = %e, "ignoring bad salary filter"))
            .ok()
    });

    Ok(DashboardConfig {
        api_key: wire.api_key,
        keywords,
        filters: SearchFilters { cities, salary },
    })
}

fn config_to_wire(config: &DashboardConfig) -> WireConfig {
    WireConfig {
        api_key: config.api_key.clone(),
        keywords: Some(encode_string_list(&config.keywords)),
        cities: Some(encode_string_list(&config.filters.cities)),
        salary: config.filters.salary.map(|r| r.to_string()),
    }
}
