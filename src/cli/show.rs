//! Show command implementation

use crate::api::{ApiClient, ApiClientConfig};
use crate::config::Config;
use clap::Args;
use std::time::Duration;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Print the API key unmasked
    #[arg(long)]
    pub reveal_key: bool,
}

impl ShowArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let client = ApiClient::with_config(ApiClientConfig {
            base_url: config.backend.base_url.clone(),
            timeout: Duration::from_secs(config.backend.timeout_secs),
        });

        let dashboard = client.fetch_config().await?;

        match &dashboard.api_key {
            Some(key) if self.reveal_key => println!("api key: {key}"),
            Some(key) => println!("api key: {}", mask_key(key)),
            None => println!("api key: (not set)"),
        }

        if dashboard.keywords.is_empty() {
            println!("keywords: (none)");
        } else {
            println!("keywords: {}", dashboard.keywords.join(", "));
        }

        if dashboard.filters.cities.is_empty() {
            println!("cities: (any)");
        } else {
            println!("cities: {}", dashboard.filters.cities.join(", "));
        }

        match &dashboard.filters.salary {
            Some(range) => println!("salary: {range}"),
            None => println!("salary: (any)"),
        }

        Ok(())
    }
}

/// Keep the tail of the key visible for identification, hide the rest.
fn mask_key(key: &str) -> String {
    if key.len() <= 4 {
        return "****".to_string();
    }
    format!("****{}", &key[key.len() - 4..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_key_keeps_tail() {
        assert_eq!(mask_key("sk-12345678"), "****5678");
    }

    #[test]
    fn test_mask_key_short_keys_fully_hidden() {
        assert_eq!(mask_key("abcd"), "****");
        assert_eq!(mask_key(""), "****");
    }
}
