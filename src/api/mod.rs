//! Dashboard backend REST API
//!
//! Client and wire types for the config and job-record endpoints, plus the
//! small string formats the backend uses for salary ranges and keyword lists.

mod client;
pub mod parse;
mod types;

pub use client::{ApiClient, ApiClientConfig};
pub use types::{DashboardConfig, JobPage, JobRecord, JobStatus, SalaryRange, SearchFilters};
