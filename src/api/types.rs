//! Domain types for the dashboard REST API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Dashboard configuration as edited through the forms
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DashboardConfig {
    /// Backend API key for the apply bot
    pub api_key: Option<String>,
    /// Search keywords the bot applies with
    pub keywords: Vec<String>,
    /// City and salary filters
    pub filters: SearchFilters,
}

/// Job search filters
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchFilters {
    /// Cities to search in
    pub cities: Vec<String>,
    /// Salary range filter, if set
    pub salary: Option<SalaryRange>,
}

/// Salary range in thousands per month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalaryRange {
    pub min_thousands: u32,
    pub max_thousands: u32,
}

impl std::fmt::Display for SalaryRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}k-{}k", self.min_thousands, self.max_thousands)
    }
}

/// Application status of a job record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Queued, not yet applied to
    Pending,
    /// Application delivered
    Applied,
    /// Filtered out or manually skipped
    Skipped,
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JobStatus::Pending => "pending",
            JobStatus::Applied => "applied",
            JobStatus::Skipped => "skipped",
        };
        f.pad(s)
    }
}

/// A single job record from the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub id: u64,
    pub title: String,
    pub company: String,
    pub city: String,
    /// Salary as listed, unparsed
    pub salary: Option<String>,
    pub status: JobStatus,
    pub applied_at: Option<DateTime<Utc>>,
}

/// One page of job records
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPage {
    pub items: Vec<JobRecord>,
    /// Total records across all pages
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

impl JobPage {
    /// Number of pages implied by `total` and `page_size`.
    pub fn page_count(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(self.page_size as u64)
    }
}
