use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::reconcile::UnknownTimePolicy;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Firestore project ID
    pub project_id: String,

    /// Firestore database ID
    pub database_id: String,

    /// REST API root, without the project/database suffix
    pub base_url: String,

    /// Request timeout in seconds
    pub http_timeout: u64,

    /// Page size for collection listings
    pub page_size: u32,

    /// Maximum number of pages followed per listing
    pub max_pages: u32,

    /// Directory raw responses are written to, if any
    pub snapshot_dir: Option<PathBuf>,

    /// Number of distinct orphaned match IDs shown in reports
    pub orphan_sample_size: usize,

    /// How matches without a scheduled time are grouped
    pub unknown_time_policy: UnknownTimePolicy,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            project_id: env::var("FIRESTORE_PROJECT_ID").unwrap_or_default(),

            database_id: env::var("FIRESTORE_DATABASE_ID")
                .unwrap_or_else(|_| "(default)".to_string()),

            base_url: env::var("FIRESTORE_BASE_URL")
                .unwrap_or_else(|_| "https://firestore.googleapis.com/v1".to_string()),

            http_timeout: env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("HTTP_TIMEOUT_SECS must be a valid number")?,

            page_size: env::var("PAGE_SIZE")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .context("PAGE_SIZE must be a valid number")?,

            max_pages: env::var("MAX_PAGES")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("MAX_PAGES must be a valid number")?,

            snapshot_dir: env::var("SNAPSHOT_DIR").ok().map(PathBuf::from),

            orphan_sample_size: env::var("ORPHAN_SAMPLE_SIZE")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("ORPHAN_SAMPLE_SIZE must be a valid number")?,

            unknown_time_policy: env::var("UNKNOWN_TIME_POLICY")
                .unwrap_or_else(|_| "collide".to_string())
                .parse()
                .context("UNKNOWN_TIME_POLICY must be `collide` or `separate`")?,
        })
    }

    /// Fail when settings needed for network access are missing
    pub fn validate(&self) -> Result<()> {
        if self.project_id.trim().is_empty() {
            anyhow::bail!("FIRESTORE_PROJECT_ID must be set (or pass --project)");
        }
        if self.page_size == 0 {
            anyhow::bail!("PAGE_SIZE must be greater than zero");
        }
        Ok(())
    }

    /// Configuration with defaults for the given project, without reading the environment
    pub fn for_project(project_id: &str) -> Self {
        Self {
            project_id: project_id.to_string(),
            database_id: "(default)".to_string(),
            base_url: "https://firestore.googleapis.com/v1".to_string(),
            http_timeout: 10,
            page_size: 100,
            max_pages: 10,
            snapshot_dir: None,
            orphan_sample_size: 10,
            unknown_time_policy: UnknownTimePolicy::default(),
        }
    }

    /// Root of the document tree: `{base_url}/projects/{project}/databases/{database}/documents`
    pub fn base_path(&self) -> String {
        format!(
            "{}/projects/{}/databases/{}/documents",
            self.base_url.trim_end_matches('/'),
            self.project_id,
            self.database_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(Config::for_project("demo-project").validate().is_ok());
        assert!(Config::for_project(" ").validate().is_err());

        let mut config = Config::for_project("demo-project");
        config.page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_base_path() {
        let mut config = Config::for_project("demo-project");
        config.base_url = "http://localhost:8080/v1/".to_string();

        assert_eq!(
            config.base_path(),
            "http://localhost:8080/v1/projects/demo-project/databases/(default)/documents"
        );
    }
}
