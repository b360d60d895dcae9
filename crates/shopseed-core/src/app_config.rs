use std::path::PathBuf;

use crate::records::ItemDefaults;
use crate::ConfigError;

/// Env var holding the catalog create-item endpoint.
pub const CATALOG_ENDPOINT_VAR: &str = "SHOPSEED_CATALOG_ENDPOINT";

#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub sites_path: PathBuf,
    pub export_dir: PathBuf,
    pub webdriver_url: String,
    /// Upper bound on polling for an element before treating it as absent.
    /// `0` looks once.
    pub element_wait_ms: u64,
    pub catalog_endpoint: Option<String>,
    pub fetch_timeout_secs: u64,
    pub submit_timeout_secs: u64,
    pub fetch_user_agent: String,
    pub fetch_max_retries: u32,
    pub fetch_retry_backoff_base_secs: u64,
    pub ingest_concurrency: usize,
    pub item_defaults: ItemDefaults,
}

impl AppConfig {
    /// The configured catalog endpoint, required for submitting items.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when no endpoint is configured.
    pub fn require_catalog_endpoint(&self) -> Result<&str, ConfigError> {
        self.catalog_endpoint
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar(CATALOG_ENDPOINT_VAR.to_string()))
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field("sites_path", &self.sites_path)
            .field("export_dir", &self.export_dir)
            .field("webdriver_url", &self.webdriver_url)
            .field("element_wait_ms", &self.element_wait_ms)
            .field(
                "catalog_endpoint",
                &self.catalog_endpoint.as_ref().map(|_| "[redacted]"),
            )
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("submit_timeout_secs", &self.submit_timeout_secs)
            .field("fetch_user_agent", &self.fetch_user_agent)
            .field("fetch_max_retries", &self.fetch_max_retries)
            .field(
                "fetch_retry_backoff_base_secs",
                &self.fetch_retry_backoff_base_secs,
            )
            .field("ingest_concurrency", &self.ingest_concurrency)
            .field("item_defaults", &self.item_defaults)
            .finish()
    }
}
