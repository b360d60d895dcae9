use crate::app_config::AppConfig;
use crate::records::{ItemDefaults, DEFAULT_ITEM_DETAIL};
use crate::ConfigError;

pub(crate) const DEFAULT_FETCH_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every setting has a default except the catalog endpoint, which only the
/// `ingest` command needs and which it checks itself.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let log_level = or_default("SHOPSEED_LOG_LEVEL", "info");
    let sites_path = PathBuf::from(or_default("SHOPSEED_SITES_PATH", "./config/sites.yaml"));
    let export_dir = PathBuf::from(or_default("SHOPSEED_EXPORT_DIR", "./data"));
    let webdriver_url = or_default("SHOPSEED_WEBDRIVER_URL", "http://localhost:4444");
    let element_wait_ms = parse_u64("SHOPSEED_ELEMENT_WAIT_MS", "0")?;

    let catalog_endpoint = lookup("SHOPSEED_CATALOG_ENDPOINT")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    if let Some(endpoint) = &catalog_endpoint {
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(invalid(
                "SHOPSEED_CATALOG_ENDPOINT",
                "must be an http(s) URL".to_string(),
            ));
        }
    }

    let fetch_timeout_secs = parse_u64("SHOPSEED_FETCH_TIMEOUT_SECS", "20")?;
    let submit_timeout_secs = parse_u64("SHOPSEED_SUBMIT_TIMEOUT_SECS", "60")?;
    let fetch_user_agent = or_default("SHOPSEED_FETCH_USER_AGENT", DEFAULT_FETCH_USER_AGENT);
    let fetch_max_retries = parse_u32("SHOPSEED_FETCH_MAX_RETRIES", "0")?;
    let fetch_retry_backoff_base_secs = parse_u64("SHOPSEED_FETCH_RETRY_BACKOFF_BASE_SECS", "2")?;
    let ingest_concurrency = parse_usize("SHOPSEED_INGEST_CONCURRENCY", "4")?;

    let item_defaults = ItemDefaults {
        detail: or_default("SHOPSEED_ITEM_DETAIL", DEFAULT_ITEM_DETAIL),
        price: parse_u64("SHOPSEED_ITEM_PRICE", "0")?,
        quantity: parse_u32("SHOPSEED_ITEM_QUANTITY", "10")?,
    };
    if item_defaults.quantity == 0 {
        return Err(invalid(
            "SHOPSEED_ITEM_QUANTITY",
            "must be greater than zero".to_string(),
        ));
    }

    Ok(AppConfig {
        log_level,
        sites_path,
        export_dir,
        webdriver_url,
        element_wait_ms,
        catalog_endpoint,
        fetch_timeout_secs,
        submit_timeout_secs,
        fetch_user_agent,
        fetch_max_retries,
        fetch_retry_backoff_base_secs,
        ingest_concurrency,
        item_defaults,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
