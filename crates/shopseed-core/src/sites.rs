use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// The storefront family an entry URL belongs to. Each family has its own
/// page structure and therefore its own extraction profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteType {
    SamsungStore,
    OliveYoungRanking,
    SsfShop,
    DaisoSearch,
    KyoboBestseller,
}

impl SiteType {
    pub const ALL: [SiteType; 5] = [
        SiteType::SamsungStore,
        SiteType::OliveYoungRanking,
        SiteType::SsfShop,
        SiteType::DaisoSearch,
        SiteType::KyoboBestseller,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SiteType::SamsungStore => "samsung_store",
            SiteType::OliveYoungRanking => "olive_young_ranking",
            SiteType::SsfShop => "ssf_shop",
            SiteType::DaisoSearch => "daiso_search",
            SiteType::KyoboBestseller => "kyobo_bestseller",
        }
    }
}

impl std::fmt::Display for SiteType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for SiteType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SiteType::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| {
                let known: Vec<&str> = SiteType::ALL.iter().map(|t| t.as_str()).collect();
                ConfigError::Validation(format!(
                    "unknown site type '{s}'; expected one of {}",
                    known.join(", ")
                ))
            })
    }
}

/// One entry point to extract: where to start, which profile to apply, and
/// the catalog category every item found there belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    pub entry_url: String,
    pub category_id: u32,
    pub site_type: SiteType,
}

#[derive(Debug, Deserialize)]
pub struct SitesFile {
    pub sites: Vec<SiteConfig>,
}

/// Load and validate the site list from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_sites(path: &Path) -> Result<SitesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SitesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let sites_file: SitesFile =
        serde_yaml::from_str(&content).map_err(ConfigError::SitesFileParse)?;

    validate_sites(&sites_file)?;

    Ok(sites_file)
}

fn validate_sites(sites_file: &SitesFile) -> Result<(), ConfigError> {
    if sites_file.sites.is_empty() {
        return Err(ConfigError::Validation(
            "sites file must list at least one site".to_string(),
        ));
    }

    let mut seen = HashSet::new();

    for site in &sites_file.sites {
        let url = site.entry_url.trim();
        let rest = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"));
        match rest {
            Some(host_and_path) if !host_and_path.is_empty() && !host_and_path.starts_with('/') => {}
            _ => {
                return Err(ConfigError::Validation(format!(
                    "site entry_url '{}' must be an absolute http(s) URL",
                    site.entry_url
                )));
            }
        }

        if site.category_id == 0 {
            return Err(ConfigError::Validation(format!(
                "site '{}' has category_id 0; must be positive",
                site.entry_url
            )));
        }

        if !seen.insert((url.to_string(), site.category_id)) {
            return Err(ConfigError::Validation(format!(
                "duplicate site: '{}' with category_id {}",
                site.entry_url, site.category_id
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "sites_test.rs"]
mod tests;
