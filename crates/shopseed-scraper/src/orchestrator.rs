//! Sequential, single-session extraction across the configured site list.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use shopseed_core::{SiteConfig, SiteType};

use crate::driver::SiteDriver;
use crate::error::{ScraperError, SessionError};
use crate::profile::{profile_for, SiteProfile};
use crate::session::PageSession;
use crate::state::ExtractionState;

/// Per-site outcome of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSummary {
    pub entry_url: String,
    pub site_type: SiteType,
    pub items: usize,
    pub images: usize,
    pub exhausted: bool,
}

pub struct Orchestrator<'s, S: PageSession + ?Sized> {
    session: &'s S,
    profiles: HashMap<SiteType, SiteProfile>,
}

impl<'s, S: PageSession + ?Sized> Orchestrator<'s, S> {
    /// Orchestrator using the built-in profile for every site type.
    #[must_use]
    pub fn new(session: &'s S) -> Self {
        let profiles = SiteType::ALL
            .into_iter()
            .map(|t| (t, profile_for(t)))
            .collect();
        Self { session, profiles }
    }

    /// Replace the profile used for `site_type`.
    #[must_use]
    pub fn with_profile(mut self, site_type: SiteType, profile: SiteProfile) -> Self {
        self.profiles.insert(site_type, profile);
        self
    }

    /// Visit each site in order, accumulating records into `state`.
    ///
    /// Sites are never visited concurrently; the session is exclusive.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Site`] on the first unrecoverable session
    /// failure. Everything extracted before it remains in `state`.
    pub async fn run(
        &self,
        sites: &[SiteConfig],
        state: &mut ExtractionState,
    ) -> Result<Vec<SiteSummary>, ScraperError> {
        let mut summaries = Vec::with_capacity(sites.len());

        for (position, site) in sites.iter().enumerate() {
            let profile = self
                .profiles
                .get(&site.site_type)
                .ok_or(ScraperError::MissingProfile(site.site_type))?;

            tracing::info!(
                site = %site.entry_url,
                site_type = %site.site_type,
                category_id = site.category_id,
                position = position + 1,
                total = sites.len(),
                "extracting site"
            );

            let site_err = |source: SessionError| ScraperError::Site {
                entry_url: site.entry_url.clone(),
                source,
            };

            self.session
                .navigate(&site.entry_url)
                .await
                .map_err(site_err)?;

            let run = SiteDriver::new(profile)
                .run(self.session, site, state)
                .await
                .map_err(site_err)?;

            tracing::info!(
                site = %site.entry_url,
                items = run.items,
                images = run.images,
                exhausted = run.exhausted,
                "site complete"
            );

            summaries.push(SiteSummary {
                entry_url: site.entry_url.clone(),
                site_type: site.site_type,
                items: run.items,
                images: run.images,
                exhausted: run.exhausted,
            });
        }

        Ok(summaries)
    }
}

/// Write the records accumulated in `state` to the intermediate store under `dir`.
///
/// # Errors
///
/// Returns [`ScraperError::Export`] if any file cannot be written.
pub fn export(state: &ExtractionState, dir: &Path) -> Result<Vec<PathBuf>, ScraperError> {
    Ok(shopseed_store::export(dir, state.items(), state.images())?)
}
