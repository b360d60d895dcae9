use shopseed_core::SiteType;
use thiserror::Error;

/// Failures reported by a browser session. A missing element is not one of
/// them; lookups report absence as `Ok(None)`.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to open browser session at {url}: {reason}")]
    Connect { url: String, reason: String },

    #[error("click intercepted by another element: {0}")]
    ClickIntercepted(String),

    #[error("browser command failed: {0}")]
    Command(String),
}

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("extraction aborted on {entry_url}: {source}")]
    Site {
        entry_url: String,
        #[source]
        source: SessionError,
    },

    #[error("no extraction profile registered for site type {0}")]
    MissingProfile(SiteType),

    #[error("failed to export extracted records: {0}")]
    Export(#[from] shopseed_store::StoreError),
}
