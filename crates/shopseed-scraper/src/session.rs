//! The browser capability the extraction engine drives.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::SessionError;

/// WebDriver key code for Enter.
pub const ENTER_KEY: &str = "\u{e007}";

/// A single element-location expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    XPath(String),
    Css(String),
}

impl Locator {
    #[must_use]
    pub fn expression(&self) -> &str {
        match self {
            Locator::XPath(expr) | Locator::Css(expr) => expr,
        }
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Locator::XPath(expr) => write!(f, "xpath:{expr}"),
            Locator::Css(expr) => write!(f, "css:{expr}"),
        }
    }
}

/// An exclusive, stateful page session. Every call completes before the next
/// is issued; implementations are never shared between concurrent callers.
#[async_trait]
pub trait PageSession: Send + Sync {
    type Element: Clone + Send + Sync;

    async fn navigate(&self, url: &str) -> Result<(), SessionError>;

    /// Look up one element. Absence is `Ok(None)`.
    async fn find_element(&self, locator: &Locator)
        -> Result<Option<Self::Element>, SessionError>;

    async fn text(&self, element: &Self::Element) -> Result<String, SessionError>;

    async fn attribute(
        &self,
        element: &Self::Element,
        name: &str,
    ) -> Result<Option<String>, SessionError>;

    async fn click(&self, element: &Self::Element) -> Result<(), SessionError>;

    async fn send_keys(&self, element: &Self::Element, keys: &str) -> Result<(), SessionError>;

    async fn execute_script(&self, script: &str) -> Result<(), SessionError>;

    async fn back(&self) -> Result<(), SessionError>;

    async fn maximize_window(&self) -> Result<(), SessionError>;

    async fn quit(&self) -> Result<(), SessionError>;

    /// Give client-side rendering time to finish. The page exposes no
    /// readiness signal, so this is a plain pause.
    async fn settle(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}
