//! Ordered fallback lookups for one logical page element.

use crate::error::SessionError;
use crate::session::{Locator, PageSession};

/// Position within a listing page. `group` is the outer block for layouts
/// that split results into several lists; `slot` is the image slot on a
/// detail page. All three are 1-based, matching XPath positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub group: u32,
    pub index: u32,
    pub slot: u32,
}

impl Cursor {
    #[must_use]
    pub fn start() -> Self {
        Self {
            group: 1,
            index: 1,
            slot: 1,
        }
    }

    #[must_use]
    pub fn with_slot(self, slot: u32) -> Self {
        Self { slot, ..self }
    }

    /// Substitute `{group}`, `{index}` and `{slot}` in a template.
    #[must_use]
    pub fn render(&self, template: &str) -> String {
        template
            .replace("{group}", &self.group.to_string())
            .replace("{index}", &self.index.to_string())
            .replace("{slot}", &self.slot.to_string())
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::start()
    }
}

/// Candidate locator templates tried in order; the first hit wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorStrategy {
    candidates: Vec<Locator>,
}

impl LocatorStrategy {
    #[must_use]
    pub fn new(candidates: Vec<Locator>) -> Self {
        Self { candidates }
    }

    /// Strategy made of XPath templates.
    #[must_use]
    pub fn xpath<I, T>(templates: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::new(
            templates
                .into_iter()
                .map(|t| Locator::XPath(t.into()))
                .collect(),
        )
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Concrete locators for `cursor`, in lookup order.
    pub fn candidates<'a>(&'a self, cursor: &'a Cursor) -> impl Iterator<Item = Locator> + 'a {
        self.candidates.iter().map(move |template| match template {
            Locator::XPath(t) => Locator::XPath(cursor.render(t)),
            Locator::Css(t) => Locator::Css(cursor.render(t)),
        })
    }

    /// Try each candidate once against the current page.
    ///
    /// Returns `Ok(None)` when every candidate misses. Only session-level
    /// failures are errors.
    ///
    /// # Errors
    ///
    /// Propagates the first [`SessionError`] raised by the session.
    pub async fn resolve<S>(
        &self,
        session: &S,
        cursor: &Cursor,
    ) -> Result<Option<S::Element>, SessionError>
    where
        S: PageSession + ?Sized,
    {
        for locator in self.candidates(cursor) {
            if let Some(element) = session.find_element(&locator).await? {
                return Ok(Some(element));
            }
            tracing::debug!(locator = %locator, "locator candidate missed");
        }
        Ok(None)
    }
}
