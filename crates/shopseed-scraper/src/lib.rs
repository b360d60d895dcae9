pub mod driver;
pub mod error;
pub mod locator;
pub mod orchestrator;
pub mod profile;
pub mod session;
pub mod state;
pub mod webdriver;

#[cfg(test)]
pub(crate) mod fake_session;

pub use driver::{SiteDriver, SiteRun};
pub use error::{ScraperError, SessionError};
pub use locator::{Cursor, LocatorStrategy};
pub use orchestrator::{export, Orchestrator, SiteSummary};
pub use profile::{profile_for, SiteProfile};
pub use session::{Locator, PageSession};
pub use state::ExtractionState;
pub use webdriver::WebDriverSession;
