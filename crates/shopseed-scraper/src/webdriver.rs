//! [`PageSession`] backed by a WebDriver server through `fantoccini`.

use std::time::Duration;

use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::error::{CmdError, ErrorStatus};
use fantoccini::{Client, ClientBuilder};

use crate::error::SessionError;
use crate::session::{Locator, PageSession};

pub struct WebDriverSession {
    client: Client,
    element_wait: Duration,
}

impl WebDriverSession {
    /// Open a new browser session on the WebDriver server at `webdriver_url`.
    ///
    /// With a non-zero `element_wait`, lookups poll until the element appears
    /// or the wait elapses instead of probing once.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Connect`] if the server refuses or cannot be reached.
    pub async fn connect(webdriver_url: &str, element_wait: Duration) -> Result<Self, SessionError> {
        let client = ClientBuilder::native()
            .connect(webdriver_url)
            .await
            .map_err(|e| SessionError::Connect {
                url: webdriver_url.to_string(),
                reason: e.to_string(),
            })?;
        tracing::info!(webdriver = %webdriver_url, "browser session opened");
        Ok(Self {
            client,
            element_wait,
        })
    }
}

fn command_error(err: CmdError) -> SessionError {
    match &err {
        CmdError::Standard(wd) if matches!(wd.error, ErrorStatus::ElementClickIntercepted) => {
            SessionError::ClickIntercepted(wd.message.to_string())
        }
        _ => SessionError::Command(err.to_string()),
    }
}

fn to_fantoccini(locator: &Locator) -> fantoccini::Locator<'_> {
    match locator {
        Locator::XPath(expr) => fantoccini::Locator::XPath(expr),
        Locator::Css(expr) => fantoccini::Locator::Css(expr),
    }
}

#[async_trait]
impl PageSession for WebDriverSession {
    type Element = Element;

    async fn navigate(&self, url: &str) -> Result<(), SessionError> {
        self.client.goto(url).await.map_err(command_error)
    }

    async fn find_element(
        &self,
        locator: &Locator,
    ) -> Result<Option<Self::Element>, SessionError> {
        let target = to_fantoccini(locator);
        let result = if self.element_wait.is_zero() {
            self.client.find(target).await
        } else {
            self.client
                .wait()
                .at_most(self.element_wait)
                .for_element(target)
                .await
        };

        match result {
            Ok(element) => Ok(Some(element)),
            Err(e) if e.is_no_such_element() => Ok(None),
            Err(CmdError::WaitTimeout) => Ok(None),
            Err(e) => Err(command_error(e)),
        }
    }

    async fn text(&self, element: &Self::Element) -> Result<String, SessionError> {
        element.text().await.map_err(command_error)
    }

    async fn attribute(
        &self,
        element: &Self::Element,
        name: &str,
    ) -> Result<Option<String>, SessionError> {
        element.attr(name).await.map_err(command_error)
    }

    async fn click(&self, element: &Self::Element) -> Result<(), SessionError> {
        element.click().await.map(|_| ()).map_err(command_error)
    }

    async fn send_keys(&self, element: &Self::Element, keys: &str) -> Result<(), SessionError> {
        element.send_keys(keys).await.map_err(command_error)
    }

    async fn execute_script(&self, script: &str) -> Result<(), SessionError> {
        self.client
            .execute(script, Vec::new())
            .await
            .map(|_| ())
            .map_err(command_error)
    }

    async fn back(&self) -> Result<(), SessionError> {
        self.client.back().await.map_err(command_error)
    }

    async fn maximize_window(&self) -> Result<(), SessionError> {
        self.client.maximize_window().await.map_err(command_error)
    }

    async fn quit(&self) -> Result<(), SessionError> {
        self.client.clone().close().await.map_err(command_error)
    }
}
