//! Scripted in-memory page session for exercising the extraction engine.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::SessionError;
use crate::session::{Locator, PageSession};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Navigate(String),
    Click(String),
    SendKeys(String, String),
    Script(String),
    Back,
    Maximize,
    Settle(Duration),
    Quit,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct FakeNode {
    text: String,
    attributes: HashMap<String, String>,
    opens: Option<String>,
    intercepts_click: bool,
}

impl FakeNode {
    pub(crate) fn text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Self::default()
        }
    }

    pub(crate) fn image(src: &str) -> Self {
        let mut node = Self::default();
        node.attributes.insert("src".to_string(), src.to_string());
        node
    }

    /// Clicking this node navigates to `page`.
    pub(crate) fn opens(mut self, page: &str) -> Self {
        self.opens = Some(page.to_string());
        self
    }

    pub(crate) fn intercepts_click(mut self) -> Self {
        self.intercepts_click = true;
        self
    }
}

#[derive(Debug, Clone)]
pub(crate) struct FakeElement {
    page: String,
    expr: String,
}

#[derive(Default)]
struct Inner {
    page: String,
    history: Vec<String>,
    nodes: HashMap<(String, String), FakeNode>,
    lookups: Vec<String>,
    calls: Vec<Call>,
    failing_lookups: bool,
    failing_navigation: HashSet<String>,
}

pub(crate) struct FakeSession {
    inner: Mutex<Inner>,
}

impl FakeSession {
    pub(crate) fn new(start_page: &str) -> Self {
        Self {
            inner: Mutex::new(Inner {
                page: start_page.to_string(),
                ..Inner::default()
            }),
        }
    }

    pub(crate) fn with(self, page: &str, expr: &str, node: FakeNode) -> Self {
        self.lock()
            .nodes
            .insert((page.to_string(), expr.to_string()), node);
        self
    }

    pub(crate) fn failing_lookups(self) -> Self {
        self.lock().failing_lookups = true;
        self
    }

    pub(crate) fn failing_navigation(self, url: &str) -> Self {
        self.lock().failing_navigation.insert(url.to_string());
        self
    }

    pub(crate) fn lookups(&self) -> Vec<String> {
        self.lock().lookups.clone()
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub(crate) fn current_page(&self) -> String {
        self.lock().page.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }

    fn node(&self, element: &FakeElement) -> Result<FakeNode, SessionError> {
        self.lock()
            .nodes
            .get(&(element.page.clone(), element.expr.clone()))
            .cloned()
            .ok_or_else(|| SessionError::Command(format!("stale element {}", element.expr)))
    }
}

#[async_trait]
impl PageSession for FakeSession {
    type Element = FakeElement;

    async fn navigate(&self, url: &str) -> Result<(), SessionError> {
        let mut inner = self.lock();
        inner.calls.push(Call::Navigate(url.to_string()));
        if inner.failing_navigation.contains(url) {
            return Err(SessionError::Command(format!("navigation to {url} failed")));
        }
        let previous = std::mem::replace(&mut inner.page, url.to_string());
        inner.history.push(previous);
        Ok(())
    }

    async fn find_element(
        &self,
        locator: &Locator,
    ) -> Result<Option<Self::Element>, SessionError> {
        let mut inner = self.lock();
        if inner.failing_lookups {
            return Err(SessionError::Command("session terminated".to_string()));
        }
        let expr = locator.expression().to_string();
        inner.lookups.push(expr.clone());
        let key = (inner.page.clone(), expr.clone());
        Ok(inner.nodes.contains_key(&key).then(|| FakeElement {
            page: key.0,
            expr,
        }))
    }

    async fn text(&self, element: &Self::Element) -> Result<String, SessionError> {
        Ok(self.node(element)?.text)
    }

    async fn attribute(
        &self,
        element: &Self::Element,
        name: &str,
    ) -> Result<Option<String>, SessionError> {
        Ok(self.node(element)?.attributes.get(name).cloned())
    }

    async fn click(&self, element: &Self::Element) -> Result<(), SessionError> {
        let node = self.node(element)?;
        let mut inner = self.lock();
        inner.calls.push(Call::Click(element.expr.clone()));
        if node.intercepts_click {
            return Err(SessionError::ClickIntercepted(element.expr.clone()));
        }
        if let Some(target) = node.opens {
            let previous = std::mem::replace(&mut inner.page, target);
            inner.history.push(previous);
        }
        Ok(())
    }

    async fn send_keys(&self, element: &Self::Element, keys: &str) -> Result<(), SessionError> {
        self.node(element)?;
        self.lock()
            .calls
            .push(Call::SendKeys(element.expr.clone(), keys.to_string()));
        Ok(())
    }

    async fn execute_script(&self, script: &str) -> Result<(), SessionError> {
        self.lock().calls.push(Call::Script(script.to_string()));
        Ok(())
    }

    async fn back(&self) -> Result<(), SessionError> {
        let mut inner = self.lock();
        inner.calls.push(Call::Back);
        if let Some(previous) = inner.history.pop() {
            inner.page = previous;
        }
        Ok(())
    }

    async fn maximize_window(&self) -> Result<(), SessionError> {
        self.lock().calls.push(Call::Maximize);
        Ok(())
    }

    async fn quit(&self) -> Result<(), SessionError> {
        self.lock().calls.push(Call::Quit);
        Ok(())
    }

    async fn settle(&self, duration: Duration) {
        self.lock().calls.push(Call::Settle(duration));
    }
}
