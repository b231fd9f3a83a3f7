//! Per-run resource slots shared between steps.

use log::{debug, warn};

use crate::{
    driver::{BrowserDriver, PageHandle, SessionHandle},
    error::{EngineError, Result},
};

/// Resources a step can produce or require.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Browser,
    Page,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Browser => "browser",
            Resource::Page => "page",
        }
    }
}

/// Resources produced by one step, merged into the context after it succeeds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextUpdate {
    pub browser: Option<SessionHandle>,
    pub page: Option<PageHandle>,
}

impl ContextUpdate {
    /// No new resources.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn launched(browser: SessionHandle, page: PageHandle) -> Self {
        Self {
            browser: Some(browser),
            page: Some(page),
        }
    }
}

/// Typed resource slots owned by one workflow run.
#[derive(Debug, Default)]
pub struct ExecutionContext {
    browser: Option<SessionHandle>,
    page: Option<PageHandle>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_browser(&mut self, browser: SessionHandle) {
        self.browser = Some(browser);
    }

    pub fn set_page(&mut self, page: PageHandle) {
        self.page = Some(page);
    }

    /// Merges the resources a step produced.
    pub fn apply(&mut self, update: ContextUpdate) {
        if let Some(browser) = update.browser {
            self.set_browser(browser);
        }
        if let Some(page) = update.page {
            self.set_page(page);
        }
    }

    /// The live page, or [`EngineError::ContextMissing`].
    pub fn page(&self) -> Result<&PageHandle> {
        self.page.as_ref().ok_or(EngineError::ContextMissing {
            resource: Resource::Page.as_str(),
        })
    }

    pub fn browser(&self) -> Option<&SessionHandle> {
        self.browser.as_ref()
    }

    pub fn has(&self, resource: Resource) -> bool {
        match resource {
            Resource::Browser => self.browser.is_some(),
            Resource::Page => self.page.is_some(),
        }
    }

    /// Takes the session out of the context so a second release is a no-op.
    pub fn take_browser(&mut self) -> Option<SessionHandle> {
        self.page = None;
        self.browser.take()
    }

    /// Closes the browser session, if one is held.
    ///
    /// Returns whether a session was closed. Close failures are logged, not
    /// returned.
    pub async fn release(&mut self, driver: &dyn BrowserDriver) -> bool {
        let Some(session) = self.take_browser() else {
            return false;
        };
        match driver.close(&session).await {
            Ok(()) => debug!("Released browser session {}", session.0),
            Err(e) => warn!("Failed to close browser session {}: {e}", session.0),
        }
        true
    }
}
