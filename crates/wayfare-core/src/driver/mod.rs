//! Browser driver capability.
//!
//! The engine programs against [`BrowserDriver`] only. Two implementations
//! ship with the crate:
//!
//! - [`WebDriverClient`]: W3C WebDriver over HTTP (chromedriver, geckodriver)
//! - [`ScriptedDriver`]: in-memory driver with canned listings and injectable
//!   failures, used by tests and dry runs
//!
//! Page-side logic that goes beyond locate/click/type is expressed as named
//! [`Script`]s evaluated in the page, see [`scripts`].

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub mod scripted;
pub mod scripts;
pub mod webdriver;

pub use scripted::{DriverAction, ScriptedDriver};
pub use webdriver::WebDriverClient;

/// Opaque handle to one isolated browser session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionHandle(pub String);

/// Opaque handle to the page a session is driving.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageHandle {
    /// Session that owns the page
    pub session: String,
    /// Driver-specific page identifier
    pub target: String,
}

/// A piece of page-side JavaScript with a stable name.
///
/// Arguments are passed positionally and read as `arguments[n]` by the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Script {
    pub name: &'static str,
    pub source: &'static str,
}

/// One listing as read from a result card, before parsing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawListing {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub rating: String,
    #[serde(default)]
    pub url: String,
}

/// Browser driver errors.
#[derive(Debug, Error)]
pub enum DriverError {
    /// A bounded wait expired.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// No element matched the locator.
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// Navigation failed outright.
    #[error("Navigation failed: {0}")]
    Navigation(String),

    /// Script evaluation threw in the page.
    #[error("JavaScript error: {0}")]
    Script(String),

    /// The driver endpoint could not be reached.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The driver answered with an error payload.
    #[error("Driver protocol error: {error}: {message}")]
    Protocol { error: String, message: String },

    /// The session was already closed.
    #[error("Session closed")]
    SessionClosed,
}

impl From<reqwest::Error> for DriverError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            DriverError::Timeout(e.to_string())
        } else {
            DriverError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for DriverError {
    fn from(e: serde_json::Error) -> Self {
        DriverError::Protocol {
            error: "invalid response".to_string(),
            message: e.to_string(),
        }
    }
}

pub type DriverResult<T> = Result<T, DriverError>;

/// Capability surface the engine needs from a browser automation backend.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Open a new isolated session and navigate its page to `url`, waiting at
    /// most `timeout` for the document to become interactive.
    async fn launch(&self, url: &str, timeout: Duration)
    -> DriverResult<(SessionHandle, PageHandle)>;

    /// Navigate an existing page.
    async fn navigate(&self, page: &PageHandle, url: &str, timeout: Duration) -> DriverResult<()>;

    /// Wait until `locator` resolves to at least one element.
    async fn wait_for_selector(
        &self,
        page: &PageHandle,
        locator: &str,
        timeout: Duration,
    ) -> DriverResult<()>;

    /// Click the first element matching `locator`.
    async fn click(&self, page: &PageHandle, locator: &str) -> DriverResult<()>;

    /// Type `text` into the first element matching `locator`.
    async fn type_text(&self, page: &PageHandle, locator: &str, text: &str) -> DriverResult<()>;

    /// Evaluate a script in the page and return its JSON result.
    async fn evaluate(&self, page: &PageHandle, script: &Script, args: &[Value])
    -> DriverResult<Value>;

    /// URL the page currently shows.
    async fn current_url(&self, page: &PageHandle) -> DriverResult<String>;

    /// Wait until the page has left `previous_url` and is interactive again.
    async fn wait_for_navigation(
        &self,
        page: &PageHandle,
        previous_url: &str,
        timeout: Duration,
    ) -> DriverResult<()>;

    /// Close the session and every page it owns.
    async fn close(&self, session: &SessionHandle) -> DriverResult<()>;
}
