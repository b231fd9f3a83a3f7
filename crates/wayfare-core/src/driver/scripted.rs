//! In-memory [`BrowserDriver`] with canned listings and injectable failures.
//!
//! Every call is recorded as a [`DriverAction`] so tests can assert on the
//! exact sequence of browser interactions, and session bookkeeping tracks
//! which sessions are still open.

use std::{
    collections::HashSet,
    sync::{
        Mutex, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use serde_json::Value;

use super::{
    BrowserDriver, DriverError, DriverResult, PageHandle, RawListing, Script, SessionHandle,
    scripts,
};

/// One recorded driver call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverAction {
    Launch { url: String },
    Navigate { url: String },
    WaitFor { locator: String },
    Click { locator: String },
    Type { locator: String, text: String },
    Evaluate { script: &'static str },
    WaitForNavigation,
    Close { session: String },
}

#[derive(Debug, Default)]
struct State {
    actions: Vec<DriverAction>,
    open: HashSet<String>,
    launched: usize,
    closed: usize,
    url: String,
}

/// Scripted browser driver.
///
/// ```rust
/// use wayfare_core::driver::{RawListing, ScriptedDriver};
///
/// let driver = ScriptedDriver::new()
///     .with_listings(vec![RawListing {
///         name: "Casa Azul".to_string(),
///         price: "€ 1,240".to_string(),
///         rating: "8.7".to_string(),
///         url: "https://example.com/casa-azul".to_string(),
///     }])
///     .with_missing_selector("button[type=\"submit\"]");
/// assert_eq!(driver.open_sessions(), 0);
/// ```
#[derive(Debug, Default)]
pub struct ScriptedDriver {
    listings: Vec<RawListing>,
    missing: HashSet<String>,
    launch_failure: Option<String>,
    navigation_timeout: bool,
    action_delay: Option<Duration>,
    page_load_delay: Option<Duration>,
    next_id: AtomicU64,
    state: Mutex<State>,
}

impl ScriptedDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listings returned by the extraction script.
    pub fn with_listings(mut self, listings: Vec<RawListing>) -> Self {
        self.listings = listings;
        self
    }

    /// Makes every wait on `locator` time out and every click or type on it
    /// fail with [`DriverError::ElementNotFound`].
    pub fn with_missing_selector(mut self, locator: impl Into<String>) -> Self {
        self.missing.insert(locator.into());
        self
    }

    /// Makes `launch` fail with a navigation error.
    pub fn with_launch_failure(mut self, message: impl Into<String>) -> Self {
        self.launch_failure = Some(message.into());
        self
    }

    /// Makes `wait_for_navigation` time out.
    pub fn with_navigation_timeout(mut self) -> Self {
        self.navigation_timeout = true;
        self
    }

    /// Sleeps for `delay` inside every interaction, to keep runs in flight.
    pub fn with_action_delay(mut self, delay: Duration) -> Self {
        self.action_delay = Some(delay);
        self
    }

    /// Sleeps for `delay` inside `launch` after the session exists, like a
    /// real driver waiting for the first page to load.
    pub fn with_page_load_delay(mut self, delay: Duration) -> Self {
        self.page_load_delay = Some(delay);
        self
    }

    /// Every call made so far, in order.
    pub fn actions(&self) -> Vec<DriverAction> {
        self.state().actions.clone()
    }

    /// Number of sessions ever launched.
    pub fn launched(&self) -> usize {
        self.state().launched
    }

    /// Number of sessions closed.
    pub fn closed(&self) -> usize {
        self.state().closed
    }

    /// Sessions launched and not yet closed.
    pub fn open_sessions(&self) -> usize {
        self.state().open.len()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, action: DriverAction) {
        self.state().actions.push(action);
    }

    async fn pause(&self) {
        if let Some(delay) = self.action_delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn check_open(&self, page: &PageHandle) -> DriverResult<()> {
        if self.state().open.contains(&page.session) {
            Ok(())
        } else {
            Err(DriverError::SessionClosed)
        }
    }

    fn check_present(&self, locator: &str) -> DriverResult<()> {
        if self.missing.contains(locator) {
            Err(DriverError::ElementNotFound(locator.to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl BrowserDriver for ScriptedDriver {
    async fn launch(
        &self,
        url: &str,
        _timeout: Duration,
    ) -> DriverResult<(SessionHandle, PageHandle)> {
        self.record(DriverAction::Launch {
            url: url.to_string(),
        });
        self.pause().await;
        if let Some(message) = &self.launch_failure {
            return Err(DriverError::Navigation(message.clone()));
        }

        let id = format!("scripted-{}", self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        {
            let mut state = self.state();
            state.open.insert(id.clone());
            state.launched += 1;
            state.url = url.to_string();
        }
        if let Some(delay) = self.page_load_delay {
            tokio::time::sleep(delay).await;
        }
        let page = PageHandle {
            session: id.clone(),
            target: "main".to_string(),
        };
        Ok((SessionHandle(id), page))
    }

    async fn navigate(&self, page: &PageHandle, url: &str, _timeout: Duration) -> DriverResult<()> {
        self.record(DriverAction::Navigate {
            url: url.to_string(),
        });
        self.check_open(page)?;
        self.state().url = url.to_string();
        Ok(())
    }

    async fn wait_for_selector(
        &self,
        page: &PageHandle,
        locator: &str,
        timeout: Duration,
    ) -> DriverResult<()> {
        self.record(DriverAction::WaitFor {
            locator: locator.to_string(),
        });
        self.pause().await;
        self.check_open(page)?;
        if self.missing.contains(locator) {
            return Err(DriverError::Timeout(format!(
                "'{locator}' did not appear within {}ms",
                timeout.as_millis()
            )));
        }
        Ok(())
    }

    async fn click(&self, page: &PageHandle, locator: &str) -> DriverResult<()> {
        self.record(DriverAction::Click {
            locator: locator.to_string(),
        });
        self.check_open(page)?;
        self.check_present(locator)
    }

    async fn type_text(&self, page: &PageHandle, locator: &str, text: &str) -> DriverResult<()> {
        self.record(DriverAction::Type {
            locator: locator.to_string(),
            text: text.to_string(),
        });
        self.check_open(page)?;
        self.check_present(locator)
    }

    async fn evaluate(
        &self,
        page: &PageHandle,
        script: &Script,
        _args: &[Value],
    ) -> DriverResult<Value> {
        self.record(DriverAction::Evaluate {
            script: script.name,
        });
        self.check_open(page)?;
        match script.name {
            name if name == scripts::EXTRACT_LISTINGS.name => {
                Ok(serde_json::to_value(&self.listings)?)
            }
            name if name == scripts::READY_STATE.name => Ok(Value::from("complete")),
            name if name == scripts::SET_GUEST_COUNTS.name => {
                Ok(Value::Array(vec![Value::Bool(true), Value::Bool(true)]))
            }
            _ => Ok(Value::Bool(true)),
        }
    }

    async fn current_url(&self, page: &PageHandle) -> DriverResult<String> {
        self.check_open(page)?;
        Ok(self.state().url.clone())
    }

    async fn wait_for_navigation(
        &self,
        page: &PageHandle,
        previous_url: &str,
        timeout: Duration,
    ) -> DriverResult<()> {
        self.record(DriverAction::WaitForNavigation);
        self.check_open(page)?;
        if self.navigation_timeout {
            return Err(DriverError::Timeout(format!(
                "page stayed on {previous_url} for {}ms",
                timeout.as_millis()
            )));
        }
        self.state().url = format!("{}/searchresults", previous_url.trim_end_matches('/'));
        Ok(())
    }

    async fn close(&self, session: &SessionHandle) -> DriverResult<()> {
        self.record(DriverAction::Close {
            session: session.0.clone(),
        });
        let mut state = self.state();
        if state.open.remove(&session.0) {
            state.closed += 1;
            Ok(())
        } else {
            Err(DriverError::SessionClosed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WAIT: Duration = Duration::from_millis(10);

    #[tokio::test]
    async fn test_launch_and_close_tracks_sessions() {
        let driver = ScriptedDriver::new();
        let (session, page) = driver.launch("https://example.com", WAIT).await.unwrap();
        assert_eq!(driver.open_sessions(), 1);
        assert_eq!(page.session, session.0);

        driver.close(&session).await.unwrap();
        assert_eq!(driver.open_sessions(), 0);
        assert_eq!(driver.closed(), 1);

        // Second close reports the session as gone
        assert!(matches!(
            driver.close(&session).await,
            Err(DriverError::SessionClosed)
        ));
        assert_eq!(driver.closed(), 1);
    }

    #[tokio::test]
    async fn test_missing_selector_times_out() {
        let driver = ScriptedDriver::new().with_missing_selector("#gone");
        let (_, page) = driver.launch("https://example.com", WAIT).await.unwrap();

        assert!(matches!(
            driver.wait_for_selector(&page, "#gone", WAIT).await,
            Err(DriverError::Timeout(_))
        ));
        assert!(matches!(
            driver.click(&page, "#gone").await,
            Err(DriverError::ElementNotFound(_))
        ));
        assert!(driver.wait_for_selector(&page, "#here", WAIT).await.is_ok());
    }

    #[tokio::test]
    async fn test_extraction_returns_listings() {
        let listing = RawListing {
            name: "Hotel Uno".to_string(),
            ..RawListing::default()
        };
        let driver = ScriptedDriver::new().with_listings(vec![listing.clone()]);
        let (_, page) = driver.launch("https://example.com", WAIT).await.unwrap();

        let value = driver
            .evaluate(&page, &scripts::EXTRACT_LISTINGS, &[])
            .await
            .unwrap();
        let listings: Vec<RawListing> = serde_json::from_value(value).unwrap();
        assert_eq!(listings, vec![listing]);
    }

    #[tokio::test]
    async fn test_calls_on_closed_session_fail() {
        let driver = ScriptedDriver::new();
        let (session, page) = driver.launch("https://example.com", WAIT).await.unwrap();
        driver.close(&session).await.unwrap();

        assert!(matches!(
            driver.click(&page, "button").await,
            Err(DriverError::SessionClosed)
        ));
    }
}
