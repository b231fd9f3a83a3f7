//! W3C WebDriver client.
//!
//! Talks plain HTTP+JSON to a WebDriver endpoint such as chromedriver. Each
//! [`BrowserDriver::launch`] creates a fresh WebDriver session, so concurrent
//! executions never share cookies or storage.

use std::{
    future::Future,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, Method};
use serde_json::{Value, json};

use super::{
    BrowserDriver, DriverError, DriverResult, PageHandle, Script, SessionHandle, scripts,
};

/// Default chromedriver address.
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";

/// Key under which W3C drivers return element references.
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Upper bound for establishing a connection to the WebDriver endpoint.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Upper bound for any single WebDriver command, page loads included.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Runs `poll` for at most `timeout`, including a request that hangs
/// mid-flight.
async fn within<T>(
    timeout: Duration,
    poll: impl Future<Output = DriverResult<T>>,
    describe: impl FnOnce() -> String,
) -> DriverResult<T> {
    match tokio::time::timeout(timeout, poll).await {
        Ok(result) => result,
        Err(_) => Err(DriverError::Timeout(describe())),
    }
}

/// Browser driver backed by a W3C WebDriver server.
#[derive(Debug, Clone)]
pub struct WebDriverClient {
    http: Client,
    base_url: String,
    headless: bool,
}

impl WebDriverClient {
    pub fn new(base_url: impl Into<String>) -> DriverResult<Self> {
        let http = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            headless: true,
        })
    }

    /// Run with a visible browser window.
    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn capabilities(&self) -> Value {
        let mut args = vec!["--no-sandbox", "--disable-dev-shm-usage", "--window-size=1366,900"];
        if self.headless {
            args.push("--headless=new");
        }
        json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": { "args": args }
                }
            }
        })
    }

    /// Sends one command and unwraps the `value` member of the response.
    async fn command(&self, method: Method, path: &str, body: Option<Value>) -> DriverResult<Value> {
        let url = format!("{}{path}", self.base_url);
        let mut request = self.http.request(method, &url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let mut payload: Value = response.json().await?;
        let value = payload.get_mut("value").map(Value::take).unwrap_or(Value::Null);

        if let Some(error) = value.get("error").and_then(Value::as_str) {
            let message = value
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            return Err(match error {
                "no such element" => DriverError::ElementNotFound(message),
                "timeout" | "script timeout" => DriverError::Timeout(message),
                "invalid session id" | "no such window" => DriverError::SessionClosed,
                "javascript error" => DriverError::Script(message),
                other => DriverError::Protocol {
                    error: other.to_string(),
                    message,
                },
            });
        }
        if !status.is_success() {
            return Err(DriverError::Protocol {
                error: status.to_string(),
                message: value.to_string(),
            });
        }
        Ok(value)
    }

    async fn find_element(&self, page: &PageHandle, locator: &str) -> DriverResult<String> {
        let value = self
            .command(
                Method::POST,
                &format!("/session/{}/element", page.session),
                Some(json!({ "using": "css selector", "value": locator })),
            )
            .await
            .map_err(|e| match e {
                DriverError::ElementNotFound(_) => DriverError::ElementNotFound(locator.to_string()),
                other => other,
            })?;

        value
            .get(ELEMENT_KEY)
            .and_then(Value::as_str)
            .map(String::from)
            .ok_or_else(|| DriverError::Protocol {
                error: "invalid element reference".to_string(),
                message: value.to_string(),
            })
    }

    /// Polls `document.readyState` until the page is interactive.
    async fn wait_for_ready(&self, page: &PageHandle, timeout: Duration) -> DriverResult<()> {
        within(timeout, self.poll_ready(page), || {
            format!("page not ready after {}ms", timeout.as_millis())
        })
        .await
    }

    async fn poll_ready(&self, page: &PageHandle) -> DriverResult<()> {
        loop {
            let state = self.evaluate(page, &scripts::READY_STATE, &[]).await?;
            if matches!(state.as_str(), Some("complete" | "interactive")) {
                return Ok(());
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn poll_selector(&self, page: &PageHandle, locator: &str) -> DriverResult<()> {
        loop {
            match self.find_element(page, locator).await {
                Ok(_) => return Ok(()),
                Err(DriverError::ElementNotFound(_)) => tokio::time::sleep(POLL_INTERVAL).await,
                Err(e) => return Err(e),
            }
        }
    }

    async fn poll_url_change(&self, page: &PageHandle, previous_url: &str) -> DriverResult<()> {
        while self.current_url(page).await? == previous_url {
            tokio::time::sleep(POLL_INTERVAL).await;
        }
        Ok(())
    }

    async fn open_at(&self, page: &PageHandle, url: &str, timeout: Duration) -> DriverResult<()> {
        self.command(
            Method::POST,
            &format!("/session/{}/timeouts", page.session),
            Some(json!({ "pageLoad": timeout.as_millis() as u64 })),
        )
        .await?;
        self.navigate(page, url, timeout).await
    }
}

#[async_trait]
impl BrowserDriver for WebDriverClient {
    async fn launch(
        &self,
        url: &str,
        timeout: Duration,
    ) -> DriverResult<(SessionHandle, PageHandle)> {
        let value = self
            .command(Method::POST, "/session", Some(self.capabilities()))
            .await?;
        let session_id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .map(String::from)
            .ok_or_else(|| DriverError::Protocol {
                error: "missing sessionId".to_string(),
                message: value.to_string(),
            })?;
        debug!("Created WebDriver session {session_id}");

        let session = SessionHandle(session_id.clone());
        let page = PageHandle {
            session: session_id,
            target: "current".to_string(),
        };

        // Close the new session if its first page never loads
        if let Err(e) = self.open_at(&page, url, timeout).await {
            if let Err(close_err) = self.close(&session).await {
                warn!("Failed to close session {} after launch error: {close_err}", session.0);
            }
            return Err(e);
        }
        Ok((session, page))
    }

    async fn navigate(&self, page: &PageHandle, url: &str, timeout: Duration) -> DriverResult<()> {
        let start = Instant::now();
        let path = format!("/session/{}/url", page.session);
        let request = self.command(
            Method::POST,
            &path,
            Some(json!({ "url": url })),
        );
        within(timeout, request, || {
            format!("{url} did not load within {}ms", timeout.as_millis())
        })
        .await
        .map_err(|e| match e {
            DriverError::Protocol { message, .. } => DriverError::Navigation(message),
            other => other,
        })?;
        self.wait_for_ready(page, timeout.saturating_sub(start.elapsed()))
            .await?;
        debug!("Navigated to {url}");
        Ok(())
    }

    async fn wait_for_selector(
        &self,
        page: &PageHandle,
        locator: &str,
        timeout: Duration,
    ) -> DriverResult<()> {
        within(timeout, self.poll_selector(page, locator), || {
            format!("'{locator}' did not appear within {}ms", timeout.as_millis())
        })
        .await
    }

    async fn click(&self, page: &PageHandle, locator: &str) -> DriverResult<()> {
        let element = self.find_element(page, locator).await?;
        self.command(
            Method::POST,
            &format!("/session/{}/element/{element}/click", page.session),
            Some(json!({})),
        )
        .await?;
        Ok(())
    }

    async fn type_text(&self, page: &PageHandle, locator: &str, text: &str) -> DriverResult<()> {
        let element = self.find_element(page, locator).await?;
        self.command(
            Method::POST,
            &format!("/session/{}/element/{element}/value", page.session),
            Some(json!({ "text": text })),
        )
        .await?;
        Ok(())
    }

    async fn evaluate(
        &self,
        page: &PageHandle,
        script: &Script,
        args: &[Value],
    ) -> DriverResult<Value> {
        self.command(
            Method::POST,
            &format!("/session/{}/execute/sync", page.session),
            Some(json!({ "script": script.source, "args": args })),
        )
        .await
    }

    async fn current_url(&self, page: &PageHandle) -> DriverResult<String> {
        let value = self
            .command(Method::GET, &format!("/session/{}/url", page.session), None)
            .await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    async fn wait_for_navigation(
        &self,
        page: &PageHandle,
        previous_url: &str,
        timeout: Duration,
    ) -> DriverResult<()> {
        let start = Instant::now();
        within(timeout, self.poll_url_change(page, previous_url), || {
            format!("page stayed on {previous_url} for {}ms", timeout.as_millis())
        })
        .await?;
        self.wait_for_ready(page, timeout.saturating_sub(start.elapsed()))
            .await
    }

    async fn close(&self, session: &SessionHandle) -> DriverResult<()> {
        self.command(Method::DELETE, &format!("/session/{}", session.0), None)
            .await?;
        debug!("Closed WebDriver session {}", session.0);
        Ok(())
    }
}
