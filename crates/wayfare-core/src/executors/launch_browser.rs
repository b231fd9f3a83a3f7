use async_trait::async_trait;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::{StepExecutor, navigation_error};
use crate::{
    config::Timeouts,
    context::{ContextUpdate, ExecutionContext},
    driver::BrowserDriver,
    error::Result,
};

/// Opens a new browser session on `website_url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchBrowser {
    pub website_url: String,
}

#[async_trait]
impl StepExecutor for LaunchBrowser {
    async fn execute(
        &self,
        driver: &dyn BrowserDriver,
        timeouts: &Timeouts,
        _context: &ExecutionContext,
    ) -> Result<ContextUpdate> {
        let (session, page) = driver
            .launch(&self.website_url, timeouts.navigation)
            .await
            .map_err(navigation_error)?;

        // The session is not in the context yet, so close it here on failure
        if let Err(e) = driver.wait_for_selector(&page, "body", timeouts.input).await {
            if let Err(close_err) = driver.close(&session).await {
                warn!("Failed to close session {} after launch error: {close_err}", session.0);
            }
            return Err(navigation_error(e));
        }

        debug!("Browser session {} opened on {}", session.0, self.website_url);
        Ok(ContextUpdate::launched(session, page))
    }
}
