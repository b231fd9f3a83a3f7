use async_trait::async_trait;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{StepExecutor, element_error, navigation_error};
use crate::{
    catalog::TaskKind,
    config::Timeouts,
    context::{ContextUpdate, ExecutionContext},
    driver::{BrowserDriver, scripts},
    error::{EngineError, Result},
};

/// Clicks an element addressed either by CSS selector or by a date cell of
/// an open date picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickElement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<Date>,
    #[serde(default)]
    pub wait_for_navigation: bool,
}

impl ClickElement {
    pub fn on(selector: impl Into<String>) -> Self {
        Self {
            selector: Some(selector.into()),
            date: None,
            wait_for_navigation: false,
        }
    }

    pub fn on_date(date: Date) -> Self {
        Self {
            selector: None,
            date: Some(date),
            wait_for_navigation: false,
        }
    }

    /// Wait for the page to navigate after the click.
    pub fn with_navigation(mut self) -> Self {
        self.wait_for_navigation = true;
        self
    }

    /// Locator of the element to click.
    pub fn locator(&self) -> Result<String> {
        match (self.selector.as_deref(), self.date) {
            (Some(selector), None) if !selector.trim().is_empty() => Ok(selector.to_string()),
            (None, Some(date)) => Ok(format!(r#"[data-date="{date}"]"#)),
            _ => Err(EngineError::invalid_step(
                TaskKind::ClickElement.as_str(),
                "exactly one of selector or date must be set",
            )),
        }
    }
}

#[async_trait]
impl StepExecutor for ClickElement {
    async fn execute(
        &self,
        driver: &dyn BrowserDriver,
        timeouts: &Timeouts,
        context: &ExecutionContext,
    ) -> Result<ContextUpdate> {
        let locator = self.locator()?;
        let page = context.page()?;

        driver
            .wait_for_selector(page, &locator, timeouts.click)
            .await
            .map_err(|e| element_error(e, &locator))?;
        driver
            .evaluate(page, &scripts::SCROLL_INTO_VIEW, &[Value::from(locator.as_str())])
            .await?;

        let previous_url = if self.wait_for_navigation {
            Some(driver.current_url(page).await?)
        } else {
            None
        };

        driver
            .click(page, &locator)
            .await
            .map_err(|e| element_error(e, &locator))?;

        if let Some(previous_url) = previous_url {
            driver
                .wait_for_navigation(page, &previous_url, timeouts.navigation)
                .await
                .map_err(navigation_error)?;
        }

        Ok(ContextUpdate::none())
    }
}
