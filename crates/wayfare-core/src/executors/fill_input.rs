use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{StepExecutor, element_error};
use crate::{
    config::Timeouts,
    context::{ContextUpdate, ExecutionContext},
    driver::{BrowserDriver, scripts},
    error::Result,
};

/// Replaces the contents of an input field with `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillInput {
    pub selector: String,
    pub value: String,
}

#[async_trait]
impl StepExecutor for FillInput {
    async fn execute(
        &self,
        driver: &dyn BrowserDriver,
        timeouts: &Timeouts,
        context: &ExecutionContext,
    ) -> Result<ContextUpdate> {
        let page = context.page()?;

        driver
            .wait_for_selector(page, &self.selector, timeouts.input)
            .await
            .map_err(|e| element_error(e, &self.selector))?;
        driver
            .evaluate(page, &scripts::CLEAR_INPUT, &[Value::from(self.selector.as_str())])
            .await?;
        driver
            .type_text(page, &self.selector, &self.value)
            .await
            .map_err(|e| element_error(e, &self.selector))?;

        Ok(ContextUpdate::none())
    }
}
