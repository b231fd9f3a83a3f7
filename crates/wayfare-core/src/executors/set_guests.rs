use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::StepExecutor;
use crate::{
    config::Timeouts,
    context::{ContextUpdate, ExecutionContext},
    driver::{BrowserDriver, scripts},
    error::{EngineError, Result},
};

/// Writes adult and child counts into the guest selector in one script call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetGuestCounts {
    pub adults: u32,
    pub children: u32,
    pub adults_selector: String,
    pub children_selector: String,
}

#[async_trait]
impl StepExecutor for SetGuestCounts {
    async fn execute(
        &self,
        driver: &dyn BrowserDriver,
        _timeouts: &Timeouts,
        context: &ExecutionContext,
    ) -> Result<ContextUpdate> {
        let page = context.page()?;
        let args = [
            Value::from(self.adults_selector.as_str()),
            Value::from(self.adults),
            Value::from(self.children_selector.as_str()),
            Value::from(self.children),
        ];
        let assigned = driver.evaluate(page, &scripts::SET_GUEST_COUNTS, &args).await?;

        // The script reports one flag per field
        let flags = assigned.as_array().map(Vec::as_slice).unwrap_or_default();
        for (index, locator) in [&self.adults_selector, &self.children_selector]
            .into_iter()
            .enumerate()
        {
            if flags.get(index).and_then(Value::as_bool) == Some(false) {
                return Err(EngineError::ElementNotFound {
                    locator: locator.clone(),
                });
            }
        }

        Ok(ContextUpdate::none())
    }
}
