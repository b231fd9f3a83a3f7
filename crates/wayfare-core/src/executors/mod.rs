//! Step executors, one per [`TaskKind`](crate::catalog::TaskKind).
//!
//! Each parameter struct implements [`StepExecutor`]. Executors only talk to
//! the page handle found in the [`ExecutionContext`] and report what they
//! produced as a [`ContextUpdate`]; persisting progress is the workflow
//! executor's job.

use async_trait::async_trait;

use crate::{
    config::Timeouts,
    context::{ContextUpdate, ExecutionContext},
    driver::{BrowserDriver, DriverError},
    error::{EngineError, Result},
    step::{Step, StepParams},
};

mod click_element;
mod fill_input;
mod launch_browser;
mod set_guests;

pub use click_element::ClickElement;
pub use fill_input::FillInput;
pub use launch_browser::LaunchBrowser;
pub use set_guests::SetGuestCounts;

/// Behavior of one step kind.
#[async_trait]
pub trait StepExecutor: Send + Sync {
    async fn execute(
        &self,
        driver: &dyn BrowserDriver,
        timeouts: &Timeouts,
        context: &ExecutionContext,
    ) -> Result<ContextUpdate>;
}

/// Runs `step` with the executor matching its kind.
pub async fn execute_step(
    step: &Step,
    driver: &dyn BrowserDriver,
    timeouts: &Timeouts,
    context: &ExecutionContext,
) -> Result<ContextUpdate> {
    match &step.params {
        StepParams::LaunchBrowser(params) => params.execute(driver, timeouts, context).await,
        StepParams::FillInput(params) => params.execute(driver, timeouts, context).await,
        StepParams::ClickElement(params) => params.execute(driver, timeouts, context).await,
        StepParams::SetGuestCounts(params) => params.execute(driver, timeouts, context).await,
    }
}

/// Maps a failed element lookup or wait to [`EngineError::ElementNotFound`].
pub(crate) fn element_error(error: DriverError, locator: &str) -> EngineError {
    match error {
        DriverError::Timeout(_) | DriverError::ElementNotFound(_) => EngineError::ElementNotFound {
            locator: locator.to_string(),
        },
        other => other.into(),
    }
}

/// Maps a failed page load to [`EngineError::NavigationTimeout`].
pub(crate) fn navigation_error(error: DriverError) -> EngineError {
    match error {
        DriverError::Timeout(detail) => EngineError::NavigationTimeout { detail },
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use jiff::civil::date;

    use super::*;
    use crate::driver::{DriverAction, ScriptedDriver};

    const START: &str = "https://www.booking.com";

    fn fast() -> Timeouts {
        Timeouts {
            navigation: Duration::from_millis(50),
            input: Duration::from_millis(50),
            click: Duration::from_millis(50),
            extraction: Duration::from_millis(50),
        }
    }

    async fn launched(driver: &ScriptedDriver) -> ExecutionContext {
        let mut context = ExecutionContext::new();
        let update = LaunchBrowser {
            website_url: START.to_string(),
        }
        .execute(driver, &fast(), &context)
        .await
        .unwrap();
        context.apply(update);
        context
    }

    #[tokio::test]
    async fn test_launch_produces_browser_and_page() {
        let driver = ScriptedDriver::new();
        let context = launched(&driver).await;
        assert!(context.browser().is_some());
        assert!(context.page().is_ok());
        assert_eq!(
            driver.actions()[0],
            DriverAction::Launch {
                url: START.to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_launch_failure_is_navigation_error() {
        let driver = ScriptedDriver::new().with_launch_failure("net::ERR_NAME_NOT_RESOLVED");
        let err = LaunchBrowser {
            website_url: START.to_string(),
        }
        .execute(&driver, &fast(), &ExecutionContext::new())
        .await
        .unwrap_err();
        assert!(matches!(err, EngineError::Driver(DriverError::Navigation(_))));
        assert_eq!(driver.open_sessions(), 0);
    }

    #[tokio::test]
    async fn test_launch_closes_session_when_body_never_appears() {
        let driver = ScriptedDriver::new().with_missing_selector("body");
        let err = LaunchBrowser {
            website_url: START.to_string(),
        }
        .execute(&driver, &fast(), &ExecutionContext::new())
        .await
        .unwrap_err();
        assert!(matches!(err, EngineError::NavigationTimeout { .. }));
        assert_eq!(driver.open_sessions(), 0);
    }

    #[tokio::test]
    async fn test_fill_without_page_is_context_missing() {
        let driver = ScriptedDriver::new();
        let err = FillInput {
            selector: "input".to_string(),
            value: "Lisbon".to_string(),
        }
        .execute(&driver, &fast(), &ExecutionContext::new())
        .await
        .unwrap_err();
        assert!(matches!(err, EngineError::ContextMissing { .. }));
    }

    #[tokio::test]
    async fn test_fill_on_missing_selector_is_element_not_found() {
        let driver = ScriptedDriver::new().with_missing_selector("input[name=\"ss\"]");
        let context = launched(&driver).await;
        let err = FillInput {
            selector: "input[name=\"ss\"]".to_string(),
            value: "Lisbon".to_string(),
        }
        .execute(&driver, &fast(), &context)
        .await
        .unwrap_err();
        assert!(
            matches!(err, EngineError::ElementNotFound { ref locator } if locator == "input[name=\"ss\"]")
        );
    }

    #[tokio::test]
    async fn test_fill_clears_then_types() {
        let driver = ScriptedDriver::new();
        let context = launched(&driver).await;
        FillInput {
            selector: "#q".to_string(),
            value: "Porto".to_string(),
        }
        .execute(&driver, &fast(), &context)
        .await
        .unwrap();

        let actions = driver.actions();
        let tail = &actions[actions.len() - 3..];
        assert_eq!(
            tail,
            &[
                DriverAction::WaitFor {
                    locator: "#q".to_string()
                },
                DriverAction::Evaluate {
                    script: "clear_input"
                },
                DriverAction::Type {
                    locator: "#q".to_string(),
                    text: "Porto".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_click_by_date_uses_date_locator() {
        let driver = ScriptedDriver::new();
        let context = launched(&driver).await;
        ClickElement::on_date(date(2025, 7, 14))
            .execute(&driver, &fast(), &context)
            .await
            .unwrap();
        assert!(driver.actions().contains(&DriverAction::Click {
            locator: r#"[data-date="2025-07-14"]"#.to_string()
        }));
    }

    #[tokio::test]
    async fn test_click_with_both_targets_is_rejected() {
        let driver = ScriptedDriver::new();
        let context = launched(&driver).await;
        let mut click = ClickElement::on("button");
        click.date = Some(date(2025, 7, 14));
        let err = click.execute(&driver, &fast(), &context).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidStepParameters { .. }));
    }

    #[tokio::test]
    async fn test_click_navigation_timeout() {
        let driver = ScriptedDriver::new().with_navigation_timeout();
        let context = launched(&driver).await;
        let err = ClickElement::on("button[type=\"submit\"]")
            .with_navigation()
            .execute(&driver, &fast(), &context)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::NavigationTimeout { .. }));
    }

    #[tokio::test]
    async fn test_set_guests_runs_one_script() {
        let driver = ScriptedDriver::new();
        let context = launched(&driver).await;
        let before = driver.actions().len();
        SetGuestCounts {
            adults: 2,
            children: 1,
            adults_selector: "input#group_adults".to_string(),
            children_selector: "input#group_children".to_string(),
        }
        .execute(&driver, &fast(), &context)
        .await
        .unwrap();
        assert_eq!(
            driver.actions()[before..],
            [DriverAction::Evaluate {
                script: "set_guest_counts"
            }]
        );
    }
}
