//! Command handlers for the terminal interface.

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result, bail};
use log::debug;
use wayfare_core::{
    ExecutionPlan, ExecutionStatus, catalog,
    display::{Catalog, QueuedSearch},
    models::{RunFilter, SearchRequest},
    params::CreateSearch,
};

use crate::{
    args::SearchArgs,
    mcp::{WayfareMcpServer, run_stdio_server},
    renderer::TerminalRenderer,
};

/// How often `search` polls the execution while it runs.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Runs CLI commands against an execution plan and renders their output.
pub struct Cli {
    plan: ExecutionPlan,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(plan: ExecutionPlan, renderer: TerminalRenderer) -> Self {
        Self { plan, renderer }
    }

    /// Queues a search, prints each step as it starts and finishes with the
    /// report and the stored results.
    pub async fn search(&self, args: SearchArgs) -> Result<()> {
        let request = SearchRequest::try_from(CreateSearch::from(args))?;
        let execution_id = self
            .plan
            .create_and_execute_search(request)
            .await
            .context("Failed to create search")?;
        self.renderer
            .render(&QueuedSearch { execution_id }.to_string())?;

        let mut last_step = 0;
        let report = loop {
            let report = self.plan.get_execution_status(execution_id).await?;
            if report.steps_completed > last_step {
                last_step = report.steps_completed;
                let name = report.current_step.as_deref().unwrap_or_default();
                self.renderer.render(&format!(
                    "- [{}/{}] {name}\n",
                    report.steps_completed, report.total_steps
                ))?;
            }
            if report.status.is_terminal() {
                break report;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        };
        debug!("Execution {execution_id} finished as {}", report.status);

        self.renderer.render("\n")?;
        self.renderer.render(&report.to_string())?;
        if report.status == ExecutionStatus::Failed {
            bail!(
                "Execution {execution_id} failed: {}",
                report.error_message.as_deref().unwrap_or("unknown error")
            );
        }

        let results = self.plan.get_activity_results(report.activity_id).await?;
        self.renderer.render("\n")?;
        self.renderer.render(&results.to_string())
    }

    pub async fn status(&self, execution_id: u64) -> Result<()> {
        let report = self
            .plan
            .get_execution_status(execution_id)
            .await
            .context("Failed to get execution status")?;
        self.renderer.render(&report.to_string())
    }

    pub async fn results(&self, activity_id: u64) -> Result<()> {
        let results = self
            .plan
            .get_activity_results(activity_id)
            .await
            .context("Failed to get activity results")?;
        self.renderer.render(&results.to_string())
    }

    pub async fn runs(&self, filter: RunFilter) -> Result<()> {
        let runs = self
            .plan
            .list_executions(filter)
            .await
            .context("Failed to list executions")?;
        self.renderer.render(&runs.to_string())
    }

    pub fn catalog(&self) -> Result<()> {
        self.renderer.render(&Catalog(catalog::all()).to_string())
    }

    /// Serves the plan over MCP on stdio until the client disconnects or the
    /// process is interrupted.
    pub async fn serve(self) -> Result<()> {
        let plan = Arc::new(self.plan);
        let result = run_stdio_server(WayfareMcpServer::new(Arc::clone(&plan)))
            .await
            .context("MCP server failed");
        plan.shutdown()
            .await
            .context("Failed to shut down execution plan")?;
        result
    }

    /// Stops the dispatcher, failing any run that is still queued.
    pub async fn shutdown(self) -> Result<()> {
        self.plan
            .shutdown()
            .await
            .context("Failed to shut down execution plan")
    }
}
