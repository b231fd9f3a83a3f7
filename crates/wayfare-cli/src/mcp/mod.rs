//! MCP server implementation for Wayfare
//!
//! Exposes the execution plan's polling API as Model Context Protocol tools,
//! plus a `plan_trip` prompt that has the connected model turn a free-text
//! request into `search` arguments.

use std::{future::Future, sync::Arc};

use anyhow::Result;
use log::{debug, error, info};
use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    handler::server::{router::tool::ToolRouter, tool::Parameters},
    model::{
        GetPromptRequestParam, GetPromptResult, Implementation, ListPromptsResult,
        PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
    tool, tool_handler, tool_router,
};
use tokio::signal::unix::{SignalKind, signal};
use wayfare_core::ExecutionPlan;

pub mod errors;
pub mod handlers;
pub mod prompts;

pub use handlers::{CreateSearch, Id, ListRuns, McpResult};

/// MCP server for Wayfare
#[derive(Clone)]
pub struct WayfareMcpServer {
    plan: Arc<ExecutionPlan>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl WayfareMcpServer {
    pub fn new(plan: Arc<ExecutionPlan>) -> Self {
        Self {
            plan,
            tool_router: Self::tool_router(),
        }
    }

    fn handlers(&self) -> handlers::McpHandlers {
        handlers::McpHandlers::new(Arc::clone(&self.plan))
    }

    #[tool(
        name = "search",
        description = "Start an accommodation search. Requires location, start_date and end_date (YYYY-MM-DD, check-out after check-in); adults defaults to 1 and children to 0. Returns an execution ID immediately while a browser run continues in the background. Poll execution_status with that ID."
    )]
    async fn search(&self, params: Parameters<CreateSearch>) -> McpResult {
        self.handlers().search(params).await
    }

    #[tool(
        name = "execution_status",
        description = "Report the progress of a search execution: status (PENDING, RUNNING, COMPLETED, FAILED), steps completed out of total, the step being attempted, timestamps and the error message of a failed run. Includes the activity ID needed by activity_results."
    )]
    async fn execution_status(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().execution_status(params).await
    }

    #[tool(
        name = "activity_results",
        description = "Show an activity (destination, dates, guests) with the listings extracted for it, newest first: property name, price, review score and booking link. Results appear once the execution has COMPLETED."
    )]
    async fn activity_results(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().activity_results(params).await
    }

    #[tool(
        name = "cancel_execution",
        description = "Cancel a search that is still queued or running. The browser session is closed and the execution is marked FAILED with 'Execution cancelled'. Has no effect on an execution that already finished."
    )]
    async fn cancel_execution(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().cancel_execution(params).await
    }

    #[tool(
        name = "list_executions",
        description = "List search executions newest first, with destination, guests, progress, result count and error. Optional status filter: all (default), successful, failed or running. Also reports how many runs each filter matches."
    )]
    async fn list_executions(&self, params: Parameters<ListRuns>) -> McpResult {
        self.handlers().list_executions(params).await
    }

    #[tool(
        name = "task_catalog",
        description = "List the browser step kinds the engine can run, with their inputs, outputs and credit cost."
    )]
    async fn task_catalog(&self) -> McpResult {
        self.handlers().task_catalog()
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for WayfareMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_prompts()
                .build(),
            server_info: Implementation {
                name: "wayfare".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            instructions: Some(r#"Wayfare searches a booking site for accommodation by driving a real browser through its search form.

## Core Concepts
- **Activity**: one booking intent (destination, dates, guests) and the listings found for it
- **Execution**: one background browser run for an activity, moving PENDING → RUNNING → COMPLETED or FAILED

## Workflow
1. Call `search` with location, start_date, end_date and guest counts. It returns an execution ID at once.
2. Poll `execution_status` every few seconds until the status is COMPLETED or FAILED.
3. Call `activity_results` with the activity ID from the status report.

Call `list_executions` to review earlier runs, optionally filtered to successful, failed or running ones.

Use the `plan_trip` prompt to turn a traveller's free-text request into `search` arguments. Use `cancel_execution` to stop a run that is no longer wanted.

## Tool Categories
- **Searching**: search, cancel_execution
- **Polling**: execution_status, activity_results, list_executions
- **Reference**: task_catalog"#.to_string()),
        }
    }

    async fn list_prompts(
        &self,
        request: Option<PaginatedRequestParam>,
        context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        self.handlers().list_prompts(request, context).await
    }

    async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        self.handlers().get_prompt(request, context).await
    }
}

/// Run the MCP server with stdio transport
pub async fn run_stdio_server(server: WayfareMcpServer) -> Result<()> {
    use rmcp::{ServiceExt, transport::stdio};

    info!("Starting Wayfare MCP server on stdio");
    debug!(
        "Server created with {} tools",
        server.tool_router.list_all().len()
    );

    let service = server.serve(stdio()).await.inspect_err(|e| {
        error!("serving error: {e:?}");
    })?;

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        result = service.waiting() => {
            match result {
                Ok(_) => info!("MCP server stopped normally"),
                Err(e) => error!("MCP server error: {e:?}"),
            }
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down gracefully...");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }

    info!("MCP server shutdown complete");
    Ok(())
}
