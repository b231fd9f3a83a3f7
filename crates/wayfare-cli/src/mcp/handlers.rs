//! MCP tool handlers implementation

use std::sync::Arc;

use log::debug;
use rmcp::{
    ErrorData as McpError, RoleServer,
    handler::server::tool::Parameters,
    model::{
        CallToolResult, Content, GetPromptRequestParam, GetPromptResult, ListPromptsResult,
        PaginatedRequestParam, Prompt, PromptArgument, PromptMessage, PromptMessageContent,
        PromptMessageRole,
    },
    service::RequestContext,
};
use schemars::JsonSchema;
use serde::Deserialize;
use wayfare_core::{
    ExecutionPlan, catalog,
    display::{Catalog, OperationStatus, QueuedSearch},
    models::SearchRequest,
    params as core,
};

use super::{errors::to_mcp_error, prompts::PROMPT_TEMPLATES};

// ============================================================================
// Generic Parameter Wrapper
// ============================================================================
//
// Core parameter types stay free of MCP concerns. This transparent wrapper
// adds the deserialization and schema derives the tool router needs.

/// Generic MCP wrapper for core parameter types with serde integration
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct McpParams<T>(T)
where
    T: JsonSchema;

impl<T> JsonSchema for McpParams<T>
where
    T: JsonSchema,
{
    fn schema_name() -> std::borrow::Cow<'static, str> {
        T::schema_name()
    }

    fn json_schema(g: &mut schemars::SchemaGenerator) -> schemars::Schema {
        T::json_schema(g)
    }
}

impl<T> McpParams<T>
where
    T: JsonSchema,
{
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> AsRef<T> for McpParams<T>
where
    T: JsonSchema,
{
    fn as_ref(&self) -> &T {
        &self.0
    }
}

pub type Id = McpParams<core::Id>;
pub type CreateSearch = McpParams<core::CreateSearch>;
pub type ListRuns = McpParams<core::ListRuns>;

pub type McpResult = Result<CallToolResult, McpError>;

fn text(body: impl ToString) -> McpResult {
    Ok(CallToolResult::success(vec![Content::text(body.to_string())]))
}

/// Handler implementations for the MCP server
pub struct McpHandlers {
    plan: Arc<ExecutionPlan>,
}

impl McpHandlers {
    pub fn new(plan: Arc<ExecutionPlan>) -> Self {
        Self { plan }
    }

    pub async fn search(&self, Parameters(params): Parameters<CreateSearch>) -> McpResult {
        debug!("search: {params:?}");

        let request = SearchRequest::try_from(params.into_inner())
            .map_err(|e| to_mcp_error("Invalid search", &e))?;
        let execution_id = self
            .plan
            .create_and_execute_search(request)
            .await
            .map_err(|e| to_mcp_error("Failed to create search", &e))?;

        text(QueuedSearch { execution_id })
    }

    pub async fn execution_status(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("execution_status: {params:?}");

        let report = self
            .plan
            .get_execution_status(params.as_ref().id)
            .await
            .map_err(|e| to_mcp_error("Failed to get execution status", &e))?;
        text(report)
    }

    pub async fn activity_results(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("activity_results: {params:?}");

        let results = self
            .plan
            .get_activity_results(params.as_ref().id)
            .await
            .map_err(|e| to_mcp_error("Failed to get activity results", &e))?;
        text(results)
    }

    pub async fn cancel_execution(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("cancel_execution: {params:?}");

        let id = params.as_ref().id;
        let cancelled = self
            .plan
            .cancel_execution(id)
            .await
            .map_err(|e| to_mcp_error("Failed to cancel execution", &e))?;

        let status = if cancelled {
            OperationStatus::success(format!("Execution {id} cancelled"))
        } else {
            OperationStatus::failure(format!("Execution {id} has already finished"))
        };
        text(status)
    }

    pub async fn list_executions(&self, Parameters(params): Parameters<ListRuns>) -> McpResult {
        debug!("list_executions: {params:?}");

        let runs = self
            .plan
            .list_executions(params.as_ref().status)
            .await
            .map_err(|e| to_mcp_error("Failed to list executions", &e))?;
        text(runs)
    }

    pub fn task_catalog(&self) -> McpResult {
        debug!("task_catalog");
        text(Catalog(catalog::all()))
    }

    /// List all available prompts
    pub async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        debug!("list_prompts");

        let prompts = PROMPT_TEMPLATES
            .iter()
            .map(|template| {
                Prompt::new(
                    &template.name,
                    Some(&template.description),
                    Some(
                        template
                            .arguments
                            .iter()
                            .map(|arg| PromptArgument {
                                name: arg.name.clone(),
                                description: Some(arg.description.clone()),
                                required: Some(arg.required),
                            })
                            .collect(),
                    ),
                )
            })
            .collect();

        Ok(ListPromptsResult {
            next_cursor: None,
            prompts,
        })
    }

    /// Get a specific prompt by name and apply arguments
    pub async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        debug!("get_prompt: {}", request.name);

        let template = PROMPT_TEMPLATES
            .iter()
            .find(|t| t.name == request.name)
            .ok_or_else(|| McpError::invalid_params("Prompt not found", None))?;

        let mut prompt_text = template.template.clone();
        for arg_def in &template.arguments {
            let value = request
                .arguments
                .as_ref()
                .and_then(|args| args.get(&arg_def.name));
            match value {
                Some(value) => {
                    let Some(value) = value.as_str() else {
                        return Err(McpError::invalid_params(
                            format!("Argument '{}' must be a string", arg_def.name),
                            None,
                        ));
                    };
                    prompt_text = prompt_text.replace(&format!("{{{}}}", arg_def.name), value);
                }
                None if arg_def.required => {
                    return Err(McpError::invalid_params(
                        format!("Required argument '{}' is missing", arg_def.name),
                        None,
                    ));
                }
                None => {}
            }
        }

        Ok(GetPromptResult {
            description: Some(template.description.clone()),
            messages: vec![PromptMessage {
                role: PromptMessageRole::User,
                content: PromptMessageContent::text(prompt_text),
            }],
        })
    }
}
