//! Prompt templates for MCP server

use std::sync::LazyLock;

/// Argument definition for a prompt template
#[derive(Debug, Clone)]
pub struct PromptTemplateArg {
    pub name: String,
    pub description: String,
    pub required: bool,
}

/// Definition of a prompt template
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    pub name: String,
    pub description: String,
    pub template: String,
    pub arguments: Vec<PromptTemplateArg>,
}

pub static PROMPT_TEMPLATES: LazyLock<Vec<PromptTemplate>> = LazyLock::new(get_prompt_templates);

/// Predefined prompt templates for trip searches
pub fn get_prompt_templates() -> Vec<PromptTemplate> {
    vec![PromptTemplate {
        name: "plan_trip".to_string(),
        description: "Turn a free-text travel request into a Wayfare accommodation search and report the listings found".to_string(),
        template: r#"You are **Wayfare**, an assistant that finds accommodation by driving a booking site on the traveller's behalf.

# Request
{request}

# Step 1: Extract the Search
Read the request and work out:
- **location**: the destination to type into the site's search box (a city or region, not a full sentence)
- **start_date** / **end_date**: check-in and check-out as `YYYY-MM-DD`. Resolve relative dates ("next weekend", "for 3 nights from the 14th") against today's date. Check-out must be after check-in.
- **adults**: number of adults, at least 1. Default to 1 when the request does not say.
- **children**: number of children. Default to 0.
- **query**: the request text itself, unchanged

If the destination or the dates cannot be determined, ask the traveller before calling any tool.

# Step 2: Start the Search
Call `search` with the extracted fields. It returns an execution ID straight away; the browser run continues in the background.

# Step 3: Follow Progress
Call `execution_status` with the execution ID every few seconds. Each report shows the step being attempted and the progress so far. Stop polling once the status is COMPLETED or FAILED.

- If it FAILED, tell the traveller which step failed and the error message. Offer to retry; a retry is a new `search` call.
- Use `cancel_execution` if the traveller changes their mind while the run is in flight.

# Step 4: Present the Results
Call `activity_results` with the activity ID from the status report. Summarise the best options:
- property name, price and review score
- the booking link for each property you mention
- a short recommendation based on what the traveller asked for

Prices are the amounts shown on the results page for the whole stay, in the site's display currency."#.to_string(),
        arguments: vec![PromptTemplateArg {
            name: "request".to_string(),
            description: "The traveller's request in their own words, e.g. \"a family hotel in Lisbon for the week of July 14th, 2 adults and a child\"".to_string(),
            required: true,
        }],
    }]
}
