//! Error handling utilities for MCP server

use rmcp::ErrorData;
use wayfare_core::EngineError;

/// Converts an engine error into an MCP error.
///
/// Caller mistakes (unknown ids, invalid input) become `invalid_params`;
/// everything else is an internal error.
pub fn to_mcp_error(message: &str, error: &EngineError) -> ErrorData {
    match error {
        EngineError::NotFound { .. }
        | EngineError::InvalidInput { .. }
        | EngineError::InvalidStepParameters { .. } => {
            ErrorData::invalid_params(error.to_string(), None)
        }
        _ => ErrorData::internal_error(format!("{message}: {error}"), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_invalid_params() {
        let error = EngineError::NotFound {
            resource: "Execution",
            id: 9,
        };
        let mcp = to_mcp_error("Failed to get execution", &error);
        assert_eq!(mcp.code, rmcp::model::ErrorCode::INVALID_PARAMS);
        assert_eq!(mcp.message, "Execution with ID 9 not found");
    }

    #[test]
    fn test_other_errors_are_internal() {
        let error = EngineError::Configuration {
            message: "Execution plan is shut down".to_string(),
        };
        let mcp = to_mcp_error("Failed to create search", &error);
        assert_eq!(mcp.code, rmcp::model::ErrorCode::INTERNAL_ERROR);
        assert!(mcp.message.starts_with("Failed to create search: "));
    }
}
