//! MCP tools implementation
//!
//! Each tool has an `execute_*` function shared by the CLI and the MCP server,
//! plus a `handle_*` wrapper that decodes MCP arguments.

pub mod format;
pub mod lookup;
pub mod search;

use crate::mcp::{McpResponse, ToolResult};
use diagsearch::error::AppError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Largest `limit` a caller may request
pub const MAX_LIMIT: usize = 100;

/// How tool output is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Markdown
        }
    }

    /// Render either the markdown text or the pretty JSON of `payload`
    pub fn render<T: Serialize + ?Sized>(
        self,
        payload: &T,
        markdown: impl FnOnce() -> String,
    ) -> Result<ToolResult, AppError> {
        let text = match self {
            OutputFormat::Markdown => markdown(),
            OutputFormat::Json => serde_json::to_string_pretty(payload)?,
        };
        Ok(ToolResult::text(text))
    }
}

/// Decode MCP tool arguments into a CLI argument struct
pub fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T, AppError> {
    // Tools without parameters may be called with `null` arguments
    let args = if args.is_null() { Value::Object(Default::default()) } else { args };
    serde_json::from_value(args).map_err(|e| AppError::InvalidInput(format!("Invalid arguments: {}", e)))
}

/// Reject a zero or oversized limit
pub fn validate_limit(limit: Option<usize>) -> Result<(), AppError> {
    match limit {
        Some(0) => Err(AppError::InvalidInput("Limit must be at least 1".to_string())),
        Some(n) if n > MAX_LIMIT => Err(AppError::InvalidInput(format!(
            "Limit too large, maximum {}",
            MAX_LIMIT
        ))),
        _ => Ok(()),
    }
}

/// Wrap a tool outcome into a JSON-RPC response
pub fn respond(id: Option<Value>, outcome: Result<ToolResult, AppError>) -> McpResponse {
    match outcome.and_then(|content| serde_json::to_value(content).map_err(AppError::from)) {
        Ok(value) => McpResponse::success(id, value),
        Err(e) => McpResponse::error(id, e.error_code(), &e.message()),
    }
}
