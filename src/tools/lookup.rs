//! Catalog lookup tools: `stats` and `show`

use super::format::{format_disease, format_stats};
use super::{parse_args, respond, OutputFormat};
use crate::cli::{ShowArgs, StatsArgs};
use crate::mcp::{McpResponse, ToolResult};
use diagsearch::error::{validate_required, AppError};
use diagsearch::search::DiagnosticSearchEngine;
use serde_json::Value;

pub fn execute_stats(
    engine: &DiagnosticSearchEngine,
    _args: StatsArgs,
    format: OutputFormat,
) -> Result<ToolResult, AppError> {
    let stats = engine.get_stats();
    format.render(&stats, || format_stats(&stats))
}

/// Full record by id; unknown ids are a not-found error
pub fn execute_show(
    engine: &DiagnosticSearchEngine,
    args: ShowArgs,
    format: OutputFormat,
) -> Result<ToolResult, AppError> {
    validate_required("Disease id", &args.id)?;

    let disease = engine
        .get_disease(&args.id)
        .ok_or_else(|| AppError::NotFound(format!("disease '{}'", args.id.trim())))?;

    format.render(disease.as_ref(), || format_disease(&disease))
}

pub async fn handle_stats(id: Option<Value>, args: Value, engine: &DiagnosticSearchEngine) -> McpResponse {
    respond(
        id,
        parse_args(args).and_then(|a| execute_stats(engine, a, OutputFormat::Markdown)),
    )
}

pub async fn handle_show(id: Option<Value>, args: Value, engine: &DiagnosticSearchEngine) -> McpResponse {
    respond(
        id,
        parse_args(args).and_then(|a| execute_show(engine, a, OutputFormat::Markdown)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use diagsearch::catalog::Catalog;

    fn engine() -> DiagnosticSearchEngine {
        DiagnosticSearchEngine::new(Catalog::builtin().unwrap())
    }

    #[test]
    fn test_stats_json() {
        let result = execute_stats(&engine(), StatsArgs::default(), OutputFormat::Json).unwrap();
        let value: Value = serde_json::from_str(&result.content[0].text).unwrap();
        assert_eq!(value["total"], 5);
        assert_eq!(value["byType"]["viral"], 2);
        assert_eq!(value["byOrgan"]["Poumon"], 3);
    }

    #[test]
    fn test_show_markdown() {
        let args = ShowArgs {
            id: "malaria".to_string(),
        };
        let result = execute_show(&engine(), args, OutputFormat::Markdown).unwrap();
        let text = &result.content[0].text;
        assert!(text.starts_with("# Paludisme"));
        assert!(text.contains("*Plasmodium falciparum*"));
    }

    #[test]
    fn test_show_unknown_id() {
        let args = ShowArgs {
            id: "scurvy".to_string(),
        };
        let err = execute_show(&engine(), args, OutputFormat::Markdown).unwrap_err();
        assert_eq!(err.error_code(), "not_found");
        assert_eq!(err.exit_code(), 3);
    }
}
