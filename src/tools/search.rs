//! Search tools implementation
//!
//! Implements `search`, `search_symptoms`, `search_pathogen`, `search_organ`,
//! `suggest` and `list`.

use super::format::{format_results, format_suggestions};
use super::{parse_args, respond, validate_limit, OutputFormat};
use crate::cli::{ListArgs, OrganArgs, PathogenArgs, SearchArgs, SuggestArgs, SymptomsArgs};
use crate::mcp::{McpResponse, ToolResult};
use diagsearch::error::{validate_query, validate_required, AppError};
use diagsearch::search::{DiagnosticSearchEngine, SearchFilters};
use serde_json::Value;
use tracing::debug;

/// Shared implementation for search (used by MCP and CLI)
pub fn execute_search(
    engine: &DiagnosticSearchEngine,
    args: SearchArgs,
    format: OutputFormat,
) -> Result<ToolResult, AppError> {
    validate_query(&args.query)?;
    validate_limit(args.limit)?;

    debug!("Search request: '{}'", args.query);

    let filters: SearchFilters = args.filters.into();
    let results = engine.search(&args.query, &filters, args.limit);

    format.render(&results, || {
        let title = if args.query.trim().is_empty() {
            "All diseases".to_string()
        } else {
            format!("Search: {}", args.query.trim())
        };
        format_results(&title, &results, Some(args.query.as_str()))
    })
}

pub fn execute_symptoms(
    engine: &DiagnosticSearchEngine,
    args: SymptomsArgs,
    format: OutputFormat,
) -> Result<ToolResult, AppError> {
    if args.symptoms.iter().all(|s| s.trim().is_empty()) {
        return Err(AppError::InvalidInput("At least one symptom is required".to_string()));
    }
    for symptom in &args.symptoms {
        validate_query(symptom)?;
    }

    let results = engine.search_by_symptoms(&args.symptoms);
    let joined = args.symptoms.join(" ");

    format.render(&results, || {
        format_results(&format!("Symptoms: {}", args.symptoms.join(", ")), &results, Some(joined.as_str()))
    })
}

pub fn execute_pathogen(
    engine: &DiagnosticSearchEngine,
    args: PathogenArgs,
    format: OutputFormat,
) -> Result<ToolResult, AppError> {
    validate_required("Pathogen", &args.pathogen)?;

    let results = engine.search_by_pathogen(&args.pathogen);

    format.render(&results, || {
        format_results(&format!("Pathogen: {}", args.pathogen.trim()), &results, None)
    })
}

pub fn execute_organ(
    engine: &DiagnosticSearchEngine,
    args: OrganArgs,
    format: OutputFormat,
) -> Result<ToolResult, AppError> {
    validate_required("Organ", &args.organ)?;

    let filters: SearchFilters = args.filters.into();
    let results = engine.search_by_organ(&args.organ, &filters);

    format.render(&results, || {
        format_results(&format!("Organ: {}", args.organ.trim()), &results, None)
    })
}

pub fn execute_suggest(
    engine: &DiagnosticSearchEngine,
    args: SuggestArgs,
    format: OutputFormat,
) -> Result<ToolResult, AppError> {
    validate_query(&args.partial)?;
    validate_limit(args.limit)?;

    let suggestions = engine.get_suggestions(&args.partial, args.limit);

    format.render(&suggestions, || format_suggestions(&args.partial, &suggestions))
}

pub fn execute_list(
    engine: &DiagnosticSearchEngine,
    args: ListArgs,
    format: OutputFormat,
) -> Result<ToolResult, AppError> {
    validate_limit(args.limit)?;

    let filters: SearchFilters = args.filters.into();
    let results = engine.get_all_diseases(&filters, args.limit);

    format.render(&results, || format_results("All diseases", &results, None))
}

/// Handle search tool call
pub async fn handle_search(id: Option<Value>, args: Value, engine: &DiagnosticSearchEngine) -> McpResponse {
    respond(
        id,
        parse_args(args).and_then(|a| execute_search(engine, a, OutputFormat::Markdown)),
    )
}

pub async fn handle_symptoms(id: Option<Value>, args: Value, engine: &DiagnosticSearchEngine) -> McpResponse {
    respond(
        id,
        parse_args(args).and_then(|a| execute_symptoms(engine, a, OutputFormat::Markdown)),
    )
}

pub async fn handle_pathogen(id: Option<Value>, args: Value, engine: &DiagnosticSearchEngine) -> McpResponse {
    respond(
        id,
        parse_args(args).and_then(|a| execute_pathogen(engine, a, OutputFormat::Markdown)),
    )
}

pub async fn handle_organ(id: Option<Value>, args: Value, engine: &DiagnosticSearchEngine) -> McpResponse {
    respond(
        id,
        parse_args(args).and_then(|a| execute_organ(engine, a, OutputFormat::Markdown)),
    )
}

pub async fn handle_suggest(id: Option<Value>, args: Value, engine: &DiagnosticSearchEngine) -> McpResponse {
    respond(
        id,
        parse_args(args).and_then(|a| execute_suggest(engine, a, OutputFormat::Markdown)),
    )
}

pub async fn handle_list(id: Option<Value>, args: Value, engine: &DiagnosticSearchEngine) -> McpResponse {
    respond(
        id,
        parse_args(args).and_then(|a| execute_list(engine, a, OutputFormat::Markdown)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::FilterArgs;
    use diagsearch::catalog::Catalog;

    fn engine() -> DiagnosticSearchEngine {
        DiagnosticSearchEngine::new(Catalog::builtin().unwrap())
    }

    fn search_args(query: &str) -> SearchArgs {
        SearchArgs {
            query: query.to_string(),
            filters: FilterArgs::default(),
            limit: None,
        }
    }

    #[test]
    fn test_search_markdown() {
        let result = execute_search(&engine(), search_args("pneumonie"), OutputFormat::Markdown).unwrap();
        let text = &result.content[0].text;
        assert!(text.starts_with("# Search: pneumonie"));
        assert!(text.contains("## 1. Pneumonie Communautaire"));
    }

    #[test]
    fn test_search_json() {
        let result = execute_search(&engine(), search_args("paludisme"), OutputFormat::Json).unwrap();
        let value: Value = serde_json::from_str(&result.content[0].text).unwrap();
        let first = &value[0];
        assert_eq!(first["disease"]["id"], "malaria");
        assert_eq!(first["relevance"], "high");
        assert!(first["matchedTerms"].as_array().is_some());
    }

    #[test]
    fn test_search_rejects_bad_limit() {
        let mut args = search_args("fièvre");
        args.limit = Some(0);
        let err = execute_search(&engine(), args, OutputFormat::Markdown).unwrap_err();
        assert_eq!(err.error_code(), "invalid_input");
    }

    #[test]
    fn test_symptoms_require_input() {
        let args = SymptomsArgs {
            symptoms: vec!["  ".to_string()],
        };
        assert!(execute_symptoms(&engine(), args, OutputFormat::Markdown).is_err());
    }

    #[test]
    fn test_pathogen_and_organ() {
        let engine = engine();
        let result = execute_pathogen(
            &engine,
            PathogenArgs {
                pathogen: "Plasmodium".to_string(),
            },
            OutputFormat::Markdown,
        )
        .unwrap();
        assert!(result.content[0].text.contains("Paludisme"));

        let err = execute_organ(
            &engine,
            OrganArgs {
                organ: " ".to_string(),
                filters: FilterArgs::default(),
            },
            OutputFormat::Markdown,
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "invalid_input");
    }

    #[test]
    fn test_list_with_filter() {
        let args = ListArgs {
            filters: FilterArgs {
                kind: Some(vec!["viral".to_string()]),
                ..Default::default()
            },
            limit: None,
        };
        let result = execute_list(&engine(), args, OutputFormat::Json).unwrap();
        let value: Value = serde_json::from_str(&result.content[0].text).unwrap();
        let ids: Vec<&str> = value
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|r| r["disease"]["id"].as_str())
            .collect();
        assert_eq!(ids, vec!["covid-19", "influenza"]);
    }

    #[tokio::test]
    async fn test_handle_search_invalid_arguments() {
        let resp = handle_search(Some(serde_json::json!(1)), serde_json::json!({ "limit": 3 }), &engine()).await;
        assert_eq!(resp.error.map(|e| e.code), Some("invalid_input".to_string()));
    }
}
