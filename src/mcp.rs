//! MCP (Model Context Protocol) handling module
//!
//! This module implements the JSON-RPC 2.0 protocol for MCP communication.

use anyhow::Result;
use diagsearch::search::DiagnosticSearchEngine;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader as AsyncBufReader};
use tracing::{debug, error, info};

/// Server context for tracking client information
#[derive(Clone, Default)]
pub struct ServerContext {
    pub client_info: Option<ClientInfo>,
}

impl ServerContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_client_name(&self) -> String {
        self.client_info
            .as_ref()
            .and_then(|info| info.name.as_ref())
            .cloned()
            .unwrap_or_else(|| "Unknown Client".to_string())
    }
}

/// MCP JSON-RPC 2.0 request structure
#[derive(Debug, Deserialize)]
pub struct McpRequest {
    /// JSON-RPC version field - required by the protocol but not accessed in code
    #[allow(dead_code)]
    pub jsonrpc: String,
    pub id: Option<Value>,
    pub method: String,
    pub params: Option<Value>,
}

/// Initialize request parameters
#[derive(Debug, Deserialize)]
pub struct InitializeParams {
    #[serde(rename = "clientInfo")]
    pub client_info: Option<ClientInfo>,
}

/// Client information
#[derive(Debug, Deserialize, Clone)]
pub struct ClientInfo {
    pub name: Option<String>,
    #[allow(dead_code)]
    pub version: Option<String>,
}

/// MCP JSON-RPC 2.0 response structure
#[derive(Debug, Serialize)]
pub struct McpResponse {
    pub jsonrpc: String,
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<McpError>,
}

/// MCP Error structure
#[derive(Debug, Serialize)]
pub struct McpError {
    pub code: String,
    pub message: String,
}

/// MCP Tool call arguments
#[derive(Debug, Deserialize)]
pub struct ToolCallArgs {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// MCP Content item
#[derive(Debug, Serialize)]
pub struct ContentItem {
    pub r#type: String,
    pub text: String,
}

/// MCP Tool result
#[derive(Debug, Serialize)]
pub struct ToolResult {
    pub content: Vec<ContentItem>,
}

impl McpResponse {
    /// Create a successful response
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response
    pub fn error(id: Option<Value>, code: &str, message: &str) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(McpError {
                code: code.to_string(),
                message: message.to_string(),
            }),
        }
    }
}

impl ToolResult {
    /// Create a text result
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: vec![ContentItem::text(content)],
        }
    }

    /// Text of the first content item
    pub fn into_text(self) -> String {
        self.content
            .into_iter()
            .next()
            .map(|c| c.text)
            .unwrap_or_default()
    }
}

impl ContentItem {
    /// Helper to create plain text content
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            r#type: "text".to_string(),
            text: content.into(),
        }
    }
}

/// Parse MCP request from JSON string
pub fn parse_request(json: &str) -> Result<McpRequest> {
    let request: McpRequest = serde_json::from_str(json)?;
    Ok(request)
}

/// Serialize MCP response to JSON string
pub fn serialize_response(response: &McpResponse) -> Result<String> {
    Ok(serde_json::to_string(response)?)
}

/// Handle stdio MCP communication
pub async fn handle_stdio(engine: Arc<DiagnosticSearchEngine>) -> Result<()> {
    info!("Starting diagsearch MCP server on stdio");

    let stdin = tokio::io::stdin();
    let mut reader = AsyncBufReader::new(stdin).lines();
    let mut stdout = tokio::io::stdout();

    // Track server context
    let mut context = ServerContext::new();

    while let Some(line) = reader.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        debug!("Received request: {}", line);

        let response = match parse_request(&line) {
            Ok(request) => handle_request(request, &mut context, &engine).await,
            Err(e) => {
                error!("Failed to parse request: {}", e);
                McpResponse::error(None, "parse_error", &format!("Invalid JSON: {}", e))
            }
        };

        let response_json = serialize_response(&response)?;
        debug!("Sending response: {}", response_json);

        stdout.write_all(response_json.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    info!("stdin closed, shutting down");
    Ok(())
}

/// Handle a single MCP request
async fn handle_request(
    request: McpRequest,
    context: &mut ServerContext,
    engine: &DiagnosticSearchEngine,
) -> McpResponse {
    match request.method.as_str() {
        "initialize" => handle_initialize(request, context).await,
        "tools/call" => handle_tool_call(request, engine).await,
        "tools/list" => handle_tools_list(request).await,
        _ => McpResponse::error(
            request.id,
            "method_not_found",
            &format!("Method '{}' not found", request.method),
        ),
    }
}

/// Handle tools/call method
async fn handle_tool_call(request: McpRequest, engine: &DiagnosticSearchEngine) -> McpResponse {
    use crate::tools::{lookup, search};

    let args: ToolCallArgs = match serde_json::from_value(request.params.unwrap_or_default()) {
        Ok(args) => args,
        Err(e) => {
            return McpResponse::error(
                request.id.clone(),
                "invalid_params",
                &format!("Invalid parameters: {}", e),
            )
        }
    };

    debug!("Tool call: {}", args.name);

    match args.name.as_str() {
        "search" => search::handle_search(request.id, args.arguments, engine).await,
        "search_symptoms" => search::handle_symptoms(request.id, args.arguments, engine).await,
        "search_pathogen" => search::handle_pathogen(request.id, args.arguments, engine).await,
        "search_organ" => search::handle_organ(request.id, args.arguments, engine).await,
        "suggest" => search::handle_suggest(request.id, args.arguments, engine).await,
        "list" => search::handle_list(request.id, args.arguments, engine).await,
        "stats" => lookup::handle_stats(request.id, args.arguments, engine).await,
        "show" => lookup::handle_show(request.id, args.arguments, engine).await,
        _ => McpResponse::error(
            request.id,
            "tool_not_found",
            &format!("Tool '{}' not found", args.name),
        ),
    }
}

/// Handle tools/list method
async fn handle_tools_list(request: McpRequest) -> McpResponse {
    let tools = build_tools_array();

    McpResponse::success(request.id, serde_json::json!({ "tools": tools }))
}

/// Handle initialize method
async fn handle_initialize(request: McpRequest, context: &mut ServerContext) -> McpResponse {
    if let Some(params) = request.params {
        if let Ok(init_params) = serde_json::from_value::<InitializeParams>(params) {
            context.client_info = init_params.client_info;
        }
    }
    info!("Client connected: {}", context.get_client_name());

    let tools = build_tools_array();
    let result = serde_json::json!({
        "serverInfo": {
            "name": "diagsearch",
            "version": env!("CARGO_PKG_VERSION"),
        },
        "capabilities": {
            "tools": { "list": true, "call": true }
        },
        "tools": tools
    });
    McpResponse::success(request.id, result)
}

/// Build the tools array returned from tools/list and initialize
fn build_tools_array() -> serde_json::Value {
    use crate::cli::{
        ListArgs, OrganArgs, PathogenArgs, SearchArgs, ShowArgs, StatsArgs, SuggestArgs, SymptomsArgs,
    };
    use schemars::schema_for;

    // Generate JSON schemas from the CLI argument structs
    serde_json::json!([
        {
            "name": "search",
            "description": "Fuzzy search of infectious diseases by name, synonym, ICD-10 code, symptom or pathogen, with optional filters",
            "inputSchema": schema_for!(SearchArgs)
        },
        {
            "name": "search_symptoms",
            "description": "Find diseases matching a list of symptoms",
            "inputSchema": schema_for!(SymptomsArgs)
        },
        {
            "name": "search_pathogen",
            "description": "Find diseases caused by a pathogen",
            "inputSchema": schema_for!(PathogenArgs)
        },
        {
            "name": "search_organ",
            "description": "Find diseases affecting an organ",
            "inputSchema": schema_for!(OrganArgs)
        },
        {
            "name": "suggest",
            "description": "Autocomplete disease names and clinical signs",
            "inputSchema": schema_for!(SuggestArgs)
        },
        {
            "name": "list",
            "description": "List diseases, most urgent first",
            "inputSchema": schema_for!(ListArgs)
        },
        {
            "name": "stats",
            "description": "Catalog statistics by type, severity, setting and organ",
            "inputSchema": schema_for!(StatsArgs)
        },
        {
            "name": "show",
            "description": "Full clinical record of a disease: diagnosis, pathogens, antibiotherapy",
            "inputSchema": schema_for!(ShowArgs)
        }
    ])
}
