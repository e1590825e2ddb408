//! diagsearch MCP Server & CLI
//!
//! Dual-mode application:
//! - MCP Server Mode (no subcommand): Model Context Protocol server using stdio
//! - CLI Mode: Command-line utility for direct tool execution
//!
//! Both modes share one search engine built from the catalog and config.

mod cli;
mod mcp;
mod tools;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use diagsearch::catalog::Catalog;
use diagsearch::config::SearchConfig;
use diagsearch::error::AppError;
use diagsearch::search::DiagnosticSearchEngine;
use std::sync::Arc;
use tools::OutputFormat;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let engine = match build_engine(&cli) {
        Ok(engine) => Arc::new(engine),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    };

    let format = OutputFormat::from_json_flag(cli.json);
    match cli.command {
        Some(command) => run_cli_mode(command, &engine, format),
        None => run_mcp_mode(engine).await,
    }
}

/// Logs go to stderr to keep stdout clean for results and JSON-RPC
fn init_logging(cli: &Cli) {
    let filter = if cli.quiet {
        EnvFilter::new("error")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load config and catalog, then index
fn build_engine(cli: &Cli) -> Result<DiagnosticSearchEngine, AppError> {
    let config = SearchConfig::load(cli.config.as_deref())?;

    let catalog = match &cli.catalog {
        Some(path) => {
            info!("Loading catalog from {}", path.display());
            Catalog::from_path(path)?
        }
        None => Catalog::builtin()?,
    };

    Ok(DiagnosticSearchEngine::with_config(catalog, config)?)
}

/// Run in CLI mode
fn run_cli_mode(command: Commands, engine: &DiagnosticSearchEngine, format: OutputFormat) -> Result<()> {
    use tools::{lookup, search};

    let result = match command {
        Commands::Search(args) => search::execute_search(engine, args, format),
        Commands::Symptoms(args) => search::execute_symptoms(engine, args, format),
        Commands::Pathogen(args) => search::execute_pathogen(engine, args, format),
        Commands::Organ(args) => search::execute_organ(engine, args, format),
        Commands::Suggest(args) => search::execute_suggest(engine, args, format),
        Commands::List(args) => search::execute_list(engine, args, format),
        Commands::Stats(args) => lookup::execute_stats(engine, args, format),
        Commands::Show(args) => lookup::execute_show(engine, args, format),
    };

    // Handle result and exit with appropriate code
    match result {
        Ok(output) => {
            println!("{}", output.into_text());
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

/// Run in MCP server mode
async fn run_mcp_mode(engine: Arc<DiagnosticSearchEngine>) -> Result<()> {
    info!("Starting diagsearch MCP Server ({} diseases)", engine.catalog().len());

    mcp::handle_stdio(engine).await?;

    Ok(())
}
