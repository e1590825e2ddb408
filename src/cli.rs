//! CLI mode implementation
//!
//! Argument structs double as MCP tool input schemas (via `schemars`), so the
//! CLI and the server accept the same fields.

use clap::{Args, Parser, Subcommand};
use diagsearch::search::SearchFilters;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// diagsearch CLI
#[derive(Parser)]
#[command(name = "diagsearch")]
#[command(about = "Fuzzy search over a clinical reference of infectious diseases", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Runs the MCP server on stdio when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Disease catalog JSON (defaults to the bundled dataset)
    #[arg(long, global = true, env = "DIAGSEARCH_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Search configuration JSON
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print JSON instead of markdown
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output (no short flag to avoid conflicts)
    #[arg(long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Free-text search with optional filters
    Search(SearchArgs),
    /// Search by a list of symptoms
    Symptoms(SymptomsArgs),
    /// Diseases caused by a pathogen
    Pathogen(PathogenArgs),
    /// Diseases affecting an organ
    Organ(OrganArgs),
    /// Autocomplete suggestions
    Suggest(SuggestArgs),
    /// List diseases, most urgent first
    List(ListArgs),
    /// Catalog statistics
    Stats(StatsArgs),
    /// Full record of one disease
    Show(ShowArgs),
}

/// Structured filters; repeat a flag or separate values with commas
#[derive(Args, JsonSchema, Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct FilterArgs {
    /// Infection types: bacterial, viral, fungal, parasitic
    #[arg(long = "type", value_delimiter = ',')]
    #[serde(rename = "type", default)]
    #[schemars(description = "Infection types: bacterial, viral, fungal, parasitic")]
    pub kind: Option<Vec<String>>,

    /// Severities: mild, moderate, severe, life-threatening
    #[arg(long, value_delimiter = ',')]
    #[serde(default)]
    #[schemars(description = "Severities: mild, moderate, severe, life-threatening")]
    pub severity: Option<Vec<String>>,

    /// Acquisition settings: community, nosocomial, both, tropical, hospital, icu
    #[arg(long, value_delimiter = ',')]
    #[serde(default)]
    #[schemars(description = "Acquisition settings: community, nosocomial, both, tropical, hospital, icu")]
    pub territory: Option<Vec<String>>,

    /// Organs (exact label, case-insensitive)
    #[arg(long, value_delimiter = ',')]
    #[serde(default)]
    #[schemars(description = "Organs (exact label, case-insensitive)")]
    pub organ: Option<Vec<String>>,

    /// Medical specialties
    #[arg(long, value_delimiter = ',')]
    #[serde(default)]
    #[schemars(description = "Medical specialties")]
    pub specialty: Option<Vec<String>>,
}

impl From<FilterArgs> for SearchFilters {
    fn from(args: FilterArgs) -> Self {
        SearchFilters {
            kinds: args.kind,
            severity: args.severity,
            territory: args.territory,
            organ: args.organ,
            specialty: args.specialty,
        }
    }
}

/// Search tool arguments
#[derive(Parser, JsonSchema, Deserialize, Serialize, Clone, Debug)]
pub struct SearchArgs {
    /// Clinical query; "double quotes" or «guillemets» require an exact phrase
    #[arg(short = 'q', long)]
    #[schemars(description = "Clinical query (name, symptom, ICD-10 code...). Quoted phrases must match exactly")]
    pub query: String,

    #[command(flatten)]
    #[serde(flatten)]
    pub filters: FilterArgs,

    /// Maximum number of results (default 20, max 100)
    #[arg(short = 'l', long)]
    #[schemars(description = "Maximum number of results (default 20, max 100)")]
    pub limit: Option<usize>,
}

/// Symptom search arguments
#[derive(Parser, JsonSchema, Deserialize, Serialize, Clone, Debug)]
pub struct SymptomsArgs {
    /// Symptoms, e.g. fièvre "toux productive"
    #[arg(required = true)]
    #[schemars(description = "List of symptoms or clinical signs")]
    pub symptoms: Vec<String>,
}

/// Pathogen search arguments
#[derive(Parser, JsonSchema, Deserialize, Serialize, Clone, Debug)]
pub struct PathogenArgs {
    /// Pathogen name or part of it, e.g. "Escherichia coli"
    #[schemars(description = "Pathogen name or part of it (case-insensitive)")]
    pub pathogen: String,
}

/// Organ search arguments
#[derive(Parser, JsonSchema, Deserialize, Serialize, Clone, Debug)]
pub struct OrganArgs {
    /// Organ name or part of it, e.g. Poumon
    #[schemars(description = "Organ name or part of it (case-insensitive)")]
    pub organ: String,

    #[command(flatten)]
    #[serde(flatten)]
    pub filters: FilterArgs,
}

/// Suggestion arguments
#[derive(Parser, JsonSchema, Deserialize, Serialize, Clone, Debug)]
pub struct SuggestArgs {
    /// Partial input, at least 2 characters
    #[schemars(description = "Partial input, at least 2 characters")]
    pub partial: String,

    /// Maximum number of suggestions (default 5)
    #[arg(short = 'l', long)]
    #[schemars(description = "Maximum number of suggestions (default 5)")]
    pub limit: Option<usize>,
}

/// Listing arguments
#[derive(Parser, JsonSchema, Deserialize, Serialize, Clone, Debug, Default)]
pub struct ListArgs {
    #[command(flatten)]
    #[serde(flatten)]
    pub filters: FilterArgs,

    /// Maximum number of results (default 20, max 100)
    #[arg(short = 'l', long)]
    #[schemars(description = "Maximum number of results (default 20, max 100)")]
    pub limit: Option<usize>,
}

/// Stats takes no arguments
#[derive(Parser, JsonSchema, Deserialize, Serialize, Clone, Debug, Default)]
pub struct StatsArgs {}

/// Detail view arguments
#[derive(Parser, JsonSchema, Deserialize, Serialize, Clone, Debug)]
pub struct ShowArgs {
    /// Disease id, e.g. pneumonia-community-acquired
    #[schemars(description = "Disease id, e.g. pneumonia-community-acquired")]
    pub id: String,
}
