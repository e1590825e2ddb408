//! Fuzzy search over the disease catalog
//!
//! Pipeline: parse the query, match it against the prepared field index,
//! filter, rank, cap. `DiagnosticSearchEngine` is the entry point.

pub mod engine;
pub mod filter;
pub mod fuzzy;
pub mod index;
pub mod parser;
pub mod ranking;

#[cfg(test)]
mod property_tests;

pub use engine::{CatalogStats, DiagnosticSearchEngine, SearchResult};
pub use filter::{apply_filters, SearchFilters};
pub use fuzzy::{normalize_for_matching, FuzzyMatch, FuzzyMatcher, MatchType};
pub use parser::{ParsedQuery, QueryParser};
pub use ranking::{FieldWeights, Relevance, ScoringWeights, SearchField};
