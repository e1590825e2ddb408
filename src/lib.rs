//! diagsearch: fuzzy search over a clinical reference of infectious diseases
//!
//! Build a [`catalog::Catalog`] once, hand it to
//! [`search::DiagnosticSearchEngine`], then query it from any thread:
//!
//! ```no_run
//! use diagsearch::catalog::Catalog;
//! use diagsearch::search::{DiagnosticSearchEngine, SearchFilters};
//!
//! let engine = DiagnosticSearchEngine::new(Catalog::builtin()?);
//! let results = engine.search("pneumonie", &SearchFilters::default(), Some(5));
//! # Ok::<(), diagsearch::error::CatalogError>(())
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod search;

pub use catalog::{Catalog, DiseaseRecord};
pub use config::SearchConfig;
pub use search::{DiagnosticSearchEngine, SearchFilters, SearchResult};
