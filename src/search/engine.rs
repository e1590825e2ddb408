//! Search Engine Integration
//!
//! `DiagnosticSearchEngine` is the single entry point over a catalog. It ties
//! together query parsing, fuzzy matching, filtering and ranking, and exposes
//! the exact-substring lookups, suggestions, listing and stats.
//!
//! Everything derived from the catalog (field index, suggestion list, stats)
//! is computed in the constructor and never mutated, so one engine can be
//! shared freely across threads.

use super::filter::{apply_filters, SearchFilters};
use super::fuzzy::{normalize_for_matching, FuzzyMatcher};
use super::index::CatalogIndex;
use super::parser::QueryParser;
use super::ranking::{
    compare_by_score, compare_by_urgency, public_score, Relevance, ScoringWeights, NEUTRAL_SCORE,
};
use crate::catalog::{Catalog, DiseaseRecord};
use crate::config::SearchConfig;
use crate::error::ConfigError;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

/// Ranked search hit
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// The matched record, shared with the catalog
    pub disease: Arc<DiseaseRecord>,
    /// Relevance score in `[0, 1]`, higher is better
    pub score: f64,
    /// Which field values matched
    pub matched_terms: Vec<String>,
    pub relevance: Relevance,
}

impl SearchResult {
    fn exact(disease: Arc<DiseaseRecord>, term: &str) -> Self {
        Self {
            disease,
            score: 1.0,
            matched_terms: vec![term.to_string()],
            relevance: Relevance::High,
        }
    }

    fn neutral(disease: Arc<DiseaseRecord>) -> Self {
        Self {
            disease,
            score: NEUTRAL_SCORE,
            matched_terms: Vec::new(),
            relevance: Relevance::Medium,
        }
    }
}

/// Record counts grouped by classification
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub total: usize,
    pub by_type: BTreeMap<String, usize>,
    pub by_severity: BTreeMap<String, usize>,
    pub by_territory: BTreeMap<String, usize>,
    pub by_organ: BTreeMap<String, usize>,
}

impl CatalogStats {
    fn compute(catalog: &Catalog) -> Self {
        let mut stats = CatalogStats {
            total: catalog.len(),
            ..Default::default()
        };
        for disease in catalog.iter() {
            *stats.by_type.entry(disease.kind.to_string()).or_default() += 1;
            *stats.by_severity.entry(disease.severity.to_string()).or_default() += 1;
            *stats.by_territory.entry(disease.territory.to_string()).or_default() += 1;
            *stats.by_organ.entry(disease.organ.clone()).or_default() += 1;
        }
        stats
    }
}

#[derive(Debug, Clone)]
struct Suggestion {
    text: String,
    normalized: String,
}

/// Search engine over an immutable disease catalog
#[derive(Debug, Clone)]
pub struct DiagnosticSearchEngine {
    catalog: Catalog,
    index: CatalogIndex,
    config: SearchConfig,
    suggestions: Vec<Suggestion>,
    stats: CatalogStats,
}

impl DiagnosticSearchEngine {
    /// Create a search engine with default configuration
    pub fn new(catalog: Catalog) -> Self {
        Self::build(catalog, SearchConfig::default())
    }

    /// Create a search engine with a custom configuration
    pub fn with_config(catalog: Catalog, config: SearchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(catalog, config))
    }

    fn build(catalog: Catalog, config: SearchConfig) -> Self {
        let weights = ScoringWeights {
            fields: config.field_weights.clone(),
            term_match_factor: config.term_match_factor,
        };
        let matcher = FuzzyMatcher::with_threshold(config.fuzzy_threshold);
        let index = CatalogIndex::build(&catalog, &weights, matcher);
        let suggestions = Self::collect_suggestions(&catalog);
        let stats = CatalogStats::compute(&catalog);

        info!(
            "Search engine ready: {} diseases, {} suggestion entries",
            catalog.len(),
            suggestions.len()
        );

        Self {
            catalog,
            index,
            config,
            suggestions,
            stats,
        }
    }

    /// Autocomplete candidates in catalog order: name, common names, clinical signs
    fn collect_suggestions(catalog: &Catalog) -> Vec<Suggestion> {
        let mut seen = HashSet::new();
        let mut suggestions = Vec::new();

        for disease in catalog.iter() {
            let candidates = std::iter::once(&disease.name)
                .chain(disease.common_names.iter())
                .chain(disease.search_terms.clinical_signs.iter());

            for text in candidates {
                let normalized = normalize_for_matching(text);
                if normalized.is_empty() || !seen.insert(normalized.clone()) {
                    continue;
                }
                suggestions.push(Suggestion {
                    text: text.trim().to_string(),
                    normalized,
                });
            }
        }

        suggestions
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    fn is_short(&self, text: &str) -> bool {
        text.trim().chars().count() < self.config.min_query_len
    }

    /// Free-text search.
    ///
    /// Queries shorter than the minimum length fall back to the listing.
    pub fn search(&self, query: &str, filters: &SearchFilters, limit: Option<usize>) -> Vec<SearchResult> {
        let limit = limit.unwrap_or(self.config.default_limit);
        if self.is_short(query) {
            return self.get_all_diseases(filters, Some(limit));
        }

        let parsed = QueryParser::parse(query);
        let matches = self.index.match_query(&parsed);
        let matched = matches.len();

        let records = self.catalog.records();
        let candidates: Vec<(f64, SearchResult)> = matches
            .into_iter()
            .map(|m| {
                let result = SearchResult {
                    disease: Arc::clone(&records[m.record_index]),
                    score: public_score(m.distance),
                    matched_terms: m.matched_terms,
                    relevance: Relevance::from_distance(m.distance),
                };
                (m.distance, result)
            })
            .collect();

        let mut results: Vec<SearchResult> = apply_filters(candidates, filters, |(_, r)| r.disease.as_ref())
            .into_iter()
            .map(|(_, result)| result)
            .collect();

        results.sort_by(|a, b| compare_by_score(a.score, &a.disease, b.score, &b.disease));
        results.truncate(limit);

        debug!(
            "Search '{}': {} matched, {} returned",
            query,
            matched,
            results.len()
        );

        results
    }

    /// Search by a list of symptoms, joined into one query
    pub fn search_by_symptoms<S: AsRef<str>>(&self, symptoms: &[S]) -> Vec<SearchResult> {
        let query = symptoms
            .iter()
            .map(|s| s.as_ref().trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        self.search(&query, &SearchFilters::default(), None)
    }

    /// Records with a pathogen whose name contains `name`, case-insensitively
    pub fn search_by_pathogen(&self, name: &str) -> Vec<SearchResult> {
        let needle = normalize_for_matching(name);
        if needle.is_empty() {
            return Vec::new();
        }

        let results: Vec<SearchResult> = self
            .catalog
            .iter()
            .filter(|disease| {
                disease
                    .pathogens
                    .iter()
                    .any(|p| normalize_for_matching(&p.name).contains(&needle))
            })
            .map(|disease| SearchResult::exact(Arc::clone(disease), name.trim()))
            .collect();

        debug!("Pathogen search '{}': {} results", name, results.len());
        results
    }

    /// Records whose organ contains `organ`, case-insensitively, then filtered
    pub fn search_by_organ(&self, organ: &str, filters: &SearchFilters) -> Vec<SearchResult> {
        let needle = normalize_for_matching(organ);
        if needle.is_empty() {
            return Vec::new();
        }

        let results: Vec<SearchResult> = self
            .catalog
            .iter()
            .filter(|disease| normalize_for_matching(&disease.organ).contains(&needle))
            .map(|disease| SearchResult::exact(Arc::clone(disease), organ.trim()))
            .collect();

        apply_filters(results, filters, |r| r.disease.as_ref())
    }

    /// Autocomplete strings containing `partial`, case-insensitively
    pub fn get_suggestions(&self, partial: &str, limit: Option<usize>) -> Vec<String> {
        if self.is_short(partial) {
            return Vec::new();
        }
        let limit = limit.unwrap_or(self.config.suggestion_limit);
        let needle = normalize_for_matching(partial);

        self.suggestions
            .iter()
            .filter(|s| s.normalized.contains(&needle))
            .take(limit)
            .map(|s| s.text.clone())
            .collect()
    }

    /// Unranked listing: most urgent first, then alphabetical
    pub fn get_all_diseases(&self, filters: &SearchFilters, limit: Option<usize>) -> Vec<SearchResult> {
        let limit = limit.unwrap_or(self.config.default_limit);

        let listed: Vec<SearchResult> = self.catalog.iter().cloned().map(SearchResult::neutral).collect();
        let mut results = apply_filters(listed, filters, |r| r.disease.as_ref());
        results.sort_by(|a, b| compare_by_urgency(&a.disease, &b.disease));
        results.truncate(limit);
        results
    }

    /// Lookup by id
    pub fn get_disease(&self, id: &str) -> Option<Arc<DiseaseRecord>> {
        self.catalog.get(id.trim()).cloned()
    }

    /// Counts by type, severity, territory and organ
    pub fn get_stats(&self) -> CatalogStats {
        self.stats.clone()
    }
}
