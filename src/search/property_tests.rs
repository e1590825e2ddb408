use super::*;
use crate::catalog::{Catalog, InfectionType, Severity};
use proptest::prelude::*;
use proptest::sample::select;
use std::sync::OnceLock;

fn engine() -> &'static DiagnosticSearchEngine {
    static ENGINE: OnceLock<DiagnosticSearchEngine> = OnceLock::new();
    ENGINE.get_or_init(|| DiagnosticSearchEngine::new(Catalog::builtin().unwrap()))
}

fn query_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zéèêàç ]{0,24}",
        select(vec![
            "pneumonie", "fièvre", "toux", "grippe", "paludisme", "cystite", "covid",
            "pneumopathie", "brulures", "\"toux productive\"", "«fièvre» frissons",
        ])
        .prop_map(str::to_string),
    ]
}

fn filters_strategy() -> impl Strategy<Value = SearchFilters> {
    (
        proptest::option::of(proptest::sample::subsequence(InfectionType::ALL.to_vec(), 0..=4)),
        proptest::option::of(proptest::sample::subsequence(Severity::ALL.to_vec(), 0..=4)),
    )
        .prop_map(|(kinds, severities)| {
            let mut filters = SearchFilters::new();
            if let Some(kinds) = kinds {
                filters = filters.with_types(&kinds);
            }
            if let Some(severities) = severities {
                filters = filters.with_severities(&severities);
            }
            filters
        })
}

proptest! {
    #[test]
    fn search_results_are_bounded_and_ordered(
        query in query_strategy(),
        filters in filters_strategy(),
        limit in 1usize..8,
    ) {
        let results = engine().search(&query, &filters, Some(limit));
        prop_assert!(results.len() <= limit);
        for result in &results {
            prop_assert!((0.0..=1.0).contains(&result.score));
            prop_assert!(filters.matches(&result.disease));
        }
        if query.trim().chars().count() >= engine().config().min_query_len {
            for pair in results.windows(2) {
                prop_assert!(pair[0].score >= pair[1].score);
            }
        }
    }

    #[test]
    fn text_matches_report_terms(query in query_strategy()) {
        if query.trim().chars().count() >= engine().config().min_query_len {
            for result in engine().search(&query, &SearchFilters::default(), None) {
                prop_assert!(!result.matched_terms.is_empty());
            }
        }
    }

    #[test]
    fn listing_is_neutral_and_urgency_sorted(filters in filters_strategy()) {
        let results = engine().get_all_diseases(&filters, Some(usize::MAX));
        for result in &results {
            prop_assert_eq!(result.score, 0.5);
            prop_assert_eq!(result.relevance, Relevance::Medium);
            prop_assert!(filters.matches(&result.disease));
        }
        for pair in results.windows(2) {
            prop_assert!(pair[0].disease.severity <= pair[1].disease.severity);
        }
    }

    #[test]
    fn suggestions_contain_partial(partial in "[a-zé]{0,6}", limit in 0usize..6) {
        let suggestions = engine().get_suggestions(&partial, Some(limit));
        prop_assert!(suggestions.len() <= limit);
        for suggestion in &suggestions {
            prop_assert!(normalize_for_matching(suggestion).contains(&normalize_for_matching(&partial)));
        }
    }

    #[test]
    fn fuzzy_distance_in_unit_range(haystack in "[a-z ]{0,30}", needle in "[a-z]{0,10}") {
        if let Some(m) = FuzzyMatcher::new().fuzzy_match(&haystack, &needle) {
            prop_assert!((0.0..=1.0).contains(&m.distance));
        }
    }

    #[test]
    fn parser_never_panics(query in "\\PC{0,40}") {
        let parsed = QueryParser::parse(&query);
        prop_assert_eq!(parsed.original, query);
    }
}
