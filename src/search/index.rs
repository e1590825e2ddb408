//! Weighted field index
//!
//! Every searchable value of every record is normalized once, when the index
//! is built, and the index is never mutated afterwards. Matching a parsed
//! query walks the prepared values and keeps, per record, the best
//! weight-adjusted distance plus the literal values that hit.

use super::fuzzy::{FuzzyMatcher, PreparedText};
use super::parser::ParsedQuery;
use super::ranking::{weighted_distance, ScoringWeights, SearchField};
use crate::catalog::Catalog;

#[derive(Debug, Clone)]
struct IndexedValue {
    original: String,
    prepared: PreparedText,
}

#[derive(Debug, Clone)]
struct IndexedField {
    weight_ratio: f64,
    values: Vec<IndexedValue>,
}

#[derive(Debug, Clone)]
struct IndexedRecord {
    fields: Vec<IndexedField>,
}

/// Raw match of one record against a query
#[derive(Debug, Clone, PartialEq)]
pub struct RecordMatch {
    /// Position of the record in catalog order
    pub record_index: usize,
    /// Weighted distance in `[0, 1]`, lower is better
    pub distance: f64,
    /// Literal field values that matched, in field order, de-duplicated
    pub matched_terms: Vec<String>,
}

/// Best hit of a single term over all fields of a record
#[derive(Debug, Clone)]
struct TermHit {
    distance: f64,
    values: Vec<String>,
}

/// Prepared field values for the whole catalog
#[derive(Debug, Clone)]
pub struct CatalogIndex {
    records: Vec<IndexedRecord>,
    matcher: FuzzyMatcher,
    term_match_factor: f64,
}

impl CatalogIndex {
    /// Build the index; runs once per catalog
    pub fn build(catalog: &Catalog, weights: &ScoringWeights, matcher: FuzzyMatcher) -> Self {
        let records = catalog
            .iter()
            .map(|record| IndexedRecord {
                fields: SearchField::ALL
                    .iter()
                    .map(|&field| IndexedField {
                        weight_ratio: weights.fields.ratio(field),
                        values: field
                            .values(record)
                            .into_iter()
                            .map(|value| IndexedValue {
                                original: value.to_string(),
                                prepared: PreparedText::new(value),
                            })
                            .filter(|value| !value.prepared.is_empty())
                            .collect(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            records,
            matcher,
            term_match_factor: weights.term_match_factor,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every record matching the query, in catalog order
    pub fn match_query(&self, parsed: &ParsedQuery) -> Vec<RecordMatch> {
        if parsed.is_empty() {
            return Vec::new();
        }

        let whole = PreparedText::new(&parsed.whole_query);
        let words: Vec<PreparedText> = if parsed.individual_words.len() > 1 {
            parsed.individual_words.iter().map(|w| PreparedText::new(w)).collect()
        } else {
            Vec::new()
        };
        let phrases: Vec<PreparedText> = parsed
            .quoted_phrases
            .iter()
            .map(|p| PreparedText::new(p))
            .collect();

        self.records
            .iter()
            .enumerate()
            .filter_map(|(record_index, record)| {
                self.match_record(record, &whole, &words, &phrases)
                    .map(|(distance, matched_terms)| RecordMatch {
                        record_index,
                        distance,
                        matched_terms,
                    })
            })
            .collect()
    }

    fn match_record(
        &self,
        record: &IndexedRecord,
        whole: &PreparedText,
        words: &[PreparedText],
        phrases: &[PreparedText],
    ) -> Option<(f64, Vec<String>)> {
        let mut matched_terms: Vec<String> = Vec::new();

        // Quoted phrases must all appear verbatim somewhere
        for phrase in phrases {
            let hits = Self::literal_hits(record, phrase);
            if hits.is_empty() {
                return None;
            }
            push_unique(&mut matched_terms, hits);
        }

        let mut best: Option<f64> = None;

        if let Some(hit) = self.match_term(record, whole) {
            best = Some(hit.distance);
            push_unique(&mut matched_terms, hit.values);
        }

        if !words.is_empty() {
            let mut similarity_sum = 0.0;
            let mut any_hit = false;
            for word in words {
                if let Some(hit) = self.match_term(record, word) {
                    similarity_sum += 1.0 - hit.distance;
                    any_hit = true;
                    push_unique(&mut matched_terms, hit.values);
                }
            }
            if any_hit {
                let mean_similarity = similarity_sum / words.len() as f64;
                let combined = 1.0 - self.term_match_factor * mean_similarity;
                best = Some(best.map_or(combined, |b| b.min(combined)));
            }
        }

        // A record selected by quoted phrases alone is an exact literal hit
        if best.is_none() && !phrases.is_empty() {
            best = Some(0.0);
        }

        best.map(|distance| (distance.clamp(0.0, 1.0), matched_terms))
    }

    /// Best weighted hit of one term across all fields
    fn match_term(&self, record: &IndexedRecord, term: &PreparedText) -> Option<TermHit> {
        let mut best: Option<f64> = None;
        let mut values = Vec::new();

        for field in &record.fields {
            let field_best = field
                .values
                .iter()
                .filter_map(|value| {
                    self.matcher
                        .match_prepared(&value.prepared, term)
                        .map(|m| (m.distance, value))
                })
                .inspect(|(_, value)| {
                    if !values.contains(&value.original) {
                        values.push(value.original.clone());
                    }
                })
                .map(|(distance, _)| distance)
                .fold(None, |acc: Option<f64>, d| Some(acc.map_or(d, |a| a.min(d))));

            if let Some(distance) = field_best {
                let weighted = weighted_distance(distance, field.weight_ratio);
                best = Some(best.map_or(weighted, |b| b.min(weighted)));
            }
        }

        best.map(|distance| TermHit { distance, values })
    }

    fn literal_hits(record: &IndexedRecord, phrase: &PreparedText) -> Vec<String> {
        if phrase.is_empty() {
            return Vec::new();
        }
        record
            .fields
            .iter()
            .flat_map(|field| field.values.iter())
            .filter(|value| value.prepared.normalized.contains(&phrase.normalized))
            .map(|value| value.original.clone())
            .collect()
    }
}

fn push_unique(target: &mut Vec<String>, values: Vec<String>) {
    for value in values {
        if !target.contains(&value) {
            target.push(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{DiseaseRecord, InfectionType, Severity};
    use crate::search::parser::QueryParser;

    fn catalog() -> Catalog {
        let mut pneumonia = DiseaseRecord::new(
            "pneumonia",
            "Pneumonie Communautaire",
            InfectionType::Bacterial,
            Severity::Moderate,
        );
        pneumonia.search_terms.primary = vec!["pneumonie".into(), "pneumopathie".into()];
        pneumonia.search_terms.clinical_signs = vec!["toux productive".into(), "fièvre".into()];
        pneumonia.organ = "Poumon".into();

        let mut cystitis =
            DiseaseRecord::new("cystitis", "Cystite Aiguë Simple", InfectionType::Bacterial, Severity::Mild);
        cystitis.search_terms.clinical_signs = vec!["brûlures mictionnelles".into(), "dysurie".into()];
        cystitis.organ = "Vessie".into();

        let mut malaria =
            DiseaseRecord::new("malaria", "Paludisme", InfectionType::Parasitic, Severity::LifeThreatening);
        malaria.search_terms.clinical_signs = vec!["fièvre".into(), "frissons".into()];

        Catalog::new(vec![pneumonia, cystitis, malaria]).unwrap()
    }

    fn index() -> CatalogIndex {
        CatalogIndex::build(&catalog(), &ScoringWeights::default(), FuzzyMatcher::new())
    }

    fn ids(matches: &[RecordMatch]) -> Vec<usize> {
        matches.iter().map(|m| m.record_index).collect()
    }

    #[test]
    fn test_index_covers_catalog() {
        assert_eq!(index().len(), 3);
    }

    #[test]
    fn test_single_term_match() {
        let matches = index().match_query(&QueryParser::parse("pneumonie"));
        assert_eq!(ids(&matches), vec![0]);
        assert_eq!(matches[0].distance, 0.0);
        assert!(matches[0].matched_terms.contains(&"pneumonie".to_string()));
        assert!(matches[0].matched_terms.contains(&"Pneumonie Communautaire".to_string()));
    }

    #[test]
    fn test_shared_sign_matches_several_records() {
        let matches = index().match_query(&QueryParser::parse("fièvre"));
        assert_eq!(ids(&matches), vec![0, 2]);
    }

    #[test]
    fn test_multi_term_query_uses_term_path() {
        let matches = index().match_query(&QueryParser::parse("fièvre dysurie"));
        let found = ids(&matches);
        assert!(found.contains(&0));
        assert!(found.contains(&1));
        assert!(found.contains(&2));
        for m in &matches {
            assert!(m.distance > 0.0 && m.distance <= 1.0);
        }
    }

    #[test]
    fn test_quoted_phrase_required() {
        let matches = index().match_query(&QueryParser::parse(r#""toux productive" fièvre"#));
        assert_eq!(ids(&matches), vec![0]);
        assert_eq!(matches[0].matched_terms[0], "toux productive");
    }

    #[test]
    fn test_no_match() {
        assert!(index().match_query(&QueryParser::parse("zzzzqqq")).is_empty());
        assert!(index().match_query(&QueryParser::parse("")).is_empty());
    }
}
