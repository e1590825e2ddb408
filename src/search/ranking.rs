//! Ranking & Scoring System
//!
//! Field weights, relevance tiers and the two result orderings: ranked text
//! search and urgency-first listing.
//!
//! Raw scores throughout the matcher are distances in `[0, 1]` where `0` is a
//! perfect hit. They are only turned into public, higher-is-better scores here.

use crate::catalog::DiseaseRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Raw distance below which a match is highly relevant
pub const HIGH_RELEVANCE_CUTOFF: f64 = 0.3;
/// Raw distance below which a match is moderately relevant
pub const MEDIUM_RELEVANCE_CUTOFF: f64 = 0.6;
/// Score given to every record in listing mode
pub const NEUTRAL_SCORE: f64 = 0.5;
/// Weight factor of the lightest field; the heaviest field gets 1.0
pub const MIN_FIELD_FACTOR: f64 = 0.7;

/// Record fields that take part in text matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchField {
    Name,
    CommonNames,
    Primary,
    Synonyms,
    Icd10,
    ClinicalSigns,
    DiagnosticMajor,
    DiagnosticMinor,
    Keywords,
    Organ,
    Specialty,
    Pathogens,
    ExpectedPathogens,
}

impl SearchField {
    pub const ALL: [SearchField; 13] = [
        SearchField::Name,
        SearchField::CommonNames,
        SearchField::Primary,
        SearchField::Synonyms,
        SearchField::Icd10,
        SearchField::ClinicalSigns,
        SearchField::DiagnosticMajor,
        SearchField::DiagnosticMinor,
        SearchField::Keywords,
        SearchField::Organ,
        SearchField::Specialty,
        SearchField::Pathogens,
        SearchField::ExpectedPathogens,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchField::Name => "name",
            SearchField::CommonNames => "commonNames",
            SearchField::Primary => "searchTerms.primary",
            SearchField::Synonyms => "searchTerms.synonyms",
            SearchField::Icd10 => "searchTerms.icd10",
            SearchField::ClinicalSigns => "searchTerms.clinicalSigns",
            SearchField::DiagnosticMajor => "diagnostic.clinical.major",
            SearchField::DiagnosticMinor => "diagnostic.clinical.minor",
            SearchField::Keywords => "searchTerms.keywords",
            SearchField::Organ => "organ",
            SearchField::Specialty => "specialty",
            SearchField::Pathogens => "pathogens.name",
            SearchField::ExpectedPathogens => "diagnostic.microbiological.expectedPathogens",
        }
    }

    /// Literal values of this field on a record
    pub fn values<'a>(&self, record: &'a DiseaseRecord) -> Vec<&'a str> {
        fn strs(values: &[String]) -> Vec<&str> {
            values.iter().map(String::as_str).collect()
        }

        match self {
            SearchField::Name => vec![record.name.as_str()],
            SearchField::CommonNames => strs(&record.common_names),
            SearchField::Primary => strs(&record.search_terms.primary),
            SearchField::Synonyms => strs(&record.search_terms.synonyms),
            SearchField::Icd10 => strs(&record.search_terms.icd10),
            SearchField::ClinicalSigns => strs(&record.search_terms.clinical_signs),
            SearchField::DiagnosticMajor => strs(&record.diagnostic.clinical.major),
            SearchField::DiagnosticMinor => strs(&record.diagnostic.clinical.minor),
            SearchField::Keywords => strs(&record.search_terms.keywords),
            SearchField::Organ if record.organ.is_empty() => Vec::new(),
            SearchField::Organ => vec![record.organ.as_str()],
            SearchField::Specialty => strs(&record.specialty),
            SearchField::Pathogens => record.pathogens.iter().map(|p| p.name.as_str()).collect(),
            SearchField::ExpectedPathogens => {
                strs(&record.diagnostic.microbiological.expected_pathogens)
            }
        }
    }
}

/// Relative weight of each searchable field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct FieldWeights {
    pub name: f64,
    pub common_names: f64,
    pub primary: f64,
    pub synonyms: f64,
    pub icd10: f64,
    pub clinical_signs: f64,
    pub diagnostic_major: f64,
    pub diagnostic_minor: f64,
    pub keywords: f64,
    pub organ: f64,
    pub specialty: f64,
    pub pathogens: f64,
    pub expected_pathogens: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            name: 3.0,
            common_names: 2.5,
            primary: 3.0,
            synonyms: 2.0,
            icd10: 1.5,
            clinical_signs: 2.0,
            diagnostic_major: 1.8,
            diagnostic_minor: 1.5,
            keywords: 1.2,
            organ: 1.5,
            specialty: 1.0,
            pathogens: 1.0,
            expected_pathogens: 0.8,
        }
    }
}

impl FieldWeights {
    pub fn get(&self, field: SearchField) -> f64 {
        match field {
            SearchField::Name => self.name,
            SearchField::CommonNames => self.common_names,
            SearchField::Primary => self.primary,
            SearchField::Synonyms => self.synonyms,
            SearchField::Icd10 => self.icd10,
            SearchField::ClinicalSigns => self.clinical_signs,
            SearchField::DiagnosticMajor => self.diagnostic_major,
            SearchField::DiagnosticMinor => self.diagnostic_minor,
            SearchField::Keywords => self.keywords,
            SearchField::Organ => self.organ,
            SearchField::Specialty => self.specialty,
            SearchField::Pathogens => self.pathogens,
            SearchField::ExpectedPathogens => self.expected_pathogens,
        }
    }

    /// Largest weight; a hit in a field of this weight is not discounted
    pub fn max(&self) -> f64 {
        SearchField::ALL
            .iter()
            .map(|&field| self.get(field))
            .fold(0.0, f64::max)
    }

    /// Weight of `field` relative to the heaviest field, mapped into
    /// `[MIN_FIELD_FACTOR, 1]`
    pub fn ratio(&self, field: SearchField) -> f64 {
        let max = self.max();
        if max <= 0.0 {
            return 1.0;
        }
        let relative = (self.get(field) / max).clamp(0.0, 1.0);
        MIN_FIELD_FACTOR + (1.0 - MIN_FIELD_FACTOR) * relative
    }
}

/// Scoring weights for different match signals
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringWeights {
    pub fields: FieldWeights,
    /// Share of similarity kept when a record only matches term by term
    pub term_match_factor: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            fields: FieldWeights::default(),
            term_match_factor: 0.7,
        }
    }
}

/// Fold a field weight into a raw distance.
///
/// Monotone in both arguments: a better hit or a heavier field always yields
/// a smaller distance.
pub fn weighted_distance(distance: f64, weight_ratio: f64) -> f64 {
    1.0 - (1.0 - distance.clamp(0.0, 1.0)) * weight_ratio.clamp(0.0, 1.0)
}

/// Coarse relevance bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relevance {
    High,
    Medium,
    Low,
}

impl Relevance {
    /// Bucket a raw distance (not the public score)
    pub fn from_distance(distance: f64) -> Self {
        if distance < HIGH_RELEVANCE_CUTOFF {
            Relevance::High
        } else if distance < MEDIUM_RELEVANCE_CUTOFF {
            Relevance::Medium
        } else {
            Relevance::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Relevance::High => "high",
            Relevance::Medium => "medium",
            Relevance::Low => "low",
        }
    }
}

/// Public, higher-is-better score from a raw distance
pub fn public_score(distance: f64) -> f64 {
    1.0 - distance.clamp(0.0, 1.0)
}

/// Text-search order: best score first, then name, then id
pub fn compare_by_score(
    a_score: f64,
    a: &DiseaseRecord,
    b_score: f64,
    b: &DiseaseRecord,
) -> Ordering {
    b_score
        .total_cmp(&a_score)
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id.cmp(&b.id))
}

/// Listing order: most urgent severity first, then name, then id
pub fn compare_by_urgency(a: &DiseaseRecord, b: &DiseaseRecord) -> Ordering {
    a.severity
        .cmp(&b.severity)
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id.cmp(&b.id))
}
