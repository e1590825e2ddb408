//! Structured result filters
//!
//! Each dimension is an optional allow-list. Dimensions combine with AND,
//! values within a dimension with OR. Values are compared as trimmed,
//! case-insensitive strings, so an unknown value simply matches nothing.

use crate::catalog::{DiseaseRecord, InfectionType, Severity};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Optional inclusion lists; `None` means no constraint on that dimension
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SearchFilters {
    /// Infection types (bacterial, viral, fungal, parasitic)
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kinds: Option<Vec<String>>,
    /// Severities (mild, moderate, severe, life-threatening)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Vec<String>>,
    /// Acquisition settings (community, nosocomial, tropical, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub territory: Option<Vec<String>>,
    /// Organs, matched against the whole organ label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organ: Option<Vec<String>>,
    /// Specialties; a record passes if any of its specialties is listed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialty: Option<Vec<String>>,
}

impl SearchFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_types(mut self, kinds: &[InfectionType]) -> Self {
        self.kinds = Some(kinds.iter().map(|k| k.as_str().to_string()).collect());
        self
    }

    pub fn with_severities(mut self, severities: &[Severity]) -> Self {
        self.severity = Some(severities.iter().map(|s| s.as_str().to_string()).collect());
        self
    }

    pub fn with_territories<S: AsRef<str>>(mut self, territories: &[S]) -> Self {
        self.territory = Some(to_owned_list(territories));
        self
    }

    pub fn with_organs<S: AsRef<str>>(mut self, organs: &[S]) -> Self {
        self.organ = Some(to_owned_list(organs));
        self
    }

    pub fn with_specialties<S: AsRef<str>>(mut self, specialties: &[S]) -> Self {
        self.specialty = Some(to_owned_list(specialties));
        self
    }

    /// True when no dimension is constrained
    pub fn is_empty(&self) -> bool {
        self.kinds.is_none()
            && self.severity.is_none()
            && self.territory.is_none()
            && self.organ.is_none()
            && self.specialty.is_none()
    }

    /// Whether a record satisfies every supplied dimension
    pub fn matches(&self, disease: &DiseaseRecord) -> bool {
        allows(&self.kinds, disease.kind.as_str())
            && allows(&self.severity, disease.severity.as_str())
            && allows(&self.territory, disease.territory.as_str())
            && allows(&self.organ, &disease.organ)
            && allows_any(&self.specialty, &disease.specialty)
    }
}

fn to_owned_list<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    values.iter().map(|v| v.as_ref().to_string()).collect()
}

fn same_value(allowed: &str, value: &str) -> bool {
    allowed.trim().to_lowercase() == value.trim().to_lowercase()
}

fn allows(allowed: &Option<Vec<String>>, value: &str) -> bool {
    match allowed {
        None => true,
        Some(list) => list.iter().any(|a| same_value(a, value)),
    }
}

fn allows_any(allowed: &Option<Vec<String>>, values: &[String]) -> bool {
    match allowed {
        None => true,
        Some(list) => values
            .iter()
            .any(|value| list.iter().any(|a| same_value(a, value))),
    }
}

/// Keep the items whose disease satisfies the filters, preserving order
pub fn apply_filters<T, F>(items: Vec<T>, filters: &SearchFilters, disease_of: F) -> Vec<T>
where
    F: Fn(&T) -> &DiseaseRecord,
{
    if filters.is_empty() {
        return items;
    }
    items
        .into_iter()
        .filter(|item| filters.matches(disease_of(item)))
        .collect()
}
