//! Disease record types
//!
//! Field names follow the camelCase JSON layout of the reference dataset.
//! Every list defaults to empty so partially-filled records load cleanly.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Kind of infectious agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InfectionType {
    Bacterial,
    Viral,
    Fungal,
    Parasitic,
}

impl InfectionType {
    pub const ALL: [InfectionType; 4] = [
        InfectionType::Bacterial,
        InfectionType::Viral,
        InfectionType::Fungal,
        InfectionType::Parasitic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InfectionType::Bacterial => "bacterial",
            InfectionType::Viral => "viral",
            InfectionType::Fungal => "fungal",
            InfectionType::Parasitic => "parasitic",
        }
    }
}

impl fmt::Display for InfectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clinical severity.
///
/// Variants are declared in urgency order, so the derived `Ord` sorts
/// life-threatening records first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Severity {
    LifeThreatening,
    Severe,
    Moderate,
    Mild,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::LifeThreatening,
        Severity::Severe,
        Severity::Moderate,
        Severity::Mild,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::LifeThreatening => "life-threatening",
            Severity::Severe => "severe",
            Severity::Moderate => "moderate",
            Severity::Mild => "mild",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Setting where the infection was acquired.
///
/// String-backed: new territories can appear in data without code changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Territory(String);

impl Territory {
    pub const COMMUNITY: &'static str = "community";
    pub const NOSOCOMIAL: &'static str = "nosocomial";
    pub const BOTH: &'static str = "both";
    pub const TROPICAL: &'static str = "tropical";
    pub const HOSPITAL: &'static str = "hospital";
    pub const ICU: &'static str = "icu";

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Territory {
    fn default() -> Self {
        Self::new(Self::COMMUNITY)
    }
}

impl From<&str> for Territory {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Territory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strings used only for matching
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchTerms {
    pub primary: Vec<String>,
    pub synonyms: Vec<String>,
    pub icd10: Vec<String>,
    pub clinical_signs: Vec<String>,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClinicalCriteria {
    pub major: Vec<String>,
    pub minor: Vec<String>,
    pub exclusion: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BiologicalCriteria {
    pub mandatory: Vec<String>,
    pub supportive: Vec<String>,
    pub threshold: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImagingCriteria {
    pub first_line: Vec<String>,
    pub second_line: Vec<String>,
    pub findings: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MicrobiologicalCriteria {
    pub samples: Vec<String>,
    pub tests: Vec<String>,
    pub expected_pathogens: Vec<String>,
}

/// Structured diagnostic criteria
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiagnosticCriteria {
    pub clinical: ClinicalCriteria,
    pub biological: BiologicalCriteria,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imaging: Option<ImagingCriteria>,
    pub microbiological: MicrobiologicalCriteria,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Epidemiology {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incidence: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prevalence: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seasonality: Option<String>,
    pub risk_factors: Vec<String>,
    pub age_groups: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pathogen {
    pub name: String,
    #[serde(default)]
    pub frequency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    #[serde(rename = "PO")]
    Oral,
    #[serde(rename = "IV")]
    Intravenous,
    #[serde(rename = "IM")]
    Intramuscular,
    #[serde(rename = "SC")]
    Subcutaneous,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Oral => "PO",
            Route::Intravenous => "IV",
            Route::Intramuscular => "IM",
            Route::Subcutaneous => "SC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreatmentLine {
    First,
    Second,
    Third,
    Alternative,
}

impl TreatmentLine {
    pub fn as_str(&self) -> &'static str {
        match self {
            TreatmentLine::First => "first",
            TreatmentLine::Second => "second",
            TreatmentLine::Third => "third",
            TreatmentLine::Alternative => "alternative",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CostCategory {
    Low,
    Moderate,
    High,
    VeryHigh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Availability {
    WidelyAvailable,
    Limited,
    Restricted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Molecule {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
    pub route: Route,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One known shape of dose adjustment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DoseAdjustment {
    Renal {
        #[serde(rename = "creatinineClearance")]
        creatinine_clearance: String,
        adjustment: String,
    },
    Hepatic {
        severity: String,
        adjustment: String,
    },
    Weight {
        note: String,
    },
    Age {
        note: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deescalation {
    pub criteria: Vec<String>,
    pub to: String,
    pub timing: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AntibioticRegimen {
    pub name: String,
    pub indication: String,
    pub context: Territory,
    pub line: TreatmentLine,
    pub molecules: Vec<Molecule>,
    #[serde(default)]
    pub contraindications: Vec<String>,
    #[serde(default)]
    pub precautions: Vec<String>,
    #[serde(default)]
    pub monitoring: Vec<String>,
    #[serde(default)]
    pub adjustments: Vec<DoseAdjustment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deescalation: Option<Deescalation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_category: Option<CostCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<Availability>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TreatmentDuration {
    pub standard: String,
    pub severe: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Empiric and pathogen-documented regimens
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Antibiotherapy {
    pub probabilistic: Vec<AntibioticRegimen>,
    pub documented: Vec<AntibioticRegimen>,
    pub duration: TreatmentDuration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuidelineReference {
    pub source: String,
    pub year: u16,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub last_updated: String,
}

/// A disease entry of the reference catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub common_names: Vec<String>,
    #[serde(default)]
    pub search_terms: SearchTerms,
    #[serde(rename = "type")]
    pub kind: InfectionType,
    pub severity: Severity,
    #[serde(default)]
    pub territory: Territory,
    #[serde(default)]
    pub organ: String,
    #[serde(default)]
    pub specialty: Vec<String>,
    #[serde(default)]
    pub epidemiology: Epidemiology,
    #[serde(default)]
    pub diagnostic: DiagnosticCriteria,
    #[serde(default)]
    pub differential_diagnosis: Vec<String>,
    #[serde(default)]
    pub pathogens: Vec<Pathogen>,
    #[serde(default)]
    pub antibiotherapy: Antibiotherapy,
    #[serde(default)]
    pub supportive_care: Vec<String>,
    #[serde(default)]
    pub complications: Vec<String>,
    #[serde(default)]
    pub guidelines: Vec<GuidelineReference>,
    #[serde(default)]
    pub last_updated: String,
    #[serde(default)]
    pub version: String,
}

impl DiseaseRecord {
    /// Minimal record; remaining fields take their defaults
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: InfectionType,
        severity: Severity,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            common_names: Vec::new(),
            search_terms: SearchTerms::default(),
            kind,
            severity,
            territory: Territory::default(),
            organ: String::new(),
            specialty: Vec::new(),
            epidemiology: Epidemiology::default(),
            diagnostic: DiagnosticCriteria::default(),
            differential_diagnosis: Vec::new(),
            pathogens: Vec::new(),
            antibiotherapy: Antibiotherapy::default(),
            supportive_care: Vec::new(),
            complications: Vec::new(),
            guidelines: Vec::new(),
            last_updated: String::new(),
            version: String::new(),
        }
    }
}
