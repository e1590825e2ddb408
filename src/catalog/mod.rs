//! Disease catalog
//!
//! Immutable, id-indexed collection of disease records. Built once from
//! static data and shared read-only with the search engine.

pub mod types;

pub use types::{
    Antibiotherapy, AntibioticRegimen, DiagnosticCriteria, DiseaseRecord, DoseAdjustment,
    InfectionType, Pathogen, SearchTerms, Severity, Territory,
};

use crate::error::CatalogError;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Dataset shipped with the binary
const BUILTIN_CATALOG: &str = include_str!("../../data/diseases.json");

/// Ordered, id-indexed set of disease records
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<Arc<DiseaseRecord>>,
    by_id: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog, rejecting malformed records up front
    pub fn new(records: Vec<DiseaseRecord>) -> Result<Self, CatalogError> {
        let mut by_id = HashMap::with_capacity(records.len());

        for (index, record) in records.iter().enumerate() {
            if record.id.trim().is_empty() {
                return Err(CatalogError::EmptyId { index });
            }
            if record.name.trim().is_empty() {
                return Err(CatalogError::EmptyName(record.id.clone()));
            }
            if by_id.insert(record.id.clone(), index).is_some() {
                return Err(CatalogError::DuplicateId(record.id.clone()));
            }
        }

        debug!("Catalog built with {} records", records.len());

        Ok(Self {
            records: records.into_iter().map(Arc::new).collect(),
            by_id,
        })
    }

    /// Parse a JSON array of records
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let records: Vec<DiseaseRecord> = serde_json::from_str(json)?;
        Self::new(records)
    }

    /// Load a JSON catalog file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_json_str(&data)?;
        info!("Loaded {} diseases from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// The bundled reference dataset
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json_str(BUILTIN_CATALOG)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in catalog order
    pub fn records(&self) -> &[Arc<DiseaseRecord>] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<DiseaseRecord>> {
        self.records.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Arc<DiseaseRecord>> {
        self.by_id.get(id).map(|&index| &self.records[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn record(id: &str, name: &str) -> DiseaseRecord {
        DiseaseRecord::new(id, name, InfectionType::Bacterial, Severity::Moderate)
    }

    #[test]
    fn test_lookup_by_id() {
        let catalog = Catalog::new(vec![record("a", "Alpha"), record("b", "Beta")]).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("b").map(|r| r.name.as_str()), Some("Beta"));
        assert!(catalog.get("zzz").is_none());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let err = Catalog::new(vec![record("a", "Alpha"), record("a", "Again")]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(ref id) if id == "a"));
    }

    #[test]
    fn test_empty_id_and_name_rejected() {
        let err = Catalog::new(vec![record("a", "Alpha"), record("  ", "Blank")]).unwrap_err();
        assert!(matches!(err, CatalogError::EmptyId { index: 1 }));

        let err = Catalog::new(vec![record("a", "")]).unwrap_err();
        assert!(matches!(err, CatalogError::EmptyName(_)));
    }

    #[test]
    fn test_empty_catalog_is_allowed() {
        let catalog = Catalog::new(Vec::new()).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_invalid_json_rejected() {
        let err = Catalog::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));

        // Unknown severity is a schema error at load time
        let err = Catalog::from_json_str(
            r#"[{"id":"x","name":"X","type":"viral","severity":"catastrophic"}]"#,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id":"flu","name":"Grippe","type":"viral","severity":"moderate"}}]"#
        )
        .unwrap();

        let catalog = Catalog::from_path(file.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.records()[0].id, "flu");
    }

    #[test]
    fn test_from_missing_path() {
        let err = Catalog::from_path("/nonexistent/diagsearch/catalog.json").unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();
        assert!(catalog.len() >= 5);
        let pneumonia = catalog.get("pneumonia-community-acquired").unwrap();
        assert_eq!(pneumonia.name, "Pneumonie Communautaire");
        assert_eq!(pneumonia.kind, InfectionType::Bacterial);
    }
}
