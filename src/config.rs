//! Search configuration
//!
//! Tunables live in an optional JSON file. Lookup order: an explicit path,
//! then `<config dir>/diagsearch/config.json`, then built-in defaults. Missing
//! keys fall back to their defaults.

use crate::error::ConfigError;
use crate::search::fuzzy::DEFAULT_THRESHOLD;
use crate::search::ranking::{FieldWeights, SearchField};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Engine tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct SearchConfig {
    /// Result cap when the caller gives none
    pub default_limit: usize,
    /// Suggestion cap when the caller gives none
    pub suggestion_limit: usize,
    /// Shorter queries (in characters, after trimming) list instead of search
    pub min_query_len: usize,
    /// Normalized edit-distance tolerance for fuzzy hits
    pub fuzzy_threshold: f64,
    /// Share of similarity kept for term-by-term matches
    pub term_match_factor: f64,
    pub field_weights: FieldWeights,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: 20,
            suggestion_limit: 5,
            min_query_len: 2,
            fuzzy_threshold: DEFAULT_THRESHOLD,
            term_match_factor: 0.7,
            field_weights: FieldWeights::default(),
        }
    }
}

impl SearchConfig {
    /// Default config file location, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("diagsearch").join("config.json"))
    }

    /// Load from `path`, or the default location, or fall back to defaults.
    ///
    /// An explicit path must exist; the default location is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_path(path)?,
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(path) => Self::from_path(&path)?,
                None => {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: SearchConfig = serde_json::from_str(&content)?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fuzzy_threshold > 0.0 && self.fuzzy_threshold <= 1.0) {
            return Err(ConfigError::InvalidThreshold(self.fuzzy_threshold));
        }
        if !(self.term_match_factor > 0.0 && self.term_match_factor <= 1.0) {
            return Err(ConfigError::InvalidTermFactor(self.term_match_factor));
        }
        if self.min_query_len == 0 {
            return Err(ConfigError::ZeroLimit("minQueryLen"));
        }
        if self.default_limit == 0 {
            return Err(ConfigError::ZeroLimit("defaultLimit"));
        }
        if self.suggestion_limit == 0 {
            return Err(ConfigError::ZeroLimit("suggestionLimit"));
        }
        for field in SearchField::ALL {
            let weight = self.field_weights.get(field);
            if !(weight.is_finite() && weight > 0.0) {
                return Err(ConfigError::InvalidWeight {
                    field: field.as_str(),
                    weight,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_valid() {
        let config = SearchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_limit, 20);
        assert_eq!(config.suggestion_limit, 5);
        assert_eq!(config.min_query_len, 2);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"defaultLimit": 7, "fieldWeights": {{"organ": 2.5}}}}"#).unwrap();

        let config = SearchConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.default_limit, 7);
        assert_eq!(config.suggestion_limit, 5);
        assert_eq!(config.field_weights.organ, 2.5);
        assert_eq!(config.field_weights.name, 3.0);
    }

    #[test]
    fn test_multi_word_weight_keys() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"fieldWeights": {{"commonNames": 9.0, "clinicalSigns": 7.0, "expectedPathogens": 0.5}}}}"#
        )
        .unwrap();

        let config = SearchConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.field_weights.common_names, 9.0);
        assert_eq!(config.field_weights.clinical_signs, 7.0);
        assert_eq!(config.field_weights.expected_pathogens, 0.5);
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"fieldWeights": {{"common_names": 9.0}}}}"#).unwrap();
        assert!(matches!(
            SearchConfig::load(Some(file.path())),
            Err(ConfigError::Parse(_))
        ));

        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"defaultLimt": 3}}"#).unwrap();
        assert!(matches!(
            SearchConfig::load(Some(file.path())),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = SearchConfig::load(Some(&dir.path().join("absent.json")));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            SearchConfig::load(Some(file.path())),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let config = SearchConfig {
            fuzzy_threshold: 0.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidThreshold(_))));

        let config = SearchConfig {
            default_limit: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroLimit("defaultLimit"))));

        let config = SearchConfig {
            term_match_factor: 1.2,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTermFactor(_)));
        assert!(err.to_string().starts_with("Term match factor"));

        let config = SearchConfig {
            min_query_len: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroLimit("minQueryLen"))));

        let mut config = SearchConfig::default();
        config.field_weights.keywords = -1.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidWeight { field: "searchTerms.keywords", .. })
        ));
    }
}
