//! Error types for the catalog, configuration and tool surfaces

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Failure to build a catalog. Raised at construction, never at query time.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog record #{index} has an empty id")]
    EmptyId { index: usize },
    #[error("Catalog record '{0}' has an empty name")]
    EmptyName(String),
    #[error("Duplicate disease id: {0}")]
    DuplicateId(String),
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Invalid search configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Fuzzy threshold must be within (0, 1], got {0}")]
    InvalidThreshold(f64),
    #[error("Term match factor must be within (0, 1], got {0}")]
    InvalidTermFactor(f64),
    #[error("Field weight for {field} must be positive, got {weight}")]
    InvalidWeight { field: &'static str, weight: f64 },
    #[error("{0} must be at least 1")]
    ZeroLimit(&'static str),
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors reported by the CLI and MCP tools
#[derive(Debug, Serialize)]
pub enum AppError {
    InvalidInput(String),
    NotFound(String),
    CatalogError(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::CatalogError(msg) => write!(f, "Catalog error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// Get the error code for MCP responses
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "invalid_input",
            AppError::NotFound(_) => "not_found",
            AppError::CatalogError(_) => "catalog_error",
            AppError::Internal(_) => "internal_error",
        }
    }

    /// Get the error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Process exit code for CLI mode
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::InvalidInput(_) => 1,
            AppError::NotFound(_) => 3,
            AppError::CatalogError(_) | AppError::Internal(_) => 5,
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        AppError::CatalogError(err.to_string())
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Validate a free-text argument coming from a tool call
pub fn validate_query(query: &str) -> Result<(), AppError> {
    if query.len() > 500 {
        return Err(AppError::InvalidInput(
            "Query too long, maximum 500 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validate a value that must not be blank (pathogen, organ, id)
pub fn validate_required(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidInput(format!("{} cannot be empty", field)));
    }
    validate_query(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_display() {
        let error = CatalogError::DuplicateId("malaria".to_string());
        assert_eq!(error.to_string(), "Duplicate disease id: malaria");

        let error = CatalogError::EmptyId { index: 3 };
        assert_eq!(error.to_string(), "Catalog record #3 has an empty id");
    }

    #[test]
    fn test_config_error_display() {
        let error = ConfigError::InvalidWeight {
            field: "organ",
            weight: -1.0,
        };
        assert_eq!(
            error.to_string(),
            "Field weight for organ must be positive, got -1"
        );
    }

    #[test]
    fn test_app_error_codes() {
        assert_eq!(AppError::InvalidInput("x".into()).error_code(), "invalid_input");
        assert_eq!(AppError::NotFound("x".into()).error_code(), "not_found");
        assert_eq!(AppError::NotFound("x".into()).exit_code(), 3);
        assert_eq!(
            AppError::NotFound("disease 'x'".into()).message(),
            "Not found: disease 'x'"
        );
    }

    #[test]
    fn test_catalog_error_converts() {
        let app: AppError = CatalogError::DuplicateId("a".into()).into();
        assert_eq!(app.error_code(), "catalog_error");
    }

    #[test]
    fn test_validation() {
        assert!(validate_query("").is_ok());
        assert!(validate_query(&"x".repeat(501)).is_err());
        assert!(validate_required("Pathogen", "  ").is_err());
        assert!(validate_required("Pathogen", "E. coli").is_ok());
    }
}
