//! Error types for hr-lake
//!
//! This module defines the error hierarchy for the whole pipeline.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for hr-lake
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid argument '{name}': {message}")]
    InvalidArgument { name: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Registry Errors
    // ============================================================================
    #[error("Entity '{entity}' is not configured in the schema registry")]
    UnknownEntity { entity: String },

    // ============================================================================
    // Storage Errors
    // ============================================================================
    #[error("Failed to read '{path}': {message}")]
    StorageRead { path: String, message: String },

    #[error("Failed to write '{path}': {message}")]
    StorageWrite { path: String, message: String },

    #[error("Object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    // ============================================================================
    // Data Processing Errors
    // ============================================================================
    #[error("Failed to flatten JSON column '{column}': {message}")]
    Flatten { column: String, message: String },

    #[error("Failed to coerce column '{column}': {message}")]
    Coercion { column: String, message: String },

    #[error("Batch shape error: {message}")]
    Shape { message: String },

    #[error("CSV parsing error: {message}")]
    CsvParse { message: String },

    #[error("Literal parsing error at offset {offset}: {message}")]
    LiteralParse { offset: usize, message: String },

    // ============================================================================
    // Arrow/Parquet Errors
    // ============================================================================
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create an unknown entity error
    pub fn unknown_entity(entity: impl Into<String>) -> Self {
        Self::UnknownEntity {
            entity: entity.into(),
        }
    }

    /// Create a storage read error
    pub fn storage_read(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StorageRead {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a storage write error
    pub fn storage_write(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StorageWrite {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a flatten error
    pub fn flatten(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Flatten {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a coercion error
    pub fn coercion(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Coercion {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a batch shape error
    pub fn shape(message: impl Into<String>) -> Self {
        Self::Shape {
            message: message.into(),
        }
    }

    /// Check if this error comes from the storage transport layer
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            Error::StorageRead { .. } | Error::StorageWrite { .. } | Error::ObjectStore(_)
        )
    }
}

/// Result type alias for hr-lake
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::unknown_entity("payroll");
        assert_eq!(
            err.to_string(),
            "Entity 'payroll' is not configured in the schema registry"
        );

        let err = Error::flatten("custom_data", "not an object");
        assert_eq!(
            err.to_string(),
            "Failed to flatten JSON column 'custom_data': not an object"
        );
    }

    #[test]
    fn test_is_storage() {
        assert!(Error::storage_read("s3://b/k", "timeout").is_storage());
        assert!(Error::storage_write("s3://b/k", "denied").is_storage());

        assert!(!Error::unknown_entity("x").is_storage());
        assert!(!Error::config("x").is_storage());
    }
}
