//! Error types for Iceberg file resolution.

use thiserror::Error;

use crate::avro::KindFamily;

/// Errors from resolving an Iceberg table's data files.
///
/// Every variant is terminal for the resolution that produced it; nothing in
/// this crate retries.
#[derive(Debug, Error)]
pub enum IcebergError {
    /// No `*.metadata.json` file exists under the table's metadata directory
    #[error("Metadata file for Iceberg table at '{location}' doesn't exist")]
    MetadataNotFound { location: String },

    /// JSON or Avro document is structurally invalid or lacks a required key
    #[error("Malformed document '{path}': {reason}")]
    MalformedDocument { path: String, reason: String },

    /// Decoded Avro field type disagrees with the projected type
    #[error("Type mismatch for field '{field}': expected {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: KindFamily,
        actual: KindFamily,
    },

    /// An explicitly requested snapshot is absent from the table metadata
    #[error("Snapshot not found: {snapshot_id}")]
    SnapshotNotFound { snapshot_id: i64 },

    /// Storage/IO error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl IcebergError {
    pub fn metadata_not_found(location: impl Into<String>) -> Self {
        Self::MetadataNotFound {
            location: location.into(),
        }
    }

    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedDocument {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn type_mismatch(field: impl Into<String>, expected: KindFamily, actual: KindFamily) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            expected,
            actual,
        }
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Result type for Iceberg operations.
pub type Result<T> = std::result::Result<T, IcebergError>;

impl From<std::io::Error> for IcebergError {
    fn from(err: std::io::Error) -> Self {
        IcebergError::Storage(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_mismatch_message_names_both_kinds() {
        let err = IcebergError::type_mismatch("manifest_path", KindFamily::String, KindFamily::Long);
        assert_eq!(
            err.to_string(),
            "Type mismatch for field 'manifest_path': expected string, got long"
        );
    }

    #[test]
    fn test_io_error_maps_to_storage() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: IcebergError = io.into();
        assert!(matches!(err, IcebergError::Storage(msg) if msg.contains("gone")));
    }
}
