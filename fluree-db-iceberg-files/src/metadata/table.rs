//! Iceberg table metadata structures.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{IcebergError, Result};
use crate::io::IcebergStorage;

/// Iceberg table metadata.
///
/// Only the keys needed to locate a snapshot's manifest list are modelled;
/// everything else in the JSON document (schemas, partition specs, sort
/// orders, logs) is ignored.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TableMetadata {
    /// Format version (1 or 2)
    #[serde(default)]
    pub format_version: Option<i32>,
    /// Location the table was written at (may name a foreign host)
    #[serde(default)]
    pub location: Option<String>,
    /// Current snapshot ID; absent or null for a table with no commits
    #[serde(default)]
    pub current_snapshot_id: Option<i64>,
    /// All snapshots
    #[serde(default)]
    pub snapshots: Vec<Snapshot>,
}

impl TableMetadata {
    /// Parse metadata from JSON bytes.
    ///
    /// `source` is the storage path of the document, used in errors.
    pub fn from_json(source: &str, json: &[u8]) -> Result<Self> {
        serde_json::from_slice(json).map_err(|e| {
            IcebergError::malformed(source, format!("Failed to parse metadata: {}", e))
        })
    }

    /// Parse metadata from JSON string.
    pub fn from_json_str(source: &str, json: &str) -> Result<Self> {
        Self::from_json(source, json.as_bytes())
    }

    /// Get the current snapshot.
    pub fn current_snapshot(&self) -> Option<&Snapshot> {
        self.current_snapshot_id.and_then(|id| self.snapshot(id))
    }

    /// Get a snapshot by ID.
    pub fn snapshot(&self, id: i64) -> Option<&Snapshot> {
        self.snapshots.iter().find(|s| s.snapshot_id == id)
    }
}

/// Iceberg table snapshot.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Snapshot {
    /// Unique snapshot ID
    pub snapshot_id: i64,
    /// Parent snapshot ID (None for the first snapshot)
    #[serde(default)]
    pub parent_snapshot_id: Option<i64>,
    /// Timestamp when snapshot was created (ms since epoch)
    #[serde(default)]
    pub timestamp_ms: Option<i64>,
    /// Path to manifest list file
    #[serde(default)]
    pub manifest_list: Option<String>,
    /// Summary statistics
    #[serde(default)]
    pub summary: HashMap<String, String>,
}

impl Snapshot {
    /// Get the manifest list location.
    pub fn manifest_list_location(&self) -> Option<&str> {
        self.manifest_list.as_deref()
    }

    /// Get the operation that created this snapshot.
    pub fn operation(&self) -> Option<&str> {
        self.summary.get("operation").map(|s| s.as_str())
    }

    /// Get the total data files count from summary.
    pub fn total_data_files(&self) -> Option<i64> {
        self.summary
            .get("total-data-files")
            .and_then(|s| s.parse().ok())
    }
}

/// Read and parse the metadata document at `path`.
pub fn load_table_metadata<S: IcebergStorage + ?Sized>(
    storage: &S,
    path: &str,
) -> Result<TableMetadata> {
    let bytes = storage.read(path)?;
    let metadata = TableMetadata::from_json(path, &bytes)?;
    tracing::debug!(
        path,
        format_version = ?metadata.format_version,
        current_snapshot_id = ?metadata.current_snapshot_id,
        snapshots = metadata.snapshots.len(),
        "Loaded table metadata"
    );
    Ok(metadata)
}
