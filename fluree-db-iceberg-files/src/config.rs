//! Table configuration for data-file resolution.
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "location": "warehouse/db/events",
//!   "metadata-dir": "metadata",
//!   "metadata-suffix": ".metadata.json",
//!   "snapshot": "current"
//! }
//! ```
//!
//! Only `location` is required. `snapshot` also accepts
//! `{"snapshot-id": 42}` and `{"as-of-time": 1700000000000}`.

use serde::{Deserialize, Serialize};

use crate::error::{IcebergError, Result};
use crate::location;
use crate::metadata::SnapshotSelection;

/// Directory under the table root holding metadata, manifest lists and manifests.
pub const METADATA_DIRECTORY: &str = "metadata";

/// Suffix of versioned table-metadata files (`v<N>.metadata.json`).
pub const METADATA_FILE_SUFFIX: &str = ".metadata.json";

/// Where table metadata lives relative to the table root.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct MetadataLayout {
    /// Metadata directory name
    #[serde(default = "default_metadata_dir")]
    pub metadata_dir: String,
    /// Metadata file suffix
    #[serde(default = "default_metadata_suffix")]
    pub metadata_suffix: String,
}

fn default_metadata_dir() -> String {
    METADATA_DIRECTORY.to_string()
}

fn default_metadata_suffix() -> String {
    METADATA_FILE_SUFFIX.to_string()
}

impl Default for MetadataLayout {
    fn default() -> Self {
        Self {
            metadata_dir: default_metadata_dir(),
            metadata_suffix: default_metadata_suffix(),
        }
    }
}

impl MetadataLayout {
    /// `<location>/<metadata_dir>/<file_name>`
    pub fn metadata_path(&self, table_location: &str, file_name: &str) -> String {
        location::join(&location::join(table_location, &self.metadata_dir), file_name)
    }
}

/// Configuration for resolving one table's data files.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TableConfig {
    /// Table root key in the storage namespace
    pub location: String,
    /// Metadata directory and file naming
    #[serde(flatten)]
    pub layout: MetadataLayout,
    /// Which snapshot to resolve
    #[serde(default)]
    pub snapshot: SnapshotSelection,
}

impl TableConfig {
    /// Create a config for the current snapshot with the standard layout.
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            layout: MetadataLayout::default(),
            snapshot: SnapshotSelection::default(),
        }
    }

    /// Parse a config from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| IcebergError::config(format!("Invalid table config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Set the snapshot selection.
    pub fn with_snapshot(mut self, snapshot: SnapshotSelection) -> Self {
        self.snapshot = snapshot;
        self
    }

    /// Set the metadata directory name.
    pub fn with_metadata_dir(mut self, dir: impl Into<String>) -> Self {
        self.layout.metadata_dir = dir.into();
        self
    }

    /// Set the metadata file suffix.
    pub fn with_metadata_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.layout.metadata_suffix = suffix.into();
        self
    }

    /// Check the config is usable.
    ///
    /// The location may be empty (table at the storage root); the metadata
    /// directory and suffix may not.
    pub fn validate(&self) -> Result<()> {
        let dir = self.layout.metadata_dir.trim_matches('/');
        if dir.is_empty() {
            return Err(IcebergError::config("metadata-dir must not be empty"));
        }
        if self.layout.metadata_suffix.is_empty() {
            return Err(IcebergError::config("metadata-suffix must not be empty"));
        }
        Ok(())
    }
}
