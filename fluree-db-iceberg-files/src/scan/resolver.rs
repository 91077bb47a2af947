//! Data-file resolution for a table snapshot.
//!
//! Walks the chain metadata document → manifest list → manifests and returns
//! the data-file paths of the selected snapshot.

use crate::config::TableConfig;
use crate::error::Result;
use crate::io::IcebergStorage;
use crate::manifest::{read_data_files, read_manifest_list};
use crate::metadata::{locate_metadata_file, resolve_manifest_list};

/// Resolves the data files of one table.
///
/// Holds no state between calls; every [`resolve`](Self::resolve) re-reads
/// the metadata chain from storage.
#[derive(Debug)]
pub struct DataFileResolver<'a, S: IcebergStorage + ?Sized> {
    storage: &'a S,
    config: &'a TableConfig,
}

impl<'a, S: IcebergStorage + ?Sized> DataFileResolver<'a, S> {
    /// Create a new resolver.
    pub fn new(storage: &'a S, config: &'a TableConfig) -> Self {
        Self { storage, config }
    }

    /// Resolve the data files of the configured snapshot.
    ///
    /// A table without a selected snapshot resolves to an empty list.
    pub fn resolve(&self) -> Result<Vec<String>> {
        self.config.validate()?;

        let metadata_path =
            locate_metadata_file(self.storage, &self.config.location, &self.config.layout)?;

        let Some(manifest_list) =
            resolve_manifest_list(self.storage, self.config, &metadata_path)?
        else {
            return Ok(Vec::new());
        };

        let manifests = read_manifest_list(self.storage, self.config, &manifest_list)?;
        let files = read_data_files(self.storage, &manifests)?;

        tracing::debug!(
            location = %self.config.location,
            metadata = %metadata_path,
            manifests = manifests.len(),
            data_files = files.len(),
            "Resolved data files"
        );

        Ok(files)
    }
}

/// Resolve the data files of the snapshot selected by `config`.
pub fn resolve_data_files<S: IcebergStorage + ?Sized>(
    storage: &S,
    config: &TableConfig,
) -> Result<Vec<String>> {
    DataFileResolver::new(storage, config).resolve()
}
