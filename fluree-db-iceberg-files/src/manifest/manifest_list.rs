//! Manifest list reading.
//!
//! A manifest list is an Avro file with one row per manifest of a snapshot.
//! Only `manifest_path` is read; partition summaries and counts are skipped.

use crate::avro::KindFamily;
use crate::config::TableConfig;
use crate::error::Result;
use crate::io::IcebergStorage;
use crate::location;
use crate::manifest::open_container;

/// Name of the manifest-path column in a manifest list.
pub const MANIFEST_PATH_FIELD: &str = "manifest_path";

/// Read the manifest paths listed in the manifest list at `path`.
///
/// Each path is re-anchored to `<location>/<metadata_dir>/<file name>`.
/// File order is preserved and duplicates are kept.
pub fn read_manifest_list<S: IcebergStorage + ?Sized>(
    storage: &S,
    config: &TableConfig,
    path: &str,
) -> Result<Vec<String>> {
    let container = open_container(storage, path)?;
    let manifest_paths = container
        .project_by_name(MANIFEST_PATH_FIELD, KindFamily::String)?
        .into_strings(path)?;

    let manifests: Vec<String> = manifest_paths
        .iter()
        .map(|p| {
            config
                .layout
                .metadata_path(&config.location, location::file_name(p))
        })
        .collect();

    tracing::debug!(manifest_list = path, manifests = manifests.len(), "Read manifest list");
    Ok(manifests)
}
