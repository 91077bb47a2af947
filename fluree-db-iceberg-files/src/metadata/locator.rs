//! Locating the newest table-metadata document.

use crate::config::MetadataLayout;
use crate::error::{IcebergError, Result};
use crate::io::IcebergStorage;

/// Find the newest metadata file under `<location>/<metadata_dir>/`.
///
/// Candidates are the files ending in the layout's suffix; the one with the
/// greatest full path in byte order wins. Version numbers are not parsed, so
/// `v2.metadata.json` sorts after `v10.metadata.json` unless writers
/// zero-pad their versions.
pub fn locate_metadata_file<S: IcebergStorage + ?Sized>(
    storage: &S,
    location: &str,
    layout: &MetadataLayout,
) -> Result<String> {
    let candidates =
        storage.list_files(location, &layout.metadata_dir, &layout.metadata_suffix)?;
    let count = candidates.len();

    let newest = candidates
        .into_iter()
        .max()
        .ok_or_else(|| IcebergError::metadata_not_found(location))?;

    tracing::debug!(location, candidates = count, metadata = %newest, "Located table metadata");
    Ok(newest)
}
