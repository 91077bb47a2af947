//! Manifest file reading.
//!
//! A manifest is an Avro file of entries `(status, snapshot_id, data_file,
//! ...)`. Only `data_file.file_path` is extracted; entry status, partition
//! values and column statistics are skipped without being decoded.

use crate::avro::{AvroContainer, Datum, KindFamily};
use crate::error::{IcebergError, Result};
use crate::io::IcebergStorage;
use crate::location;
use crate::manifest::open_container;

/// Position of the `data_file` record in a manifest entry.
pub const DATA_FILE_FIELD: usize = 2;

/// Read the data files referenced by every manifest in `manifests`.
///
/// Results are concatenated in manifest order. Any failure aborts the whole
/// call.
pub fn read_data_files<S: IcebergStorage + ?Sized>(
    storage: &S,
    manifests: &[String],
) -> Result<Vec<String>> {
    let mut files = Vec::new();
    for manifest in manifests {
        files.extend(read_manifest_data_files(storage, manifest)?);
    }
    tracing::debug!(manifests = manifests.len(), data_files = files.len(), "Read manifests");
    Ok(files)
}

/// Read the data files referenced by the manifest at `path`.
///
/// Each `file_path` is re-anchored to `<parent directory name>/<file name>`.
pub fn read_manifest_data_files<S: IcebergStorage + ?Sized>(
    storage: &S,
    path: &str,
) -> Result<Vec<String>> {
    let container = open_container(storage, path)?;
    check_file_path_kind(&container)?;

    let column = container.project(DATA_FILE_FIELD, KindFamily::Record)?;
    let files = column
        .values
        .iter()
        .enumerate()
        .map(|(row, value)| {
            first_string(value)
                .map(location::parent_and_file_name)
                .ok_or_else(|| {
                    IcebergError::malformed(
                        path,
                        format!("Row {} has no data_file.file_path: {:?}", row, value),
                    )
                })
        })
        .collect::<Result<Vec<_>>>()?;

    tracing::trace!(manifest = path, data_files = files.len(), "Read manifest");
    Ok(files)
}

/// The `data_file` column must be a record whose first field is a string.
fn check_file_path_kind(container: &AvroContainer) -> Result<()> {
    let entry = container.record();
    let data_file = entry.field(DATA_FILE_FIELD).ok_or_else(|| {
        IcebergError::malformed(
            container.path(),
            format!(
                "Manifest entry '{}' has {} fields, expected a data_file at position {}",
                entry.name,
                entry.fields.len(),
                DATA_FILE_FIELD
            ),
        )
    })?;

    let kind = data_file.kind.non_null();
    let record = kind.as_record().ok_or_else(|| {
        IcebergError::type_mismatch(&data_file.name, KindFamily::Record, kind.family())
    })?;

    let file_path = record.field(0).ok_or_else(|| {
        IcebergError::malformed(
            container.path(),
            format!("Record '{}' has no fields", record.name),
        )
    })?;

    let actual = file_path.kind.non_null().family();
    if actual != KindFamily::String {
        return Err(IcebergError::type_mismatch(
            format!("{}.{}", data_file.name, file_path.name),
            KindFamily::String,
            actual,
        ));
    }
    Ok(())
}

fn first_string(value: &Datum) -> Option<&str> {
    value.as_record()?.first()?.as_str()
}
