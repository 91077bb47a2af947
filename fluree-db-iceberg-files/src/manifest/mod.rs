//! Manifest handling for Iceberg tables.
//!
//! Both file kinds are Avro containers read through single-field projection:
//!
//! - **Manifest list**: one row per manifest file of a snapshot
//! - **Manifest file**: one row per data file, with statistics that are skipped

pub mod data_file;
pub mod manifest_list;

pub use data_file::{read_data_files, read_manifest_data_files, DATA_FILE_FIELD};
pub use manifest_list::{read_manifest_list, MANIFEST_PATH_FIELD};

use crate::avro::AvroContainer;
use crate::error::Result;
use crate::io::IcebergStorage;

/// Open the Avro container at `path`.
///
/// The stream is read to the end and dropped before returning.
pub(crate) fn open_container<S: IcebergStorage + ?Sized>(
    storage: &S,
    path: &str,
) -> Result<AvroContainer> {
    let reader = storage.open(path)?;
    AvroContainer::from_reader(path, reader)
}
