//! Table metadata: locating the newest document, parsing it, and choosing a
//! snapshot.

pub mod locator;
pub mod snapshot;
pub mod table;

pub use locator::locate_metadata_file;
pub use snapshot::{resolve_manifest_list, select_snapshot, SnapshotSelection};
pub use table::{load_table_metadata, Snapshot, TableMetadata};
