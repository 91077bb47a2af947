//! Iceberg data-file resolution.
//!
//! Given a table stored in the Iceberg format, this crate resolves the paths
//! of the data files that make up a snapshot (the current one by default).
//! Data files themselves are never opened.
//!
//! # Architecture
//!
//! - [`io`] - Storage abstraction (list and open files)
//! - [`metadata`] - Metadata file location, parsing and snapshot selection
//! - [`avro`] - Avro container decoding with single-field projection
//! - [`manifest`] - Manifest list and manifest file reading
//! - [`scan`] - The resolution pipeline
//! - [`config`] - Table configuration
//! - [`location`] - Re-anchoring of recorded paths
//!
//! # Example
//!
//! ```no_run
//! use fluree_db_iceberg_files::{resolve_data_files, FileStorage, TableConfig};
//!
//! let storage = FileStorage::new("/var/lib/warehouse");
//! let config = TableConfig::new("db/events");
//! let files = resolve_data_files(&storage, &config)?;
//! for file in &files {
//!     println!("{}", file);
//! }
//! # Ok::<(), fluree_db_iceberg_files::IcebergError>(())
//! ```

pub mod avro;
pub mod config;
pub mod error;
pub mod io;
pub mod location;
pub mod manifest;
pub mod metadata;
pub mod scan;

// Re-export commonly used types
pub use config::{MetadataLayout, TableConfig, METADATA_DIRECTORY, METADATA_FILE_SUFFIX};
pub use error::{IcebergError, Result};
pub use io::{FileStorage, IcebergStorage, MemoryStorage};
pub use manifest::{read_data_files, read_manifest_list};
pub use metadata::{locate_metadata_file, resolve_manifest_list, SnapshotSelection, TableMetadata};
pub use scan::{resolve_data_files, DataFileResolver};
