//! Resolution of a snapshot's data files.

pub mod resolver;

pub use resolver::{resolve_data_files, DataFileResolver};
