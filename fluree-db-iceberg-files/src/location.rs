//! Path helpers for re-anchoring file references.
//!
//! Iceberg metadata records absolute locations from whichever host wrote the
//! table (`s3://bucket/wh/t/metadata/snap-1.avro`, `/iceberg_data/t/...`).
//! Resolution keeps only the trailing components of those paths and joins
//! them onto the table's own location in the storage namespace. Paths are
//! always `/`-separated.

/// Join two storage path segments with a single `/`.
///
/// An empty `base` yields `name` unchanged.
pub fn join(base: &str, name: &str) -> String {
    let base = base.trim_end_matches('/');
    let name = name.trim_start_matches('/');
    if base.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", base, name)
    }
}

/// Last component of a path (`a/b/c.avro` -> `c.avro`).
pub fn file_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rsplit_once('/') {
        Some((_, name)) => name,
        None => trimmed,
    }
}

/// Immediate parent directory name joined with the file name.
///
/// `s3://b/t/data/p=1/a.parquet` -> `p=1/a.parquet`. A path without a
/// parent yields just the file name.
pub fn parent_and_file_name(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rsplit_once('/') {
        Some((parent, name)) => join(file_name(parent), name),
        None => trimmed.to_string(),
    }
}
