//! Storage abstraction for reading Iceberg files.
//!
//! This module provides the `IcebergStorage` trait, the only way the rest of
//! the crate touches files, plus two implementations:
//!
//! - [`MemoryStorage`] - an in-memory path → bytes map (tests, embedding)
//! - [`FileStorage`] - a local directory used as the storage namespace
//!
//! # Design
//!
//! - **Blocking**: resolution is a short synchronous walk, so the trait hands
//!   out `std::io::Read` streams rather than futures
//! - **Storage paths**: every path is a `/`-separated key in the backend's
//!   namespace, e.g. `warehouse/db/t/metadata/v3.metadata.json`
//! - **No retries**: backends that talk to remote stores own their retry policy

use bytes::{Buf, Bytes};
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::io::{BufReader, Read};
use std::path::{Component, Path, PathBuf};

use crate::error::{IcebergError, Result};
use crate::location;

/// Storage trait for reading Iceberg files.
///
/// Implementations must be `Send + Sync` so independent resolutions can run
/// on separate threads against the same backend.
pub trait IcebergStorage: Debug + Send + Sync {
    /// List files under `<root>/<subdirectory>/` whose names end with `suffix`.
    ///
    /// Only direct children are listed. Returns full storage paths; a missing
    /// directory yields an empty list.
    fn list_files(&self, root: &str, subdirectory: &str, suffix: &str) -> Result<Vec<String>>;

    /// Open a readable byte stream for a storage path.
    fn open(&self, path: &str) -> Result<Box<dyn Read + Send + '_>>;

    /// Read an entire file.
    fn read(&self, path: &str) -> Result<Bytes> {
        let mut buf = Vec::new();
        self.open(path)?
            .read_to_end(&mut buf)
            .map_err(|e| IcebergError::storage(format!("Failed to read {}: {}", path, e)))?;
        Ok(Bytes::from(buf))
    }
}

/// In-memory storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    files: BTreeMap<String, Bytes>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file to the storage.
    pub fn add_file(&mut self, path: impl Into<String>, content: impl Into<Bytes>) {
        self.files.insert(path.into(), content.into());
    }

    /// Remove a file, returning its content.
    pub fn remove_file(&mut self, path: &str) -> Option<Bytes> {
        self.files.remove(path)
    }

    /// Number of stored files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl IcebergStorage for MemoryStorage {
    fn list_files(&self, root: &str, subdirectory: &str, suffix: &str) -> Result<Vec<String>> {
        let prefix = format!("{}/", location::join(root, subdirectory));
        Ok(self
            .files
            .range(prefix.clone()..)
            .map(|(path, _)| path)
            .take_while(|path| path.starts_with(&prefix))
            .filter(|path| !path[prefix.len()..].contains('/') && path.ends_with(suffix))
            .cloned()
            .collect())
    }

    fn open(&self, path: &str) -> Result<Box<dyn Read + Send + '_>> {
        let content = self
            .files
            .get(path)
            .ok_or_else(|| IcebergError::storage(format!("File not found: {}", path)))?;
        Ok(Box::new(content.clone().reader()))
    }
}

/// Local filesystem storage rooted at a base directory.
///
/// Storage paths are resolved relative to the base; absolute paths and `..`
/// components are rejected.
#[derive(Debug, Clone)]
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a new file storage with the given base path.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Get the base path for this storage.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn resolve_relative_path(&self, path: &str) -> Result<PathBuf> {
        let p = Path::new(path);

        // Disallow absolute paths and path traversal.
        if p.is_absolute()
            || p.components().any(|c| {
                matches!(
                    c,
                    Component::ParentDir | Component::RootDir | Component::Prefix(_)
                )
            })
        {
            return Err(IcebergError::storage(format!(
                "Invalid storage path '{}': must be a relative path without '..'",
                path
            )));
        }

        Ok(self.base_path.join(p))
    }
}

impl IcebergStorage for FileStorage {
    fn list_files(&self, root: &str, subdirectory: &str, suffix: &str) -> Result<Vec<String>> {
        let dir_key = location::join(root, subdirectory);
        let dir = self.resolve_relative_path(&dir_key)?;

        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(IcebergError::storage(format!(
                    "Failed to list {}: {}",
                    dir.display(),
                    e
                )))
            }
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                IcebergError::storage(format!("Failed to read entry in {}: {}", dir.display(), e))
            })?;
            let file_type = entry.file_type().map_err(|e| {
                IcebergError::storage(format!(
                    "Failed to get file type for {}: {}",
                    entry.path().display(),
                    e
                ))
            })?;
            if !file_type.is_file() {
                continue;
            }
            // Names that are not UTF-8 cannot be addressed by a storage key
            let Ok(name) = entry.file_name().into_string() else {
                tracing::trace!(path = %entry.path().display(), "Skipping non UTF-8 file name");
                continue;
            };
            if name.ends_with(suffix) {
                files.push(location::join(&dir_key, &name));
            }
        }
        files.sort();
        Ok(files)
    }

    fn open(&self, path: &str) -> Result<Box<dyn Read + Send + '_>> {
        let full_path = self.resolve_relative_path(path)?;
        let file = std::fs::File::open(&full_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                IcebergError::storage(format!("File not found: {}", full_path.display()))
            } else {
                IcebergError::storage(format!("Failed to open {}: {}", full_path.display(), e))
            }
        })?;
        Ok(Box::new(BufReader::new(file)))
    }
}
