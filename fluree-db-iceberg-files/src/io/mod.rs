//! IO module for Iceberg file access.
//!
//! This module provides:
//! - [`storage`] - Storage abstraction with in-memory and local filesystem backends

pub mod storage;

pub use storage::{FileStorage, IcebergStorage, MemoryStorage};
