//! Avro container decoding with single-field projection.
//!
//! - [`container`] - Container header, blocks and codecs
//! - [`kind`] - Runtime type model built from the embedded schema
//! - [`projection`] - Skip-or-decode projection of one top-level field

pub mod container;
mod decode;
pub mod kind;
pub mod projection;

pub use container::{AvroContainer, Block, Blocks};
pub use kind::{AvroKind, FieldKind, KindFamily, RecordKind};
pub use projection::{Datum, ProjectedColumn};
