//! Avro object container files.
//!
//! A container is a header (magic, metadata map, sync marker) followed by
//! blocks of rows. Each block carries its row count and byte size, is
//! optionally compressed with the codec named in the header, and ends with
//! the header's sync marker.

use std::collections::HashMap;
use std::io::Read;

use apache_avro::{Codec, DeflateSettings, Schema};
use bytes::Bytes;

use crate::avro::decode::BinaryCursor;
use crate::avro::kind::{AvroKind, RecordKind};
use crate::error::{IcebergError, Result};

const AVRO_MAGIC: &[u8; 4] = b"Obj\x01";
const SYNC_SIZE: usize = 16;
const SCHEMA_KEY: &str = "avro.schema";
const CODEC_KEY: &str = "avro.codec";

/// A fully buffered Avro container file with its decoded header.
#[derive(Debug)]
pub struct AvroContainer {
    path: String,
    record: RecordKind,
    codec: Codec,
    sync: [u8; SYNC_SIZE],
    data: Bytes,
    body_offset: usize,
}

/// One block of rows, decompressed.
#[derive(Debug, Clone)]
pub struct Block {
    pub row_count: usize,
    pub data: Bytes,
}

impl AvroContainer {
    /// Read a container from a byte stream.
    ///
    /// The stream is consumed to the end and dropped before this returns.
    pub fn from_reader(path: impl Into<String>, mut reader: impl Read) -> Result<Self> {
        let path = path.into();
        let mut buf = Vec::new();
        reader
            .read_to_end(&mut buf)
            .map_err(|e| IcebergError::storage(format!("Failed to read {}: {}", path, e)))?;
        Self::from_bytes(path, Bytes::from(buf))
    }

    /// Parse the container header from in-memory bytes.
    pub fn from_bytes(path: impl Into<String>, data: Bytes) -> Result<Self> {
        let path = path.into();
        let (metadata, sync, body_offset) = {
            let mut cursor = BinaryCursor::new(&data, &path);
            if cursor.take(AVRO_MAGIC.len()).ok() != Some(&AVRO_MAGIC[..]) {
                return Err(IcebergError::malformed(&path, "Not an Avro container file"));
            }
            let metadata = read_metadata(&mut cursor)?;
            let mut sync = [0u8; SYNC_SIZE];
            sync.copy_from_slice(cursor.take(SYNC_SIZE)?);
            (metadata, sync, cursor.position())
        };

        let schema_json = metadata
            .get(SCHEMA_KEY)
            .ok_or_else(|| IcebergError::malformed(&path, "Missing avro.schema in header"))?;
        let schema_json = std::str::from_utf8(schema_json)
            .map_err(|e| IcebergError::malformed(&path, format!("Schema is not UTF-8: {}", e)))?;
        let schema = Schema::parse_str(schema_json)
            .map_err(|e| IcebergError::malformed(&path, format!("Invalid Avro schema: {}", e)))?;

        let record = match AvroKind::from_schema(&schema, &path)? {
            AvroKind::Record(record) => record,
            other => {
                return Err(IcebergError::malformed(
                    &path,
                    format!("Top-level Avro schema must be a record, got {}", other.family()),
                ))
            }
        };

        let codec_name = match metadata.get(CODEC_KEY) {
            Some(raw) => std::str::from_utf8(raw).map_err(|e| {
                IcebergError::malformed(&path, format!("Codec name is not UTF-8: {}", e))
            })?,
            None => "null",
        };
        let codec = codec_from_name(codec_name).ok_or_else(|| {
            IcebergError::malformed(&path, format!("Unsupported Avro codec '{}'", codec_name))
        })?;

        tracing::trace!(
            path = %path,
            codec = codec_name,
            fields = record.fields.len(),
            "Opened Avro container"
        );

        Ok(Self {
            path,
            record,
            codec,
            sync,
            data,
            body_offset,
        })
    }

    /// Path the container was read from.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The top-level record type of every row.
    pub fn record(&self) -> &RecordKind {
        &self.record
    }

    /// Iterate the data blocks in file order.
    pub fn blocks(&self) -> Blocks<'_> {
        Blocks {
            container: self,
            offset: self.body_offset,
            done: false,
        }
    }
}

/// Iterator over the blocks of an [`AvroContainer`].
///
/// Stops after the first error.
#[derive(Debug)]
pub struct Blocks<'a> {
    container: &'a AvroContainer,
    offset: usize,
    done: bool,
}

impl Blocks<'_> {
    fn read_block(&mut self) -> Result<Block> {
        let container = self.container;
        let body = &container.data[self.offset..];
        let mut cursor = BinaryCursor::new(body, &container.path);

        let row_count = cursor.read_len()?;
        let size = cursor.read_len()?;
        let start = self.offset + cursor.position();
        cursor.skip(size)?;
        let marker = cursor.take(SYNC_SIZE)?;
        if marker != container.sync {
            return Err(IcebergError::malformed(
                &container.path,
                format!("Sync marker mismatch after block at offset {}", self.offset),
            ));
        }
        self.offset += cursor.position();

        let raw = container.data.slice(start..start + size);
        let data = match container.codec {
            Codec::Null => raw,
            codec => {
                let mut buf = raw.to_vec();
                codec.decompress(&mut buf).map_err(|e| {
                    IcebergError::malformed(
                        &container.path,
                        format!("Failed to decompress block: {}", e),
                    )
                })?;
                Bytes::from(buf)
            }
        };

        Ok(Block { row_count, data })
    }
}

impl Iterator for Blocks<'_> {
    type Item = Result<Block>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.offset >= self.container.data.len() {
            return None;
        }
        let block = self.read_block();
        if block.is_err() {
            self.done = true;
        }
        Some(block)
    }
}

/// Header metadata: a map of string keys to byte values.
fn read_metadata(cursor: &mut BinaryCursor<'_>) -> Result<HashMap<String, Vec<u8>>> {
    let mut metadata = HashMap::new();
    loop {
        let (count, _) = cursor.read_block_header()?;
        if count == 0 {
            break;
        }
        for _ in 0..count {
            let key = cursor.read_string()?;
            let value = cursor.read_bytes()?.to_vec();
            metadata.insert(key, value);
        }
    }
    Ok(metadata)
}

fn codec_from_name(name: &str) -> Option<Codec> {
    match name {
        "null" => Some(Codec::Null),
        "deflate" => Some(Codec::Deflate(DeflateSettings::default())),
        "snappy" => Some(Codec::Snappy),
        _ => None,
    }
}
