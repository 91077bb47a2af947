//! Shared fixtures for fluree-db-iceberg-files integration tests.
//!
//! Builds Iceberg tables (metadata JSON, manifest lists, manifests) as plain
//! `(path, bytes)` lists that can be loaded into a `MemoryStorage` or written
//! under a directory for `FileStorage`.

// Not every integration test crate uses every helper.
#![allow(dead_code)]

use apache_avro::types::{Record, Value};
use apache_avro::{Codec, DeflateSettings, Schema, Writer};
use fluree_db_iceberg_files::{location, MemoryStorage};
use serde_json::json;
use std::path::Path;

// =============================================================================
// Avro schemas (format v1 layouts)
// =============================================================================

pub const MANIFEST_LIST_SCHEMA: &str = r#"{
    "type": "record",
    "name": "manifest_file",
    "fields": [
        {"name": "manifest_path", "type": "string", "field-id": 500},
        {"name": "manifest_length", "type": "long", "field-id": 501},
        {"name": "partition_spec_id", "type": "int", "field-id": 502},
        {"name": "added_snapshot_id", "type": ["null", "long"], "default": null, "field-id": 503},
        {"name": "added_data_files_count", "type": ["null", "int"], "default": null, "field-id": 504},
        {"name": "existing_data_files_count", "type": ["null", "int"], "default": null, "field-id": 505},
        {"name": "deleted_data_files_count", "type": ["null", "int"], "default": null, "field-id": 506},
        {"name": "partitions", "type": ["null", {
            "type": "array",
            "items": {
                "type": "record",
                "name": "r508",
                "fields": [
                    {"name": "contains_null", "type": "boolean", "field-id": 509},
                    {"name": "contains_nan", "type": ["null", "boolean"], "default": null, "field-id": 518},
                    {"name": "lower_bound", "type": ["null", "bytes"], "default": null, "field-id": 510},
                    {"name": "upper_bound", "type": ["null", "bytes"], "default": null, "field-id": 511}
                ]
            },
            "element-id": 508
        }], "default": null, "field-id": 507},
        {"name": "added_rows_count", "type": ["null", "long"], "default": null, "field-id": 512}
    ]
}"#;

pub const MANIFEST_SCHEMA: &str = r#"{
    "type": "record",
    "name": "manifest_entry",
    "fields": [
        {"name": "status", "type": "int", "field-id": 0},
        {"name": "snapshot_id", "type": ["null", "long"], "default": null, "field-id": 1},
        {"name": "data_file", "type": {
            "type": "record",
            "name": "r2",
            "fields": [
                {"name": "file_path", "type": "string", "field-id": 100},
                {"name": "file_format", "type": "string", "field-id": 101},
                {"name": "partition", "type": {
                    "type": "record",
                    "name": "r102",
                    "fields": [{"name": "p", "type": ["null", "int"], "default": null, "field-id": 1000}]
                }, "field-id": 102},
                {"name": "record_count", "type": "long", "field-id": 103},
                {"name": "file_size_in_bytes", "type": "long", "field-id": 104},
                {"name": "column_sizes", "type": ["null", {
                    "type": "array",
                    "items": {
                        "type": "record",
                        "name": "k117_v118",
                        "fields": [
                            {"name": "key", "type": "int", "field-id": 117},
                            {"name": "value", "type": "long", "field-id": 118}
                        ]
                    }
                }], "default": null, "field-id": 108},
                {"name": "lower_bounds", "type": ["null", {
                    "type": "array",
                    "items": {
                        "type": "record",
                        "name": "k126_v127",
                        "fields": [
                            {"name": "key", "type": "int", "field-id": 126},
                            {"name": "value", "type": "bytes", "field-id": 127}
                        ]
                    }
                }], "default": null, "field-id": 125},
                {"name": "split_offsets", "type": ["null", {"type": "array", "items": "long"}], "default": null, "field-id": 132},
                {"name": "sort_order_id", "type": ["null", "int"], "default": null, "field-id": 140}
            ]
        }, "field-id": 2}
    ]
}"#;

// =============================================================================
// Avro writers
// =============================================================================

fn some(value: Value) -> Value {
    Value::Union(1, Box::new(value))
}

fn none() -> Value {
    Value::Union(0, Box::new(Value::Null))
}

/// Deflate at the default level.
pub fn deflate() -> Codec {
    Codec::Deflate(DeflateSettings::default())
}

/// Encode a manifest list with one row per path.
pub fn manifest_list_bytes(paths: &[&str], codec: Codec) -> Vec<u8> {
    manifest_list_in_blocks(paths, codec, usize::MAX)
}

/// Encode a manifest list, flushing a new block every `rows_per_block` rows.
pub fn manifest_list_in_blocks(paths: &[&str], codec: Codec, rows_per_block: usize) -> Vec<u8> {
    let schema = Schema::parse_str(MANIFEST_LIST_SCHEMA).unwrap();
    let mut writer = Writer::with_codec(&schema, Vec::new(), codec);
    for (i, path) in paths.iter().enumerate() {
        let mut record = Record::new(writer.schema()).unwrap();
        record.put("manifest_path", *path);
        record.put("manifest_length", 6000i64 + i as i64);
        record.put("partition_spec_id", 0i32);
        record.put("added_snapshot_id", some(Value::Long(7)));
        record.put("added_data_files_count", some(Value::Int(1)));
        record.put("existing_data_files_count", some(Value::Int(0)));
        record.put("deleted_data_files_count", none());
        record.put(
            "partitions",
            some(Value::Array(vec![Value::Record(vec![
                ("contains_null".to_string(), Value::Boolean(false)),
                ("contains_nan".to_string(), none()),
                ("lower_bound".to_string(), some(Value::Bytes(vec![1, 0, 0, 0]))),
                ("upper_bound".to_string(), some(Value::Bytes(vec![2, 0, 0, 0]))),
            ])])),
        );
        record.put("added_rows_count", some(Value::Long(100)));
        writer.append(record).unwrap();
        if (i + 1) % rows_per_block == 0 {
            writer.flush().unwrap();
        }
    }
    writer.into_inner().unwrap()
}

/// Encode a manifest with one entry per data-file path.
pub fn manifest_bytes(paths: &[&str], codec: Codec) -> Vec<u8> {
    let schema = Schema::parse_str(MANIFEST_SCHEMA).unwrap();
    let mut writer = Writer::with_codec(&schema, Vec::new(), codec);
    for (i, path) in paths.iter().enumerate() {
        let data_file = Value::Record(vec![
            ("file_path".to_string(), Value::String(path.to_string())),
            ("file_format".to_string(), Value::String("PARQUET".to_string())),
            (
                "partition".to_string(),
                Value::Record(vec![("p".to_string(), some(Value::Int(i as i32)))]),
            ),
            ("record_count".to_string(), Value::Long(1000)),
            ("file_size_in_bytes".to_string(), Value::Long(65536)),
            (
                "column_sizes".to_string(),
                some(Value::Array(vec![
                    Value::Record(vec![
                        ("key".to_string(), Value::Int(1)),
                        ("value".to_string(), Value::Long(512)),
                    ]),
                    Value::Record(vec![
                        ("key".to_string(), Value::Int(2)),
                        ("value".to_string(), Value::Long(2048)),
                    ]),
                ])),
            ),
            (
                "lower_bounds".to_string(),
                some(Value::Array(vec![Value::Record(vec![
                    ("key".to_string(), Value::Int(1)),
                    ("value".to_string(), Value::Bytes(b"aardvark".to_vec())),
                ])])),
            ),
            (
                "split_offsets".to_string(),
                some(Value::Array(vec![Value::Long(4)])),
            ),
            ("sort_order_id".to_string(), none()),
        ]);

        let mut record = Record::new(writer.schema()).unwrap();
        record.put("status", 1i32);
        record.put("snapshot_id", some(Value::Long(7)));
        record.put("data_file", data_file);
        writer.append(record).unwrap();
    }
    writer.into_inner().unwrap()
}

// =============================================================================
// Metadata JSON
// =============================================================================

/// A snapshot entry for [`metadata_json`].
pub struct SnapshotSpec<'a> {
    pub id: i64,
    pub timestamp_ms: i64,
    pub manifest_list: &'a str,
}

/// Render a format-v1 table-metadata document.
pub fn metadata_json(
    location: &str,
    current_snapshot_id: Option<i64>,
    snapshots: &[SnapshotSpec<'_>],
) -> String {
    let snapshots: Vec<_> = snapshots
        .iter()
        .map(|s| {
            json!({
                "snapshot-id": s.id,
                "timestamp-ms": s.timestamp_ms,
                "summary": {"operation": "append", "total-data-files": "2"},
                "manifest-list": s.manifest_list,
                "schema-id": 0
            })
        })
        .collect();

    json!({
        "format-version": 1,
        "table-uuid": "0f2f4a57-8d2c-4a4f-9b0b-6f1a1d1f5b9e",
        "location": location,
        "last-updated-ms": 1700000000000i64,
        "last-column-id": 2,
        "schema": {
            "type": "struct",
            "schema-id": 0,
            "fields": [
                {"id": 1, "name": "id", "required": false, "type": "long"},
                {"id": 2, "name": "p", "required": false, "type": "int"}
            ]
        },
        "partition-spec": [{"name": "p", "transform": "identity", "source-id": 2, "field-id": 1000}],
        "properties": {"owner": "root"},
        "current-snapshot-id": current_snapshot_id,
        "snapshots": snapshots,
        "snapshot-log": [],
        "metadata-log": []
    })
    .to_string()
}

// =============================================================================
// Table fixtures
// =============================================================================

/// Files of a table, keyed by storage path.
#[derive(Default)]
pub struct TableFixture {
    pub files: Vec<(String, Vec<u8>)>,
}

impl TableFixture {
    pub fn add(&mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) -> &mut Self {
        self.files.push((path.into(), content.into()));
        self
    }

    pub fn into_memory(self) -> MemoryStorage {
        let mut storage = MemoryStorage::new();
        for (path, content) in self.files {
            storage.add_file(path, content);
        }
        storage
    }

    pub fn write_to(&self, dir: &Path) {
        for (path, content) in &self.files {
            let full = dir.join(path);
            std::fs::create_dir_all(full.parent().unwrap()).unwrap();
            std::fs::write(full, content).unwrap();
        }
    }
}

/// Host the table was originally written on; recorded paths point here.
pub const WRITER_HOST: &str = "s3://writer-bucket/warehouse/db/events";

/// A table at `root` whose current snapshot (7) has two manifests with one
/// data file each: `p=1/a.parquet` and `p=2/b.parquet`.
///
/// An older snapshot (5) references `p=0/old.parquet`.
pub fn two_file_table(root: &str) -> TableFixture {
    let meta = |name: &str| location::join(&location::join(root, "metadata"), name);
    let recorded = |dir: &str, name: &str| format!("{}/{}/{}", WRITER_HOST, dir, name);

    let mut table = TableFixture::default();
    table
        .add(
            meta("v1.metadata.json"),
            metadata_json(
                WRITER_HOST,
                Some(7),
                &[
                    SnapshotSpec {
                        id: 5,
                        timestamp_ms: 1_000,
                        manifest_list: &recorded("metadata", "snap-5-1-aaa.avro"),
                    },
                    SnapshotSpec {
                        id: 7,
                        timestamp_ms: 2_000,
                        manifest_list: &recorded("metadata", "snap-7-1-bbb.avro"),
                    },
                ],
            ),
        )
        .add(
            meta("snap-5-1-aaa.avro"),
            manifest_list_bytes(&[&recorded("metadata", "old-m0.avro")], Codec::Null),
        )
        .add(
            meta("old-m0.avro"),
            manifest_bytes(&[&recorded("data/p=0", "old.parquet")], Codec::Null),
        )
        .add(
            meta("snap-7-1-bbb.avro"),
            manifest_list_bytes(
                &[&recorded("metadata", "m0.avro"), &recorded("metadata", "m1.avro")],
                deflate(),
            ),
        )
        .add(
            meta("m0.avro"),
            manifest_bytes(&[&recorded("data/p=1", "a.parquet")], deflate()),
        )
        .add(
            meta("m1.avro"),
            manifest_bytes(&[&recorded("data/p=2", "b.parquet")], Codec::Null),
        );
    table
}
