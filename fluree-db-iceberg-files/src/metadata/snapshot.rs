//! Snapshot selection and manifest-list resolution.

use serde::{Deserialize, Serialize};

use crate::config::TableConfig;
use crate::error::{IcebergError, Result};
use crate::io::IcebergStorage;
use crate::location;
use crate::metadata::table::{load_table_metadata, Snapshot, TableMetadata};

/// Snapshot selection criteria for time travel queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SnapshotSelection {
    /// Use the current snapshot (default)
    #[default]
    Current,
    /// Use a specific snapshot by ID
    SnapshotId(i64),
    /// Use the snapshot valid at a specific timestamp (epoch ms)
    AsOfTime(i64),
}

/// Select a snapshot from table metadata based on selection criteria.
///
/// `Ok(None)` means the selection names no snapshot and the table has no data
/// files for it: the current snapshot ID is unset or dangling, or the
/// timestamp predates every snapshot. An explicit snapshot ID that does not
/// exist is an error.
pub fn select_snapshot<'a>(
    metadata: &'a TableMetadata,
    selection: &SnapshotSelection,
) -> Result<Option<&'a Snapshot>> {
    match selection {
        SnapshotSelection::Current => Ok(metadata.current_snapshot()),

        SnapshotSelection::SnapshotId(id) => metadata
            .snapshot(*id)
            .map(Some)
            .ok_or(IcebergError::SnapshotNotFound { snapshot_id: *id }),

        SnapshotSelection::AsOfTime(timestamp_ms) => Ok(metadata
            .snapshots
            .iter()
            .filter(|s| s.timestamp_ms.is_some_and(|ts| ts <= *timestamp_ms))
            .max_by_key(|s| s.timestamp_ms)),
    }
}

/// Resolve the manifest list of the selected snapshot.
///
/// Reads the metadata document at `metadata_path` and returns
/// `<location>/<metadata_dir>/<file name of manifest-list>`, or `None` when
/// no snapshot is selected (a table that was never written to).
pub fn resolve_manifest_list<S: IcebergStorage + ?Sized>(
    storage: &S,
    config: &TableConfig,
    metadata_path: &str,
) -> Result<Option<String>> {
    let metadata = load_table_metadata(storage, metadata_path)?;

    let Some(snapshot) = select_snapshot(&metadata, &config.snapshot)? else {
        tracing::debug!(
            metadata_path,
            selection = ?config.snapshot,
            current_snapshot_id = ?metadata.current_snapshot_id,
            "No snapshot selected; table has no data files"
        );
        return Ok(None);
    };

    let manifest_list = snapshot.manifest_list_location().ok_or_else(|| {
        IcebergError::malformed(
            metadata_path,
            format!("Snapshot {} has no manifest-list", snapshot.snapshot_id),
        )
    })?;

    let path = config
        .layout
        .metadata_path(&config.location, location::file_name(manifest_list));

    tracing::debug!(
        snapshot_id = snapshot.snapshot_id,
        operation = ?snapshot.operation(),
        total_data_files = ?snapshot.total_data_files(),
        manifest_list = %path,
        "Selected snapshot"
    );

    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemoryStorage;

    fn snapshot(id: i64, timestamp_ms: i64) -> Snapshot {
        Snapshot {
            snapshot_id: id,
            parent_snapshot_id: None,
            timestamp_ms: Some(timestamp_ms),
            manifest_list: Some(format!("s3://bucket/table/metadata/snap-{}.avro", id)),
            summary: Default::default(),
        }
    }

    fn make_test_metadata() -> TableMetadata {
        TableMetadata {
            format_version: Some(2),
            location: Some("s3://bucket/table".to_string()),
            current_snapshot_id: Some(3),
            snapshots: vec![snapshot(1, 1000), snapshot(2, 2000), snapshot(3, 3000)],
        }
    }

    #[test]
    fn test_select_current_snapshot() {
        let metadata = make_test_metadata();
        let snap = select_snapshot(&metadata, &SnapshotSelection::Current)
            .unwrap()
            .unwrap();
        assert_eq!(snap.snapshot_id, 3);
    }

    #[test]
    fn test_select_snapshot_by_id() {
        let metadata = make_test_metadata();

        let snap1 = select_snapshot(&metadata, &SnapshotSelection::SnapshotId(1))
            .unwrap()
            .unwrap();
        assert_eq!(snap1.snapshot_id, 1);

        // Non-existent snapshot
        let err = select_snapshot(&metadata, &SnapshotSelection::SnapshotId(999)).unwrap_err();
        assert!(matches!(
            err,
            IcebergError::SnapshotNotFound { snapshot_id: 999 }
        ));
    }

    #[test]
    fn test_select_snapshot_as_of_time() {
        let metadata = make_test_metadata();
        let select = |ts| {
            select_snapshot(&metadata, &SnapshotSelection::AsOfTime(ts))
                .unwrap()
                .map(|s| s.snapshot_id)
        };

        // Exact match, between timestamps, after all
        assert_eq!(select(2000), Some(2));
        assert_eq!(select(2500), Some(2));
        assert_eq!(select(5000), Some(3));

        // Before all snapshots - no match
        assert_eq!(select(500), None);
    }

    #[test]
    fn test_dangling_current_snapshot_id() {
        let mut metadata = make_test_metadata();
        metadata.current_snapshot_id = Some(-1);
        assert!(select_snapshot(&metadata, &SnapshotSelection::Current)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_resolve_manifest_list_reanchors_file_name() {
        let mut storage = MemoryStorage::new();
        storage.add_file(
            "wh/t/metadata/v2.metadata.json",
            r#"{
                "current-snapshot-id": 7,
                "snapshots": [
                    {"snapshot-id": 5, "manifest-list": "s3://old-host/t/metadata/snap-5.avro"},
                    {"snapshot-id": 7, "manifest-list": "s3://old-host/t/metadata/snap-7-x.avro"}
                ]
            }"#,
        );

        let config = TableConfig::new("wh/t");
        let path = resolve_manifest_list(&storage, &config, "wh/t/metadata/v2.metadata.json")
            .unwrap()
            .unwrap();
        assert_eq!(path, "wh/t/metadata/snap-7-x.avro");
    }

    #[test]
    fn test_resolve_manifest_list_without_match_is_none() {
        let mut storage = MemoryStorage::new();
        storage.add_file(
            "t/metadata/v1.metadata.json",
            r#"{"current-snapshot-id": 9, "snapshots": [{"snapshot-id": 5, "manifest-list": "a.avro"}]}"#,
        );
        let config = TableConfig::new("t");
        assert!(
            resolve_manifest_list(&storage, &config, "t/metadata/v1.metadata.json")
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_selected_snapshot_without_manifest_list_is_malformed() {
        let mut storage = MemoryStorage::new();
        storage.add_file(
            "t/metadata/v1.metadata.json",
            r#"{"current-snapshot-id": 5, "snapshots": [{"snapshot-id": 5}]}"#,
        );
        let config = TableConfig::new("t");
        let err =
            resolve_manifest_list(&storage, &config, "t/metadata/v1.metadata.json").unwrap_err();
        assert!(matches!(err, IcebergError::MalformedDocument { .. }));
    }
}
