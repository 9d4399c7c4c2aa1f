//! Integration tests for lakewriter
//!
//! These tests drive a `TableWriter` end to end and read the resulting table
//! back through the crate's own decoders and the Parquet reader.

use lakewriter::avro::ContainerFile;
use lakewriter::format::paimon::{self, MANIFEST_ENTRY_SCHEMA, MANIFEST_LIST_ENTRY_SCHEMA};
use lakewriter::format::{iceberg, FormatKind};
use lakewriter::writer::{TableError, TableWriter, WriterConfig};

use arrow::array::{ArrayRef, Float64Array, Int32Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use proptest::prelude::*;
use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;

fn three_long_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("a", DataType::Int64, false),
        Field::new("b", DataType::Int64, false),
        Field::new("c", DataType::Int64, false),
    ]))
}

fn three_long_batch(start: i64, rows: i64) -> RecordBatch {
    let range = start..start + rows;
    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from_iter_values(range.clone())),
        Arc::new(Int64Array::from_iter_values(range.clone().map(|v| v * 2))),
        Arc::new(Int64Array::from_iter_values(range.map(|v| -v))),
    ];
    RecordBatch::try_new(three_long_schema(), columns).unwrap()
}

fn parquet_row_count(path: &Path) -> usize {
    ParquetRecordBatchReaderBuilder::try_new(File::open(path).unwrap())
        .unwrap()
        .build()
        .unwrap()
        .map(|b| b.unwrap().num_rows())
        .sum()
}

fn dir_entries(path: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(path)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Two batches of 1,000 and 500 rows end up in one data file and one snapshot
#[test]
fn test_paimon_two_batch_commit() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("lineitem");

    let mut writer = TableWriter::new(&root, FormatKind::Paimon, WriterConfig::default());
    writer.write_batch(&three_long_batch(0, 1000)).unwrap();
    writer.write_batch(&three_long_batch(1000, 500)).unwrap();
    let stats = writer.close().unwrap();

    // Data
    assert_eq!(stats.rows_written, 1500);
    assert_eq!(stats.data_files.len(), 1);
    let data_file = &stats.data_files[0];
    assert_eq!(data_file.row_count, 1500);
    let data_path = root.join("bucket-0").join(&data_file.name);
    assert_eq!(parquet_row_count(&data_path), 1500);
    assert_eq!(
        data_file.size_bytes as u64,
        fs::metadata(&data_path).unwrap().len()
    );

    // Manifest
    let commit = stats.commit.clone().unwrap();
    let manifest = ContainerFile::open(root.join("manifest").join(&commit.manifest)).unwrap();
    assert_eq!(manifest.schema_json, MANIFEST_ENTRY_SCHEMA);
    assert_eq!(manifest.codec, "null");
    assert_eq!(manifest.blocks.len(), 1);
    let entries = paimon::read_manifest(&root, &commit.manifest).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].file.row_count, 1500);
    assert_eq!(entries[0].file.file_name, data_file.name);
    assert_eq!(entries[0].file.file_size, data_file.size_bytes);
    assert_eq!(entries[0].partition, paimon::EMPTY_PARTITION);
    assert_eq!(entries[0].total_buckets, -1);

    // Manifest list
    let list_file =
        ContainerFile::open(root.join("manifest").join(&commit.manifest_list)).unwrap();
    assert_eq!(list_file.schema_json, MANIFEST_LIST_ENTRY_SCHEMA);
    let list = paimon::read_manifest_list(&root, &commit.manifest_list).unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].num_added_files, 1);
    assert_eq!(list[0].num_deleted_files, 0);
    assert_eq!(list[0].file_name, commit.manifest);
    assert_eq!(
        list[0].file_size as u64,
        fs::metadata(root.join("manifest").join(&commit.manifest))
            .unwrap()
            .len()
    );

    // Snapshot and hints
    let snapshot = paimon::read_latest_snapshot(&root).unwrap().unwrap();
    assert_eq!(snapshot.id, 1);
    assert_eq!(snapshot.total_record_count, 1500);
    assert_eq!(snapshot.delta_record_count, 1500);
    assert_eq!(snapshot.base_manifest_list, None);
    assert_eq!(snapshot.delta_manifest_list, commit.manifest_list);
    assert_eq!(snapshot.commit_kind, paimon::CommitKind::Append);
    assert_eq!(fs::read_to_string(root.join("snapshot/EARLIEST")).unwrap(), "1");
    assert_eq!(fs::read_to_string(root.join("snapshot/LATEST")).unwrap(), "1");
    assert_eq!(
        dir_entries(&root.join("snapshot")),
        vec!["EARLIEST", "LATEST", "snapshot-1"]
    );

    // Schema artifacts
    assert_eq!(
        fs::read_to_string(root.join("OPTIONS")).unwrap(),
        "table.type=APPEND_ONLY\ndata-files.format=parquet\nbucket=-1\n"
    );
    let schema: serde_json::Value =
        serde_json::from_slice(&fs::read(root.join("schema/schema-0")).unwrap()).unwrap();
    assert_eq!(schema["fields"].as_array().unwrap().len(), 3);
    assert_eq!(schema["fields"][2]["type"], "bigint NOT NULL");
}

#[test]
fn test_schema_mismatch_keeps_flushed_files() {
    let dir = tempdir().unwrap();
    let config = WriterConfig::default().with_flush_threshold(100);
    let mut writer = TableWriter::new(dir.path(), FormatKind::Paimon, config);

    writer.write_batch(&three_long_batch(0, 100)).unwrap();
    assert_eq!(writer.data_files().len(), 1);
    let flushed = dir.path().join("bucket-0").join(&writer.data_files()[0].name);
    let flushed_bytes = fs::read(&flushed).unwrap();

    let other = Arc::new(Schema::new(vec![
        Field::new("a", DataType::Int64, false),
        Field::new("x", DataType::Int64, false),
        Field::new("c", DataType::Int64, false),
    ]));
    let bad = RecordBatch::try_new(
        other,
        vec![
            Arc::new(Int64Array::from(vec![1])),
            Arc::new(Int64Array::from(vec![2])),
            Arc::new(Int64Array::from(vec![3])),
        ],
    )
    .unwrap();
    match writer.write_batch(&bad) {
        Err(TableError::SchemaMismatch { expected, found }) => {
            assert_eq!(expected, vec!["a", "b", "c"]);
            assert_eq!(found, vec!["a", "x", "c"]);
        }
        other => panic!("expected SchemaMismatch, got {other:?}"),
    }
    assert_eq!(fs::read(&flushed).unwrap(), flushed_bytes);

    // The writer stays usable and commits only accepted rows
    writer.write_batch(&three_long_batch(100, 10)).unwrap();
    let stats = writer.close().unwrap();
    assert_eq!(stats.commit.unwrap().total_record_count, 110);
}

#[test]
fn test_type_drift_is_rejected_before_buffering() {
    let dir = tempdir().unwrap();
    let mut writer = TableWriter::new(dir.path(), FormatKind::Paimon, WriterConfig::default());
    writer.write_batch(&three_long_batch(0, 20)).unwrap();

    let drifted = Arc::new(Schema::new(vec![
        Field::new("a", DataType::Int32, false),
        Field::new("b", DataType::Int64, false),
        Field::new("c", DataType::Int64, false),
    ]));
    let bad = RecordBatch::try_new(
        drifted,
        vec![
            Arc::new(Int32Array::from(vec![1])),
            Arc::new(Int64Array::from(vec![2])),
            Arc::new(Int64Array::from(vec![3])),
        ],
    )
    .unwrap();
    match writer.write_batch(&bad) {
        Err(TableError::FieldTypeMismatch { column, .. }) => assert_eq!(column, "a"),
        other => panic!("expected FieldTypeMismatch, got {other:?}"),
    }
    assert_eq!(writer.rows_written(), 20);

    let stats = writer.close().unwrap();
    assert_eq!(stats.batches_written, 1);
    assert_eq!(stats.commit.unwrap().total_record_count, 20);
    assert_eq!(
        fs::read_to_string(dir.path().join("snapshot/LATEST")).unwrap(),
        "1"
    );
}

#[test]
fn test_empty_batch_skips_schema_check() {
    let dir = tempdir().unwrap();
    let mut writer = TableWriter::new(dir.path(), FormatKind::Paimon, WriterConfig::default());
    writer.write_batch(&three_long_batch(0, 5)).unwrap();

    let other = Arc::new(Schema::new(vec![Field::new("z", DataType::Utf8, true)]));
    let empty = RecordBatch::new_empty(other);
    writer.write_batch(&empty).unwrap();

    let stats = writer.close().unwrap();
    assert_eq!(stats.batches_written, 1);
    assert_eq!(stats.commit.unwrap().total_record_count, 5);
}

#[test]
fn test_zero_batches_commit_nothing() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("empty");
    let mut writer = TableWriter::new(&root, FormatKind::Paimon, WriterConfig::default());
    let stats = writer.close().unwrap();

    assert!(stats.commit.is_none());
    assert!(stats.data_files.is_empty());
    assert!(!root.exists());
}

#[test]
fn test_only_empty_batches_commit_nothing() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("empty");
    let mut writer = TableWriter::new(&root, FormatKind::Iceberg, WriterConfig::default());
    writer.write_batch(&three_long_batch(0, 0)).unwrap();
    let stats = writer.close().unwrap();

    assert_eq!(stats.batches_written, 0);
    assert!(stats.commit.is_none());
    assert!(!root.exists());
}

#[test]
fn test_existing_table_is_rejected() {
    let dir = tempdir().unwrap();
    let mut first = TableWriter::new(dir.path(), FormatKind::Paimon, WriterConfig::default());
    first.write_batch(&three_long_batch(0, 5)).unwrap();
    first.close().unwrap();

    let mut second = TableWriter::new(dir.path(), FormatKind::Paimon, WriterConfig::default());
    assert!(matches!(
        second.write_batch(&three_long_batch(0, 5)),
        Err(TableError::AlreadyCommitted(_))
    ));
    // Nothing was written, so closing commits nothing
    assert!(second.close().unwrap().commit.is_none());
    assert_eq!(paimon::read_latest_snapshot(dir.path()).unwrap().unwrap().id, 1);
}

#[test]
fn test_unsupported_type_is_rejected() {
    let dir = tempdir().unwrap();
    let schema = Arc::new(Schema::new(vec![Field::new("blob", DataType::Binary, true)]));
    let batch = RecordBatch::try_new(
        schema,
        vec![Arc::new(arrow::array::BinaryArray::from(vec![b"x".as_ref()]))],
    )
    .unwrap();

    let mut writer = TableWriter::new(dir.path().join("t"), FormatKind::Paimon, WriterConfig::default());
    assert!(matches!(
        writer.write_batch(&batch),
        Err(TableError::UnsupportedType { .. })
    ));
    assert!(!dir.path().join("t").exists());
}

#[test]
fn test_flush_threshold_data_files() {
    let dir = tempdir().unwrap();
    let config = WriterConfig::fast_write().with_flush_threshold(250);
    let mut writer = TableWriter::new(dir.path(), FormatKind::Paimon, config);
    for i in 0..4 {
        writer.write_batch(&three_long_batch(i * 200, 200)).unwrap();
    }
    let stats = writer.close().unwrap();

    assert_eq!(stats.data_files.len(), 2);
    let commit = stats.commit.unwrap();
    let entries = paimon::read_manifest(dir.path(), &commit.manifest).unwrap();
    let rows: Vec<i64> = entries.iter().map(|e| e.file.row_count).collect();
    assert_eq!(rows, vec![400, 400]);
    assert_eq!(commit.total_record_count, 800);
    let list = paimon::read_manifest_list(dir.path(), &commit.manifest_list).unwrap();
    assert_eq!(list[0].num_added_files, 2);
}

#[test]
fn test_iceberg_commit() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("orders");
    let schema = Arc::new(Schema::new(vec![
        Field::new("o_orderkey", DataType::Int64, false),
        Field::new("o_custkey", DataType::Int32, false),
        Field::new("o_totalprice", DataType::Float64, true),
        Field::new("o_comment", DataType::Utf8, true),
    ]));
    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int64Array::from(vec![1, 2, 3])),
            Arc::new(Int32Array::from(vec![10, 20, 30])),
            Arc::new(Float64Array::from(vec![Some(1.5), None, Some(3.0)])),
            Arc::new(StringArray::from(vec!["a", "b", "c"])),
        ],
    )
    .unwrap();

    let mut writer = TableWriter::new(&root, FormatKind::Iceberg, WriterConfig::default());
    writer.write_batch(&batch).unwrap();
    writer.write_batch(&batch).unwrap();
    let stats = writer.close().unwrap();
    assert_eq!(stats.data_files[0].name, "data_00000.parquet");
    assert_eq!(parquet_row_count(&root.join("data/data_00000.parquet")), 6);

    let metadata = iceberg::read_current_metadata(&root).unwrap().unwrap();
    assert_eq!(metadata.format_version, 1);
    assert_eq!(metadata.current_snapshot_id, 1);
    assert_eq!(metadata.last_column_id, 3);
    let types: Vec<&str> = metadata
        .schema
        .fields
        .iter()
        .map(|f| f.field_type.as_str())
        .collect();
    assert_eq!(types, vec!["long", "int", "double", "string"]);

    let snapshot = &metadata.snapshots[0];
    assert_eq!(snapshot.manifest_list, "metadata/snap-1.manifest-list.json");
    assert_eq!(snapshot.summary["operation"], "append");
    assert_eq!(snapshot.summary["total-records"], "6");

    let list: iceberg::ManifestList = iceberg::read_json(&root, &snapshot.manifest_list).unwrap();
    assert_eq!(list.manifests.len(), 1);
    assert_eq!(list.manifests[0].added_files_count, 1);
    let manifest: iceberg::Manifest =
        iceberg::read_json(&root, &list.manifests[0].manifest_path).unwrap();
    assert_eq!(manifest.files.len(), 1);
    assert_eq!(manifest.files[0].data_file.record_count, 6);
    assert_eq!(manifest.files[0].data_file.file_format, "PARQUET");
    assert_eq!(
        fs::read_to_string(root.join("metadata/version-hint.text")).unwrap(),
        "1\n"
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_total_record_count_is_sum_of_accepted_rows(
        sizes in prop::collection::vec(0i64..60, 0..8),
        threshold in 1usize..120,
    ) {
        let dir = tempdir().unwrap();
        let config = WriterConfig::fast_write().with_flush_threshold(threshold);
        let mut writer = TableWriter::new(dir.path().join("t"), FormatKind::Paimon, config);
        let mut start = 0;
        for rows in &sizes {
            writer.write_batch(&three_long_batch(start, *rows)).unwrap();
            start += rows;
        }
        let stats = writer.close().unwrap();

        let total: i64 = sizes.iter().sum();
        prop_assert_eq!(stats.rows_written, total);
        prop_assert_eq!(stats.batches_written, sizes.iter().filter(|r| **r > 0).count());
        prop_assert_eq!(stats.data_files.iter().map(|f| f.row_count).sum::<i64>(), total);
        match stats.commit {
            None => {
                prop_assert_eq!(total, 0);
            }
            Some(commit) => {
                prop_assert_eq!(commit.snapshot_id, 1);
                prop_assert_eq!(commit.total_record_count, total);
                let root = dir.path().join("t");
                let snapshot = paimon::read_latest_snapshot(&root).unwrap().unwrap();
                prop_assert_eq!(snapshot.total_record_count, total);
                let entries = paimon::read_manifest(&root, &commit.manifest).unwrap();
                prop_assert_eq!(entries.len(), stats.data_files.len());
            }
        }
    }
}
