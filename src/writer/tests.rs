use super::*;
use crate::format::{FormatKind, PaimonFormat};

use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::basic::Compression;
use parquet::schema::types::ColumnPath;
use tempfile::tempdir;

fn int_schema(names: &[&str]) -> SchemaRef {
    Arc::new(Schema::new(
        names
            .iter()
            .map(|n| Field::new(*n, DataType::Int64, false))
            .collect::<Vec<_>>(),
    ))
}

fn int_batch(names: &[&str], rows: i64) -> RecordBatch {
    let columns = names
        .iter()
        .enumerate()
        .map(|(i, _)| {
            Arc::new(Int64Array::from_iter_values((0..rows).map(|r| r * 10 + i as i64)))
                as arrow::array::ArrayRef
        })
        .collect();
    RecordBatch::try_new(int_schema(names), columns).unwrap()
}

/// Fails every write until `fail_writes` reaches zero
struct FlakyFileWriter {
    inner: ParquetFileWriter,
    fail_writes: usize,
}

impl DataFileWriter for FlakyFileWriter {
    fn extension(&self) -> &'static str {
        "parquet"
    }

    fn write_file(
        &mut self,
        path: &Path,
        schema: SchemaRef,
        batches: &[RecordBatch],
    ) -> Result<u64, TableError> {
        if self.fail_writes > 0 {
            self.fail_writes -= 1;
            return Err(TableError::IoError(std::io::Error::other("disk full")));
        }
        self.inner.write_file(path, schema, batches)
    }
}

#[test]
fn test_accumulator_threshold() {
    let mut acc = BatchAccumulator::new(1000);
    acc.lock_schema(int_schema(&["a"]));

    assert!(!acc.push(int_batch(&["a"], 600)));
    assert!(!acc.push(int_batch(&["a"], 0)));
    assert_eq!(acc.batches().len(), 1);
    assert!(acc.push(int_batch(&["a"], 400)));
    assert_eq!(acc.buffered_rows(), 1000);

    acc.clear();
    assert!(acc.is_empty());
    assert!(!acc.is_due());
}

#[test]
fn test_accumulator_zero_threshold_flushes_every_batch() {
    let mut acc = BatchAccumulator::new(0);
    assert!(acc.push(int_batch(&["a"], 1)));
}

#[test]
fn test_accumulator_check() {
    let mut acc = BatchAccumulator::new(10);
    assert!(acc.check(&int_batch(&["a", "b"], 1)).is_ok());

    acc.lock_schema(int_schema(&["a", "b"]));
    assert!(acc.check(&int_batch(&["a", "b"], 1)).is_ok());
    match acc.check(&int_batch(&["b", "a"], 1)) {
        Err(TableError::SchemaMismatch { expected, found }) => {
            assert_eq!(expected, vec!["a", "b"]);
            assert_eq!(found, vec!["b", "a"]);
        }
        other => panic!("expected SchemaMismatch, got {other:?}"),
    }
}

#[test]
fn test_config_presets() {
    let config = WriterConfig::default();
    assert_eq!(config.flush_threshold_rows, DEFAULT_FLUSH_THRESHOLD_ROWS);
    assert_eq!(config.compression, CompressionType::Snappy);

    let props = WriterConfig::max_compression().to_writer_properties();
    assert!(matches!(
        props.compression(&ColumnPath::from("x")),
        Compression::ZSTD(_)
    ));

    let props = WriterConfig::fast_write().to_writer_properties();
    assert_eq!(
        props.compression(&ColumnPath::from("x")),
        Compression::UNCOMPRESSED
    );

    assert_eq!(
        WriterConfig::default()
            .with_flush_threshold(5)
            .flush_threshold_rows,
        5
    );
}

#[test]
fn test_parquet_file_writer_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.parquet");
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("name", DataType::Utf8, true),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(vec![1, 2, 3])),
            Arc::new(StringArray::from(vec![Some("x"), None, Some("z")])),
        ],
    )
    .unwrap();

    let mut writer = ParquetFileWriter::new(WriterConfig::default());
    let size = writer
        .write_file(&path, schema, &[batch.clone(), batch])
        .unwrap();
    assert_eq!(size, fs::metadata(&path).unwrap().len());

    let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(&path).unwrap())
        .unwrap()
        .build()
        .unwrap();
    let rows: usize = reader.map(|b| b.unwrap().num_rows()).sum();
    assert_eq!(rows, 6);
}

#[test]
fn test_state_transitions() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("t");
    let mut writer = TableWriter::new(&root, FormatKind::Paimon, WriterConfig::default());
    assert_eq!(writer.state(), WriterState::Uninitialized);

    // Empty batches neither lock the schema nor create the table
    writer.write_batch(&int_batch(&["a"], 0)).unwrap();
    assert_eq!(writer.state(), WriterState::Uninitialized);
    assert!(!root.exists());

    writer.write_batch(&int_batch(&["a"], 5)).unwrap();
    assert_eq!(writer.state(), WriterState::Accumulating);
    assert_eq!(writer.schema().unwrap().field_names(), vec!["a"]);
    assert!(root.join("bucket-0").is_dir());

    let stats = writer.close().unwrap();
    assert_eq!(writer.state(), WriterState::Closed);
    assert_eq!(stats.rows_written, 5);
    assert_eq!(stats.commit.as_ref().unwrap().snapshot_id, 1);
}

#[test]
fn test_write_after_close_fails() {
    let dir = tempdir().unwrap();
    let mut writer = TableWriter::new(dir.path(), FormatKind::Paimon, WriterConfig::default());
    writer.write_batch(&int_batch(&["a"], 3)).unwrap();
    writer.close().unwrap();

    assert!(matches!(
        writer.write_batch(&int_batch(&["a"], 3)),
        Err(TableError::Closed)
    ));

    // Closing a writer that never saw data also rejects later writes
    let mut empty = TableWriter::new(dir.path().join("e"), FormatKind::Iceberg, WriterConfig::default());
    empty.close().unwrap();
    assert!(matches!(
        empty.write_batch(&int_batch(&["a"], 3)),
        Err(TableError::Closed)
    ));
}

#[test]
fn test_close_is_idempotent() {
    let dir = tempdir().unwrap();
    let mut writer = TableWriter::new(dir.path(), FormatKind::Paimon, WriterConfig::default());
    writer.write_batch(&int_batch(&["a"], 7)).unwrap();

    let first = writer.close().unwrap();
    let second = writer.close().unwrap();
    assert_eq!(first, second);
    let snapshots: Vec<_> = fs::read_dir(dir.path().join("snapshot"))
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with("snapshot-"))
        .collect();
    assert_eq!(snapshots.len(), 1);
}

#[test]
fn test_flush_threshold_splits_files() {
    let dir = tempdir().unwrap();
    let config = WriterConfig::default().with_flush_threshold(100);
    let mut writer = TableWriter::new(dir.path(), FormatKind::Paimon, config);

    for _ in 0..5 {
        writer.write_batch(&int_batch(&["a", "b"], 60)).unwrap();
    }
    // 60, 120 -> flush, 60, 120 -> flush, 60 buffered
    assert_eq!(writer.data_files().len(), 2);

    let stats = writer.close().unwrap();
    let rows: Vec<i64> = stats.data_files.iter().map(|f| f.row_count).collect();
    assert_eq!(rows, vec![120, 120, 60]);
    assert_eq!(stats.commit.unwrap().total_record_count, 300);
    for file in &stats.data_files {
        assert!(dir.path().join("bucket-0").join(&file.name).is_file());
    }
}

#[test]
fn test_failed_flush_keeps_batches_and_retries() {
    let dir = tempdir().unwrap();
    let config = WriterConfig::default();
    let file_writer = Box::new(FlakyFileWriter {
        inner: ParquetFileWriter::new(config.clone()),
        fail_writes: 1,
    });
    let mut writer = TableWriter::with_parts(
        Box::new(PaimonFormat::new(dir.path())),
        file_writer,
        config,
    );
    writer.write_batch(&int_batch(&["a"], 10)).unwrap();

    assert!(matches!(writer.close(), Err(TableError::IoError(_))));
    assert_eq!(writer.state(), WriterState::Accumulating);
    assert!(!dir.path().join("snapshot/LATEST").exists());

    let stats = writer.close().unwrap();
    assert_eq!(stats.data_files.len(), 1);
    assert_eq!(stats.data_files[0].row_count, 10);
    assert!(dir.path().join("snapshot/LATEST").exists());
}

#[test]
fn test_drop_commits_open_writer() {
    let dir = tempdir().unwrap();
    {
        let mut writer = TableWriter::new(dir.path(), FormatKind::Paimon, WriterConfig::default());
        writer.write_batch(&int_batch(&["a"], 4)).unwrap();
    }
    assert_eq!(
        fs::read_to_string(dir.path().join("snapshot/LATEST")).unwrap(),
        "1"
    );
}

#[test]
fn test_stats_display() {
    let stats = WriterStats {
        batches_written: 2,
        rows_written: 1500,
        data_files: vec![DataFileInfo {
            name: "f".to_string(),
            size_bytes: 4096,
            row_count: 1500,
        }],
        commit: None,
    };
    assert_eq!(
        stats.to_string(),
        "Wrote 1500 rows from 2 batches in 1 data file(s), 4096 bytes; nothing committed"
    );
}
