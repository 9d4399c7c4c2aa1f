use std::fmt;
use std::path::Path;

use arrow::record_batch::RecordBatch;

use crate::commit::SnapshotCommitter;
use crate::format::{FormatKind, TableFormat};
use crate::schema::TableSchema;

use super::accumulator::BatchAccumulator;
use super::config::WriterConfig;
use super::data_file::{DataFileInfo, DataFileWriter, ParquetFileWriter};
use super::error::TableError;
use super::stats::{CommitInfo, WriterStats};

/// Lifecycle of a [`TableWriter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    /// No batch accepted yet; nothing exists on disk
    Uninitialized,
    /// Table layout created, batches being buffered and flushed
    Accumulating,
    /// Snapshot published, final statistics not yet handed out
    Committed,
    /// Terminal; further writes fail
    Closed,
}

impl fmt::Display for WriterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::Accumulating => "accumulating",
            Self::Committed => "committed",
            Self::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Append-only writer for one table.
///
/// The table is created on the first non-empty batch, whose schema is locked
/// for the lifetime of the writer. Batches are buffered until the configured
/// flush threshold and then written as one data file. [`TableWriter::close`]
/// flushes the remainder and commits every data file as a single snapshot.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use arrow::array::Int64Array;
/// use arrow::datatypes::{DataType, Field, Schema};
/// use arrow::record_batch::RecordBatch;
/// use lakewriter::format::FormatKind;
/// use lakewriter::writer::{TableWriter, WriterConfig};
///
/// let schema = Arc::new(Schema::new(vec![Field::new("id", DataType::Int64, false)]));
/// let batch = RecordBatch::try_new(schema, vec![Arc::new(Int64Array::from(vec![1, 2, 3]))])?;
///
/// let mut writer = TableWriter::new("/tmp/events", FormatKind::Paimon, WriterConfig::default());
/// writer.write_batch(&batch)?;
/// let stats = writer.close()?;
/// println!("{stats}");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct TableWriter {
    format: Box<dyn TableFormat>,
    file_writer: Box<dyn DataFileWriter>,
    accumulator: BatchAccumulator,
    schema: Option<TableSchema>,
    data_files: Vec<DataFileInfo>,
    committer: SnapshotCommitter,
    last_commit: Option<CommitInfo>,
    state: WriterState,
    batches_written: usize,
    rows_written: i64,
    final_stats: Option<WriterStats>,
}

impl TableWriter {
    /// Writer for a table at `path` in the given format, writing Parquet data files.
    ///
    /// Nothing is created on disk until the first non-empty batch.
    pub fn new<P: AsRef<Path>>(path: P, kind: FormatKind, config: WriterConfig) -> Self {
        let format = kind.create(path.as_ref());
        let file_writer = Box::new(ParquetFileWriter::new(config.clone()));
        Self::with_parts(format, file_writer, config)
    }

    /// Writer from explicit format and data file writer implementations
    pub fn with_parts(
        format: Box<dyn TableFormat>,
        file_writer: Box<dyn DataFileWriter>,
        config: WriterConfig,
    ) -> Self {
        Self {
            format,
            file_writer,
            accumulator: BatchAccumulator::new(config.flush_threshold_rows),
            schema: None,
            data_files: Vec::new(),
            committer: SnapshotCommitter::new(),
            last_commit: None,
            state: WriterState::Uninitialized,
            batches_written: 0,
            rows_written: 0,
            final_stats: None,
        }
    }

    /// Table root directory
    pub fn path(&self) -> &Path {
        self.format.root()
    }

    /// Current lifecycle state
    pub fn state(&self) -> WriterState {
        self.state
    }

    /// The locked schema, once the table exists
    pub fn schema(&self) -> Option<&TableSchema> {
        self.schema.as_ref()
    }

    /// Data files written so far
    pub fn data_files(&self) -> &[DataFileInfo] {
        &self.data_files
    }

    /// Rows accepted so far, flushed or buffered
    pub fn rows_written(&self) -> i64 {
        self.rows_written
    }

    /// Append a batch.
    ///
    /// Zero-row batches are ignored without any schema check. The first
    /// non-empty batch creates the table; later batches must carry the same
    /// columns in the same order with the same types. A rejected batch is
    /// not buffered, so earlier rows can still be committed.
    pub fn write_batch(&mut self, batch: &RecordBatch) -> Result<(), TableError> {
        match self.state {
            WriterState::Committed | WriterState::Closed => return Err(TableError::Closed),
            _ if batch.num_rows() == 0 => return Ok(()),
            WriterState::Uninitialized => self.initialize(batch)?,
            WriterState::Accumulating => self.accumulator.check(batch)?,
        }

        self.batches_written += 1;
        self.rows_written += batch.num_rows() as i64;
        if self.accumulator.push(batch.clone()) {
            self.flush()?;
        }
        Ok(())
    }

    /// Write buffered batches out as a data file now.
    ///
    /// Does nothing when nothing is buffered.
    pub fn flush(&mut self) -> Result<(), TableError> {
        if self.accumulator.is_empty() {
            return Ok(());
        }
        let Some(schema) = self.accumulator.schema().cloned() else {
            return Ok(());
        };

        let seq = self.data_files.len() as u32;
        let name = self
            .format
            .data_file_name(seq, self.file_writer.extension());
        let path = self.format.root().join(self.format.data_dir()).join(&name);
        let size = self
            .file_writer
            .write_file(&path, schema, self.accumulator.batches())?;

        let info = DataFileInfo {
            name,
            size_bytes: size as i64,
            row_count: self.accumulator.buffered_rows() as i64,
        };
        log::debug!(
            "Flushed {} rows to {} ({} bytes)",
            info.row_count,
            path.display(),
            info.size_bytes
        );
        self.data_files.push(info);
        self.accumulator.clear();
        Ok(())
    }

    /// Flush, commit and close the writer.
    ///
    /// Closing an already closed writer returns the same statistics again.
    /// When no rows were written nothing is committed. If the commit fails
    /// the error is returned and the writer stays open, so `close` may be
    /// called again.
    pub fn close(&mut self) -> Result<WriterStats, TableError> {
        match self.state {
            WriterState::Closed | WriterState::Committed => {
                if let Some(stats) = &self.final_stats {
                    return Ok(stats.clone());
                }
            }
            WriterState::Uninitialized => {}
            WriterState::Accumulating => self.commit()?,
        }

        let stats = WriterStats {
            batches_written: self.batches_written,
            rows_written: self.rows_written,
            data_files: self.data_files.clone(),
            commit: self.last_commit.clone(),
        };
        self.final_stats = Some(stats.clone());
        self.state = WriterState::Closed;
        log::debug!("Closed table writer for {}", self.path().display());
        Ok(stats)
    }

    fn initialize(&mut self, batch: &RecordBatch) -> Result<(), TableError> {
        let schema = TableSchema::from_arrow(&batch.schema())?;
        self.format.initialize(&schema)?;
        self.accumulator.lock_schema(batch.schema());
        self.schema = Some(schema);
        self.state = WriterState::Accumulating;
        log::info!(
            "Created {} table at {}",
            self.format.kind(),
            self.path().display()
        );
        Ok(())
    }

    fn commit(&mut self) -> Result<(), TableError> {
        self.flush()?;
        if let Some(schema) = &self.schema {
            if !self.data_files.is_empty() {
                let info = self
                    .committer
                    .commit(self.format.as_mut(), schema, &self.data_files)?;
                self.last_commit = Some(info);
            }
        }
        self.state = WriterState::Committed;
        Ok(())
    }
}

impl fmt::Debug for TableWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableWriter")
            .field("path", &self.path())
            .field("format", &self.format.kind())
            .field("state", &self.state)
            .field("data_files", &self.data_files.len())
            .field("rows_written", &self.rows_written)
            .finish()
    }
}

impl Drop for TableWriter {
    fn drop(&mut self) {
        if self.state == WriterState::Accumulating {
            log::warn!(
                "TableWriter for {} dropped without close(); committing now",
                self.path().display()
            );
            // Errors cannot be returned from Drop
            if let Err(e) = self.close() {
                log::error!("Failed to commit {}: {}", self.path().display(), e);
            }
        }
    }
}
