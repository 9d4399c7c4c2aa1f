use std::fs::File;
use std::path::Path;

use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use super::config::WriterConfig;
use super::error::TableError;

/// One physical data file of a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFileInfo {
    /// File name, relative to the format's data directory
    pub name: String,
    /// Size on disk in bytes
    pub size_bytes: i64,
    /// Rows in the file
    pub row_count: i64,
}

/// Turns a set of buffered batches into one data file.
pub trait DataFileWriter: Send {
    /// File extension of the files this writer produces, without the dot
    fn extension(&self) -> &'static str;

    /// Write `batches` to `path` as a single file and return its byte size.
    ///
    /// All batches share `schema`. The file must be complete and closed when
    /// this returns.
    fn write_file(
        &mut self,
        path: &Path,
        schema: SchemaRef,
        batches: &[RecordBatch],
    ) -> Result<u64, TableError>;
}

/// Parquet data file writer
pub struct ParquetFileWriter {
    config: WriterConfig,
}

impl ParquetFileWriter {
    /// Create a writer using the Parquet settings of `config`
    pub fn new(config: WriterConfig) -> Self {
        Self { config }
    }
}

impl DataFileWriter for ParquetFileWriter {
    fn extension(&self) -> &'static str {
        "parquet"
    }

    fn write_file(
        &mut self,
        path: &Path,
        schema: SchemaRef,
        batches: &[RecordBatch],
    ) -> Result<u64, TableError> {
        let file = File::create(path)?;
        let props = self.config.to_writer_properties();
        let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
        for batch in batches {
            writer.write(batch)?;
        }
        let file = writer.into_inner()?;
        file.sync_all()?;
        Ok(file.metadata()?.len())
    }
}
