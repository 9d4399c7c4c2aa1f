//! Object-container file writer.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use uuid::Uuid;

use super::encoding::{write_bytes, write_string, write_zigzag_long};

/// Leading bytes of every container file
pub const MAGIC: [u8; 4] = *b"Obj\x01";

/// Length of the block sync marker
pub const SYNC_MARKER_LEN: usize = 16;

/// The only codec this writer emits
pub const CODEC_NULL: &str = "null";

/// Header key holding the record schema
pub const SCHEMA_KEY: &str = "avro.schema";

/// Header key holding the block codec
pub const CODEC_KEY: &str = "avro.codec";

/// Writer for a single-block object-container file.
///
/// Records are appended already encoded; the writer only frames them.
///
/// ```rust
/// use lakewriter::avro::{encoding, ContainerWriter};
///
/// let mut writer = ContainerWriter::new(r#"{"type":"record","name":"R","fields":[{"name":"x","type":"long"}]}"#);
/// let mut record = Vec::new();
/// encoding::write_zigzag_long(&mut record, 42);
/// writer.append_record(&record);
/// assert_eq!(writer.record_count(), 1);
/// let bytes = writer.to_bytes();
/// assert_eq!(&bytes[..4], b"Obj\x01");
/// ```
#[derive(Debug, Clone)]
pub struct ContainerWriter {
    schema_json: String,
    sync_marker: [u8; SYNC_MARKER_LEN],
    block: Vec<u8>,
    record_count: usize,
}

impl ContainerWriter {
    /// Create a writer for records of the given schema (JSON text).
    pub fn new(schema_json: impl Into<String>) -> Self {
        Self {
            schema_json: schema_json.into(),
            sync_marker: *Uuid::new_v4().as_bytes(),
            block: Vec::new(),
            record_count: 0,
        }
    }

    /// Append one pre-encoded record to the data block.
    pub fn append_record(&mut self, record: &[u8]) {
        self.block.extend_from_slice(record);
        self.record_count += 1;
    }

    /// Number of records appended so far
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    /// The sync marker written after the header and the data block
    pub fn sync_marker(&self) -> &[u8; SYNC_MARKER_LEN] {
        &self.sync_marker
    }

    /// Render the complete file in memory.
    ///
    /// With no records appended only the header is produced.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.schema_json.len() + self.block.len() + 64);
        self.write_header(&mut out);
        self.write_block(&mut out);
        out
    }

    /// Write the file to `path`, sync it to disk and return its length in bytes.
    pub fn finish<P: AsRef<Path>>(self, path: P) -> std::io::Result<u64> {
        let bytes = self.to_bytes();
        let mut file = File::create(path.as_ref())?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        log::debug!(
            "Wrote container {} ({} records, {} bytes)",
            path.as_ref().display(),
            self.record_count,
            bytes.len()
        );
        Ok(bytes.len() as u64)
    }

    fn write_header(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&MAGIC);

        // map<string, bytes>, one entry per map block, then the empty block
        write_zigzag_long(out, 1);
        write_string(out, SCHEMA_KEY);
        write_bytes(out, self.schema_json.as_bytes());

        write_zigzag_long(out, 1);
        write_string(out, CODEC_KEY);
        write_bytes(out, CODEC_NULL.as_bytes());

        write_zigzag_long(out, 0);

        out.extend_from_slice(&self.sync_marker);
    }

    fn write_block(&self, out: &mut Vec<u8>) {
        // A zero count reads as an end marker, so an empty file has no block
        if self.record_count == 0 {
            return;
        }
        write_zigzag_long(out, self.record_count as i64);
        write_zigzag_long(out, self.block.len() as i64);
        out.extend_from_slice(&self.block);
        out.extend_from_slice(&self.sync_marker);
    }
}
