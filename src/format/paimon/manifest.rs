//! Paimon manifest and manifest-list records.
//!
//! Both are stored as single-block container files. Fields are encoded in
//! schema order; the `*_SCHEMA` constants are the schemas written into the
//! container headers and must stay in sync with the encoders below.

use crate::avro::encoding::{
    write_bytes, write_string, write_union_null, write_zigzag_int, write_zigzag_long,
};
use crate::avro::{AvroError, Decoder};
use crate::writer::DataFileInfo;

/// An empty zero-column BinaryRow: a 4-byte header and no payload
pub const EMPTY_PARTITION: [u8; 4] = [0x04, 0x00, 0x00, 0x00];

/// `_TOTAL_BUCKETS` value of an unbucketed table
pub const UNBUCKETED: i32 = -1;

/// `fileSource` of files added by an append commit
pub const FILE_SOURCE_APPEND: &str = "APPEND";

/// Record schema of manifest files
pub const MANIFEST_ENTRY_SCHEMA: &str = r#"{
  "type": "record",
  "name": "ManifestEntry",
  "fields": [
    {"name": "_KIND", "type": "int"},
    {"name": "_PARTITION", "type": "bytes"},
    {"name": "_BUCKET", "type": "int"},
    {"name": "_TOTAL_BUCKETS", "type": "int"},
    {
      "name": "_FILE",
      "type": {
        "type": "record",
        "name": "DataFileMetadata",
        "fields": [
          {"name": "fileName", "type": "string"},
          {"name": "fileSize", "type": "long"},
          {"name": "level", "type": "int"},
          {"name": "minKey", "type": ["null", "bytes"]},
          {"name": "maxKey", "type": ["null", "bytes"]},
          {"name": "minColumnStats", "type": ["null", {"type": "array", "items": "bytes"}]},
          {"name": "maxColumnStats", "type": ["null", {"type": "array", "items": "bytes"}]},
          {"name": "nullCounts", "type": ["null", {"type": "array", "items": "long"}]},
          {"name": "rowCount", "type": "long"},
          {"name": "sequenceNumber", "type": "long"},
          {"name": "fileSource", "type": "string"},
          {"name": "schemaId", "type": "long"}
        ]
      }
    }
  ]
}"#;

/// Record schema of manifest-list files
pub const MANIFEST_LIST_ENTRY_SCHEMA: &str = r#"{
  "type": "record",
  "name": "ManifestListEntry",
  "fields": [
    {"name": "_FILE_NAME", "type": "string"},
    {"name": "_FILE_SIZE", "type": "long"},
    {"name": "_NUM_ADDED_FILES", "type": "long"},
    {"name": "_NUM_DELETED_FILES", "type": "long"},
    {
      "name": "_PARTITION_STATS",
      "type": ["null", {
        "type": "array",
        "items": {
          "type": "record",
          "name": "PartitionStats",
          "fields": [
            {"name": "min", "type": ["null", "bytes"]},
            {"name": "max", "type": ["null", "bytes"]}
          ]
        }
      }]
    },
    {"name": "_SCHEMA_ID", "type": "long"}
  ]
}"#;

/// Change a manifest entry records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// The file was added
    Add,
    /// The file was removed
    Delete,
}

impl FileKind {
    fn code(self) -> i32 {
        match self {
            Self::Add => 0,
            Self::Delete => 1,
        }
    }

    fn from_code(code: i32) -> Result<Self, AvroError> {
        match code {
            0 => Ok(Self::Add),
            1 => Ok(Self::Delete),
            other => Err(AvroError::InvalidUnionBranch {
                index: i64::from(other),
                field: "_KIND",
            }),
        }
    }
}

/// The `_FILE` record of a manifest entry.
///
/// Key ranges, column statistics and null counts are not collected; they are
/// always encoded as null.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFileMeta {
    /// Data file name, relative to the bucket directory
    pub file_name: String,
    /// Size in bytes
    pub file_size: i64,
    /// LSM level; always 0 for append-only tables
    pub level: i32,
    /// Rows in the file
    pub row_count: i64,
    /// Sequence number of the file's first row
    pub sequence_number: i64,
    /// How the file was produced
    pub file_source: String,
    /// Schema the file was written with
    pub schema_id: i64,
}

/// One record of a manifest file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Add or delete
    pub kind: FileKind,
    /// Serialized partition row
    pub partition: Vec<u8>,
    /// Bucket the file lives in
    pub bucket: i32,
    /// Bucket count of the table, -1 when unbucketed
    pub total_buckets: i32,
    /// The data file
    pub file: DataFileMeta,
}

impl ManifestEntry {
    /// Entry adding `file` to bucket 0 of an unpartitioned, unbucketed table
    pub fn added(file: &DataFileInfo, schema_id: i64) -> Self {
        Self {
            kind: FileKind::Add,
            partition: EMPTY_PARTITION.to_vec(),
            bucket: 0,
            total_buckets: UNBUCKETED,
            file: DataFileMeta {
                file_name: file.name.clone(),
                file_size: file.size_bytes,
                level: 0,
                row_count: file.row_count,
                sequence_number: 0,
                file_source: FILE_SOURCE_APPEND.to_string(),
                schema_id,
            },
        }
    }

    /// Append the encoded record to `buf`.
    pub fn encode(&self, buf: &mut Vec<u8>) {
        write_zigzag_int(buf, self.kind.code());
        write_bytes(buf, &self.partition);
        write_zigzag_int(buf, self.bucket);
        write_zigzag_int(buf, self.total_buckets);

        // Nested records have no framing of their own
        let file = &self.file;
        write_string(buf, &file.file_name);
        write_zigzag_long(buf, file.file_size);
        write_zigzag_int(buf, file.level);
        write_union_null(buf); // minKey
        write_union_null(buf); // maxKey
        write_union_null(buf); // minColumnStats
        write_union_null(buf); // maxColumnStats
        write_union_null(buf); // nullCounts
        write_zigzag_long(buf, file.row_count);
        write_zigzag_long(buf, file.sequence_number);
        write_string(buf, &file.file_source);
        write_zigzag_long(buf, file.schema_id);
    }

    /// Decode one record.
    pub fn decode(decoder: &mut Decoder<'_>) -> Result<Self, AvroError> {
        let kind = FileKind::from_code(decoder.read_int()?)?;
        let partition = decoder.read_bytes()?.to_vec();
        let bucket = decoder.read_int()?;
        let total_buckets = decoder.read_int()?;

        let file_name = decoder.read_string()?;
        let file_size = decoder.read_long()?;
        let level = decoder.read_int()?;
        decoder.read_null_union("minKey")?;
        decoder.read_null_union("maxKey")?;
        decoder.read_null_union("minColumnStats")?;
        decoder.read_null_union("maxColumnStats")?;
        decoder.read_null_union("nullCounts")?;
        let row_count = decoder.read_long()?;
        let sequence_number = decoder.read_long()?;
        let file_source = decoder.read_string()?;
        let schema_id = decoder.read_long()?;

        Ok(Self {
            kind,
            partition,
            bucket,
            total_buckets,
            file: DataFileMeta {
                file_name,
                file_size,
                level,
                row_count,
                sequence_number,
                file_source,
                schema_id,
            },
        })
    }
}

/// One record of a manifest-list file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestListEntry {
    /// Manifest file name, relative to the manifest directory
    pub file_name: String,
    /// Manifest size in bytes
    pub file_size: i64,
    /// Data files the manifest adds
    pub num_added_files: i64,
    /// Data files the manifest deletes
    pub num_deleted_files: i64,
    /// Schema of the manifest's files
    pub schema_id: i64,
}

impl ManifestListEntry {
    /// Append the encoded record to `buf`. Partition stats are always null.
    pub fn encode(&self, buf: &mut Vec<u8>) {
        write_string(buf, &self.file_name);
        write_zigzag_long(buf, self.file_size);
        write_zigzag_long(buf, self.num_added_files);
        write_zigzag_long(buf, self.num_deleted_files);
        write_union_null(buf);
        write_zigzag_long(buf, self.schema_id);
    }

    /// Decode one record.
    pub fn decode(decoder: &mut Decoder<'_>) -> Result<Self, AvroError> {
        let file_name = decoder.read_string()?;
        let file_size = decoder.read_long()?;
        let num_added_files = decoder.read_long()?;
        let num_deleted_files = decoder.read_long()?;
        decoder.read_null_union("_PARTITION_STATS")?;
        let schema_id = decoder.read_long()?;
        Ok(Self {
            file_name,
            file_size,
            num_added_files,
            num_deleted_files,
            schema_id,
        })
    }
}
