//! Object-container file reader.

use std::collections::HashMap;
use std::path::Path;

use super::container::{CODEC_KEY, CODEC_NULL, MAGIC, SCHEMA_KEY, SYNC_MARKER_LEN};
use super::decode::Decoder;
use super::error::AvroError;

/// One data block of a container file
#[derive(Debug, Clone)]
pub struct DataBlock {
    /// Number of records declared by the block header
    pub record_count: i64,
    /// Concatenated encoded records
    pub data: Vec<u8>,
}

/// A parsed container file with `null`-codec blocks
#[derive(Debug, Clone)]
pub struct ContainerFile {
    /// Record schema from the header (JSON text)
    pub schema_json: String,
    /// Block codec from the header
    pub codec: String,
    /// Header metadata, including the schema and codec entries
    pub metadata: HashMap<String, Vec<u8>>,
    /// Sync marker from the header
    pub sync_marker: [u8; SYNC_MARKER_LEN],
    /// Data blocks in file order
    pub blocks: Vec<DataBlock>,
}

impl ContainerFile {
    /// Read and parse a container file from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, crate::writer::TableError> {
        let bytes = std::fs::read(path)?;
        Ok(Self::parse(&bytes)?)
    }

    /// Parse a container file held in memory.
    pub fn parse(bytes: &[u8]) -> Result<Self, AvroError> {
        let mut decoder = Decoder::new(bytes);

        let magic: [u8; 4] = decoder
            .take(4)?
            .try_into()
            .map_err(|_| AvroError::UnexpectedEof(0))?;
        if magic != MAGIC {
            return Err(AvroError::InvalidMagic(magic));
        }

        let metadata = read_metadata_map(&mut decoder)?;

        let mut sync_marker = [0u8; SYNC_MARKER_LEN];
        sync_marker.copy_from_slice(decoder.take(SYNC_MARKER_LEN)?);

        let schema_json = metadata
            .get(SCHEMA_KEY)
            .map(|v| String::from_utf8(v.clone()))
            .transpose()?
            .ok_or_else(|| AvroError::MissingMetadata(SCHEMA_KEY.to_string()))?;

        // An absent codec means "null"
        let codec = metadata
            .get(CODEC_KEY)
            .map(|v| String::from_utf8(v.clone()))
            .transpose()?
            .unwrap_or_else(|| CODEC_NULL.to_string());
        if codec != CODEC_NULL {
            return Err(AvroError::UnsupportedCodec(codec));
        }

        let mut blocks = Vec::new();
        while !decoder.is_empty() {
            let record_count = decoder.read_long()?;
            let offset = decoder.position();
            let length = decoder.read_long()?;
            let len = usize::try_from(length)
                .map_err(|_| AvroError::InvalidLength { length, offset })?;
            let data = decoder.take(len)?.to_vec();
            if decoder.take(SYNC_MARKER_LEN)? != sync_marker {
                return Err(AvroError::SyncMismatch(blocks.len()));
            }
            blocks.push(DataBlock { record_count, data });
        }

        Ok(Self {
            schema_json,
            codec,
            metadata,
            sync_marker,
            blocks,
        })
    }

    /// Total records declared across all blocks
    pub fn record_count(&self) -> i64 {
        self.blocks.iter().map(|b| b.record_count).sum()
    }

    /// Decode every record with `decode_record`, checking per-block counts.
    pub fn decode_records<T, F>(&self, mut decode_record: F) -> Result<Vec<T>, AvroError>
    where
        F: FnMut(&mut Decoder<'_>) -> Result<T, AvroError>,
    {
        let mut records = Vec::new();
        for block in &self.blocks {
            let mut decoder = Decoder::new(&block.data);
            let before = records.len();
            while !decoder.is_empty() {
                records.push(decode_record(&mut decoder)?);
            }
            let decoded = records.len() - before;
            if decoded as i64 != block.record_count {
                return Err(AvroError::RecordCountMismatch {
                    declared: block.record_count,
                    decoded,
                });
            }
        }
        Ok(records)
    }
}

fn read_metadata_map(decoder: &mut Decoder<'_>) -> Result<HashMap<String, Vec<u8>>, AvroError> {
    let mut map = HashMap::new();
    loop {
        let offset = decoder.position();
        let mut count = decoder.read_long()?;
        if count == 0 {
            break;
        }
        // Negative counts are followed by the block's byte size
        if count < 0 {
            count = count
                .checked_neg()
                .ok_or(AvroError::InvalidLength { length: count, offset })?;
            decoder.read_long()?;
        }
        for _ in 0..count {
            let key = decoder.read_string()?;
            let value = decoder.read_bytes()?.to_vec();
            map.insert(key, value);
        }
    }
    Ok(map)
}
