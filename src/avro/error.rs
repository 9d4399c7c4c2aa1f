/// Errors raised while decoding container files or records
#[derive(Debug, thiserror::Error)]
pub enum AvroError {
    /// Input ended before the value being read was complete
    #[error("Unexpected end of input at offset {0}")]
    UnexpectedEof(usize),

    /// The file does not start with `Obj\x01`
    #[error("Invalid container magic: {0:02x?}")]
    InvalidMagic([u8; 4]),

    /// A varint ran past the width of its target type
    #[error("Varint overflow at offset {0}")]
    VarintOverflow(usize),

    /// A decoded length was negative or does not fit in memory
    #[error("Invalid length {length} at offset {offset}")]
    InvalidLength {
        /// The decoded length
        length: i64,
        /// Offset of the length prefix
        offset: usize,
    },

    /// A string field held invalid UTF-8
    #[error("Invalid UTF-8 in string: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// A required header metadata key is absent
    #[error("Missing header metadata: {0}")]
    MissingMetadata(String),

    /// The file declares a codec this reader does not implement
    #[error("Unsupported codec: {0}")]
    UnsupportedCodec(String),

    /// A block did not end with the header's sync marker
    #[error("Sync marker mismatch after block {0}")]
    SyncMismatch(usize),

    /// A union branch index outside the declared branches
    #[error("Invalid union branch {index} for field '{field}'")]
    InvalidUnionBranch {
        /// The decoded branch index
        index: i64,
        /// Field being decoded
        field: &'static str,
    },

    /// A block's record count disagrees with the records it holds
    #[error("Block declares {declared} records but {decoded} were decoded")]
    RecordCountMismatch {
        /// Count from the block header
        declared: i64,
        /// Records actually decoded
        decoded: usize,
    },
}
