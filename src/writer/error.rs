use std::path::PathBuf;

/// Errors that can occur while writing or committing a table
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// The table directory or its schema artifacts could not be created
    #[error("Failed to initialize table at {path}: {source}")]
    Initialization {
        /// Path that could not be created or written
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// The target directory already holds a committed table
    #[error("Table already committed at {0}")]
    AlreadyCommitted(PathBuf),

    /// A batch's column names differ from the locked schema
    #[error("Schema mismatch: expected columns {expected:?}, found {found:?}")]
    SchemaMismatch {
        /// Column names of the locked schema
        expected: Vec<String>,
        /// Column names of the rejected batch
        found: Vec<String>,
    },

    /// A batch column has the locked name but a different type or nullability
    #[error("Type mismatch for column '{column}': expected {expected}, found {found}")]
    FieldTypeMismatch {
        /// Name of the column
        column: String,
        /// Locked type of the column
        expected: String,
        /// Type carried by the rejected batch
        found: String,
    },

    /// A column type has no mapping to the table type system
    #[error("Unsupported type for column '{column}': {data_type}")]
    UnsupportedType {
        /// Name of the column
        column: String,
        /// The Arrow type that could not be mapped
        data_type: String,
    },

    /// The schema is structurally invalid (e.g. repeated column names)
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// I/O error on any table artifact
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from the Arrow library
    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    /// Error from the Parquet library while writing a data file
    #[error("Parquet error: {0}")]
    ParquetError(#[from] parquet::errors::ParquetError),

    /// Error serializing or parsing JSON metadata
    #[error("JSON serialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),

    /// Error decoding a manifest container
    #[error("Container decode error: {0}")]
    AvroError(#[from] crate::avro::AvroError),

    /// Table metadata on disk is not what this writer produces
    #[error("Corrupt table metadata: {0}")]
    CorruptMetadata(String),

    /// The writer was closed; no further batches are accepted
    #[error("Writer is closed")]
    Closed,
}
