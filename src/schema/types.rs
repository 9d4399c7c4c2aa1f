use std::fmt;

use arrow::datatypes::{DataType, TimeUnit};

use crate::writer::TableError;

/// Logical column type shared by every table format.
///
/// Each format renders its own type name from this tag, see
/// [`FieldType::paimon_name`] and [`FieldType::iceberg_name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Boolean
    Boolean,
    /// 32-bit signed integer
    Int,
    /// 64-bit signed integer
    BigInt,
    /// 32-bit float
    Float,
    /// 64-bit float
    Double,
    /// UTF-8 string
    String,
    /// Days since epoch
    Date,
    /// Timestamp without time zone
    Timestamp,
    /// Fixed-point decimal
    Decimal {
        /// Total digits
        precision: u8,
        /// Digits after the point
        scale: i8,
    },
}

impl FieldType {
    /// Map an Arrow type onto the shared type tags.
    ///
    /// Fails with [`TableError::UnsupportedType`] for types with no mapping.
    pub fn from_arrow(column: &str, data_type: &DataType) -> Result<Self, TableError> {
        let field_type = match data_type {
            DataType::Boolean => Self::Boolean,
            DataType::Int32 => Self::Int,
            DataType::Int64 => Self::BigInt,
            DataType::Float32 => Self::Float,
            DataType::Float64 => Self::Double,
            DataType::Utf8 | DataType::LargeUtf8 => Self::String,
            DataType::Date32 => Self::Date,
            DataType::Timestamp(TimeUnit::Millisecond | TimeUnit::Microsecond, None) => {
                Self::Timestamp
            }
            DataType::Decimal128(precision, scale) => Self::Decimal {
                precision: *precision,
                scale: *scale,
            },
            other => {
                return Err(TableError::UnsupportedType {
                    column: column.to_string(),
                    data_type: other.to_string(),
                })
            }
        };
        Ok(field_type)
    }

    /// Type name used in Paimon schema files
    pub fn paimon_name(&self) -> String {
        match self {
            Self::Boolean => "boolean".to_string(),
            Self::Int => "int".to_string(),
            Self::BigInt => "bigint".to_string(),
            Self::Float => "float".to_string(),
            Self::Double => "double".to_string(),
            Self::String => "string".to_string(),
            Self::Date => "date".to_string(),
            Self::Timestamp => "timestamp".to_string(),
            Self::Decimal { precision, scale } => format!("decimal({precision},{scale})"),
        }
    }

    /// Type name used in Iceberg table metadata
    pub fn iceberg_name(&self) -> String {
        match self {
            Self::BigInt => "long".to_string(),
            other => other.paimon_name(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.paimon_name())
    }
}
