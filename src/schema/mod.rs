//! # Table Schema
//!
//! The schema a table is created with. It is derived from the first
//! non-empty Arrow batch a writer receives and is immutable afterwards.
//!
//! Field order is significant: data files and manifests address columns by
//! position, so two schemas with the same names in a different order are
//! different schemas.

mod types;
mod validation;


use arrow::datatypes::Schema;

pub use types::FieldType;
pub use validation::check_batch_schema;

use crate::writer::TableError;

/// One column of a table schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaField {
    /// Column id, 0-based in column order
    pub id: i32,
    /// Column name
    pub name: String,
    /// Logical type
    pub field_type: FieldType,
    /// Whether the column accepts nulls
    pub nullable: bool,
}

/// Ordered, name-unique column list of a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    /// Schema id; a table written by this crate has exactly one schema
    pub id: i64,
    fields: Vec<SchemaField>,
}

impl TableSchema {
    /// Build a table schema from an Arrow schema.
    ///
    /// Fails when a column type has no mapping or a name repeats.
    pub fn from_arrow(schema: &Schema) -> Result<Self, TableError> {
        let mut fields = Vec::with_capacity(schema.fields().len());
        for (i, field) in schema.fields().iter().enumerate() {
            if fields.iter().any(|f: &SchemaField| f.name == *field.name()) {
                return Err(TableError::InvalidSchema(format!(
                    "duplicate column name '{}'",
                    field.name()
                )));
            }
            fields.push(SchemaField {
                id: i as i32,
                name: field.name().clone(),
                field_type: FieldType::from_arrow(field.name(), field.data_type())?,
                nullable: field.is_nullable(),
            });
        }
        Ok(Self { id: 0, fields })
    }

    /// Columns in order
    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    /// Column names in order
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Highest column id, or -1 for an empty schema
    pub fn highest_field_id(&self) -> i32 {
        self.fields.last().map(|f| f.id).unwrap_or(-1)
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the schema has no columns
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
