use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::schema::TableSchema;

/// Options every table written by this crate carries
pub const TABLE_OPTIONS: [(&str, &str); 3] = [
    ("table.type", "APPEND_ONLY"),
    ("data-files.format", "parquet"),
    ("bucket", "-1"),
];

/// Render `OPTIONS` as `key=value` lines
pub fn options_file() -> String {
    TABLE_OPTIONS
        .iter()
        .map(|(k, v)| format!("{k}={v}\n"))
        .collect()
}

/// A column of `schema/schema-<id>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaFileField {
    /// Column id
    pub id: i32,
    /// Column name
    pub name: String,
    /// Type name, `NOT NULL` suffixed for required columns
    #[serde(rename = "type")]
    pub field_type: String,
}

/// Content of `schema/schema-<id>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaFile {
    /// Schema id
    pub id: i64,
    /// Columns in order
    pub fields: Vec<SchemaFileField>,
    /// Highest column id in use
    pub highest_field_id: i32,
    /// Partition columns
    pub partition_keys: Vec<String>,
    /// Primary key columns
    pub primary_keys: Vec<String>,
    /// Table options
    pub options: BTreeMap<String, String>,
}

impl From<&TableSchema> for SchemaFile {
    fn from(schema: &TableSchema) -> Self {
        let fields = schema
            .fields()
            .iter()
            .map(|f| SchemaFileField {
                id: f.id,
                name: f.name.clone(),
                field_type: if f.nullable {
                    f.field_type.paimon_name()
                } else {
                    format!("{} NOT NULL", f.field_type.paimon_name())
                },
            })
            .collect();
        Self {
            id: schema.id,
            fields,
            highest_field_id: schema.highest_field_id(),
            partition_keys: Vec::new(),
            primary_keys: Vec::new(),
            options: TABLE_OPTIONS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}
