use arrow::datatypes::Schema;

use crate::writer::TableError;

/// Checks that a batch schema matches the locked schema.
///
/// Column names must agree in count and order. Each column must then carry
/// the locked data type, and a column locked as non-nullable must stay
/// non-nullable.
pub fn check_batch_schema(locked: &Schema, batch: &Schema) -> Result<(), TableError> {
    let same_names = locked.fields().len() == batch.fields().len()
        && locked
            .fields()
            .iter()
            .zip(batch.fields().iter())
            .all(|(a, b)| a.name() == b.name());

    if !same_names {
        let names = |schema: &Schema| -> Vec<String> {
            schema.fields().iter().map(|f| f.name().clone()).collect()
        };
        return Err(TableError::SchemaMismatch {
            expected: names(locked),
            found: names(batch),
        });
    }

    for (expected, found) in locked.fields().iter().zip(batch.fields().iter()) {
        let widened_nulls = !expected.is_nullable() && found.is_nullable();
        if expected.data_type() != found.data_type() || widened_nulls {
            return Err(TableError::FieldTypeMismatch {
                column: expected.name().clone(),
                expected: describe(expected.data_type(), expected.is_nullable()),
                found: describe(found.data_type(), found.is_nullable()),
            });
        }
    }
    Ok(())
}

fn describe(data_type: &arrow::datatypes::DataType, nullable: bool) -> String {
    if nullable {
        data_type.to_string()
    } else {
        format!("{data_type} NOT NULL")
    }
}
