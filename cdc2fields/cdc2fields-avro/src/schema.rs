//! Build a [`FieldTable`] from an Avro topic schema.

use apache_avro::{
    Schema,
    schema::{RecordField, SchemaKind},
};
use cdc2fields_core::{ChildSlot, FieldEntry, FieldTable};

use crate::error::EventError;

/// Build the ordered field index for a topic schema.
///
/// The schema must be a record. A field whose type is a union containing
/// at least one record member becomes a compound entry: its child slots
/// concatenate, in union declaration order, every record member's fields
/// plus a placeholder for the null member. Unions with no record member
/// (ordinary nullable scalars) stay plain entries.
pub fn field_table_from_schema(schema: &Schema) -> Result<FieldTable, EventError> {
    let Schema::Record(record) = schema else {
        return Err(EventError::SchemaInvalid {
            detail: format!(
                "expected a record schema, got {:?}",
                SchemaKind::from(schema)
            ),
        });
    };
    let entries = record
        .fields
        .iter()
        .map(field_entry)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(FieldTable::new(entries))
}

fn field_entry(field: &RecordField) -> Result<FieldEntry, EventError> {
    let Schema::Union(union) = &field.schema else {
        return Ok(FieldEntry::scalar(field.name.as_str()));
    };
    if !union
        .variants()
        .iter()
        .any(|variant| matches!(variant, Schema::Record(_)))
    {
        return Ok(FieldEntry::scalar(field.name.as_str()));
    }

    let mut slots = Vec::new();
    for variant in union.variants() {
        match variant {
            Schema::Record(nested) => {
                slots.extend(
                    nested
                        .fields
                        .iter()
                        .map(|child| ChildSlot::Field(child.name.clone())),
                );
            }
            Schema::Null => slots.push(ChildSlot::Null),
            other => {
                return Err(EventError::UnsupportedUnion {
                    field: field.name.clone(),
                    detail: format!(
                        "union member {:?} is neither null nor a record",
                        SchemaKind::from(other)
                    ),
                });
            }
        }
    }
    Ok(FieldEntry::compound(field.name.as_str(), slots))
}
