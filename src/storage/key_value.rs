use super::{StorageContext, StorageFunc};
use crate::data::{ColumnVisibility, Datum, Key, Mutation, Tuple, Value};
use crate::error::{Result, StorageError};

/// Stores and loads whole cells
///
/// Read tuples are `(row, cf, cq, visibility, timestamp, value)`. Written
/// tuples are `(row, cf, cq, value)`, `(row, cf, cq, visibility, value)` or
/// the full read shape; an empty visibility writes an unlabeled cell.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyValueStorage;

impl StorageFunc for KeyValueStorage {
    fn get_tuple(&self, key: &Key, value: &Value, _ctx: &StorageContext) -> Result<Tuple> {
        Ok(Tuple::new(vec![
            Datum::bytes(key.row.clone()),
            Datum::bytes(key.column_family.clone()),
            Datum::bytes(key.column_qualifier.clone()),
            Datum::bytes(key.column_visibility.clone()),
            Datum::Long(key.timestamp),
            Datum::bytes(value.as_bytes()),
        ]))
    }

    fn get_mutations(&self, tuple: &Tuple, ctx: &StorageContext) -> Result<Vec<Mutation>> {
        let conv = ctx.converter();
        let fields = ctx.field_schemas();
        let text = |index| conv.tuple_to_text(tuple, index, fields);

        let mutation = match tuple.len() {
            4 => {
                let mut mutation = Mutation::new(text(0)?);
                mutation.put(text(1)?, text(2)?, text(3)?);
                mutation
            }
            5 => {
                let mut mutation = Mutation::new(text(0)?);
                let visibility = text(3)?;
                if visibility.is_empty() {
                    mutation.put(text(1)?, text(2)?, text(4)?);
                } else {
                    mutation.put_with_visibility(
                        text(1)?,
                        text(2)?,
                        ColumnVisibility::new(visibility),
                        text(4)?,
                    );
                }
                mutation
            }
            6 => {
                let mut mutation = Mutation::new(text(0)?);
                let timestamp = conv.obj_to_long(tuple, 4, fields)?;
                mutation.put_with_timestamp(
                    text(1)?,
                    text(2)?,
                    ColumnVisibility::new(text(3)?),
                    timestamp,
                    text(5)?,
                );
                mutation
            }
            actual => {
                return Err(StorageError::Arity {
                    expected: "4, 5 or 6",
                    actual,
                });
            }
        };

        Ok(vec![mutation])
    }
}
