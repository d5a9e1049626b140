//! Group resolution: decides which raw value feeds each schema field.
//!
//! Sources, lowest priority first:
//!
//! 1. `explicit` values supplied by the caller,
//! 2. the computed block, merged over the explicit values (block wins on overlap),
//! 3. the record's own attributes, for whatever is still missing.
//!
//! The block runs at most once, and only when `explicit` leaves a field uncovered.

use crate::codec::unknown_keys;
use crate::error::CompositeIdError;
use crate::schema::RadixSchema;
use crate::traits::Record;
use crate::types::{GroupValues, RawValue};

/// A computed source of group values, evaluated against the record being encoded.
pub type GroupBlock<'a, R> = dyn Fn(&R) -> GroupValues + Send + Sync + 'a;

/// Reads attribute `name` from `record`, instance accessor first, then type level.
pub fn lookup_attribute<R: Record>(record: &R, name: &str) -> Result<RawValue, CompositeIdError> {
    record
        .attribute(name)
        .or_else(|| R::type_attribute(name))
        .ok_or_else(|| CompositeIdError::MissingAttribute {
            name: name.to_string(),
        })
}

/// Produces the full group for `record`, in declared field order.
pub fn resolve<R: Record>(
    schema: &RadixSchema,
    record: &R,
    explicit: GroupValues,
    block: Option<&GroupBlock<'_, R>>,
) -> Result<GroupValues, CompositeIdError> {
    let unknown = unknown_keys(schema, explicit.keys());
    if !unknown.is_empty() {
        return Err(CompositeIdError::SchemaMismatch { keys: unknown });
    }

    let mut merged = explicit;
    let complete =
        |values: &GroupValues| schema.fields().iter().all(|f| values.contains_key(&f.name));

    if !complete(&merged) {
        if let Some(block) = block {
            let computed = block(record);
            log::debug!(
                "computed block supplied group keys {:?}",
                computed.keys().collect::<Vec<_>>()
            );

            let unknown = unknown_keys(schema, computed.keys());
            if !unknown.is_empty() {
                return Err(CompositeIdError::SchemaMismatch { keys: unknown });
            }
            merged.extend(computed);
        }
    }

    schema
        .fields()
        .iter()
        .map(|field| {
            let value = match merged.swap_remove(&field.name) {
                Some(value) => value,
                None => lookup_attribute(record, &field.name)?,
            };
            Ok((field.name.clone(), value))
        })
        .collect()
}
