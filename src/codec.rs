//! The composite-value codec.
//!
//! Four pure operations over a [`RadixSchema`]:
//!
//! * [`encode_group`] packs named group values into the group integer.
//! * [`encode`] combines a primary key with a group: `pk * group_modulus + group`.
//! * [`decode_primary_key`] and [`decode_group`] invert [`encode`]; [`decode`] does both.
//!
//! An absent (`None`) composite or primary key propagates as `None` rather than
//! being encoded as a degenerate value.
//!
//! Decoding never checks that a value was produced by the same schema. A composite
//! minted by a different layout decodes into well-typed but meaningless parts.

use crate::error::CompositeIdError;
use crate::kernels::mixed_radix;
use crate::schema::RadixSchema;
use crate::types::{DecodedGroup, GroupValues, RawValue};

/// Keys of `keys` that `schema` does not declare, in the order given.
pub(crate) fn unknown_keys<'a, I>(schema: &RadixSchema, keys: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    keys.into_iter()
        .filter(|k| !schema.contains(k))
        .cloned()
        .collect()
}

/// Packs `values` into the group integer, in `[0, group_modulus)`.
///
/// Every declared field must be present, non-null and integer-coercible; values
/// outside `[0, radix)` are reduced with floored modulo. Keys the schema does not
/// declare are rejected.
pub fn encode_group(
    schema: &RadixSchema,
    values: &GroupValues,
) -> Result<i128, CompositeIdError> {
    let unknown = unknown_keys(schema, values.keys());
    if !unknown.is_empty() {
        return Err(CompositeIdError::SchemaMismatch { keys: unknown });
    }

    let digits = schema
        .fields()
        .iter()
        .map(|field| {
            values
                .get(&field.name)
                .unwrap_or(&RawValue::Null)
                .to_i128(&field.name)
        })
        .collect::<Result<Vec<i128>, _>>()?;

    mixed_radix::pack(schema.radices(), &digits)
}

/// Encodes `primary_key` together with `group`.
///
/// Returns `Ok(None)` for a null primary key without looking at the group.
pub fn encode(
    schema: &RadixSchema,
    primary_key: impl Into<RawValue>,
    group: &GroupValues,
) -> Result<Option<i128>, CompositeIdError> {
    let primary_key = primary_key.into();
    if primary_key.is_null() {
        return Ok(None);
    }
    let pk = primary_key.to_i128(schema.primary_key_name())?;
    let group_value = encode_group(schema, group)?;

    let composite = pk
        .checked_mul(schema.group_modulus())
        .and_then(|shifted| shifted.checked_add(group_value))
        .ok_or_else(|| {
            CompositeIdError::Overflow(format!(
                "encoding {} `{}` with group modulus {}",
                schema.primary_key_name(),
                pk,
                schema.group_modulus()
            ))
        })?;

    log::trace!(
        "encoded {}={} group={} -> {}",
        schema.primary_key_name(),
        pk,
        group_value,
        composite
    );
    Ok(Some(composite))
}

/// Recovers the primary key: `floor(composite / group_modulus)`.
pub fn decode_primary_key(schema: &RadixSchema, composite: Option<i128>) -> Option<i128> {
    composite.map(|value| value.div_euclid(schema.group_modulus()))
}

/// Recovers the group values, in declared field order.
pub fn decode_group(schema: &RadixSchema, composite: Option<i128>) -> Option<DecodedGroup> {
    decode(schema, composite).map(|(_, group)| group)
}

/// Recovers both the primary key and the group values.
pub fn decode(schema: &RadixSchema, composite: Option<i128>) -> Option<(i128, DecodedGroup)> {
    let value = composite?;
    let mut digits = Vec::with_capacity(schema.fields().len());
    let primary_key = mixed_radix::unpack(value, schema.radices(), &mut digits);

    let group: DecodedGroup = schema
        .fields()
        .iter()
        .zip(digits)
        .map(|(field, digit)| (field.name.clone(), digit))
        .collect();

    log::trace!(
        "decoded {} -> {}={} group={:?}",
        value,
        schema.primary_key_name(),
        primary_key,
        group
    );
    Some((primary_key, group))
}
