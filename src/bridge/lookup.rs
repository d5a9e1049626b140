// In: src/bridge/lookup.rs

//! Redirects lookups by composite value to lookups by primary key.
//!
//! Each helper decodes the primary key and makes exactly one call into the
//! storage collaborator. Nothing is cached or retried, and storage failures are
//! passed through as [`CompositeIdError::Storage`].

use crate::codec::decode_primary_key;
use crate::error::CompositeIdError;
use crate::schema::RadixSchema;
use crate::traits::Storage;

/// `storage.find_by_primary_key(decode_primary_key(composite))`.
///
/// An absent composite has no primary key and therefore no record.
pub fn find_by_composite<S: Storage>(
    schema: &RadixSchema,
    storage: &S,
    composite: Option<i128>,
) -> Result<Option<S::Record>, CompositeIdError> {
    match decode_primary_key(schema, composite) {
        Some(key) => {
            log::trace!(
                "find_by_composite: {:?} -> {}={}",
                composite,
                schema.primary_key_name(),
                key
            );
            storage.find_by_primary_key(key).map_err(CompositeIdError::storage)
        }
        None => Ok(None),
    }
}

/// `storage.find_by_primary_key_strict(decode_primary_key(composite))`.
///
/// Fails with [`CompositeIdError::MissingPrimaryKey`] for an absent composite.
pub fn find_by_composite_strict<S: Storage>(
    schema: &RadixSchema,
    storage: &S,
    composite: Option<i128>,
) -> Result<S::Record, CompositeIdError> {
    let key =
        decode_primary_key(schema, composite).ok_or(CompositeIdError::MissingPrimaryKey)?;
    log::trace!(
        "find_by_composite_strict: {:?} -> {}={}",
        composite,
        schema.primary_key_name(),
        key
    );
    storage.find_by_primary_key_strict(key).map_err(CompositeIdError::storage)
}
