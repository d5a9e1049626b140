//! This module defines the core value types passed in and out of the codec.
//!
//! It includes the loosely-typed `RawValue` accepted from callers and records,
//! and the ordered mappings used for resolved and decoded groups. Mappings are
//! `IndexMap`s so that iteration follows the schema's declaration order.

pub mod raw_value;

use indexmap::IndexMap;

// Re-export the main type(s) for easier access.
pub use raw_value::RawValue;

/// Group values keyed by field name, as supplied by a caller, a computed block or a record.
pub type GroupValues = IndexMap<String, RawValue>;

/// Group values recovered from a composite value, in declared field order.
/// Every value lies in `[0, radix)` for its field.
pub type DecodedGroup = IndexMap<String, u64>;

/// Builds a [`GroupValues`] mapping from `(name, value)` pairs.
///
/// ```
/// use composite_id::group;
/// let g = group([("client_id", 2), ("type", 1)]);
/// assert_eq!(g.len(), 2);
/// ```
pub fn group<K, V, I>(pairs: I) -> GroupValues
where
    K: Into<String>,
    V: Into<RawValue>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
