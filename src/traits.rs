//! This module defines the capabilities the codec consumes from its host
//! record type and storage layer. The codec only calls these; the host
//! implements them.

use crate::types::RawValue;

/// A record whose attributes can be read by name.
///
/// Attribute lookup is layered: the instance accessor is consulted first, then
/// the type-level accessor (values shared by every record of the type, such as
/// a fixed table code).
pub trait Record {
    /// The record type's declared primary key field.
    fn primary_key_name() -> &'static str
    where
        Self: Sized,
    {
        "id"
    }

    /// Reads the current value of the instance attribute `name`, if the record has one.
    fn attribute(&self, name: &str) -> Option<RawValue>;

    /// Reads a type-level attribute `name`, if the record type defines one.
    fn type_attribute(name: &str) -> Option<RawValue>
    where
        Self: Sized,
    {
        let _ = name;
        None
    }
}

/// Single-record lookup primitives of the host storage layer.
pub trait Storage {
    type Record;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Finds a record by primary key, returning `None` when absent.
    fn find_by_primary_key(&self, key: i128) -> Result<Option<Self::Record>, Self::Error>;

    /// Finds a record by primary key, failing when absent.
    fn find_by_primary_key_strict(&self, key: i128) -> Result<Self::Record, Self::Error>;
}
