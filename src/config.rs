// In: src/config.rs

//! The declaration-side configuration for a composite-id schema.
//!
//! A `SchemaConfig` is created once at the point where a record type declares
//! its composite identifier (in code, or from JSON) and is then validated into
//! an immutable [`RadixSchema`](crate::schema::RadixSchema) by the schema builder.
//! Nothing in this module validates values; it only describes the accepted shapes.

use std::fmt;

use crate::error::CompositeIdError;
use crate::types::RawValue;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

//==================================================================================
// I. Keyed Field Declarations
//==================================================================================

/// An ordered `name => radix declaration` list.
///
/// Serialized as a JSON object, but every entry is kept, repeated names
/// included, so the schema builder can reject them instead of one silently
/// overwriting another.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldDeclarations(Vec<(String, RawValue)>);

impl FieldDeclarations {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<RawValue>) {
        self.0.push((name.into(), value.into()));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    /// The first declaration under `name`.
    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for FieldDeclarations
where
    K: Into<String>,
    V: Into<RawValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl Serialize for FieldDeclarations {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

struct FieldDeclarationsVisitor;

impl<'de> Visitor<'de> for FieldDeclarationsVisitor {
    type Value = FieldDeclarations;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of field names to radix declarations")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((name, value)) = access.next_entry::<String, RawValue>()? {
            entries.push((name, value));
        }
        Ok(FieldDeclarations(entries))
    }
}

impl<'de> Deserialize<'de> for FieldDeclarations {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(FieldDeclarationsVisitor)
    }
}

//==================================================================================
// II. Schema Specification Forms
//==================================================================================

/// The mutually exclusive ways a schema's fields and radices can be declared.
///
/// Radix entries are kept as `RawValue`s so that a non-integer or non-positive
/// declaration reaches the builder and is reported with the offending field,
/// rather than failing deserialization with a positional error.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "form", rename_all = "snake_case")]
pub enum SchemaSpec {
    /// **Default:** ordered `name => total`; each total is the field's radix.
    ByTotals { fields: FieldDeclarations },

    /// Ordered `name => bits`; each field's radix is `2^bits`.
    ByBitWidths { fields: FieldDeclarations },

    /// Ordered `name => total` where every total is rounded up to the next power
    /// of two, so the composite value is a plain bit concatenation.
    BitAlignedTotals { fields: FieldDeclarations },

    /// **Legacy:** a positional list of names plus a parallel list of either
    /// totals or bit widths. When a computed block is attached, `names` may be
    /// shorter than the radix list; the block then supplies the trailing fields.
    Positional {
        #[serde(default)]
        names: Vec<String>,
        #[serde(default)]
        totals: Vec<RawValue>,
        #[serde(default)]
        bits: Vec<RawValue>,
    },
}

impl Default for SchemaSpec {
    fn default() -> Self {
        SchemaSpec::ByTotals {
            fields: FieldDeclarations::new(),
        }
    }
}

//==================================================================================
// III. The Unified SchemaConfig
//==================================================================================

/// The full declaration of one composite-id schema.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct SchemaConfig {
    /// Overrides the record type's declared primary key field name.
    #[serde(default)]
    pub primary_key: Option<String>,

    /// The field/radix declaration.
    #[serde(flatten)]
    pub spec: SchemaSpec,
}

impl SchemaConfig {
    /// Declares fields by `name => total`.
    pub fn by_totals<K, V, I>(fields: I) -> Self
    where
        K: Into<String>,
        V: Into<RawValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            primary_key: None,
            spec: SchemaSpec::ByTotals {
                fields: fields.into_iter().collect(),
            },
        }
    }

    /// Declares fields by `name => bits`.
    pub fn by_bit_widths<K, V, I>(fields: I) -> Self
    where
        K: Into<String>,
        V: Into<RawValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            primary_key: None,
            spec: SchemaSpec::ByBitWidths {
                fields: fields.into_iter().collect(),
            },
        }
    }

    /// Declares fields by `name => total`, rounding every total up to a power of two.
    pub fn bit_aligned_totals<K, V, I>(fields: I) -> Self
    where
        K: Into<String>,
        V: Into<RawValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            primary_key: None,
            spec: SchemaSpec::BitAlignedTotals {
                fields: fields.into_iter().collect(),
            },
        }
    }

    /// Declares fields positionally (legacy form).
    pub fn positional(names: Vec<String>, totals: Vec<RawValue>, bits: Vec<RawValue>) -> Self {
        Self {
            primary_key: None,
            spec: SchemaSpec::Positional { names, totals, bits },
        }
    }

    /// Overrides the primary key field name.
    pub fn with_primary_key(mut self, name: impl Into<String>) -> Self {
        self.primary_key = Some(name.into());
        self
    }

    /// Parses a configuration from JSON, e.g.
    /// `{"form": "by_totals", "primary_key": "bill_id", "fields": {"client_id": 10}}`.
    pub fn from_json_str(json: &str) -> Result<Self, CompositeIdError> {
        Ok(serde_json::from_str(json)?)
    }
}
