//! The schema builder.
//!
//! Turns a declarative [`SchemaConfig`] into the immutable [`RadixSchema`] the
//! codec runs against. Every configuration mistake is reported here, at
//! declaration time, so encode/decode calls never fail on a malformed schema.

use crate::config::{FieldDeclarations, SchemaConfig, SchemaSpec};
use crate::error::CompositeIdError;
use crate::kernels::mixed_radix;
use crate::types::RawValue;
use hashbrown::HashSet;

/// Largest accepted bit width for a single field: radices are `u64`, so
/// `2^63` is the largest power of two one can hold.
pub const MAX_FIELD_BITS: u64 = 63;

/// One bounded group field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    /// Exclusive upper bound of the field's values.
    pub radix: u64,
}

/// The validated, immutable layout of a composite identifier.
///
/// Field order is the encoding order, most-significant first. The schema has
/// no mutation API, so a value encoded against it always decodes against the
/// same layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadixSchema {
    primary_key_name: String,
    fields: Vec<Field>,
    radices: Vec<u64>,
    group_modulus: i128,
}

impl RadixSchema {
    /// Validates `config` into a schema.
    ///
    /// `default_primary_key` is the record type's declared primary key, used
    /// unless the config overrides it. `has_block` relaxes the positional form's
    /// name count, since a computed block may supply the unnamed trailing fields.
    pub fn build(
        config: &SchemaConfig,
        default_primary_key: &str,
        has_block: bool,
    ) -> Result<Self, CompositeIdError> {
        let fields = match &config.spec {
            SchemaSpec::ByTotals { fields } => keyed_fields(fields, RadixKind::Total)?,
            SchemaSpec::ByBitWidths { fields } => keyed_fields(fields, RadixKind::Bits)?,
            SchemaSpec::BitAlignedTotals { fields } => {
                keyed_fields(fields, RadixKind::BitAlignedTotal)?
            }
            SchemaSpec::Positional { names, totals, bits } => {
                positional_fields(names, totals, bits, has_block)?
            }
        };

        if fields.is_empty() {
            return Err(CompositeIdError::Configuration(
                "at least one group field is required".to_string(),
            ));
        }

        check_unique(&fields)?;

        let radices: Vec<u64> = fields.iter().map(|f| f.radix).collect();
        let group_modulus = mixed_radix::modulus(&radices).ok_or_else(|| {
            CompositeIdError::Configuration(format!(
                "product of radices {:?} does not fit a 128-bit composite value",
                radices
            ))
        })?;

        let primary_key_name = config
            .primary_key
            .clone()
            .unwrap_or_else(|| default_primary_key.to_string());

        log::debug!(
            "built composite schema on `{}`: fields={:?} group_modulus={}",
            primary_key_name,
            fields,
            group_modulus
        );

        Ok(Self {
            primary_key_name,
            fields,
            radices,
            group_modulus,
        })
    }

    pub fn primary_key_name(&self) -> &str {
        &self.primary_key_name
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn radices(&self) -> &[u64] {
        &self.radices
    }

    /// The product of all radices; the multiplier applied to the primary key.
    pub fn group_modulus(&self) -> i128 {
        self.group_modulus
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    /// Total width of the group in bits, if every radix is a power of two.
    pub fn total_bits(&self) -> Option<u32> {
        self.radices
            .iter()
            .try_fold(0u32, |acc, &r| r.is_power_of_two().then(|| acc + r.trailing_zeros()))
    }
}

//==================================================================================
// Field Construction
//==================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RadixKind {
    Total,
    Bits,
    BitAlignedTotal,
}

fn check_unique(fields: &[Field]) -> Result<(), CompositeIdError> {
    let mut seen = HashSet::with_capacity(fields.len());
    for field in fields {
        if !seen.insert(field.name.as_str()) {
            return Err(CompositeIdError::Configuration(format!(
                "group field `{}` is declared more than once",
                field.name
            )));
        }
    }
    Ok(())
}

fn keyed_fields(
    fields: &FieldDeclarations,
    kind: RadixKind,
) -> Result<Vec<Field>, CompositeIdError> {
    fields
        .iter()
        .map(|(name, value)| to_field(name, value, kind))
        .collect()
}

fn positional_fields(
    names: &[String],
    totals: &[RawValue],
    bits: &[RawValue],
    has_block: bool,
) -> Result<Vec<Field>, CompositeIdError> {
    let (values, kind) = match (totals.is_empty(), bits.is_empty()) {
        (true, true) => {
            return Err(CompositeIdError::Configuration(
                "must declare either totals or bits".to_string(),
            ))
        }
        (false, false) => {
            return Err(CompositeIdError::Configuration(format!(
                "both totals ({:?}) and bits ({:?}) declared",
                totals, bits
            )))
        }
        (false, true) => (totals, RadixKind::Total),
        (true, false) => (bits, RadixKind::Bits),
    };

    if names.is_empty() && !has_block {
        return Err(CompositeIdError::Configuration(
            "must name at least one group field or attach a computed block".to_string(),
        ));
    }
    let count_mismatch = if has_block {
        names.len() > values.len()
    } else {
        names.len() != values.len()
    };
    if count_mismatch {
        return Err(CompositeIdError::Configuration(format!(
            "amount of group names ({}) doesn't match totals/bits ({})",
            names.len(),
            values.len()
        )));
    }

    values
        .iter()
        .enumerate()
        .map(|(i, value)| match names.get(i) {
            Some(name) => to_field(name, value, kind),
            None => to_field(&generated_name(i), value, kind),
        })
        .collect()
}

/// Name given to a positional field left for the computed block to supply.
pub fn generated_name(position: usize) -> String {
    format!("group_{}", position)
}

fn to_field(name: &str, value: &RawValue, kind: RadixKind) -> Result<Field, CompositeIdError> {
    let (what, min) = match kind {
        RadixKind::Bits => ("bit width", 0),
        RadixKind::Total | RadixKind::BitAlignedTotal => ("total", 1),
    };
    let declared = match value {
        RawValue::Int(v) if *v >= min => *v,
        other => {
            let expected = if min == 0 { "a non-negative" } else { "a positive" };
            return Err(CompositeIdError::Configuration(format!(
                "{} of field `{}` must be {} integer, `{}` given",
                what, name, expected, other
            )));
        }
    };
    let too_large = || {
        CompositeIdError::Configuration(format!(
            "{} of field `{}` is too large: {}",
            what, name, declared
        ))
    };

    let radix = match kind {
        RadixKind::Total => u64::try_from(declared).map_err(|_| too_large())?,
        RadixKind::Bits => {
            if declared > MAX_FIELD_BITS as i128 {
                return Err(CompositeIdError::Configuration(format!(
                    "bit width of field `{}` must be at most {}, `{}` given",
                    name, MAX_FIELD_BITS, declared
                )));
            }
            1u64 << declared
        }
        RadixKind::BitAlignedTotal => {
            let bits = u64::try_from(declared)
                .ok()
                .map(mixed_radix::bits_for_total)
                .filter(|bits| u64::from(*bits) <= MAX_FIELD_BITS)
                .ok_or_else(too_large)?;
            1u64 << bits
        }
    };

    Ok(Field {
        name: name.to_string(),
        radix,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec;
    use crate::types::group;

    fn build(config: SchemaConfig) -> Result<RadixSchema, CompositeIdError> {
        RadixSchema::build(&config, "id", false)
    }

    fn names(schema: &RadixSchema) -> Vec<&str> {
        schema.fields().iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_by_totals_keeps_order_and_multiplies_radices() {
        let schema = build(SchemaConfig::by_totals([
            ("client_id", 10),
            ("x", 200),
            ("type", 2),
            ("y", 30),
        ]))
        .unwrap();

        assert_eq!(names(&schema), vec!["client_id", "x", "type", "y"]);
        assert_eq!(schema.radices(), &[10, 200, 2, 30]);
        assert_eq!(schema.group_modulus(), 120_000);
        assert_eq!(schema.primary_key_name(), "id");
        assert_eq!(schema.total_bits(), None);
    }

    #[test]
    fn test_by_bit_widths_derives_powers_of_two() {
        let schema = build(SchemaConfig::by_bit_widths([("shard", 4), ("kind", 1)])).unwrap();
        assert_eq!(schema.radices(), &[16, 2]);
        assert_eq!(schema.group_modulus(), 32);
        assert_eq!(schema.total_bits(), Some(5));
    }

    #[test]
    fn test_bit_aligned_totals_round_up() {
        let schema =
            build(SchemaConfig::bit_aligned_totals([("client_id", 10), ("type", 2)])).unwrap();
        assert_eq!(schema.radices(), &[16, 2]);
    }

    #[test]
    fn test_primary_key_override() {
        let config = SchemaConfig::by_totals([("client_id", 10)]).with_primary_key("bill_id");
        let schema = build(config).unwrap();
        assert_eq!(schema.primary_key_name(), "bill_id");
    }

    #[test]
    fn test_empty_schema_is_rejected() {
        let result = build(SchemaConfig::by_totals(Vec::<(String, i64)>::new()));
        assert!(matches!(
            result,
            Err(CompositeIdError::Configuration(msg)) if msg.contains("at least one")
        ));
    }

    #[test]
    fn test_non_positive_and_non_integer_radices_are_rejected() {
        let bad_radices = [
            RawValue::Int(0),
            RawValue::Int(-3),
            RawValue::Float(2.5),
            RawValue::from("10"),
        ];
        for bad in bad_radices {
            let shown = bad.to_string();
            let result = build(SchemaConfig::by_totals([("client_id", bad)]));
            match result {
                Err(CompositeIdError::Configuration(msg)) => {
                    assert!(msg.contains("client_id"), "{}", msg);
                    assert!(msg.contains(&shown), "{}", msg);
                }
                other => panic!("Expected Configuration error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_bit_width_bounds() {
        let result = build(SchemaConfig::by_bit_widths([("shard", 64)]));
        assert!(matches!(
            result,
            Err(CompositeIdError::Configuration(msg)) if msg.contains("at most 63")
        ));

        let widest = build(SchemaConfig::by_bit_widths([("shard", 63)])).unwrap();
        assert_eq!(widest.radices(), &[1u64 << 63]);
        assert_eq!(widest.total_bits(), Some(63));
    }

    #[test]
    fn test_zero_bits_is_radix_one() {
        let schema = build(SchemaConfig::by_bit_widths([("a", 0)])).unwrap();
        assert_eq!(schema.radices(), &[1]);
        assert_eq!(schema.group_modulus(), 1);

        match build(SchemaConfig::by_bit_widths([("a", -1)])) {
            Err(CompositeIdError::Configuration(msg)) => {
                assert!(msg.contains("bit width of field `a`"), "{}", msg);
                assert!(msg.contains("non-negative"), "{}", msg);
            }
            other => panic!("Expected Configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_bit_aligned_total_too_large() {
        let result = build(SchemaConfig::bit_aligned_totals([("a", (1u64 << 63) + 1)]));
        assert!(matches!(
            result,
            Err(CompositeIdError::Configuration(msg)) if msg.contains("too large")
        ));
    }

    #[test]
    fn test_radix_one_is_accepted() {
        let schema = build(SchemaConfig::by_totals([("only", 1)])).unwrap();
        assert_eq!(schema.group_modulus(), 1);
    }

    #[test]
    fn test_modulus_overflow_is_a_configuration_error() {
        let result = build(SchemaConfig::by_bit_widths([("a", 62), ("b", 62), ("c", 62)]));
        assert!(matches!(
            result,
            Err(CompositeIdError::Configuration(msg)) if msg.contains("128-bit")
        ));
    }

    #[test]
    fn test_positional_requires_exactly_one_of_totals_or_bits() {
        let neither = SchemaConfig::positional(vec!["a".into()], vec![], vec![]);
        assert!(build(neither).is_err());

        let both = SchemaConfig::positional(
            vec!["a".into()],
            vec![RawValue::Int(10)],
            vec![RawValue::Int(4)],
        );
        match build(both) {
            Err(CompositeIdError::Configuration(msg)) => assert!(msg.contains("both")),
            other => panic!("Expected Configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_positional_name_count_without_block() {
        let config = SchemaConfig::positional(
            vec!["a".into()],
            vec![RawValue::Int(10), RawValue::Int(2)],
            vec![],
        );
        assert!(RadixSchema::build(&config, "id", false).is_err());
    }

    #[test]
    fn test_positional_with_block_generates_trailing_names() {
        let config = SchemaConfig::positional(
            vec!["client_id".into()],
            vec![RawValue::Int(10), RawValue::Int(2)],
            vec![],
        );
        let schema = RadixSchema::build(&config, "id", true).unwrap();
        assert_eq!(names(&schema), vec!["client_id", "group_1"]);

        let too_many_names = SchemaConfig::positional(
            vec!["a".into(), "b".into()],
            vec![RawValue::Int(10)],
            vec![],
        );
        assert!(RadixSchema::build(&too_many_names, "id", true).is_err());
    }

    #[test]
    fn test_positional_without_names_needs_block() {
        let config = SchemaConfig::positional(vec![], vec![RawValue::Int(2)], vec![]);
        assert!(RadixSchema::build(&config, "id", false).is_err());
        let schema = RadixSchema::build(&config, "id", true).unwrap();
        assert_eq!(names(&schema), vec!["group_0"]);
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let config = SchemaConfig::positional(
            vec!["a".into(), "a".into()],
            vec![RawValue::Int(10), RawValue::Int(2)],
            vec![],
        );
        assert!(matches!(
            build(config),
            Err(CompositeIdError::Configuration(msg)) if msg.contains("more than once")
        ));
    }

    #[test]
    fn test_repeated_keyed_names_are_rejected() {
        let declared = build(SchemaConfig::by_totals([("a", 10), ("a", 2)]));
        assert!(matches!(
            declared,
            Err(CompositeIdError::Configuration(msg)) if msg.contains("`a`")
        ));

        let parsed = SchemaConfig::from_json_str(
            r#"{"form": "by_bit_widths", "fields": {"a": 4, "b": 1, "a": 2}}"#,
        )
        .unwrap();
        assert!(matches!(
            build(parsed),
            Err(CompositeIdError::Configuration(msg)) if msg.contains("more than once")
        ));
    }

    #[test]
    fn test_json_bit_width_forms_build_working_schemas() {
        let keyed = SchemaConfig::from_json_str(
            r#"{"form": "by_bit_widths", "fields": {"client_id": 4, "type": 1}}"#,
        )
        .unwrap();
        let positional = SchemaConfig::from_json_str(
            r#"{"form": "positional", "names": ["client_id", "type"], "bits": [4, 1]}"#,
        )
        .unwrap();

        for config in [keyed, positional] {
            let schema = build(config).unwrap();
            assert_eq!(names(&schema), vec!["client_id", "type"]);
            assert_eq!(schema.radices(), &[16, 2]);

            let values = group([("client_id", 2), ("type", 1)]);
            let unique = codec::encode(&schema, 431, &values).unwrap();
            assert_eq!(unique, Some((431 << 5) + (2 << 1) + 1));
            let (pk, decoded) = codec::decode(&schema, unique).unwrap();
            assert_eq!(pk, 431);
            assert_eq!(decoded["client_id"], 2);
            assert_eq!(decoded["type"], 1);
        }
    }

    #[test]
    fn test_json_validation_errors_name_the_field() {
        let cases = [
            (r#"{"form": "by_totals", "fields": {"shard": 0}}"#, "total of field `shard`"),
            (r#"{"form": "by_totals", "fields": {"shard": 2.5}}"#, "total of field `shard`"),
            (r#"{"form": "by_bit_widths", "fields": {"shard": -2}}"#, "bit width of field `shard`"),
            (r#"{"form": "by_bit_widths", "fields": {"shard": 70}}"#, "at most 63"),
            (r#"{"form": "by_totals", "fields": {}}"#, "at least one"),
            (r#"{"form": "positional", "names": ["a"]}"#, "either totals or bits"),
            (r#"{"form": "positional", "names": ["a"], "totals": [2], "bits": [1]}"#, "both"),
            (r#"{"form": "positional", "names": ["a", "b"], "bits": [1]}"#, "doesn't match"),
        ];
        for (json, expected) in cases {
            let config = SchemaConfig::from_json_str(json).unwrap();
            match build(config) {
                Err(CompositeIdError::Configuration(msg)) => {
                    assert!(msg.contains(expected), "{}: {}", json, msg)
                }
                other => panic!("{}: expected Configuration error, got {:?}", json, other),
            }
        }
    }
}
