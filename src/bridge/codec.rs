// In: src/bridge/codec.rs

//! The `Codec` facade: one immutable schema, an optional computed block, and the
//! codec, resolver and lookup operations exposed as methods.

use std::fmt;
use std::sync::Arc;

use crate::codec;
use crate::config::SchemaConfig;
use crate::error::CompositeIdError;
use crate::resolver::{self, GroupBlock};
use crate::schema::RadixSchema;
use crate::traits::{Record, Storage};
use crate::types::{DecodedGroup, GroupValues, RawValue};

use super::lookup;

/// A composite-id codec bound to record type `R`.
///
/// Built once when the record type is declared; cheap to clone and safe to share
/// across threads, since nothing in it is mutable after construction.
pub struct Codec<R> {
    schema: Arc<RadixSchema>,
    block: Option<Arc<GroupBlock<'static, R>>>,
}

impl<R> Clone for Codec<R> {
    fn clone(&self) -> Self {
        Self {
            schema: Arc::clone(&self.schema),
            block: self.block.clone(),
        }
    }
}

impl<R> fmt::Debug for Codec<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codec")
            .field("schema", &self.schema)
            .field("has_block", &self.block.is_some())
            .finish()
    }
}

/// Collects a schema configuration and an optional computed block for a [`Codec`].
pub struct CodecBuilder<R> {
    config: SchemaConfig,
    block: Option<Arc<GroupBlock<'static, R>>>,
}

impl<R: Record> CodecBuilder<R> {
    /// Attaches a computed block that supplies group values from the record.
    pub fn block<F>(mut self, block: F) -> Self
    where
        F: Fn(&R) -> GroupValues + Send + Sync + 'static,
    {
        let block: Arc<GroupBlock<'static, R>> = Arc::new(block);
        self.block = Some(block);
        self
    }

    /// Validates the configuration and produces the codec.
    pub fn build(self) -> Result<Codec<R>, CompositeIdError> {
        let schema =
            RadixSchema::build(&self.config, R::primary_key_name(), self.block.is_some())?;
        Ok(Codec {
            schema: Arc::new(schema),
            block: self.block,
        })
    }
}

impl<R: Record> Codec<R> {
    pub fn builder(config: SchemaConfig) -> CodecBuilder<R> {
        CodecBuilder {
            config,
            block: None,
        }
    }

    /// Builds a codec with no computed block.
    pub fn new(config: SchemaConfig) -> Result<Self, CompositeIdError> {
        Self::builder(config).build()
    }

    pub fn schema(&self) -> &RadixSchema {
        &self.schema
    }

    //==============================================================================
    // Codec operations
    //==============================================================================

    pub fn encode_group(&self, group: &GroupValues) -> Result<i128, CompositeIdError> {
        codec::encode_group(&self.schema, group)
    }

    pub fn encode(
        &self,
        primary_key: impl Into<RawValue>,
        group: &GroupValues,
    ) -> Result<Option<i128>, CompositeIdError> {
        codec::encode(&self.schema, primary_key, group)
    }

    pub fn decode_primary_key(&self, composite: Option<i128>) -> Option<i128> {
        codec::decode_primary_key(&self.schema, composite)
    }

    pub fn decode_group(&self, composite: Option<i128>) -> Option<DecodedGroup> {
        codec::decode_group(&self.schema, composite)
    }

    pub fn decode(&self, composite: Option<i128>) -> Option<(i128, DecodedGroup)> {
        codec::decode(&self.schema, composite)
    }

    //==============================================================================
    // Record-level operations
    //==============================================================================

    /// Resolves the group for `record`, with `explicit` values taking the lowest priority.
    pub fn resolve(
        &self,
        record: &R,
        explicit: GroupValues,
    ) -> Result<GroupValues, CompositeIdError> {
        resolver::resolve(&self.schema, record, explicit, self.block.as_deref())
    }

    /// The record's natural group: block output and attributes only.
    pub fn group_of(&self, record: &R) -> Result<GroupValues, CompositeIdError> {
        self.resolve(record, GroupValues::new())
    }

    /// The composite value of `record`, or `None` if its primary key is null.
    pub fn encode_record(&self, record: &R) -> Result<Option<i128>, CompositeIdError> {
        let primary_key = resolver::lookup_attribute(record, self.schema.primary_key_name())?;
        if primary_key.is_null() {
            return Ok(None);
        }
        let group = self.group_of(record)?;
        self.encode(primary_key, &group)
    }

    //==============================================================================
    // Lookup delegation
    //==============================================================================

    pub fn find_by_composite<S>(
        &self,
        storage: &S,
        composite: Option<i128>,
    ) -> Result<Option<R>, CompositeIdError>
    where
        S: Storage<Record = R>,
    {
        lookup::find_by_composite(&self.schema, storage, composite)
    }

    pub fn find_by_composite_strict<S>(
        &self,
        storage: &S,
        composite: Option<i128>,
    ) -> Result<R, CompositeIdError>
    where
        S: Storage<Record = R>,
    {
        lookup::find_by_composite_strict(&self.schema, storage, composite)
    }
}
