// In: src/error.rs

//! This module defines the single, unified error type for the entire composite-id library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompositeIdError {
    // =========================================================================
    // === Schema Errors (raised at build time, never deferred to call time)
    // =========================================================================
    #[error("Invalid schema configuration: {0}")]
    Configuration(String),

    // =========================================================================
    // === Value Errors (raised at encode/resolve time)
    // =========================================================================
    #[error("field `{field}` must not be null")]
    NullValue { field: String },

    #[error("field `{field}` must be integer-coercible, `{value}` given")]
    NotIntegerCoercible { field: String, value: String },

    /// Keys supplied by the caller or by a computed block that the schema does not declare.
    #[error("unknown group keys for this schema: {}", .keys.join(", "))]
    SchemaMismatch { keys: Vec<String> },

    #[error("record has no attribute `{name}` at instance or type level")]
    MissingAttribute { name: String },

    #[error("integer overflow while {0}")]
    Overflow(String),

    #[error("cannot look up a record without a primary key")]
    MissingPrimaryKey,

    // =========================================================================
    // === External Error Wrappers
    // =========================================================================
    /// A failure raised by the host storage collaborator, passed through unchanged.
    #[error(transparent)]
    Storage(Box<dyn std::error::Error + Send + Sync + 'static>),

    /// An error originating from the underlying I/O subsystem (e.g. opening a log file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error from the Serde JSON library, typically while parsing a schema configuration.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

impl CompositeIdError {
    /// Wraps an error raised by a storage collaborator.
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        CompositeIdError::Storage(Box::new(err))
    }
}
