//! This file is the root of the `composite_id` Rust crate.
//!
//! A composite id is a single integer that packs a record's primary key together
//! with bounded group values (shard, partition, type code), so the group can be
//! read back from the id alone and lookups by id can be redirected to lookups by
//! primary key:
//!
//! ```text
//! composite = primary_key * group_modulus + mixed_radix(group values)
//! ```
//!
//! # Example
//! ```
//! use composite_id::{Codec, RawValue, Record, SchemaConfig};
//!
//! struct Bill {
//!     id: i64,
//!     client_id: i64,
//! }
//!
//! impl Record for Bill {
//!     fn attribute(&self, name: &str) -> Option<RawValue> {
//!         match name {
//!             "id" => Some(self.id.into()),
//!             "client_id" => Some(self.client_id.into()),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let codec = Codec::<Bill>::new(SchemaConfig::by_totals([("client_id", 10)])).unwrap();
//! let unique = codec.encode_record(&Bill { id: 431, client_id: 2 }).unwrap();
//! assert_eq!(unique, Some(4312));
//! assert_eq!(codec.decode_primary_key(unique), Some(431));
//! assert_eq!(codec.decode_group(unique).unwrap()["client_id"], 2);
//! ```

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//==================================================================================
// 1. Module Declarations
//==================================================================================
pub mod bridge;
pub mod codec;
pub mod config;
pub mod error;
pub mod kernels;
pub mod observability;
pub mod resolver;
pub mod schema;
pub mod traits;
pub mod types;

//==================================================================================
// 2. Public Re-exports
//==================================================================================
pub use bridge::{Codec, CodecBuilder};
pub use config::{FieldDeclarations, SchemaConfig, SchemaSpec};
pub use error::CompositeIdError;
pub use schema::{Field, RadixSchema};
pub use traits::{Record, Storage};
pub use types::{group, DecodedGroup, GroupValues, RawValue};
