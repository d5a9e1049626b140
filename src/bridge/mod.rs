// In: src/bridge/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Bridge Layer
// ====================================================================================
//
// The `bridge` is the public-facing API of the composite-id library. It binds the
// pure, name-agnostic kernels and the schema-level codec to a host record type.
//
// Declaration (once per record type):
//
//   SchemaConfig [+ computed block] -> CodecBuilder::build -> Codec<R>
//                                        `-> RadixSchema::build (all validation)
//
// Encoding (once per record):
//
//   record -> resolver::resolve (explicit -> block -> attributes)
//          -> codec::encode_group (mixed_radix::pack)
//          -> primary_key * group_modulus + group_value
//
// Decoding / lookup (once per composite value):
//
//   composite -> codec::decode_primary_key -> Storage::find_by_primary_key
//             -> codec::decode_group (mixed_radix::unpack)
//
// ====================================================================================
pub mod codec;
pub mod lookup;

pub use codec::{Codec, CodecBuilder};
pub use lookup::{find_by_composite, find_by_composite_strict};
