//! Pure, stateless arithmetic kernels used by the codec.

pub mod mixed_radix;
