//! This module contains the pure, stateless kernels for mixed-radix packing and
//! unpacking.
//!
//! A mixed-radix number gives every digit position its own base, like
//! hours:minutes:seconds. `pack` folds digits most-significant first using
//! Horner's scheme; `unpack` peels them off least-significant first and is its
//! exact inverse. All reductions use floored (Euclidean) modulo so negative
//! inputs land in `[0, radix)`. The kernels know nothing about field names.

use crate::error::CompositeIdError;

//==================================================================================
// 1. Radix Helpers
//==================================================================================

/// The product of all radices, or `None` if it does not fit an `i128`.
pub fn modulus(radices: &[u64]) -> Option<i128> {
    radices
        .iter()
        .try_fold(1i128, |acc, &r| acc.checked_mul(r as i128))
}

/// The number of bits needed to hold `total` distinct values, i.e. `ceil(log2(total))`.
pub fn bits_for_total(total: u64) -> u32 {
    if total <= 1 {
        0
    } else {
        u64::BITS - (total - 1).leading_zeros()
    }
}

//==================================================================================
// 2. Public API
//==================================================================================

/// Packs `digits` into one integer, most-significant first.
///
/// Each digit is reduced into `[0, radix)` before accumulation, so out-of-range
/// digits are folded rather than rejected.
pub fn pack(radices: &[u64], digits: &[i128]) -> Result<i128, CompositeIdError> {
    if radices.len() != digits.len() {
        return Err(CompositeIdError::Configuration(format!(
            "cannot pack {} digits against {} radices",
            digits.len(),
            radices.len()
        )));
    }

    radices
        .iter()
        .zip(digits)
        .try_fold(0i128, |acc, (&radix, &digit)| {
            let radix = radix as i128;
            acc.checked_mul(radix)
                .and_then(|shifted| shifted.checked_add(digit.rem_euclid(radix)))
                .ok_or_else(|| CompositeIdError::Overflow("packing group digits".to_string()))
        })
}

/// Unpacks the low-order digits of `value` into `output_buf`, in declared
/// (most-significant first) order, and returns whatever magnitude remains above
/// the last radix.
pub fn unpack(value: i128, radices: &[u64], output_buf: &mut Vec<u64>) -> i128 {
    output_buf.clear();
    output_buf.reserve(radices.len());

    let mut remaining = value;
    for &radix in radices.iter().rev() {
        let radix = radix as i128;
        // rem_euclid keeps the digit in [0, radix) which always fits a u64 radix.
        output_buf.push(remaining.rem_euclid(radix) as u64);
        remaining = remaining.div_euclid(radix);
    }
    output_buf.reverse();
    remaining
}
