//! Bit-field gather/scatter
//!
//! Every oracle reads its operands out of a basis index and writes its result
//! back through these two functions.

use crate::quantum::state::BasisIndex;

/// Gather the bits of `index` selected by `mask` into a dense, right-aligned
/// value. The lowest mask bit becomes bit 0 of the result.
pub fn extract_field(mask: BasisIndex, index: BasisIndex) -> u64 {
    let mut value = 0;
    let mut target = 0;
    let mut remaining = mask;
    while remaining != 0 {
        let lowest = remaining & remaining.wrapping_neg();
        if index & lowest != 0 {
            value |= 1 << target;
        }
        target += 1;
        remaining &= remaining - 1;
    }
    value
}

/// Spread the low bits of `value` over the positions selected by `mask`.
/// Inverse of [`extract_field`]; bits of `value` beyond the mask width are dropped.
pub fn scatter_field(mask: BasisIndex, value: u64) -> BasisIndex {
    let mut index = 0;
    let mut source = 0;
    let mut remaining = mask;
    while remaining != 0 {
        let lowest = remaining & remaining.wrapping_neg();
        if (value >> source) & 1 != 0 {
            index |= lowest;
        }
        source += 1;
        remaining &= remaining - 1;
    }
    index
}

/// Mask of the `bits` lowest bits
pub fn low_mask(bits: usize) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1 << bits) - 1
    }
}
