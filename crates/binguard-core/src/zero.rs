//! Zero-bit clearing for plain-data types.
//!
//! Header buffers are routinely cleared in bulk before being filled from a
//! file. [`ZeroBits`] marks the types for which that is sound, and
//! [`mem_clear`] performs it.

use crate::capability::NonCopyable;
use crate::tribool::{TriBool, TriStorage};

/// Types for which the all-zero byte pattern is a valid value.
///
/// Copyability is not required: a struct carrying a [`NonCopyable`] field can
/// be cleared as long as it has no drop glue.
///
/// # Safety
///
/// Implementors must be valid when every byte of their storage is zero and must
/// not have drop glue.
pub unsafe trait ZeroBits {}

macro_rules! zero_bits {
    ($($t:ty),* $(,)?) => {
        $(
            // SAFETY: integers and bool accept all-zero storage.
            unsafe impl ZeroBits for $t {}
        )*
    };
}

zero_bits!(i8, u8, i16, u16, i32, u32, i64, u64, i128, u128, isize, usize, bool);

// SAFETY: zero-sized, so there are no bytes to clear.
unsafe impl ZeroBits for NonCopyable {}

// SAFETY: an array is zero-valid when its element is.
unsafe impl<T: ZeroBits, const N: usize> ZeroBits for [T; N] {}

// SAFETY: `TriBool` is `repr(transparent)` over its storage integer, and the
// zero integer is its canonical `False`.
unsafe impl<U: TriStorage + ZeroBits, const THIRD_IS_TRUE: bool> ZeroBits
    for TriBool<U, THIRD_IS_TRUE>
{
}

/// Overwrites every byte of `value` with zero.
#[inline]
pub fn mem_clear<T: ZeroBits>(value: &mut T) {
    const { assert!(!core::mem::needs_drop::<T>(), "cleared type has drop glue") };
    // SAFETY: `value` is a unique, aligned, initialized reference and the
    // all-zero pattern is valid for `T` per the `ZeroBits` contract.
    unsafe {
        core::ptr::write_bytes(value as *mut T, 0, 1);
    }
}
