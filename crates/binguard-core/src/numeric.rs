//! Fixed-width integer helpers: wrapping arithmetic, min/max, alignment, byte swaps.
//!
//! Generic forms go through [`FixedInt`]. Trait methods cannot run in constant
//! evaluation, so every operation a layout check needs at build time also has a
//! per-width `const fn` form.

use crate::error::{PrimitiveError, PrimitiveResult};

mod sealed {
    pub trait Sealed {}
}

/// Fixed-width integer kinds with defined two's-complement wraparound.
pub trait FixedInt: sealed::Sealed + Copy + Ord + core::fmt::Debug {
    fn wrap_add(self, rhs: Self) -> Self;
    fn wrap_sub(self, rhs: Self) -> Self;
}

macro_rules! impl_fixed_int {
    ($($t:ty),* $(,)?) => {
        $(
            impl sealed::Sealed for $t {}

            impl FixedInt for $t {
                #[inline]
                fn wrap_add(self, rhs: Self) -> Self {
                    self.wrapping_add(rhs)
                }

                #[inline]
                fn wrap_sub(self, rhs: Self) -> Self {
                    self.wrapping_sub(rhs)
                }
            }
        )*
    };
}

impl_fixed_int!(i8, u8, i16, u16, i32, u32, i64, u64, isize, usize);

/// Sum reduced modulo 2^N for an N-bit operand and reinterpreted per the operand's signedness.
#[inline]
pub fn wrapping_add<T: FixedInt>(a: T, b: T) -> T {
    a.wrap_add(b)
}

/// Difference reduced modulo 2^N for an N-bit operand and reinterpreted per the operand's signedness.
#[inline]
pub fn wrapping_sub<T: FixedInt>(a: T, b: T) -> T {
    a.wrap_sub(b)
}

#[inline]
pub fn min<T: FixedInt>(a: T, b: T) -> T {
    if b < a { b } else { a }
}

#[inline]
pub fn max<T: FixedInt>(a: T, b: T) -> T {
    if b > a { b } else { a }
}

macro_rules! const_ops {
    ($($t:ty => $add:ident, $sub:ident, $min:ident, $max:ident;)*) => {
        $(
            #[inline]
            #[must_use]
            pub const fn $add(a: $t, b: $t) -> $t {
                a.wrapping_add(b)
            }

            #[inline]
            #[must_use]
            pub const fn $sub(a: $t, b: $t) -> $t {
                a.wrapping_sub(b)
            }

            #[inline]
            #[must_use]
            pub const fn $min(a: $t, b: $t) -> $t {
                if b < a { b } else { a }
            }

            #[inline]
            #[must_use]
            pub const fn $max(a: $t, b: $t) -> $t {
                if b > a { b } else { a }
            }
        )*
    };
}

const_ops! {
    i8 => wrapping_add_i8, wrapping_sub_i8, min_i8, max_i8;
    u8 => wrapping_add_u8, wrapping_sub_u8, min_u8, max_u8;
    i16 => wrapping_add_i16, wrapping_sub_i16, min_i16, max_i16;
    u16 => wrapping_add_u16, wrapping_sub_u16, min_u16, max_u16;
    i32 => wrapping_add_i32, wrapping_sub_i32, min_i32, max_i32;
    u32 => wrapping_add_u32, wrapping_sub_u32, min_u32, max_u32;
    i64 => wrapping_add_i64, wrapping_sub_i64, min_i64, max_i64;
    u64 => wrapping_add_u64, wrapping_sub_u64, min_u64, max_u64;
}

#[inline]
#[must_use]
pub const fn umin(a: usize, b: usize) -> usize {
    if b < a { b } else { a }
}

#[inline]
#[must_use]
pub const fn umax(a: usize, b: usize) -> usize {
    if b > a { b } else { a }
}

#[inline]
#[must_use]
pub const fn imin(a: i64, b: i64) -> i64 {
    if b < a { b } else { a }
}

#[inline]
#[must_use]
pub const fn imax(a: i64, b: i64) -> i64 {
    if b > a { b } else { a }
}

macro_rules! align_ops {
    ($t:ty, $down:ident, $up:ident, $gap:ident, $try_down:ident, $try_up:ident) => {
        /// Rounds `value` down (toward negative infinity) to a multiple of `alignment`.
        ///
        /// # Panics
        ///
        /// Panics if `alignment` is not a power of two.
        #[inline]
        #[must_use]
        pub const fn $down(value: $t, alignment: $t) -> $t {
            assert!(alignment.is_power_of_two(), "alignment must be a power of two");
            value & !(alignment - 1)
        }

        /// Rounds `value` up to a multiple of `alignment`.
        ///
        /// # Panics
        ///
        /// Panics if `alignment` is not a power of two or the result does not fit.
        #[inline]
        #[must_use]
        pub const fn $up(value: $t, alignment: $t) -> $t {
            assert!(alignment.is_power_of_two(), "alignment must be a power of two");
            let mask = alignment - 1;
            match value.checked_add(mask) {
                Some(bumped) => bumped & !mask,
                None => panic!("align_up overflows"),
            }
        }

        /// Distance from `value` to the next multiple of `alignment` (0 if aligned).
        ///
        /// Never overflows, even when the rounded-up value would.
        #[inline]
        #[must_use]
        pub const fn $gap(value: $t, alignment: $t) -> $t {
            assert!(alignment.is_power_of_two(), "alignment must be a power of two");
            let mask = alignment - 1;
            alignment.wrapping_sub(value & mask) & mask
        }

        pub fn $try_down(value: $t, alignment: $t) -> PrimitiveResult<$t> {
            if !alignment.is_power_of_two() {
                return Err(PrimitiveError::AlignmentNotPowerOfTwo {
                    alignment: alignment as u64,
                });
            }
            Ok($down(value, alignment))
        }

        pub fn $try_up(value: $t, alignment: $t) -> PrimitiveResult<$t> {
            if !alignment.is_power_of_two() {
                return Err(PrimitiveError::AlignmentNotPowerOfTwo {
                    alignment: alignment as u64,
                });
            }
            let mask = alignment - 1;
            value
                .checked_add(mask)
                .map(|bumped| bumped & !mask)
                .ok_or(PrimitiveError::AlignmentOverflow {
                    value: value as u64,
                    alignment: alignment as u64,
                })
        }
    };
}

align_ops!(usize, align_down, align_up, align_gap, try_align_down, try_align_up);
align_ops!(
    u64,
    align_down_u64,
    align_up_u64,
    align_gap_u64,
    try_align_down_u64,
    try_align_up_u64
);

#[inline]
#[must_use]
pub const fn bswap16(v: u16) -> u16 {
    v.swap_bytes()
}

#[inline]
#[must_use]
pub const fn bswap32(v: u32) -> u32 {
    v.swap_bytes()
}

#[inline]
#[must_use]
pub const fn bswap64(v: u64) -> u64 {
    v.swap_bytes()
}

const _: () = {
    assert!(wrapping_add_i8(i8::MAX, 2) == i8::MIN + 1);
    assert!(wrapping_add_i16(i16::MAX, 2) == i16::MIN + 1);
    assert!(wrapping_add_i32(i32::MAX, 2) == i32::MIN + 1);
    assert!(wrapping_add_i64(i64::MAX, 2) == i64::MIN + 1);
    assert!(wrapping_sub_i8(i8::MIN, 2) == i8::MAX - 1);
    assert!(wrapping_sub_i16(i16::MIN, 2) == i16::MAX - 1);
    assert!(wrapping_sub_i32(i32::MIN, 2) == i32::MAX - 1);
    assert!(wrapping_sub_i64(i64::MIN, 2) == i64::MAX - 1);
    assert!(umin(0, 1) == 0 && umax(0, 1) == 1);
    assert!(imin(-1, 1) == -1 && imax(-1, 1) == 1);
    assert!(min_i8(-128, 127) == -128 && max_u64(0, u64::MAX) == u64::MAX);
    assert!(min_u16(7, 7) == 7 && max_i32(-5, -6) == -5);
    assert!(align_up(3, 4) == 4 && align_down(3, 4) == 0 && align_gap(3, 4) == 1);
    assert!(bswap16(0x0102) == 0x0201);
    assert!(bswap32(0x0102_0304) == 0x0403_0201);
    assert!(bswap64(0x0102_0304_0506_0708) == 0x0807_0605_0403_0201);
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapping_add_wraps_at_every_width() {
        assert_eq!(wrapping_add(127_i8, 2), -127);
        assert_eq!(wrapping_add(32767_i16, 2), -32767);
        assert_eq!(wrapping_add(2_147_483_647_i32, 2), -2_147_483_647);
        assert_eq!(wrapping_add(i64::MAX, 2), -i64::MAX);
        assert_eq!(wrapping_add(u8::MAX, 1), 0);
        assert_eq!(wrapping_add(u64::MAX, 3), 2);
    }

    #[test]
    fn wrapping_sub_wraps_at_every_width() {
        assert_eq!(wrapping_sub(-127_i8, 2), 127);
        assert_eq!(wrapping_sub(-32767_i16, 2), 32767);
        assert_eq!(wrapping_sub(-2_147_483_647_i32, 2), 2_147_483_647);
        assert_eq!(wrapping_sub(-i64::MAX, 2), i64::MAX);
        assert_eq!(wrapping_sub(0_u16, 1), u16::MAX);
    }

    #[test]
    fn min_max_select_total_order() {
        assert_eq!(min::<i8>(1, 2), 1);
        assert_eq!(min::<i16>(1, 2), 1);
        assert_eq!(min(1_i64, 2), 1);
        assert_eq!(max::<i8>(1, 2), 2);
        assert_eq!(max(1_i32, 2), 2);
        assert_eq!(max(-5_i32, -6), -5);
        assert_eq!(umin(1, 0), 0);
        assert_eq!(umax(1, 0), 1);
        assert_eq!(umin(0, 0), 0);
        assert_eq!(umax(0, 0), 0);
    }

    #[test]
    fn alignment_by_four() {
        let down: Vec<usize> = (0..=4).map(|v| align_down(v, 4)).collect();
        let up: Vec<usize> = (0..=4).map(|v| align_up(v, 4)).collect();
        let gap: Vec<usize> = (0..=4).map(|v| align_gap(v, 4)).collect();
        assert_eq!(down, [0, 0, 0, 0, 4]);
        assert_eq!(up, [0, 4, 4, 4, 4]);
        assert_eq!(gap, [0, 3, 2, 1, 0]);
    }

    #[test]
    fn align_down_never_exceeds_value() {
        assert_eq!(align_down_u64(u64::MAX, 0x1000), u64::MAX - 0xfff);
        assert_eq!(align_down(0x1fff, 0x1000), 0x1000);
        for v in [1_u64, 7, 0x200, 0x3ff] {
            assert!(align_down_u64(v, 0x200) <= v);
        }
    }

    #[test]
    fn alignment_u64_file_offsets() {
        assert_eq!(align_up_u64(0x1001, 0x1000), 0x2000);
        assert_eq!(align_down_u64(0x1fff, 0x1000), 0x1000);
        assert_eq!(align_gap_u64(0x1001, 0x1000), 0xfff);
        assert_eq!(align_gap_u64(u64::MAX, 8), 1);
    }

    #[test]
    fn alignment_one_is_identity() {
        for v in [0_usize, 1, 7, usize::MAX] {
            assert_eq!(align_down(v, 1), v);
            assert_eq!(align_up(v, 1), v);
            assert_eq!(align_gap(v, 1), 0);
        }
    }

    #[test]
    #[should_panic(expected = "power of two")]
    fn align_up_rejects_non_power_of_two() {
        let _ = align_up(5, 12);
    }

    #[test]
    #[should_panic(expected = "overflows")]
    fn align_up_overflow_is_fatal() {
        let _ = align_up(usize::MAX, 16);
    }

    #[test]
    fn try_align_reports_preconditions() {
        assert_eq!(
            try_align_up(5, 12),
            Err(PrimitiveError::AlignmentNotPowerOfTwo { alignment: 12 })
        );
        assert_eq!(
            try_align_down(5, 0),
            Err(PrimitiveError::AlignmentNotPowerOfTwo { alignment: 0 })
        );
        assert_eq!(
            try_align_up_u64(u64::MAX, 16),
            Err(PrimitiveError::AlignmentOverflow {
                value: u64::MAX,
                alignment: 16
            })
        );
        assert_eq!(try_align_up(5, 8), Ok(8));
        assert_eq!(try_align_down_u64(13, 8), Ok(8));
    }
}
