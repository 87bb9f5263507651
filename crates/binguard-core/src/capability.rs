//! Per-type capability declarations.
//!
//! Some header and descriptor types must never live on the general heap (they
//! alias file mappings or are meant to be embedded by value), and some must
//! never be duplicated. Each type states that for itself:
//!
//! - [`HeapAllocation`] records whether boxing the type is permitted. The
//!   declaration does not propagate: a struct wrapping a restricted type is
//!   unrestricted unless it declares otherwise, and a restricted wrapper may
//!   contain unrestricted fields. The same holds for types used behind trait
//!   objects.
//! - [`NonCopyable`] is a zero-sized field that keeps `Clone`/`Copy` from being
//!   derived on the containing type.

use crate::tribool::{TriBool, TriStorage};

/// Whether values of a type may be placed on the heap by binguard APIs.
pub trait HeapAllocation {
    const PERMITTED: bool;
}

/// Declares types as heap-allocatable.
#[macro_export]
macro_rules! permit_heap {
    ($($t:ty),* $(,)?) => {
        $(
            impl $crate::capability::HeapAllocation for $t {
                const PERMITTED: bool = true;
            }
        )*
    };
}

/// Declares types as never heap-allocated through binguard APIs.
#[macro_export]
macro_rules! forbid_heap {
    ($($t:ty),* $(,)?) => {
        $(
            impl $crate::capability::HeapAllocation for $t {
                const PERMITTED: bool = false;
            }
        )*
    };
}

permit_heap!(
    i8, u8, i16, u16, i32, u32, i64, u64, i128, u128, isize, usize, f32, f64, bool, char
);

impl<T: HeapAllocation, const N: usize> HeapAllocation for [T; N] {
    const PERMITTED: bool = T::PERMITTED;
}

impl<U: TriStorage, const THIRD_IS_TRUE: bool> HeapAllocation for TriBool<U, THIRD_IS_TRUE> {
    const PERMITTED: bool = true;
}

/// Boxes `value`; rejected at compile time for types that forbid the heap.
///
/// A permitted type boxes and coerces to a trait object as usual; a
/// forbidden sibling with the same trait does not build:
///
/// ```compile_fail
/// use binguard_core::capability::heap_new;
/// use binguard_core::{forbid_heap, permit_heap};
///
/// trait Stub {}
/// struct Open;
/// struct Pinned;
/// impl Stub for Open {}
/// impl Stub for Pinned {}
/// permit_heap!(Open);
/// forbid_heap!(Pinned);
///
/// let _ok: Box<dyn Stub> = heap_new(Open);
/// let _rejected: Box<dyn Stub> = heap_new(Pinned);
/// ```
#[inline]
pub fn heap_new<T: HeapAllocation>(value: T) -> Box<T> {
    const { assert!(T::PERMITTED, "type forbids heap allocation") };
    Box::new(value)
}

/// Zero-sized marker that makes its containing type non-copyable.
#[derive(Debug, Default, PartialEq, Eq, Hash)]
pub struct NonCopyable {
    _private: (),
}

impl NonCopyable {
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Test {
        _nc: NonCopyable,
        v: i32,
    }

    // SAFETY: an `i32` and a zero-sized marker, both zero-valid, no drop glue.
    #[allow(unsafe_code)]
    unsafe impl crate::zero::ZeroBits for Test {}

    const X: Test = Test {
        _nc: NonCopyable::new(),
        v: 1,
    };

    #[test]
    fn non_copyable_is_free_and_const() {
        assert_eq!(size_of::<NonCopyable>(), 0);
        assert_eq!(size_of::<Test>(), size_of::<i32>());
        const { assert!(X.v == 1) };
        let mut t = Test {
            _nc: NonCopyable::default(),
            v: 1,
        };
        assert_eq!(t.v, 1);
        crate::zero::mem_clear(&mut t);
        assert_eq!(t.v, 0);
    }

    #[test]
    fn primitives_and_arrays_are_permitted() {
        assert!(<u16 as HeapAllocation>::PERMITTED);
        assert!(<[u32; 4] as HeapAllocation>::PERMITTED);
        assert!(<TriBool<u8> as HeapAllocation>::PERMITTED);
        let b = heap_new(7_u64);
        assert_eq!(*b, 7);
    }

    struct Pinned(#[allow(dead_code)] u32);
    forbid_heap!(Pinned);

    #[test]
    fn arrays_inherit_from_element() {
        assert!(!<Pinned as HeapAllocation>::PERMITTED);
        assert!(!<[Pinned; 2] as HeapAllocation>::PERMITTED);
    }
}
