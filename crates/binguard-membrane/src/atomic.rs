//! Atomic views over plain storage.
//!
//! A pointer to a fundamental value of at most pointer width can be viewed as a
//! pointer to the matching `core::sync::atomic` type, then exchanged in place.
//! Widths the target has no native atomics for are simply not implemented.

use std::sync::atomic::Ordering;

/// Maps a plain type to its same-layout atomic counterpart.
///
/// # Safety
///
/// `Self::Atomic` must have the same size as `Self`, an alignment no smaller
/// than `Self`'s, and an identical bit representation.
pub unsafe trait AtomicView: Copy {
    type Atomic;

    /// Stores `value` and returns the previous value.
    fn swap(atomic: &Self::Atomic, value: Self, order: Ordering) -> Self;
}

macro_rules! atomic_view_int {
    ($($width:literal => $($t:ty : $atomic:ident),+;)*) => {
        $($(
            #[cfg(target_has_atomic = $width)]
            // SAFETY: the std atomic integers share size and bit layout with
            // their primitive and are at least as aligned.
            unsafe impl AtomicView for $t {
                type Atomic = std::sync::atomic::$atomic;

                #[inline]
                fn swap(atomic: &Self::Atomic, value: Self, order: Ordering) -> Self {
                    atomic.swap(value, order)
                }
            }
        )+)*
    };
}

atomic_view_int! {
    "8" => i8: AtomicI8, u8: AtomicU8;
    "16" => i16: AtomicI16, u16: AtomicU16;
    "32" => i32: AtomicI32, u32: AtomicU32;
    "64" => i64: AtomicI64, u64: AtomicU64;
    "ptr" => isize: AtomicIsize, usize: AtomicUsize;
}

#[cfg(target_has_atomic = "ptr")]
// SAFETY: `AtomicPtr<T>` has the same in-memory representation as `*mut T`.
unsafe impl<T> AtomicView for *mut T {
    type Atomic = std::sync::atomic::AtomicPtr<T>;

    #[inline]
    fn swap(atomic: &Self::Atomic, value: Self, order: Ordering) -> Self {
        atomic.swap(value, order)
    }
}

#[cfg(target_has_atomic = "ptr")]
// SAFETY: `*const T` and `*mut T` share layout, so the `AtomicPtr<T>` view holds.
unsafe impl<T> AtomicView for *const T {
    type Atomic = std::sync::atomic::AtomicPtr<T>;

    #[inline]
    fn swap(atomic: &Self::Atomic, value: Self, order: Ordering) -> Self {
        atomic.swap(value.cast_mut(), order).cast_const()
    }
}

/// Views `p` as a pointer to its atomic counterpart. Null stays null.
#[inline]
#[must_use]
pub const fn atomic_ptr_cast<T: AtomicView>(p: *mut T) -> *const T::Atomic {
    p.cast_const().cast::<T::Atomic>()
}

/// Sequentially consistent exchange: stores `value` at `p`, returns the old value.
///
/// # Safety
///
/// `p` must be non-null, valid for reads and writes, aligned for `T::Atomic`,
/// and every concurrent access to `*p` must be atomic.
#[inline]
pub unsafe fn atomic_exchange<T: AtomicView>(p: *mut T, value: T) -> T {
    // SAFETY: forwarded to the caller.
    unsafe { atomic_exchange_with(p, value, Ordering::SeqCst) }
}

/// [`atomic_exchange`] with a caller-selected memory ordering.
///
/// # Safety
///
/// Same contract as [`atomic_exchange`].
#[inline]
pub unsafe fn atomic_exchange_with<T: AtomicView>(p: *mut T, value: T, order: Ordering) -> T {
    let view = atomic_ptr_cast(p);
    debug_assert!(view.is_aligned(), "atomic_exchange on a misaligned pointer");
    // SAFETY: the caller guarantees `p` is valid and suitably aligned;
    // `AtomicView` guarantees the layouts agree.
    let atomic = unsafe { &*view };
    T::swap(atomic, value, order)
}
