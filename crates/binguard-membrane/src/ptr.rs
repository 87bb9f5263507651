//! Pointer reinterpretation that keeps mutability intact.
//!
//! `ptr_static_cast` never turns a `*const` into a `*mut`; nested pointer
//! shapes (`*const *const T`, `*mut *const T`, ...) work because the pointee is
//! itself just another sized type. All the plain casts are `const fn`.

/// Reinterprets a const pointer's element type.
#[inline]
#[must_use]
pub const fn ptr_static_cast<T: ?Sized, U>(p: *const T) -> *const U {
    p.cast::<U>()
}

/// Reinterprets a mut pointer's element type.
#[inline]
#[must_use]
pub const fn ptr_static_cast_mut<T: ?Sized, U>(p: *mut T) -> *mut U {
    p.cast::<U>()
}

/// Cast allowed only when `T` is at least as aligned as `U`, checked at build time.
///
/// This is the cast to use for typed views into byte-aligned buffers going the
/// other way round, e.g. `*const u64` to `*const u8`.
#[inline]
#[must_use]
pub const fn ptr_compatible_cast<T, U>(p: *const T) -> *const U {
    const { assert!(align_of::<T>() >= align_of::<U>(), "target is more strictly aligned") };
    p.cast::<U>()
}

/// Returns `None` when a non-null pointer is misaligned for `U`.
#[inline]
#[must_use]
pub fn checked_ptr_cast<T: ?Sized, U>(p: *const T) -> Option<*const U> {
    let q = p.cast::<U>();
    (q.is_null() || q.is_aligned()).then_some(q)
}

/// Method form of [`ptr_static_cast`] / [`ptr_static_cast_mut`].
pub trait PtrStaticCast {
    type Cast<U>;

    fn static_cast<U>(self) -> Self::Cast<U>;
}

impl<T: ?Sized> PtrStaticCast for *const T {
    type Cast<U> = *const U;

    #[inline]
    fn static_cast<U>(self) -> *const U {
        self.cast()
    }
}

impl<T: ?Sized> PtrStaticCast for *mut T {
    type Cast<U> = *mut U;

    #[inline]
    fn static_cast<U>(self) -> *mut U {
        self.cast()
    }
}
