//! Scoped deleters for partially-acquired heap resources.
//!
//! A loader that builds `N` buffers one at a time must free exactly the ones it
//! got if a later step fails. [`ScopedDeleter`] takes a run of pointer slots
//! and, when it goes out of scope, releases the first `count` of them:
//!
//! ```text
//!   slots:  [ p0 | p1 | null | p3 | ?? | ?? ]
//!             \_________ count = 4 _/   never touched
//!   drop:   [ null | null | null | null | ?? | ?? ]   p0, p1, p3 released once
//! ```
//!
//! The guard borrows the slot storage exclusively. While it lives, slots are
//! read and written only through the guard: [`get`](ScopedDeleter::get) and
//! [`take`](ScopedDeleter::take) are safe, storing a pointer the guard did not
//! allocate itself is `unsafe`. The count is a [`Cell`], so progress can be
//! recorded through a shared `&ScopedDeleter`.
//!
//! Three release strategies cover the allocation families a binary processor
//! mixes: [`ObjectRelease`] (`Box<T>`), [`ArrayRelease`] (`Box<[T]>`) and
//! [`MallocRelease`] (`libc::malloc`, no destructor).

use std::cell::Cell;
use std::fmt;
use std::marker::PhantomData;
use std::ptr;

use binguard_core::{HeapAllocation, PrimitiveError, PrimitiveResult};

use crate::lifecycle;

/// Release operation for one allocation family.
pub trait Release {
    /// Pointer type stored in a guarded slot.
    type Slot: Copy;
    /// Short label used in lifecycle records.
    const NAME: &'static str;

    fn null() -> Self::Slot;
    fn is_null(slot: Self::Slot) -> bool;

    /// Releases a non-null slot value.
    ///
    /// # Safety
    ///
    /// `slot` must come from this family's allocation operation and must not be
    /// released again.
    unsafe fn release(slot: Self::Slot);
}

/// Destroys one object allocated with `Box<T>`.
pub struct ObjectRelease<T>(PhantomData<T>);

/// Destroys a contiguous sequence allocated with `Box<[T]>`.
pub struct ArrayRelease<T>(PhantomData<T>);

/// Frees a raw block obtained from `libc::malloc` without running destructors.
pub struct MallocRelease<T>(PhantomData<T>);

impl<T> Release for ObjectRelease<T> {
    type Slot = *mut T;
    const NAME: &'static str = "object";

    #[inline]
    fn null() -> *mut T {
        ptr::null_mut()
    }

    #[inline]
    fn is_null(slot: *mut T) -> bool {
        slot.is_null()
    }

    unsafe fn release(slot: *mut T) {
        // SAFETY: caller guarantees `slot` came from `Box::into_raw`.
        drop(unsafe { Box::from_raw(slot) });
    }
}

impl<T> Release for ArrayRelease<T> {
    type Slot = *mut [T];
    const NAME: &'static str = "array";

    #[inline]
    fn null() -> *mut [T] {
        ptr::slice_from_raw_parts_mut(ptr::null_mut(), 0)
    }

    #[inline]
    fn is_null(slot: *mut [T]) -> bool {
        slot.is_null()
    }

    unsafe fn release(slot: *mut [T]) {
        // SAFETY: caller guarantees `slot` came from `Box::<[T]>::into_raw`.
        drop(unsafe { Box::from_raw(slot) });
    }
}

impl<T> Release for MallocRelease<T> {
    type Slot = *mut T;
    const NAME: &'static str = "malloc";

    #[inline]
    fn null() -> *mut T {
        ptr::null_mut()
    }

    #[inline]
    fn is_null(slot: *mut T) -> bool {
        slot.is_null()
    }

    unsafe fn release(slot: *mut T) {
        // SAFETY: caller guarantees `slot` came from `libc::malloc`.
        unsafe { libc::free(slot.cast()) };
    }
}

/// Releases the first `count` slots of its storage when dropped.
///
/// The storage stays borrowed until the guard is gone, so safe code cannot
/// plant a pointer the guard would then release:
///
/// ```compile_fail
/// use binguard_membrane::{ObjectDeleter, ObjectRelease, null_slots};
///
/// let mut slots = null_slots::<ObjectRelease<u32>, 2>();
/// let guard = ObjectDeleter::<u32>::new(&mut slots);
/// guard.adopt(Box::new(1));
/// guard.adopt(Box::new(2));
/// slots[1] = slots[0];
/// drop(guard);
/// ```
pub struct ScopedDeleter<'a, R: Release> {
    slots: &'a [Cell<R::Slot>],
    count: Cell<usize>,
    _release: PhantomData<R>,
}

pub type ObjectDeleter<'a, T> = ScopedDeleter<'a, ObjectRelease<T>>;
pub type ArrayDeleter<'a, T> = ScopedDeleter<'a, ArrayRelease<T>>;
pub type MallocDeleter<'a, T> = ScopedDeleter<'a, MallocRelease<T>>;

/// Fresh slot storage with every slot null.
#[must_use]
pub fn null_slots<R: Release, const N: usize>() -> [R::Slot; N] {
    std::array::from_fn(|_| R::null())
}

impl<'a, R: Release> ScopedDeleter<'a, R> {
    fn bind(slots: &'a mut [R::Slot], count: usize) -> Self {
        Self {
            slots: Cell::from_mut(slots).as_slice_of_cells(),
            count: Cell::new(count),
            _release: PhantomData,
        }
    }

    /// Takes `slots` with an active count of zero.
    pub fn new(slots: &'a mut [R::Slot]) -> Self {
        lifecycle::on_guard_created(R::NAME, 0, slots.len());
        Self::bind(slots, 0)
    }

    /// Takes a single slot with an active count of zero.
    pub fn single(slot: &'a mut R::Slot) -> Self {
        Self::new(std::slice::from_mut(slot))
    }

    /// Takes a single slot that is already counted as owned.
    ///
    /// The slot may still be null and be filled later with
    /// [`replace`](Self::replace).
    ///
    /// # Safety
    ///
    /// Same contract as [`ScopedDeleter::with_count`] with a count of one.
    pub unsafe fn armed(slot: &'a mut R::Slot) -> Self {
        // SAFETY: forwarded to the caller.
        unsafe { Self::with_count(std::slice::from_mut(slot), 1) }
    }

    /// Takes `slots` with `count` leading slots already owned.
    ///
    /// # Safety
    ///
    /// Every non-null value in `slots[..count]`, and in any slot later covered
    /// by [`increment_count`](Self::increment_count), must come from `R`'s
    /// allocation operation and be released by nothing but this guard.
    ///
    /// # Panics
    ///
    /// Panics if `count` exceeds `slots.len()`.
    pub unsafe fn with_count(slots: &'a mut [R::Slot], count: usize) -> Self {
        // SAFETY: forwarded to the caller.
        match unsafe { Self::try_with_count(slots, count) } {
            Ok(guard) => guard,
            Err(err) => panic!("{err}"),
        }
    }

    /// Like [`with_count`](Self::with_count) but reports an oversized count.
    ///
    /// # Safety
    ///
    /// See [`ScopedDeleter::with_count`].
    pub unsafe fn try_with_count(
        slots: &'a mut [R::Slot],
        count: usize,
    ) -> PrimitiveResult<Self> {
        let capacity = slots.len();
        if count > capacity {
            lifecycle::on_capacity_rejected(R::NAME, count, capacity);
            return Err(PrimitiveError::CountExceedsCapacity { count, capacity });
        }
        lifecycle::on_guard_created(R::NAME, count, capacity);
        Ok(Self::bind(slots, count))
    }

    /// Number of leading slots currently owned.
    #[inline]
    pub fn count(&self) -> usize {
        self.count.get()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.count.get() == self.slots.len()
    }

    /// Current value of slot `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn get(&self, index: usize) -> R::Slot {
        self.slots[index].get()
    }

    /// Nulls slot `index` and hands its value back to the caller, who then
    /// owns whatever it points to. The count is unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn take(&self, index: usize) -> R::Slot {
        self.slots[index].replace(R::null())
    }

    /// Stores `slot` at `index` and returns the previous value unreleased.
    ///
    /// # Safety
    ///
    /// If `index` is below the count, now or after a later
    /// [`increment_count`](Self::increment_count), `slot` must be null or come
    /// from `R`'s allocation operation, and nothing else may release it.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub unsafe fn replace(&self, index: usize, slot: R::Slot) -> R::Slot {
        self.slots[index].replace(slot)
    }

    /// Records that slot `count()` now holds an owned pointer.
    ///
    /// # Safety
    ///
    /// The slot at index `count()` must be null or hold a pointer from `R`'s
    /// allocation operation that nothing else will release.
    ///
    /// # Panics
    ///
    /// Panics if every slot is already counted.
    pub unsafe fn increment_count(&self) {
        let capacity = self.slots.len();
        let next = self.count.get() + 1;
        if next > capacity {
            lifecycle::on_capacity_rejected(R::NAME, next, capacity);
            panic!(
                "{}",
                PrimitiveError::CountExceedsCapacity {
                    count: next,
                    capacity
                }
            );
        }
        self.count.set(next);
    }

    /// Stores `slot` at index `count()` and counts it.
    fn push(&self, slot: R::Slot) {
        let index = self.count.get();
        self.slots[index].set(slot);
        self.count.set(index + 1);
        lifecycle::on_slot_adopted(R::NAME, index);
    }

    fn assert_room(&self) {
        let capacity = self.slots.len();
        let count = self.count.get();
        if count >= capacity {
            lifecycle::on_capacity_rejected(R::NAME, count + 1, capacity);
            panic!(
                "{}",
                PrimitiveError::CountExceedsCapacity {
                    count: count + 1,
                    capacity
                }
            );
        }
    }

    /// Releases the owned slots now instead of at scope exit.
    pub fn release_now(self) {
        drop(self);
    }
}

impl<T: HeapAllocation> ScopedDeleter<'_, ObjectRelease<T>> {
    /// Takes ownership of `value`, storing it in the next slot.
    ///
    /// Returns the stored pointer; it stays valid until the guard drops.
    pub fn adopt(&self, value: Box<T>) -> *mut T {
        const { assert!(T::PERMITTED, "type forbids heap allocation") };
        self.assert_room();
        let raw = Box::into_raw(value);
        self.push(raw);
        raw
    }
}

impl<T: HeapAllocation> ScopedDeleter<'_, ArrayRelease<T>> {
    /// Takes ownership of a boxed sequence, storing it in the next slot.
    pub fn adopt(&self, values: Box<[T]>) -> *mut [T] {
        const { assert!(T::PERMITTED, "type forbids heap allocation") };
        self.assert_room();
        let raw = Box::into_raw(values);
        self.push(raw);
        raw
    }

    pub fn adopt_vec(&self, values: Vec<T>) -> *mut [T] {
        self.adopt(values.into_boxed_slice())
    }
}

impl<T> ScopedDeleter<'_, MallocRelease<T>> {
    /// Mallocs `size_of::<T>()` bytes (at least one) into the next slot.
    ///
    /// Returns `None` without counting anything if the allocation fails. The
    /// block is uninitialized.
    pub fn allocate(&self) -> Option<*mut T> {
        self.allocate_bytes(size_of::<T>().max(1))
    }

    /// Mallocs `size` bytes into the next slot.
    ///
    /// Returns `None` without counting anything if the allocation fails or
    /// the block is not aligned for `T`.
    pub fn allocate_bytes(&self, size: usize) -> Option<*mut T> {
        self.assert_room();
        // SAFETY: plain allocation; ownership is recorded below or the block
        // is freed immediately.
        let raw = unsafe { libc::malloc(size.max(1)) }.cast::<T>();
        if raw.is_null() {
            return None;
        }
        if !raw.is_aligned() {
            // SAFETY: `raw` came from `libc::malloc` and was never published.
            unsafe { libc::free(raw.cast()) };
            return None;
        }
        self.push(raw);
        Some(raw)
    }
}

impl<R: Release> Drop for ScopedDeleter<'_, R> {
    fn drop(&mut self) {
        let count = self.count.get();
        let mut released = 0;
        let mut skipped = 0;
        for slot in &self.slots[..count] {
            let value = slot.replace(R::null());
            if R::is_null(value) {
                skipped += 1;
                continue;
            }
            // SAFETY: slots below `count` are owned by this guard per the
            // construction and `increment_count` contracts; the slot is nulled
            // before release, so it cannot be released twice.
            unsafe { R::release(value) };
            released += 1;
        }
        lifecycle::on_guard_released(R::NAME, count, released, skipped);
    }
}

impl<R: Release> fmt::Debug for ScopedDeleter<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedDeleter")
            .field("variant", &R::NAME)
            .field("count", &self.count.get())
            .field("capacity", &self.slots.len())
            .finish()
    }
}
