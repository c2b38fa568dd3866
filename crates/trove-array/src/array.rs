//! The growable contiguous array.
//!
//! [`DynamicArray`] keeps `len` live values at the front of a [`RawBuf`]
//! block; slots `len..capacity` are uninitialized. Every operation that
//! constructs, moves, or drops values does so explicitly through raw
//! pointers, and restores the `len` invariant with a guard when element
//! code (`Clone`, `Default`, iterators, `Drop`) may panic part-way.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;
use std::ops::{Bound, Deref, DerefMut, Index, IndexMut, Range, RangeBounds};
use std::ptr;
use std::slice::{self, SliceIndex};

use trove_core::{AllocError, Allocator, Global, GrowthPolicy};

use crate::error::ArrayError;
use crate::raw::RawBuf;

/// A growable contiguous array over a pluggable allocator.
///
/// # Capacity and reallocation
///
/// Storage is allocated on first growth and grows by at least doubling
/// (see [`GrowthPolicy`]); it never shrinks implicitly. Growth moves every
/// live value into the new block before the old block is released, and
/// a failed allocation leaves the array exactly as it was.
///
/// # Access
///
/// Two tiers, as with any contiguous array:
///
/// - [`at`](DynamicArray::at) is bounds-checked and returns
///   [`ArrayError::OutOfRange`].
/// - `array[i]` panics on an out-of-range index, and
///   [`get_unchecked`](DynamicArray::get_unchecked) is an `unsafe fn`
///   whose out-of-range use is undefined behavior.
///
/// # Example
///
/// ```
/// use trove_array::DynamicArray;
///
/// let mut array = DynamicArray::new();
/// for i in 0..5 {
///     array.push_back(i).unwrap();
/// }
/// array.insert(2, 99).unwrap();
/// assert_eq!(array, [0, 1, 99, 2, 3, 4]);
/// array.erase_range(1..3).unwrap();
/// assert_eq!(array, [0, 2, 3, 4]);
/// ```
pub struct DynamicArray<T, A: Allocator = Global> {
    buf: RawBuf<T, A>,
    len: usize,
    policy: GrowthPolicy,
}

impl<T> DynamicArray<T> {
    /// An empty array on the global allocator. Does not allocate.
    pub fn new() -> Self {
        Self::new_in(Global)
    }

    /// An empty array with room for exactly `capacity` values.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, AllocError> {
        Self::try_with_capacity_in(capacity, Global)
    }

    /// Build an array from the values of `iter`, in order.
    pub fn try_from_iter<I: IntoIterator<Item = T>>(iter: I) -> Result<Self, AllocError> {
        Self::try_from_iter_in(iter, Global)
    }
}

impl<T: Clone> DynamicArray<T> {
    /// An array of `len` clones of `value`.
    pub fn try_from_elem(len: usize, value: &T) -> Result<Self, AllocError> {
        Self::try_from_elem_in(len, value, Global)
    }

    /// An array of clones of the values in `values`.
    pub fn try_from_slice(values: &[T]) -> Result<Self, AllocError> {
        Self::try_from_slice_in(values, Global)
    }
}

impl<T: Default> DynamicArray<T> {
    /// An array of `len` default values.
    pub fn try_with_len(len: usize) -> Result<Self, AllocError> {
        Self::try_with_len_in(len, Global)
    }
}

impl<T, A: Allocator> DynamicArray<T, A> {
    /// An empty array that will allocate from `alloc`. Does not allocate.
    pub fn new_in(alloc: A) -> Self {
        Self::with_policy_in(GrowthPolicy::for_type::<T>(), alloc)
    }

    /// An empty array with an explicit growth policy.
    pub fn with_policy_in(policy: GrowthPolicy, alloc: A) -> Self {
        Self {
            buf: RawBuf::new_in(alloc),
            len: 0,
            policy,
        }
    }

    /// An empty array with room for exactly `capacity` values.
    pub fn try_with_capacity_in(capacity: usize, alloc: A) -> Result<Self, AllocError> {
        let mut array = Self::new_in(alloc);
        array.reserve(capacity)?;
        Ok(array)
    }

    /// Build an array from the values of `iter`, in order.
    ///
    /// If the iterator panics or allocation fails, every value taken so
    /// far is dropped and the storage released before the failure
    /// propagates.
    pub fn try_from_iter_in<I: IntoIterator<Item = T>>(iter: I, alloc: A) -> Result<Self, AllocError> {
        let mut array = Self::new_in(alloc);
        array.try_extend(iter)?;
        Ok(array)
    }

    /// Number of live values.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the array holds no values.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots in the current block.
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// The allocator this array draws from.
    pub fn allocator(&self) -> &A {
        self.buf.allocator()
    }

    /// The growth policy in effect.
    pub fn policy(&self) -> GrowthPolicy {
        self.policy
    }

    /// Pointer to the first slot. Dangling (but aligned) when `capacity == 0`.
    pub fn as_ptr(&self) -> *const T {
        self.buf.ptr()
    }

    /// Mutable pointer to the first slot.
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.buf.ptr()
    }

    /// The live values as a slice.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: the first `len` slots are initialized, and the pointer is
        // non-null and aligned even when nothing is allocated.
        unsafe { slice::from_raw_parts(self.buf.ptr(), self.len) }
    }

    /// The live values as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as in `as_slice`, and `&mut self` guarantees uniqueness.
        unsafe { slice::from_raw_parts_mut(self.buf.ptr(), self.len) }
    }

    /// Bounds-checked access.
    pub fn at(&self, index: usize) -> Result<&T, ArrayError> {
        let len = self.len;
        self.as_slice()
            .get(index)
            .ok_or(ArrayError::OutOfRange { index, len })
    }

    /// Bounds-checked mutable access.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, ArrayError> {
        let len = self.len;
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(ArrayError::OutOfRange { index, len })
    }

    /// Unchecked access.
    ///
    /// # Safety
    ///
    /// `index` must be less than [`len`](DynamicArray::len). An
    /// out-of-range index is undefined behavior.
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        debug_assert!(index < self.len);
        // SAFETY: the caller guarantees `index < len`.
        unsafe { &*self.buf.ptr().add(index) }
    }

    /// Unchecked mutable access.
    ///
    /// # Safety
    ///
    /// `index` must be less than [`len`](DynamicArray::len).
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.len);
        // SAFETY: the caller guarantees `index < len`.
        unsafe { &mut *self.buf.ptr().add(index) }
    }

    /// The first value, if any.
    pub fn front(&self) -> Option<&T> {
        self.as_slice().first()
    }

    /// The first value, mutably.
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().first_mut()
    }

    /// The last value, if any.
    pub fn back(&self) -> Option<&T> {
        self.as_slice().last()
    }

    /// The last value, mutably.
    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().last_mut()
    }

    /// Append `value`, growing first if the block is full.
    ///
    /// On allocation failure the array is unchanged and `value` is dropped.
    pub fn push_back(&mut self, value: T) -> Result<(), AllocError> {
        if self.len == self.buf.capacity() {
            self.grow_for(GrowthPolicy::required(self.len, 1)?)?;
        }
        // SAFETY: `len < capacity`, so the slot exists and is uninitialized.
        unsafe { self.buf.ptr().add(self.len).write(value) };
        self.len += 1;
        Ok(())
    }

    /// Remove and return the last value. Never reallocates.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: the slot at the old `len - 1` was live and is now outside
        // `len`, so ownership moves to the caller exactly once.
        Some(unsafe { self.buf.ptr().add(self.len).read() })
    }

    /// Ensure room for at least `capacity` values in total.
    ///
    /// If `capacity` exceeds the current capacity, a block of exactly
    /// `capacity` slots replaces the current one. On failure the array is
    /// unchanged.
    pub fn reserve(&mut self, capacity: usize) -> Result<(), AllocError> {
        if capacity <= self.buf.capacity() {
            return Ok(());
        }
        self.buf.relocate(capacity, self.len)
    }

    /// Ensure room for `additional` more values, growing by the policy.
    pub fn reserve_additional(&mut self, additional: usize) -> Result<(), AllocError> {
        let required = GrowthPolicy::required(self.len, additional)?;
        if required <= self.buf.capacity() {
            return Ok(());
        }
        self.grow_for(required)
    }

    fn grow_for(&mut self, required: usize) -> Result<(), AllocError> {
        let capacity = self.policy.next_capacity(self.buf.capacity(), required);
        self.buf.relocate(capacity, self.len)
    }

    /// Reallocate to exactly `len` slots, or release the block when empty.
    pub fn shrink_to_fit(&mut self) -> Result<(), AllocError> {
        if self.buf.capacity() == self.len {
            return Ok(());
        }
        self.buf.relocate(self.len, self.len)
    }

    /// Drop every value past `len`. No-op if `len >= self.len()`.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        let remaining = self.len - len;
        // SAFETY: `len < self.len`, so the offset is in bounds.
        let tail = ptr::slice_from_raw_parts_mut(unsafe { self.buf.ptr().add(len) }, remaining);
        self.len = len;
        // SAFETY: the tail was live and is now outside `len`; a panicking
        // drop cannot lead to a second drop of the same slot.
        unsafe { ptr::drop_in_place(tail) };
    }

    /// Drop every value, keeping the block.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Resize to `new_len`, generating new trailing values with `make`.
    ///
    /// If `make` panics or allocation fails, the array is left at its
    /// original length with every generated value dropped.
    pub fn resize_with<F: FnMut() -> T>(&mut self, new_len: usize, mut make: F) -> Result<(), AllocError> {
        if new_len <= self.len {
            self.truncate(new_len);
            return Ok(());
        }
        self.reserve_additional(new_len - self.len)?;
        let mut guard = Rollback::new(self);
        while guard.array.len < new_len {
            guard.array.push_back(make())?;
        }
        guard.commit();
        Ok(())
    }

    /// Append every value of `iter`.
    ///
    /// All-or-nothing: if the iterator panics or allocation fails, the
    /// values appended so far are dropped and the length restored.
    pub fn try_extend<I: IntoIterator<Item = T>>(&mut self, iter: I) -> Result<(), AllocError> {
        let iter = iter.into_iter();
        self.reserve_additional(iter.size_hint().0)?;
        let mut guard = Rollback::new(self);
        for value in iter {
            guard.array.push_back(value)?;
        }
        guard.commit();
        Ok(())
    }

    /// Insert `value` before `index`, shifting the tail up one slot.
    ///
    /// Returns `index`. `index == len()` appends. On failure the array is
    /// unchanged.
    pub fn insert(&mut self, index: usize, value: T) -> Result<usize, ArrayError> {
        if index > self.len {
            return Err(ArrayError::OutOfRange { index, len: self.len });
        }
        if self.len == self.buf.capacity() {
            self.grow_for(GrowthPolicy::required(self.len, 1)?)?;
        }
        // SAFETY: `index <= len < capacity`. The tail moves up into the
        // uninitialized slot at `len`, leaving `index` free for `value`.
        unsafe {
            let at = self.buf.ptr().add(index);
            ptr::copy(at, at.add(1), self.len - index);
            at.write(value);
        }
        self.len += 1;
        Ok(index)
    }

    /// Insert every value of `iter` before `index`, in order.
    ///
    /// Returns the index of the first inserted value. The values are
    /// staged past the end and rotated into place, so a panicking iterator
    /// or failed allocation leaves the array unchanged.
    pub fn insert_iter<I: IntoIterator<Item = T>>(&mut self, index: usize, iter: I) -> Result<usize, ArrayError> {
        if index > self.len {
            return Err(ArrayError::OutOfRange { index, len: self.len });
        }
        let old_len = self.len;
        self.try_extend(iter)?;
        let inserted = self.len - old_len;
        self.as_mut_slice()[index..].rotate_right(inserted);
        Ok(index)
    }

    /// Opens a `count`-slot gap at `index` and fills it with `make(i)`.
    fn insert_with<F: FnMut(usize) -> T>(&mut self, index: usize, count: usize, mut make: F) -> Result<usize, ArrayError> {
        if index > self.len {
            return Err(ArrayError::OutOfRange { index, len: self.len });
        }
        if count == 0 {
            return Ok(index);
        }
        self.reserve_additional(count)?;
        let tail = self.len - index;
        let base = self.buf.ptr();
        self.len = index;
        // SAFETY: capacity >= old len + count. The tail moves into the
        // high slots; slots `index..index + count` are now uninitialized.
        unsafe { ptr::copy(base.add(index), base.add(index + count), tail) };
        let mut gap = Gap {
            array: self,
            index,
            count,
            filled: 0,
            tail,
        };
        while gap.filled < count {
            let value = make(gap.filled);
            // SAFETY: `filled < count`, so the slot is inside the gap.
            unsafe { base.add(index + gap.filled).write(value) };
            gap.filled += 1;
        }
        gap.close();
        Ok(index)
    }

    /// Remove the value at `index`, dropping it.
    ///
    /// Returns the index of the following value (equal to `index`).
    pub fn erase(&mut self, index: usize) -> Result<usize, ArrayError> {
        if index >= self.len {
            return Err(ArrayError::OutOfRange { index, len: self.len });
        }
        self.erase_range(index..index + 1)
    }

    /// Remove every value in `range`, dropping them, and shift the tail down.
    ///
    /// Returns the index of the value that followed the range.
    pub fn erase_range<R: RangeBounds<usize>>(&mut self, range: R) -> Result<usize, ArrayError> {
        let Range { start, end } = self.checked_range(range)?;
        let count = end - start;
        if count == 0 {
            return Ok(start);
        }
        let tail = self.len - end;
        let base = self.buf.ptr();
        self.len = start;
        let _close = CloseGap {
            array: self,
            start,
            count,
            tail,
        };
        // SAFETY: `start..end` was live and is now outside `len`; `_close`
        // moves the tail down even if one of these drops panics.
        unsafe { ptr::drop_in_place(ptr::slice_from_raw_parts_mut(base.add(start), count)) };
        Ok(start)
    }

    /// Remove and return the value at `index`, shifting the tail down.
    pub fn remove(&mut self, index: usize) -> Result<T, ArrayError> {
        if index >= self.len {
            return Err(ArrayError::OutOfRange { index, len: self.len });
        }
        // SAFETY: `index < len`; the value is read out once and the tail
        // slides over its slot.
        let value = unsafe {
            let at = self.buf.ptr().add(index);
            let value = at.read();
            ptr::copy(at.add(1), at, self.len - index - 1);
            value
        };
        self.len -= 1;
        Ok(value)
    }

    /// Remove and return the value at `index`, replacing it with the last.
    pub fn swap_remove(&mut self, index: usize) -> Result<T, ArrayError> {
        if index >= self.len {
            return Err(ArrayError::OutOfRange { index, len: self.len });
        }
        let last = self.len - 1;
        // SAFETY: both `index` and `last` are live; the value at `last`
        // moves into `index` and `last` leaves the live range.
        let value = unsafe {
            let base = self.buf.ptr();
            let value = base.add(index).read();
            ptr::copy(base.add(last), base.add(index), 1);
            value
        };
        self.len = last;
        Ok(value)
    }

    /// Replace the contents with the values of `iter`.
    ///
    /// On failure the array is left empty.
    pub fn assign_iter<I: IntoIterator<Item = T>>(&mut self, iter: I) -> Result<(), AllocError> {
        self.clear();
        self.try_extend(iter)
    }

    /// Exchange contents, capacity, and allocator with `other`.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Move the contents out, leaving an empty array on a clone of the
    /// same allocator.
    pub fn take(&mut self) -> Self
    where
        A: Clone,
    {
        let empty = Self::with_policy_in(self.policy, self.allocator().clone());
        mem::replace(self, empty)
    }

    fn checked_range<R: RangeBounds<usize>>(&self, range: R) -> Result<Range<usize>, ArrayError> {
        let len = self.len;
        let start = match range.start_bound() {
            Bound::Included(&start) => start,
            Bound::Excluded(&start) => start.saturating_add(1),
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&end) => end.saturating_add(1),
            Bound::Excluded(&end) => end,
            Bound::Unbounded => len,
        };
        if start > end || end > len {
            return Err(ArrayError::InvalidRange { start, end, len });
        }
        Ok(start..end)
    }

    /// Split into the raw parts consumed by the owning iterator.
    pub(crate) fn into_parts(self) -> (RawBuf<T, A>, usize) {
        let me = mem::ManuallyDrop::new(self);
        // SAFETY: `me` is never dropped, so `buf` is moved out exactly once.
        let buf = unsafe { ptr::read(&me.buf) };
        (buf, me.len)
    }
}

impl<T: Clone, A: Allocator> DynamicArray<T, A> {
    /// An array of `len` clones of `value` on `alloc`.
    pub fn try_from_elem_in(len: usize, value: &T, alloc: A) -> Result<Self, AllocError> {
        let mut array = Self::try_with_capacity_in(len, alloc)?;
        array.resize(len, value)?;
        Ok(array)
    }

    /// An array holding clones of `values`, sized exactly.
    pub fn try_from_slice_in(values: &[T], alloc: A) -> Result<Self, AllocError> {
        let mut array = Self::try_with_capacity_in(values.len(), alloc)?;
        array.try_extend(values.iter().cloned())?;
        Ok(array)
    }

    /// Resize to `new_len`, cloning `value` into new trailing slots.
    pub fn resize(&mut self, new_len: usize, value: &T) -> Result<(), AllocError> {
        self.resize_with(new_len, || value.clone())
    }

    /// Append clones of `values`.
    pub fn extend_from_slice(&mut self, values: &[T]) -> Result<(), AllocError> {
        self.try_extend(values.iter().cloned())
    }

    /// Insert `count` clones of `value` before `index`.
    ///
    /// Returns the index of the first inserted value. If a clone panics or
    /// allocation fails, the array is unchanged.
    pub fn insert_n(&mut self, index: usize, count: usize, value: &T) -> Result<usize, ArrayError> {
        self.insert_with(index, count, |_| value.clone())
    }

    /// Insert clones of `values` before `index`.
    pub fn insert_slice(&mut self, index: usize, values: &[T]) -> Result<usize, ArrayError> {
        self.insert_with(index, values.len(), |i| values[i].clone())
    }

    /// Replace the contents with `count` clones of `value`.
    pub fn assign_n(&mut self, count: usize, value: &T) -> Result<(), AllocError> {
        self.clear();
        self.resize(count, value)
    }

    /// Deep copy on a clone of the same allocator, sized exactly to `len`.
    pub fn try_clone(&self) -> Result<Self, AllocError>
    where
        A: Clone,
    {
        let mut copy = Self::with_policy_in(self.policy, self.allocator().clone());
        copy.reserve(self.len)?;
        copy.try_extend(self.iter().cloned())?;
        Ok(copy)
    }
}

impl<T: Default, A: Allocator> DynamicArray<T, A> {
    /// An array of `len` default values on `alloc`.
    pub fn try_with_len_in(len: usize, alloc: A) -> Result<Self, AllocError> {
        let mut array = Self::try_with_capacity_in(len, alloc)?;
        array.resize_default(len)?;
        Ok(array)
    }

    /// Resize to `new_len`, filling new trailing slots with `T::default()`.
    pub fn resize_default(&mut self, new_len: usize) -> Result<(), AllocError> {
        self.resize_with(new_len, T::default)
    }
}

/// Truncates back to `start` unless committed.
struct Rollback<'a, T, A: Allocator> {
    array: &'a mut DynamicArray<T, A>,
    start: usize,
    armed: bool,
}

impl<'a, T, A: Allocator> Rollback<'a, T, A> {
    fn new(array: &'a mut DynamicArray<T, A>) -> Self {
        let start = array.len;
        Self {
            array,
            start,
            armed: true,
        }
    }

    fn commit(mut self) {
        self.armed = false;
    }
}

impl<T, A: Allocator> Drop for Rollback<'_, T, A> {
    fn drop(&mut self) {
        if self.armed {
            self.array.truncate(self.start);
        }
    }
}

/// A gap opened by `insert_with`: `array.len == index`, the first `filled`
/// gap slots are live, and the `tail` values sit at `index + count`.
struct Gap<'a, T, A: Allocator> {
    array: &'a mut DynamicArray<T, A>,
    index: usize,
    count: usize,
    filled: usize,
    tail: usize,
}

impl<T, A: Allocator> Gap<'_, T, A> {
    fn close(self) {
        let mut this = mem::ManuallyDrop::new(self);
        this.array.len = this.index + this.count + this.tail;
    }
}

impl<T, A: Allocator> Drop for Gap<'_, T, A> {
    fn drop(&mut self) {
        let base = self.array.buf.ptr();
        // SAFETY: only reached when filling was interrupted. The filled
        // slots are live and dropped once; the tail then slides back to
        // `index`, restoring the original contents.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(base.add(self.index), self.filled));
            ptr::copy(base.add(self.index + self.count), base.add(self.index), self.tail);
        }
        self.array.len = self.index + self.tail;
    }
}

/// Slides the `tail` values at `start + count` down to `start` on drop.
struct CloseGap<'a, T, A: Allocator> {
    array: &'a mut DynamicArray<T, A>,
    start: usize,
    count: usize,
    tail: usize,
}

impl<T, A: Allocator> Drop for CloseGap<'_, T, A> {
    fn drop(&mut self) {
        let base = self.array.buf.ptr();
        // SAFETY: the erased slots are dead; the tail is live and moves
        // down over them.
        unsafe { ptr::copy(base.add(self.start + self.count), base.add(self.start), self.tail) };
        self.array.len = self.start + self.tail;
    }
}

impl<T, A: Allocator> Drop for DynamicArray<T, A> {
    fn drop(&mut self) {
        // SAFETY: exactly the first `len` slots are live. `buf` releases the
        // block afterwards.
        unsafe { ptr::drop_in_place(self.as_mut_slice() as *mut [T]) }
    }
}

impl<T, A: Allocator> Deref for DynamicArray<T, A> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: Allocator> DerefMut for DynamicArray<T, A> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

/// Unchecked-by-contract indexing: panics on an out-of-range index.
impl<T, I: SliceIndex<[T]>, A: Allocator> Index<I> for DynamicArray<T, A> {
    type Output = I::Output;

    fn index(&self, index: I) -> &Self::Output {
        Index::index(self.as_slice(), index)
    }
}

impl<T, I: SliceIndex<[T]>, A: Allocator> IndexMut<I> for DynamicArray<T, A> {
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        IndexMut::index_mut(self.as_mut_slice(), index)
    }
}

impl<T, A: Allocator> AsRef<[T]> for DynamicArray<T, A> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: Allocator> AsMut<[T]> for DynamicArray<T, A> {
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, A: Allocator + Default> Default for DynamicArray<T, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T: Clone, A: Allocator + Clone> Clone for DynamicArray<T, A> {
    fn clone(&self) -> Self {
        self.try_clone().unwrap_or_else(|err| err.raise())
    }

    /// Reuses this array's block when it is large enough; keeps this
    /// array's allocator.
    fn clone_from(&mut self, source: &Self) {
        self.truncate(source.len);
        let (init, tail) = source.split_at(self.len);
        self.clone_from_slice(init);
        self.extend_from_slice(tail)
            .unwrap_or_else(|err| err.raise());
    }
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for DynamicArray<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, U, A, B> PartialEq<DynamicArray<U, B>> for DynamicArray<T, A>
where
    T: PartialEq<U>,
    A: Allocator,
    B: Allocator,
{
    fn eq(&self, other: &DynamicArray<U, B>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PartialEq<U>, U, A: Allocator, const N: usize> PartialEq<[U; N]> for DynamicArray<T, A> {
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PartialEq<U>, U, A: Allocator> PartialEq<[U]> for DynamicArray<T, A> {
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialEq<U>, U, A: Allocator> PartialEq<&[U]> for DynamicArray<T, A> {
    fn eq(&self, other: &&[U]) -> bool {
        self.as_slice() == *other
    }
}

impl<T: Eq, A: Allocator> Eq for DynamicArray<T, A> {}

impl<T: PartialOrd, A: Allocator> PartialOrd for DynamicArray<T, A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T: Ord, A: Allocator> Ord for DynamicArray<T, A> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<T: Hash, A: Allocator> Hash for DynamicArray<T, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T, A: Allocator> Extend<T> for DynamicArray<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.try_extend(iter).unwrap_or_else(|err| err.raise());
    }
}

impl<'a, T: Copy + 'a, A: Allocator> Extend<&'a T> for DynamicArray<T, A> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.try_extend(iter.into_iter().copied())
            .unwrap_or_else(|err| err.raise());
    }
}

impl<T> FromIterator<T> for DynamicArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::try_from_iter(iter).unwrap_or_else(|err| err.raise())
    }
}

impl<T, const N: usize> From<[T; N]> for DynamicArray<T> {
    fn from(values: [T; N]) -> Self {
        Self::try_from_iter(values).unwrap_or_else(|err| err.raise())
    }
}

impl<T: Clone> From<&[T]> for DynamicArray<T> {
    fn from(values: &[T]) -> Self {
        Self::try_from_slice(values).unwrap_or_else(|err| err.raise())
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a DynamicArray<T, A> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a mut DynamicArray<T, A> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
