//! Raw, allocator-backed slot storage for [`DynamicArray`](crate::DynamicArray).
//!
//! [`RawBuf`] owns one block of `capacity` slots and knows nothing about
//! which of them are initialized; the array tracks that with its length.
//! Every `unsafe` operation here carries a `// SAFETY:` comment.

use std::marker::PhantomData;
use std::ptr::{self, NonNull};

use trove_core::{AllocError, Allocator};

/// An exclusively owned block of uninitialized slots for `T`.
///
/// `capacity == 0` means no block is held and `ptr` is dangling; such a
/// pointer is never dereferenced and never handed to the allocator.
pub(crate) struct RawBuf<T, A: Allocator> {
    ptr: NonNull<T>,
    capacity: usize,
    alloc: A,
    _owns: PhantomData<T>,
}

// SAFETY: `RawBuf` is a unique owner of its block, like `Box<[T]>`.
unsafe impl<T: Send, A: Allocator + Send> Send for RawBuf<T, A> {}
// SAFETY: shared access only hands out `&T` through the owning array.
unsafe impl<T: Sync, A: Allocator + Sync> Sync for RawBuf<T, A> {}

impl<T, A: Allocator> RawBuf<T, A> {
    /// An empty buffer holding no block.
    pub(crate) fn new_in(alloc: A) -> Self {
        Self {
            ptr: NonNull::dangling(),
            capacity: 0,
            alloc,
            _owns: PhantomData,
        }
    }

    pub(crate) fn ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Move the first `len` slots into a fresh block of exactly `new_capacity`
    /// slots and release the old block.
    ///
    /// The new block is obtained before anything is touched, so on failure
    /// the buffer is unchanged. Relocation is a bitwise move and cannot fail
    /// part-way. `new_capacity == 0` releases the block entirely.
    pub(crate) fn relocate(&mut self, new_capacity: usize, len: usize) -> Result<(), AllocError> {
        debug_assert!(len <= new_capacity && len <= self.capacity);
        let new_ptr = if new_capacity == 0 {
            NonNull::dangling()
        } else {
            self.alloc.allocate_array::<T>(new_capacity)?
        };
        // SAFETY: the first `len` slots of the old block are initialized
        // (caller contract) and the new block has room for them; the two
        // blocks are distinct allocations (or zero bytes are copied).
        unsafe { ptr::copy_nonoverlapping(self.ptr.as_ptr(), new_ptr.as_ptr(), len) };
        let old_ptr = std::mem::replace(&mut self.ptr, new_ptr);
        let old_capacity = std::mem::replace(&mut self.capacity, new_capacity);
        log::trace!(
            "array storage relocated: {old_capacity} -> {new_capacity} slots ({len} live)"
        );
        // SAFETY: the old block came from this allocator with this count,
        // and its live values now belong to the new block.
        unsafe { self.release(old_ptr, old_capacity) };
        Ok(())
    }

    /// # Safety
    ///
    /// `ptr`/`capacity` must describe a block obtained from `self.alloc`
    /// (or the dangling sentinel with capacity zero).
    unsafe fn release(&self, ptr: NonNull<T>, capacity: usize) {
        if capacity != 0 {
            // SAFETY: forwarded from the caller.
            unsafe { self.alloc.deallocate_array(ptr, capacity) }
        }
    }
}

impl<T, A: Allocator> Drop for RawBuf<T, A> {
    fn drop(&mut self) {
        // SAFETY: the block (if any) was obtained from `self.alloc` with
        // `self.capacity` slots. Live values were dropped by the owner.
        unsafe { self.release(self.ptr, self.capacity) }
    }
}
