//! The allocator contract consumed by every Trove container.
//!
//! Containers never call `std::alloc` directly. They hold an allocator
//! value (default [`Global`]) and route every block request through it,
//! carrying that same instance through clones, moves, and swaps.

use std::alloc::Layout;
use std::ptr::{self, NonNull};

use crate::error::AllocError;

/// A source of raw memory blocks.
///
/// Allocators may be stateless (any two instances are interchangeable,
/// like [`Global`]) or stateful (blocks must go back to the instance that
/// produced them). Containers never mix blocks between two instances.
///
/// # Safety
///
/// Implementors must guarantee that a successful [`allocate`] returns a
/// block that is valid for reads and writes of `layout.size()` bytes,
/// aligned to `layout.align()`, and not aliased by any other live block
/// until it is passed back to [`deallocate`]. Containers rely on this to
/// place values into the returned memory.
///
/// [`allocate`]: Allocator::allocate
/// [`deallocate`]: Allocator::deallocate
pub unsafe trait Allocator {
    /// Obtain a block for `layout`.
    ///
    /// The only expected failure is [`AllocError::OutOfMemory`].
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError>;

    /// Release a block.
    ///
    /// # Safety
    ///
    /// `ptr` must have been returned by [`allocate`](Allocator::allocate)
    /// on this same instance (or a clone sharing its state) with exactly
    /// `layout`, and must not have been released already.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);

    /// Obtain storage for `n` values of `T`.
    ///
    /// Zero-byte requests (`n == 0` or a zero-sized `T`) never reach
    /// [`allocate`](Allocator::allocate); they yield a dangling, well-aligned
    /// pointer instead.
    fn allocate_array<T>(&self, n: usize) -> Result<NonNull<T>, AllocError>
    where
        Self: Sized,
    {
        let layout = array_layout::<T>(n)?;
        if layout.size() == 0 {
            return Ok(NonNull::dangling());
        }
        self.allocate(layout).map(NonNull::cast)
    }

    /// Release storage obtained from [`allocate_array`](Allocator::allocate_array).
    ///
    /// # Safety
    ///
    /// `ptr` and `n` must be exactly the pointer and count of a previous
    /// `allocate_array::<T>` call on this instance, not yet released.
    unsafe fn deallocate_array<T>(&self, ptr: NonNull<T>, n: usize)
    where
        Self: Sized,
    {
        // The layout was computed successfully when the block was obtained.
        let Ok(layout) = array_layout::<T>(n) else {
            return;
        };
        if layout.size() != 0 {
            // SAFETY: forwarded from the caller's contract.
            unsafe { self.deallocate(ptr.cast(), layout) }
        }
    }
}

// SAFETY: forwards to the referenced allocator, which upholds the contract.
unsafe impl<A: Allocator> Allocator for &A {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        (**self).allocate(layout)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        // SAFETY: forwarded from the caller's contract.
        unsafe { (**self).deallocate(ptr, layout) }
    }
}

/// Compute the layout of `n` contiguous values of `T`.
///
/// Returns [`AllocError::CapacityOverflow`] if the total size would exceed
/// `isize::MAX`.
pub fn array_layout<T>(n: usize) -> Result<Layout, AllocError> {
    Layout::array::<T>(n).map_err(|_| AllocError::CapacityOverflow)
}

/// The process-wide allocator behind `std::alloc`.
///
/// Stateless: every instance is interchangeable with every other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Global;

// SAFETY: `std::alloc::alloc` returns blocks satisfying the layout, and
// zero-sized requests are answered with a dangling aligned pointer that
// is never handed to `dealloc`.
unsafe impl Allocator for Global {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        if layout.size() == 0 {
            return NonNull::new(ptr::without_provenance_mut(layout.align()))
                .ok_or(AllocError::out_of_memory(layout));
        }
        // SAFETY: layout has a non-zero size.
        let raw = unsafe { std::alloc::alloc(layout) };
        NonNull::new(raw).ok_or(AllocError::out_of_memory(layout))
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() != 0 {
            // SAFETY: the caller guarantees `ptr` came from `allocate` with
            // this non-zero-sized layout.
            unsafe { std::alloc::dealloc(ptr.as_ptr(), layout) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_round_trip() {
        let ptr = Global.allocate_array::<u64>(8).unwrap();
        // SAFETY: the block holds 8 u64 values.
        unsafe {
            for i in 0..8 {
                ptr.as_ptr().add(i).write(i as u64 * 3);
            }
            assert_eq!(*ptr.as_ptr().add(7), 21);
            Global.deallocate_array(ptr, 8);
        }
    }

    #[test]
    fn zero_length_request_is_dangling() {
        let ptr = Global.allocate_array::<u32>(0).unwrap();
        assert_eq!(ptr, NonNull::dangling());
        // SAFETY: zero-length blocks are released as no-ops.
        unsafe { Global.deallocate_array(ptr, 0) };
    }

    #[test]
    fn zero_sized_type_never_allocates() {
        let ptr = Global.allocate_array::<()>(1_000_000).unwrap();
        assert_eq!(ptr, NonNull::dangling());
    }

    #[test]
    fn overflowing_count_is_capacity_overflow() {
        assert_eq!(
            Global.allocate_array::<u64>(usize::MAX).unwrap_err(),
            AllocError::CapacityOverflow
        );
        assert_eq!(
            array_layout::<u32>(isize::MAX as usize).unwrap_err(),
            AllocError::CapacityOverflow
        );
    }

    #[test]
    fn zero_size_layout_is_aligned() {
        let layout = Layout::from_size_align(0, 64).unwrap();
        let ptr = Global.allocate(layout).unwrap();
        assert_eq!(ptr.as_ptr() as usize % 64, 0);
        // SAFETY: same instance and layout.
        unsafe { Global.deallocate(ptr, layout) };
    }

    #[test]
    fn reference_forwards_to_allocator() {
        let global = Global;
        let by_ref = &global;
        let ptr = by_ref.allocate_array::<u8>(3).unwrap();
        // SAFETY: obtained from the same allocator with the same count.
        unsafe { by_ref.deallocate_array(ptr, 3) };
    }
}
