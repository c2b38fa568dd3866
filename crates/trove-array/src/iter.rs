//! Owning iteration.

use std::fmt;
use std::iter::FusedIterator;
use std::ptr;
use std::slice;

use trove_core::{Allocator, Global};

use crate::array::DynamicArray;
use crate::raw::RawBuf;

/// Moves values out of a [`DynamicArray`] front to back.
///
/// Values not yet yielded are dropped with the iterator, and the block is
/// returned to the array's allocator.
pub struct IntoIter<T, A: Allocator = Global> {
    buf: RawBuf<T, A>,
    /// Slots `start..end` are live.
    start: usize,
    end: usize,
}

impl<T, A: Allocator> IntoIter<T, A> {
    /// The values not yet yielded.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: `start..end` are live and inside the block.
        unsafe { slice::from_raw_parts(self.buf.ptr().add(self.start), self.end - self.start) }
    }
}

impl<T, A: Allocator> Iterator for IntoIter<T, A> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        // SAFETY: `start` is live; advancing it hands ownership out once.
        let value = unsafe { self.buf.ptr().add(self.start).read() };
        self.start += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.start;
        (remaining, Some(remaining))
    }
}

impl<T, A: Allocator> DoubleEndedIterator for IntoIter<T, A> {
    fn next_back(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        self.end -= 1;
        // SAFETY: the old `end - 1` is live and now outside the range.
        Some(unsafe { self.buf.ptr().add(self.end).read() })
    }
}

impl<T, A: Allocator> ExactSizeIterator for IntoIter<T, A> {}

impl<T, A: Allocator> FusedIterator for IntoIter<T, A> {}

impl<T, A: Allocator> Drop for IntoIter<T, A> {
    fn drop(&mut self) {
        let remaining = self.as_slice() as *const [T] as *mut [T];
        self.start = self.end;
        // SAFETY: the remaining values are live and no longer reachable
        // through the iterator. `buf` releases the block afterwards.
        unsafe { ptr::drop_in_place(remaining) }
    }
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for IntoIter<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

impl<T, A: Allocator> IntoIterator for DynamicArray<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> IntoIter<T, A> {
        let (buf, len) = self.into_parts();
        IntoIter {
            buf,
            start: 0,
            end: len,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trove_test_utils::{CountingAllocator, DropCounter};

    #[test]
    fn yields_from_both_ends() {
        let array = DynamicArray::from([1, 2, 3, 4]);
        let mut iter = array.into_iter();
        assert_eq!(iter.len(), 4);
        assert_eq!(iter.next(), Some(1));
        assert_eq!(iter.next_back(), Some(4));
        assert_eq!(iter.as_slice(), &[2, 3]);
        assert_eq!(iter.collect::<Vec<_>>(), [2, 3]);
    }

    #[test]
    fn dropping_part_way_drops_the_rest() {
        let alloc = CountingAllocator::new();
        let counter = DropCounter::new();
        let mut array = DynamicArray::new_in(alloc.clone());
        for i in 0..10 {
            array.push_back(counter.track(i)).unwrap();
        }
        let mut iter = array.into_iter();
        let first = iter.next().unwrap();
        assert_eq!(first.value, 0);
        drop(iter);
        assert_eq!(counter.live(), 1);
        assert_eq!(alloc.live_blocks(), 0);
        drop(first);
        assert_eq!(counter.live(), 0);
    }

    #[test]
    fn borrowed_iteration() {
        let mut array = DynamicArray::from([1, 2, 3]);
        for value in &mut array {
            *value *= 10;
        }
        let sum: i32 = (&array).into_iter().sum();
        assert_eq!(sum, 60);
    }
}
