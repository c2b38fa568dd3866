//! Front-to-back iteration over a [`NodeList`].
//!
//! Each iterator walks the ring from both ends at once and stops after
//! `len` steps, so it never needs to look at the sentinel.

use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;

use trove_core::{Allocator, Global};

use crate::arena::RawSlots;
use crate::list::NodeList;

/// Shared iterator over a [`NodeList`]. Created by [`NodeList::iter`].
pub struct Iter<'a, T, A: Allocator = Global> {
    list: &'a NodeList<T, A>,
    front: usize,
    back: usize,
    remaining: usize,
}

impl<'a, T, A: Allocator> Iter<'a, T, A> {
    pub(crate) fn new(list: &'a NodeList<T, A>) -> Self {
        Self {
            list,
            front: list.sentinel.next,
            back: list.sentinel.prev,
            remaining: list.len(),
        }
    }
}

impl<T, A: Allocator> Clone for Iter<'_, T, A> {
    fn clone(&self) -> Self {
        Self { ..*self }
    }
}

impl<'a, T, A: Allocator> Iterator for Iter<'a, T, A> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.list.node(self.front);
        self.front = node.links.next;
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T, A: Allocator> DoubleEndedIterator for Iter<'a, T, A> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.list.node(self.back);
        self.back = node.links.prev;
        self.remaining -= 1;
        Some(&node.value)
    }
}

impl<T, A: Allocator> ExactSizeIterator for Iter<'_, T, A> {}

impl<T, A: Allocator> FusedIterator for Iter<'_, T, A> {}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for Iter<'_, T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// Mutable iterator over a [`NodeList`]. Created by [`NodeList::iter_mut`].
pub struct IterMut<'a, T> {
    slots: RawSlots<'a, T>,
    front: usize,
    back: usize,
    remaining: usize,
    _marker: PhantomData<&'a mut T>,
}

impl<'a, T> IterMut<'a, T> {
    pub(crate) fn new<A: Allocator>(list: &'a mut NodeList<T, A>) -> Self {
        let front = list.sentinel.next;
        let back = list.sentinel.prev;
        let remaining = list.len();
        Self {
            slots: list.arena.raw_slots(),
            front,
            back,
            remaining,
            _marker: PhantomData,
        }
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        if self.remaining == 0 {
            return None;
        }
        // SAFETY: the front and back cursors only ever meet once
        // `remaining` reaches zero, so each node is handed out once.
        let node = unsafe { self.slots.node_mut(self.front) };
        self.front = node.links.next;
        self.remaining -= 1;
        Some(&mut node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    fn next_back(&mut self) -> Option<&'a mut T> {
        if self.remaining == 0 {
            return None;
        }
        // SAFETY: as in `next`.
        let node = unsafe { self.slots.node_mut(self.back) };
        self.back = node.links.prev;
        self.remaining -= 1;
        Some(&mut node.value)
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

impl<T> FusedIterator for IterMut<'_, T> {}

impl<T> fmt::Debug for IterMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut")
            .field("remaining", &self.remaining)
            .finish()
    }
}

/// Owning iterator over a [`NodeList`].
///
/// Values not yet yielded are dropped with the iterator.
pub struct IntoIter<T, A: Allocator = Global> {
    list: NodeList<T, A>,
}

impl<T, A: Allocator> Iterator for IntoIter<T, A> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.list.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len(), Some(self.list.len()))
    }
}

impl<T, A: Allocator> DoubleEndedIterator for IntoIter<T, A> {
    fn next_back(&mut self) -> Option<T> {
        self.list.pop_back()
    }
}

impl<T, A: Allocator> ExactSizeIterator for IntoIter<T, A> {}

impl<T, A: Allocator> FusedIterator for IntoIter<T, A> {}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for IntoIter<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.list).finish()
    }
}

impl<T, A: Allocator> IntoIterator for NodeList<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> IntoIter<T, A> {
        IntoIter { list: self }
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a NodeList<T, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, A>;

    fn into_iter(self) -> Iter<'a, T, A> {
        self.iter()
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a mut NodeList<T, A> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trove_test_utils::DropCounter;

    #[test]
    fn iterates_both_ways_and_meets_in_the_middle() {
        let list = NodeList::from([1, 2, 3, 4, 5]);
        let mut iter = list.iter();
        assert_eq!(iter.len(), 5);
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.next_back(), Some(&5));
        assert_eq!(iter.next(), Some(&2));
        assert_eq!(iter.next_back(), Some(&4));
        assert_eq!(iter.next(), Some(&3));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn iter_mut_updates_in_place() {
        let mut list = NodeList::from([1, 2, 3]);
        for value in &mut list {
            *value *= 2;
        }
        list.iter_mut().rev().take(1).for_each(|v| *v = 0);
        assert_eq!(list, [2, 4, 0]);
    }

    #[test]
    fn iteration_follows_links_not_slots() {
        let mut list = NodeList::new();
        list.push_back(2).unwrap();
        list.push_front(1).unwrap();
        list.push_back(3).unwrap();
        let collected: Vec<_> = list.iter().copied().collect();
        assert_eq!(collected, [1, 2, 3]);
        let owned: Vec<_> = list.into_iter().rev().collect();
        assert_eq!(owned, [3, 2, 1]);
    }

    #[test]
    fn into_iter_drops_remainder() {
        let counter = DropCounter::new();
        let list: NodeList<_> = (0..5).map(|i| counter.track(i)).collect();
        let mut iter = list.into_iter();
        let first = iter.next().unwrap();
        assert_eq!(iter.len(), 4);
        drop(iter);
        assert_eq!(counter.live(), 1);
        drop(first);
        assert_eq!(counter.live(), 0);
    }

    #[test]
    fn debug_formats() {
        let list = NodeList::from([1, 2]);
        assert_eq!(format!("{:?}", list.iter()), "[1, 2]");
        assert_eq!(format!("{:?}", list.into_iter()), "IntoIter([1, 2])");
    }
}
