//! The circular doubly linked node list.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;

use trove_core::{AllocError, Allocator, Global, GrowthPolicy};

use crate::arena::{Links, Node, NodeArena, NIL};
use crate::error::ListError;
use crate::iter::{Iter, IterMut};
use crate::position::{Position, SENTINEL};

/// A doubly linked list arranged as a ring around one sentinel.
///
/// Nodes live in a container-owned arena and link to each other by slot
/// index. The sentinel is a value-less link record in the list header:
/// its `next` is the front, its `prev` the back, and an empty list is a
/// sentinel linked to itself. A newly constructed empty list holds no
/// allocation.
///
/// Insertion and erasure never move other nodes, so every [`Position`]
/// except the erased one stays valid and keeps pointing at the same value.
///
/// The node block only grows while the list holds values. Erased slots are
/// reused by later insertions, and [`clear`](Self::clear) keeps the block;
/// call [`shrink_to_fit`](Self::shrink_to_fit) on an empty list to release it.
///
/// # Example
///
/// ```
/// use trove_list::NodeList;
///
/// let mut list = NodeList::new();
/// list.push_front(1).unwrap();
/// let two = list.push_back(2).unwrap();
/// list.push_front(0).unwrap();
/// assert_eq!(list, [0, 1, 2]);
///
/// list.insert(two, 9).unwrap();
/// assert_eq!(list, [0, 1, 9, 2]);
/// assert_eq!(list.get(two), Ok(&2));
/// ```
pub struct NodeList<T, A: Allocator = Global> {
    pub(crate) sentinel: Links,
    pub(crate) arena: NodeArena<T, A>,
}

/// Nodes allocated and linked to each other but not yet to the ring.
///
/// `head.prev` and `tail.next` are [`NIL`] until spliced.
struct Chain {
    head: usize,
    tail: usize,
    len: usize,
}

impl Chain {
    const EMPTY: Chain = Chain {
        head: NIL,
        tail: NIL,
        len: 0,
    };
}

/// Frees a partially built chain unless it was handed over.
struct ChainGuard<'a, T, A: Allocator> {
    list: &'a mut NodeList<T, A>,
    chain: Chain,
}

impl<T, A: Allocator> ChainGuard<'_, T, A> {
    fn finish(self) -> Chain {
        let mut this = mem::ManuallyDrop::new(self);
        mem::replace(&mut this.chain, Chain::EMPTY)
    }
}

impl<T, A: Allocator> Drop for ChainGuard<'_, T, A> {
    fn drop(&mut self) {
        ChainRest {
            arena: &mut self.list.arena,
            cursor: self.chain.head,
        }
        .free();
    }
}

/// The unfreed tail of a chain. Keeps freeing if a value's `Drop` panics.
struct ChainRest<'a, T, A: Allocator> {
    arena: &'a mut NodeArena<T, A>,
    cursor: usize,
}

impl<T, A: Allocator> ChainRest<'_, T, A> {
    fn free(&mut self) {
        while let Some(node) = self.arena.remove(self.cursor) {
            self.cursor = node.links.next;
            drop(node);
        }
    }
}

impl<T, A: Allocator> Drop for ChainRest<'_, T, A> {
    fn drop(&mut self) {
        self.free();
    }
}

impl<T> NodeList<T> {
    /// An empty list on the global allocator. Does not allocate.
    pub fn new() -> Self {
        Self::new_in(Global)
    }

    /// Build a list from the values of `iter`, in order.
    pub fn try_from_iter<I: IntoIterator<Item = T>>(iter: I) -> Result<Self, AllocError> {
        Self::try_from_iter_in(iter, Global)
    }
}

impl<T: Clone> NodeList<T> {
    /// A list of `len` clones of `value`.
    pub fn try_from_elem(len: usize, value: &T) -> Result<Self, AllocError> {
        Self::try_from_elem_in(len, value, Global)
    }
}

impl<T: Default> NodeList<T> {
    /// A list of `len` default values.
    pub fn try_with_len(len: usize) -> Result<Self, AllocError> {
        Self::try_with_len_in(len, Global)
    }
}

impl<T, A: Allocator> NodeList<T, A> {
    /// An empty list that will allocate from `alloc`. Does not allocate.
    pub fn new_in(alloc: A) -> Self {
        Self::with_policy_in(GrowthPolicy::for_type::<T>(), alloc)
    }

    /// An empty list whose arena grows by `policy`.
    pub fn with_policy_in(policy: GrowthPolicy, alloc: A) -> Self {
        Self {
            sentinel: Links {
                prev: SENTINEL,
                next: SENTINEL,
            },
            arena: NodeArena::new_in(policy, alloc),
        }
    }

    /// Build a list from the values of `iter`, in order.
    ///
    /// On failure (allocation or a panicking iterator) every node built so
    /// far is dropped and freed first.
    pub fn try_from_iter_in<I: IntoIterator<Item = T>>(iter: I, alloc: A) -> Result<Self, AllocError> {
        let mut list = Self::new_in(alloc);
        let chain = list.build_chain(iter)?;
        list.splice_chain(chain, SENTINEL);
        Ok(list)
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Whether the list holds no values.
    pub fn is_empty(&self) -> bool {
        self.sentinel.next == SENTINEL
    }

    /// Node slots in the arena, occupied or not.
    pub fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    /// The allocator this list draws from.
    pub fn allocator(&self) -> &A {
        self.arena.allocator()
    }

    /// The arena growth policy in effect.
    pub fn policy(&self) -> GrowthPolicy {
        self.arena.policy()
    }

    /// Ensure `additional` more values can be inserted without allocating.
    pub fn reserve(&mut self, additional: usize) -> Result<(), AllocError> {
        self.arena.reserve(additional)
    }

    /// Append `value`. On allocation failure the list is unchanged.
    pub fn push_back(&mut self, value: T) -> Result<Position, AllocError> {
        let index = self.insert_node(SENTINEL, value)?;
        Ok(self.position_of(index))
    }

    /// Prepend `value`. On allocation failure the list is unchanged.
    pub fn push_front(&mut self, value: T) -> Result<Position, AllocError> {
        let index = self.insert_node(self.sentinel.next, value)?;
        Ok(self.position_of(index))
    }

    /// Remove and return the front value.
    pub fn pop_front(&mut self) -> Option<T> {
        let front = self.sentinel.next;
        (front != SENTINEL).then(|| self.unlink(front).value)
    }

    /// Remove and return the back value.
    pub fn pop_back(&mut self) -> Option<T> {
        let back = self.sentinel.prev;
        (back != SENTINEL).then(|| self.unlink(back).value)
    }

    /// Insert `value` immediately before `pos` and return its position.
    ///
    /// `pos` may be [`Position::END`], which appends.
    pub fn insert(&mut self, pos: Position, value: T) -> Result<Position, ListError> {
        let before = self.resolve(pos)?;
        let index = self.insert_node(before, value)?;
        Ok(self.position_of(index))
    }

    /// Insert the values of `iter` before `pos`, in order.
    ///
    /// All-or-nothing: the values are linked into a detached chain first
    /// and spliced in only once the iterator is exhausted. Returns the
    /// position of the first inserted value, or `pos` if `iter` was empty.
    pub fn insert_iter<I: IntoIterator<Item = T>>(&mut self, pos: Position, iter: I) -> Result<Position, ListError> {
        let before = self.resolve(pos)?;
        let chain = self.build_chain(iter)?;
        if chain.len == 0 {
            return Ok(pos);
        }
        let head = chain.head;
        self.splice_chain(chain, before);
        Ok(self.position_of(head))
    }

    /// Remove the node at `pos`, dropping its value.
    ///
    /// Returns the position that followed it. Only `pos` is invalidated.
    pub fn erase(&mut self, pos: Position) -> Result<Position, ListError> {
        let index = self.resolve_node(pos)?;
        let next = self.position_of(self.links(index).next);
        drop(self.unlink(index));
        Ok(next)
    }

    /// Remove every node from `first` up to, not including, `last`.
    ///
    /// The range is checked before anything is erased: `last` must be
    /// reachable from `first` without passing the end. Returns `last`.
    pub fn erase_range(&mut self, first: Position, last: Position) -> Result<Position, ListError> {
        let start = self.resolve(first)?;
        let stop = self.resolve(last)?;
        let mut count = 0;
        let mut cursor = start;
        while cursor != stop {
            if cursor == SENTINEL {
                return Err(ListError::InvalidRange);
            }
            cursor = self.links(cursor).next;
            count += 1;
        }
        cursor = start;
        for _ in 0..count {
            let next = self.links(cursor).next;
            drop(self.unlink(cursor));
            cursor = next;
        }
        Ok(last)
    }

    /// Remove the node at `pos` and return its value.
    pub fn take(&mut self, pos: Position) -> Result<T, ListError> {
        let index = self.resolve_node(pos)?;
        Ok(self.unlink(index).value)
    }

    /// Remove every value for which `pred` returns `true`, front to back.
    ///
    /// Returns the number of values removed.
    pub fn remove_if<F: FnMut(&T) -> bool>(&mut self, mut pred: F) -> usize {
        let mut removed = 0;
        let mut cursor = self.sentinel.next;
        while cursor != SENTINEL {
            let next = self.links(cursor).next;
            if pred(&self.node(cursor).value) {
                drop(self.unlink(cursor));
                removed += 1;
            }
            cursor = next;
        }
        removed
    }

    /// Position of the front node, or [`Position::END`] when empty.
    pub fn begin(&self) -> Position {
        self.position_of(self.sentinel.next)
    }

    /// The end position.
    pub fn end(&self) -> Position {
        Position::END
    }

    /// The position after `pos`. `next(end)` is the front.
    pub fn next(&self, pos: Position) -> Result<Position, ListError> {
        let index = self.resolve(pos)?;
        Ok(self.position_of(self.links(index).next))
    }

    /// The position before `pos`. `prev(end)` is the back.
    pub fn prev(&self, pos: Position) -> Result<Position, ListError> {
        let index = self.resolve(pos)?;
        Ok(self.position_of(self.links(index).prev))
    }

    /// The value at `pos`.
    pub fn get(&self, pos: Position) -> Result<&T, ListError> {
        let index = self.resolve_node(pos)?;
        Ok(&self.node(index).value)
    }

    /// The value at `pos`, mutably.
    pub fn get_mut(&mut self, pos: Position) -> Result<&mut T, ListError> {
        let index = self.resolve_node(pos)?;
        Ok(&mut self.node_mut(index).value)
    }

    /// The front value, if any.
    pub fn front(&self) -> Option<&T> {
        self.get(self.begin()).ok()
    }

    /// The front value, mutably.
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.get_mut(self.begin()).ok()
    }

    /// The back value, if any.
    pub fn back(&self) -> Option<&T> {
        let back = self.sentinel.prev;
        if back == SENTINEL {
            return None;
        }
        Some(&self.node(back).value)
    }

    /// The back value, mutably.
    pub fn back_mut(&mut self) -> Option<&mut T> {
        let back = self.sentinel.prev;
        if back == SENTINEL {
            return None;
        }
        Some(&mut self.node_mut(back).value)
    }

    /// Drop every value front to back. Node slots are kept for reuse; see
    /// [`shrink_to_fit`](Self::shrink_to_fit).
    pub fn clear(&mut self) {
        while self.pop_front().is_some() {}
    }

    /// Return the node block to the allocator if the list is empty.
    ///
    /// A non-empty list keeps its capacity: live nodes never move.
    /// Positions taken before the release remain stale afterwards.
    pub fn shrink_to_fit(&mut self) {
        self.arena.release_if_empty();
    }

    /// Replace the contents with the values of `iter`.
    ///
    /// The new nodes are linked in behind the old ones before any old value
    /// is dropped, so on allocation failure the list is unchanged. If an old
    /// value's `Drop` panics, the old values not yet dropped stay at the
    /// front, followed by the new ones.
    pub fn assign_iter<I: IntoIterator<Item = T>>(&mut self, iter: I) -> Result<(), AllocError> {
        let old_len = self.len();
        let chain = self.build_chain(iter)?;
        self.splice_chain(chain, SENTINEL);
        for _ in 0..old_len {
            self.pop_front();
        }
        Ok(())
    }

    /// Exchange contents and allocator with `other`.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Move the contents out, leaving an empty list on a clone of the same
    /// allocator.
    pub fn take_all(&mut self) -> Self
    where
        A: Clone,
    {
        let empty = Self::with_policy_in(self.policy(), self.allocator().clone());
        mem::replace(self, empty)
    }

    /// Front-to-back iterator over shared references.
    pub fn iter(&self) -> Iter<'_, T, A> {
        Iter::new(self)
    }

    /// Front-to-back iterator over mutable references.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(self)
    }

    // ── Ring plumbing ────────────────────────────────────────────────

    pub(crate) fn node(&self, index: usize) -> &Node<T> {
        match self.arena.get(index) {
            Some(node) => node,
            None => unreachable!("ring link to vacant slot {index}"),
        }
    }

    fn node_mut(&mut self, index: usize) -> &mut Node<T> {
        match self.arena.get_mut(index) {
            Some(node) => node,
            None => unreachable!("ring link to vacant slot {index}"),
        }
    }

    fn links(&self, index: usize) -> Links {
        if index == SENTINEL {
            self.sentinel
        } else {
            self.node(index).links
        }
    }

    fn links_mut(&mut self, index: usize) -> &mut Links {
        if index == SENTINEL {
            &mut self.sentinel
        } else {
            &mut self.node_mut(index).links
        }
    }

    fn position_of(&self, index: usize) -> Position {
        if index == SENTINEL {
            return Position::END;
        }
        match self.arena.generation(index) {
            Some(generation) => Position::new(index, generation),
            None => unreachable!("position of unused slot {index}"),
        }
    }

    /// Slot index for `pos`, which may be the end.
    fn resolve(&self, pos: Position) -> Result<usize, ListError> {
        if pos.is_end() {
            return Ok(SENTINEL);
        }
        if self.arena.is_live(pos.index, pos.generation) {
            Ok(pos.index)
        } else {
            Err(ListError::StalePosition)
        }
    }

    /// Slot index for `pos`, which must be a node.
    fn resolve_node(&self, pos: Position) -> Result<usize, ListError> {
        if pos.is_end() {
            return Err(ListError::EndPosition);
        }
        self.resolve(pos)
    }

    /// Allocate a node for `value` and link it in before `before`.
    fn insert_node(&mut self, before: usize, value: T) -> Result<usize, AllocError> {
        let prev = self.links(before).prev;
        let (index, _) = self.arena.insert(Node {
            links: Links { prev, next: before },
            value,
        })?;
        self.links_mut(prev).next = index;
        self.links_mut(before).prev = index;
        Ok(index)
    }

    /// Detach node `index` from the ring and free its slot.
    fn unlink(&mut self, index: usize) -> Node<T> {
        let Links { prev, next } = self.links(index);
        self.links_mut(prev).next = next;
        self.links_mut(next).prev = prev;
        match self.arena.remove(index) {
            Some(node) => node,
            None => unreachable!("unlinked vacant slot {index}"),
        }
    }

    /// Allocate and link the values of `iter` as a detached chain.
    fn build_chain<I: IntoIterator<Item = T>>(&mut self, iter: I) -> Result<Chain, AllocError> {
        let iter = iter.into_iter();
        self.arena.reserve(iter.size_hint().0)?;
        let mut guard = ChainGuard {
            list: self,
            chain: Chain::EMPTY,
        };
        for value in iter {
            let prev = guard.chain.tail;
            let (index, _) = guard.list.arena.insert(Node {
                links: Links { prev, next: NIL },
                value,
            })?;
            if prev == NIL {
                guard.chain.head = index;
            } else {
                guard.list.node_mut(prev).links.next = index;
            }
            guard.chain.tail = index;
            guard.chain.len += 1;
        }
        Ok(guard.finish())
    }

    /// Link a detached chain into the ring before `before`.
    fn splice_chain(&mut self, chain: Chain, before: usize) {
        if chain.len == 0 {
            return;
        }
        let prev = self.links(before).prev;
        self.links_mut(chain.head).prev = prev;
        self.links_mut(chain.tail).next = before;
        self.links_mut(prev).next = chain.head;
        self.links_mut(before).prev = chain.tail;
    }
}

impl<T: PartialEq, A: Allocator> NodeList<T, A> {
    /// Remove every value equal to `value`. Returns the number removed.
    pub fn remove(&mut self, value: &T) -> usize {
        self.remove_if(|candidate| candidate == value)
    }
}

impl<T: Clone, A: Allocator> NodeList<T, A> {
    /// A list of `len` clones of `value` on `alloc`.
    pub fn try_from_elem_in(len: usize, value: &T, alloc: A) -> Result<Self, AllocError> {
        Self::try_from_iter_in((0..len).map(|_| value.clone()), alloc)
    }

    /// Insert `count` clones of `value` before `pos`.
    ///
    /// Returns the first inserted position, or `pos` when `count == 0`.
    pub fn insert_n(&mut self, pos: Position, count: usize, value: &T) -> Result<Position, ListError> {
        self.insert_iter(pos, (0..count).map(|_| value.clone()))
    }

    /// Replace the contents with `count` clones of `value`.
    pub fn assign_n(&mut self, count: usize, value: &T) -> Result<(), AllocError> {
        self.assign_iter((0..count).map(|_| value.clone()))
    }

    /// Deep copy on a clone of the same allocator.
    pub fn try_clone(&self) -> Result<Self, AllocError>
    where
        A: Clone,
    {
        let mut copy = Self::with_policy_in(self.policy(), self.allocator().clone());
        let chain = copy.build_chain(self.iter().cloned())?;
        copy.splice_chain(chain, SENTINEL);
        Ok(copy)
    }
}

impl<T: Default, A: Allocator> NodeList<T, A> {
    /// A list of `len` default values on `alloc`.
    pub fn try_with_len_in(len: usize, alloc: A) -> Result<Self, AllocError> {
        Self::try_from_iter_in((0..len).map(|_| T::default()), alloc)
    }
}

impl<T, A: Allocator + Default> Default for NodeList<T, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T: Clone, A: Allocator + Clone> Clone for NodeList<T, A> {
    fn clone(&self) -> Self {
        self.try_clone().unwrap_or_else(|err| err.raise())
    }

    /// Keeps this list's allocator and reuses its free node slots.
    fn clone_from(&mut self, source: &Self) {
        self.clear();
        let chain = self
            .build_chain(source.iter().cloned())
            .unwrap_or_else(|err| err.raise());
        self.splice_chain(chain, SENTINEL);
    }
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for NodeList<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, U, A, B> PartialEq<NodeList<U, B>> for NodeList<T, A>
where
    T: PartialEq<U>,
    A: Allocator,
    B: Allocator,
{
    fn eq(&self, other: &NodeList<U, B>) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<T: PartialEq<U>, U, A: Allocator, const N: usize> PartialEq<[U; N]> for NodeList<T, A> {
    fn eq(&self, other: &[U; N]) -> bool {
        self.len() == N && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<T: PartialEq<U>, U, A: Allocator> PartialEq<[U]> for NodeList<T, A> {
    fn eq(&self, other: &[U]) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<T: Eq, A: Allocator> Eq for NodeList<T, A> {}

impl<T: Hash, A: Allocator> Hash for NodeList<T, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        for value in self {
            value.hash(state);
        }
    }
}

impl<T, A: Allocator> Extend<T> for NodeList<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let chain = self.build_chain(iter).unwrap_or_else(|err| err.raise());
        self.splice_chain(chain, SENTINEL);
    }
}

impl<'a, T: Copy + 'a, A: Allocator> Extend<&'a T> for NodeList<T, A> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T> FromIterator<T> for NodeList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::try_from_iter(iter).unwrap_or_else(|err| err.raise())
    }
}

impl<T, const N: usize> From<[T; N]> for NodeList<T> {
    fn from(values: [T; N]) -> Self {
        Self::try_from_iter(values).unwrap_or_else(|err| err.raise())
    }
}
