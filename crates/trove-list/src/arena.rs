//! Generation-checked slot arena holding the nodes of a [`NodeList`](crate::NodeList).
//!
//! The arena owns one allocator-backed block of [`Slot`]s. Slots below the
//! `initialized` watermark are either occupied by a node or vacant and
//! threaded onto an index-linked free list; slots at or above it have never
//! been written. Freeing a slot bumps its generation, which is how stale
//! [`Position`](crate::Position)s are detected.
//!
//! Indices are stable: growth relocates the whole block, so a node keeps
//! its index for as long as it is live.

use std::marker::PhantomData;
use std::mem;
use std::ptr::{self, NonNull};

use trove_core::{AllocError, Allocator, GrowthPolicy};

/// End-of-chain marker for the free list and for detached chains.
pub(crate) const NIL: usize = usize::MAX;

/// Ring links of one node (or of the sentinel).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Links {
    pub(crate) prev: usize,
    pub(crate) next: usize,
}

/// A value plus its ring links.
pub(crate) struct Node<T> {
    pub(crate) links: Links,
    pub(crate) value: T,
}

enum Entry<T> {
    Occupied(Node<T>),
    Vacant { next_free: usize },
}

struct Slot<T> {
    /// Bumped (wrapping) each time the slot is freed.
    generation: u32,
    entry: Entry<T>,
}

pub(crate) struct NodeArena<T, A: Allocator> {
    slots: NonNull<Slot<T>>,
    capacity: usize,
    /// Slots `0..initialized` hold a valid `Slot<T>`.
    initialized: usize,
    free_head: usize,
    live: usize,
    /// Generation given to slots written above the watermark.
    generation_base: u32,
    alloc: A,
    policy: GrowthPolicy,
    _owns: PhantomData<Slot<T>>,
}

// SAFETY: the arena uniquely owns its block and the nodes in it.
unsafe impl<T: Send, A: Allocator + Send> Send for NodeArena<T, A> {}
// SAFETY: shared access only yields `&T`.
unsafe impl<T: Sync, A: Allocator + Sync> Sync for NodeArena<T, A> {}

impl<T, A: Allocator> NodeArena<T, A> {
    pub(crate) fn new_in(policy: GrowthPolicy, alloc: A) -> Self {
        Self {
            slots: NonNull::dangling(),
            capacity: 0,
            initialized: 0,
            free_head: NIL,
            live: 0,
            generation_base: 0,
            alloc,
            policy,
            _owns: PhantomData,
        }
    }

    /// Number of occupied slots.
    pub(crate) fn len(&self) -> usize {
        self.live
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn allocator(&self) -> &A {
        &self.alloc
    }

    pub(crate) fn policy(&self) -> GrowthPolicy {
        self.policy
    }

    /// Ensure `additional` more nodes can be inserted without growing.
    ///
    /// Every slot that is not occupied is either on the free list or above
    /// the watermark, so the spare room is `capacity - live`.
    pub(crate) fn reserve(&mut self, additional: usize) -> Result<(), AllocError> {
        let required = GrowthPolicy::required(self.live, additional)?;
        if required <= self.capacity {
            return Ok(());
        }
        let capacity = self.policy.next_capacity(self.capacity, required);
        self.grow_to(capacity)
    }

    fn grow_to(&mut self, new_capacity: usize) -> Result<(), AllocError> {
        debug_assert!(new_capacity > self.capacity);
        let new_slots = self.alloc.allocate_array::<Slot<T>>(new_capacity)?;
        // SAFETY: the first `initialized` slots are valid and the new block
        // is a distinct allocation with room for them. Afterwards they are
        // owned by the new block only.
        unsafe {
            ptr::copy_nonoverlapping(self.slots.as_ptr(), new_slots.as_ptr(), self.initialized);
        }
        let old_slots = mem::replace(&mut self.slots, new_slots);
        let old_capacity = mem::replace(&mut self.capacity, new_capacity);
        log::trace!(
            "node arena grown: {old_capacity} -> {new_capacity} slots ({} live)",
            self.live
        );
        // SAFETY: the old block came from `self.alloc` with `old_capacity`
        // slots, or is the dangling placeholder with capacity zero.
        unsafe { self.release(old_slots, old_capacity) };
        Ok(())
    }

    /// Store `node` in a free slot, growing if none is left.
    ///
    /// Returns the slot index and its current generation. On failure the
    /// arena is unchanged and `node` is dropped.
    pub(crate) fn insert(&mut self, node: Node<T>) -> Result<(usize, u32), AllocError> {
        if self.free_head != NIL {
            let index = self.free_head;
            let slot = self.slot_mut(index);
            let next_free = match slot.entry {
                Entry::Vacant { next_free } => next_free,
                Entry::Occupied(_) => unreachable!("occupied slot {index} on the free list"),
            };
            slot.entry = Entry::Occupied(node);
            let generation = slot.generation;
            self.free_head = next_free;
            self.live += 1;
            return Ok((index, generation));
        }
        if self.initialized == self.capacity {
            self.reserve(1)?;
        }
        let index = self.initialized;
        let generation = self.generation_base;
        // SAFETY: `index < capacity` and the slot is above the watermark,
        // so it is uninitialized and nothing else refers to it.
        unsafe {
            self.slots.as_ptr().add(index).write(Slot {
                generation,
                entry: Entry::Occupied(node),
            });
        }
        self.initialized += 1;
        self.live += 1;
        Ok((index, generation))
    }

    /// Give the block back to the allocator if no node is live.
    ///
    /// Slots written afterwards start past every generation issued so far,
    /// so positions taken before the release stay stale.
    pub(crate) fn release_if_empty(&mut self) {
        if self.live != 0 || self.capacity == 0 {
            return;
        }
        let base = (0..self.initialized)
            .filter_map(|index| self.generation(index))
            .fold(self.generation_base, u32::max);
        let old_slots = mem::replace(&mut self.slots, NonNull::dangling());
        let old_capacity = mem::replace(&mut self.capacity, 0);
        self.initialized = 0;
        self.free_head = NIL;
        self.generation_base = base;
        log::trace!("node arena released: {old_capacity} slots");
        // SAFETY: every slot is vacant, so none owns a value, and the block
        // came from `self.alloc` with `old_capacity` slots.
        unsafe { self.release(old_slots, old_capacity) };
    }

    /// Vacate slot `index` and return its node, or `None` if it is not occupied.
    pub(crate) fn remove(&mut self, index: usize) -> Option<Node<T>> {
        if !self.is_occupied(index) {
            return None;
        }
        let free_head = self.free_head;
        let slot = self.slot_mut(index);
        let entry = mem::replace(&mut slot.entry, Entry::Vacant { next_free: free_head });
        slot.generation = slot.generation.wrapping_add(1);
        self.free_head = index;
        self.live -= 1;
        match entry {
            Entry::Occupied(node) => Some(node),
            Entry::Vacant { .. } => None,
        }
    }

    pub(crate) fn get(&self, index: usize) -> Option<&Node<T>> {
        match &self.slot(index)?.entry {
            Entry::Occupied(node) => Some(node),
            Entry::Vacant { .. } => None,
        }
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Node<T>> {
        if index >= self.initialized {
            return None;
        }
        match &mut self.slot_mut(index).entry {
            Entry::Occupied(node) => Some(node),
            Entry::Vacant { .. } => None,
        }
    }

    /// Current generation of slot `index`, if it has ever been used.
    pub(crate) fn generation(&self, index: usize) -> Option<u32> {
        self.slot(index).map(|slot| slot.generation)
    }

    /// Whether slot `index` is occupied by the node created at `generation`.
    pub(crate) fn is_live(&self, index: usize, generation: u32) -> bool {
        self.slot(index).is_some_and(|slot| {
            slot.generation == generation && matches!(slot.entry, Entry::Occupied(_))
        })
    }

    fn is_occupied(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    fn slot(&self, index: usize) -> Option<&Slot<T>> {
        if index >= self.initialized {
            return None;
        }
        // SAFETY: below the watermark, so the slot is initialized.
        Some(unsafe { &*self.slots.as_ptr().add(index) })
    }

    fn slot_mut(&mut self, index: usize) -> &mut Slot<T> {
        assert!(index < self.initialized, "slot {index} above watermark");
        // SAFETY: below the watermark, and `&mut self` is unique.
        unsafe { &mut *self.slots.as_ptr().add(index) }
    }

    /// Unchecked view used by [`IterMut`](crate::IterMut).
    pub(crate) fn raw_slots(&mut self) -> RawSlots<'_, T> {
        RawSlots {
            base: self.slots,
            initialized: self.initialized,
            _marker: PhantomData,
        }
    }

    /// # Safety
    ///
    /// `slots`/`capacity` must describe a block obtained from `self.alloc`,
    /// or the dangling placeholder with capacity zero.
    unsafe fn release(&self, slots: NonNull<Slot<T>>, capacity: usize) {
        if capacity != 0 {
            // SAFETY: forwarded from the caller.
            unsafe { self.alloc.deallocate_array(slots, capacity) }
        }
    }
}

impl<T, A: Allocator> Drop for NodeArena<T, A> {
    fn drop(&mut self) {
        let initialized = ptr::slice_from_raw_parts_mut(self.slots.as_ptr(), self.initialized);
        self.initialized = 0;
        // SAFETY: slots below the old watermark are valid and dropped once;
        // the block then goes back to the allocator it came from.
        unsafe {
            ptr::drop_in_place(initialized);
            self.release(self.slots, self.capacity);
        }
    }
}

/// Mutable access to distinct nodes through a shared base pointer.
///
/// Borrowing the arena mutably for `'a` keeps the block from being
/// relocated or freed while the view exists.
pub(crate) struct RawSlots<'a, T> {
    base: NonNull<Slot<T>>,
    initialized: usize,
    _marker: PhantomData<&'a mut Slot<T>>,
}

impl<'a, T> RawSlots<'a, T> {
    /// # Safety
    ///
    /// No other reference to the node at `index` may be live for `'a`.
    pub(crate) unsafe fn node_mut(&self, index: usize) -> &'a mut Node<T> {
        assert!(index < self.initialized, "slot {index} above watermark");
        // SAFETY: the slot is initialized and the caller guarantees
        // exclusive access to it.
        match unsafe { &mut (*self.base.as_ptr().add(index)).entry } {
            Entry::Occupied(node) => node,
            Entry::Vacant { .. } => unreachable!("ring link to vacant slot {index}"),
        }
    }
}
