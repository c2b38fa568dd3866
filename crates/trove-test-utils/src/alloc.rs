//! Instrumented allocator with failure injection.

use std::alloc::Layout;
use std::cell::{Cell, RefCell};
use std::ptr::NonNull;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

use indexmap::IndexMap;
use trove_core::{AllocError, Allocator, Global};

/// Counter for unique [`CountingAllocator`] instance ids.
static INSTANCE_COUNTER: AtomicUsize = AtomicUsize::new(1);

struct State {
    id: usize,
    allocations: Cell<usize>,
    deallocations: Cell<usize>,
    failures: Cell<usize>,
    /// Successful allocations left before requests start failing.
    budget: Cell<Option<usize>>,
    /// Live blocks by address.
    live: RefCell<IndexMap<usize, Layout>>,
}

/// A stateful allocator that records every request.
///
/// Clones share state, so a container built with a clone can be inspected
/// through the original handle. Blocks are served by [`Global`].
///
/// Deallocating a block that is not live, or with a layout other than the
/// one it was allocated with, panics immediately.
#[derive(Clone)]
pub struct CountingAllocator {
    state: Rc<State>,
}

impl CountingAllocator {
    pub fn new() -> Self {
        Self {
            state: Rc::new(State {
                id: INSTANCE_COUNTER.fetch_add(1, Ordering::Relaxed),
                allocations: Cell::new(0),
                deallocations: Cell::new(0),
                failures: Cell::new(0),
                budget: Cell::new(None),
                live: RefCell::new(IndexMap::new()),
            }),
        }
    }

    /// Allow `successes` more allocations, then fail every request.
    pub fn fail_after(&self, successes: usize) {
        self.state.budget.set(Some(successes));
    }

    /// Fail every request from now on.
    pub fn fail_now(&self) {
        self.fail_after(0);
    }

    /// Stop injecting failures.
    pub fn never_fail(&self) {
        self.state.budget.set(None);
    }

    /// Identity of the shared state; equal for clones.
    pub fn id(&self) -> usize {
        self.state.id
    }

    /// Whether `other` shares this allocator's state.
    pub fn same_instance(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    /// Successful allocations so far.
    pub fn allocations(&self) -> usize {
        self.state.allocations.get()
    }

    /// Deallocations so far.
    pub fn deallocations(&self) -> usize {
        self.state.deallocations.get()
    }

    /// Requests refused by failure injection.
    pub fn failures(&self) -> usize {
        self.state.failures.get()
    }

    /// Blocks allocated and not yet released.
    pub fn live_blocks(&self) -> usize {
        self.state.live.borrow().len()
    }

    /// Bytes allocated and not yet released.
    pub fn live_bytes(&self) -> usize {
        self.state.live.borrow().values().map(Layout::size).sum()
    }

    /// Size in bytes of the most recently allocated live block.
    pub fn last_block_size(&self) -> Option<usize> {
        self.state.live.borrow().last().map(|(_, layout)| layout.size())
    }
}

impl Default for CountingAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CountingAllocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountingAllocator")
            .field("id", &self.state.id)
            .field("live_blocks", &self.live_blocks())
            .field("allocations", &self.allocations())
            .finish()
    }
}

// SAFETY: blocks come from `Global`, which upholds the contract; the
// bookkeeping only observes addresses.
unsafe impl Allocator for CountingAllocator {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        if let Some(remaining) = self.state.budget.get() {
            if remaining == 0 {
                self.state.failures.set(self.state.failures.get() + 1);
                return Err(AllocError::out_of_memory(layout));
            }
            self.state.budget.set(Some(remaining - 1));
        }
        let ptr = Global.allocate(layout)?;
        self.state.allocations.set(self.state.allocations.get() + 1);
        self.state
            .live
            .borrow_mut()
            .insert(ptr.as_ptr() as usize, layout);
        Ok(ptr)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        let recorded = self.state.live.borrow_mut().shift_remove(&(ptr.as_ptr() as usize));
        match recorded {
            Some(original) => assert_eq!(
                original, layout,
                "block {ptr:p} released with a different layout"
            ),
            None => panic!("block {ptr:p} is not live in allocator {}", self.state.id),
        }
        self.state.deallocations.set(self.state.deallocations.get() + 1);
        // SAFETY: the block was produced by `Global` with this layout.
        unsafe { Global.deallocate(ptr, layout) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_live_blocks() {
        let alloc = CountingAllocator::new();
        let a = alloc.allocate_array::<u32>(4).unwrap();
        let b = alloc.allocate_array::<u64>(2).unwrap();
        assert_eq!(alloc.live_blocks(), 2);
        assert_eq!(alloc.live_bytes(), 32);
        // SAFETY: same instance and counts.
        unsafe {
            alloc.deallocate_array(a, 4);
            alloc.deallocate_array(b, 2);
        }
        assert_eq!(alloc.live_blocks(), 0);
        assert_eq!(alloc.allocations(), 2);
        assert_eq!(alloc.deallocations(), 2);
    }

    #[test]
    fn budget_injects_failure() {
        let alloc = CountingAllocator::new();
        alloc.fail_after(1);
        let ok = alloc.allocate_array::<u8>(1).unwrap();
        assert!(alloc.allocate_array::<u8>(1).is_err());
        assert_eq!(alloc.failures(), 1);
        alloc.never_fail();
        let again = alloc.allocate_array::<u8>(1).unwrap();
        // SAFETY: same instance and counts.
        unsafe {
            alloc.deallocate_array(ok, 1);
            alloc.deallocate_array(again, 1);
        }
    }

    #[test]
    fn clones_share_state() {
        let alloc = CountingAllocator::new();
        let clone = alloc.clone();
        assert!(alloc.same_instance(&clone));
        assert_eq!(alloc.id(), clone.id());
        assert!(!alloc.same_instance(&CountingAllocator::new()));
    }

    #[test]
    #[should_panic(expected = "different layout")]
    fn mismatched_layout_panics() {
        let alloc = CountingAllocator::new();
        let ptr = alloc.allocate_array::<u32>(4).unwrap();
        // SAFETY: intentionally wrong count; the allocator panics before
        // touching the block.
        unsafe { alloc.deallocate_array(ptr, 3) };
    }
}
