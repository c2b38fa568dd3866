//! Element types that count their own constructions and drops.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

#[derive(Default)]
struct Counts {
    created: Cell<usize>,
    dropped: Cell<usize>,
    /// Clones left before the next clone panics.
    clone_fuse: Cell<Option<usize>>,
    /// Drops left before the next drop panics.
    drop_fuse: Cell<Option<usize>>,
}

/// Shared ledger for [`Tracked`] values.
///
/// Every `Tracked` created through [`track`](DropCounter::track) or by
/// cloning counts as one construction; every drop counts once. A correct
/// container leaves `live() == 0` once it and everything it returned are
/// gone.
#[derive(Clone, Default)]
pub struct DropCounter {
    counts: Rc<Counts>,
}

impl DropCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap `value` so its lifecycle is recorded here.
    pub fn track<T>(&self, value: T) -> Tracked<T> {
        self.counts.created.set(self.counts.created.get() + 1);
        Tracked {
            value,
            counts: Rc::clone(&self.counts),
        }
    }

    /// Make the clone after the next `clones` successful ones panic.
    pub fn panic_on_clone_after(&self, clones: usize) {
        self.counts.clone_fuse.set(Some(clones));
    }

    /// Make the drop after the next `drops` successful ones panic.
    ///
    /// Use with care: a panic during unwinding aborts the test process.
    pub fn panic_on_drop_after(&self, drops: usize) {
        self.counts.drop_fuse.set(Some(drops));
    }

    /// Disarm both fuses.
    pub fn disarm(&self) {
        self.counts.clone_fuse.set(None);
        self.counts.drop_fuse.set(None);
    }

    pub fn created(&self) -> usize {
        self.counts.created.get()
    }

    pub fn dropped(&self) -> usize {
        self.counts.dropped.get()
    }

    /// Values created and not yet dropped.
    pub fn live(&self) -> usize {
        self.created() - self.dropped()
    }
}

/// A value whose constructions and drops are recorded by a [`DropCounter`].
pub struct Tracked<T> {
    pub value: T,
    counts: Rc<Counts>,
}

impl<T: Clone> Clone for Tracked<T> {
    fn clone(&self) -> Self {
        if let Some(remaining) = self.counts.clone_fuse.get() {
            if remaining == 0 {
                self.counts.clone_fuse.set(None);
                panic!("Tracked::clone fuse triggered");
            }
            self.counts.clone_fuse.set(Some(remaining - 1));
        }
        self.counts.created.set(self.counts.created.get() + 1);
        Self {
            value: self.value.clone(),
            counts: Rc::clone(&self.counts),
        }
    }
}

impl<T> Drop for Tracked<T> {
    fn drop(&mut self) {
        self.counts.dropped.set(self.counts.dropped.get() + 1);
        if let Some(remaining) = self.counts.drop_fuse.get() {
            if remaining == 0 {
                self.counts.drop_fuse.set(None);
                panic!("Tracked::drop fuse triggered");
            }
            self.counts.drop_fuse.set(Some(remaining - 1));
        }
    }
}

impl<T: PartialEq> PartialEq for Tracked<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: fmt::Debug> fmt::Debug for Tracked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}
