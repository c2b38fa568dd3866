//! Integration test: `NodeList` lifecycle under an instrumented allocator.
//!
//! Runs long mixed workloads and checks that positions stay attached to
//! their values, that the arena recycles slots instead of growing without
//! bound, and that every node and block is released exactly once.

use std::panic::{catch_unwind, AssertUnwindSafe};

use trove_core::GrowthPolicy;
use trove_list::{ListError, NodeList, Position};
use trove_test_utils::{CountingAllocator, DropCounter, Tracked};

// ── Helpers ──────────────────────────────────────────────────────────

fn values<A: trove_core::Allocator>(list: &NodeList<Tracked<i32>, A>) -> Vec<i32> {
    list.iter().map(|t| t.value).collect()
}

/// Walk forward `len` steps from the end and check we are back at the end.
fn ring_closes<T, A: trove_core::Allocator>(list: &NodeList<T, A>) -> bool {
    let mut pos = list.end();
    for _ in 0..list.len() {
        pos = list.next(pos).unwrap();
        if pos.is_end() {
            return false;
        }
    }
    list.next(pos) == Ok(Position::END)
}

// ── Scenarios ────────────────────────────────────────────────────────

#[test]
fn front_back_interleaving() {
    let mut list = NodeList::new();
    list.push_front(1).unwrap();
    list.push_back(2).unwrap();
    list.push_front(0).unwrap();
    assert_eq!(list, [0, 1, 2]);
    assert!(ring_closes(&list));
}

#[test]
fn remove_returns_count() {
    let mut list = NodeList::from([0, 1, 2, 1]);
    assert_eq!(list.remove(&1), 2);
    assert_eq!(list, [0, 2]);
}

#[test]
fn equality_requires_same_length() {
    assert_eq!(NodeList::from([1, 2, 3]), NodeList::from([1, 2, 3]));
    assert_ne!(NodeList::from([1, 2, 3]), NodeList::from([1, 2]));
}

// ── Lifecycle ────────────────────────────────────────────────────────

#[test]
fn churn_reuses_slots() {
    let alloc = CountingAllocator::new();
    let mut list = NodeList::with_policy_in(GrowthPolicy::new(16), alloc.clone());
    for round in 0..100 {
        for i in 0..16 {
            list.push_back(round * 16 + i).unwrap();
        }
        while list.len() > 8 {
            list.pop_front();
        }
        list.clear();
    }
    assert_eq!(list.capacity(), 16);
    assert_eq!(alloc.allocations(), 1);
}

#[test]
fn mixed_workload_balances_everything() {
    let alloc = CountingAllocator::new();
    let counter = DropCounter::new();
    {
        let mut list = NodeList::new_in(alloc.clone());
        let mut kept = Vec::new();
        for i in 0..40 {
            let pos = list.push_back(counter.track(i)).unwrap();
            if i % 5 == 0 {
                kept.push((pos, i));
            }
        }
        list.remove_if(|t| t.value % 5 == 1);
        let middle = kept[3].0;
        list.insert_iter(middle, (100..110).map(|i| counter.track(i)))
            .unwrap();
        let copy = list.try_clone().unwrap();
        assert_eq!(values(&copy), values(&list));
        for &(pos, value) in &kept {
            assert_eq!(list.get(pos).map(|t| t.value), Ok(value));
        }
        let tail = list.next(kept[5].0).unwrap();
        list.erase_range(tail, list.end()).unwrap();
        assert!(ring_closes(&list));
        let moved = list.take_all();
        assert!(list.is_empty());
        drop(moved);
    }
    assert_eq!(counter.live(), 0);
    assert_eq!(alloc.live_blocks(), 0);
    assert_eq!(alloc.allocations(), alloc.deallocations());
}

// ── Failure injection ────────────────────────────────────────────────

#[test]
fn failed_bulk_insert_leaves_list_unchanged() {
    let alloc = CountingAllocator::new();
    let counter = DropCounter::new();
    let mut list = NodeList::with_policy_in(GrowthPolicy::new(4), alloc.clone());
    for i in 0..4 {
        list.push_back(counter.track(i)).unwrap();
    }
    alloc.fail_now();
    let begin = list.begin();
    let result = list.insert_n(begin, 3, &counter.track(9));
    assert!(matches!(result, Err(ListError::Alloc(_))));
    assert_eq!(values(&list), [0, 1, 2, 3]);
    assert_eq!(counter.live(), 4);
    assert!(ring_closes(&list));
}

#[test]
fn failed_construction_frees_partial_chain() {
    let alloc = CountingAllocator::new();
    let counter = DropCounter::new();
    let source: Vec<_> = (0..10).map(|i| counter.track(i)).collect();
    counter.panic_on_clone_after(6);
    let result = catch_unwind(AssertUnwindSafe(|| {
        NodeList::try_from_iter_in(source.iter().cloned(), alloc.clone())
    }));
    assert!(result.is_err());
    assert_eq!(counter.live(), 10);
    assert_eq!(alloc.live_blocks(), 0);
}

#[test]
fn stale_positions_after_clear() {
    let mut list = NodeList::from(["a", "b", "c"]);
    let positions: Vec<_> = {
        let mut pos = list.begin();
        let mut all = Vec::new();
        while !pos.is_end() {
            all.push(pos);
            pos = list.next(pos).unwrap();
        }
        all
    };
    list.clear();
    list.extend(["x", "y", "z"]);
    for pos in positions {
        assert_eq!(list.get(pos), Err(ListError::StalePosition));
    }
    assert_eq!(list, ["x", "y", "z"]);
}
