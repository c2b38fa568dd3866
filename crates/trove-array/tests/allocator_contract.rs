//! Integration test: `DynamicArray` against an instrumented allocator.
//!
//! Every block the array obtains must go back to the same allocator
//! instance with the same layout, every value constructed must be
//! dropped exactly once, and a refused allocation at any point of a
//! workload must leave the array in its prior state.

use std::panic::{catch_unwind, AssertUnwindSafe};

use trove_array::{ArrayError, DynamicArray};
use trove_core::{AllocError, GrowthPolicy};
use trove_test_utils::{CountingAllocator, DropCounter, Tracked};

// ── Helpers ──────────────────────────────────────────────────────────

fn values<A: trove_core::Allocator>(array: &DynamicArray<Tracked<u32>, A>) -> Vec<u32> {
    array.iter().map(|t| t.value).collect()
}

// ── Lifecycle ────────────────────────────────────────────────────────

#[test]
fn mixed_workload_balances_every_block_and_value() {
    let alloc = CountingAllocator::new();
    let counter = DropCounter::new();
    {
        let mut array = DynamicArray::new_in(alloc.clone());
        for i in 0..64 {
            array.push_back(counter.track(i)).unwrap();
        }
        array.insert_n(10, 5, &counter.track(1000)).unwrap();
        array
            .insert_iter(0, (0..7).map(|i| counter.track(2000 + i)))
            .unwrap();
        array.erase_range(20..40).unwrap();
        array.shrink_to_fit().unwrap();
        let copy = array.try_clone().unwrap();
        assert_eq!(values(&copy), values(&array));
        let mut drained = copy.into_iter();
        drained.next();
        drained.next_back();
        drop(drained);
        array.truncate(3);
    }
    assert_eq!(counter.live(), 0);
    assert_eq!(alloc.live_blocks(), 0);
    assert_eq!(alloc.allocations(), alloc.deallocations());
}

#[test]
fn allocator_follows_the_array_through_moves() {
    let alloc = CountingAllocator::new();
    let mut array = DynamicArray::new_in(alloc.clone());
    array.extend_from_slice(&[1u64, 2, 3]).unwrap();
    let moved = std::mem::replace(&mut array, DynamicArray::new_in(CountingAllocator::new()));
    assert!(moved.allocator().same_instance(&alloc));
    drop(moved);
    assert_eq!(alloc.live_blocks(), 0);
}

// ── Failure injection ────────────────────────────────────────────────

#[test]
fn every_failed_growth_leaves_prior_state() {
    for budget in 0..6 {
        let alloc = CountingAllocator::new();
        let mut array = DynamicArray::with_policy_in(GrowthPolicy::new(1), alloc.clone());
        alloc.fail_after(budget);
        let mut model = Vec::new();
        for i in 0..100u32 {
            let before = (array.len(), array.capacity());
            match array.push_back(i) {
                Ok(()) => model.push(i),
                Err(err) => {
                    assert!(matches!(err, AllocError::OutOfMemory { .. }));
                    assert_eq!((array.len(), array.capacity()), before);
                    break;
                }
            }
        }
        assert_eq!(array.as_slice(), model.as_slice());
        assert_eq!(alloc.failures(), 1, "budget {budget}");
    }
}

#[test]
fn capacity_overflow_is_reported_not_aborted() {
    let mut array = DynamicArray::<u64>::new();
    array.push_back(1).unwrap();
    assert_eq!(
        array.reserve_additional(usize::MAX),
        Err(AllocError::CapacityOverflow)
    );
    assert_eq!(array.reserve(usize::MAX), Err(AllocError::CapacityOverflow));
    assert_eq!(
        array.insert_n(0, usize::MAX, &0),
        Err(ArrayError::Alloc(AllocError::CapacityOverflow))
    );
    assert_eq!(array, [1]);
}

#[test]
fn failed_clone_reports_and_leaks_nothing() {
    let alloc = CountingAllocator::new();
    let counter = DropCounter::new();
    let mut array = DynamicArray::new_in(alloc.clone());
    for i in 0..8 {
        array.push_back(counter.track(i)).unwrap();
    }
    alloc.fail_now();
    assert!(array.try_clone().is_err());
    assert_eq!(counter.live(), 8);
    assert_eq!(alloc.live_blocks(), 1);
}

// ── Panicking element code ───────────────────────────────────────────

#[test]
fn panicking_clone_in_insert_slice_restores_contents() {
    let counter = DropCounter::new();
    let mut array = DynamicArray::new();
    for i in 0..5 {
        array.push_back(counter.track(i)).unwrap();
    }
    let source: Vec<_> = (100..104).map(|i| counter.track(i)).collect();
    counter.panic_on_clone_after(3);
    let result = catch_unwind(AssertUnwindSafe(|| array.insert_slice(2, &source)));
    assert!(result.is_err());
    assert_eq!(values(&array), [0, 1, 2, 3, 4]);
    drop(source);
    drop(array);
    assert_eq!(counter.live(), 0);
}

#[test]
fn panicking_resize_keeps_original_length() {
    let mut array = DynamicArray::from([1, 2, 3]);
    let mut calls = 0;
    let result = catch_unwind(AssertUnwindSafe(|| {
        array.resize_with(10, || {
            calls += 1;
            if calls == 4 {
                panic!("generator exhausted");
            }
            calls
        })
    }));
    assert!(result.is_err());
    assert_eq!(array, [1, 2, 3]);
}

#[test]
fn panicking_drop_during_erase_keeps_tail_reachable() {
    let counter = DropCounter::new();
    let mut array = DynamicArray::new();
    for i in 0..6 {
        array.push_back(counter.track(i)).unwrap();
    }
    counter.panic_on_drop_after(0);
    let result = catch_unwind(AssertUnwindSafe(|| array.erase_range(1..3)));
    assert!(result.is_err());
    counter.disarm();
    let remaining = values(&array);
    assert_eq!(remaining, [0, 3, 4, 5]);
    drop(array);
    assert_eq!(counter.live(), 0);
}
