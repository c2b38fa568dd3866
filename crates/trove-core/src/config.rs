//! Capacity growth configuration.

use std::mem;

use crate::error::AllocError;

/// Amortized growth rule shared by every Trove container.
///
/// When storage must grow, the new capacity is the largest of: double the
/// current capacity, the required capacity, and [`min_capacity`]. Doubling
/// bounds the total relocation cost of `n` sequential appends to O(n).
/// Immutable after construction.
///
/// [`min_capacity`]: GrowthPolicy::min_capacity
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GrowthPolicy {
    min_capacity: usize,
}

impl GrowthPolicy {
    /// Default floor for the first non-empty allocation.
    pub const DEFAULT_MIN_CAPACITY: usize = 4;

    /// Create a policy with the given floor for the first allocation.
    ///
    /// A floor of zero is raised to one.
    pub fn new(min_capacity: usize) -> Self {
        Self {
            min_capacity: min_capacity.max(1),
        }
    }

    /// Policy tuned for elements of type `T`.
    ///
    /// Small elements start with a larger first block so that tiny arrays
    /// do not reallocate on every push: 8 slots for 1-byte elements, 4 up
    /// to 1 KiB, and 1 beyond that.
    pub fn for_type<T>() -> Self {
        let size = mem::size_of::<T>();
        let min_capacity = if size == 1 {
            8
        } else if size <= 1024 {
            Self::DEFAULT_MIN_CAPACITY
        } else {
            1
        };
        Self::new(min_capacity)
    }

    /// Floor for the first non-empty allocation.
    pub fn min_capacity(&self) -> usize {
        self.min_capacity
    }

    /// Capacity to grow to so that at least `required` slots exist.
    ///
    /// Returns `current` unchanged when it already suffices.
    pub fn next_capacity(&self, current: usize, required: usize) -> usize {
        if required <= current {
            return current;
        }
        current
            .saturating_mul(2)
            .max(required)
            .max(self.min_capacity)
    }

    /// `current + additional`, or [`AllocError::CapacityOverflow`].
    pub fn required(current: usize, additional: usize) -> Result<usize, AllocError> {
        current
            .checked_add(additional)
            .ok_or(AllocError::CapacityOverflow)
    }
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MIN_CAPACITY)
    }
}
