//! Benchmark workloads for the Trove containers.
//!
//! Provides deterministic, seeded inputs so runs are comparable across
//! machines and commits:
//!
//! - [`insertion_points`]: a valid insertion index for each step of a
//!   growing sequence
//! - [`values`]: pseudo-random payloads
//! - [`filled_array`] / [`filled_list`]: pre-populated containers

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use trove_array::DynamicArray;
use trove_list::{NodeList, Position};

/// Default seed for benchmark inputs.
pub const SEED: u64 = 0x7207_e5ee_d5ee_d001;

/// For step `i` of `n`, an index in `0..=i`.
///
/// Inserting at each returned index in order into an initially empty
/// sequence is always in bounds.
pub fn insertion_points(n: usize, seed: u64) -> Vec<usize> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|i| (rng.next_u64() % (i as u64 + 1)) as usize)
        .collect()
}

/// `n` pseudo-random payloads.
pub fn values(n: usize, seed: u64) -> Vec<u64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n).map(|_| rng.next_u64()).collect()
}

/// An array holding `0..n`, sized exactly.
pub fn filled_array(n: usize) -> DynamicArray<u64> {
    let mut array = DynamicArray::new();
    array.reserve(n).unwrap();
    array.try_extend(0..n as u64).unwrap();
    array
}

/// A list holding `0..n`, plus the position of every node front to back.
pub fn filled_list(n: usize) -> (NodeList<u64>, Vec<Position>) {
    let mut list = NodeList::new();
    list.reserve(n).unwrap();
    let positions = (0..n as u64)
        .map(|value| list.push_back(value).unwrap())
        .collect();
    (list, positions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insertion_points_are_in_bounds() {
        for (i, &point) in insertion_points(500, SEED).iter().enumerate() {
            assert!(point <= i);
        }
    }

    #[test]
    fn inputs_are_deterministic() {
        assert_eq!(values(16, 7), values(16, 7));
        assert_ne!(values(16, 7), values(16, 8));
    }

    #[test]
    fn filled_containers_match() {
        let array = filled_array(100);
        let (list, positions) = filled_list(100);
        assert_eq!(array.capacity(), 100);
        assert!(list.iter().eq(array.iter()));
        assert_eq!(list.get(positions[42]), Ok(&42));
    }
}
