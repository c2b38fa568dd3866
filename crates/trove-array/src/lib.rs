//! Growable contiguous array over a pluggable allocator.
//!
//! [`DynamicArray`] is the contiguous container of the Trove workspace.
//! It stores its live values at the front of a single block obtained
//! from an [`Allocator`](trove_core::Allocator), grows by at least
//! doubling, and offers positional insert and erase with the same
//! failure guarantees as appends.
//!
//! # Architecture
//!
//! ```text
//! DynamicArray<T, A>
//! ├── RawBuf<T, A>   (one block of `capacity` slots, owns the allocator)
//! ├── len            (slots 0..len are live)
//! └── GrowthPolicy   (next capacity on growth)
//! ```
//!
//! # Failure guarantees
//!
//! Allocation failure is reported as a value, never by aborting:
//!
//! - Growth allocates the new block before touching the old one, so a
//!   failed append, reserve, or insert leaves the array unchanged.
//! - Multi-value inserts and extends restore the original contents if
//!   an element's `Clone` or the source iterator panics part-way.
//! - Erasing slides the tail down even if an element's `Drop` panics.
//!
//! Infallible trait impls (`Clone`, `Extend`, `FromIterator`, `From`)
//! have no error channel and treat allocation failure the way `Vec`
//! does, via [`AllocError::raise`](trove_core::AllocError::raise).
//!
//! # Unsafe
//!
//! This crate manages uninitialized memory directly. Every `unsafe`
//! block carries a `// SAFETY:` comment stating the invariant it relies
//! on; the central one is that exactly slots `0..len` are initialized.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod array;
pub mod error;
pub mod iter;
mod raw;

pub use array::DynamicArray;
pub use error::ArrayError;
pub use iter::IntoIter;

/// Build a [`DynamicArray`] on the global allocator.
///
/// - `dynarray![]` is an empty array.
/// - `dynarray![value; n]` holds `n` clones of `value`.
/// - `dynarray![a, b, c]` holds the listed values in order.
///
/// Panics (or aborts, on out-of-memory) if storage cannot be obtained.
///
/// ```
/// use trove_array::dynarray;
///
/// let zeros = dynarray![0u8; 4];
/// assert_eq!(zeros, [0, 0, 0, 0]);
/// let listed = dynarray![1, 2, 3];
/// assert_eq!(listed.len(), 3);
/// ```
#[macro_export]
macro_rules! dynarray {
    () => {
        $crate::DynamicArray::new()
    };
    ($value:expr; $n:expr) => {
        match $crate::DynamicArray::try_from_elem($n, &$value) {
            ::core::result::Result::Ok(array) => array,
            ::core::result::Result::Err(err) => err.raise(),
        }
    };
    ($($value:expr),+ $(,)?) => {
        $crate::DynamicArray::from([$($value),+])
    };
}
