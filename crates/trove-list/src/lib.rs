//! Circular doubly linked list over a pluggable allocator.
//!
//! [`NodeList`] arranges its nodes in a ring around one sentinel, so
//! insertion and erasure at any [`Position`] are O(1) and never disturb
//! other nodes.
//!
//! # Architecture
//!
//! ```text
//! NodeList<T, A>
//! ├── sentinel: Links          (header record; next = front, prev = back)
//! └── NodeArena<T, A>          (one allocator-backed block of slots)
//!     ├── Slot × capacity      (generation + Occupied(Node) | Vacant)
//!     ├── free list            (vacant slots threaded by index)
//!     └── watermark            (slots above it never written)
//! ```
//!
//! Links are slot indices rather than pointers, and every slot carries a
//! generation, so a [`Position`] to an erased node is reported as
//! [`ListError::StalePosition`] instead of reaching freed or reused memory.
//!
//! # Failure guarantees
//!
//! Single-node operations allocate before linking, so a failed push or
//! insert leaves the list unchanged. Multi-value operations build a
//! detached chain of nodes first and splice it into the ring only once it
//! is complete; if allocation fails or the source panics, the chain is
//! freed and the list is untouched.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_op_in_unsafe_fn)]

mod arena;
pub mod error;
pub mod iter;
pub mod list;
pub mod position;

pub use error::ListError;
pub use iter::{IntoIter, Iter, IterMut};
pub use list::NodeList;
pub use position::Position;

/// Build a [`NodeList`] on the global allocator.
///
/// - `nodelist![]` is an empty list.
/// - `nodelist![value; n]` holds `n` clones of `value`.
/// - `nodelist![a, b, c]` holds the listed values in order.
///
/// ```
/// use trove_list::nodelist;
///
/// let list = nodelist!["a", "b"];
/// assert_eq!(list, ["a", "b"]);
/// ```
#[macro_export]
macro_rules! nodelist {
    () => {
        $crate::NodeList::new()
    };
    ($value:expr; $n:expr) => {
        match $crate::NodeList::try_from_elem($n, &$value) {
            ::core::result::Result::Ok(list) => list,
            ::core::result::Result::Err(err) => err.raise(),
        }
    };
    ($($value:expr),+ $(,)?) => {
        $crate::NodeList::from([$($value),+])
    };
}
