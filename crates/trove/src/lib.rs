//! Trove: sequence containers with explicit element lifecycles over a
//! pluggable allocator.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Trove sub-crates. For most users, adding `trove` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use trove::prelude::*;
//!
//! let mut array = DynamicArray::new();
//! for i in 0..5 {
//!     array.push_back(i)?;
//! }
//! array.insert(2, 99)?;
//! assert_eq!(array, [0, 1, 99, 2, 3, 4]);
//!
//! let mut list = NodeList::new();
//! let one = list.push_back(1)?;
//! list.push_front(0)?;
//! list.insert(list.end(), 2)?;
//! list.erase(one)?;
//! assert_eq!(list, [0, 2]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Custom allocators
//!
//! Every container takes its allocator as a value and returns each block
//! to the same instance:
//!
//! ```rust
//! use std::alloc::Layout;
//! use std::ptr::NonNull;
//! use trove::prelude::*;
//!
//! #[derive(Clone, Copy, Default)]
//! struct Passthrough;
//!
//! // SAFETY: forwards to `Global`.
//! unsafe impl Allocator for Passthrough {
//!     fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
//!         Global.allocate(layout)
//!     }
//!     unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
//!         unsafe { Global.deallocate(ptr, layout) }
//!     }
//! }
//!
//! let mut list = NodeList::new_in(Passthrough);
//! list.extend(["a", "b"]);
//! assert_eq!(list.len(), 2);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`memory`] | `trove-core` | `Allocator`, `Global`, `AllocError`, `GrowthPolicy` |
//! | [`array`] | `trove-array` | `DynamicArray`, `ArrayError`, owning iterator |
//! | [`list`] | `trove-list` | `NodeList`, `Position`, `ListError`, iterators |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Allocator contract and growth configuration (`trove-core`).
///
/// Implement [`memory::Allocator`] to supply storage to the containers;
/// [`memory::Global`] is the default.
pub use trove_core as memory;

/// Growable contiguous array (`trove-array`).
///
/// [`array::DynamicArray`] plus its error type and owning iterator.
pub use trove_array as array;

/// Circular doubly linked list (`trove-list`).
///
/// [`list::NodeList`] and its generation-checked [`list::Position`]s.
pub use trove_list as list;

pub use trove_array::dynarray;
pub use trove_list::nodelist;

/// Common imports for typical Trove usage.
///
/// ```rust
/// use trove::prelude::*;
/// ```
///
/// This imports both containers, their error types, the allocator
/// contract, and the growth policy.
pub mod prelude {
    // Allocation
    pub use trove_core::{AllocError, Allocator, Global, GrowthPolicy};

    // Containers
    pub use trove_array::DynamicArray;
    pub use trove_list::{NodeList, Position};

    // Errors
    pub use trove_array::ArrayError;
    pub use trove_list::ListError;

    // Constructors
    pub use trove_array::dynarray;
    pub use trove_list::nodelist;
}
