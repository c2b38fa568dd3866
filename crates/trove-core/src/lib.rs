//! Allocator contract and shared allocation types for Trove containers.
//!
//! This is the leaf crate of the workspace. Both containers
//! (`trove-array` and `trove-list`) depend on it and on nothing else
//! in the workspace; they share no code beyond what lives here:
//!
//! - [`Allocator`]: the pluggable allocator contract, plus the default
//!   [`Global`] implementation over `std::alloc`.
//! - [`AllocError`]: the only failure an allocator may report.
//! - [`GrowthPolicy`]: the amortized capacity growth rule.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod alloc;
pub mod config;
pub mod error;

pub use alloc::{array_layout, Allocator, Global};
pub use config::GrowthPolicy;
pub use error::AllocError;
