//! Test utilities for Trove development.
//!
//! Provides an instrumented allocator ([`CountingAllocator`]) and
//! instrumented element types ([`DropCounter`], [`Tracked`]) so tests can
//! check the container lifecycle contract: every element dropped exactly
//! once, every block released exactly once with its original layout, and
//! failed operations leaving containers untouched.

#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod alloc;
pub mod tracked;

pub use alloc::CountingAllocator;
pub use tracked::{DropCounter, Tracked};
