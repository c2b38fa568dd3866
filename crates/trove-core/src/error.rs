//! Allocation error type.

use std::alloc::{handle_alloc_error, Layout};
use std::error::Error;
use std::fmt;

/// Errors reported by an [`Allocator`](crate::Allocator) or by the layout
/// computation that precedes a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AllocError {
    /// The requested element count does not fit in a valid [`Layout`]
    /// (total size would exceed `isize::MAX`).
    CapacityOverflow,
    /// The allocator could not provide a block of the requested layout.
    OutOfMemory {
        /// Requested block size in bytes.
        size: usize,
        /// Requested block alignment in bytes.
        align: usize,
    },
}

impl AllocError {
    /// Build an [`AllocError::OutOfMemory`] for the given layout.
    pub fn out_of_memory(layout: Layout) -> Self {
        Self::OutOfMemory {
            size: layout.size(),
            align: layout.align(),
        }
    }

    /// Divert this error the way `std` collections do.
    ///
    /// Capacity overflow panics; exhaustion goes through
    /// [`std::alloc::handle_alloc_error`]. Used by the infallible trait
    /// impls (`Clone`, `Extend`, `FromIterator`) of the containers.
    pub fn raise(self) -> ! {
        match self {
            Self::CapacityOverflow => panic!("capacity overflow"),
            Self::OutOfMemory { size, align } => match Layout::from_size_align(size, align) {
                Ok(layout) => handle_alloc_error(layout),
                Err(_) => panic!("allocation of {size} bytes (align {align}) failed"),
            },
        }
    }
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityOverflow => write!(f, "capacity overflow"),
            Self::OutOfMemory { size, align } => {
                write!(f, "out of memory: requested {size} bytes with alignment {align}")
            }
        }
    }
}

impl Error for AllocError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_memory_records_layout() {
        let layout = Layout::array::<u64>(16).unwrap();
        assert_eq!(
            AllocError::out_of_memory(layout),
            AllocError::OutOfMemory { size: 128, align: 8 }
        );
    }

    #[test]
    fn display_mentions_size() {
        let err = AllocError::OutOfMemory { size: 64, align: 8 };
        assert_eq!(
            err.to_string(),
            "out of memory: requested 64 bytes with alignment 8"
        );
        assert_eq!(AllocError::CapacityOverflow.to_string(), "capacity overflow");
    }

    #[test]
    #[should_panic(expected = "capacity overflow")]
    fn raise_capacity_overflow_panics() {
        AllocError::CapacityOverflow.raise();
    }
}
