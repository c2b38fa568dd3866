//! Array-specific error types.

use std::error::Error;
use std::fmt;

use trove_core::AllocError;

/// Errors returned by [`DynamicArray`](crate::DynamicArray) operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrayError {
    /// An index outside the live elements.
    ///
    /// For element access `index < len` is required; for insertion
    /// `index <= len`.
    OutOfRange {
        /// The offending index.
        index: usize,
        /// Length of the array at the time of the call.
        len: usize,
    },
    /// A range that is reversed or extends past the live elements.
    InvalidRange {
        /// Inclusive start of the range.
        start: usize,
        /// Exclusive end of the range.
        end: usize,
        /// Length of the array at the time of the call.
        len: usize,
    },
    /// Growing the storage failed; the array is unchanged.
    Alloc(AllocError),
}

impl fmt::Display for ArrayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { index, len } => {
                write!(f, "index {index} out of range for array of length {len}")
            }
            Self::InvalidRange { start, end, len } => {
                write!(f, "range {start}..{end} invalid for array of length {len}")
            }
            Self::Alloc(err) => write!(f, "array allocation failed: {err}"),
        }
    }
}

impl Error for ArrayError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Alloc(err) => Some(err),
            _ => None,
        }
    }
}

impl From<AllocError> for ArrayError {
    fn from(err: AllocError) -> Self {
        Self::Alloc(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_out_of_range() {
        let err = ArrayError::OutOfRange { index: 7, len: 3 };
        assert_eq!(err.to_string(), "index 7 out of range for array of length 3");
    }

    #[test]
    fn alloc_error_is_source() {
        let err = ArrayError::from(AllocError::CapacityOverflow);
        assert!(err.source().is_some());
        assert!(ArrayError::OutOfRange { index: 0, len: 0 }.source().is_none());
    }
}
