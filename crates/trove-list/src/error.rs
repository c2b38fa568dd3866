//! List-specific error types.

use std::error::Error;
use std::fmt;

use trove_core::AllocError;

/// Errors returned by [`NodeList`](crate::NodeList) operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListError {
    /// The end position was given where a node is required.
    EndPosition,
    /// The position refers to a node that has since been erased.
    StalePosition,
    /// `last` is not reachable from `first` by moving forward.
    InvalidRange,
    /// Allocating a node slot failed; the list is unchanged.
    Alloc(AllocError),
}

impl fmt::Display for ListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndPosition => write!(f, "the end position does not refer to a node"),
            Self::StalePosition => write!(f, "position refers to an erased node"),
            Self::InvalidRange => write!(f, "range end is not reachable from its start"),
            Self::Alloc(err) => write!(f, "list allocation failed: {err}"),
        }
    }
}

impl Error for ListError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Alloc(err) => Some(err),
            _ => None,
        }
    }
}

impl From<AllocError> for ListError {
    fn from(err: AllocError) -> Self {
        Self::Alloc(err)
    }
}
