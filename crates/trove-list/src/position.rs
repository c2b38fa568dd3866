//! Generation-checked node positions.
//!
//! A [`Position`] encodes a node's arena slot plus the slot generation at
//! the time the node was created. It is generation-scoped: once the node
//! is erased the slot's generation moves on, so the position is rejected
//! with [`ListError::StalePosition`](crate::ListError::StalePosition) in
//! O(1) instead of reaching whatever node reuses the slot.

use std::fmt;

/// Slot index reserved for the sentinel, which lives in the list header.
pub(crate) const SENTINEL: usize = usize::MAX - 1;

/// A handle to one node of a [`NodeList`](crate::NodeList), or to its end.
///
/// Positions are plain values: they do not borrow the list and stay
/// valid across every operation except erasure of their own node.
/// Generations wrap after 2³² reuses of a slot; a position held across
/// that many erasures of the same slot is not detected as stale.
///
/// A position is only meaningful for the list that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub(crate) index: usize,
    pub(crate) generation: u32,
}

impl Position {
    /// The position one past the back (and one before the front).
    pub const END: Position = Position {
        index: SENTINEL,
        generation: 0,
    };

    pub(crate) fn new(index: usize, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Whether this is the end position.
    pub fn is_end(&self) -> bool {
        self.index == SENTINEL
    }

    /// Arena slot of the node, or `None` for the end position.
    pub fn slot(&self) -> Option<usize> {
        (!self.is_end()).then_some(self.index)
    }

    /// Slot generation observed when the node was created.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_end() {
            write!(f, "Position(end)")
        } else {
            write!(f, "Position(slot={}, gen={})", self.index, self.generation)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_position() {
        assert!(Position::END.is_end());
        assert_eq!(Position::END.slot(), None);
        assert_eq!(Position::END.to_string(), "Position(end)");
    }

    #[test]
    fn node_position() {
        let pos = Position::new(3, 7);
        assert!(!pos.is_end());
        assert_eq!(pos.slot(), Some(3));
        assert_eq!(pos.generation(), 7);
        assert_eq!(pos.to_string(), "Position(slot=3, gen=7)");
        assert_ne!(pos, Position::new(3, 8));
    }
}
