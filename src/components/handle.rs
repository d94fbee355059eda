//! Generation-checked component handles.

use std::fmt;

/// Stable identifier for a component slot in [`Components`](super::Components).
///
/// A handle pairs a slot index with the generation the slot had when the
/// component was inserted. Removing the component bumps the slot generation,
/// so every handle issued before the removal stops resolving. A handle never
/// dangles and never resolves to a later occupant of the same slot.
///
/// Handles are plain `Copy` data; holding one does not keep the component
/// alive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Handle {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl Handle {
    /// Returns the slot index.
    #[inline]
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Returns the generation this handle was issued under.
    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}
