//! Generation-checked slot handles.

use std::fmt;

/// Stable identifier for an object pool slot.
///
/// The ID is split into two parts:
/// - Lower 32 bits: slot index in the pool
/// - Upper 32 bits: generation counter for detecting stale references
///
/// A slot's generation is bumped every time it is invalidated, so a handle
/// captured before invalidation never matches the object that reuses the slot.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct EntityHandle(u64);

impl EntityHandle {
    /// Creates a handle from index and generation.
    #[inline]
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self(((generation as u64) << 32) | (index as u64))
    }

    /// Returns the slot index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0 as u32
    }

    /// Returns the generation.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Null/invalid handle.
    pub const NULL: Self = Self(u64::MAX);

    /// Checks if this is the null handle.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == u64::MAX
    }
}

impl Default for EntityHandle {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Debug for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            f.write_str("EntityHandle(NULL)")
        } else {
            write!(f, "EntityHandle({}v{})", self.index(), self.generation())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_packing() {
        let h = EntityHandle::new(2045, 7);
        assert_eq!(h.index(), 2045);
        assert_eq!(h.generation(), 7);
        assert!(!h.is_null());
    }

    #[test]
    fn test_same_slot_different_generation() {
        assert_ne!(EntityHandle::new(1, 0), EntityHandle::new(1, 1));
        assert!(EntityHandle::default().is_null());
    }
}
