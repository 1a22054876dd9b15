//! Capability tags.
//!
//! Lets update logic ask "can this be shot?" without widening the kind enum.

use crate::error::{CoreError, CoreResult};

/// Inline capacity of a [`TagList`].
pub const MAX_TAGS: usize = 8;

/// A role an entity can take part in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Filler for unused slots.
    #[default]
    None,
    /// Hurts the player on contact.
    Hostile,
    /// Can be destroyed by projectiles.
    Shootable,
    /// Destroys shootable entities on contact.
    Damaging,
    /// The world camera follows this entity.
    CameraTarget,
}

/// Append-only list of capabilities with a fixed inline capacity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TagList {
    tags: [Capability; MAX_TAGS],
    len: u8,
}

impl TagList {
    /// Appends every tag in `tags`.
    ///
    /// All or nothing: if the list cannot hold them all, none are added.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::TagOverflow`] when the list would exceed [`MAX_TAGS`].
    pub fn add(&mut self, tags: &[Capability]) -> CoreResult<()> {
        let len = self.len as usize;
        if len + tags.len() > MAX_TAGS {
            return Err(CoreError::TagOverflow { capacity: MAX_TAGS });
        }
        self.tags[len..len + tags.len()].copy_from_slice(tags);
        self.len += tags.len() as u8;
        Ok(())
    }

    /// Returns true if `tag` was added. Linear scan.
    #[must_use]
    pub fn has(&self, tag: Capability) -> bool {
        self.as_slice().contains(&tag)
    }

    /// Returns the added tags in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[Capability] {
        &self.tags[..self.len as usize]
    }

    /// Returns the number of added tags.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    /// Returns true if no tag was added.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}
