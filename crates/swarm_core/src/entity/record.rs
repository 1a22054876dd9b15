//! The pool slot record.

use swarm_shared::{Rect, Vec2};

use super::{EntityHandle, Payload, TagList};

/// Closed set of simulation object types.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Empty slot.
    #[default]
    None,
    /// A shot fired by the player.
    Projectile,
    /// A chasing square.
    Enemy,
    /// The controlled square.
    Player,
}

/// One simulation object.
///
/// Fixed layout, `Copy`, no destructor. The default value is the zeroed
/// record every slot returns to on invalidation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Entity {
    handle: EntityHandle,
    valid: bool,
    /// Top-left corner in world space.
    pub pos: Vec2,
    /// Velocity in pixels per second.
    pub vel: Vec2,
    /// Extent in pixels.
    pub size: Vec2,
    /// Sub-pixel movement carried between ticks.
    pub remainder: Vec2,
    /// Type discriminator.
    pub kind: EntityKind,
    /// Type-specific state.
    pub payload: Payload,
    /// Capability tags.
    pub tags: TagList,
    /// Hit points.
    pub health: f32,
    /// -1.0 when facing left, 1.0 when facing right.
    pub facing: f32,
    /// Entity this one is aiming at, if any.
    pub target: Option<EntityHandle>,
}

impl Entity {
    /// Returns the handle stamped by the pool at allocation.
    #[inline]
    #[must_use]
    pub const fn handle(&self) -> EntityHandle {
        self.handle
    }

    /// Returns true while the slot holds a live object.
    #[inline]
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    /// Sets position and size in one go.
    pub fn setup(&mut self, pos: Vec2, size: Vec2) {
        self.pos = pos;
        self.size = size;
    }

    /// Axis-aligned bounds in world space.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Center of the bounds.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.bounds().center()
    }

    pub(crate) fn activate(&mut self, handle: EntityHandle) {
        self.handle = handle;
        self.valid = true;
    }
}
