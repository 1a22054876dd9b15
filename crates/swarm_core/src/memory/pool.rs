//! # Object Pool
//!
//! Fixed-capacity array of [`Entity`] slots addressed by generation-checked
//! handles. Slots and generation counters live in an arena, so the pool never
//! touches the heap after construction.

use tracing::debug;

use super::Arena;
use crate::entity::{Entity, EntityHandle, EntityKind};
use crate::error::{CoreError, CoreResult};

/// Pool of simulation objects.
///
/// Allocation takes the first invalid slot in index order, so freed slots
/// are reused immediately and iteration order is stable.
///
/// # Example
///
/// ```rust
/// use swarm_core::{Arena, EntityKind, ObjectPool};
///
/// let persistent = Arena::new("persistent");
/// let mut pool = ObjectPool::new_in(&persistent, 3).unwrap();
///
/// let enemy = pool.allocate().unwrap();
/// enemy.kind = EntityKind::Enemy;
/// let handle = enemy.handle();
///
/// pool.invalidate(handle).unwrap();
/// assert!(pool.get(handle).is_err());
/// ```
pub struct ObjectPool<'a> {
    slots: &'a mut [Entity],
    generations: &'a mut [u32],
    live: usize,
}

impl<'a> ObjectPool<'a> {
    /// Builds a pool of `capacity` zeroed slots inside `arena`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ArenaExhausted`] when the arena cannot hold the slots.
    pub fn new_in(arena: &'a Arena, capacity: usize) -> CoreResult<Self> {
        let slots = arena.alloc_slice_fill_with(capacity, |_| Entity::default())?;
        let generations = arena.alloc_slice_fill_with(capacity, |_| 0u32)?;
        debug!(capacity, arena = arena.label(), "object pool created");
        Ok(Self {
            slots,
            generations,
            live: 0,
        })
    }

    /// Returns the number of slots.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of valid objects.
    #[inline]
    #[must_use]
    pub const fn live_count(&self) -> usize {
        self.live
    }

    /// Claims the first invalid slot.
    ///
    /// The returned record is all-default apart from its handle and valid flag.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::PoolExhausted`] when every slot is valid.
    pub fn allocate(&mut self) -> CoreResult<&mut Entity> {
        let capacity = self.capacity();
        let index = self
            .slots
            .iter()
            .position(|slot| !slot.is_valid())
            .ok_or(CoreError::PoolExhausted { capacity })?;

        let handle = EntityHandle::new(index as u32, self.generations[index]);
        self.live += 1;
        let slot = &mut self.slots[index];
        slot.activate(handle);
        Ok(slot)
    }

    /// Destroys the object behind `handle`.
    ///
    /// The record is zeroed and the slot generation bumped, so every copy of
    /// `handle` turns stale.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::StaleHandle`] if `handle` is not live.
    pub fn invalidate(&mut self, handle: EntityHandle) -> CoreResult<()> {
        let index = self.resolve(handle)?;
        self.slots[index] = Entity::default();
        self.generations[index] = self.generations[index].wrapping_add(1);
        self.live -= 1;
        Ok(())
    }

    /// Returns true if `handle` refers to a live object.
    #[must_use]
    pub fn is_live(&self, handle: EntityHandle) -> bool {
        self.resolve(handle).is_ok()
    }

    /// Borrows the object behind `handle`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::StaleHandle`] if `handle` is not live.
    pub fn get(&self, handle: EntityHandle) -> CoreResult<&Entity> {
        let index = self.resolve(handle)?;
        Ok(&self.slots[index])
    }

    /// Mutably borrows the object behind `handle`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::StaleHandle`] if `handle` is not live.
    pub fn get_mut(&mut self, handle: EntityHandle) -> CoreResult<&mut Entity> {
        let index = self.resolve(handle)?;
        Ok(&mut self.slots[index])
    }

    /// Handle of the object in slot `index`, if that slot is valid.
    #[must_use]
    pub fn live_handle_at(&self, index: usize) -> Option<EntityHandle> {
        self.slots
            .get(index)
            .filter(|slot| slot.is_valid())
            .map(Entity::handle)
    }

    /// Iterates valid objects in ascending slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.slots.iter().filter(|slot| slot.is_valid())
    }

    /// Snapshots the handles of every valid object of `kind` into `frame`.
    ///
    /// Handles come out in ascending slot order. The slice is a copy: later
    /// pool changes do not show through it, and it dies with the next reset
    /// of `frame`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ArenaExhausted`] when `frame` cannot hold the list.
    pub fn query_by_type<'f>(
        &self,
        kind: EntityKind,
        frame: &'f Arena,
    ) -> CoreResult<&'f [EntityHandle]> {
        let count = self.iter().filter(|e| e.kind == kind).count();
        let mut matches = self
            .iter()
            .filter(|e| e.kind == kind)
            .map(Entity::handle);
        let handles =
            frame.alloc_slice_fill_with(count, |_| matches.next().unwrap_or(EntityHandle::NULL))?;
        Ok(handles)
    }

    fn resolve(&self, handle: EntityHandle) -> CoreResult<usize> {
        let index = handle.index() as usize;
        let stale = CoreError::StaleHandle {
            index: handle.index(),
            generation: handle.generation(),
        };
        match self.slots.get(index) {
            Some(slot) if slot.is_valid() && self.generations[index] == handle.generation() => {
                Ok(index)
            }
            _ => Err(stale),
        }
    }
}

impl std::fmt::Debug for ObjectPool<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectPool")
            .field("capacity", &self.capacity())
            .field("live", &self.live)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Capability, EnemyData, Payload};
    use swarm_shared::Vec2;

    #[test]
    fn test_allocate_until_exhausted_then_reuse() {
        let arena = Arena::new("test");
        let mut pool = ObjectPool::new_in(&arena, 3).unwrap();

        let handles: Vec<_> = (0..3).map(|_| pool.allocate().unwrap().handle()).collect();
        let indices: Vec<_> = handles.iter().map(|h| h.index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);

        assert_eq!(
            pool.allocate().unwrap_err(),
            CoreError::PoolExhausted { capacity: 3 }
        );

        {
            let middle = pool.get_mut(handles[1]).unwrap();
            middle.kind = EntityKind::Enemy;
            middle.pos = Vec2::new(5.0, 5.0);
            middle.health = 10.0;
            middle.payload = Payload::Enemy(EnemyData {
                speed: 100.0,
                contact_damage: 1.0,
            });
            middle.tags.add(&[Capability::Hostile]).unwrap();
        }
        pool.invalidate(handles[1]).unwrap();

        let reused = pool.allocate().unwrap();
        assert_eq!(reused.handle().index(), 1);
        assert_eq!(reused.kind, EntityKind::None);
        assert_eq!(reused.pos, Vec2::ZERO);
        assert_eq!(reused.health, 0.0);
        assert_eq!(reused.payload, Payload::None);
        assert!(reused.tags.is_empty());
    }

    #[test]
    fn test_stale_handle_detected() {
        let arena = Arena::new("test");
        let mut pool = ObjectPool::new_in(&arena, 2).unwrap();

        let old = pool.allocate().unwrap().handle();
        pool.invalidate(old).unwrap();
        let new = pool.allocate().unwrap().handle();

        assert_eq!(old.index(), new.index());
        assert_ne!(old, new);
        assert!(matches!(pool.get(old), Err(CoreError::StaleHandle { .. })));
        assert!(pool.invalidate(old).is_err());
        assert!(pool.get(new).is_ok());
        assert_eq!(pool.live_count(), 1);
    }

    #[test]
    fn test_query_is_a_snapshot_in_slot_order() {
        let arena = Arena::new("persistent");
        let frame = Arena::new("frame");
        let mut pool = ObjectPool::new_in(&arena, 8).unwrap();

        let kinds = [
            EntityKind::Enemy,
            EntityKind::Player,
            EntityKind::Enemy,
            EntityKind::Projectile,
            EntityKind::Enemy,
        ];
        for kind in kinds {
            pool.allocate().unwrap().kind = kind;
        }

        let enemies = pool.query_by_type(EntityKind::Enemy, &frame).unwrap();
        let indices: Vec<_> = enemies.iter().map(|h| h.index()).collect();
        assert_eq!(indices, vec![0, 2, 4]);

        pool.invalidate(enemies[1]).unwrap();
        pool.allocate().unwrap().kind = EntityKind::Enemy;

        assert_eq!(enemies.len(), 3);
        assert_eq!(enemies[1].index(), 2);
        assert!(!pool.is_live(enemies[1]));
    }

    #[test]
    fn test_iter_skips_invalid_slots() {
        let arena = Arena::new("test");
        let mut pool = ObjectPool::new_in(&arena, 4).unwrap();
        let a = pool.allocate().unwrap().handle();
        let _b = pool.allocate().unwrap().handle();
        pool.invalidate(a).unwrap();

        assert_eq!(pool.iter().count(), 1);
        assert_eq!(pool.live_handle_at(0), None);
        assert!(pool.live_handle_at(1).is_some());
        assert_eq!(pool.live_handle_at(99), None);
    }

    #[test]
    fn test_slots_live_in_arena() {
        let arena = Arena::new("persistent");
        let before = arena.used();
        let _pool = ObjectPool::new_in(&arena, 16).unwrap();
        assert!(arena.used() >= before + 16 * std::mem::size_of::<Entity>());
    }
}
