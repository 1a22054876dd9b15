//! # Gameplay
//!
//! The content riding on top of the pool and the renderer. Each object type
//! has a module exposing the same three entry points:
//!
//! | fn | when |
//! |----|------|
//! | `spawn(..) -> CoreResult<EntityHandle>` | on demand |
//! | `update(handle, &mut TickContext) -> CoreResult<()>` | once per Active tick, slot order |
//! | `render(&Entity, &mut Renderer) -> RenderResult<()>` | once per world pass |
//!
//! Dispatch is an exhaustive `match` on [`EntityKind`].

pub mod enemy;
pub mod player;
pub mod projectile;
pub mod spawner;

use swarm_core::{Arena, CoreResult, Entity, EntityHandle, EntityKind, ObjectPool};
use swarm_rendering::{RenderResult, Renderer};

use crate::config::TuningConfig;
use crate::events::EventSender;
use crate::input::FrameInput;

pub use spawner::Spawner;

/// Draw order of the world and UI passes.
pub mod layers {
    /// Atlas background.
    pub const BACKGROUND: usize = 0;
    /// Enemies.
    pub const ENEMIES: usize = 100;
    /// Projectiles.
    pub const PROJECTILES: usize = 200;
    /// The player.
    pub const PLAYER: usize = 300;
    /// Pointer sprite.
    pub const CURSOR: usize = 900;

    /// Health bar frame.
    pub const HUD_BACK: usize = 0;
    /// Health bar fill.
    pub const HUD_FILL: usize = 10;
    /// HUD text.
    pub const HUD_TEXT: usize = 20;

    /// Highest layer gameplay records into.
    pub const MAX_USED: usize = CURSOR;
}

/// Everything an update routine may touch.
pub struct TickContext<'t, 'p> {
    /// The object pool.
    pub pool: &'t mut ObjectPool<'p>,
    /// Transient arena for per-frame scratch lists.
    pub frame: &'t Arena,
    /// Derived input.
    pub input: &'t FrameInput,
    /// Gameplay constants.
    pub tuning: &'t TuningConfig,
    /// Event bus.
    pub events: &'t EventSender,
    /// Enemies killed so far.
    pub score: &'t mut u32,
    /// The player's handle.
    pub player: EntityHandle,
}

/// Runs the update routine of every valid object, in slot order.
///
/// Objects invalidated earlier in the pass are skipped. Objects spawned into
/// a later slot during the pass are updated in the same pass.
///
/// # Errors
///
/// Propagates the first [`CoreError`](swarm_core::CoreError) an update raises.
pub fn update_all(ctx: &mut TickContext<'_, '_>) -> CoreResult<()> {
    for index in 0..ctx.pool.capacity() {
        let Some(handle) = ctx.pool.live_handle_at(index) else {
            continue;
        };
        match ctx.pool.get(handle)?.kind {
            EntityKind::None => {}
            EntityKind::Player => player::update(handle, ctx)?,
            EntityKind::Enemy => enemy::update(handle, ctx)?,
            EntityKind::Projectile => projectile::update(handle, ctx)?,
        }
    }
    Ok(())
}

/// Records the render routine of one object.
///
/// # Errors
///
/// Propagates layer errors from the routine.
pub fn render(entity: &Entity, renderer: &mut Renderer) -> RenderResult<()> {
    match entity.kind {
        EntityKind::None => Ok(()),
        EntityKind::Player => player::render(entity, renderer),
        EntityKind::Enemy => enemy::render(entity, renderer),
        EntityKind::Projectile => projectile::render(entity, renderer),
    }
}
