//! Shots fired by the player.
//!
//! A projectile flies in a straight line, destroys the first shootable enemy
//! it overlaps, and expires after its lifetime.

use swarm_core::{Capability, CoreResult, Entity, EntityHandle, EntityKind, ObjectPool, Payload, ProjectileData};
use swarm_rendering::{Color, RenderResult, Renderer};
use swarm_shared::Vec2;

use super::{layers, TickContext};
use crate::config::TuningConfig;
use crate::events::GameEvent;

/// Spawns a projectile at `pos` flying along the unit vector `direction`.
///
/// # Errors
///
/// Returns [`CoreError::PoolExhausted`](swarm_core::CoreError::PoolExhausted) if the pool is full.
pub fn spawn(
    pool: &mut ObjectPool<'_>,
    pos: Vec2,
    direction: Vec2,
    tuning: &TuningConfig,
) -> CoreResult<EntityHandle> {
    let projectile = pool.allocate()?;
    projectile.setup(pos, Vec2::splat(tuning.projectile_size));
    projectile.kind = EntityKind::Projectile;
    projectile.vel = direction * tuning.projectile_speed;
    projectile.payload = Payload::Projectile(ProjectileData {
        ttl: tuning.projectile_lifetime,
    });
    projectile.tags.add(&[Capability::Damaging])?;
    Ok(projectile.handle())
}

/// Moves, expires, and checks for a hit.
///
/// # Errors
///
/// Returns [`CoreError::StaleHandle`](swarm_core::CoreError::StaleHandle) for a
/// dead handle, or [`CoreError::ArenaExhausted`](swarm_core::CoreError::ArenaExhausted)
/// if the enemy snapshot does not fit in the transient arena.
pub fn update(handle: EntityHandle, ctx: &mut TickContext<'_, '_>) -> CoreResult<()> {
    let dt = ctx.input.dt;

    let projectile = ctx.pool.get_mut(handle)?;
    projectile.pos += projectile.vel * dt;
    let bounds = projectile.bounds();
    let expired = projectile.payload.as_projectile_mut().is_some_and(|data| {
        data.ttl -= dt;
        data.ttl <= 0.0
    });
    if expired {
        return ctx.pool.invalidate(handle);
    }

    let enemies = ctx.pool.query_by_type(EntityKind::Enemy, ctx.frame)?;
    for &enemy in enemies {
        // Killed by an earlier projectile this tick.
        let Ok(target) = ctx.pool.get(enemy) else {
            continue;
        };
        if !target.tags.has(Capability::Shootable) || !bounds.intersects(&target.bounds()) {
            continue;
        }
        let position = target.pos;

        ctx.pool.invalidate(enemy)?;
        ctx.pool.invalidate(handle)?;
        *ctx.score += 1;
        ctx.events.send(GameEvent::EnemyKilled {
            position,
            score: *ctx.score,
        });
        return Ok(());
    }
    Ok(())
}

/// White square.
///
/// # Errors
///
/// Propagates layer errors.
pub fn render(entity: &Entity, renderer: &mut Renderer) -> RenderResult<()> {
    renderer.with_layer(layers::PROJECTILES, |r| r.quad(entity.bounds(), Color::WHITE))
}
