//! Chasing squares.
//!
//! An enemy walks straight at the player. Touching the player costs the
//! player health and destroys the enemy.

use swarm_core::{Capability, CoreResult, EnemyData, Entity, EntityHandle, EntityKind, ObjectPool, Payload};
use swarm_rendering::{Color, RenderResult, Renderer};
use swarm_shared::Vec2;
use tracing::debug;

use super::{layers, TickContext};
use crate::config::TuningConfig;
use crate::events::GameEvent;

/// Spawns an enemy with its top-left corner at `pos`.
///
/// # Errors
///
/// Returns [`CoreError::PoolExhausted`](swarm_core::CoreError::PoolExhausted) if the pool is full.
pub fn spawn(pool: &mut ObjectPool<'_>, pos: Vec2, tuning: &TuningConfig) -> CoreResult<EntityHandle> {
    let enemy = pool.allocate()?;
    enemy.setup(pos, Vec2::splat(tuning.enemy_size));
    enemy.kind = EntityKind::Enemy;
    enemy.health = tuning.enemy_health;
    enemy.payload = Payload::Enemy(EnemyData {
        speed: tuning.enemy_speed,
        contact_damage: tuning.enemy_contact_damage,
    });
    enemy.tags.add(&[Capability::Hostile, Capability::Shootable])?;
    debug!(handle = ?enemy.handle(), x = pos.x, y = pos.y, "enemy spawned");
    Ok(enemy.handle())
}

/// Steps toward the player and resolves contact.
///
/// # Errors
///
/// Returns [`CoreError::StaleHandle`](swarm_core::CoreError::StaleHandle) if
/// `handle` or the player handle is dead.
pub fn update(handle: EntityHandle, ctx: &mut TickContext<'_, '_>) -> CoreResult<()> {
    let dt = ctx.input.dt;
    let player_pos = ctx.pool.get(ctx.player)?.pos;

    let enemy = ctx.pool.get_mut(handle)?;
    let Some(&EnemyData {
        speed,
        contact_damage,
    }) = enemy.payload.as_enemy()
    else {
        return Ok(());
    };

    enemy.pos = enemy.pos.move_towards(player_pos, speed * dt);
    let bounds = enemy.bounds();
    let hostile = enemy.tags.has(Capability::Hostile);

    let player = ctx.pool.get_mut(ctx.player)?;
    if !hostile || !bounds.intersects(&player.bounds()) {
        return Ok(());
    }
    player.health -= contact_damage;
    let health = player.health;

    ctx.pool.invalidate(handle)?;
    ctx.events.send(GameEvent::PlayerHit { health });
    debug!(?handle, health, "enemy reached player");
    Ok(())
}

/// Gold square with a red outline.
///
/// # Errors
///
/// Propagates layer errors.
pub fn render(entity: &Entity, renderer: &mut Renderer) -> RenderResult<()> {
    renderer.with_layer(layers::ENEMIES, |r| {
        let bounds = entity.bounds();
        r.quad(bounds, Color::GOLD);
        r.quad_outline(bounds, 2.0, Color::RED);
    })
}
