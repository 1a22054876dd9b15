//! The controlled square.
//!
//! Moves with WASD, fires at the pointer whenever its cooldown runs out, and
//! slowly gets faster while the cooldown shrinks.

use swarm_core::{Capability, CoreResult, Entity, EntityHandle, EntityKind, ObjectPool, Payload, PlayerData};
use swarm_rendering::{Color, RenderResult, Renderer};
use swarm_shared::Vec2;
use tracing::debug;

use super::{layers, projectile, TickContext};
use crate::config::TuningConfig;
use crate::events::GameEvent;

/// Spawns the player at the origin.
///
/// # Errors
///
/// Returns [`CoreError::PoolExhausted`](swarm_core::CoreError::PoolExhausted) if the pool is full.
pub fn spawn(pool: &mut ObjectPool<'_>, tuning: &TuningConfig) -> CoreResult<EntityHandle> {
    let player = pool.allocate()?;
    player.setup(Vec2::ZERO, Vec2::splat(tuning.player_size));
    player.kind = EntityKind::Player;
    player.health = tuning.player_max_health;
    player.facing = 1.0;
    player.payload = Payload::Player(PlayerData {
        shoot_timer: 0.0,
        shoot_time: tuning.shoot_time,
        speed: tuning.player_speed,
    });
    player.tags.add(&[Capability::CameraTarget])?;
    debug!(handle = ?player.handle(), "player spawned");
    Ok(player.handle())
}

/// Moves, fires and ramps difficulty.
///
/// Left wins over right and up wins over down when both are held.
///
/// # Errors
///
/// Returns [`CoreError::StaleHandle`](swarm_core::CoreError::StaleHandle) for a
/// dead handle, or a pool error when the shot cannot be spawned.
pub fn update(handle: EntityHandle, ctx: &mut TickContext<'_, '_>) -> CoreResult<()> {
    let input = ctx.input;
    let tuning = ctx.tuning;
    let dt = input.dt;

    let player = ctx.pool.get_mut(handle)?;
    let Some(data) = player.payload.as_player_mut() else {
        return Ok(());
    };

    player.vel = Vec2::splat(data.speed);
    if input.keys.left {
        player.pos.x -= player.vel.x * dt;
        player.facing = -1.0;
    } else if input.keys.right {
        player.pos.x += player.vel.x * dt;
        player.facing = 1.0;
    }
    if input.keys.up {
        player.pos.y -= player.vel.y * dt;
    } else if input.keys.down {
        player.pos.y += player.vel.y * dt;
    }

    data.shoot_timer -= dt;
    let fire = data.shoot_timer < 0.0;
    if fire {
        data.shoot_timer = data.shoot_time;
    }

    data.speed = (data.speed + tuning.player_speed_gain * dt).min(tuning.player_max_speed);
    data.shoot_time = (data.shoot_time - tuning.shoot_time_decay * dt).max(tuning.min_shoot_time);

    if fire {
        let origin = player.pos;
        let direction = (input.pointer_world - origin).normalize_or_zero();
        let projectile = projectile::spawn(ctx.pool, origin, direction, tuning)?;
        ctx.events.send(GameEvent::Shot { projectile, origin });
    }
    Ok(())
}

/// Red square.
///
/// # Errors
///
/// Propagates layer errors.
pub fn render(entity: &Entity, renderer: &mut Renderer) -> RenderResult<()> {
    renderer.with_layer(layers::PLAYER, |r| r.quad(entity.bounds(), Color::RED))
}
