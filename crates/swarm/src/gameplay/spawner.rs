//! Periodic enemy spawns around the player.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use swarm_core::{CoreResult, EntityHandle};
use swarm_shared::Vec2;

use super::{enemy, TickContext};

/// Countdown to the next enemy.
///
/// Starts at zero, so the first Active tick spawns immediately.
#[derive(Debug, Clone, Default)]
pub struct Spawner {
    timer: f32,
}

impl Spawner {
    /// Creates a spawner that fires on its first tick.
    #[must_use]
    pub const fn new() -> Self {
        Self { timer: 0.0 }
    }

    /// Seconds until the next spawn (negative once due).
    #[must_use]
    pub const fn timer(&self) -> f32 {
        self.timer
    }

    /// Counts down and spawns one enemy when the timer runs out.
    ///
    /// The enemy lands at the player position plus an integer offset drawn
    /// uniformly from `-radius..=radius` on each axis.
    ///
    /// # Errors
    ///
    /// Propagates pool errors from the spawn.
    pub fn tick(
        &mut self,
        ctx: &mut TickContext<'_, '_>,
        rng: &mut ChaCha8Rng,
    ) -> CoreResult<Option<EntityHandle>> {
        self.timer -= ctx.input.dt;
        if self.timer >= 0.0 {
            return Ok(None);
        }

        let radius = ctx.tuning.enemy_spawn_radius;
        let offset = Vec2::new(
            rng.gen_range(-radius..=radius) as f32,
            rng.gen_range(-radius..=radius) as f32,
        );
        let origin = ctx.pool.get(ctx.player)?.pos;
        let handle = enemy::spawn(ctx.pool, origin + offset, ctx.tuning)?;
        self.timer = ctx.tuning.enemy_spawn_interval;
        Ok(Some(handle))
    }
}
