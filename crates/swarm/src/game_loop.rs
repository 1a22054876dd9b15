//! # SWARM Game Loop
//!
//! One [`Game::tick`] is one frame:
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │ transient.scope(|frame| {                                           │
//! │   1. derive input                                                   │
//! │   2. update (Active only) ── pool dispatch, spawner, game-over      │
//! │   3. world pass ─── background, entities, cursor ─► flush           │
//! │   4. UI pass ────── HUD ─► flush                                    │
//! │   5. composite                                                      │
//! │ })                                                                  │
//! │ 6. transient arena reset (by the scope)                             │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Anything borrowed from the transient arena dies with the scope, so no
//! per-frame list can leak into the next frame.

use std::fmt;
use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use swarm_core::{Arena, CoreResult, EntityHandle, ObjectPool};
use swarm_rendering::{
    letterbox, render_pass, Blit, Camera2D, Color, FontId, PassDesc, RasterBackend, RenderResult,
    RenderStats, Renderer, TargetId, TextMeasure, TextureId,
};
use swarm_shared::{Rect, Vec2};
use tracing::{info, warn};

use crate::config::{GameConfig, TuningConfig};
use crate::error::{FrameError, SetupError};
use crate::events::{EventBus, EventReceiver, EventSender, GameEvent};
use crate::gameplay::{self, layers, player, Spawner, TickContext};
use crate::hud::{self, HudView};
use crate::input::{FrameInput, InputSnapshot};

/// Atlas region of the background.
const BACKGROUND_SRC: Rect = Rect::new(25.0, 0.0, 206.0, 104.0);
/// World position of the background's top-left corner.
const BACKGROUND_POS: Vec2 = Vec2::new(-103.0, -52.0);
/// Atlas region of the pointer sprite.
const CURSOR_SRC: Rect = Rect::new(0.0, 0.0, 16.0, 16.0);

/// Run state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// The player is alive and the world updates.
    Active,
    /// The player died. Only the end screen is shown.
    Ended,
}

/// Externally loaded resources the game refers to.
pub struct Assets {
    /// Sprite atlas (used by atlas texture commands).
    pub atlas: TextureId,
    /// HUD font.
    pub font: FontId,
    /// Text measurement for centering.
    pub measure: Box<dyn TextMeasure>,
}

/// Timing and counters for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameStats {
    /// Frame number.
    pub frame: u64,
    /// Total tick time in microseconds.
    pub total_us: u64,
    /// Update time in microseconds.
    pub update_us: u64,
    /// Render time (both passes and composite) in microseconds.
    pub render_us: u64,
    /// Render counters.
    pub render: RenderStats,
    /// Valid objects after the update.
    pub live_entities: usize,
    /// Transient arena bytes used before the reset.
    pub transient_bytes: usize,
}

/// Simulation state.
struct World<'p> {
    pool: ObjectPool<'p>,
    player: EntityHandle,
    camera: Camera2D,
    spawner: Spawner,
    rng: ChaCha8Rng,
    phase: GamePhase,
    elapsed: f32,
    score: u32,
}

impl World<'_> {
    fn update(
        &mut self,
        frame: &Arena,
        input: &FrameInput,
        tuning: &TuningConfig,
        events: &EventSender,
    ) -> CoreResult<()> {
        self.elapsed += input.dt;

        let mut ctx = TickContext {
            pool: &mut self.pool,
            frame,
            input,
            tuning,
            events,
            score: &mut self.score,
            player: self.player,
        };
        gameplay::update_all(&mut ctx)?;
        self.spawner.tick(&mut ctx, &mut self.rng)?;

        let player = self.pool.get(self.player)?;
        self.camera.target = player.pos;
        if player.health <= 0.0 {
            self.phase = GamePhase::Ended;
            events.send(GameEvent::GameOver {
                score: self.score,
                survived: self.elapsed,
            });
            info!(score = self.score, survived = self.elapsed, "game over");
        }
        Ok(())
    }

    fn render(&self, renderer: &mut Renderer, input: &FrameInput) -> RenderResult<()> {
        renderer.with_layer(layers::BACKGROUND, |r| {
            r.texture(BACKGROUND_SRC, BACKGROUND_POS, Color::WHITE);
        })?;
        for entity in self.pool.iter() {
            gameplay::render(entity, renderer)?;
        }
        // Aiming used the camera from before the update; the sprite follows
        // the camera this pass is drawn with.
        let cursor = self.camera.screen_to_world(input.pointer);
        renderer.with_layer(layers::CURSOR, |r| {
            r.texture(CURSOR_SRC, cursor, Color::WHITE);
        })
    }

    fn hud_view(&self, max_health: f32) -> CoreResult<HudView> {
        Ok(match self.phase {
            GamePhase::Active => HudView::Playing {
                health: self.pool.get(self.player)?.health,
                max_health,
                elapsed: self.elapsed,
            },
            GamePhase::Ended => HudView::Ended {
                score: self.score,
                elapsed: self.elapsed,
            },
        })
    }
}

/// The frame orchestrator.
///
/// Owns everything except the persistent arena, which the pool borrows and
/// which therefore has to outlive the game.
pub struct Game<'p> {
    config: GameConfig,
    world: World<'p>,
    renderer: Renderer,
    transient: Arena,
    assets: Assets,
    events: EventBus,
    sender: EventSender,
    stats: FrameStatsAccumulator,
    frame: u64,
}

impl<'p> Game<'p> {
    /// Validates `config`, builds the pool inside `persistent`, spawns the
    /// player and starts the run.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::Config`] for a config that fails
    /// [`GameConfig::validate`], and [`SetupError::Core`] if the pool does not
    /// fit in `persistent` or the player cannot be spawned.
    pub fn new(
        config: GameConfig,
        persistent: &'p Arena,
        assets: Assets,
    ) -> Result<Self, SetupError> {
        config.validate()?;
        let mut pool = ObjectPool::new_in(persistent, config.memory.pool_capacity)?;
        let player = player::spawn(&mut pool, &config.tuning)?;
        let camera = Camera2D::centered(config.window.render_size(), pool.get(player)?.pos);

        let world = World {
            pool,
            player,
            camera,
            spawner: Spawner::new(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            phase: GamePhase::Active,
            elapsed: 0.0,
            score: 0,
        };

        let events = EventBus::new(config.memory.event_capacity);
        let sender = events.sender();
        let transient = Arena::with_config("transient", config.memory.transient_arena());
        let renderer = Renderer::new(config.memory.layer_count);
        let stats = FrameStatsAccumulator::new(config.window.frame_budget_us());

        info!(
            pool_capacity = config.memory.pool_capacity,
            layers = config.memory.layer_count,
            seed = config.seed,
            "game started"
        );

        Ok(Self {
            config,
            world,
            renderer,
            transient,
            assets,
            events,
            sender,
            stats,
            frame: 0,
        })
    }

    /// Runs one frame.
    ///
    /// # Errors
    ///
    /// Returns the first [`FrameError`] raised by update, recording or
    /// flushing. The frame is abandoned; callers should stop.
    pub fn tick(
        &mut self,
        snapshot: &InputSnapshot,
        backend: &mut dyn RasterBackend,
    ) -> Result<FrameStats, FrameError> {
        let started = Instant::now();
        let Self {
            config,
            world,
            renderer,
            transient,
            assets,
            sender,
            ..
        } = self;

        let render_size = config.window.render_size();
        let input = FrameInput::derive(snapshot, render_size, &world.camera);

        let mut stats = transient.scope(|frame| -> Result<FrameStats, FrameError> {
            let mut stats = FrameStats::default();

            let update_started = Instant::now();
            if world.phase == GamePhase::Active {
                world.update(frame, &input, &config.tuning, sender)?;
            }
            stats.update_us = update_started.elapsed().as_micros() as u64;

            let render_started = Instant::now();
            let world_pass = PassDesc {
                target: TargetId::World,
                clear: Color::TRANSPARENT,
                camera: Some(world.camera),
            };
            stats
                .render
                .absorb(render_pass(renderer, backend, &world_pass, |r| {
                    world.render(r, &input)
                })?);

            let view = world.hud_view(config.tuning.player_max_health)?;
            let ui_pass = PassDesc {
                target: TargetId::Ui,
                clear: Color::TRANSPARENT,
                camera: None,
            };
            let window = config.window.window_size();
            stats
                .render
                .absorb(render_pass(renderer, backend, &ui_pass, |r| {
                    hud::record(r, &view, assets.font, assets.measure.as_ref(), window)
                })?);

            let (blits, count) = composite(world.phase, render_size, snapshot.window_size);
            backend.composite(&blits[..count]);
            stats.render_us = render_started.elapsed().as_micros() as u64;

            stats.live_entities = world.pool.live_count();
            stats.transient_bytes = frame.used();
            Ok(stats)
        })?;

        stats.frame = self.frame;
        stats.total_us = started.elapsed().as_micros() as u64;
        self.frame += 1;
        self.stats.record(stats);
        if stats.total_us > self.stats.budget_us {
            warn!(
                frame = stats.frame,
                total_us = stats.total_us,
                budget_us = self.stats.budget_us,
                "frame over budget"
            );
        }
        Ok(stats)
    }

    /// Current run state.
    #[must_use]
    pub fn phase(&self) -> GamePhase {
        self.world.phase
    }

    /// Enemies killed.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.world.score
    }

    /// Seconds survived.
    #[must_use]
    pub fn elapsed(&self) -> f32 {
        self.world.elapsed
    }

    /// The player's handle.
    #[must_use]
    pub fn player(&self) -> EntityHandle {
        self.world.player
    }

    /// The object pool.
    #[must_use]
    pub fn pool(&self) -> &ObjectPool<'p> {
        &self.world.pool
    }

    /// The world camera.
    #[must_use]
    pub fn camera(&self) -> &Camera2D {
        &self.world.camera
    }

    /// The configuration the game was built with.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The transient arena (empty between ticks).
    #[must_use]
    pub fn transient(&self) -> &Arena {
        &self.transient
    }

    /// The atlas texture handle.
    #[must_use]
    pub fn atlas(&self) -> TextureId {
        self.assets.atlas
    }

    /// A receiver for game events.
    #[must_use]
    pub fn events(&self) -> EventReceiver {
        self.events.receiver()
    }

    /// Frames completed.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Accumulated frame statistics.
    #[must_use]
    pub fn stats(&self) -> &FrameStatsAccumulator {
        &self.stats
    }
}

/// Window blits for the phase, as a fixed array and the number in use.
/// The world is only shown while Active.
fn composite(phase: GamePhase, render: Vec2, window: Vec2) -> ([Blit; 2], usize) {
    let ui = Blit {
        target: TargetId::Ui,
        dest: Rect::from_pos_size(Vec2::ZERO, window),
    };
    match phase {
        GamePhase::Active => {
            let world = Blit {
                target: TargetId::World,
                dest: letterbox(render, window),
            };
            ([world, ui], 2)
        }
        GamePhase::Ended => ([ui, ui], 1),
    }
}

/// Running totals over every recorded tick.
///
/// `Display` renders the summary the drivers print on exit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameStatsAccumulator {
    /// Frame budget in microseconds.
    pub budget_us: u64,
    /// Ticks recorded.
    pub frames_recorded: u64,
    /// Ticks slower than `budget_us`.
    pub frames_over_budget: u64,
    /// Slowest tick.
    pub max_frame_us: u64,
    /// Sum of tick times.
    pub total_us_sum: u64,
    /// Sum of update times.
    pub update_us_sum: u64,
    /// Sum of render times.
    pub render_us_sum: u64,
    /// Commands dispatched across all ticks.
    pub commands: u64,
    /// Most valid objects seen after an update.
    pub peak_entities: usize,
    /// Most transient bytes used by one tick.
    pub peak_transient_bytes: usize,
}

impl FrameStatsAccumulator {
    /// Creates an empty accumulator against a frame budget.
    #[must_use]
    pub const fn new(budget_us: u64) -> Self {
        Self {
            budget_us,
            frames_recorded: 0,
            frames_over_budget: 0,
            max_frame_us: 0,
            total_us_sum: 0,
            update_us_sum: 0,
            render_us_sum: 0,
            commands: 0,
            peak_entities: 0,
            peak_transient_bytes: 0,
        }
    }

    /// Folds one tick into the totals.
    pub fn record(&mut self, stats: FrameStats) {
        self.frames_recorded += 1;
        if stats.total_us > self.budget_us {
            self.frames_over_budget += 1;
        }
        self.max_frame_us = self.max_frame_us.max(stats.total_us);
        self.total_us_sum += stats.total_us;
        self.update_us_sum += stats.update_us;
        self.render_us_sum += stats.render_us;
        self.commands += u64::from(stats.render.commands);
        self.peak_entities = self.peak_entities.max(stats.live_entities);
        self.peak_transient_bytes = self.peak_transient_bytes.max(stats.transient_bytes);
    }

    /// Mean of `sum` over the recorded ticks, zero before the first one.
    #[must_use]
    pub fn per_frame(&self, sum: u64) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        sum as f64 / self.frames_recorded as f64
    }
}

impl fmt::Display for FrameStatsAccumulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "ticks     {} ({} over the {} us budget)",
            self.frames_recorded, self.frames_over_budget, self.budget_us
        )?;
        writeln!(
            f,
            "tick      mean {:.0} us, worst {} us",
            self.per_frame(self.total_us_sum),
            self.max_frame_us
        )?;
        writeln!(
            f,
            "split     update {:.0} us, render {:.0} us",
            self.per_frame(self.update_us_sum),
            self.per_frame(self.render_us_sum)
        )?;
        writeln!(f, "commands  {:.1} per tick", self.per_frame(self.commands))?;
        write!(
            f,
            "peaks     {} objects, {} transient bytes",
            self.peak_entities, self.peak_transient_bytes
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swarm_rendering::{BackendEvent, MonospaceMeasure, RecordingBackend};

    use crate::config::ConfigError;
    use crate::input::Keys;

    fn assets() -> Assets {
        Assets {
            atlas: TextureId(0),
            font: FontId(0),
            measure: Box::new(MonospaceMeasure::default()),
        }
    }

    fn idle(dt: f32) -> InputSnapshot {
        InputSnapshot {
            dt,
            mouse: Vec2::new(474.0, 266.5),
            window_size: Vec2::new(948.0, 533.0),
            keys: Keys::default(),
        }
    }

    #[test]
    fn test_first_tick_spawns_enemy_and_fires() {
        let persistent = Arena::new("persistent");
        let mut game = Game::new(GameConfig::default(), &persistent, assets()).unwrap();
        let mut backend = RecordingBackend::default();

        let stats = game.tick(&idle(1.0 / 60.0), &mut backend).unwrap();

        // player + first shot + first enemy
        assert_eq!(stats.live_entities, 3);
        assert_eq!(game.frame_count(), 1);
        assert_eq!(game.transient().used(), 0);
        assert!(matches!(
            game.events().try_recv(),
            Some(GameEvent::Shot { .. })
        ));
    }

    #[test]
    fn test_tick_event_order() {
        let persistent = Arena::new("persistent");
        let mut game = Game::new(GameConfig::default(), &persistent, assets()).unwrap();
        let mut backend = RecordingBackend::default();

        game.tick(&idle(1.0 / 60.0), &mut backend).unwrap();

        let events = backend.events();
        assert_eq!(events[0], BackendEvent::BeginPass(TargetId::World));
        let ends = events.iter().filter(|e| **e == BackendEvent::EndPass).count();
        assert_eq!(ends, 2);
        match events.last() {
            Some(BackendEvent::Composite(blits)) => {
                assert_eq!(blits.len(), 2);
                assert_eq!(blits[0].target, TargetId::World);
                assert_eq!(blits[1].target, TargetId::Ui);
            }
            other => panic!("expected composite last, got {other:?}"),
        }
    }

    #[test]
    fn test_composite_hides_world_when_ended() {
        let (blits, count) =
            composite(GamePhase::Ended, Vec2::new(640.0, 360.0), Vec2::new(948.0, 533.0));
        assert_eq!(count, 1);
        assert_eq!(blits[0].target, TargetId::Ui);
    }

    #[test]
    fn test_composite_letterboxes_world_when_active() {
        let window = Vec2::new(1280.0, 1000.0);
        let (blits, count) = composite(GamePhase::Active, Vec2::new(640.0, 360.0), window);

        assert_eq!(count, 2);
        assert_eq!(blits[0].target, TargetId::World);
        assert_eq!(blits[0].dest, Rect::new(0.0, 140.0, 1280.0, 720.0));
        assert_eq!(blits[1].dest, Rect::from_pos_size(Vec2::ZERO, window));
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = GameConfig::default();
        config.tuning.enemy_spawn_radius = -5;
        let persistent = Arena::new("persistent");

        let result = Game::new(config, &persistent, assets());

        assert!(matches!(
            result,
            Err(SetupError::Config(ConfigError::Invalid(_)))
        ));
        // nothing was carved out of the arena
        assert_eq!(persistent.used(), 0);
    }

    #[test]
    fn test_stats_accumulator() {
        let mut acc = FrameStatsAccumulator::new(16_666);

        for i in 0..100 {
            acc.record(FrameStats {
                frame: i,
                total_us: 10_000 + (i * 100),
                update_us: 5000,
                render_us: 4000,
                ..Default::default()
            });
        }

        assert_eq!(acc.frames_recorded, 100);
        // 10_000..=19_900 us, budget 16_666 us
        assert_eq!(acc.frames_over_budget, 33);
        assert_eq!(acc.max_frame_us, 19_900);
        assert!((acc.per_frame(acc.total_us_sum) - 14_950.0).abs() < 1e-9);
        assert!((acc.per_frame(acc.update_us_sum) - 5000.0).abs() < 1e-9);

        let summary = acc.to_string();
        assert!(summary.starts_with("ticks     100 (33 over the 16666 us budget)"));
        assert!(summary.contains("worst 19900 us"));
    }

    #[test]
    fn test_empty_accumulator_reports_zero() {
        let acc = FrameStatsAccumulator::new(16_666);
        assert_eq!(acc.per_frame(acc.total_us_sum), 0.0);
        assert!(acc.to_string().contains("mean 0 us"));
    }
}
