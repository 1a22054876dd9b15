//! # SWARM Headless Driver
//!
//! Runs the full frame loop without a window: scripted input, a recording
//! backend that is emptied every frame, and a statistics summary at the end.
//!
//! ```text
//! swarm_headless [CONFIG] [FRAMES]
//! ```
//!
//! `CONFIG` defaults to `config/swarm.toml` (built-in defaults if missing),
//! `FRAMES` to one minute of simulated time.

use std::path::Path;
use std::process::ExitCode;

use swarm_core::Arena;
use swarm_rendering::{BackendEvent, FontId, MonospaceMeasure, RecordingBackend, TextureId};
use swarm::{Assets, Game, GameConfig, GameEvent, GamePhase, InputSnapshot, Keys};
use swarm_shared::Vec2;
use tracing::{error, info};

const DEFAULT_CONFIG: &str = "config/swarm.toml";

fn main() -> ExitCode {
    swarm::init_logging();

    let mut args = std::env::args().skip(1);
    let config_path = args.next().unwrap_or_else(|| DEFAULT_CONFIG.to_owned());
    let config = if Path::new(&config_path).exists() {
        match GameConfig::from_path(&config_path) {
            Ok(config) => config,
            Err(err) => {
                error!(%err, "config rejected");
                return ExitCode::FAILURE;
            }
        }
    } else {
        info!(path = %config_path, "no config file, using defaults");
        GameConfig::default()
    };
    let frames: u64 = args
        .next()
        .and_then(|arg| arg.parse().ok())
        .unwrap_or_else(|| u64::from(config.window.target_fps) * 60);

    println!("═══════════════════════════════════════════════════════════════════");
    println!("                    SWARM HEADLESS v{}", env!("CARGO_PKG_VERSION"));
    println!("═══════════════════════════════════════════════════════════════════");
    println!("  Frames:   {frames}");
    println!("  Seed:     {}", config.seed);
    println!("  Pool:     {} slots", config.memory.pool_capacity);
    println!();

    let persistent = Arena::with_config("persistent", config.memory.persistent_arena());
    let assets = Assets {
        atlas: TextureId(0),
        font: FontId(0),
        measure: Box::new(MonospaceMeasure::default()),
    };
    let dt = 1.0 / config.window.target_fps as f32;
    let window = config.window.window_size();

    let mut game = match Game::new(config, &persistent, assets) {
        Ok(game) => game,
        Err(err) => {
            error!(%err, "setup failed");
            return ExitCode::FAILURE;
        }
    };
    let events = game.events();
    let mut backend = RecordingBackend::default();
    let (mut shots, mut hits, mut draws) = (0u64, 0u64, 0u64);

    for frame in 0..frames {
        let snapshot = scripted_input(frame, dt, window);
        if let Err(err) = game.tick(&snapshot, &mut backend) {
            error!(%err, frame, "frame failed, stopping");
            return ExitCode::FAILURE;
        }

        draws += backend
            .take_events()
            .iter()
            .filter(|event| matches!(event, BackendEvent::Draw(..)))
            .count() as u64;
        for event in events.drain() {
            match event {
                GameEvent::Shot { .. } => shots += 1,
                GameEvent::PlayerHit { .. } => hits += 1,
                GameEvent::EnemyKilled { .. } => {}
                GameEvent::GameOver { score, survived } => {
                    info!(score, survived, "run ended");
                }
            }
        }
        if game.phase() == GamePhase::Ended && frame % 60 == 0 {
            info!(frame, "showing end screen");
        }
    }

    println!();
    println!("  Phase:    {:?}", game.phase());
    println!("  Score:    {}", game.score());
    println!("  Survived: {:.1} s", game.elapsed());
    println!("  Shots:    {shots}");
    println!("  Hits:     {hits}");
    println!("  Draws:    {draws}");
    println!(
        "  Arena:    persistent {} bytes in {} chunk(s)",
        persistent.used(),
        persistent.chunk_count()
    );
    println!();
    println!("{}", game.stats());
    ExitCode::SUCCESS
}

/// Circles the pointer around the window center and walks a square.
fn scripted_input(frame: u64, dt: f32, window: Vec2) -> InputSnapshot {
    let t = frame as f32 * dt;
    let center = window * 0.5;
    let mouse = center + Vec2::new(t.cos(), t.sin()) * (window.y * 0.4);
    let leg = (frame / 120) % 4;
    InputSnapshot {
        dt,
        mouse,
        window_size: window,
        keys: Keys {
            left: leg == 0,
            up: leg == 1,
            right: leg == 2,
            down: leg == 3,
        },
    }
}
