//! # SWARM
//!
//! A top-down survival loop: the player auto-fires at the pointer while
//! squares spawn around them and give chase.
//!
//! ## Frame
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │ 1. DERIVE INPUT   virtual pointer in render space, pointer in world │
//! │ 2. UPDATE         slot-ordered dispatch over the pool, spawner,     │
//! │                   game-over check            (Active only)          │
//! │ 3. WORLD PASS     background, entities, cursor ─► flush             │
//! │ 4. UI PASS        health bar + clock / end screen ─► flush          │
//! │ 5. COMPOSITE      world letterboxed (Active only), UI full window   │
//! │ 6. RESET          transient arena                                   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `config`: TOML game configuration
//! - `events`: gameplay events drained by the driver (audio cues)
//! - `game_loop`: the frame orchestrator and frame statistics
//! - `gameplay`: player, enemy, projectile and spawner logic
//! - `hud`: overlay recording
//! - `input`: per-frame input derivation

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod events;
pub mod game_loop;
pub mod gameplay;
pub mod hud;
pub mod input;

pub use config::{ConfigError, GameConfig};
pub use error::{FrameError, SetupError};
pub use events::{EventBus, EventReceiver, EventSender, GameEvent};
pub use game_loop::{Assets, FrameStats, FrameStatsAccumulator, Game, GamePhase};
pub use input::{FrameInput, InputSnapshot, Keys};

/// Installs the `tracing` subscriber used by the binaries.
///
/// `RUST_LOG` overrides the default `info` filter.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
