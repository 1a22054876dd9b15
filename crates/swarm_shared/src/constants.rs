//! # Frame Constants
//!
//! Defaults baked into the binary. Every value here can be overridden
//! from the TOML config at startup.

use crate::math::Vec2;

/// Tick rate (updates per second).
pub const TICK_RATE: u32 = 60;

/// Logical window size the UI pass is laid out against.
pub const WINDOW_SIZE: Vec2 = Vec2::new(948.0, 533.0);

/// Internal resolution of the world pass before it is scaled to the window.
pub const RENDER_SIZE: Vec2 = Vec2::new(640.0, 360.0);

/// Largest frame delta fed to the simulation, in seconds.
///
/// Prevents tunnelling after the process was paused.
pub const MAX_FRAME_DELTA: f32 = 0.1;
