//! # SWARM Shared
//!
//! Plain data used by every crate in the workspace.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on the renderer, the core pool or any
//! gameplay code. If a type needs one of those, it belongs elsewhere.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod math;

pub use constants::{RENDER_SIZE, TICK_RATE, WINDOW_SIZE};
pub use math::{Rect, Vec2};
