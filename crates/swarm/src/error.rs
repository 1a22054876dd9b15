//! Setup and frame errors.

use swarm_core::CoreError;
use swarm_rendering::RenderError;
use thiserror::Error;

use crate::config::ConfigError;

/// Anything that aborts a tick. The driver stops on the first one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// Pool, arena or handle failure.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Layer protocol misuse.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Anything that stops a [`Game`](crate::Game) from being built.
#[derive(Error, Debug)]
pub enum SetupError {
    /// The configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The pool or the player did not fit.
    #[error(transparent)]
    Core(#[from] CoreError),
}
