//! Rendering statistics.

use crate::batcher::FlushStats;

/// Statistics from a rendered frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Passes flushed.
    pub passes: u32,
    /// Commands dispatched across all passes.
    pub commands: u32,
    /// Non-empty layers across all passes.
    pub layers: u32,
}

impl RenderStats {
    /// Adds one pass worth of flush output.
    pub fn absorb(&mut self, flush: FlushStats) {
        self.passes += 1;
        self.commands += flush.commands;
        self.layers += flush.layers;
    }

    /// Average commands per pass.
    #[must_use]
    pub fn commands_per_pass(&self) -> f32 {
        if self.passes > 0 {
            self.commands as f32 / self.passes as f32
        } else {
            0.0
        }
    }
}
