//! 2D camera.

use serde::{Deserialize, Serialize};
use swarm_shared::Vec2;

/// Maps world space to target space: `screen = (world - target) * zoom + offset`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera2D {
    /// Where `target` lands on the render target.
    pub offset: Vec2,
    /// World point the camera looks at.
    pub target: Vec2,
    /// Scale factor.
    pub zoom: f32,
}

impl Camera2D {
    /// Camera that puts `target` at the center of a target of `size`.
    #[must_use]
    pub fn centered(size: Vec2, target: Vec2) -> Self {
        Self {
            offset: size * 0.5,
            target,
            zoom: 1.0,
        }
    }

    /// Converts a world position to target space.
    #[must_use]
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        (world - self.target) * self.zoom + self.offset
    }

    /// Converts a target-space position to world space.
    #[must_use]
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        (screen - self.offset) / self.zoom + self.target
    }
}

impl Default for Camera2D {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            target: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_world_inverse() {
        let cam = Camera2D::centered(Vec2::new(640.0, 360.0), Vec2::new(50.0, -20.0));
        let center = Vec2::new(320.0, 180.0);

        assert_eq!(cam.screen_to_world(center), Vec2::new(50.0, -20.0));
        assert_eq!(cam.world_to_screen(Vec2::new(60.0, -20.0)), Vec2::new(330.0, 180.0));
    }
}
