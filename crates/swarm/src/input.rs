//! Per-frame input.
//!
//! Drivers sample the platform into an [`InputSnapshot`]; the tick turns it
//! into a [`FrameInput`] before any gameplay runs. Derivation is pure.

use swarm_rendering::Camera2D;
use swarm_shared::constants::MAX_FRAME_DELTA;
use swarm_shared::Vec2;

/// Movement keys held this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Keys {
    /// A
    pub left: bool,
    /// D
    pub right: bool,
    /// W
    pub up: bool,
    /// S
    pub down: bool,
}

/// Raw platform input for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputSnapshot {
    /// Seconds since the previous frame.
    pub dt: f32,
    /// Mouse position in window pixels.
    pub mouse: Vec2,
    /// Current window size in pixels.
    pub window_size: Vec2,
    /// Movement keys.
    pub keys: Keys,
}

/// Input as gameplay sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    /// Frame delta, clamped to `0..=MAX_FRAME_DELTA`.
    pub dt: f32,
    /// Movement keys.
    pub keys: Keys,
    /// Pointer in render-target pixels, clamped to the target.
    pub pointer: Vec2,
    /// Pointer in world space through the camera from before the update. Aims shots.
    pub pointer_world: Vec2,
}

impl FrameInput {
    /// Derives gameplay input from a platform snapshot.
    #[must_use]
    pub fn derive(snapshot: &InputSnapshot, render_size: Vec2, camera: &Camera2D) -> Self {
        let pointer = virtual_pointer(snapshot.mouse, snapshot.window_size, render_size);
        Self {
            dt: snapshot.dt.clamp(0.0, MAX_FRAME_DELTA),
            keys: snapshot.keys,
            pointer,
            pointer_world: camera.screen_to_world(pointer),
        }
    }
}

/// Maps a window-space mouse position into the letterboxed render target.
///
/// The render target is scaled uniformly to fit the window and centered, so
/// the inverse is an offset then a divide. The result is clamped to
/// `0..=render`.
#[must_use]
pub fn virtual_pointer(mouse: Vec2, window: Vec2, render: Vec2) -> Vec2 {
    let scale = (window.x / render.x).min(window.y / render.y);
    let pointer = (mouse - (window - render * scale) * 0.5) / scale;
    pointer.clamp(Vec2::ZERO, render)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RENDER: Vec2 = Vec2::new(640.0, 360.0);

    #[test]
    fn test_virtual_pointer_exact_scale() {
        let window = Vec2::new(1280.0, 720.0);
        assert_eq!(
            virtual_pointer(Vec2::new(640.0, 360.0), window, RENDER),
            Vec2::new(320.0, 180.0)
        );
    }

    #[test]
    fn test_virtual_pointer_letterbox_bars_clamp() {
        // 1280x1000: scale 2, bars of 140px top and bottom
        let window = Vec2::new(1280.0, 1000.0);
        assert_eq!(virtual_pointer(Vec2::new(0.0, 140.0), window, RENDER), Vec2::ZERO);
        assert_eq!(virtual_pointer(Vec2::new(10.0, 5.0), window, RENDER), Vec2::new(5.0, 0.0));
        assert_eq!(virtual_pointer(Vec2::new(5000.0, 5000.0), window, RENDER), RENDER);
    }

    #[test]
    fn test_derive_clamps_dt_and_maps_to_world() {
        let camera = Camera2D::centered(RENDER, Vec2::new(100.0, 100.0));
        let snapshot = InputSnapshot {
            dt: 3.0,
            mouse: Vec2::new(640.0, 360.0),
            window_size: Vec2::new(1280.0, 720.0),
            keys: Keys::default(),
        };

        let input = FrameInput::derive(&snapshot, RENDER, &camera);
        assert_eq!(input.dt, MAX_FRAME_DELTA);
        assert_eq!(input.pointer_world, Vec2::new(100.0, 100.0));
    }
}
