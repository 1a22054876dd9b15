//! Render passes and window compositing.
//!
//! A frame is a sequence of passes, each bound to an offscreen target, then a
//! composite that copies the targets into the window.

mod camera;
mod stats;

pub use camera::Camera2D;
pub use stats::RenderStats;

use swarm_shared::{Rect, Vec2};
use tracing::trace;

use crate::backend::RasterBackend;
use crate::batcher::{FlushStats, Renderer};
use crate::color::Color;
use crate::error::RenderError;

/// Offscreen targets a frame renders into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetId {
    /// Low-resolution world target, camera-transformed.
    World,
    /// Window-resolution overlay target, screen space.
    Ui,
}

/// How a pass sets up its target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassDesc {
    /// Target to render into.
    pub target: TargetId,
    /// Color the target is cleared to.
    pub clear: Color,
    /// Camera applied to every command, or `None` for screen space.
    pub camera: Option<Camera2D>,
}

/// One target copied into the window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blit {
    /// Source target.
    pub target: TargetId,
    /// Destination in window pixels.
    pub dest: Rect,
}

/// Runs one pass: begin the target, record, flush, end the target.
///
/// `end_pass` is called even when recording or flushing fails.
///
/// # Errors
///
/// Propagates the recorder's error, or a [`RenderError`] from the flush.
pub fn render_pass<E>(
    renderer: &mut Renderer,
    backend: &mut dyn RasterBackend,
    pass: &PassDesc,
    record: impl FnOnce(&mut Renderer) -> Result<(), E>,
) -> Result<FlushStats, E>
where
    E: From<RenderError>,
{
    backend.begin_pass(pass);
    let flushed = record(renderer).and_then(|()| renderer.flush(&mut *backend).map_err(E::from));
    backend.end_pass();
    if let Ok(stats) = &flushed {
        trace!(target_id = ?pass.target, commands = stats.commands, "pass done");
    }
    flushed
}

/// Largest rect with the aspect ratio of `render` that fits centered in `window`.
#[must_use]
pub fn letterbox(render: Vec2, window: Vec2) -> Rect {
    let scale = (window.x / render.x).min(window.y / render.y);
    let size = render * scale;
    Rect::from_pos_size((window - size) * 0.5, size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendEvent, RecordingBackend};

    #[test]
    fn test_letterbox_wide_window() {
        let dest = letterbox(Vec2::new(640.0, 360.0), Vec2::new(1280.0, 1000.0));
        assert_eq!(dest, Rect::new(0.0, 140.0, 1280.0, 720.0));
    }

    #[test]
    fn test_render_pass_brackets_flush() {
        let mut renderer = Renderer::new(4);
        let mut backend = RecordingBackend::default();
        let pass = PassDesc {
            target: TargetId::Ui,
            clear: Color::TRANSPARENT,
            camera: None,
        };

        let stats = render_pass::<RenderError>(&mut renderer, &mut backend, &pass, |r| {
            r.quad(Rect::new(0.0, 0.0, 1.0, 1.0), Color::WHITE);
            Ok(())
        })
        .unwrap();

        assert_eq!(stats.commands, 1);
        let events = backend.events();
        assert_eq!(events.first(), Some(&BackendEvent::BeginPass(TargetId::Ui)));
        assert_eq!(events.last(), Some(&BackendEvent::EndPass));
    }

    #[test]
    fn test_render_pass_ends_target_on_error() {
        let mut renderer = Renderer::new(4);
        let mut backend = RecordingBackend::default();
        let pass = PassDesc {
            target: TargetId::World,
            clear: Color::TRANSPARENT,
            camera: Some(Camera2D::default()),
        };

        let result = render_pass::<RenderError>(&mut renderer, &mut backend, &pass, |r| {
            r.push_layer(1)?;
            Ok(())
        });

        assert_eq!(result, Err(RenderError::UnbalancedLayers { depth: 1 }));
        assert_eq!(backend.events().last(), Some(&BackendEvent::EndPass));
    }
}
