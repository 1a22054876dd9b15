//! # Layered Batcher
//!
//! Collects draw commands into a fixed number of layers and dispatches them
//! in one ordered pass.

use std::fmt;

use swarm_shared::{Rect, Vec2};
use tracing::trace;

use crate::backend::RasterBackend;
use crate::color::Color;
use crate::command::{DrawCommand, FontId, TextureId};
use crate::error::{RenderError, RenderResult};
use crate::text::{TextBuffer, TextSpan};

/// Number of layers a renderer gets unless told otherwise.
pub const DEFAULT_LAYER_COUNT: usize = 1024;

/// What one flush dispatched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushStats {
    /// Commands handed to the backend.
    pub commands: u32,
    /// Layers that held at least one command.
    pub layers: u32,
}

/// Deferred draw-command batcher.
///
/// Commands go to the current layer. Layers are flushed in ascending index
/// order and commands within a layer in recording order, so a command on
/// layer 2 always lands before one on layer 5 no matter which was recorded
/// first.
///
/// # Example
///
/// ```rust
/// use swarm_rendering::{Color, RecordingBackend, Renderer};
/// use swarm_shared::Rect;
///
/// let mut renderer = Renderer::new(16);
/// let mut backend = RecordingBackend::default();
///
/// renderer.with_layer(3, |r| r.quad(Rect::new(0.0, 0.0, 8.0, 8.0), Color::RED)).unwrap();
/// renderer.quad(Rect::new(0.0, 0.0, 640.0, 360.0), Color::BLACK);
///
/// let stats = renderer.flush(&mut backend).unwrap();
/// assert_eq!(stats.commands, 2);
/// ```
pub struct Renderer {
    /// One command list per layer.
    layers: Vec<Vec<DrawCommand>>,
    /// Layer new commands go to.
    current: usize,
    /// Layers to return to on pop.
    stack: Vec<usize>,
    /// Backing store for text commands.
    text: TextBuffer,
}

impl Renderer {
    /// Creates a renderer with `layer_count` layers (at least one).
    #[must_use]
    pub fn new(layer_count: usize) -> Self {
        let count = layer_count.max(1);
        Self {
            layers: (0..count).map(|_| Vec::new()).collect(),
            current: 0,
            stack: Vec::with_capacity(16),
            text: TextBuffer::with_capacity(1024),
        }
    }

    /// Returns the number of layers.
    #[inline]
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Returns the layer new commands go to.
    #[inline]
    #[must_use]
    pub const fn current_layer(&self) -> usize {
        self.current
    }

    /// Returns how many layers are pushed.
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Returns the number of commands waiting for the next flush.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.layers.iter().map(Vec::len).sum()
    }

    /// Returns the text buffer text commands resolve against.
    #[must_use]
    pub const fn text_buffer(&self) -> &TextBuffer {
        &self.text
    }

    /// Makes `layer` current, remembering the previous one.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::LayerOutOfRange`] if `layer >= layer_count()`.
    pub fn push_layer(&mut self, layer: usize) -> RenderResult<()> {
        if layer >= self.layers.len() {
            return Err(RenderError::LayerOutOfRange {
                layer,
                count: self.layers.len(),
            });
        }
        self.stack.push(self.current);
        self.current = layer;
        Ok(())
    }

    /// Restores the layer that was current before the matching push.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::LayerUnderflow`] if nothing is pushed.
    pub fn pop_layer(&mut self) -> RenderResult<()> {
        self.current = self.stack.pop().ok_or(RenderError::LayerUnderflow)?;
        Ok(())
    }

    /// Runs `f` with `layer` pushed, then pops it.
    ///
    /// # Errors
    ///
    /// Fails like [`Renderer::push_layer`].
    pub fn with_layer<R>(&mut self, layer: usize, f: impl FnOnce(&mut Self) -> R) -> RenderResult<R> {
        self.push_layer(layer)?;
        let out = f(self);
        self.pop_layer()?;
        Ok(out)
    }

    /// Appends `command` to the current layer.
    #[inline]
    pub fn record(&mut self, command: DrawCommand) {
        self.layers[self.current].push(command);
    }

    /// Records a filled rectangle.
    pub fn quad(&mut self, dest: Rect, tint: Color) {
        self.record(DrawCommand::Quad { dest, tint });
    }

    /// Records a rectangle outline.
    pub fn quad_outline(&mut self, dest: Rect, thickness: f32, tint: Color) {
        self.record(DrawCommand::QuadOutline {
            dest,
            thickness,
            tint,
        });
    }

    /// Records an atlas region drawn at `position`.
    pub fn texture(&mut self, src: Rect, position: Vec2, tint: Color) {
        self.record(DrawCommand::Texture {
            src,
            position,
            tint,
        });
    }

    /// Records a texture region stretched into `dest`.
    pub fn texture_pro(&mut self, texture: TextureId, src: Rect, dest: Rect, tint: Color) {
        self.record(DrawCommand::TexturePro {
            texture,
            src,
            dest,
            tint,
        });
    }

    /// Records a filled circle.
    pub fn circle(&mut self, center: Vec2, radius: f32, tint: Color) {
        self.record(DrawCommand::Circle {
            center,
            radius,
            tint,
        });
    }

    /// Records text previously stored with [`Renderer::format_text`].
    pub fn text_span(&mut self, font: FontId, text: TextSpan, position: Vec2, size: f32, tint: Color) {
        self.record(DrawCommand::Text {
            font,
            text,
            position,
            size,
            tint,
        });
    }

    /// Copies `text` into the text buffer and records it.
    pub fn text(&mut self, font: FontId, text: &str, position: Vec2, size: f32, tint: Color) {
        let span = self.text.push_str(text);
        self.text_span(font, span, position, size, tint);
    }

    /// Formats text into the renderer-owned buffer without recording it.
    ///
    /// The span is valid until the next flush. Useful when the text has to be
    /// measured before its position is known.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Format`] if formatting fails.
    pub fn format_text(&mut self, args: fmt::Arguments<'_>) -> RenderResult<TextSpan> {
        self.text.push_fmt(args)
    }

    /// Dispatches every recorded command and clears all layers.
    ///
    /// Layers go in ascending order, commands within a layer in recording
    /// order. Layer and text storage keep their capacity for the next pass.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::UnbalancedLayers`] without dispatching anything
    /// if a layer is still pushed.
    pub fn flush(&mut self, backend: &mut dyn RasterBackend) -> RenderResult<FlushStats> {
        if !self.stack.is_empty() {
            return Err(RenderError::UnbalancedLayers {
                depth: self.stack.len(),
            });
        }

        let mut stats = FlushStats::default();
        for layer in &mut self.layers {
            if layer.is_empty() {
                continue;
            }
            stats.layers += 1;
            for command in layer.drain(..) {
                backend.draw(&command, &self.text);
                stats.commands += 1;
            }
        }
        self.text.clear();

        trace!(commands = stats.commands, layers = stats.layers, "flushed");
        Ok(stats)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(DEFAULT_LAYER_COUNT)
    }
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("layers", &self.layers.len())
            .field("current", &self.current)
            .field("depth", &self.stack.len())
            .field("pending", &self.pending())
            .finish()
    }
}
