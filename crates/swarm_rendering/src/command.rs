//! Draw commands.
//!
//! A closed set of primitives. Each case carries only the fields it needs,
//! and every case is `Copy` so layers can hold them without drop glue.

use swarm_shared::{Rect, Vec2};

use crate::color::Color;
use crate::text::TextSpan;

/// Opaque texture handle issued by whoever loads assets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// Opaque font handle issued by whoever loads assets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FontId(pub u32);

/// One deferred drawing operation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawCommand {
    /// Filled rectangle.
    Quad {
        /// Destination bounds.
        dest: Rect,
        /// Fill color.
        tint: Color,
    },
    /// Rectangle outline.
    QuadOutline {
        /// Destination bounds.
        dest: Rect,
        /// Line thickness in pixels.
        thickness: f32,
        /// Stroke color.
        tint: Color,
    },
    /// Region of the backend's bound atlas, drawn unscaled at `position`.
    Texture {
        /// Source rectangle in atlas pixels.
        src: Rect,
        /// Top-left corner of the destination.
        position: Vec2,
        /// Tint color.
        tint: Color,
    },
    /// Region of an explicit texture stretched into `dest`.
    TexturePro {
        /// Texture to sample.
        texture: TextureId,
        /// Source rectangle in texture pixels.
        src: Rect,
        /// Destination bounds.
        dest: Rect,
        /// Tint color.
        tint: Color,
    },
    /// A run of text from the renderer's text buffer.
    Text {
        /// Font to draw with.
        font: FontId,
        /// Text to draw.
        text: TextSpan,
        /// Top-left corner of the text.
        position: Vec2,
        /// Font size in pixels.
        size: f32,
        /// Text color.
        tint: Color,
    },
    /// Filled circle.
    Circle {
        /// Center point.
        center: Vec2,
        /// Radius in pixels.
        radius: f32,
        /// Fill color.
        tint: Color,
    },
}

impl DrawCommand {
    /// Short name of the case, for logs and stats.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Quad { .. } => "quad",
            Self::QuadOutline { .. } => "quad_outline",
            Self::Texture { .. } => "texture",
            Self::TexturePro { .. } => "texture_pro",
            Self::Text { .. } => "text",
            Self::Circle { .. } => "circle",
        }
    }
}
