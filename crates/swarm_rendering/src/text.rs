//! Text storage and measurement.
//!
//! Text commands do not own strings. Formatted text is appended to a
//! [`TextBuffer`] owned by the renderer and referenced by [`TextSpan`]; the
//! buffer is cleared by the same flush that consumes the commands.

use std::fmt::{self, Write};

use swarm_shared::Vec2;

use crate::command::FontId;
use crate::error::RenderResult;

/// Byte range into a [`TextBuffer`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextSpan {
    start: u32,
    len: u32,
}

impl TextSpan {
    /// Length in bytes.
    #[must_use]
    pub const fn len(self) -> usize {
        self.len as usize
    }

    /// True for the empty span.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.len == 0
    }
}

/// Append-only string pool, cleared once per flush.
#[derive(Debug, Default)]
pub struct TextBuffer {
    data: String,
}

impl TextBuffer {
    /// Creates a buffer with room for `capacity` bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: String::with_capacity(capacity),
        }
    }

    /// Appends `text` and returns its span.
    pub fn push_str(&mut self, text: &str) -> TextSpan {
        let start = self.data.len();
        self.data.push_str(text);
        Self::span(start, self.data.len())
    }

    /// Formats `args` into the buffer and returns the span of the output.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Format`](crate::RenderError::Format) if a
    /// `Display` impl reports an error.
    pub fn push_fmt(&mut self, args: fmt::Arguments<'_>) -> RenderResult<TextSpan> {
        let start = self.data.len();
        if let Err(err) = self.data.write_fmt(args) {
            self.data.truncate(start);
            return Err(err.into());
        }
        Ok(Self::span(start, self.data.len()))
    }

    /// Returns the text behind `span`, or `""` for a span from a cleared buffer.
    #[must_use]
    pub fn resolve(&self, span: TextSpan) -> &str {
        let start = span.start as usize;
        self.data.get(start..start + span.len()).unwrap_or("")
    }

    /// Bytes currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Drops all text, keeping the allocation.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    fn span(start: usize, end: usize) -> TextSpan {
        TextSpan {
            start: start as u32,
            len: (end - start) as u32,
        }
    }
}

/// Measures rendered text. Implemented by whoever owns the fonts.
pub trait TextMeasure {
    /// Size in pixels of `text` drawn with `font` at `size`.
    fn measure(&self, font: FontId, text: &str, size: f32) -> Vec2;
}

/// Fixed-advance measurement for environments without real fonts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MonospaceMeasure {
    /// Glyph advance as a fraction of the font size.
    pub advance: f32,
    /// Extra pixels between glyphs.
    pub spacing: f32,
}

impl Default for MonospaceMeasure {
    fn default() -> Self {
        Self {
            advance: 0.5,
            spacing: 2.0,
        }
    }
}

impl TextMeasure for MonospaceMeasure {
    fn measure(&self, _font: FontId, text: &str, size: f32) -> Vec2 {
        let glyphs = text.chars().count() as f32;
        if glyphs == 0.0 {
            return Vec2::new(0.0, size);
        }
        let width = glyphs * size * self.advance + (glyphs - 1.0) * self.spacing;
        Vec2::new(width, size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spans_resolve_independently() {
        let mut buffer = TextBuffer::default();
        let a = buffer.push_str("The end");
        let b = buffer.push_fmt(format_args!("Killed squares: {}", 12)).unwrap();

        assert_eq!(buffer.resolve(a), "The end");
        assert_eq!(buffer.resolve(b), "Killed squares: 12");
    }

    #[test]
    fn test_cleared_buffer_resolves_empty() {
        let mut buffer = TextBuffer::default();
        let span = buffer.push_str("gone");
        buffer.clear();
        assert_eq!(buffer.resolve(span), "");
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_monospace_measure() {
        let measure = MonospaceMeasure::default();
        let size = measure.measure(FontId(0), "0000", 24.0);
        // 4 glyphs * 12px + 3 gaps * 2px
        assert_eq!(size, Vec2::new(54.0, 24.0));
    }
}
