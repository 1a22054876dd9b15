//! Renderer errors.
//!
//! Every variant is a protocol misuse and is fatal to the frame.

use thiserror::Error;

/// Errors raised while recording or flushing draw commands.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// `pop_layer` with nothing pushed.
    #[error("pop_layer called with an empty layer stack")]
    LayerUnderflow,

    /// Flush requested while layers were still pushed.
    #[error("flush with {depth} unpopped layer(s)")]
    UnbalancedLayers {
        /// Stack depth at flush time.
        depth: usize,
    },

    /// Layer index outside `0..count`.
    #[error("layer {layer} out of range (renderer has {count} layers)")]
    LayerOutOfRange {
        /// Requested layer.
        layer: usize,
        /// Number of layers.
        count: usize,
    },

    /// Writing formatted text into the text buffer failed.
    #[error("text formatting failed")]
    Format(#[from] std::fmt::Error),
}

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;
