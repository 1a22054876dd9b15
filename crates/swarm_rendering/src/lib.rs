//! # SWARM Rendering
//!
//! Deferred 2D drawing. Gameplay code records [`DrawCommand`]s into numbered
//! layers whenever it likes during a pass; one [`Renderer::flush`] at the end
//! of the pass dispatches them to a [`RasterBackend`] in layer order.
//!
//! ```text
//!  record ──► layer 0   [cmd, cmd]          ┐
//!             layer 100 [cmd]               │ flush: ascending layer,
//!             layer 300 [cmd, cmd, cmd]     │ FIFO within a layer
//!             ...                           ┘
//!                      │
//!                      ▼
//!              RasterBackend::draw
//! ```
//!
//! ## Layer discipline
//!
//! `push_layer` / `pop_layer` nest. The layer stack must be empty when a pass
//! flushes; anything else is a [`RenderError`].

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic)]

pub mod backend;
pub mod batcher;
pub mod color;
pub mod command;
pub mod error;
pub mod pipeline;
pub mod text;

pub use backend::{BackendEvent, RasterBackend, RecordingBackend};
pub use batcher::{FlushStats, Renderer, DEFAULT_LAYER_COUNT};
pub use color::Color;
pub use command::{DrawCommand, FontId, TextureId};
pub use error::{RenderError, RenderResult};
pub use pipeline::{letterbox, render_pass, Blit, Camera2D, PassDesc, RenderStats, TargetId};
pub use text::{MonospaceMeasure, TextBuffer, TextMeasure, TextSpan};
