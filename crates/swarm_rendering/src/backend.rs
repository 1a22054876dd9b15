//! The raster backend seam.
//!
//! The renderer never touches a graphics API. It hands tagged commands to a
//! [`RasterBackend`], which owns render targets, textures and fonts.

use crate::command::DrawCommand;
use crate::pipeline::{Blit, PassDesc, TargetId};
use crate::text::TextBuffer;

/// Something that can rasterize [`DrawCommand`]s.
///
/// Calls arrive as `begin_pass`, any number of `draw`, `end_pass`, repeated
/// once per pass, then one `composite` per frame.
pub trait RasterBackend {
    /// Binds the pass target, clears it and applies the pass camera.
    fn begin_pass(&mut self, pass: &PassDesc);

    /// Rasterizes one command. Text spans resolve against `text`.
    fn draw(&mut self, command: &DrawCommand, text: &TextBuffer);

    /// Unbinds the current target.
    fn end_pass(&mut self);

    /// Draws finished targets into the window, in slice order.
    fn composite(&mut self, blits: &[Blit]);
}

/// One call received by a [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum BackendEvent {
    /// A pass began on `target`.
    BeginPass(TargetId),
    /// A command was drawn. Text commands carry their resolved string.
    Draw(DrawCommand, Option<String>),
    /// The current pass ended.
    EndPass,
    /// The frame was composited.
    Composite(Vec<Blit>),
}

/// Backend that rasterizes nothing and logs every call.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    events: Vec<BackendEvent>,
}

impl RecordingBackend {
    /// Every call received so far, in order.
    #[must_use]
    pub fn events(&self) -> &[BackendEvent] {
        &self.events
    }

    /// Takes the log, leaving it empty.
    pub fn take_events(&mut self) -> Vec<BackendEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drawn commands, in dispatch order.
    #[must_use]
    pub fn commands(&self) -> Vec<DrawCommand> {
        self.events
            .iter()
            .filter_map(|event| match event {
                BackendEvent::Draw(command, _) => Some(*command),
                _ => None,
            })
            .collect()
    }

    /// Resolved strings of drawn text commands, in dispatch order.
    #[must_use]
    pub fn texts(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|event| match event {
                BackendEvent::Draw(_, Some(text)) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }
}

impl RasterBackend for RecordingBackend {
    fn begin_pass(&mut self, pass: &PassDesc) {
        self.events.push(BackendEvent::BeginPass(pass.target));
    }

    fn draw(&mut self, command: &DrawCommand, text: &TextBuffer) {
        let resolved = match command {
            DrawCommand::Text { text: span, .. } => Some(text.resolve(*span).to_owned()),
            _ => None,
        };
        self.events.push(BackendEvent::Draw(*command, resolved));
    }

    fn end_pass(&mut self) {
        self.events.push(BackendEvent::EndPass);
    }

    fn composite(&mut self, blits: &[Blit]) {
        self.events.push(BackendEvent::Composite(blits.to_vec()));
    }
}
