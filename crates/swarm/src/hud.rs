//! # HUD
//!
//! The UI pass. While the run is Active: a health bar across the top and the
//! survival clock at the bottom. Once it has Ended: a centered end screen.

use std::fmt;

use swarm_rendering::{Color, FontId, RenderResult, Renderer, TextMeasure, TextSpan};
use swarm_shared::{Rect, Vec2};

use crate::gameplay::layers;

/// HUD font size.
pub const FONT_SIZE: f32 = 24.0;

/// Health bar width as a fraction of the window width.
const BAR_WIDTH_RATIO: f32 = 0.7;
/// Health bar height.
const BAR_HEIGHT: f32 = 25.0;
/// Gap between the window top and the bar.
const BAR_TOP: f32 = 10.0;
/// First end screen line.
const END_TOP: f32 = 50.0;
/// Gap between end screen lines.
const LINE_GAP: f32 = 12.0;

/// Whole seconds rendered as `HH:MM:SS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock(pub u32);

impl Clock {
    /// Truncates fractional seconds.
    #[must_use]
    pub fn from_secs_f32(seconds: f32) -> Self {
        Self(seconds.max(0.0) as u32)
    }
}

impl fmt::Display for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = self.0 / 3600;
        let m = (self.0 % 3600) / 60;
        let s = self.0 % 60;
        write!(f, "{h:02}:{m:02}:{s:02}")
    }
}

/// What the HUD shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HudView {
    /// Health bar and clock.
    Playing {
        /// Current player health.
        health: f32,
        /// Health at full bar.
        max_health: f32,
        /// Seconds survived.
        elapsed: f32,
    },
    /// End screen.
    Ended {
        /// Enemies killed.
        score: u32,
        /// Seconds survived.
        elapsed: f32,
    },
}

/// Records the HUD for a window of `window` pixels.
///
/// # Errors
///
/// Propagates layer and formatting errors.
pub fn record(
    renderer: &mut Renderer,
    view: &HudView,
    font: FontId,
    measure: &dyn TextMeasure,
    window: Vec2,
) -> RenderResult<()> {
    match *view {
        HudView::Playing {
            health,
            max_health,
            elapsed,
        } => {
            let width = window.x * BAR_WIDTH_RATIO;
            let start = Vec2::new((window.x - width) * 0.5, BAR_TOP);
            let fill = width * (health / max_health).clamp(0.0, 1.0);

            renderer.with_layer(layers::HUD_BACK, |r| {
                r.quad(Rect::new(start.x, start.y, width, BAR_HEIGHT), Color::WHITE);
            })?;
            renderer.with_layer(layers::HUD_FILL, |r| {
                r.quad(Rect::new(start.x, start.y, fill, BAR_HEIGHT), Color::RED);
            })?;

            let clock = renderer.format_text(format_args!("{}", Clock::from_secs_f32(elapsed)))?;
            let size = measure_span(renderer, measure, font, clock);
            let position = Vec2::new((window.x - size.x) * 0.5, window.y - 20.0 - 10.0);
            renderer.with_layer(layers::HUD_TEXT, |r| {
                r.text_span(font, clock, position, FONT_SIZE, Color::WHITE);
            })
        }
        HudView::Ended { score, elapsed } => {
            let lines = [
                renderer.format_text(format_args!("The end"))?,
                renderer.format_text(format_args!("Killed squares: {score}"))?,
                renderer.format_text(format_args!(
                    "Survived: {}",
                    Clock::from_secs_f32(elapsed)
                ))?,
            ];
            renderer.push_layer(layers::HUD_TEXT)?;
            let mut y = END_TOP;
            for span in lines {
                let size = measure_span(renderer, measure, font, span);
                let x = ((window.x - size.x) * 0.5).floor();
                renderer.text_span(font, span, Vec2::new(x, y), FONT_SIZE, Color::WHITE);
                y += FONT_SIZE + LINE_GAP;
            }
            renderer.pop_layer()
        }
    }
}

fn measure_span(renderer: &Renderer, measure: &dyn TextMeasure, font: FontId, span: TextSpan) -> Vec2 {
    measure.measure(font, renderer.text_buffer().resolve(span), FONT_SIZE)
}
