//! # Batcher Benchmark
//!
//! Records a full frame worth of commands spread across layers and flushes
//! into a backend that only counts.

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use swarm_rendering::{
    Blit, Color, DrawCommand, PassDesc, RasterBackend, Renderer, TextBuffer, DEFAULT_LAYER_COUNT,
};
use swarm_shared::{Rect, Vec2};

const COMMANDS_PER_FRAME: usize = 4096;

#[derive(Default)]
struct CountingBackend {
    draws: u64,
}

impl RasterBackend for CountingBackend {
    fn begin_pass(&mut self, _pass: &PassDesc) {}

    fn draw(&mut self, command: &DrawCommand, _text: &TextBuffer) {
        black_box(command);
        self.draws += 1;
    }

    fn end_pass(&mut self) {}

    fn composite(&mut self, _blits: &[Blit]) {}
}

fn bench_record_and_flush(c: &mut Criterion) {
    let mut renderer = Renderer::new(DEFAULT_LAYER_COUNT);
    let mut backend = CountingBackend::default();
    let layers = [0usize, 100, 200, 300, 900];

    c.bench_function("batcher_record_flush_4k_5_layers", |b| {
        b.iter(|| {
            for i in 0..COMMANDS_PER_FRAME {
                let layer = layers[i % layers.len()];
                renderer
                    .with_layer(layer, |r| {
                        r.quad(Rect::new(i as f32, 0.0, 10.0, 10.0), Color::GOLD);
                    })
                    .unwrap();
            }
            black_box(renderer.flush(&mut backend).unwrap())
        });
    });
}

fn bench_text_formatting(c: &mut Criterion) {
    let mut renderer = Renderer::default();
    let mut backend = CountingBackend::default();

    c.bench_function("batcher_format_text_256", |b| {
        b.iter(|| {
            for i in 0..256u32 {
                let span = renderer.format_text(format_args!("Killed squares: {i}")).unwrap();
                renderer.text_span(Default::default(), span, Vec2::ZERO, 24.0, Color::WHITE);
            }
            black_box(renderer.flush(&mut backend).unwrap())
        });
    });
}

criterion_group!(benches, bench_record_and_flush, bench_text_formatting);
criterion_main!(benches);
