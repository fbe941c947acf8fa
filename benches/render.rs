#[macro_use]
extern crate criterion;
extern crate mandelbrot;
extern crate num;

use criterion::Criterion;
use mandelbrot::{Color, ColorCalc, Palette, Renderer, Viewport};
use num::Complex;
use std::sync::Arc;

fn render_benchmark(c: &mut Criterion) {
    let palette = Palette::new(vec![
        Color::new(0, 7, 100),
        Color::new(32, 107, 203),
        Color::new(237, 255, 255),
        Color::new(255, 170, 0),
    ])
    .unwrap();
    let colors = ColorCalc::Smooth.build(Arc::new(palette));
    let viewport = Viewport::new(Complex::new(-0.75, 0.1), 0.01, 0.2, 320, 240).unwrap();
    let renderer = Renderer::with_default_workers(500);

    c.bench_function("render 320x240", move |b| {
        b.iter(|| renderer.render(&viewport, &*colors))
    });
}

criterion_group!(benches, render_benchmark);
criterion_main!(benches);
