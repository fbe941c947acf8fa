// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The parallel raster engine.
//!
//! One render is a three-stage pipeline.  The calling thread produces
//! one job per pixel into a bounded channel; a pool of workers turns
//! each job into a colored pixel; a single collector writes those
//! pixels into the raster.  Because each pixel depends only on its own
//! job, the raster is identical no matter how the workers interleave.
//!
//! Shutdown happens in two stages: the job channel is closed once
//! every pixel has been produced, the workers are joined, and only
//! then is the result channel closed and the collector joined.

use crossbeam::channel::{bounded, Receiver, Sender};
use image::{Rgb, RgbImage};
use itertools::iproduct;
use std::panic;

use crate::colors::ColorMap;
use crate::escape::evaluate;
use crate::palette::Color;
use crate::planes::Viewport;

/// How many in-flight messages each worker is allowed in each
/// channel.  Bounds memory independently of the raster size.
pub const QUEUE_DEPTH_PER_WORKER: usize = 100;

/// Workers held back from the pool to leave room for the collector
/// and the output encoder.
pub const RESERVED_CPUS: usize = 2;

/// A single pixel's work: its position, and its offset from the image
/// center before rotation and translation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PixelJob {
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
    /// Real offset from the center, unrotated.
    pub a: f64,
    /// Imaginary offset from the center, unrotated.
    pub b: f64,
}

/// A finished pixel, on its way to the collector.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PixelResult {
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
    /// The pixel's color.
    pub color: Color,
}

/// A grid of colors, filled in by the collector.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterBuffer {
    width: u32,
    height: u32,
    cells: Vec<Option<Color>>,
    writes: usize,
}

impl RasterBuffer {
    /// An unwritten raster.
    pub fn new(width: u32, height: u32) -> Self {
        RasterBuffer {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
            writes: 0,
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Records one finished pixel.
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let offset = self.offset(x, y);
        debug_assert!(self.cells[offset].is_none(), "pixel {},{} written twice", x, y);
        self.cells[offset] = Some(color);
        self.writes += 1;
    }

    /// The color of a pixel, if it has been written.
    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells[self.offset(x, y)]
    }

    /// How many times `set` has been called.
    pub fn writes(&self) -> usize {
        self.writes
    }

    /// True once every pixel has been written.
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// The raster as an `image` buffer, ready for drawing and
    /// encoding.  Unwritten pixels come out black.
    pub fn to_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            Rgb::from(self.cells[self.offset(x, y)].unwrap_or(Color::BLACK))
        })
    }
}

/// The worker count used when none is requested: every CPU but the
/// reserved ones, and never fewer than one.
pub fn default_workers() -> usize {
    num_cpus::get().saturating_sub(RESERVED_CPUS).max(1)
}

/// Renders viewports with a fixed number of worker threads.
#[derive(Copy, Clone, Debug)]
pub struct Renderer {
    workers: usize,
    max_iteration: u32,
}

impl Renderer {
    /// A renderer with an explicit worker count (at least one is
    /// always used).
    pub fn new(workers: usize, max_iteration: u32) -> Self {
        Renderer {
            workers: workers.max(1),
            max_iteration,
        }
    }

    /// A renderer sized to this machine.
    pub fn with_default_workers(max_iteration: u32) -> Self {
        Renderer::new(default_workers(), max_iteration)
    }

    /// The size of the worker pool.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// The iteration budget per pixel.
    pub fn max_iteration(&self) -> u32 {
        self.max_iteration
    }

    /// Computes one pixel from its job.
    fn compute(&self, viewport: &Viewport, colors: &dyn ColorMap, job: PixelJob) -> PixelResult {
        let point = viewport.resolve(job.a, job.b);
        let escape = evaluate(point, self.max_iteration);
        PixelResult {
            x: job.x,
            y: job.y,
            color: colors.color(&escape),
        }
    }

    fn work(
        &self,
        viewport: &Viewport,
        colors: &dyn ColorMap,
        jobs: Receiver<PixelJob>,
        results: Sender<PixelResult>,
    ) {
        for job in jobs.iter() {
            if results.send(self.compute(viewport, colors, job)).is_err() {
                break;
            }
        }
    }

    /// Renders one image.  Blocks until every pixel is in the buffer.
    pub fn render(&self, viewport: &Viewport, colors: &dyn ColorMap) -> RasterBuffer {
        let capacity = self.workers * QUEUE_DEPTH_PER_WORKER;
        debug!(
            "rendering {}x{} at scale {:e} with {} workers",
            viewport.width(), viewport.height(), viewport.scale(), self.workers
        );

        let outcome = crossbeam::scope(|spawner| {
            let (job_sender, job_receiver) = bounded::<PixelJob>(capacity);
            let (result_sender, result_receiver) = bounded::<PixelResult>(capacity);

            let workers: Vec<_> = (0..self.workers)
                .map(|_| {
                    let jobs = job_receiver.clone();
                    let results = result_sender.clone();
                    spawner.spawn(move |_| self.work(viewport, colors, jobs, results))
                })
                .collect();
            drop(job_receiver);

            let (width, height) = (viewport.width(), viewport.height());
            let collector = spawner.spawn(move |_| {
                let mut raster = RasterBuffer::new(width, height);
                for result in result_receiver.iter() {
                    raster.set(result.x, result.y, result.color);
                }
                raster
            });

            for (x, y) in iproduct!(0..width, 0..height) {
                let (a, b) = viewport.pixel_offset(i64::from(x), i64::from(y));
                if job_sender.send(PixelJob { x, y, a, b }).is_err() {
                    break;
                }
            }

            drop(job_sender);
            for worker in workers {
                worker.join().unwrap_or_else(|err| panic::resume_unwind(err));
            }
            drop(result_sender);
            collector.join().unwrap_or_else(|err| panic::resume_unwind(err))
        });

        outcome.unwrap_or_else(|err| panic::resume_unwind(err))
    }
}
