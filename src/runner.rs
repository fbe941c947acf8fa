// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The three kinds of run.  Everything that can go wrong with the
//! configuration is checked in `Job::prepare`, before the first pixel
//! is computed.

use image::RgbImage;
use std::io::Write;
use std::sync::Arc;

use crate::animation::Phase;
use crate::colors::{ColorCalc, ColorMap};
use crate::config::{Config, RunType};
use crate::errors::Result;
use crate::output::write_png;
use crate::overlay::Gridlines;
use crate::palette::{Color, Palette};
use crate::planes::{Pixel, Viewport};
use crate::render::Renderer;

/// A validated run, ready to produce output.
pub struct Job {
    config: Config,
    renderer: Renderer,
    colors: Box<dyn ColorMap + Send>,
    gridlines: Gridlines,
}

impl Job {
    /// Loads the palette, resolves the coloring strategy and parses
    /// the gridlines.  `workers` overrides the default pool size.  The
    /// corner check uses none of these, so a test run skips them.
    pub fn prepare(config: Config, workers: Option<usize>) -> Result<Job> {
        config.validate()?;
        let renderer = match workers {
            Some(workers) => Renderer::new(workers, config.max_iteration),
            None => Renderer::with_default_workers(config.max_iteration),
        };
        let (colors, gridlines) = if config.run_type == RunType::Test {
            let black = Palette::new(vec![Color::BLACK])?;
            (ColorCalc::default().build(Arc::new(black)), Gridlines::default())
        } else {
            let calc = ColorCalc::from_name(&config.color_calc)?;
            let gridlines = Gridlines::parse(&config.x_lines, &config.y_lines)?;
            let palette = Palette::load(&config.colors_file_path)?;
            (calc.build(Arc::new(palette)), gridlines)
        };
        Ok(Job {
            config,
            renderer,
            colors,
            gridlines,
        })
    }

    /// The configuration this job runs.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Produces the configured output.
    pub fn run<W: Write>(&self, output: &mut W) -> Result<()> {
        match self.config.run_type {
            RunType::Image => self.image(output),
            RunType::Video => self.video(output),
            RunType::Test => self.corners(output),
        }
    }

    fn render(&self, viewport: &Viewport) -> RgbImage {
        self.renderer.render(viewport, &*self.colors).to_image()
    }

    /// One PNG of the final view, with gridlines.
    pub fn image<W: Write>(&self, output: &mut W) -> Result<()> {
        let viewport = self.config.final_viewport()?;
        info!(
            "rendering {}x{} image at scale {:e}",
            viewport.width(),
            viewport.height(),
            viewport.scale()
        );
        let mut image = self.render(&viewport);
        self.gridlines.draw(&viewport, &mut image, Color::WHITE);
        write_png(output, &image)
    }

    /// Every frame of the animation as consecutive PNGs.  Each hold
    /// phase is rendered once and written as many times as it lasts.
    pub fn video<W: Write>(&self, output: &mut W) -> Result<()> {
        let plan = self.config.animation()?;
        info!(
            "rendering {} frames ({} hold, {} zoom, {} hold) with {} workers",
            plan.len(),
            plan.initial_frames,
            plan.zoom_frames,
            plan.final_frames,
            self.renderer.workers()
        );
        let mut held: Option<(Phase, RgbImage)> = None;
        for frame in plan.frames() {
            let image = match (&held, frame.phase) {
                (Some((phase, image)), current) if *phase == current && current != Phase::Zoom => {
                    write_png(&mut *output, image)?;
                    continue;
                }
                _ => self.render(&frame.viewport),
            };
            debug!("frame {}/{} ({:?})", frame.index + 1, plan.len(), frame.phase);
            write_png(&mut *output, &image)?;
            if frame.phase != Phase::Zoom {
                held = Some((frame.phase, image));
            }
        }
        output.flush()?;
        Ok(())
    }

    /// The plane coordinates of the four image corners, one per line.
    pub fn corners<W: Write>(&self, output: &mut W) -> Result<()> {
        let viewport = self.config.final_viewport()?;
        let (width, height) = (
            i64::from(self.config.image_width),
            i64::from(self.config.image_height),
        );
        for &(x, y) in &[(0, 0), (width, 0), (0, height), (width, height)] {
            let point = viewport.pixel_to_point(Pixel(x, y));
            writeln!(output, "{},{} -> {:.6},{:.6}", x, y, point.re, point.im)?;
        }
        Ok(())
    }
}
