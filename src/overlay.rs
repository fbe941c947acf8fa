// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Gridlines drawn over a finished image, handy for finding
//! coordinates to zoom into.

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;
use itertools::Itertools;
use num::Complex;

use crate::errors::{Error, Result};
use crate::palette::Color;
use crate::planes::{Pixel, Viewport};

/// Vertical lines (constant real part) and horizontal lines
/// (constant imaginary part), in plane coordinates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Gridlines {
    /// Real parts of the vertical lines.
    pub verticals: Vec<f64>,
    /// Imaginary parts of the horizontal lines.
    pub horizontals: Vec<f64>,
}

/// Parses a comma-separated list of numbers.  An empty or blank list
/// is no lines at all.
pub fn parse_lines(source: &str) -> Result<Vec<f64>> {
    let source = source.trim();
    if source.is_empty() {
        return Ok(vec![]);
    }
    source
        .split(',')
        .map(|value| {
            let value = value.trim();
            value
                .parse::<f64>()
                .map_err(|_| Error::Overlay(value.to_string()))
        })
        .collect()
}

impl Gridlines {
    /// Parses the two comma-separated lists from the configuration.
    pub fn parse(verticals: &str, horizontals: &str) -> Result<Gridlines> {
        Ok(Gridlines {
            verticals: parse_lines(verticals)?,
            horizontals: parse_lines(horizontals)?,
        })
    }

    /// True if there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.verticals.is_empty() && self.horizontals.is_empty()
    }

    /// Draws every line that crosses the plane region covered by the
    /// image.  Under rotation that region is the bounding box of the
    /// image's corners, so part of a line may fall outside the image;
    /// those pixels are clipped.
    pub fn draw(&self, viewport: &Viewport, image: &mut RgbImage, color: Color) {
        if self.is_empty() {
            return;
        }
        let corners: Vec<Complex<f64>> = viewport
            .corners()
            .iter()
            .map(|&pixel| viewport.pixel_to_point(pixel))
            .collect();
        let (min_re, max_re) = bounds(corners.iter().map(|point| point.re));
        let (min_im, max_im) = bounds(corners.iter().map(|point| point.im));
        let color = Rgb::from(color);

        for &re in self.verticals.iter().filter(|&&re| min_re <= re && re <= max_re) {
            let from = viewport.point_to_pixel(Complex::new(re, min_im));
            let to = viewport.point_to_pixel(Complex::new(re, max_im));
            draw_line_segment_mut(image, endpoint(from), endpoint(to), color);
        }
        for &im in self.horizontals.iter().filter(|&&im| min_im <= im && im <= max_im) {
            let from = viewport.point_to_pixel(Complex::new(min_re, im));
            let to = viewport.point_to_pixel(Complex::new(max_re, im));
            draw_line_segment_mut(image, endpoint(from), endpoint(to), color);
        }
    }
}

fn endpoint(pixel: Pixel) -> (f32, f32) {
    (pixel.0 as f32, pixel.1 as f32)
}

fn bounds<I: Iterator<Item = f64>>(values: I) -> (f64, f64) {
    values
        .minmax_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .into_option()
        .unwrap_or((0.0, 0.0))
}
