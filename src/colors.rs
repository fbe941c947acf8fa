// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turning escape measurements into colors.
//!
//! Strategies are looked up by the name used in the configuration
//! file.  The raster engine only ever sees the `ColorMap` trait, so a
//! new strategy needs an entry in `ColorCalc` and nothing else.

use std::fmt;
use std::sync::Arc;

use crate::errors::{Error, Result};
use crate::escape::Escape;
use crate::palette::{Color, Palette};

/// Anything that can color a pixel from its escape measurement.  Must
/// be shareable between the render workers.
pub trait ColorMap: Sync {
    /// The color for one escape measurement.
    fn color(&self, escape: &Escape) -> Color;
}

/// The known coloring strategies.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ColorCalc {
    /// Continuous coloring: interpolate between neighbouring palette
    /// entries using the fractional part of the smoothed escape value.
    Smooth,
}

impl ColorCalc {
    /// Every strategy, default first.
    pub const ALL: &'static [ColorCalc] = &[ColorCalc::Smooth];

    /// The configuration name of this strategy.
    pub fn name(self) -> &'static str {
        match self {
            ColorCalc::Smooth => "smooth",
        }
    }

    /// Looks a strategy up by its configuration name.
    pub fn from_name(name: &str) -> Result<ColorCalc> {
        ColorCalc::ALL
            .iter()
            .cloned()
            .find(|calc| calc.name() == name)
            .ok_or_else(|| Error::Config(format!("unknown color_calc {:?}", name)))
    }

    /// Builds the color map for this strategy over a palette.
    pub fn build(self, palette: Arc<Palette>) -> Box<dyn ColorMap + Send> {
        match self {
            ColorCalc::Smooth => Box::new(SmoothColoring::new(palette)),
        }
    }
}

impl Default for ColorCalc {
    fn default() -> Self {
        ColorCalc::Smooth
    }
}

impl fmt::Display for ColorCalc {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Points in the set are black; everything else is a linear blend of
/// two adjacent palette entries.
pub struct SmoothColoring {
    palette: Arc<Palette>,
}

impl SmoothColoring {
    /// Constructor.
    pub fn new(palette: Arc<Palette>) -> Self {
        SmoothColoring { palette }
    }
}

#[inline]
fn blend(from: u8, to: u8, weight: f64) -> u8 {
    // Truncates; `from` is returned exactly when the two agree.
    (f64::from(from) + (f64::from(to) - f64::from(from)) * weight) as u8
}

impl ColorMap for SmoothColoring {
    fn color(&self, escape: &Escape) -> Color {
        if escape.in_set {
            return Color::BLACK;
        }
        let floor = escape.smooth.floor();
        let weight = escape.smooth - floor;
        let index = floor as usize;
        let from = self.palette.cyclic(index);
        let to = self.palette.cyclic(index.wrapping_add(1));
        Color::new(
            blend(from.r, to.r, weight),
            blend(from.g, to.g, weight),
            blend(from.b, to.b, weight),
        )
    }
}
