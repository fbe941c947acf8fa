#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot renderer
//!
//! The Mandelbrot set is the set of points c on the complex plane for
//! which the orbit of z = z^2 + c, starting at zero, never runs off to
//! infinity.  Points outside the set are colored by how quickly their
//! orbits escape, smoothed so that the bands between iteration counts
//! blend into each other.
//!
//! An image is described by a viewport: the point at its center, how
//! much of the plane each pixel covers, and how far the image is
//! rotated.  Every pixel is independent, so a render is fanned out
//! over a pool of worker threads and gathered back by a collector.
//! An animation is a sequence of viewports that zooms (and optionally
//! spins) from an opening view to a closing view, with still frames
//! at either end.

extern crate crossbeam;
extern crate image;
extern crate imageproc;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate num;
extern crate num_cpus;

pub mod animation;
pub mod colors;
pub mod config;
pub mod errors;
pub mod escape;
pub mod output;
pub mod overlay;
pub mod palette;
pub mod planes;
pub mod render;
pub mod runner;

pub use animation::{AnimationPlan, Frame, Phase};
pub use colors::{ColorCalc, ColorMap};
pub use config::{Config, RunType};
pub use errors::{Error, Result};
pub use escape::{evaluate, Escape};
pub use palette::{Color, Palette};
pub use planes::{Pixel, Viewport};
pub use render::{RasterBuffer, Renderer};
pub use runner::Job;
