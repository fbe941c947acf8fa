// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! PNG encoding.  A video is nothing more than PNG frames written one
//! after the other, which tools like `ffmpeg -f image2pipe` accept.

use image::png::PNGEncoder;
use image::{ColorType, RgbImage};
use std::io::Write;

use crate::errors::Result;

/// Encodes an image as a PNG onto `output`.
pub fn write_png<W: Write>(output: W, image: &RgbImage) -> Result<()> {
    let encoder = PNGEncoder::new(output);
    encoder.encode(image, image.width(), image.height(), ColorType::RGB(8))?;
    Ok(())
}
