// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Colors and the palette file format.
//!
//! A palette file is plain text, one color per line, written as three
//! whitespace-separated integers between 0 and 255:
//!
//! ```text
//! # a comment
//! 0 7 100
//! 32 107 203
//! ```
//!
//! Lines starting with `#` and blank lines are ignored.  The order of
//! the remaining lines is the (cyclic) order of the palette.

use image::Rgb;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::errors::{Error, PaletteFault, Result};

/// Marks a comment line in a palette file.
pub const COMMENT: char = '#';

/// An 8-bit RGB color.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// The color of the set's interior.
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };

    /// The color of overlay gridlines.
    pub const WHITE: Color = Color {
        r: 255,
        g: 255,
        b: 255,
    };

    /// Constructor.
    pub const fn new(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b }
    }
}

impl From<Color> for Rgb<u8> {
    fn from(color: Color) -> Rgb<u8> {
        Rgb([color.r, color.g, color.b])
    }
}

/// An ordered, non-empty list of colors, indexed cyclically.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    /// Wraps a list of colors.  An empty list is an error.
    pub fn new(colors: Vec<Color>) -> Result<Palette> {
        if colors.is_empty() {
            return Err(Error::EmptyPalette);
        }
        Ok(Palette { colors })
    }

    /// Reads a palette file from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Palette> {
        let path = path.as_ref();
        let resource = |cause| Error::Resource {
            path: path.display().to_string(),
            cause,
        };
        let file = File::open(path).map_err(resource)?;
        let palette = Palette::read(BufReader::new(file)).map_err(|err| match err {
            Error::Output(cause) => resource(cause),
            other => other,
        })?;
        debug!("loaded {} colors from {}", palette.len(), path.display());
        Ok(palette)
    }

    /// Parses a palette from any line-oriented source.  A line that
    /// is not UTF-8 is a format error on that line.
    pub fn read<R: BufRead>(source: R) -> Result<Palette> {
        let mut colors = vec![];
        for (index, bytes) in source.split(b'\n').enumerate() {
            let line = String::from_utf8(bytes?).map_err(|_| Error::PaletteFormat {
                line: index + 1,
                fault: PaletteFault::NotUtf8,
            })?;
            if let Some(color) = parse_line(&line, index + 1)? {
                colors.push(color);
            }
        }
        Palette::new(colors)
    }

    /// The number of colors; never zero.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false; an empty palette cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// The color at `index`, wrapping around the end of the palette.
    pub fn cyclic(&self, index: usize) -> Color {
        self.colors[index % self.colors.len()]
    }

    /// The colors, in order.
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }
}

fn parse_line(line: &str, number: usize) -> Result<Option<Color>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with(COMMENT) {
        return Ok(None);
    }

    let fault = |fault| Error::PaletteFormat {
        line: number,
        fault,
    };
    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    if tokens.len() != 3 {
        return Err(fault(PaletteFault::TokenCount(tokens.len())));
    }

    let mut channels = [0_u8; 3];
    for (channel, token) in channels.iter_mut().zip(tokens) {
        let value: i64 = token
            .parse()
            .map_err(|_| fault(PaletteFault::NotAnInteger(token.to_string())))?;
        if value < 0 || value > 255 {
            return Err(fault(PaletteFault::OutOfRange(value)));
        }
        *channel = value as u8;
    }
    Ok(Some(Color::new(channels[0], channels[1], channels[2])))
}
