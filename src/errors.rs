// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Everything that can stop a run.  All of these are detected before
//! the first pixel is computed; rendering itself cannot fail.

use failure::Fail;
use std::fmt;
use std::io;

/// What was wrong with a single line of a palette file.
#[derive(Debug, Clone, PartialEq)]
pub enum PaletteFault {
    /// The line did not hold exactly three values.
    TokenCount(usize),
    /// A value was not an integer.
    NotAnInteger(String),
    /// A value was an integer outside 0..=255.
    OutOfRange(i64),
    /// The line was not valid UTF-8.
    NotUtf8,
}

impl fmt::Display for PaletteFault {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PaletteFault::TokenCount(n) => write!(f, "expected 3 values, found {}", n),
            PaletteFault::NotAnInteger(token) => write!(f, "{:?} is not an integer", token),
            PaletteFault::OutOfRange(value) => {
                write!(f, "{} is outside the channel range 0-255", value)
            }
            PaletteFault::NotUtf8 => write!(f, "invalid UTF-8"),
        }
    }
}

/// The crate-wide error type.
#[derive(Debug, Fail)]
pub enum Error {
    /// A configuration value was missing, malformed or nonsensical.
    #[fail(display = "configuration error: {}", _0)]
    Config(String),

    /// The configuration file could not be parsed.
    #[fail(display = "could not parse configuration {}: {}", path, cause)]
    ConfigParse {
        /// Where the configuration came from.
        path: String,
        /// The underlying parser failure.
        #[cause]
        cause: serde_yaml::Error,
    },

    /// An environment variable overriding a configuration key held a
    /// value of the wrong type.
    #[fail(display = "could not apply environment overrides: {}", cause)]
    ConfigEnv {
        /// The underlying deserializer failure.
        #[cause]
        cause: envy::Error,
    },

    /// A file the run depends on could not be read.
    #[fail(display = "could not read {}: {}", path, cause)]
    Resource {
        /// The file that could not be read.
        path: String,
        /// The underlying I/O failure.
        #[cause]
        cause: io::Error,
    },

    /// A palette line was malformed.
    #[fail(display = "{} on line {}", fault, line)]
    PaletteFormat {
        /// 1-based line number of the offending line.
        line: usize,
        /// What was wrong with it.
        fault: PaletteFault,
    },

    /// The palette held no usable colors.
    #[fail(display = "palette contains no colors")]
    EmptyPalette,

    /// A gridline entry was not a number.
    #[fail(display = "invalid gridline value {:?}", _0)]
    Overlay(String),

    /// Writing the encoded output failed.
    #[fail(display = "could not write output: {}", _0)]
    Output(#[cause] io::Error),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Output(err)
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
