// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The YAML run configuration.  Every key is optional; missing keys
//! take the defaults below, and keys the renderer does not know are
//! ignored.
//!
//! Any key can also be set from an environment variable of the same
//! name (`max_iteration=5000`, or `MAX_ITERATION=5000`).  The
//! environment wins over the file; the command line wins over both.

use num::Complex;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::animation::AnimationPlan;
use crate::errors::{Error, Result};
use crate::planes::Viewport;

/// What a run produces.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunType {
    /// A single PNG.
    Image,
    /// A stream of PNG frames.
    Video,
    /// The plane coordinates of the image corners, as text.
    Test,
}

impl Default for RunType {
    fn default() -> Self {
        RunType::Image
    }
}

impl FromStr for RunType {
    type Err = Error;

    fn from_str(s: &str) -> Result<RunType> {
        match s {
            "image" => Ok(RunType::Image),
            "video" => Ok(RunType::Video),
            "test" => Ok(RunType::Test),
            _ => Err(Error::Config(format!("invalid run type {:?}", s))),
        }
    }
}

impl fmt::Display for RunType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            RunType::Image => "image",
            RunType::Video => "video",
            RunType::Test => "test",
        })
    }
}

/// The full set of run settings.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// What to produce.
    pub run_type: RunType,
    /// Iteration budget per pixel.
    pub max_iteration: u32,
    /// Path of the palette file.
    pub colors_file_path: String,
    /// Name of the coloring strategy.
    pub color_calc: String,
    /// Image width in pixels.
    pub image_width: u32,
    /// Image height in pixels.
    pub image_height: u32,
    /// Real part of the image center.
    pub center_x: f64,
    /// Imaginary part of the image center.
    pub center_y: f64,
    /// Plane units per pixel of the image (the last frame of a video).
    pub scale: f64,
    /// Rotation of the image (the last frame of a video), in radians.
    pub rotation: f64,
    /// Comma-separated real parts of vertical gridlines.
    pub x_lines: String,
    /// Comma-separated imaginary parts of horizontal gridlines.
    pub y_lines: String,
    /// Video frame rate.
    pub frames_per_second: u32,
    /// Seconds to hold the opening view.
    pub initial_image_time: f64,
    /// Plane units per pixel of the opening view.
    pub initial_scale: f64,
    /// Rotation of the opening view, in radians.
    pub initial_rotation: f64,
    /// Seconds spent zooming.
    pub zoom_time: f64,
    /// Extra full turns made while zooming.
    pub zoom_rotation: i32,
    /// Seconds to hold the closing view.
    pub final_image_time: f64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            run_type: RunType::Image,
            max_iteration: 1000,
            colors_file_path: "default.pal".to_string(),
            color_calc: "smooth".to_string(),
            image_width: 1920,
            image_height: 1080,
            center_x: 0.0,
            center_y: 0.0,
            scale: 0.003,
            rotation: 0.0,
            x_lines: String::new(),
            y_lines: String::new(),
            frames_per_second: 60,
            initial_image_time: 1.0,
            initial_scale: 0.003,
            initial_rotation: 0.0,
            zoom_time: 10.0,
            zoom_rotation: 0,
            final_image_time: 1.0,
        }
    }
}

macro_rules! overrides {
    ($($key:ident: $kind:ty),* $(,)*) => {
        /// The configuration keys read from the environment.  Each one
        /// is optional; envy matches variable names case-insensitively.
        #[derive(Debug, Default, Deserialize)]
        struct Overrides {
            $($key: Option<$kind>,)*
        }

        impl Overrides {
            /// Copies every value that was set onto `config`, and names
            /// them.
            fn apply(self, config: &mut Config) -> Vec<&'static str> {
                let mut applied = vec![];
                $(
                    if let Some(value) = self.$key {
                        config.$key = value;
                        applied.push(stringify!($key));
                    }
                )*
                applied
            }
        }
    };
}

overrides! {
    run_type: RunType,
    max_iteration: u32,
    colors_file_path: String,
    color_calc: String,
    image_width: u32,
    image_height: u32,
    center_x: f64,
    center_y: f64,
    scale: f64,
    rotation: f64,
    x_lines: String,
    y_lines: String,
    frames_per_second: u32,
    initial_image_time: f64,
    initial_scale: f64,
    initial_rotation: f64,
    zoom_time: f64,
    zoom_rotation: i32,
    final_image_time: f64,
}

/// The process environment, minus anything that is not valid Unicode.
fn environment() -> impl Iterator<Item = (String, String)> {
    std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
}

impl Config {
    /// Reads and validates a configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|cause| Error::Resource {
            path: path.display().to_string(),
            cause,
        })?;
        Config::parse(&text, &path.display().to_string())
    }

    /// Parses configuration text, applies overrides from the process
    /// environment, and validates the result.  `origin` names the
    /// source in error messages.
    pub fn parse(text: &str, origin: &str) -> Result<Config> {
        Config::parse_with_env(text, origin, environment())
    }

    /// As `parse`, with the environment given explicitly as name and
    /// value pairs.
    pub fn parse_with_env<I>(text: &str, origin: &str, env: I) -> Result<Config>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut config: Config = if text.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(text).map_err(|cause| Error::ConfigParse {
                path: origin.to_string(),
                cause,
            })?
        };
        config.apply_env(env)?;
        config.validate()?;
        Ok(config)
    }

    /// Overwrites every key that has a matching environment variable.
    /// Variables that match no key are ignored.
    pub fn apply_env<I>(&mut self, env: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let overrides: Overrides =
            envy::from_iter(env).map_err(|cause| Error::ConfigEnv { cause })?;
        let applied = overrides.apply(self);
        if !applied.is_empty() {
            info!("environment overrides {}", applied.join(", "));
        }
        Ok(())
    }

    /// Rejects settings that cannot produce an image.
    pub fn validate(&self) -> Result<()> {
        let fail = |message: String| Err(Error::Config(message));
        if self.image_width == 0 || self.image_height == 0 {
            return fail(format!(
                "image size must be at least 1x1, got {}x{}",
                self.image_width, self.image_height
            ));
        }
        for &(name, value) in &[("scale", self.scale), ("initial_scale", self.initial_scale)] {
            if !(value > 0.0) || !value.is_finite() {
                return fail(format!("{} must be positive, got {}", name, value));
            }
        }
        for &(name, value) in &[
            ("center_x", self.center_x),
            ("center_y", self.center_y),
            ("rotation", self.rotation),
            ("initial_rotation", self.initial_rotation),
        ] {
            if !value.is_finite() {
                return fail(format!("{} must be a finite number, got {}", name, value));
            }
        }
        for &(name, value) in &[
            ("initial_image_time", self.initial_image_time),
            ("zoom_time", self.zoom_time),
            ("final_image_time", self.final_image_time),
        ] {
            if !(value >= 0.0) || !value.is_finite() {
                return fail(format!("{} must not be negative, got {}", name, value));
            }
        }
        Ok(())
    }

    fn viewport(&self, scale: f64, rotation: f64) -> Result<Viewport> {
        Viewport::new(
            Complex::new(self.center_x, self.center_y),
            scale,
            rotation,
            self.image_width,
            self.image_height,
        )
        .map_err(Error::Config)
    }

    /// The view of an image run, and the closing view of a video.
    pub fn final_viewport(&self) -> Result<Viewport> {
        self.viewport(self.scale, self.rotation)
    }

    /// The opening view of a video.
    pub fn initial_viewport(&self) -> Result<Viewport> {
        self.viewport(self.initial_scale, self.initial_rotation)
    }

    /// The frame layout of a video.
    pub fn animation(&self) -> Result<AnimationPlan> {
        Ok(AnimationPlan::new(
            self.initial_viewport()?,
            self.final_viewport()?,
            self.frames_per_second,
            self.initial_image_time,
            self.zoom_time,
            self.final_image_time,
            self.zoom_rotation,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(text: &str) -> Result<Config> {
        Config::parse_with_env(text, "inline", vec![])
    }

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|&(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn empty_text_gives_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.max_iteration, 1000);
        assert_eq!(config.color_calc, "smooth");
        assert_eq!(config.run_type, RunType::Image);
    }

    #[test]
    fn keys_override_defaults() {
        let text = "
run_type: video
max_iteration: 250
image_width: 320
image_height: 200
center_x: -0.743643887037151
center_y: 0.13182590420533
scale: 1.0e-9
zoom_rotation: -2
x_lines: \"-0.5, 0.5\"
";
        let config = parse(text).unwrap();
        assert_eq!(config.run_type, RunType::Video);
        assert_eq!(config.max_iteration, 250);
        assert_eq!((config.image_width, config.image_height), (320, 200));
        assert_eq!(config.scale, 1.0e-9);
        assert_eq!(config.zoom_rotation, -2);
        assert_eq!(config.x_lines, "-0.5, 0.5");
        assert_eq!(config.frames_per_second, 60);
    }

    #[test]
    fn unknown_run_types_are_rejected() {
        match parse("run_type: movie\n") {
            Err(Error::ConfigParse { path, .. }) => assert_eq!(path, "inline"),
            other => panic!("expected a parse error, got {:?}", other),
        }
        assert!("movie".parse::<RunType>().is_err());
        assert_eq!("test".parse::<RunType>().unwrap(), RunType::Test);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let config = parse("zoom_speed: 3\nmax_iteration: 40\n").unwrap();
        assert_eq!(config.max_iteration, 40);
        assert_eq!(config, Config { max_iteration: 40, ..Config::default() });
    }

    #[test]
    fn environment_overrides_the_file() {
        let env = vars(&[("max_iteration", "17"), ("PATH", "/usr/bin")]);
        let config = Config::parse_with_env("max_iteration: 1000\n", "inline", env).unwrap();
        assert_eq!(config.max_iteration, 17);
    }

    #[test]
    fn environment_names_ignore_case() {
        let env = vars(&[("RUN_TYPE", "test"), ("Center_X", "-0.75"), ("zoom_rotation", "-3")]);
        let config = Config::parse_with_env("", "inline", env).unwrap();
        assert_eq!(config.run_type, RunType::Test);
        assert_eq!(config.center_x, -0.75);
        assert_eq!(config.zoom_rotation, -3);
        assert_eq!(config.image_width, 1920);
    }

    #[test]
    fn malformed_environment_values_are_rejected() {
        let env = vars(&[("image_width", "wide")]);
        match Config::parse_with_env("", "inline", env) {
            Err(Error::ConfigEnv { .. }) => {}
            other => panic!("expected an environment error, got {:?}", other),
        }
    }

    #[test]
    fn environment_values_are_validated() {
        let env = vars(&[("scale", "0")]);
        match Config::parse_with_env("scale: 0.1\n", "inline", env) {
            Err(Error::Config(message)) => assert!(message.contains("scale")),
            other => panic!("expected a validation error, got {:?}", other),
        }
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert!(parse("image_width: wide\n").is_err());
        assert!(parse("image_width: -4\n").is_err());
    }

    #[test]
    fn nonsense_geometry_is_rejected() {
        for text in &[
            "scale: 0\n",
            "initial_scale: -0.1\n",
            "image_height: 0\n",
            "zoom_time: -1\n",
            "center_x: .nan\n",
        ] {
            match parse(text) {
                Err(Error::Config(_)) => {}
                other => panic!("{:?} should fail validation, got {:?}", text, other),
            }
        }
    }

    #[test]
    fn viewports_share_center_and_size() {
        let config = Config {
            initial_scale: 0.01,
            scale: 0.0001,
            rotation: 1.5,
            ..Config::default()
        };
        let first = config.initial_viewport().unwrap();
        let last = config.final_viewport().unwrap();
        assert_eq!(first.center(), last.center());
        assert_eq!((first.scale(), last.scale()), (0.01, 0.0001));
        assert_eq!(last.rotation(), 1.5);
    }

    #[test]
    fn animation_uses_the_frame_rate() {
        let config = Config {
            frames_per_second: 10,
            initial_image_time: 0.5,
            zoom_time: 2.0,
            final_image_time: 0.3,
            ..Config::default()
        };
        assert_eq!(config.animation().unwrap().len(), 5 + 20 + 3);
    }

    #[test]
    fn load_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "run_type: test").unwrap();
        writeln!(file, "image_width: 8").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.run_type, RunType::Test);
        assert_eq!(config.image_width, 8);
        assert!(Config::load("/definitely/not/here.yml").is_err());
    }
}
