//! Animation configuration.
//!
//! Supports YAML configuration with precedence: CLI > file > defaults. Every
//! field has a serde default, so a partial document only overrides what it
//! names.

use crate::error::{Error, Result};
use crate::output::GifOptions;
use crate::plots::BarChart;
use crate::scale::AxisRange;
use crate::series::GeneratorConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Fixed value axis as written in the configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisConfig {
    /// Lower bound.
    #[serde(default = "default_axis_min")]
    pub min: f64,
    /// Upper bound.
    #[serde(default = "default_axis_max")]
    pub max: f64,
    /// Tick interval.
    #[serde(default = "default_axis_step")]
    pub step: f64,
}

fn default_axis_min() -> f64 {
    0.0
}
fn default_axis_max() -> f64 {
    1.0
}
fn default_axis_step() -> f64 {
    0.2
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self { min: default_axis_min(), max: default_axis_max(), step: default_axis_step() }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Number of series (bars per frame).
    #[serde(default = "default_series_count")]
    pub series_count: usize,

    /// Length of the generated sweep in seconds.
    #[serde(default = "default_total_duration")]
    pub total_duration: f64,

    /// Frame rate; also fixes the per-frame display time.
    #[serde(default = "default_frames_per_second")]
    pub frames_per_second: f64,

    /// Standard deviation of each random-walk step.
    #[serde(default = "default_step_std_dev")]
    pub step_std_dev: f64,

    /// RNG seed for reproducible output.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Fixed value axis.
    #[serde(default)]
    pub axis: AxisConfig,

    /// Animated GIF destination.
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Also write every frame as a PNG into this directory.
    #[serde(default)]
    pub frames_dir: Option<PathBuf>,

    /// Frame width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Frame height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,

    /// Repeat playback indefinitely.
    #[serde(default = "default_looping")]
    pub looping: bool,

    /// Prefix of the per-frame label, followed by the timestamp.
    #[serde(default = "default_title")]
    pub title: String,
}

fn default_series_count() -> usize {
    5
}
fn default_total_duration() -> f64 {
    10.0
}
fn default_frames_per_second() -> f64 {
    10.0
}
fn default_step_std_dev() -> f64 {
    0.05
}
fn default_output_path() -> PathBuf {
    PathBuf::from("walkbars.gif")
}
fn default_width() -> u32 {
    640
}
fn default_height() -> u32 {
    480
}
fn default_looping() -> bool {
    true
}
fn default_title() -> String {
    "Frame".to_string()
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            series_count: default_series_count(),
            total_duration: default_total_duration(),
            frames_per_second: default_frames_per_second(),
            step_std_dev: default_step_std_dev(),
            seed: None,
            axis: AxisConfig::default(),
            output_path: default_output_path(),
            frames_dir: None,
            width: default_width(),
            height: default_height(),
            looping: default_looping(),
            title: default_title(),
        }
    }
}

impl AnimationConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .map_err(|_| Error::ConfigNotFound(path.display().to_string()))?;

        Self::parse(&content)
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error with line number if parsing fails.
    pub fn parse(yaml: &str) -> Result<Self> {
        serde_yaml_ng::from_str(yaml).map_err(|e| {
            let line = e.location().map(|l| l.line()).unwrap_or(0);
            Error::ConfigParse { line, message: e.to_string() }
        })
    }

    /// Loads configuration with fallback to defaults.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Serializes the configuration back to YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml_ng::to_string(self)
            .map_err(|e| Error::ConfigParse { line: 0, message: e.to_string() })
    }

    /// Check every value before anything is generated or written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] naming the first offending key.
    pub fn validate(&self) -> Result<()> {
        self.generator_config().validate()?;
        self.axis_range()?;
        if self.width == 0 || self.height == 0 {
            return Err(Error::invalid(
                "width",
                format!("frame size must be non-zero, got {}x{}", self.width, self.height),
            ));
        }
        if self.width > u32::from(u16::MAX) || self.height > u32::from(u16::MAX) {
            return Err(Error::invalid(
                "width",
                format!("frame size {}x{} exceeds the GIF limit of 65535", self.width, self.height),
            ));
        }
        self.check_layout()?;
        if self.output_path.as_os_str().is_empty() {
            return Err(Error::invalid("output_path", "must not be empty"));
        }
        Ok(())
    }

    /// Frame size must leave a readable axis and one pixel column per bar.
    fn check_layout(&self) -> Result<()> {
        let chart = BarChart::new()
            .title(self.title.clone())
            .axis(self.axis_range()?)
            .dimensions(self.width, self.height);
        if chart.plot_area_for(1).is_err() {
            return Err(Error::invalid(
                "height",
                format!("{}x{} frame is too small for a chart", self.width, self.height),
            ));
        }
        if chart.plot_area_for(self.series_count).is_err() {
            return Err(Error::invalid(
                "series_count",
                format!(
                    "{} bars do not fit in a {}x{} frame",
                    self.series_count, self.width, self.height
                ),
            ));
        }
        Ok(())
    }

    /// Random-walk parameters.
    #[must_use]
    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            series_count: self.series_count,
            total_duration: self.total_duration,
            frames_per_second: self.frames_per_second,
            step_std_dev: self.step_std_dev,
            seed: self.seed,
        }
    }

    /// Fixed value axis.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the axis is malformed.
    pub fn axis_range(&self) -> Result<AxisRange> {
        AxisRange::new(self.axis.min, self.axis.max, self.axis.step)
    }

    /// Display time of one frame, `1 / frames_per_second`.
    #[must_use]
    pub fn frame_duration(&self) -> Duration {
        Duration::try_from_secs_f64(1.0 / self.frames_per_second).unwrap_or(Duration::ZERO)
    }

    /// GIF playback options.
    #[must_use]
    pub fn gif_options(&self) -> GifOptions {
        GifOptions::new(self.frame_duration(), self.looping)
    }
}
