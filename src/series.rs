//! Series generation: bounded random walks sampled at a fixed frame rate.
//!
//! Every series starts at [`INITIAL_VALUE`]. At each time step the current
//! value of each series is recorded as a [`Sample`], then perturbed by a
//! normal draw with mean 0 and standard deviation `step_std_dev` and clamped
//! back into `[0, 1]`.
//!
//! The sweep covers `t = k * frame_time` for every `k >= 0` with
//! `t < total_duration - frame_time`, which is one step shorter than a full
//! sweep of the duration: one second at 10 fps yields 9 steps.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use tracing::debug;

use crate::error::{Error, Result};

/// Value every series holds before the first step.
pub const INITIAL_VALUE: f64 = 0.5;

/// Lower bound of the series domain.
pub const VALUE_MIN: f64 = 0.0;

/// Upper bound of the series domain.
pub const VALUE_MAX: f64 = 1.0;

/// Absorbs float representation error in `total_duration * frames_per_second`.
const STEP_TOLERANCE: f64 = 1e-9;

/// Upper bound on generated samples, to fail fast on runaway configurations.
pub const MAX_SAMPLES: usize = 10_000_000;

/// Longest fractional part a timestamp label will carry.
const MAX_LABEL_PRECISION: usize = 6;

/// Highest frame rate whose timestamp labels stay distinct at
/// [`MAX_LABEL_PRECISION`] fractional digits.
pub const MAX_FRAMES_PER_SECOND: f64 = 1e6;

/// Parameters of the random walk.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Number of independent series.
    pub series_count: usize,
    /// Length of the sweep in seconds.
    pub total_duration: f64,
    /// Sampling rate; `frame_time = 1 / frames_per_second`.
    pub frames_per_second: f64,
    /// Standard deviation of each per-step perturbation.
    pub step_std_dev: f64,
    /// RNG seed. `None` seeds from the operating system.
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            series_count: 5,
            total_duration: 10.0,
            frames_per_second: 10.0,
            step_std_dev: 0.05,
            seed: None,
        }
    }
}

impl GeneratorConfig {
    /// Check every parameter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for a zero series count, a
    /// non-positive or non-finite duration or frame rate, a negative or
    /// non-finite standard deviation, a frame rate above
    /// [`MAX_FRAMES_PER_SECOND`], or a configuration that would generate
    /// more than [`MAX_SAMPLES`] samples.
    pub fn validate(&self) -> Result<()> {
        if self.series_count == 0 {
            return Err(Error::invalid("series_count", "must be at least 1"));
        }
        if !(self.total_duration.is_finite() && self.total_duration > 0.0) {
            return Err(Error::invalid(
                "total_duration",
                format!("must be a positive number of seconds, got {}", self.total_duration),
            ));
        }
        if !(self.frames_per_second.is_finite() && self.frames_per_second > 0.0) {
            return Err(Error::invalid(
                "frames_per_second",
                format!("must be positive, got {}", self.frames_per_second),
            ));
        }
        if self.frames_per_second > MAX_FRAMES_PER_SECOND {
            return Err(Error::invalid(
                "frames_per_second",
                format!(
                    "must not exceed {MAX_FRAMES_PER_SECOND}, got {}",
                    self.frames_per_second
                ),
            ));
        }
        if !(self.step_std_dev.is_finite() && self.step_std_dev >= 0.0) {
            return Err(Error::invalid(
                "step_std_dev",
                format!("must be zero or positive, got {}", self.step_std_dev),
            ));
        }
        let samples = self.step_count().checked_mul(self.series_count);
        if samples.map_or(true, |n| n > MAX_SAMPLES) {
            return Err(Error::invalid(
                "total_duration",
                format!("configuration would generate more than {MAX_SAMPLES} samples"),
            ));
        }
        Ok(())
    }

    /// Seconds between consecutive steps.
    #[must_use]
    pub fn frame_time(&self) -> f64 {
        1.0 / self.frames_per_second
    }

    /// Number of time steps, i.e. the number of frames the animation will have.
    #[must_use]
    pub fn step_count(&self) -> usize {
        let bound = self.total_duration * self.frames_per_second - 1.0;
        if bound.is_nan() || bound <= STEP_TOLERANCE {
            return 0;
        }
        let steps = (bound - STEP_TOLERANCE).ceil();
        if steps >= usize::MAX as f64 {
            usize::MAX
        } else {
            steps as usize
        }
    }

    /// Fractional digits needed for consecutive timestamp labels to differ.
    #[must_use]
    pub fn label_precision(&self) -> usize {
        let digits = (-self.frame_time().log10() - STEP_TOLERANCE).ceil();
        if digits.is_finite() {
            (digits.max(1.0) as usize).min(MAX_LABEL_PRECISION)
        } else {
            1
        }
    }
}

/// Discretized time label of one step.
///
/// Ordering, equality and hashing use the step index only, so two timestamps
/// of the same step are the same frame key regardless of float rounding.
#[derive(Debug, Clone, Copy)]
pub struct Timestamp {
    step: usize,
    seconds: f64,
    precision: usize,
}

impl Timestamp {
    /// Timestamp of `step` occurring at `seconds`, labelled with `precision`
    /// fractional digits.
    #[must_use]
    pub fn new(step: usize, seconds: f64, precision: usize) -> Self {
        Self { step, seconds, precision: precision.min(MAX_LABEL_PRECISION) }
    }

    /// Zero-based step index.
    #[must_use]
    pub const fn step(&self) -> usize {
        self.step
    }

    /// Time offset in seconds.
    #[must_use]
    pub const fn seconds(&self) -> f64 {
        self.seconds
    }

    /// Label text, `M:SS.f` with the configured fractional digits.
    #[must_use]
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scale = 10_u64.pow(self.precision as u32);
        let units = (self.seconds.max(0.0) * scale as f64).round() as u64;
        let minutes = units / (60 * scale);
        let rem = units % (60 * scale);
        let secs = rem / scale;
        let frac = rem % scale;
        if self.precision == 0 {
            write!(f, "{minutes}:{secs:02}")
        } else {
            write!(f, "{minutes}:{secs:02}.{frac:0width$}", width = self.precision)
        }
    }
}

impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        self.step == other.step
    }
}

impl Eq for Timestamp {}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        self.step.cmp(&other.step)
    }
}

impl Hash for Timestamp {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.step.hash(state);
    }
}

/// One observation of one series at one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// When the value was observed.
    pub timestamp: Timestamp,
    /// Series index in `1..=series_count`.
    pub series_id: usize,
    /// Value before this step's perturbation, always within `[0, 1]`.
    pub value: f64,
}

/// Produces the sample sequence for a [`GeneratorConfig`].
#[derive(Debug, Clone)]
pub struct SeriesGenerator {
    config: GeneratorConfig,
}

impl SeriesGenerator {
    /// Create a generator, validating the configuration first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the configuration is invalid.
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The validated configuration.
    #[must_use]
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate samples with an RNG seeded from the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the perturbation distribution
    /// cannot be built.
    pub fn generate(&self) -> Result<Vec<Sample>> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.generate_with_rng(&mut rng)
    }

    /// Generate samples drawing perturbations from `rng`.
    ///
    /// Samples come out in (step, series) nested order: all series of step 0
    /// by ascending id, then all series of step 1, and so on.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the perturbation distribution
    /// cannot be built.
    pub fn generate_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<Sample>> {
        let normal = Normal::new(0.0, self.config.step_std_dev)
            .map_err(|e| Error::invalid("step_std_dev", e.to_string()))?;

        let series_count = self.config.series_count;
        let steps = self.config.step_count();
        let frame_time = self.config.frame_time();
        let precision = self.config.label_precision();

        let mut values = vec![INITIAL_VALUE; series_count];
        let mut samples = Vec::with_capacity(steps * series_count);

        for step in 0..steps {
            let timestamp = Timestamp::new(step, step as f64 * frame_time, precision);
            for (index, value) in values.iter_mut().enumerate() {
                samples.push(Sample { timestamp, series_id: index + 1, value: *value });
                *value = clamp_value(*value + normal.sample(rng));
            }
        }

        debug!(steps, series_count, samples = samples.len(), "generated random walk");
        Ok(samples)
    }
}

/// Clamp into the series domain, `max(0, min(1, value))`.
#[must_use]
pub fn clamp_value(value: f64) -> f64 {
    VALUE_MIN.max(VALUE_MAX.min(value))
}
