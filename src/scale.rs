//! Scale functions for data-to-visual mappings.
//!
//! Scales transform data values to visual positions. The value axis of every
//! frame uses one [`AxisRange`] supplied up front, never one inferred from the
//! data, so bar heights stay comparable across the whole animation.

use crate::error::{Error, Result};

/// Trait for scale functions that map domain values to range values.
pub trait Scale<D, R> {
    /// Transform a domain value to a range value.
    fn scale(&self, value: D) -> R;

    /// Get the domain extent.
    fn domain(&self) -> (D, D);

    /// Get the range extent.
    fn range(&self) -> (R, R);
}

/// Linear scale for continuous-to-continuous mapping.
#[derive(Debug, Clone, Copy)]
pub struct LinearScale {
    domain_min: f64,
    domain_max: f64,
    range_min: f64,
    range_max: f64,
}

impl LinearScale {
    /// Create a new linear scale.
    ///
    /// # Errors
    ///
    /// Returns an error if domain_min equals domain_max.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Result<Self> {
        if (domain.0 - domain.1).abs() < f64::EPSILON {
            return Err(Error::ScaleDomain("Domain min and max cannot be equal".to_string()));
        }

        Ok(Self {
            domain_min: domain.0,
            domain_max: domain.1,
            range_min: range.0,
            range_max: range.1,
        })
    }
}

impl Scale<f64, f64> for LinearScale {
    fn scale(&self, value: f64) -> f64 {
        let t = (value - self.domain_min) / (self.domain_max - self.domain_min);
        self.range_min + t * (self.range_max - self.range_min)
    }

    fn domain(&self) -> (f64, f64) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (f64, f64) {
        (self.range_min, self.range_max)
    }
}

/// Fixed value-axis extent with a tick interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    min: f64,
    max: f64,
    step: f64,
}

impl Default for AxisRange {
    /// The unit interval with ticks every 0.2, matching the clamped series domain.
    fn default() -> Self {
        Self { min: 0.0, max: 1.0, step: 0.2 }
    }
}

impl AxisRange {
    /// Upper bound on ticks per axis; more than this is unreadable.
    pub const MAX_TICKS: usize = 101;

    /// Create an axis range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if any bound is non-finite, if
    /// `min >= max`, if `step <= 0`, or if the step yields more than
    /// [`Self::MAX_TICKS`] ticks.
    pub fn new(min: f64, max: f64, step: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || !step.is_finite() {
            return Err(Error::invalid(
                "axis",
                format!("bounds must be finite: {min}..{max} step {step}"),
            ));
        }
        if min >= max {
            return Err(Error::invalid(
                "axis",
                format!("min ({min}) must be less than max ({max})"),
            ));
        }
        if step <= 0.0 {
            return Err(Error::invalid("axis", format!("step must be positive, got {step}")));
        }
        let range = Self { min, max, step };
        if range.tick_count() > Self::MAX_TICKS {
            return Err(Error::invalid(
                "axis",
                format!("step {step} yields more than {} ticks", Self::MAX_TICKS),
            ));
        }
        Ok(range)
    }

    /// Lower bound.
    #[must_use]
    pub const fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound.
    #[must_use]
    pub const fn max(&self) -> f64 {
        self.max
    }

    /// Tick interval.
    #[must_use]
    pub const fn step(&self) -> f64 {
        self.step
    }

    /// Number of ticks from `min` through `max` inclusive.
    #[must_use]
    pub fn tick_count(&self) -> usize {
        ((self.max - self.min) / self.step + 1e-9).floor() as usize + 1
    }

    /// Tick positions, computed by index to avoid accumulated drift.
    #[must_use]
    pub fn ticks(&self) -> Vec<f64> {
        (0..self.tick_count()).map(|i| self.min + self.step * i as f64).collect()
    }

    /// Clamp a value into the axis extent.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Whether `value` lies inside the axis extent.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Linear scale from this axis onto a pixel span.
    ///
    /// # Errors
    ///
    /// Propagates [`LinearScale::new`] failures.
    pub fn to_scale(&self, range: (f64, f64)) -> Result<LinearScale> {
        LinearScale::new((self.min, self.max), range)
    }

    /// Decimal places needed to print every tick distinctly.
    #[must_use]
    pub fn label_precision(&self) -> usize {
        let mut precision = 0;
        let mut step = self.step;
        while precision < 6 && (step - step.round()).abs() > 1e-9 {
            step *= 10.0;
            precision += 1;
        }
        precision
    }
}
