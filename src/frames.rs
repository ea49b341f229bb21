//! Grouping samples into animation frames.
//!
//! A frame holds every sample of one timestamp, in series-id order. Grouping
//! keeps timestamps in first-seen order and refuses input that would yield an
//! incomplete frame or a frame out of temporal order.

use tracing::trace;

use crate::error::{Error, Result};
use crate::series::{Sample, Timestamp};

/// All samples sharing one timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    timestamp: Timestamp,
    values: Vec<f64>,
}

impl Frame {
    /// When this frame was sampled.
    #[must_use]
    pub const fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Values indexed by `series_id - 1`.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of series in the frame.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the frame has no samples (never true for assembled frames).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of series `series_id` (1-based).
    #[must_use]
    pub fn value(&self, series_id: usize) -> Option<f64> {
        series_id.checked_sub(1).and_then(|i| self.values.get(i).copied())
    }

    /// Minimum, maximum and mean of the frame's values.
    #[must_use]
    pub fn stats(&self) -> FrameStats {
        FrameStats::from_values(&self.values)
    }
}

/// Summary statistics of one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    /// Smallest value.
    pub min: f64,
    /// Largest value.
    pub max: f64,
    /// Arithmetic mean.
    pub mean: f64,
}

impl FrameStats {
    fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self { min: 0.0, max: 0.0, mean: 0.0 };
        }
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        Self { min, max, mean }
    }
}

/// Group samples by timestamp.
///
/// Timestamps are taken in first-seen order. Within a timestamp, samples
/// must carry series ids `1..=series_count`, each exactly once; they are
/// stored by id, so intra-frame input order does not matter.
///
/// # Errors
///
/// Returns [`Error::FrameAssembly`] if a timestamp reappears after a later
/// one, if a frame is missing a series or contains one twice, or if a
/// series id is outside `1..=series_count`.
pub fn group_frames(samples: &[Sample], series_count: usize) -> Result<Vec<Frame>> {
    if series_count == 0 {
        return Err(Error::invalid("series_count", "must be at least 1"));
    }

    let mut frames: Vec<Frame> = Vec::with_capacity(samples.len() / series_count);
    let mut slots: Vec<Option<f64>> = vec![None; series_count];
    let mut current: Option<Timestamp> = None;

    for sample in samples {
        match current {
            Some(ts) if ts == sample.timestamp => {}
            Some(ts) => {
                if sample.timestamp < ts {
                    return Err(Error::FrameAssembly(format!(
                        "timestamp {} follows later timestamp {}",
                        sample.timestamp, ts
                    )));
                }
                frames.push(close_frame(ts, &mut slots)?);
                current = Some(sample.timestamp);
            }
            None => current = Some(sample.timestamp),
        }

        let slot = sample
            .series_id
            .checked_sub(1)
            .and_then(|i| slots.get_mut(i))
            .ok_or_else(|| {
                Error::FrameAssembly(format!(
                    "series id {} at {} is outside 1..={series_count}",
                    sample.series_id, sample.timestamp
                ))
            })?;
        if slot.replace(sample.value).is_some() {
            return Err(Error::FrameAssembly(format!(
                "series {} appears twice at {}",
                sample.series_id, sample.timestamp
            )));
        }
    }

    if let Some(ts) = current {
        frames.push(close_frame(ts, &mut slots)?);
    }

    trace!(frames = frames.len(), series_count, "grouped samples into frames");
    Ok(frames)
}

fn close_frame(timestamp: Timestamp, slots: &mut [Option<f64>]) -> Result<Frame> {
    let mut values = Vec::with_capacity(slots.len());
    for (i, slot) in slots.iter_mut().enumerate() {
        match slot.take() {
            Some(v) => values.push(v),
            None => {
                return Err(Error::FrameAssembly(format!(
                    "frame {timestamp} is missing series {}",
                    i + 1
                )))
            }
        }
    }
    Ok(Frame { timestamp, values })
}
