//! End-to-end animation pipeline.
//!
//! ```text
//! AnimationConfig ─► SeriesGenerator ─► group_frames ─► BarChart ─► AnimationRecorder
//!                                                          │
//!                                                          └─► PngEncoder (optional stills)
//! ```

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tempfile::TempDir;
use tracing::{debug, info};

use crate::config::AnimationConfig;
use crate::error::{Error, Result};
use crate::framebuffer::Framebuffer;
use crate::frames::{group_frames, Frame};
use crate::output::{AnimationRecorder, PngEncoder};
use crate::plots::BarChart;
use crate::scale::AxisRange;
use crate::series::SeriesGenerator;

/// What [`render_animation`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationSummary {
    /// Published GIF path.
    pub output_path: PathBuf,
    /// Frames in the animation.
    pub frame_count: usize,
    /// Bars per frame.
    pub series_count: usize,
    /// Display time of each frame.
    pub frame_delay: Duration,
    /// Whether playback repeats.
    pub looping: bool,
}

/// Generate random-walk series and render them as an animated bar chart.
///
/// Nothing is written until the configuration is valid and at least one
/// frame exists. The GIF appears at `output_path` only once every frame has
/// been encoded; on failure no partial file is left behind. Still frames are
/// staged the same way and move into `frames_dir` only after the GIF is
/// published.
///
/// # Errors
///
/// Returns [`Error::InvalidConfig`] for a bad configuration,
/// [`Error::EmptyData`] if the duration yields no frames, and rendering or
/// write errors from the later stages. [`Error::stage`] tells them apart.
pub fn render_animation(config: &AnimationConfig) -> Result<AnimationSummary> {
    config.validate()?;
    let started = Instant::now();

    let generator = SeriesGenerator::new(config.generator_config())?;
    info!(
        series = config.series_count,
        duration = config.total_duration,
        fps = config.frames_per_second,
        std_dev = config.step_std_dev,
        seed = ?config.seed,
        "generating series"
    );
    let samples = generator.generate()?;
    if samples.is_empty() {
        return Err(Error::EmptyData);
    }

    let frames = group_frames(&samples, config.series_count)?;
    let axis = config.axis_range()?;

    let mut stills = config.frames_dir.as_deref().map(StillFrames::stage).transpose()?;

    let options = config.gif_options();
    let mut recorder =
        AnimationRecorder::begin(&config.output_path, config.width, config.height, options)?;

    for (index, frame) in frames.iter().enumerate() {
        let stats = frame.stats();
        debug!(
            frame = index + 1,
            timestamp = %frame.timestamp(),
            min = stats.min,
            max = stats.max,
            mean = stats.mean,
            "rendering frame"
        );

        let chart = frame_chart(config, axis, frame)?;
        let fb = chart.to_framebuffer()?;
        if let Some(stills) = &mut stills {
            stills.write(&fb, index)?;
        }
        recorder.record(&fb)?;
    }

    let output_path = recorder.finish()?;
    if let Some(stills) = stills {
        stills.publish()?;
    }
    info!(
        path = %output_path.display(),
        frames = frames.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "animation complete"
    );

    Ok(AnimationSummary {
        output_path,
        frame_count: frames.len(),
        series_count: config.series_count,
        frame_delay: options.frame_delay,
        looping: options.looping,
    })
}

/// PNG stills written into a hidden staging directory inside `frames_dir`.
/// Dropping it unpublished removes the staged files.
struct StillFrames {
    staging: TempDir,
    destination: PathBuf,
    files: Vec<String>,
}

impl StillFrames {
    fn stage(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir).map_err(|e| Error::write(dir, e))?;
        let staging = tempfile::Builder::new()
            .prefix(".walkbars-frames-")
            .tempdir_in(dir)
            .map_err(|e| Error::write(dir, e))?;
        Ok(Self { staging, destination: dir.to_path_buf(), files: Vec::new() })
    }

    fn write(&mut self, fb: &Framebuffer, index: usize) -> Result<()> {
        PngEncoder::write_frame(fb, self.staging.path(), index)?;
        self.files.push(PngEncoder::frame_file_name(index));
        Ok(())
    }

    fn publish(self) -> Result<()> {
        for name in &self.files {
            let target = self.destination.join(name);
            std::fs::rename(self.staging.path().join(name), &target)
                .map_err(|e| Error::write(&target, e))?;
        }
        debug!(
            dir = %self.destination.display(),
            frames = self.files.len(),
            "still frames written"
        );
        self.staging.close().map_err(|e| Error::write(&self.destination, e))
    }
}

/// Bar chart of one frame, labelled `"<title> <timestamp>"`.
///
/// # Errors
///
/// Returns an error if the chart cannot be built for the frame's values.
pub fn frame_chart(config: &AnimationConfig, axis: AxisRange, frame: &Frame) -> Result<BarChart> {
    let title = if config.title.is_empty() {
        frame.timestamp().label()
    } else {
        format!("{} {}", config.title, frame.timestamp())
    };

    BarChart::new()
        .values(frame.values())
        .title(title)
        .axis(axis)
        .dimensions(config.width, config.height)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Stage;

    fn config_in(dir: &std::path::Path) -> AnimationConfig {
        AnimationConfig {
            series_count: 3,
            total_duration: 0.3,
            frames_per_second: 10.0,
            step_std_dev: 0.0,
            seed: Some(1),
            output_path: dir.join("anim.gif"),
            width: 160,
            height: 120,
            ..AnimationConfig::default()
        }
    }

    #[test]
    fn test_render_animation_summary() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        let summary = render_animation(&config).unwrap();

        assert_eq!(summary.frame_count, 2);
        assert_eq!(summary.series_count, 3);
        assert_eq!(summary.frame_delay, Duration::from_millis(100));
        assert!(summary.looping);
        assert_eq!(summary.output_path, dir.path().join("anim.gif"));
        assert!(summary.output_path.exists());
    }

    #[test]
    fn test_render_animation_empty_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.total_duration = 0.1;

        let err = render_animation(&config).unwrap_err();
        assert!(matches!(err, Error::EmptyData));
        assert_eq!(err.stage(), Stage::Generation);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_render_animation_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.step_std_dev = -1.0;

        let err = render_animation(&config).unwrap_err();
        assert_eq!(err.stage(), Stage::Configuration);
        assert!(!config.output_path.exists());
    }

    #[test]
    fn test_render_animation_with_stills() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        let stills = dir.path().join("frames");
        config.frames_dir = Some(stills.clone());

        render_animation(&config).unwrap();

        assert!(stills.join("frame_0001.png").exists());
        assert!(stills.join("frame_0002.png").exists());
        assert!(!stills.join("frame_0003.png").exists());
    }

    #[test]
    fn test_failed_publish_leaves_no_stills() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        // A directory at the destination makes the final rename fail.
        config.output_path = dir.path().join("taken");
        std::fs::create_dir(&config.output_path).unwrap();
        let stills = dir.path().join("frames");
        config.frames_dir = Some(stills.clone());

        let err = render_animation(&config).unwrap_err();
        assert_eq!(err.stage(), Stage::Write);
        assert_eq!(std::fs::read_dir(&stills).unwrap().count(), 0);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_frame_chart_title() {
        let config = AnimationConfig::new();
        let samples = SeriesGenerator::new(config.generator_config()).unwrap().generate().unwrap();
        let frames = group_frames(&samples, config.series_count).unwrap();
        let axis = config.axis_range().unwrap();

        let chart = frame_chart(&config, axis, &frames[1]).unwrap();
        assert_eq!(chart.bar_count(), 5);
        assert_eq!(format!("{} {}", config.title, frames[1].timestamp()), "Frame 0:00.1");
    }
}
