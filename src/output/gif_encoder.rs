//! Animated GIF output.
//!
//! [`AnimationRecorder`] is the scoped recording bracket: it is acquired
//! before the first frame, takes frames strictly in order, and publishes the
//! finished file with an atomic rename. Until [`AnimationRecorder::finish`]
//! succeeds, frames go to a temporary file in the destination directory that
//! is removed when the recorder is dropped, so a failed run never leaves a
//! partial GIF at the output path.

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use gif::{Encoder, Frame, Repeat};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::framebuffer::Framebuffer;

/// NeuQuant sampling factor passed to the GIF quantizer (1 = best, 30 = fastest).
const DEFAULT_SPEED: i32 = 10;

/// Playback parameters shared by every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GifOptions {
    /// Display time of each frame.
    pub frame_delay: Duration,
    /// Repeat playback indefinitely.
    pub looping: bool,
    /// Color quantization speed, 1..=30.
    pub speed: i32,
}

impl Default for GifOptions {
    fn default() -> Self {
        Self { frame_delay: Duration::from_millis(100), looping: true, speed: DEFAULT_SPEED }
    }
}

impl GifOptions {
    /// Options with the given per-frame delay and loop flag.
    #[must_use]
    pub fn new(frame_delay: Duration, looping: bool) -> Self {
        Self { frame_delay, looping, ..Self::default() }
    }

    /// Frame delay in GIF units (hundredths of a second), at least 1.
    #[must_use]
    pub fn delay_centis(&self) -> u16 {
        let centis = (self.frame_delay.as_secs_f64() * 100.0).round();
        centis.clamp(1.0, f64::from(u16::MAX)) as u16
    }

    /// Write the loop extension when looping. A NETSCAPE loop count of 0
    /// means "forever", so a single pass is expressed by omitting it.
    fn apply<W: Write>(&self, encoder: &mut Encoder<W>) -> Result<()> {
        if self.looping {
            encoder.set_repeat(Repeat::Infinite)?;
        }
        Ok(())
    }
}

/// Streams frames into a GIF and publishes it on [`finish`](Self::finish).
pub struct AnimationRecorder {
    encoder: Encoder<BufWriter<NamedTempFile>>,
    destination: PathBuf,
    width: u16,
    height: u16,
    options: GifOptions,
    frames: usize,
}

impl std::fmt::Debug for AnimationRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationRecorder")
            .field("destination", &self.destination)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("options", &self.options)
            .field("frames", &self.frames)
            .finish_non_exhaustive()
    }
}

impl AnimationRecorder {
    /// Begin recording an animation of `width` x `height` frames to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if a dimension is zero or exceeds
    /// the GIF limit of 65535, and [`Error::Write`] if the temporary file
    /// cannot be created next to `path`.
    pub fn begin(
        path: impl AsRef<Path>,
        width: u32,
        height: u32,
        options: GifOptions,
    ) -> Result<Self> {
        let destination = path.as_ref().to_path_buf();
        let (gif_width, gif_height) = gif_dimensions(width, height)?;

        let dir = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let temp = tempfile::Builder::new()
            .prefix(".walkbars-")
            .suffix(".gif.part")
            .tempfile_in(&dir)
            .map_err(|e| Error::write(&destination, e))?;

        let mut encoder = Encoder::new(BufWriter::new(temp), gif_width, gif_height, &[])?;
        options.apply(&mut encoder)?;

        debug!(path = %destination.display(), width, height, "animation recording started");
        Ok(Self { encoder, destination, width: gif_width, height: gif_height, options, frames: 0 })
    }

    /// Append one frame.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if the frame size differs from
    /// the canvas, or an encoding error if the write fails.
    pub fn record(&mut self, fb: &Framebuffer) -> Result<()> {
        if fb.width() != u32::from(self.width) || fb.height() != u32::from(self.height) {
            return Err(Error::InvalidDimensions { width: fb.width(), height: fb.height() });
        }

        let mut pixels = fb.pixels().to_vec();
        let speed = self.options.speed.clamp(1, 30);
        let mut frame = Frame::from_rgba_speed(self.width, self.height, &mut pixels, speed);
        frame.delay = self.options.delay_centis();
        self.encoder.write_frame(&frame)?;
        self.frames += 1;
        Ok(())
    }

    /// Number of frames recorded so far.
    #[must_use]
    pub const fn frame_count(&self) -> usize {
        self.frames
    }

    /// Destination path.
    #[must_use]
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Write the trailer, flush, and move the file into place, replacing any
    /// existing file at the destination.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Write`] if flushing or the final rename fails. The
    /// temporary file is removed in that case.
    pub fn finish(self) -> Result<PathBuf> {
        let Self { encoder, destination, frames, .. } = self;

        let writer = encoder.into_inner().map_err(|e| Error::write(&destination, e))?;
        let mut temp = writer.into_inner().map_err(|e| Error::write(&destination, e.into_error()))?;
        temp.flush().map_err(|e| Error::write(&destination, e))?;
        temp.as_file().sync_all().map_err(|e| Error::write(&destination, e))?;
        temp.persist(&destination).map_err(|e| Error::write(&destination, e.error))?;

        info!(path = %destination.display(), frames, "animation written");
        Ok(destination)
    }
}

fn gif_dimensions(width: u32, height: u32) -> Result<(u16, u16)> {
    match (u16::try_from(width), u16::try_from(height)) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => Ok((w, h)),
        _ => Err(Error::InvalidDimensions { width, height }),
    }
}

/// One-shot GIF encoding of a complete frame sequence.
pub struct GifEncoder;

impl GifEncoder {
    /// Write `frames` as an animated GIF at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if `frames` is empty, frame sizes differ, or writing
    /// fails. No file is left at `path` on failure.
    pub fn write_to_file<P: AsRef<Path>>(
        frames: &[Framebuffer],
        path: P,
        options: GifOptions,
    ) -> Result<PathBuf> {
        let first = frames.first().ok_or(Error::EmptyData)?;
        let mut recorder = AnimationRecorder::begin(path, first.width(), first.height(), options)?;
        for fb in frames {
            recorder.record(fb)?;
        }
        recorder.finish()
    }

    /// Encode `frames` as animated GIF bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if `frames` is empty, frame sizes differ, or
    /// encoding fails.
    pub fn to_bytes(frames: &[Framebuffer], options: GifOptions) -> Result<Vec<u8>> {
        let first = frames.first().ok_or(Error::EmptyData)?;
        let (width, height) = gif_dimensions(first.width(), first.height())?;

        let mut buffer = Vec::new();
        {
            let mut encoder = Encoder::new(&mut buffer, width, height, &[])?;
            options.apply(&mut encoder)?;
            for fb in frames {
                if fb.width() != first.width() || fb.height() != first.height() {
                    return Err(Error::InvalidDimensions { width: fb.width(), height: fb.height() });
                }
                let mut pixels = fb.pixels().to_vec();
                let speed = options.speed.clamp(1, 30);
                let mut frame = Frame::from_rgba_speed(width, height, &mut pixels, speed);
                frame.delay = options.delay_centis();
                encoder.write_frame(&frame)?;
            }
        }

        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;

    fn solid(color: Rgba) -> Framebuffer {
        let mut fb = Framebuffer::new(8, 6).unwrap();
        fb.clear(color);
        fb
    }

    fn decode(bytes: &[u8]) -> (usize, Vec<u16>, Repeat) {
        let mut decoder = gif::Decoder::new(bytes).unwrap();
        let mut delays = Vec::new();
        while let Some(frame) = decoder.read_next_frame().unwrap() {
            delays.push(frame.delay);
        }
        (delays.len(), delays, decoder.repeat())
    }

    #[test]
    fn test_delay_centis() {
        assert_eq!(GifOptions::new(Duration::from_millis(100), true).delay_centis(), 10);
        assert_eq!(GifOptions::new(Duration::from_secs_f64(1.0 / 30.0), true).delay_centis(), 3);
        assert_eq!(GifOptions::new(Duration::from_millis(1), true).delay_centis(), 1);
        assert_eq!(GifOptions::new(Duration::from_secs(10_000), true).delay_centis(), u16::MAX);
    }

    #[test]
    fn test_gif_to_bytes() {
        let frames = [solid(Rgba::WHITE), solid(Rgba::BLACK)];
        let bytes = GifEncoder::to_bytes(&frames, GifOptions::default()).unwrap();

        assert_eq!(&bytes[0..6], b"GIF89a");
        let (count, delays, repeat) = decode(&bytes);
        assert_eq!(count, 2);
        assert!(delays.iter().all(|&d| d == 10));
        assert_eq!(repeat, Repeat::Infinite);
    }

    #[test]
    fn test_gif_no_loop() {
        let frames = [solid(Rgba::WHITE)];
        let options = GifOptions::new(Duration::from_millis(250), false);
        let bytes = GifEncoder::to_bytes(&frames, options).unwrap();
        let (count, delays, repeat) = decode(&bytes);
        assert_eq!(count, 1);
        assert_eq!(delays, vec![25]);
        assert_eq!(repeat, Repeat::Finite(0));
    }

    #[test]
    fn test_gif_empty_rejected() {
        assert!(matches!(GifEncoder::to_bytes(&[], GifOptions::default()), Err(Error::EmptyData)));
    }

    #[test]
    fn test_gif_mismatched_frames_rejected() {
        let other = Framebuffer::new(4, 4).unwrap();
        let result = GifEncoder::to_bytes(&[solid(Rgba::WHITE), other], GifOptions::default());
        assert!(matches!(result, Err(Error::InvalidDimensions { .. })));
    }

    #[test]
    fn test_gif_dimension_limit() {
        assert!(gif_dimensions(70_000, 10).is_err());
        assert!(gif_dimensions(0, 10).is_err());
        assert_eq!(gif_dimensions(640, 480).unwrap(), (640, 480));
    }

    #[test]
    fn test_recorder_publishes_on_finish() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anim.gif");

        let mut recorder = AnimationRecorder::begin(&path, 8, 6, GifOptions::default()).unwrap();
        recorder.record(&solid(Rgba::WHITE)).unwrap();
        assert!(!path.exists());
        recorder.record(&solid(Rgba::INK)).unwrap();
        assert_eq!(recorder.frame_count(), 2);
        recorder.finish().unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(decode(&bytes).0, 2);
        // only the published file remains
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_recorder_dropped_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anim.gif");
        {
            let mut recorder =
                AnimationRecorder::begin(&path, 8, 6, GifOptions::default()).unwrap();
            recorder.record(&solid(Rgba::WHITE)).unwrap();
        }
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_recorder_rejects_wrong_size() {
        let dir = tempfile::tempdir().unwrap();
        let mut recorder =
            AnimationRecorder::begin(dir.path().join("a.gif"), 8, 6, GifOptions::default())
                .unwrap();
        let wrong = Framebuffer::new(6, 8).unwrap();
        assert!(recorder.record(&wrong).is_err());
    }

    #[test]
    fn test_recorder_overwrites_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anim.gif");
        std::fs::write(&path, b"stale").unwrap();

        GifEncoder::write_to_file(&[solid(Rgba::WHITE)], &path, GifOptions::default()).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[0..6], b"GIF89a");
    }

    #[test]
    fn test_recorder_unwritable_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("anim.gif");
        let err = AnimationRecorder::begin(&path, 8, 6, GifOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Write { .. }));
        assert!(!path.exists());
    }
}
