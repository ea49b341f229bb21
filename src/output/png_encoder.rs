//! PNG output encoder.
//!
//! Pure Rust PNG encoding using the `png` crate. Used for still-frame export
//! alongside the animation.

use crate::error::{Error, Result};
use crate::framebuffer::Framebuffer;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// PNG encoder for framebuffer output.
pub struct PngEncoder;

impl PngEncoder {
    /// Write a framebuffer to a PNG file.
    ///
    /// # Errors
    ///
    /// Returns an error if file creation or PNG encoding fails.
    pub fn write_to_file<P: AsRef<Path>>(fb: &Framebuffer, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| Error::write(path, e))?;
        let writer = BufWriter::new(file);

        let mut encoder = png::Encoder::new(writer, fb.width(), fb.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(fb.pixels())?;
        writer.finish()?;

        Ok(())
    }

    /// Write frame number `index` (zero-based) into `dir` as
    /// `frame_NNNN.png`, returning the file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_frame<P: AsRef<Path>>(fb: &Framebuffer, dir: P, index: usize) -> Result<PathBuf> {
        let path = dir.as_ref().join(Self::frame_file_name(index));
        Self::write_to_file(fb, &path)?;
        Ok(path)
    }

    /// File name used for still frame `index`.
    #[must_use]
    pub fn frame_file_name(index: usize) -> String {
        format!("frame_{:04}.png", index + 1)
    }

    /// Encode a framebuffer to PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if PNG encoding fails.
    pub fn to_bytes(fb: &Framebuffer) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();

        {
            let mut encoder = png::Encoder::new(&mut buffer, fb.width(), fb.height());
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);

            let mut writer = encoder.write_header()?;
            writer.write_image_data(fb.pixels())?;
        }

        Ok(buffer)
    }
}
