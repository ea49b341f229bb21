//! Core framebuffer for pixel rendering.
//!
//! A tightly packed RGBA pixel buffer. Rows carry no stride padding so a
//! rendered frame can be handed to the GIF and PNG encoders without a copy.

use crate::color::Rgba;
use crate::error::{Error, Result};

/// RGBA raster target for one animation frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    /// RGBA pixels in row-major order, 4 bytes per pixel.
    pixels: Vec<u8>,
}

impl Framebuffer {
    /// Create a new framebuffer with the given dimensions.
    ///
    /// # Errors
    ///
    /// Returns an error if width or height is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use walkbars::framebuffer::Framebuffer;
    ///
    /// let fb = Framebuffer::new(800, 600).unwrap();
    /// assert_eq!(fb.width(), 800);
    /// assert_eq!(fb.height(), 600);
    /// ```
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }

        let size = (width as usize) * (height as usize) * 4;
        Ok(Self { width, height, pixels: vec![0; size] })
    }

    /// Get the width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Get the height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Get the raw pixel data as a slice.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Clear the framebuffer to a solid color.
    pub fn clear(&mut self, color: Rgba) {
        let rgba = color.to_array();
        for chunk in self.pixels.chunks_exact_mut(4) {
            chunk.copy_from_slice(&rgba);
        }
    }

    /// Fill a rectangular region with a solid color.
    ///
    /// The rectangle may extend past any edge; it is clipped to the buffer.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Rgba) {
        let Some((x1, y1, x2, y2)) = self.clip(x, y, w, h) else {
            return;
        };

        let rgba = color.to_array();
        let row_bytes = (self.width as usize) * 4;
        for row_y in y1..y2 {
            let start = row_y * row_bytes + x1 * 4;
            let end = row_y * row_bytes + x2 * 4;
            for chunk in self.pixels[start..end].chunks_exact_mut(4) {
                chunk.copy_from_slice(&rgba);
            }
        }
    }

    /// Get the color at a specific pixel coordinate.
    ///
    /// Returns `None` if the coordinates are out of bounds.
    #[must_use]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let idx = self.pixel_index(x, y);
        Some(Rgba::from_array([
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]))
    }

    /// Set the color at a specific pixel coordinate.
    ///
    /// Does nothing if the coordinates are out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if x >= self.width || y >= self.height {
            return;
        }

        let idx = self.pixel_index(x, y);
        self.pixels[idx..idx + 4].copy_from_slice(&color.to_array());
    }

    /// Count pixels exactly matching `color`.
    #[must_use]
    pub fn count_color(&self, color: Rgba) -> usize {
        let rgba = color.to_array();
        self.pixels.chunks_exact(4).filter(|chunk| *chunk == rgba).count()
    }

    /// Intersect a rectangle with the buffer, returning `(x1, y1, x2, y2)`
    /// with exclusive upper bounds, or `None` if nothing is visible.
    fn clip(&self, x: i32, y: i32, w: u32, h: u32) -> Option<(usize, usize, usize, usize)> {
        let x1 = i64::from(x).max(0);
        let y1 = i64::from(y).max(0);
        let x2 = (i64::from(x) + i64::from(w)).min(i64::from(self.width));
        let y2 = (i64::from(y) + i64::from(h)).min(i64::from(self.height));

        if x1 >= x2 || y1 >= y2 {
            return None;
        }
        Some((x1 as usize, y1 as usize, x2 as usize, y2 as usize))
    }

    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_framebuffer() {
        let fb = Framebuffer::new(100, 50).unwrap();
        assert_eq!(fb.width(), 100);
        assert_eq!(fb.height(), 50);
        assert_eq!(fb.pixels().len(), 5000 * 4);
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(Framebuffer::new(0, 100).is_err());
        assert!(Framebuffer::new(100, 0).is_err());
        assert!(Framebuffer::new(0, 0).is_err());
    }

    #[test]
    fn test_clear() {
        let mut fb = Framebuffer::new(10, 10).unwrap();
        fb.clear(Rgba::STEEL_BLUE);

        assert_eq!(fb.count_color(Rgba::STEEL_BLUE), 100);
        assert_eq!(fb.get_pixel(9, 9), Some(Rgba::STEEL_BLUE));
    }

    #[test]
    fn test_fill_rect() {
        let mut fb = Framebuffer::new(100, 100).unwrap();
        fb.clear(Rgba::WHITE);
        fb.fill_rect(10, 10, 20, 20, Rgba::BLACK);

        assert_eq!(fb.get_pixel(15, 15), Some(Rgba::BLACK));
        assert_eq!(fb.get_pixel(5, 5), Some(Rgba::WHITE));
        assert_eq!(fb.get_pixel(30, 30), Some(Rgba::WHITE));
        assert_eq!(fb.count_color(Rgba::BLACK), 400);
    }

    #[test]
    fn test_fill_rect_clipped() {
        let mut fb = Framebuffer::new(10, 10).unwrap();
        fb.clear(Rgba::WHITE);
        fb.fill_rect(-5, -5, 8, 8, Rgba::BLACK);
        assert_eq!(fb.count_color(Rgba::BLACK), 9);

        fb.fill_rect(8, 8, 100, 100, Rgba::BLACK);
        assert_eq!(fb.count_color(Rgba::BLACK), 13);

        fb.fill_rect(20, 20, 5, 5, Rgba::BLACK);
        assert_eq!(fb.count_color(Rgba::BLACK), 13);
    }

    #[test]
    fn test_set_get_pixel() {
        let mut fb = Framebuffer::new(10, 10).unwrap();

        fb.set_pixel(5, 5, Rgba::INK);
        assert_eq!(fb.get_pixel(5, 5), Some(Rgba::INK));

        fb.set_pixel(100, 100, Rgba::INK);
        assert_eq!(fb.get_pixel(100, 100), None);
    }
}
