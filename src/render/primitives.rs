//! Primitive rendering functions.
//!
//! Bar charts only need axis-aligned shapes, so everything here reduces to
//! clipped rectangle fills on the framebuffer.

use crate::color::Rgba;
use crate::framebuffer::Framebuffer;

/// Axis-aligned pixel rectangle. `x`/`y` may be negative; drawing clips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Exclusive bottom edge.
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }
}

/// Draw a filled rectangle.
pub fn draw_rect(fb: &mut Framebuffer, x: i32, y: i32, width: u32, height: u32, color: Rgba) {
    fb.fill_rect(x, y, width, height, color);
}

/// Draw a rectangle outline.
pub fn draw_rect_outline(
    fb: &mut Framebuffer,
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    color: Rgba,
    thickness: u32,
) {
    let thickness = thickness.max(1);
    if width == 0 || height == 0 {
        return;
    }

    // Top edge
    fb.fill_rect(x, y, width, thickness, color);
    // Bottom edge
    if height > thickness {
        fb.fill_rect(x, y + (height - thickness) as i32, width, thickness, color);
    }
    // Left and right edges
    if height > 2 * thickness {
        let inner = height - 2 * thickness;
        fb.fill_rect(x, y + thickness as i32, thickness, inner, color);
        if width > thickness {
            let right = x + (width - thickness) as i32;
            fb.fill_rect(right, y + thickness as i32, thickness, inner, color);
        }
    }
}

/// Draw a horizontal line of `length` pixels starting at (`x`, `y`).
pub fn draw_hline(fb: &mut Framebuffer, x: i32, y: i32, length: u32, color: Rgba) {
    fb.fill_rect(x, y, length, 1, color);
}

/// Draw a vertical line of `length` pixels starting at (`x`, `y`).
pub fn draw_vline(fb: &mut Framebuffer, x: i32, y: i32, length: u32, color: Rgba) {
    fb.fill_rect(x, y, 1, length, color);
}

/// Draw a dashed horizontal line (`dash` pixels on, `dash` pixels off).
pub fn draw_dashed_hline(
    fb: &mut Framebuffer,
    x: i32,
    y: i32,
    length: u32,
    dash: u32,
    color: Rgba,
) {
    let dash = dash.max(1);
    let mut offset = 0;
    while offset < length {
        let run = dash.min(length - offset);
        fb.fill_rect(x + offset as i32, y, run, 1, color);
        offset += 2 * dash;
    }
}
