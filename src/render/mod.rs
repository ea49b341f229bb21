//! Rendering backends and rasterization.
//!
//! Rectangle primitives and a small bitmap font, enough to draw a labelled
//! bar chart without any system font or GPU dependency.

mod font;
mod primitives;

pub use font::{draw_text, draw_text_centered, draw_text_right, text_height, text_width};
pub use primitives::{
    draw_dashed_hline, draw_hline, draw_rect, draw_rect_outline, draw_vline, Rect,
};
