//! Output encoders (animated GIF, PNG stills).

mod gif_encoder;
mod png_encoder;

pub use gif_encoder::{AnimationRecorder, GifEncoder, GifOptions};
pub use png_encoder::PngEncoder;
