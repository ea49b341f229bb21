//! # Walkbars
//!
//! Animated bar charts of bounded random walks, rendered in pure Rust.
//!
//! A fixed number of series start at 0.5 and drift by normally distributed
//! steps, clamped to `[0, 1]`, sampled once per frame. Each time step becomes
//! one bar-chart frame on a fixed value axis, and the frames are encoded as
//! an animated GIF.
//!
//! ## Features
//!
//! - **Pure Rust**: software rasterizer, no system graphics libraries
//! - **Reproducible**: seeded generation yields identical animations
//! - **Atomic output**: the GIF appears only once it is complete
//! - **Still frames**: optional per-frame PNG export
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use walkbars::prelude::*;
//!
//! let config = AnimationConfig {
//!     series_count: 3,
//!     total_duration: 5.0,
//!     seed: Some(7),
//!     ..AnimationConfig::default()
//! };
//!
//! let summary = render_animation(&config)?;
//! println!("{} frames -> {}", summary.frame_count, summary.output_path.display());
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow common patterns in graphics/visualization code
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Color types and palettes.
pub mod color;

/// Core framebuffer for pixel rendering.
pub mod framebuffer;

/// Scale functions and the fixed value axis.
pub mod scale;

// ============================================================================
// Data Modules
// ============================================================================

/// Bounded random-walk series generation.
pub mod series;

/// Grouping samples into frames.
pub mod frames;

// ============================================================================
// Rendering Modules
// ============================================================================

/// Rasterization primitives and bitmap text.
pub mod render;

/// Chart types.
pub mod plots;

/// Output encoders (GIF, PNG).
pub mod output;

// ============================================================================
// Pipeline
// ============================================================================

/// YAML configuration.
pub mod config;

/// End-to-end animation rendering.
pub mod animation;

pub use animation::{render_animation, AnimationSummary};
pub use config::AnimationConfig;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for walkbars operations.
pub mod error;

pub use error::{Error, Result, Stage};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust,ignore
/// use walkbars::prelude::*;
/// ```
pub mod prelude {
    pub use crate::animation::{render_animation, AnimationSummary};
    pub use crate::color::{Hsla, Palette, Rgba};
    pub use crate::config::{AnimationConfig, AxisConfig};
    pub use crate::error::{Error, Result, Stage};
    pub use crate::framebuffer::Framebuffer;
    pub use crate::frames::{group_frames, Frame, FrameStats};
    pub use crate::output::{AnimationRecorder, GifEncoder, GifOptions, PngEncoder};
    pub use crate::plots::BarChart;
    pub use crate::scale::{AxisRange, LinearScale, Scale};
    pub use crate::series::{GeneratorConfig, Sample, SeriesGenerator, Timestamp};
}
