//! High-level plot types.
//!
//! Provides ready-to-use visualization types with builder APIs.

mod bar;

pub use bar::BarChart;
