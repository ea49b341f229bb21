//! Bar chart with a fixed value axis.
//!
//! One bar per series, heights mapped through a caller-supplied
//! [`AxisRange`] rather than the data extent, so consecutive frames of an
//! animation share the same vertical scale.

use tracing::warn;

use crate::color::{Palette, Rgba};
use crate::error::{Error, Result};
use crate::framebuffer::Framebuffer;
use crate::render::{
    draw_dashed_hline, draw_hline, draw_rect, draw_rect_outline, draw_text_centered,
    draw_text_right, draw_vline, text_height, text_width, Rect,
};
use crate::scale::{AxisRange, LinearScale, Scale};

/// Fraction of each bar slot covered by the bar.
const BAR_FILL: f64 = 0.6;
/// Tick mark length in pixels (before text scaling).
const TICK_LENGTH: i32 = 4;
/// Smallest plot area height that still shows the axis.
const MIN_PLOT_HEIGHT: i32 = 16;

/// Builder for a single-frame bar chart.
#[derive(Debug, Clone)]
pub struct BarChart {
    values: Vec<f64>,
    labels: Option<Vec<String>>,
    title: String,
    axis: AxisRange,
    palette: Palette,
    background: Rgba,
    width: u32,
    height: u32,
}

impl Default for BarChart {
    fn default() -> Self {
        Self::new()
    }
}

impl BarChart {
    /// Create a new bar chart builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: Vec::new(),
            labels: None,
            title: String::new(),
            axis: AxisRange::default(),
            palette: Palette::default(),
            background: Rgba::WHITE,
            width: 640,
            height: 480,
        }
    }

    /// Set the bar values, in bar order.
    #[must_use]
    pub fn values(mut self, values: &[f64]) -> Self {
        self.values = values.to_vec();
        self
    }

    /// Set the label printed under each bar. Defaults to `1..=n`.
    #[must_use]
    pub fn labels(mut self, labels: &[impl AsRef<str>]) -> Self {
        self.labels = Some(labels.iter().map(|l| l.as_ref().to_string()).collect());
        self
    }

    /// Set the title printed above the plot area.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the fixed value axis.
    #[must_use]
    pub fn axis(mut self, axis: AxisRange) -> Self {
        self.axis = axis;
        self
    }

    /// Set the bar palette.
    #[must_use]
    pub fn palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Color every bar the same.
    #[must_use]
    pub fn color(mut self, color: Rgba) -> Self {
        self.palette = Palette::Single(color);
        self
    }

    /// Set the output dimensions.
    #[must_use]
    pub fn dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Number of bars.
    #[must_use]
    pub fn bar_count(&self) -> usize {
        self.values.len()
    }

    /// Build and validate the chart.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no values, a value is not finite, the
    /// label count differs from the value count, or the dimensions leave no
    /// room for the plot area.
    pub fn build(self) -> Result<Self> {
        if self.values.is_empty() {
            return Err(Error::Rendering("bar chart needs at least one value".to_string()));
        }
        if let Some(bad) = self.values.iter().find(|v| !v.is_finite()) {
            return Err(Error::Rendering(format!("bar value {bad} is not finite")));
        }
        if let Some(labels) = &self.labels {
            if labels.len() != self.values.len() {
                return Err(Error::Rendering(format!(
                    "{} labels for {} bars",
                    labels.len(),
                    self.values.len()
                )));
            }
        }
        self.plot_area()?;
        Ok(self)
    }

    fn text_scale(&self) -> u32 {
        (self.height / 240).max(1)
    }

    fn tick_label(&self, tick: f64) -> String {
        let precision = self.axis.label_precision();
        let tick = if tick.abs() < 1e-12 { 0.0 } else { tick };
        format!("{tick:.precision$}")
    }

    /// Pixel rectangle bounded by the axes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if the margins leave no room for
    /// one pixel per bar or a readable axis.
    pub fn plot_area(&self) -> Result<Rect> {
        self.plot_area_for(self.values.len())
    }

    /// Plot area this chart's size, axis and title would leave for
    /// `bar_count` bars, without needing the values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] as [`Self::plot_area`] does.
    pub fn plot_area_for(&self, bar_count: usize) -> Result<Rect> {
        let text_scale = self.text_scale();
        let line = text_height(text_scale) as i32;
        let pad = 4 * text_scale as i32;
        let tick = TICK_LENGTH * text_scale as i32;

        let widest_tick = self
            .axis
            .ticks()
            .iter()
            .map(|&t| text_width(&self.tick_label(t), text_scale))
            .max()
            .unwrap_or(0) as i32;

        let left = pad + widest_tick + pad / 2 + tick;
        let top = if self.title.is_empty() { 2 * pad } else { 3 * pad + line };
        let bottom = tick + pad + line + pad;
        let right = 2 * pad;

        let plot_width = self.width as i32 - left - right;
        let plot_height = self.height as i32 - top - bottom;
        let fits_bars = usize::try_from(plot_width).is_ok_and(|w| w >= bar_count.max(1));
        if !fits_bars || plot_height < MIN_PLOT_HEIGHT {
            return Err(Error::InvalidDimensions { width: self.width, height: self.height });
        }

        Ok(Rect::new(left, top, plot_width as u32, plot_height as u32))
    }

    fn value_scale(&self, plot: Rect) -> Result<LinearScale> {
        self.axis.to_scale((f64::from(plot.bottom() - 1), f64::from(plot.y)))
    }

    /// Pixel rectangle of each bar, in bar order.
    ///
    /// Values outside the axis are clipped to it. Bars grow from zero (or the
    /// nearest axis bound when zero lies outside the axis).
    ///
    /// # Errors
    ///
    /// Propagates [`Self::plot_area`] failures.
    pub fn bar_rects(&self) -> Result<Vec<Rect>> {
        let plot = self.plot_area()?;
        let y_scale = self.value_scale(plot)?;

        let count = self.values.len().max(1) as u32;
        let slot = plot.width / count;
        let bar_width = ((f64::from(slot) * BAR_FILL).round() as u32).clamp(1, slot.max(1));
        let baseline = y_scale.scale(self.axis.clamp(0.0)).round() as i32;

        let rects = self
            .values
            .iter()
            .enumerate()
            .map(|(i, &value)| {
                let y = y_scale.scale(self.axis.clamp(value)).round() as i32;
                let (top, bottom) = if y <= baseline { (y, baseline) } else { (baseline, y) };
                let x = plot.x + (i as u32 * slot + (slot - bar_width) / 2) as i32;
                Rect::new(x, top, bar_width, (bottom - top) as u32)
            })
            .collect();
        Ok(rects)
    }

    /// Render to a new framebuffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions are invalid.
    pub fn to_framebuffer(&self) -> Result<Framebuffer> {
        let mut fb = Framebuffer::new(self.width, self.height)?;
        fb.clear(self.background);

        let plot = self.plot_area()?;
        let y_scale = self.value_scale(plot)?;
        let text_scale = self.text_scale();
        let line = text_height(text_scale) as i32;
        let pad = 4 * text_scale as i32;
        let tick = TICK_LENGTH * text_scale as i32;

        // Grid and tick labels
        for value in self.axis.ticks() {
            let y = y_scale.scale(value).round() as i32;
            draw_dashed_hline(&mut fb, plot.x, y, plot.width, 3 * text_scale, Rgba::GRID);
            draw_hline(&mut fb, plot.x - tick, y, tick as u32, Rgba::INK);
            draw_text_right(
                &mut fb,
                plot.x - tick - pad / 2,
                y - line / 2,
                &self.tick_label(value),
                text_scale,
                Rgba::INK,
            );
        }

        // Bars
        let count = self.values.len();
        let rects = self.bar_rects()?;
        for (i, (rect, &value)) in rects.iter().zip(&self.values).enumerate() {
            if !self.axis.contains(value) {
                warn!(bar = i + 1, value, "bar value outside axis range, clipped");
            }
            let color = self.palette.color(i, count);
            draw_rect(&mut fb, rect.x, rect.y, rect.width, rect.height, color);
            if rect.width >= 4 && rect.height >= 2 {
                draw_rect_outline(
                    &mut fb,
                    rect.x,
                    rect.y,
                    rect.width,
                    rect.height,
                    color.darken(0.3),
                    1,
                );
            }
        }

        // Axes
        draw_vline(&mut fb, plot.x, plot.y, plot.height, Rgba::INK);
        draw_hline(&mut fb, plot.x, plot.bottom() - 1, plot.width, Rgba::INK);

        // Bar labels, skipped when they would overlap
        let slot = plot.width / count.max(1) as u32;
        let label_y = plot.bottom() + tick;
        for (i, rect) in rects.iter().enumerate() {
            let label = match &self.labels {
                Some(labels) => labels.get(i).cloned().unwrap_or_default(),
                None => (i + 1).to_string(),
            };
            if text_width(&label, text_scale) < slot {
                let center = rect.x + rect.width as i32 / 2;
                draw_vline(&mut fb, center, plot.bottom(), tick as u32, Rgba::INK);
                draw_text_centered(
                    &mut fb,
                    center,
                    label_y + pad / 2,
                    &label,
                    text_scale,
                    Rgba::INK,
                );
            }
        }

        // Title
        if !self.title.is_empty() {
            let center = self.width as i32 / 2;
            draw_text_centered(&mut fb, center, pad, &self.title, text_scale, Rgba::INK);
        }

        Ok(fb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart(values: &[f64]) -> BarChart {
        BarChart::new().values(values).dimensions(320, 240).build().unwrap()
    }

    #[test]
    fn test_bar_chart_builder() {
        let chart = chart(&[0.1, 0.5, 0.9]);
        assert_eq!(chart.bar_count(), 3);
    }

    #[test]
    fn test_bar_chart_empty_data() {
        assert!(BarChart::new().build().is_err());
    }

    #[test]
    fn test_bar_chart_non_finite() {
        assert!(BarChart::new().values(&[0.5, f64::NAN]).build().is_err());
    }

    #[test]
    fn test_bar_chart_label_mismatch() {
        assert!(BarChart::new().values(&[0.5, 0.5]).labels(&["a"]).build().is_err());
        assert!(BarChart::new().values(&[0.5, 0.5]).labels(&["a", "b"]).build().is_ok());
    }

    #[test]
    fn test_bar_chart_too_small() {
        let result = BarChart::new().values(&[0.5]).dimensions(20, 20).build();
        assert!(matches!(result, Err(Error::InvalidDimensions { .. })));
    }

    #[test]
    fn test_bar_heights_follow_fixed_axis() {
        let rects = chart(&[0.25, 0.5, 1.0]).bar_rects().unwrap();
        let plot = chart(&[0.25]).plot_area().unwrap();

        let full = f64::from(plot.height - 1);
        assert!((f64::from(rects[2].height) - full).abs() <= 1.0);
        assert!((f64::from(rects[1].height) - full / 2.0).abs() <= 1.0);
        assert!((f64::from(rects[0].height) - full / 4.0).abs() <= 1.0);
    }

    #[test]
    fn test_same_value_same_height_across_frames() {
        let a = chart(&[0.5, 0.1, 0.2]).bar_rects().unwrap();
        let b = chart(&[0.5, 0.9, 1.0]).bar_rects().unwrap();
        assert_eq!(a[0], b[0]);
    }

    #[test]
    fn test_out_of_range_values_clipped() {
        let clipped = chart(&[1.7, -0.4]).bar_rects().unwrap();
        let bounds = chart(&[1.0, 0.0]).bar_rects().unwrap();
        assert_eq!(clipped, bounds);
        assert_eq!(clipped[1].height, 0);
    }

    #[test]
    fn test_bars_inside_plot_area() {
        let chart = chart(&[0.0, 0.3, 0.6, 1.0, 0.8]);
        let plot = chart.plot_area().unwrap();
        for rect in chart.bar_rects().unwrap() {
            assert!(rect.x >= plot.x && rect.x + rect.width as i32 <= plot.x + plot.width as i32);
            assert!(rect.y >= plot.y && rect.bottom() <= plot.bottom());
        }
    }

    #[test]
    fn test_render_draws_bar_colors() {
        let chart = chart(&[0.5, 0.5, 0.5]);
        let fb = chart.to_framebuffer().unwrap();
        let rects = chart.bar_rects().unwrap();
        let palette = Palette::default();

        for (i, rect) in rects.iter().enumerate() {
            let cx = (rect.x + rect.width as i32 / 2) as u32;
            let cy = (rect.y + rect.height as i32 / 2) as u32;
            assert_eq!(fb.get_pixel(cx, cy), Some(palette.color(i, 3)));
            // above the bar is background or grid, never bar color
            let above = fb.get_pixel(cx, (rect.y - 3) as u32).unwrap();
            assert_ne!(above, palette.color(i, 3));
        }
    }

    #[test]
    fn test_render_single_color() {
        let chart = BarChart::new()
            .values(&[0.4, 0.8])
            .color(Rgba::STEEL_BLUE)
            .dimensions(320, 240)
            .build()
            .unwrap();
        let fb = chart.to_framebuffer().unwrap();
        assert!(fb.count_color(Rgba::STEEL_BLUE) > 100);
    }

    #[test]
    fn test_render_deterministic() {
        let chart = chart(&[0.2, 0.7]).title("Frame 0:00.1");
        assert_eq!(chart.to_framebuffer().unwrap(), chart.to_framebuffer().unwrap());
    }

    #[test]
    fn test_title_is_drawn() {
        let plain = chart(&[0.2, 0.7]);
        let titled = plain.clone().title("Frame 0:00.1");
        let plot = titled.plot_area().unwrap();

        let fb = titled.to_framebuffer().unwrap();
        let ink_above_plot = (0..plot.y as u32)
            .flat_map(|y| (0..320).map(move |x| (x, y)))
            .filter(|&(x, y)| fb.get_pixel(x, y) == Some(Rgba::INK))
            .count();
        assert!(ink_above_plot > 0);
        assert!(plain.plot_area().unwrap().y < plot.y);
    }

    #[test]
    fn test_custom_axis() {
        let axis = AxisRange::new(0.0, 2.0, 0.5).unwrap();
        let chart = BarChart::new().values(&[1.0]).axis(axis).dimensions(320, 240).build().unwrap();
        let plot = chart.plot_area().unwrap();
        let rect = chart.bar_rects().unwrap()[0];
        let half = f64::from(plot.height - 1) / 2.0;
        assert!((f64::from(rect.height) - half).abs() <= 1.0);
    }

    #[test]
    fn test_tick_label_precision() {
        let chart = chart(&[0.5]);
        assert_eq!(chart.tick_label(0.6000000000000001), "0.6");
        assert_eq!(chart.tick_label(-0.0), "0.0");
    }
}
