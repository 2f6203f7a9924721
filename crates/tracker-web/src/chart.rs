//! PNG rendering of a [`ChartSeries`].
//!
//! Each render draws onto its own [`Canvas`], which is consumed by the PNG
//! encoder or dropped on the error path; nothing outlives a single call. The
//! image carries bars, grid lines, axes and legend swatches only. Title,
//! legend text and tick labels are printed by the page around it.

use std::io::Cursor;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use image::{ImageFormat, Rgb, RgbImage};
use serde::Deserialize;
use thiserror::Error;
use tracker_core::chart::ChartSeries;

/// Number of intervals between horizontal grid lines.
pub const TICK_INTERVALS: usize = 5;

const MIN_WIDTH: u32 = 200;
const MIN_HEIGHT: u32 = 150;
pub const MAX_WIDTH: u32 = 4000;
pub const MAX_HEIGHT: u32 = 4000;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const GRID: Rgb<u8> = Rgb([220, 220, 220]);

/// Headroom above the tallest bar.
const SCALE_HEADROOM: f64 = 1.05;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Canvas size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
  pub width:  u32,
  pub height: u32,
}

impl Default for ChartConfig {
  fn default() -> Self { Self { width: 1000, height: 600 } }
}

impl ChartConfig {
  /// Reject sizes outside `200x150..=4000x4000`.
  pub fn check(&self) -> Result<(), ChartError> {
    let Self { width, height } = *self;
    if width < MIN_WIDTH || height < MIN_HEIGHT {
      return Err(ChartError::CanvasTooSmall { width, height });
    }
    if width > MAX_WIDTH || height > MAX_HEIGHT {
      return Err(ChartError::CanvasTooLarge { width, height });
    }
    Ok(())
  }
}

#[derive(Debug, Error)]
pub enum ChartError {
  #[error("chart canvas {width}x{height} is below the 200x150 minimum")]
  CanvasTooSmall { width: u32, height: u32 },

  #[error("chart canvas {width}x{height} exceeds the 4000x4000 maximum")]
  CanvasTooLarge { width: u32, height: u32 },

  #[error("png encoding failed: {0}")]
  Encode(#[from] image::ImageError),
}

// ─── Canvas ───────────────────────────────────────────────────────────────────

/// A white RGB surface owned by a single render.
struct Canvas {
  image: RgbImage,
}

impl Canvas {
  fn new(width: u32, height: u32) -> Self {
    Self { image: RgbImage::from_pixel(width, height, WHITE) }
  }

  /// Fill the half-open rectangle `[x0, x1) × [y0, y1)`, clipped to the
  /// canvas.
  fn fill_rect(&mut self, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgb<u8>) {
    let x1 = x1.min(self.image.width());
    let y1 = y1.min(self.image.height());
    for y in y0..y1 {
      for x in x0..x1 {
        self.image.put_pixel(x, y, color);
      }
    }
  }

  fn hline(&mut self, x0: u32, x1: u32, y: u32, color: Rgb<u8>) {
    self.fill_rect(x0, y, x1, y + 1, color);
  }

  fn vline(&mut self, x: u32, y0: u32, y1: u32, color: Rgb<u8>) {
    self.fill_rect(x, y0, x + 1, y1, color);
  }

  fn encode_png(self) -> Result<Vec<u8>, ChartError> {
    let mut bytes = Vec::new();
    self.image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
  }
}

// ─── Layout ───────────────────────────────────────────────────────────────────

/// Pixel bounds of the plot area; the legend column sits to its right.
struct Layout {
  left:   u32,
  right:  u32,
  top:    u32,
  bottom: u32,
}

impl Layout {
  fn new(width: u32, height: u32) -> Self {
    Self {
      left:   width / 12,
      right:  width - width / 5,
      top:    height / 15,
      bottom: height - height / 10,
    }
  }

  /// Row for `value` on a linear scale from 0 (at `bottom`) to `scale_max`.
  fn y_for(&self, value: f64, scale_max: f64) -> u32 {
    if scale_max <= 0.0 {
      return self.bottom;
    }
    let frac = (value / scale_max).clamp(0.0, 1.0);
    let plot_height = f64::from(self.bottom - self.top);
    self.bottom - (frac * plot_height).round() as u32
  }

  /// Horizontal extent of bar `index` out of `count` equal slots.
  fn bar_span(&self, index: usize, count: usize) -> (u32, u32) {
    let slot = (self.right - self.left) / count.max(1) as u32;
    let x0 = self.left + slot * index as u32 + slot / 5;
    (x0, x0 + slot * 3 / 5)
  }

  fn swatch(&self, index: usize) -> (u32, u32, u32, u32) {
    let x0 = self.right + 20;
    let y0 = self.top + 30 * index as u32;
    (x0, y0, x0 + 16, y0 + 16)
  }
}

// ─── Rendering ────────────────────────────────────────────────────────────────

/// Draw `series` as a bar chart and encode it as PNG.
pub fn render_png(series: &ChartSeries, config: &ChartConfig) -> Result<Vec<u8>, ChartError> {
  config.check()?;
  let ChartConfig { width, height } = *config;

  let mut canvas = Canvas::new(width, height);
  let layout = Layout::new(width, height);
  let scale_max = series.max_value() * SCALE_HEADROOM;

  for tick in series.axis_ticks(TICK_INTERVALS) {
    let y = layout.y_for(tick.value, scale_max);
    canvas.hline(layout.left, layout.right, y, GRID);
  }

  let count = series.entries.len();
  for (index, entry) in series.entries.iter().enumerate() {
    let (x0, x1) = layout.bar_span(index, count);
    let y0 = layout.y_for(entry.value, scale_max);
    canvas.fill_rect(x0, y0, x1, layout.bottom, Rgb(entry.color.rgb()));

    let (sx0, sy0, sx1, sy1) = layout.swatch(index);
    canvas.fill_rect(sx0, sy0, sx1, sy1, Rgb(entry.color.rgb()));
  }

  canvas.vline(layout.left, layout.top, layout.bottom + 1, BLACK);
  canvas.hline(layout.left, layout.right, layout.bottom, BLACK);

  canvas.encode_png()
}

/// [`render_png`], base64-encoded for a `data:image/png;base64,` URL.
pub fn render_base64(series: &ChartSeries, config: &ChartConfig) -> Result<String, ChartError> {
  Ok(B64.encode(render_png(series, config)?))
}

/// Render the chart for a page. Failures are logged and yield `None`, so the
/// page can still be served without a chart.
pub fn chart_image(series: &ChartSeries, config: &ChartConfig) -> Option<String> {
  match render_base64(series, config) {
    Ok(encoded) => Some(encoded),
    Err(e) => {
      tracing::warn!(error = %e, title = %series.title, "error generating chart");
      None
    }
  }
}
