//! Flattening committed sprite state into bitmaps for export.
//!
//! Export ignores zoom, pan, grid and overlays: each visible layer is
//! composited top-wins at its opacity onto a transparent canvas, with every
//! cell scaled up to a `scale x scale` block.

use super::frame::Frame;
use super::sprite::Sprite;
use super::surface::{PixelSurface, Surface};
use crate::config::Config;
use crate::viewport::DeviceRect;
use log::debug;

/// Largest per-cell upscale factor.
pub const MAX_SCALE: u32 = 64;
/// Widest sheet, in frames.
pub const MAX_FRAMES_PER_ROW: u32 = 64;

/// Upscale and layout parameters for bitmap export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Device pixels per cell edge (1 - [`MAX_SCALE`])
    pub scale: u32,
    /// Sheet columns before wrapping (1 - [`MAX_FRAMES_PER_ROW`])
    pub frames_per_row: u32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            scale: 1,
            frames_per_row: 4,
        }
    }
}

impl ExportOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            scale: config.export.scale,
            frames_per_row: config.export.frames_per_row,
        }
    }
}

/// Sheet grid `(columns, rows)` for `frame_count` frames.
pub fn sheet_layout(frame_count: usize, frames_per_row: u32) -> (u32, u32) {
    if frame_count == 0 {
        return (0, 0);
    }
    let cols = (frames_per_row.clamp(1, MAX_FRAMES_PER_ROW) as usize).min(frame_count);
    let rows = frame_count.div_ceil(cols);
    (cols as u32, rows as u32)
}

/// Composites one frame into a new transparent bitmap.
pub fn flatten_frame(frame: &Frame, scale: u32) -> PixelSurface {
    let scale = scale.clamp(1, MAX_SCALE);
    let (w, h) = frame.dimensions();
    let mut out = PixelSurface::new(w.saturating_mul(scale), h.saturating_mul(scale));
    composite_into(&mut out, frame, scale, (0.0, 0.0));
    out
}

/// Lays every frame of a sprite out left-to-right, wrapping after
/// `frames_per_row` columns.
pub fn sprite_sheet(sprite: &Sprite, options: ExportOptions) -> PixelSurface {
    let scale = options.scale.clamp(1, MAX_SCALE);
    let (cols, rows) = sheet_layout(sprite.frames.len(), options.frames_per_row);
    let cell_w = sprite.width().saturating_mul(scale);
    let cell_h = sprite.height().saturating_mul(scale);
    let mut out = PixelSurface::new(cols.saturating_mul(cell_w), rows.saturating_mul(cell_h));

    for (i, frame) in sprite.frames.iter().enumerate() {
        let col = i as u32 % cols;
        let row = i as u32 / cols;
        let origin = (col as f64 * cell_w as f64, row as f64 * cell_h as f64);
        composite_into(&mut out, frame, scale, origin);
    }
    debug!(
        "Exported {} frames as {cols}x{rows} sheet at scale {scale}",
        sprite.frames.len()
    );
    out
}

fn composite_into<S: Surface + ?Sized>(
    surface: &mut S,
    frame: &Frame,
    scale: u32,
    (ox, oy): (f64, f64),
) {
    let size = scale as f64;
    for layer in frame.layers.iter().filter(|l| l.visible) {
        for (x, y, color) in layer.pixels.iter_filled() {
            let rect = DeviceRect {
                x: ox + x as f64 * size,
                y: oy + y as f64 * size,
                width: size,
                height: size,
            };
            surface.fill_rect(rect, color, layer.opacity);
        }
    }
}
