//! Drawing surfaces the compositor renders into.
//!
//! [`PixelSurface`] is an in-memory RGBA buffer used for headless rendering,
//! export, and tests. With the `cairo` feature, [`CairoSurface`] renders the
//! same calls through a Cairo image surface.

use super::color::Color;
use crate::viewport::DeviceRect;
use std::collections::HashSet;

/// Minimal drawing API needed by the compositor.
///
/// Coordinates are device pixels. `alpha` multiplies the color's own alpha.
pub trait Surface {
    /// Surface size in device pixels.
    fn size(&self) -> (u32, u32);

    /// Replaces every pixel with `color` (no blending).
    fn fill(&mut self, color: Color);

    /// Source-over fills an axis-aligned rectangle.
    fn fill_rect(&mut self, rect: DeviceRect, color: Color, alpha: f64);

    /// Source-over strokes a straight line of the given width.
    #[allow(clippy::too_many_arguments)]
    fn stroke_line(
        &mut self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        width: f64,
        color: Color,
        alpha: f64,
    );
}

/// Straight-alpha RGBA8 buffer in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelSurface {
    /// Creates a fully transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_rgba(self) -> Vec<u8> {
        self.data
    }

    /// Reads one pixel. Out-of-bounds reads return transparent black.
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        if x >= self.width || y >= self.height {
            return Color::new(0, 0, 0, 0);
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Color::new(
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        )
    }

    fn blend(&mut self, x: i64, y: i64, color: Color, alpha: f64) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let src_a = color.alpha() * alpha.clamp(0.0, 1.0);
        if src_a <= 0.0 {
            return;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let dst_a = self.data[i + 3] as f64 / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);

        let mix = |src: u8, dst: u8| -> u8 {
            let c = (src as f64 * src_a + dst as f64 * dst_a * (1.0 - src_a)) / out_a;
            c.round().clamp(0.0, 255.0) as u8
        };
        self.data[i] = mix(color.r, self.data[i]);
        self.data[i + 1] = mix(color.g, self.data[i + 1]);
        self.data[i + 2] = mix(color.b, self.data[i + 2]);
        self.data[i + 3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }

    /// Pixel index range whose centers fall in `[start, start + len)`, clipped.
    fn span(start: f64, len: f64, limit: u32) -> std::ops::Range<i64> {
        let first = (start - 0.5).ceil().max(0.0) as i64;
        let end = ((start + len - 0.5).ceil() as i64).min(limit as i64);
        first..end.max(first)
    }
}

impl Surface for PixelSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn fill(&mut self, color: Color) {
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&[color.r, color.g, color.b, color.a]);
        }
    }

    fn fill_rect(&mut self, rect: DeviceRect, color: Color, alpha: f64) {
        if !(rect.width > 0.0 && rect.height > 0.0) {
            return;
        }
        let xs = Self::span(rect.x, rect.width, self.width);
        for y in Self::span(rect.y, rect.height, self.height) {
            for x in xs.clone() {
                self.blend(x, y, color, alpha);
            }
        }
    }

    fn stroke_line(
        &mut self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        width: f64,
        color: Color,
        alpha: f64,
    ) {
        let half = width.max(1.0) / 2.0;
        let steps = (x2 - x1).abs().max((y2 - y1).abs()).ceil().max(1.0) as i64;

        // Collect first so overlapping samples blend each pixel once.
        let mut covered = HashSet::new();
        for k in 0..=steps {
            let t = k as f64 / steps as f64;
            let cx = x1 + (x2 - x1) * t;
            let cy = y1 + (y2 - y1) * t;
            for y in Self::span(cy - half, half * 2.0, self.height) {
                for x in Self::span(cx - half, half * 2.0, self.width) {
                    covered.insert((x, y));
                }
            }
        }
        let mut covered: Vec<(i64, i64)> = covered.into_iter().collect();
        covered.sort_unstable();
        for (x, y) in covered {
            self.blend(x, y, color, alpha);
        }
    }
}

#[cfg(feature = "cairo")]
pub use cairo_surface::CairoSurface;

#[cfg(feature = "cairo")]
mod cairo_surface {
    use super::{Color, DeviceRect, Surface};
    use std::path::Path;

    /// Cairo ARGB32 image surface with its drawing context.
    pub struct CairoSurface {
        surface: cairo::ImageSurface,
        ctx: cairo::Context,
    }

    impl CairoSurface {
        pub fn new(width: u32, height: u32) -> Result<Self, cairo::Error> {
            let surface =
                cairo::ImageSurface::create(cairo::Format::ARgb32, width as i32, height as i32)?;
            let ctx = cairo::Context::new(&surface)?;
            Ok(Self { surface, ctx })
        }

        /// Writes the surface to a PNG file.
        pub fn write_png(&self, path: &Path) -> anyhow::Result<()> {
            let mut file = std::fs::File::create(path)?;
            self.surface.write_to_png(&mut file)?;
            Ok(())
        }
    }

    impl Surface for CairoSurface {
        fn size(&self) -> (u32, u32) {
            (self.surface.width() as u32, self.surface.height() as u32)
        }

        fn fill(&mut self, color: Color) {
            let (r, g, b, a) = color.to_unit_rgba();
            self.ctx.set_operator(cairo::Operator::Source);
            self.ctx.set_source_rgba(r, g, b, a);
            let _ = self.ctx.paint(); // Ignore errors - a failed paint leaves the old content
            self.ctx.set_operator(cairo::Operator::Over);
        }

        fn fill_rect(&mut self, rect: DeviceRect, color: Color, alpha: f64) {
            let (r, g, b, a) = color.to_unit_rgba();
            self.ctx.set_source_rgba(r, g, b, a * alpha);
            self.ctx.rectangle(rect.x, rect.y, rect.width, rect.height);
            let _ = self.ctx.fill();
        }

        fn stroke_line(
            &mut self,
            x1: f64,
            y1: f64,
            x2: f64,
            y2: f64,
            width: f64,
            color: Color,
            alpha: f64,
        ) {
            let (r, g, b, a) = color.to_unit_rgba();
            self.ctx.set_source_rgba(r, g, b, a * alpha);
            self.ctx.set_line_width(width);
            self.ctx.move_to(x1, y1);
            self.ctx.line_to(x2, y2);
            let _ = self.ctx.stroke();
        }
    }
}
