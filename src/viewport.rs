//! Zoom and pan state mapping device pixels to grid cells.
//!
//! The sprite is fitted to the display at zoom 1 (`base_scale`), then scaled
//! by `zoom` and offset by `pan`. Device-to-grid mapping is the exact inverse
//! of the grid-to-device transform, so zooming about a cursor keeps the cell
//! under the cursor fixed.

use log::debug;

/// Default button zoom multiplier.
pub const ZOOM_STEP: f64 = 1.5;
/// Default wheel zoom speed (factor is `1 ± speed`).
pub const WHEEL_SPEED: f64 = 0.15;
pub const ZOOM_MIN: f64 = 0.1;
pub const ZOOM_MAX: f64 = 20.0;
/// Device-pixel edge of one cell at zoom 1 before fitting.
pub const CELL_SIZE: f64 = 32.0;

/// Device-space rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Zoom/pan state plus the geometry needed to map coordinates.
///
/// View-only: never persisted with the sprite.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    /// Zoom relative to the fitted scale
    pub zoom: f64,
    /// Offset of the sprite origin in device pixels
    pub pan: (f64, f64),
    zoom_min: f64,
    zoom_max: f64,
    zoom_step: f64,
    wheel_speed: f64,
    cell_size: f64,
    display: (f64, f64),
    grid: (u32, u32),
}

impl Viewport {
    /// Creates a viewport at zoom 1 with no pan.
    ///
    /// # Arguments
    /// * `grid_width` - Sprite width in cells
    /// * `grid_height` - Sprite height in cells
    /// * `display_width` - Surface width in device pixels
    /// * `display_height` - Surface height in device pixels
    pub fn new(grid_width: u32, grid_height: u32, display_width: u32, display_height: u32) -> Self {
        Self {
            zoom: 1.0,
            pan: (0.0, 0.0),
            zoom_min: ZOOM_MIN,
            zoom_max: ZOOM_MAX,
            zoom_step: ZOOM_STEP,
            wheel_speed: WHEEL_SPEED,
            cell_size: CELL_SIZE,
            display: (display_width as f64, display_height as f64),
            grid: (grid_width.max(1), grid_height.max(1)),
        }
    }

    /// Overrides the zoom limits and step sizes.
    pub fn with_limits(mut self, min: f64, max: f64, step: f64, wheel_speed: f64) -> Self {
        self.zoom_min = min;
        self.zoom_max = max.max(min);
        self.zoom_step = step;
        self.wheel_speed = wheel_speed;
        self.zoom = self.zoom.clamp(self.zoom_min, self.zoom_max);
        self
    }

    /// Overrides the per-cell device size at zoom 1.
    pub fn with_cell_size(mut self, cell_size: f64) -> Self {
        if cell_size > 0.0 {
            self.cell_size = cell_size;
        }
        self
    }

    /// Updates display dimensions after the surface is (re)configured.
    pub fn update_display_dimensions(&mut self, width: u32, height: u32) {
        self.display = (width as f64, height as f64);
    }

    /// Updates grid dimensions after a sprite resize.
    pub fn update_grid_dimensions(&mut self, width: u32, height: u32) {
        self.grid = (width.max(1), height.max(1));
    }

    pub fn display_dimensions(&self) -> (f64, f64) {
        self.display
    }

    pub fn grid_dimensions(&self) -> (u32, u32) {
        self.grid
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn zoom_limits(&self) -> (f64, f64) {
        (self.zoom_min, self.zoom_max)
    }

    /// Scale that fits the whole sprite on the display at zoom 1.
    pub fn base_scale(&self) -> f64 {
        let sprite_w = self.grid.0 as f64 * self.cell_size;
        let sprite_h = self.grid.1 as f64 * self.cell_size;
        (self.display.0 / sprite_w).min(self.display.1 / sprite_h)
    }

    pub fn effective_scale(&self) -> f64 {
        self.base_scale() * self.zoom
    }

    /// Device pixels per grid cell at the current zoom.
    pub fn cell_extent(&self) -> f64 {
        self.effective_scale() * self.cell_size
    }

    /// Device-space origin (top-left corner) of the sprite.
    pub fn origin(&self) -> (f64, f64) {
        self.origin_at(self.zoom, self.pan)
    }

    fn origin_at(&self, zoom: f64, pan: (f64, f64)) -> (f64, f64) {
        let extent = self.base_scale() * zoom * self.cell_size;
        (
            (self.display.0 - self.grid.0 as f64 * extent) / 2.0 + pan.0,
            (self.display.1 - self.grid.1 as f64 * extent) / 2.0 + pan.1,
        )
    }

    /// Device-space rectangle covered by the sprite.
    pub fn sprite_rect(&self) -> DeviceRect {
        let (x, y) = self.origin();
        let extent = self.cell_extent();
        DeviceRect {
            x,
            y,
            width: self.grid.0 as f64 * extent,
            height: self.grid.1 as f64 * extent,
        }
    }

    /// Device-space rectangle covered by one cell.
    pub fn cell_rect(&self, x: i32, y: i32) -> DeviceRect {
        let (ox, oy) = self.origin();
        let extent = self.cell_extent();
        DeviceRect {
            x: ox + x as f64 * extent,
            y: oy + y as f64 * extent,
            width: extent,
            height: extent,
        }
    }

    /// Fractional grid position under a device point, without clamping.
    ///
    /// Returns `None` when the display has no area.
    pub fn device_to_grid_f64(&self, px: f64, py: f64) -> Option<(f64, f64)> {
        let extent = self.cell_extent();
        if !(extent.is_finite() && extent > 0.0) {
            return None;
        }
        let (ox, oy) = self.origin();
        Some(((px - ox) / extent, (py - oy) / extent))
    }

    /// Grid cell under a device point, unclamped (may lie outside the sprite).
    pub fn device_to_cell_unclamped(&self, px: f64, py: f64) -> Option<(i32, i32)> {
        self.device_to_grid_f64(px, py)
            .map(|(gx, gy)| (gx.floor() as i32, gy.floor() as i32))
    }

    /// Grid cell under a device point, clamped into the sprite.
    pub fn device_to_grid(&self, px: f64, py: f64) -> (i32, i32) {
        let max_x = self.grid.0 as i32 - 1;
        let max_y = self.grid.1 as i32 - 1;
        match self.device_to_cell_unclamped(px, py) {
            Some((x, y)) => (x.clamp(0, max_x), y.clamp(0, max_y)),
            None => (0, 0),
        }
    }

    /// Device-space center of a grid cell.
    pub fn grid_to_device(&self, x: i32, y: i32) -> (f64, f64) {
        let rect = self.cell_rect(x, y);
        (rect.x + rect.width / 2.0, rect.y + rect.height / 2.0)
    }

    /// Sets zoom (clamped) about a device point, keeping the grid point under it fixed.
    ///
    /// Returns false without touching pan when the clamped zoom is unchanged.
    pub fn zoom_at(&mut self, new_zoom: f64, px: f64, py: f64) -> bool {
        let new_zoom = new_zoom.clamp(self.zoom_min, self.zoom_max);
        if new_zoom == self.zoom {
            return false;
        }

        match self.device_to_grid_f64(px, py) {
            Some((gx, gy)) => {
                let extent = self.base_scale() * new_zoom * self.cell_size;
                let unpanned = self.origin_at(new_zoom, (0.0, 0.0));
                self.pan = (
                    px - (unpanned.0 + gx * extent),
                    py - (unpanned.1 + gy * extent),
                );
            }
            None => self.pan = (0.0, 0.0),
        }
        self.zoom = new_zoom;
        debug!("Zoom {:.3} at ({px:.1}, {py:.1})", self.zoom);
        true
    }

    /// Multiplies zoom by the step, clamped.
    pub fn zoom_in(&mut self) -> bool {
        self.set_zoom(self.zoom * self.zoom_step)
    }

    /// Divides zoom by the step, clamped.
    pub fn zoom_out(&mut self) -> bool {
        self.set_zoom(self.zoom / self.zoom_step)
    }

    /// Zooms in by the step about a device point.
    pub fn zoom_in_at(&mut self, px: f64, py: f64) -> bool {
        self.zoom_at(self.zoom * self.zoom_step, px, py)
    }

    /// Zooms out by the step about a device point.
    pub fn zoom_out_at(&mut self, px: f64, py: f64) -> bool {
        self.zoom_at(self.zoom / self.zoom_step, px, py)
    }

    /// Wheel zoom about the cursor. Negative `delta_y` (scroll up) zooms in.
    pub fn wheel(&mut self, delta_y: f64, px: f64, py: f64) -> bool {
        if delta_y == 0.0 {
            return false;
        }
        let factor = if delta_y < 0.0 {
            1.0 + self.wheel_speed
        } else {
            1.0 - self.wheel_speed
        };
        self.zoom_at(self.zoom * factor, px, py)
    }

    fn set_zoom(&mut self, zoom: f64) -> bool {
        let zoom = zoom.clamp(self.zoom_min, self.zoom_max);
        if zoom == self.zoom {
            return false;
        }
        self.zoom = zoom;
        debug!("Zoom {:.3}", self.zoom);
        true
    }

    /// Resets zoom to 1 and pan to 0.
    pub fn reset(&mut self) {
        self.zoom = 1.0_f64.clamp(self.zoom_min, self.zoom_max);
        self.pan = (0.0, 0.0);
    }

    /// Fits the sprite to the display. Zoom 1 already fits, so this matches `reset`.
    pub fn fit(&mut self) {
        self.reset();
    }

    /// Shows the sprite at its unfitted size: `zoom = 1 / base_scale`, so the
    /// effective scale is 1 and a cell spans exactly `cell_size` device pixels.
    pub fn zoom_to_100(&mut self) -> bool {
        let base = self.base_scale();
        if !(base.is_finite() && base > 0.0) {
            return false;
        }
        self.zoom = (1.0 / base).clamp(self.zoom_min, self.zoom_max);
        self.pan = (0.0, 0.0);
        true
    }

    /// Adds a device-space delta to pan.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan.0 += dx;
        self.pan.1 += dy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        // 16x8 sprite on a 1024x768 display: base scale 1024/512 vs 768/256 -> 2.0
        Viewport::new(16, 8, 1024, 768)
    }

    #[test]
    fn base_scale_fits_smaller_ratio() {
        let vp = viewport();
        assert_eq!(vp.base_scale(), 2.0);
        assert_eq!(vp.cell_extent(), 64.0);
        assert_eq!(vp.origin(), (0.0, 128.0));
    }

    #[test]
    fn two_zoom_ins_reach_two_point_two_five() {
        let mut vp = viewport();
        assert!(vp.zoom_in());
        assert!(vp.zoom_in());
        assert_eq!(vp.zoom, 2.25);
    }

    #[test]
    fn zoom_is_clamped_and_noop_at_limits() {
        let mut vp = viewport();
        for _ in 0..20 {
            vp.zoom_in();
        }
        assert_eq!(vp.zoom, ZOOM_MAX);
        assert!(!vp.zoom_in());

        for _ in 0..40 {
            vp.zoom_out();
        }
        assert_eq!(vp.zoom, ZOOM_MIN);
        vp.pan = (10.0, -4.0);
        assert!(!vp.zoom_out_at(100.0, 100.0));
        assert_eq!(vp.pan, (10.0, -4.0));
    }

    #[test]
    fn device_to_grid_round_trips() {
        for &zoom in &[0.1, 0.5, 1.0, 2.25, 7.0, 20.0] {
            for &pan in &[(0.0, 0.0), (-123.5, 48.25), (900.0, -333.0)] {
                let mut vp = viewport();
                vp.zoom = zoom;
                vp.pan = pan;
                for y in 0..8 {
                    for x in 0..16 {
                        let (px, py) = vp.grid_to_device(x, y);
                        assert_eq!(vp.device_to_grid(px, py), (x, y), "zoom {zoom} pan {pan:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn device_to_grid_clamps_outside_points() {
        let vp = viewport();
        assert_eq!(vp.device_to_grid(-50.0, -50.0), (0, 0));
        assert_eq!(vp.device_to_grid(5000.0, 5000.0), (15, 7));
        assert_eq!(vp.device_to_cell_unclamped(-1.0, 127.0), Some((-1, -1)));
    }

    #[test]
    fn cursor_anchored_zoom_keeps_cell_under_cursor() {
        let mut vp = viewport();
        let (px, py) = (301.0, 333.0);
        let before = vp.device_to_grid_f64(px, py).unwrap();
        let cell = vp.device_to_grid(px, py);

        let steps: [fn(&mut Viewport, f64, f64) -> bool; 5] = [
            Viewport::zoom_in_at,
            Viewport::zoom_in_at,
            Viewport::zoom_out_at,
            Viewport::zoom_in_at,
            Viewport::zoom_out_at,
        ];
        for step in steps {
            step(&mut vp, px, py);
            assert_eq!(vp.device_to_grid(px, py), cell);
            let after = vp.device_to_grid_f64(px, py).unwrap();
            assert!((after.0 - before.0).abs() < 1e-9);
            assert!((after.1 - before.1).abs() < 1e-9);
        }
    }

    #[test]
    fn wheel_zoom_uses_speed_factor() {
        let mut vp = viewport();
        assert!(vp.wheel(-1.0, 512.0, 384.0));
        assert!((vp.zoom - 1.15).abs() < 1e-12);
        assert!(vp.wheel(1.0, 512.0, 384.0));
        assert!((vp.zoom - 1.15 * 0.85).abs() < 1e-12);
        assert!(!vp.wheel(0.0, 0.0, 0.0));
    }

    #[test]
    fn reset_and_fit_clear_pan() {
        let mut vp = viewport();
        vp.zoom_in_at(10.0, 10.0);
        vp.pan_by(5.0, 5.0);
        vp.fit();
        assert_eq!((vp.zoom, vp.pan), (1.0, (0.0, 0.0)));
    }

    #[test]
    fn zoom_to_100_cancels_fit_scale() {
        let mut vp = viewport();
        vp.pan = (3.0, 4.0);
        assert!(vp.zoom_to_100());
        assert_eq!(vp.zoom, 0.5);
        assert_eq!(vp.effective_scale(), 1.0);
        assert_eq!(vp.cell_extent(), CELL_SIZE);
        assert_eq!(vp.pan, (0.0, 0.0));
    }

    #[test]
    fn zero_display_never_divides_by_zero() {
        let mut vp = Viewport::new(4, 4, 0, 0);
        assert_eq!(vp.device_to_grid(10.0, 10.0), (0, 0));
        assert!(!vp.zoom_to_100());
        assert!(vp.zoom_in_at(1.0, 1.0));
        assert_eq!(vp.pan, (0.0, 0.0));
    }
}
