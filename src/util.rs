//! Geometry helpers shared by the rasterizer, compositor, and input handling.

// ============================================================================
// Geometry Utilities
// ============================================================================

/// Axis-aligned rectangle of grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Creates a new rectangle. Width/height must be positive.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Option<Self> {
        if width <= 0 || height <= 0 {
            None
        } else {
            Some(Self {
                x,
                y,
                width,
                height,
            })
        }
    }

    /// Builds the rectangle spanning two cells, both inclusive, in any order.
    pub fn from_corners(a: (i32, i32), b: (i32, i32)) -> Self {
        let x = a.0.min(b.0);
        let y = a.1.min(b.1);
        Self {
            x,
            y,
            width: (a.0 - b.0).abs() + 1,
            height: (a.1 - b.1).abs() + 1,
        }
    }

    /// Inclusive right edge.
    pub fn right(&self) -> i32 {
        self.x + self.width - 1
    }

    /// Inclusive bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y + self.height - 1
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    /// Returns true if rectangle has a positive area.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Calculates ellipse parameters from two corner cells.
///
/// The center is found by floor-halving the signed deltas, so an odd-sized box
/// puts the center on the cell nearer the start corner when dragging right or
/// down and nearer the far corner when dragging left or up. Pixel output
/// depends on this, so it is kept as is.
///
/// # Arguments
/// * `x1` - First corner X coordinate
/// * `y1` - First corner Y coordinate
/// * `x2` - Opposite corner X coordinate
/// * `y2` - Opposite corner Y coordinate
///
/// # Returns
/// Tuple `(cx, cy, rx, ry)` where:
/// - `cx`, `cy` = center cell
/// - `rx` = horizontal radius (half width, floored)
/// - `ry` = vertical radius (half height, floored)
pub fn ellipse_bounds(x1: i32, y1: i32, x2: i32, y2: i32) -> (i32, i32, i32, i32) {
    let dx = x2 - x1;
    let dy = y2 - y1;
    let cx = x1 + dx.div_euclid(2);
    let cy = y1 + dy.div_euclid(2);
    let rx = dx.abs() / 2;
    let ry = dy.abs() / 2;
    (cx, cy, rx, ry)
}
