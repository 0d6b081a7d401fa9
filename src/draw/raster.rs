//! Grid rasterization: lines, rectangles, circles/ellipses.
//!
//! Every function here is pure and returns the cells a gesture covers. The
//! same output is written to a layer on commit and drawn to the surface as a
//! live preview, so both paths always agree. Cells may fall outside the grid;
//! callers clip on write.
//!
//! Flood fill lives on [`PixelGrid`](super::layer::PixelGrid) since it reads
//! the grid it fills.

use crate::util::{self, Rect};
use std::collections::HashSet;

/// A grid cell coordinate.
pub type Point = (i32, i32);

/// Modifiers for shape tools.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShapeOptions {
    /// Paint the interior of rectangles and ellipses
    pub filled: bool,
    /// Constrain lines to an axis and rectangles/ellipses to equal sides
    pub perfect_shapes: bool,
    /// Treat the start cell as the shape's center
    pub draw_from_center: bool,
}

/// Bresenham's integer line from `start` to `end`, both inclusive.
pub fn line(start: Point, end: Point) -> Vec<Point> {
    let (mut x, mut y) = start;
    let dx = (end.0 - x).abs();
    let dy = (end.1 - y).abs();
    let sx = if x < end.0 { 1 } else { -1 };
    let sy = if y < end.1 { 1 } else { -1 };
    let mut err = dx - dy;

    let mut points = Vec::with_capacity(dx.max(dy) as usize + 1);
    loop {
        points.push((x, y));
        if (x, y) == end {
            break;
        }
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }
    points
}

/// Snaps `end` so the line from `start` is horizontal or vertical.
///
/// Horizontal wins only when the horizontal delta is strictly greater.
pub fn constrain_line_end(start: Point, end: Point) -> Point {
    let dx = (end.0 - start.0).abs();
    let dy = (end.1 - start.1).abs();
    if dx > dy {
        (end.0, start.1)
    } else {
        (start.0, end.1)
    }
}

/// Cells of a line gesture, honoring `perfect_shapes`.
pub fn line_cells(start: Point, end: Point, options: ShapeOptions) -> Vec<Point> {
    let end = if options.perfect_shapes {
        constrain_line_end(start, end)
    } else {
        end
    };
    line(start, end)
}

/// Resolves the cell rectangle a rectangle gesture covers.
///
/// Without `draw_from_center`, `start` and `end` are opposite corners. With
/// it, `start` is the center and the drag delta extends to both sides.
/// `perfect_shapes` grows the shorter side to match the longer one, keeping
/// the anchor fixed and growing in the drag direction.
pub fn rect_bounds(start: Point, end: Point, options: ShapeOptions) -> Rect {
    let mut dx = end.0 - start.0;
    let mut dy = end.1 - start.1;

    if options.draw_from_center {
        if options.perfect_shapes {
            let m = dx.abs().max(dy.abs());
            dx = if dx < 0 { -m } else { m };
            dy = if dy < 0 { -m } else { m };
        }
        return Rect::from_corners((start.0 - dx, start.1 - dy), (start.0 + dx, start.1 + dy));
    }

    let mut rect = Rect::from_corners(start, end);
    if options.perfect_shapes {
        let size = rect.width.max(rect.height);
        rect.x = if dx < 0 { start.0 - size + 1 } else { start.0 };
        rect.y = if dy < 0 { start.1 - size + 1 } else { start.1 };
        rect.width = size;
        rect.height = size;
    }
    rect
}

/// Cells of a rectangle gesture: the border, or every cell when `filled`.
pub fn rect_cells(start: Point, end: Point, options: ShapeOptions) -> Vec<Point> {
    let rect = rect_bounds(start, end, options);
    let (x0, y0, x1, y1) = (rect.x, rect.y, rect.right(), rect.bottom());
    let mut points = Vec::new();

    if options.filled {
        for y in y0..=y1 {
            for x in x0..=x1 {
                points.push((x, y));
            }
        }
        return points;
    }

    for x in x0..=x1 {
        points.push((x, y0));
        if y1 != y0 {
            points.push((x, y1));
        }
    }
    for y in (y0 + 1)..y1 {
        points.push((x0, y));
        if x1 != x0 {
            points.push((x1, y));
        }
    }
    points
}

/// Resolves `(cx, cy, rx, ry)` for a circle gesture.
///
/// With `draw_from_center` the start cell is the center and the raw drag delta
/// gives the radii; otherwise the two cells bound the ellipse (see
/// [`util::ellipse_bounds`]). `perfect_shapes` makes both radii the larger one.
pub fn ellipse_params(start: Point, end: Point, options: ShapeOptions) -> (i32, i32, i32, i32) {
    let (cx, cy, mut rx, mut ry) = if options.draw_from_center {
        (
            start.0,
            start.1,
            (end.0 - start.0).abs(),
            (end.1 - start.1).abs(),
        )
    } else {
        util::ellipse_bounds(start.0, start.1, end.0, end.1)
    };
    if options.perfect_shapes {
        let r = rx.max(ry);
        rx = r;
        ry = r;
    }
    (cx, cy, rx, ry)
}

/// Midpoint circle outline, stretched to independent radii.
///
/// The octant is traced at the larger radius and each of the eight mirrored
/// points is scaled onto the ellipse, so equal radii give the exact midpoint
/// circle with full 8-way symmetry. A zero radius yields the center cell.
pub fn ellipse_outline(cx: i32, cy: i32, rx: i32, ry: i32) -> Vec<Point> {
    let rx = rx.abs();
    let ry = ry.abs();
    let r = rx.max(ry);

    let scale = |v: i32, radius: i32| -> i32 {
        if r == 0 {
            0
        } else {
            (v as f64 * radius as f64 / r as f64).round() as i32
        }
    };

    let mut seen = HashSet::new();
    let mut points = Vec::new();
    let mut plot = |x: i32, y: i32| {
        for (ox, oy) in [
            (x, y),
            (-x, y),
            (x, -y),
            (-x, -y),
            (y, x),
            (-y, x),
            (y, -x),
            (-y, -x),
        ] {
            let p = (cx + scale(ox, rx), cy + scale(oy, ry));
            if seen.insert(p) {
                points.push(p);
            }
        }
    };

    let mut x = 0;
    let mut y = r;
    let mut d = 1 - r;
    let mut d_e = 3;
    let mut d_se = -2 * r + 5;

    plot(x, y);
    while y > x {
        if d < 0 {
            d += d_e;
            d_e += 2;
            d_se += 2;
        } else {
            d += d_se;
            d_e += 2;
            d_se += 4;
            y -= 1;
        }
        x += 1;
        plot(x, y);
    }

    points
}

/// Every cell inside `(x/rx)^2 + (y/ry)^2 <= 1`.
///
/// A zero radius drops that axis from the distance test, so the fill
/// degenerates to a line (or the single center cell).
pub fn ellipse_fill(cx: i32, cy: i32, rx: i32, ry: i32) -> Vec<Point> {
    let rx = rx.abs();
    let ry = ry.abs();
    let norm = |v: i32, radius: i32| -> f64 {
        if radius == 0 {
            0.0
        } else {
            v as f64 / radius as f64
        }
    };

    let mut points = Vec::new();
    for y in -ry..=ry {
        for x in -rx..=rx {
            let nx = norm(x, rx);
            let ny = norm(y, ry);
            if nx * nx + ny * ny <= 1.0 {
                points.push((cx + x, cy + y));
            }
        }
    }
    points
}

/// Cells of a circle gesture.
pub fn ellipse_cells(start: Point, end: Point, options: ShapeOptions) -> Vec<Point> {
    let (cx, cy, rx, ry) = ellipse_params(start, end, options);
    if options.filled {
        ellipse_fill(cx, cy, rx, ry)
    } else {
        ellipse_outline(cx, cy, rx, ry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn perfect() -> ShapeOptions {
        ShapeOptions {
            perfect_shapes: true,
            ..ShapeOptions::default()
        }
    }

    #[test]
    fn bresenham_shallow_line() {
        assert_eq!(line((0, 0), (3, 1)), vec![(0, 0), (1, 0), (2, 1), (3, 1)]);
    }

    #[test]
    fn zero_length_line_is_single_cell() {
        assert_eq!(line((2, 2), (2, 2)), vec![(2, 2)]);
    }

    #[test]
    fn line_is_contiguous_in_every_direction() {
        for end in [(5, -3), (-4, 7), (-6, -6), (0, -5)] {
            let points = line((0, 0), end);
            assert_eq!(points.first(), Some(&(0, 0)));
            assert_eq!(points.last(), Some(&end));
            for pair in points.windows(2) {
                assert!((pair[0].0 - pair[1].0).abs() <= 1);
                assert!((pair[0].1 - pair[1].1).abs() <= 1);
            }
        }
    }

    #[test]
    fn perfect_line_snaps_to_dominant_axis() {
        assert_eq!(constrain_line_end((0, 0), (5, 2)), (5, 0));
        assert_eq!(constrain_line_end((0, 0), (2, 5)), (0, 5));
        // Ties go vertical.
        assert_eq!(constrain_line_end((0, 0), (3, -3)), (0, -3));
        assert_eq!(line_cells((0, 0), (3, 1), perfect()).len(), 4);
    }

    #[test]
    fn rect_outline_has_no_interior() {
        let cells: BTreeSet<Point> = rect_cells((0, 0), (3, 2), ShapeOptions::default())
            .into_iter()
            .collect();
        assert_eq!(cells.len(), 10);
        assert!(!cells.contains(&(1, 1)));
        assert!(cells.contains(&(3, 2)));
    }

    #[test]
    fn filled_rect_covers_area() {
        let options = ShapeOptions {
            filled: true,
            ..ShapeOptions::default()
        };
        assert_eq!(rect_cells((3, 2), (0, 0), options).len(), 12);
    }

    #[test]
    fn single_row_rect_has_no_duplicates() {
        let cells = rect_cells((0, 0), (4, 0), ShapeOptions::default());
        assert_eq!(cells.len(), 5);
    }

    #[test]
    fn perfect_rect_is_always_square() {
        let starts = [(0, 0), (5, 5), (2, 7)];
        let ends = [(9, 1), (1, 8), (-3, -1), (5, 6), (2, 0)];
        for &s in &starts {
            for &e in &ends {
                if s == e {
                    continue;
                }
                for center in [false, true] {
                    let options = ShapeOptions {
                        perfect_shapes: true,
                        draw_from_center: center,
                        filled: false,
                    };
                    let rect = rect_bounds(s, e, options);
                    assert_eq!(rect.width, rect.height, "{s:?} -> {e:?} center={center}");
                }
            }
        }
    }

    #[test]
    fn perfect_rect_grows_away_from_anchor() {
        let rect = rect_bounds((5, 5), (2, 4), perfect());
        assert_eq!(rect, Rect::new(2, 2, 4, 4).unwrap());
        assert_eq!((rect.right(), rect.bottom()), (5, 5));
    }

    #[test]
    fn centered_rect_spans_both_sides() {
        let options = ShapeOptions {
            draw_from_center: true,
            ..ShapeOptions::default()
        };
        let rect = rect_bounds((5, 5), (7, 6), options);
        assert_eq!(rect, Rect::new(3, 4, 5, 3).unwrap());
    }

    #[test]
    fn circle_outline_is_rotation_symmetric() {
        let cells: BTreeSet<Point> = ellipse_outline(0, 0, 5, 5).into_iter().collect();
        for &(x, y) in &cells {
            assert!(cells.contains(&(-y, x)), "missing rotation of ({x},{y})");
            assert!(cells.contains(&(x, -y)));
            assert!(cells.contains(&(y, x)));
        }
        assert!(cells.contains(&(0, 5)));
        assert!(cells.contains(&(5, 0)));
    }

    #[test]
    fn zero_radius_circle_is_center_cell() {
        assert_eq!(ellipse_outline(3, 4, 0, 0), vec![(3, 4)]);
        assert_eq!(ellipse_fill(3, 4, 0, 0), vec![(3, 4)]);
    }

    #[test]
    fn ellipse_outline_reaches_both_radii() {
        let cells: BTreeSet<Point> = ellipse_outline(0, 0, 6, 2).into_iter().collect();
        assert!(cells.contains(&(6, 0)));
        assert!(cells.contains(&(-6, 0)));
        assert!(cells.contains(&(0, 2)));
        assert!(cells.iter().all(|&(x, y)| x.abs() <= 6 && y.abs() <= 2));
    }

    #[test]
    fn filled_ellipse_with_zero_radius_axis_is_a_line() {
        let cells = ellipse_fill(0, 0, 0, 3);
        assert_eq!(cells.len(), 7);
        assert!(cells.iter().all(|&(x, _)| x == 0));
    }

    #[test]
    fn filled_circle_contains_outline_extremes() {
        let cells: BTreeSet<Point> = ellipse_fill(0, 0, 3, 3).into_iter().collect();
        assert!(cells.contains(&(3, 0)));
        assert!(cells.contains(&(0, -3)));
        assert!(!cells.contains(&(3, 3)));
    }

    #[test]
    fn corner_drag_ellipse_uses_floor_center() {
        let (cx, cy, rx, ry) = ellipse_params((0, 0), (5, 4), ShapeOptions::default());
        assert_eq!((cx, cy, rx, ry), (2, 2, 2, 2));

        let centered = ShapeOptions {
            draw_from_center: true,
            ..ShapeOptions::default()
        };
        assert_eq!(ellipse_params((4, 4), (7, 5), centered), (4, 4, 3, 1));
        assert_eq!(ellipse_params((4, 4), (7, 5), perfect()), (5, 4, 1, 1));
    }
}
