//! Shape gestures resolved to grid cells.

use super::color::Color;
use super::raster::{self, Point, ShapeOptions};
use crate::util::Rect;

/// A line, rectangle, or ellipse spanning two grid cells.
///
/// The same value is drawn as a live preview while the pointer is down and
/// written to the active layer when it is released.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Shape {
    /// Straight line between two cells
    Line {
        /// Anchor cell (where the pointer was pressed)
        start: Point,
        /// Current or final pointer cell
        end: Point,
        /// Paint color
        color: Color,
        /// Perfect-shape constraint
        options: ShapeOptions,
    },
    /// Rectangle outline or filled rectangle
    Rect {
        /// Anchor cell (corner, or center with `draw_from_center`)
        start: Point,
        /// Current or final pointer cell
        end: Point,
        /// Paint color
        color: Color,
        /// Fill and constraint options
        options: ShapeOptions,
    },
    /// Circle or ellipse, outline or filled
    Ellipse {
        /// Anchor cell (bounding-box corner, or center with `draw_from_center`)
        start: Point,
        /// Current or final pointer cell
        end: Point,
        /// Paint color
        color: Color,
        /// Fill and constraint options
        options: ShapeOptions,
    },
}

impl Shape {
    pub fn color(&self) -> Color {
        match self {
            Shape::Line { color, .. } | Shape::Rect { color, .. } | Shape::Ellipse { color, .. } => {
                *color
            }
        }
    }

    /// Cells covered by the shape, possibly outside the grid.
    pub fn cells(&self) -> Vec<Point> {
        match *self {
            Shape::Line {
                start, end, options, ..
            } => raster::line_cells(start, end, options),
            Shape::Rect {
                start, end, options, ..
            } => raster::rect_cells(start, end, options),
            Shape::Ellipse {
                start, end, options, ..
            } => raster::ellipse_cells(start, end, options),
        }
    }

    /// Returns the same shape with a new end cell.
    pub fn with_end(&self, new_end: Point) -> Shape {
        let mut shape = self.clone();
        match &mut shape {
            Shape::Line { end, .. } | Shape::Rect { end, .. } | Shape::Ellipse { end, .. } => {
                *end = new_end;
            }
        }
        shape
    }

    /// Smallest cell rectangle containing every covered cell.
    pub fn bounding_box(&self) -> Option<Rect> {
        let cells = self.cells();
        let first = *cells.first()?;
        let (min, max) = cells.iter().fold((first, first), |(min, max), &(x, y)| {
            ((min.0.min(x), min.1.min(y)), (max.0.max(x), max.1.max(y)))
        });
        Some(Rect::from_corners(min, max))
    }
}
