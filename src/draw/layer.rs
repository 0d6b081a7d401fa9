//! Pixel grids and the layers that own them.

use super::color::Color;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

/// One grid cell: a color, or `None` when empty.
pub type Cell = Option<Color>;

/// Row-major grid of cells with copy-on-write storage.
///
/// Cloning a grid is cheap: clones share storage until one of them is written
/// to, at which point the writer gets its own copy. Snapshots taken for undo
/// history therefore never observe later edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    cells: Arc<Vec<Cell>>,
}

impl PixelGrid {
    /// Creates an empty grid. Dimensions below 1 are raised to 1.
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            cells: Arc::new(vec![None; (width as usize) * (height as usize)]),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns true if `(x, y)` addresses a cell inside the grid.
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.in_bounds(x, y) {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Reads a cell. Out-of-bounds coordinates read as empty.
    pub fn get(&self, x: i32, y: i32) -> Cell {
        self.index(x, y).and_then(|i| self.cells[i])
    }

    /// Writes a cell, returning true if the grid changed.
    ///
    /// Out-of-bounds writes and writes of the value already present are no-ops
    /// and leave shared storage untouched.
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        let Some(i) = self.index(x, y) else {
            return false;
        };
        if self.cells[i] == cell {
            return false;
        }
        Arc::make_mut(&mut self.cells)[i] = cell;
        true
    }

    /// Writes `cell` to every listed coordinate, returning how many cells changed.
    pub fn apply(&mut self, points: &[(i32, i32)], cell: Cell) -> usize {
        points
            .iter()
            .filter(|&&(x, y)| self.set(x, y, cell))
            .count()
    }

    /// Iterates non-empty cells as `(x, y, color)`.
    pub fn iter_filled(&self) -> impl Iterator<Item = (i32, i32, Color)> + '_ {
        let width = self.width as usize;
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            cell.map(|color| ((i % width) as i32, (i / width) as i32, color))
        })
    }

    /// Returns true if no cell holds a color.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// Breadth-first 4-connected flood fill from `(x, y)`.
    ///
    /// The seed's current value is captured once as the target; every reachable
    /// cell equal to the target becomes `replacement`. Returns the number of
    /// cells written. An out-of-bounds seed is a no-op.
    pub fn flood_fill(&mut self, x: i32, y: i32, replacement: Cell) -> usize {
        let region = self.fill_region(x, y);
        self.apply(&region, replacement)
    }

    /// Collects the 4-connected region of cells equal to the seed's value.
    pub fn fill_region(&self, x: i32, y: i32) -> Vec<(i32, i32)> {
        if !self.in_bounds(x, y) {
            return Vec::new();
        }
        let target = self.get(x, y);

        let mut region = Vec::new();
        let mut visited: HashSet<(i32, i32)> = HashSet::new();
        let mut queue = VecDeque::new();
        queue.push_back((x, y));
        visited.insert((x, y));

        while let Some((cx, cy)) = queue.pop_front() {
            region.push((cx, cy));
            for (nx, ny) in [(cx + 1, cy), (cx - 1, cy), (cx, cy + 1), (cx, cy - 1)] {
                if self.in_bounds(nx, ny) && self.get(nx, ny) == target && visited.insert((nx, ny))
                {
                    queue.push_back((nx, ny));
                }
            }
        }

        region
    }

    /// Returns a grid of the new size with content aligned at the origin.
    ///
    /// Cells beyond the new bounds are dropped; new cells are empty.
    pub fn resized(&self, width: u32, height: u32) -> Self {
        let mut out = Self::new(width, height);
        {
            let cells = Arc::make_mut(&mut out.cells);
            for (x, y, color) in self.iter_filled() {
                if (x as u32) < out.width && (y as u32) < out.height {
                    cells[y as usize * out.width as usize + x as usize] = Some(color);
                }
            }
        }
        out
    }

    /// Returns a copy with every cell moved by `(dx, dy)`.
    ///
    /// Cells shifted out of bounds are discarded and vacated cells become empty.
    pub fn shifted(&self, dx: i32, dy: i32) -> Self {
        if dx == 0 && dy == 0 {
            return self.clone();
        }
        let mut out = Self::new(self.width, self.height);
        for (x, y, color) in self.iter_filled() {
            out.set(x + dx, y + dy, Some(color));
        }
        out
    }

    /// Returns a copy mirrored left to right.
    pub fn flipped_horizontal(&self) -> Self {
        let mut out = Self::new(self.width, self.height);
        let last = self.width as i32 - 1;
        for (x, y, color) in self.iter_filled() {
            out.set(last - x, y, Some(color));
        }
        out
    }

    /// Returns true if both grids share the same storage allocation.
    pub fn shares_storage_with(&self, other: &PixelGrid) -> bool {
        Arc::ptr_eq(&self.cells, &other.cells)
    }
}

/// An independently toggleable, opacity-weighted pixel grid within a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Identifier unique within the owning frame
    pub id: u32,
    /// Display name
    pub name: String,
    /// Hidden layers are skipped by the compositor and export
    pub visible: bool,
    /// Layer opacity (0.0-1.0)
    pub opacity: f64,
    /// Group membership, `None` when ungrouped
    pub group_id: Option<u32>,
    /// Cell data, always sized to the owning sprite
    pub pixels: PixelGrid,
}

impl Layer {
    /// Creates a visible, fully opaque, ungrouped empty layer.
    pub fn new(id: u32, name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id,
            name: name.into(),
            visible: true,
            opacity: 1.0,
            group_id: None,
            pixels: PixelGrid::new(width, height),
        }
    }

    /// Sets opacity, clamped to 0.0-1.0.
    pub fn set_opacity(&mut self, opacity: f64) {
        self.opacity = if opacity.is_nan() {
            1.0
        } else {
            opacity.clamp(0.0, 1.0)
        };
    }
}
