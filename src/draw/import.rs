//! Conversion of externally decoded RGBA buffers into layer grids.
//!
//! Decoding image files is left to the caller; this module only accepts raw
//! 8-bit RGBA data in row-major order. Every imported pixel is snapped to a
//! coarse color lattice so that visually identical colors compare equal.

use super::color::Color;
use super::error::SpriteError;
use super::layer::PixelGrid;
use serde::{Deserialize, Serialize};

/// Channel step used when snapping imported colors.
pub const IMPORT_SNAP_STEP: u8 = 8;

/// A borrowed, validated RGBA image.
#[derive(Debug, Clone, Copy)]
pub struct RgbaImage<'a> {
    width: u32,
    height: u32,
    data: &'a [u8],
}

impl<'a> RgbaImage<'a> {
    /// Wraps a decoded buffer, checking that it holds exactly `width * height` pixels.
    pub fn new(width: u32, height: u32, data: &'a [u8]) -> Result<Self, SpriteError> {
        if width == 0 || height == 0 {
            return Err(SpriteError::EmptyImage { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(SpriteError::BufferSize {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn pixel(&self, x: u32, y: u32) -> Color {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Color::new(
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        )
    }

    /// Converts a sub-rectangle into a grid. Fully transparent pixels become empty.
    ///
    /// The caller guarantees the rectangle lies inside the image.
    fn region_to_grid(&self, x0: u32, y0: u32, width: u32, height: u32) -> PixelGrid {
        let mut grid = PixelGrid::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let color = self.pixel(x0 + x, y0 + y);
                if color.a > 0 {
                    grid.set(x as i32, y as i32, Some(color.snapped(IMPORT_SNAP_STEP)));
                }
            }
        }
        grid
    }

    /// Converts the whole image into a grid.
    pub fn to_grid(&self) -> PixelGrid {
        self.region_to_grid(0, 0, self.width, self.height)
    }

    /// Slices the image into `rows x cols` cells, row by row.
    pub fn slice(&self, layout: SheetLayout) -> Result<Vec<PixelGrid>, SpriteError> {
        let fits = layout.rows > 0
            && layout.cols > 0
            && layout.cell_width > 0
            && layout.cell_height > 0
            && layout.cols as u64 * layout.cell_width as u64 <= self.width as u64
            && layout.rows as u64 * layout.cell_height as u64 <= self.height as u64;
        if !fits {
            return Err(SpriteError::SheetOutOfBounds {
                rows: layout.rows,
                cols: layout.cols,
                cell_width: layout.cell_width,
                cell_height: layout.cell_height,
                width: self.width,
                height: self.height,
            });
        }

        let mut cells = Vec::with_capacity((layout.rows * layout.cols) as usize);
        for row in 0..layout.rows {
            for col in 0..layout.cols {
                cells.push(self.region_to_grid(
                    col * layout.cell_width,
                    row * layout.cell_height,
                    layout.cell_width,
                    layout.cell_height,
                ));
            }
        }
        Ok(cells)
    }
}

/// Grid layout of a sprite sheet image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetLayout {
    pub rows: u32,
    pub cols: u32,
    pub cell_width: u32,
    pub cell_height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgba(pixels: &[[u8; 4]]) -> Vec<u8> {
        pixels.iter().flatten().copied().collect()
    }

    #[test]
    fn rejects_mismatched_buffer() {
        let data = vec![0u8; 10];
        assert_eq!(
            RgbaImage::new(2, 2, &data).unwrap_err(),
            SpriteError::BufferSize {
                width: 2,
                height: 2,
                expected: 16,
                actual: 10
            }
        );
        assert!(matches!(
            RgbaImage::new(0, 3, &[]),
            Err(SpriteError::EmptyImage { .. })
        ));
    }

    #[test]
    fn transparent_pixels_import_as_empty() {
        let data = rgba(&[[255, 0, 0, 255], [9, 9, 9, 0]]);
        let grid = RgbaImage::new(2, 1, &data).unwrap().to_grid();
        assert_eq!(grid.get(0, 0), Some(Color::rgb(255, 0, 0)));
        assert_eq!(grid.get(1, 0), None);
    }

    #[test]
    fn imported_colors_are_snapped() {
        let data = rgba(&[[101, 3, 250, 255]]);
        let grid = RgbaImage::new(1, 1, &data).unwrap().to_grid();
        assert_eq!(grid.get(0, 0), Some(Color::rgb(104, 0, 248)));
    }

    #[test]
    fn slices_sheet_row_by_row() {
        // 4x1 image, two 2x1 cells: red/empty and empty/blue.
        let data = rgba(&[
            [255, 0, 0, 255],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 255, 255],
        ]);
        let image = RgbaImage::new(4, 1, &data).unwrap();
        let cells = image
            .slice(SheetLayout {
                rows: 1,
                cols: 2,
                cell_width: 2,
                cell_height: 1,
            })
            .unwrap();
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].get(0, 0), Some(Color::rgb(255, 0, 0)));
        assert_eq!(cells[1].get(1, 0), Some(Color::rgb(0, 0, 255)));
    }

    #[test]
    fn slice_rejects_layout_larger_than_image() {
        let data = vec![0u8; 16];
        let image = RgbaImage::new(2, 2, &data).unwrap();
        let err = image
            .slice(SheetLayout {
                rows: 1,
                cols: 3,
                cell_width: 1,
                cell_height: 1,
            })
            .unwrap_err();
        assert!(matches!(err, SpriteError::SheetOutOfBounds { .. }));
    }
}
