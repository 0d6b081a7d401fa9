//! Sprite document: dimensions plus an ordered sequence of animation frames.

use super::color::Color;
use super::error::SpriteError;
use super::frame::{Direction, Frame, index_after_move, index_after_removal};
use super::import::{RgbaImage, SheetLayout};
use super::layer::{Cell, Layer};
use log::{debug, info};
use std::collections::BTreeSet;

/// A layered, animated pixel-art document.
///
/// Cloning a sprite is cheap because layer grids share storage until written,
/// which is what [`Sprite::snapshot`] relies on for undo history.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    width: u32,
    height: u32,
    /// Frames in playback order
    pub frames: Vec<Frame>,
    /// Index of the frame receiving edits
    pub active_frame: usize,
    frame_id_counter: u32,
}

impl Sprite {
    /// Creates a sprite with a single empty frame. Dimensions below 1 are raised to 1.
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            frames: vec![Frame::new(1, "Frame 1", width, height)],
            active_frame: 0,
            frame_id_counter: 1,
        }
    }

    /// Builds a single-frame sprite from a decoded RGBA buffer.
    pub fn from_rgba(width: u32, height: u32, data: &[u8]) -> Result<Self, SpriteError> {
        let image = RgbaImage::new(width, height, data)?;
        let mut sprite = Self::new(width, height);
        let frame = &mut sprite.frames[0];
        frame.name = "Imported Frame".to_string();
        frame.layers[0].pixels = image.to_grid();
        info!("Imported {width}x{height} image");
        Ok(sprite)
    }

    /// Builds a sprite with one frame per sprite-sheet cell.
    ///
    /// Cells are read left to right, top to bottom. The sprite takes the cell size.
    pub fn from_sheet(
        width: u32,
        height: u32,
        data: &[u8],
        layout: SheetLayout,
    ) -> Result<Self, SpriteError> {
        let image = RgbaImage::new(width, height, data)?;
        let grids = image.slice(layout)?;

        let mut sprite = Self::new(layout.cell_width, layout.cell_height);
        sprite.frames.clear();
        for (i, grid) in grids.into_iter().enumerate() {
            let id = i as u32 + 1;
            let mut frame = Frame::new(id, format!("Frame {id}"), grid.width(), grid.height());
            frame.layers[0].pixels = grid;
            sprite.frames.push(frame);
        }
        sprite.frame_id_counter = sprite.frames.len() as u32;
        info!(
            "Imported sprite sheet as {} frames of {}x{}",
            sprite.frames.len(),
            layout.cell_width,
            layout.cell_height
        );
        Ok(sprite)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn frame(&self) -> &Frame {
        &self.frames[self.active_frame]
    }

    pub fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frames[self.active_frame]
    }

    /// The frame before the active one, used for onion skinning.
    pub fn previous_frame(&self) -> Option<&Frame> {
        self.active_frame
            .checked_sub(1)
            .and_then(|i| self.frames.get(i))
    }

    pub fn active_layer(&self) -> Option<&Layer> {
        self.frame().active()
    }

    /// Writes one cell of a layer in the active frame.
    pub fn paint_cell(&mut self, layer_index: usize, x: i32, y: i32, cell: Cell) -> bool {
        self.frame_mut().paint_cell(layer_index, x, y, cell)
    }

    /// Flood fills from `(x, y)` on a layer of the active frame.
    ///
    /// Returns the number of cells written.
    pub fn flood_fill(&mut self, layer_index: usize, x: i32, y: i32, cell: Cell) -> usize {
        match self.frame_mut().layers.get_mut(layer_index) {
            Some(layer) => layer.pixels.flood_fill(x, y, cell),
            None => 0,
        }
    }

    /// Writes `cell` to every listed coordinate of a layer in the active frame.
    pub fn apply_points(&mut self, layer_index: usize, points: &[(i32, i32)], cell: Cell) -> usize {
        match self.frame_mut().layers.get_mut(layer_index) {
            Some(layer) => layer.pixels.apply(points, cell),
            None => 0,
        }
    }

    /// Reallocates every grid of every frame, keeping origin-aligned content.
    pub fn resize(&mut self, width: u32, height: u32) {
        let width = width.max(1);
        let height = height.max(1);
        if (width, height) == (self.width, self.height) {
            return;
        }
        for frame in &mut self.frames {
            frame.resize(width, height);
        }
        info!(
            "Resized sprite from {}x{} to {width}x{height}",
            self.width, self.height
        );
        self.width = width;
        self.height = height;
    }

    fn mint_frame_id(&mut self) -> u32 {
        self.frame_id_counter += 1;
        self.frame_id_counter
    }

    pub fn set_active_frame(&mut self, index: usize) -> bool {
        if index < self.frames.len() {
            self.active_frame = index;
            true
        } else {
            false
        }
    }

    /// Appends an empty frame and makes it active. Returns its index.
    pub fn add_frame(&mut self) -> usize {
        let id = self.mint_frame_id();
        self.frames.push(Frame::new(
            id,
            format!("Frame {}", self.frames.len() + 1),
            self.width,
            self.height,
        ));
        self.active_frame = self.frames.len() - 1;
        info!("Added frame {} (id {id})", self.active_frame);
        self.active_frame
    }

    /// Removes a frame. Refuses to remove the last remaining frame.
    ///
    /// Uses the same active-index rule as [`Frame::delete_layer`].
    pub fn delete_frame(&mut self, index: usize) -> bool {
        if self.frames.len() <= 1 || index >= self.frames.len() {
            debug!("Refusing to delete frame {index} of {}", self.frames.len());
            return false;
        }
        self.frames.remove(index);
        self.active_frame = index_after_removal(self.active_frame, index, self.frames.len());
        info!("Deleted frame {index}");
        true
    }

    /// Inserts a copy of a frame directly after it and makes the copy active.
    pub fn duplicate_frame(&mut self, index: usize) -> Option<usize> {
        let source = self.frames.get(index)?.clone();
        let id = self.mint_frame_id();
        let copy = Frame {
            id,
            name: format!("{} (copy)", source.name),
            ..source
        };
        self.frames.insert(index + 1, copy);
        self.active_frame = index + 1;
        Some(index + 1)
    }

    /// Moves the frame at `from` to position `to`, with the layer reorder index rules.
    pub fn move_frame(&mut self, from: usize, to: usize) -> bool {
        let len = self.frames.len();
        if from == to || from >= len || to >= len {
            return false;
        }
        let frame = self.frames.remove(from);
        self.frames.insert(to, frame);
        self.active_frame = index_after_move(self.active_frame, from, to);
        true
    }

    pub fn step_frame(&mut self, index: usize, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.move_frame(index, index + 1),
            Direction::Down => index > 0 && self.move_frame(index, index - 1),
        }
    }

    /// Returns a mirrored copy of the whole sprite.
    pub fn flipped_horizontal(&self) -> Self {
        let mut out = self.clone();
        for frame in &mut out.frames {
            frame.flip_horizontal();
        }
        out
    }

    /// Distinct colors across every layer of every frame.
    pub fn colors_in_use(&self) -> BTreeSet<Color> {
        self.frames
            .iter()
            .flat_map(|f| f.colors_in_use())
            .collect()
    }

    /// Captures the current document state for undo history.
    pub fn snapshot(&self) -> Sprite {
        self.clone()
    }

    /// Replaces the current document state with a previously captured snapshot.
    pub fn restore(&mut self, snapshot: Sprite) {
        *self = snapshot;
        self.active_frame = self.active_frame.min(self.frames.len().saturating_sub(1));
    }

    /// Model-assisted repair of a mirrored sprite.
    ///
    /// No model ships with this crate, so this always reports that it is
    /// unavailable instead of returning the input unchanged.
    pub fn fix_flip(&self) -> Result<Sprite, SpriteError> {
        Err(SpriteError::NotImplemented("flip fix model"))
    }
}

impl Default for Sprite {
    fn default() -> Self {
        Self::new(32, 32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::{BLUE, RED};

    #[test]
    fn resize_reallocates_every_layer() {
        let mut sprite = Sprite::new(4, 4);
        sprite.frame_mut().add_layer();
        sprite.add_frame();
        sprite.paint_cell(0, 3, 3, Some(RED));

        sprite.resize(2, 6);
        for frame in &sprite.frames {
            for layer in &frame.layers {
                assert_eq!((layer.pixels.width(), layer.pixels.height()), (2, 6));
            }
        }
        assert!(sprite.colors_in_use().is_empty());
    }

    #[test]
    fn delete_frame_refuses_last() {
        let mut sprite = Sprite::new(2, 2);
        assert!(!sprite.delete_frame(0));
        assert_eq!(sprite.frames.len(), 1);
    }

    #[test]
    fn delete_active_frame_keeps_index() {
        let mut sprite = Sprite::new(2, 2);
        sprite.add_frame();
        sprite.add_frame();
        sprite.set_active_frame(1);
        let third = sprite.frames[2].id;

        assert!(sprite.delete_frame(1));
        assert_eq!(sprite.active_frame, 1);
        assert_eq!(sprite.frame().id, third);
    }

    #[test]
    fn frame_reorder_matches_layer_rules() {
        let mut sprite = Sprite::new(2, 2);
        sprite.add_frame();
        sprite.add_frame();
        sprite.set_active_frame(0);
        let ids: Vec<u32> = sprite.frames.iter().map(|f| f.id).collect();

        assert!(sprite.move_frame(0, 2));
        let reordered: Vec<u32> = sprite.frames.iter().map(|f| f.id).collect();
        assert_eq!(reordered, vec![ids[1], ids[2], ids[0]]);
        assert_eq!(sprite.active_frame, 2);
    }

    #[test]
    fn duplicate_frame_copies_pixels() {
        let mut sprite = Sprite::new(3, 3);
        sprite.paint_cell(0, 1, 1, Some(BLUE));
        assert_eq!(sprite.duplicate_frame(0), Some(1));
        assert_eq!(sprite.frames[1].name, "Frame 1 (copy)");
        assert_ne!(sprite.frames[1].id, sprite.frames[0].id);
        assert_eq!(sprite.frame().layers[0].pixels.get(1, 1), Some(BLUE));
    }

    #[test]
    fn snapshot_is_unaffected_by_later_edits() {
        let mut sprite = Sprite::new(3, 3);
        sprite.paint_cell(0, 0, 0, Some(RED));
        let snapshot = sprite.snapshot();

        sprite.paint_cell(0, 1, 1, Some(BLUE));
        sprite.add_frame();
        assert_eq!(snapshot.frames.len(), 1);
        assert_eq!(snapshot.frames[0].layers[0].pixels.get(1, 1), None);

        sprite.restore(snapshot.clone());
        assert_eq!(sprite, snapshot);
    }

    #[test]
    fn previous_frame_exists_only_after_first() {
        let mut sprite = Sprite::new(2, 2);
        assert!(sprite.previous_frame().is_none());
        sprite.add_frame();
        assert_eq!(sprite.previous_frame().map(|f| f.id), Some(1));
    }

    #[test]
    fn flip_mirrors_all_frames() {
        let mut sprite = Sprite::new(3, 1);
        sprite.paint_cell(0, 0, 0, Some(RED));
        sprite.add_frame();
        sprite.paint_cell(0, 1, 0, Some(BLUE));

        let flipped = sprite.flipped_horizontal();
        assert_eq!(flipped.frames[0].layers[0].pixels.get(2, 0), Some(RED));
        assert_eq!(flipped.frames[1].layers[0].pixels.get(1, 0), Some(BLUE));
        assert_eq!(sprite.frames[0].layers[0].pixels.get(0, 0), Some(RED));
    }

    #[test]
    fn flip_fix_reports_not_implemented() {
        let sprite = Sprite::new(2, 2);
        assert_eq!(
            sprite.fix_flip().unwrap_err(),
            SpriteError::NotImplemented("flip fix model")
        );
    }

    #[test]
    fn sheet_import_creates_frame_per_cell() {
        let mut data = vec![0u8; 4 * 2 * 4];
        data[0..4].copy_from_slice(&[255, 0, 0, 255]);
        let sprite = Sprite::from_sheet(
            4,
            2,
            &data,
            SheetLayout {
                rows: 2,
                cols: 2,
                cell_width: 2,
                cell_height: 1,
            },
        )
        .unwrap();
        assert_eq!(sprite.frames.len(), 4);
        assert_eq!((sprite.width(), sprite.height()), (2, 1));
        assert_eq!(sprite.frames[3].name, "Frame 4");
        assert_eq!(sprite.frames[0].layers[0].pixels.get(0, 0), Some(RED));

        let mut sprite = sprite;
        assert_eq!(sprite.add_frame(), 4);
        assert_eq!(sprite.frame().id, 5);
    }

    #[test]
    fn import_surfaces_decode_failure() {
        assert!(matches!(
            Sprite::from_rgba(2, 2, &[0u8; 3]),
            Err(SpriteError::BufferSize { .. })
        ));
    }
}
