//! Frame container: an ordered stack of layers plus the active-layer index.

use super::color::Color;
use super::layer::{Cell, Layer, PixelGrid};
use std::collections::BTreeSet;

/// Direction for one-step layer or frame reordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Toward the end of the sequence (drawn above)
    Up,
    /// Toward the start of the sequence (drawn below)
    Down,
}

/// One step of an animation.
///
/// Layers are stored in paint order: later entries composite on top of earlier
/// ones. Every structural operation keeps `active_layer` pointing at a valid
/// layer and follows fixed rules so callers can predict the resulting index.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Identifier unique within the owning sprite
    pub id: u32,
    /// Display name
    pub name: String,
    /// Layers in paint order (first = bottom, last = top)
    pub layers: Vec<Layer>,
    /// Last minted layer id
    pub layer_id_counter: u32,
    /// Next group id to hand out
    pub next_group_id: u32,
    /// Index of the layer receiving edits
    pub active_layer: usize,
}

impl Frame {
    /// Creates a frame holding a single empty "Layer 1".
    pub fn new(id: u32, name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id,
            name: name.into(),
            layers: vec![Layer::new(1, "Layer 1", width, height)],
            layer_id_counter: 1,
            next_group_id: 1,
            active_layer: 0,
        }
    }

    /// Grid dimensions shared by every layer.
    pub fn dimensions(&self) -> (u32, u32) {
        self.layers
            .first()
            .map(|l| (l.pixels.width(), l.pixels.height()))
            .unwrap_or((1, 1))
    }

    pub fn active(&self) -> Option<&Layer> {
        self.layers.get(self.active_layer)
    }

    pub fn active_mut(&mut self) -> Option<&mut Layer> {
        self.layers.get_mut(self.active_layer)
    }

    /// Selects the active layer. Returns false if `index` is out of range.
    pub fn set_active_layer(&mut self, index: usize) -> bool {
        if index < self.layers.len() {
            self.active_layer = index;
            true
        } else {
            false
        }
    }

    /// Writes one cell of one layer. Returns true if the grid changed.
    pub fn paint_cell(&mut self, layer_index: usize, x: i32, y: i32, cell: Cell) -> bool {
        self.layers
            .get_mut(layer_index)
            .is_some_and(|layer| layer.pixels.set(x, y, cell))
    }

    fn mint_layer_id(&mut self) -> u32 {
        self.layer_id_counter += 1;
        self.layer_id_counter
    }

    /// Appends a new empty layer on top and makes it active.
    ///
    /// Returns the new layer's index.
    pub fn add_layer(&mut self) -> usize {
        let (width, height) = self.dimensions();
        let id = self.mint_layer_id();
        self.layers
            .push(Layer::new(id, format!("Layer {id}"), width, height));
        self.active_layer = self.layers.len() - 1;
        self.active_layer
    }

    /// Removes a layer. Refuses to remove the last remaining layer.
    ///
    /// If the active layer is removed, the layer now at the same index becomes
    /// active (clamped to the new end); if a layer below the active one is
    /// removed, the active index moves down by one.
    pub fn delete_layer(&mut self, index: usize) -> bool {
        if self.layers.len() <= 1 || index >= self.layers.len() {
            return false;
        }
        self.layers.remove(index);
        self.active_layer = index_after_removal(self.active_layer, index, self.layers.len());
        true
    }

    /// Inserts a copy of a layer directly above it and makes the copy active.
    ///
    /// The copy gets a freshly minted id and the name `"<name> (copy)"`.
    pub fn duplicate_layer(&mut self, index: usize) -> Option<usize> {
        let source = self.layers.get(index)?.clone();
        let id = self.mint_layer_id();
        let copy = Layer {
            id,
            name: format!("{} (copy)", source.name),
            ..source
        };
        self.layers.insert(index + 1, copy);
        self.active_layer = index + 1;
        Some(index + 1)
    }

    /// Moves the layer at `from` to position `to`.
    ///
    /// The active layer follows the move if it is the moved layer; otherwise its
    /// index shifts by one when the move crosses it.
    pub fn move_layer(&mut self, from: usize, to: usize) -> bool {
        let len = self.layers.len();
        if from == to || from >= len || to >= len {
            return false;
        }
        let layer = self.layers.remove(from);
        self.layers.insert(to, layer);
        self.active_layer = index_after_move(self.active_layer, from, to);
        true
    }

    /// Moves a layer one step up or down the stack.
    pub fn step_layer(&mut self, index: usize, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.move_layer(index, index + 1),
            Direction::Down => index > 0 && self.move_layer(index, index - 1),
        }
    }

    pub fn toggle_visibility(&mut self, index: usize) -> bool {
        match self.layers.get_mut(index) {
            Some(layer) => {
                layer.visible = !layer.visible;
                true
            }
            None => false,
        }
    }

    pub fn set_opacity(&mut self, index: usize, opacity: f64) -> bool {
        match self.layers.get_mut(index) {
            Some(layer) => {
                layer.set_opacity(opacity);
                true
            }
            None => false,
        }
    }

    pub fn rename_layer(&mut self, index: usize, name: impl Into<String>) -> bool {
        match self.layers.get_mut(index) {
            Some(layer) => {
                layer.name = name.into();
                true
            }
            None => false,
        }
    }

    /// Clears every cell of a layer.
    pub fn clear_layer(&mut self, index: usize) -> bool {
        let (width, height) = self.dimensions();
        match self.layers.get_mut(index) {
            Some(layer) if !layer.pixels.is_empty() => {
                layer.pixels = PixelGrid::new(width, height);
                true
            }
            _ => false,
        }
    }

    /// Shifts a layer's content by whole cells.
    pub fn shift_layer(&mut self, index: usize, dx: i32, dy: i32) -> bool {
        if dx == 0 && dy == 0 {
            return false;
        }
        match self.layers.get_mut(index) {
            Some(layer) => {
                layer.pixels = layer.pixels.shifted(dx, dy);
                true
            }
            None => false,
        }
    }

    /// Puts the given layers into a freshly minted group.
    ///
    /// Returns the new group id, or `None` if no index was valid.
    pub fn create_group(&mut self, indices: &[usize]) -> Option<u32> {
        let valid: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| i < self.layers.len())
            .collect();
        if valid.is_empty() {
            return None;
        }
        let group = self.next_group_id;
        self.next_group_id += 1;
        for i in valid {
            self.layers[i].group_id = Some(group);
        }
        Some(group)
    }

    pub fn add_to_group(&mut self, index: usize, group_id: u32) -> bool {
        match self.layers.get_mut(index) {
            Some(layer) => {
                layer.group_id = Some(group_id);
                true
            }
            None => false,
        }
    }

    pub fn remove_from_group(&mut self, index: usize) -> bool {
        match self.layers.get_mut(index) {
            Some(layer) if layer.group_id.is_some() => {
                layer.group_id = None;
                true
            }
            _ => false,
        }
    }

    /// Merges two or more layers into a new "Merged Layer" appended on top.
    ///
    /// Layers are composited in paint order, so where several merged layers hold
    /// a color the topmost one wins. The originals are removed and the merged
    /// layer becomes active. Fewer than two distinct valid indices is a no-op.
    pub fn merge_layers(&mut self, indices: &[usize]) -> bool {
        let unique: BTreeSet<usize> = indices.iter().copied().collect();
        if unique.len() < 2 || unique.iter().any(|&i| i >= self.layers.len()) {
            return false;
        }

        let (width, height) = self.dimensions();
        let id = self.mint_layer_id();
        let mut merged = Layer::new(id, "Merged Layer", width, height);
        for &i in &unique {
            for (x, y, color) in self.layers[i].pixels.iter_filled() {
                merged.pixels.set(x, y, Some(color));
            }
        }

        for &i in unique.iter().rev() {
            self.layers.remove(i);
        }
        self.layers.push(merged);
        self.active_layer = self.layers.len() - 1;
        true
    }

    /// Topmost visible color at `(x, y)`, if any.
    pub fn top_color_at(&self, x: i32, y: i32) -> Option<Color> {
        self.layers
            .iter()
            .rev()
            .filter(|l| l.visible)
            .find_map(|l| l.pixels.get(x, y))
    }

    /// Distinct colors across all layers.
    pub fn colors_in_use(&self) -> BTreeSet<Color> {
        self.layers
            .iter()
            .flat_map(|l| l.pixels.iter_filled().map(|(_, _, c)| c))
            .collect()
    }

    /// Reallocates every layer grid, keeping origin-aligned content.
    pub(crate) fn resize(&mut self, width: u32, height: u32) {
        for layer in &mut self.layers {
            layer.pixels = layer.pixels.resized(width, height);
        }
    }

    pub(crate) fn flip_horizontal(&mut self) {
        for layer in &mut self.layers {
            layer.pixels = layer.pixels.flipped_horizontal();
        }
    }
}

/// Active index after removing the element at `removed` (`len` is the new length).
pub(crate) fn index_after_removal(active: usize, removed: usize, len: usize) -> usize {
    if active > removed {
        active - 1
    } else if active == removed {
        removed.min(len.saturating_sub(1))
    } else {
        active
    }
}

/// Active index after moving the element at `from` to `to`.
pub(crate) fn index_after_move(active: usize, from: usize, to: usize) -> usize {
    if active == from {
        to
    } else if from < active && active <= to {
        active - 1
    } else if to <= active && active < from {
        active + 1
    } else {
        active
    }
}
