//! Editing tool selection.

use serde::{Deserialize, Serialize};

/// Editing tool selection.
///
/// The active tool determines what a pointer press does to the sprite.
/// Tools are selected with keybindings or by the hosting front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tool {
    /// Paints cells, interpolating between drag samples (default)
    #[default]
    Pencil,
    /// Clears cells, interpolating like the pencil
    Eraser,
    /// Flood fills the 4-connected region under the pointer
    Fill,
    /// Picks the topmost color under the pointer
    Eyedropper,
    /// Drags the view
    Pan,
    /// Straight line from press to release
    Line,
    /// Rectangle outline or fill
    Rectangle,
    /// Circle/ellipse outline or fill
    Circle,
    /// Shifts the active layer's content by whole cells
    MoveLayer,
}

impl Tool {
    /// Tools that preview a shape and commit it on release.
    pub fn is_shape(&self) -> bool {
        matches!(self, Tool::Line | Tool::Rectangle | Tool::Circle)
    }
}
