//! Input handling and tool state machine.
//!
//! This module translates front-end keyboard and mouse events into sprite edits
//! and viewport changes. It maintains the current tool, colors and shape
//! options, and manages the state machine for in-progress gestures (painting,
//! shape previews, panning, layer moves and guide drags).

pub mod events;
pub mod modifiers;
pub mod state;
pub mod tool;

// Re-export commonly used types at module level
pub use events::{Key, MouseButton};
pub use modifiers::Modifiers;
pub use state::{DrawingState, InputState};
pub use tool::Tool;
