//! Keybinding configuration types and parsing.
//!
//! This module defines the configurable keybinding system that allows users
//! to customize keyboard shortcuts for every editor action.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// All possible actions that can be bound to keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    // Gesture cancellation
    Cancel,

    // Tool selection
    SelectPencil,
    SelectEraser,
    SelectFill,
    SelectEyedropper,
    SelectLine,
    SelectRectangle,
    SelectCircle,
    SelectPan,
    SelectMoveLayer,

    // Viewport
    ZoomIn,
    ZoomOut,
    ZoomReset,
    ZoomFit,
    Zoom100,

    // Display toggles
    ToggleGrid,
    ToggleOnionSkin,

    // Shape options
    ToggleFilled,
    TogglePerfectShapes,
    ToggleDrawFromCenter,

    // Colors and frames
    SwapColors,
    NextFrame,
    PreviousFrame,

    // Move-layer nudges (only while the move tool is active)
    ShiftLayerUp,
    ShiftLayerDown,
    ShiftLayerLeft,
    ShiftLayerRight,
}

/// A single keybinding: a key name with optional modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub key: String,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyBinding {
    /// Parse a keybinding string like "Ctrl+Shift+W" or "Escape".
    /// Modifiers can appear in any order: "Shift+Ctrl+W", "Alt+Shift+Ctrl+W", etc.
    /// Supports spaces around '+' (e.g., "Ctrl + Shift + W")
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        if s.is_empty() {
            return Err("Empty keybinding string".to_string());
        }

        // Normalize by removing spaces around '+'
        let s_normalized = s.replace(" + ", "+").replace("+ ", "+").replace(" +", "+");

        let mut ctrl = false;
        let mut shift = false;
        let mut alt = false;
        let mut key_parts = Vec::new();

        for part in s_normalized.split('+') {
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => ctrl = true,
                "shift" => shift = true,
                "alt" => alt = true,
                _ => key_parts.push(part),
            }
        }

        if key_parts.is_empty() {
            return Err(format!("No key specified in: {}", s));
        }

        // "Ctrl++" splits into ["Ctrl", "", ""]: the key itself is '+'
        let key = key_parts.join("+");
        let key = if key.is_empty() { "+".to_string() } else { key };

        Ok(Self {
            key,
            ctrl,
            shift,
            alt,
        })
    }

    /// Check if this keybinding matches the current input state.
    pub fn matches(&self, key: &str, ctrl: bool, shift: bool, alt: bool) -> bool {
        self.key.eq_ignore_ascii_case(key)
            && self.ctrl == ctrl
            && self.shift == shift
            && self.alt == alt
    }
}

/// Configuration for all keybindings.
///
/// Each action can have multiple keybindings. Users specify them in config.toml as:
/// ```toml
/// [keybindings]
/// select_pencil = ["P", "B"]
/// zoom_in = ["Ctrl+=", "Ctrl++"]
/// toggle_grid = ["#"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct KeybindingsConfig {
    #[serde(default = "default_cancel")]
    pub cancel: Vec<String>,

    #[serde(default = "default_select_pencil")]
    pub select_pencil: Vec<String>,

    #[serde(default = "default_select_eraser")]
    pub select_eraser: Vec<String>,

    #[serde(default = "default_select_fill")]
    pub select_fill: Vec<String>,

    #[serde(default = "default_select_eyedropper")]
    pub select_eyedropper: Vec<String>,

    #[serde(default = "default_select_line")]
    pub select_line: Vec<String>,

    #[serde(default = "default_select_rectangle")]
    pub select_rectangle: Vec<String>,

    #[serde(default = "default_select_circle")]
    pub select_circle: Vec<String>,

    #[serde(default = "default_select_pan")]
    pub select_pan: Vec<String>,

    #[serde(default = "default_select_move_layer")]
    pub select_move_layer: Vec<String>,

    #[serde(default = "default_zoom_in")]
    pub zoom_in: Vec<String>,

    #[serde(default = "default_zoom_out")]
    pub zoom_out: Vec<String>,

    #[serde(default = "default_zoom_reset")]
    pub zoom_reset: Vec<String>,

    #[serde(default = "default_zoom_fit")]
    pub zoom_fit: Vec<String>,

    #[serde(default = "default_zoom_100")]
    pub zoom_100: Vec<String>,

    #[serde(default = "default_toggle_grid")]
    pub toggle_grid: Vec<String>,

    #[serde(default = "default_toggle_onion_skin")]
    pub toggle_onion_skin: Vec<String>,

    #[serde(default = "default_toggle_filled")]
    pub toggle_filled: Vec<String>,

    #[serde(default = "default_toggle_perfect_shapes")]
    pub toggle_perfect_shapes: Vec<String>,

    #[serde(default = "default_toggle_draw_from_center")]
    pub toggle_draw_from_center: Vec<String>,

    #[serde(default = "default_swap_colors")]
    pub swap_colors: Vec<String>,

    #[serde(default = "default_next_frame")]
    pub next_frame: Vec<String>,

    #[serde(default = "default_previous_frame")]
    pub previous_frame: Vec<String>,

    #[serde(default = "default_shift_layer_up")]
    pub shift_layer_up: Vec<String>,

    #[serde(default = "default_shift_layer_down")]
    pub shift_layer_down: Vec<String>,

    #[serde(default = "default_shift_layer_left")]
    pub shift_layer_left: Vec<String>,

    #[serde(default = "default_shift_layer_right")]
    pub shift_layer_right: Vec<String>,
}

impl Default for KeybindingsConfig {
    fn default() -> Self {
        Self {
            cancel: default_cancel(),
            select_pencil: default_select_pencil(),
            select_eraser: default_select_eraser(),
            select_fill: default_select_fill(),
            select_eyedropper: default_select_eyedropper(),
            select_line: default_select_line(),
            select_rectangle: default_select_rectangle(),
            select_circle: default_select_circle(),
            select_pan: default_select_pan(),
            select_move_layer: default_select_move_layer(),
            zoom_in: default_zoom_in(),
            zoom_out: default_zoom_out(),
            zoom_reset: default_zoom_reset(),
            zoom_fit: default_zoom_fit(),
            zoom_100: default_zoom_100(),
            toggle_grid: default_toggle_grid(),
            toggle_onion_skin: default_toggle_onion_skin(),
            toggle_filled: default_toggle_filled(),
            toggle_perfect_shapes: default_toggle_perfect_shapes(),
            toggle_draw_from_center: default_toggle_draw_from_center(),
            swap_colors: default_swap_colors(),
            next_frame: default_next_frame(),
            previous_frame: default_previous_frame(),
            shift_layer_up: default_shift_layer_up(),
            shift_layer_down: default_shift_layer_down(),
            shift_layer_left: default_shift_layer_left(),
            shift_layer_right: default_shift_layer_right(),
        }
    }
}

impl KeybindingsConfig {
    /// Build a lookup map from keybindings to actions for efficient matching.
    /// Returns an error if any keybinding string is invalid or if duplicates are detected.
    pub fn build_action_map(&self) -> Result<HashMap<KeyBinding, Action>, String> {
        let mut map = HashMap::new();

        let groups: [(&[String], Action); 27] = [
            (&self.cancel, Action::Cancel),
            (&self.select_pencil, Action::SelectPencil),
            (&self.select_eraser, Action::SelectEraser),
            (&self.select_fill, Action::SelectFill),
            (&self.select_eyedropper, Action::SelectEyedropper),
            (&self.select_line, Action::SelectLine),
            (&self.select_rectangle, Action::SelectRectangle),
            (&self.select_circle, Action::SelectCircle),
            (&self.select_pan, Action::SelectPan),
            (&self.select_move_layer, Action::SelectMoveLayer),
            (&self.zoom_in, Action::ZoomIn),
            (&self.zoom_out, Action::ZoomOut),
            (&self.zoom_reset, Action::ZoomReset),
            (&self.zoom_fit, Action::ZoomFit),
            (&self.zoom_100, Action::Zoom100),
            (&self.toggle_grid, Action::ToggleGrid),
            (&self.toggle_onion_skin, Action::ToggleOnionSkin),
            (&self.toggle_filled, Action::ToggleFilled),
            (&self.toggle_perfect_shapes, Action::TogglePerfectShapes),
            (&self.toggle_draw_from_center, Action::ToggleDrawFromCenter),
            (&self.swap_colors, Action::SwapColors),
            (&self.next_frame, Action::NextFrame),
            (&self.previous_frame, Action::PreviousFrame),
            (&self.shift_layer_up, Action::ShiftLayerUp),
            (&self.shift_layer_down, Action::ShiftLayerDown),
            (&self.shift_layer_left, Action::ShiftLayerLeft),
            (&self.shift_layer_right, Action::ShiftLayerRight),
        ];

        for (bindings, action) in groups {
            for binding_str in bindings {
                let binding = KeyBinding::parse(binding_str)?;
                // Keys compare case-insensitively, so normalize before checking duplicates
                let normalized = KeyBinding {
                    key: binding.key.to_lowercase(),
                    ..binding
                };
                if let Some(existing_action) = map.insert(normalized, action) {
                    return Err(format!(
                        "Duplicate keybinding '{}' assigned to both {:?} and {:?}",
                        binding_str, existing_action, action
                    ));
                }
            }
        }

        Ok(map)
    }
}

// =============================================================================
// Default keybinding functions
// =============================================================================

fn keys(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn default_cancel() -> Vec<String> {
    keys(&["Escape"])
}

fn default_select_pencil() -> Vec<String> {
    keys(&["P"])
}

fn default_select_eraser() -> Vec<String> {
    keys(&["E"])
}

fn default_select_fill() -> Vec<String> {
    keys(&["G"])
}

fn default_select_eyedropper() -> Vec<String> {
    keys(&["I"])
}

fn default_select_line() -> Vec<String> {
    keys(&["L"])
}

fn default_select_rectangle() -> Vec<String> {
    keys(&["R"])
}

fn default_select_circle() -> Vec<String> {
    keys(&["C"])
}

fn default_select_pan() -> Vec<String> {
    keys(&["H"])
}

fn default_select_move_layer() -> Vec<String> {
    keys(&["M"])
}

fn default_zoom_in() -> Vec<String> {
    keys(&["Ctrl+=", "Ctrl++"])
}

fn default_zoom_out() -> Vec<String> {
    keys(&["Ctrl+-"])
}

fn default_zoom_reset() -> Vec<String> {
    keys(&["Ctrl+0"])
}

fn default_zoom_fit() -> Vec<String> {
    keys(&["Ctrl+9"])
}

fn default_zoom_100() -> Vec<String> {
    keys(&["Ctrl+1"])
}

fn default_toggle_grid() -> Vec<String> {
    keys(&["#"])
}

fn default_toggle_onion_skin() -> Vec<String> {
    keys(&["O"])
}

fn default_toggle_filled() -> Vec<String> {
    keys(&["F"])
}

fn default_toggle_perfect_shapes() -> Vec<String> {
    keys(&["Shift+P"])
}

fn default_toggle_draw_from_center() -> Vec<String> {
    keys(&["Shift+C"])
}

fn default_swap_colors() -> Vec<String> {
    keys(&["X"])
}

fn default_next_frame() -> Vec<String> {
    keys(&["."])
}

fn default_previous_frame() -> Vec<String> {
    keys(&[","])
}

fn default_shift_layer_up() -> Vec<String> {
    keys(&["Up"])
}

fn default_shift_layer_down() -> Vec<String> {
    keys(&["Down"])
}

fn default_shift_layer_left() -> Vec<String> {
    keys(&["Left"])
}

fn default_shift_layer_right() -> Vec<String> {
    keys(&["Right"])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_key() {
        let binding = KeyBinding::parse("Escape").unwrap();
        assert_eq!(binding.key, "Escape");
        assert!(!binding.ctrl);
        assert!(!binding.shift);
        assert!(!binding.alt);
    }

    #[test]
    fn test_parse_ctrl_symbol_keys() {
        let zoom_in = KeyBinding::parse("Ctrl+=").unwrap();
        assert_eq!(zoom_in.key, "=");
        assert!(zoom_in.ctrl);

        let zoom_out = KeyBinding::parse("Ctrl+-").unwrap();
        assert_eq!(zoom_out.key, "-");

        let plus = KeyBinding::parse("Ctrl++").unwrap();
        assert_eq!(plus.key, "+");
        assert!(plus.ctrl);
    }

    #[test]
    fn test_parse_all_modifiers() {
        let binding = KeyBinding::parse("Ctrl+Shift+Alt+A").unwrap();
        assert_eq!(binding.key, "A");
        assert!(binding.ctrl);
        assert!(binding.shift);
        assert!(binding.alt);
    }

    #[test]
    fn test_parse_with_spaces() {
        let binding = KeyBinding::parse("Shift + P").unwrap();
        assert_eq!(binding.key, "P");
        assert!(binding.shift);
        assert!(!binding.ctrl);
    }

    #[test]
    fn test_parse_rejects_modifier_only() {
        assert!(KeyBinding::parse("Ctrl+Shift").is_err());
        assert!(KeyBinding::parse("   ").is_err());
    }

    #[test]
    fn test_matches() {
        let binding = KeyBinding::parse("Shift+C").unwrap();
        assert!(binding.matches("C", false, true, false));
        assert!(binding.matches("c", false, true, false)); // Case insensitive
        assert!(!binding.matches("C", false, false, false)); // Missing shift
        assert!(!binding.matches("C", true, true, false)); // Extra ctrl
    }

    #[test]
    fn test_parse_modifier_order_independence() {
        let binding1 = KeyBinding::parse("Ctrl+Shift+W").unwrap();
        let binding2 = KeyBinding::parse("Shift+Ctrl+W").unwrap();
        assert_eq!(binding1, binding2);
    }

    #[test]
    fn test_build_action_map() {
        let map = KeybindingsConfig::default().build_action_map().unwrap();

        let pencil = KeyBinding::parse("p").unwrap();
        assert_eq!(map.get(&pencil), Some(&Action::SelectPencil));

        let perfect = KeyBinding::parse("Shift+p").unwrap();
        assert_eq!(map.get(&perfect), Some(&Action::TogglePerfectShapes));

        let grid = KeyBinding::parse("#").unwrap();
        assert_eq!(map.get(&grid), Some(&Action::ToggleGrid));
    }

    #[test]
    fn test_duplicate_keybinding_detection() {
        let mut config = KeybindingsConfig::default();
        config.select_pan = vec!["Ctrl+Z".to_string()];
        config.swap_colors = vec!["Ctrl+Z".to_string()];

        let err_msg = config.build_action_map().unwrap_err();
        assert!(err_msg.contains("Duplicate keybinding"));
        assert!(err_msg.contains("Ctrl+Z"));
    }

    #[test]
    fn test_duplicate_detection_ignores_case_and_modifier_order() {
        let mut config = KeybindingsConfig::default();
        config.select_pencil = vec!["Ctrl+Shift+W".to_string()];
        config.select_eraser = vec!["shift+ctrl+w".to_string()];
        assert!(config.build_action_map().is_err());
    }
}
