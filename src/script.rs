//! Declarative gesture scripts.
//!
//! A script is a TOML file listing input events in grid coordinates:
//!
//! ```toml
//! [canvas]
//! width = 8
//! height = 8
//!
//! [[events]]
//! kind = "tool"
//! tool = "line"
//!
//! [[events]]
//! kind = "press"
//! x = 0
//! y = 0
//!
//! [[events]]
//! kind = "release"
//! x = 7
//! y = 7
//! ```
//!
//! Pointer events are mapped to the device-space center of their cell and fed
//! through [`InputState`], so scripts exercise exactly the code paths a
//! pointer would.

use crate::config::KeyBinding;
use crate::draw::{Color, Frame, flatten_frame};
use crate::input::{InputState, Key, MouseButton, Tool};
use anyhow::{Context, Result, anyhow};
use log::{debug, info};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Symbols used for distinct colors in ASCII output, in legend order.
const SYMBOLS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const EMPTY_SYMBOL: char = '.';
const OVERFLOW_SYMBOL: char = '?';

/// Optional sprite size overriding the configured canvas.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ScriptCanvas {
    pub width: u32,
    pub height: u32,
}

/// Which color slot a `color` or `swatch` event sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorSlot {
    #[default]
    Primary,
    Secondary,
}

/// One scripted input event.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ScriptEvent {
    Tool {
        tool: Tool,
    },
    Color {
        #[serde(default)]
        slot: ColorSlot,
        color: String,
    },
    Swatch {
        #[serde(default)]
        slot: ColorSlot,
        index: usize,
    },
    Press {
        x: i32,
        y: i32,
        #[serde(default)]
        button: MouseButton,
    },
    Move {
        x: i32,
        y: i32,
    },
    Release {
        x: i32,
        y: i32,
        #[serde(default)]
        button: MouseButton,
    },
    Leave,
    /// Binding-style key chord such as `"Ctrl+="` or `"Shift+P"`.
    Key {
        key: String,
    },
    /// Wheel at a cell; negative `delta` zooms in.
    Wheel {
        x: i32,
        y: i32,
        delta: f64,
    },
    AddFrame,
    DuplicateFrame,
    DeleteFrame,
    SelectFrame {
        index: usize,
    },
    AddLayer,
    DuplicateLayer,
    DeleteLayer,
    SelectLayer {
        index: usize,
    },
    ToggleVisibility {
        index: usize,
    },
    SetOpacity {
        index: usize,
        opacity: f64,
    },
    MergeLayers {
        indices: Vec<usize>,
    },
    Resize {
        width: u32,
        height: u32,
    },
    FlipHorizontal,
}

/// Parsed gesture script.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub canvas: Option<ScriptCanvas>,
    #[serde(default)]
    pub events: Vec<ScriptEvent>,
}

/// Outcome of replaying a script.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayReport {
    /// Events dispatched
    pub events: usize,
    /// Events after which the session reported a pixel commit
    pub commits: usize,
}

impl Script {
    pub fn parse(source: &str) -> Result<Self> {
        toml::from_str(source).context("Failed to parse gesture script")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        Self::parse(&source).with_context(|| format!("Invalid script {}", path.display()))
    }

    /// Dispatches every event into `state` in order.
    ///
    /// # Errors
    /// Returns an error naming the event index for unparsable colors or keys.
    pub fn replay(&self, state: &mut InputState) -> Result<ReplayReport> {
        let mut report = ReplayReport::default();
        for (index, event) in self.events.iter().enumerate() {
            apply_event(state, event).with_context(|| format!("Script event #{}", index + 1))?;
            report.events += 1;
            if state.take_commit() {
                report.commits += 1;
            }
        }
        info!(
            "Replayed {} events ({} commits)",
            report.events, report.commits
        );
        Ok(report)
    }
}

fn cell_center(state: &InputState, x: i32, y: i32) -> (f64, f64) {
    state.viewport.grid_to_device(x, y)
}

fn apply_event(state: &mut InputState, event: &ScriptEvent) -> Result<()> {
    debug!("Script event {:?}", event);
    match *event {
        ScriptEvent::Tool { tool } => state.set_tool(tool),
        ScriptEvent::Color { slot, ref color } => {
            let color = Color::parse(color).map_err(|e| anyhow!("{e}"))?;
            match slot {
                ColorSlot::Primary => state.primary_color = color,
                ColorSlot::Secondary => state.secondary_color = color,
            }
        }
        ScriptEvent::Swatch { slot, index } => {
            if !state.pick_swatch(index, slot == ColorSlot::Secondary) {
                return Err(anyhow!(
                    "Swatch {index} out of range (palette has {})",
                    state.palette.len()
                ));
            }
        }
        ScriptEvent::Press { x, y, button } => {
            let (px, py) = cell_center(state, x, y);
            state.on_mouse_press(button, px, py);
        }
        ScriptEvent::Move { x, y } => {
            let (px, py) = cell_center(state, x, y);
            state.on_mouse_motion(px, py);
        }
        ScriptEvent::Release { x, y, button } => {
            let (px, py) = cell_center(state, x, y);
            state.on_mouse_release(button, px, py);
        }
        ScriptEvent::Leave => state.on_mouse_leave(),
        ScriptEvent::Key { ref key } => press_chord(state, key)?,
        ScriptEvent::Wheel { x, y, delta } => {
            let (px, py) = cell_center(state, x, y);
            state.on_wheel(delta, px, py);
        }
        ScriptEvent::AddFrame => {
            state.sprite.add_frame();
        }
        ScriptEvent::DuplicateFrame => {
            let active = state.sprite.active_frame;
            state.sprite.duplicate_frame(active);
        }
        ScriptEvent::DeleteFrame => {
            let active = state.sprite.active_frame;
            state.sprite.delete_frame(active);
        }
        ScriptEvent::SelectFrame { index } => {
            state.set_active_frame(index);
        }
        ScriptEvent::AddLayer => {
            state.sprite.frame_mut().add_layer();
        }
        ScriptEvent::DuplicateLayer => {
            let frame = state.sprite.frame_mut();
            frame.duplicate_layer(frame.active_layer);
        }
        ScriptEvent::DeleteLayer => {
            let frame = state.sprite.frame_mut();
            frame.delete_layer(frame.active_layer);
        }
        ScriptEvent::SelectLayer { index } => {
            state.sprite.frame_mut().set_active_layer(index);
        }
        ScriptEvent::ToggleVisibility { index } => {
            state.sprite.frame_mut().toggle_visibility(index);
        }
        ScriptEvent::SetOpacity { index, opacity } => {
            state.sprite.frame_mut().set_opacity(index, opacity);
        }
        ScriptEvent::MergeLayers { ref indices } => {
            state.sprite.frame_mut().merge_layers(indices);
        }
        ScriptEvent::Resize { width, height } => state.resize_sprite(width, height),
        ScriptEvent::FlipHorizontal => {
            let flipped = state.sprite.flipped_horizontal();
            state.restore(flipped);
        }
    }
    state.needs_redraw = true;
    Ok(())
}

/// Presses the modifiers of a binding-style chord, then the key, then
/// releases everything.
fn press_chord(state: &mut InputState, chord: &str) -> Result<()> {
    let binding = KeyBinding::parse(chord).map_err(|e| anyhow!(e))?;
    let key = Key::from_name(&binding.key);
    if key == Key::Unknown {
        return Err(anyhow!("Unknown key '{}'", binding.key));
    }

    let modifiers: Vec<Key> = [
        (binding.ctrl, Key::Ctrl),
        (binding.shift, Key::Shift),
        (binding.alt, Key::Alt),
    ]
    .into_iter()
    .filter_map(|(held, key)| held.then_some(key))
    .collect();

    for modifier in &modifiers {
        state.on_key_press(*modifier);
    }
    state.on_key_press(key);
    state.on_key_release(key);
    for modifier in modifiers.iter().rev() {
        state.on_key_release(*modifier);
    }
    Ok(())
}

/// Renders a frame's flattened pixels as text.
///
/// Empty pixels print as `.`; each distinct color gets a letter, listed in a
/// legend line above the grid.
pub fn ascii_frame(frame: &Frame) -> String {
    let surface = flatten_frame(frame, 1);
    let (width, height) = (surface.width(), surface.height());

    let mut legend: BTreeMap<Color, char> = BTreeMap::new();
    for y in 0..height {
        for x in 0..width {
            let color = surface.pixel(x, y);
            if color.a > 0 {
                legend.entry(color).or_insert(OVERFLOW_SYMBOL);
            }
        }
    }
    for (symbol, slot) in SYMBOLS.chars().zip(legend.values_mut()) {
        *slot = symbol;
    }

    let mut out = String::new();
    if !legend.is_empty() {
        let entries: Vec<String> = legend
            .iter()
            .map(|(color, symbol)| format!("{symbol}={color}"))
            .collect();
        let _ = writeln!(out, "legend: {}", entries.join(" "));
    }
    for y in 0..height {
        let row: String = (0..width)
            .map(|x| {
                let color = surface.pixel(x, y);
                if color.a == 0 {
                    EMPTY_SYMBOL
                } else {
                    legend.get(&color).copied().unwrap_or(OVERFLOW_SYMBOL)
                }
            })
            .collect();
        let _ = writeln!(out, "{row}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KeybindingsConfig;
    use crate::draw::{BLUE, GREEN, RED, RenderOptions, ShapeOptions, Sprite};
    use crate::viewport::Viewport;

    fn session(width: u32, height: u32) -> InputState {
        InputState::new(
            Sprite::new(width, height),
            Viewport::new(width, height, width * 10, height * 10),
            RenderOptions::default(),
            RED,
            GREEN,
            ShapeOptions::default(),
            KeybindingsConfig::default().build_action_map().unwrap(),
        )
    }

    #[test]
    fn parses_tagged_events() {
        let script = Script::parse(
            r##"
[canvas]
width = 4
height = 3

[[events]]
kind = "tool"
tool = "move-layer"

[[events]]
kind = "color"
slot = "secondary"
color = "#0000ff"

[[events]]
kind = "press"
x = 1
y = 2
button = "right"

[[events]]
kind = "leave"

[[events]]
kind = "merge-layers"
indices = [0, 1]
"##,
        )
        .unwrap();

        let canvas = script.canvas.unwrap();
        assert_eq!((canvas.width, canvas.height), (4, 3));
        assert_eq!(script.events.len(), 5);
        assert!(matches!(
            script.events[0],
            ScriptEvent::Tool {
                tool: Tool::MoveLayer
            }
        ));
        assert!(matches!(
            script.events[2],
            ScriptEvent::Press {
                x: 1,
                y: 2,
                button: MouseButton::Right
            }
        ));
    }

    #[test]
    fn unknown_event_kind_is_rejected() {
        let err = Script::parse("[[events]]\nkind = \"teleport\"\n").unwrap_err();
        assert!(format!("{err:#}").contains("parse"));
    }

    #[test]
    fn replay_draws_line_and_counts_commits() {
        let script = Script::parse(
            r#"
[[events]]
kind = "tool"
tool = "line"

[[events]]
kind = "press"
x = 0
y = 0

[[events]]
kind = "move"
x = 3
y = 3

[[events]]
kind = "release"
x = 3
y = 3
"#,
        )
        .unwrap();

        let mut state = session(4, 4);
        let report = script.replay(&mut state).unwrap();
        assert_eq!(report, ReplayReport { events: 4, commits: 1 });
        for i in 0..4 {
            assert_eq!(state.sprite.frame().layers[0].pixels.get(i, i), Some(RED));
        }
    }

    #[test]
    fn key_chords_press_modifiers() {
        let mut state = session(4, 4);
        press_chord(&mut state, "Shift+P").unwrap();
        assert!(state.shape_options.perfect_shapes);
        assert!(!state.modifiers.shift);

        press_chord(&mut state, "Ctrl+=").unwrap();
        assert_eq!(state.viewport.zoom, 1.5);

        assert!(press_chord(&mut state, "Ctrl+Hyper").is_err());
    }

    #[test]
    fn bad_color_names_the_event() {
        let script = Script {
            canvas: None,
            events: vec![ScriptEvent::Color {
                slot: ColorSlot::Primary,
                color: "not-a-color".to_string(),
            }],
        };
        let err = script.replay(&mut session(2, 2)).unwrap_err();
        assert!(format!("{err:#}").contains("Script event #1"));
    }

    #[test]
    fn ascii_frame_uses_legend_symbols() {
        let mut frame = Frame::new(1, "Frame 1", 3, 2);
        frame.paint_cell(0, 0, 0, Some(RED));
        frame.paint_cell(0, 2, 1, Some(BLUE));

        let text = ascii_frame(&frame);
        let lines: Vec<&str> = text.lines().collect();
        // BTreeMap order puts blue before red
        assert_eq!(lines[0], "legend: a=#0000ff b=#ff0000");
        assert_eq!(lines[1], "b..");
        assert_eq!(lines[2], "..a");
    }

    #[test]
    fn ascii_frame_of_empty_frame_has_no_legend() {
        let frame = Frame::new(1, "Frame 1", 2, 1);
        assert_eq!(ascii_frame(&frame), "..\n");
    }

    #[test]
    fn swatch_event_picks_from_palette() {
        let script = Script::parse(
            r#"
[[events]]
kind = "swatch"
index = 2

[[events]]
kind = "swatch"
slot = "secondary"
index = 0

[[events]]
kind = "swatch"
index = 400
"#,
        )
        .unwrap();

        let mut state = session(2, 2);
        let err = script.replay(&mut state).unwrap_err();
        assert!(format!("{err:#}").contains("Script event #3"));
        assert_eq!(state.primary_color, BLUE);
        assert_eq!(state.secondary_color, RED);
    }
}
