//! Gesture state machine and editing session state.

use crate::config::{Action, Config, KeyBinding};
use crate::draw::{
    Color, DEFAULT_PALETTE, GuideId, LayerOffset, RenderOptions, RenderOutput, Shape, ShapeOptions, Sprite,
    raster::Point,
};
use crate::input::{modifiers::Modifiers, tool::Tool};
use crate::viewport::Viewport;
use std::collections::HashMap;

/// Current gesture state machine.
///
/// Every variant other than `Idle` lives for exactly one pointer gesture and is
/// discarded on release or leave. None of it is part of the sprite.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawingState {
    /// Not in a gesture - waiting for input
    Idle,
    /// Dragging the view
    Panning {
        /// Last device position seen
        last: (f64, f64),
    },
    /// Pencil or eraser stroke in progress
    Drawing {
        /// Pencil or eraser
        tool: Tool,
        /// Value written to each cell (`None` erases)
        cell: Option<Color>,
        /// Last painted cell, the start of the next interpolated segment
        last: Point,
        /// Whether any cell changed during this stroke
        changed: bool,
    },
    /// Line/rectangle/circle being dragged
    ShapePending {
        /// Line, Rectangle or Circle
        tool: Tool,
        /// Cell where the pointer was pressed
        anchor: Point,
        /// Current pointer cell
        end: Point,
        /// Color chosen by the pressed button
        color: Color,
    },
    /// Move-layer drag showing a render-time offset
    MovingLayer {
        /// Grid position where the pointer was pressed
        anchor: Point,
        /// Current whole-cell delta
        offset: (i32, i32),
    },
    /// Side-view guide line being dragged
    DraggingGuide {
        which: GuideId,
    },
}

/// Main input state containing all editing session state.
///
/// This struct holds the sprite being edited, the viewport, tool settings and
/// colors, modifier keys, and the gesture state machine. It processes all
/// keyboard and mouse events to update the sprite and determine when redraws
/// are needed.
pub struct InputState {
    /// Document being edited
    pub sprite: Sprite,
    /// Zoom/pan state
    pub viewport: Viewport,
    /// Compositor appearance (grid, onion skin, view helper)
    pub render_options: RenderOptions,
    /// Currently selected tool
    pub tool: Tool,
    /// Shape modifiers applied to line/rectangle/circle gestures
    pub shape_options: ShapeOptions,
    /// Color used with the left button
    pub primary_color: Color,
    /// Color used with the right button
    pub secondary_color: Color,
    /// Swatches offered to the color picker
    pub palette: Vec<Color>,
    /// Current modifier key state
    pub modifiers: Modifiers,
    /// Current gesture
    pub state: DrawingState,
    /// Whether the display needs to be redrawn
    pub needs_redraw: bool,
    /// Keybinding action map for efficient lookup
    action_map: HashMap<KeyBinding, Action>,
    /// Hit-testing data from the most recent render
    pub(super) last_render: RenderOutput,
    /// Set when a gesture changed sprite pixels, cleared by `take_commit`
    pending_commit: bool,
}

impl InputState {
    /// Creates a session editing `sprite`.
    ///
    /// # Arguments
    /// * `sprite` - Document to edit
    /// * `viewport` - View state sized to the display surface
    /// * `render_options` - Compositor appearance
    /// * `primary_color` - Left-button color
    /// * `secondary_color` - Right-button color
    /// * `shape_options` - Initial fill/perfect/center options
    /// * `action_map` - Keybinding action map
    pub fn new(
        sprite: Sprite,
        viewport: Viewport,
        render_options: RenderOptions,
        primary_color: Color,
        secondary_color: Color,
        shape_options: ShapeOptions,
        action_map: HashMap<KeyBinding, Action>,
    ) -> Self {
        Self {
            sprite,
            viewport,
            render_options,
            tool: Tool::default(),
            shape_options,
            primary_color,
            secondary_color,
            palette: DEFAULT_PALETTE
                .iter()
                .filter_map(|hex| Color::parse(hex).ok())
                .collect(),
            modifiers: Modifiers::new(),
            state: DrawingState::Idle,
            needs_redraw: true,
            action_map,
            last_render: RenderOutput::default(),
            pending_commit: false,
        }
    }

    /// Creates a session with a blank sprite sized and styled from `config`.
    ///
    /// # Errors
    /// Returns the keybinding error message if the configured bindings are invalid.
    pub fn from_config(config: &Config, display_width: u32, display_height: u32) -> Result<Self, String> {
        let action_map = config.keybindings.build_action_map()?;
        let canvas = &config.canvas;
        let zoom = &config.zoom;
        let sprite = Sprite::new(canvas.grid_width, canvas.grid_height);
        let viewport = Viewport::new(
            sprite.width(),
            sprite.height(),
            display_width,
            display_height,
        )
        .with_cell_size(canvas.cell_size)
        .with_limits(zoom.min, zoom.max, zoom.step, zoom.wheel_speed);

        let tools = &config.tools;
        let mut state = Self::new(
            sprite,
            viewport,
            RenderOptions::from_config(config),
            tools.primary_color.to_color(),
            tools.secondary_color.to_color(),
            ShapeOptions {
                filled: tools.filled,
                perfect_shapes: tools.perfect_shapes,
                draw_from_center: tools.draw_from_center,
            },
            action_map,
        );
        state.palette = tools.palette.iter().map(|spec| spec.to_color()).collect();
        Ok(state)
    }

    /// Sets the primary (or secondary) color from palette swatch `index`.
    ///
    /// Returns false and leaves both colors untouched if there is no such swatch.
    pub fn pick_swatch(&mut self, index: usize, secondary: bool) -> bool {
        let Some(&color) = self.palette.get(index) else {
            return false;
        };
        if secondary {
            self.secondary_color = color;
        } else {
            self.primary_color = color;
        }
        self.needs_redraw = true;
        true
    }

    /// Switches tools, abandoning any gesture in progress.
    pub fn set_tool(&mut self, tool: Tool) {
        if self.tool != tool {
            self.finish_gesture(false);
            log::debug!("Tool changed to {:?}", tool);
            self.tool = tool;
            self.needs_redraw = true;
        }
    }

    /// Returns true once after each gesture that changed sprite pixels.
    ///
    /// History collaborators call this after dispatching an event and take a
    /// [`Sprite::snapshot`] when it fires.
    pub fn take_commit(&mut self) -> bool {
        std::mem::take(&mut self.pending_commit)
    }

    pub(super) fn mark_commit(&mut self) {
        self.pending_commit = true;
        self.needs_redraw = true;
    }

    /// Deep copy of the current document for undo history.
    pub fn snapshot(&self) -> Sprite {
        self.sprite.snapshot()
    }

    /// Replaces the document with a history snapshot, dropping any gesture.
    pub fn restore(&mut self, snapshot: Sprite) {
        self.state = DrawingState::Idle;
        self.sprite.restore(snapshot);
        self.viewport
            .update_grid_dimensions(self.sprite.width(), self.sprite.height());
        self.needs_redraw = true;
    }

    /// Resizes every frame of the sprite and keeps the viewport in sync.
    pub fn resize_sprite(&mut self, width: u32, height: u32) {
        self.finish_gesture(false);
        self.sprite.resize(width, height);
        self.viewport
            .update_grid_dimensions(self.sprite.width(), self.sprite.height());
        self.mark_commit();
    }

    /// Updates display dimensions after the surface is (re)configured.
    pub fn update_display_dimensions(&mut self, width: u32, height: u32) {
        self.viewport.update_display_dimensions(width, height);
        self.needs_redraw = true;
    }

    /// Selects a frame, abandoning any gesture in progress.
    pub fn set_active_frame(&mut self, index: usize) -> bool {
        self.finish_gesture(false);
        let changed = self.sprite.set_active_frame(index);
        if changed {
            log::debug!("Active frame {index}");
            self.needs_redraw = true;
        }
        changed
    }

    /// Shape currently being dragged, as it would be committed.
    pub fn preview_shape(&self) -> Option<Shape> {
        match self.state {
            DrawingState::ShapePending {
                tool,
                anchor,
                end,
                color,
            } => self.build_shape(tool, anchor, end, color),
            _ => None,
        }
    }

    /// Render-time offset of the layer being moved, if any.
    pub fn layer_offset(&self) -> Option<LayerOffset> {
        match self.state {
            DrawingState::MovingLayer {
                offset: (dx, dy), ..
            } => Some(LayerOffset {
                layer: self.sprite.frame().active_layer,
                dx,
                dy,
            }),
            _ => None,
        }
    }

    pub(super) fn build_shape(&self, tool: Tool, start: Point, end: Point, color: Color) -> Option<Shape> {
        let options = self.shape_options;
        match tool {
            Tool::Line => Some(Shape::Line {
                start,
                end,
                color,
                options,
            }),
            Tool::Rectangle => Some(Shape::Rect {
                start,
                end,
                color,
                options,
            }),
            Tool::Circle => Some(Shape::Ellipse {
                start,
                end,
                color,
                options,
            }),
            _ => None,
        }
    }

    /// Ends the current gesture.
    ///
    /// With `commit`, pending shapes and layer moves are applied; otherwise they
    /// are dropped. Pencil/eraser strokes are already on the grid either way.
    pub(super) fn finish_gesture(&mut self, commit: bool) {
        let state = std::mem::replace(&mut self.state, DrawingState::Idle);
        match state {
            DrawingState::Idle => return,
            DrawingState::Drawing { changed, .. } => {
                if changed {
                    self.mark_commit();
                }
            }
            DrawingState::ShapePending {
                tool,
                anchor,
                end,
                color,
            } if commit => {
                if let Some(shape) = self.build_shape(tool, anchor, end, color) {
                    let layer = self.sprite.frame().active_layer;
                    let written = self.sprite.apply_points(layer, &shape.cells(), Some(color));
                    log::debug!("Committed {:?}: {written} cells changed", tool);
                    if written > 0 {
                        self.mark_commit();
                    }
                }
            }
            DrawingState::MovingLayer {
                offset: (dx, dy), ..
            } if commit => {
                let layer = self.sprite.frame().active_layer;
                if (dx, dy) != (0, 0) && self.sprite.frame_mut().shift_layer(layer, dx, dy) {
                    log::debug!("Moved layer {layer} by ({dx}, {dy})");
                    self.mark_commit();
                }
            }
            DrawingState::Panning { .. }
            | DrawingState::DraggingGuide { .. }
            | DrawingState::ShapePending { .. }
            | DrawingState::MovingLayer { .. } => {}
        }
        self.needs_redraw = true;
    }

    /// Look up an action for the given key string with the current modifiers.
    ///
    /// Symbol keys that need Shift on common layouts (`#`, `+`) also match
    /// bindings written without Shift.
    pub(super) fn find_action(&self, key_str: &str) -> Option<Action> {
        let Modifiers { ctrl, shift, alt } = self.modifiers;
        let lookup = |shift: bool| {
            self.action_map
                .iter()
                .find(|(binding, _)| binding.matches(key_str, ctrl, shift, alt))
                .map(|(_, action)| *action)
        };

        lookup(shift).or_else(|| {
            let is_symbol = key_str.chars().count() == 1
                && key_str.chars().all(|c| !c.is_alphanumeric());
            if shift && is_symbol {
                lookup(false)
            } else {
                None
            }
        })
    }
}
