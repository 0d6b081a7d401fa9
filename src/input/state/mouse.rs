use crate::config::ViewHelperKind;
use crate::draw::raster;
use crate::input::{events::MouseButton, tool::Tool};

use super::{DrawingState, InputState};

impl InputState {
    /// Processes a mouse button press event.
    ///
    /// # Arguments
    /// * `button` - Which mouse button was pressed
    /// * `x` - Pointer X in device pixels
    /// * `y` - Pointer Y in device pixels
    ///
    /// # Behavior
    /// - Press on a side-view guide handle: starts dragging the guide
    /// - Middle button: pans regardless of tool
    /// - Otherwise dispatches on the current tool; the right button uses the
    ///   secondary color
    pub fn on_mouse_press(&mut self, button: MouseButton, x: f64, y: f64) {
        if !matches!(self.state, DrawingState::Idle) {
            return;
        }

        if self.render_options.view_helper.kind == ViewHelperKind::SideView {
            if let Some(which) = self.last_render.handle_at(x, y) {
                self.state = DrawingState::DraggingGuide { which };
                return;
            }
        }

        if button == MouseButton::Middle {
            self.state = DrawingState::Panning { last: (x, y) };
            return;
        }

        let color = if button == MouseButton::Right {
            self.secondary_color
        } else {
            self.primary_color
        };
        let cell = self.viewport.device_to_grid(x, y);
        let layer = self.sprite.frame().active_layer;

        match self.tool {
            Tool::Pencil | Tool::Eraser => {
                let value = (self.tool == Tool::Pencil).then_some(color);
                let changed = self.sprite.paint_cell(layer, cell.0, cell.1, value);
                self.state = DrawingState::Drawing {
                    tool: self.tool,
                    cell: value,
                    last: cell,
                    changed,
                };
                self.needs_redraw = true;
            }
            Tool::Fill => {
                let written = self.sprite.flood_fill(layer, cell.0, cell.1, Some(color));
                log::debug!("Flood fill at {:?}: {written} cells", cell);
                if written > 0 {
                    self.mark_commit();
                }
            }
            Tool::Eyedropper => {
                if let Some(picked) = self.sprite.frame().top_color_at(cell.0, cell.1) {
                    if button == MouseButton::Right {
                        self.secondary_color = picked;
                    } else {
                        self.primary_color = picked;
                    }
                    log::debug!("Picked {picked} at {:?}", cell);
                    self.needs_redraw = true;
                }
            }
            Tool::Pan => {
                self.state = DrawingState::Panning { last: (x, y) };
            }
            Tool::Line | Tool::Rectangle | Tool::Circle => {
                self.state = DrawingState::ShapePending {
                    tool: self.tool,
                    anchor: cell,
                    end: cell,
                    color,
                };
                self.needs_redraw = true;
            }
            Tool::MoveLayer => {
                let anchor = self.viewport.device_to_cell_unclamped(x, y).unwrap_or(cell);
                self.state = DrawingState::MovingLayer {
                    anchor,
                    offset: (0, 0),
                };
            }
        }
    }

    /// Processes pointer motion.
    ///
    /// # Arguments
    /// * `x` - Current pointer X in device pixels
    /// * `y` - Current pointer Y in device pixels
    ///
    /// # Behavior
    /// - Pencil/eraser: paints the Bresenham segment from the last painted cell
    /// - Shapes: moves the preview end cell
    /// - Pan: adds the device delta to the pan offset
    /// - Move layer: updates the preview offset
    /// - Guide drag: moves the guide to the pointer's height
    pub fn on_mouse_motion(&mut self, x: f64, y: f64) {
        let cell = self.viewport.device_to_grid(x, y);

        match &mut self.state {
            DrawingState::Idle => {}
            DrawingState::Panning { last } => {
                let (dx, dy) = (x - last.0, y - last.1);
                *last = (x, y);
                self.viewport.pan_by(dx, dy);
                self.needs_redraw = true;
            }
            DrawingState::Drawing {
                cell: value,
                last,
                changed,
                ..
            } => {
                if *last == cell {
                    return;
                }
                let segment = raster::line(*last, cell);
                *last = cell;
                let layer = self.sprite.frame().active_layer;
                if self.sprite.apply_points(layer, &segment, *value) > 0 {
                    *changed = true;
                    self.needs_redraw = true;
                }
            }
            DrawingState::ShapePending { end, .. } => {
                if *end != cell {
                    *end = cell;
                    self.needs_redraw = true;
                }
            }
            DrawingState::MovingLayer { anchor, offset } => {
                if let Some((gx, gy)) = self.viewport.device_to_cell_unclamped(x, y) {
                    let next = (gx - anchor.0, gy - anchor.1);
                    if *offset != next {
                        *offset = next;
                        self.needs_redraw = true;
                    }
                }
            }
            DrawingState::DraggingGuide { which } => {
                let which = *which;
                let rect = self.viewport.sprite_rect();
                if rect.height > 0.0 {
                    let fraction = (y - rect.y) / rect.height;
                    if self.render_options.set_guide_fraction(which, fraction) {
                        self.needs_redraw = true;
                    }
                }
            }
        }
    }

    /// Processes mouse button release events.
    ///
    /// Commits pending shapes and layer moves, then returns to `Idle`.
    pub fn on_mouse_release(&mut self, _button: MouseButton, x: f64, y: f64) {
        if matches!(self.state, DrawingState::Idle) {
            return;
        }
        // Apply the release position before committing
        self.on_mouse_motion(x, y);
        self.finish_gesture(true);
    }

    /// Processes the pointer leaving the surface.
    ///
    /// Ends the gesture; pending shapes and layer moves are dropped.
    pub fn on_mouse_leave(&mut self) {
        self.finish_gesture(false);
    }

    /// Processes a scroll wheel event. Negative `delta_y` zooms in about the pointer.
    pub fn on_wheel(&mut self, delta_y: f64, x: f64, y: f64) {
        if self.viewport.wheel(delta_y, x, y) {
            self.needs_redraw = true;
        }
    }
}
