use crate::config::Action;
use crate::input::{events::Key, tool::Tool};

use super::{DrawingState, InputState};

impl InputState {
    /// Processes a key press event.
    ///
    /// Modifier keys update the modifier state; every other key is looked up
    /// in the keybinding map with the current modifiers and dispatched.
    pub fn on_key_press(&mut self, key: Key) {
        match key {
            Key::Shift => {
                self.modifiers.shift = true;
                return;
            }
            Key::Ctrl => {
                self.modifiers.ctrl = true;
                return;
            }
            Key::Alt => {
                self.modifiers.alt = true;
                return;
            }
            _ => {}
        }

        let Some(key_str) = key.binding_name() else {
            return;
        };

        if let Some(action) = self.find_action(&key_str) {
            self.handle_action(action);
        }
    }

    /// Processes a key release event.
    ///
    /// Currently only tracks modifier key releases to update the modifier state.
    pub fn on_key_release(&mut self, key: Key) {
        match key {
            Key::Shift => self.modifiers.shift = false,
            Key::Ctrl => self.modifiers.ctrl = false,
            Key::Alt => self.modifiers.alt = false,
            _ => {}
        }
    }

    /// Handle an action triggered by a keybinding.
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Cancel => self.finish_gesture(false),
            Action::SelectPencil => self.set_tool(Tool::Pencil),
            Action::SelectEraser => self.set_tool(Tool::Eraser),
            Action::SelectFill => self.set_tool(Tool::Fill),
            Action::SelectEyedropper => self.set_tool(Tool::Eyedropper),
            Action::SelectLine => self.set_tool(Tool::Line),
            Action::SelectRectangle => self.set_tool(Tool::Rectangle),
            Action::SelectCircle => self.set_tool(Tool::Circle),
            Action::SelectPan => self.set_tool(Tool::Pan),
            Action::SelectMoveLayer => self.set_tool(Tool::MoveLayer),
            Action::ZoomIn => {
                self.needs_redraw |= self.viewport.zoom_in();
            }
            Action::ZoomOut => {
                self.needs_redraw |= self.viewport.zoom_out();
            }
            Action::ZoomReset => {
                self.viewport.reset();
                self.needs_redraw = true;
            }
            Action::ZoomFit => {
                self.viewport.fit();
                self.needs_redraw = true;
            }
            Action::Zoom100 => {
                self.needs_redraw |= self.viewport.zoom_to_100();
            }
            Action::ToggleGrid => {
                self.render_options.show_grid = !self.render_options.show_grid;
                self.needs_redraw = true;
            }
            Action::ToggleOnionSkin => {
                self.render_options.onion_skin = !self.render_options.onion_skin;
                log::debug!("Onion skin {}", self.render_options.onion_skin);
                self.needs_redraw = true;
            }
            Action::ToggleFilled => {
                self.shape_options.filled = !self.shape_options.filled;
                self.needs_redraw = true;
            }
            Action::TogglePerfectShapes => {
                self.shape_options.perfect_shapes = !self.shape_options.perfect_shapes;
                self.needs_redraw = true;
            }
            Action::ToggleDrawFromCenter => {
                self.shape_options.draw_from_center = !self.shape_options.draw_from_center;
                self.needs_redraw = true;
            }
            Action::SwapColors => {
                std::mem::swap(&mut self.primary_color, &mut self.secondary_color);
                self.needs_redraw = true;
            }
            Action::NextFrame => {
                let next = self.sprite.active_frame + 1;
                self.set_active_frame(next);
            }
            Action::PreviousFrame => {
                if let Some(previous) = self.sprite.active_frame.checked_sub(1) {
                    self.set_active_frame(previous);
                }
            }
            Action::ShiftLayerUp => self.nudge_layer(0, -1),
            Action::ShiftLayerDown => self.nudge_layer(0, 1),
            Action::ShiftLayerLeft => self.nudge_layer(-1, 0),
            Action::ShiftLayerRight => self.nudge_layer(1, 0),
        }
    }

    /// Shifts the active layer one step immediately, without a preview stage.
    fn nudge_layer(&mut self, dx: i32, dy: i32) {
        if self.tool != Tool::MoveLayer || !matches!(self.state, DrawingState::Idle) {
            return;
        }
        let layer = self.sprite.frame().active_layer;
        if self.sprite.frame_mut().shift_layer(layer, dx, dy) {
            self.mark_commit();
        }
    }
}
