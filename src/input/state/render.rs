use crate::draw::{RenderOutput, Scene, Surface, render};

use super::InputState;

impl InputState {
    /// Composites the session into `surface`.
    ///
    /// Draws the live shape preview and move-layer offset on top of the
    /// committed sprite, remembers guide handle positions for hit testing, and
    /// clears `needs_redraw`.
    ///
    /// # Returns
    /// The hit-testing data of this pass.
    pub fn render<S: Surface + ?Sized>(&mut self, surface: &mut S) -> &RenderOutput {
        let preview = self.preview_shape();
        let scene = Scene {
            sprite: &self.sprite,
            viewport: &self.viewport,
            options: &self.render_options,
            preview: preview.as_ref(),
            layer_offset: self.layer_offset(),
        };
        self.last_render = render(surface, &scene);
        self.needs_redraw = false;
        &self.last_render
    }
}
