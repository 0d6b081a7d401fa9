//! Compositing pass that turns sprite state into surface pixels.
//!
//! [`render`] draws, in order: the workspace and sprite background, the cell
//! grid, the optional view helper, the onion skin of the previous frame, the
//! active frame's layers (with an optional move preview offset), and finally
//! the live tool preview. It only reads its inputs, so calling it twice with the
//! same [`Scene`] produces identical pixels.

use super::color::Color;
use super::layer::Layer;
use super::shape::Shape;
use super::sprite::Sprite;
use super::surface::Surface;
use crate::config::{Config, ViewHelperKind};
use crate::viewport::{DeviceRect, Viewport};
use std::collections::BTreeSet;

/// Alpha multiplier applied to the previous frame's layers when onion skin is on.
pub const ONION_SKIN_FACTOR: f64 = 0.3;

/// Device-pixel radius within which a pointer grabs a guide handle.
pub const GUIDE_HANDLE_RADIUS: f64 = 8.0;

const HELPER_COLOR: Color = Color::rgb(0, 160, 255);
const HANDLE_SIZE: f64 = 8.0;
const RING_SEGMENTS: usize = 48;

/// Overlay settings for the view helper.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewHelper {
    pub kind: ViewHelperKind,
    /// Stroke alpha for every helper line (0.0-1.0)
    pub opacity: f64,
    /// Side view ground line as a fraction of sprite height
    pub ground_line: f64,
    /// Side view proportion guides as fractions of sprite height
    pub guides: Vec<f64>,
    /// Isometric diamond spacing in cells
    pub iso_spacing: u32,
}

impl Default for ViewHelper {
    fn default() -> Self {
        Self {
            kind: ViewHelperKind::None,
            opacity: 0.4,
            ground_line: 0.9,
            guides: vec![0.25, 0.5],
            iso_spacing: 4,
        }
    }
}

/// Identifies a draggable side-view line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuideId {
    Ground,
    Guide(usize),
}

/// Appearance settings consumed by the compositor.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Fill outside the sprite area
    pub workspace_color: Color,
    /// Fill of the sprite area behind all layers
    pub background_color: Color,
    pub grid_color: Color,
    /// Grid line alpha (0.0-1.0)
    pub grid_opacity: f64,
    pub show_grid: bool,
    pub onion_skin: bool,
    pub view_helper: ViewHelper,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            workspace_color: Color::rgb(0x26, 0x26, 0x26),
            background_color: Color::rgb(255, 255, 255),
            grid_color: Color::rgb(0xcc, 0xcc, 0xcc),
            grid_opacity: 0.5,
            show_grid: true,
            onion_skin: false,
            view_helper: ViewHelper::default(),
        }
    }
}

impl RenderOptions {
    /// Builds options from the loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        let canvas = &config.canvas;
        let helper = &config.view_helper;
        Self {
            workspace_color: canvas.workspace_color.to_color(),
            background_color: canvas.background_color.to_color(),
            grid_color: canvas.grid_color.to_color(),
            grid_opacity: canvas.grid_opacity as f64 / 100.0,
            show_grid: canvas.show_grid,
            onion_skin: config.onion_skin.enabled,
            view_helper: ViewHelper {
                kind: helper.mode,
                opacity: helper.opacity,
                ground_line: helper.ground_line,
                guides: helper.guides.clone(),
                iso_spacing: helper.iso_spacing,
            },
        }
    }

    /// Current fraction for a side-view line.
    pub fn guide_fraction(&self, guide: GuideId) -> Option<f64> {
        match guide {
            GuideId::Ground => Some(self.view_helper.ground_line),
            GuideId::Guide(i) => self.view_helper.guides.get(i).copied(),
        }
    }

    /// Moves a side-view line, clamped to the sprite. Returns false for unknown guides.
    pub fn set_guide_fraction(&mut self, guide: GuideId, fraction: f64) -> bool {
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        let slot = match guide {
            GuideId::Ground => &mut self.view_helper.ground_line,
            GuideId::Guide(i) => match self.view_helper.guides.get_mut(i) {
                Some(slot) => slot,
                None => return false,
            },
        };
        *slot = fraction;
        true
    }
}

/// Render-time shift of one layer, used while dragging the move tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerOffset {
    pub layer: usize,
    pub dx: i32,
    pub dy: i32,
}

/// Everything the compositor reads for one pass.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub sprite: &'a Sprite,
    pub viewport: &'a Viewport,
    pub options: &'a RenderOptions,
    /// Shape being dragged, drawn above all layers
    pub preview: Option<&'a Shape>,
    pub layer_offset: Option<LayerOffset>,
}

/// Device position of a grabbable side-view handle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuideHandle {
    pub guide: GuideId,
    pub x: f64,
    pub y: f64,
}

impl GuideHandle {
    pub fn hit(&self, px: f64, py: f64) -> bool {
        (px - self.x).abs() <= GUIDE_HANDLE_RADIUS && (py - self.y).abs() <= GUIDE_HANDLE_RADIUS
    }
}

/// Hit-testing data produced by a render pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderOutput {
    pub guide_handles: Vec<GuideHandle>,
}

impl RenderOutput {
    /// First handle under a device point.
    pub fn handle_at(&self, px: f64, py: f64) -> Option<GuideId> {
        self.guide_handles
            .iter()
            .find(|h| h.hit(px, py))
            .map(|h| h.guide)
    }
}

/// Performs one full compositing pass into `surface`.
///
/// # Arguments
/// * `surface` - Target sized to the viewport's display dimensions
/// * `scene` - Sprite, view state, options and transient previews
///
/// # Returns
/// Positions of interactive overlay handles for hit testing.
pub fn render<S: Surface + ?Sized>(surface: &mut S, scene: &Scene<'_>) -> RenderOutput {
    let Scene {
        sprite,
        viewport,
        options,
        preview,
        layer_offset,
    } = *scene;

    surface.fill(options.workspace_color);
    surface.fill_rect(viewport.sprite_rect(), options.background_color, 1.0);

    if options.show_grid {
        render_grid(surface, viewport, options.grid_color, options.grid_opacity);
    }

    let output = render_view_helper(surface, viewport, &options.view_helper);

    if options.onion_skin {
        if let Some(previous) = sprite.previous_frame() {
            for layer in previous.layers.iter().filter(|l| l.visible) {
                render_layer(surface, viewport, layer, layer.opacity * ONION_SKIN_FACTOR, (0, 0));
            }
        }
    }

    for (index, layer) in sprite.frame().layers.iter().enumerate() {
        if !layer.visible {
            continue;
        }
        let offset = match layer_offset {
            Some(o) if o.layer == index => (o.dx, o.dy),
            _ => (0, 0),
        };
        render_layer(surface, viewport, layer, layer.opacity, offset);
    }

    if let Some(shape) = preview {
        render_preview(surface, viewport, shape);
    }

    output
}

/// Draws one cell-aligned hairline per grid boundary.
fn render_grid<S: Surface + ?Sized>(surface: &mut S, viewport: &Viewport, color: Color, alpha: f64) {
    let rect = viewport.sprite_rect();
    let extent = viewport.cell_extent();
    let (gw, gh) = viewport.grid_dimensions();

    for i in 0..=gw {
        let x = rect.x + i as f64 * extent;
        surface.stroke_line(x, rect.y, x, rect.y + rect.height, 1.0, color, alpha);
    }
    for j in 0..=gh {
        let y = rect.y + j as f64 * extent;
        surface.stroke_line(rect.x, y, rect.x + rect.width, y, 1.0, color, alpha);
    }
}

fn render_layer<S: Surface + ?Sized>(
    surface: &mut S,
    viewport: &Viewport,
    layer: &Layer,
    alpha: f64,
    (dx, dy): (i32, i32),
) {
    if alpha <= 0.0 {
        return;
    }
    for (x, y, color) in layer.pixels.iter_filled() {
        let (tx, ty) = (x + dx, y + dy);
        // Offset previews are clipped like the committed shift will be
        if layer.pixels.in_bounds(tx, ty) {
            surface.fill_rect(viewport.cell_rect(tx, ty), color, alpha);
        }
    }
}

fn render_preview<S: Surface + ?Sized>(surface: &mut S, viewport: &Viewport, shape: &Shape) {
    let (gw, gh) = viewport.grid_dimensions();
    let color = shape.color();
    let cells: BTreeSet<(i32, i32)> = shape
        .cells()
        .into_iter()
        .filter(|&(x, y)| x >= 0 && y >= 0 && (x as u32) < gw && (y as u32) < gh)
        .collect();
    for (x, y) in cells {
        surface.fill_rect(viewport.cell_rect(x, y), color, 1.0);
    }
}

fn render_view_helper<S: Surface + ?Sized>(
    surface: &mut S,
    viewport: &Viewport,
    helper: &ViewHelper,
) -> RenderOutput {
    let rect = viewport.sprite_rect();
    let alpha = helper.opacity;
    let mut output = RenderOutput::default();

    match helper.kind {
        ViewHelperKind::None => {}
        ViewHelperKind::TopDown => {
            let cx = rect.x + rect.width / 2.0;
            let cy = rect.y + rect.height / 2.0;
            surface.stroke_line(cx, rect.y, cx, rect.y + rect.height, 1.0, HELPER_COLOR, alpha);
            surface.stroke_line(rect.x, cy, rect.x + rect.width, cy, 1.0, HELPER_COLOR, alpha);

            let radius = rect.width.min(rect.height) * 0.4;
            let point = |k: usize| {
                let t = k as f64 / RING_SEGMENTS as f64 * std::f64::consts::TAU;
                (cx + radius * t.cos(), cy + radius * t.sin())
            };
            for k in 0..RING_SEGMENTS {
                let (x1, y1) = point(k);
                let (x2, y2) = point(k + 1);
                surface.stroke_line(x1, y1, x2, y2, 1.0, HELPER_COLOR, alpha);
            }
            // North tick
            surface.stroke_line(cx, cy - radius, cx, cy - radius - 8.0, 2.0, HELPER_COLOR, alpha);
        }
        ViewHelperKind::SideView => {
            let lines = std::iter::once((GuideId::Ground, helper.ground_line, 2.0)).chain(
                helper
                    .guides
                    .iter()
                    .enumerate()
                    .map(|(i, &f)| (GuideId::Guide(i), f, 1.0)),
            );
            for (guide, fraction, width) in lines {
                let y = rect.y + fraction.clamp(0.0, 1.0) * rect.height;
                surface.stroke_line(rect.x, y, rect.x + rect.width, y, width, HELPER_COLOR, alpha);

                let x = rect.x + rect.width;
                surface.fill_rect(
                    DeviceRect {
                        x: x - HANDLE_SIZE / 2.0,
                        y: y - HANDLE_SIZE / 2.0,
                        width: HANDLE_SIZE,
                        height: HANDLE_SIZE,
                    },
                    HELPER_COLOR,
                    alpha,
                );
                output.guide_handles.push(GuideHandle { guide, x, y });
            }
        }
        ViewHelperKind::Isometric => {
            let (gw, gh) = viewport.grid_dimensions();
            let (w, h) = (gw as f64, gh as f64);
            let spacing = helper.iso_spacing.max(1) as f64;
            let extent = viewport.cell_extent();
            let to_device = |(x, y): (f64, f64)| (rect.x + x * extent, rect.y + y * extent);

            // 2:1 diamonds: rising lines y = c - x/2, falling lines y = c + x/2
            let mut c = 0.0;
            while c <= h + w / 2.0 {
                let segments = [
                    ((0.0, c), (w, c - w / 2.0)),
                    ((0.0, c - w / 2.0), (w, c)),
                ];
                for (a, b) in segments {
                    if let Some((a, b)) = clip_segment(a, b, w, h) {
                        let (x1, y1) = to_device(a);
                        let (x2, y2) = to_device(b);
                        surface.stroke_line(x1, y1, x2, y2, 1.0, HELPER_COLOR, alpha);
                    }
                }
                c += spacing;
            }
        }
    }

    output
}

/// Liang-Barsky clip of a segment to `[0, w] x [0, h]`.
fn clip_segment(
    a: (f64, f64),
    b: (f64, f64),
    w: f64,
    h: f64,
) -> Option<((f64, f64), (f64, f64))> {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;

    for (p, q) in [(-dx, a.0), (dx, w - a.0), (-dy, a.1), (dy, h - a.1)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return None;
        }
    }

    if t0 == t1 {
        return None;
    }
    Some((
        (a.0 + t0 * dx, a.1 + t0 * dy),
        (a.0 + t1 * dx, a.1 + t1 * dy),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::color::{BLUE, RED, WHITE};
    use crate::draw::raster::ShapeOptions;
    use crate::draw::surface::PixelSurface;

    // 4x4 sprite on a 40x40 display: base scale 40/128, so each cell is 10px.
    fn setup() -> (Sprite, Viewport, RenderOptions) {
        let options = RenderOptions {
            show_grid: false,
            ..RenderOptions::default()
        };
        (Sprite::new(4, 4), Viewport::new(4, 4, 40, 40), options)
    }

    fn draw(sprite: &Sprite, viewport: &Viewport, options: &RenderOptions) -> PixelSurface {
        let mut surface = PixelSurface::new(40, 40);
        render(
            &mut surface,
            &Scene {
                sprite,
                viewport,
                options,
                preview: None,
                layer_offset: None,
            },
        );
        surface
    }

    #[test]
    fn empty_sprite_shows_background() {
        let (sprite, viewport, options) = setup();
        let surface = draw(&sprite, &viewport, &options);
        assert_eq!(surface.pixel(0, 0), WHITE);
        assert_eq!(surface.pixel(39, 39), WHITE);
    }

    #[test]
    fn workspace_surrounds_panned_sprite() {
        let (sprite, mut viewport, options) = setup();
        viewport.pan_by(20.0, 0.0);
        let surface = draw(&sprite, &viewport, &options);
        assert_eq!(surface.pixel(5, 5), options.workspace_color);
        assert_eq!(surface.pixel(25, 5), WHITE);
    }

    #[test]
    fn layers_paint_in_order_and_skip_hidden() {
        let (mut sprite, viewport, options) = setup();
        sprite.paint_cell(0, 1, 1, Some(RED));
        let top = sprite.frame_mut().add_layer();
        sprite.paint_cell(top, 1, 1, Some(BLUE));
        assert_eq!(draw(&sprite, &viewport, &options).pixel(15, 15), BLUE);

        sprite.frame_mut().toggle_visibility(top);
        assert_eq!(draw(&sprite, &viewport, &options).pixel(15, 15), RED);
    }

    #[test]
    fn layer_opacity_blends_with_background() {
        let (mut sprite, viewport, options) = setup();
        sprite.paint_cell(0, 0, 0, Some(BLUE));
        sprite.frame_mut().set_opacity(0, 0.5);
        let surface = draw(&sprite, &viewport, &options);
        assert_eq!(surface.pixel(5, 5), Color::new(128, 128, 255, 255));
    }

    #[test]
    fn onion_skin_ghosts_previous_frame() {
        let (mut sprite, viewport, mut options) = setup();
        sprite.paint_cell(0, 0, 0, Some(RED));
        sprite.add_frame();
        assert_eq!(sprite.active_frame, 1);

        assert_eq!(draw(&sprite, &viewport, &options).pixel(5, 5), WHITE);

        options.onion_skin = true;
        let ghost = draw(&sprite, &viewport, &options).pixel(5, 5);
        assert_eq!(ghost.r, 255);
        assert!((ghost.g as i32 - 178).abs() <= 1, "got {ghost:?}");
    }

    #[test]
    fn layer_offset_previews_without_mutating() {
        let (mut sprite, viewport, options) = setup();
        sprite.paint_cell(0, 0, 0, Some(RED));
        sprite.paint_cell(0, 3, 0, Some(RED));
        let before = sprite.clone();

        let mut surface = PixelSurface::new(40, 40);
        render(
            &mut surface,
            &Scene {
                sprite: &sprite,
                viewport: &viewport,
                options: &options,
                preview: None,
                layer_offset: Some(LayerOffset {
                    layer: 0,
                    dx: 1,
                    dy: 1,
                }),
            },
        );
        assert_eq!(surface.pixel(5, 5), WHITE);
        assert_eq!(surface.pixel(15, 15), RED);
        // (3,0) shifted to (4,1) is clipped
        assert_eq!(surface.pixel(35, 15), WHITE);
        assert_eq!(sprite, before);
    }

    #[test]
    fn preview_draws_above_layers_and_is_clipped() {
        let (mut sprite, viewport, options) = setup();
        sprite.paint_cell(0, 0, 0, Some(BLUE));
        let shape = Shape::Line {
            start: (0, 0),
            end: (6, 0),
            color: RED,
            options: ShapeOptions::default(),
        };
        let mut surface = PixelSurface::new(40, 40);
        render(
            &mut surface,
            &Scene {
                sprite: &sprite,
                viewport: &viewport,
                options: &options,
                preview: Some(&shape),
                layer_offset: None,
            },
        );
        for x in [5, 15, 25, 35] {
            assert_eq!(surface.pixel(x, 5), RED);
        }
        assert_eq!(surface.pixel(5, 15), WHITE);
        assert_eq!(sprite.frame().layers[0].pixels.get(1, 0), None);
    }

    #[test]
    fn rendering_is_repeatable() {
        let (mut sprite, viewport, mut options) = setup();
        options.show_grid = true;
        options.view_helper.kind = ViewHelperKind::Isometric;
        sprite.paint_cell(0, 2, 2, Some(RED));
        let a = draw(&sprite, &viewport, &options);
        let b = draw(&sprite, &viewport, &options);
        assert_eq!(a, b);
    }

    #[test]
    fn grid_lines_fall_on_cell_boundaries() {
        let (sprite, viewport, mut options) = setup();
        options.show_grid = true;
        options.grid_color = Color::rgb(0, 0, 0);
        options.grid_opacity = 1.0;
        let surface = draw(&sprite, &viewport, &options);
        assert_eq!(surface.pixel(9, 5), Color::rgb(0, 0, 0));
        assert_eq!(surface.pixel(5, 5), WHITE);
    }

    #[test]
    fn side_view_reports_guide_handles() {
        let (sprite, viewport, mut options) = setup();
        options.view_helper.kind = ViewHelperKind::SideView;
        let mut surface = PixelSurface::new(40, 40);
        let output = render(
            &mut surface,
            &Scene {
                sprite: &sprite,
                viewport: &viewport,
                options: &options,
                preview: None,
                layer_offset: None,
            },
        );
        assert_eq!(output.guide_handles.len(), 3);
        assert_eq!(output.handle_at(40.0, 36.0), Some(GuideId::Ground));
        assert_eq!(output.handle_at(40.0, 10.0), Some(GuideId::Guide(0)));
        assert_eq!(output.handle_at(10.0, 10.0), None);
    }

    #[test]
    fn helper_off_reports_no_handles() {
        let (sprite, viewport, options) = setup();
        let mut surface = PixelSurface::new(40, 40);
        let output = render(
            &mut surface,
            &Scene {
                sprite: &sprite,
                viewport: &viewport,
                options: &options,
                preview: None,
                layer_offset: None,
            },
        );
        assert!(output.guide_handles.is_empty());
    }

    #[test]
    fn guide_fraction_is_clamped() {
        let mut options = RenderOptions::default();
        assert!(options.set_guide_fraction(GuideId::Guide(1), 1.5));
        assert_eq!(options.guide_fraction(GuideId::Guide(1)), Some(1.0));
        assert!(!options.set_guide_fraction(GuideId::Guide(7), 0.5));
    }

    #[test]
    fn clip_segment_trims_to_box() {
        let clipped = clip_segment((-2.0, 1.0), (6.0, 1.0), 4.0, 4.0);
        assert_eq!(clipped, Some(((0.0, 1.0), (4.0, 1.0))));
        assert_eq!(clip_segment((-2.0, -1.0), (6.0, -1.0), 4.0, 4.0), None);
    }
}
