use pixelwright::config::{Config, ViewHelperKind};
use pixelwright::draw::{
    BLUE, Color, ExportOptions, LayerOffset, PixelSurface, RED, RenderOptions, Scene, Shape,
    ShapeOptions, Sprite, WHITE, flatten_frame, render, sprite_sheet,
};
use pixelwright::input::InputState;
use pixelwright::script::Script;
use pixelwright::viewport::Viewport;

fn plain_options() -> RenderOptions {
    RenderOptions {
        show_grid: false,
        ..RenderOptions::default()
    }
}

fn draw(sprite: &Sprite, viewport: &Viewport, options: &RenderOptions) -> PixelSurface {
    let (w, h) = viewport.display_dimensions();
    let mut surface = PixelSurface::new(w as u32, h as u32);
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

fn pixel_at(surface: &PixelSurface, (x, y): (f64, f64)) -> Color {
    surface.pixel(x.floor() as u32, y.floor() as u32)
}

#[test]
fn zoomed_cells_land_where_viewport_maps_them() {
    let mut sprite = Sprite::new(4, 4);
    sprite.paint_cell(0, 1, 1, Some(RED));
    let mut viewport = Viewport::new(4, 4, 40, 40);
    assert!(viewport.zoom_in_at(20.0, 20.0));
    viewport.pan_by(3.0, -2.0);

    let surface = draw(&sprite, &viewport, &plain_options());
    assert_eq!(pixel_at(&surface, viewport.grid_to_device(1, 1)), RED);
    assert_eq!(pixel_at(&surface, viewport.grid_to_device(2, 1)), WHITE);
    assert_eq!(
        viewport.device_to_grid(viewport.grid_to_device(1, 1).0, viewport.grid_to_device(1, 1).1),
        (1, 1)
    );
}

#[test]
fn preview_and_offset_compose_over_layers() {
    let mut sprite = Sprite::new(4, 4);
    sprite.paint_cell(0, 0, 0, Some(BLUE));
    let viewport = Viewport::new(4, 4, 40, 40);
    let options = plain_options();
    let shape = Shape::Line {
        start: (0, 3),
        end: (3, 3),
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
            layer_offset: Some(LayerOffset {
                layer: 0,
                dx: 1,
                dy: 1,
            }),
        },
    );

    assert_eq!(surface.pixel(5, 5), WHITE);
    assert_eq!(surface.pixel(15, 15), BLUE);
    for x in [5, 15, 25, 35] {
        assert_eq!(surface.pixel(x, 35), RED);
    }
    assert_eq!(sprite.frame().layers[0].pixels.get(0, 0), Some(BLUE));
}

#[test]
fn isometric_helper_stays_inside_sprite() {
    // 8x4 sprite on 80x80: 10px cells, sprite occupies rows 20..60
    let sprite = Sprite::new(8, 4);
    let viewport = Viewport::new(8, 4, 80, 80);
    let mut options = plain_options();
    options.view_helper.kind = ViewHelperKind::Isometric;
    options.view_helper.opacity = 1.0;
    options.view_helper.iso_spacing = 2;

    let surface = draw(&sprite, &viewport, &options);
    for x in 0..80 {
        assert_eq!(surface.pixel(x, 5), options.workspace_color);
        assert_eq!(surface.pixel(x, 75), options.workspace_color);
    }
    let touched = (20..60)
        .flat_map(|y| (0..80).map(move |x| (x, y)))
        .filter(|&(x, y)| surface.pixel(x, y) != WHITE)
        .count();
    assert!(touched > 0);
}

#[test]
fn top_down_helper_draws_center_axes() {
    let sprite = Sprite::new(4, 4);
    let viewport = Viewport::new(4, 4, 40, 40);
    let mut options = plain_options();
    options.view_helper.kind = ViewHelperKind::TopDown;
    options.view_helper.opacity = 1.0;

    let surface = draw(&sprite, &viewport, &options);
    // One-pixel axes through the center at x = 20 and y = 20
    assert_ne!(surface.pixel(19, 30), WHITE);
    assert_ne!(surface.pixel(30, 19), WHITE);
    assert_eq!(surface.pixel(2, 2), WHITE);
}

#[test]
fn sheet_export_ignores_view_state() {
    let mut sprite = Sprite::new(2, 2);
    sprite.paint_cell(0, 0, 0, Some(RED));
    sprite.add_frame();
    sprite.paint_cell(0, 1, 1, Some(BLUE));
    sprite.add_frame();

    let sheet = sprite_sheet(
        &sprite,
        ExportOptions {
            scale: 2,
            frames_per_row: 2,
        },
    );
    assert_eq!((sheet.width(), sheet.height()), (8, 8));
    assert_eq!(sheet.pixel(1, 1), RED);
    assert_eq!(sheet.pixel(6, 2), BLUE);
    assert_eq!(sheet.pixel(2, 2).a, 0);
    // Third frame wraps to the second row and is empty
    assert_eq!(sheet.pixel(1, 5).a, 0);

    let single = flatten_frame(&sprite.frames[0], 3);
    assert_eq!((single.width(), single.height()), (6, 6));
    assert_eq!(single.pixel(2, 2), RED);
}

#[test]
fn scripted_session_renders_committed_pixels() {
    let script = Script::parse(
        r#"
[canvas]
width = 4
height = 4

[[events]]
kind = "tool"
tool = "rectangle"

[[events]]
kind = "key"
key = "F"

[[events]]
kind = "press"
x = 1
y = 1

[[events]]
kind = "release"
x = 2
y = 2
"#,
    )
    .unwrap();

    let mut config = Config::default();
    config.canvas.grid_width = 4;
    config.canvas.grid_height = 4;
    config.canvas.show_grid = false;
    let mut state = InputState::from_config(&config, 40, 40).unwrap();
    let report = script.replay(&mut state).unwrap();
    assert_eq!(report.commits, 1);

    let mut surface = PixelSurface::new(40, 40);
    state.render(&mut surface);
    for (x, y) in [(15, 15), (25, 15), (15, 25), (25, 25)] {
        assert_eq!(surface.pixel(x, y), RED);
    }
    assert_eq!(surface.pixel(5, 5), WHITE);
    assert_eq!(surface.pixel(35, 35), WHITE);
}
