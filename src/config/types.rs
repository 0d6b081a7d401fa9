//! Configuration type definitions.

use super::enums::{ColorSpec, ViewHelperKind};
use crate::draw::color::DEFAULT_PALETTE;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Sprite grid and workspace appearance.
///
/// Controls the size of new sprites and the colors the compositor uses around
/// and behind the layers.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CanvasConfig {
    /// Width of a new sprite in cells (valid range: 1 - 512)
    #[serde(default = "default_grid_size")]
    pub grid_width: u32,

    /// Height of a new sprite in cells (valid range: 1 - 512)
    #[serde(default = "default_grid_size")]
    pub grid_height: u32,

    /// Device pixels per cell at zoom 1 before fitting (valid range: 1.0 - 256.0)
    #[serde(default = "default_cell_size")]
    pub cell_size: f64,

    /// Fill behind all layers inside the sprite area
    #[serde(default = "default_background_color")]
    pub background_color: ColorSpec,

    /// Fill outside the sprite area
    #[serde(default = "default_workspace_color")]
    pub workspace_color: ColorSpec,

    /// Grid line color
    #[serde(default = "default_grid_color")]
    pub grid_color: ColorSpec,

    /// Grid line opacity in percent (valid range: 0 - 100)
    #[serde(default = "default_grid_opacity")]
    pub grid_opacity: u32,

    /// Draw cell grid lines
    #[serde(default = "default_true")]
    pub show_grid: bool,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            grid_width: default_grid_size(),
            grid_height: default_grid_size(),
            cell_size: default_cell_size(),
            background_color: default_background_color(),
            workspace_color: default_workspace_color(),
            grid_color: default_grid_color(),
            grid_opacity: default_grid_opacity(),
            show_grid: default_true(),
        }
    }
}

/// Zoom limits and step sizes.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ZoomConfig {
    /// Smallest zoom factor (valid range: 0.01 - 1.0)
    #[serde(default = "default_zoom_min")]
    pub min: f64,

    /// Largest zoom factor (valid range: 1.0 - 100.0)
    #[serde(default = "default_zoom_max")]
    pub max: f64,

    /// Multiplier for zoom in/out actions (valid range: 1.05 - 4.0)
    #[serde(default = "default_zoom_step")]
    pub step: f64,

    /// Wheel zoom speed; each notch scales by `1 ± wheel_speed` (valid range: 0.05 - 0.3)
    #[serde(default = "default_wheel_speed")]
    pub wheel_speed: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min: default_zoom_min(),
            max: default_zoom_max(),
            step: default_zoom_step(),
            wheel_speed: default_wheel_speed(),
        }
    }
}

/// Tool defaults applied when a session starts.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ToolsConfig {
    /// Color painted with the primary (left) button
    #[serde(default = "default_primary_color")]
    pub primary_color: ColorSpec,

    /// Color painted with the secondary (right) button
    #[serde(default = "default_secondary_color")]
    pub secondary_color: ColorSpec,

    /// Fill rectangles and ellipses
    #[serde(default)]
    pub filled: bool,

    /// Constrain lines to an axis and rectangles/ellipses to equal sides
    #[serde(default)]
    pub perfect_shapes: bool,

    /// Treat the press cell as the center of rectangles and ellipses
    #[serde(default)]
    pub draw_from_center: bool,

    /// Swatches offered by the color picker
    #[serde(default = "default_palette")]
    pub palette: Vec<ColorSpec>,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            primary_color: default_primary_color(),
            secondary_color: default_secondary_color(),
            filled: false,
            perfect_shapes: false,
            draw_from_center: false,
            palette: default_palette(),
        }
    }
}

/// Onion skin settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct OnionSkinConfig {
    /// Ghost the previous frame behind the active one
    #[serde(default)]
    pub enabled: bool,
}

/// View helper overlay settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ViewHelperConfig {
    /// Overlay kind: none, top-down, side-view, isometric
    #[serde(default)]
    pub mode: ViewHelperKind,

    /// Overlay line opacity (valid range: 0.1 - 1.0)
    #[serde(default = "default_helper_opacity")]
    pub opacity: f64,

    /// Side view ground line as a fraction of sprite height (valid range: 0.0 - 1.0)
    #[serde(default = "default_ground_line")]
    pub ground_line: f64,

    /// Side view proportion guides as fractions of sprite height (each 0.0 - 1.0)
    #[serde(default = "default_guides")]
    pub guides: Vec<f64>,

    /// Isometric diamond spacing in cells (valid range: 1 - 64)
    #[serde(default = "default_iso_spacing")]
    pub iso_spacing: u32,
}

impl Default for ViewHelperConfig {
    fn default() -> Self {
        Self {
            mode: ViewHelperKind::None,
            opacity: default_helper_opacity(),
            ground_line: default_ground_line(),
            guides: default_guides(),
            iso_spacing: default_iso_spacing(),
        }
    }
}

/// Bitmap export settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExportConfig {
    /// Pixels per cell edge in exported images (valid range: 1 - 64)
    #[serde(default = "default_export_scale")]
    pub scale: u32,

    /// Sprite sheet columns before wrapping (valid range: 1 - 64)
    #[serde(default = "default_frames_per_row")]
    pub frames_per_row: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            scale: default_export_scale(),
            frames_per_row: default_frames_per_row(),
        }
    }
}

/// Animation preview settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PlaybackConfig {
    /// Preview frames per second (valid range: 1 - 60)
    #[serde(default = "default_fps")]
    pub fps: u32,

    /// Reverse direction at either end instead of looping
    #[serde(default)]
    pub ping_pong: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            ping_pong: false,
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_true() -> bool {
    true
}

fn default_grid_size() -> u32 {
    32
}

fn default_cell_size() -> f64 {
    32.0
}

fn default_background_color() -> ColorSpec {
    ColorSpec::from("#ffffff")
}

fn default_workspace_color() -> ColorSpec {
    ColorSpec::from("#262626")
}

fn default_grid_color() -> ColorSpec {
    ColorSpec::from("#cccccc")
}

fn default_grid_opacity() -> u32 {
    50
}

fn default_zoom_min() -> f64 {
    0.1
}

fn default_zoom_max() -> f64 {
    20.0
}

fn default_zoom_step() -> f64 {
    1.5
}

fn default_wheel_speed() -> f64 {
    0.15
}

fn default_primary_color() -> ColorSpec {
    ColorSpec::from("#ff0000")
}

fn default_secondary_color() -> ColorSpec {
    ColorSpec::from("#00ff00")
}

fn default_palette() -> Vec<ColorSpec> {
    DEFAULT_PALETTE.iter().map(|&c| ColorSpec::from(c)).collect()
}

fn default_helper_opacity() -> f64 {
    0.4
}

fn default_ground_line() -> f64 {
    0.9
}

fn default_guides() -> Vec<f64> {
    vec![0.25, 0.5]
}

fn default_iso_spacing() -> u32 {
    4
}

fn default_export_scale() -> u32 {
    1
}

fn default_frames_per_row() -> u32 {
    4
}

fn default_fps() -> u32 {
    6
}
