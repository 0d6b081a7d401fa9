//! Configuration file support for pixelwright.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/pixelwright/config.toml`. Settings include the canvas grid and
//! colors, zoom limits, tool defaults, overlays, export, playback, and keybindings.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod enums;
pub mod keybindings;
pub mod types;

// Re-export commonly used types at module level
pub use enums::{ColorSpec, ViewHelperKind};
pub use keybindings::{Action, KeyBinding, KeybindingsConfig};
pub use types::{
    CanvasConfig, ExportConfig, OnionSkinConfig, PlaybackConfig, ToolsConfig, ViewHelperConfig,
    ZoomConfig,
};

use anyhow::{Context, Result};
use log::{debug, info, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure containing all user settings.
///
/// This is the root configuration type that gets deserialized from the TOML file.
/// All fields have sensible defaults and will use those if not specified in the config file.
///
/// # Example TOML
/// ```toml
/// [canvas]
/// grid_width = 16
/// grid_height = 16
/// show_grid = true
///
/// [zoom]
/// step = 1.5
///
/// [tools]
/// primary_color = "#ff8000"
/// perfect_shapes = true
///
/// [view_helper]
/// mode = "side-view"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Sprite size and workspace colors
    #[serde(default)]
    pub canvas: CanvasConfig,

    /// Zoom limits and step sizes
    #[serde(default)]
    pub zoom: ZoomConfig,

    /// Tool colors and shape options
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Previous-frame ghosting
    #[serde(default)]
    pub onion_skin: OnionSkinConfig,

    /// Proportion/perspective overlay
    #[serde(default)]
    pub view_helper: ViewHelperConfig,

    /// Bitmap export defaults
    #[serde(default)]
    pub export: ExportConfig,

    /// Animation preview
    #[serde(default)]
    pub playback: PlaybackConfig,

    /// Keyboard shortcuts
    #[serde(default)]
    pub keybindings: KeybindingsConfig,
}

fn clamp_u32(name: &str, value: &mut u32, min: u32, max: u32) {
    if !(min..=max).contains(&*value) {
        warn!("Invalid {name} {value}, clamping to {min}-{max} range");
        *value = (*value).clamp(min, max);
    }
}

fn clamp_f64(name: &str, value: &mut f64, min: f64, max: f64, fallback: f64) {
    if value.is_nan() {
        warn!("Invalid {name} NaN, using {fallback}");
        *value = fallback;
    } else if !(min..=max).contains(&*value) {
        warn!("Invalid {name} {value:.3}, clamping to {min}-{max} range");
        *value = (*value).clamp(min, max);
    }
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// This method ensures that user-provided config values won't cause undefined behavior
    /// or rendering issues. Invalid values are clamped to the nearest valid value and a
    /// warning is logged.
    ///
    /// Validated ranges:
    /// - `canvas.grid_width`/`grid_height`: 1 - 512
    /// - `canvas.cell_size`: 1.0 - 256.0
    /// - `canvas.grid_opacity`: 0 - 100
    /// - `zoom.min`: 0.01 - 1.0, `zoom.max`: 1.0 - 100.0, `zoom.step`: 1.05 - 4.0
    /// - `zoom.wheel_speed`: 0.05 - 0.3
    /// - `view_helper.opacity`: 0.1 - 1.0, fractions: 0.0 - 1.0, `iso_spacing`: 1 - 64
    /// - `export.scale`/`frames_per_row`: 1 - 64
    /// - `playback.fps`: 1 - 60
    pub fn validate_and_clamp(&mut self) {
        let canvas = &mut self.canvas;
        clamp_u32("grid_width", &mut canvas.grid_width, 1, 512);
        clamp_u32("grid_height", &mut canvas.grid_height, 1, 512);
        clamp_f64("cell_size", &mut canvas.cell_size, 1.0, 256.0, 32.0);
        clamp_u32("grid_opacity", &mut canvas.grid_opacity, 0, 100);

        let zoom = &mut self.zoom;
        clamp_f64("zoom min", &mut zoom.min, 0.01, 1.0, 0.1);
        clamp_f64("zoom max", &mut zoom.max, 1.0, 100.0, 20.0);
        clamp_f64("zoom step", &mut zoom.step, 1.05, 4.0, 1.5);
        clamp_f64("wheel_speed", &mut zoom.wheel_speed, 0.05, 0.3, 0.15);

        let helper = &mut self.view_helper;
        clamp_f64("view_helper opacity", &mut helper.opacity, 0.1, 1.0, 0.4);
        clamp_f64("ground_line", &mut helper.ground_line, 0.0, 1.0, 0.9);
        for (i, guide) in helper.guides.iter_mut().enumerate() {
            clamp_f64(&format!("guides[{i}]"), guide, 0.0, 1.0, 0.5);
        }
        clamp_u32("iso_spacing", &mut helper.iso_spacing, 1, 64);

        clamp_u32("export scale", &mut self.export.scale, 1, 64);
        clamp_u32("frames_per_row", &mut self.export.frames_per_row, 1, 64);
        clamp_u32("fps", &mut self.playback.fps, 1, 60);

        // Resolve color strings once so bad values are reported at load time
        for spec in [
            &self.canvas.background_color,
            &self.canvas.workspace_color,
            &self.canvas.grid_color,
            &self.tools.primary_color,
            &self.tools.secondary_color,
        ] {
            spec.to_color();
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/pixelwright/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("pixelwright");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default path, or returns defaults if not found.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The config directory path cannot be determined
    /// - The file exists but cannot be read
    /// - The file exists but contains invalid TOML syntax
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Loads configuration from an explicit path, or returns defaults if it doesn't exist.
    ///
    /// All loaded values are validated and clamped to acceptable ranges.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        // Validate and clamp values to acceptable ranges
        config.validate_and_clamp();

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Serializes the configuration as pretty TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Saves the current configuration to the default path.
    ///
    /// Creates the parent directory if it doesn't exist.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The config directory cannot be created
    /// - The config cannot be serialized to TOML
    /// - The file cannot be written
    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        fs::write(&config_path, self.to_toml()?)
            .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

        info!("Saved config to {}", config_path.display());
        Ok(())
    }

    /// Creates a default configuration file with documentation comments.
    ///
    /// Writes the example config from `config.example.toml` to the user's config
    /// directory (`pixelwright --init-config`). Returns the written path.
    ///
    /// # Errors
    /// Returns an error if:
    /// - A config file already exists at the target path
    /// - The config directory cannot be created
    /// - The file cannot be written
    pub fn create_default_file() -> Result<PathBuf> {
        let config_path = Self::get_config_path()?;

        if config_path.exists() {
            return Err(anyhow::anyhow!(
                "Config file already exists at {}",
                config_path.display()
            ));
        }

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&config_path, EXAMPLE_CONFIG)?;

        info!("Created default config at {}", config_path.display());
        Ok(config_path)
    }

    /// JSON schema describing every configuration key.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }
}

/// The commented example configuration shipped with the crate.
pub const EXAMPLE_CONFIG: &str = include_str!("../../config.example.toml");
