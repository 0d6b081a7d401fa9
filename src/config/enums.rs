//! Configuration enum types.

use crate::draw::{Color, color::RED};
use log::warn;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Overlay drawn behind the layers to help judge proportion and perspective.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ViewHelperKind {
    /// No overlay
    #[default]
    None,
    /// Center axes and a compass ring
    TopDown,
    /// Ground line plus draggable proportion guides
    SideView,
    /// 2:1 isometric diamond grid
    Isometric,
}

/// Color specification - a name, a CSS-like string, or RGB values.
///
/// # Examples
/// ```toml
/// # Named color
/// primary_color = "red"
///
/// # Hex or rgb()/rgba() string
/// background_color = "#262626"
/// grid_color = "rgba(204, 204, 204, 0.5)"
///
/// # Custom RGB color (0-255 per component)
/// secondary_color = [255, 128, 0]  # Orange
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
#[serde(untagged)]
pub enum ColorSpec {
    /// Named color (red, green, blue, yellow, orange, pink, white, black, transparent)
    /// or a `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb()` or `rgba()` string
    Name(String),
    /// RGB color as [red, green, blue] where each component is 0-255
    Rgb([u8; 3]),
}

impl ColorSpec {
    /// Converts the color specification to a [`Color`].
    ///
    /// Strings go through [`Color::parse`]. Unparseable strings default to red
    /// with a warning. RGB arrays are fully opaque.
    pub fn to_color(&self) -> Color {
        match self {
            ColorSpec::Name(name) => Color::parse(name).unwrap_or_else(|err| {
                warn!("Unknown color '{}' ({}), using red", name, err);
                RED
            }),
            ColorSpec::Rgb([r, g, b]) => Color::rgb(*r, *g, *b),
        }
    }
}

impl From<&str> for ColorSpec {
    fn from(value: &str) -> Self {
        ColorSpec::Name(value.to_string())
    }
}
