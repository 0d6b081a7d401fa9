//! RGBA color value type, parsing, and predefined color constants.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Represents an RGBA color with 8-bit channels.
///
/// This is the canonical form every color is normalized to on input, so two
/// colors that look identical always compare equal regardless of whether they
/// came from a hex string, an `rgba()` string, a config array, or an imported
/// image. Alpha is stored as 0-255 as well; use [`Color::alpha`] for the unit
/// fraction.
///
/// # Examples
///
/// ```
/// use pixelwright::draw::Color;
/// let from_hex: Color = "#ff0000".parse().unwrap();
/// let from_css: Color = "rgba(255, 0, 0, 1)".parse().unwrap();
/// assert_eq!(from_hex, from_css);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Color {
    /// Red component (0-255)
    pub r: u8,
    /// Green component (0-255)
    pub g: u8,
    /// Blue component (0-255)
    pub b: u8,
    /// Alpha component (0 = fully transparent, 255 = fully opaque)
    pub a: u8,
}

/// Errors produced while parsing a color string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("empty color string")]
    Empty,
    #[error("invalid hex color '{0}'")]
    InvalidHex(String),
    #[error("invalid rgb()/rgba() color '{0}'")]
    InvalidFunction(String),
    #[error("unknown color '{0}'")]
    Unknown(String),
}

impl Color {
    /// Creates a new color from 8-bit RGBA components.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a fully opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Creates a color from 8-bit RGB channels and a unit alpha (0.0-1.0).
    pub fn with_unit_alpha(r: u8, g: u8, b: u8, alpha: f64) -> Self {
        Self {
            r,
            g,
            b,
            a: unit_to_channel(alpha),
        }
    }

    /// Alpha as a fraction in 0.0-1.0.
    pub fn alpha(&self) -> f64 {
        self.a as f64 / 255.0
    }

    /// Components as 0.0-1.0 fractions, in Cairo's `set_source_rgba` order.
    pub fn to_unit_rgba(&self) -> (f64, f64, f64, f64) {
        (
            self.r as f64 / 255.0,
            self.g as f64 / 255.0,
            self.b as f64 / 255.0,
            self.alpha(),
        )
    }

    /// Formats as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Snaps channels to a coarser lattice so near-identical imported colors merge.
    ///
    /// Each RGB channel is rounded to the nearest multiple of `step` (capped at
    /// 255) and alpha is rounded to two decimal places.
    pub fn snapped(&self, step: u8) -> Self {
        let step = step.max(1) as f64;
        let snap = |v: u8| -> u8 { ((v as f64 / step).round() * step).min(255.0) as u8 };
        let alpha = (self.alpha() * 100.0).round() / 100.0;
        Self {
            r: snap(self.r),
            g: snap(self.g),
            b: snap(self.b),
            a: unit_to_channel(alpha),
        }
    }

    /// Parses `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)`, `rgba(r, g, b, a)`
    /// or one of the predefined color names.
    pub fn parse(input: &str) -> Result<Self, ColorParseError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(ColorParseError::Empty);
        }

        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| ColorParseError::InvalidHex(s.to_string()));
        }

        let lower = s.to_ascii_lowercase();
        if lower.starts_with("rgb") {
            return parse_function(&lower)
                .ok_or_else(|| ColorParseError::InvalidFunction(s.to_string()));
        }

        name_to_color(&lower).ok_or_else(|| ColorParseError::Unknown(s.to_string()))
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::parse(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

fn unit_to_channel(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);

    match hex.len() {
        3 => Some(Color::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
        6 => Some(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Color::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

fn parse_function(s: &str) -> Option<Color> {
    let open = s.find('(')?;
    let inner = s[open + 1..].strip_suffix(')')?;
    let parts: Vec<&str> = inner.split(',').map(str::trim).collect();

    let channel = |p: &str| -> Option<u8> {
        let v: f64 = p.parse().ok()?;
        Some(v.clamp(0.0, 255.0).round() as u8)
    };

    match parts.as_slice() {
        [r, g, b] => Some(Color::rgb(channel(r)?, channel(g)?, channel(b)?)),
        [r, g, b, a] => {
            let alpha: f64 = a.parse().ok()?;
            Some(Color::with_unit_alpha(
                channel(r)?,
                channel(g)?,
                channel(b)?,
                alpha,
            ))
        }
        _ => None,
    }
}

/// Maps color name strings to Color values.
///
/// Used by the configuration system and the color parser.
///
/// # Supported Names (case-insensitive)
/// - "red", "green", "blue", "yellow", "orange", "pink", "white", "black", "transparent"
pub fn name_to_color(name: &str) -> Option<Color> {
    match name.to_lowercase().as_str() {
        "red" => Some(RED),
        "green" => Some(GREEN),
        "blue" => Some(BLUE),
        "yellow" => Some(YELLOW),
        "orange" => Some(ORANGE),
        "pink" => Some(PINK),
        "white" => Some(WHITE),
        "black" => Some(BLACK),
        "transparent" => Some(TRANSPARENT),
        _ => None,
    }
}

// ============================================================================
// Predefined Color Constants
// ============================================================================

pub const RED: Color = Color::rgb(255, 0, 0);
pub const GREEN: Color = Color::rgb(0, 255, 0);
pub const BLUE: Color = Color::rgb(0, 0, 255);
pub const YELLOW: Color = Color::rgb(255, 255, 0);
pub const ORANGE: Color = Color::rgb(255, 128, 0);
pub const PINK: Color = Color::rgb(255, 0, 255);
pub const WHITE: Color = Color::rgb(255, 255, 255);
pub const BLACK: Color = Color::rgb(0, 0, 0);
pub const TRANSPARENT: Color = Color::new(0, 0, 0, 0);

/// Default palette offered to the color picker.
pub const DEFAULT_PALETTE: [&str; 17] = [
    "#ff0000", "#00ff00", "#0000ff", "#ffff00", "#ff00ff", "#00ffff", "#ff8000", "#8000ff",
    "#0080ff", "#ff0080", "#80ff00", "#00ff80", "#000000", "#404040", "#808080", "#c0c0c0",
    "#ffffff",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_and_rgba_strings_normalize_to_same_value() {
        let hex = Color::parse("#FF8000").unwrap();
        let css = Color::parse("rgba(255, 128, 0, 1)").unwrap();
        let short = Color::parse("rgb(255,128,0)").unwrap();
        assert_eq!(hex, css);
        assert_eq!(hex, short);
        assert_eq!(hex, ORANGE);
    }

    #[test]
    fn short_hex_expands_nibbles() {
        assert_eq!(Color::parse("#f0a").unwrap(), Color::rgb(255, 0, 170));
    }

    #[test]
    fn eight_digit_hex_keeps_alpha() {
        let c = Color::parse("#00000080").unwrap();
        assert_eq!(c.a, 128);
        assert_eq!(c.to_hex(), "#00000080");
    }

    #[test]
    fn rgba_alpha_is_unit_fraction() {
        let c = Color::parse("rgba(10, 20, 30, 0.5)").unwrap();
        assert_eq!(c, Color::new(10, 20, 30, 128));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(Color::parse("  "), Err(ColorParseError::Empty));
        assert!(matches!(
            Color::parse("#12345"),
            Err(ColorParseError::InvalidHex(_))
        ));
        assert!(matches!(
            Color::parse("rgba(1,2)"),
            Err(ColorParseError::InvalidFunction(_))
        ));
        assert!(matches!(
            Color::parse("chartreuse"),
            Err(ColorParseError::Unknown(_))
        ));
    }

    #[test]
    fn names_resolve_case_insensitively() {
        assert_eq!(Color::parse("White").unwrap(), WHITE);
        assert_eq!(name_to_color("BLACK"), Some(BLACK));
        assert!(name_to_color("mauve").is_none());
    }

    #[test]
    fn snapping_rounds_to_multiples_of_step() {
        let c = Color::new(3, 250, 13, 255).snapped(8);
        assert_eq!(c, Color::new(0, 248, 16, 255));

        // 255 / 8 rounds up to 256 and is capped.
        assert_eq!(Color::rgb(255, 255, 255).snapped(8), WHITE);
    }

    #[test]
    fn snapping_merges_near_identical_imports() {
        let a = Color::new(104, 104, 104, 254).snapped(8);
        let b = Color::new(103, 106, 102, 255).snapped(8);
        assert_eq!(a, b);
    }

    #[test]
    fn default_palette_parses() {
        for hex in DEFAULT_PALETTE {
            assert!(Color::parse(hex).is_ok(), "{hex} should parse");
        }
    }
}
