//! Sprite data model, rasterization, and compositing.
//!
//! This module defines the core types of the engine:
//! - [`Color`]: canonical 8-bit RGBA value with predefined constants
//! - [`Layer`], [`Frame`], [`Sprite`]: the document model
//! - [`raster`] and [`Shape`]: grid rasterization of tool gestures
//! - [`render`] and [`export`]: compositing onto a [`Surface`]

pub mod color;
pub mod error;
pub mod export;
pub mod frame;
pub mod import;
pub mod layer;
pub mod raster;
pub mod render;
pub mod shape;
pub mod sprite;
pub mod surface;

// Re-export commonly used types at module level
pub use color::{Color, ColorParseError, DEFAULT_PALETTE};
pub use error::SpriteError;
pub use export::{ExportOptions, flatten_frame, sprite_sheet};
pub use frame::{Direction, Frame};
pub use import::{RgbaImage, SheetLayout};
pub use layer::{Cell, Layer, PixelGrid};
pub use raster::{Point, ShapeOptions};
pub use render::{
    GuideHandle, GuideId, LayerOffset, RenderOptions, RenderOutput, Scene, ViewHelper, render,
};
pub use shape::Shape;
pub use sprite::Sprite;
pub use surface::{PixelSurface, Surface};

#[cfg(feature = "cairo")]
pub use surface::CairoSurface;

// Re-export color constants for public API
#[allow(unused_imports)]
pub use color::{BLACK, BLUE, GREEN, ORANGE, PINK, RED, TRANSPARENT, WHITE, YELLOW};
