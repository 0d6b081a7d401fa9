//! Error types surfaced by sprite import and unimplemented features.

use thiserror::Error;

/// Failures the sprite model reports to its caller.
///
/// Bounds and structural violations never produce these; they are ignored or
/// rejected in place. Only import of externally decoded data and unavailable
/// features are reported as errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpriteError {
    #[error("image dimensions must be non-zero (got {width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error(
        "pixel buffer holds {actual} bytes, expected {expected} for a {width}x{height} RGBA image"
    )]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error(
        "sprite sheet layout {rows}x{cols} of {cell_width}x{cell_height} cells does not fit a {width}x{height} image"
    )]
    SheetOutOfBounds {
        rows: u32,
        cols: u32,
        cell_width: u32,
        cell_height: u32,
        width: u32,
        height: u32,
    },

    #[error("{0} is not implemented")]
    NotImplemented(&'static str),
}
