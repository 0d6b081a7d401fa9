//! Library exports for the pixelwright sprite engine.
//!
//! Exposes the sprite model, rasterizer, compositor, viewport and input state
//! machine so that front ends (and the headless `pixelwright` binary) share one
//! implementation of every editing operation.

pub mod config;
pub mod draw;
pub mod input;
pub mod playback;
pub mod script;
pub mod util;
pub mod viewport;

pub use config::Config;
