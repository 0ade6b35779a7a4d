//! Rang Render Library
//!
//! Stroke painting for Rang. The drawing surface is a tiny-skia pixmap, so
//! replaying the same log always yields the same pixels.

mod renderer;
mod surface;

pub use renderer::{RenderResult, RendererError, StrokeRenderer};
pub use surface::{DEFAULT_BACKGROUND, RasterImage, Surface};
