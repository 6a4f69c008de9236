#![forbid(unsafe_code)]

//! Render kernel: colors, pixel surfaces, and picture renderers.
//!
//! Hosts with a real canvas draw directly; everything else paints into a
//! [`Surface`](surface::Surface) through [`GridRenderer`](renderer::GridRenderer)
//! and ships or compares the pixels.

pub mod color;
pub mod renderer;
pub mod surface;

pub use color::Rgba;
pub use renderer::{GridRenderer, render_lines, render_text};
pub use surface::Surface;
