//! Line rendering module
//!
//! Computes the proximity graph and strokes it onto any `DrawingSurface`. The 2D
//! canvas surface is only compiled for the browser.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod graph;
pub mod surface;

pub use graph::{Line, LineSet, ProximityRenderer, opacity, pointer_lines, star_lines};
pub use surface::{DrawingSurface, LineBuffer, Rgba, Stroke};
