//! 2D canvas drawing surface

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::surface::{DrawingSurface, Rgba};

impl DrawingSurface for CanvasRenderingContext2d {
    fn clear(&mut self, width: f32, height: f32) {
        self.clear_rect(0.0, 0.0, width as f64, height as f64);
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Rgba, width: f32) {
        self.set_stroke_style_str(&color.css());
        self.set_line_width(width as f64);
        self.begin_path();
        self.move_to(from.x as f64, from.y as f64);
        self.line_to(to.x as f64, to.y as f64);
        self.stroke();
    }
}

/// Fetch the 2D context of a canvas, if the browser hands one out
pub fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
}
