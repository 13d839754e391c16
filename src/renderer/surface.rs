//! Drawing-surface seam
//!
//! The renderer only needs two primitives: clear a region and stroke a line.
//! Origin is top-left, +x right, +y down, in surface pixels.

use glam::Vec2;

/// 8-bit RGB with a float alpha, the way 2D canvas styles are written
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn from_rgb(rgb: [u8; 3], a: f32) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2], a)
    }

    /// CSS color string, e.g. `rgba(255, 255, 255, 0.5)`
    pub fn css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Anything lines can be drawn onto
pub trait DrawingSurface {
    /// Clear the `width` x `height` region at the origin
    fn clear(&mut self, width: f32, height: f32);

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Rgba, width: f32);
}

/// One recorded `stroke_line` call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub from: Vec2,
    pub to: Vec2,
    pub color: Rgba,
    pub width: f32,
}

/// In-memory surface holding the strokes since the last clear
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineBuffer {
    pub strokes: Vec<Stroke>,
    /// Strokes recorded across every clear
    pub stroked: u64,
    /// Number of clears seen
    pub clears: u64,
    /// Size of the last cleared region
    pub cleared: Vec2,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DrawingSurface for LineBuffer {
    fn clear(&mut self, width: f32, height: f32) {
        self.strokes.clear();
        self.clears += 1;
        self.cleared = Vec2::new(width, height);
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Rgba, width: f32) {
        self.stroked += 1;
        self.strokes.push(Stroke {
            from,
            to,
            color,
            width,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css() {
        assert_eq!(Rgba::new(255, 255, 255, 0.5).css(), "rgba(255, 255, 255, 0.5)");
        assert_eq!(Rgba::from_rgb([1, 2, 3], 1.0).css(), "rgba(1, 2, 3, 1)");
    }

    #[test]
    fn test_line_buffer_clear_drops_strokes() {
        let mut buf = LineBuffer::new();
        let white = Rgba::new(255, 255, 255, 1.0);
        buf.stroke_line(Vec2::ZERO, Vec2::ONE, white, 0.5);
        assert_eq!(buf.strokes.len(), 1);
        buf.clear(10.0, 20.0);
        assert!(buf.strokes.is_empty());
        assert_eq!(buf.stroked, 1);
        assert_eq!(buf.clears, 1);
        assert_eq!(buf.cleared, Vec2::new(10.0, 20.0));
    }
}
