//! Drawing-surface dimensions and responsive star-count tiers

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::PERCENT_SPAN;
use crate::consts::{DEFAULT_STAR_COUNT, TIER_BREAKPOINTS};

/// Current drawing-surface size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Map a percentage-space point to surface pixels
    #[inline]
    pub fn to_screen(&self, percent: Vec2) -> Vec2 {
        percent / PERCENT_SPAN * self.size()
    }
}

/// Star count per viewport width band
///
/// `breakpoints` are `(max_width_exclusive, count)` pairs checked in ascending
/// width order; widths past the last breakpoint get `fallback`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponsiveTiers {
    pub breakpoints: Vec<(u32, usize)>,
    pub fallback: usize,
}

impl Default for ResponsiveTiers {
    fn default() -> Self {
        Self {
            breakpoints: TIER_BREAKPOINTS.to_vec(),
            fallback: DEFAULT_STAR_COUNT,
        }
    }
}

impl ResponsiveTiers {
    /// A single tier: every width gets `count` stars
    pub fn fixed(count: usize) -> Self {
        Self {
            breakpoints: Vec::new(),
            fallback: count,
        }
    }

    /// Star count for a viewport width
    pub fn tier_for(&self, width: u32) -> usize {
        let mut sorted: Vec<_> = self.breakpoints.iter().collect();
        sorted.sort_by_key(|(max_width, _)| *max_width);
        sorted
            .into_iter()
            .find(|(max_width, _)| width < *max_width)
            .map(|(_, count)| *count)
            .unwrap_or(self.fallback)
    }
}
