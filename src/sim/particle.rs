//! Star state and the particle store
//!
//! Positions live in percentage space (0-100 on both axes) so the field survives
//! viewport resizes without touching any star.

use std::f32::consts::TAU;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rng::RandomSource;
use crate::PERCENT_SPAN;
use crate::settings::SpawnSettings;
use crate::viewport::{ResponsiveTiers, Viewport};

/// A single star
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// Percentage-space origin, fixed at creation
    pub anchor: Vec2,
    /// Marker size (pixels)
    pub size: f32,
    /// Twinkle oscillator phase (radians, unbounded)
    pub phase: f32,
    pub twinkle_speed: f32,
    /// CSS animation delay (seconds)
    pub twinkle_delay: f32,
    /// CSS animation duration (seconds)
    pub twinkle_duration: f32,
    /// Current percentage-space location
    pub position: Vec2,
    /// Percentage-space displacement per tick
    pub velocity: Vec2,
}

impl Particle {
    /// Create a star with uniformly random attributes.
    ///
    /// Draw order: size, anchor x, anchor y, delay, duration, twinkle speed,
    /// phase, velocity x, velocity y.
    pub fn spawn<R: RandomSource + ?Sized>(spawn: &SpawnSettings, rng: &mut R) -> Self {
        let size = rng.range(spawn.size_min, spawn.size_base) * spawn.size_multiplier;
        let anchor = Vec2::new(rng.unit() * PERCENT_SPAN, rng.unit() * PERCENT_SPAN);
        let twinkle_delay = rng.unit() * spawn.twinkle_delay_max;
        let twinkle_duration = rng.unit() * spawn.twinkle_duration_span + spawn.twinkle_duration_min;
        let twinkle_speed = rng.range(spawn.twinkle_speed_min, spawn.twinkle_speed_max);
        let phase = rng.unit() * TAU;
        let velocity = sample_velocity(spawn.velocity_max, rng);

        Self {
            anchor,
            size,
            phase,
            twinkle_speed,
            twinkle_delay,
            twinkle_duration,
            position: anchor,
            velocity,
        }
    }

    /// Current location in surface pixels
    #[inline]
    pub fn screen_position(&self, viewport: &Viewport) -> Vec2 {
        viewport.to_screen(self.position)
    }

    /// Translation from the anchor to the current location, in surface pixels
    #[inline]
    pub fn screen_offset(&self, viewport: &Viewport) -> Vec2 {
        viewport.to_screen(self.position - self.anchor)
    }
}

/// Per-axis velocity uniform in `[-velocity_max/2, velocity_max/2)`
pub fn sample_velocity<R: RandomSource + ?Sized>(velocity_max: f32, rng: &mut R) -> Vec2 {
    let vx = (rng.unit() - 0.5) * velocity_max;
    let vy = (rng.unit() - 0.5) * velocity_max;
    Vec2::new(vx, vy)
}

/// Owns every star in the field
#[derive(Debug, Clone)]
pub struct ParticleStore {
    particles: Vec<Particle>,
    spawn: SpawnSettings,
    tiers: ResponsiveTiers,
    /// Bumped every time the whole set is replaced
    generation: u64,
}

impl ParticleStore {
    pub fn new(spawn: SpawnSettings, tiers: ResponsiveTiers) -> Self {
        Self {
            particles: Vec::new(),
            spawn,
            tiers,
            generation: 0,
        }
    }

    /// Replace the whole set with `count` fresh stars.
    ///
    /// The new set is built before it is swapped in, so readers never observe a
    /// partially populated store.
    pub fn create<R: RandomSource + ?Sized>(&mut self, count: usize, rng: &mut R) {
        let fresh: Vec<Particle> = (0..count)
            .map(|_| Particle::spawn(&self.spawn, rng))
            .collect();
        self.particles = fresh;
        self.generation += 1;
    }

    /// Star count for a viewport width
    #[inline]
    pub fn tier_for(&self, width: u32) -> usize {
        self.tiers.tier_for(width)
    }

    /// Recreate the set if `width` falls in a different tier.
    ///
    /// Returns true when the set was replaced.
    pub fn resize_for_width<R: RandomSource + ?Sized>(&mut self, width: u32, rng: &mut R) -> bool {
        let count = self.tier_for(width);
        if count == self.particles.len() && self.generation > 0 {
            return false;
        }
        log::debug!(
            "Star tier change: {} -> {} stars (width {})",
            self.particles.len(),
            count,
            width
        );
        self.create(count, rng);
        true
    }

    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[inline]
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Overwrite the set with hand-placed stars
    #[cfg(test)]
    pub(crate) fn replace(&mut self, particles: Vec<Particle>) {
        self.particles = particles;
        self.generation += 1;
    }
}
