//! Per-frame motion step
//!
//! Advances every star by its velocity and re-enters stars that drifted past the
//! margin from a random edge, so visible stars never jump.

use glam::Vec2;

use super::particle::{Particle, ParticleStore, sample_velocity};
use super::rng::RandomSource;
use crate::PERCENT_SPAN;
use crate::settings::{MotionSettings, SpawnSettings};

/// Edge a respawned star enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];

    pub fn pick<R: RandomSource + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.index(Self::ALL.len())]
    }
}

/// Applies motion and the edge-respawn policy to a particle store
#[derive(Debug, Clone)]
pub struct MotionSimulator {
    motion: MotionSettings,
    velocity_max: f32,
}

impl MotionSimulator {
    pub fn new(motion: MotionSettings, spawn: &SpawnSettings) -> Self {
        Self {
            motion,
            velocity_max: spawn.velocity_max,
        }
    }

    /// Advance every star by one tick
    pub fn tick<R: RandomSource + ?Sized>(&self, store: &mut ParticleStore, rng: &mut R) {
        for particle in store.particles_mut() {
            self.step(particle, rng);
        }
    }

    /// Advance one star; returns the entry edge if it respawned
    pub fn step<R: RandomSource + ?Sized>(
        &self,
        particle: &mut Particle,
        rng: &mut R,
    ) -> Option<Edge> {
        particle.phase += self.motion.phase_step * particle.twinkle_speed;
        particle.position += particle.velocity;

        if self.in_bounds(particle.position) {
            return None;
        }

        let edge = Edge::pick(rng);
        self.respawn(particle, edge, rng);
        Some(edge)
    }

    /// True while a position lies within `[-margin, 100 + margin]` on both axes
    #[inline]
    pub fn in_bounds(&self, position: Vec2) -> bool {
        let lo = -self.motion.margin;
        let hi = PERCENT_SPAN + self.motion.margin;
        (lo..=hi).contains(&position.x) && (lo..=hi).contains(&position.y)
    }

    /// Place a star just outside `edge` and give it a fresh velocity.
    ///
    /// Draw order: orthogonal coordinate, velocity x, velocity y.
    pub fn respawn<R: RandomSource + ?Sized>(&self, particle: &mut Particle, edge: Edge, rng: &mut R) {
        let offset = self.motion.respawn_offset;
        let along = rng.unit() * PERCENT_SPAN;

        particle.position = match edge {
            Edge::Top => Vec2::new(along, -offset),
            Edge::Right => Vec2::new(PERCENT_SPAN + offset, along),
            Edge::Bottom => Vec2::new(along, PERCENT_SPAN + offset),
            Edge::Left => Vec2::new(-offset, along),
        };
        particle.velocity = sample_velocity(self.velocity_max, rng);
    }
}
