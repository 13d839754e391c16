//! Star simulation module
//!
//! Everything that moves lives here. This module must stay deterministic for a
//! given random source:
//! - One step per frame, no wall-clock time
//! - Randomness only through `RandomSource`
//! - Stable iteration order (store order)
//! - No rendering or platform dependencies

pub mod particle;
pub mod rng;
pub mod tick;

pub use particle::{Particle, ParticleStore, sample_velocity};
pub use rng::{RandomSource, seeded};
pub use tick::{Edge, MotionSimulator};
