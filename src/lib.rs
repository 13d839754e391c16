//! Star Field - an animated, drifting star background
//!
//! Core modules:
//! - `sim`: Particle store and motion simulation (seeded RNG, fixed per-frame steps)
//! - `renderer`: Proximity line graph and the drawing-surface seam
//! - `field`: The aggregate tying particles, pointer and viewport together
//! - `scheduler`: Frame loop lifecycle (start/stop with a cancellation token)
//! - `platform`: Browser wiring (canvas, markers, listeners, animation frames)
//! - `settings`: Data-driven tuning
//! - `viewport`: Surface size and responsive star-count tiers

pub mod field;
pub mod platform;
pub mod renderer;
pub mod scheduler;
pub mod settings;
pub mod sim;
pub mod viewport;

pub use field::{MarkerState, PointerState, StarField};
pub use renderer::{DrawingSurface, LineBuffer, ProximityRenderer, Rgba};
pub use scheduler::{FrameScheduler, StopHandle};
pub use settings::Settings;
pub use viewport::{ResponsiveTiers, Viewport};

/// Default tuning constants
pub mod consts {
    /// Star count used when no responsive tier applies
    pub const DEFAULT_STAR_COUNT: usize = 150;

    /// Star size range (pixels) before the multiplier is applied
    pub const STAR_SIZE_MIN: f32 = 1.0;
    pub const STAR_SIZE_BASE: f32 = 3.0;
    pub const STAR_SIZE_MULTIPLIER: f32 = 1.2;

    /// Twinkle speed range (multiplier on the phase step)
    pub const TWINKLE_SPEED_MIN: f32 = 1.0;
    pub const TWINKLE_SPEED_MAX: f32 = 2.0;
    /// Phase advance per tick before the twinkle speed multiplier
    pub const PHASE_INCREMENT: f32 = 0.02;

    /// CSS twinkle animation timing (seconds)
    pub const TWINKLE_DELAY_MAX: f32 = 4.0;
    pub const TWINKLE_DURATION_MIN: f32 = 2.0;
    pub const TWINKLE_DURATION_SPAN: f32 = 3.0;

    /// Full velocity span per axis (percent per tick); samples lie in ±VELOCITY_MAX/2
    pub const VELOCITY_MAX: f32 = 0.05;

    /// Distance past the visible range (percent) before a star respawns
    pub const MARGIN_BUFFER: f32 = 10.0;
    /// Distance outside the chosen edge (percent) where a star re-enters
    pub const RESPAWN_MARGIN: f32 = 5.0;

    /// Outgoing star-to-star lines per star per frame
    pub const MAX_CONNECTIONS: usize = 2;
    /// Star-to-star line cutoff (pixels)
    pub const CONNECTION_DISTANCE_MAX: f32 = 200.0;
    /// Pointer-to-star line cutoff (pixels)
    pub const MOUSE_CONNECTION_DISTANCE: f32 = 150.0;
    /// Pointer lines per frame
    pub const MOUSE_CONNECTIONS_MAX: usize = 3;

    /// Line stroke width (pixels)
    pub const LINE_WIDTH: f32 = 0.5;
    /// Line color (RGB)
    pub const LINE_COLOR: [u8; 3] = [255, 255, 255];

    /// Responsive tiers: (exclusive max viewport width, star count)
    pub const TIER_BREAKPOINTS: [(u32, usize); 2] = [(768, 50), (1024, 100)];
}

/// Upper end of percentage space
pub const PERCENT_SPAN: f32 = 100.0;
