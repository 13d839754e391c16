//! The star field aggregate
//!
//! Owns the stars, the viewport, the pointer and the random source, and exposes
//! the handlers the host calls: frame, pointer move and resize. All of them run
//! to completion on the host's single event context.

use glam::Vec2;
use rand_pcg::Pcg32;

use crate::renderer::{DrawingSurface, LineSet, ProximityRenderer};
use crate::settings::Settings;
use crate::sim::{MotionSimulator, Particle, ParticleStore, RandomSource, seeded};
use crate::viewport::Viewport;

/// Last known pointer location in surface pixels
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    /// `None` until the first move. The page script this replaces started the
    /// pointer at (0, 0) and fanned lines into the top-left corner on load;
    /// here no pointer lines are drawn until the pointer has actually moved.
    pub position: Option<Vec2>,
    /// Set on move, cleared after each frame
    pub moved: bool,
}

/// What the marker layer needs to place and animate one star
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerState {
    pub anchor: Vec2,
    pub size: f32,
    pub phase: f32,
    pub twinkle_speed: f32,
    pub twinkle_delay: f32,
    pub twinkle_duration: f32,
    /// Translation from the anchor, in surface pixels
    pub offset: Vec2,
    /// Brightness hint in [0, 1] derived from the phase
    pub opacity: f32,
}

impl MarkerState {
    fn of(particle: &Particle, viewport: &Viewport) -> Self {
        Self {
            anchor: particle.anchor,
            size: particle.size,
            phase: particle.phase,
            twinkle_speed: particle.twinkle_speed,
            twinkle_delay: particle.twinkle_delay,
            twinkle_duration: particle.twinkle_duration,
            offset: particle.screen_offset(viewport),
            opacity: 0.5 + 0.5 * particle.phase.sin(),
        }
    }
}

/// A complete, independently tunable star field
pub struct StarField<R = Pcg32> {
    settings: Settings,
    store: ParticleStore,
    simulator: MotionSimulator,
    renderer: ProximityRenderer,
    viewport: Viewport,
    pointer: PointerState,
    rng: R,
    ticks: u64,
}

impl StarField<Pcg32> {
    /// Seeded field sized for `viewport`
    pub fn new(settings: Settings, viewport: Viewport, seed: u64) -> Self {
        Self::with_rng(settings, viewport, seeded(seed))
    }
}

impl<R: RandomSource> StarField<R> {
    /// Field driven by a caller-supplied random source
    pub fn with_rng(settings: Settings, viewport: Viewport, mut rng: R) -> Self {
        let mut store = ParticleStore::new(settings.spawn.clone(), settings.tiers.clone());
        store.resize_for_width(viewport.width, &mut rng);

        Self {
            simulator: MotionSimulator::new(settings.motion.clone(), &settings.spawn),
            renderer: ProximityRenderer::new(settings.graph.clone()),
            settings,
            store,
            viewport,
            pointer: PointerState::default(),
            rng,
            ticks: 0,
        }
    }

    /// Advance every star by one step
    pub fn tick(&mut self) {
        self.simulator.tick(&mut self.store, &mut self.rng);
        self.ticks += 1;
    }

    /// Clear the surface and draw the line graph; no surface, no drawing
    pub fn render(&self, surface: Option<&mut dyn DrawingSurface>) -> usize {
        self.renderer.render(
            surface,
            self.store.particles(),
            &self.viewport,
            self.pointer.position,
        )
    }

    /// The lines `render` would draw right now
    pub fn lines(&self) -> LineSet {
        self.renderer
            .lines(self.store.particles(), &self.viewport, self.pointer.position)
    }

    /// One scheduler iteration: simulate, draw, reset the move flag
    pub fn frame(&mut self, surface: Option<&mut dyn DrawingSurface>) -> usize {
        self.tick();
        let drawn = self.render(surface);
        self.pointer.moved = false;
        drawn
    }

    /// Record a pointer move and redraw at once with the current star positions
    pub fn on_pointer_move(&mut self, position: Vec2, surface: Option<&mut dyn DrawingSurface>) -> usize {
        self.pointer.position = Some(position);
        self.pointer.moved = true;
        self.render(surface)
    }

    /// Adopt a new viewport; returns true if the star set was recreated
    pub fn on_resize(&mut self, viewport: Viewport) -> bool {
        log::debug!(
            "Viewport resized to {}x{}",
            viewport.width,
            viewport.height
        );
        self.viewport = viewport;
        self.store.resize_for_width(viewport.width, &mut self.rng)
    }

    /// Marker snapshot for every star, in store order
    pub fn markers(&self) -> impl Iterator<Item = MarkerState> + '_ {
        self.store
            .particles()
            .iter()
            .map(|p| MarkerState::of(p, &self.viewport))
    }

    #[cfg(test)]
    pub(crate) fn replace_particles(&mut self, particles: Vec<Particle>) {
        self.store.replace(particles);
    }

    pub fn particles(&self) -> &[Particle] {
        self.store.particles()
    }

    /// Bumped whenever the star set is replaced
    pub fn generation(&self) -> u64 {
        self.store.generation()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::LineBuffer;
    use crate::settings::SpawnSettings;
    use crate::viewport::ResponsiveTiers;

    fn field(width: u32, height: u32) -> StarField {
        StarField::new(Settings::default(), Viewport::new(width, height), 1234)
    }

    fn star_at_pixel(field: &StarField, px: Vec2) -> Particle {
        let vp = field.viewport();
        let mut p = Particle::spawn(&SpawnSettings::default(), &mut seeded(0));
        p.position = px / vp.size() * 100.0;
        p.anchor = p.position;
        p.velocity = Vec2::ZERO;
        p
    }

    #[test]
    fn test_initial_count_follows_tier() {
        assert_eq!(field(500, 800).particles().len(), 50);
        assert_eq!(field(900, 800).particles().len(), 100);
        assert_eq!(field(1920, 1080).particles().len(), 150);
    }

    #[test]
    fn test_resize_across_tier_recreates() {
        let mut f = field(1920, 1080);
        let before = f.particles().to_vec();
        let generation = f.generation();

        assert!(!f.on_resize(Viewport::new(1600, 900)));
        assert_eq!(f.generation(), generation);
        assert_eq!(f.viewport(), Viewport::new(1600, 900));

        assert!(f.on_resize(Viewport::new(900, 900)));
        assert_eq!(f.particles().len(), 100);
        assert_eq!(f.generation(), generation + 1);
        assert!(before.iter().all(|old| !f.particles().contains(old)));
    }

    #[test]
    fn test_no_pointer_lines_before_first_move() {
        let mut f = field(1024, 768);
        f.tick();
        assert!(f.lines().pointer.is_empty());
        assert_eq!(f.pointer(), PointerState::default());
    }

    #[test]
    fn test_pointer_move_redraws_immediately() {
        let mut f = field(1000, 1000);
        let stars = vec![
            star_at_pixel(&f, Vec2::new(100.0, 100.0)),
            star_at_pixel(&f, Vec2::new(900.0, 900.0)),
        ];
        f.replace_particles(stars);

        let mut buf = LineBuffer::new();
        let drawn = f.on_pointer_move(Vec2::new(120.0, 100.0), Some(&mut buf));
        assert_eq!(drawn, 1);
        assert_eq!(buf.strokes.len(), 1);
        assert!((buf.strokes[0].to - Vec2::new(100.0, 100.0)).length() < 1e-3);
        assert!(f.pointer().moved);
        assert_eq!(f.ticks(), 0);
    }

    #[test]
    fn test_pointer_fan_on_synthetic_layout() {
        let mut f = field(2000, 2000);
        let pointer = Vec2::new(1000.0, 1000.0);
        let stars = [
            Vec2::new(200.0, 0.0),
            Vec2::new(0.0, 50.0),
            Vec2::new(-160.0, 0.0),
            Vec2::new(0.0, -140.0),
            Vec2::new(100.0, 0.0),
        ]
        .into_iter()
        .map(|d| star_at_pixel(&f, pointer + d))
        .collect();
        f.replace_particles(stars);
        f.on_pointer_move(pointer, None);

        let fan: Vec<(usize, f32)> = f
            .lines()
            .pointer
            .iter()
            .map(|l| (l.target, l.distance))
            .collect();
        assert_eq!(fan.len(), 3);
        let expected = [(1, 50.0), (4, 100.0), (3, 140.0)];
        for ((target, d), (want_target, want_d)) in fan.iter().zip(expected) {
            assert_eq!(*target, want_target);
            assert!((d - want_d).abs() < 1e-2);
        }
    }

    #[test]
    fn test_frame_ticks_and_resets_move_flag() {
        let mut f = field(1280, 720);
        f.on_pointer_move(Vec2::new(10.0, 10.0), None);
        let mut buf = LineBuffer::new();
        f.frame(Some(&mut buf));
        assert_eq!(f.ticks(), 1);
        assert_eq!(buf.clears, 1);
        assert!(!f.pointer().moved);
        assert_eq!(f.pointer().position, Some(Vec2::new(10.0, 10.0)));
    }

    #[test]
    fn test_render_twice_is_identical() {
        let mut f = field(1920, 1080);
        for _ in 0..30 {
            f.tick();
        }
        f.on_pointer_move(Vec2::new(960.0, 540.0), None);

        let mut a = LineBuffer::new();
        let mut b = LineBuffer::new();
        f.render(Some(&mut a));
        f.render(Some(&mut b));
        assert_eq!(a.strokes, b.strokes);
        assert_eq!(f.lines(), f.lines());
    }

    #[test]
    fn test_same_seed_same_field() {
        let mut a = field(1440, 900);
        let mut b = field(1440, 900);
        for _ in 0..500 {
            a.tick();
            b.tick();
        }
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn test_markers_track_offset() {
        let mut f = StarField::new(
            Settings {
                tiers: ResponsiveTiers::fixed(1),
                ..Default::default()
            },
            Viewport::new(1000, 500),
            9,
        );
        let mut star = star_at_pixel(&f, Vec2::new(500.0, 250.0));
        star.velocity = Vec2::new(1.0, 2.0);
        f.replace_particles(vec![star]);
        f.tick();

        let marker = f.markers().next().unwrap();
        assert!((marker.offset - Vec2::new(10.0, 10.0)).length() < 1e-3);
        assert!((0.0..=1.0).contains(&marker.opacity));
    }
}
