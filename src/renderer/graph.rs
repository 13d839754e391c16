//! Proximity line graph
//!
//! Two line sets are rebuilt from scratch every frame:
//!
//! - Star lines: each star, in store order, scans only the stars after it and
//!   stops after `max_connections` hits. A star that already spent its budget is
//!   never revisited, so the graph is directed and order-dependent. This is the
//!   intended look; symmetrizing it would change which lines appear.
//! - Pointer lines: the `mouse_max` nearest stars under `mouse_distance`,
//!   nearest first.

use glam::Vec2;

use super::surface::{DrawingSurface, Rgba};
use crate::settings::GraphSettings;
use crate::sim::Particle;
use crate::viewport::Viewport;

/// Line opacity for a distance against its cutoff, clamped at zero
#[inline]
pub fn opacity(distance: f32, max_distance: f32) -> f32 {
    (1.0 - distance / max_distance).max(0.0)
}

/// A line to draw, in surface pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub from: Vec2,
    pub to: Vec2,
    /// Source star index; `None` for pointer lines
    pub source: Option<usize>,
    /// Target star index
    pub target: usize,
    pub distance: f32,
    pub opacity: f32,
}

/// Everything drawn in one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineSet {
    pub stars: Vec<Line>,
    pub pointer: Vec<Line>,
}

impl LineSet {
    pub fn len(&self) -> usize {
        self.stars.len() + self.pointer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Line> {
        self.stars.iter().chain(self.pointer.iter())
    }
}

/// Degree-capped, forward-only neighbor lines between star positions
pub fn star_lines(points: &[Vec2], max_connections: usize, max_distance: f32) -> Vec<Line> {
    let mut lines = Vec::new();
    if max_connections == 0 {
        return lines;
    }
    let max_sq = max_distance * max_distance;

    for (i, &a) in points.iter().enumerate() {
        let mut connections = 0;
        for (j, &b) in points.iter().enumerate().skip(i + 1) {
            if connections >= max_connections {
                break;
            }
            let dist_sq = a.distance_squared(b);
            if dist_sq >= max_sq {
                continue;
            }
            let distance = dist_sq.sqrt();
            lines.push(Line {
                from: a,
                to: b,
                source: Some(i),
                target: j,
                distance,
                opacity: opacity(distance, max_distance),
            });
            connections += 1;
        }
    }

    lines
}

/// Lines from the pointer to its nearest stars under the cutoff, nearest first
pub fn pointer_lines(pointer: Vec2, points: &[Vec2], max_lines: usize, max_distance: f32) -> Vec<Line> {
    let mut near: Vec<(usize, f32)> = points
        .iter()
        .enumerate()
        .map(|(i, p)| (i, pointer.distance(*p)))
        .filter(|(_, d)| *d < max_distance)
        .collect();
    // Stable sort: equal distances keep store order
    near.sort_by(|a, b| a.1.total_cmp(&b.1));
    near.truncate(max_lines);

    near.into_iter()
        .map(|(i, distance)| Line {
            from: pointer,
            to: points[i],
            source: None,
            target: i,
            distance,
            opacity: opacity(distance, max_distance),
        })
        .collect()
}

/// Draws the star and pointer graphs onto a surface
#[derive(Debug, Clone)]
pub struct ProximityRenderer {
    graph: GraphSettings,
}

impl ProximityRenderer {
    pub fn new(graph: GraphSettings) -> Self {
        Self { graph }
    }

    pub fn settings(&self) -> &GraphSettings {
        &self.graph
    }

    /// Compute both line sets for the current star positions
    pub fn lines(&self, particles: &[Particle], viewport: &Viewport, pointer: Option<Vec2>) -> LineSet {
        let points: Vec<Vec2> = particles
            .iter()
            .map(|p| p.screen_position(viewport))
            .collect();

        let stars = star_lines(&points, self.graph.max_connections, self.graph.connection_distance);
        let pointer = pointer
            .map(|at| pointer_lines(at, &points, self.graph.mouse_max, self.graph.mouse_distance))
            .unwrap_or_default();

        LineSet { stars, pointer }
    }

    /// Clear the surface and draw the current graph.
    ///
    /// Returns the number of lines drawn; no surface means nothing is drawn.
    pub fn render(
        &self,
        surface: Option<&mut dyn DrawingSurface>,
        particles: &[Particle],
        viewport: &Viewport,
        pointer: Option<Vec2>,
    ) -> usize {
        let Some(surface) = surface else {
            return 0;
        };

        let size = viewport.size();
        surface.clear(size.x, size.y);

        let lines = self.lines(particles, viewport, pointer);
        for line in lines.iter() {
            let color = Rgba::from_rgb(self.graph.line_color, line.opacity);
            surface.stroke_line(line.from, line.to, color, self.graph.line_width);
        }
        lines.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::LineBuffer;
    use crate::settings::SpawnSettings;
    use crate::sim::seeded;
    use proptest::prelude::*;

    #[test]
    fn test_opacity() {
        assert_eq!(opacity(0.0, 200.0), 1.0);
        assert_eq!(opacity(200.0, 200.0), 0.0);
        assert_eq!(opacity(300.0, 200.0), 0.0);
        assert!((opacity(50.0, 200.0) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_pointer_picks_nearest_under_cutoff() {
        let pointer = Vec2::new(500.0, 500.0);
        // Shuffled so sorting matters
        let points = [
            pointer + Vec2::new(160.0, 0.0),
            pointer + Vec2::new(0.0, 100.0),
            pointer + Vec2::new(-200.0, 0.0),
            pointer + Vec2::new(0.0, -50.0),
            pointer + Vec2::new(140.0, 0.0),
        ];

        let lines = pointer_lines(pointer, &points, 3, 150.0);
        let distances: Vec<f32> = lines.iter().map(|l| l.distance).collect();
        assert_eq!(distances, vec![50.0, 100.0, 140.0]);
        let targets: Vec<usize> = lines.iter().map(|l| l.target).collect();
        assert_eq!(targets, vec![3, 1, 4]);
        assert!(lines.iter().all(|l| l.from == pointer && l.source.is_none()));
        assert!((lines[0].opacity - (1.0 - 50.0 / 150.0)).abs() < 1e-6);
    }

    #[test]
    fn test_pointer_fewer_than_max() {
        let points = [Vec2::new(10.0, 0.0), Vec2::new(1000.0, 0.0)];
        let lines = pointer_lines(Vec2::ZERO, &points, 3, 150.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].target, 0);
    }

    #[test]
    fn test_star_lines_forward_scan_only() {
        // Four stars in a row, 10px apart
        let points: Vec<Vec2> = (0..4).map(|i| Vec2::new(i as f32 * 10.0, 0.0)).collect();
        let lines = star_lines(&points, 2, 200.0);
        let pairs: Vec<(usize, usize)> = lines.iter().map(|l| (l.source.unwrap(), l.target)).collect();
        // Star 3 has nobody after it; star 2 only has star 3
        assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 2), (1, 3), (2, 3)]);
    }

    #[test]
    fn test_star_lines_cap_is_outgoing_only() {
        // Star 0 is far from everybody; stars 1..=4 cluster together
        let points = [
            Vec2::new(1000.0, 1000.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(3.0, 0.0),
        ];
        let lines = star_lines(&points, 1, 200.0);
        let pairs: Vec<(usize, usize)> = lines.iter().map(|l| (l.source.unwrap(), l.target)).collect();
        // Star 2 receives a line from 1 and still sends its own to 3
        assert_eq!(pairs, vec![(1, 2), (2, 3), (3, 4)]);
    }

    #[test]
    fn test_star_lines_skip_far_pairs_without_spending_budget() {
        let points = [Vec2::ZERO, Vec2::new(500.0, 0.0), Vec2::new(100.0, 0.0)];
        let lines = star_lines(&points, 1, 200.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].target, 2);
        assert!((lines[0].opacity - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_zero_connections() {
        let points = [Vec2::ZERO, Vec2::ONE];
        assert!(star_lines(&points, 0, 200.0).is_empty());
    }

    #[test]
    fn test_render_without_surface_is_noop() {
        let renderer = ProximityRenderer::new(GraphSettings::default());
        let mut rng = seeded(1);
        let stars: Vec<Particle> = (0..10)
            .map(|_| Particle::spawn(&SpawnSettings::default(), &mut rng))
            .collect();
        let drawn = renderer.render(None, &stars, &Viewport::new(800, 600), Some(Vec2::ZERO));
        assert_eq!(drawn, 0);
    }

    #[test]
    fn test_render_strokes_match_lines() {
        let renderer = ProximityRenderer::new(GraphSettings::default());
        let mut rng = seeded(11);
        let stars: Vec<Particle> = (0..60)
            .map(|_| Particle::spawn(&SpawnSettings::default(), &mut rng))
            .collect();
        let vp = Viewport::new(1280, 720);
        let pointer = Some(Vec2::new(640.0, 360.0));

        let mut buf = LineBuffer::new();
        let drawn = renderer.render(Some(&mut buf), &stars, &vp, pointer);
        let lines = renderer.lines(&stars, &vp, pointer);

        assert_eq!(drawn, lines.len());
        assert_eq!(buf.strokes.len(), lines.len());
        assert_eq!(buf.cleared, Vec2::new(1280.0, 720.0));
        for (stroke, line) in buf.strokes.iter().zip(lines.iter()) {
            assert_eq!(stroke.from, line.from);
            assert_eq!(stroke.to, line.to);
            assert_eq!(stroke.width, 0.5);
            assert_eq!(stroke.color, Rgba::new(255, 255, 255, line.opacity));
        }
    }

    #[test]
    fn test_render_is_idempotent() {
        let renderer = ProximityRenderer::new(GraphSettings::default());
        let mut rng = seeded(21);
        let stars: Vec<Particle> = (0..150)
            .map(|_| Particle::spawn(&SpawnSettings::default(), &mut rng))
            .collect();
        let vp = Viewport::new(1920, 1080);
        let pointer = Some(Vec2::new(300.0, 200.0));

        let mut first = LineBuffer::new();
        let mut second = LineBuffer::new();
        renderer.render(Some(&mut first), &stars, &vp, pointer);
        renderer.render(Some(&mut second), &stars, &vp, pointer);
        assert_eq!(first.strokes, second.strokes);
    }

    proptest! {
        #[test]
        fn prop_degree_cap_holds(
            coords in prop::collection::vec((0.0f32..400.0, 0.0f32..400.0), 0..80),
            cap in 0usize..5,
        ) {
            let points: Vec<Vec2> = coords.iter().map(|&(x, y)| Vec2::new(x, y)).collect();
            let lines = star_lines(&points, cap, 200.0);
            let mut outgoing = vec![0usize; points.len()];
            for line in &lines {
                let src = line.source.unwrap();
                prop_assert!(src < line.target);
                prop_assert!(line.distance < 200.0);
                prop_assert!(line.opacity > 0.0 && line.opacity <= 1.0);
                outgoing[src] += 1;
            }
            prop_assert!(outgoing.iter().all(|&n| n <= cap));
        }

        #[test]
        fn prop_pointer_lines_sorted_and_bounded(
            coords in prop::collection::vec((0.0f32..600.0, 0.0f32..600.0), 0..80),
            px in 0.0f32..600.0,
            py in 0.0f32..600.0,
        ) {
            let points: Vec<Vec2> = coords.iter().map(|&(x, y)| Vec2::new(x, y)).collect();
            let pointer = Vec2::new(px, py);
            let lines = pointer_lines(pointer, &points, 3, 150.0);
            prop_assert!(lines.len() <= 3);
            prop_assert!(lines.windows(2).all(|w| w[0].distance <= w[1].distance));
            // Nothing left out was closer than the farthest kept line
            if lines.len() == 3 {
                let kept_max = lines[2].distance;
                let closer = points
                    .iter()
                    .filter(|p| pointer.distance(**p) < kept_max)
                    .count();
                prop_assert!(closer <= 2);
            }
        }
    }
}
