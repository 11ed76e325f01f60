//! Convex polygon geometry for collision
//!
//! A polygon is a closed loop of local-space points plus a world position.
//! Consecutive points (and last -> first) form the edges.
//!
//! Winding: surface vectors reported by [`Polygon::swept_intersect`] run
//! against the struck edge (`start - end`), and the surface normal is that
//! vector rotated +90°. With +Y pointing down the screen, listing vertices
//! clockwise on screen therefore yields normals pointing *out* of the polygon;
//! counter-clockwise yields normals pointing in. Reflection does not care about
//! the sign, but every shape in the game is authored clockwise.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::error::{SimError, SimResult};
use crate::perp;

/// Parametrized-line denominators below this magnitude are treated as parallel
pub const PARALLEL_EPSILON: f32 = 1e-6;

/// Squared lengths below this are degenerate (zero-length edge or motion)
pub const DEGENERATE_EPSILON: f32 = 1e-12;

/// Result of a swept intersection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionResult {
    /// Unit direction of the struck edge
    surface: Vec2,
    /// Travel along the motion vector before contact
    distance: f32,
}

impl IntersectionResult {
    /// Build a result from a (not necessarily normalized) surface vector
    pub fn new(surface: Vec2, distance: f32) -> Self {
        Self {
            surface: surface.normalize_or_zero(),
            distance,
        }
    }

    /// Normalized surface (edge) direction
    #[inline]
    pub fn surface(&self) -> Vec2 {
        self.surface
    }

    /// Surface normal: the surface direction rotated +90°
    #[inline]
    pub fn normal(&self) -> Vec2 {
        perp(self.surface)
    }

    /// Distance travelled along the motion before contact
    #[inline]
    pub fn distance(&self) -> f32 {
        self.distance
    }
}

/// Solve `a + t*b = c + u*d` for `(t, u)`.
///
/// Returns `None` for zero-length `b`/`d` or (near-)parallel lines; the caller
/// never sees a non-finite parameter.
pub fn solve_lines(a: Vec2, b: Vec2, c: Vec2, d: Vec2) -> Option<(f32, f32)> {
    if b.length_squared() < DEGENERATE_EPSILON || d.length_squared() < DEGENERATE_EPSILON {
        return None;
    }
    let denom = perp(d).dot(b);
    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }
    let ac = c - a;
    let t = perp(d).dot(ac) / denom;
    let u = perp(b).dot(ac) / denom;
    Some((t, u))
}

#[inline]
fn in_unit_range(v: f32) -> bool {
    (0.0..=1.0).contains(&v)
}

/// A convex polygon with a world-space position
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polygon {
    /// Local-space vertices
    points: Vec<Vec2>,
    /// World-space offset applied to every vertex
    pub position: Vec2,
}

impl Polygon {
    pub fn new(points: Vec<Vec2>, position: Vec2) -> Self {
        Self { points, position }
    }

    /// Axis-aligned rectangle centred on `position`, wound clockwise on screen
    pub fn rectangle(width: f32, height: f32, position: Vec2) -> Self {
        let hw = width / 2.0;
        let hh = height / 2.0;
        Self::new(
            vec![
                Vec2::new(-hw, -hh),
                Vec2::new(hw, -hh),
                Vec2::new(hw, hh),
                Vec2::new(-hw, hh),
            ],
            position,
        )
    }

    /// A single vertex; sweeps as a ray, never overlaps statically
    pub fn point(position: Vec2) -> Self {
        Self::new(vec![Vec2::ZERO], position)
    }

    /// A two-vertex polygon (a thin wall segment between world points)
    pub fn segment(a: Vec2, b: Vec2) -> Self {
        Self::new(vec![a, b], Vec2::ZERO)
    }

    /// Local-space vertices
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// World-space vertices (local point + position)
    pub fn world_points(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.points.iter().map(move |p| *p + self.position)
    }

    /// World-space edges as `(start, end)` pairs, closing the loop
    pub fn edges(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| {
            (
                self.points[i] + self.position,
                self.points[(i + 1) % n] + self.position,
            )
        })
    }

    /// Mean of the world-space vertices
    pub fn centroid(&self) -> Vec2 {
        if self.points.is_empty() {
            return self.position;
        }
        self.world_points().sum::<Vec2>() / self.points.len() as f32
    }

    #[inline]
    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    /// Check the polygon can act as a collision boundary: at least two
    /// points and no zero-length edge.
    pub fn require_edges(&self) -> SimResult<()> {
        if self.points.len() < 2 {
            return Err(SimError::DegenerateGeometry);
        }
        if self
            .edges()
            .any(|(a, b)| (b - a).length_squared() < DEGENERATE_EPSILON)
        {
            return Err(SimError::DegenerateGeometry);
        }
        Ok(())
    }

    /// Static overlap test: true if any edge of `self` crosses any edge of `other`.
    ///
    /// A polygon strictly contained in the other has no crossing edges and
    /// reports `false`.
    pub fn overlaps(&self, other: &Polygon) -> bool {
        for (a, b) in self.edges() {
            for (c, d) in other.edges() {
                if let Some((t, u)) = solve_lines(a, b - a, c, d - c) {
                    if in_unit_range(t) && in_unit_range(u) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Swept test: moving `self` by `motion`, where does it first strike `other`?
    ///
    /// Only the vertices of `self` are swept (as rays `v -> v + motion`) against
    /// the edges of `other`, so a thin feature of `other` passing between two
    /// vertices of `self` is not detected.
    pub fn swept_intersect(&self, motion: Vec2, other: &Polygon) -> Option<IntersectionResult> {
        if motion.length_squared() < DEGENERATE_EPSILON {
            return None;
        }

        let mut min_reach = 1.0;
        let mut surface = None;

        for a in self.world_points() {
            for (c, d) in other.edges() {
                let Some((t, u)) = solve_lines(a, motion, c, d - c) else {
                    continue;
                };
                if in_unit_range(t) && in_unit_range(u) && t <= min_reach {
                    min_reach = t;
                    surface = Some(c - d);
                }
            }
        }

        surface.map(|s| IntersectionResult::new(s, motion.length() * min_reach))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn regular_polygon(sides: usize, radius: f32, position: Vec2) -> Polygon {
        let points = (0..sides)
            .map(|i| {
                let theta = i as f32 / sides as f32 * std::f32::consts::TAU;
                Vec2::new(theta.cos(), theta.sin()) * radius
            })
            .collect();
        Polygon::new(points, position)
    }

    #[test]
    fn test_unit_squares_overlap() {
        let a = Polygon::rectangle(1.0, 1.0, Vec2::ZERO);
        let b = Polygon::rectangle(1.0, 1.0, Vec2::new(0.5, 0.5));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_distant_squares_do_not_overlap() {
        let a = Polygon::rectangle(1.0, 1.0, Vec2::ZERO);
        let b = Polygon::rectangle(1.0, 1.0, Vec2::new(2.0, 2.0));
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_point_sweep_against_vertical_wall() {
        let mover = Polygon::point(Vec2::ZERO);
        let wall = Polygon::segment(Vec2::new(5.0, -5.0), Vec2::new(5.0, 5.0));

        let hit = mover
            .swept_intersect(Vec2::new(10.0, 0.0), &wall)
            .expect("ray crosses the wall");
        assert!((hit.distance() - 5.0).abs() < 1e-5);
        // Normal must be perpendicular to the vertical wall, i.e. along X
        assert!((hit.normal().x.abs() - 1.0).abs() < 1e-5);
        assert!(hit.normal().y.abs() < 1e-5);
        assert!((hit.surface().y.abs() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_sweep_short_of_wall_misses() {
        let mover = Polygon::point(Vec2::ZERO);
        let wall = Polygon::segment(Vec2::new(5.0, -5.0), Vec2::new(5.0, 5.0));
        assert!(mover.swept_intersect(Vec2::new(4.0, 0.0), &wall).is_none());
    }

    #[test]
    fn test_sweep_picks_nearest_edge() {
        let mover = Polygon::rectangle(2.0, 2.0, Vec2::ZERO);
        let near = Polygon::rectangle(2.0, 20.0, Vec2::new(5.0, 0.0));
        let hit = mover
            .swept_intersect(Vec2::new(20.0, 0.0), &near)
            .expect("box in the way");
        // Right vertices start at x=1, box's left face is at x=4
        assert!((hit.distance() - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_zero_motion_is_no_intersection() {
        let mover = Polygon::rectangle(2.0, 2.0, Vec2::ZERO);
        let wall = Polygon::rectangle(2.0, 2.0, Vec2::new(0.5, 0.0));
        assert!(mover.swept_intersect(Vec2::ZERO, &wall).is_none());
    }

    #[test]
    fn test_degenerate_edges_are_skipped() {
        // Duplicate vertex makes a zero-length edge
        let wall = Polygon::new(
            vec![Vec2::new(5.0, -5.0), Vec2::new(5.0, -5.0), Vec2::new(5.0, 5.0)],
            Vec2::ZERO,
        );
        let mover = Polygon::point(Vec2::ZERO);
        let hit = mover.swept_intersect(Vec2::new(10.0, 0.0), &wall);
        assert!(hit.is_some_and(|h| h.distance().is_finite()));

        let dot = Polygon::point(Vec2::ZERO);
        assert!(!dot.overlaps(&Polygon::point(Vec2::ZERO)));
    }

    #[test]
    fn test_require_edges() {
        assert!(Polygon::rectangle(2.0, 2.0, Vec2::ZERO).require_edges().is_ok());
        assert!(Polygon::segment(Vec2::ZERO, Vec2::X).require_edges().is_ok());
        assert_eq!(
            Polygon::point(Vec2::ZERO).require_edges(),
            Err(SimError::DegenerateGeometry)
        );
        let doubled = Polygon::new(vec![Vec2::ZERO, Vec2::ZERO, Vec2::Y], Vec2::ZERO);
        assert_eq!(doubled.require_edges(), Err(SimError::DegenerateGeometry));
    }

    #[test]
    fn test_parallel_edges_guarded() {
        assert!(solve_lines(Vec2::ZERO, Vec2::X, Vec2::Y, Vec2::X).is_none());
        assert!(solve_lines(Vec2::ZERO, Vec2::ZERO, Vec2::Y, Vec2::X).is_none());
    }

    #[test]
    fn test_centroid_and_translate() {
        let mut square = Polygon::rectangle(4.0, 4.0, Vec2::new(1.0, 1.0));
        assert!((square.centroid() - Vec2::new(1.0, 1.0)).length() < 1e-6);
        square.translate(Vec2::new(2.0, -1.0));
        assert_eq!(square.position, Vec2::new(3.0, 0.0));
    }

    proptest! {
        #[test]
        fn prop_separated_polygons_never_overlap(
            sides_a in 3usize..9,
            sides_b in 3usize..9,
            ra in 0.5f32..50.0,
            rb in 0.5f32..50.0,
            angle in 0.0f32..std::f32::consts::TAU,
            gap in 0.01f32..100.0,
        ) {
            let a = regular_polygon(sides_a, ra, Vec2::ZERO);
            // Bounding circles are disjoint, so every axis separates the shapes
            let offset = Vec2::new(angle.cos(), angle.sin()) * (ra + rb + gap);
            let b = regular_polygon(sides_b, rb, offset);
            prop_assert!(!a.overlaps(&b));
        }

        #[test]
        fn prop_zero_motion_never_hits(
            sides_a in 1usize..9,
            sides_b in 2usize..9,
            ra in 0.5f32..50.0,
            rb in 0.5f32..50.0,
            x in -50.0f32..50.0,
            y in -50.0f32..50.0,
        ) {
            let a = regular_polygon(sides_a, ra, Vec2::ZERO);
            let b = regular_polygon(sides_b, rb, Vec2::new(x, y));
            prop_assert!(a.swept_intersect(Vec2::ZERO, &b).is_none());
        }

        #[test]
        fn prop_swept_distance_within_motion(
            ra in 0.5f32..20.0,
            mx in -100.0f32..100.0,
            my in -100.0f32..100.0,
        ) {
            let a = regular_polygon(6, ra, Vec2::ZERO);
            let wall = Polygon::rectangle(40.0, 40.0, Vec2::new(30.0, 0.0));
            let motion = Vec2::new(mx, my);
            if let Some(hit) = a.swept_intersect(motion, &wall) {
                prop_assert!(hit.distance() >= 0.0);
                prop_assert!(hit.distance() <= motion.length() + 1e-3);
                prop_assert!(hit.normal().is_finite());
            }
        }
    }
}
