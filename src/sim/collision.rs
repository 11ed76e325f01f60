//! Collision response for swept polygon hits
//!
//! Turns an [`IntersectionResult`] into the motion an entity actually takes
//! this frame: sliding along a wall, or bouncing off it.

use glam::Vec2;

use super::polygon::IntersectionResult;

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Slide response for an obstructed motion.
///
/// The motion is cut to the contact distance (minus `skin`, never negative)
/// and the remaining length is redirected along the struck surface, scaled by
/// how well the attempted direction lines up with that surface. Walking
/// straight into a wall stops; walking diagonally into it glides.
pub fn slide_motion(motion: Vec2, hit: &IntersectionResult, skin: f32) -> Vec2 {
    let length = motion.length();
    if length <= f32::EPSILON {
        return Vec2::ZERO;
    }
    let direction = motion / length;
    let approach = direction * (hit.distance() - skin).max(0.0);
    let remaining = (length - hit.distance()).max(0.0);
    let slide = hit.surface() * remaining * direction.dot(hit.surface());
    approach + slide
}

/// Bounce response for an obstructed motion.
///
/// Returns `(displacement, new_velocity)`: the entity travels up to the
/// contact point (backed off by `skin` as a fraction of the motion), then
/// spends the rest of the frame travelling along the reflected motion.
pub fn bounce_motion(motion: Vec2, hit: &IntersectionResult, skin: f32) -> (Vec2, Vec2) {
    let length = motion.length();
    if length <= f32::EPSILON {
        return (Vec2::ZERO, motion);
    }
    let reflection = reflect_velocity(motion, hit.normal());
    let pre_contact = (hit.distance() / length).clamp(0.0, 1.0);
    let displacement = motion * (pre_contact - skin).max(0.0) + reflection * (1.0 - pre_contact);
    (displacement, reflection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::polygon::Polygon;

    fn vertical_wall_hit(distance: f32) -> IntersectionResult {
        IntersectionResult::new(Vec2::new(0.0, -1.0), distance)
    }

    #[test]
    fn test_reflect_velocity() {
        // Moving right, hits vertical wall (normal pointing left)
        let velocity = Vec2::new(100.0, 0.0);
        let normal = Vec2::new(-1.0, 0.0);

        let reflected = reflect_velocity(velocity, normal);
        assert!((reflected.x - (-100.0)).abs() < 0.001);
        assert!(reflected.y.abs() < 0.001);
    }

    #[test]
    fn test_reflect_ignores_normal_sign() {
        let v = Vec2::new(3.0, -4.0);
        let n = Vec2::new(0.0, 1.0);
        assert_eq!(reflect_velocity(v, n), reflect_velocity(v, -n));
    }

    #[test]
    fn test_slide_head_on_stops_at_wall() {
        let hit = vertical_wall_hit(3.0);
        let motion = slide_motion(Vec2::new(4.0, 0.0), &hit, 0.0);
        assert!((motion.x - 3.0).abs() < 1e-5);
        assert!(motion.y.abs() < 1e-5);
    }

    #[test]
    fn test_slide_diagonal_glides_along_wall() {
        let hit = vertical_wall_hit(0.0);
        let motion = slide_motion(Vec2::new(3.0, 3.0), &hit, 0.0);
        // Blocked in X, keeps moving in Y
        assert!(motion.x.abs() < 1e-5);
        assert!(motion.y > 0.0);
    }

    #[test]
    fn test_slide_skin_never_reverses_motion() {
        let hit = vertical_wall_hit(1.0);
        let motion = slide_motion(Vec2::new(4.0, 0.0), &hit, 2.0);
        assert!(motion.x >= 0.0);
    }

    #[test]
    fn test_bounce_off_wall() {
        let mover = Polygon::point(Vec2::ZERO);
        let wall = Polygon::segment(Vec2::new(5.0, -5.0), Vec2::new(5.0, 5.0));
        let motion = Vec2::new(10.0, 0.0);
        let hit = mover.swept_intersect(motion, &wall).unwrap();

        let (displacement, velocity) = bounce_motion(motion, &hit, 0.0);
        assert!((velocity - Vec2::new(-10.0, 0.0)).length() < 1e-4);
        // Travel 5 in, then 5 back out along the reflection
        assert!(displacement.length() < 1e-3);
    }

    #[test]
    fn test_zero_motion_is_inert() {
        let hit = vertical_wall_hit(0.0);
        assert_eq!(slide_motion(Vec2::ZERO, &hit, 2.0), Vec2::ZERO);
        assert_eq!(bounce_motion(Vec2::ZERO, &hit, 0.01).0, Vec2::ZERO);
    }
}
