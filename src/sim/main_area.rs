//! The starting room: an octagonal tower floor with the ninja in the middle

use glam::{Vec2, Vec4};

use super::behaviors::{FunnyEnemy, LazerEnemy, Player, Wall};
use super::error::SimResult;
use super::level::{Level, PlayerHandle, WallHandle};
use super::manager::LevelBlueprint;
use super::polygon::Polygon;
use crate::consts::{PLAYER_TAG, TOWER_ROOM_IMAGE, WALL_TAG};
use crate::settings::Settings;

/// Octagon bounding the tower floor, wound clockwise on screen
pub const TOWER_ROOM_OUTLINE: [Vec2; 8] = [
    Vec2::new(-448.0, -216.0),
    Vec2::new(-192.0, -472.0),
    Vec2::new(192.0, -472.0),
    Vec2::new(448.0, -216.0),
    Vec2::new(448.0, 192.0),
    Vec2::new(192.0, 448.0),
    Vec2::new(-192.0, 448.0),
    Vec2::new(-448.0, 192.0),
];

/// FunnyEnemies on the four compass points, each starting on the patrol leg
/// that walks it clockwise around the player
const FUNNY_ENEMY_POSTS: [(Vec2, usize); 4] = [
    (Vec2::new(0.0, -300.0), 0),
    (Vec2::new(300.0, 0.0), 1),
    (Vec2::new(0.0, 300.0), 2),
    (Vec2::new(-300.0, 0.0), 3),
];

const LAZER_ENEMY_POST: Vec2 = Vec2::new(200.0, 200.0);

#[derive(Debug, Clone, Copy, Default)]
pub struct MainArea;

impl LevelBlueprint for MainArea {
    fn populate(&self, level: &mut Level, settings: &Settings) -> SimResult<()> {
        let player = Player::spawn(level, Vec2::ZERO, settings);
        level.store(PLAYER_TAG, PlayerHandle(player));

        for (position, leg) in FUNNY_ENEMY_POSTS {
            FunnyEnemy::spawn(level, position, leg, settings);
        }
        LazerEnemy::spawn(level, LAZER_ENEMY_POST, settings);

        let outline = Polygon::new(TOWER_ROOM_OUTLINE.to_vec(), Vec2::ZERO);
        let wall = Wall::spawn(
            level,
            outline,
            Wall::with_image(TOWER_ROOM_IMAGE, Vec2::new(896.0, 920.0)),
        )?;
        level.store(WALL_TAG, WallHandle(wall));

        level.require_wiring()
    }

    fn clear_color(&self) -> Vec4 {
        Vec4::new(0.0, 0.0, 0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::kind::Kind;

    #[test]
    fn test_populate_wires_singletons() {
        let mut level = Level::new();
        MainArea.populate(&mut level, &Settings::default()).unwrap();

        assert_eq!(level.query(Kind::Player).len(), 1);
        assert_eq!(level.query(Kind::Enemy).len(), 5);
        assert_eq!(level.query(Kind::FunnyEnemy).len(), 4);
        assert_eq!(level.query(Kind::LazerEnemy).len(), 1);
        assert_eq!(level.query(Kind::Wall).len(), 1);
        assert_eq!(level.wall_shape().unwrap().points().len(), 8);
        assert_eq!(level.player().unwrap().unwrap().position(), Vec2::ZERO);
    }

    #[test]
    fn test_outline_is_convex_and_clockwise() {
        // Every vertex is on the inside of every edge for a convex outline
        let outline = Polygon::new(TOWER_ROOM_OUTLINE.to_vec(), Vec2::ZERO);
        for (a, b) in outline.edges() {
            let edge = b - a;
            for p in outline.world_points() {
                let side = edge.perp_dot(p - a);
                assert!(side >= 0.0, "outline not convex/clockwise at {:?}", a);
            }
        }
    }
}
