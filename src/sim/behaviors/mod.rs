//! Entity behaviours

mod enemy;
mod player;
mod projectile;
mod scenery;

pub use enemy::{FunnyEnemy, LazerEnemy, PATH_DIRECTIONS, PATH_DURATIONS};
pub use player::Player;
pub use projectile::{Laser, Shuriken};
pub use scenery::{Debris, Flash, Wall};

use glam::Vec2;

use crate::consts::{
    BOUNCE_FRAME_ANGLE_OFFSETS, BOUNCE_FRAME_DURATIONS, BOUNCE_FRAME_POS_OFFSETS, DROP_SHADOW_IMAGE,
    SHADOW_DEPTH,
};
use crate::renderer::{Renderer, SpriteDraw};
use crate::step_animation;

/// Looping walk "bounce" shared by the characters
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WalkCycle {
    frame: usize,
    timer: u32,
}

impl WalkCycle {
    pub fn step(&mut self) {
        (self.frame, self.timer) = step_animation(self.frame, self.timer, &BOUNCE_FRAME_DURATIONS);
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn offset(&self) -> Vec2 {
        BOUNCE_FRAME_POS_OFFSETS[self.frame]
    }

    pub fn angle(&self) -> f32 {
        BOUNCE_FRAME_ANGLE_OFFSETS[self.frame]
    }
}

/// Oval shadow under a character's feet
fn draw_drop_shadow(renderer: &mut dyn Renderer, feet: Vec2, size: Vec2, alpha: f32) {
    renderer.draw_sprite(
        &SpriteDraw::new(DROP_SHADOW_IMAGE, feet, size)
            .faded(alpha)
            .depth(SHADOW_DEPTH),
    );
}

/// Remaining fraction of a countdown, for lerping decays
#[inline]
fn remaining(timer: u32, total: u32) -> f32 {
    if total == 0 {
        0.0
    } else {
        timer as f32 / total as f32
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use crate::consts::*;
    use crate::platform::{InputSnapshot, MemoryContent, RasterImage, Rgba};
    use crate::settings::Settings;
    use crate::sim::entity::EntityId;
    use crate::sim::error::SimResult;
    use crate::sim::fragment::PixelCache;
    use crate::sim::level::{Level, PlayerHandle, WallHandle};
    use crate::sim::polygon::Polygon;
    use crate::sim::tick::FrameContext;

    use super::{Player, Wall};

    /// Everything a `FrameContext` borrows
    pub struct Harness {
        pub input: InputSnapshot,
        pub content: MemoryContent,
        pub pixels: PixelCache,
        pub rng: Pcg32,
        pub settings: Settings,
    }

    impl Harness {
        pub fn new() -> Self {
            let mut content = MemoryContent::new();
            for (tag, size) in [
                (NINJA_IMAGE, 8),
                (FUNNY_ENEMY_IMAGE, 8),
                (LAZER_ENEMY_IMAGE, 8),
                (LASER_IMAGE, 4),
            ] {
                content.insert(tag, RasterImage::filled(size, size, Rgba::WHITE));
            }
            Self {
                input: InputSnapshot::default(),
                content,
                pixels: PixelCache::new(),
                rng: Pcg32::seed_from_u64(9),
                settings: Settings::default(),
            }
        }

        pub fn ctx(&mut self) -> FrameContext<'_> {
            FrameContext {
                input: &self.input,
                content: &self.content,
                pixels: &mut self.pixels,
                rng: &mut self.rng,
                settings: &self.settings,
            }
        }

        pub fn update(&mut self, level: &mut Level) -> SimResult<()> {
            let mut ctx = self.ctx();
            level.update(&mut ctx)
        }
    }

    /// Level with a square wall of half-extent `half` around the origin and a
    /// player at `player_at`
    pub fn walled_level(half: f32, player_at: Vec2, settings: &Settings) -> (Level, EntityId) {
        let mut level = Level::new();
        let wall = Wall::spawn(
            &mut level,
            Polygon::rectangle(half * 2.0, half * 2.0, Vec2::ZERO),
            Wall::outline(),
        )
        .unwrap();
        level.store(WALL_TAG, WallHandle(wall));
        let player = Player::spawn(&mut level, player_at, settings);
        level.store(PLAYER_TAG, PlayerHandle(player));
        (level, player)
    }
}
