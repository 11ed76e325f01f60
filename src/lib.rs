//! Crawler - simulation core of a top-down action game
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (polygon collision, entity registry, fragmentation)
//! - `renderer`: Rendering collaborator interface (the core only issues draw calls)
//! - `platform`: Input snapshots and image content access
//! - `settings`: Data-driven tuning loaded from JSON

pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;
pub use sim::{Level, LevelManager, SimError, SimResult, Simulation};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Logical window size (the view transform centres on the scroll point)
    pub const WINDOW_WIDTH: f32 = 800.0;
    pub const WINDOW_HEIGHT: f32 = 480.0;
    pub const WINDOW_SIZE: Vec2 = Vec2::new(WINDOW_WIDTH, WINDOW_HEIGHT);

    /// Level tags
    pub const MAIN_AREA_TAG: &str = "MAIN_AREA";

    /// Named-store tags for level singletons
    pub const WALL_TAG: &str = "TEST_WALL";
    pub const PLAYER_TAG: &str = "player";

    /// Image tags
    pub const NINJA_IMAGE: &str = "ninja";
    pub const FUNNY_ENEMY_IMAGE: &str = "funnyEnemy";
    pub const LAZER_ENEMY_IMAGE: &str = "lazerEnemy";
    pub const DROP_SHADOW_IMAGE: &str = "dropShadow";
    pub const TOWER_ROOM_IMAGE: &str = "TOWER_ROOM_IMAGE";
    pub const BLANK_IMAGE: &str = "blank";
    pub const SHURIKEN_IMAGE: &str = "shuriken";
    pub const LASER_IMAGE: &str = "laser";
    pub const GLOW_IMAGE: &str = "glow";
    pub const HEART_IMAGE: &str = "fartHeart";

    /// Depth used for drop shadows (drawn behind everything else)
    pub const SHADOW_DEPTH: f32 = 0.9999;

    /// Walking "bounce" animation shared by the player and enemies
    pub const BOUNCE_FRAME_DURATIONS: [u32; 4] = [5, 5, 5, 5];
    pub const BOUNCE_FRAME_ANGLE_OFFSETS: [f32; 4] = [0.0, 0.05, 0.0, -0.05];
    pub const BOUNCE_FRAME_POS_OFFSETS: [Vec2; 4] = [
        Vec2::ZERO,
        Vec2::new(3.0, -6.0),
        Vec2::ZERO,
        Vec2::new(-3.0, -6.0),
    ];
}

/// Perpendicular of a vector (rotated +90° in screen space)
#[inline]
pub fn perp(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Depth for a world position, decreasing as Y moves down the screen.
///
/// `scroll_point` is the world position at the centre of the view.
pub fn depth_from_screen_position(position: Vec2, scroll_point: Vec2) -> f32 {
    let y_adjust = -(scroll_point.y - consts::WINDOW_HEIGHT / 2.0);
    (1.0 - (position.y + y_adjust) / consts::WINDOW_HEIGHT).clamp(0.0, 1.0)
}

/// Advance a looping frame animation, returning the new `(frame, timer)`
#[inline]
pub fn step_animation(frame: usize, timer: u32, durations: &[u32]) -> (usize, u32) {
    let timer = timer + 1;
    if timer >= durations[frame] {
        ((frame + 1) % durations.len(), 0)
    } else {
        (frame, timer)
    }
}
