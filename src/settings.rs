//! Simulation tuning
//!
//! Every gameplay constant lives here so a level can be rebalanced from a JSON
//! file without recompiling. Missing fields fall back to their defaults.

use serde::{Deserialize, Serialize};

use crate::sim::{SimError, SimResult};

/// Player character tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub max_health: i32,
    /// Pixels per frame
    pub speed: f32,
    /// Frames of invulnerability after taking damage
    pub invincible_frames: u32,
    /// Frames between shuriken throws
    pub fire_cooldown: u32,
    /// Distance kept from the wall when sliding
    pub wall_skin: f32,
    pub size: f32,
    pub debris_chunks: usize,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            max_health: 5,
            speed: 4.0,
            invincible_frames: 30,
            fire_cooldown: 12,
            wall_skin: 2.0,
            size: 48.0,
            debris_chunks: 120,
        }
    }
}

/// Enemy tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub size: f32,
    /// Damage dealt to the player on touch
    pub contact_damage: i32,
    pub contact_knockback: f32,
    pub funny_health: i32,
    pub funny_path_speed: f32,
    pub lazer_health: i32,
    pub lazer_invincible_frames: u32,
    pub lazer_speed: f32,
    /// Frames between lasers
    pub laser_cooldown: u32,
    pub debris_chunks: usize,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            size: 48.0,
            contact_damage: 1,
            contact_knockback: 6.0,
            funny_health: 10,
            funny_path_speed: 2.0,
            lazer_health: 3,
            lazer_invincible_frames: 18,
            lazer_speed: 2.0,
            laser_cooldown: 90,
            debris_chunks: 30,
        }
    }
}

/// Shuriken and laser tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    pub shuriken_speed: f32,
    /// Radians per frame
    pub shuriken_spin: f32,
    /// Speed after ricocheting off the wall
    pub shuriken_bounce_speed: f32,
    /// Vertical kick added on ricochet (negative is up)
    pub shuriken_bounce_kick: f32,
    pub shuriken_gravity: f32,
    /// Alpha lost per frame once the shuriken is spent
    pub shuriken_fade: f32,
    pub shuriken_damage: i32,
    pub shuriken_knockback: f32,
    pub laser_speed: f32,
    pub laser_damage: i32,
    pub laser_knockback: f32,
    pub laser_debris_chunks: usize,
    /// Frames the impact flash lasts
    pub flash_frames: u32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            shuriken_speed: 10.0,
            shuriken_spin: 0.2,
            shuriken_bounce_speed: 4.0,
            shuriken_bounce_kick: -6.0,
            shuriken_gravity: 0.5,
            shuriken_fade: 0.04,
            shuriken_damage: 1,
            shuriken_knockback: 6.0,
            laser_speed: 10.0,
            laser_damage: 1,
            laser_knockback: 6.0,
            laser_debris_chunks: 6,
            flash_frames: 10,
        }
    }
}

/// Chunk physics for shattered sprites (all per frame)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebrisTuning {
    /// Added to downward velocity every frame
    pub gravity: f32,
    /// Minimum downward speed at ground contact for a bounce
    pub bounce_threshold: f32,
    /// Velocity scale applied on the bounce
    pub bounce_damping: f32,
    /// Alpha lost per frame once settled
    pub fade_rate: f32,
    pub min_speed: f32,
    pub max_speed: f32,
}

impl Default for DebrisTuning {
    fn default() -> Self {
        Self {
            gravity: 1.0,
            bounce_threshold: 2.0,
            bounce_damping: 0.35,
            fade_rate: 0.0333,
            min_speed: 6.0,
            max_speed: 10.0,
        }
    }
}

/// All simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seed for the simulation RNG (fragment seeds and speeds)
    pub seed: u64,
    pub player: PlayerTuning,
    pub enemies: EnemyTuning,
    pub projectiles: ProjectileTuning,
    pub debris: DebrisTuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x5eed_c0de,
            player: PlayerTuning::default(),
            enemies: EnemyTuning::default(),
            projectiles: ProjectileTuning::default(),
            debris: DebrisTuning::default(),
        }
    }
}

impl Settings {
    /// Parse settings from JSON; absent fields keep their defaults
    pub fn from_json(json: &str) -> SimResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file, falling back to defaults if it doesn't exist
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> SimResult<Self> {
        match std::fs::read_to_string(path) {
            Ok(json) => {
                let settings = Self::from_json(&json)?;
                log::info!("Loaded settings from {}", path.display());
                Ok(settings)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(SimError::Config(format!("{}: {}", path.display(), e))),
        }
    }
}
