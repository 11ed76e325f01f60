//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed step only (one update per frame)
//! - Seeded RNG only
//! - Stable iteration order (registration order)
//! - No platform dependencies; drawing goes through the `Renderer` trait

pub mod behaviors;
pub mod collision;
pub mod entity;
pub mod error;
pub mod fragment;
pub mod kind;
pub mod level;
pub mod main_area;
pub mod manager;
pub mod polygon;
pub mod tick;

pub use collision::{bounce_motion, reflect_velocity, slide_motion};
pub use entity::{Behavior, Body, DamageOutcome, Damageable, DebrisSpec, Entity, EntityId, Hit, RenderView};
pub use error::{SimError, SimResult};
pub use fragment::{Chunk, ChunkPhase, Fragmentation, PixelBuffer, PixelCache, ShatterParams};
pub use kind::Kind;
pub use level::{EntityHandle, Level, PlayerHandle, WallHandle};
pub use main_area::MainArea;
pub use manager::{LevelBlueprint, LevelManager};
pub use polygon::{IntersectionResult, Polygon, solve_lines};
pub use tick::{FrameContext, Simulation};
