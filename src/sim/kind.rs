//! Entity kind hierarchy
//!
//! A small, closed tree of kinds used by the registry's secondary index.
//! Registering an entity files it under its concrete kind and every ancestor,
//! so "all enemies" is a single bucket lookup regardless of subtype.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    Player,
    /// Anything hostile that can be damaged by the player
    Enemy,
    FunnyEnemy,
    LazerEnemy,
    /// Anything fired by someone
    Projectile,
    Shuriken,
    Laser,
    /// Static collision boundary
    Wall,
    /// Purely visual, non-colliding entities
    Effect,
    Flash,
    Debris,
}

impl Kind {
    /// Direct parent, `None` for roots
    pub fn parent(self) -> Option<Kind> {
        match self {
            Kind::FunnyEnemy | Kind::LazerEnemy => Some(Kind::Enemy),
            Kind::Shuriken | Kind::Laser => Some(Kind::Projectile),
            Kind::Flash | Kind::Debris => Some(Kind::Effect),
            Kind::Player | Kind::Enemy | Kind::Projectile | Kind::Wall | Kind::Effect => None,
        }
    }

    /// This kind followed by each ancestor up to its root
    pub fn lineage(self) -> impl Iterator<Item = Kind> {
        std::iter::successors(Some(self), |k| k.parent())
    }
}
