//! Entities: a collision shape plus a behaviour
//!
//! Every entity is a [`Polygon`] (shape and world position) and a [`Body`],
//! the tagged variant holding the concrete behaviour's state. Capabilities are
//! separate traits: every body implements [`Behavior`]; bodies that can be hurt
//! also implement [`Damageable`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::behaviors::{Debris, Flash, FunnyEnemy, Laser, LazerEnemy, Player, Shuriken, Wall};
use super::error::SimResult;
use super::fragment::{Fragmentation, ShatterParams};
use super::kind::Kind;
use super::level::Level;
use super::polygon::Polygon;
use super::tick::FrameContext;
use crate::renderer::Renderer;
use crate::settings::Settings;

/// Stable identifier of a registered entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// A damage event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub damage: i32,
    pub knockback: f32,
    /// Direction the hit pushes the target (need not be normalized)
    pub from: Vec2,
}

/// What a hit did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Target can't be hurt right now (invincible, already dead, not damageable)
    Ignored,
    Wounded,
    /// Health just reached zero
    Killed,
}

/// How a body breaks apart when it dies
#[derive(Debug, Clone, PartialEq)]
pub struct DebrisSpec {
    pub image: &'static str,
    pub chunk_count: usize,
    /// Burst origin in image coordinates
    pub origin: Vec2,
    /// Drawn size of the sprite; the image is centred on the entity position
    pub size: Vec2,
}

/// View information available while rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    /// World position at the centre of the screen
    pub scroll_point: Vec2,
}

/// Per-frame update and draw
pub trait Behavior {
    /// Advance one frame. `shape` is this entity's own shape; the entity itself
    /// is out of the level while this runs, so `level` only holds the others.
    fn update(
        &mut self,
        me: EntityId,
        shape: &mut Polygon,
        level: &mut Level,
        ctx: &mut FrameContext<'_>,
    ) -> SimResult<()>;

    /// Issue draw calls; must not change any state
    fn render(&self, shape: &Polygon, view: &RenderView, renderer: &mut dyn Renderer);
}

/// Bodies with health
pub trait Damageable {
    fn health(&self) -> i32;

    /// Apply a hit, returning `Killed` only on the hit that takes health to zero
    fn take_hit(&mut self, hit: &Hit, settings: &Settings) -> DamageOutcome;

    fn debris(&self, settings: &Settings) -> DebrisSpec;
}

/// Concrete entity state
#[derive(Debug, Clone)]
pub enum Body {
    Player(Player),
    FunnyEnemy(FunnyEnemy),
    LazerEnemy(LazerEnemy),
    Shuriken(Shuriken),
    Laser(Laser),
    Wall(Wall),
    Flash(Flash),
    Debris(Debris),
}

impl Body {
    pub fn kind(&self) -> Kind {
        match self {
            Body::Player(_) => Kind::Player,
            Body::FunnyEnemy(_) => Kind::FunnyEnemy,
            Body::LazerEnemy(_) => Kind::LazerEnemy,
            Body::Shuriken(_) => Kind::Shuriken,
            Body::Laser(_) => Kind::Laser,
            Body::Wall(_) => Kind::Wall,
            Body::Flash(_) => Kind::Flash,
            Body::Debris(_) => Kind::Debris,
        }
    }

    fn behavior(&self) -> &dyn Behavior {
        match self {
            Body::Player(b) => b,
            Body::FunnyEnemy(b) => b,
            Body::LazerEnemy(b) => b,
            Body::Shuriken(b) => b,
            Body::Laser(b) => b,
            Body::Wall(b) => b,
            Body::Flash(b) => b,
            Body::Debris(b) => b,
        }
    }

    fn behavior_mut(&mut self) -> &mut dyn Behavior {
        match self {
            Body::Player(b) => b,
            Body::FunnyEnemy(b) => b,
            Body::LazerEnemy(b) => b,
            Body::Shuriken(b) => b,
            Body::Laser(b) => b,
            Body::Wall(b) => b,
            Body::Flash(b) => b,
            Body::Debris(b) => b,
        }
    }

    pub fn as_damageable(&self) -> Option<&dyn Damageable> {
        match self {
            Body::Player(b) => Some(b),
            Body::FunnyEnemy(b) => Some(b),
            Body::LazerEnemy(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_damageable_mut(&mut self) -> Option<&mut dyn Damageable> {
        match self {
            Body::Player(b) => Some(b),
            Body::FunnyEnemy(b) => Some(b),
            Body::LazerEnemy(b) => Some(b),
            _ => None,
        }
    }
}

/// A registered game object
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub shape: Polygon,
    pub body: Body,
}

impl Entity {
    #[inline]
    pub fn kind(&self) -> Kind {
        self.body.kind()
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.shape.position
    }

    /// Current health, `None` for bodies without health
    pub fn health(&self) -> Option<i32> {
        self.body.as_damageable().map(|d| d.health())
    }

    pub(crate) fn update(&mut self, level: &mut Level, ctx: &mut FrameContext<'_>) -> SimResult<()> {
        let Entity { id, shape, body } = self;
        body.behavior_mut().update(*id, shape, level, ctx)
    }

    pub(crate) fn render(&self, view: &RenderView, renderer: &mut dyn Renderer) {
        self.body.behavior().render(&self.shape, view, renderer);
    }

    /// Apply a hit from another entity
    pub(crate) fn damage(
        &mut self,
        hit: &Hit,
        level: &mut Level,
        ctx: &mut FrameContext<'_>,
    ) -> SimResult<DamageOutcome> {
        let position = self.shape.position;
        match self.body.as_damageable_mut() {
            Some(target) => apply_hit(target, self.id, position, hit, level, ctx),
            None => Ok(DamageOutcome::Ignored),
        }
    }
}

/// Apply `hit` to `target`; on the killing blow deregister `me` and shatter it
pub fn apply_hit(
    target: &mut dyn Damageable,
    me: EntityId,
    position: Vec2,
    hit: &Hit,
    level: &mut Level,
    ctx: &mut FrameContext<'_>,
) -> SimResult<DamageOutcome> {
    let outcome = target.take_hit(hit, ctx.settings);
    if outcome == DamageOutcome::Killed {
        log::debug!("Entity {} killed at {:?}", me.0, position);
        level.deregister(me);
        let spec = target.debris(ctx.settings);
        spawn_debris(level, ctx, &spec, position)?;
    }
    Ok(outcome)
}

/// Shatter a sprite centred on `position` into a new debris entity
pub fn spawn_debris(
    level: &mut Level,
    ctx: &mut FrameContext<'_>,
    spec: &DebrisSpec,
    position: Vec2,
) -> SimResult<EntityId> {
    let pixels = ctx.pixels.resolve(spec.image, ctx.content)?;
    let tuning = &ctx.settings.debris;
    let params = ShatterParams {
        chunk_count: spec.chunk_count,
        min_speed: tuning.min_speed,
        max_speed: tuning.max_speed,
        origin: spec.origin,
        top_left: position - spec.size / 2.0,
        ground_y: position.y + spec.size.y / 2.0,
    };
    let fragments = Fragmentation::shatter(&pixels, &params, &mut *ctx.rng);
    log::debug!(
        "Shattered '{}' into {} chunks",
        spec.image,
        fragments.chunks().len()
    );
    Ok(level.register(
        Polygon::new(Vec::new(), position),
        Body::Debris(Debris::new(fragments)),
    ))
}
