use glam::{Vec2, Vec4};

use crate::consts::{GLOW_IMAGE, LASER_IMAGE, SHURIKEN_IMAGE};
use crate::renderer::{Renderer, SpriteDraw};
use crate::sim::behaviors::Flash;
use crate::sim::collision::reflect_velocity;
use crate::sim::entity::{Behavior, Body, DebrisSpec, EntityId, Hit, RenderView, spawn_debris};
use crate::sim::error::SimResult;
use crate::sim::kind::Kind;
use crate::sim::level::Level;
use crate::sim::polygon::{IntersectionResult, Polygon};
use crate::sim::tick::FrameContext;

const SHURIKEN_SIZE: f32 = 16.0;
const LASER_HITBOX: f32 = 8.0;
const LASER_SIZE: f32 = 32.0;
const LASER_GLOW_SIZE: Vec2 = Vec2::new(128.0, 64.0);
const LASER_GLOW_COLOR: Vec4 = Vec4::new(0.376, 0.0, 0.5, 0.5);

/// Thrown star. Flies straight until it strikes the wall or an enemy, then
/// ricochets off and falls away, fading out.
#[derive(Debug, Clone, PartialEq)]
pub struct Shuriken {
    /// Unit direction while in flight, full velocity once spent
    velocity: Vec2,
    angle: f32,
    spent: bool,
    alpha: f32,
}

impl Shuriken {
    pub fn new(direction: Vec2) -> Self {
        Self {
            velocity: direction.normalize_or_zero(),
            angle: 0.0,
            spent: false,
            alpha: 1.0,
        }
    }

    pub fn spawn(level: &mut Level, position: Vec2, direction: Vec2) -> EntityId {
        level.register(
            Polygon::rectangle(SHURIKEN_SIZE, SHURIKEN_SIZE, position),
            Body::Shuriken(Self::new(direction)),
        )
    }

    pub fn is_spent(&self) -> bool {
        self.spent
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Nearest thing the shuriken would strike moving by `motion`: the wall
    /// (`None` target) or an enemy
    fn first_strike(
        &self,
        me: EntityId,
        shape: &Polygon,
        motion: Vec2,
        level: &Level,
    ) -> SimResult<Option<(IntersectionResult, Option<EntityId>)>> {
        let mut nearest = shape.swept_intersect(motion, level.wall_shape()?).map(|hit| (hit, None));
        for id in level.live_of_kind(Kind::Enemy, me) {
            let Some(enemy) = level.get(id) else {
                continue;
            };
            if let Some(hit) = shape.swept_intersect(motion, &enemy.shape) {
                if nearest.is_none_or(|(best, _)| hit.distance() < best.distance()) {
                    nearest = Some((hit, Some(id)));
                }
            }
        }
        Ok(nearest)
    }
}

impl Behavior for Shuriken {
    fn update(
        &mut self,
        me: EntityId,
        shape: &mut Polygon,
        level: &mut Level,
        ctx: &mut FrameContext<'_>,
    ) -> SimResult<()> {
        let tuning = &ctx.settings.projectiles;
        self.angle += tuning.shuriken_spin;

        if self.spent {
            shape.translate(self.velocity);
            self.velocity.y += tuning.shuriken_gravity;
            self.alpha -= tuning.shuriken_fade;
            if self.alpha <= 0.0 {
                level.deregister(me);
            }
            return Ok(());
        }

        let motion = self.velocity * tuning.shuriken_speed;
        let Some((hit, target)) = self.first_strike(me, shape, motion, level)? else {
            shape.translate(motion);
            return Ok(());
        };

        shape.translate(self.velocity * (hit.distance() - 1.0).max(0.0));
        self.velocity = reflect_velocity(self.velocity, hit.normal()) * tuning.shuriken_bounce_speed
            + Vec2::new(0.0, tuning.shuriken_bounce_kick);
        self.spent = true;

        if let Some(enemy) = target {
            let hit = Hit {
                damage: tuning.shuriken_damage,
                knockback: tuning.shuriken_knockback,
                from: motion,
            };
            level.damage(enemy, &hit, ctx)?;
        }
        Ok(())
    }

    fn render(&self, shape: &Polygon, _view: &RenderView, renderer: &mut dyn Renderer) {
        renderer.draw_sprite(
            &SpriteDraw::new(SHURIKEN_IMAGE, shape.position, Vec2::splat(SHURIKEN_SIZE))
                .angle(self.angle)
                .faded(self.alpha.max(0.0)),
        );
    }
}

/// Enemy laser bolt. Hurts the player; shatters against the wall.
#[derive(Debug, Clone, PartialEq)]
pub struct Laser {
    velocity: Vec2,
}

impl Laser {
    pub fn new(velocity: Vec2) -> Self {
        Self { velocity }
    }

    pub fn spawn(level: &mut Level, position: Vec2, velocity: Vec2) -> EntityId {
        level.register(
            Polygon::rectangle(LASER_HITBOX, LASER_HITBOX, position),
            Body::Laser(Self::new(velocity)),
        )
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    fn debris(&self, ctx: &FrameContext<'_>) -> DebrisSpec {
        let size = Vec2::splat(LASER_SIZE);
        DebrisSpec {
            image: LASER_IMAGE,
            chunk_count: ctx.settings.projectiles.laser_debris_chunks,
            origin: size / 2.0,
            size,
        }
    }
}

impl Behavior for Laser {
    fn update(
        &mut self,
        me: EntityId,
        shape: &mut Polygon,
        level: &mut Level,
        ctx: &mut FrameContext<'_>,
    ) -> SimResult<()> {
        let struck_player = level.player()?.and_then(|player| {
            let touching = shape.overlaps(&player.shape)
                || shape.swept_intersect(self.velocity, &player.shape).is_some();
            touching.then_some(player.id)
        });
        if let Some(player) = struck_player {
            let tuning = &ctx.settings.projectiles;
            let hit = Hit {
                damage: tuning.laser_damage,
                knockback: tuning.laser_knockback,
                from: self.velocity,
            };
            level.deregister(me);
            level.damage(player, &hit, ctx)?;
            return Ok(());
        }

        let wall_hit = shape.swept_intersect(self.velocity, level.wall_shape()?);
        match wall_hit {
            Some(hit) => {
                let contact = shape.position + self.velocity.normalize_or_zero() * hit.distance();
                log::trace!("Laser {} hit the wall at {:?}", me.0, contact);
                level.deregister(me);
                Flash::spawn(level, contact, ctx.settings.projectiles.flash_frames);
                let spec = self.debris(ctx);
                spawn_debris(level, ctx, &spec, contact)?;
            }
            None => shape.translate(self.velocity),
        }
        Ok(())
    }

    fn render(&self, shape: &Polygon, _view: &RenderView, renderer: &mut dyn Renderer) {
        let angle = self.velocity.to_angle();
        renderer.draw_sprite(
            &SpriteDraw::new(LASER_IMAGE, shape.position, Vec2::splat(LASER_SIZE))
                .angle(angle)
                .additive(),
        );
        renderer.draw_sprite(
            &SpriteDraw::new(GLOW_IMAGE, shape.position + Vec2::new(0.0, 24.0), LASER_GLOW_SIZE)
                .color(LASER_GLOW_COLOR)
                .additive(),
        );
    }
}
