use glam::Vec2;

use super::{WalkCycle, draw_drop_shadow, remaining};
use crate::consts::{HEART_IMAGE, NINJA_IMAGE, WINDOW_HEIGHT, WINDOW_WIDTH};
use crate::depth_from_screen_position;
use crate::renderer::{Renderer, SpriteDraw};
use crate::settings::Settings;
use crate::sim::behaviors::Shuriken;
use crate::sim::collision::slide_motion;
use crate::sim::entity::{
    Behavior, Body, DamageOutcome, Damageable, DebrisSpec, EntityId, Hit, RenderView, apply_hit,
};
use crate::sim::error::SimResult;
use crate::sim::kind::Kind;
use crate::sim::level::Level;
use crate::sim::polygon::Polygon;
use crate::sim::tick::FrameContext;

const HEART_SIZE: Vec2 = Vec2::new(20.0, 23.0);

/// The ninja: WASD to walk, arrow keys to throw
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    health: i32,
    max_health: i32,
    size: f32,
    walk: WalkCycle,
    moving: bool,
    fire_timer: u32,
    invincible_timer: u32,
    invincible_frames: u32,
    /// Knockback velocity, decays to zero over the invincibility window
    damage_impulse: Vec2,
    /// Knockback as it was when the hit landed
    knockback_start: Vec2,
}

impl Player {
    pub fn new(settings: &Settings) -> Self {
        let tuning = &settings.player;
        Self {
            health: tuning.max_health,
            max_health: tuning.max_health,
            size: tuning.size,
            walk: WalkCycle::default(),
            moving: false,
            fire_timer: 0,
            invincible_timer: 0,
            invincible_frames: tuning.invincible_frames,
            damage_impulse: Vec2::ZERO,
            knockback_start: Vec2::ZERO,
        }
    }

    pub fn spawn(level: &mut Level, position: Vec2, settings: &Settings) -> EntityId {
        let size = settings.player.size;
        level.register(
            Polygon::rectangle(size, size, position),
            Body::Player(Self::new(settings)),
        )
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_timer > 0
    }

    pub fn damage_impulse(&self) -> Vec2 {
        self.damage_impulse
    }

    fn move_and_slide(&mut self, shape: &mut Polygon, level: &Level, ctx: &FrameContext<'_>) -> SimResult<()> {
        let tuning = &ctx.settings.player;
        let axis = ctx.input.movement_axis();
        self.moving = axis != Vec2::ZERO;
        if self.moving {
            self.walk.step();
        }

        let mut motion = axis.normalize_or_zero() * tuning.speed;
        if self.is_invincible() {
            motion += self.damage_impulse;
        }
        if motion == Vec2::ZERO {
            return Ok(());
        }

        let wall = level.wall_shape()?;
        let motion = match shape.swept_intersect(motion, wall) {
            Some(hit) => {
                let slid = slide_motion(motion, &hit, tuning.wall_skin);
                if shape.swept_intersect(slid, wall).is_some() {
                    // Sliding along one edge runs into the next (a corner):
                    // only close in on the first contact this frame
                    motion.normalize_or_zero() * (hit.distance() - tuning.wall_skin).max(0.0)
                } else {
                    slid
                }
            }
            None => motion,
        };
        shape.translate(motion);
        Ok(())
    }

    fn fire(&mut self, position: Vec2, level: &mut Level, ctx: &FrameContext<'_>) {
        if self.fire_timer > 0 {
            self.fire_timer -= 1;
            return;
        }
        if let Some(direction) = ctx.input.fire_direction() {
            Shuriken::spawn(level, position, direction);
            self.fire_timer = ctx.settings.player.fire_cooldown;
        }
    }

    fn decay_invincibility(&mut self) {
        if self.invincible_timer > 0 {
            self.damage_impulse =
                self.knockback_start * remaining(self.invincible_timer, self.invincible_frames);
            self.invincible_timer -= 1;
            if self.invincible_timer == 0 {
                self.damage_impulse = Vec2::ZERO;
                self.knockback_start = Vec2::ZERO;
            }
        }
    }

    /// First enemy touching the player, as a hit against the player
    fn enemy_contact(&self, me: EntityId, shape: &Polygon, level: &Level, settings: &Settings) -> Option<Hit> {
        level
            .live_of_kind(Kind::Enemy, me)
            .into_iter()
            .filter_map(|id| level.get(id))
            .find(|enemy| shape.overlaps(&enemy.shape))
            .map(|enemy| Hit {
                damage: settings.enemies.contact_damage,
                knockback: settings.enemies.contact_knockback,
                from: shape.position - enemy.shape.position,
            })
    }
}

impl Behavior for Player {
    fn update(
        &mut self,
        me: EntityId,
        shape: &mut Polygon,
        level: &mut Level,
        ctx: &mut FrameContext<'_>,
    ) -> SimResult<()> {
        self.move_and_slide(shape, level, ctx)?;
        self.fire(shape.position, level, ctx);
        self.decay_invincibility();

        if let Some(hit) = self.enemy_contact(me, shape, level, ctx.settings) {
            apply_hit(self, me, shape.position, &hit, level, ctx)?;
        }
        Ok(())
    }

    fn render(&self, shape: &Polygon, view: &RenderView, renderer: &mut dyn Renderer) {
        let position = shape.position;
        let (offset, angle) = if self.moving {
            (self.walk.offset(), self.walk.angle())
        } else {
            (Vec2::ZERO, 0.0)
        };
        renderer.draw_sprite(
            &SpriteDraw::new(NINJA_IMAGE, position + offset, Vec2::splat(self.size))
                .angle(angle)
                .depth(depth_from_screen_position(position, view.scroll_point)),
        );
        draw_drop_shadow(
            renderer,
            position + Vec2::new(0.0, self.size / 2.0),
            Vec2::new(60.0, 30.0),
            0.6,
        );

        // Hearts along the top right of the view
        let top_right = view.scroll_point + Vec2::new(WINDOW_WIDTH / 2.0, -WINDOW_HEIGHT / 2.0);
        for i in 0..self.health.max(0) {
            let x = top_right.x - (self.max_health - i) as f32 * HEART_SIZE.x;
            renderer.draw_sprite(&SpriteDraw::new(
                HEART_IMAGE,
                Vec2::new(x, top_right.y + HEART_SIZE.y),
                HEART_SIZE,
            ));
        }
    }
}

impl Damageable for Player {
    fn health(&self) -> i32 {
        self.health
    }

    fn take_hit(&mut self, hit: &Hit, _settings: &Settings) -> DamageOutcome {
        if self.health <= 0 || self.is_invincible() {
            return DamageOutcome::Ignored;
        }
        self.health -= hit.damage;
        self.invincible_timer = self.invincible_frames;
        self.knockback_start = hit.from.normalize_or_zero() * hit.knockback;
        self.damage_impulse = self.knockback_start;
        log::debug!("Player hit for {}, health {}", hit.damage, self.health);
        if self.health <= 0 {
            DamageOutcome::Killed
        } else {
            DamageOutcome::Wounded
        }
    }

    fn debris(&self, settings: &Settings) -> DebrisSpec {
        DebrisSpec {
            image: NINJA_IMAGE,
            chunk_count: settings.player.debris_chunks,
            origin: Vec2::new(24.0, 64.0),
            size: Vec2::splat(self.size),
        }
    }
}
