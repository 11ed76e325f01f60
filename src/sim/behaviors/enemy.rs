use glam::{Vec2, Vec4};

use super::{WalkCycle, draw_drop_shadow, remaining};
use crate::consts::{FUNNY_ENEMY_IMAGE, LAZER_ENEMY_IMAGE};
use crate::depth_from_screen_position;
use crate::renderer::{Renderer, SpriteDraw};
use crate::settings::{EnemyTuning, Settings};
use crate::sim::behaviors::Laser;
use crate::sim::collision::bounce_motion;
use crate::sim::entity::{Behavior, Body, DamageOutcome, Damageable, DebrisSpec, EntityId, Hit, RenderView};
use crate::sim::error::SimResult;
use crate::sim::level::Level;
use crate::sim::polygon::Polygon;
use crate::sim::tick::FrameContext;

/// Frames spent on each leg of the patrol square
pub const PATH_DURATIONS: [u32; 4] = [300, 140, 300, 140];
/// Heading of each patrol leg: right, down, left, up
pub const PATH_DIRECTIONS: [Vec2; 4] = [
    Vec2::new(1.0, 0.0),
    Vec2::new(0.0, 1.0),
    Vec2::new(-1.0, 0.0),
    Vec2::new(0.0, -1.0),
];

/// Fraction of the motion kept back from the wall on a bounce
const BOUNCE_SKIN: f32 = 0.01;

fn debris_origin(size: f32) -> Vec2 {
    Vec2::new(size / 2.0, size + 16.0)
}

/// Walks a fixed rectangular patrol, ignoring walls
#[derive(Debug, Clone, PartialEq)]
pub struct FunnyEnemy {
    health: i32,
    size: f32,
    leg: usize,
    leg_timer: u32,
    walk: WalkCycle,
}

impl FunnyEnemy {
    /// `start_leg` indexes [`PATH_DIRECTIONS`], so enemies placed around a
    /// room can circle it in step
    pub fn new(start_leg: usize, tuning: &EnemyTuning) -> Self {
        Self {
            health: tuning.funny_health,
            size: tuning.size,
            leg: start_leg % PATH_DURATIONS.len(),
            leg_timer: 0,
            walk: WalkCycle::default(),
        }
    }

    pub fn spawn(level: &mut Level, position: Vec2, start_leg: usize, settings: &Settings) -> EntityId {
        let size = settings.enemies.size;
        level.register(
            Polygon::rectangle(size, size, position),
            Body::FunnyEnemy(Self::new(start_leg, &settings.enemies)),
        )
    }

    pub fn leg(&self) -> usize {
        self.leg
    }
}

impl Behavior for FunnyEnemy {
    fn update(
        &mut self,
        _me: EntityId,
        shape: &mut Polygon,
        _level: &mut Level,
        ctx: &mut FrameContext<'_>,
    ) -> SimResult<()> {
        self.leg_timer += 1;
        if self.leg_timer >= PATH_DURATIONS[self.leg] {
            self.leg_timer = 0;
            self.leg = (self.leg + 1) % PATH_DURATIONS.len();
        }
        shape.translate(PATH_DIRECTIONS[self.leg] * ctx.settings.enemies.funny_path_speed);
        self.walk.step();
        Ok(())
    }

    fn render(&self, shape: &Polygon, view: &RenderView, renderer: &mut dyn Renderer) {
        let position = shape.position;
        renderer.draw_sprite(
            &SpriteDraw::new(FUNNY_ENEMY_IMAGE, position + self.walk.offset(), Vec2::splat(self.size))
                .angle(self.walk.angle())
                .depth(depth_from_screen_position(position, view.scroll_point)),
        );
        draw_drop_shadow(
            renderer,
            position + Vec2::new(0.0, self.size / 2.0),
            Vec2::new(50.0, 25.0),
            0.4,
        );
    }
}

impl Damageable for FunnyEnemy {
    fn health(&self) -> i32 {
        self.health
    }

    fn take_hit(&mut self, hit: &Hit, _settings: &Settings) -> DamageOutcome {
        if self.health <= 0 {
            return DamageOutcome::Ignored;
        }
        self.health -= hit.damage;
        if self.health <= 0 {
            DamageOutcome::Killed
        } else {
            DamageOutcome::Wounded
        }
    }

    fn debris(&self, settings: &Settings) -> DebrisSpec {
        DebrisSpec {
            image: FUNNY_ENEMY_IMAGE,
            chunk_count: settings.enemies.debris_chunks,
            origin: debris_origin(self.size),
            size: Vec2::splat(self.size),
        }
    }
}

/// Bounces around the room and shoots lasers at the player
#[derive(Debug, Clone, PartialEq)]
pub struct LazerEnemy {
    health: i32,
    size: f32,
    velocity: Vec2,
    damage_impulse: Vec2,
    knockback_start: Vec2,
    invincible_timer: u32,
    invincible_frames: u32,
    laser_timer: u32,
    walk: WalkCycle,
}

impl LazerEnemy {
    pub fn new(tuning: &EnemyTuning) -> Self {
        Self {
            health: tuning.lazer_health,
            size: tuning.size,
            velocity: Vec2::new(1.0, 1.0).normalize() * tuning.lazer_speed,
            damage_impulse: Vec2::ZERO,
            knockback_start: Vec2::ZERO,
            invincible_timer: 0,
            invincible_frames: tuning.lazer_invincible_frames,
            laser_timer: tuning.laser_cooldown,
            walk: WalkCycle::default(),
        }
    }

    pub fn spawn(level: &mut Level, position: Vec2, settings: &Settings) -> EntityId {
        let size = settings.enemies.size;
        level.register(
            Polygon::rectangle(size, size, position),
            Body::LazerEnemy(Self::new(&settings.enemies)),
        )
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_timer > 0
    }

    fn shoot(&mut self, position: Vec2, level: &mut Level, settings: &Settings) -> SimResult<()> {
        if self.laser_timer > 0 {
            self.laser_timer -= 1;
            return Ok(());
        }
        let Some(target) = level.player()?.map(|player| player.position()) else {
            return Ok(());
        };
        let aim = (target - position).normalize_or_zero();
        if aim != Vec2::ZERO {
            Laser::spawn(level, position, aim * settings.projectiles.laser_speed);
            self.laser_timer = settings.enemies.laser_cooldown;
        }
        Ok(())
    }

    /// Ease the knockback off linearly over the invincibility window
    fn decay_invincibility(&mut self, speed: f32) {
        if self.invincible_timer > 0 {
            self.damage_impulse =
                self.knockback_start * remaining(self.invincible_timer, self.invincible_frames);
            self.invincible_timer -= 1;
            if self.invincible_timer == 0 {
                self.damage_impulse = Vec2::ZERO;
                self.knockback_start = Vec2::ZERO;
                // Knockback may have changed the speed; restore it
                self.velocity = self.velocity.normalize_or_zero() * speed;
            }
        }
    }
}

impl Behavior for LazerEnemy {
    fn update(
        &mut self,
        _me: EntityId,
        shape: &mut Polygon,
        level: &mut Level,
        ctx: &mut FrameContext<'_>,
    ) -> SimResult<()> {
        let mut motion = self.velocity;
        if self.is_invincible() {
            motion += self.damage_impulse;
        }

        let wall = level.wall_shape()?;
        match shape.swept_intersect(motion, wall) {
            Some(hit) => {
                let (mut displacement, reflected) = bounce_motion(motion, &hit, BOUNCE_SKIN);
                if shape.swept_intersect(displacement, wall).is_some() {
                    // Reflected remainder runs into a second wall (a corner):
                    // stop at the first contact this frame
                    let pre_contact = hit.distance() / motion.length();
                    displacement = motion * (pre_contact - BOUNCE_SKIN).max(0.0);
                }
                shape.translate(displacement);
                self.velocity = reflected;
                self.damage_impulse = Vec2::ZERO;
                self.knockback_start = Vec2::ZERO;
            }
            None => shape.translate(motion),
        }

        self.decay_invincibility(ctx.settings.enemies.lazer_speed);
        self.shoot(shape.position, level, ctx.settings)?;
        self.walk.step();
        Ok(())
    }

    fn render(&self, shape: &Polygon, view: &RenderView, renderer: &mut dyn Renderer) {
        let position = shape.position;
        // Blink while invincible
        let visible = (self.invincible_timer / 3) % 2 == 0;
        let filter = if visible { Vec4::ONE } else { Vec4::ZERO };
        renderer.draw_sprite(
            &SpriteDraw::new(LAZER_ENEMY_IMAGE, position + self.walk.offset(), Vec2::splat(self.size))
                .angle(self.walk.angle())
                .color(filter)
                .depth(depth_from_screen_position(position, view.scroll_point)),
        );
        draw_drop_shadow(
            renderer,
            position + Vec2::new(0.0, self.size / 2.0),
            Vec2::new(50.0, 25.0),
            0.4,
        );
    }
}

impl Damageable for LazerEnemy {
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
        if self.health <= 0 {
            DamageOutcome::Killed
        } else {
            DamageOutcome::Wounded
        }
    }

    fn debris(&self, settings: &Settings) -> DebrisSpec {
        DebrisSpec {
            image: LAZER_ENEMY_IMAGE,
            chunk_count: settings.enemies.debris_chunks,
            origin: debris_origin(self.size),
            size: Vec2::splat(self.size),
        }
    }
}
