use glam::{Vec2, Vec4};

use super::remaining;
use crate::consts::{BLANK_IMAGE, GLOW_IMAGE};
use crate::renderer::{Renderer, SpriteDraw};
use crate::sim::entity::{Behavior, Body, EntityId, RenderView};
use crate::sim::error::SimResult;
use crate::sim::fragment::Fragmentation;
use crate::sim::level::Level;
use crate::sim::polygon::Polygon;
use crate::sim::tick::FrameContext;

const OUTLINE_THICKNESS: f32 = 4.0;
const FLASH_SIZE: Vec2 = Vec2::new(96.0, 96.0);
const FLASH_COLOR: Vec4 = Vec4::new(0.75, 0.0, 1.0, 1.0);

/// Static level boundary
#[derive(Debug, Clone, PartialEq)]
pub enum Wall {
    /// Draw each edge as a thin line
    Outline,
    /// Draw a backdrop image centred on the wall
    Image { image: String, size: Vec2 },
}

impl Wall {
    pub fn outline() -> Self {
        Wall::Outline
    }

    pub fn with_image(image: &str, size: Vec2) -> Self {
        Wall::Image {
            image: image.to_string(),
            size,
        }
    }

    /// Register a wall, refusing boundaries the swept test can't collide with
    pub fn spawn(level: &mut Level, shape: Polygon, wall: Wall) -> SimResult<EntityId> {
        shape.require_edges()?;
        Ok(level.register(shape, Body::Wall(wall)))
    }
}

impl Behavior for Wall {
    fn update(
        &mut self,
        _me: EntityId,
        _shape: &mut Polygon,
        _level: &mut Level,
        _ctx: &mut FrameContext<'_>,
    ) -> SimResult<()> {
        Ok(())
    }

    fn render(&self, shape: &Polygon, _view: &RenderView, renderer: &mut dyn Renderer) {
        match self {
            Wall::Image { image, size } => {
                renderer.draw_sprite(&SpriteDraw::new(image, shape.centroid(), *size).depth(1.0));
            }
            Wall::Outline => {
                for (a, b) in shape.edges() {
                    let edge = b - a;
                    renderer.draw_sprite(
                        &SpriteDraw::new(
                            BLANK_IMAGE,
                            (a + b) / 2.0,
                            Vec2::new(edge.length(), OUTLINE_THICKNESS),
                        )
                        .angle(edge.to_angle())
                        .depth(1.0),
                    );
                }
            }
        }
    }
}

/// Additive glow that shrinks and fades over a few frames
#[derive(Debug, Clone, PartialEq)]
pub struct Flash {
    frames: u32,
    timer: u32,
}

impl Flash {
    pub fn new(frames: u32) -> Self {
        Self { frames, timer: frames }
    }

    pub fn spawn(level: &mut Level, position: Vec2, frames: u32) -> EntityId {
        level.register(Polygon::point(position), Body::Flash(Self::new(frames)))
    }
}

impl Behavior for Flash {
    fn update(
        &mut self,
        me: EntityId,
        _shape: &mut Polygon,
        level: &mut Level,
        _ctx: &mut FrameContext<'_>,
    ) -> SimResult<()> {
        if self.timer == 0 {
            level.deregister(me);
        } else {
            self.timer -= 1;
        }
        Ok(())
    }

    fn render(&self, shape: &Polygon, _view: &RenderView, renderer: &mut dyn Renderer) {
        let t = remaining(self.timer, self.frames);
        renderer.draw_sprite(
            &SpriteDraw::new(GLOW_IMAGE, shape.position, FLASH_SIZE * (0.5 + 0.5 * t))
                .color(FLASH_COLOR * t)
                .additive(),
        );
    }
}

/// A shattered sprite; removes itself once every chunk has faded
#[derive(Debug, Clone)]
pub struct Debris {
    fragments: Fragmentation,
}

impl Debris {
    pub fn new(fragments: Fragmentation) -> Self {
        Self { fragments }
    }

    pub fn fragments(&self) -> &Fragmentation {
        &self.fragments
    }
}

impl Behavior for Debris {
    fn update(
        &mut self,
        me: EntityId,
        _shape: &mut Polygon,
        level: &mut Level,
        ctx: &mut FrameContext<'_>,
    ) -> SimResult<()> {
        if !self.fragments.step(&ctx.settings.debris) {
            log::trace!("Debris {} finished", me.0);
            level.deregister(me);
        }
        Ok(())
    }

    fn render(&self, _shape: &Polygon, _view: &RenderView, renderer: &mut dyn Renderer) {
        self.fragments.render(renderer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RecordingRenderer;
    use crate::sim::behaviors::test_support::Harness;
    use crate::sim::error::SimError;
    use crate::sim::fragment::{PixelBuffer, ShatterParams};
    use crate::sim::kind::Kind;
    use crate::platform::{RasterImage, Rgba};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_outline_draws_one_line_per_edge() {
        let mut level = Level::new();
        Wall::spawn(&mut level, Polygon::rectangle(100.0, 50.0, Vec2::ZERO), Wall::outline()).unwrap();
        let mut renderer = RecordingRenderer::new();
        level.render(&mut renderer);
        let lines: Vec<_> = renderer.sprites().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].position, Vec2::new(0.0, -25.0));
        assert_eq!(lines[0].size, Vec2::new(100.0, OUTLINE_THICKNESS));
    }

    #[test]
    fn test_image_wall_draws_backdrop() {
        let mut level = Level::new();
        Wall::spawn(
            &mut level,
            Polygon::rectangle(100.0, 50.0, Vec2::new(5.0, 5.0)),
            Wall::with_image("room", Vec2::new(120.0, 70.0)),
        )
        .unwrap();
        let mut renderer = RecordingRenderer::new();
        level.render(&mut renderer);
        assert_eq!(renderer.count("room"), 1);
        let backdrop = renderer.sprites().next().unwrap();
        assert_eq!(backdrop.position, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_degenerate_wall_is_rejected() {
        let mut level = Level::new();
        let err = Wall::spawn(&mut level, Polygon::point(Vec2::ZERO), Wall::outline()).unwrap_err();
        assert_eq!(err, SimError::DegenerateGeometry);
        assert!(level.is_empty());
    }

    #[test]
    fn test_flash_expires() {
        let mut h = Harness::new();
        let mut level = Level::new();
        let id = Flash::spawn(&mut level, Vec2::ZERO, 3);
        for _ in 0..3 {
            h.update(&mut level).unwrap();
            assert!(level.get(id).is_some());
        }
        h.update(&mut level).unwrap();
        assert!(level.get(id).is_none());
    }

    #[test]
    fn test_flash_fades_as_it_ages() {
        let mut flash = Flash::new(4);
        let mut renderer = RecordingRenderer::new();
        let view = RenderView {
            scroll_point: Vec2::ZERO,
        };
        flash.render(&Polygon::point(Vec2::ZERO), &view, &mut renderer);
        flash.timer = 2;
        flash.render(&Polygon::point(Vec2::ZERO), &view, &mut renderer);
        let sprites: Vec<_> = renderer.sprites().collect();
        assert!(sprites[1].color.w < sprites[0].color.w);
        assert!(sprites[1].size.x < sprites[0].size.x);
        assert!(sprites.iter().all(|s| s.additive));
    }

    #[test]
    fn test_debris_removes_itself_when_faded() {
        let mut h = Harness::new();
        let mut level = Level::new();
        let pixels = PixelBuffer::from_image(&RasterImage::filled(4, 4, Rgba::WHITE));
        let params = ShatterParams {
            chunk_count: 3,
            min_speed: 6.0,
            max_speed: 10.0,
            origin: Vec2::new(2.0, 2.0),
            top_left: Vec2::ZERO,
            ground_y: 4.0,
        };
        let mut rng = Pcg32::seed_from_u64(3);
        let fragments = Fragmentation::shatter(&pixels, &params, &mut rng);
        let id = level.register(Polygon::point(Vec2::ZERO), Body::Debris(Debris::new(fragments)));

        let mut frames = 0;
        while level.get(id).is_some() {
            h.update(&mut level).unwrap();
            frames += 1;
            assert!(frames < 1000, "debris never finished");
        }
        assert!(level.query(Kind::Debris).is_empty());
    }
}
