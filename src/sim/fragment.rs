//! Sprite fragmentation
//!
//! Shatters an image into chunks by nearest-seed partition (a brute-force
//! Voronoi split of the pixel grid), then simulates each chunk as a small
//! ballistic body that falls to a ground line, bounces at most once, settles
//! and fades out.

use std::collections::HashMap;
use std::sync::Arc;

use glam::Vec2;
use rand::Rng;

use super::error::{SimError, SimResult};
use crate::consts::{BLANK_IMAGE, DROP_SHADOW_IMAGE, SHADOW_DEPTH};
use crate::platform::{ContentSource, ImageSource, Rgba};
use crate::renderer::{Renderer, SpriteDraw};
use crate::settings::DebrisTuning;

/// Lower bounds applied to chunk physics so every chunk eventually lands and fades
const MIN_GRAVITY: f32 = 0.01;
const MIN_FADE_RATE: f32 = 0.001;

/// Pixel count of a `width` x `height` image, widened before multiplying
#[inline]
fn area(width: u32, height: u32) -> usize {
    width as usize * height as usize
}

/// Raw pixels of an image, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pixels: Vec<Rgba>,
}

impl PixelBuffer {
    pub fn from_image(image: &dyn ImageSource) -> Self {
        let (width, height) = image.size();
        let mut pixels = Vec::with_capacity(area(width, height));
        for y in 0..height {
            for x in 0..width {
                pixels.push(image.pixel(x, y));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Rgba {
        self.pixels[x as usize + y as usize * self.width as usize]
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

/// Image tag -> pixel buffer, filled once per distinct image.
///
/// Entries are never replaced, so handed-out buffers stay valid and immutable.
#[derive(Debug, Default)]
pub struct PixelCache {
    entries: HashMap<String, Arc<PixelBuffer>>,
}

impl PixelCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pixels for `image`, reading them from `content` on first use
    pub fn resolve(&mut self, image: &str, content: &dyn ContentSource) -> SimResult<Arc<PixelBuffer>> {
        if let Some(buffer) = self.entries.get(image) {
            return Ok(Arc::clone(buffer));
        }
        let source = content.image(image).ok_or_else(|| SimError::MissingKey {
            tag: image.to_string(),
        })?;
        let buffer = Arc::new(PixelBuffer::from_image(source));
        log::debug!(
            "Cached pixels for '{}' ({}x{})",
            image,
            buffer.width,
            buffer.height
        );
        self.entries.insert(image.to_string(), Arc::clone(&buffer));
        Ok(buffer)
    }

    pub fn get(&self, image: &str) -> Option<Arc<PixelBuffer>> {
        self.entries.get(image).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Tight pixel bounds, inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Bounds {
    fn at(x: u32, y: u32) -> Self {
        Self {
            left: x,
            top: y,
            right: x,
            bottom: y,
        }
    }

    fn include(&mut self, x: u32, y: u32) {
        self.left = self.left.min(x);
        self.right = self.right.max(x);
        self.top = self.top.min(y);
        self.bottom = self.bottom.max(y);
    }
}

/// One pixel owned by a chunk, in source-image coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChunkPixel {
    pub x: u32,
    pub y: u32,
    pub color: Rgba,
}

/// Chunk lifecycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChunkPhase {
    /// Falling; `bounced` once the single allowed bounce is spent
    Airborne { bounced: bool },
    /// Resting on the ground, alpha decreasing
    Fading,
}

/// A shattered piece of an image
#[derive(Debug, Clone)]
pub struct Chunk {
    pixels: Vec<ChunkPixel>,
    bounds: Bounds,
    /// World position of the source image's top-left corner
    pub position: Vec2,
    pub velocity: Vec2,
    pub alpha: f32,
    pub phase: ChunkPhase,
    ground_y: f32,
}

impl Chunk {
    fn new(x: u32, y: u32, position: Vec2, velocity: Vec2, ground_y: f32) -> Self {
        Self {
            pixels: Vec::new(),
            bounds: Bounds::at(x, y),
            position,
            velocity,
            alpha: 1.0,
            phase: ChunkPhase::Airborne { bounced: false },
            ground_y,
        }
    }

    fn push(&mut self, pixel: ChunkPixel) {
        self.bounds.include(pixel.x, pixel.y);
        self.pixels.push(pixel);
    }

    pub fn pixels(&self) -> &[ChunkPixel] {
        &self.pixels
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// World Y of the chunk's lowest pixel row
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.position.y + self.bounds.bottom as f32
    }

    pub fn has_bounced(&self) -> bool {
        matches!(self.phase, ChunkPhase::Airborne { bounced: true })
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.alpha <= 0.0
    }

    /// Advance one frame; returns `false` once the chunk has faded out
    pub fn step(&mut self, tuning: &DebrisTuning) -> bool {
        match self.phase {
            ChunkPhase::Airborne { bounced } => {
                self.velocity.y += tuning.gravity.max(MIN_GRAVITY);
                self.position += self.velocity;

                if self.bottom() >= self.ground_y {
                    self.position.y = self.ground_y - self.bounds.bottom as f32;
                    if !bounced && self.velocity.y > tuning.bounce_threshold {
                        self.velocity.x *= tuning.bounce_damping;
                        self.velocity.y *= -tuning.bounce_damping;
                        self.phase = ChunkPhase::Airborne { bounced: true };
                    } else {
                        self.velocity = Vec2::ZERO;
                        self.phase = ChunkPhase::Fading;
                    }
                }
            }
            ChunkPhase::Fading => {
                self.alpha = (self.alpha - tuning.fade_rate.max(MIN_FADE_RATE)).max(0.0);
            }
        }
        !self.is_dead()
    }

    fn render(&self, renderer: &mut dyn Renderer) {
        if self.alpha > 0.0 {
            for p in self.pixels.iter().filter(|p| p.color.is_visible()) {
                let at = self.position + Vec2::new(p.x as f32, p.y as f32);
                renderer.draw_sprite(
                    &SpriteDraw::new(BLANK_IMAGE, at, Vec2::ONE).color(p.color.to_filter(self.alpha)),
                );
            }
        }

        let shadow_x = self.position.x
            + (self.bounds.right - self.bounds.left) as f32 / 2.0
            + self.bounds.left as f32;
        renderer.draw_sprite(
            &SpriteDraw::new(
                DROP_SHADOW_IMAGE,
                Vec2::new(shadow_x, self.ground_y),
                Vec2::new(30.0, 15.0),
            )
            .faded(0.3 * self.alpha)
            .depth(SHADOW_DEPTH),
        );
    }
}

/// How to shatter an image
#[derive(Debug, Clone, PartialEq)]
pub struct ShatterParams {
    /// Number of seed points (at least one is used)
    pub chunk_count: usize,
    /// Initial chunk speed range `[min, max)`
    pub min_speed: f32,
    pub max_speed: f32,
    /// Burst origin in image coordinates; chunks fly away from it
    pub origin: Vec2,
    /// World position of the image's top-left corner
    pub top_left: Vec2,
    /// World Y where chunks land
    pub ground_y: f32,
}

/// The chunks of one shattered image
#[derive(Debug, Clone)]
pub struct Fragmentation {
    chunks: Vec<Chunk>,
}

impl Fragmentation {
    /// Partition every pixel of `pixels` into chunks around random seeds
    pub fn shatter<R: Rng>(pixels: &PixelBuffer, params: &ShatterParams, rng: &mut R) -> Self {
        if pixels.is_empty() {
            return Self { chunks: Vec::new() };
        }

        let seeds: Vec<Vec2> = (0..params.chunk_count.max(1))
            .map(|_| {
                Vec2::new(
                    rng.random_range(0..pixels.width) as f32,
                    rng.random_range(0..pixels.height) as f32,
                )
            })
            .collect();

        let mut chunk_of_seed: Vec<Option<usize>> = vec![None; seeds.len()];
        let mut chunks: Vec<Chunk> = Vec::new();

        for x in 0..pixels.width {
            for y in 0..pixels.height {
                let point = Vec2::new(x as f32, y as f32);
                let mut nearest = 0;
                let mut nearest_dist = f32::MAX;
                for (i, seed) in seeds.iter().enumerate() {
                    let dist = (point - *seed).length_squared();
                    if dist < nearest_dist {
                        nearest_dist = dist;
                        nearest = i;
                    }
                }

                let index = match chunk_of_seed[nearest] {
                    Some(index) => index,
                    None => {
                        let speed = if params.max_speed > params.min_speed {
                            rng.random_range(params.min_speed..params.max_speed)
                        } else {
                            params.min_speed
                        };
                        let direction = (seeds[nearest] - params.origin).normalize_or_zero();
                        chunks.push(Chunk::new(
                            x,
                            y,
                            params.top_left,
                            direction * speed,
                            params.ground_y,
                        ));
                        chunk_of_seed[nearest] = Some(chunks.len() - 1);
                        chunks.len() - 1
                    }
                };

                chunks[index].push(ChunkPixel {
                    x,
                    y,
                    color: pixels.get(x, y),
                });
            }
        }

        Self { chunks }
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Total pixels across all chunks
    pub fn pixel_count(&self) -> usize {
        self.chunks.iter().map(|c| c.pixels.len()).sum()
    }

    /// Advance every chunk one frame; returns `true` while any chunk is alive
    pub fn step(&mut self, tuning: &DebrisTuning) -> bool {
        let mut alive = 0;
        for chunk in &mut self.chunks {
            if !chunk.is_dead() && chunk.step(tuning) {
                alive += 1;
            }
        }
        alive > 0
    }

    /// True once every chunk has faded out
    pub fn is_finished(&self) -> bool {
        self.chunks.iter().all(Chunk::is_dead)
    }

    pub fn render(&self, renderer: &mut dyn Renderer) {
        for chunk in &self.chunks {
            chunk.render(renderer);
        }
    }
}
