//! Rendering collaborator
//!
//! The simulation owns no pixels or device state. Entities describe what to
//! draw through [`Renderer`]; the host decides how (sprite batches, GPU, or
//! the in-memory [`RecordingRenderer`] used headless and in tests).

use glam::{Affine2, Vec2, Vec4};

/// One sprite draw request
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteDraw {
    /// Image tag
    pub image: String,
    /// World position of the sprite centre
    pub position: Vec2,
    /// Drawn size in world units
    pub size: Vec2,
    /// Rotation in radians
    pub angle: f32,
    /// Multiplicative colour filter (white = unfiltered)
    pub color: Vec4,
    /// Sort depth, 0 = front, 1 = back
    pub depth: f32,
    /// Draw with additive blending
    pub additive: bool,
}

impl SpriteDraw {
    pub fn new(image: &str, position: Vec2, size: Vec2) -> Self {
        Self {
            image: image.to_string(),
            position,
            size,
            angle: 0.0,
            color: Vec4::ONE,
            depth: 0.0,
            additive: false,
        }
    }

    pub fn angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    pub fn color(mut self, color: Vec4) -> Self {
        self.color = color;
        self
    }

    /// White filter scaled by `alpha`
    pub fn faded(mut self, alpha: f32) -> Self {
        self.color = Vec4::ONE * alpha;
        self
    }

    pub fn depth(mut self, depth: f32) -> Self {
        self.depth = depth;
        self
    }

    pub fn additive(mut self) -> Self {
        self.additive = true;
        self
    }
}

/// Draw surface the simulation renders into
pub trait Renderer {
    /// Start a frame with the given world-to-view transform
    fn begin_frame(&mut self, view: Affine2);
    fn clear_screen(&mut self, color: Vec4);
    fn draw_sprite(&mut self, sprite: &SpriteDraw);
    fn end_frame(&mut self);
}

/// A recorded renderer call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Begin(Affine2),
    Clear(Vec4),
    Sprite(SpriteDraw),
    End,
}

/// Renderer that records every call, for headless runs and tests
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub commands: Vec<DrawCommand>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Sprites drawn so far
    pub fn sprites(&self) -> impl Iterator<Item = &SpriteDraw> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Sprite(s) => Some(s),
            _ => None,
        })
    }

    /// Number of sprites drawn with the given image tag
    pub fn count(&self, image: &str) -> usize {
        self.sprites().filter(|s| s.image == image).count()
    }
}

impl Renderer for RecordingRenderer {
    fn begin_frame(&mut self, view: Affine2) {
        self.commands.push(DrawCommand::Begin(view));
    }

    fn clear_screen(&mut self, color: Vec4) {
        self.commands.push(DrawCommand::Clear(color));
    }

    fn draw_sprite(&mut self, sprite: &SpriteDraw) {
        self.commands.push(DrawCommand::Sprite(sprite.clone()));
    }

    fn end_frame(&mut self) {
        self.commands.push(DrawCommand::End);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let s = SpriteDraw::new("ninja", Vec2::ZERO, Vec2::splat(48.0));
        assert_eq!(s.color, Vec4::ONE);
        assert!(!s.additive);

        let s = s.faded(0.5).depth(0.3).additive().angle(1.0);
        assert_eq!(s.color, Vec4::splat(0.5));
        assert!(s.additive);
        assert_eq!(s.depth, 0.3);
        assert_eq!(s.angle, 1.0);
    }

    #[test]
    fn test_recording_counts() {
        let mut r = RecordingRenderer::new();
        r.begin_frame(Affine2::IDENTITY);
        r.draw_sprite(&SpriteDraw::new("a", Vec2::ZERO, Vec2::ONE));
        r.draw_sprite(&SpriteDraw::new("a", Vec2::ONE, Vec2::ONE));
        r.draw_sprite(&SpriteDraw::new("b", Vec2::ONE, Vec2::ONE));
        r.end_frame();
        assert_eq!(r.count("a"), 2);
        assert_eq!(r.sprites().count(), 3);
        assert_eq!(r.commands.len(), 5);
    }
}
