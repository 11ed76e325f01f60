//! Image content access
//!
//! The core never loads files; it asks a [`ContentSource`] for an image by tag
//! and reads pixels through [`ImageSource`].

use std::collections::HashMap;

use glam::Vec4;
use serde::{Deserialize, Serialize};

/// 8-bit RGBA pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.a > 0
    }

    /// Colour filter with every channel scaled by `alpha` (premultiplied fade)
    pub fn to_filter(self, alpha: f32) -> Vec4 {
        Vec4::new(
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ) * alpha
    }
}

/// Read access to an image's pixels
pub trait ImageSource {
    /// `(width, height)` in pixels
    fn size(&self) -> (u32, u32);
    /// Colour at `(x, y)`; callers stay within `size()`
    fn pixel(&self, x: u32, y: u32) -> Rgba;
}

/// Resolves image tags to images
pub trait ContentSource {
    fn image(&self, id: &str) -> Option<&dyn ImageSource>;
}

/// Row-major in-memory image
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl RasterImage {
    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; (width * height) as usize],
        }
    }

    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Rgba) -> Self {
        let mut pixels = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }
}

impl ImageSource for RasterImage {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn pixel(&self, x: u32, y: u32) -> Rgba {
        self.pixels[(x + y * self.width) as usize]
    }
}

/// Content store backed by a map of in-memory images
#[derive(Debug, Clone, Default)]
pub struct MemoryContent {
    images: HashMap<String, RasterImage>,
}

impl MemoryContent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, image: RasterImage) {
        self.images.insert(id.into(), image);
    }

    pub fn with_image(mut self, id: impl Into<String>, image: RasterImage) -> Self {
        self.insert(id, image);
        self
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl ContentSource for MemoryContent {
    fn image(&self, id: &str) -> Option<&dyn ImageSource> {
        self.images.get(id).map(|img| img as &dyn ImageSource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fn_is_row_major() {
        let img = RasterImage::from_fn(3, 2, |x, y| Rgba::new(x as u8, y as u8, 0, 255));
        assert_eq!(img.size(), (3, 2));
        assert_eq!(img.pixel(2, 1), Rgba::new(2, 1, 0, 255));
    }

    #[test]
    fn test_memory_content_lookup() {
        let content = MemoryContent::new().with_image("blank", RasterImage::filled(1, 1, Rgba::WHITE));
        assert!(content.image("blank").is_some());
        assert!(content.image("missing").is_none());
    }

    #[test]
    fn test_filter_scales_by_alpha() {
        let f = Rgba::WHITE.to_filter(0.5);
        assert!((f.w - 0.5).abs() < 1e-6);
        assert!((f.x - 0.5).abs() < 1e-6);
    }
}
