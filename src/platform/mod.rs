//! Platform abstraction layer
//!
//! What the simulation needs from the host, expressed as plain data and traits:
//! - Input: a read-only key snapshot sampled once per frame
//! - Content: image lookup by tag, exposing size and per-pixel colour

pub mod content;
pub mod input;

pub use content::{ContentSource, ImageSource, MemoryContent, RasterImage, Rgba};
pub use input::{InputSnapshot, Key};
