//! Fixed-step frame driver
//!
//! One frame is one update pass over the current level followed by one render
//! pass. All randomness comes from the seeded RNG held here, so a run is
//! reproducible from its settings and input sequence.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::error::SimResult;
use super::fragment::PixelCache;
use super::main_area::MainArea;
use super::manager::LevelManager;
use crate::consts::MAIN_AREA_TAG;
use crate::platform::{ContentSource, InputSnapshot};
use crate::renderer::Renderer;
use crate::settings::Settings;

/// Everything an update pass may read or draw from, lent for one frame
pub struct FrameContext<'a> {
    pub input: &'a InputSnapshot,
    pub content: &'a dyn ContentSource,
    pub pixels: &'a mut PixelCache,
    pub rng: &'a mut Pcg32,
    pub settings: &'a Settings,
}

/// Owns the levels and the per-run state shared between them
#[derive(Debug)]
pub struct Simulation {
    settings: Settings,
    rng: Pcg32,
    pixels: PixelCache,
    levels: LevelManager,
    frames: u64,
}

impl Simulation {
    /// Empty simulation with no levels
    pub fn new(settings: Settings) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(settings.seed),
            settings,
            pixels: PixelCache::new(),
            levels: LevelManager::new(),
            frames: 0,
        }
    }

    /// Simulation starting in the main area
    pub fn with_main_area(settings: Settings) -> SimResult<Self> {
        let mut sim = Self::new(settings);
        sim.levels
            .register(MAIN_AREA_TAG, Box::new(MainArea), &sim.settings)?;
        sim.levels.activate(MAIN_AREA_TAG)?;
        Ok(sim)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn levels(&self) -> &LevelManager {
        &self.levels
    }

    pub fn levels_mut(&mut self) -> &mut LevelManager {
        &mut self.levels
    }

    pub fn pixel_cache(&self) -> &PixelCache {
        &self.pixels
    }

    /// Frames run so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Rebuild the current level from its blueprint
    pub fn reset_level(&mut self) -> SimResult<()> {
        self.levels.reset_current(&self.settings)
    }

    /// Advance the current level one frame
    pub fn update(&mut self, input: &InputSnapshot, content: &dyn ContentSource) -> SimResult<()> {
        let mut ctx = FrameContext {
            input,
            content,
            pixels: &mut self.pixels,
            rng: &mut self.rng,
            settings: &self.settings,
        };
        self.levels.update_current(&mut ctx)?;
        self.frames += 1;
        Ok(())
    }

    pub fn render(&self, renderer: &mut dyn Renderer) {
        self.levels.render_current(renderer);
    }

    /// One update then one render
    pub fn frame(
        &mut self,
        input: &InputSnapshot,
        content: &dyn ContentSource,
        renderer: &mut dyn Renderer,
    ) -> SimResult<()> {
        self.update(input, content)?;
        self.render(renderer);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::platform::{Key, MemoryContent, RasterImage, Rgba};
    use crate::renderer::RecordingRenderer;
    use crate::sim::entity::Body;
    use crate::sim::kind::Kind;
    use glam::Vec2;

    fn content() -> MemoryContent {
        let mut content = MemoryContent::new();
        for tag in [NINJA_IMAGE, FUNNY_ENEMY_IMAGE, LAZER_ENEMY_IMAGE] {
            content.insert(tag, RasterImage::filled(48, 48, Rgba::WHITE));
        }
        content.insert(LASER_IMAGE, RasterImage::filled(32, 32, Rgba::new(255, 0, 255, 255)));
        content
    }

    fn snapshot(sim: &Simulation) -> Vec<(Kind, Vec2)> {
        let level = sim.levels().current().unwrap();
        level
            .ids()
            .iter()
            .filter_map(|id| level.get(*id))
            .map(|e| (e.kind(), e.position()))
            .collect()
    }

    #[test]
    fn test_frame_updates_then_renders() {
        let content = content();
        let mut sim = Simulation::with_main_area(Settings::default()).unwrap();
        let mut renderer = RecordingRenderer::new();
        let input = InputSnapshot::default().with_key(Key::D);

        sim.frame(&input, &content, &mut renderer).unwrap();
        assert_eq!(sim.frames(), 1);

        let level = sim.levels().current().unwrap();
        let player = level.player().unwrap().unwrap();
        assert_eq!(player.position(), Vec2::new(4.0, 0.0));
        assert_eq!(renderer.count(NINJA_IMAGE), 1);
        assert_eq!(renderer.count(TOWER_ROOM_IMAGE), 1);
        assert_eq!(renderer.count(HEART_IMAGE), 5);
    }

    #[test]
    fn test_determinism() {
        let content = content();
        let script = [
            InputSnapshot::default().with_key(Key::S),
            InputSnapshot::default().with_key(Key::Right),
            InputSnapshot::default().with_key(Key::A).with_key(Key::Up),
            InputSnapshot::default(),
        ];

        let mut a = Simulation::with_main_area(Settings::default()).unwrap();
        let mut b = Simulation::with_main_area(Settings::default()).unwrap();
        for i in 0..400 {
            let input = &script[(i / 25) % script.len()];
            a.update(input, &content).unwrap();
            b.update(input, &content).unwrap();
        }
        assert_eq!(snapshot(&a), snapshot(&b));
    }

    #[test]
    fn test_lasers_eventually_fly() {
        let content = content();
        let mut sim = Simulation::with_main_area(Settings::default()).unwrap();
        let input = InputSnapshot::default();
        let mut saw_laser = false;
        for _ in 0..200 {
            sim.update(&input, &content).unwrap();
            saw_laser |= !sim.levels().current().unwrap().query(Kind::Laser).is_empty();
        }
        assert!(saw_laser);
    }

    #[test]
    fn test_reset_level_restores_player() {
        let content = content();
        let mut sim = Simulation::with_main_area(Settings::default()).unwrap();
        let input = InputSnapshot::default().with_key(Key::W);
        for _ in 0..10 {
            sim.update(&input, &content).unwrap();
        }
        sim.reset_level().unwrap();
        let level = sim.levels().current().unwrap();
        let player = level.player().unwrap().unwrap();
        assert_eq!(player.position(), Vec2::ZERO);
        assert!(matches!(player.body, Body::Player(_)));
    }
}
