//! Level switching
//!
//! Levels are built from a [`LevelBlueprint`] and kept by tag. Exactly one is
//! current; only the current level is updated and rendered.

use std::collections::HashMap;

use glam::{Affine2, Vec4};

use super::error::{SimError, SimResult};
use super::level::Level;
use super::tick::FrameContext;
use crate::consts::WINDOW_SIZE;
use crate::renderer::Renderer;
use crate::settings::Settings;

/// Describes how to build and present one level
pub trait LevelBlueprint {
    /// Register the level's initial entities and named values
    fn populate(&self, level: &mut Level, settings: &Settings) -> SimResult<()>;

    fn clear_color(&self) -> Vec4 {
        Vec4::new(0.0, 0.0, 0.0, 1.0)
    }

    fn on_activation(&self, _level: &mut Level) {}

    fn on_deactivation(&self, _level: &mut Level) {}
}

struct LevelEntry {
    blueprint: Box<dyn LevelBlueprint>,
    level: Level,
}

/// Owns every level and tracks the current one
#[derive(Default)]
pub struct LevelManager {
    levels: HashMap<String, LevelEntry>,
    current: Option<String>,
}

impl std::fmt::Debug for LevelManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LevelManager")
            .field("levels", &self.levels.keys().collect::<Vec<_>>())
            .field("current", &self.current)
            .finish()
    }
}

impl LevelManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a level from `blueprint` and keep it under `tag`, replacing any
    /// level already registered there
    pub fn register(
        &mut self,
        tag: &str,
        blueprint: Box<dyn LevelBlueprint>,
        settings: &Settings,
    ) -> SimResult<()> {
        let mut level = Level::new();
        blueprint.populate(&mut level, settings)?;
        log::info!("Registered level '{}' with {} entities", tag, level.len());
        self.levels.insert(tag.to_string(), LevelEntry { blueprint, level });
        Ok(())
    }

    /// Make the level under `tag` current
    pub fn activate(&mut self, tag: &str) -> SimResult<()> {
        if !self.levels.contains_key(tag) {
            return Err(SimError::MissingKey {
                tag: tag.to_string(),
            });
        }
        if let Some(entry) = self.current.as_deref().and_then(|t| self.levels.get_mut(t)) {
            entry.blueprint.on_deactivation(&mut entry.level);
        }
        self.current = Some(tag.to_string());
        if let Some(entry) = self.levels.get_mut(tag) {
            entry.blueprint.on_activation(&mut entry.level);
        }
        log::info!("Activated level '{}'", tag);
        Ok(())
    }

    pub fn current_tag(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn current(&self) -> Option<&Level> {
        self.current_entry().map(|entry| &entry.level)
    }

    pub fn current_mut(&mut self) -> Option<&mut Level> {
        let tag = self.current.as_deref()?;
        self.levels.get_mut(tag).map(|entry| &mut entry.level)
    }

    fn current_entry(&self) -> Option<&LevelEntry> {
        self.current.as_deref().and_then(|tag| self.levels.get(tag))
    }

    /// Throw away the current level's state and rebuild it from its blueprint
    pub fn reset_current(&mut self, settings: &Settings) -> SimResult<()> {
        let Some(tag) = self.current.as_deref() else {
            return Ok(());
        };
        let Some(entry) = self.levels.get_mut(tag) else {
            return Ok(());
        };
        log::info!("Resetting level '{}'", tag);
        entry.level.reset();
        entry.blueprint.populate(&mut entry.level, settings)?;
        entry.blueprint.on_activation(&mut entry.level);
        Ok(())
    }

    pub fn update_current(&mut self, ctx: &mut FrameContext<'_>) -> SimResult<()> {
        match self.current_mut() {
            Some(level) => level.update(ctx),
            None => Ok(()),
        }
    }

    /// Render the current level, centring the view on its scroll point
    pub fn render_current(&self, renderer: &mut dyn Renderer) {
        let Some(entry) = self.current_entry() else {
            return;
        };
        let scroll = entry.level.scroll_point();
        renderer.begin_frame(Affine2::from_translation(-(scroll - WINDOW_SIZE / 2.0)));
        renderer.clear_screen(entry.blueprint.clear_color());
        entry.level.render(renderer);
        renderer.end_frame();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{DrawCommand, RecordingRenderer};
    use crate::sim::behaviors::Flash;
    use glam::Vec2;

    struct Sparkles(usize);

    impl LevelBlueprint for Sparkles {
        fn populate(&self, level: &mut Level, _settings: &Settings) -> SimResult<()> {
            for i in 0..self.0 {
                Flash::spawn(level, Vec2::new(i as f32, 0.0), 100);
            }
            level.store("activations", 0_u32);
            Ok(())
        }

        fn clear_color(&self) -> Vec4 {
            Vec4::new(0.1, 0.2, 0.3, 1.0)
        }

        fn on_activation(&self, level: &mut Level) {
            let count = level.retrieve::<u32>("activations").copied().unwrap_or(0);
            level.store("activations", count + 1);
        }
    }

    struct Broken;

    impl LevelBlueprint for Broken {
        fn populate(&self, level: &mut Level, _settings: &Settings) -> SimResult<()> {
            level.require_wiring()
        }
    }

    #[test]
    fn test_activate_unknown_level() {
        let mut manager = LevelManager::new();
        assert!(matches!(manager.activate("nowhere"), Err(SimError::MissingKey { .. })));
        assert!(manager.current().is_none());
    }

    #[test]
    fn test_register_propagates_populate_errors() {
        let mut manager = LevelManager::new();
        let err = manager
            .register("broken", Box::new(Broken), &Settings::default())
            .unwrap_err();
        assert!(matches!(err, SimError::MissingKey { .. }));
    }

    #[test]
    fn test_switch_and_render_current() {
        let settings = Settings::default();
        let mut manager = LevelManager::new();
        manager.register("a", Box::new(Sparkles(2)), &settings).unwrap();
        manager.register("b", Box::new(Sparkles(5)), &settings).unwrap();
        manager.activate("a").unwrap();
        assert_eq!(manager.current().unwrap().len(), 2);
        manager.activate("b").unwrap();
        assert_eq!(manager.current_tag(), Some("b"));
        assert_eq!(*manager.current().unwrap().retrieve::<u32>("activations").unwrap(), 1);

        let mut renderer = RecordingRenderer::new();
        manager.render_current(&mut renderer);
        assert!(matches!(renderer.commands.first(), Some(DrawCommand::Begin(_))));
        assert_eq!(renderer.commands[1], DrawCommand::Clear(Vec4::new(0.1, 0.2, 0.3, 1.0)));
        assert_eq!(renderer.count(crate::consts::GLOW_IMAGE), 5);
        assert_eq!(renderer.commands.last(), Some(&DrawCommand::End));
    }

    #[test]
    fn test_reset_rebuilds_current() {
        let settings = Settings::default();
        let mut manager = LevelManager::new();
        manager.register("a", Box::new(Sparkles(3)), &settings).unwrap();
        manager.activate("a").unwrap();
        let level = manager.current_mut().unwrap();
        let first = level.ids()[0];
        level.deregister(first);

        manager.reset_current(&settings).unwrap();
        let level = manager.current().unwrap();
        assert_eq!(level.len(), 3);
        assert!(!level.is_pending_removal(level.ids()[0]));
    }
}
