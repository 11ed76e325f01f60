//! Crawler entry point
//!
//! Runs the simulation headless with generated placeholder art and a scripted
//! input sequence, logging a summary as it goes.
//!
//! Usage: `crawler [settings.json] [frames]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::PathBuf;

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let settings_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("crawler.json"));
    let frames: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(600);

    if let Err(e) = headless::run(&settings_path, frames) {
        log::error!("Simulation failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is embedded by a host on the web; nothing to run here
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::Path;

    use crawler::consts::*;
    use crawler::platform::{InputSnapshot, Key, MemoryContent, RasterImage, Rgba};
    use crawler::renderer::RecordingRenderer;
    use crawler::sim::Kind;
    use crawler::{Settings, SimResult, Simulation};

    /// Frames each scripted input is held for
    const SCRIPT_STEP: u64 = 40;

    pub fn run(settings_path: &Path, frames: u64) -> SimResult<()> {
        let settings = Settings::load(settings_path)?;
        log::info!("Crawler (headless) starting, seed {:#x}", settings.seed);

        let content = placeholder_content();
        let script = input_script();
        let mut sim = Simulation::with_main_area(settings)?;
        let mut renderer = RecordingRenderer::new();

        for frame in 0..frames {
            let input = &script[((frame / SCRIPT_STEP) as usize) % script.len()];
            renderer.clear();
            sim.frame(input, &content, &mut renderer)?;

            if frame % 60 == 0 {
                log_summary(&sim, &renderer);
            }
        }

        log_summary(&sim, &renderer);
        log::info!(
            "Done after {} frames ({} images cached for shattering)",
            sim.frames(),
            sim.pixel_cache().len()
        );
        Ok(())
    }

    fn log_summary(sim: &Simulation, renderer: &RecordingRenderer) {
        let Some(level) = sim.levels().current() else {
            return;
        };
        let health = level
            .player()
            .ok()
            .flatten()
            .and_then(|p| p.health())
            .unwrap_or(0);
        log::info!(
            "frame {:>5}: {} entities, {} enemies, {} projectiles, {} effects, health {}, {} sprites",
            sim.frames(),
            level.len(),
            level.query(Kind::Enemy).len(),
            level.query(Kind::Projectile).len(),
            level.query(Kind::Effect).len(),
            health,
            renderer.sprites().count()
        );
    }

    /// Walk a loop around the room, throwing in every direction
    fn input_script() -> Vec<InputSnapshot> {
        vec![
            InputSnapshot::new([Key::D, Key::Up]),
            InputSnapshot::new([Key::S, Key::Right]),
            InputSnapshot::new([Key::A, Key::Down]),
            InputSnapshot::new([Key::W, Key::Left]),
            InputSnapshot::default(),
        ]
    }

    /// Flat-coloured sprites with transparent corners, enough to shatter
    fn placeholder_content() -> MemoryContent {
        let sprite = |size: u32, color: Rgba| {
            let r = size as f32 / 2.0;
            RasterImage::from_fn(size, size, move |x, y| {
                let dx = x as f32 + 0.5 - r;
                let dy = y as f32 + 0.5 - r;
                if dx * dx + dy * dy <= r * r {
                    color
                } else {
                    Rgba::TRANSPARENT
                }
            })
        };

        MemoryContent::new()
            .with_image(NINJA_IMAGE, sprite(48, Rgba::new(40, 40, 60, 255)))
            .with_image(FUNNY_ENEMY_IMAGE, sprite(48, Rgba::new(230, 160, 40, 255)))
            .with_image(LAZER_ENEMY_IMAGE, sprite(48, Rgba::new(200, 40, 220, 255)))
            .with_image(LASER_IMAGE, sprite(32, Rgba::new(255, 80, 255, 255)))
            .with_image(SHURIKEN_IMAGE, sprite(16, Rgba::new(180, 180, 190, 255)))
            .with_image(BLANK_IMAGE, RasterImage::filled(1, 1, Rgba::WHITE))
    }
}
