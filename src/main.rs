//! Rockfall headless driver
//!
//! Runs the engine against a counting render surface with an autopilot
//! steering the ship, restarting after every game over.
//!
//! Usage: `rockfall [FRAMES]`, settings from `$ROCKFALL_SETTINGS` if set.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Mat4;
    use rockfall::input::SharedTilt;
    use rockfall::renderer::{
        DrawableId, QuadHandle, QuadVertex, RenderSurface, SpriteInstance, TextureHandle,
        TextureLoader,
    };
    use rockfall::sim::{GamePhase, World};
    use rockfall::{GameEngine, Settings, SoundBoard, audio::LogPlayer};

    const DEFAULT_FRAMES: u64 = 3600;
    const SURFACE_WIDTH: u32 = 1080;
    const SURFACE_HEIGHT: u32 = 1920;
    /// Distance at which the autopilot applies full tilt
    const STEER_RANGE: f32 = 0.1;

    /// Counts draw submissions instead of drawing
    #[derive(Default)]
    struct CountingSurface {
        quads: u32,
        draw_calls: u64,
        sprites: u64,
    }

    impl RenderSurface for CountingSurface {
        fn upload_quad(&mut self, _vertices: &[QuadVertex], _indices: &[u16]) -> QuadHandle {
            self.quads += 1;
            QuadHandle(self.quads)
        }

        fn draw_batch(&mut self, _quad: QuadHandle, _texture: TextureHandle, instances: &[SpriteInstance]) {
            self.draw_calls += 1;
            self.sprites += instances.len() as u64;
        }
    }

    /// Hands out sequential texture ids
    #[derive(Default)]
    struct SequentialLoader {
        next: u32,
    }

    impl TextureLoader for SequentialLoader {
        fn load(&mut self, id: &DrawableId) -> TextureHandle {
            self.next += 1;
            log::trace!("Texture {} for {:?}", self.next, id);
            TextureHandle(self.next)
        }
    }

    /// Steer under the lowest falling rock
    fn autopilot(world: &World) -> f32 {
        let player_x = world.player.body.position.x;
        let lowest = world
            .active_hazards
            .iter()
            .map(|&slot| world.hazards.get(slot).body.position)
            .filter(|p| p.y > world.player.body.position.y)
            .min_by(|a, b| a.y.total_cmp(&b.y));

        match lowest {
            Some(rock) => ((rock.x - player_x) / STEER_RANGE).clamp(-1.0, 1.0),
            None => (-player_x / STEER_RANGE).clamp(-1.0, 1.0),
        }
    }

    pub fn run() {
        env_logger::init();
        log::info!("Rockfall (headless) starting...");

        let settings = match std::env::var_os("ROCKFALL_SETTINGS") {
            Some(path) => Settings::load_or_default(path),
            None => Settings::default(),
        };
        let frames = std::env::args()
            .nth(1)
            .and_then(|arg| match arg.parse::<u64>() {
                Ok(n) => Some(n),
                Err(e) => {
                    log::warn!("Bad frame count {:?} ({}); using {}", arg, e, DEFAULT_FRAMES);
                    None
                }
            })
            .unwrap_or(DEFAULT_FRAMES);

        let tilt = SharedTilt::new();
        let mut engine = GameEngine::from_settings(
            &settings,
            Box::new(SequentialLoader::default()),
            Box::new(tilt.clone()),
        );
        engine.set_event_sink(Box::new(SoundBoard::from_settings(
            &settings,
            Box::new(LogPlayer),
        )));
        engine.on_surface_ready(SURFACE_WIDTH, SURFACE_HEIGHT);

        let handle = engine.handle();
        let mut surface = CountingSurface::default();
        let mut sessions = 0u32;
        let mut best_score = 0u64;

        for _ in 0..frames {
            if engine.phase() != GamePhase::Playing {
                if engine.phase() == GamePhase::GameOver {
                    let score = engine.world().score.score();
                    best_score = best_score.max(score);
                    println!(
                        "{} | {}",
                        engine.world().score.summary_line(),
                        engine.world().score.rank_line()
                    );
                }
                sessions += 1;
                if let Err(e) = handle.start_game() {
                    log::error!("Could not restart: {}", e);
                    break;
                }
            }
            tilt.set(autopilot(engine.world()));
            engine.render_frame(Mat4::IDENTITY, &mut surface);
        }

        let last = engine.world().score.clone();
        best_score = best_score.max(last.score());
        log::info!(
            "{} frames, {} sessions, {} draw calls, {} sprites",
            frames,
            sessions,
            surface.draw_calls,
            surface.sprites
        );
        println!(
            "Final session: {} | {}. Best score: {}",
            last.summary_line(),
            last.rank_line(),
            best_score
        );

        if handle.destroy().is_ok() {
            engine.render_frame(Mat4::IDENTITY, &mut surface);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is embedded by a platform shell on the web
}
