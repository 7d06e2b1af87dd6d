//! Game engine
//!
//! Owns the world, the HUD, the render batcher and every collaborator. The
//! platform calls [`GameEngine::on_surface_ready`] whenever the drawing
//! surface is (re)created and [`GameEngine::render_frame`] once per vsync.
//! Everything else arrives as a [`Command`] through an [`EngineHandle`].

use glam::Mat4;

use crate::audio::EventSink;
use crate::command::{Command, CommandQueue, EngineHandle};
use crate::hud::{HudLayout, HudOverlay, Viewport};
use crate::input::TiltSource;
use crate::renderer::{DrawableId, RenderBatcher, RenderSurface, TextureLoader};
use crate::settings::Settings;
use crate::sim::{
    Drawable, FrameOutcome, GameEvent, GamePhase, HudText, SessionSnapshot, TickInput, World,
    advance_frame,
};
use crate::tuning::Tuning;

pub struct GameEngine {
    world: World,
    hud: HudOverlay,
    batcher: RenderBatcher,
    loader: Box<dyn TextureLoader>,
    tilt: Box<dyn TiltSource>,
    sink: Option<Box<dyn EventSink>>,
    commands: CommandQueue,
    viewport: Option<Viewport>,
    /// Events raised during the current frame, delivered after drawing
    frame_events: Vec<GameEvent>,
    destroyed: bool,
}

impl GameEngine {
    pub fn new(
        tuning: Tuning,
        seed: u64,
        loader: Box<dyn TextureLoader>,
        tilt: Box<dyn TiltSource>,
    ) -> Self {
        log::info!("Engine created (seed {})", seed);
        Self {
            world: World::new(tuning, seed),
            hud: HudOverlay::new(),
            batcher: RenderBatcher::new(),
            loader,
            tilt,
            sink: None,
            commands: CommandQueue::new(),
            viewport: None,
            frame_events: Vec::new(),
            destroyed: false,
        }
    }

    pub fn from_settings(
        settings: &Settings,
        loader: Box<dyn TextureLoader>,
        tilt: Box<dyn TiltSource>,
    ) -> Self {
        Self::new(settings.tuning.clone(), settings.resolved_seed(), loader, tilt)
    }

    /// Sender for commands from other threads
    pub fn handle(&self) -> EngineHandle {
        self.commands.handle()
    }

    pub fn set_event_sink(&mut self, sink: Box<dyn EventSink>) {
        self.sink = Some(sink);
    }

    /// The surface was created or resized. GPU-resident state is dropped and
    /// rebuilt lazily; simulation state is untouched.
    pub fn on_surface_ready(&mut self, width: u32, height: u32) {
        if self.destroyed {
            return;
        }
        let Some(viewport) = Viewport::new(width as f32, height as f32) else {
            log::warn!("Ignoring surface of size {}x{}", width, height);
            return;
        };
        self.batcher.invalidate();
        self.viewport = Some(viewport);
        self.world.set_ratio(viewport.ratio());
        self.hud.apply(&viewport);
        log::info!(
            "Surface ready: {}x{} (ratio {:.3})",
            width,
            height,
            viewport.ratio()
        );
    }

    /// Run one frame: commands, simulation, drawing, then event delivery
    pub fn render_frame(&mut self, view_proj: Mat4, surface: &mut dyn RenderSurface) {
        if self.destroyed {
            return;
        }
        self.drain_commands();
        if self.destroyed {
            return;
        }

        let input = TickInput {
            tilt: self.tilt.horizontal_bias(),
        };
        if advance_frame(&mut self.world, &input) == FrameOutcome::Ended {
            log::debug!("Session ended at frame {}", self.world.spawner.frame_count);
        }

        self.frame_events.extend(self.world.drain_events());
        self.refresh_hud();
        self.draw(&view_proj, surface);
        self.deliver_events();
    }

    fn drain_commands(&mut self) {
        while let Some(command) = self.commands.poll() {
            log::debug!("Applying {:?}", command);
            match command {
                Command::StartGame => {
                    self.start_game();
                }
                Command::Reset => self.reset(),
                Command::SetHudLayout(layout) => self.set_hud_layout(layout),
                Command::Destroy => {
                    self.destroy();
                    return;
                }
            }
        }
    }

    /// Begin a session. No-op (returns false) while one is running.
    pub fn start_game(&mut self) -> bool {
        self.world.start_session()
    }

    /// Begin a fresh session unconditionally
    pub fn reset(&mut self) {
        self.world.reset_session();
    }

    pub fn set_hud_layout(&mut self, layout: HudLayout) {
        self.hud.set_layout(layout, self.viewport);
    }

    /// Release the sensor and GPU-side caches and stop accepting commands
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.commands.close();
        self.tilt.release();
        self.batcher.release(self.loader.as_mut());
        log::info!("Engine destroyed");
    }

    /// Keep overlay text in step with this frame's events. Text that
    /// changed gives its old texture back.
    fn refresh_hud(&mut self) {
        if self.frame_events.is_empty() {
            return;
        }
        let before = self.hud_text_ids();

        for event in &self.frame_events {
            match event {
                GameEvent::SessionStarted => {
                    self.hud.set_count(0);
                    self.hud.show_result(None);
                }
                GameEvent::HazardDestroyed { destroyed, .. } => self.hud.set_count(*destroyed),
                GameEvent::SessionEnded { .. } => {
                    let score = &self.world.score;
                    let summary = score.summary_line();
                    let rank = score.rank_line();
                    self.hud.show_result(Some((&summary, &rank)));
                }
                GameEvent::TargetLost { .. } => {}
            }
        }

        let after = self.hud_text_ids();
        let loader = self.loader.as_mut();
        for (old, new) in before.iter().zip(&after) {
            if old != new {
                self.batcher.evict(old, loader);
            }
        }
    }

    fn hud_text_ids(&self) -> [DrawableId; 3] {
        [
            self.hud.count_text.drawable(),
            self.hud.game_over_text.drawable(),
            self.hud.rank_text.drawable(),
        ]
    }

    fn draw(&mut self, view_proj: &Mat4, surface: &mut dyn RenderSurface) {
        let loader = self.loader.as_mut();
        let world = &self.world;

        if world.phase != GamePhase::Idle {
            self.batcher
                .submit(surface, loader, view_proj, &world.fragments, &world.active_fragments);
            self.batcher
                .submit(surface, loader, view_proj, &world.hazards, &world.active_hazards);
            self.batcher
                .submit(surface, loader, view_proj, &world.targets, &world.active_targets);
        }
        self.batcher.submit_one(surface, loader, view_proj, &world.player);

        if self.hud.icon.visible {
            self.batcher
                .submit_one(surface, loader, view_proj, &self.hud.icon);
        }
        let mut texts: Vec<&HudText> = vec![&self.hud.count_text];
        if world.phase == GamePhase::GameOver {
            texts.push(&self.hud.game_over_text);
            texts.push(&self.hud.rank_text);
        }
        for text in texts {
            if text.visible && !text.text.is_empty() {
                self.batcher.submit_one(surface, loader, view_proj, text);
            }
        }
    }

    fn deliver_events(&mut self) {
        for event in self.frame_events.drain(..) {
            if let Some(sink) = self.sink.as_mut() {
                sink.on_event(&event);
            }
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn hud(&self) -> &HudOverlay {
        &self.hud
    }

    pub fn session(&self) -> SessionSnapshot {
        self.world.session()
    }

    pub fn phase(&self) -> GamePhase {
        self.world.phase
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// Textures currently cached
    pub fn cached_textures(&self) -> usize {
        self.batcher.textures().len()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}
