//! Sound cues driven by game events
//!
//! The engine emits [`GameEvent`]s; a [`SoundBoard`] turns them into cues and
//! hands each one, with its note envelope and effective volume, to whatever
//! [`SoundPlayer`] the platform provides. Nothing here decodes or mixes audio.

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Receives buffered events after each frame
pub trait EventSink {
    fn on_event(&mut self, event: &GameEvent);
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// New session begins
    SessionStart,
    /// Player smashed a rock
    RockBreak,
    /// A rock landed on a target
    TargetLost,
    /// Last target gone
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

/// One oscillator voice with an exponential pitch and gain ramp
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pub waveform: Waveform,
    pub start_hz: f32,
    pub end_hz: f32,
    /// Seconds after the cue starts
    pub delay: f32,
    pub duration: f32,
    /// Peak gain before volume scaling
    pub gain: f32,
}

impl Note {
    const fn new(waveform: Waveform, start_hz: f32, end_hz: f32, delay: f32, duration: f32, gain: f32) -> Self {
        Self {
            waveform,
            start_hz,
            end_hz,
            delay,
            duration,
            gain,
        }
    }
}

/// Rising arpeggio
const SESSION_START: [Note; 4] = [
    Note::new(Waveform::Triangle, 400.0, 400.0, 0.0, 0.2, 0.25),
    Note::new(Waveform::Triangle, 500.0, 500.0, 0.08, 0.2, 0.25),
    Note::new(Waveform::Triangle, 600.0, 600.0, 0.16, 0.2, 0.25),
    Note::new(Waveform::Triangle, 800.0, 800.0, 0.24, 0.3, 0.25),
];

/// Crunch: noisy square drop plus a low thump
const ROCK_BREAK: [Note; 2] = [
    Note::new(Waveform::Square, 220.0, 80.0, 0.0, 0.12, 0.3),
    Note::new(Waveform::Sine, 120.0, 50.0, 0.0, 0.15, 0.5),
];

/// Short squawk
const TARGET_LOST: [Note; 2] = [
    Note::new(Waveform::Sawtooth, 900.0, 300.0, 0.0, 0.18, 0.3),
    Note::new(Waveform::Sawtooth, 700.0, 250.0, 0.1, 0.2, 0.25),
];

/// Sad descending
const GAME_OVER: [Note; 4] = [
    Note::new(Waveform::Sine, 400.0, 400.0, 0.0, 0.4, 0.3),
    Note::new(Waveform::Sine, 350.0, 350.0, 0.2, 0.4, 0.3),
    Note::new(Waveform::Sine, 300.0, 300.0, 0.4, 0.4, 0.3),
    Note::new(Waveform::Sine, 200.0, 200.0, 0.6, 0.4, 0.3),
];

impl SoundEffect {
    /// Procedural envelope for this cue
    pub fn notes(&self) -> &'static [Note] {
        match self {
            SoundEffect::SessionStart => &SESSION_START,
            SoundEffect::RockBreak => &ROCK_BREAK,
            SoundEffect::TargetLost => &TARGET_LOST,
            SoundEffect::GameOver => &GAME_OVER,
        }
    }

    /// Cue for a game event
    pub fn for_event(event: &GameEvent) -> Self {
        match event {
            GameEvent::SessionStarted => SoundEffect::SessionStart,
            GameEvent::HazardDestroyed { .. } => SoundEffect::RockBreak,
            GameEvent::TargetLost { .. } => SoundEffect::TargetLost,
            GameEvent::SessionEnded { .. } => SoundEffect::GameOver,
        }
    }
}

/// Platform audio output
pub trait SoundPlayer {
    /// `volume` is already scaled by master/sfx settings and is never zero
    fn play(&mut self, effect: SoundEffect, notes: &[Note], volume: f32);
}

/// Player that only logs cues; used when no audio device is wired up
#[derive(Debug, Default)]
pub struct LogPlayer;

impl SoundPlayer for LogPlayer {
    fn play(&mut self, effect: SoundEffect, notes: &[Note], volume: f32) {
        log::debug!("Sound {:?}: {} notes at volume {:.2}", effect, notes.len(), volume);
    }
}

/// Maps events to cues and applies volume settings
pub struct SoundBoard {
    player: Box<dyn SoundPlayer>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl SoundBoard {
    pub fn new(player: Box<dyn SoundPlayer>) -> Self {
        Self {
            player,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    pub fn from_settings(settings: &Settings, player: Box<dyn SoundPlayer>) -> Self {
        let mut board = Self::new(player);
        board.set_master_volume(settings.master_volume);
        board.set_sfx_volume(settings.sfx_volume);
        board.set_muted(settings.muted);
        board
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.player.play(effect, effect.notes(), vol);
    }
}

impl EventSink for SoundBoard {
    fn on_event(&mut self, event: &GameEvent) {
        self.play(SoundEffect::for_event(event));
    }
}
