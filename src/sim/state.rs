//! Simulation state
//!
//! The [`World`] owns every pool, active list and the session counters.
//! Nothing outside the engine holds references into it across frames.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Fragment, Hazard, Player, Target};
use super::pool::{ObjectPool, SlotId, Spawned};
use super::score::{Rank, ScoreTracker};
use super::spawn::SpawnController;
use crate::consts::DEFAULT_RATIO;
use crate::tuning::Tuning;

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Constructed, no session started yet
    Idle,
    Playing,
    /// Every target lost; waits for the next start
    GameOver,
}

/// Discrete notifications for audio/haptics collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    SessionStarted,
    HazardDestroyed { destroyed: u32, combo: u32 },
    TargetLost { remaining: usize },
    SessionEnded { score: u64, rank: Rank },
}

/// Read-only view of the session counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub playing: bool,
    pub hazards_destroyed: u32,
    pub combo: u32,
    pub best_combo: u32,
    pub frame_count: u64,
    pub spawn_interval: u32,
}

/// Complete simulation state
#[derive(Debug)]
pub struct World {
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Screen height / width
    pub ratio: f32,
    pub hazards: ObjectPool<Hazard>,
    pub active_hazards: Vec<SlotId>,
    pub fragments: ObjectPool<Fragment>,
    pub active_fragments: Vec<SlotId>,
    pub targets: ObjectPool<Target>,
    pub active_targets: Vec<SlotId>,
    pub player: Player,
    pub score: ScoreTracker,
    pub spawner: SpawnController,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
    rng: Pcg32,
}

impl World {
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let tuning = tuning.validated();
        Self {
            phase: GamePhase::Idle,
            ratio: DEFAULT_RATIO,
            hazards: ObjectPool::new("hazard", tuning.hazard_pool_size),
            active_hazards: Vec::with_capacity(tuning.hazard_pool_size),
            fragments: ObjectPool::new("fragment", tuning.fragment_pool_size),
            active_fragments: Vec::with_capacity(tuning.fragment_pool_size),
            targets: ObjectPool::new("target", tuning.target_pool_size),
            active_targets: Vec::with_capacity(tuning.target_pool_size),
            player: Player::new(tuning.player_speed, DEFAULT_RATIO),
            score: ScoreTracker::default(),
            spawner: SpawnController::new(&tuning),
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            tuning,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn session(&self) -> SessionSnapshot {
        SessionSnapshot {
            playing: self.is_playing(),
            hazards_destroyed: self.score.destroyed,
            combo: self.score.combo,
            best_combo: self.score.best_combo,
            frame_count: self.spawner.frame_count,
            spawn_interval: self.spawner.spawn_interval,
        }
    }

    /// Re-anchor edge-relative entities after the surface aspect changes
    pub fn set_ratio(&mut self, ratio: f32) {
        self.ratio = ratio;
        self.player.apply_ratio(ratio);
        for target in self.targets.iter_mut() {
            target.apply_ratio(ratio);
        }
    }

    /// Begin a session. Returns false (and does nothing) if one is already running.
    pub fn start_session(&mut self) -> bool {
        if self.is_playing() {
            return false;
        }
        self.reset_session();
        true
    }

    /// Unconditionally reset every counter and repopulate the targets
    pub fn reset_session(&mut self) {
        self.score.reset();
        self.spawner.reset();

        self.hazards.clear();
        self.active_hazards.clear();
        self.fragments.clear();
        self.active_fragments.clear();
        self.targets.clear();
        self.active_targets.clear();

        for _ in 0..self.tuning.target_count {
            self.spawn_target();
        }

        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::SessionStarted);
        log::info!(
            "Session started with {} targets",
            self.active_targets.len()
        );
    }

    /// Spawn a randomized hazard above the top edge
    pub fn spawn_hazard(&mut self) -> SlotId {
        let Spawned { slot, reclaimed } = self.hazards.spawn();
        if reclaimed {
            self.active_hazards.retain(|&s| s != slot);
        }
        self.hazards
            .get_mut(slot)
            .init_random(&mut self.rng, self.ratio);
        self.active_hazards.push(slot);
        slot
    }

    pub fn spawn_fragment(&mut self, position: Vec3, velocity: Vec3, scale: f32) -> SlotId {
        let Spawned { slot, reclaimed } = self.fragments.spawn();
        if reclaimed {
            self.active_fragments.retain(|&s| s != slot);
        }
        let lifetime = self.tuning.fragment_lifetime_frames;
        self.fragments
            .get_mut(slot)
            .init(position, velocity, scale, lifetime);
        self.active_fragments.push(slot);
        slot
    }

    pub fn spawn_target(&mut self) -> SlotId {
        let Spawned { slot, reclaimed } = self.targets.spawn();
        if reclaimed {
            self.active_targets.retain(|&s| s != slot);
        }
        self.targets.get_mut(slot).init(&mut self.rng, self.ratio);
        self.active_targets.push(slot);
        slot
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Take the events raised since the last call
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }
}
