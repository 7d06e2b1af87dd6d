//! Data-driven game balance
//!
//! Every knob has a default matching `consts`; a settings file may override
//! any subset of them.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Gameplay tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub hazard_pool_size: usize,
    pub fragment_pool_size: usize,
    pub target_pool_size: usize,
    /// Targets placed at session start
    pub target_count: usize,
    pub initial_spawn_interval: u32,
    pub min_spawn_interval: u32,
    /// Frames between one-step decreases of the spawn interval
    pub ramp_period_frames: u64,
    pub fragment_lifetime_frames: u32,
    /// Horizontal speed at full tilt (world units per frame)
    pub player_speed: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            hazard_pool_size: HAZARD_POOL_SIZE,
            fragment_pool_size: FRAGMENT_POOL_SIZE,
            target_pool_size: TARGET_POOL_SIZE,
            target_count: TARGET_COUNT,
            initial_spawn_interval: INITIAL_SPAWN_INTERVAL,
            min_spawn_interval: MIN_SPAWN_INTERVAL,
            ramp_period_frames: RAMP_PERIOD_FRAMES,
            fragment_lifetime_frames: FRAGMENT_LIFETIME_FRAMES,
            player_speed: PLAYER_SPEED,
        }
    }
}

impl Tuning {
    /// Clamp values that would break pool or spawn arithmetic
    pub fn validated(mut self) -> Self {
        if self.hazard_pool_size == 0 {
            log::warn!("hazard_pool_size must be at least 1");
            self.hazard_pool_size = 1;
        }
        if self.fragment_pool_size == 0 {
            log::warn!("fragment_pool_size must be at least 1");
            self.fragment_pool_size = 1;
        }
        if self.target_pool_size == 0 {
            log::warn!("target_pool_size must be at least 1");
            self.target_pool_size = 1;
        }
        if self.target_count > self.target_pool_size {
            log::warn!(
                "target_count {} exceeds target pool {}, clamping",
                self.target_count,
                self.target_pool_size
            );
            self.target_count = self.target_pool_size;
        }
        self.min_spawn_interval = self.min_spawn_interval.max(1);
        if self.initial_spawn_interval < self.min_spawn_interval {
            log::warn!(
                "initial_spawn_interval {} below floor {}, raising",
                self.initial_spawn_interval,
                self.min_spawn_interval
            );
            self.initial_spawn_interval = self.min_spawn_interval;
        }
        self.ramp_period_frames = self.ramp_period_frames.max(1);
        self.fragment_lifetime_frames = self.fragment_lifetime_frames.max(1);
        self
    }
}
