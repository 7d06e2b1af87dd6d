//! Hazard spawn cadence
//!
//! Pure frame-count arithmetic. The renderer drives frames at whatever rate
//! the device manages, so game speed is measured in frames, never seconds.

use crate::tuning::Tuning;

#[derive(Debug, Clone)]
pub struct SpawnController {
    /// Frames since the session started
    pub frame_count: u64,
    /// Frames between hazard spawns
    pub spawn_interval: u32,
    initial_interval: u32,
    min_interval: u32,
    ramp_period: u64,
}

impl SpawnController {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            frame_count: 0,
            spawn_interval: tuning.initial_spawn_interval,
            initial_interval: tuning.initial_spawn_interval,
            min_interval: tuning.min_spawn_interval.max(1),
            ramp_period: tuning.ramp_period_frames.max(1),
        }
    }

    pub fn reset(&mut self) {
        self.frame_count = 0;
        self.spawn_interval = self.initial_interval;
    }

    /// Advance one frame. Returns true when a hazard should spawn this frame.
    pub fn advance(&mut self) -> bool {
        self.frame_count += 1;
        let spawn = self.frame_count % u64::from(self.spawn_interval) == 0;

        if self.frame_count % self.ramp_period == 0 && self.spawn_interval > self.min_interval {
            self.spawn_interval -= 1;
        }

        spawn
    }
}
