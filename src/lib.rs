//! Rockfall - a falling-rock arcade core
//!
//! Core modules:
//! - `sim`: Frame-driven simulation (pools, collisions, spawning, scoring)
//! - `engine`: Session lifecycle and per-frame orchestration
//! - `renderer`: Batched sprite submission behind a surface trait
//! - `hud`: Screen-rect to world coordinate mapping
//! - `command`: Cross-thread command queue drained at frame start
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod command;
pub mod engine;
pub mod hud;
pub mod input;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use audio::{EventSink, SoundBoard, SoundEffect, SoundPlayer};
pub use command::{Command, CommandError, EngineHandle};
pub use engine::GameEngine;
pub use settings::{Settings, SettingsError};
pub use tuning::Tuning;

use rand::Rng;

/// Game configuration constants
pub mod consts {
    /// Pool capacities
    pub const HAZARD_POOL_SIZE: usize = 100;
    pub const FRAGMENT_POOL_SIZE: usize = 100;
    pub const TARGET_POOL_SIZE: usize = 5;

    /// Targets placed at the start of every session
    pub const TARGET_COUNT: usize = 5;

    /// Spawn cadence (frames between hazards) and its difficulty ramp
    pub const INITIAL_SPAWN_INTERVAL: u32 = 64;
    pub const MIN_SPAWN_INTERVAL: u32 = 15;
    pub const RAMP_PERIOD_FRAMES: u64 = 100;

    /// Score weights (rank bands depend on these exact values)
    pub const POINTS_PER_HAZARD: u64 = 110;
    pub const POINTS_PER_BEST_COMBO: u64 = 300;

    /// Hazard spawn ranges (world units, per frame)
    pub const HAZARD_MIN_SCALE: f32 = 0.06;
    pub const HAZARD_MAX_SCALE: f32 = 0.12;
    pub const HAZARD_MIN_FALL_SPEED: f32 = 0.004;
    pub const HAZARD_MAX_FALL_SPEED: f32 = 0.010;
    pub const HAZARD_MAX_DRIFT: f32 = 0.0015;
    /// Degrees per frame
    pub const HAZARD_MAX_SPIN: f32 = 3.0;
    pub const HAZARD_SPAWN_SPAN: f32 = 0.9;

    /// Debris burst
    pub const FRAGMENTS_PER_BREAK: usize = 5;
    pub const FRAGMENT_LIFETIME_FRAMES: u32 = 60;
    pub const FRAGMENT_MAX_DRIFT: f32 = 0.01;
    pub const FRAGMENT_MAX_SPREAD: f32 = 0.06;

    /// Targets pace along the ground line
    pub const TARGET_SCALE: f32 = 0.07;
    pub const TARGET_WALK_SPEED: f32 = 0.003;

    /// Player ship
    pub const PLAYER_SCALE: f32 = 0.12;
    pub const PLAYER_SPEED: f32 = 0.03;
    /// Height of the ship above the bottom edge
    pub const PLAYER_ALTITUDE: f32 = 0.45;
    /// Collision circle is tighter than the sprite quad
    pub const PLAYER_COLLISION_RADIUS: f32 = 0.8;

    /// Aspect ratio assumed until the surface reports its size
    pub const DEFAULT_RATIO: f32 = 1.0;

    /// HUD text sizes in pixels
    pub const COUNT_TEXT_PX: u32 = 48;
    pub const GAME_OVER_TEXT_PX: u32 = 64;
    pub const RANK_TEXT_PX: u32 = 56;
    /// Rendered glyph width relative to text size
    pub const GLYPH_ASPECT: f32 = 0.6;
    /// Vertical placement of the result lines
    pub const GAME_OVER_TEXT_Y: f32 = 0.0;
    pub const RANK_TEXT_Y: f32 = -0.3;
}

/// Uniform random float in `[lower, upper)`, accepting the bounds in either order
#[inline]
pub fn random_between<R: Rng + ?Sized>(rng: &mut R, lower: f32, upper: f32) -> f32 {
    let (lower, upper) = if lower > upper {
        (upper, lower)
    } else {
        (lower, upper)
    };
    lower + rng.random::<f32>() * (upper - lower)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_random_between_swaps_bounds() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..100 {
            let v = random_between(&mut rng, 0.5, -0.5);
            assert!((-0.5..0.5).contains(&v));
        }
    }
}
