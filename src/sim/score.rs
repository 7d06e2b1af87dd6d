//! Combo, score and end-of-session rank

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{POINTS_PER_BEST_COMBO, POINTS_PER_HAZARD};

/// Letter grade for a finished session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rank {
    S,
    A,
    B,
    C,
    D,
    F,
}

impl Rank {
    /// Map a score onto its band.
    ///
    /// Bands are half-open `(low, high]`. Anything above 123000 falls
    /// through to `F`: there is no tier past `S`.
    pub fn from_score(score: u64) -> Self {
        match score {
            100_001..=123_000 => Rank::S,
            80_001..=100_000 => Rank::A,
            60_001..=80_000 => Rank::B,
            40_001..=60_000 => Rank::C,
            20_001..=40_000 => Rank::D,
            _ => Rank::F,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rank::S => "S",
            Rank::A => "A",
            Rank::B => "B",
            Rank::C => "C",
            Rank::D => "D",
            Rank::F => "F",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session scoring state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreTracker {
    /// Hazards destroyed by the player this session
    pub destroyed: u32,
    /// Destructions since the last lost target
    pub combo: u32,
    pub best_combo: u32,
}

impl ScoreTracker {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Player smashed a hazard
    pub fn record_destroyed(&mut self) {
        self.destroyed += 1;
        self.combo += 1;
    }

    /// A hazard reached a target; the running combo is banked and cleared
    pub fn record_target_lost(&mut self) {
        self.best_combo = self.best_combo.max(self.combo);
        self.combo = 0;
    }

    pub fn score(&self) -> u64 {
        score_for(self.destroyed, self.best_combo)
    }

    pub fn rank(&self) -> Rank {
        Rank::from_score(self.score())
    }

    /// First line of the game-over overlay
    pub fn summary_line(&self) -> String {
        format!("Score: {}. Best combo: {}", self.destroyed, self.best_combo)
    }

    /// Second line of the game-over overlay
    pub fn rank_line(&self) -> String {
        format!("Game Rank: {}", self.rank())
    }
}

/// `destroyed * 110 + best_combo * 300`
pub fn score_for(destroyed: u32, best_combo: u32) -> u64 {
    u64::from(destroyed) * POINTS_PER_HAZARD + u64::from(best_combo) * POINTS_PER_BEST_COMBO
}
