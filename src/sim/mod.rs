//! Frame-driven simulation
//!
//! All gameplay logic lives here:
//! - One step per rendered frame, no timestep
//! - Seeded RNG only
//! - Active lists are walked in insertion order
//! - No rendering or platform dependencies beyond drawable ids

pub mod collision;
pub mod entity;
pub mod pool;
pub mod score;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Circle, collides, first_hit};
pub use entity::{
    Body, Collidable, Drawable, Entity, Fragment, FrameContext, Hazard, HudIcon, HudText, Player,
    Poolable, Target, TextAnchor, Updatable,
};
pub use pool::{ObjectPool, SlotId, Spawned};
pub use score::{Rank, ScoreTracker, score_for};
pub use spawn::SpawnController;
pub use state::{GameEvent, GamePhase, SessionSnapshot, World};
pub use tick::{FragmentSeed, FrameOutcome, TickInput, advance_frame, fragment_burst, tick};
