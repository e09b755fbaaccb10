//! Galaxy Raiders - real-time core of an arcade space shooter
//!
//! Core modules:
//! - `sim`: Field, entities, collision physics (pure and deterministic)
//! - `engine`: Fixed-rate tick scheduler driving the simulation
//! - `platform`: Controllers, visualizers, RNG and clock adapters
//! - `persistence`: Scoreboard and leaderboard storage
//! - `config`: Data-driven game tuning

pub mod config;
pub mod engine;
pub mod error;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod sim;

pub use config::{BoundaryPolicy, Config, ScorePolicy};
pub use engine::{EngineStats, GameEngine};
pub use error::{ConfigError, DegenerateVectorError, PersistenceError};
pub use highscores::{Leaderboard, LeaderboardChange};

/// Game configuration constants
pub mod consts {
    /// Length of one simulation step, in ticks; velocities are per tick
    pub const TICK_DT: f64 = 1.0;

    pub const MILLISECONDS_PER_SECOND: u64 = 1000;
}
