//! Score persistence
//!
//! Persistence is best effort: the engine logs a failed save and carries on.
//! Features:
//! - Scoreboard: the current session record, overwritten every tick
//! - Leaderboard: JSON array upserted by session start time
//! - Atomic writes (tmp → rename) so a crash never leaves half a file

mod json;

pub use json::JsonScoreStore;

use crate::error::PersistenceError;
use crate::highscores::{Leaderboard, LeaderboardChange};
use crate::sim::GameState;

/// Durable home for session scores
pub trait ScoreStore {
    /// Overwrite the current-session record
    fn save_scoreboard(&mut self, state: &GameState) -> Result<(), PersistenceError>;

    /// Upsert the session into the leaderboard
    fn save_leaderboard(&mut self, state: &GameState) -> Result<LeaderboardChange, PersistenceError>;
}

impl<S: ScoreStore + ?Sized> ScoreStore for Box<S> {
    fn save_scoreboard(&mut self, state: &GameState) -> Result<(), PersistenceError> {
        (**self).save_scoreboard(state)
    }

    fn save_leaderboard(&mut self, state: &GameState) -> Result<LeaderboardChange, PersistenceError> {
        (**self).save_leaderboard(state)
    }
}

/// Keeps everything in memory; used for tests and `--no-persist` runs
#[derive(Debug, Clone)]
pub struct MemoryScoreStore {
    pub scoreboard: Option<GameState>,
    pub leaderboard: Leaderboard,
    capacity: usize,
    saves: u64,
}

impl MemoryScoreStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            scoreboard: None,
            leaderboard: Leaderboard::new(),
            capacity,
            saves: 0,
        }
    }

    /// Scoreboard writes so far
    pub fn saves(&self) -> u64 {
        self.saves
    }
}

impl ScoreStore for MemoryScoreStore {
    fn save_scoreboard(&mut self, state: &GameState) -> Result<(), PersistenceError> {
        self.scoreboard = Some(state.clone());
        self.saves += 1;
        Ok(())
    }

    fn save_leaderboard(&mut self, state: &GameState) -> Result<LeaderboardChange, PersistenceError> {
        Ok(self.leaderboard.upsert(state, self.capacity))
    }
}
