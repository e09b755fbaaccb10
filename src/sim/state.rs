//! Session state that outlives individual ticks

use serde::{Deserialize, Serialize};

/// Whether physics advances this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GamePhase {
    #[default]
    Running,
    /// Input and rendering continue, the field is frozen
    Paused,
}

impl GamePhase {
    pub fn toggled(self) -> Self {
        match self {
            GamePhase::Running => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Running,
        }
    }
}

/// Score record written to the scoreboard and leaderboard
///
/// Times are wall-clock `HH:mm:ss` strings; empty until first persisted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GameState {
    pub score: f64,
    #[serde(rename = "startTime")]
    pub start_time: String,
    #[serde(rename = "endTime")]
    pub end_time: String,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only kills add score; it never decreases
    pub fn add_score(&mut self, delta: f64) {
        debug_assert!(delta >= 0.0);
        self.score += delta.max(0.0);
    }

    /// Record a persistence instant: start is set once, end every time
    pub fn stamp(&mut self, now: &str) {
        if self.start_time.is_empty() {
            self.start_time = now.to_string();
        }
        self.end_time = now.to_string();
    }
}
