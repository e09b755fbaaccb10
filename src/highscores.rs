//! Leaderboard of past sessions
//!
//! Stored as a plain JSON array of score records. A session is identified by
//! its start time, so saving the same session again updates its entry in
//! place instead of adding a duplicate.

use serde::{Deserialize, Serialize};

use crate::sim::GameState;

/// What an upsert did to the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaderboardChange {
    /// Same session already listed; entry refreshed at this index
    Updated(usize),
    /// Board had room; appended at this index
    Inserted(usize),
    /// Lowest score at this index was beaten and replaced
    Replaced(usize),
    /// Score too low for a full board
    Unchanged,
}

impl LeaderboardChange {
    pub fn is_changed(&self) -> bool {
        !matches!(self, LeaderboardChange::Unchanged)
    }
}

/// Session scores in storage order (not sorted)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
    pub entries: Vec<GameState>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the first entry holding the lowest score
    fn lowest(&self) -> Option<usize> {
        self.entries
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.score
                    .partial_cmp(&b.score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|(i, _)| i)
    }

    /// Check if a new session with `score` would get onto the board
    pub fn qualifies(&self, score: f64, capacity: usize) -> bool {
        if self.entries.len() < capacity {
            return true;
        }
        self.lowest()
            .map(|i| score > self.entries[i].score)
            .unwrap_or(false)
    }

    /// Insert or refresh `state`
    ///
    /// An entry with the same start time is always overwritten. Otherwise the
    /// session is appended while the board is below `capacity`, or replaces
    /// the lowest entry if it scores strictly higher.
    pub fn upsert(&mut self, state: &GameState, capacity: usize) -> LeaderboardChange {
        if let Some(i) = self
            .entries
            .iter()
            .position(|e| e.start_time == state.start_time)
        {
            self.entries[i] = state.clone();
            return LeaderboardChange::Updated(i);
        }

        if !self.qualifies(state.score, capacity) {
            return LeaderboardChange::Unchanged;
        }
        if self.entries.len() < capacity {
            self.entries.push(state.clone());
            return LeaderboardChange::Inserted(self.entries.len() - 1);
        }

        match self.lowest() {
            Some(i) => {
                self.entries[i] = state.clone();
                LeaderboardChange::Replaced(i)
            }
            None => LeaderboardChange::Unchanged,
        }
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<f64> {
        self.entries
            .iter()
            .map(|e| e.score)
            .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }

    /// Entries sorted by descending score, for display
    pub fn ranked(&self) -> Vec<&GameState> {
        let mut ranked: Vec<&GameState> = self.entries.iter().collect();
        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(score: f64, start: &str) -> GameState {
        GameState {
            score,
            start_time: start.to_string(),
            end_time: start.to_string(),
        }
    }

    fn full_board() -> Leaderboard {
        Leaderboard {
            entries: vec![
                session(30.0, "10:00:00"),
                session(10.0, "11:00:00"),
                session(20.0, "12:00:00"),
            ],
        }
    }

    #[test]
    fn test_same_session_is_updated_in_place() {
        let mut board = full_board();
        let change = board.upsert(&session(5.0, "11:00:00"), 3);
        assert_eq!(change, LeaderboardChange::Updated(1));
        assert_eq!(board.len(), 3);
        assert_eq!(board.entries[1].score, 5.0);

        // Idempotent
        let again = board.upsert(&session(5.0, "11:00:00"), 3);
        assert_eq!(again, LeaderboardChange::Updated(1));
        assert_eq!(board, {
            let mut b = full_board();
            b.entries[1].score = 5.0;
            b
        });
    }

    #[test]
    fn test_higher_score_replaces_lowest() {
        let mut board = full_board();
        let change = board.upsert(&session(15.0, "13:00:00"), 3);
        assert_eq!(change, LeaderboardChange::Replaced(1));
        assert_eq!(board.entries[1].start_time, "13:00:00");
        assert_eq!(board.len(), 3);
    }

    #[test]
    fn test_lower_or_equal_score_is_rejected() {
        let mut board = full_board();
        assert_eq!(
            board.upsert(&session(10.0, "13:00:00"), 3),
            LeaderboardChange::Unchanged
        );
        assert_eq!(
            board.upsert(&session(2.0, "14:00:00"), 3),
            LeaderboardChange::Unchanged
        );
        assert_eq!(board, full_board());
        assert!(!board.qualifies(10.0, 3));
        assert!(board.qualifies(10.5, 3));
    }

    #[test]
    fn test_room_left_appends() {
        let mut board = Leaderboard::new();
        assert!(board.qualifies(0.0, 2));
        assert_eq!(
            board.upsert(&session(0.0, "09:00:00"), 2),
            LeaderboardChange::Inserted(0)
        );
        assert_eq!(
            board.upsert(&session(4.0, "09:30:00"), 2),
            LeaderboardChange::Inserted(1)
        );
        assert_eq!(
            board.upsert(&session(1.0, "09:45:00"), 2),
            LeaderboardChange::Replaced(0)
        );
    }

    #[test]
    fn test_ties_replace_first_lowest() {
        let mut board = Leaderboard {
            entries: vec![
                session(5.0, "a"),
                session(1.0, "b"),
                session(1.0, "c"),
            ],
        };
        assert_eq!(board.upsert(&session(2.0, "d"), 3), LeaderboardChange::Replaced(1));
        assert_eq!(board.entries[2].start_time, "c");
    }

    #[test]
    fn test_ranked_and_top() {
        let board = full_board();
        let scores: Vec<f64> = board.ranked().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![30.0, 20.0, 10.0]);
        assert_eq!(board.top_score(), Some(30.0));
        assert_eq!(Leaderboard::new().top_score(), None);
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let board = Leaderboard {
            entries: vec![session(1.0, "00:00:01")],
        };
        let json = serde_json::to_string(&board).unwrap();
        assert!(json.starts_with('['));
        let back: Leaderboard = serde_json::from_str(&json).unwrap();
        assert_eq!(back, board);
    }
}
