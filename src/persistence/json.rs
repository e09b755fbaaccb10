//! JSON files on disk

use std::fs;
use std::path::{Path, PathBuf};

use super::ScoreStore;
use crate::config::PersistenceConfig;
use crate::error::PersistenceError;
use crate::highscores::{Leaderboard, LeaderboardChange};
use crate::sim::GameState;

/// Scoreboard and leaderboard as two JSON files
#[derive(Debug, Clone)]
pub struct JsonScoreStore {
    scoreboard_path: PathBuf,
    leaderboard_path: PathBuf,
    capacity: usize,
}

impl JsonScoreStore {
    pub fn new(config: &PersistenceConfig) -> Self {
        Self {
            scoreboard_path: config.scoreboard_path(),
            leaderboard_path: config.leaderboard_path(),
            capacity: config.leaderboard_capacity,
        }
    }

    pub fn scoreboard_path(&self) -> &Path {
        &self.scoreboard_path
    }

    pub fn leaderboard_path(&self) -> &Path {
        &self.leaderboard_path
    }

    /// Read the leaderboard; a missing or blank file is an empty board
    pub fn load_leaderboard(&self) -> Result<Leaderboard, PersistenceError> {
        let path = &self.leaderboard_path;
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Leaderboard::new()),
            Err(source) => {
                return Err(PersistenceError::Io {
                    path: path.clone(),
                    source,
                });
            }
        };
        if text.trim().is_empty() {
            return Ok(Leaderboard::new());
        }
        serde_json::from_str(&text).map_err(|source| PersistenceError::Json {
            path: path.clone(),
            source,
        })
    }

    /// Read the last saved session record, if any
    pub fn load_scoreboard(&self) -> Result<Option<GameState>, PersistenceError> {
        let path = &self.scoreboard_path;
        match fs::read_to_string(path) {
            Ok(text) => serde_json::from_str(&text)
                .map(Some)
                .map_err(|source| PersistenceError::Json {
                    path: path.clone(),
                    source,
                }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(PersistenceError::Io {
                path: path.clone(),
                source,
            }),
        }
    }
}

impl ScoreStore for JsonScoreStore {
    fn save_scoreboard(&mut self, state: &GameState) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(state).map_err(|source| PersistenceError::Json {
            path: self.scoreboard_path.clone(),
            source,
        })?;
        write_atomic(&self.scoreboard_path, &json)
    }

    fn save_leaderboard(&mut self, state: &GameState) -> Result<LeaderboardChange, PersistenceError> {
        let mut board = self.load_leaderboard()?;
        let change = board.upsert(state, self.capacity);
        if change.is_changed() {
            let json = serde_json::to_string(&board).map_err(|source| PersistenceError::Json {
                path: self.leaderboard_path.clone(),
                source,
            })?;
            write_atomic(&self.leaderboard_path, &json)?;
        }
        Ok(change)
    }
}

/// Write to `<path>.tmp`, then rename over `path`
fn write_atomic(path: &Path, contents: &str) -> Result<(), PersistenceError> {
    let io_err = |source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(io_err)?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, contents).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str, capacity: usize) -> JsonScoreStore {
        let dir = std::env::temp_dir().join(format!(
            "galaxy-raiders-{}-{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        JsonScoreStore::new(&PersistenceConfig {
            directory: dir,
            leaderboard_capacity: capacity,
            ..PersistenceConfig::default()
        })
    }

    fn session(score: f64, start: &str) -> GameState {
        GameState {
            score,
            start_time: start.to_string(),
            end_time: "23:59:59".to_string(),
        }
    }

    #[test]
    fn test_scoreboard_round_trip() {
        let mut store = temp_store("scoreboard", 3);
        assert_eq!(store.load_scoreboard().unwrap(), None);

        store.save_scoreboard(&session(7.0, "08:00:00")).unwrap();
        store.save_scoreboard(&session(9.0, "08:00:00")).unwrap();
        assert_eq!(store.load_scoreboard().unwrap(), Some(session(9.0, "08:00:00")));

        let raw = fs::read_to_string(store.scoreboard_path()).unwrap();
        assert!(raw.contains("\"startTime\":\"08:00:00\""));
    }

    #[test]
    fn test_leaderboard_upserts_on_disk() {
        let mut store = temp_store("leaderboard", 2);
        assert!(store.load_leaderboard().unwrap().is_empty());

        assert_eq!(
            store.save_leaderboard(&session(1.0, "01:00:00")).unwrap(),
            LeaderboardChange::Inserted(0)
        );
        assert_eq!(
            store.save_leaderboard(&session(3.0, "02:00:00")).unwrap(),
            LeaderboardChange::Inserted(1)
        );
        assert_eq!(
            store.save_leaderboard(&session(2.0, "01:00:00")).unwrap(),
            LeaderboardChange::Updated(0)
        );
        assert_eq!(
            store.save_leaderboard(&session(0.5, "03:00:00")).unwrap(),
            LeaderboardChange::Unchanged
        );
        assert_eq!(
            store.save_leaderboard(&session(2.5, "04:00:00")).unwrap(),
            LeaderboardChange::Replaced(0)
        );

        let board = store.load_leaderboard().unwrap();
        let starts: Vec<&str> = board.entries.iter().map(|e| e.start_time.as_str()).collect();
        assert_eq!(starts, vec!["04:00:00", "02:00:00"]);
    }

    #[test]
    fn test_blank_leaderboard_file_is_empty() {
        let store = temp_store("blank", 3);
        write_atomic(store.leaderboard_path(), "  \n").unwrap();
        assert!(store.load_leaderboard().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_leaderboard_is_an_error() {
        let mut store = temp_store("corrupt", 3);
        write_atomic(store.leaderboard_path(), "{not json").unwrap();
        assert!(matches!(
            store.save_leaderboard(&session(1.0, "01:00:00")),
            Err(PersistenceError::Json { .. })
        ));
    }
}
