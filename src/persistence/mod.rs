//! Score persistence
//!
//! The simulation never touches storage. At GameOver the frame driver hands
//! the run's stats to a [`ScoreStore`]; failures are reported to the caller
//! and never end the session.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::highscores::HighScores;

/// Errors at the storage boundary
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read/write contract for the leaderboard
pub trait ScoreStore {
    /// Load the stored leaderboard (empty when nothing was stored yet)
    fn load(&self) -> Result<HighScores, PersistError>;

    /// Replace the stored leaderboard
    fn save(&mut self, scores: &HighScores) -> Result<(), PersistError>;
}

/// Leaderboard kept as pretty JSON in a single file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for JsonFileStore {
    fn load(&self) -> Result<HighScores, PersistError> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No high scores found, starting fresh");
                return Ok(HighScores::new());
            }
            Err(e) => return Err(e.into()),
        };
        let mut scores: HighScores = serde_json::from_str(&json)?;
        scores.normalize();
        log::info!("Loaded {} high scores", scores.entries.len());
        Ok(scores)
    }

    fn save(&mut self, scores: &HighScores) -> Result<(), PersistError> {
        let json = serde_json::to_string_pretty(scores)?;
        // Write beside the target then rename so a crash never leaves half a file
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        log::info!("High scores saved ({} entries)", scores.entries.len());
        Ok(())
    }
}

/// Store that only lives as long as the process
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    scores: HighScores,
    /// Number of successful saves
    pub saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scores(scores: HighScores) -> Self {
        Self { scores, saves: 0 }
    }

    pub fn scores(&self) -> &HighScores {
        &self.scores
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Result<HighScores, PersistError> {
        Ok(self.scores.clone())
    }

    fn save(&mut self, scores: &HighScores) -> Result<(), PersistError> {
        self.scores = scores.clone();
        self.saves += 1;
        Ok(())
    }
}
