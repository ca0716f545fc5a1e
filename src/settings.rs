//! Game settings and preferences
//!
//! Stored as a small JSON file next to the high scores.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::persistence::PersistError;

/// How the side boundaries of the tower behave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WallMode {
    /// Walls reflect horizontal velocity, keeping its magnitude
    #[default]
    Bounce,
    /// Leaving one side re-enters from the other
    Wrap,
}

impl WallMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WallMode::Bounce => "Bounce",
            WallMode::Wrap => "Wrap",
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Side boundary behaviour
    pub wall_mode: WallMode,
    /// Fixed run seed (random per run when absent)
    pub seed: Option<u64>,
    /// Where the leaderboard is kept
    pub highscore_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            wall_mode: WallMode::Bounce,
            seed: None,
            highscore_path: "icy_climb_highscores.json".to_string(),
        }
    }
}

impl Settings {
    /// Default settings file name
    pub const FILE_NAME: &'static str = "icy_climb_settings.json";

    /// Parse settings from JSON
    pub fn from_json(json: &str) -> Result<Self, PersistError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load settings from disk, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    return settings;
                }
                Err(e) => log::warn!("Ignoring unreadable settings {}: {}", path.display(), e),
            },
            Err(_) => log::info!("No settings at {}, using defaults", path.display()),
        }
        Self::default()
    }

    /// Save settings to disk
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
