use crate::error::StorageError;
use crate::model::Level;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE: &str = "settings.json";
pub const MAX_PLAYERS: usize = 4;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Settings {
    #[serde(default = "default_version")]
    version: u32,

    #[serde(default)]
    pub level: Level,

    #[serde(default = "default_players")]
    pub players: usize,

    #[serde(default = "default_true")]
    pub sound_enabled: bool,

    #[serde(default)]
    pub player_names: Vec<String>,
}

// Helper functions for default values
fn default_version() -> u32 {
    2
}
fn default_players() -> usize {
    1
}
fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            version: default_version(),
            level: Level::default(),
            players: default_players(),
            sound_enabled: true,
            player_names: Vec::new(),
        }
    }
}

impl Settings {
    pub fn load(data_dir: &Path) -> Self {
        let path = Self::settings_path(data_dir);
        if let Ok(contents) = fs::read_to_string(&path) {
            match serde_json::from_str::<Settings>(&contents) {
                Ok(mut settings) => {
                    settings.migrate();
                    return settings;
                }
                Err(e) => {
                    warn!(target: "settings", "Ignoring unreadable {}: {}", path.display(), e)
                }
            }
        }
        let default = Settings::default();
        if let Err(e) = default.save(data_dir) {
            warn!(target: "settings", "Could not write default settings: {}", e);
        }
        default
    }

    pub fn save(&self, data_dir: &Path) -> Result<(), StorageError> {
        let path = Self::settings_path(data_dir);
        // Ensure the directory exists
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| StorageError::io(dir, e))?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(&path, contents).map_err(|e| StorageError::io(&path, e))
    }

    pub fn settings_path(data_dir: &Path) -> PathBuf {
        data_dir.join(SETTINGS_FILE)
    }

    fn migrate(&mut self) {
        match self.version {
            0 | 1 => {
                // version 1 stored names without a player count
                if self.players == default_players() && !self.player_names.is_empty() {
                    self.players = self.player_names.len();
                }
                self.version = 2;
            }
            _ => (),
        }
        self.players = self.players.clamp(1, MAX_PLAYERS);
    }

    /// Names for `players` slots, padded with blanks that the roster turns into "Player N".
    pub fn names_for(&self, players: usize) -> Vec<String> {
        (0..players.clamp(1, MAX_PLAYERS))
            .map(|slot| self.player_names.get(slot).cloned().unwrap_or_default())
            .collect()
    }

    /// Where `settings.json` and `scores.json` live: `ARCADE_DATA_DIR`, else the working
    /// directory.
    pub fn data_dir() -> PathBuf {
        std::env::var_os("ARCADE_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn is_debug_mode() -> bool {
        std::env::var("DEBUG").map(|v| v == "1").unwrap_or(false)
    }

    pub fn seed_from_env() -> Option<u64> {
        std::env::var("SEED").ok().and_then(|v| v.parse::<u64>().ok())
    }
}
