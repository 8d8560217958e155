use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::{GameKind, Level};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u32,
    pub level: Level,
    pub timestamp: String,
    pub game: String,
}

impl LeaderboardEntry {
    pub fn new(game: GameKind, name: &str, score: u32, level: Level, at: DateTime<Local>) -> Self {
        Self {
            name: name.to_string(),
            score,
            level,
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
            game: game.title().to_string(),
        }
    }
}
