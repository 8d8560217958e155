use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GameKind {
    MemoryMatch,
    NumberRush,
    ColorBlast,
}

impl GameKind {
    pub fn all() -> [GameKind; 3] {
        [GameKind::MemoryMatch, GameKind::NumberRush, GameKind::ColorBlast]
    }

    /// Title used as the leaderboard key, both in memory and in `scores.json`.
    pub fn title(&self) -> &'static str {
        match self {
            GameKind::MemoryMatch => "Memory Match",
            GameKind::NumberRush => "Number Rush",
            GameKind::ColorBlast => "Color Blast",
        }
    }

    pub fn from_title(title: &str) -> Option<GameKind> {
        GameKind::all().into_iter().find(|game| game.title() == title)
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}
