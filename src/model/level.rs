use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("level {0} is outside 1..=5")]
pub struct InvalidLevel(pub u8);

/// A difficulty tier. Always within `Level::MIN..=Level::MAX`; raw numbers go through
/// `Level::new`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Level(u8);

impl Level {
    pub const MIN: Level = Level(1);
    pub const MAX: Level = Level(5);

    pub fn new(number: u8) -> Option<Level> {
        (Self::MIN.0..=Self::MAX.0)
            .contains(&number)
            .then_some(Level(number))
    }

    pub fn all() -> impl Iterator<Item = Level> {
        (Self::MIN.0..=Self::MAX.0).map(Level)
    }

    pub fn number(self) -> u8 {
        self.0
    }

    /// Factor applied by every level-scaled score formula.
    pub fn multiplier(self) -> u32 {
        u32::from(self.0)
    }

    pub fn next(self) -> Option<Level> {
        Level::new(self.0 + 1)
    }

    pub fn is_max(self) -> bool {
        self == Self::MAX
    }
}

impl Default for Level {
    fn default() -> Self {
        Level::MIN
    }
}

impl TryFrom<u8> for Level {
    type Error = InvalidLevel;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        Level::new(number).ok_or(InvalidLevel(number))
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> u8 {
        level.0
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn out_of_table(level: Level) -> ! {
    unreachable!("level {} has no table entry", level.0)
}

/// Memory Match: square grid, number of pairs dealt, bonus for finishing the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchingLevel {
    pub grid_size: usize,
    pub pairs: usize,
    pub completion_bonus: u32,
}

impl MatchingLevel {
    pub fn for_level(level: Level) -> Self {
        let (grid_size, pairs, completion_bonus) = match level.number() {
            1 => (4, 8, 100),
            2 => (4, 8, 150),
            3 => (5, 12, 200),
            4 => (6, 18, 300),
            5 => (6, 18, 500),
            _ => out_of_table(level),
        };
        Self {
            grid_size,
            pairs,
            completion_bonus,
        }
    }

    pub fn card_count(&self) -> usize {
        self.pairs * 2
    }
}

/// Number Rush: how many numbers to clear in order, and the par time shown to players.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderedClickLevel {
    pub numbers: u32,
    pub par_time: Duration,
}

impl OrderedClickLevel {
    pub fn for_level(level: Level) -> Self {
        let (numbers, par_secs) = match level.number() {
            1 => (15, 30),
            2 => (20, 35),
            3 => (25, 40),
            4 => (30, 45),
            5 => (40, 60),
            _ => out_of_table(level),
        };
        Self {
            numbers,
            par_time: Duration::from_secs(par_secs),
        }
    }

    pub fn columns(&self) -> usize {
        if self.numbers > 30 {
            8
        } else if self.numbers > 20 {
            6
        } else {
            5
        }
    }
}

/// Color Blast: countdown length in seconds and the correct-answer target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscriminationLevel {
    pub time_limit_secs: u32,
    pub target: u32,
}

impl DiscriminationLevel {
    pub fn for_level(level: Level) -> Self {
        let (time_limit_secs, target) = match level.number() {
            1 => (45, 10),
            2 => (40, 15),
            3 => (35, 20),
            4 => (30, 25),
            5 => (25, 30),
            _ => out_of_table(level),
        };
        Self {
            time_limit_secs,
            target,
        }
    }
}
