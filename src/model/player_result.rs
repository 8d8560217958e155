use super::{Level, RoundSummary};

/// One roster slot. Fields are readable everywhere but only written through `record` and
/// `accumulate` at round end.
#[readonly::make]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerResult {
    pub name: String,
    pub score: u32,
    pub level: Level,
    pub completed: bool,
}

impl PlayerResult {
    pub fn new(slot: usize, name: &str, level: Level) -> Self {
        let trimmed = name.trim();
        let name = if trimmed.is_empty() {
            format!("Player {}", slot + 1)
        } else {
            trimmed.to_string()
        };
        Self {
            name,
            score: 0,
            level,
            completed: false,
        }
    }

    /// Turn-based games: the round's score replaces the slot's score.
    pub(crate) fn record(&mut self, summary: &RoundSummary) {
        self.score = summary.score;
        self.level = summary.level;
        self.completed |= summary.completed;
    }

    /// Level-progression games: scores add up across levels.
    pub(crate) fn accumulate(&mut self, summary: &RoundSummary) {
        self.score = self.score.saturating_add(summary.score);
        self.level = summary.level;
        self.completed |= summary.completed;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerStatus {
    Waiting,
    Playing,
    Completed { score: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerView {
    pub name: String,
    pub status: PlayerStatus,
}
