use std::time::Duration;

use super::{GameKind, Level};

/// Common projection of every game's result, as stored in a roster slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundSummary {
    pub score: u32,
    pub level: Level,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedClickResult {
    pub level: Level,
    pub elapsed: Duration,
    pub score: u32,
    pub misclicks: u32,
    pub within_par: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscriminationResult {
    pub level: Level,
    pub correct: u32,
    pub mistakes: u32,
    pub target: u32,
    pub target_reached: bool,
    pub score: u32,
}

/// Per-player figures for one Memory Match grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchingTally {
    pub matches: u32,
    pub points: u32,
    pub best_streak: u32,
    pub bonus: u32,
}

impl MatchingTally {
    pub fn total(&self) -> u32 {
        self.points.saturating_add(self.bonus)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchingResult {
    pub level: Level,
    pub elapsed: Duration,
    pub moves: u32,
    pub tallies: Vec<MatchingTally>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundOutcome {
    OrderedClick(OrderedClickResult),
    Discrimination(DiscriminationResult),
    Matching(MatchingResult),
}

impl RoundOutcome {
    pub fn game(&self) -> GameKind {
        match self {
            RoundOutcome::OrderedClick(_) => GameKind::NumberRush,
            RoundOutcome::Discrimination(_) => GameKind::ColorBlast,
            RoundOutcome::Matching(_) => GameKind::MemoryMatch,
        }
    }

    pub fn level(&self) -> Level {
        match self {
            RoundOutcome::OrderedClick(result) => result.level,
            RoundOutcome::Discrimination(result) => result.level,
            RoundOutcome::Matching(result) => result.level,
        }
    }

    /// One summary per participating player: a single entry for turn-based games, one per
    /// roster slot for Memory Match.
    pub fn summaries(&self) -> Vec<RoundSummary> {
        match self {
            RoundOutcome::OrderedClick(result) => vec![RoundSummary {
                score: result.score,
                level: result.level,
                completed: true,
            }],
            RoundOutcome::Discrimination(result) => vec![RoundSummary {
                score: result.score,
                level: result.level,
                completed: true,
            }],
            RoundOutcome::Matching(result) => result
                .tallies
                .iter()
                .map(|tally| RoundSummary {
                    score: tally.total(),
                    level: result.level,
                    completed: true,
                })
                .collect(),
        }
    }
}
