use uuid::Uuid;

use super::{GameKind, Level, PlayerResult, RoundOutcome};

/// Whether an input advanced the round. `Ignored` covers inputs that arrive while no round
/// is active or that point outside the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStep {
    Ignored,
    Progress,
    Mismatch,
    Completed,
}

/// Snapshot of the running round for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundProgress {
    pub score: u32,
    pub progress: u32,
    pub target: u32,
    pub moves: u32,
    pub remaining_secs: Option<u32>,
}

/// The two cards of a Memory Match attempt, with the points it earned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairAttempt {
    pub player: usize,
    pub first: usize,
    pub second: usize,
    pub matched: bool,
    pub points: u32,
}

#[derive(Debug, Clone)]
pub enum SessionEvent {
    SessionStarted {
        session_id: Uuid,
        game: GameKind,
        level: Level,
        players: Vec<String>,
    },
    LevelStarted {
        game: GameKind,
        level: Level,
    },
    TurnStarted {
        player: usize,
        level: Level,
    },
    InputHandled {
        player: usize,
        step: RoundStep,
        progress: RoundProgress,
    },
    PairAttempted(PairAttempt),
    TurnPassed {
        player: usize,
    },
    TimeRemaining {
        seconds: u32,
    },
    RoundCompleted {
        player: usize,
        outcome: RoundOutcome,
    },
    ReadyForNextTurn {
        player: usize,
    },
    LevelCompleted {
        outcome: RoundOutcome,
        bonus: u32,
        next_level: Option<Level>,
    },
    SessionFinished {
        session_id: Uuid,
        recorded: usize,
        standings: Vec<PlayerResult>,
    },
    SessionAbandoned {
        session_id: Uuid,
    },
}
