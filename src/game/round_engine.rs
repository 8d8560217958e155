use std::fmt::Debug;
use std::time::Duration;

use crate::model::{GameKind, Level, RoundOutcome, RoundProgress, RoundStep};

/// `Idle -> Active -> Complete`; a new round always starts over from `begin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundPhase {
    #[default]
    Idle,
    Active,
    Complete,
}

/// Contract shared by the three games. Times are scheduler clock readings.
pub trait RoundEngine {
    type Input: Copy + Debug + 'static;

    fn game(&self) -> GameKind;

    /// Discards any previous round state and starts a fresh active round.
    fn begin(&mut self, level: Level, now: Duration);

    /// No-op returning `RoundStep::Ignored` unless the round is active.
    fn submit_input(&mut self, input: Self::Input, now: Duration) -> RoundStep;

    /// Countdown step, called once per `tick_interval` while active.
    fn tick(&mut self, _now: Duration) -> RoundStep {
        RoundStep::Ignored
    }

    /// `None` for move-based games, which run without a countdown.
    fn tick_interval(&self) -> Option<Duration> {
        None
    }

    fn phase(&self) -> RoundPhase;

    fn is_active(&self) -> bool {
        self.phase() == RoundPhase::Active
    }

    fn progress(&self) -> RoundProgress;

    /// Tears the round down. Yields the result only when the round reached completion.
    fn end(&mut self, now: Duration) -> Option<RoundOutcome>;
}
