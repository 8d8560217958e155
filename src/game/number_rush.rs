use log::{debug, trace};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use std::rc::Rc;
use std::time::Duration;

use super::notifier::Notifier;
use super::round_engine::{RoundEngine, RoundPhase};
use super::scoring::ordered_click_score;
use crate::model::{
    GameKind, Level, OrderedClickLevel, OrderedClickResult, RoundOutcome, RoundProgress,
    RoundStep, TimerState,
};

/// Number Rush: click 1..=n in order as fast as possible.
pub struct NumberRushRound {
    notifier: Rc<dyn Notifier>,
    rng: StdRng,
    phase: RoundPhase,
    level: Level,
    config: OrderedClickLevel,
    board: Vec<u32>,
    next_number: u32,
    clicks: u32,
    misclicks: u32,
    timer: TimerState,
    finished: Option<OrderedClickResult>,
}

impl NumberRushRound {
    pub fn new(notifier: Rc<dyn Notifier>, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| rand::rng().next_u64());
        debug!(target: "round", "Number Rush seed: {}", seed);
        Self {
            notifier,
            rng: StdRng::seed_from_u64(seed),
            phase: RoundPhase::Idle,
            level: Level::MIN,
            config: OrderedClickLevel::for_level(Level::MIN),
            board: Vec::new(),
            next_number: 1,
            clicks: 0,
            misclicks: 0,
            timer: TimerState::default(),
            finished: None,
        }
    }

    /// Shuffled numbers in reading order; row length is `columns()`.
    pub fn board(&self) -> &[u32] {
        &self.board
    }

    pub fn columns(&self) -> usize {
        self.config.columns()
    }

    pub fn next_number(&self) -> u32 {
        self.next_number
    }

    pub fn is_cleared(&self, number: u32) -> bool {
        number >= 1 && number < self.next_number
    }

    pub fn elapsed(&self, now: Duration) -> Duration {
        self.timer.elapsed(now)
    }

    pub fn par_time(&self) -> Duration {
        self.config.par_time
    }

    fn complete(&mut self, now: Duration) {
        self.timer = self.timer.ended(now);
        let elapsed = self.timer.elapsed(now);
        let result = OrderedClickResult {
            level: self.level,
            elapsed,
            score: ordered_click_score(elapsed, self.level),
            misclicks: self.misclicks,
            within_par: elapsed <= self.config.par_time,
        };
        debug!(target: "round", "Number Rush complete: {:?}", result);
        self.finished = Some(result);
        self.phase = RoundPhase::Complete;
        self.notifier.on_win();
    }
}

impl RoundEngine for NumberRushRound {
    type Input = u32;

    fn game(&self) -> GameKind {
        GameKind::NumberRush
    }

    fn begin(&mut self, level: Level, now: Duration) {
        self.level = level;
        self.config = OrderedClickLevel::for_level(level);
        self.board = (1..=self.config.numbers).collect();
        self.board.shuffle(&mut self.rng);
        self.next_number = 1;
        self.clicks = 0;
        self.misclicks = 0;
        self.timer = TimerState::started_at(now);
        self.finished = None;
        self.phase = RoundPhase::Active;
        self.notifier.on_input();
    }

    fn submit_input(&mut self, number: u32, now: Duration) -> RoundStep {
        if self.phase != RoundPhase::Active || number == 0 || number > self.config.numbers {
            return RoundStep::Ignored;
        }
        self.clicks += 1;

        if number != self.next_number {
            trace!(target: "round", "Expected {}, got {}", self.next_number, number);
            self.misclicks += 1;
            self.notifier.on_failure();
            return RoundStep::Mismatch;
        }

        self.notifier.on_input();
        self.next_number += 1;
        if self.next_number > self.config.numbers {
            self.complete(now);
            RoundStep::Completed
        } else {
            RoundStep::Progress
        }
    }

    fn phase(&self) -> RoundPhase {
        self.phase
    }

    fn progress(&self) -> RoundProgress {
        RoundProgress {
            score: self.finished.as_ref().map_or(0, |result| result.score),
            progress: self.next_number - 1,
            target: self.config.numbers,
            moves: self.clicks,
            remaining_secs: None,
        }
    }

    fn end(&mut self, _now: Duration) -> Option<RoundOutcome> {
        self.phase = RoundPhase::Idle;
        self.finished.take().map(RoundOutcome::OrderedClick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::notifier::tests::{Feedback, RecordingNotifier};

    fn level(n: u8) -> Level {
        Level::new(n).unwrap()
    }

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn test_board_holds_each_number_once() {
        let mut round = NumberRushRound::new(Rc::new(RecordingNotifier::default()), Some(7));
        round.begin(level(5), Duration::ZERO);

        let mut sorted = round.board().to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, (1..=40).collect::<Vec<u32>>());
        assert_eq!(round.columns(), 8);
    }

    #[test]
    fn test_same_seed_same_board() {
        let mut a = NumberRushRound::new(Rc::new(RecordingNotifier::default()), Some(99));
        let mut b = NumberRushRound::new(Rc::new(RecordingNotifier::default()), Some(99));
        a.begin(level(2), Duration::ZERO);
        b.begin(level(2), Duration::ZERO);
        assert_eq!(a.board(), b.board());
    }

    #[test]
    fn test_full_round_scores_by_speed() {
        let notifier = Rc::new(RecordingNotifier::default());
        let mut round = NumberRushRound::new(notifier.clone(), Some(1));
        round.begin(level(3), secs(10));

        for number in 1..25 {
            assert_eq!(round.submit_input(number, secs(12)), RoundStep::Progress);
        }
        assert_eq!(round.submit_input(25, secs(15)), RoundStep::Completed);
        assert_eq!(round.phase(), RoundPhase::Complete);
        assert_eq!(notifier.count(Feedback::Win), 1);

        let Some(RoundOutcome::OrderedClick(result)) = round.end(secs(20)) else {
            panic!("expected a Number Rush result");
        };
        assert_eq!(result.elapsed, secs(5));
        assert_eq!(result.score, 6000);
        assert!(result.within_par);
        assert_eq!(round.phase(), RoundPhase::Idle);
    }

    #[test]
    fn test_wrong_number_is_a_mismatch_not_a_failure() {
        let notifier = Rc::new(RecordingNotifier::default());
        let mut round = NumberRushRound::new(notifier.clone(), Some(1));
        round.begin(level(1), Duration::ZERO);

        assert_eq!(round.submit_input(2, secs(1)), RoundStep::Mismatch);
        assert_eq!(round.submit_input(1, secs(1)), RoundStep::Progress);
        // clicking an already cleared number
        assert_eq!(round.submit_input(1, secs(1)), RoundStep::Mismatch);
        assert!(round.is_active());
        assert_eq!(round.next_number(), 2);
        assert!(round.is_cleared(1));
        assert_eq!(notifier.count(Feedback::Failure), 2);
        assert_eq!(round.progress().moves, 3);
        assert_eq!(round.progress().progress, 1);
    }

    #[test]
    fn test_input_ignored_when_inactive_or_out_of_range() {
        let mut round = NumberRushRound::new(Rc::new(RecordingNotifier::default()), Some(1));
        assert_eq!(round.submit_input(1, Duration::ZERO), RoundStep::Ignored);

        round.begin(level(1), Duration::ZERO);
        assert_eq!(round.submit_input(0, Duration::ZERO), RoundStep::Ignored);
        assert_eq!(round.submit_input(16, Duration::ZERO), RoundStep::Ignored);
        assert_eq!(round.progress().moves, 0);
    }

    #[test]
    fn test_abandoned_round_yields_nothing() {
        let mut round = NumberRushRound::new(Rc::new(RecordingNotifier::default()), Some(1));
        round.begin(level(1), Duration::ZERO);
        round.submit_input(1, secs(1));
        assert_eq!(round.end(secs(2)), None);
        assert!(!round.is_active());
        assert_eq!(round.submit_input(2, secs(3)), RoundStep::Ignored);
    }

    #[test]
    fn test_slow_round_misses_par() {
        let mut round = NumberRushRound::new(Rc::new(RecordingNotifier::default()), Some(1));
        round.begin(level(1), Duration::ZERO);
        for number in 1..=15 {
            round.submit_input(number, secs(31));
        }
        let Some(RoundOutcome::OrderedClick(result)) = round.end(secs(31)) else {
            panic!("expected a Number Rush result");
        };
        assert!(!result.within_par);
        assert_eq!(result.score, 322);
    }
}
