use log::{debug, trace};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use std::rc::Rc;
use std::time::Duration;

use super::notifier::Notifier;
use super::round_engine::{RoundEngine, RoundPhase};
use super::scoring::match_award;
use crate::model::{
    GameKind, Level, MatchingLevel, MatchingResult, MatchingTally, PairAttempt, RoundOutcome,
    RoundProgress, RoundStep, TimerState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card {
    pub pair: usize,
    pub face_up: bool,
    pub matched: bool,
}

#[derive(Debug, Clone, Copy, Default)]
struct PlayerTurnState {
    streak: u32,
    tally: MatchingTally,
}

/// Memory Match: all players share one grid and take turns; a miss passes the turn on.
pub struct MemoryMatchRound {
    notifier: Rc<dyn Notifier>,
    rng: StdRng,
    phase: RoundPhase,
    level: Level,
    config: MatchingLevel,
    cards: Vec<Card>,
    pending: Option<usize>,
    players: Vec<PlayerTurnState>,
    current_player: usize,
    moves: u32,
    matched_pairs: usize,
    timer: TimerState,
    last_attempt: Option<PairAttempt>,
    finished: Option<MatchingResult>,
}

impl MemoryMatchRound {
    pub fn new(notifier: Rc<dyn Notifier>, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| rand::rng().next_u64());
        debug!(target: "round", "Memory Match seed: {}", seed);
        Self {
            notifier,
            rng: StdRng::seed_from_u64(seed),
            phase: RoundPhase::Idle,
            level: Level::MIN,
            config: MatchingLevel::for_level(Level::MIN),
            cards: Vec::new(),
            pending: None,
            players: vec![PlayerTurnState::default()],
            current_player: 0,
            moves: 0,
            matched_pairs: 0,
            timer: TimerState::default(),
            last_attempt: None,
            finished: None,
        }
    }

    /// Player count for the next `begin`.
    pub fn set_players(&mut self, count: usize) {
        self.players = vec![PlayerTurnState::default(); count.max(1)];
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn grid_size(&self) -> usize {
        self.config.grid_size
    }

    pub fn current_player(&self) -> usize {
        self.current_player
    }

    pub fn streak(&self, player: usize) -> u32 {
        self.players.get(player).map_or(0, |p| p.streak)
    }

    /// Points earned in this grid so far, before the completion bonus.
    pub fn points(&self, player: usize) -> u32 {
        self.players.get(player).map_or(0, |p| p.tally.points)
    }

    pub fn matched_pairs(&self) -> usize {
        self.matched_pairs
    }

    /// The most recent two-card attempt, for the presentation to reveal.
    pub fn last_attempt(&self) -> Option<PairAttempt> {
        self.last_attempt
    }

    pub fn completion_bonus(&self) -> u32 {
        self.config.completion_bonus
    }

    fn resolve_pair(&mut self, first: usize, second: usize, now: Duration) -> RoundStep {
        self.moves += 1;
        let player = self.current_player;

        if self.cards[first].pair == self.cards[second].pair {
            for index in [first, second] {
                self.cards[index].matched = true;
            }
            self.matched_pairs += 1;

            let level = self.level;
            let state = &mut self.players[player];
            state.streak += 1;
            let points = match_award(level, state.streak);
            state.tally.matches += 1;
            state.tally.points += points;
            state.tally.best_streak = state.tally.best_streak.max(state.streak);
            self.last_attempt = Some(PairAttempt {
                player,
                first,
                second,
                matched: true,
                points,
            });
            self.notifier.on_success();

            if self.matched_pairs == self.config.pairs {
                self.complete(now);
                return RoundStep::Completed;
            }
            RoundStep::Progress
        } else {
            for index in [first, second] {
                self.cards[index].face_up = false;
            }
            self.players[player].streak = 0;
            self.current_player = (player + 1) % self.players.len();
            self.last_attempt = Some(PairAttempt {
                player,
                first,
                second,
                matched: false,
                points: 0,
            });
            trace!(target: "round", "Miss by player {}, turn to {}", player, self.current_player);
            self.notifier.on_failure();
            RoundStep::Mismatch
        }
    }

    fn complete(&mut self, now: Duration) {
        self.timer = self.timer.ended(now);
        let bonus = self.config.completion_bonus;
        for state in self.players.iter_mut() {
            if state.tally.matches > 0 {
                state.tally.bonus = bonus;
            }
        }
        let result = MatchingResult {
            level: self.level,
            elapsed: self.timer.elapsed(now),
            moves: self.moves,
            tallies: self.players.iter().map(|state| state.tally).collect(),
        };
        debug!(target: "round", "Memory Match grid cleared: {:?}", result);
        self.finished = Some(result);
        self.phase = RoundPhase::Complete;
        self.notifier.on_win();
    }
}

impl RoundEngine for MemoryMatchRound {
    type Input = usize;

    fn game(&self) -> GameKind {
        GameKind::MemoryMatch
    }

    fn begin(&mut self, level: Level, now: Duration) {
        self.level = level;
        self.config = MatchingLevel::for_level(level);

        let mut pairs: Vec<usize> = (0..self.config.pairs).flat_map(|pair| [pair, pair]).collect();
        pairs.shuffle(&mut self.rng);
        self.cards = pairs
            .into_iter()
            .map(|pair| Card {
                pair,
                face_up: false,
                matched: false,
            })
            .collect();

        let count = self.players.len();
        self.set_players(count);
        self.pending = None;
        self.current_player = 0;
        self.moves = 0;
        self.matched_pairs = 0;
        self.timer = TimerState::started_at(now);
        self.last_attempt = None;
        self.finished = None;
        self.phase = RoundPhase::Active;
    }

    fn submit_input(&mut self, index: usize, now: Duration) -> RoundStep {
        if self.phase != RoundPhase::Active {
            return RoundStep::Ignored;
        }
        match self.cards.get(index) {
            Some(card) if !card.face_up && !card.matched => (),
            _ => return RoundStep::Ignored,
        }

        self.cards[index].face_up = true;
        self.notifier.on_input();
        match self.pending.take() {
            None => {
                self.pending = Some(index);
                RoundStep::Progress
            }
            Some(first) => self.resolve_pair(first, index, now),
        }
    }

    fn phase(&self) -> RoundPhase {
        self.phase
    }

    fn progress(&self) -> RoundProgress {
        RoundProgress {
            score: self.points(self.current_player),
            progress: self.matched_pairs as u32,
            target: self.config.pairs as u32,
            moves: self.moves,
            remaining_secs: None,
        }
    }

    fn end(&mut self, _now: Duration) -> Option<RoundOutcome> {
        self.phase = RoundPhase::Idle;
        self.pending = None;
        self.finished.take().map(RoundOutcome::Matching)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::game::notifier::tests::{Feedback, RecordingNotifier};

    pub(crate) fn level(n: u8) -> Level {
        Level::new(n).unwrap()
    }

    /// Index pairs that match, in deck order.
    pub(crate) fn matching_pairs(cards: &[Card]) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for (i, card) in cards.iter().enumerate() {
            if let Some(j) = (i + 1..cards.len()).find(|&j| cards[j].pair == card.pair) {
                pairs.push((i, j));
            }
        }
        pairs
    }

    /// Two cards of different pairs that are still in play.
    pub(crate) fn mismatching_pair(cards: &[Card]) -> (usize, usize) {
        let first = cards.iter().position(|c| !c.matched).unwrap();
        let second = (0..cards.len())
            .find(|&j| !cards[j].matched && cards[j].pair != cards[first].pair)
            .unwrap();
        (first, second)
    }

    fn new_round(players: usize) -> (MemoryMatchRound, Rc<RecordingNotifier>) {
        let notifier = Rc::new(RecordingNotifier::default());
        let mut round = MemoryMatchRound::new(notifier.clone(), Some(21));
        round.set_players(players);
        (round, notifier)
    }

    #[test]
    fn test_deck_has_two_of_each_pair() {
        let (mut round, _) = new_round(1);
        round.begin(level(3), Duration::ZERO);
        assert_eq!(round.cards().len(), 24);
        assert_eq!(matching_pairs(round.cards()).len(), 12);
        assert_eq!(round.grid_size(), 5);
    }

    #[test]
    fn test_streak_multiplier() {
        let (mut round, _) = new_round(1);
        round.begin(level(2), Duration::ZERO);
        let pairs = matching_pairs(round.cards());

        let mut awarded = Vec::new();
        for &(a, b) in pairs.iter().take(4) {
            round.submit_input(a, Duration::ZERO);
            round.submit_input(b, Duration::ZERO);
            awarded.push(round.last_attempt().unwrap().points);
        }
        assert_eq!(awarded, vec![20, 20, 40, 40]);
        assert_eq!(round.streak(0), 4);
        assert_eq!(round.points(0), 120);
    }

    #[test]
    fn test_mismatch_resets_streak_and_passes_turn() {
        let (mut round, notifier) = new_round(2);
        round.begin(level(1), Duration::ZERO);
        let pairs = matching_pairs(round.cards());

        round.submit_input(pairs[0].0, Duration::ZERO);
        assert_eq!(round.submit_input(pairs[0].1, Duration::ZERO), RoundStep::Progress);
        assert_eq!(round.streak(0), 1);

        let (a, b) = mismatching_pair(round.cards());
        round.submit_input(a, Duration::ZERO);
        assert_eq!(round.submit_input(b, Duration::ZERO), RoundStep::Mismatch);
        assert_eq!(round.streak(0), 0);
        assert_eq!(round.current_player(), 1);
        assert!(!round.cards()[a].face_up && !round.cards()[b].face_up);
        assert!(round.is_active());
        assert_eq!(notifier.count(Feedback::Failure), 1);

        let (a, b) = mismatching_pair(round.cards());
        round.submit_input(a, Duration::ZERO);
        round.submit_input(b, Duration::ZERO);
        assert_eq!(round.current_player(), 0);
        assert_eq!(round.progress().moves, 3);
    }

    #[test]
    fn test_revealed_and_out_of_range_cards_ignored() {
        let (mut round, _) = new_round(1);
        round.begin(level(1), Duration::ZERO);
        let pairs = matching_pairs(round.cards());

        assert_eq!(round.submit_input(99, Duration::ZERO), RoundStep::Ignored);
        round.submit_input(pairs[0].0, Duration::ZERO);
        assert_eq!(round.submit_input(pairs[0].0, Duration::ZERO), RoundStep::Ignored);
        round.submit_input(pairs[0].1, Duration::ZERO);
        assert_eq!(round.submit_input(pairs[0].1, Duration::ZERO), RoundStep::Ignored);
        assert_eq!(round.progress().moves, 1);
    }

    #[test]
    fn test_clearing_grid_pays_bonus_to_scorers_only() {
        let (mut round, notifier) = new_round(2);
        round.begin(level(1), Duration::from_secs(5));
        let pairs = matching_pairs(round.cards());

        // player 0 misses once, then player 1 clears the whole grid
        let (a, b) = mismatching_pair(round.cards());
        round.submit_input(a, Duration::ZERO);
        round.submit_input(b, Duration::ZERO);
        let mut last = RoundStep::Ignored;
        for &(a, b) in &pairs {
            round.submit_input(a, Duration::from_secs(30));
            last = round.submit_input(b, Duration::from_secs(30));
        }
        assert_eq!(last, RoundStep::Completed);
        assert_eq!(notifier.count(Feedback::Win), 1);

        let Some(RoundOutcome::Matching(result)) = round.end(Duration::from_secs(31)) else {
            panic!("expected a Memory Match result");
        };
        assert_eq!(result.elapsed, Duration::from_secs(25));
        assert_eq!(result.moves, 9);
        assert_eq!(result.tallies[0].total(), 0);
        assert_eq!(result.tallies[1].matches, 8);
        assert_eq!(result.tallies[1].bonus, 100);
        // streak 1..=8 at level 1: 10,10,20,20,20,30,30,30
        assert_eq!(result.tallies[1].points, 170);
        assert_eq!(result.tallies[1].best_streak, 8);
    }

    #[test]
    fn test_begin_resets_round_state() {
        let (mut round, _) = new_round(2);
        round.begin(level(1), Duration::ZERO);
        let pairs = matching_pairs(round.cards());
        round.submit_input(pairs[0].0, Duration::ZERO);
        round.submit_input(pairs[0].1, Duration::ZERO);

        round.begin(level(2), Duration::ZERO);
        assert_eq!(round.matched_pairs(), 0);
        assert_eq!(round.points(0), 0);
        assert_eq!(round.streak(0), 0);
        assert!(round.cards().iter().all(|c| !c.face_up && !c.matched));
        assert_eq!(round.completion_bonus(), 150);
    }
}
