use log::{debug, trace};
use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::{RngCore, SeedableRng};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use super::notifier::Notifier;
use super::round_engine::{RoundEngine, RoundPhase};
use super::scoring::discrimination_score;
use crate::model::{
    DiscriminationLevel, DiscriminationResult, GameKind, Level, RoundOutcome, RoundProgress,
    RoundStep,
};

pub const ANSWER_SLOTS: usize = 4;
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InkColor {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Orange,
    Pink,
    Cyan,
}

impl InkColor {
    pub const ALL: [InkColor; 8] = [
        InkColor::Red,
        InkColor::Blue,
        InkColor::Green,
        InkColor::Yellow,
        InkColor::Purple,
        InkColor::Orange,
        InkColor::Pink,
        InkColor::Cyan,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            InkColor::Red => "RED",
            InkColor::Blue => "BLUE",
            InkColor::Green => "GREEN",
            InkColor::Yellow => "YELLOW",
            InkColor::Purple => "PURPLE",
            InkColor::Orange => "ORANGE",
            InkColor::Pink => "PINK",
            InkColor::Cyan => "CYAN",
        }
    }
}

impl fmt::Display for InkColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `word` is printed in `ink`; the player must pick the ink's name among `options`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub word: InkColor,
    pub ink: InkColor,
    pub options: [InkColor; ANSWER_SLOTS],
    pub correct_slot: usize,
}

impl Question {
    fn generate(rng: &mut StdRng) -> Question {
        let word = *InkColor::ALL.choose(rng).unwrap_or(&InkColor::Red);
        let ink = *InkColor::ALL.choose(rng).unwrap_or(&InkColor::Red);

        let mut decoys: Vec<InkColor> = InkColor::ALL
            .iter()
            .copied()
            .filter(|color| *color != ink)
            .collect();
        decoys.shuffle(rng);

        let mut options = [ink, decoys[0], decoys[1], decoys[2]];
        options.shuffle(rng);
        let correct_slot = options
            .iter()
            .position(|color| *color == ink)
            .unwrap_or_default();

        Question {
            word,
            ink,
            options,
            correct_slot,
        }
    }
}

/// Color Blast: answer as many ink-color questions as possible before the countdown ends.
pub struct ColorBlastRound {
    notifier: Rc<dyn Notifier>,
    rng: StdRng,
    phase: RoundPhase,
    level: Level,
    config: DiscriminationLevel,
    remaining_secs: u32,
    correct: u32,
    mistakes: u32,
    question: Option<Question>,
    finished: Option<DiscriminationResult>,
}

impl ColorBlastRound {
    pub fn new(notifier: Rc<dyn Notifier>, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| rand::rng().next_u64());
        debug!(target: "round", "Color Blast seed: {}", seed);
        Self {
            notifier,
            rng: StdRng::seed_from_u64(seed),
            phase: RoundPhase::Idle,
            level: Level::MIN,
            config: DiscriminationLevel::for_level(Level::MIN),
            remaining_secs: 0,
            correct: 0,
            mistakes: 0,
            question: None,
            finished: None,
        }
    }

    pub fn question(&self) -> Option<&Question> {
        self.question.as_ref()
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn target(&self) -> u32 {
        self.config.target
    }

    fn next_question(&mut self) {
        self.question = Some(Question::generate(&mut self.rng));
    }

    fn complete(&mut self) {
        let target_reached = self.correct >= self.config.target;
        let result = DiscriminationResult {
            level: self.level,
            correct: self.correct,
            mistakes: self.mistakes,
            target: self.config.target,
            target_reached,
            score: discrimination_score(self.correct, self.level),
        };
        debug!(target: "round", "Color Blast time up: {:?}", result);
        if target_reached {
            self.notifier.on_win();
        }
        self.question = None;
        self.finished = Some(result);
        self.phase = RoundPhase::Complete;
    }
}

impl RoundEngine for ColorBlastRound {
    type Input = usize;

    fn game(&self) -> GameKind {
        GameKind::ColorBlast
    }

    fn begin(&mut self, level: Level, _now: Duration) {
        self.level = level;
        self.config = DiscriminationLevel::for_level(level);
        self.remaining_secs = self.config.time_limit_secs;
        self.correct = 0;
        self.mistakes = 0;
        self.finished = None;
        self.phase = RoundPhase::Active;
        self.next_question();
        self.notifier.on_input();
    }

    fn submit_input(&mut self, slot: usize, _now: Duration) -> RoundStep {
        if self.phase != RoundPhase::Active || slot >= ANSWER_SLOTS {
            return RoundStep::Ignored;
        }
        let Some(question) = self.question else {
            return RoundStep::Ignored;
        };

        let step = if slot == question.correct_slot {
            self.correct += 1;
            self.notifier.on_success();
            RoundStep::Progress
        } else {
            trace!(target: "round", "Picked {} for ink {}", question.options[slot], question.ink);
            self.mistakes += 1;
            self.notifier.on_failure();
            RoundStep::Mismatch
        };
        self.next_question();
        step
    }

    fn tick(&mut self, _now: Duration) -> RoundStep {
        if self.phase != RoundPhase::Active {
            return RoundStep::Ignored;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.complete();
            RoundStep::Completed
        } else {
            RoundStep::Progress
        }
    }

    fn tick_interval(&self) -> Option<Duration> {
        Some(TICK_INTERVAL)
    }

    fn phase(&self) -> RoundPhase {
        self.phase
    }

    fn progress(&self) -> RoundProgress {
        RoundProgress {
            score: discrimination_score(self.correct, self.level),
            progress: self.correct,
            target: self.config.target,
            moves: self.correct + self.mistakes,
            remaining_secs: Some(self.remaining_secs),
        }
    }

    fn end(&mut self, _now: Duration) -> Option<RoundOutcome> {
        self.phase = RoundPhase::Idle;
        self.question = None;
        self.finished.take().map(RoundOutcome::Discrimination)
    }
}
