use log::{info, trace};
use std::cell::RefCell;
use std::rc::Rc;

use super::memory_match::MemoryMatchRound;
use super::roster::{Roster, SessionServices};
use super::round_engine::RoundEngine;
use crate::destroyable::Destroyable;
use crate::events::{EventEmitter, EventObserver, Unsubscriber};
use crate::model::{
    GameKind, Level, PlayerResult, PlayerStatus, PlayerView, RoundStep, SessionCommand,
    SessionEvent,
};

/// Session controller for Memory Match. All players share one grid per level; scores add up
/// across levels until the last level or an explicit finish.
pub struct MatchSession {
    engine: MemoryMatchRound,
    roster: Option<Roster>,
    services: SessionServices,
    event_emitter: EventEmitter<SessionEvent>,
    level_complete: bool,
    finished: bool,
    subscription: Option<Unsubscriber<SessionCommand<usize>>>,
}

impl Destroyable for MatchSession {
    fn destroy(&mut self) {
        let now = self.services.scheduler.now();
        self.engine.end(now);
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl MatchSession {
    pub fn new(
        engine: MemoryMatchRound,
        services: SessionServices,
        event_emitter: EventEmitter<SessionEvent>,
    ) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            engine,
            roster: None,
            services,
            event_emitter,
            level_complete: false,
            finished: false,
            subscription: None,
        }))
    }

    pub fn wire_subscription(
        session: &Rc<RefCell<Self>>,
        command_observer: EventObserver<SessionCommand<usize>>,
    ) {
        let handler = Rc::downgrade(session);
        let subscription = command_observer.subscribe(move |command| {
            if let Some(session) = handler.upgrade() {
                session.borrow_mut().handle_command(command.clone());
            }
        });
        session.borrow_mut().subscription = Some(subscription);
    }

    pub fn handle_command(&mut self, command: SessionCommand<usize>) {
        trace!(target: "session", "Handling command: {:?}", command);
        match command {
            SessionCommand::Start { names, level } => self.start_session(&names, level),
            SessionCommand::Input(index) => self.submit_input(index),
            SessionCommand::RestartRound => self.restart_round(),
            SessionCommand::AdvanceLevel => self.advance_level(),
            SessionCommand::Finish => {
                self.finalize_session();
            }
            SessionCommand::Abandon => self.abandon(),
            SessionCommand::AdvanceTurn => {
                trace!(target: "session", "Memory Match turns pass on a miss, not on request")
            }
        }
    }

    pub fn game(&self) -> GameKind {
        GameKind::MemoryMatch
    }

    pub fn engine(&self) -> &MemoryMatchRound {
        &self.engine
    }

    pub fn roster(&self) -> Option<&Roster> {
        self.roster.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// True between clearing a grid and the decision to advance or finish.
    pub fn is_level_complete(&self) -> bool {
        self.level_complete
    }

    pub fn roster_view(&self) -> Vec<PlayerView> {
        let Some(roster) = self.roster.as_ref() else {
            return Vec::new();
        };
        let active = self.engine.is_active();
        roster
            .players()
            .iter()
            .enumerate()
            .map(|(index, player)| {
                let status = if active && index == self.engine.current_player() {
                    PlayerStatus::Playing
                } else if player.completed {
                    PlayerStatus::Completed {
                        score: player.score,
                    }
                } else {
                    PlayerStatus::Waiting
                };
                PlayerView {
                    name: player.name.clone(),
                    status,
                }
            })
            .collect()
    }

    /// Seats the roster and deals the first grid right away.
    pub fn start_session(&mut self, names: &[String], level: Level) {
        let now = self.services.scheduler.now();
        self.engine.end(now);
        let roster = Roster::new(names, level);
        info!(
            target: "session",
            "Starting Memory Match session {} at level {} with {} players",
            roster.session_id(),
            level,
            roster.num_players()
        );
        self.engine.set_players(roster.num_players());
        self.event_emitter.emit(SessionEvent::SessionStarted {
            session_id: roster.session_id(),
            game: self.game(),
            level,
            players: roster.names(),
        });
        self.roster = Some(roster);
        self.finished = false;
        self.begin_level();
    }

    pub fn submit_input(&mut self, index: usize) {
        let now = self.services.scheduler.now();
        let moves_before = self.engine.progress().moves;
        let step = self.engine.submit_input(index, now);
        if step == RoundStep::Ignored {
            trace!(target: "session", "Ignored card {}", index);
            return;
        }

        let progress = self.engine.progress();
        if progress.moves > moves_before {
            if let Some(attempt) = self.engine.last_attempt() {
                self.event_emitter
                    .emit(SessionEvent::PairAttempted(attempt));
            }
        }
        self.event_emitter.emit(SessionEvent::InputHandled {
            player: self.engine.current_player(),
            step,
            progress,
        });

        match step {
            RoundStep::Mismatch => self.event_emitter.emit(SessionEvent::TurnPassed {
                player: self.engine.current_player(),
            }),
            RoundStep::Completed => self.on_level_complete(),
            RoundStep::Progress | RoundStep::Ignored => (),
        }
    }

    /// Moves the same roster to the next level after a cleared grid.
    pub fn advance_level(&mut self) {
        if self.finished || !self.level_complete {
            return;
        }
        let Some(roster) = self.roster.as_mut() else {
            return;
        };
        match roster.current_level().next() {
            Some(next) => {
                info!(target: "session", "Memory Match advancing to level {}", next);
                roster.set_level(next);
                self.begin_level();
            }
            None => {
                self.finalize_session();
            }
        }
    }

    /// Redeals the current level. Points scored on the abandoned grid are dropped; totals
    /// from earlier levels stay.
    pub fn restart_round(&mut self) {
        if self.finished || self.level_complete || self.roster.is_none() {
            return;
        }
        let now = self.services.scheduler.now();
        self.engine.end(now);
        self.begin_level();
    }

    /// Leaves without touching the leaderboard.
    pub fn abandon(&mut self) {
        let now = self.services.scheduler.now();
        self.engine.end(now);
        if let Some(roster) = self.roster.as_mut() {
            if !self.finished {
                info!(target: "session", "Session {} abandoned", roster.session_id());
                self.event_emitter.emit(SessionEvent::SessionAbandoned {
                    session_id: roster.session_id(),
                });
            }
            roster.close();
        }
        self.level_complete = false;
        self.finished = true;
    }

    /// Records every player that cleared at least one grid. Runs at most once per session;
    /// returns the number of entries written.
    pub fn finalize_session(&mut self) -> usize {
        if self.finished {
            return 0;
        }
        let now = self.services.scheduler.now();
        self.engine.end(now);
        let Some(roster) = self.roster.as_mut() else {
            return 0;
        };
        let recorded = roster.finalize(
            GameKind::MemoryMatch,
            &mut self.services.leaderboard.borrow_mut(),
        );
        roster.close();
        self.level_complete = false;
        self.finished = true;
        self.event_emitter.emit(SessionEvent::SessionFinished {
            session_id: roster.session_id(),
            recorded,
            standings: roster.standings(),
        });
        recorded
    }

    pub fn standings(&self) -> Vec<PlayerResult> {
        self.roster
            .as_ref()
            .map(Roster::standings)
            .unwrap_or_default()
    }

    fn begin_level(&mut self) {
        let Some(level) = self.roster.as_ref().map(Roster::current_level) else {
            return;
        };
        let now = self.services.scheduler.now();
        self.level_complete = false;
        self.engine.begin(level, now);
        self.event_emitter.emit(SessionEvent::LevelStarted {
            game: GameKind::MemoryMatch,
            level,
        });
        self.event_emitter.emit(SessionEvent::TurnStarted {
            player: self.engine.current_player(),
            level,
        });
    }

    fn on_level_complete(&mut self) {
        let now = self.services.scheduler.now();
        let bonus = self.engine.completion_bonus();
        let Some(outcome) = self.engine.end(now) else {
            return;
        };
        let Some(roster) = self.roster.as_mut() else {
            return;
        };
        roster.accumulate(&outcome.summaries());
        let next_level = outcome.level().next();
        info!(
            target: "session",
            "Memory Match level {} cleared, totals {:?}",
            outcome.level(),
            roster.players().iter().map(|p| p.score).collect::<Vec<_>>()
        );
        self.level_complete = true;
        self.event_emitter.emit(SessionEvent::LevelCompleted {
            outcome,
            bonus,
            next_level,
        });

        if next_level.is_none() {
            self.finalize_session();
        }
    }
}
