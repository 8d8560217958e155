use log::{info, trace};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::roster::{Roster, SessionServices};
use super::round_engine::RoundEngine;
use super::scheduler::TaskId;
use crate::destroyable::Destroyable;
use crate::events::{EventEmitter, EventObserver, Unsubscriber};
use crate::model::{
    GameKind, Level, PlayerResult, PlayerView, RoundStep, SessionCommand, SessionEvent,
};

/// Session controller for games played one player at a time (Number Rush, Color Blast).
/// After each round it waits for `advance_turn` before starting the next player.
pub struct TurnSession<E: RoundEngine + 'static> {
    engine: E,
    roster: Option<Roster>,
    services: SessionServices,
    event_emitter: EventEmitter<SessionEvent>,
    pending_tick: Option<TaskId>,
    round_generation: u64,
    finished: bool,
    self_ref: Weak<RefCell<Self>>,
    subscription: Option<Unsubscriber<SessionCommand<E::Input>>>,
}

impl<E: RoundEngine + 'static> Destroyable for TurnSession<E> {
    fn destroy(&mut self) {
        self.cancel_tick();
        let now = self.services.scheduler.now();
        self.engine.end(now);
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl<E: RoundEngine + 'static> TurnSession<E> {
    pub fn new(
        engine: E,
        services: SessionServices,
        event_emitter: EventEmitter<SessionEvent>,
    ) -> Rc<RefCell<Self>> {
        Rc::new_cyclic(|self_ref| {
            RefCell::new(Self {
                engine,
                roster: None,
                services,
                event_emitter,
                pending_tick: None,
                round_generation: 0,
                finished: false,
                self_ref: self_ref.clone(),
                subscription: None,
            })
        })
    }

    /// Routes commands from the presentation layer into the session.
    pub fn wire_subscription(
        session: &Rc<RefCell<Self>>,
        command_observer: EventObserver<SessionCommand<E::Input>>,
    ) {
        let handler = Rc::downgrade(session);
        let subscription = command_observer.subscribe(move |command| {
            if let Some(session) = handler.upgrade() {
                session.borrow_mut().handle_command(command.clone());
            }
        });
        session.borrow_mut().subscription = Some(subscription);
    }

    pub fn handle_command(&mut self, command: SessionCommand<E::Input>) {
        trace!(target: "session", "Handling command: {:?}", command);
        match command {
            SessionCommand::Start { names, level } => self.start_session(&names, level),
            SessionCommand::AdvanceTurn => self.advance_turn(),
            SessionCommand::Input(input) => self.submit_input(input),
            SessionCommand::RestartRound => self.restart_round(),
            SessionCommand::Finish => {
                self.finalize_session();
            }
            SessionCommand::Abandon => self.abandon(),
            SessionCommand::AdvanceLevel => {
                trace!(target: "session", "{} has no level progression", self.game())
            }
        }
    }

    pub fn game(&self) -> GameKind {
        self.engine.game()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn roster(&self) -> Option<&Roster> {
        self.roster.as_ref()
    }

    pub fn roster_view(&self) -> Vec<PlayerView> {
        self.roster
            .as_ref()
            .map(|roster| roster.view(self.engine.is_active()))
            .unwrap_or_default()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Seats a fresh roster; any previous session and round are discarded.
    pub fn start_session(&mut self, names: &[String], level: Level) {
        self.teardown_round();
        let roster = Roster::new(names, level);
        info!(
            target: "session",
            "Starting {} session {} at level {} with {} players",
            self.game(),
            roster.session_id(),
            level,
            roster.num_players()
        );
        self.event_emitter.emit(SessionEvent::SessionStarted {
            session_id: roster.session_id(),
            game: self.game(),
            level,
            players: roster.names(),
        });
        self.event_emitter.emit(SessionEvent::ReadyForNextTurn { player: 0 });
        self.roster = Some(roster);
        self.finished = false;
    }

    /// Starts the current player's round, skipping players that already have a result.
    /// Finalizes once no players remain.
    pub fn advance_turn(&mut self) {
        if self.finished || self.engine.is_active() {
            return;
        }
        let Some(roster) = self.roster.as_mut() else {
            trace!(target: "session", "No session to advance");
            return;
        };
        roster.skip_completed();
        if roster.is_over() {
            self.finalize_session();
            return;
        }
        self.begin_round();
    }

    /// Replays the current player's round from scratch.
    pub fn restart_round(&mut self) {
        if self.finished || self.roster.is_none() {
            return;
        }
        self.teardown_round();
        self.begin_round();
    }

    pub fn submit_input(&mut self, input: E::Input) {
        let now = self.services.scheduler.now();
        let step = self.engine.submit_input(input, now);
        let Some(player) = self.roster.as_ref().map(Roster::current_player_index) else {
            return;
        };
        match step {
            RoundStep::Ignored => trace!(target: "session", "Ignored input {:?}", input),
            RoundStep::Progress | RoundStep::Mismatch => {
                self.event_emitter.emit(SessionEvent::InputHandled {
                    player,
                    step,
                    progress: self.engine.progress(),
                });
            }
            RoundStep::Completed => {
                self.event_emitter.emit(SessionEvent::InputHandled {
                    player,
                    step,
                    progress: self.engine.progress(),
                });
                self.on_round_complete();
            }
        }
    }

    /// Leaves without touching the leaderboard.
    pub fn abandon(&mut self) {
        self.teardown_round();
        if let Some(roster) = self.roster.as_mut() {
            if !self.finished {
                info!(target: "session", "Session {} abandoned", roster.session_id());
                self.event_emitter.emit(SessionEvent::SessionAbandoned {
                    session_id: roster.session_id(),
                });
            }
            roster.close();
        }
        self.finished = true;
    }

    /// Records every completed player on the leaderboard. Runs at most once per session;
    /// returns the number of entries written.
    pub fn finalize_session(&mut self) -> usize {
        if self.finished {
            return 0;
        }
        self.teardown_round();
        let Some(roster) = self.roster.as_mut() else {
            return 0;
        };
        let recorded = roster.finalize(
            self.engine.game(),
            &mut self.services.leaderboard.borrow_mut(),
        );
        roster.close();
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

    fn begin_round(&mut self) {
        let Some(roster) = self.roster.as_ref() else {
            return;
        };
        let player = roster.current_player_index();
        let level = roster.current_level();
        let now = self.services.scheduler.now();

        self.round_generation += 1;
        self.engine.begin(level, now);
        trace!(target: "session", "Player {} begins round {}", player, self.round_generation);
        self.event_emitter
            .emit(SessionEvent::TurnStarted { player, level });
        self.event_emitter.emit(SessionEvent::InputHandled {
            player,
            step: RoundStep::Progress,
            progress: self.engine.progress(),
        });
        self.schedule_tick();
    }

    fn schedule_tick(&mut self) {
        let Some(interval) = self.engine.tick_interval() else {
            return;
        };
        self.cancel_tick();
        let generation = self.round_generation;
        let handler = self.self_ref.clone();
        let id = self.services.scheduler.schedule(
            interval,
            Box::new(move || {
                if let Some(session) = handler.upgrade() {
                    session.borrow_mut().on_tick(generation);
                }
            }),
        );
        self.pending_tick = Some(id);
    }

    fn cancel_tick(&mut self) {
        if let Some(id) = self.pending_tick.take() {
            self.services.scheduler.cancel(id);
        }
    }

    fn on_tick(&mut self, generation: u64) {
        if generation != self.round_generation || !self.engine.is_active() {
            trace!(target: "session", "Dropping stale tick from round {}", generation);
            return;
        }
        self.pending_tick = None;
        let now = self.services.scheduler.now();
        match self.engine.tick(now) {
            RoundStep::Completed => self.on_round_complete(),
            RoundStep::Ignored => (),
            RoundStep::Progress | RoundStep::Mismatch => {
                if let Some(seconds) = self.engine.progress().remaining_secs {
                    self.event_emitter
                        .emit(SessionEvent::TimeRemaining { seconds });
                }
                self.schedule_tick();
            }
        }
    }

    fn on_round_complete(&mut self) {
        self.cancel_tick();
        let now = self.services.scheduler.now();
        let Some(outcome) = self.engine.end(now) else {
            return;
        };
        let Some(roster) = self.roster.as_mut() else {
            return;
        };
        let Some(summary) = outcome.summaries().into_iter().next() else {
            return;
        };
        let Some(player) = roster.record_current(&summary) else {
            return;
        };
        info!(
            target: "session",
            "{} finished the {} round with {} pts",
            roster.players()[player].name,
            outcome.game(),
            summary.score
        );
        self.event_emitter
            .emit(SessionEvent::RoundCompleted { player, outcome });

        if roster.is_over() {
            self.finalize_session();
        } else {
            let next = roster.current_player_index();
            self.event_emitter
                .emit(SessionEvent::ReadyForNextTurn { player: next });
        }
    }

    fn teardown_round(&mut self) {
        self.cancel_tick();
        // bump the generation so a tick that slipped past cancellation is dropped
        self.round_generation += 1;
        let now = self.services.scheduler.now();
        self.engine.end(now);
    }
}
