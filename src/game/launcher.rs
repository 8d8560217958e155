use log::debug;
use std::cell::RefCell;
use std::rc::Rc;

use super::color_blast::ColorBlastRound;
use super::match_session::MatchSession;
use super::memory_match::MemoryMatchRound;
use super::notifier::notifier_for;
use super::number_rush::NumberRushRound;
use super::roster::SessionServices;
use super::settings::Settings;
use super::turn_session::TurnSession;
use crate::events::EventEmitter;
use crate::model::SessionEvent;

pub type NumberRushSession = TurnSession<NumberRushRound>;
pub type ColorBlastSession = TurnSession<ColorBlastRound>;

/// Builds session controllers with the notifier picked by the sound setting and the deck
/// seed taken from `SEED` when set.
pub struct Launcher {
    settings: Settings,
    services: SessionServices,
}

impl Launcher {
    pub fn new(settings: Settings, services: SessionServices) -> Self {
        Self { settings, services }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn number_rush(
        &self,
        event_emitter: EventEmitter<SessionEvent>,
    ) -> Rc<RefCell<NumberRushSession>> {
        let engine = NumberRushRound::new(notifier_for(&self.settings), self.seed());
        TurnSession::new(engine, self.services.clone(), event_emitter)
    }

    pub fn color_blast(
        &self,
        event_emitter: EventEmitter<SessionEvent>,
    ) -> Rc<RefCell<ColorBlastSession>> {
        let engine = ColorBlastRound::new(notifier_for(&self.settings), self.seed());
        TurnSession::new(engine, self.services.clone(), event_emitter)
    }

    pub fn memory_match(
        &self,
        event_emitter: EventEmitter<SessionEvent>,
    ) -> Rc<RefCell<MatchSession>> {
        let engine = MemoryMatchRound::new(notifier_for(&self.settings), self.seed());
        MatchSession::new(engine, self.services.clone(), event_emitter)
    }

    /// Names for the configured number of players, ready for `start_session`.
    pub fn player_names(&self) -> Vec<String> {
        self.settings.names_for(self.settings.players)
    }

    fn seed(&self) -> Option<u64> {
        let seed = Settings::seed_from_env();
        if let Some(seed) = seed {
            debug!(target: "session", "Using fixed seed {}", seed);
        }
        seed
    }
}
