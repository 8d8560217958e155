use itertools::Itertools;
use log::{info, warn};
use std::cell::RefCell;
use std::rc::Rc;
use uuid::Uuid;

use super::leaderboard::Leaderboard;
use super::scheduler::Scheduler;
use super::settings::MAX_PLAYERS;
use crate::model::{GameKind, Level, PlayerResult, PlayerStatus, PlayerView, RoundSummary};

/// Handles a session controller is built with.
#[derive(Clone)]
pub struct SessionServices {
    pub scheduler: Rc<dyn Scheduler>,
    pub leaderboard: Rc<RefCell<Leaderboard>>,
}

/// Players of one session and the cursor over them. The cursor only moves forward; the
/// session is over once it passes the last player.
#[derive(Debug, Clone)]
pub struct Roster {
    session_id: Uuid,
    players: Vec<PlayerResult>,
    current_player_index: usize,
    current_level: Level,
}

impl Roster {
    pub fn new(names: &[String], level: Level) -> Self {
        let count = names.len().clamp(1, MAX_PLAYERS);
        if count != names.len() {
            warn!(target: "session", "{} players requested, seating {}", names.len(), count);
        }
        let players = (0..count)
            .map(|slot| {
                let name = names.get(slot).map(String::as_str).unwrap_or_default();
                PlayerResult::new(slot, name, level)
            })
            .collect();
        Self {
            session_id: Uuid::new_v4(),
            players,
            current_player_index: 0,
            current_level: level,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn players(&self) -> &[PlayerResult] {
        &self.players
    }

    pub fn num_players(&self) -> usize {
        self.players.len()
    }

    pub fn names(&self) -> Vec<String> {
        self.players.iter().map(|p| p.name.clone()).collect()
    }

    pub fn current_player_index(&self) -> usize {
        self.current_player_index
    }

    pub fn current_level(&self) -> Level {
        self.current_level
    }

    pub(crate) fn set_level(&mut self, level: Level) {
        self.current_level = level;
    }

    pub fn is_over(&self) -> bool {
        self.current_player_index >= self.players.len()
    }

    /// Moves past players that already have a result.
    pub(crate) fn skip_completed(&mut self) {
        while self
            .players
            .get(self.current_player_index)
            .is_some_and(|player| player.completed)
        {
            self.current_player_index += 1;
        }
    }

    /// Stores the round result in the current slot and moves to the next player.
    pub(crate) fn record_current(&mut self, summary: &RoundSummary) -> Option<usize> {
        let index = self.current_player_index;
        let player = self.players.get_mut(index)?;
        player.record(summary);
        self.current_player_index += 1;
        Some(index)
    }

    /// Adds one summary per slot onto the running totals.
    pub(crate) fn accumulate(&mut self, summaries: &[RoundSummary]) {
        for (player, summary) in self.players.iter_mut().zip(summaries) {
            player.accumulate(summary);
        }
    }

    pub(crate) fn close(&mut self) {
        self.current_player_index = self.players.len();
    }

    pub fn view(&self, round_active: bool) -> Vec<PlayerView> {
        self.players
            .iter()
            .enumerate()
            .map(|(index, player)| {
                let status = if player.completed {
                    PlayerStatus::Completed {
                        score: player.score,
                    }
                } else if round_active && index == self.current_player_index {
                    PlayerStatus::Playing
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

    /// Completed players, best score first.
    pub fn standings(&self) -> Vec<PlayerResult> {
        self.players
            .iter()
            .filter(|player| player.completed)
            .sorted_by(|a, b| b.score.cmp(&a.score))
            .cloned()
            .collect()
    }

    /// Writes one leaderboard entry per completed player. Persistence failures are logged
    /// and the entry is still counted; the board keeps it in memory.
    pub fn finalize(&self, game: GameKind, leaderboard: &mut Leaderboard) -> usize {
        let mut recorded = 0;
        for player in self.players.iter().filter(|player| player.completed) {
            if let Err(e) = leaderboard.record_score(game, &player.name, player.score, player.level)
            {
                warn!(
                    target: "leaderboard",
                    "Keeping {}'s score in memory only: {}", player.name, e
                );
            }
            recorded += 1;
        }
        info!(
            target: "session",
            "Session {} finished: {} of {} players recorded",
            self.session_id,
            recorded,
            self.players.len()
        );
        recorded
    }
}
