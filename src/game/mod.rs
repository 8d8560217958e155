pub mod color_blast;
pub mod launcher;
pub mod leaderboard;
pub mod match_session;
pub mod memory_match;
pub mod notifier;
pub mod number_rush;
pub mod roster;
pub mod round_engine;
pub mod scheduler;
pub mod scoring;
pub mod settings;
pub mod turn_session;

pub use color_blast::{ColorBlastRound, InkColor, Question};
pub use launcher::{ColorBlastSession, Launcher, NumberRushSession};
pub use leaderboard::Leaderboard;
pub use match_session::MatchSession;
pub use memory_match::{Card, MemoryMatchRound};
pub use notifier::{notifier_for, LogNotifier, Notifier, SilentNotifier};
pub use number_rush::NumberRushRound;
pub use roster::{Roster, SessionServices};
pub use round_engine::{RoundEngine, RoundPhase};
pub use scheduler::{ManualScheduler, Scheduler, TaskId};
pub use settings::Settings;
pub use turn_session::TurnSession;

