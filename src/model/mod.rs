mod game_kind;
mod leaderboard_entry;
mod level;
mod player_result;
mod round_outcome;
mod session_command;
mod session_event;
mod timer_state;

pub use game_kind::GameKind;
pub use leaderboard_entry::{LeaderboardEntry, TIMESTAMP_FORMAT};
pub use level::{DiscriminationLevel, InvalidLevel, Level, MatchingLevel, OrderedClickLevel};
pub use player_result::{PlayerResult, PlayerStatus, PlayerView};
pub use round_outcome::{
    DiscriminationResult, MatchingResult, MatchingTally, OrderedClickResult, RoundOutcome,
    RoundSummary,
};
pub use session_command::SessionCommand;
pub use session_event::{PairAttempt, RoundProgress, RoundStep, SessionEvent};
pub use timer_state::TimerState;
