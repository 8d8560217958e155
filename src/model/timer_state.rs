use std::time::Duration;

/// Stopwatch over the scheduler clock. Timestamps are offsets on that clock, so rounds
/// measure time the same way whether the loop runs in real time or in a test.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimerState {
    pub started_timestamp: Duration,
    pub ended_timestamp: Option<Duration>,
}

impl TimerState {
    pub fn started_at(now: Duration) -> TimerState {
        TimerState {
            started_timestamp: now,
            ended_timestamp: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.ended_timestamp.is_none()
    }

    pub fn elapsed(&self, now: Duration) -> Duration {
        self.ended_timestamp
            .unwrap_or(now)
            .saturating_sub(self.started_timestamp)
    }

    pub fn ended(&self, now: Duration) -> TimerState {
        let mut new_state = *self;
        if new_state.ended_timestamp.is_none() {
            new_state.ended_timestamp = Some(now);
        }
        new_state
    }
}
