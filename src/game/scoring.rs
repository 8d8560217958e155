use std::time::Duration;

use crate::model::Level;

/// Shortest elapsed time the speed formula divides by.
const MIN_ELAPSED: Duration = Duration::from_millis(1);

/// Number Rush: `floor(10000 / seconds) * level`.
pub fn ordered_click_score(elapsed: Duration, level: Level) -> u32 {
    let seconds = elapsed.max(MIN_ELAPSED).as_secs_f64();
    let speed = (10_000.0 / seconds).floor() as u32;
    speed.saturating_mul(level.multiplier())
}

/// Color Blast: `correct * level * 10`.
pub fn discrimination_score(correct: u32, level: Level) -> u32 {
    correct
        .saturating_mul(level.multiplier())
        .saturating_mul(10)
}

/// Memory Match: points for one match, where `streak` already counts this match.
pub fn match_award(level: Level, streak: u32) -> u32 {
    let base = 10 * level.multiplier();
    base * (1 + streak / 3)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(n: u8) -> Level {
        Level::new(n).unwrap()
    }

    #[test]
    fn test_ordered_click_score() {
        assert_eq!(ordered_click_score(Duration::from_secs(5), level(3)), 6000);
        assert_eq!(ordered_click_score(Duration::from_millis(7300), level(1)), 1369);
        assert_eq!(ordered_click_score(Duration::from_secs(20_001), level(5)), 0);
    }

    #[test]
    fn test_ordered_click_score_zero_elapsed_is_finite() {
        assert_eq!(ordered_click_score(Duration::ZERO, level(2)), 20_000_000);
    }

    #[test]
    fn test_discrimination_score() {
        assert_eq!(discrimination_score(12, level(4)), 480);
        assert_eq!(discrimination_score(0, level(5)), 0);
    }

    #[test]
    fn test_match_award_streaks() {
        assert_eq!(match_award(level(2), 1), 20);
        assert_eq!(match_award(level(2), 2), 20);
        assert_eq!(match_award(level(2), 3), 40);
        assert_eq!(match_award(level(2), 4), 40);
        assert_eq!(match_award(level(2), 6), 60);
        assert_eq!(match_award(level(1), 1), 10);
    }
}
