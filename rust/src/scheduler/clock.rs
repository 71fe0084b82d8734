//! Minute-resolution clock arithmetic.
//!
//! The scheduler works in minutes since midnight so that phase end times can
//! be compared without wrapping; conversion back to a wall-clock time wraps
//! at midnight.

use chrono::{NaiveTime, Timelike};

pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// Minutes since midnight, seconds truncated.
pub fn minutes_of(time: NaiveTime) -> i64 {
    i64::from(time.num_seconds_from_midnight() / 60)
}

/// Wall-clock time `minutes` after midnight, wrapping past 24:00.
pub fn time_at(minutes: i64) -> NaiveTime {
    let minutes = minutes.rem_euclid(MINUTES_PER_DAY);
    NaiveTime::from_hms_opt((minutes / 60) as u32, (minutes % 60) as u32, 0).unwrap_or_default()
}

/// Running clock of one stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StageClock {
    now: i64,
    latest_end: i64,
}

impl StageClock {
    pub fn starting_at(minutes: i64) -> Self {
        Self {
            now: minutes,
            latest_end: minutes,
        }
    }

    pub fn now(&self) -> i64 {
        self.now
    }

    /// Latest end of any game placed so far (the start time if none).
    pub fn latest_end(&self) -> i64 {
        self.latest_end
    }

    /// Place a game of `duration` minutes at `start`, then move the clock past
    /// the game and the following break.
    pub fn place(&mut self, start: i64, duration: u32, break_after: u32) {
        let end = start + i64::from(duration);
        self.latest_end = self.latest_end.max(end);
        self.now = end + i64::from(break_after);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn test_conversion() {
        assert_eq!(minutes_of(t(10, 30)), 630);
        assert_eq!(time_at(630), t(10, 30));
        assert_eq!(minutes_of(NaiveTime::from_hms_opt(9, 15, 59).unwrap()), 555);
    }

    #[test]
    fn test_time_wraps_past_midnight() {
        assert_eq!(time_at(MINUTES_PER_DAY + 45), t(0, 45));
        assert_eq!(time_at(-15), t(23, 45));
    }

    #[test]
    fn test_clock_place() {
        let mut clock = StageClock::starting_at(600);
        clock.place(clock.now(), 50, 10);
        assert_eq!(clock.now(), 660);
        assert_eq!(clock.latest_end(), 650);

        // An earlier pinned game does not pull the end back.
        clock.place(540, 30, 0);
        assert_eq!(clock.now(), 570);
        assert_eq!(clock.latest_end(), 650);
    }
}
