//! Filters raw detector readings into a stable displayed weight.
//!
//! The digit detector misreads individual frames: it drops digits, sees
//! digits in glare and loses the display entirely. A reading is only shown
//! once several recent frames agree on it.

use std::collections::VecDeque;

/// Readings considered for the vote.
const HISTORY_LEN: usize = 5;
/// Agreeing readings needed before the display changes.
const VOTES_REQUIRED: usize = 3;

/// Default minimum digit count. Rejects "65" read from a "605" display.
pub const DEFAULT_MIN_DIGITS: u32 = 3;
/// Default largest accepted change between two valid readings, in kg.
pub const DEFAULT_MAX_JUMP: i64 = 2000;

#[derive(Debug, Clone)]
pub struct WeightStabilizer {
    history: VecDeque<i64>,
    current_display_weight: i64,
    last_valid_reading: i64,
    min_digits: u32,
    max_jump: i64,
}

impl Default for WeightStabilizer {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_DIGITS, DEFAULT_MAX_JUMP)
    }
}

fn digit_count(value: i64) -> u32 {
    value.unsigned_abs().checked_ilog10().map_or(1, |d| d + 1)
}

impl WeightStabilizer {
    pub fn new(min_digits: u32, max_jump: i64) -> Self {
        Self {
            history: VecDeque::with_capacity(HISTORY_LEN),
            current_display_weight: 0,
            last_valid_reading: 0,
            min_digits,
            max_jump,
        }
    }

    pub fn current(&self) -> i64 {
        self.current_display_weight
    }

    /// Feed one raw reading (`None` = nothing detected) and return the
    /// weight to display.
    pub fn process(&mut self, raw: Option<i64>) -> i64 {
        let Some(value) = raw else {
            return self.current_display_weight;
        };

        if digit_count(value) < self.min_digits {
            return self.current_display_weight;
        }

        // No jump filter until a first valid reading exists
        if self.last_valid_reading > 0
            && value.abs_diff(self.last_valid_reading) > self.max_jump.unsigned_abs()
        {
            return self.current_display_weight;
        }

        if self.history.len() == HISTORY_LEN {
            self.history.pop_front();
        }
        self.history.push_back(value);
        self.last_valid_reading = value;

        if let Some(winner) = self.majority() {
            self.current_display_weight = winner;
        }
        self.current_display_weight
    }

    fn majority(&self) -> Option<i64> {
        self.history
            .iter()
            .copied()
            .find(|candidate| self.history.iter().filter(|v| *v == candidate).count() >= VOTES_REQUIRED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(stabilizer: &mut WeightStabilizer, values: &[Option<i64>]) -> i64 {
        values.iter().fold(0, |_, v| stabilizer.process(*v))
    }

    #[test]
    fn test_starts_at_zero_and_ignores_no_detection() {
        let mut s = WeightStabilizer::default();
        assert_eq!(s.process(None), 0);
        assert_eq!(s.current(), 0);
    }

    #[test]
    fn test_three_agreeing_readings_update_display() {
        let mut s = WeightStabilizer::default();
        assert_eq!(s.process(Some(605)), 0);
        assert_eq!(s.process(Some(605)), 0);
        assert_eq!(s.process(Some(605)), 605);
    }

    #[test]
    fn test_short_readings_are_rejected() {
        let mut s = WeightStabilizer::default();
        feed(&mut s, &[Some(605), Some(605), Some(605)]);
        assert_eq!(feed(&mut s, &[Some(65), Some(65), Some(65)]), 605);
        assert_eq!(digit_count(0), 1);
        assert_eq!(digit_count(-1200), 4);
    }

    #[test]
    fn test_large_jumps_are_rejected() {
        let mut s = WeightStabilizer::default();
        feed(&mut s, &[Some(1000), Some(1000), Some(1000)]);
        assert_eq!(feed(&mut s, &[Some(8000), Some(8000), Some(8000)]), 1000);
        // Within the threshold is fine
        assert_eq!(feed(&mut s, &[Some(2900), Some(2900), Some(2900)]), 2900);
    }

    #[test]
    fn test_extreme_readings_are_rejected_as_jumps() {
        let mut s = WeightStabilizer::default();
        feed(&mut s, &[Some(1000), Some(1000), Some(1000)]);
        assert_eq!(s.process(Some(i64::MIN)), 1000);
        assert_eq!(s.process(Some(i64::MAX)), 1000);

        let mut s = WeightStabilizer::default();
        feed(&mut s, &[Some(i64::MAX), Some(i64::MAX), Some(i64::MAX)]);
        assert_eq!(s.current(), i64::MAX);
        assert_eq!(s.process(Some(i64::MIN)), i64::MAX);
    }

    #[test]
    fn test_first_reading_skips_jump_filter() {
        let mut s = WeightStabilizer::default();
        assert_eq!(feed(&mut s, &[Some(9500), Some(9500), Some(9500)]), 9500);
    }

    #[test]
    fn test_noisy_frames_need_majority() {
        let mut s = WeightStabilizer::default();
        let shown = feed(&mut s, &[Some(1200), Some(1210), Some(1200), Some(1220), None]);
        assert_eq!(shown, 0);
        assert_eq!(s.process(Some(1200)), 1200);
    }

    #[test]
    fn test_history_window_slides() {
        let mut s = WeightStabilizer::default();
        feed(&mut s, &[Some(1200), Some(1200), Some(1200)]);
        // Two more 1300s leave 1200 with three votes in the window
        assert_eq!(feed(&mut s, &[Some(1300), Some(1300)]), 1200);
        // Next 1300 evicts the oldest 1200 and wins
        assert_eq!(s.process(Some(1300)), 1300);
    }
}
