//! Epoch arithmetic
//!
//! Epoch numbers are never stored; they are derived from the start
//! timestamp, the epoch length and the time passed in by the caller.

/// Current wall-clock time in whole seconds since the Unix epoch
pub fn unix_now() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

/// Fixed-length epochs counted from a start timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpochClock {
    /// Start of epoch 0, seconds since the Unix epoch
    pub start_timestamp: u64,
    /// Epoch length in seconds
    pub epoch_length: u64,
}

impl EpochClock {
    pub fn new(start_timestamp: u64, epoch_length: u64) -> Self {
        Self {
            start_timestamp,
            epoch_length,
        }
    }

    /// Epoch containing `now`. Times before the start fall in epoch 0.
    pub fn current_epoch(&self, now: u64) -> u64 {
        now.saturating_sub(self.start_timestamp)
            .checked_div(self.epoch_length)
            .unwrap_or(0)
    }

    /// Seconds until the epoch containing `now` ends
    pub fn remaining_time(&self, now: u64) -> u64 {
        let epoch = self.current_epoch(now);
        self.epoch_start(epoch + 1).saturating_sub(now)
    }

    /// Timestamp at which `epoch` begins
    pub fn epoch_start(&self, epoch: u64) -> u64 {
        self.start_timestamp
            .saturating_add(epoch.saturating_mul(self.epoch_length))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch_is_floor_of_elapsed() {
        let clock = EpochClock::new(1_000, 300);
        assert_eq!(clock.current_epoch(1_000), 0);
        assert_eq!(clock.current_epoch(1_299), 0);
        assert_eq!(clock.current_epoch(1_300), 1);
        assert_eq!(clock.current_epoch(1_000 + 300 * 7 + 5), 7);
    }

    #[test]
    fn test_epoch_is_monotonic() {
        for length in [1u64, 7, 60, 300, 86_400] {
            let clock = EpochClock::new(50, length);
            let mut previous = 0;
            for t in (0..2_000u64).step_by(13) {
                let epoch = clock.current_epoch(t);
                assert!(epoch >= previous);
                assert_eq!(epoch, t.saturating_sub(50) / length);
                previous = epoch;
            }
        }
    }

    #[test]
    fn test_before_start_is_epoch_zero() {
        let clock = EpochClock::new(1_000, 300);
        assert_eq!(clock.current_epoch(10), 0);
        assert_eq!(clock.remaining_time(900), 400);
    }

    #[test]
    fn test_remaining_time() {
        let clock = EpochClock::new(1_000, 300);
        assert_eq!(clock.remaining_time(1_000), 300);
        assert_eq!(clock.remaining_time(1_299), 1);
        assert_eq!(clock.remaining_time(1_300), 300);
        assert_eq!(clock.remaining_time(1_450), 150);
    }

    #[test]
    fn test_zero_length_does_not_panic() {
        let clock = EpochClock::new(0, 0);
        assert_eq!(clock.current_epoch(100), 0);
    }
}
