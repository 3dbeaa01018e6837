use core::time::Duration;

/// Default delay between polls while the broker is healthy, in seconds.
pub const DEFAULT_FLOOR_SECS: u64 = 2;

/// Upper bound on the delay between polls, in seconds.
pub const DEFAULT_CEILING_SECS: u64 = 10;

/// Bounded linear retry delay for the worker poll loop.
///
/// Every transport failure adds one second, up to the ceiling. Any answer
/// from the broker drops the delay back to the floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Backoff {
    floor: u64,
    ceiling: u64,
    current: u64,
}

impl Backoff {
    /// Creates a backoff starting at `floor`. A `ceiling` below `floor` is
    /// raised to `floor`.
    pub const fn new(floor: u64, ceiling: u64) -> Self {
        let ceiling = if ceiling < floor { floor } else { ceiling };
        Self {
            floor,
            ceiling,
            current: floor,
        }
    }

    /// Delay to wait before the next poll.
    pub const fn delay(&self) -> Duration {
        Duration::from_secs(self.current)
    }

    pub const fn current_secs(&self) -> u64 {
        self.current
    }

    pub const fn floor_secs(&self) -> u64 {
        self.floor
    }

    pub const fn ceiling_secs(&self) -> u64 {
        self.ceiling
    }

    /// The broker answered; go back to the floor.
    pub const fn reset(&mut self) {
        self.current = self.floor;
    }

    /// The broker could not be reached; wait one second longer next time.
    pub fn fail(&mut self) {
        self.current = self.current.saturating_add(1).min(self.ceiling);
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new(DEFAULT_FLOOR_SECS, DEFAULT_CEILING_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_floor() {
        let backoff = Backoff::default();
        assert_eq!(backoff.current_secs(), 2);
        assert_eq!(backoff.delay(), Duration::from_secs(2));
    }

    #[test]
    fn grows_by_one_per_failure() {
        let mut backoff = Backoff::default();
        let mut seen = vec![backoff.current_secs()];
        for _ in 0..3 {
            backoff.fail();
            seen.push(backoff.current_secs());
        }
        assert_eq!(seen, vec![2, 3, 4, 5]);
    }

    #[test]
    fn caps_at_ceiling_after_eight_failures() {
        let mut backoff = Backoff::default();
        for _ in 0..7 {
            backoff.fail();
        }
        assert_eq!(backoff.current_secs(), 9);
        backoff.fail();
        assert_eq!(backoff.current_secs(), 10);
        for _ in 0..20 {
            backoff.fail();
        }
        assert_eq!(backoff.current_secs(), 10);
    }

    #[test]
    fn reset_returns_to_floor() {
        let mut backoff = Backoff::new(3, 6);
        backoff.fail();
        backoff.fail();
        assert_eq!(backoff.current_secs(), 5);
        backoff.reset();
        assert_eq!(backoff.current_secs(), 3);
    }

    #[test]
    fn ceiling_below_floor_is_raised() {
        let mut backoff = Backoff::new(5, 1);
        assert_eq!(backoff.ceiling_secs(), 5);
        backoff.fail();
        assert_eq!(backoff.current_secs(), 5);
    }

    #[test]
    fn fail_saturates_at_max_delay() {
        let mut backoff = Backoff::new(u64::MAX, u64::MAX);
        backoff.fail();
        assert_eq!(backoff.current_secs(), u64::MAX);

        let mut backoff = Backoff::new(u64::MAX - 1, u64::MAX);
        backoff.fail();
        backoff.fail();
        assert_eq!(backoff.current_secs(), u64::MAX);
    }
}
