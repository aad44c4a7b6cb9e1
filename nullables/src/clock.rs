//! Nullable clock: deterministic time for testing.

use std::sync::atomic::{AtomicU64, Ordering};

use evote_types::{Clock, Timestamp};

/// A deterministic clock for testing.
///
/// Time only advances when you tell it to, unless built with
/// [`NullClock::ticking`]. Shareable across threads.
#[derive(Debug, Default)]
pub struct NullClock {
    nanos: AtomicU64,
    tick: u64,
}

impl NullClock {
    pub fn new(initial: Timestamp) -> Self {
        Self {
            nanos: AtomicU64::new(initial.as_nanos()),
            tick: 0,
        }
    }

    /// A clock that moves forward one nanosecond on every read, so no two
    /// readers ever see the same instant.
    pub fn ticking(initial: Timestamp) -> Self {
        Self {
            nanos: AtomicU64::new(initial.as_nanos()),
            tick: 1,
        }
    }

    pub fn at_secs(secs: u64) -> Self {
        Self::new(Timestamp::from_secs(secs))
    }

    /// Advance time by a number of seconds.
    pub fn advance_secs(&self, secs: u64) {
        self.nanos
            .fetch_add(Timestamp::from_secs(secs).as_nanos(), Ordering::SeqCst);
    }

    /// Advance time by a number of nanoseconds.
    pub fn advance_nanos(&self, nanos: u64) {
        self.nanos.fetch_add(nanos, Ordering::SeqCst);
    }

    pub fn set(&self, at: Timestamp) {
        self.nanos.store(at.as_nanos(), Ordering::SeqCst);
    }
}

impl Clock for NullClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_nanos(self.nanos.fetch_add(self.tick, Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_only_on_request() {
        let clock = NullClock::at_secs(100);
        assert_eq!(clock.now(), Timestamp::from_secs(100));
        assert_eq!(clock.now(), Timestamp::from_secs(100));
        clock.advance_secs(5);
        assert_eq!(clock.now(), Timestamp::from_secs(105));
        clock.advance_nanos(1);
        assert_eq!(clock.now().as_nanos(), 105_000_000_001);
        clock.set(Timestamp::EPOCH);
        assert_eq!(clock.now(), Timestamp::EPOCH);
    }

    #[test]
    fn ticking_clock_never_repeats() {
        let clock = NullClock::ticking(Timestamp::from_secs(100));
        let a = clock.now();
        let b = clock.now();
        assert_eq!(a, Timestamp::from_secs(100));
        assert_eq!(b.as_nanos(), a.as_nanos() + 1);
    }
}
