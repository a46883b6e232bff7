//! Injectable time source for retention decisions

use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};

/// A source of the current time
///
/// The registry reads time through this trait so retention behavior is
/// testable without sleeping.
pub trait Clock: Send + Sync {
    /// The current instant
    fn now(&self) -> SystemTime;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Hand-driven clock for tests
///
/// Clones share one underlying instant; advancing any clone advances
/// them all.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<SystemTime>>,
}

impl ManualClock {
    /// Create a clock frozen at `start`
    pub fn new(start: SystemTime) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        *self.now.lock().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_starts_frozen() {
        let start = SystemTime::UNIX_EPOCH;
        let clock = ManualClock::new(start);

        assert_eq!(clock.now(), start);
        assert_eq!(clock.now(), start);
    }

    #[test]
    fn test_manual_clock_advance_is_shared_across_clones() {
        let clock = ManualClock::new(SystemTime::UNIX_EPOCH);
        let other = clock.clone();

        clock.advance(Duration::from_secs(90));

        assert_eq!(
            other.now(),
            SystemTime::UNIX_EPOCH + Duration::from_secs(90)
        );
    }
}
