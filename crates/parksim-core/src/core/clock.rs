//! Wall-clock time and sleep capability.
//!
//! The session loop never reads the system clock or sleeps directly; it goes
//! through [`Clock`] so tests can pin time and observe pacing.

use std::thread;
use std::time::Duration;

use chrono::{DateTime, Local};

pub trait Clock {
    /// Current local wall-clock time.
    fn now(&self) -> DateTime<Local>;

    /// Blocks the calling thread for `duration`.
    fn sleep(&self, duration: Duration);

    /// Seed for pseudo-random generation: whole seconds since the Unix epoch.
    fn seed(&self) -> u64 {
        self.now().timestamp().max(0) as u64
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Local> {
        (**self).now()
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration);
    }
}

/// Clock backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FakeClock;
    use super::*;

    #[test]
    fn test_fake_clock_advances_on_sleep() {
        let clock = FakeClock::at(2025, 6, 1, 12, 0, 0);
        let start = clock.now();

        clock.sleep(Duration::from_millis(800));
        clock.sleep(Duration::from_millis(800));

        assert_eq!(clock.sleeps().len(), 2);
        assert_eq!((clock.now() - start).num_milliseconds(), 1600);
    }

    #[test]
    fn test_seed_has_second_resolution() {
        let clock = FakeClock::at(2025, 6, 1, 12, 0, 0);
        let seed = clock.seed();

        clock.sleep(Duration::from_millis(400));
        assert_eq!(clock.seed(), seed);

        clock.sleep(Duration::from_millis(600));
        assert_eq!(clock.seed(), seed + 1);
    }

    #[test]
    fn test_system_clock_sleep_blocks() {
        let clock = SystemClock;
        let before = std::time::Instant::now();
        clock.sleep(Duration::from_millis(5));
        assert!(before.elapsed() >= Duration::from_millis(5));
    }
}
