//! Source of the current time for the membership service

use chrono::{DateTime, Utc};

/// Supplies "now" so token expiry and dues rollover can be driven in tests
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
pub use fixed::FixedClock;

#[cfg(test)]
mod fixed {
    use super::Clock;
    use chrono::{DateTime, Duration, Utc};
    use std::sync::Mutex;

    /// A clock that only moves when told to
    #[derive(Debug)]
    pub struct FixedClock(Mutex<DateTime<Utc>>);

    impl FixedClock {
        pub fn at(now: DateTime<Utc>) -> Self {
            Self(Mutex::new(now))
        }

        pub fn set(&self, now: DateTime<Utc>) {
            *self.0.lock().unwrap() = now;
        }

        pub fn advance(&self, by: Duration) {
            let mut now = self.0.lock().unwrap();
            *now += by;
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }
}
