//! Injectable wall clock.
//!
//! All schedule and agenda math runs on naive local wall-clock time, the same
//! reference calendar dose slots are defined in.

use chrono::NaiveDateTime;

/// Source of "now" for services.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Local system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// Clock frozen at one instant. Used by tests and the demo seeder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}
