use chrono::{Local, NaiveDateTime};

/// Source of local wall-clock time, injected wherever "now" matters
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Reads the system clock in the local timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always reports the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
