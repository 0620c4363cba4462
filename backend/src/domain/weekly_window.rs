//! Weekly customization window.
//!
//! Pure functions of a caller-supplied local timestamp. Under the default
//! rule customization opens Wednesday 00:01 and stays open through the end
//! of Friday; Saturday is purchasing day and Sunday is delivery day.
//!
//! Day-of-week arithmetic uses Sunday-start weeks: the deadline is the
//! Friday of the Sunday..Saturday week holding `now`, so on a Saturday the
//! deadline has already passed.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// Which days customization is allowed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowRule {
    /// Wednesday 00:01 through Friday 23:59:59.999
    #[default]
    WednesdayToFriday,
    /// Monday 00:00 through Friday 23:59:59.999
    Weekdays,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    Open,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRemaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub expired: bool,
}

impl TimeRemaining {
    fn expired() -> Self {
        Self {
            days: 0,
            hours: 0,
            minutes: 0,
            expired: true,
        }
    }

    /// Whole minutes left, zero once expired
    #[cfg(test)]
    pub fn total_minutes(&self) -> i64 {
        (self.days * 24 + self.hours) * 60 + self.minutes
    }
}

/// Everything a caller needs to render the window at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowStatus {
    pub state: WindowState,
    pub deadline: NaiveDateTime,
    pub time_remaining: TimeRemaining,
    pub next_opening: NaiveDateTime,
    pub delivery_date: NaiveDateTime,
}

const DELIVERY_HOUR: i64 = 8;
const WEDNESDAY_OPENING_MINUTE: i64 = 1;

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::default())
}

fn days_from_sunday(now: NaiveDateTime) -> i64 {
    now.weekday().num_days_from_sunday() as i64
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeeklyWindow {
    rule: WindowRule,
}

impl WeeklyWindow {
    pub fn new(rule: WindowRule) -> Self {
        Self { rule }
    }

    pub fn rule(&self) -> WindowRule {
        self.rule
    }

    pub fn state(&self, now: NaiveDateTime) -> WindowState {
        if self.is_open(now) {
            WindowState::Open
        } else {
            WindowState::Closed
        }
    }

    pub fn is_open(&self, now: NaiveDateTime) -> bool {
        match (self.rule, now.weekday()) {
            (WindowRule::WednesdayToFriday, Weekday::Wed) => {
                now >= midnight(now.date()) + Duration::minutes(WEDNESDAY_OPENING_MINUTE)
            }
            (WindowRule::WednesdayToFriday, Weekday::Thu | Weekday::Fri) => true,
            (WindowRule::WednesdayToFriday, _) => false,
            (WindowRule::Weekdays, Weekday::Sat | Weekday::Sun) => false,
            (WindowRule::Weekdays, _) => true,
        }
    }

    /// Friday 23:59:59.999 of the Sunday-start week holding `now`
    pub fn deadline(&self, now: NaiveDateTime) -> NaiveDateTime {
        let friday = now.date() + Duration::days(5 - days_from_sunday(now));
        midnight(friday) + Duration::days(1) - Duration::milliseconds(1)
    }

    pub fn time_remaining(&self, now: NaiveDateTime) -> TimeRemaining {
        let remaining = (self.deadline(now) - now).num_milliseconds();
        if remaining <= 0 {
            return TimeRemaining::expired();
        }

        const MINUTE: i64 = 60 * 1000;
        const HOUR: i64 = 60 * MINUTE;
        const DAY: i64 = 24 * HOUR;

        TimeRemaining {
            days: remaining / DAY,
            hours: (remaining % DAY) / HOUR,
            minutes: (remaining % HOUR) / MINUTE,
            expired: false,
        }
    }

    /// Sunday 08:00 on or after `now`'s date; a Sunday returns itself
    pub fn delivery_date(&self, now: NaiveDateTime) -> NaiveDateTime {
        let offset = (7 - days_from_sunday(now)) % 7;
        midnight(now.date() + Duration::days(offset)) + Duration::hours(DELIVERY_HOUR)
    }

    /// `now` while open, otherwise the next instant the window opens
    pub fn next_opening(&self, now: NaiveDateTime) -> NaiveDateTime {
        if self.is_open(now) {
            return now;
        }

        let (opening_day, opening_offset) = match self.rule {
            WindowRule::WednesdayToFriday => (3, Duration::minutes(WEDNESDAY_OPENING_MINUTE)),
            WindowRule::Weekdays => (1, Duration::zero()),
        };

        let days_ahead = (opening_day + 7 - days_from_sunday(now)) % 7;
        let candidate = midnight(now.date() + Duration::days(days_ahead)) + opening_offset;
        if candidate > now {
            candidate
        } else {
            candidate + Duration::weeks(1)
        }
    }

    pub fn status(&self, now: NaiveDateTime) -> WindowStatus {
        WindowStatus {
            state: self.state(now),
            deadline: self.deadline(now),
            time_remaining: self.time_remaining(now),
            next_opening: self.next_opening(now),
            delivery_date: self.delivery_date(now),
        }
    }
}
