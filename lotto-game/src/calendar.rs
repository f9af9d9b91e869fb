//! Simulated calendar clock and date-boundary predicates.
use chrono::{DateTime, Datelike, Days, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::constants::{DRAW_LOOKAHEAD_DAYS, DRAW_WEEKDAYS};

/// Current simulated date-time. Only ever moves forward, one day at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimClock {
    now: DateTime<Utc>,
}

impl SimClock {
    #[must_use]
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// Clock set to midnight UTC on `date`.
    #[must_use]
    pub fn at_date(date: NaiveDate) -> Self {
        Self::new(date.and_time(chrono::NaiveTime::MIN).and_utc())
    }

    #[must_use]
    pub const fn now(&self) -> DateTime<Utc> {
        self.now
    }

    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.now.date_naive()
    }

    #[must_use]
    pub fn weekday(&self) -> Weekday {
        self.now.weekday()
    }

    /// The clock one calendar day later. Saturates at the end of chrono's range.
    #[must_use]
    pub fn next_day(&self) -> Self {
        Self::new(self.now.checked_add_days(Days::new(1)).unwrap_or(self.now))
    }

    #[must_use]
    pub fn is_draw_day(&self) -> bool {
        is_draw_weekday(self.weekday())
    }

    #[must_use]
    pub fn is_salary_day(&self) -> bool {
        self.now.day() == 1
    }

    /// ISO-8601 / RFC 3339 rendering used for snapshots.
    #[must_use]
    pub fn to_iso_string(&self) -> String {
        self.now.to_rfc3339()
    }

    /// Parse a snapshot string written by [`SimClock::to_iso_string`].
    ///
    /// # Errors
    ///
    /// Returns an error when the string is not an RFC 3339 date-time.
    pub fn parse_iso(value: &str) -> Result<Self, chrono::ParseError> {
        DateTime::parse_from_rfc3339(value.trim()).map(|dt| Self::new(dt.with_timezone(&Utc)))
    }
}

#[must_use]
pub fn is_draw_weekday(weekday: Weekday) -> bool {
    DRAW_WEEKDAYS.contains(&weekday)
}

/// Days until the next draw, stepping forward one day at a time. Today never
/// counts. Capped at the lookahead bound.
#[must_use]
pub fn days_until_next_draw(clock: &SimClock) -> u32 {
    let mut probe = *clock;
    for step in 1..=DRAW_LOOKAHEAD_DAYS {
        probe = probe.next_day();
        if probe.is_draw_day() {
            return step;
        }
    }
    DRAW_LOOKAHEAD_DAYS
}

#[must_use]
pub fn next_draw_date(clock: &SimClock) -> NaiveDate {
    let steps = days_until_next_draw(clock);
    clock
        .date()
        .checked_add_days(Days::new(u64::from(steps)))
        .unwrap_or_else(|| clock.date())
}

/// Days until the next salary day; zero when today is one.
#[must_use]
pub fn days_until_salary(clock: &SimClock) -> u32 {
    if clock.is_salary_day() {
        return 0;
    }
    let mut probe = *clock;
    let mut days = 0;
    // A month never exceeds 31 days, so this always terminates well before the bound.
    while days < 31 {
        probe = probe.next_day();
        days += 1;
        if probe.is_salary_day() {
            break;
        }
    }
    days
}
