//! Renewal window classification for annually recurring expiry dates.
//!
//! Contracts lapse on the same month/day every year, stored year-less as
//! `MM-DD`. The year is always inferred from a reference "today".

use std::fmt;

use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::Serialize;

/// Look-ahead used to flag soon-expiring contracts.
pub const RENEWAL_HORIZON_DAYS: i64 = 60;

/// A year-less month/day pair. Month is 1–12 and day 1–31; the day is not
/// checked against the month's length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthDay {
    pub month: u32,
    pub day: u32,
}

impl MonthDay {
    pub fn new(month: u32, day: u32) -> Option<Self> {
        if (1..=12).contains(&month) && (1..=31).contains(&day) {
            Some(Self { month, day })
        } else {
            None
        }
    }

    /// Parse `MM-DD` (leading zeros optional). Returns `None` for anything
    /// malformed so callers can skip the record instead of carrying an
    /// invalid date around.
    pub fn parse(value: &str) -> Option<Self> {
        let (m, d) = value.trim().split_once('-')?;
        let month = m.trim().parse::<u32>().ok()?;
        let day = d.trim().parse::<u32>().ok()?;
        Self::new(month, day)
    }

    /// Concrete date in `year`. Days past the end of the month spill into
    /// the following month (`02-30` becomes March 1st or 2nd).
    pub fn in_year(&self, year: i32) -> NaiveDate {
        let first = NaiveDate::from_ymd_opt(year, self.month, 1).unwrap_or(NaiveDate::MIN);
        first + Duration::days(i64::from(self.day) - 1)
    }

    pub fn matches(&self, date: NaiveDate) -> bool {
        self.month == date.month() && self.day == date.day()
    }

    /// Korean display label, e.g. "3월 15일".
    pub fn label(&self) -> String {
        format!("{}월 {}일", self.month, self.day)
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

/// Result of classifying a renewal date against a reference day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenewalWindow {
    pub date: NaiveDate,
    pub days_until: i64,
    pub within_horizon: bool,
}

/// Today's local date (time of day discarded).
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Next occurrence of `md` on or after `today`: this year's date unless it
/// is strictly before today, in which case that date moved one year on.
///
/// The roll applies to the already-spilled date, so `02-29` that became
/// March 1st stays March 1st next year.
pub fn next_occurrence(md: MonthDay, today: NaiveDate) -> NaiveDate {
    let this_year = md.in_year(today.year());
    if this_year < today {
        one_year_later(this_year)
    } else {
        this_year
    }
}

/// Same month/day a year on; Feb 29th spills to March 1st.
fn one_year_later(date: NaiveDate) -> NaiveDate {
    MonthDay {
        month: date.month(),
        day: date.day(),
    }
    .in_year(date.year() + 1)
}

/// Inclusive horizon check: a date exactly `days` out still counts.
pub fn is_within_horizon(date: NaiveDate, today: NaiveDate, days: i64) -> bool {
    date <= today + Duration::days(days)
}

pub fn classify(md: MonthDay, today: NaiveDate, horizon_days: i64) -> RenewalWindow {
    let date = next_occurrence(md, today);
    RenewalWindow {
        date,
        days_until: (date - today).num_days(),
        within_horizon: is_within_horizon(date, today, horizon_days),
    }
}
