//! Schedule view: month grid, renewal markers and custom events merged per day.
//!
//! Renewals are not stored events. They are projected from customer expiry
//! dates onto the displayed year each time the view is built.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::stores::{Customer, ScheduleColor, ScheduleEvent};

/// Column headers, Sunday first.
pub const WEEKDAYS: [&str; 7] = ["일", "월", "화", "수", "목", "금", "토"];

/// `YYYY-MM-DD`
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Header title, e.g. "2024년 3월".
pub fn month_title(year: i32, month: u32) -> String {
    format!("{}년 {}월", year, month)
}

/// Every day shown for a month: from the Sunday on or before the 1st to the
/// Saturday on or after the last day. Empty for an invalid month.
pub fn month_grid(year: i32, month: u32) -> Vec<NaiveDate> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let Some(next_first) = next_first else {
        return Vec::new();
    };
    let last = next_first - Duration::days(1);

    let start = first - Duration::days(i64::from(first.weekday().num_days_from_sunday()));
    let end = last + Duration::days(i64::from(6 - last.weekday().num_days_from_sunday()));

    start.iter_days().take_while(|d| *d <= end).collect()
}

/// Apartment names whose expiry falls on each date of `year`. Customers
/// with a blank or malformed expiry are left off the calendar.
pub fn renewals_by_date(customers: &[Customer], year: i32) -> BTreeMap<NaiveDate, Vec<String>> {
    let mut map: BTreeMap<NaiveDate, Vec<String>> = BTreeMap::new();
    for customer in customers {
        let Some(md) = customer.expiry() else {
            if !customer.expiry_date.trim().is_empty() {
                log::debug!("Skipping {}: bad expiry {:?}", customer.name, customer.expiry_date);
            }
            continue;
        };
        map.entry(md.in_year(year)).or_default().push(customer.name.clone());
    }
    map
}

pub fn events_by_date(events: &[ScheduleEvent]) -> BTreeMap<NaiveDate, Vec<ScheduleEvent>> {
    let mut map: BTreeMap<NaiveDate, Vec<ScheduleEvent>> = BTreeMap::new();
    for event in events {
        map.entry(event.date).or_default().push(event.clone());
    }
    map
}

/// One line in the selected day's list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DayEntry {
    Renewal {
        label: String,
    },
    Custom {
        id: String,
        label: String,
        color: ScheduleColor,
    },
}

/// Renewals first, then custom events in stored order.
pub fn day_entries(
    date: NaiveDate,
    renewals: &BTreeMap<NaiveDate, Vec<String>>,
    events: &BTreeMap<NaiveDate, Vec<ScheduleEvent>>,
) -> Vec<DayEntry> {
    let renewal_entries = renewals.get(&date).into_iter().flatten().map(|name| DayEntry::Renewal {
        label: format!("{} 만기", name),
    });
    let custom_entries = events.get(&date).into_iter().flatten().map(|e| DayEntry::Custom {
        id: e.id.clone(),
        label: e.title.clone(),
        color: e.color,
    });
    renewal_entries.chain(custom_entries).collect()
}

/// Custom events dated `today` plus customers whose expiry month/day is
/// today's.
pub fn today_schedule_count(events: &[ScheduleEvent], customers: &[Customer], today: NaiveDate) -> usize {
    let custom = events.iter().filter(|e| e.date == today).count();
    let renewals = customers
        .iter()
        .filter_map(Customer::expiry)
        .filter(|md| md.matches(today))
        .count();
    custom + renewals
}

/// A grid cell as rendered.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: String,
    pub day: u32,
    pub in_month: bool,
    pub is_today: bool,
    pub has_renewal: bool,
    pub event_colors: Vec<ScheduleColor>,
}

pub fn calendar_days(
    year: i32,
    month: u32,
    today: NaiveDate,
    renewals: &BTreeMap<NaiveDate, Vec<String>>,
    events: &BTreeMap<NaiveDate, Vec<ScheduleEvent>>,
) -> Vec<CalendarDay> {
    month_grid(year, month)
        .into_iter()
        .map(|d| CalendarDay {
            date: date_key(d),
            day: d.day(),
            in_month: d.month() == month && d.year() == year,
            is_today: d == today,
            has_renewal: renewals.get(&d).is_some_and(|names| !names.is_empty()),
            event_colors: events
                .get(&d)
                .map(|list| list.iter().map(|e| e.color).collect())
                .unwrap_or_default(),
        })
        .collect()
}
