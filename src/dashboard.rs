//! Planner dashboard summaries.

use chrono::NaiveDate;
use serde::Serialize;

use crate::directory::{match_active_customer, ApartmentGeoRecord};
use crate::renewal::{self, MonthDay};
use crate::stores::{Accident, AccidentStatus, Customer};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestCounts {
    pub pending: usize,
    pub processing: usize,
    pub completed: usize,
    /// Pending requests that are accident reports.
    pub pending_accidents: usize,
}

pub fn request_counts(accidents: &[Accident]) -> RequestCounts {
    accidents.iter().fold(RequestCounts::default(), |mut counts, a| {
        match a.status {
            AccidentStatus::Pending => {
                counts.pending += 1;
                if a.is_accident_report() {
                    counts.pending_accidents += 1;
                }
            }
            AccidentStatus::Processing => counts.processing += 1,
            AccidentStatus::Completed => counts.completed += 1,
        }
        counts
    })
}

/// Today's workload: open requests plus today's schedule entries.
pub fn today_workload(counts: &RequestCounts, today_schedule: usize) -> usize {
    counts.pending + counts.processing + today_schedule
}

/// One row of the "expiring within 60 days" dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiringContract {
    pub name: String,
    /// `MM-DD` as used for the classification.
    pub renewal_date: String,
    /// e.g. "3월 15일"
    pub label: String,
    pub days_until: i64,
}

/// Contracted complexes renewing within the horizon, in directory order.
///
/// Uses the same rule as the amber coverage pins, including the customer
/// expiry override, so the count always matches the map.
pub fn expiring_contracts(
    apartments: &[ApartmentGeoRecord],
    customers: &[Customer],
    today: NaiveDate,
    horizon_days: i64,
) -> Vec<ExpiringContract> {
    apartments
        .iter()
        .filter_map(|apt| {
            let customer = match_active_customer(apt, customers)?;
            let md = customer.expiry().or_else(|| MonthDay::parse(&apt.renewal_date))?;
            let window = renewal::classify(md, today, horizon_days);
            window.within_horizon.then(|| ExpiringContract {
                name: apt.name.clone(),
                renewal_date: md.to_string(),
                label: md.label(),
                days_until: window.days_until,
            })
        })
        .collect()
}

/// One page of the request table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestPage<T> {
    pub items: Vec<T>,
    /// Zero-based, already clamped.
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
    /// e.g. "1-5 / 12"; empty when there is nothing to show.
    pub range_text: String,
}

/// Slice `items` into pages of `page_size`. There is always at least one
/// page, and a page past the end is clamped to the last one.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> RequestPage<T> {
    let page_size = page_size.max(1);
    let total = items.len();
    let total_pages = total.div_ceil(page_size).max(1);
    let page = page.min(total_pages - 1);
    let start = page * page_size;
    let end = (start + page_size).min(total);
    let range_text = if total == 0 {
        String::new()
    } else {
        format!("{}-{} / {}", start + 1, end, total)
    };
    RequestPage {
        items: items[start.min(total)..end].to_vec(),
        page,
        total_pages,
        total,
        range_text,
    }
}
