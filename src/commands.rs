//! Command layer: one function per screen action.
//!
//! Every command takes the shared `AppState`, reads or writes the stores,
//! and returns a serializable view model (camelCase JSON) or a
//! user-facing error string.

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::{self, CalendarDay, DayEntry, WEEKDAYS};
use crate::dashboard::{self, ExpiringContract, RequestCounts, RequestPage};
use crate::directory::{DEFAULT_CENTER, DEFAULT_ZOOM_LEVEL};
use crate::geo::{filter_within_radius, LatLng};
use crate::location::GeolocationState;
use crate::photos::{self, PhotoRef};
use crate::pins::{self, MapPin};
use crate::pipeline::{self, CustomerStatus, PipelineColumn, PipelineMatches};
use crate::renewal;
use crate::report::{self, AccidentDateTime, AccidentReport};
use crate::requests::{self, InsuranceProduct, RequestKind, CONTACT_PREFIX, INSURANCE_PRODUCTS};
use crate::state::AppState;
use crate::stores::accidents::accident_reports;
use crate::stores::customers::search_customers;
use crate::stores::{
    Accident, AccidentStatus, ActivityType, Customer, CustomerActivity, CustomerDraft, NewAccident,
    ScheduleColor, ScheduleEvent,
};
use crate::types::Config;
use crate::weather::{self, TextSegment, WeatherKind};

pub fn get_config(state: &AppState) -> Config {
    state.config()
}

/// Set the apartment name stamped on client-portal requests.
pub fn set_tenant_name(state: &AppState, name: &str) -> Result<Config, String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("단지 이름을 입력해 주세요.".to_string());
    }
    crate::state::update_config(state, |config| {
        config.tenant_name = name.to_string();
    })
}

/// Set the "near me" radius used by both map feeds.
pub fn set_radius_km(state: &AppState, radius_km: f64) -> Result<Config, String> {
    if !radius_km.is_finite() || radius_km <= 0.0 {
        return Err(format!("Invalid radius: {}", radius_km));
    }
    crate::state::update_config(state, |config| {
        config.radius_km = radius_km;
    })
}

// =============================================================================
// Shared view models
// =============================================================================

/// A request as listed in tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestRow {
    pub id: String,
    pub apartment_name: String,
    pub date: DateTime<Utc>,
    pub kind: RequestKind,
    pub kind_label: &'static str,
    pub preview: String,
    pub status: AccidentStatus,
    pub status_label: &'static str,
    pub photo_count: usize,
}

impl From<&Accident> for RequestRow {
    fn from(a: &Accident) -> Self {
        let kind = a.kind();
        Self {
            id: a.id.clone(),
            apartment_name: a.apartment_name.clone(),
            date: a.date,
            kind,
            kind_label: kind.label(),
            preview: requests::preview(&a.content),
            status: a.status,
            status_label: a.status.label(),
            photo_count: a.photos.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    pub pins: Vec<MapPin>,
    /// Device position when known, else the default center.
    pub center: LatLng,
    pub zoom_level: u8,
    pub location: GeolocationState,
}

fn map_view(pins: Vec<MapPin>, location: GeolocationState, radius_m: f64) -> MapView {
    let center = location.center();
    MapView {
        pins: filter_within_radius(pins, center, radius_m),
        center: center.unwrap_or(DEFAULT_CENTER),
        zoom_level: DEFAULT_ZOOM_LEVEL,
        location,
    }
}

// =============================================================================
// Planner dashboard
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Greeting {
    pub location_label: &'static str,
    pub weather: WeatherKind,
    pub message: &'static str,
    pub segments: Vec<TextSegment>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub greeting: Greeting,
    pub counts: RequestCounts,
    pub today_schedule_count: usize,
    pub today_workload: usize,
    pub expiring: Vec<ExpiringContract>,
    pub prospecting_map: MapView,
    pub requests: RequestPage<RequestRow>,
}

pub async fn get_dashboard(state: &AppState, page: usize) -> DashboardView {
    let location = state.locator.locate().await;
    build_dashboard(state, page, renewal::today(), location)
}

pub(crate) fn build_dashboard(
    state: &AppState,
    page: usize,
    today: NaiveDate,
    location: GeolocationState,
) -> DashboardView {
    let config = state.config();
    let customers = state.customers.load();
    let accidents = state.accidents.load();
    let events = state.schedule.load();
    let apartments = state.directory.apartments();

    let weather = state.weather.current();
    let greeting = Greeting {
        location_label: weather::location_label(&location),
        weather,
        message: weather.message(),
        segments: weather::parse_bold_segments(weather.message()),
    };

    let counts = dashboard::request_counts(&accidents);
    let today_schedule_count = calendar::today_schedule_count(&events, &customers, today);
    let rows: Vec<RequestRow> = accidents.iter().map(RequestRow::from).collect();

    DashboardView {
        greeting,
        counts,
        today_schedule_count,
        today_workload: dashboard::today_workload(&counts, today_schedule_count),
        expiring: dashboard::expiring_contracts(&apartments, &customers, today, config.renewal_horizon_days),
        prospecting_map: map_view(
            pins::prospecting_pins(&apartments, &customers),
            location,
            config.radius_meters(),
        ),
        requests: dashboard::paginate(&rows, page, config.request_page_size),
    }
}

/// "Confirm receipt" on a pending request. `false` when the request is
/// missing or no longer pending.
pub fn confirm_receipt(state: &AppState, accident_id: &str) -> bool {
    state.accidents.confirm_receipt(accident_id)
}

pub fn get_accident_report(state: &AppState, accident_id: &str) -> Result<AccidentReport, String> {
    let accident = state
        .accidents
        .load()
        .into_iter()
        .find(|a| a.id == accident_id)
        .ok_or_else(|| format!("Request not found: {}", accident_id))?;
    let customers = state.customers.load();
    Ok(report::build_report(&accident, &customers, state.directory.as_ref()))
}

// =============================================================================
// Coverage map
// =============================================================================

pub async fn get_coverage_map(state: &AppState) -> MapView {
    let location = state.locator.locate().await;
    build_coverage_map(state, renewal::today(), location)
}

pub(crate) fn build_coverage_map(state: &AppState, today: NaiveDate, location: GeolocationState) -> MapView {
    let config = state.config();
    let pins = pins::coverage_pins(
        &state.directory.apartments(),
        &state.customers.load(),
        today,
        config.renewal_horizon_days,
    );
    map_view(pins, location, config.radius_meters())
}

// =============================================================================
// Customers and pipeline
// =============================================================================

pub fn list_customers(state: &AppState, query: &str) -> Vec<Customer> {
    search_customers(&state.customers.load(), query)
}

pub fn add_customer(state: &AppState, draft: CustomerDraft) -> Result<Customer, String> {
    state.customers.add(draft)
}

pub fn update_customer(state: &AppState, customer_id: &str, draft: CustomerDraft) -> Result<Customer, String> {
    state.customers.update(customer_id, draft)
}

pub fn get_pipeline(state: &AppState) -> Vec<PipelineColumn> {
    pipeline::bucket_by_status(&state.customers.load())
}

pub fn search_pipeline(state: &AppState, query: &str) -> PipelineMatches {
    pipeline::search_pipeline(&state.customers.load(), query)
}

pub fn move_customer(state: &AppState, customer_id: &str, status: &str) -> Result<(), String> {
    let status =
        CustomerStatus::from_str_lossy(status).ok_or_else(|| format!("Unknown status: {}", status))?;
    state.customers.move_status(customer_id, status)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetail {
    pub customer: Customer,
    pub status_label: &'static str,
    pub activities: Vec<CustomerActivity>,
    /// Requests whose apartment name equals the customer name.
    pub requests: Vec<RequestRow>,
}

pub fn get_customer_detail(state: &AppState, customer_id: &str) -> Result<CustomerDetail, String> {
    let customer = state
        .customers
        .get(customer_id)
        .ok_or_else(|| format!("Customer not found: {}", customer_id))?;
    let requests = state
        .accidents
        .load()
        .iter()
        .filter(|a| a.apartment_name == customer.name)
        .map(RequestRow::from)
        .collect();
    Ok(CustomerDetail {
        status_label: customer.status.label(),
        activities: state.activities.list(&customer.id),
        requests,
        customer,
    })
}

pub fn add_activity(
    state: &AppState,
    customer_id: &str,
    activity_type: ActivityType,
    content: &str,
) -> Result<CustomerActivity, String> {
    if state.customers.get(customer_id).is_none() {
        return Err(format!("Customer not found: {}", customer_id));
    }
    state.activities.add(customer_id, activity_type, content)
}

pub fn delete_activity(state: &AppState, activity_id: &str) {
    state.activities.delete(activity_id);
}

// =============================================================================
// Claims
// =============================================================================

pub fn search_claims(state: &AppState, apartment_query: &str) -> Vec<RequestRow> {
    accident_reports(&state.accidents.load(), apartment_query)
        .iter()
        .map(RequestRow::from)
        .collect()
}

// =============================================================================
// Schedule
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleView {
    pub title: String,
    pub weekdays: [&'static str; 7],
    pub days: Vec<CalendarDay>,
    pub selected_date: Option<String>,
    pub entries: Vec<DayEntry>,
    pub colors: Vec<ScheduleColor>,
}

pub fn get_schedule(state: &AppState, year: i32, month: u32, selected: Option<NaiveDate>) -> ScheduleView {
    build_schedule(state, year, month, selected, renewal::today())
}

pub(crate) fn build_schedule(
    state: &AppState,
    year: i32,
    month: u32,
    selected: Option<NaiveDate>,
    today: NaiveDate,
) -> ScheduleView {
    let renewals = calendar::renewals_by_date(&state.customers.load(), year);
    let events = calendar::events_by_date(&state.schedule.load());
    ScheduleView {
        title: calendar::month_title(year, month),
        weekdays: WEEKDAYS,
        days: calendar::calendar_days(year, month, today, &renewals, &events),
        selected_date: selected.map(calendar::date_key),
        entries: selected
            .map(|d| calendar::day_entries(d, &renewals, &events))
            .unwrap_or_default(),
        colors: crate::stores::schedule::SCHEDULE_COLORS.to_vec(),
    }
}

pub fn add_schedule_event(
    state: &AppState,
    date_key: &str,
    title: &str,
    color: Option<ScheduleColor>,
) -> Result<ScheduleEvent, String> {
    let date = NaiveDate::parse_from_str(date_key, "%Y-%m-%d")
        .map_err(|e| format!("Invalid date {}: {}", date_key, e))?;
    state.schedule.add(date, title, color)
}

pub fn remove_schedule_event(state: &AppState, event_id: &str) {
    state.schedule.remove(event_id);
}

// =============================================================================
// Client portal
// =============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccidentForm {
    pub when: AccidentDateTime,
    #[serde(default)]
    pub content: String,
    /// Files attached on the form, read at submission time.
    #[serde(default)]
    pub photos: Vec<PathBuf>,
}

/// Submit an accident report. Every attached photo is read first; if any
/// read fails nothing is recorded.
pub async fn submit_accident_report(state: &AppState, form: AccidentForm) -> Result<Accident, String> {
    let date = form.when.to_utc()?;
    let refs: Vec<PhotoRef> = form.photos.into_iter().map(PhotoRef::File).collect();
    let urls = photos::resolve_all(refs).await.map_err(|e| {
        log::warn!("Accident report not submitted: {}", e);
        format!("사진을 불러오지 못했습니다: {}", e)
    })?;
    Ok(state.accidents.add(NewAccident {
        apartment_name: state.config().tenant_name,
        date,
        content: requests::accident_content(&form.content),
        kind: RequestKind::Accident,
        photos: urls.into_iter().map(PhotoRef::DataUrl).collect(),
    }))
}

pub fn insurance_products() -> Vec<InsuranceProduct> {
    INSURANCE_PRODUCTS.to_vec()
}

pub fn submit_estimate_request(
    state: &AppState,
    product: &str,
    expiry_month: &str,
    expiry_day: &str,
) -> Accident {
    state.accidents.add(NewAccident {
        apartment_name: state.config().tenant_name,
        date: Utc::now(),
        content: requests::estimate_content(product, expiry_month, expiry_day),
        kind: RequestKind::Estimate,
        photos: Vec::new(),
    })
}

pub fn submit_contact_request(state: &AppState) -> Accident {
    state.accidents.add(NewAccident {
        apartment_name: state.config().tenant_name,
        date: Utc::now(),
        content: CONTACT_PREFIX.to_string(),
        kind: RequestKind::Contact,
        photos: Vec::new(),
    })
}

/// Everything submitted so far, newest first.
pub fn get_request_history(state: &AppState) -> Vec<RequestRow> {
    state.accidents.load().iter().map(RequestRow::from).collect()
}
