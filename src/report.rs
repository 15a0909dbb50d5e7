//! Accident receipt document (사고 접수 확인서) and accident-time handling.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::directory::{business_id_for, GeoDirectory};
use crate::stores::{Accident, Customer};

pub const REPORT_TITLE: &str = "사고 접수 확인서";

/// Accident date/time as entered on the client form, in local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccidentDateTime {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

impl AccidentDateTime {
    pub fn from_naive(dt: NaiveDateTime) -> Self {
        use chrono::Datelike;
        Self {
            year: dt.year(),
            month: dt.month(),
            day: dt.day(),
            hour: dt.hour(),
            minute: dt.minute(),
        }
    }

    /// Form defaults: the current local minute.
    pub fn now() -> Self {
        Self::from_naive(Local::now().naive_local())
    }

    pub fn to_naive(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)?.and_hms_opt(self.hour, self.minute, 0)
    }

    /// Stored timestamp. Errors for impossible dates or local times that do
    /// not exist.
    pub fn to_utc(&self) -> Result<DateTime<Utc>, String> {
        let naive = self
            .to_naive()
            .ok_or_else(|| "사고 일시가 올바르지 않습니다.".to_string())?;
        Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| "사고 일시가 올바르지 않습니다.".to_string())
    }
}

/// "2024년 3월 5일"
pub fn date_line(dt: NaiveDateTime) -> String {
    use chrono::Datelike;
    format!("{}년 {}월 {}일", dt.year(), dt.month(), dt.day())
}

/// "오후 2시 5분경". Twelve-hour clock; midnight reads as 12.
pub fn time_line(dt: NaiveDateTime) -> String {
    let hour = dt.hour();
    let meridiem = if hour < 12 { "오전" } else { "오후" };
    let display_hour = match hour {
        0 => 12,
        h if h > 12 => h - 12,
        h => h,
    };
    format!("{} {}시 {}분경", meridiem, display_hour, dt.minute())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccidentReport {
    pub title: &'static str,
    pub apartment_name: String,
    pub business_id: String,
    pub date_line: String,
    pub time_line: String,
    /// The complex the request was filed from.
    pub location: String,
    pub description: String,
    pub photo_urls: Vec<String>,
}

/// Build the printable receipt for one request, in local time.
pub fn build_report(
    accident: &Accident,
    customers: &[Customer],
    directory: &dyn GeoDirectory,
) -> AccidentReport {
    let local = accident.date.with_timezone(&Local).naive_local();
    AccidentReport {
        title: REPORT_TITLE,
        apartment_name: accident.apartment_name.clone(),
        business_id: business_id_for(&accident.apartment_name, customers, directory),
        date_line: date_line(local),
        time_line: time_line(local),
        location: accident.apartment_name.clone(),
        description: accident.content.clone(),
        photo_urls: accident.photos.clone(),
    }
}
