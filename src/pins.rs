//! Map feeds: which apartment pins to draw, and in what color.
//!
//! Both feeds are pure. They take the directory records, the live customer
//! list and a reference day, and return fresh `MapPin`s; directory records
//! are never modified. The "near me" geofence is applied on top by the
//! caller with `geo::filter_within_radius`.

use chrono::NaiveDate;
use serde::Serialize;

use crate::directory::{match_active_customer, ApartmentGeoRecord, PinColor};
use crate::geo::{LatLng, Positioned};
use crate::renewal::{self, MonthDay};
use crate::stores::Customer;

pub const ACTIVE_LABEL: &str = "계약 중";
pub const ACTIVE_RENEWAL_SOON_LABEL: &str = "계약 중 (D-60 이내)";

/// One marker as handed to the map collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPin {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub renewal_date: String,
    pub color: PinColor,
    pub label: String,
}

impl MapPin {
    fn from_record(record: &ApartmentGeoRecord) -> Self {
        Self {
            name: record.name.clone(),
            lat: record.lat,
            lng: record.lng,
            renewal_date: record.renewal_date.clone(),
            color: record.pin_color,
            label: record.label.clone(),
        }
    }
}

impl Positioned for MapPin {
    fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }
}

/// Coverage map: contracted complexes only.
///
/// The customer's own expiry replaces the directory renewal date when it
/// parses. A renewal within the horizon turns the pin amber, otherwise it is
/// green. Records whose date cannot be parsed at all are skipped.
pub fn coverage_pins(
    apartments: &[ApartmentGeoRecord],
    customers: &[Customer],
    today: NaiveDate,
    horizon_days: i64,
) -> Vec<MapPin> {
    apartments
        .iter()
        .filter_map(|apt| {
            let customer = match_active_customer(apt, customers)?;
            let (md, renewal_date) = match customer.expiry() {
                Some(md) => (md, customer.expiry_date.trim().to_string()),
                None => {
                    let Some(md) = MonthDay::parse(&apt.renewal_date) else {
                        log::warn!("Skipping {}: unparsable renewal date {:?}", apt.name, apt.renewal_date);
                        return None;
                    };
                    (md, apt.renewal_date.clone())
                }
            };
            let window = renewal::classify(md, today, horizon_days);
            let (color, label) = if window.within_horizon {
                (PinColor::Yellow, ACTIVE_RENEWAL_SOON_LABEL)
            } else {
                (PinColor::Green, ACTIVE_LABEL)
            };
            Some(MapPin {
                renewal_date,
                color,
                label: label.to_string(),
                ..MapPin::from_record(apt)
            })
        })
        .collect()
}

/// Prospecting map: every directory record. Contracted complexes are forced
/// green; everything else keeps its pre-baked pin.
pub fn prospecting_pins(apartments: &[ApartmentGeoRecord], customers: &[Customer]) -> Vec<MapPin> {
    apartments
        .iter()
        .map(|apt| {
            let pin = MapPin::from_record(apt);
            match match_active_customer(apt, customers) {
                Some(_) => MapPin {
                    color: PinColor::Green,
                    label: ACTIVE_LABEL.to_string(),
                    ..pin
                },
                None => pin,
            }
        })
        .collect()
}
