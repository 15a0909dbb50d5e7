//! Static apartment reference data and the customer ↔ apartment join.
//!
//! The directory is a fixed list of complexes with coordinates, a recurring
//! renewal date and a pre-baked pin. Callers reach it through `GeoDirectory`
//! so a real data source can replace the demo list.

use serde::{Deserialize, Serialize};

use crate::geo::{LatLng, Positioned};
use crate::stores::Customer;

/// Placeholder shown when a lookup finds nothing.
pub const MISSING: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinColor {
    Red,
    Yellow,
    Gray,
    Green,
}

impl PinColor {
    pub fn fill(&self) -> &'static str {
        match self {
            PinColor::Red => "#EF4444",
            PinColor::Yellow => "#FACC15",
            PinColor::Gray => "#9CA3AF",
            PinColor::Green => "#22C55E",
        }
    }

    pub fn stroke(&self) -> &'static str {
        match self {
            PinColor::Red => "#DC2626",
            PinColor::Yellow => "#EAB308",
            PinColor::Gray => "#6B7280",
            PinColor::Green => "#16A34A",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApartmentGeoRecord {
    /// Joins to `Customer::name` when no business id is shared.
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    /// Recurring renewal date, `MM-DD`.
    pub renewal_date: String,
    pub business_id: String,
    pub pin_color: PinColor,
    pub label: String,
}

impl Positioned for ApartmentGeoRecord {
    fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }
}

pub trait GeoDirectory: Send + Sync {
    /// Every record, one per apartment name.
    fn apartments(&self) -> Vec<ApartmentGeoRecord>;

    fn find_by_name(&self, name: &str) -> Option<ApartmentGeoRecord> {
        self.apartments().into_iter().find(|a| a.name == name)
    }
}

/// Map center used before (or without) a device location.
pub const DEFAULT_CENTER: LatLng = LatLng {
    lat: 37.4946,
    lng: 127.0631,
};

/// Default zoom level handed to the map collaborator.
pub const DEFAULT_ZOOM_LEVEL: u8 = 5;

/// Demo complexes around Daechi-dong.
#[derive(Debug, Default, Clone, Copy)]
pub struct DemoGeoDirectory;

impl GeoDirectory for DemoGeoDirectory {
    fn apartments(&self) -> Vec<ApartmentGeoRecord> {
        use PinColor::*;
        let rows: [(&str, f64, f64, &str, &str, PinColor, &str); 12] = [
            ("은마아파트", 37.4993, 127.0637, "03-15", "120-81-10001", Red, "D-60 이내"),
            ("대치자이", 37.4952, 127.0580, "04-28", "120-81-10002", Yellow, "D-90 이내"),
            ("래미안대치팰리스", 37.4951, 127.0561, "03-30", "120-81-10003", Red, "D-60 이내"),
            ("도곡렉슬", 37.4903, 127.0509, "04-05", "120-81-10004", Yellow, "D-90 이내"),
            ("도곡삼성래미안", 37.4880, 127.0470, "05-10", "120-81-10005", Gray, "만기 여유"),
            ("개포우성", 37.4915, 127.0655, "06-01", "120-81-10006", Gray, "만기 여유"),
            ("역삼래미안", 37.4960, 127.0420, "05-20", "120-81-10007", Gray, "만기 여유"),
            ("역삼푸르지오", 37.4985, 127.0395, "07-15", "120-81-10008", Gray, "만기 여유"),
            ("테헤란한신", 37.5040, 127.0450, "08-01", "120-81-10009", Gray, "만기 여유"),
            ("선릉삼성", 37.5045, 127.0490, "08-20", "120-81-10010", Gray, "만기 여유"),
            ("개포주공1단지", 37.4820, 127.0560, "03-05", "120-81-10011", Red, "D-60 이내"),
            ("반포자이", 37.5060, 126.9990, "09-10", "120-81-10012", Gray, "만기 여유"),
        ];
        rows.iter()
            .map(|(name, lat, lng, renewal, business_id, color, label)| ApartmentGeoRecord {
                name: name.to_string(),
                lat: *lat,
                lng: *lng,
                renewal_date: renewal.to_string(),
                business_id: business_id.to_string(),
                pin_color: *color,
                label: label.to_string(),
            })
            .collect()
    }
}

/// Find the active customer card for an apartment.
///
/// Only active cards are considered, so a stray prospect card with the same
/// name never hides a contract. A shared business registration number wins.
/// Name equality is the fallback, and a hit there is logged since names are
/// not unique keys.
pub fn match_active_customer<'a>(
    apartment: &ApartmentGeoRecord,
    customers: &'a [Customer],
) -> Option<&'a Customer> {
    let mut active = customers.iter().filter(|c| c.status.is_active());
    let apartment_bid = apartment.business_id.trim();
    if !apartment_bid.is_empty() {
        if let Some(customer) = active
            .clone()
            .find(|c| c.business_id() == Some(apartment_bid))
        {
            return Some(customer);
        }
    }
    let by_name = active.find(|c| c.name == apartment.name);
    if let Some(customer) = by_name {
        log::debug!(
            "Matched apartment {} to customer {} by name",
            apartment.name,
            customer.id
        );
    }
    by_name
}

/// Business registration number for an apartment name: the customer card
/// first, then the directory, else `-`.
pub fn business_id_for(
    apartment_name: &str,
    customers: &[Customer],
    directory: &dyn GeoDirectory,
) -> String {
    customers
        .iter()
        .find(|c| c.name == apartment_name)
        .and_then(|c| c.business_id())
        .map(str::to_string)
        .or_else(|| {
            directory
                .find_by_name(apartment_name)
                .map(|a| a.business_id)
                .filter(|b| !b.trim().is_empty())
        })
        .unwrap_or_else(|| MISSING.to_string())
}
