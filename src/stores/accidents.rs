//! Accident reports and other client requests.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{load_array, save_array};
use crate::photos::{self, PhotoRef};
use crate::requests::RequestKind;
use crate::storage::{StorageBackend, ACCIDENTS_KEY};
use crate::util::generate_unique_id;

/// Request lifecycle. The UI only ever moves `Pending → Completed`;
/// `Processing` is modelled for later use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccidentStatus {
    Pending,
    Processing,
    Completed,
}

impl AccidentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            AccidentStatus::Pending => "접수대기",
            AccidentStatus::Processing => "처리중",
            AccidentStatus::Completed => "접수완료",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accident {
    pub id: String,
    pub apartment_name: String,
    pub date: DateTime<Utc>,
    pub content: String,
    pub status: AccidentStatus,
    /// Absent on records written before kinds were stored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<RequestKind>,
    /// `data:` URLs only.
    #[serde(default)]
    pub photos: Vec<String>,
}

impl Accident {
    pub fn kind(&self) -> RequestKind {
        self.kind
            .unwrap_or_else(|| RequestKind::classify_content(&self.content))
    }

    pub fn is_accident_report(&self) -> bool {
        self.kind() == RequestKind::Accident
    }

    pub fn is_pending(&self) -> bool {
        self.status == AccidentStatus::Pending
    }
}

/// A request as submitted, before it gets an id and status.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccident {
    pub apartment_name: String,
    pub date: DateTime<Utc>,
    pub content: String,
    pub kind: RequestKind,
    pub photos: Vec<PhotoRef>,
}

pub struct AccidentStore {
    backend: Arc<dyn StorageBackend>,
}

impl AccidentStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// All requests, newest submission first. Records stored without a kind
    /// get one from the legacy content-prefix rule.
    pub fn load(&self) -> Vec<Accident> {
        let mut accidents: Vec<Accident> =
            load_array(self.backend.as_ref(), ACCIDENTS_KEY).unwrap_or_default();
        for accident in accidents.iter_mut().filter(|a| a.kind.is_none()) {
            accident.kind = Some(RequestKind::classify_content(&accident.content));
        }
        accidents
    }

    pub fn save(&self, accidents: &[Accident]) {
        save_array(self.backend.as_ref(), ACCIDENTS_KEY, accidents);
    }

    /// Record a new request. It always starts `Pending`, gets an id no other
    /// stored record has, and keeps only already-encoded photos.
    pub fn add(&self, new: NewAccident) -> Accident {
        let mut accidents = self.load();
        let id = generate_unique_id("acc", |candidate| {
            accidents.iter().any(|a| a.id == candidate)
        });
        let accident = Accident {
            id,
            apartment_name: new.apartment_name,
            date: new.date,
            content: new.content,
            status: AccidentStatus::Pending,
            kind: Some(new.kind),
            photos: photos::storable(&new.photos),
        };
        accidents.insert(0, accident.clone());
        self.save(&accidents);
        log::info!(
            "Recorded {} request {} for {}",
            accident.kind().label(),
            accident.id,
            accident.apartment_name
        );
        accident
    }

    /// Set the status of one record. Returns `false` for an unknown id.
    pub fn update_status(&self, id: &str, status: AccidentStatus) -> bool {
        let mut accidents = self.load();
        let Some(accident) = accidents.iter_mut().find(|a| a.id == id) else {
            return false;
        };
        accident.status = status;
        self.save(&accidents);
        true
    }

    /// Planner "confirm receipt": `Pending → Completed`. Any other starting
    /// state is left alone and reported as `false`.
    pub fn confirm_receipt(&self, id: &str) -> bool {
        let mut accidents = self.load();
        match accidents.iter_mut().find(|a| a.id == id) {
            Some(accident) if accident.is_pending() => {
                accident.status = AccidentStatus::Completed;
                self.save(&accidents);
                true
            }
            _ => false,
        }
    }
}

/// Accident-kind requests, optionally narrowed by apartment name.
pub fn accident_reports(accidents: &[Accident], apartment_query: &str) -> Vec<Accident> {
    let query = crate::util::normalize_query(apartment_query);
    accidents
        .iter()
        .filter(|a| a.is_accident_report())
        .filter(|a| match &query {
            Some(q) => crate::util::matches_query(&a.apartment_name, q),
            None => true,
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::test_utils::memory_backend;
    use std::collections::HashSet;

    fn new_request(content: &str, kind: RequestKind) -> NewAccident {
        NewAccident {
            apartment_name: "우리 단지".to_string(),
            date: Utc::now(),
            content: content.to_string(),
            kind,
            photos: Vec::new(),
        }
    }

    #[test]
    fn test_add_starts_pending_with_unique_ids() {
        let store = AccidentStore::new(memory_backend());
        let mut ids = HashSet::new();
        for i in 0..20 {
            let created = store.add(new_request(&format!("누수 {}", i), RequestKind::Accident));
            assert_eq!(created.status, AccidentStatus::Pending);
            assert!(ids.insert(created.id));
        }
        assert_eq!(store.load().len(), 20);
    }

    #[test]
    fn test_add_prepends_newest() {
        let store = AccidentStore::new(memory_backend());
        store.add(new_request("first", RequestKind::Accident));
        let second = store.add(new_request("second", RequestKind::Accident));
        assert_eq!(store.load()[0].id, second.id);
    }

    #[test]
    fn test_add_persists_only_encoded_photos() {
        let store = AccidentStore::new(memory_backend());
        let mut new = new_request("화재", RequestKind::Accident);
        new.photos = vec![
            PhotoRef::DataUrl("data:image/png;base64,AA==".to_string()),
            PhotoRef::File("/tmp/unread.jpg".into()),
        ];
        let created = store.add(new);
        assert_eq!(created.photos, vec!["data:image/png;base64,AA==".to_string()]);
        assert_eq!(store.load()[0].photos.len(), 1);
    }

    #[test]
    fn test_confirm_receipt_only_from_pending() {
        let store = AccidentStore::new(memory_backend());
        let created = store.add(new_request("누수", RequestKind::Accident));
        assert!(store.confirm_receipt(&created.id));
        assert_eq!(store.load()[0].status, AccidentStatus::Completed);

        // second attempt is a no-op
        assert!(!store.confirm_receipt(&created.id));
        assert_eq!(store.load()[0].status, AccidentStatus::Completed);

        assert!(!store.confirm_receipt("missing"));
    }

    #[test]
    fn test_confirm_receipt_ignores_processing() {
        let store = AccidentStore::new(memory_backend());
        let created = store.add(new_request("누수", RequestKind::Accident));
        assert!(store.update_status(&created.id, AccidentStatus::Processing));
        assert!(!store.confirm_receipt(&created.id));
        assert_eq!(store.load()[0].status, AccidentStatus::Processing);
    }

    #[test]
    fn test_legacy_records_get_kind_from_prefix() {
        let backend = memory_backend();
        backend
            .set_item(
                ACCIDENTS_KEY,
                r#"[
                    {"id":"acc-1","apartmentName":"우리 단지","date":"2024-01-15T01:00:00.000Z","content":"보험 견적 접수 - 기타보험 (만기 1/1)","status":"Pending","photos":[]},
                    {"id":"acc-2","apartmentName":"우리 단지","date":"2024-01-15T02:00:00.000Z","content":"담당자 연락 요청","status":"Completed","photos":[]},
                    {"id":"acc-3","apartmentName":"대치자이","date":"2024-01-15T03:00:00.000Z","content":"엘리베이터 고장","status":"Pending","photos":["data:image/png;base64,AA=="]}
                ]"#,
            )
            .unwrap();
        let store = AccidentStore::new(backend);
        let loaded = store.load();
        let kinds: Vec<Option<RequestKind>> = loaded.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![
                Some(RequestKind::Estimate),
                Some(RequestKind::Contact),
                Some(RequestKind::Accident)
            ]
        );
    }

    #[test]
    fn test_malformed_store_loads_empty() {
        let backend = memory_backend();
        backend.set_item(ACCIDENTS_KEY, r#"[{"id": 5}]"#).unwrap();
        assert!(AccidentStore::new(backend).load().is_empty());
    }

    #[test]
    fn test_accident_reports_filters_kind_and_name() {
        let store = AccidentStore::new(memory_backend());
        store.add(new_request("누수", RequestKind::Accident));
        store.add(new_request("담당자 연락 요청", RequestKind::Contact));
        let mut other = new_request("화재", RequestKind::Accident);
        other.apartment_name = "대치자이".to_string();
        store.add(other);

        let all = store.load();
        assert_eq!(accident_reports(&all, "").len(), 2);
        let daechi = accident_reports(&all, "대치");
        assert_eq!(daechi.len(), 1);
        assert_eq!(daechi[0].content, "화재");
    }

    #[test]
    fn test_explicit_kind_wins_over_prefix() {
        let store = AccidentStore::new(memory_backend());
        // An accident whose text happens to start with the contact prefix.
        let created = store.add(new_request("담당자 연락 요청 후 누수 확인", RequestKind::Accident));
        assert!(created.is_accident_report());
        assert!(store.load()[0].is_accident_report());
    }
}
