//! Custom calendar events entered by the planner.
//!
//! Renewal dates are not stored here; they are derived from customers at
//! render time (see `calendar`).

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{load_array, save_array};
use crate::storage::{StorageBackend, SCHEDULE_EVENTS_KEY};
use crate::util::generate_unique_id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleColor {
    Blue,
    Green,
    Yellow,
    Purple,
    #[default]
    Gray,
}

pub const SCHEDULE_COLORS: [ScheduleColor; 5] = [
    ScheduleColor::Blue,
    ScheduleColor::Green,
    ScheduleColor::Yellow,
    ScheduleColor::Purple,
    ScheduleColor::Gray,
];

impl ScheduleColor {
    /// Dot color for the calendar cell.
    pub fn hex(&self) -> &'static str {
        match self {
            ScheduleColor::Blue => "#3b82f6",
            ScheduleColor::Green => "#22c55e",
            ScheduleColor::Yellow => "#f59e0b",
            ScheduleColor::Purple => "#8b5cf6",
            ScheduleColor::Gray => "#6b7280",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEvent {
    pub id: String,
    /// Serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub title: String,
    #[serde(default)]
    pub color: ScheduleColor,
}

pub struct ScheduleStore {
    backend: Arc<dyn StorageBackend>,
}

impl ScheduleStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    pub fn load(&self) -> Vec<ScheduleEvent> {
        load_array(self.backend.as_ref(), SCHEDULE_EVENTS_KEY).unwrap_or_default()
    }

    pub fn save(&self, events: &[ScheduleEvent]) {
        save_array(self.backend.as_ref(), SCHEDULE_EVENTS_KEY, events);
    }

    /// Append an event. `color` defaults to gray.
    pub fn add(
        &self,
        date: NaiveDate,
        title: &str,
        color: Option<ScheduleColor>,
    ) -> Result<ScheduleEvent, String> {
        let title = title.trim();
        if title.is_empty() {
            return Err("일정 제목을 입력해 주세요.".to_string());
        }
        let mut events = self.load();
        let id = generate_unique_id("ev", |candidate| events.iter().any(|e| e.id == candidate));
        let event = ScheduleEvent {
            id,
            date,
            title: title.to_string(),
            color: color.unwrap_or_default(),
        };
        events.push(event.clone());
        self.save(&events);
        Ok(event)
    }

    pub fn remove(&self, event_id: &str) {
        let mut events = self.load();
        events.retain(|e| e.id != event_id);
        self.save(&events);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::test_utils::memory_backend;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_add_defaults_to_gray() {
        let store = ScheduleStore::new(memory_backend());
        let event = store.add(ymd(2024, 3, 1), " 현장 방문 ", None).unwrap();
        assert_eq!(event.title, "현장 방문");
        assert_eq!(event.color, ScheduleColor::Gray);
        assert!(event.id.starts_with("ev-"));
        assert!(store.add(ymd(2024, 3, 1), "", Some(ScheduleColor::Blue)).is_err());
    }

    #[test]
    fn test_missing_color_deserializes_as_gray() {
        let backend = memory_backend();
        backend
            .set_item(SCHEDULE_EVENTS_KEY, r#"[{"id":"ev-1","date":"2024-03-01","title":"미팅"}]"#)
            .unwrap();
        let events = ScheduleStore::new(backend).load();
        assert_eq!(events[0].color, ScheduleColor::Gray);
        assert_eq!(events[0].date, ymd(2024, 3, 1));
    }

    #[test]
    fn test_date_serializes_as_date_key() {
        let store = ScheduleStore::new(memory_backend());
        let event = store.add(ymd(2024, 12, 5), "x", Some(ScheduleColor::Purple)).unwrap();
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["date"], "2024-12-05");
        assert_eq!(json["color"], "purple");
    }

    #[test]
    fn test_remove() {
        let store = ScheduleStore::new(memory_backend());
        let a = store.add(ymd(2024, 3, 1), "a", None).unwrap();
        let b = store.add(ymd(2024, 3, 2), "b", None).unwrap();
        store.remove(&a.id);
        let remaining = store.load();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, b.id);
    }
}
