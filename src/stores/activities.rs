//! Per-customer activity log (memos and call notes).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{load_array, save_array};
use crate::storage::{StorageBackend, CUSTOMER_ACTIVITIES_KEY};
use crate::util::generate_unique_id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Memo,
    Call,
}

impl ActivityType {
    pub fn label(&self) -> &'static str {
        match self {
            ActivityType::Memo => "메모",
            ActivityType::Call => "통화",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerActivity {
    pub id: String,
    pub customer_id: String,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub content: String,
    pub date: DateTime<Utc>,
}

pub struct ActivityStore {
    backend: Arc<dyn StorageBackend>,
}

impl ActivityStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    fn load_all(&self) -> Vec<CustomerActivity> {
        load_array(self.backend.as_ref(), CUSTOMER_ACTIVITIES_KEY).unwrap_or_default()
    }

    /// Activities for one customer, newest first.
    pub fn list(&self, customer_id: &str) -> Vec<CustomerActivity> {
        let mut activities: Vec<CustomerActivity> = self
            .load_all()
            .into_iter()
            .filter(|a| a.customer_id == customer_id)
            .collect();
        activities.sort_by(|a, b| b.date.cmp(&a.date));
        activities
    }

    pub fn add(
        &self,
        customer_id: &str,
        activity_type: ActivityType,
        content: &str,
    ) -> Result<CustomerActivity, String> {
        let content = content.trim();
        if content.is_empty() {
            return Err("내용을 입력해 주세요.".to_string());
        }
        let mut activities = self.load_all();
        let id = generate_unique_id("act", |candidate| {
            activities.iter().any(|a| a.id == candidate)
        });
        let activity = CustomerActivity {
            id,
            customer_id: customer_id.to_string(),
            activity_type,
            content: content.to_string(),
            date: Utc::now(),
        };
        activities.insert(0, activity.clone());
        save_array(self.backend.as_ref(), CUSTOMER_ACTIVITIES_KEY, &activities);
        Ok(activity)
    }

    /// Remove one entry. Unknown ids leave the log unchanged.
    pub fn delete(&self, activity_id: &str) {
        let mut activities = self.load_all();
        let before = activities.len();
        activities.retain(|a| a.id != activity_id);
        if activities.len() == before {
            log::debug!("Activity {} not found, nothing deleted", activity_id);
        }
        save_array(self.backend.as_ref(), CUSTOMER_ACTIVITIES_KEY, &activities);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::test_utils::memory_backend;

    #[test]
    fn test_add_trims_and_rejects_empty() {
        let store = ActivityStore::new(memory_backend());
        let created = store.add("1", ActivityType::Call, "  소장님 통화 ").unwrap();
        assert_eq!(created.content, "소장님 통화");
        assert!(created.id.starts_with("act-"));
        assert!(store.add("1", ActivityType::Memo, "   ").is_err());
        assert_eq!(store.list("1").len(), 1);
    }

    #[test]
    fn test_list_filters_by_customer_newest_first() {
        let backend = memory_backend();
        backend
            .set_item(
                CUSTOMER_ACTIVITIES_KEY,
                r#"[
                    {"id":"act-a","customerId":"1","type":"memo","content":"old","date":"2024-01-01T00:00:00Z"},
                    {"id":"act-b","customerId":"2","type":"call","content":"other","date":"2024-01-03T00:00:00Z"},
                    {"id":"act-c","customerId":"1","type":"call","content":"new","date":"2024-01-05T00:00:00Z"}
                ]"#,
            )
            .unwrap();
        let store = ActivityStore::new(backend);
        let ids: Vec<String> = store.list("1").into_iter().map(|a| a.id).collect();
        assert_eq!(ids, vec!["act-c".to_string(), "act-a".to_string()]);
    }

    #[test]
    fn test_delete_by_id() {
        let store = ActivityStore::new(memory_backend());
        let keep = store.add("1", ActivityType::Memo, "keep").unwrap();
        let drop = store.add("1", ActivityType::Memo, "drop").unwrap();
        store.delete(&drop.id);
        store.delete("missing");
        let remaining = store.list("1");
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, keep.id);
    }

    #[test]
    fn test_type_field_name() {
        let store = ActivityStore::new(memory_backend());
        let created = store.add("7", ActivityType::Call, "x").unwrap();
        let json = serde_json::to_value(&created).unwrap();
        assert_eq!(json["type"], "call");
        assert_eq!(json["customerId"], "7");
    }
}
