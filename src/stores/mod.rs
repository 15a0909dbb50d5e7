//! Repositories over the local key/value storage.
//!
//! Every store follows the same policy: read the whole array, mutate it in
//! memory, write the whole array back (last writer wins). Read failures and
//! malformed data fall back to the store's default; write failures are
//! logged and otherwise ignored, leaving the caller's in-memory copy as the
//! only record until the next successful write.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::storage::StorageBackend;

pub mod accidents;
pub mod activities;
pub mod customers;
pub mod schedule;

pub use accidents::{Accident, AccidentStatus, AccidentStore, NewAccident};
pub use activities::{ActivityStore, ActivityType, CustomerActivity};
pub use customers::{Customer, CustomerDraft, CustomerStore};
pub use schedule::{ScheduleColor, ScheduleEvent, ScheduleStore};

/// Load the array stored under `key`.
///
/// Returns `None` when the key is absent, unreadable, not a JSON array, or
/// when any element fails to match the expected shape. Partially valid data
/// is never trusted.
pub(crate) fn load_array<T: DeserializeOwned>(
    backend: &dyn StorageBackend,
    key: &str,
) -> Option<Vec<T>> {
    let raw = match backend.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            log::warn!("Failed to read {}: {}", key, e);
            return None;
        }
    };

    let value: serde_json::Value = match serde_json::from_str(&raw) {
        Ok(v) => v,
        Err(e) => {
            log::warn!("Discarding unparsable {}: {}", key, e);
            return None;
        }
    };
    if !value.is_array() {
        log::warn!("Discarding {}: stored value is not an array", key);
        return None;
    }

    match serde_json::from_value::<Vec<T>>(value) {
        Ok(items) => Some(items),
        Err(e) => {
            log::warn!("Discarding {}: unexpected record shape: {}", key, e);
            None
        }
    }
}

/// Serialize and store `items` under `key`. Failures are logged, not returned.
pub(crate) fn save_array<T: Serialize>(backend: &dyn StorageBackend, key: &str, items: &[T]) {
    let json = match serde_json::to_string(items) {
        Ok(json) => json,
        Err(e) => {
            log::warn!("Failed to serialize {}: {}", key, e);
            return;
        }
    };
    if let Err(e) = backend.set_item(key, &json) {
        log::warn!("Failed to write {}: {}", key, e);
    }
}


#[cfg(test)]
mod tests {
    use super::test_utils::{memory_backend, QuotaExceeded};
    use super::*;

    #[test]
    fn test_load_absent_key_is_none() {
        let backend = memory_backend();
        assert!(load_array::<u32>(backend.as_ref(), "k").is_none());
    }

    #[test]
    fn test_load_rejects_non_array() {
        let backend = memory_backend();
        backend.set_item("k", r#"{"id": 1}"#).unwrap();
        assert!(load_array::<serde_json::Value>(backend.as_ref(), "k").is_none());
    }

    #[test]
    fn test_load_rejects_garbage() {
        let backend = memory_backend();
        backend.set_item("k", "not json").unwrap();
        assert!(load_array::<u32>(backend.as_ref(), "k").is_none());
    }

    #[test]
    fn test_load_rejects_partially_valid_array() {
        let backend = memory_backend();
        backend.set_item("k", r#"[1, 2, "three"]"#).unwrap();
        assert!(load_array::<u32>(backend.as_ref(), "k").is_none());
    }

    #[test]
    fn test_save_then_load() {
        let backend = memory_backend();
        save_array(backend.as_ref(), "k", &[3u32, 1, 2]);
        assert_eq!(load_array::<u32>(backend.as_ref(), "k"), Some(vec![3, 1, 2]));
    }

    #[test]
    fn test_save_failure_is_silent() {
        let backend = QuotaExceeded::default();
        save_array(&backend, "k", &[1u32]);
        assert!(load_array::<u32>(&backend, "k").is_none());
    }
}
