//! Key/value persistence backends.
//!
//! Each store keeps one JSON array under a fixed key, the way a browser's
//! per-origin local storage would. Backends are injected into the stores so
//! tests run against `MemoryStorage` and the app runs against SQLite.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::error::StorageError;

mod sqlite;

pub use sqlite::SqliteStorage;

pub const CUSTOMERS_KEY: &str = "woori-customers";
pub const ACCIDENTS_KEY: &str = "woori-accidents";
pub const SCHEDULE_EVENTS_KEY: &str = "woori-schedule-events";
pub const CUSTOMER_ACTIVITIES_KEY: &str = "woori-customer-activities";

pub trait StorageBackend: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Process-local backend. Contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.lock().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.lock().remove(key);
        Ok(())
    }
}
