use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::directory::{DemoGeoDirectory, GeoDirectory};
use crate::location::Locator;
use crate::storage::{MemoryStorage, SqliteStorage, StorageBackend};
use crate::stores::{AccidentStore, ActivityStore, CustomerStore, ScheduleStore};
use crate::types::Config;
use crate::weather::{RandomWeather, WeatherProvider};

/// Application state shared by every command.
pub struct AppState {
    pub config: Mutex<Config>,
    /// Where config changes are persisted. `None` when there is no home
    /// directory; changes then fail instead of being silently dropped.
    pub config_file: Option<PathBuf>,
    pub customers: CustomerStore,
    pub accidents: AccidentStore,
    pub activities: ActivityStore,
    pub schedule: ScheduleStore,
    pub directory: Arc<dyn GeoDirectory>,
    pub weather: Arc<dyn WeatherProvider>,
    pub locator: Locator,
}

impl AppState {
    /// Load config from disk and open the local database. A database that
    /// cannot be opened degrades to in-memory storage for this session.
    pub fn new() -> Self {
        let config = load_config().unwrap_or_else(|e| {
            log::warn!("{}. Using default configuration.", e);
            Config::default()
        });

        let opened = match &config.data_dir {
            Some(dir) => SqliteStorage::open_in(dir),
            None => SqliteStorage::open(),
        };
        let backend: Arc<dyn StorageBackend> = match opened {
            Ok(storage) => {
                log::info!("Local storage at {}", storage.path().display());
                Arc::new(storage)
            }
            Err(e) => {
                log::warn!("Failed to open local database: {e}. Data will not survive this session.");
                Arc::new(MemoryStorage::new())
            }
        };

        Self::with_backend(config, backend)
    }

    /// Build state over an explicit backend with the demo directory and
    /// random weather.
    pub fn with_backend(config: Config, backend: Arc<dyn StorageBackend>) -> Self {
        let locator = Locator::from_config(&config);
        Self {
            config: Mutex::new(config),
            config_file: config_path().ok(),
            customers: CustomerStore::new(backend.clone()),
            accidents: AccidentStore::new(backend.clone()),
            activities: ActivityStore::new(backend.clone()),
            schedule: ScheduleStore::new(backend),
            directory: Arc::new(DemoGeoDirectory),
            weather: Arc::new(RandomWeather),
            locator,
        }
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> Config {
        self.config.lock().clone()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Get the canonical config file path (~/.danjicare/config.json)
pub fn config_path() -> Result<PathBuf, String> {
    let home = dirs::home_dir().ok_or("Could not find home directory")?;
    Ok(home.join(".danjicare").join("config.json"))
}

/// Load configuration from ~/.danjicare/config.json
pub fn load_config() -> Result<Config, String> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(path: &Path) -> Result<Config, String> {
    if !path.exists() {
        return Err(format!("Config file not found at {}", path.display()));
    }
    let content = fs::read_to_string(path).map_err(|e| format!("Failed to read config: {}", e))?;
    serde_json::from_str(&content).map_err(|e| format!("Failed to parse config: {}", e))
}

/// Write config atomically.
pub fn save_config_to(path: &Path, config: &Config) -> Result<(), String> {
    let content = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;
    crate::util::atomic_write_str(path, &content).map_err(|e| format!("Failed to write config: {}", e))
}

/// Apply `mutator` to the in-memory config, persist it, and return the result.
/// The in-memory copy only changes once the write succeeded.
pub fn update_config(state: &AppState, mutator: impl FnOnce(&mut Config)) -> Result<Config, String> {
    let path = state
        .config_file
        .as_deref()
        .ok_or("Could not find home directory")?;
    let mut guard = state.config.lock();
    let mut config = guard.clone();
    mutator(&mut config);
    save_config_to(path, &config)?;
    *guard = config.clone();
    log::info!("Config updated at {}", path.display());
    Ok(config)
}

#[cfg(test)]
pub mod test_utils {
    use super::*;

    /// State over a fresh in-memory backend with fixed sunny weather and no
    /// device location.
    pub fn test_state() -> AppState {
        let mut state = AppState::with_backend(Config::default(), Arc::new(MemoryStorage::new()));
        state.config_file = None;
        state.weather = Arc::new(crate::weather::WeatherKind::Clear);
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_config_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config_from(&dir.path().join("config.json")).is_err());
    }

    #[test]
    fn test_save_then_load_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = Config {
            tenant_name: "래미안대치팰리스".to_string(),
            radius_km: 2.0,
            ..Config::default()
        };
        save_config_to(&path, &config).unwrap();
        assert_eq!(load_config_from(&path).unwrap(), config);
    }

    #[test]
    fn test_malformed_config_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ nope").unwrap();
        assert!(load_config_from(&path).unwrap_err().contains("parse"));
    }

    #[test]
    fn test_update_config_persists_and_updates_memory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let mut state = test_utils::test_state();
        state.config_file = Some(path.clone());

        let updated = update_config(&state, |c| c.radius_km = 5.0).unwrap();
        assert_eq!(updated.radius_km, 5.0);
        assert_eq!(state.config().radius_km, 5.0);
        assert_eq!(load_config_from(&path).unwrap(), updated);
    }

    #[test]
    fn test_update_config_without_target_leaves_memory_alone() {
        let state = test_utils::test_state();
        assert!(update_config(&state, |c| c.radius_km = 5.0).is_err());
        assert_eq!(state.config().radius_km, Config::default().radius_km);
    }

    #[test]
    fn test_state_over_sqlite_persists_between_instances() {
        let dir = tempfile::tempdir().unwrap();
        let open = || -> Arc<dyn StorageBackend> { Arc::new(SqliteStorage::open_in(dir.path()).unwrap()) };

        let first = AppState::with_backend(Config::default(), open());
        first.customers.move_status("1", crate::pipeline::CustomerStatus::Active).unwrap();
        drop(first);

        let second = AppState::with_backend(Config::default(), open());
        assert!(second.customers.get("1").unwrap().status.is_active());
    }
}
