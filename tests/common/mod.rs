#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use once_cell::sync::Lazy;
use tempfile::TempDir;
use trip_planner::{
    config::{Config, ConfigManager},
    core::TripManager,
    storage::JsonFileStore,
};

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated application directory with networking switched off.
pub fn setup_test_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");
    let config = Config {
        network_enabled: false,
        ..Config::default()
    };
    config_manager.save(&config).expect("write test config");
    base
}

pub fn store_dir(base: &Path) -> PathBuf {
    base.join("store")
}

/// Opens a manager over the JSON store inside `base`.
pub fn open_manager(base: &Path) -> TripManager {
    let store = JsonFileStore::new(store_dir(base)).expect("create json store");
    TripManager::load(Box::new(store), &Config::default()).expect("load trip manager")
}
