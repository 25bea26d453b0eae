//! Repository adapters for the persistence and gateway layers

use std::path::PathBuf;
use std::sync::Arc;

use tracing::warn;

use fleetgrid_domain::repository::{PreferenceStore, ScheduleGateway};
use fleetgrid_infra::{FilePreferenceStore, HttpScheduleGateway, MemoryPreferenceStore};
use fleetgrid_types::Result;

use crate::config::Config;

/// Open file-based preference store
pub fn open_preference_store(config: &Config) -> Result<FilePreferenceStore> {
    let data_dir = config.data_dir()?;
    FilePreferenceStore::open(data_dir)
}

/// Open file-based preference store at a custom directory
pub fn open_preference_store_at(data_dir: PathBuf) -> Result<FilePreferenceStore> {
    FilePreferenceStore::open(data_dir)
}

/// Preference store for the board; falls back to memory when the data
/// directory is unusable so the board still works without persistence
pub fn open_board_preferences(config: &Config) -> Box<dyn PreferenceStore> {
    match open_preference_store(config) {
        Ok(store) => Box::new(store),
        Err(e) => {
            warn!(error = %e, "preferences are not persisted");
            Box::new(MemoryPreferenceStore::new())
        }
    }
}

/// Open the HTTP gateway for the configured server
pub fn open_gateway(config: &Config) -> Result<Arc<dyn ScheduleGateway>> {
    let gateway = HttpScheduleGateway::new(&config.server_url, config.request_timeout())?;
    Ok(Arc::new(gateway))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_board_preferences_persist_in_data_dir() {
        let dir = tempdir().unwrap();
        let config = Config {
            data_dir: Some(dir.path().to_path_buf()),
            ..Config::default()
        };
        let store = open_board_preferences(&config);
        store.set("colw:st1", "140").unwrap();
        assert!(dir.path().join("preferences.json").exists());

        let reopened = open_preference_store_at(dir.path().to_path_buf()).unwrap();
        assert_eq!(reopened.get("colw:st1").as_deref(), Some("140"));
    }
}
