//! File-based PreferenceStore implementation

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use tracing::warn;

use fleetgrid_domain::repository::PreferenceStore;
use fleetgrid_types::{PreferenceError, Result};

/// Preferences kept in a single JSON object on disk.
///
/// Every `set` rewrites the file; a missing or corrupted file starts empty.
pub struct FilePreferenceStore {
    store_path: PathBuf,
    values: RefCell<BTreeMap<String, String>>,
}

impl FilePreferenceStore {
    /// Create or load a store in `store_dir`
    pub fn open(store_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&store_dir)?;
        let store_path = store_dir.join("preferences.json");

        let values = if store_path.exists() {
            match Self::read(&store_path) {
                Ok(values) => values,
                Err(e) => {
                    warn!(path = %store_path.display(), error = %e, "preferences reset");
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            store_path,
            values: RefCell::new(values),
        })
    }

    fn read(path: &Path) -> Result<BTreeMap<String, String>> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| PreferenceError::Corrupted(e.to_string()).into())
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    /// Save store to disk
    fn persist(&self) -> Result<()> {
        let file = File::create(&self.store_path)
            .map_err(|e| PreferenceError::IoError(e.to_string()))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &*self.values.borrow())?;
        Ok(())
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.persist()
    }
}
