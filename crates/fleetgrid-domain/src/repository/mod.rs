//! Persistence and backend boundary traits

use std::path::Path;

use fleetgrid_types::{
    DirectoryEntry, FilterState, MarkRequest, MetaResponse, Palette, Result, SchedulePayload,
};

/// Key/value preferences surviving restarts (column widths, visible filters).
///
/// Writes are last-write-wins; there is no transactional grouping.
pub trait PreferenceStore {
    /// Raw stored value
    fn get(&self, key: &str) -> Option<String>;

    /// Store a value, persisting immediately
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Request/response contracts of the scheduling backend
pub trait ScheduleGateway: Send + Sync {
    /// `GET /api/meta`
    fn meta(&self) -> Result<MetaResponse>;

    /// `GET /api/schedule`
    fn schedule(&self, day: &str, filters: &FilterState) -> Result<SchedulePayload>;

    /// `POST /api/mark`; any non-success response is an error
    fn mark(&self, request: &MarkRequest) -> Result<()>;

    /// `POST /api/upload` with the workbook at `path`
    fn upload(&self, path: &Path) -> Result<MetaResponse>;

    /// `GET /export`, returning the file bytes
    fn export(&self, day: &str, filters: &FilterState) -> Result<Vec<u8>>;

    /// `GET /api/palette`
    fn palette(&self) -> Result<Palette>;

    /// `POST /api/palette`, returning the stored palette
    fn save_palette(&self, palette: &Palette) -> Result<Palette>;

    /// `POST /api/palette/reset`
    fn reset_palette(&self) -> Result<Palette>;

    /// `GET /api/directory`
    fn directory(&self) -> Result<Vec<DirectoryEntry>>;

    /// `POST /api/directory/upsert`
    fn upsert_directory(&self, entry: &DirectoryEntry) -> Result<()>;

    /// `POST /api/directory/delete`
    fn delete_directory(&self, plate: &str) -> Result<()>;
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::PreferenceStore;
    use fleetgrid_types::Result;

    #[derive(Default)]
    pub struct MemoryStore {
        values: RefCell<HashMap<String, String>>,
    }

    impl PreferenceStore for MemoryStore {
        fn get(&self, key: &str) -> Option<String> {
            self.values.borrow().get(key).cloned()
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            self.values
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
    }
}
