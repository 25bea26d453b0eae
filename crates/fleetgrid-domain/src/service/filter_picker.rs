//! Chooser of which filter controls are visible

use crate::repository::PreferenceStore;
use fleetgrid_types::Result;

/// Versioned key of the persisted visible-filter list
pub const VISIBLE_FILTERS_KEY: &str = "visibleFilters_v2";

/// Dispatcher workflow order used for the default selection
pub const PREFERRED_FILTER_COLUMNS: [&str; 10] = [
    "Номер заявки",
    "Категория",
    "Подкатегория",
    "Статус",
    "ТС",
    "Гос номер ТС",
    "Класс назначенного ТС",
    "Водитель",
    "Подразделение",
    "Аварийность",
];

/// Columns taken when none of the preferred ones exist
pub const FALLBACK_FILTER_COUNT: usize = 8;

/// Saved lists longer than this are treated as "everything was selected"
pub const DEFAULT_OVERBROAD_THRESHOLD: usize = 14;

/// Picker panel width
pub const PICKER_WIDTH: f32 = 460.0;

/// Curated default visible set for the given dataset columns
pub fn default_visible_filters(columns: &[String]) -> Vec<String> {
    let preferred: Vec<String> = PREFERRED_FILTER_COLUMNS
        .iter()
        .filter(|p| columns.iter().any(|c| c == *p))
        .map(|p| p.to_string())
        .collect();
    if !preferred.is_empty() {
        return preferred;
    }
    columns.iter().take(FALLBACK_FILTER_COUNT).cloned().collect()
}

/// Visible-filter set plus the picker popover's own search state
#[derive(Debug, Clone)]
pub struct FilterPicker {
    columns: Vec<String>,
    selected: Vec<String>,
    search: String,
}

impl FilterPicker {
    /// Restore from a saved JSON list, healing empty, corrupt, stale or
    /// over-broad values to the curated default.
    pub fn restore(columns: &[String], saved: Option<&str>, overbroad_threshold: usize) -> Self {
        let fallback = default_visible_filters(columns);
        let parsed: Option<Vec<String>> = saved.and_then(|raw| serde_json::from_str(raw).ok());

        let selected = match parsed {
            Some(list) if !list.is_empty() => {
                let mut kept: Vec<String> = Vec::with_capacity(list.len());
                for column in list {
                    if columns.contains(&column) && !kept.contains(&column) {
                        kept.push(column);
                    }
                }
                if kept.is_empty() || kept.len() > overbroad_threshold {
                    fallback
                } else {
                    kept
                }
            }
            _ => fallback,
        };

        Self {
            columns: columns.to_vec(),
            selected,
            search: String::new(),
        }
    }

    /// Restore from the preference store
    pub fn load(columns: &[String], store: &dyn PreferenceStore, overbroad_threshold: usize) -> Self {
        let saved = store.get(VISIBLE_FILTERS_KEY);
        Self::restore(columns, saved.as_deref(), overbroad_threshold)
    }

    /// Write the current list back to the store
    pub fn persist(&self, store: &dyn PreferenceStore) -> Result<()> {
        let json = serde_json::to_string(&self.selected)?;
        store.set(VISIBLE_FILTERS_KEY, &json)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Visible columns in selection order
    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn count(&self) -> usize {
        self.selected.len()
    }

    pub fn is_visible(&self, column: &str) -> bool {
        self.selected.iter().any(|c| c == column)
    }

    /// Show or hide one column's control
    pub fn toggle(&mut self, column: &str) {
        if let Some(pos) = self.selected.iter().position(|c| c == column) {
            self.selected.remove(pos);
        } else if self.columns.iter().any(|c| c == column) {
            self.selected.push(column.to_string());
        }
    }

    pub fn select_all(&mut self) {
        self.selected = self.columns.clone();
    }

    pub fn select_none(&mut self) {
        self.selected.clear();
    }

    pub fn search_mut(&mut self) -> &mut String {
        &mut self.search
    }

    /// Column names passing the picker search.
    ///
    /// Unlike value searches the query is not trimmed, so a leading space
    /// narrows to multi-word column names.
    pub fn visible_options(&self) -> Vec<&str> {
        let query = self.search.to_lowercase();
        self.columns
            .iter()
            .map(String::as_str)
            .filter(|c| query.is_empty() || c.to_lowercase().contains(&query))
            .collect()
    }
}
