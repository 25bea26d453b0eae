//! Column -> accepted values restriction sent with schedule requests

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Active filter selections.
///
/// Keys always equal the filterable columns of the loaded dataset; an empty set
/// means the column is unrestricted. Serializes to the `filters` query value,
/// e.g. `{"Статус":["В работе"],"ТС":[]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterState(BTreeMap<String, BTreeSet<String>>);

impl FilterState {
    /// Unrestricted state over the given columns
    pub fn for_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            columns
                .into_iter()
                .map(|c| (c.into(), BTreeSet::new()))
                .collect(),
        )
    }

    /// Replace the column set; every previous key and selection is dropped
    pub fn reset_columns(&mut self, columns: &[String]) {
        *self = Self::for_columns(columns.iter().cloned());
    }

    /// Replace the accepted values of a known column.
    ///
    /// Returns false (and changes nothing) for a column outside the dataset.
    pub fn set<I, S>(&mut self, column: &str, values: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match self.0.get_mut(column) {
            Some(selected) => {
                *selected = values.into_iter().map(Into::into).collect();
                true
            }
            None => false,
        }
    }

    /// Accepted values of a column (None for unknown columns)
    pub fn get(&self, column: &str) -> Option<&BTreeSet<String>> {
        self.0.get(column)
    }

    /// Empty every selection, keeping the columns
    pub fn clear_all(&mut self) {
        for selected in self.0.values_mut() {
            selected.clear();
        }
    }

    /// True when no column restricts the result
    pub fn is_unrestricted(&self) -> bool {
        self.0.values().all(BTreeSet::is_empty)
    }

    /// Column names in key order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of restricted columns
    pub fn active_count(&self) -> usize {
        self.0.values().filter(|s| !s.is_empty()).count()
    }

    /// Whether a row value passes the restriction of one column
    pub fn accepts(&self, column: &str, value: &str) -> bool {
        self.0
            .get(column)
            .map(|selected| selected.is_empty() || selected.contains(value))
            .unwrap_or(true)
    }

    /// JSON encoding used in the `filters` query parameter
    pub fn to_query_value(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<String> {
        vec!["Статус".to_string(), "ТС".to_string()]
    }

    #[test]
    fn test_set_ignores_unknown_columns() {
        let mut state = FilterState::for_columns(columns());
        assert!(state.set("Статус", ["В работе"]));
        assert!(!state.set("Водитель", ["Иванов"]));
        assert_eq!(state.columns().collect::<Vec<_>>(), vec!["Статус", "ТС"]);
        assert_eq!(state.active_count(), 1);
    }

    #[test]
    fn test_reset_drops_stale_keys() {
        let mut state = FilterState::for_columns(columns());
        state.set("ТС", ["КАМАЗ"]);
        state.reset_columns(&["Категория".to_string()]);
        assert!(state.get("ТС").is_none());
        assert!(state.is_unrestricted());
        assert_eq!(state.to_query_value().unwrap(), r#"{"Категория":[]}"#);
    }

    #[test]
    fn test_accepts_empty_means_all() {
        let mut state = FilterState::for_columns(columns());
        assert!(state.accepts("Статус", "Закрыта"));
        state.set("Статус", ["В работе"]);
        assert!(state.accepts("Статус", "В работе"));
        assert!(!state.accepts("Статус", "Закрыта"));
        state.clear_all();
        assert!(state.is_unrestricted());
    }

    #[test]
    fn test_query_value_shape() {
        let mut state = FilterState::for_columns(columns());
        state.set("Статус", ["В работе"]);
        assert_eq!(
            state.to_query_value().unwrap(),
            r#"{"Статус":["В работе"],"ТС":[]}"#
        );
    }
}
