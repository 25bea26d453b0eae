//! Multi-select filter control state

use std::collections::BTreeSet;

/// Panel button selecting every value
pub const SELECT_ALL_BUTTON: &str = "Все";
/// Panel button emptying the selection
pub const CLEAR_BUTTON: &str = "Очистить";

/// Live, trimmed, case-insensitive substring match over option values
fn matches_search(option: &str, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    query.is_empty() || option.to_lowercase().contains(&query)
}

/// Trigger label of a multi-select
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionLabel {
    pub text: &'static str,
    /// Count badge, absent when nothing is selected
    pub badge: Option<usize>,
}

/// One filter column's multi-select.
///
/// The selection set is the column's restriction: empty means every value
/// passes. Values outside the known list never appear as options, so they
/// cannot be selected.
#[derive(Debug, Clone)]
pub struct MultiSelect {
    column: String,
    values: Vec<String>,
    selected: BTreeSet<String>,
    search: String,
}

impl MultiSelect {
    pub fn new(column: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            column: column.into(),
            values,
            selected: BTreeSet::new(),
            search: String::new(),
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn selection(&self) -> &BTreeSet<String> {
        &self.selected
    }

    pub fn is_selected(&self, value: &str) -> bool {
        self.selected.contains(value)
    }

    /// Flip one value; returns false for values outside the option list
    pub fn toggle(&mut self, value: &str) -> bool {
        if !self.values.iter().any(|v| v == value) {
            return false;
        }
        if !self.selected.remove(value) {
            self.selected.insert(value.to_string());
        }
        true
    }

    pub fn select_all(&mut self) {
        self.selected = self.values.iter().cloned().collect();
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Search text, edited in place by the renderer
    pub fn search_mut(&mut self) -> &mut String {
        &mut self.search
    }

    /// Options passing the current search
    pub fn visible_options(&self) -> Vec<&str> {
        self.values
            .iter()
            .map(String::as_str)
            .filter(|v| matches_search(v, &self.search))
            .collect()
    }

    pub fn label(&self) -> SelectionLabel {
        match self.selected.len() {
            0 => SelectionLabel {
                text: "Все",
                badge: None,
            },
            n => SelectionLabel {
                text: "Выбрано",
                badge: Some(n),
            },
        }
    }

    /// Panel counter ("3 выбрано")
    pub fn count_text(&self) -> String {
        format!("{} выбрано", self.selected.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statuses() -> MultiSelect {
        MultiSelect::new(
            "Статус",
            vec!["В работе".into(), "Закрыта".into(), "Новая".into()],
        )
    }

    #[test]
    fn test_toggle_adds_and_removes() {
        let mut ms = statuses();
        assert!(ms.toggle("Новая"));
        assert!(ms.is_selected("Новая"));
        assert!(ms.toggle("Новая"));
        assert!(ms.selection().is_empty());
    }

    #[test]
    fn test_unknown_value_is_ignored() {
        let mut ms = statuses();
        assert!(!ms.toggle("Отменена"));
        assert!(ms.selection().is_empty());
    }

    #[test]
    fn test_select_all_and_clear() {
        let mut ms = statuses();
        ms.select_all();
        assert_eq!(ms.selection().len(), 3);
        assert_eq!(ms.count_text(), "3 выбрано");
        ms.clear();
        assert!(ms.selection().is_empty());
    }

    #[test]
    fn test_panel_buttons() {
        assert_eq!(SELECT_ALL_BUTTON, "Все");
        assert_eq!(CLEAR_BUTTON, "Очистить");
    }

    #[test]
    fn test_label_reads_all_when_empty() {
        let mut ms = statuses();
        assert_eq!(ms.label(), SelectionLabel { text: "Все", badge: None });
        ms.toggle("Закрыта");
        ms.toggle("Новая");
        assert_eq!(ms.label(), SelectionLabel { text: "Выбрано", badge: Some(2) });
    }

    #[test]
    fn test_search_does_not_touch_selection() {
        let mut ms = statuses();
        ms.toggle("Закрыта");
        ms.search_mut().push_str("  в РАБ ");
        assert_eq!(ms.visible_options(), vec!["В работе"]);
        assert!(ms.is_selected("Закрыта"));
        ms.search_mut().clear();
        assert_eq!(ms.visible_options().len(), 3);
    }
}
