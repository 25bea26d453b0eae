//! Single active popover slot

/// Identity of a popover that can be opened
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PopoverId {
    /// Multi-select of one filter column
    Filter(String),
    /// Visible-filter chooser
    Picker,
}

/// Owns the one popover allowed to be open at a time.
///
/// Opening requests exclusive ownership; whoever held the slot before is
/// released in the same step.
#[derive(Debug, Default)]
pub struct OverlayManager {
    active: Option<PopoverId>,
}

impl OverlayManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&PopoverId> {
        self.active.as_ref()
    }

    pub fn is_open(&self, id: &PopoverId) -> bool {
        self.active.as_ref() == Some(id)
    }

    /// Take the slot, returning the popover that was released
    pub fn open(&mut self, id: PopoverId) -> Option<PopoverId> {
        match self.active.replace(id.clone()) {
            Some(previous) if previous != id => Some(previous),
            _ => None,
        }
    }

    /// Trigger click: open when closed, close when it is the open one.
    /// Returns whether `id` is open afterwards.
    pub fn toggle(&mut self, id: PopoverId) -> bool {
        if self.is_open(&id) {
            self.active = None;
            false
        } else {
            self.open(id);
            true
        }
    }

    /// Close `id` if it holds the slot
    pub fn close(&mut self, id: &PopoverId) {
        if self.is_open(id) {
            self.active = None;
        }
    }

    /// Release the slot unconditionally (scroll, outside click, collapse)
    pub fn close_all(&mut self) -> Option<PopoverId> {
        self.active.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(name: &str) -> PopoverId {
        PopoverId::Filter(name.to_string())
    }

    #[test]
    fn test_at_most_one_open() {
        let mut overlay = OverlayManager::new();
        assert!(overlay.toggle(filter("Статус")));
        assert!(overlay.toggle(PopoverId::Picker));
        assert!(!overlay.is_open(&filter("Статус")));
        assert!(overlay.is_open(&PopoverId::Picker));
    }

    #[test]
    fn test_toggle_same_closes() {
        let mut overlay = OverlayManager::new();
        assert!(overlay.toggle(filter("ТС")));
        assert!(!overlay.toggle(filter("ТС")));
        assert!(overlay.active().is_none());
    }

    #[test]
    fn test_open_reports_released_holder() {
        let mut overlay = OverlayManager::new();
        assert_eq!(overlay.open(filter("A")), None);
        assert_eq!(overlay.open(filter("A")), None);
        assert_eq!(overlay.open(filter("B")), Some(filter("A")));
        assert_eq!(overlay.close_all(), Some(filter("B")));
        assert_eq!(overlay.close_all(), None);
    }

    #[test]
    fn test_close_only_affects_holder() {
        let mut overlay = OverlayManager::new();
        overlay.open(filter("A"));
        overlay.close(&filter("B"));
        assert!(overlay.is_open(&filter("A")));
        overlay.close(&filter("A"));
        assert!(overlay.active().is_none());
    }
}
