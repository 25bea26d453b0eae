//! Monotonic request tickets per fetch category

/// Fetch categories sequenced independently
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Meta,
    Schedule,
}

/// Only the newest issued ticket of a category may apply its response.
#[derive(Debug, Default)]
pub struct RequestGenerations {
    meta: u64,
    schedule: u64,
}

impl RequestGenerations {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&mut self, kind: RequestKind) -> &mut u64 {
        match kind {
            RequestKind::Meta => &mut self.meta,
            RequestKind::Schedule => &mut self.schedule,
        }
    }

    /// Issue a new ticket, invalidating every earlier one of the same kind
    pub fn issue(&mut self, kind: RequestKind) -> u64 {
        let slot = self.slot(kind);
        *slot += 1;
        *slot
    }

    pub fn current(&self, kind: RequestKind) -> u64 {
        match kind {
            RequestKind::Meta => self.meta,
            RequestKind::Schedule => self.schedule,
        }
    }

    pub fn is_current(&self, kind: RequestKind, generation: u64) -> bool {
        self.current(kind) == generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_ticket_invalidates_older() {
        let mut gens = RequestGenerations::new();
        let first = gens.issue(RequestKind::Schedule);
        let second = gens.issue(RequestKind::Schedule);
        assert!(!gens.is_current(RequestKind::Schedule, first));
        assert!(gens.is_current(RequestKind::Schedule, second));
    }

    #[test]
    fn test_categories_are_independent() {
        let mut gens = RequestGenerations::new();
        let meta = gens.issue(RequestKind::Meta);
        gens.issue(RequestKind::Schedule);
        gens.issue(RequestKind::Schedule);
        assert!(gens.is_current(RequestKind::Meta, meta));
    }
}
