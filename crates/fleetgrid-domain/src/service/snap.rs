//! Horizontal "one time column at a time" scrolling

/// Quiet period after the last horizontal movement before snapping
pub const SNAP_QUIET_SECS: f64 = 0.12;
/// Corrections smaller than this are not issued
pub const SNAP_THRESHOLD: f32 = 1.0;

/// Nearest column boundary for `offset`, or None when no correction is due.
pub fn snap_offset(offset: f32, column_width: f32) -> Option<f32> {
    if !(column_width > 0.0) {
        return None;
    }
    let snapped = (offset / column_width).round() * column_width;
    if (snapped - offset).abs() >= SNAP_THRESHOLD {
        Some(snapped)
    } else {
        None
    }
}

/// Keep a scroll offset inside `[0, content - viewport]`
pub fn clamp_scroll(offset: f32, content: f32, viewport: f32) -> f32 {
    offset.clamp(0.0, (content - viewport).max(0.0))
}

/// Debounced snapping of the horizontal scroll offset.
///
/// `observe` is fed the offset every frame; `poll` returns the corrected offset
/// once movement has been quiet for the configured period.
#[derive(Debug, Clone)]
pub struct SnapScroller {
    quiet_secs: f64,
    last_offset: f32,
    moved_at: Option<f64>,
}

impl Default for SnapScroller {
    fn default() -> Self {
        Self::new(SNAP_QUIET_SECS)
    }
}

impl SnapScroller {
    pub fn new(quiet_secs: f64) -> Self {
        Self {
            quiet_secs,
            last_offset: 0.0,
            moved_at: None,
        }
    }

    /// Record the current offset; true when it moved since the last frame
    pub fn observe(&mut self, offset: f32, now: f64) -> bool {
        if offset != self.last_offset {
            self.last_offset = offset;
            self.moved_at = Some(now);
            true
        } else {
            false
        }
    }

    /// True while a snap is still scheduled
    pub fn is_pending(&self) -> bool {
        self.moved_at.is_some()
    }

    /// Seconds until the pending snap is due
    pub fn remaining(&self, now: f64) -> Option<f64> {
        self.moved_at
            .map(|t| (t + self.quiet_secs - now).max(0.0))
    }

    /// Corrected offset once the quiet period has elapsed.
    ///
    /// `column_width` is read live by the caller since resizing changes it.
    pub fn poll(&mut self, now: f64, column_width: f32) -> Option<f32> {
        let moved_at = self.moved_at?;
        if now - moved_at < self.quiet_secs {
            return None;
        }
        self.moved_at = None;
        let target = snap_offset(self.last_offset, column_width)?;
        self.last_offset = target;
        Some(target)
    }

    /// Record an offset set programmatically (e.g. a clamped snap target)
    /// without scheduling another snap
    pub fn settle(&mut self, offset: f32) {
        self.last_offset = offset;
        self.moved_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snaps_to_nearest_boundary() {
        assert_eq!(snap_offset(60.0, 44.0), Some(44.0));
        assert_eq!(snap_offset(70.0, 44.0), Some(88.0));
        assert_eq!(snap_offset(21.0, 44.0), Some(0.0));
    }

    #[test]
    fn test_no_adjustment_within_threshold() {
        assert_eq!(snap_offset(88.0, 44.0), None);
        assert_eq!(snap_offset(88.6, 44.0), None);
        assert_eq!(snap_offset(87.5, 44.0), None);
    }

    #[test]
    fn test_no_slots_no_snap() {
        assert_eq!(snap_offset(37.0, 0.0), None);
    }

    #[test]
    fn test_waits_for_quiet_period() {
        let mut snap = SnapScroller::new(0.12);
        assert!(snap.observe(60.0, 1.00));
        assert_eq!(snap.poll(1.05, 44.0), None);
        assert!(snap.observe(65.0, 1.06));
        assert_eq!(snap.poll(1.15, 44.0), None);
        assert_eq!(snap.poll(1.20, 44.0), Some(44.0));
        assert!(!snap.is_pending());
    }

    #[test]
    fn test_snapped_offset_does_not_retrigger() {
        let mut snap = SnapScroller::new(0.12);
        snap.observe(60.0, 0.0);
        let target = snap.poll(0.2, 44.0).unwrap();
        assert!(!snap.observe(target, 0.25));
        assert_eq!(snap.poll(1.0, 44.0), None);
    }

    #[test]
    fn test_aligned_offset_issues_nothing() {
        let mut snap = SnapScroller::new(0.12);
        snap.observe(132.4, 0.0);
        assert_eq!(snap.poll(0.5, 44.0), None);
        assert!(!snap.is_pending());
    }

    #[test]
    fn test_settle_cancels_pending_snap() {
        let mut snap = SnapScroller::new(0.12);
        snap.observe(60.0, 0.0);
        snap.settle(50.0);
        assert!(!snap.is_pending());
        assert!(!snap.observe(50.0, 0.1));
        assert_eq!(snap.poll(1.0, 44.0), None);
    }

    #[test]
    fn test_clamp_scroll() {
        assert_eq!(clamp_scroll(-5.0, 500.0, 200.0), 0.0);
        assert_eq!(clamp_scroll(400.0, 500.0, 200.0), 300.0);
        assert_eq!(clamp_scroll(50.0, 100.0, 200.0), 0.0);
    }
}
