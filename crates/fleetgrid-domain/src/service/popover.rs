//! Anti-jump popover placement
//!
//! Positions are recomputed from the trigger rectangle on every frame the
//! popover is open, so window resizes and scrolled ancestors are picked up
//! without any cached state.

use crate::model::{Rect, Viewport};

/// Distance kept between a panel and the viewport edges
pub const POPOVER_MARGIN: f32 = 8.0;
/// Vertical gap between trigger bottom and panel top
pub const POPOVER_GAP: f32 = 6.0;
/// Narrowest width a left-locked panel is shrunk to
pub const LOCK_LEFT_MIN_WIDTH: f32 = 260.0;
/// Panels stay at least this tall near the bottom edge
pub const POPOVER_MIN_HEIGHT: f32 = 180.0;
/// Space left below a panel at the bottom of the viewport
const POPOVER_BOTTOM_PAD: f32 = 12.0;

/// Placement options
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PopoverOptions {
    /// Fixed panel width; the trigger width is used when absent
    pub width: Option<f32>,
    /// Keep the left edge anchored and shrink instead of sliding right
    pub lock_left: bool,
}

impl PopoverOptions {
    pub fn fixed_width(width: f32) -> Self {
        Self {
            width: Some(width),
            lock_left: false,
        }
    }

    pub fn lock_left(mut self) -> Self {
        self.lock_left = true;
        self
    }
}

/// Fixed on-screen placement of an open panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopoverPosition {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub max_height: f32,
}

/// Compute where a panel anchored under `trigger` goes.
pub fn position_popover(trigger: Rect, viewport: Viewport, options: PopoverOptions) -> PopoverPosition {
    let mut width = match options.width {
        Some(w) if w > 0.0 => w.round(),
        _ => trigger.width.round(),
    };
    let mut left = trigger.left.round();

    if options.lock_left {
        let available = (viewport.width - left - POPOVER_MARGIN).round();
        width = width.min(available.max(LOCK_LEFT_MIN_WIDTH));
        left = left.max(POPOVER_MARGIN);
    } else {
        // A panel wider than the viewport is narrowed so both margins hold.
        width = width.min((viewport.width - 2.0 * POPOVER_MARGIN).max(0.0));
        let max_left = (viewport.width - width - POPOVER_MARGIN).max(POPOVER_MARGIN);
        left = left.max(POPOVER_MARGIN).min(max_left);
    }

    let top = trigger.bottom().round() + POPOVER_GAP;
    let max_height = (viewport.height - top - POPOVER_BOTTOM_PAD).max(POPOVER_MIN_HEIGHT);

    PopoverPosition {
        left,
        top,
        width,
        max_height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(1000.0, 700.0)
    }

    #[test]
    fn test_matches_trigger_width_by_default() {
        let trigger = Rect::new(100.0, 40.0, 180.0, 30.0);
        let pos = position_popover(trigger, viewport(), PopoverOptions::default());
        assert_eq!(pos.left, 100.0);
        assert_eq!(pos.width, 180.0);
        assert_eq!(pos.top, 76.0);
        assert_eq!(pos.max_height, 700.0 - 76.0 - 12.0);
    }

    #[test]
    fn test_default_mode_stays_inside_viewport() {
        let vp = viewport();
        for left in [-50.0, 0.0, 3.0, 400.0, 850.0, 990.0, 1200.0] {
            for width in [None, Some(120.0), Some(460.0), Some(1400.0)] {
                let trigger = Rect::new(left, 10.0, 200.0, 24.0);
                let pos = position_popover(trigger, vp, PopoverOptions { width, lock_left: false });
                assert!(pos.left >= POPOVER_MARGIN, "left {} for {:?}", pos.left, width);
                assert!(
                    pos.left + pos.width <= vp.width - POPOVER_MARGIN,
                    "right edge {} for left {} width {:?}",
                    pos.left + pos.width,
                    left,
                    width
                );
            }
        }
    }

    #[test]
    fn test_slides_left_near_right_edge() {
        let trigger = Rect::new(900.0, 10.0, 200.0, 24.0);
        let pos = position_popover(trigger, viewport(), PopoverOptions::default());
        assert_eq!(pos.left, 1000.0 - 200.0 - 8.0);
    }

    #[test]
    fn test_lock_left_shrinks_instead_of_sliding() {
        let trigger = Rect::new(700.0, 10.0, 180.0, 24.0);
        let options = PopoverOptions::fixed_width(460.0).lock_left();
        let pos = position_popover(trigger, viewport(), options);
        assert_eq!(pos.left, 700.0);
        assert_eq!(pos.width, 292.0);
    }

    #[test]
    fn test_lock_left_width_floor() {
        let trigger = Rect::new(900.0, 10.0, 180.0, 24.0);
        let options = PopoverOptions::fixed_width(460.0).lock_left();
        let pos = position_popover(trigger, viewport(), options);
        assert_eq!(pos.left, 900.0);
        assert_eq!(pos.width, LOCK_LEFT_MIN_WIDTH);
    }

    #[test]
    fn test_lock_left_is_stable_across_opens() {
        let trigger = Rect::new(640.0, 10.0, 180.0, 24.0);
        let options = PopoverOptions::fixed_width(460.0).lock_left();
        let first = position_popover(trigger, viewport(), options);
        for _ in 0..5 {
            let again = position_popover(trigger, viewport(), options);
            assert_eq!(again, first);
            assert!(again.left <= trigger.left);
        }
    }

    #[test]
    fn test_height_floor_near_bottom() {
        let trigger = Rect::new(10.0, 650.0, 100.0, 30.0);
        let pos = position_popover(trigger, viewport(), PopoverOptions::default());
        assert_eq!(pos.max_height, POPOVER_MIN_HEIGHT);
    }
}
