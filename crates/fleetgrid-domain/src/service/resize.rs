//! Drag-to-resize of grid columns

use crate::model::grid::{ColumnGroup, SLOT_KEY_PREFIX};
use crate::repository::PreferenceStore;
use crate::service::column_widths::save_width;
use fleetgrid_types::Result;

/// Narrowest slot column
pub const MIN_SLOT_WIDTH: f32 = 26.0;
/// Narrowest sticky column
pub const MIN_STICKY_WIDTH: f32 = 60.0;

/// Width floor of a column by its key
pub fn min_width_for(column_key: &str) -> f32 {
    if column_key.starts_with(SLOT_KEY_PREFIX) {
        MIN_SLOT_WIDTH
    } else {
        MIN_STICKY_WIDTH
    }
}

#[derive(Debug, Clone)]
struct ResizeDrag {
    key: String,
    start_width: f32,
    start_x: f32,
}

/// New width produced by a drag move
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeUpdate {
    pub key: String,
    pub width: f32,
}

/// Tracks at most one header drag at a time
#[derive(Debug, Default)]
pub struct ColumnResizer {
    drag: Option<ResizeDrag>,
}

impl ColumnResizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the rendered width and pointer position at drag start
    pub fn begin(&mut self, column_key: &str, current_width: f32, pointer_x: f32) {
        self.drag = Some(ResizeDrag {
            key: column_key.to_string(),
            start_width: current_width,
            start_x: pointer_x,
        });
    }

    pub fn active_key(&self) -> Option<&str> {
        self.drag.as_ref().map(|d| d.key.as_str())
    }

    /// Width for the current pointer position, floored per column kind
    pub fn drag_to(&self, pointer_x: f32) -> Option<ResizeUpdate> {
        let drag = self.drag.as_ref()?;
        let width = (drag.start_width + pointer_x - drag.start_x)
            .round()
            .max(min_width_for(&drag.key));
        Some(ResizeUpdate {
            key: drag.key.clone(),
            width,
        })
    }

    /// Drop the drag; every move was already persisted
    pub fn end(&mut self) {
        self.drag = None;
    }
}

/// Apply a drag move to the live column group and the preference store
pub fn commit_resize(
    update: &ResizeUpdate,
    columns: &mut ColumnGroup,
    store: &dyn PreferenceStore,
) -> Result<()> {
    if columns.set_width(&update.key, update.width) {
        save_width(store, &update.key, update.width)?;
    }
    Ok(())
}
