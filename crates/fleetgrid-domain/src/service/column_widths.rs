//! Persisted per-column pixel widths

use crate::repository::PreferenceStore;
use fleetgrid_types::Result;

/// Store key prefix of a column width entry
pub const WIDTH_KEY_PREFIX: &str = "colw:";

/// Saved widths at or below this are ignored
const MIN_SANE_WIDTH: i64 = 10;

pub fn width_key(column_key: &str) -> String {
    format!("{}{}", WIDTH_KEY_PREFIX, column_key)
}

/// Saved width of a column, or `fallback` when absent or unusable
pub fn saved_width(store: &dyn PreferenceStore, column_key: &str, fallback: f32) -> f32 {
    store
        .get(&width_key(column_key))
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .filter(|w| *w > MIN_SANE_WIDTH)
        .map(|w| w as f32)
        .unwrap_or(fallback)
}

/// Persist a column width as whole pixels
pub fn save_width(store: &dyn PreferenceStore, column_key: &str, width: f32) -> Result<()> {
    let px = width.round() as i64;
    store.set(&width_key(column_key), &px.to_string())
}
