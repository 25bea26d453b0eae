//! Board model types

pub mod geometry;
pub mod grid;
pub mod palette;

pub use geometry::{Rect, Viewport};
pub use grid::{
    CellTarget, CellView, ColumnGroup, ColumnKind, ColumnSpec, DescriptiveCells, GridModel,
    GridRow, DESCRIPTIVE_ROW_SPAN,
};
pub use palette::{invalid_fields, normalize_hex, parse_rgb, sanitize_palette, PaletteField};
