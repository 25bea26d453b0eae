//! Stateful board components

pub mod column_widths;
pub mod filter_picker;
pub mod generation;
pub mod multi_select;
pub mod overlay;
pub mod popover;
pub mod resize;
pub mod snap;

pub use filter_picker::FilterPicker;
pub use generation::{RequestGenerations, RequestKind};
pub use multi_select::{MultiSelect, SelectionLabel};
pub use overlay::{OverlayManager, PopoverId};
pub use popover::{position_popover, PopoverOptions, PopoverPosition};
pub use resize::{ColumnResizer, ResizeUpdate};
pub use snap::SnapScroller;
