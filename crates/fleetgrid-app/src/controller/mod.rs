//! Controllers owning the board, directory and palette screen state
//!
//! Each controller issues gateway calls through a [`TaskRunner`](crate::TaskRunner)
//! and applies the results in `poll`, called once per frame by the UI.

mod board;
mod directory;
mod palette;
pub mod status;

pub use board::{BoardController, BoardEvent, BoardSettings, BoardState};
pub use directory::{DirectoryEditor, DirectoryEvent};
pub use palette::{PaletteEditor, PaletteEvent};
