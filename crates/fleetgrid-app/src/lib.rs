//! Application layer - config, repository openers, board controllers

pub mod config;
pub mod controller;
pub mod repository;
pub mod runner;

pub use controller::{BoardController, DirectoryEditor, PaletteEditor};
pub use runner::TaskRunner;
