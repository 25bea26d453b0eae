//! Persistence implementations
//!
//! This module provides implementations of the `PreferenceStore` trait.

mod file_preference_store;
mod memory_preference_store;

pub use file_preference_store::FilePreferenceStore;
pub use memory_preference_store::MemoryPreferenceStore;
