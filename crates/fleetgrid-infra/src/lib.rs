//! Infrastructure layer: implementations of the domain boundary traits

pub mod gateway;
pub mod persistence;

pub use gateway::HttpScheduleGateway;
pub use persistence::{FilePreferenceStore, MemoryPreferenceStore};
