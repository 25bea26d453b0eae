//! Pure component logic of the scheduling board.
//!
//! Nothing here paints or talks to the network; renderers and the controller
//! drive these types and read their state back.

pub mod model;
pub mod repository;
pub mod service;
