//! Core data models for playlist estimates.

mod ids;
mod playlist;

pub use ids::*;
pub use playlist::*;
