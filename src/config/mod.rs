//! Configuration input for the planner.
//!
//! Parameters arrive as a [`ParameterSnapshot`]; the consumers
//! (`SearchInfo`, `SmootherParams`) pull their fields from it and fall back
//! to the values in `defaults` when a key is absent.

pub mod defaults;
mod snapshot;

pub use snapshot::{qualified, ParameterSnapshot, ParameterValue};
