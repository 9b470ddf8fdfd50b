//! Common types, traits, and error definitions for lattice_primitives
//!
//! This module provides the building blocks shared by the lattice, the
//! search cost model and the smoother parameters.

pub mod angles;
pub mod types;
pub mod traits;
pub mod error;

pub use types::*;
pub use traits::*;
pub use error::*;
