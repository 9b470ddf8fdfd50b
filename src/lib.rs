//! lattice_primitives - motion primitive lattice for state lattice planners
//!
//! This crate holds the parts of a lattice-based planner that sit between a
//! parsed lattice description and a graph search: heading discretization,
//! validated primitive storage, the traversal cost model and the parameter
//! sets read by the search engine and the path smoother.

// Core modules
pub mod common;
pub mod config;

// Planning modules
pub mod path_planning;

// Re-export common types for convenience
pub use common::{Point2D, Pose2D};
pub use common::{ExpansionCost, LatticeQuery};
pub use common::{ConfigError, LatticeError, PlannerError, PlannerResult};
pub use path_planning::lattice::{LatticeMetadata, MotionPrimitive, PrimitiveLibrary};
pub use path_planning::search::{SearchCostModel, SearchInfo};
pub use path_planning::smoother::SmootherParams;
