//! Motion Primitive Lattice Module
//!
//! A lattice is a set of precomputed, kinematically feasible trajectory
//! segments ("motion primitives") that connect discrete heading buckets.
//! A graph search expands a node by asking the [`PrimitiveLibrary`] which
//! primitives start from the node's heading.
//!
//! # Components
//!
//! - `metadata`: heading discretization and global lattice parameters
//! - `motion_primitive`: a single primitive and its sampled poses
//! - `primitive_library`: validated load and heading-indexed lookup
//! - `symmetry`: optional mirror-image consistency check
//! - `generator`: arc/straight primitive builder for small uniform lattices
//!
//! # Example
//!
//! ```
//! use lattice_primitives::path_planning::lattice::{
//!     generate_uniform_lattice, PrimitiveGeneratorConfig, PrimitiveLibrary,
//! };
//!
//! let (metadata, primitives) = generate_uniform_lattice(&PrimitiveGeneratorConfig::default());
//! let library = PrimitiveLibrary::load(metadata, primitives).unwrap();
//! assert_eq!(library.primitives_from(0).count(), 3);
//! ```

pub mod generator;
pub mod metadata;
pub mod motion_primitive;
pub mod primitive_library;
pub mod symmetry;

// Re-exports
pub use generator::{arc_primitive, generate_uniform_lattice, PrimitiveGeneratorConfig};
pub use metadata::{LatticeMetadata, LatticeMotionModel};
pub use motion_primitive::{
    MotionPoses, MotionPrimitive, TravelDirection, TurnDirection, LENGTH_RELATIVE_TOLERANCE,
    STRAIGHT_HEADING_TOLERANCE,
};
pub use primitive_library::{Expansion, LoadOptions, PrimitiveLibrary};
