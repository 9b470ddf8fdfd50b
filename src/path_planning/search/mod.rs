//! Search-side configuration and traversal cost
//!
//! The search engine itself lives outside this crate; it consumes
//! [`SearchInfo`] and scores lattice expansions with [`SearchCostModel`].

pub mod cost_model;
pub mod search_info;

pub use cost_model::{SearchCostModel, TraversalContext};
pub use search_info::SearchInfo;
