//! Traversal cost of a lattice expansion.
//!
//! The cost of driving a primitive is its length plus additive penalties:
//!
//! - `non_straight_penalty` for any primitive with a non-zero arc
//! - `reverse_penalty` when the travel direction flips
//! - `change_penalty` when the primitive turns and its turn direction differs
//!   from the previous expansion (turning into a straight is not a change)
//! - `cost_penalty * obstacle_cost`, with the obstacle cost supplied by the
//!   costmap collaborator
//!
//! All penalties are non-negative, so the cost never decreases when any of
//! them grows.

use crate::common::ExpansionCost;
use crate::path_planning::lattice::{Expansion, MotionPrimitive, TurnDirection};

use super::search_info::SearchInfo;

/// What the search engine knows about an expansion beyond the primitive itself
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TraversalContext {
    /// Travel direction differs from the previous expansion
    pub direction_changed: bool,
    /// Turn direction changed relative to the previous expansion
    pub turn_changed: bool,
    /// Obstacle proximity cost from the costmap, unscaled
    pub obstacle_cost: f64,
}

impl TraversalContext {
    pub fn new(direction_changed: bool, turn_changed: bool, obstacle_cost: f64) -> Self {
        Self {
            direction_changed,
            turn_changed,
            obstacle_cost,
        }
    }

    /// Derive the flags from the expansion that led to the current node.
    ///
    /// The first expansion of a path (`previous == None`) changes nothing.
    pub fn between(previous: Option<&Expansion<'_>>, next: &Expansion<'_>, obstacle_cost: f64) -> Self {
        match previous {
            None => Self::new(false, false, obstacle_cost),
            Some(previous) => {
                let next_turn = next.turn_direction();
                Self::new(
                    previous.direction != next.direction,
                    next_turn.is_turn() && previous.turn_direction() != next_turn,
                    obstacle_cost,
                )
            }
        }
    }
}

/// Penalty-weighted cost function over lattice expansions
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCostModel {
    non_straight_penalty: f64,
    change_penalty: f64,
    reverse_penalty: f64,
    cost_penalty: f64,
}

impl SearchCostModel {
    pub fn new(info: &SearchInfo) -> Self {
        Self {
            non_straight_penalty: info.non_straight_penalty,
            change_penalty: info.change_penalty,
            reverse_penalty: info.reverse_penalty,
            cost_penalty: info.cost_penalty,
        }
    }

    /// Cost of driving `primitive` under `context`
    pub fn cost(&self, primitive: &MotionPrimitive, context: &TraversalContext) -> f64 {
        let mut cost = primitive.trajectory_length;
        if primitive.turn_direction() != TurnDirection::Straight {
            cost += self.non_straight_penalty;
        }
        if context.direction_changed {
            cost += self.reverse_penalty;
        }
        if context.turn_changed {
            cost += self.change_penalty;
        }
        cost + self.cost_penalty * context.obstacle_cost.max(0.0)
    }

    /// Cost of an expansion following `previous`
    pub fn expansion_cost(
        &self,
        previous: Option<&Expansion<'_>>,
        next: &Expansion<'_>,
        obstacle_cost: f64,
    ) -> f64 {
        self.cost(
            next.primitive,
            &TraversalContext::between(previous, next, obstacle_cost),
        )
    }
}

impl ExpansionCost for SearchCostModel {
    fn cost(&self, primitive: &MotionPrimitive, context: &TraversalContext) -> f64 {
        SearchCostModel::cost(self, primitive, context)
    }
}
