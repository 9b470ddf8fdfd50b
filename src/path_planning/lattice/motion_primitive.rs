//! Motion primitives: short precomputed trajectories between heading buckets.

use serde::{Deserialize, Serialize};

use crate::common::angles::{angular_distance, wrap_two_pi};
use crate::common::Pose2D;

/// Tolerance for `trajectory_length == arc_length + straight_length`, relative
/// to `trajectory_length` but never tighter than 1e-3 m (1 m floor on the scale)
pub const LENGTH_RELATIVE_TOLERANCE: f64 = 1e-3;

/// Largest difference between start and end angle [rad] of a straight primitive
pub const STRAIGHT_HEADING_TOLERANCE: f64 = 1e-3;

/// Sampled poses of a primitive
pub type MotionPoses = Vec<Pose2D>;

/// Which way a primitive bends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurnDirection {
    Straight,
    Left,
    Right,
}

impl TurnDirection {
    pub fn is_turn(&self) -> bool {
        *self != TurnDirection::Straight
    }
}

/// Whether a primitive is driven forwards or backwards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TravelDirection {
    Forward,
    Reverse,
}

/// One precomputed trajectory segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionPrimitive {
    /// Handle the search engine uses to refer back to this primitive
    pub trajectory_id: u32,
    pub start_angle: f64,
    pub end_angle: f64,
    pub turning_radius: f64,
    pub trajectory_length: f64,
    pub arc_length: f64,
    pub straight_length: f64,
    pub left_turn: bool,
    /// Samples in the local frame, starting at the origin with `start_angle`
    pub poses: MotionPoses,
}

impl MotionPrimitive {
    /// Whether the end heading differs from the start heading
    pub fn changes_heading(&self) -> bool {
        !(angular_distance(self.start_angle, self.end_angle) <= STRAIGHT_HEADING_TOLERANCE)
    }

    /// No arc and no heading change. A zero-arc primitive that changes heading
    /// rotates in place and counts as a turn.
    pub fn is_straight(&self) -> bool {
        self.arc_length <= 0.0 && !self.changes_heading()
    }

    pub fn turn_direction(&self) -> TurnDirection {
        if self.is_straight() {
            TurnDirection::Straight
        } else if self.left_turn {
            TurnDirection::Left
        } else {
            TurnDirection::Right
        }
    }

    /// Absolute difference between `trajectory_length` and its two components
    pub fn length_error(&self) -> f64 {
        (self.trajectory_length - (self.arc_length + self.straight_length)).abs()
    }

    /// Whether the lengths agree within [`LENGTH_RELATIVE_TOLERANCE`]
    pub fn lengths_consistent(&self) -> bool {
        self.length_error() <= LENGTH_RELATIVE_TOLERANCE * self.trajectory_length.abs().max(1.0)
    }

    pub fn start_pose(&self) -> Option<&Pose2D> {
        self.poses.first()
    }

    pub fn end_pose(&self) -> Option<&Pose2D> {
        self.poses.last()
    }

    /// Per-sample displacement along the trajectory
    pub fn pose_deltas(&self) -> impl Iterator<Item = Pose2D> + '_ {
        self.poses.windows(2).map(|w| w[1] - w[0])
    }

    /// Mirror image across the start heading line.
    ///
    /// Lateral offsets change sign, the turn direction flips and the end
    /// heading is reflected about the start heading. Lengths are unchanged.
    pub fn mirrored(&self, trajectory_id: u32) -> MotionPrimitive {
        let axis = self.start_angle;
        MotionPrimitive {
            trajectory_id,
            start_angle: self.start_angle,
            end_angle: wrap_two_pi(2.0 * axis - self.end_angle),
            turning_radius: self.turning_radius,
            trajectory_length: self.trajectory_length,
            arc_length: self.arc_length,
            straight_length: self.straight_length,
            left_turn: if self.is_straight() {
                self.left_turn
            } else {
                !self.left_turn
            },
            poses: self.poses.iter().map(|p| p.reflected(axis)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn quarter_turn() -> MotionPrimitive {
        MotionPrimitive {
            trajectory_id: 0,
            start_angle: 0.0,
            end_angle: 1.5708,
            turning_radius: 0.5,
            trajectory_length: 0.785,
            arc_length: 0.785,
            straight_length: 0.0,
            left_turn: true,
            poses: vec![
                Pose2D::new(0.0, 0.0, 0.0),
                Pose2D::new(0.3536, 0.1464, 0.7854),
                Pose2D::new(0.5, 0.5, 1.5708),
            ],
        }
    }

    #[test]
    fn test_turn_direction() {
        let mut primitive = quarter_turn();
        assert_eq!(primitive.turn_direction(), TurnDirection::Left);
        primitive.left_turn = false;
        assert_eq!(primitive.turn_direction(), TurnDirection::Right);
        primitive.arc_length = 0.0;
        assert_eq!(primitive.turn_direction(), TurnDirection::Right);
        primitive.end_angle = 0.0;
        assert_eq!(primitive.turn_direction(), TurnDirection::Straight);
        assert!(!TurnDirection::Straight.is_turn());
    }

    #[test]
    fn test_zero_arc_heading_change_is_a_turn() {
        let mut rotation = quarter_turn();
        rotation.arc_length = 0.0;
        rotation.turning_radius = 0.0;
        rotation.trajectory_length = 0.0;
        assert!(rotation.changes_heading());
        assert!(!rotation.is_straight());
        assert_eq!(rotation.turn_direction(), TurnDirection::Left);

        rotation.end_angle = 2.0 * PI - 1e-4;
        assert!(!rotation.changes_heading());
        assert!(rotation.is_straight());
    }

    #[test]
    fn test_lengths_consistent() {
        let mut primitive = quarter_turn();
        assert!(primitive.lengths_consistent());
        primitive.trajectory_length = 0.7855;
        assert!(primitive.lengths_consistent());
        primitive.trajectory_length = 0.9;
        assert!(!primitive.lengths_consistent());

        // short primitives are held to 1e-3 m, not 1e-3 of their length
        let mut short = quarter_turn();
        short.arc_length = 0.1;
        short.trajectory_length = 0.1009;
        assert!(short.lengths_consistent());
        short.trajectory_length = 0.1011;
        assert!(!short.lengths_consistent());
    }

    #[test]
    fn test_pose_deltas() {
        let primitive = quarter_turn();
        let deltas: Vec<Pose2D> = primitive.pose_deltas().collect();
        assert_eq!(deltas.len(), 2);
        assert!((deltas[1].x - 0.1464).abs() < 1e-9);
        assert!((deltas[1].theta - 0.7854).abs() < 1e-9);
    }

    #[test]
    fn test_mirrored() {
        let primitive = quarter_turn();
        let mirror = primitive.mirrored(1);
        assert_eq!(mirror.trajectory_id, 1);
        assert!(!mirror.left_turn);
        assert!((mirror.end_angle - (2.0 * PI - 1.5708)).abs() < 1e-9);
        let end = mirror.end_pose().unwrap();
        assert!((end.x - 0.5).abs() < 1e-9);
        assert!((end.y + 0.5).abs() < 1e-9);
        assert_eq!(mirror.trajectory_length, primitive.trajectory_length);
    }

    #[test]
    fn test_mirrored_straight_keeps_flag() {
        let straight = MotionPrimitive {
            trajectory_id: 3,
            start_angle: FRAC_PI_2,
            end_angle: FRAC_PI_2,
            turning_radius: 0.0,
            trajectory_length: 0.1,
            arc_length: 0.0,
            straight_length: 0.1,
            left_turn: false,
            poses: vec![Pose2D::new(0.0, 0.0, FRAC_PI_2), Pose2D::new(0.0, 0.1, FRAC_PI_2)],
        };
        let mirror = straight.mirrored(4);
        assert!(!mirror.left_turn);
        assert!((mirror.end_angle - FRAC_PI_2).abs() < 1e-12);
        assert!(mirror.end_pose().unwrap().x.abs() < 1e-12);
    }
}
