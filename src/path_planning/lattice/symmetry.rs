//! Mirror symmetry check
//!
//! Symmetric motion models produce, for every turning primitive, a mirror
//! image that turns the other way from the same start heading. Whether a
//! lattice must honour that is up to the generator, so the check is opt-in.

use std::collections::HashMap;

use crate::common::angles::wrap_two_pi;

use super::metadata::LatticeMetadata;
use super::motion_primitive::{MotionPrimitive, TurnDirection};

/// Ids of turning primitives that have no mirrored counterpart, in input order.
///
/// `start_buckets` and `end_buckets` hold the resolved heading bucket of every
/// primitive. A counterpart starts in the same bucket, ends in the reflected
/// bucket, turns the opposite way, has the same length and ends at the
/// reflected end position.
pub fn find_missing_mirrors(
    metadata: &LatticeMetadata,
    primitives: &[MotionPrimitive],
    start_buckets: &[usize],
    end_buckets: &[usize],
    heading_tolerance: f64,
    position_tolerance: f64,
) -> Vec<u32> {
    let mut by_shape: HashMap<(usize, usize, TurnDirection), Vec<usize>> = HashMap::new();
    for (i, primitive) in primitives.iter().enumerate() {
        by_shape
            .entry((start_buckets[i], end_buckets[i], primitive.turn_direction()))
            .or_default()
            .push(i);
    }

    primitives
        .iter()
        .enumerate()
        .filter(|(_, primitive)| !primitive.is_straight())
        .filter(|&(i, primitive)| {
            let opposite = match primitive.turn_direction() {
                TurnDirection::Left => TurnDirection::Right,
                _ => TurnDirection::Left,
            };
            let reflected_end = wrap_two_pi(2.0 * primitive.start_angle - primitive.end_angle);
            let end_bucket = match metadata.resolve_heading(reflected_end, heading_tolerance) {
                Some(bucket) => bucket,
                None => return true,
            };
            let expected_end = primitive
                .end_pose()
                .map(|pose| pose.reflected(primitive.start_angle).position());

            let found = by_shape
                .get(&(start_buckets[i], end_bucket, opposite))
                .map_or(false, |candidates| {
                    candidates.iter().any(|&j| {
                        let other = &primitives[j];
                        let same_length = (other.trajectory_length - primitive.trajectory_length)
                            .abs()
                            <= position_tolerance;
                        let same_end = match (expected_end, other.end_pose()) {
                            (Some(expected), Some(actual)) => {
                                expected.distance(&actual.position()) <= position_tolerance
                            }
                            _ => false,
                        };
                        same_length && same_end
                    })
                });
            !found
        })
        .map(|(_, primitive)| primitive.trajectory_id)
        .collect()
}
