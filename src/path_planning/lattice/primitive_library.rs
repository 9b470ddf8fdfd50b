//! Primitive library: validated, heading-indexed storage of motion primitives.
//!
//! All primitives live in one arena in load order. Heading buckets store arena
//! indices, so a lookup by start heading is a single `Vec` index and no
//! primitive is ever shared or aliased between structures. The library is only
//! constructed after every primitive passed validation and is never mutated
//! afterwards, which makes concurrent reads from several planning threads safe.

use std::collections::HashMap;

use log::{debug, info, warn};

use crate::common::angles::angular_distance;
use crate::common::{Inconsistency, LatticeError};

use super::metadata::LatticeMetadata;
use super::motion_primitive::{MotionPrimitive, TravelDirection, TurnDirection};
use super::symmetry::find_missing_mirrors;

/// Slack allowed when comparing a turning radius against the minimum [m]
pub const RADIUS_EPSILON: f64 = 1e-6;

/// Options controlling how a lattice is validated and queried
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadOptions {
    /// Max angular distance [rad] between a primitive angle and its bucket.
    /// Defaults to a fraction of the grid resolution.
    pub heading_tolerance: Option<f64>,
    /// Max distance [m] of the first pose from the origin.
    /// Defaults to a fraction of the grid resolution.
    pub position_tolerance: Option<f64>,
    /// Vehicle limit applied on top of the lattice's own minimum turning radius
    pub minimum_turning_radius: Option<f64>,
    /// Offer primitives of the opposite heading driven backwards
    pub allow_reverse_expansion: bool,
    /// Require a mirror image for every turning primitive (symmetric models only)
    pub require_mirror_symmetry: bool,
}

/// A primitive offered from a heading, with the direction it is driven in
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Expansion<'a> {
    pub primitive: &'a MotionPrimitive,
    pub direction: TravelDirection,
    /// Heading bucket of the robot once the primitive is completed
    pub end_heading: usize,
}

impl<'a> Expansion<'a> {
    pub fn trajectory_id(&self) -> u32 {
        self.primitive.trajectory_id
    }

    pub fn turn_direction(&self) -> TurnDirection {
        self.primitive.turn_direction()
    }

    pub fn is_reverse(&self) -> bool {
        self.direction == TravelDirection::Reverse
    }
}

/// Immutable library of all primitives of one lattice
#[derive(Debug, Clone)]
pub struct PrimitiveLibrary {
    metadata: LatticeMetadata,
    primitives: Vec<MotionPrimitive>,
    start_buckets: Vec<usize>,
    end_buckets: Vec<usize>,
    buckets: Vec<Vec<usize>>,
    id_index: HashMap<u32, usize>,
    reverse_headings: Option<Vec<usize>>,
    heading_tolerance: f64,
    position_tolerance: f64,
}

impl PrimitiveLibrary {
    /// Validate and load a lattice with default options
    pub fn load(
        metadata: LatticeMetadata,
        primitives: Vec<MotionPrimitive>,
    ) -> Result<Self, LatticeError> {
        Self::load_with_options(metadata, primitives, &LoadOptions::default())
    }

    /// Validate and load a lattice.
    ///
    /// Checks run in a fixed order and the first violation is returned:
    /// metadata, trajectory count, then each primitive in input order
    /// (id, lengths, headings, turning radius, poses), then the reverse
    /// heading table and the optional mirror check.
    pub fn load_with_options(
        metadata: LatticeMetadata,
        primitives: Vec<MotionPrimitive>,
        options: &LoadOptions,
    ) -> Result<Self, LatticeError> {
        metadata.validate()?;
        if metadata.number_of_trajectories as usize != primitives.len() {
            return Err(Inconsistency::TrajectoryCountMismatch {
                declared: metadata.number_of_trajectories,
                loaded: primitives.len(),
            }
            .into());
        }

        let heading_tolerance = options
            .heading_tolerance
            .unwrap_or_else(|| metadata.default_tolerance());
        metadata.check_heading_spacing(heading_tolerance)?;
        let position_tolerance = options
            .position_tolerance
            .unwrap_or_else(|| metadata.default_tolerance());
        let minimum_radius = options
            .minimum_turning_radius
            .map_or(metadata.min_turning_radius, |r| r.max(metadata.min_turning_radius));

        let mut id_index = HashMap::with_capacity(primitives.len());
        let mut start_buckets = Vec::with_capacity(primitives.len());
        let mut end_buckets = Vec::with_capacity(primitives.len());
        for (index, primitive) in primitives.iter().enumerate() {
            if id_index.insert(primitive.trajectory_id, index).is_some() {
                return Err(Inconsistency::DuplicateId(primitive.trajectory_id).into());
            }
            let (start, end) = validate_primitive(
                &metadata,
                primitive,
                heading_tolerance,
                position_tolerance,
                minimum_radius,
            )?;
            start_buckets.push(start);
            end_buckets.push(end);
        }

        let number_of_headings = metadata.heading_angles.len();
        let reverse_headings = if options.allow_reverse_expansion {
            let table = (0..number_of_headings)
                .map(|index| {
                    metadata
                        .reverse_heading(index, heading_tolerance)
                        .ok_or(Inconsistency::NoReverseHeading { index })
                })
                .collect::<Result<Vec<_>, _>>()?;
            Some(table)
        } else {
            None
        };

        if options.require_mirror_symmetry {
            if metadata.motion_model.is_symmetric() {
                let missing = find_missing_mirrors(
                    &metadata,
                    &primitives,
                    &start_buckets,
                    &end_buckets,
                    heading_tolerance,
                    position_tolerance,
                );
                if let Some(&trajectory_id) = missing.first() {
                    return Err(Inconsistency::MissingMirror { trajectory_id }.into());
                }
            } else {
                warn!(
                    "[Lattice] mirror check requested but motion model '{}' is not symmetric, skipping",
                    metadata.motion_model
                );
            }
        }

        let mut buckets = vec![Vec::new(); number_of_headings];
        for (index, &start) in start_buckets.iter().enumerate() {
            buckets[start].push(index);
        }

        let empty = buckets.iter().filter(|b| b.is_empty()).count();
        info!(
            "[Lattice] loaded {} primitives over {} headings (model '{}', min radius {:.3} m)",
            primitives.len(),
            number_of_headings,
            metadata.motion_model,
            minimum_radius
        );
        debug!(
            "[Lattice] {} empty heading buckets, reverse expansion {}",
            empty,
            if reverse_headings.is_some() { "enabled" } else { "disabled" }
        );

        Ok(Self {
            metadata,
            primitives,
            start_buckets,
            end_buckets,
            buckets,
            id_index,
            reverse_headings,
            heading_tolerance,
            position_tolerance,
        })
    }

    pub fn metadata(&self) -> &LatticeMetadata {
        &self.metadata
    }

    pub fn number_of_headings(&self) -> usize {
        self.buckets.len()
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn allows_reverse(&self) -> bool {
        self.reverse_headings.is_some()
    }

    /// Heading tolerance the library was validated with [rad]
    pub fn heading_tolerance(&self) -> f64 {
        self.heading_tolerance
    }

    /// All primitives in load order
    pub fn iter(&self) -> impl Iterator<Item = &MotionPrimitive> {
        self.primitives.iter()
    }

    /// Look up a primitive by its trajectory id
    pub fn primitive(&self, trajectory_id: u32) -> Option<&MotionPrimitive> {
        self.id_index
            .get(&trajectory_id)
            .map(|&index| &self.primitives[index])
    }

    /// Start and end heading bucket of a primitive
    pub fn heading_of(&self, trajectory_id: u32) -> Option<(usize, usize)> {
        self.id_index
            .get(&trajectory_id)
            .map(|&index| (self.start_buckets[index], self.end_buckets[index]))
    }

    /// Resolve a continuous heading with the library's tolerance
    pub fn resolve_heading(&self, angle: f64) -> Option<usize> {
        self.metadata.resolve_heading(angle, self.heading_tolerance)
    }

    /// Primitives whose start heading is `heading_index`, driven forwards
    pub fn forward_primitives(
        &self,
        heading_index: usize,
    ) -> impl Iterator<Item = &MotionPrimitive> + '_ {
        self.bucket(heading_index)
            .iter()
            .map(move |&index| &self.primitives[index])
    }

    /// Every expansion available to a robot facing `heading_index`.
    ///
    /// Forward primitives of the bucket come first. When reverse expansion is
    /// enabled they are followed by the primitives of the opposite bucket,
    /// driven backwards. An unused or out-of-range heading yields nothing.
    pub fn primitives_from(
        &self,
        heading_index: usize,
    ) -> impl Iterator<Item = Expansion<'_>> + '_ {
        let forward = self.bucket(heading_index).iter().map(move |&index| Expansion {
            primitive: &self.primitives[index],
            direction: TravelDirection::Forward,
            end_heading: self.end_buckets[index],
        });

        let reverse = self
            .reverse_headings
            .as_ref()
            .and_then(|table| table.get(heading_index).map(|&opposite| (table, opposite)))
            .into_iter()
            .flat_map(move |(table, opposite)| {
                self.bucket(opposite).iter().map(move |&index| Expansion {
                    primitive: &self.primitives[index],
                    direction: TravelDirection::Reverse,
                    end_heading: table[self.end_buckets[index]],
                })
            });

        forward.chain(reverse)
    }

    /// Ids of turning primitives without a mirror image
    pub fn missing_mirrors(&self) -> Vec<u32> {
        find_missing_mirrors(
            &self.metadata,
            &self.primitives,
            &self.start_buckets,
            &self.end_buckets,
            self.heading_tolerance,
            self.position_tolerance,
        )
    }

    fn bucket(&self, heading_index: usize) -> &[usize] {
        self.buckets
            .get(heading_index)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

fn validate_primitive(
    metadata: &LatticeMetadata,
    primitive: &MotionPrimitive,
    heading_tolerance: f64,
    position_tolerance: f64,
    minimum_radius: f64,
) -> Result<(usize, usize), LatticeError> {
    let trajectory_id = primitive.trajectory_id;

    let lengths = [
        ("trajectory_length", primitive.trajectory_length),
        ("arc_length", primitive.arc_length),
        ("straight_length", primitive.straight_length),
        ("turning_radius", primitive.turning_radius),
    ];
    for &(field, value) in lengths.iter() {
        if !(value >= 0.0 && value.is_finite()) {
            return Err(Inconsistency::InvalidLength {
                trajectory_id,
                field,
                value,
            }
            .into());
        }
    }
    if !primitive.lengths_consistent() {
        return Err(Inconsistency::LengthMismatch {
            trajectory_id,
            trajectory_length: primitive.trajectory_length,
            sum: primitive.arc_length + primitive.straight_length,
        }
        .into());
    }

    let start = metadata
        .resolve_heading(primitive.start_angle, heading_tolerance)
        .ok_or(Inconsistency::UnknownStartHeading {
            trajectory_id,
            angle: primitive.start_angle,
        })?;
    let end = metadata
        .resolve_heading(primitive.end_angle, heading_tolerance)
        .ok_or(Inconsistency::UnknownEndHeading {
            trajectory_id,
            angle: primitive.end_angle,
        })?;

    let rotates_in_place = primitive.turning_radius <= RADIUS_EPSILON
        && metadata.motion_model.allows_in_place_rotation();
    if !primitive.is_straight()
        && !rotates_in_place
        && primitive.turning_radius < minimum_radius - RADIUS_EPSILON
    {
        return Err(LatticeError::InfeasiblePrimitive {
            trajectory_id,
            turning_radius: primitive.turning_radius,
            minimum: minimum_radius,
        });
    }

    if let Some(index) = primitive
        .poses
        .iter()
        .position(|p| !(p.x.is_finite() && p.y.is_finite() && p.theta.is_finite()))
    {
        return Err(Inconsistency::NonFinitePose {
            trajectory_id,
            index,
        }
        .into());
    }
    let first = primitive
        .start_pose()
        .ok_or(Inconsistency::EmptyPoses { trajectory_id })?;
    if !(first.x.hypot(first.y) <= position_tolerance
        && angular_distance(first.theta, primitive.start_angle) <= heading_tolerance)
    {
        return Err(Inconsistency::PoseStartMismatch { trajectory_id }.into());
    }
    let last = primitive
        .end_pose()
        .ok_or(Inconsistency::EmptyPoses { trajectory_id })?;
    if !(angular_distance(last.theta, primitive.end_angle) <= heading_tolerance) {
        return Err(Inconsistency::PoseEndMismatch { trajectory_id }.into());
    }

    Ok((start, end))
}
