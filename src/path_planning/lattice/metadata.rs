//! Lattice metadata: the global description of one primitive set.
//!
//! Heading angles define the discrete buckets every primitive starts and ends
//! in. Matching a continuous angle to a bucket always goes through
//! [`LatticeMetadata::resolve_heading`], which compares within a tolerance
//! instead of relying on exact float equality.

use std::cmp::Ordering;
use std::f64::consts::PI;
use std::fmt;

use itertools::Itertools;
use ordered_float::NotNan;
use serde::{Deserialize, Serialize};

use crate::common::angles::{angular_distance, wrap_two_pi, TWO_PI};
use crate::common::{Inconsistency, LatticeError};

/// Fraction of the grid resolution used as default heading/position tolerance
pub const DEFAULT_TOLERANCE_FRACTION: f64 = 0.1;

/// Motion model the lattice was generated for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LatticeMotionModel {
    /// Car-like, cannot rotate in place
    Ackermann,
    /// Differential drive
    Diff,
    /// Omnidirectional
    Omni,
    /// Any other generator; treated as asymmetric and non-rotating
    Other(String),
}

impl LatticeMotionModel {
    /// Whether a robot of this model can turn on the spot (zero turning radius)
    pub fn allows_in_place_rotation(&self) -> bool {
        matches!(self, LatticeMotionModel::Diff | LatticeMotionModel::Omni)
    }

    /// Whether every turning primitive is expected to have a mirror image
    pub fn is_symmetric(&self) -> bool {
        !matches!(self, LatticeMotionModel::Other(_))
    }

    pub fn as_str(&self) -> &str {
        match self {
            LatticeMotionModel::Ackermann => "ackermann",
            LatticeMotionModel::Diff => "diff",
            LatticeMotionModel::Omni => "omni",
            LatticeMotionModel::Other(name) => name,
        }
    }
}

impl From<String> for LatticeMotionModel {
    fn from(name: String) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "ackermann" => LatticeMotionModel::Ackermann,
            "diff" => LatticeMotionModel::Diff,
            "omni" => LatticeMotionModel::Omni,
            _ => LatticeMotionModel::Other(name),
        }
    }
}

impl From<&str> for LatticeMotionModel {
    fn from(name: &str) -> Self {
        LatticeMotionModel::from(name.to_string())
    }
}

impl From<LatticeMotionModel> for String {
    fn from(model: LatticeMotionModel) -> Self {
        model.as_str().to_string()
    }
}

impl fmt::Display for LatticeMotionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Global parameters describing one primitive set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatticeMetadata {
    /// Minimum turning radius the primitives were generated with [m]
    pub min_turning_radius: f64,
    /// Grid resolution the primitives were generated for [m]
    pub grid_resolution: f64,
    pub number_of_headings: u32,
    /// Bucket angles [rad], strictly increasing inside [0, 2*pi)
    pub heading_angles: Vec<f64>,
    pub number_of_trajectories: u32,
    pub motion_model: LatticeMotionModel,
}

impl LatticeMetadata {
    /// Metadata with `number_of_headings` evenly spaced heading buckets starting at 0
    pub fn uniform(
        number_of_headings: u32,
        grid_resolution: f64,
        min_turning_radius: f64,
        motion_model: LatticeMotionModel,
    ) -> Self {
        let step = TWO_PI / number_of_headings.max(1) as f64;
        Self {
            min_turning_radius,
            grid_resolution,
            number_of_headings,
            heading_angles: (0..number_of_headings).map(|i| i as f64 * step).collect(),
            number_of_trajectories: 0,
            motion_model,
        }
    }

    /// Check every invariant that does not depend on the primitives
    pub fn validate(&self) -> Result<(), LatticeError> {
        if self.number_of_headings == 0 || self.heading_angles.is_empty() {
            return Err(Inconsistency::NoHeadings.into());
        }
        if self.heading_angles.len() != self.number_of_headings as usize {
            return Err(Inconsistency::HeadingCountMismatch {
                declared: self.number_of_headings,
                actual: self.heading_angles.len(),
            }
            .into());
        }

        let mut angles = Vec::with_capacity(self.heading_angles.len());
        for (index, &angle) in self.heading_angles.iter().enumerate() {
            let angle = NotNan::new(angle)
                .ok()
                .filter(|a| a.is_finite())
                .ok_or(Inconsistency::NonFiniteHeading { index })?;
            if angle.into_inner() < 0.0 || angle.into_inner() >= TWO_PI {
                return Err(Inconsistency::HeadingOutOfRange {
                    index,
                    angle: angle.into_inner(),
                }
                .into());
            }
            angles.push(angle);
        }
        if let Some((index, _)) = angles
            .iter()
            .tuple_windows()
            .enumerate()
            .find(|(_, (a, b))| a.cmp(b) != Ordering::Less)
        {
            return Err(Inconsistency::UnsortedHeadings { index }.into());
        }

        if !(self.grid_resolution > 0.0 && self.grid_resolution.is_finite()) {
            return Err(Inconsistency::NonPositiveResolution(self.grid_resolution).into());
        }
        if !(self.min_turning_radius >= 0.0 && self.min_turning_radius.is_finite()) {
            return Err(Inconsistency::NegativeTurningRadius(self.min_turning_radius).into());
        }
        if self.min_turning_radius == 0.0 && !self.motion_model.allows_in_place_rotation() {
            return Err(Inconsistency::ZeroRadiusNotAllowed(self.motion_model.to_string()).into());
        }
        Ok(())
    }

    /// Reject neighbouring buckets, including the pair across the wrap from
    /// the last angle back to the first, that are no further apart than
    /// `tolerance`. Assumes [`LatticeMetadata::validate`] passed.
    pub fn check_heading_spacing(&self, tolerance: f64) -> Result<(), LatticeError> {
        let n = self.heading_angles.len();
        if n < 2 {
            return Ok(());
        }
        for index in 0..n {
            let next = (index + 1) % n;
            let gap = wrap_two_pi(self.heading_angles[next] - self.heading_angles[index]);
            if !(gap > tolerance) {
                return Err(Inconsistency::HeadingsTooClose { index, gap }.into());
            }
        }
        Ok(())
    }

    /// Tolerance used when none is configured explicitly
    pub fn default_tolerance(&self) -> f64 {
        DEFAULT_TOLERANCE_FRACTION * self.grid_resolution
    }

    /// Angle of a heading bucket
    pub fn heading_angle(&self, index: usize) -> Option<f64> {
        self.heading_angles.get(index).copied()
    }

    /// Resolve a continuous heading to the nearest bucket within `tolerance` [rad].
    ///
    /// The angle is wrapped into [0, 2*pi) first, so `2*pi - eps` matches the
    /// bucket at 0. Assumes validated (sorted) heading angles.
    pub fn resolve_heading(&self, angle: f64, tolerance: f64) -> Option<usize> {
        let n = self.heading_angles.len();
        if n == 0 || !angle.is_finite() {
            return None;
        }
        let wrapped = wrap_two_pi(angle);
        let upper = self.heading_angles.partition_point(|a| *a < wrapped);
        let candidates = [(upper + n - 1) % n, upper % n];

        candidates
            .iter()
            .map(|&i| (i, angular_distance(self.heading_angles[i], wrapped)))
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
            .filter(|&(_, distance)| distance <= tolerance)
            .map(|(i, _)| i)
    }

    /// Bucket pointing the opposite way (`angle + pi`) of bucket `index`
    pub fn reverse_heading(&self, index: usize, tolerance: f64) -> Option<usize> {
        self.heading_angle(index)
            .and_then(|angle| self.resolve_heading(angle + PI, tolerance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn four_headings() -> LatticeMetadata {
        LatticeMetadata {
            min_turning_radius: 0.5,
            grid_resolution: 0.05,
            number_of_headings: 4,
            heading_angles: vec![0.0, 1.5708, 3.1416, 4.7124],
            number_of_trajectories: 1,
            motion_model: LatticeMotionModel::Ackermann,
        }
    }

    #[test]
    fn test_validate_ok() {
        assert!(four_headings().validate().is_ok());
        assert!(LatticeMetadata::uniform(16, 0.05, 0.4, LatticeMotionModel::Diff)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_validate_heading_count() {
        let mut metadata = four_headings();
        metadata.number_of_headings = 5;
        assert_eq!(
            metadata.validate(),
            Err(LatticeError::Inconsistent(Inconsistency::HeadingCountMismatch {
                declared: 5,
                actual: 4
            }))
        );
    }

    #[test]
    fn test_validate_unsorted_and_duplicate() {
        let mut metadata = four_headings();
        metadata.heading_angles = vec![0.0, 3.1416, 1.5708, 4.7124];
        assert_eq!(
            metadata.validate(),
            Err(LatticeError::Inconsistent(Inconsistency::UnsortedHeadings { index: 1 }))
        );

        metadata.heading_angles = vec![0.0, 1.5708, 1.5708, 4.7124];
        assert_eq!(
            metadata.validate(),
            Err(LatticeError::Inconsistent(Inconsistency::UnsortedHeadings { index: 1 }))
        );
    }

    #[test]
    fn test_validate_range_and_nan() {
        let mut metadata = four_headings();
        metadata.heading_angles[3] = 7.0;
        assert!(matches!(
            metadata.validate(),
            Err(LatticeError::Inconsistent(Inconsistency::HeadingOutOfRange { index: 3, .. }))
        ));

        metadata.heading_angles[3] = f64::NAN;
        assert_eq!(
            metadata.validate(),
            Err(LatticeError::Inconsistent(Inconsistency::NonFiniteHeading { index: 3 }))
        );
    }

    #[test]
    fn test_validate_resolution_and_radius() {
        let mut metadata = four_headings();
        metadata.grid_resolution = 0.0;
        assert!(matches!(
            metadata.validate(),
            Err(LatticeError::Inconsistent(Inconsistency::NonPositiveResolution(_)))
        ));

        let mut metadata = four_headings();
        metadata.min_turning_radius = -0.1;
        assert!(matches!(
            metadata.validate(),
            Err(LatticeError::Inconsistent(Inconsistency::NegativeTurningRadius(_)))
        ));
    }

    #[test]
    fn test_zero_radius_depends_on_motion_model() {
        let mut metadata = four_headings();
        metadata.min_turning_radius = 0.0;
        assert!(matches!(
            metadata.validate(),
            Err(LatticeError::Inconsistent(Inconsistency::ZeroRadiusNotAllowed(_)))
        ));

        metadata.motion_model = LatticeMotionModel::Diff;
        assert!(metadata.validate().is_ok());
    }

    #[test]
    fn test_resolve_heading() {
        let metadata = four_headings();
        let tol = metadata.default_tolerance();
        assert_eq!(metadata.resolve_heading(0.0, tol), Some(0));
        assert_eq!(metadata.resolve_heading(std::f64::consts::FRAC_PI_2, tol), Some(1));
        assert_eq!(metadata.resolve_heading(4.7124, tol), Some(3));
        assert_eq!(metadata.resolve_heading(0.1, tol), None);
        assert_eq!(metadata.resolve_heading(f64::NAN, tol), None);
    }

    #[test]
    fn test_resolve_heading_wraps_around() {
        let metadata = four_headings();
        let tol = metadata.default_tolerance();
        assert_eq!(metadata.resolve_heading(TWO_PI - 0.001, tol), Some(0));
        assert_eq!(metadata.resolve_heading(-0.001, tol), Some(0));
        assert_eq!(metadata.resolve_heading(-PI / 2.0, tol), Some(3));
        assert_eq!(metadata.resolve_heading(TWO_PI + PI, tol), Some(2));
    }

    #[test]
    fn test_reverse_heading() {
        let metadata = LatticeMetadata::uniform(8, 0.05, 0.4, LatticeMotionModel::Ackermann);
        let tol = metadata.default_tolerance();
        assert_eq!(metadata.reverse_heading(0, tol), Some(4));
        assert_eq!(metadata.reverse_heading(5, tol), Some(1));
        assert_eq!(metadata.reverse_heading(8, tol), None);

        let odd = LatticeMetadata::uniform(3, 0.05, 0.4, LatticeMotionModel::Ackermann);
        assert_eq!(odd.reverse_heading(0, odd.default_tolerance()), None);
    }

    #[test]
    fn test_heading_spacing_across_wrap() {
        let metadata = four_headings();
        assert!(metadata.check_heading_spacing(metadata.default_tolerance()).is_ok());

        let mut crowded = four_headings();
        crowded.number_of_headings = 2;
        crowded.heading_angles = vec![0.0, 6.28];
        assert!(crowded.validate().is_ok());
        assert!(matches!(
            crowded.check_heading_spacing(crowded.default_tolerance()),
            Err(LatticeError::Inconsistent(Inconsistency::HeadingsTooClose { index: 1, .. }))
        ));

        let mut close = four_headings();
        close.heading_angles = vec![0.0, 0.004, 3.1416, 4.7124];
        assert!(matches!(
            close.check_heading_spacing(close.default_tolerance()),
            Err(LatticeError::Inconsistent(Inconsistency::HeadingsTooClose { index: 0, .. }))
        ));
    }

    #[test]
    fn test_motion_model_strings() {
        assert_eq!(LatticeMotionModel::from("Ackermann"), LatticeMotionModel::Ackermann);
        assert_eq!(LatticeMotionModel::from("diff"), LatticeMotionModel::Diff);
        assert_eq!(LatticeMotionModel::from("omni").to_string(), "omni");
        assert_eq!(
            LatticeMotionModel::from("legged"),
            LatticeMotionModel::Other("legged".to_string())
        );
        assert!(!LatticeMotionModel::from("legged").is_symmetric());
    }

    #[test]
    fn test_deserialize_metadata() {
        let json = r#"{
            "min_turning_radius": 0.5,
            "grid_resolution": 0.05,
            "number_of_headings": 4,
            "heading_angles": [0.0, 1.5708, 3.1416, 4.7124],
            "number_of_trajectories": 1,
            "motion_model": "ackermann"
        }"#;
        let metadata: LatticeMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(metadata, four_headings());
    }
}
