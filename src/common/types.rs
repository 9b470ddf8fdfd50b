//! Common types used throughout lattice_primitives

use std::ops::Sub;

use nalgebra::{Rotation2, Vector2, Vector3};
use serde::{Deserialize, Serialize};

use super::angles::wrap_two_pi;

/// 2D point representation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    pub fn distance(&self, other: &Point2D) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn to_vector(&self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }
}

impl From<Vector2<f64>> for Point2D {
    fn from(v: Vector2<f64>) -> Self {
        Self { x: v[0], y: v[1] }
    }
}

/// 2D pose (position + orientation) sampled along a motion primitive.
///
/// `theta` is in radians. The canonical convention is [0, 2*pi), see
/// [`Pose2D::normalized`]; subtraction is plain componentwise so that deltas
/// between consecutive samples keep their sign.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose2D {
    pub x: f64,
    pub y: f64,
    pub theta: f64,
}

impl Pose2D {
    pub fn new(x: f64, y: f64, theta: f64) -> Self {
        Self { x, y, theta }
    }

    pub fn origin() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            theta: 0.0,
        }
    }

    pub fn position(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }

    pub fn to_vector(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.theta)
    }

    /// Same pose with heading wrapped to [0, 2*pi)
    pub fn normalized(&self) -> Self {
        Self {
            theta: wrap_two_pi(self.theta),
            ..*self
        }
    }

    /// Rotate the pose about the origin by `angle`
    pub fn rotated(&self, angle: f64) -> Self {
        let p = Rotation2::new(angle) * self.position().to_vector();
        Self::new(p.x, p.y, wrap_two_pi(self.theta + angle))
    }

    /// Reflect the pose across the line through the origin with direction `axis`.
    ///
    /// Lateral offsets from the axis change sign and the heading becomes
    /// `2 * axis - theta`.
    pub fn reflected(&self, axis: f64) -> Self {
        let to_axis = Rotation2::new(-axis);
        let local = to_axis * self.position().to_vector();
        let mirrored = to_axis.inverse() * Vector2::new(local.x, -local.y);
        Self::new(mirrored.x, mirrored.y, wrap_two_pi(2.0 * axis - self.theta))
    }
}

impl Sub for Pose2D {
    type Output = Pose2D;

    fn sub(self, other: Pose2D) -> Pose2D {
        Pose2D::new(self.x - other.x, self.y - other.y, self.theta - other.theta)
    }
}

impl From<Vector3<f64>> for Pose2D {
    fn from(v: Vector3<f64>) -> Self {
        Self {
            x: v[0],
            y: v[1],
            theta: v[2],
        }
    }
}

impl From<(f64, f64, f64)> for Pose2D {
    fn from(tuple: (f64, f64, f64)) -> Self {
        Self::new(tuple.0, tuple.1, tuple.2)
    }
}
