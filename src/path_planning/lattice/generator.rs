//! Primitive generator
//!
//! Builds arc-then-straight primitives and small uniform lattices. The
//! planner itself always loads lattices produced by an external generator;
//! this module exists for demonstrations and for building test fixtures with
//! geometry that actually agrees with the declared lengths and headings.

use crate::common::angles::normalize_angle;
use crate::common::Pose2D;

use super::metadata::{LatticeMetadata, LatticeMotionModel};
use super::motion_primitive::MotionPrimitive;

/// Uniform lattice generator configuration
#[derive(Debug, Clone)]
pub struct PrimitiveGeneratorConfig {
    /// Number of heading buckets, evenly spaced from 0
    pub number_of_headings: u32,
    /// Grid resolution [m]
    pub grid_resolution: f64,
    /// Turning radius of every arc [m]
    pub turning_radius: f64,
    /// Length of the straight primitives [m]
    pub straight_length: f64,
    /// Distance between pose samples [m]
    pub sample_spacing: f64,
    pub motion_model: LatticeMotionModel,
}

impl Default for PrimitiveGeneratorConfig {
    fn default() -> Self {
        Self {
            number_of_headings: 8,
            grid_resolution: 0.05,
            turning_radius: 0.5,
            straight_length: 0.15,
            sample_spacing: 0.025,
            motion_model: LatticeMotionModel::Ackermann,
        }
    }
}

/// Build a primitive that turns from `start_angle` to `end_angle` on a circle of
/// `turning_radius`, then drives `straight_length` along `end_angle`.
///
/// The shorter rotation decides the turn direction. Equal angles give a pure
/// straight primitive with a turning radius of 0.
pub fn arc_primitive(
    trajectory_id: u32,
    start_angle: f64,
    end_angle: f64,
    turning_radius: f64,
    straight_length: f64,
    sample_spacing: f64,
) -> MotionPrimitive {
    let delta = normalize_angle(end_angle - start_angle);
    let is_turn = delta.abs() > 1e-12;
    let left_turn = delta > 0.0;
    let radius = if is_turn { turning_radius } else { 0.0 };
    let arc_length = radius * delta.abs();
    let spacing = sample_spacing.max(1e-6);

    let mut local = vec![Pose2D::origin()];

    if arc_length > 0.0 {
        let steps = (arc_length / spacing).ceil().max(1.0) as usize;
        let side = if left_turn { 1.0 } else { -1.0 };
        for i in 1..=steps {
            let phi = delta.abs() * i as f64 / steps as f64;
            local.push(Pose2D::new(
                radius * phi.sin(),
                side * radius * (1.0 - phi.cos()),
                side * phi,
            ));
        }
    }

    if straight_length > 0.0 {
        let steps = (straight_length / spacing).ceil().max(1.0) as usize;
        let from = *local.last().unwrap_or(&Pose2D::origin());
        for i in 1..=steps {
            let s = straight_length * i as f64 / steps as f64;
            local.push(Pose2D::new(
                from.x + s * from.theta.cos(),
                from.y + s * from.theta.sin(),
                from.theta,
            ));
        }
    }

    MotionPrimitive {
        trajectory_id,
        start_angle,
        end_angle,
        turning_radius: radius,
        trajectory_length: arc_length + straight_length,
        arc_length,
        straight_length,
        left_turn: is_turn && left_turn,
        poses: local.iter().map(|p| p.rotated(start_angle)).collect(),
    }
}

/// Generate a lattice with, per heading, one straight primitive plus one left
/// and one right turn into the neighbouring heading buckets.
pub fn generate_uniform_lattice(
    config: &PrimitiveGeneratorConfig,
) -> (LatticeMetadata, Vec<MotionPrimitive>) {
    let mut metadata = LatticeMetadata::uniform(
        config.number_of_headings,
        config.grid_resolution,
        config.turning_radius,
        config.motion_model.clone(),
    );
    let n = metadata.heading_angles.len();
    let mut primitives = Vec::with_capacity(3 * n);

    for h in 0..n {
        let start = metadata.heading_angles[h];

        let id = primitives.len() as u32;
        primitives.push(arc_primitive(
            id,
            start,
            start,
            config.turning_radius,
            config.straight_length,
            config.sample_spacing,
        ));
        if n < 3 {
            continue;
        }
        for &target in &[(h + 1) % n, (h + n - 1) % n] {
            let id = primitives.len() as u32;
            primitives.push(arc_primitive(
                id,
                start,
                metadata.heading_angles[target],
                config.turning_radius,
                0.0,
                config.sample_spacing,
            ));
        }
    }

    metadata.number_of_trajectories = primitives.len() as u32;
    (metadata, primitives)
}
