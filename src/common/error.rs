//! Error types for lattice_primitives

use thiserror::Error;

/// Invariant violated by a lattice description
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Inconsistency {
    #[error("lattice declares no headings")]
    NoHeadings,
    #[error("number_of_headings is {declared} but {actual} heading angles were given")]
    HeadingCountMismatch { declared: u32, actual: usize },
    #[error("heading angle {index} is not finite")]
    NonFiniteHeading { index: usize },
    #[error("heading angle {index} ({angle}) lies outside [0, 2*pi)")]
    HeadingOutOfRange { index: usize, angle: f64 },
    #[error("heading angles {index} and {} are not strictly increasing", .index + 1)]
    UnsortedHeadings { index: usize },
    #[error("heading angle {index} and the next one are only {gap} rad apart, within the heading tolerance")]
    HeadingsTooClose { index: usize, gap: f64 },
    #[error("grid_resolution must be positive, got {0}")]
    NonPositiveResolution(f64),
    #[error("min_turning_radius must be non-negative, got {0}")]
    NegativeTurningRadius(f64),
    #[error("min_turning_radius of 0 requires in-place rotation, which motion model '{0}' does not allow")]
    ZeroRadiusNotAllowed(String),
    #[error("number_of_trajectories is {declared} but {loaded} primitives were loaded")]
    TrajectoryCountMismatch { declared: u32, loaded: usize },
    #[error("trajectory id {0} is used more than once")]
    DuplicateId(u32),
    #[error("primitive {trajectory_id} has invalid {field} ({value})")]
    InvalidLength {
        trajectory_id: u32,
        field: &'static str,
        value: f64,
    },
    #[error(
        "primitive {trajectory_id} has trajectory_length {trajectory_length} but arc_length + straight_length is {sum}"
    )]
    LengthMismatch {
        trajectory_id: u32,
        trajectory_length: f64,
        sum: f64,
    },
    #[error("primitive {trajectory_id} start_angle {angle} matches no heading bucket")]
    UnknownStartHeading { trajectory_id: u32, angle: f64 },
    #[error("primitive {trajectory_id} end_angle {angle} matches no heading bucket")]
    UnknownEndHeading { trajectory_id: u32, angle: f64 },
    #[error("primitive {trajectory_id} has a non-finite pose at sample {index}")]
    NonFinitePose { trajectory_id: u32, index: usize },
    #[error("primitive {trajectory_id} has no poses")]
    EmptyPoses { trajectory_id: u32 },
    #[error("primitive {trajectory_id} does not start at the origin with heading start_angle")]
    PoseStartMismatch { trajectory_id: u32 },
    #[error("primitive {trajectory_id} does not end with heading end_angle")]
    PoseEndMismatch { trajectory_id: u32 },
    #[error("heading bucket {index} has no opposite bucket for reverse expansion")]
    NoReverseHeading { index: usize },
    #[error("primitive {trajectory_id} has no mirrored counterpart")]
    MissingMirror { trajectory_id: u32 },
}

/// Errors raised while validating and loading a primitive library
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LatticeError {
    /// An invariant of the lattice description does not hold
    #[error("inconsistent lattice: {0}")]
    Inconsistent(#[from] Inconsistency),
    /// A primitive turns tighter than the minimum turning radius allows
    #[error(
        "primitive {trajectory_id} has turning radius {turning_radius} below the minimum of {minimum}"
    )]
    InfeasiblePrimitive {
        trajectory_id: u32,
        turning_radius: f64,
        minimum: f64,
    },
}

/// Errors raised while building configuration values
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A parameter holds a value its consumer cannot work with
    #[error("parameter '{field}' = {value} is out of range: {reason}")]
    OutOfRange {
        field: String,
        value: String,
        reason: &'static str,
    },
    /// A parameter is present but holds the wrong kind of value
    #[error("parameter '{key}' should be {expected}")]
    TypeMismatch { key: String, expected: &'static str },
    /// A parameter document could not be parsed
    #[error("failed to parse parameters: {0}")]
    Parse(String),
}

impl ConfigError {
    pub(crate) fn out_of_range(
        field: impl Into<String>,
        value: impl ToString,
        reason: &'static str,
    ) -> Self {
        ConfigError::OutOfRange {
            field: field.into(),
            value: value.to_string(),
            reason,
        }
    }
}

/// Any failure of planner initialization
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlannerError {
    #[error(transparent)]
    Lattice(#[from] LatticeError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type alias for planner initialization
pub type PlannerResult<T> = Result<T, PlannerError>;
