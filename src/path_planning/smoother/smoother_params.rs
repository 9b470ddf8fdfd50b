//! Smoother parameters
//!
//! The smoother itself is external. This module only produces a validated set
//! of parameters for it: a convergence tolerance, an iteration cap and the two
//! weights of the gradient-descent objective.

use std::convert::TryFrom;

use serde::{Deserialize, Serialize};

use crate::common::ConfigError;
use crate::config::{defaults, qualified, ParameterSnapshot};

/// Validated smoother configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSmootherParams")]
pub struct SmootherParams {
    tolerance: f64,
    max_its: usize,
    w_data: f64,
    w_smooth: f64,
    holonomic: bool,
    do_refinement: bool,
}

/// Unchecked field set, as it appears in a parameter document
#[derive(Debug, Clone, Deserialize)]
struct RawSmootherParams {
    #[serde(default = "defaults::smoother_tolerance")]
    tolerance: f64,
    #[serde(default = "defaults::smoother_max_iterations", alias = "max_iterations")]
    max_its: usize,
    #[serde(default = "defaults::w_data")]
    w_data: f64,
    #[serde(default = "defaults::w_smooth")]
    w_smooth: f64,
    #[serde(default)]
    holonomic: bool,
    #[serde(default = "defaults::enabled")]
    do_refinement: bool,
}

impl TryFrom<RawSmootherParams> for SmootherParams {
    type Error = ConfigError;

    fn try_from(raw: RawSmootherParams) -> Result<Self, Self::Error> {
        Ok(SmootherParams::new(
            raw.tolerance,
            raw.max_its,
            raw.w_data,
            raw.w_smooth,
            raw.do_refinement,
        )?
        .with_holonomic(raw.holonomic))
    }
}

impl Default for SmootherParams {
    fn default() -> Self {
        Self {
            tolerance: defaults::smoother_tolerance(),
            max_its: defaults::smoother_max_iterations(),
            w_data: defaults::w_data(),
            w_smooth: defaults::w_smooth(),
            holonomic: false,
            do_refinement: defaults::enabled(),
        }
    }
}

impl SmootherParams {
    /// Validate and build a parameter set.
    ///
    /// Both weights may be zero individually, but not together: the smoother
    /// would have no gradient to follow.
    pub fn new(
        tolerance: f64,
        max_its: usize,
        w_data: f64,
        w_smooth: f64,
        do_refinement: bool,
    ) -> Result<Self, ConfigError> {
        if !(tolerance > 0.0 && tolerance.is_finite()) {
            return Err(ConfigError::out_of_range(
                "tolerance",
                tolerance,
                "must be positive and finite",
            ));
        }
        if max_its == 0 {
            return Err(ConfigError::out_of_range(
                "max_its",
                max_its,
                "must be greater than zero",
            ));
        }
        for &(field, weight) in [("w_data", w_data), ("w_smooth", w_smooth)].iter() {
            if !(weight >= 0.0 && weight.is_finite()) {
                return Err(ConfigError::out_of_range(
                    field,
                    weight,
                    "must be finite and non-negative",
                ));
            }
        }
        if w_data == 0.0 && w_smooth == 0.0 {
            return Err(ConfigError::out_of_range(
                "w_data + w_smooth",
                0.0,
                "weights must not both be zero",
            ));
        }

        Ok(Self {
            tolerance,
            max_its,
            w_data,
            w_smooth,
            holonomic: false,
            do_refinement,
        })
    }

    /// Set whether the smoothed path may ignore heading continuity
    pub fn with_holonomic(mut self, holonomic: bool) -> Self {
        self.holonomic = holonomic;
        self
    }

    /// Read `<plugin>.smoother.<field>`, falling back to defaults
    pub fn from_snapshot(snapshot: &ParameterSnapshot, plugin: &str) -> Result<Self, ConfigError> {
        let prefix = qualified(plugin, "smoother");
        let key = |field: &str| qualified(&prefix, field);

        let max_iterations = snapshot.i64_or(
            &key("max_iterations"),
            defaults::smoother_max_iterations() as i64,
        )?;
        if max_iterations <= 0 {
            return Err(ConfigError::out_of_range(
                "max_iterations",
                max_iterations,
                "must be greater than zero",
            ));
        }

        Self::new(
            snapshot.f64_or(&key("tolerance"), defaults::smoother_tolerance())?,
            max_iterations as usize,
            snapshot.f64_or(&key("w_data"), defaults::w_data())?,
            snapshot.f64_or(&key("w_smooth"), defaults::w_smooth())?,
            snapshot.bool_or(&key("do_refinement"), defaults::enabled())?,
        )
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn max_its(&self) -> usize {
        self.max_its
    }

    pub fn w_data(&self) -> f64 {
        self.w_data
    }

    pub fn w_smooth(&self) -> f64 {
        self.w_smooth
    }

    pub fn holonomic(&self) -> bool {
        self.holonomic
    }

    pub fn do_refinement(&self) -> bool {
        self.do_refinement
    }
}
