//! Search properties and penalties

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::common::ConfigError;
use crate::config::{defaults, qualified, ParameterSnapshot};
use crate::path_planning::lattice::{LatticeMetadata, LoadOptions};

/// Penalty coefficients and search switches shared by the cost model and the
/// search engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchInfo {
    /// Minimum turning radius [m]; overwritten by the lattice's own value
    #[serde(default = "defaults::minimum_turning_radius")]
    pub minimum_turning_radius: f64,
    /// Added to every turning primitive
    #[serde(default = "defaults::non_straight_penalty")]
    pub non_straight_penalty: f64,
    /// Added when the turn direction changes
    #[serde(default = "defaults::change_penalty")]
    pub change_penalty: f64,
    /// Added when the travel direction flips
    #[serde(default = "defaults::reverse_penalty")]
    pub reverse_penalty: f64,
    /// Scales the obstacle cost supplied by the costmap
    #[serde(default = "defaults::cost_penalty")]
    pub cost_penalty: f64,
    /// How often the search engine tries an analytic expansion
    #[serde(default = "defaults::analytic_expansion_ratio")]
    pub analytic_expansion_ratio: f64,
    /// Longest analytic expansion the search engine accepts [m]
    #[serde(default = "defaults::analytic_expansion_max_length")]
    pub analytic_expansion_max_length: f64,
    /// Lattice description handed to the external parser
    #[serde(default)]
    pub lattice_filepath: String,
    #[serde(default)]
    pub cache_obstacle_heuristic: bool,
    #[serde(default)]
    pub allow_reverse_expansion: bool,
}

impl Default for SearchInfo {
    fn default() -> Self {
        Self {
            minimum_turning_radius: defaults::minimum_turning_radius(),
            non_straight_penalty: defaults::non_straight_penalty(),
            change_penalty: defaults::change_penalty(),
            reverse_penalty: defaults::reverse_penalty(),
            cost_penalty: defaults::cost_penalty(),
            analytic_expansion_ratio: defaults::analytic_expansion_ratio(),
            analytic_expansion_max_length: defaults::analytic_expansion_max_length(),
            lattice_filepath: String::new(),
            cache_obstacle_heuristic: false,
            allow_reverse_expansion: false,
        }
    }
}

impl SearchInfo {
    /// Read `<plugin>.<field>` for every field, falling back to defaults
    pub fn from_snapshot(snapshot: &ParameterSnapshot, plugin: &str) -> Result<Self, ConfigError> {
        let key = |field: &str| qualified(plugin, field);
        let info = Self {
            minimum_turning_radius: snapshot.f64_or(
                &key("minimum_turning_radius"),
                defaults::minimum_turning_radius(),
            )?,
            non_straight_penalty: snapshot
                .f64_or(&key("non_straight_penalty"), defaults::non_straight_penalty())?,
            change_penalty: snapshot.f64_or(&key("change_penalty"), defaults::change_penalty())?,
            reverse_penalty: snapshot
                .f64_or(&key("reverse_penalty"), defaults::reverse_penalty())?,
            cost_penalty: snapshot.f64_or(&key("cost_penalty"), defaults::cost_penalty())?,
            analytic_expansion_ratio: snapshot.f64_or(
                &key("analytic_expansion_ratio"),
                defaults::analytic_expansion_ratio(),
            )?,
            analytic_expansion_max_length: snapshot.f64_or(
                &key("analytic_expansion_max_length"),
                defaults::analytic_expansion_max_length(),
            )?,
            lattice_filepath: snapshot.string_or(&key("lattice_filepath"), "")?,
            cache_obstacle_heuristic: snapshot.bool_or(&key("cache_obstacle_heuristic"), false)?,
            allow_reverse_expansion: snapshot.bool_or(&key("allow_reverse_expansion"), false)?,
        };
        info.validate()?;
        Ok(info)
    }

    /// All numeric fields must be finite and non-negative
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("minimum_turning_radius", self.minimum_turning_radius),
            ("non_straight_penalty", self.non_straight_penalty),
            ("change_penalty", self.change_penalty),
            ("reverse_penalty", self.reverse_penalty),
            ("cost_penalty", self.cost_penalty),
            ("analytic_expansion_ratio", self.analytic_expansion_ratio),
            ("analytic_expansion_max_length", self.analytic_expansion_max_length),
        ];
        for &(field, value) in fields.iter() {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(ConfigError::out_of_range(
                    field,
                    value,
                    "must be finite and non-negative",
                ));
            }
        }
        Ok(())
    }

    /// Take the minimum turning radius from a loaded lattice
    pub fn adopt_lattice(&mut self, metadata: &LatticeMetadata) {
        if (self.minimum_turning_radius - metadata.min_turning_radius).abs() > f64::EPSILON {
            info!(
                "[Search] minimum_turning_radius {:.3} m replaced by lattice value {:.3} m",
                self.minimum_turning_radius, metadata.min_turning_radius
            );
        }
        self.minimum_turning_radius = metadata.min_turning_radius;
        if self.analytic_expansion_max_length < 4.0 * self.minimum_turning_radius {
            warn!(
                "[Search] analytic_expansion_max_length {:.3} m is shorter than a full turn at radius {:.3} m; \
                 analytic expansions will rarely succeed",
                self.analytic_expansion_max_length, self.minimum_turning_radius
            );
        }
    }

    /// Lattice load options matching these search settings
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            allow_reverse_expansion: self.allow_reverse_expansion,
            ..LoadOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path_planning::lattice::LatticeMotionModel;

    #[test]
    fn test_defaults_from_empty_snapshot() {
        let info = SearchInfo::from_snapshot(&ParameterSnapshot::new(), "planner").unwrap();
        assert_eq!(info, SearchInfo::default());
        assert_eq!(info.non_straight_penalty, 1.05);
        assert_eq!(info.reverse_penalty, 2.0);
        assert!(!info.allow_reverse_expansion);
        assert!(info.lattice_filepath.is_empty());
    }

    #[test]
    fn test_values_from_snapshot() {
        let snapshot = ParameterSnapshot::new()
            .with("planner.reverse_penalty", 3)
            .with("planner.change_penalty", 0.2)
            .with("planner.allow_reverse_expansion", true)
            .with("planner.lattice_filepath", "lattices/ackermann.json")
            .with("other.cost_penalty", 9.0);
        let info = SearchInfo::from_snapshot(&snapshot, "planner").unwrap();
        assert_eq!(info.reverse_penalty, 3.0);
        assert_eq!(info.change_penalty, 0.2);
        assert!(info.allow_reverse_expansion);
        assert_eq!(info.lattice_filepath, "lattices/ackermann.json");
        assert_eq!(info.cost_penalty, 2.0);
        assert!(info.load_options().allow_reverse_expansion);
    }

    #[test]
    fn test_negative_penalty_is_out_of_range() {
        let snapshot = ParameterSnapshot::new().with("planner.reverse_penalty", -1.0);
        assert!(matches!(
            SearchInfo::from_snapshot(&snapshot, "planner"),
            Err(ConfigError::OutOfRange { ref field, .. }) if field == "reverse_penalty"
        ));
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let snapshot = ParameterSnapshot::new().with("planner.allow_reverse_expansion", "yes");
        assert!(matches!(
            SearchInfo::from_snapshot(&snapshot, "planner"),
            Err(ConfigError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_adopt_lattice() {
        let mut info = SearchInfo::default();
        let metadata = LatticeMetadata::uniform(16, 0.05, 0.5, LatticeMotionModel::Ackermann);
        info.adopt_lattice(&metadata);
        assert_eq!(info.minimum_turning_radius, 0.5);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let info: SearchInfo =
            serde_json::from_str(r#"{"cost_penalty": 1.5, "allow_reverse_expansion": true}"#)
                .unwrap();
        assert_eq!(info.cost_penalty, 1.5);
        assert!(info.allow_reverse_expansion);
        assert_eq!(info.analytic_expansion_ratio, 3.5);
        assert!(info.validate().is_ok());
    }
}
