//! Plain key/value parameter snapshot.
//!
//! The planner reads its configuration from a generic parameter store. This
//! module decouples it from any particular store: the caller hands over a
//! snapshot of dotted option names (`"<plugin>.smoother.w_data"`) mapped to
//! values, and typed getters fall back to defaults for absent keys.

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::common::ConfigError;

/// A single parameter value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Bool(bool),
    Integer(i64),
    Double(f64),
    String(String),
}

impl From<bool> for ParameterValue {
    fn from(v: bool) -> Self {
        ParameterValue::Bool(v)
    }
}

impl From<i64> for ParameterValue {
    fn from(v: i64) -> Self {
        ParameterValue::Integer(v)
    }
}

impl From<i32> for ParameterValue {
    fn from(v: i32) -> Self {
        ParameterValue::Integer(i64::from(v))
    }
}

impl From<f64> for ParameterValue {
    fn from(v: f64) -> Self {
        ParameterValue::Double(v)
    }
}

impl From<&str> for ParameterValue {
    fn from(v: &str) -> Self {
        ParameterValue::String(v.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(v: String) -> Self {
        ParameterValue::String(v)
    }
}

/// Snapshot of a parameter store, keyed by fully qualified option name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSnapshot {
    values: BTreeMap<String, ParameterValue>,
}

impl ParameterSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a YAML parameter document.
    ///
    /// Nested mappings are flattened into dotted keys, so
    /// `planner: {smoother: {w_data: 0.1}}` yields `planner.smoother.w_data`.
    /// Sequences and nulls are skipped.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let root: Value = serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))?;
        let mut snapshot = Self::new();
        match root {
            Value::Mapping(_) => flatten_into(&mut snapshot, String::new(), &root)?,
            Value::Null => {}
            _ => {
                return Err(ConfigError::Parse(
                    "top level of a parameter document must be a mapping".to_string(),
                ))
            }
        }
        Ok(snapshot)
    }

    /// Set a value, replacing any previous one
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ParameterValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Builder-style [`ParameterSnapshot::set`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParameterValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&ParameterValue> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Floating point parameter; integers are widened
    pub fn f64_or(&self, key: &str, default: f64) -> Result<f64, ConfigError> {
        match self.values.get(key) {
            None => {
                debug!("[Params] {} not set, using default {}", key, default);
                Ok(default)
            }
            Some(ParameterValue::Double(v)) => Ok(*v),
            Some(ParameterValue::Integer(v)) => Ok(*v as f64),
            Some(_) => Err(type_mismatch(key, "a number")),
        }
    }

    pub fn i64_or(&self, key: &str, default: i64) -> Result<i64, ConfigError> {
        match self.values.get(key) {
            None => {
                debug!("[Params] {} not set, using default {}", key, default);
                Ok(default)
            }
            Some(ParameterValue::Integer(v)) => Ok(*v),
            Some(_) => Err(type_mismatch(key, "an integer")),
        }
    }

    pub fn bool_or(&self, key: &str, default: bool) -> Result<bool, ConfigError> {
        match self.values.get(key) {
            None => {
                debug!("[Params] {} not set, using default {}", key, default);
                Ok(default)
            }
            Some(ParameterValue::Bool(v)) => Ok(*v),
            Some(_) => Err(type_mismatch(key, "a boolean")),
        }
    }

    pub fn string_or(&self, key: &str, default: &str) -> Result<String, ConfigError> {
        match self.values.get(key) {
            None => {
                debug!("[Params] {} not set, using default '{}'", key, default);
                Ok(default.to_string())
            }
            Some(ParameterValue::String(v)) => Ok(v.clone()),
            Some(_) => Err(type_mismatch(key, "a string")),
        }
    }
}

impl<K, V> std::iter::FromIterator<(K, V)> for ParameterSnapshot
where
    K: Into<String>,
    V: Into<ParameterValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for (key, value) in iter {
            snapshot.set(key, value);
        }
        snapshot
    }
}

/// Join a plugin name and a field into a fully qualified key
pub fn qualified(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}

fn type_mismatch(key: &str, expected: &'static str) -> ConfigError {
    ConfigError::TypeMismatch {
        key: key.to_string(),
        expected,
    }
}

fn flatten_into(
    snapshot: &mut ParameterSnapshot,
    prefix: String,
    value: &Value,
) -> Result<(), ConfigError> {
    match value {
        Value::Mapping(map) => {
            for (k, v) in map {
                let key = match k {
                    Value::String(s) => s.clone(),
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    _ => {
                        return Err(ConfigError::Parse(format!(
                            "unsupported key under '{}'",
                            prefix
                        )))
                    }
                };
                flatten_into(snapshot, qualified(&prefix, &key), v)?;
            }
        }
        Value::Bool(b) => snapshot.set(prefix, *b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                snapshot.set(prefix, i);
            } else if let Some(f) = n.as_f64() {
                snapshot.set(prefix, f);
            } else {
                return Err(ConfigError::Parse(format!("'{}' is out of range", prefix)));
            }
        }
        Value::String(s) => snapshot.set(prefix, s.as_str()),
        Value::Tagged(tagged) => flatten_into(snapshot, prefix, &tagged.value)?,
        Value::Null | Value::Sequence(_) => {
            debug!("[Params] skipping non-scalar parameter '{}'", prefix);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_absent_keys() {
        let snapshot = ParameterSnapshot::new();
        assert_eq!(snapshot.f64_or("a", 0.5).unwrap(), 0.5);
        assert_eq!(snapshot.i64_or("b", 3).unwrap(), 3);
        assert!(snapshot.bool_or("c", true).unwrap());
        assert_eq!(snapshot.string_or("d", "x").unwrap(), "x");
    }

    #[test]
    fn test_integer_widens_to_double() {
        let snapshot = ParameterSnapshot::new().with("a", 2);
        assert_eq!(snapshot.f64_or("a", 0.5).unwrap(), 2.0);
    }

    #[test]
    fn test_type_mismatch() {
        let snapshot = ParameterSnapshot::new().with("a", "fast").with("b", 1.5);
        let err = snapshot.f64_or("a", 0.5).unwrap_err();
        assert!(matches!(err, ConfigError::TypeMismatch { ref key, .. } if key == "a"));
        assert!(snapshot.i64_or("b", 1).is_err());
        assert!(snapshot.bool_or("b", false).is_err());
    }

    #[test]
    fn test_from_yaml_flattens_nested_mappings() {
        let yaml = r#"
planner:
  reverse_penalty: 2.5
  allow_reverse_expansion: true
  lattice_filepath: "lattices/diff_0.05.json"
  smoother:
    max_iterations: 200
    w_data: 0.1
  ignored_list: [1, 2]
"#;
        let snapshot = ParameterSnapshot::from_yaml_str(yaml).unwrap();
        assert_eq!(snapshot.f64_or("planner.reverse_penalty", 0.0).unwrap(), 2.5);
        assert!(snapshot.bool_or("planner.allow_reverse_expansion", false).unwrap());
        assert_eq!(
            snapshot.string_or("planner.lattice_filepath", "").unwrap(),
            "lattices/diff_0.05.json"
        );
        assert_eq!(snapshot.i64_or("planner.smoother.max_iterations", 0).unwrap(), 200);
        assert_eq!(snapshot.f64_or("planner.smoother.w_data", 0.0).unwrap(), 0.1);
        assert!(!snapshot.contains("planner.ignored_list"));
        assert_eq!(snapshot.len(), 5);
    }

    #[test]
    fn test_from_yaml_rejects_scalar_document() {
        assert!(matches!(
            ParameterSnapshot::from_yaml_str("42"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_deserialize_flat_json() {
        let snapshot: ParameterSnapshot =
            serde_json::from_str(r#"{"a.b": 1, "a.c": 0.5, "a.d": false, "a.e": "x"}"#).unwrap();
        assert_eq!(snapshot.get("a.b"), Some(&ParameterValue::Integer(1)));
        assert_eq!(snapshot.get("a.c"), Some(&ParameterValue::Double(0.5)));
        assert_eq!(snapshot.get("a.d"), Some(&ParameterValue::Bool(false)));
        assert_eq!(snapshot.get("a.e"), Some(&ParameterValue::String("x".to_string())));
    }

    #[test]
    fn test_collect_and_qualified() {
        let snapshot: ParameterSnapshot = vec![("p.x", 1.0), ("p.y", 2.0)].into_iter().collect();
        assert_eq!(snapshot.keys().collect::<Vec<_>>(), vec!["p.x", "p.y"]);
        assert_eq!(qualified("p", "x"), "p.x");
        assert_eq!(qualified("", "x"), "x");
    }
}
