//! The aircraft parameter tree: hierarchical named numeric leaves.
//!
//! Leaves are keyed by colon-separated paths (`data:motor:mass`), carry
//! physical units and a role flag marking whether the value is a solver input
//! or a computed output. The external optimization framework reads and writes
//! these leaves; this crate supplies their initial values and structure.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Error, Result};

/// A scalar or vector numeric leaf value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Single numeric value.
    Scalar(f64),
    /// Ordered numeric values.
    Vector(Vec<f64>),
}

impl ParamValue {
    fn is_finite(&self) -> bool {
        match self {
            ParamValue::Scalar(v) => v.is_finite(),
            ParamValue::Vector(vs) => vs.iter().all(|v| v.is_finite()),
        }
    }
}

/// Whether a leaf is consumed or produced by the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamRole {
    /// Supplied to the solver as an input.
    Input,
    /// Computed by an analysis model.
    Output,
}

/// One leaf of the parameter tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    /// Leaf value.
    pub value: ParamValue,
    /// Physical units, when the quantity is not dimensionless.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    /// Input/output role.
    pub role: ParamRole,
}

/// Hierarchical mapping from colon-separated names to numeric leaves.
///
/// Iteration order is the lexicographic order of the paths, so serialized
/// trees are stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamTree {
    leaves: BTreeMap<String, Param>,
}

impl ParamTree {
    /// Empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a leaf. Non-finite values are rejected.
    pub fn set(&mut self, name: &str, param: Param) -> Result<()> {
        if name.is_empty() {
            return Err(Error::Definition(format!("parameter name must not be empty")));
        }
        if !param.value.is_finite() {
            return Err(Error::Definition(format!(
                "parameter `{name}` has a non-finite value"
            )));
        }
        self.leaves.insert(name.to_string(), param);
        Ok(())
    }

    /// Insert a scalar input leaf.
    pub fn set_input(&mut self, name: &str, value: f64, units: Option<&str>) -> Result<()> {
        self.set(
            name,
            Param {
                value: ParamValue::Scalar(value),
                units: units.map(str::to_string),
                role: ParamRole::Input,
            },
        )
    }

    /// Insert a scalar output leaf.
    pub fn set_output(&mut self, name: &str, value: f64, units: Option<&str>) -> Result<()> {
        self.set(
            name,
            Param {
                value: ParamValue::Scalar(value),
                units: units.map(str::to_string),
                role: ParamRole::Output,
            },
        )
    }

    /// Look up a leaf by full path.
    pub fn get(&self, name: &str) -> Option<&Param> {
        self.leaves.get(name)
    }

    /// Scalar value of a leaf, if it exists and is scalar.
    pub fn scalar(&self, name: &str) -> Option<f64> {
        match self.leaves.get(name)?.value {
            ParamValue::Scalar(v) => Some(v),
            ParamValue::Vector(_) => None,
        }
    }

    /// Whether a leaf with this path exists.
    pub fn contains(&self, name: &str) -> bool {
        self.leaves.contains_key(name)
    }

    /// All leaves in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Param)> {
        self.leaves.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Leaves whose path starts with the given prefix.
    pub fn with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (&'a str, &'a Param)> {
        self.leaves
            .range(prefix.to_string()..)
            .take_while(move |(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.as_str(), v))
    }

    /// Merge another tree into this one; the other tree wins on conflicts.
    pub fn merge(&mut self, other: ParamTree) {
        self.leaves.extend(other.leaves);
    }

    /// Number of leaves.
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// Whether the tree has no leaves.
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Serialize the whole tree as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a tree from JSON, rejecting non-finite values.
    pub fn from_json(json: &str) -> Result<Self> {
        let tree: ParamTree = serde_json::from_str(json)?;
        for (name, param) in tree.iter() {
            if !param.value.is_finite() {
                return Err(Error::Definition(format!(
                    "parameter `{name}` has a non-finite value"
                )));
            }
        }
        Ok(tree)
    }

    /// Load a tree from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get_scalar() {
        let mut tree = ParamTree::new();
        tree.set_input("data:motor:mass", 0.1, Some("kg")).unwrap();
        assert_eq!(tree.scalar("data:motor:mass"), Some(0.1));
        assert_eq!(tree.get("data:motor:mass").unwrap().role, ParamRole::Input);
        assert!(tree.scalar("data:motor:missing").is_none());
    }

    #[test]
    fn test_rejects_non_finite() {
        let mut tree = ParamTree::new();
        assert!(tree.set_input("data:bad", f64::NAN, None).is_err());
        assert!(tree.set_input("data:bad", f64::INFINITY, None).is_err());
        assert!(tree.set_input("", 1.0, None).is_err());
    }

    #[test]
    fn test_prefix_filter() {
        let mut tree = ParamTree::new();
        tree.set_input("data:motor:mass", 0.1, Some("kg")).unwrap();
        tree.set_input("data:motor:reference:mass_ref", 0.2, Some("kg")).unwrap();
        tree.set_output("data:propeller:mass", 0.02, Some("kg")).unwrap();

        let motor: Vec<_> = tree.with_prefix("data:motor:").map(|(k, _)| k).collect();
        assert_eq!(motor, vec!["data:motor:mass", "data:motor:reference:mass_ref"]);
    }

    #[test]
    fn test_merge_right_bias() {
        let mut base = ParamTree::new();
        base.set_input("a:x", 1.0, None).unwrap();
        base.set_input("a:y", 2.0, None).unwrap();
        let mut over = ParamTree::new();
        over.set_input("a:y", 5.0, None).unwrap();
        base.merge(over);
        assert_eq!(base.scalar("a:x"), Some(1.0));
        assert_eq!(base.scalar("a:y"), Some(5.0));
    }

    #[test]
    fn test_json_round_trip() {
        let mut tree = ParamTree::new();
        tree.set_input("specifications:load:mass", 2.0, Some("kg")).unwrap();
        tree.set(
            "data:mission:waypoints",
            Param {
                value: ParamValue::Vector(vec![0.0, 25.0, 25.0]),
                units: Some("m".to_string()),
                role: ParamRole::Input,
            },
        )
        .unwrap();

        let json = tree.to_json().unwrap();
        let back = ParamTree::from_json(&json).unwrap();
        assert_eq!(tree, back);
    }
}
