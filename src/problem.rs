//! Declarative optimization problem definitions.
//!
//! A problem file names the design variables (with bounds and optional
//! scaling factors), the constrained output quantities and the objectives the
//! external optimization driver should use. Definitions are validated
//! structurally on load and wired against a parameter tree before being
//! handed to the solver.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::params::{ParamRole, ParamTree, ParamValue};

/// A named parameter the optimizer is allowed to vary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignVariable {
    /// Parameter tree path of the variable.
    pub name: String,
    /// Lower bound.
    pub lower: f64,
    /// Upper bound.
    pub upper: f64,
    /// Optional scaling factor for optimizer conditioning.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaler: Option<f64>,
}

/// A named output quantity with at least one bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintDef {
    /// Parameter tree path of the constrained quantity.
    pub name: String,
    /// Lower bound, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower: Option<f64>,
    /// Upper bound, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<f64>,
}

/// A named output quantity to minimize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveDef {
    /// Parameter tree path of the objective quantity.
    pub name: String,
    /// Scaling factor for optimizer conditioning.
    #[serde(default = "default_scaler")]
    pub scaler: f64,
}

fn default_scaler() -> f64 {
    1.0
}

/// A complete optimization problem definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationProblem {
    /// Human-readable problem name.
    pub name: String,
    /// Design variables the driver may vary.
    #[serde(rename = "design_variable", default)]
    pub design_variables: Vec<DesignVariable>,
    /// Constrained outputs.
    #[serde(rename = "constraint", default)]
    pub constraints: Vec<ConstraintDef>,
    /// Objectives to minimize.
    #[serde(rename = "objective", default)]
    pub objectives: Vec<ObjectiveDef>,
}

impl OptimizationProblem {
    /// Parse and validate a problem definition from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let problem: OptimizationProblem = toml::from_str(text)?;
        problem.validate()?;
        Ok(problem)
    }

    /// Load and validate a problem definition from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// Structural validation: names, bound ordering, bound presence.
    pub fn validate(&self) -> Result<()> {
        if self.objectives.is_empty() {
            return Err(Error::Definition(format!(
                "problem `{}` defines no objective",
                self.name
            )));
        }
        let mut seen = std::collections::BTreeSet::new();
        for dv in &self.design_variables {
            if dv.name.is_empty() {
                return Err(Error::Definition(format!("design variable with empty name")));
            }
            if !seen.insert(dv.name.as_str()) {
                return Err(Error::Definition(format!(
                    "duplicate design variable `{}`",
                    dv.name
                )));
            }
            if !(dv.lower <= dv.upper) {
                return Err(Error::Definition(format!(
                    "design variable `{}` has lower bound {} above upper bound {}",
                    dv.name, dv.lower, dv.upper
                )));
            }
            if let Some(scaler) = dv.scaler {
                if scaler == 0.0 || !scaler.is_finite() {
                    return Err(Error::Definition(format!(
                        "design variable `{}` has invalid scaler {scaler}",
                        dv.name
                    )));
                }
            }
        }
        for c in &self.constraints {
            if c.lower.is_none() && c.upper.is_none() {
                return Err(Error::Definition(format!(
                    "constraint `{}` carries no bound",
                    c.name
                )));
            }
            if let (Some(lo), Some(hi)) = (c.lower, c.upper) {
                if lo > hi {
                    return Err(Error::Definition(format!(
                        "constraint `{}` has lower bound {lo} above upper bound {hi}",
                        c.name
                    )));
                }
            }
        }
        for obj in &self.objectives {
            if obj.scaler == 0.0 || !obj.scaler.is_finite() {
                return Err(Error::Definition(format!(
                    "objective `{}` has invalid scaler {}",
                    obj.name, obj.scaler
                )));
            }
        }
        Ok(())
    }

    /// Check every named quantity against a parameter tree: design variables
    /// must be scalar input leaves with an initial value inside their bounds;
    /// constraints and objectives must be output leaves.
    pub fn wire(&self, tree: &ParamTree) -> Result<()> {
        for dv in &self.design_variables {
            let param = tree.get(&dv.name).ok_or_else(|| {
                Error::Definition(format!(
                    "design variable `{}` has no parameter tree leaf",
                    dv.name
                ))
            })?;
            if param.role != ParamRole::Input {
                return Err(Error::Definition(format!(
                    "design variable `{}` maps to an output leaf",
                    dv.name
                )));
            }
            let value = match param.value {
                ParamValue::Scalar(v) => v,
                ParamValue::Vector(_) => {
                    return Err(Error::Definition(format!(
                        "design variable `{}` maps to a vector leaf",
                        dv.name
                    )));
                }
            };
            if value < dv.lower || value > dv.upper {
                return Err(Error::Definition(format!(
                    "design variable `{}` starts at {value}, outside [{}, {}]",
                    dv.name, dv.lower, dv.upper
                )));
            }
        }
        for name in self
            .constraints
            .iter()
            .map(|c| c.name.as_str())
            .chain(self.objectives.iter().map(|o| o.name.as_str()))
        {
            let param = tree.get(name).ok_or_else(|| {
                Error::Definition(format!("output quantity `{name}` has no parameter tree leaf"))
            })?;
            if param.role != ParamRole::Output {
                return Err(Error::Definition(format!(
                    "output quantity `{name}` maps to an input leaf"
                )));
            }
        }
        Ok(())
    }
}
