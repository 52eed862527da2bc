//! Parameter layer and controllability analysis for multirotor UAV design
//! optimization studies.
//!
//! This library provides the inputs an external multidisciplinary design
//! optimization (MDO) framework needs to size a drone, plus the one piece of
//! analysis that lives on this side of the fence:
//! - Optimization problem definitions (design variables, constraints,
//!   objectives) loaded from declarative TOML files
//! - The aircraft parameter tree: named numeric leaves with units, split
//!   between solver inputs and computed outputs
//! - Mission definitions (takeoff, climb, cruise, hover phases)
//! - Reference scaling laws for component mass estimation
//! - A degree-of-controllability (DOC) computation that quantifies how much
//!   control authority a multicopter keeps after its worst single-rotor
//!   failure, following the Klein/Lindberg/Longman discretization method
//!
//! # Features
//!
//! - **Explicit configuration dispatch**: supported multicopter layouts are a
//!   closed enumeration; unsupported rotor/coaxial pairs fail loudly
//! - **Exact enumeration**: the DOC combination search is exhaustive, not
//!   sampled, and deterministic for identical inputs
//! - **Fail fast**: degenerate geometry and singular matrices surface as
//!   descriptive errors instead of NaN results

#![warn(missing_docs)]
#![warn(clippy::doc_markdown)]
#![allow(clippy::useless_format)]

pub mod airframe;
pub mod controllability;
pub mod error;
pub mod linalg;
pub mod mission;
pub mod params;
pub mod problem;
pub mod scaling;

// Re-export key types and functions for easy use
pub use airframe::{Airframe, InertiaDiag, MassBudget};
pub use controllability::{DocInput, DocResult, degree_of_controllability};
pub use error::{Error, Result};
pub use mission::{MissionDefinition, Phase, Route};
pub use params::{Param, ParamRole, ParamTree, ParamValue};
pub use problem::{ConstraintDef, DesignVariable, ObjectiveDef, OptimizationProblem};
pub use scaling::{ScalingReference, SizingScenario, ThrustRequirements};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
