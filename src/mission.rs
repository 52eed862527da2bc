//! Mission definitions: ordered flight phases grouped into routes.
//!
//! A mission file defines named routes (ordered phase lists) and named
//! missions that reference them. Validation is two-pass: serde enforces the
//! shape, then a structural pass checks the same rules the original schema
//! did — the sizing mission and the main route must exist, and every mission
//! part must reference a defined route.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{Error, Result};

/// Name of the mission every definition file must provide.
pub const SIZING_MISSION: &str = "sizing";

/// Name of the route every definition file must provide.
pub const MAIN_ROUTE: &str = "main_route";

/// One flight phase with its numeric attributes (SI units).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    /// Vertical takeoff to the pattern altitude.
    Takeoff {
        /// Altitude at the end of takeoff (m).
        altitude: f64,
    },
    /// Constant-speed climb.
    Climb {
        /// Climb speed (m/s).
        speed: f64,
        /// Target altitude (m).
        to_altitude: f64,
    },
    /// Level cruise over a fixed distance.
    Cruise {
        /// Cruise speed (m/s).
        speed: f64,
        /// Distance covered (m).
        distance: f64,
        /// Cruise altitude (m).
        altitude: f64,
    },
    /// Stationary hover.
    Hover {
        /// Hover duration (s).
        duration: f64,
        /// Hover altitude (m).
        altitude: f64,
    },
}

impl Phase {
    fn validate(&self, route: &str) -> Result<()> {
        let bad = |what: &str, value: f64| {
            Err(Error::Definition(format!(
                "route `{route}`: {what} must be positive and finite, got {value}"
            )))
        };
        match *self {
            Phase::Takeoff { altitude } => {
                if !altitude.is_finite() || altitude < 0.0 {
                    return bad("takeoff altitude", altitude);
                }
            }
            Phase::Climb { speed, to_altitude } => {
                if !(speed > 0.0) || !speed.is_finite() {
                    return bad("climb speed", speed);
                }
                if !to_altitude.is_finite() || to_altitude < 0.0 {
                    return bad("climb target altitude", to_altitude);
                }
            }
            Phase::Cruise {
                speed,
                distance,
                altitude,
            } => {
                if !(speed > 0.0) || !speed.is_finite() {
                    return bad("cruise speed", speed);
                }
                if !(distance > 0.0) || !distance.is_finite() {
                    return bad("cruise distance", distance);
                }
                if !altitude.is_finite() || altitude < 0.0 {
                    return bad("cruise altitude", altitude);
                }
            }
            Phase::Hover { duration, altitude } => {
                if !(duration > 0.0) || !duration.is_finite() {
                    return bad("hover duration", duration);
                }
                if !altitude.is_finite() || altitude < 0.0 {
                    return bad("hover altitude", altitude);
                }
            }
        }
        Ok(())
    }
}

/// An ordered list of flight phases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Phases flown in order.
    pub phases: Vec<Phase>,
}

impl Route {
    /// Total ground distance covered by cruise phases (m).
    pub fn total_distance(&self) -> f64 {
        self.phases
            .iter()
            .map(|p| match *p {
                Phase::Cruise { distance, .. } => distance,
                _ => 0.0,
            })
            .sum()
    }

    /// Total duration of the phases with a defined duration: hover time plus
    /// cruise time derived from distance and speed (s).
    pub fn total_duration(&self) -> f64 {
        self.phases
            .iter()
            .map(|p| match *p {
                Phase::Hover { duration, .. } => duration,
                Phase::Cruise { speed, distance, .. } => distance / speed,
                _ => 0.0,
            })
            .sum()
    }
}

/// A mission as an ordered list of route references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    /// Names of the routes flown, in order.
    pub routes: Vec<String>,
}

/// A complete mission definition file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionDefinition {
    /// Missions by name.
    pub missions: BTreeMap<String, Mission>,
    /// Routes by name.
    pub routes: BTreeMap<String, Route>,
}

impl MissionDefinition {
    /// Parse and validate a mission definition from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let definition: MissionDefinition = toml::from_str(text)?;
        definition.validate()?;
        Ok(definition)
    }

    /// Load and validate a mission definition from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// Second-pass structural validation.
    pub fn validate(&self) -> Result<()> {
        if !self.missions.contains_key(SIZING_MISSION) {
            return Err(Error::Definition(format!(
                "mission definition must declare a `{SIZING_MISSION}` mission"
            )));
        }
        if !self.routes.contains_key(MAIN_ROUTE) {
            return Err(Error::Definition(format!(
                "mission definition must declare a `{MAIN_ROUTE}` route"
            )));
        }
        for (name, route) in &self.routes {
            if route.phases.is_empty() {
                return Err(Error::Definition(format!("route `{name}` has no phases")));
            }
            for phase in &route.phases {
                phase.validate(name)?;
            }
        }
        for (name, mission) in &self.missions {
            if mission.routes.is_empty() {
                return Err(Error::Definition(format!("mission `{name}` has no routes")));
            }
            for route in &mission.routes {
                if !self.routes.contains_key(route) {
                    return Err(Error::Definition(format!(
                        "mission `{name}` references undefined route `{route}`"
                    )));
                }
            }
        }
        Ok(())
    }

    /// The sizing mission's routes, in flight order. Empty when the sizing
    /// mission is absent (a validated definition always has one).
    pub fn sizing_routes(&self) -> Vec<(&str, &Route)> {
        self.missions
            .get(SIZING_MISSION)
            .into_iter()
            .flat_map(|mission| mission.routes.iter())
            .filter_map(|name| self.routes.get(name).map(|r| (name.as_str(), r)))
            .collect()
    }
}
