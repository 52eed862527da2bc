//! Reference scaling laws and sizing scenarios for component mass estimation.
//!
//! Each component mass is predicted from a reference design point through a
//! similarity exponent: motors scale with nominal torque, ESCs with power,
//! propellers with diameter, frames with arm mass. The sizing scenario
//! derives the per-propeller thrust requirements (hover, climb, takeoff) the
//! scaling laws are evaluated at.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Standard gravity (m/s²).
const GRAVITY: f64 = 9.81;

/// Similarity exponent of motor mass with nominal torque.
const MOTOR_MASS_EXPONENT: f64 = 3.0 / 3.5;

/// Reference design point for the scaling laws.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalingReference {
    /// Reference motor mass (kg).
    pub motor_mass: f64,
    /// Reference motor nominal torque (N·m).
    pub motor_torque: f64,
    /// Reference ESC mass (kg).
    pub esc_mass: f64,
    /// Reference ESC corner power (W).
    pub esc_power: f64,
    /// Reference propeller mass (kg).
    pub propeller_mass: f64,
    /// Reference propeller diameter (m).
    pub propeller_diameter: f64,
    /// Reference frame mass (kg).
    pub frame_mass: f64,
    /// Reference total arm mass (kg).
    pub arm_mass: f64,
}

impl Default for ScalingReference {
    fn default() -> Self {
        // Placeholder reference design point for a small multirotor.
        Self {
            motor_mass: 0.0575,
            motor_torque: 0.1,
            esc_mass: 0.0169,
            esc_power: 210.0,
            propeller_mass: 0.0146,
            propeller_diameter: 0.2794,
            frame_mass: 0.347,
            arm_mass: 0.14,
        }
    }
}

impl ScalingReference {
    fn check_positive(&self) -> Result<()> {
        let checks: [(&'static str, f64); 8] = [
            ("reference motor_mass", self.motor_mass),
            ("reference motor_torque", self.motor_torque),
            ("reference esc_mass", self.esc_mass),
            ("reference esc_power", self.esc_power),
            ("reference propeller_mass", self.propeller_mass),
            ("reference propeller_diameter", self.propeller_diameter),
            ("reference frame_mass", self.frame_mass),
            ("reference arm_mass", self.arm_mass),
        ];
        for (name, value) in checks {
            if !(value > 0.0) || !value.is_finite() {
                return Err(Error::InvalidParameter { name, value });
            }
        }
        Ok(())
    }
}

/// Motor mass from nominal torque: `m_ref · (Q / Q_ref)^(3/3.5)`.
pub fn motor_mass(torque: f64, reference: &ScalingReference) -> Result<f64> {
    reference.check_positive()?;
    if !(torque > 0.0) || !torque.is_finite() {
        return Err(Error::InvalidParameter { name: "torque", value: torque });
    }
    Ok(reference.motor_mass * (torque / reference.motor_torque).powf(MOTOR_MASS_EXPONENT))
}

/// ESC mass, linear in corner power.
pub fn esc_mass(power: f64, reference: &ScalingReference) -> Result<f64> {
    reference.check_positive()?;
    if !(power > 0.0) || !power.is_finite() {
        return Err(Error::InvalidParameter { name: "power", value: power });
    }
    Ok(reference.esc_mass * power / reference.esc_power)
}

/// Propeller mass, cubic in diameter.
pub fn propeller_mass(diameter: f64, reference: &ScalingReference) -> Result<f64> {
    reference.check_positive()?;
    if !(diameter > 0.0) || !diameter.is_finite() {
        return Err(Error::InvalidParameter { name: "diameter", value: diameter });
    }
    Ok(reference.propeller_mass * (diameter / reference.propeller_diameter).powi(3))
}

/// Frame mass, linear in total arm mass.
pub fn frame_mass(arm_mass: f64, reference: &ScalingReference) -> Result<f64> {
    reference.check_positive()?;
    if !(arm_mass > 0.0) || !arm_mass.is_finite() {
        return Err(Error::InvalidParameter { name: "arm_mass", value: arm_mass });
    }
    Ok(reference.frame_mass * arm_mass / reference.arm_mass)
}

/// Total mass of hollow tubular arms.
///
/// `d_ratio` is the inner/outer diameter ratio of the tube section.
pub fn arm_mass(
    outer_diameter: f64,
    d_ratio: f64,
    length: f64,
    density: f64,
    arm_count: usize,
) -> Result<f64> {
    let checks: [(&'static str, f64); 3] = [
        ("outer_diameter", outer_diameter),
        ("length", length),
        ("density", density),
    ];
    for (name, value) in checks {
        if !(value > 0.0) || !value.is_finite() {
            return Err(Error::InvalidParameter { name, value });
        }
    }
    if !(0.0..1.0).contains(&d_ratio) {
        return Err(Error::InvalidParameter { name: "d_ratio", value: d_ratio });
    }
    let section = std::f64::consts::PI / 4.0
        * (outer_diameter * outer_diameter - (d_ratio * outer_diameter).powi(2));
    Ok(section * length * density * arm_count as f64)
}

/// Battery mass from the payload mass through a sizing factor.
pub fn battery_mass(payload_mass: f64, k_mb: f64) -> Result<f64> {
    if !(payload_mass > 0.0) || !payload_mass.is_finite() {
        return Err(Error::InvalidParameter { name: "payload_mass", value: payload_mass });
    }
    if !(k_mb > 0.0) || !k_mb.is_finite() {
        return Err(Error::InvalidParameter { name: "k_mb", value: k_mb });
    }
    Ok(k_mb * payload_mass)
}

/// Propeller diameter sized for the takeoff thrust at the tip-speed limit.
pub fn propeller_diameter(
    max_thrust: f64,
    ct_static: f64,
    rho_air: f64,
    nd_max: f64,
    k_nd: f64,
) -> Result<f64> {
    let checks: [(&'static str, f64); 5] = [
        ("max_thrust", max_thrust),
        ("ct_static", ct_static),
        ("rho_air", rho_air),
        ("nd_max", nd_max),
        ("k_nd", k_nd),
    ];
    for (name, value) in checks {
        if !(value > 0.0) || !value.is_finite() {
            return Err(Error::InvalidParameter { name, value });
        }
    }
    Ok((max_thrust / (ct_static * rho_air * (nd_max * k_nd).powi(2))).sqrt())
}

/// Sizing scenario: the flight conditions the thrust requirements derive from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizingScenario {
    /// Payload mass (kg).
    pub payload_mass: f64,
    /// Total-to-payload mass estimation factor `k_M`.
    pub mass_factor: f64,
    /// Propellers per arm (2 for coaxial layouts).
    pub props_per_arm: usize,
    /// Number of arms.
    pub arm_count: usize,
    /// Air density (kg/m³).
    pub air_density: f64,
    /// Airframe drag coefficient in climb.
    pub drag_coefficient: f64,
    /// Projected top surface (m²).
    pub top_surface: f64,
    /// Vertical climb speed (m/s).
    pub climb_speed: f64,
    /// Takeoff-to-hover thrust ratio `k_maxthrust`.
    pub max_thrust_factor: f64,
}

/// Per-propeller thrust requirements derived from a sizing scenario.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrustRequirements {
    /// Hover thrust per propeller (N).
    pub hover: f64,
    /// Climb thrust per propeller (N).
    pub climb: f64,
    /// Maximum (takeoff) thrust per propeller (N).
    pub takeoff: f64,
    /// Total propeller count.
    pub prop_count: usize,
    /// Estimated total mass (kg).
    pub total_mass_estimate: f64,
}

impl SizingScenario {
    /// Derive the per-propeller thrust requirements.
    pub fn thrust_requirements(&self) -> Result<ThrustRequirements> {
        let checks: [(&'static str, f64); 6] = [
            ("payload_mass", self.payload_mass),
            ("mass_factor", self.mass_factor),
            ("air_density", self.air_density),
            ("top_surface", self.top_surface),
            ("climb_speed", self.climb_speed),
            ("max_thrust_factor", self.max_thrust_factor),
        ];
        for (name, value) in checks {
            if !(value > 0.0) || !value.is_finite() {
                return Err(Error::InvalidParameter { name, value });
            }
        }
        if self.drag_coefficient < 0.0 || !self.drag_coefficient.is_finite() {
            return Err(Error::InvalidParameter {
                name: "drag_coefficient",
                value: self.drag_coefficient,
            });
        }
        if self.props_per_arm == 0 || self.arm_count == 0 {
            return Err(Error::InvalidParameter {
                name: "prop_count",
                value: (self.props_per_arm * self.arm_count) as f64,
            });
        }

        let prop_count = self.props_per_arm * self.arm_count;
        let total_mass = self.mass_factor * self.payload_mass;
        let hover = total_mass * GRAVITY / prop_count as f64;
        let climb_drag = 0.5
            * self.air_density
            * self.drag_coefficient
            * self.top_surface
            * self.climb_speed
            * self.climb_speed;
        let climb = (total_mass * GRAVITY + climb_drag) / prop_count as f64;
        let takeoff = hover * self.max_thrust_factor;
        Ok(ThrustRequirements {
            hover,
            climb,
            takeoff,
            prop_count,
            total_mass_estimate: total_mass,
        })
    }
}
