//! Supported multicopter layouts with their effector mixing matrices and
//! inertia models.
//!
//! Each layout maps individual rotor thrusts to a net body wrench
//! (total thrust, roll moment, pitch moment, yaw moment) and carries its own
//! inertia formula: a central cylindrical body plus motor/propeller groups
//! treated as point masses at the arm radius. Layout selection is an
//! exhaustive match over a closed enumeration; anything else is rejected up
//! front.

use ndarray::{Array2, array};
use std::fmt;

use crate::error::{Error, Result};

/// Yaw moment produced per unit thrust by propeller drag torque.
pub const YAW_MOMENT_RATIO: f64 = 0.1;

/// Radius of the central body, modeled as a solid cylinder (m).
const BODY_RADIUS: f64 = 0.5;

/// Height of the central body cylinder (m).
const BODY_HEIGHT: f64 = 0.25;

/// Mass breakdown used by the inertia model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassBudget {
    /// Total UAV mass (kg).
    pub total: f64,
    /// Mass of one motor (kg).
    pub motor: f64,
    /// Mass of one propeller (kg).
    pub propeller: f64,
}

impl MassBudget {
    /// Mass of the central body once all rotor hardware is subtracted.
    pub fn center_mass(&self, rotor_count: usize) -> Result<f64> {
        let center = self.total - rotor_count as f64 * (self.motor + self.propeller);
        if center <= 0.0 {
            return Err(Error::InvalidParameter {
                name: "center_mass",
                value: center,
            });
        }
        Ok(center)
    }

    /// Combined mass of one motor/propeller group.
    fn rotor_group(&self) -> f64 {
        self.motor + self.propeller
    }
}

/// Diagonal inertia tensor of the airframe (kg·m²).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InertiaDiag {
    /// Roll inertia.
    pub ixx: f64,
    /// Pitch inertia.
    pub iyy: f64,
    /// Yaw inertia.
    pub izz: f64,
}

/// Closed enumeration of the multicopter layouts the controllability routine
/// supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Airframe {
    /// 4 rotors, one per arm, X layout.
    QuadPlain,
    /// 8 rotors on 4 arms, coaxial pairs.
    QuadCoaxial,
    /// 6 rotors, one per arm.
    HexaPlain,
    /// 12 rotors on 6 arms, coaxial pairs.
    HexaCoaxial,
    /// 8 rotors, one per arm.
    OctoPlain,
}

impl Airframe {
    /// Select a layout from a rotor count and coaxial flag.
    ///
    /// Fails with [`Error::UnsupportedConfiguration`] on any pair outside the
    /// supported set, rather than proceeding with an undefined layout.
    pub fn from_layout(rotors: usize, coaxial: bool) -> Result<Self> {
        match (rotors, coaxial) {
            (4, false) => Ok(Airframe::QuadPlain),
            (6, false) => Ok(Airframe::HexaPlain),
            (8, false) => Ok(Airframe::OctoPlain),
            (8, true) => Ok(Airframe::QuadCoaxial),
            (12, true) => Ok(Airframe::HexaCoaxial),
            (rotors, coaxial) => Err(Error::UnsupportedConfiguration { rotors, coaxial }),
        }
    }

    /// Number of individual rotors (coaxial pairs count as two).
    pub fn rotor_count(&self) -> usize {
        match self {
            Airframe::QuadPlain => 4,
            Airframe::QuadCoaxial => 8,
            Airframe::HexaPlain => 6,
            Airframe::HexaCoaxial => 12,
            Airframe::OctoPlain => 8,
        }
    }

    /// Whether rotors are stacked in coaxial pairs.
    pub fn is_coaxial(&self) -> bool {
        matches!(self, Airframe::QuadCoaxial | Airframe::HexaCoaxial)
    }

    /// Effector-to-wrench mixing matrix `Bf` (4 × rotor count).
    ///
    /// Rows: total thrust, roll moment, pitch moment, yaw moment, for unit
    /// thrust on each rotor. `arm_length` is the rotor distance from the
    /// center (m).
    pub fn mixing_matrix(&self, arm_length: f64) -> Array2<f64> {
        let d = arm_length;
        // Lever arms of the diagonal (X layout) and hex arm geometries.
        let s = 2.0_f64.sqrt() * d / 2.0;
        let h = 3.0_f64.sqrt() * d / 2.0;
        let j = YAW_MOMENT_RATIO;
        match self {
            Airframe::QuadPlain => array![
                [1.0, 1.0, 1.0, 1.0],
                [s, -s, -s, s],
                [s, s, -s, -s],
                [j, -j, j, -j],
            ],
            Airframe::QuadCoaxial => array![
                [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
                [s, s, -s, -s, -s, -s, s, s],
                [s, s, s, s, -s, -s, -s, -s],
                [j, -j, j, -j, -j, j, j, -j],
            ],
            Airframe::HexaPlain => array![
                [1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
                [0.0, -h, -h, 0.0, h, h],
                [d, d / 2.0, -d / 2.0, -d, -d / 2.0, d / 2.0],
                [j, -j, j, -j, j, -j],
            ],
            Airframe::HexaCoaxial => array![
                [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
                [0.0, 0.0, -h, -h, -h, -h, 0.0, 0.0, h, h, h, h],
                [
                    d,
                    d,
                    d / 2.0,
                    d / 2.0,
                    -d / 2.0,
                    -d / 2.0,
                    -d,
                    -d,
                    -d / 2.0,
                    -d / 2.0,
                    d / 2.0,
                    d / 2.0
                ],
                [j, -j, -j, j, j, -j, -j, j, j, -j, -j, j],
            ],
            Airframe::OctoPlain => array![
                [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
                [0.0, -s, -d, -s, 0.0, s, d, s],
                [d, s, 0.0, -s, -d, -s, 0.0, s],
                [-j, j, -j, j, -j, j, -j, j],
            ],
        }
    }

    /// Diagonal inertia of the airframe: central cylinder plus rotor groups
    /// as point masses at their layout positions.
    pub fn inertia(&self, masses: &MassBudget, arm_length: f64) -> Result<InertiaDiag> {
        let d = arm_length;
        let s = 2.0_f64.sqrt() * d / 2.0;
        let h = 3.0_f64.sqrt() * d / 2.0;
        let mc = masses.center_mass(self.rotor_count())?;
        let mr = masses.rotor_group();
        // Solid cylinder about a diameter and about its axis.
        let body_diametral =
            mc * BODY_RADIUS * BODY_RADIUS / 4.0 + mc * BODY_HEIGHT * BODY_HEIGHT / 12.0;
        let body_axial = mc * BODY_RADIUS * BODY_RADIUS / 2.0;

        let inertia = match self {
            Airframe::QuadPlain => {
                let ixx = body_diametral + 4.0 * mr * s * s;
                InertiaDiag {
                    ixx,
                    iyy: ixx,
                    izz: body_axial + 4.0 * mr * d * d,
                }
            }
            Airframe::QuadCoaxial => {
                let ixx = body_diametral + 8.0 * mr * s * s;
                InertiaDiag {
                    ixx,
                    iyy: ixx,
                    izz: body_axial + 8.0 * mr * d * d,
                }
            }
            Airframe::HexaPlain => InertiaDiag {
                ixx: body_diametral + 4.0 * mr * h * h,
                iyy: body_diametral + 2.0 * mr * d * d + 4.0 * mr * (d / 2.0) * (d / 2.0),
                izz: body_axial + 8.0 * mr * d * d,
            },
            Airframe::HexaCoaxial => InertiaDiag {
                ixx: body_diametral + 8.0 * mr * h * h,
                iyy: body_diametral + 4.0 * mr * d * d + 8.0 * mr * (d / 2.0) * (d / 2.0),
                izz: body_axial + 12.0 * mr * d * d,
            },
            Airframe::OctoPlain => {
                let ixx = body_diametral + 2.0 * mr * d * d + 4.0 * mr * s * s;
                InertiaDiag {
                    ixx,
                    iyy: ixx,
                    izz: body_axial + 8.0 * mr * d * d,
                }
            }
        };
        Ok(inertia)
    }
}

impl fmt::Display for Airframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Airframe::QuadPlain => "simple quadcopter",
            Airframe::QuadCoaxial => "coaxial quadcopter",
            Airframe::HexaPlain => "simple hexacopter",
            Airframe::HexaCoaxial => "coaxial hexacopter",
            Airframe::OctoPlain => "simple octocopter",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn budget() -> MassBudget {
        MassBudget {
            total: 2.0,
            motor: 0.03,
            propeller: 0.015,
        }
    }

    #[test]
    fn test_layout_selection() {
        assert_eq!(Airframe::from_layout(4, false).unwrap(), Airframe::QuadPlain);
        assert_eq!(Airframe::from_layout(8, true).unwrap(), Airframe::QuadCoaxial);
        assert_eq!(Airframe::from_layout(6, false).unwrap(), Airframe::HexaPlain);
        assert_eq!(Airframe::from_layout(12, true).unwrap(), Airframe::HexaCoaxial);
        assert_eq!(Airframe::from_layout(8, false).unwrap(), Airframe::OctoPlain);
    }

    #[test]
    fn test_unsupported_layouts_rejected() {
        for (rotors, coaxial) in [(3, false), (4, true), (6, true), (12, false), (16, true)] {
            let err = Airframe::from_layout(rotors, coaxial).unwrap_err();
            assert!(matches!(err, Error::UnsupportedConfiguration { .. }));
        }
    }

    #[test]
    fn test_mixing_matrix_shapes() {
        for frame in [
            Airframe::QuadPlain,
            Airframe::QuadCoaxial,
            Airframe::HexaPlain,
            Airframe::HexaCoaxial,
            Airframe::OctoPlain,
        ] {
            let bf = frame.mixing_matrix(0.28);
            assert_eq!(bf.shape(), &[4, frame.rotor_count()]);
        }
    }

    #[test]
    fn test_quad_moments_balance() {
        // Equal thrust on all rotors must produce zero net moment.
        let bf = Airframe::QuadPlain.mixing_matrix(0.28);
        let thrust = ndarray::Array1::ones(4);
        let wrench = bf.dot(&thrust);
        assert_relative_eq!(wrench[0], 4.0);
        assert_relative_eq!(wrench[1], 0.0, epsilon = 1e-12);
        assert_relative_eq!(wrench[2], 0.0, epsilon = 1e-12);
        assert_relative_eq!(wrench[3], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_hexa_coaxial_moments_balance() {
        let bf = Airframe::HexaCoaxial.mixing_matrix(0.35);
        let thrust = ndarray::Array1::ones(12);
        let wrench = bf.dot(&thrust);
        assert_relative_eq!(wrench[0], 12.0);
        assert_relative_eq!(wrench[1], 0.0, epsilon = 1e-12);
        assert_relative_eq!(wrench[2], 0.0, epsilon = 1e-12);
        assert_relative_eq!(wrench[3], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_quad_inertia_symmetry() {
        let inertia = Airframe::QuadPlain.inertia(&budget(), 0.28).unwrap();
        assert_relative_eq!(inertia.ixx, inertia.iyy);
        assert!(inertia.izz > 0.0);
    }

    #[test]
    fn test_center_mass_must_stay_positive() {
        let heavy_rotors = MassBudget {
            total: 1.0,
            motor: 0.2,
            propeller: 0.1,
        };
        let err = Airframe::QuadPlain.inertia(&heavy_rotors, 0.28).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { name: "center_mass", .. }));
    }
}
