//! Degree-of-controllability (DOC) computation for multicopter layouts.
//!
//! Given a multicopter layout, thrust limits, geometry and masses, this
//! module computes a scalar margin for how much control authority remains
//! after the worst-case single-rotor failure, following the discretized
//! linear-system method of Klein, Lindberg and Longman ("Computation of a
//! Degree of Controllability via System Discretization").
//!
//! The linearized rigid-body model is an 8-state double integrator (heave,
//! roll, pitch, yaw and their rates). The model is discretized over the time
//! horizon with the matrix exponential, every single-rotor failure is
//! injected as a fresh thrust-bound mask, and the margin is the minimum
//! signed distance between the reachable-input polytope boundary and the
//! gravity trim point over every hyperplane segment of the polytope.
//!
//! The hyperplane-segment search enumerates all `C(N·m, 7)` combinations of
//! discretized effector actions exactly, with no sampling or pruning. This
//! scales combinatorially with rotor count and step count and is intended for
//! small, fixed configurations (up to 12 rotors and a handful of steps).

use ndarray::{Array1, Array2, Axis, concatenate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::airframe::{Airframe, MassBudget};
use crate::error::{Error, Result};
use crate::linalg::{expm, expm_integral, inverse, matrix_power, null_direction, pinv};

/// Standard gravity (m/s²).
pub const GRAVITY: f64 = 9.81;

/// Dimension of the linearized rigid-body state.
const STATE_DIM: usize = 8;

/// Inputs to the DOC computation. All physical quantities are SI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DocInput {
    /// Number of individual rotors.
    pub rotors: usize,
    /// Whether rotors are stacked in coaxial pairs.
    pub coaxial: bool,
    /// Maximum thrust per rotor (N).
    pub max_thrust: f64,
    /// Arm length from center to rotor axis (m).
    pub arm_length: f64,
    /// Total UAV mass (kg).
    pub uav_mass: f64,
    /// Mass of one motor (kg).
    pub motor_mass: f64,
    /// Mass of one propeller (kg).
    pub propeller_mass: f64,
    /// Time horizon of the discretized model (s).
    pub horizon: f64,
    /// Number of discretization steps over the horizon.
    pub steps: usize,
}

impl DocInput {
    /// Reject non-positive physical parameters at entry.
    pub fn validate(&self) -> Result<()> {
        let checks: [(&'static str, f64); 6] = [
            ("max_thrust", self.max_thrust),
            ("arm_length", self.arm_length),
            ("uav_mass", self.uav_mass),
            ("motor_mass", self.motor_mass),
            ("propeller_mass", self.propeller_mass),
            ("horizon", self.horizon),
        ];
        for (name, value) in checks {
            if !(value > 0.0) || !value.is_finite() {
                return Err(Error::InvalidParameter { name, value });
            }
        }
        if self.steps == 0 {
            return Err(Error::InvalidParameter {
                name: "steps",
                value: self.steps as f64,
            });
        }
        Ok(())
    }
}

/// Outcome of the DOC computation.
#[derive(Debug, Clone, PartialEq)]
pub struct DocResult {
    /// Overall degree of controllability: the minimum margin over all
    /// single-rotor failures.
    pub doc: f64,
    /// Margin for each single-rotor failure, indexed by rotor.
    pub per_rotor: Vec<f64>,
}

impl DocResult {
    /// Index of the rotor whose failure produced the worst margin.
    pub fn worst_rotor(&self) -> usize {
        self.per_rotor
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(i, _)| i)
            .unwrap_or(0)
    }
}

/// Compute the degree of controllability under worst-case single-rotor
/// failure.
///
/// Returns the overall scalar DOC and the per-rotor-failure margin vector
/// (one entry per individual rotor, including coaxial partners). The
/// computation is deterministic and side-effect-free.
pub fn degree_of_controllability(input: &DocInput) -> Result<DocResult> {
    input.validate()?;
    let airframe = Airframe::from_layout(input.rotors, input.coaxial)?;
    let masses = MassBudget {
        total: input.uav_mass,
        motor: input.motor_mass,
        propeller: input.propeller_mass,
    };
    let bf = airframe.mixing_matrix(input.arm_length);
    let inertia = airframe.inertia(&masses, input.arm_length)?;
    let rotor_count = airframe.rotor_count();
    info!(%airframe, rotors = rotor_count, "computing degree of controllability");

    let reachability = discretize(input, &bf, &inertia)?;

    // Thrust required to trim gravity, distributed over the rotors.
    let gravity_wrench = {
        let mut w = Array1::<f64>::zeros(4);
        w[0] = -input.uav_mass * GRAVITY;
        w
    };
    let trim = pinv(&bf)?.dot(&gravity_wrench);

    let actions = input.steps * rotor_count;
    if actions < STATE_DIM {
        return Err(Error::Definition(format!(
            "hyperplane search needs at least {STATE_DIM} discretized effector actions \
             (rotors × steps), got {actions}"
        )));
    }

    let mut per_rotor = Vec::with_capacity(rotor_count);
    for failed in 0..rotor_count {
        debug!(rotor = failed + 1, total = rotor_count, "injecting rotor failure");
        // Fresh active-rotor mask per scenario; the failed rotor keeps its
        // zero lower bound and loses its upper bound.
        let mut active = Array1::<f64>::ones(rotor_count);
        active[failed] = 0.0;
        let lower = trim.clone();
        let upper = active.mapv(|a| a * input.max_thrust) + &trim;
        let center = tile(&((&lower + &upper) / 2.0), input.steps);
        let half_width = tile(&((&upper - &lower) / 2.0), input.steps);

        let margin = min_hyperplane_margin(&reachability, &center, &half_width)?;
        debug!(rotor = failed + 1, margin, "failure margin");
        per_rotor.push(margin);
    }

    let doc = per_rotor.iter().copied().fold(f64::INFINITY, f64::min);
    info!(doc, "worst-case single-rotor margin");
    Ok(DocResult { doc, per_rotor })
}

/// Discretized reachability map `K` (state dim × steps·rotors): the effect of
/// each effector action over the horizon, referred back to the initial state.
fn discretize(input: &DocInput, bf: &Array2<f64>, inertia: &crate::airframe::InertiaDiag) -> Result<Array2<f64>> {
    let n = input.steps;
    let dt = input.horizon / n as f64;

    // Double-integrator state matrix: rates feed positions, inputs feed rates.
    let mut a = Array2::<f64>::zeros((STATE_DIM, STATE_DIM));
    for i in 0..4 {
        a[[i, i + 4]] = 1.0;
    }
    let mut b_i = Array2::<f64>::zeros((STATE_DIM, 4));
    b_i[[4, 0]] = 1.0 / input.uav_mass;
    b_i[[5, 1]] = 1.0 / inertia.ixx;
    b_i[[6, 2]] = 1.0 / inertia.iyy;
    b_i[[7, 3]] = 1.0 / inertia.izz;
    let b = b_i.dot(bf);

    // One-step transition and input maps.
    let g = expm(&a.mapv(|x| x * dt))?;
    let h = g.dot(&expm_integral(&a.mapv(|x| -x), dt)?).dot(&b);

    // F = [G^(N-1) H | G^(N-2) H | ... | H]
    let blocks: Vec<Array2<f64>> = (0..n).map(|i| matrix_power(&g, n - 1 - i).dot(&h)).collect();
    let views: Vec<_> = blocks.iter().map(|m| m.view()).collect();
    let f = concatenate(Axis(1), &views)
        .map_err(|e| Error::Singular(format!("reachability assembly failed: {e}")))?;

    let gn_inv = inverse(&matrix_power(&g, n))?;
    Ok(gn_inv.dot(&f).mapv(|x| -x))
}

/// Minimum signed distance between the reachable polytope boundary and the
/// trim point, over every hyperplane segment of the polytope.
///
/// Each segment is spanned by `STATE_DIM - 1` effector-action columns of `k`;
/// the margin along the segment's normal is the reachable half-extent of the
/// remaining actions minus the offset of the required point.
fn min_hyperplane_margin(
    k: &Array2<f64>,
    center: &Array1<f64>,
    half_width: &Array1<f64>,
) -> Result<f64> {
    let actions = k.ncols();
    let span = STATE_DIM - 1;
    let xp = k.dot(center);

    let mut min_margin = f64::INFINITY;
    let mut k1t = Array2::<f64>::zeros((span, STATE_DIM));
    for combo in Combinations::new(actions, span) {
        for (row, &col) in combo.iter().enumerate() {
            k1t.row_mut(row).assign(&k.column(col));
        }
        let xi = null_direction(&k1t)?;

        // Reachable half-extent along xi from the actions outside the span.
        let mut extent = 0.0;
        for col in 0..actions {
            if combo.binary_search(&col).is_err() {
                extent += xi.dot(&k.column(col)).abs() * half_width[col];
            }
        }
        let offset = xi.dot(&xp).abs();
        let margin = extent - offset;
        if !margin.is_finite() {
            return Err(Error::Singular(format!(
                "non-finite hyperplane margin for effector actions {combo:?}"
            )));
        }
        if margin < min_margin {
            min_margin = margin;
        }
    }
    Ok(min_margin)
}

/// Replicate a per-step vector across all discretization steps.
fn tile(v: &Array1<f64>, n: usize) -> Array1<f64> {
    Array1::from_iter((0..n).flat_map(|_| v.iter().copied()))
}

/// Lexicographic enumeration of all k-element index combinations out of n.
struct Combinations {
    n: usize,
    indices: Vec<usize>,
    first: bool,
}

impl Combinations {
    fn new(n: usize, k: usize) -> Self {
        Combinations {
            n,
            indices: (0..k).collect(),
            first: true,
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        let k = self.indices.len();
        if k > self.n {
            return None;
        }
        if self.first {
            self.first = false;
            return Some(self.indices.clone());
        }
        // Advance the rightmost index that still has room.
        let mut i = k;
        loop {
            if i == 0 {
                return None;
            }
            i -= 1;
            if self.indices[i] != i + self.n - k {
                break;
            }
        }
        self.indices[i] += 1;
        for j in i + 1..k {
            self.indices[j] = self.indices[j - 1] + 1;
        }
        Some(self.indices.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn quad_input() -> DocInput {
        DocInput {
            rotors: 4,
            coaxial: false,
            max_thrust: 6.0,
            arm_length: 0.28,
            uav_mass: 2.0,
            motor_mass: 0.1,
            propeller_mass: 0.02,
            horizon: 0.5,
            steps: 2,
        }
    }

    #[test]
    fn test_combinations_count_and_order() {
        let combos: Vec<_> = Combinations::new(5, 3).collect();
        assert_eq!(combos.len(), 10); // C(5,3)
        assert_eq!(combos[0], vec![0, 1, 2]);
        assert_eq!(combos[9], vec![2, 3, 4]);
        // Strictly increasing within each combination.
        for c in &combos {
            assert!(c.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_combinations_degenerate_cases() {
        assert_eq!(Combinations::new(3, 3).count(), 1);
        assert_eq!(Combinations::new(2, 3).count(), 0);
    }

    #[test]
    fn test_tile_replicates_in_order() {
        let v = Array1::from_vec(vec![1.0, 2.0]);
        let t = tile(&v, 3);
        assert_eq!(t.to_vec(), vec![1.0, 2.0, 1.0, 2.0, 1.0, 2.0]);
    }

    #[test]
    fn test_input_validation_rejects_nonpositive() {
        let mut input = quad_input();
        input.max_thrust = 0.0;
        assert!(matches!(
            input.validate(),
            Err(Error::InvalidParameter { name: "max_thrust", .. })
        ));

        let mut input = quad_input();
        input.steps = 0;
        assert!(matches!(
            input.validate(),
            Err(Error::InvalidParameter { name: "steps", .. })
        ));

        let mut input = quad_input();
        input.arm_length = -0.28;
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_quad_doc_is_finite_and_minimal() {
        let result = degree_of_controllability(&quad_input()).unwrap();
        assert_eq!(result.per_rotor.len(), 4);
        assert!(result.doc.is_finite());
        let min = result.per_rotor.iter().copied().fold(f64::INFINITY, f64::min);
        assert_relative_eq!(result.doc, min);
    }

    #[test]
    fn test_quad_symmetry() {
        // All four rotors of an X quad are related by airframe symmetry, so
        // their failure margins must agree to numerical tolerance.
        let result = degree_of_controllability(&quad_input()).unwrap();
        for &margin in &result.per_rotor[1..] {
            assert_relative_eq!(margin, result.per_rotor[0], epsilon = 1e-9, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_unsupported_layout_fails_fast() {
        let mut input = quad_input();
        input.rotors = 5;
        let err = degree_of_controllability(&input).unwrap_err();
        assert!(matches!(err, Error::UnsupportedConfiguration { rotors: 5, coaxial: false }));
    }

    #[test]
    fn test_worst_rotor_points_at_minimum() {
        let result = DocResult {
            doc: -1.0,
            per_rotor: vec![0.5, -1.0, 0.2, 0.4],
        };
        assert_eq!(result.worst_rotor(), 1);
    }
}
