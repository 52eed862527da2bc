//! Small dense-matrix helpers on top of `ndarray`/`ndarray-linalg`.
//!
//! The controllability routine needs a handful of operations LAPACK does not
//! expose directly: the matrix exponential and its definite integral over a
//! step interval, a pseudo-inverse, and the orthogonal direction to a set of
//! column vectors. All of them are built here on 8×8-scale matrices, so
//! series summation to machine precision is both exact enough and cheap.

use ndarray::{Array1, Array2};
use ndarray_linalg::{Inverse, SVD};

use crate::error::{Error, Result};

/// Hard cap on series terms before declaring non-convergence.
const SERIES_MAX_TERMS: usize = 128;

/// Relative cutoff for treating a singular value as zero.
const SV_RCOND: f64 = 1e-12;

/// Identity matrix shortcut.
fn eye(n: usize) -> Array2<f64> {
    Array2::eye(n)
}

/// Max absolute column sum (induced 1-norm).
fn norm_1(a: &Array2<f64>) -> f64 {
    let mut max = 0.0_f64;
    for col in a.columns() {
        let sum: f64 = col.iter().map(|x| x.abs()).sum();
        max = max.max(sum);
    }
    max
}

/// Matrix exponential `exp(A)` by scaling-and-squaring over a Taylor series
/// summed to machine-precision convergence.
///
/// The state matrices used by the controllability routine are nilpotent, so
/// the series terminates exactly; the general convergence test keeps the
/// helper honest for any other input.
pub fn expm(a: &Array2<f64>) -> Result<Array2<f64>> {
    if a.nrows() != a.ncols() {
        return Err(Error::Singular(format!(
            "matrix exponential requires a square matrix, got {}x{}",
            a.nrows(),
            a.ncols()
        )));
    }
    let n = a.nrows();
    let norm = norm_1(a);
    // Scale so the series argument has norm below 1/2.
    let squarings = if norm > 0.5 {
        (norm / 0.5).log2().ceil() as u32
    } else {
        0
    };
    let scaled = a.mapv(|x| x / f64::powi(2.0, squarings as i32));

    let mut result = eye(n);
    let mut term = eye(n);
    let mut converged = false;
    for k in 1..=SERIES_MAX_TERMS {
        term = term.dot(&scaled).mapv(|x| x / k as f64);
        result = result + &term;
        if norm_1(&term) <= f64::EPSILON * norm_1(&result) {
            converged = true;
            break;
        }
    }
    if !converged {
        return Err(Error::Singular(format!(
            "matrix exponential series did not converge within {SERIES_MAX_TERMS} terms"
        )));
    }
    for _ in 0..squarings {
        result = result.dot(&result);
    }
    if result.iter().any(|x| !x.is_finite()) {
        return Err(Error::Singular(format!(
            "matrix exponential produced non-finite entries"
        )));
    }
    Ok(result)
}

/// Definite integral of the matrix exponential over one step interval:
/// `∫₀^dt exp(Aτ) dτ = Σ_k Aᵏ dtᵏ⁺¹ / (k+1)!`.
pub fn expm_integral(a: &Array2<f64>, dt: f64) -> Result<Array2<f64>> {
    if a.nrows() != a.ncols() {
        return Err(Error::Singular(format!(
            "matrix exponential integral requires a square matrix, got {}x{}",
            a.nrows(),
            a.ncols()
        )));
    }
    let n = a.nrows();
    let mut term = eye(n).mapv(|x| x * dt);
    let mut result = term.clone();
    let mut converged = false;
    for k in 1..=SERIES_MAX_TERMS {
        term = term.dot(a).mapv(|x| x * dt / (k + 1) as f64);
        result = result + &term;
        if norm_1(&term) <= f64::EPSILON * norm_1(&result) {
            converged = true;
            break;
        }
    }
    if !converged {
        return Err(Error::Singular(format!(
            "matrix exponential integral did not converge within {SERIES_MAX_TERMS} terms"
        )));
    }
    Ok(result)
}

/// Integer matrix power by repeated multiplication.
pub fn matrix_power(a: &Array2<f64>, k: usize) -> Array2<f64> {
    let mut result = eye(a.nrows());
    for _ in 0..k {
        result = result.dot(a);
    }
    result
}

/// Matrix inverse with a descriptive error on singular input.
pub fn inverse(a: &Array2<f64>) -> Result<Array2<f64>> {
    let inv = a.inv()?;
    if inv.iter().any(|x| !x.is_finite()) {
        return Err(Error::Singular(format!(
            "inverse of a {}x{} matrix produced non-finite entries",
            a.nrows(),
            a.ncols()
        )));
    }
    Ok(inv)
}

/// Moore-Penrose pseudo-inverse via SVD with relative cutoff.
pub fn pinv(a: &Array2<f64>) -> Result<Array2<f64>> {
    let (m, n) = (a.nrows(), a.ncols());
    let (u, sigma, vt) = a.svd(true, true)?;
    let u = u.ok_or_else(|| Error::Singular(format!("SVD returned no left vectors")))?;
    let vt = vt.ok_or_else(|| Error::Singular(format!("SVD returned no right vectors")))?;

    let smax = sigma.iter().cloned().fold(0.0_f64, f64::max);
    if smax <= 0.0 {
        return Err(Error::Singular(format!(
            "pseudo-inverse of an all-zero {m}x{n} matrix"
        )));
    }
    let cutoff = smax * SV_RCOND * m.max(n) as f64;
    let mut sigma_inv = Array2::<f64>::zeros((n, m));
    for (i, &s) in sigma.iter().enumerate() {
        if s > cutoff {
            sigma_inv[[i, i]] = 1.0 / s;
        }
    }
    Ok(vt.t().dot(&sigma_inv).dot(&u.t()))
}

/// Unit vector orthogonal to the row space of `a` (which must be wide):
/// the right singular vector of the smallest singular value.
pub fn null_direction(a: &Array2<f64>) -> Result<Array1<f64>> {
    if a.nrows() >= a.ncols() {
        return Err(Error::Singular(format!(
            "null direction requires a wide matrix, got {}x{}",
            a.nrows(),
            a.ncols()
        )));
    }
    let (_, _, vt) = a.svd(false, true)?;
    let vt = vt.ok_or_else(|| Error::Singular(format!("SVD returned no right vectors")))?;
    let xi = vt.row(vt.nrows() - 1).to_owned();
    let norm = xi.dot(&xi).sqrt();
    if !norm.is_finite() || norm < 1e-12 {
        return Err(Error::Singular(format!(
            "degenerate null-space direction (norm = {norm})"
        )));
    }
    Ok(xi.mapv(|x| x / norm))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_expm_of_zero_is_identity() {
        let z = Array2::<f64>::zeros((4, 4));
        let e = expm(&z).unwrap();
        for i in 0..4 {
            for j in 0..4 {
                assert_relative_eq!(e[[i, j]], if i == j { 1.0 } else { 0.0 });
            }
        }
    }

    #[test]
    fn test_expm_nilpotent_is_exact() {
        // A double integrator: exp(A t) = I + A t exactly.
        let t = 0.37;
        let a = array![[0.0, 1.0], [0.0, 0.0]];
        let e = expm(&a.mapv(|x| x * t)).unwrap();
        assert_relative_eq!(e[[0, 0]], 1.0, epsilon = 1e-14);
        assert_relative_eq!(e[[0, 1]], t, epsilon = 1e-14);
        assert_relative_eq!(e[[1, 0]], 0.0, epsilon = 1e-14);
        assert_relative_eq!(e[[1, 1]], 1.0, epsilon = 1e-14);
    }

    #[test]
    fn test_expm_scalar_case() {
        let a = array![[0.7]];
        let e = expm(&a).unwrap();
        assert_relative_eq!(e[[0, 0]], 0.7_f64.exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_expm_integral_of_zero() {
        // ∫ I dτ over [0, dt] = I dt.
        let z = Array2::<f64>::zeros((3, 3));
        let int = expm_integral(&z, 0.25).unwrap();
        assert_relative_eq!(int[[0, 0]], 0.25);
        assert_relative_eq!(int[[0, 1]], 0.0);
    }

    #[test]
    fn test_expm_integral_scalar_case() {
        // ∫ exp(aτ) dτ = (exp(a dt) - 1) / a.
        let a = array![[-0.9]];
        let dt = 0.5;
        let int = expm_integral(&a, dt).unwrap();
        assert_relative_eq!(int[[0, 0]], ((-0.9 * dt).exp() - 1.0) / -0.9, epsilon = 1e-12);
    }

    #[test]
    fn test_matrix_power() {
        let a = array![[1.0, 1.0], [0.0, 1.0]];
        let p = matrix_power(&a, 5);
        assert_relative_eq!(p[[0, 1]], 5.0);
        assert_relative_eq!(p[[0, 0]], 1.0);
    }

    #[test]
    fn test_pinv_recovers_inverse_for_square_full_rank() {
        let a = array![[2.0, 0.0], [0.0, 4.0]];
        let p = pinv(&a).unwrap();
        assert_relative_eq!(p[[0, 0]], 0.5, epsilon = 1e-12);
        assert_relative_eq!(p[[1, 1]], 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_pinv_wide_matrix_right_inverse() {
        let a = array![[1.0, 0.0, 1.0], [0.0, 1.0, -1.0]];
        let p = pinv(&a).unwrap();
        let prod = a.dot(&p);
        assert_relative_eq!(prod[[0, 0]], 1.0, epsilon = 1e-10);
        assert_relative_eq!(prod[[1, 1]], 1.0, epsilon = 1e-10);
        assert_relative_eq!(prod[[0, 1]], 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_pinv_rejects_zero_matrix() {
        let z = Array2::<f64>::zeros((2, 3));
        assert!(matches!(pinv(&z), Err(Error::Singular(_))));
    }

    #[test]
    fn test_null_direction_is_orthogonal_and_unit() {
        let a = array![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let xi = null_direction(&a).unwrap();
        assert_relative_eq!(xi.dot(&xi).sqrt(), 1.0, epsilon = 1e-12);
        for row in a.rows() {
            assert_relative_eq!(row.dot(&xi), 0.0, epsilon = 1e-12);
        }
    }
}
