//! Normal-mode analysis of a crystal Hessian.
//!
//! The modes are the eigenpairs of the mass-weighted Hessian
//! `M⁻¹ H`, where `M` holds each ion's mass (amu) on its three coordinates.
//! That matrix is not symmetric for mixed species, so the decomposition runs
//! on the similar symmetric matrix `M^{-1/2} H M^{-1/2}`; its eigenvectors
//! map back through `M^{-1/2}` and are rescaled to unit length.

use std::f64::consts::PI;

use log::warn;
use nalgebra::DMatrix;

use crate::model::constants::{ATOMIC_MASS, ELEMENTARY_CHARGE};
use crate::model::result::NormalMode;

const EIGEN_EPS: f64 = 1e-14;
const EIGEN_MAX_ITERATIONS: usize = 10_000;

/// Signed frequency (Hz) for a mass-weighted eigenvalue in V/m² per amu.
///
/// Negative curvature yields a negative frequency of the same magnitude.
pub fn eigenvalue_to_frequency(eigenvalue: f64) -> f64 {
    let omega = (eigenvalue.abs() * ELEMENTARY_CHARGE / ATOMIC_MASS).sqrt();
    eigenvalue.signum() * omega / (2.0 * PI)
}

/// Decomposes `hessian` into normal modes ordered by ascending `|eigenvalue|`.
///
/// # Arguments
///
/// * `hessian` — `3N × 3N` Hessian (V/m²)
/// * `masses_amu` — Mass of each of the `N` ions
///
/// # Returns
///
/// `3N` modes. When the Hessian is not finite or the decomposition does not
/// converge, every mode carries NaN eigenvalue, frequency and shape.
pub fn normal_modes(hessian: &DMatrix<f64>, masses_amu: &[f64]) -> Vec<NormalMode> {
    let n_ions = masses_amu.len();
    let dim = 3 * n_ions;
    debug_assert_eq!(hessian.shape(), (dim, dim));

    if !hessian.iter().all(|h| h.is_finite()) {
        warn!("Hessian is not finite; normal modes are undefined");
        return nan_modes(n_ions);
    }

    let inv_sqrt_m: Vec<f64> = (0..dim).map(|i| masses_amu[i / 3].sqrt().recip()).collect();

    let mut s = DMatrix::from_fn(dim, dim, |i, j| {
        hessian[(i, j)] * inv_sqrt_m[i] * inv_sqrt_m[j]
    });
    s = (&s + s.transpose()) * 0.5;

    let Some(eigen) = s.try_symmetric_eigen(EIGEN_EPS, EIGEN_MAX_ITERATIONS) else {
        warn!("eigen-decomposition of the mass-weighted Hessian did not converge");
        return nan_modes(n_ions);
    };

    let mut order: Vec<usize> = (0..dim).collect();
    order.sort_by(|&a, &b| {
        eigen.eigenvalues[a]
            .abs()
            .total_cmp(&eigen.eigenvalues[b].abs())
    });

    order
        .into_iter()
        .map(|k| {
            let eigenvalue = eigen.eigenvalues[k];
            let mut v: Vec<f64> = eigen
                .eigenvectors
                .column(k)
                .iter()
                .zip(&inv_sqrt_m)
                .map(|(u, w)| u * w)
                .collect();
            let norm = v.iter().map(|c| c * c).sum::<f64>().sqrt();
            for c in v.iter_mut() {
                *c /= norm;
            }

            NormalMode {
                eigenvalue,
                frequency: eigenvalue_to_frequency(eigenvalue),
                shape: v.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect(),
            }
        })
        .collect()
}

fn nan_modes(n_ions: usize) -> Vec<NormalMode> {
    (0..3 * n_ions)
        .map(|_| NormalMode {
            eigenvalue: f64::NAN,
            frequency: f64::NAN,
            shape: vec![[f64::NAN; 3]; n_ions],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Curvature (V/m²) that gives `freq` (Hz) for an ion of `mass_amu`.
    fn curvature_for(freq: f64, mass_amu: f64) -> f64 {
        (2.0 * PI * freq).powi(2) * mass_amu * ATOMIC_MASS / ELEMENTARY_CHARGE
    }

    #[test]
    fn frequency_sign_follows_eigenvalue() {
        let f = eigenvalue_to_frequency(curvature_for(1e6, 1.0));
        assert_relative_eq!(f, 1e6, max_relative = 1e-12);
        assert_relative_eq!(
            eigenvalue_to_frequency(-curvature_for(1e6, 1.0)),
            -1e6,
            max_relative = 1e-12
        );
        assert_eq!(eigenvalue_to_frequency(0.0), 0.0);
    }

    #[test]
    fn diagonal_hessian_gives_axis_modes_in_order() {
        let m = 40.0;
        let h = DMatrix::from_diagonal(&nalgebra::DVector::from_vec(vec![
            curvature_for(3e6, m),
            curvature_for(1e6, m),
            curvature_for(2e6, m),
        ]));
        let modes = normal_modes(&h, &[m]);

        let freqs: Vec<f64> = modes.iter().map(|m| m.frequency).collect();
        assert_relative_eq!(freqs[0], 1e6, max_relative = 1e-9);
        assert_relative_eq!(freqs[1], 2e6, max_relative = 1e-9);
        assert_relative_eq!(freqs[2], 3e6, max_relative = 1e-9);
        assert_relative_eq!(modes[0].shape[0][1].abs(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(modes[2].shape[0][0].abs(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn negative_curvature_is_ordered_by_magnitude() {
        let h = DMatrix::from_diagonal(&nalgebra::DVector::from_vec(vec![4.0, -1.0, 2.0]));
        let modes = normal_modes(&h, &[1.0]);
        let eig: Vec<f64> = modes.iter().map(|m| m.eigenvalue).collect();
        assert_relative_eq!(eig[0], -1.0, epsilon = 1e-12);
        assert_relative_eq!(eig[1], 2.0, epsilon = 1e-12);
        assert_relative_eq!(eig[2], 4.0, epsilon = 1e-12);
        assert!(modes[0].is_unstable());
    }

    #[test]
    fn mixed_masses_solve_the_weighted_problem() {
        // Two ions coupled along x only, different masses.
        let (m1, m2) = (9.0, 40.0);
        let (k, c) = (3.0, 1.0);
        let mut h = DMatrix::zeros(6, 6);
        h[(0, 0)] = k + c;
        h[(3, 3)] = k + c;
        h[(0, 3)] = -c;
        h[(3, 0)] = -c;
        for i in [1, 2, 4, 5] {
            h[(i, i)] = 10.0;
        }
        let masses = [m1, m2];
        let modes = normal_modes(&h, &masses);

        let weighted = DMatrix::from_fn(6, 6, |i, j| h[(i, j)] / masses[i / 3]);
        for mode in &modes {
            let v = nalgebra::DVector::from_iterator(6, mode.shape.iter().flatten().copied());
            assert_relative_eq!(v.norm(), 1.0, epsilon = 1e-12);
            let lhs = &weighted * &v;
            let rhs = &v * mode.eigenvalue;
            assert_relative_eq!(lhs, rhs, epsilon = 1e-10);
        }
    }

    #[test]
    fn non_finite_hessian_yields_nan_modes() {
        let mut h = DMatrix::identity(6, 6);
        h[(0, 3)] = f64::INFINITY;
        let modes = normal_modes(&h, &[40.0, 40.0]);
        assert_eq!(modes.len(), 6);
        assert!(modes.iter().all(|m| m.frequency.is_nan()));
        assert!(modes.iter().all(|m| m.shape.len() == 2));
    }
}
