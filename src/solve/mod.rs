//! Equilibrium search and normal-mode analysis of an ion crystal.
//!
//! [`mode_solver`] is the single entry point: it minimises the total energy
//! (external potential plus Coulomb repulsion) from a seed configuration,
//! assembles the Hessian at the equilibrium found, and decomposes it into
//! normal modes.
//!
//! # Failure reporting
//!
//! Only malformed input is an [`Error`]. Non-convergence, divergent energies
//! from coincident ions and saddle points all come back as a
//! [`ModeSolverResult`] whose diagnostics, finiteness and mode signs tell the
//! caller what happened.

pub mod config;
pub mod coulomb;
mod error;
pub mod hessian;
pub mod minimize;
pub mod modes;
pub mod potential;

pub use config::{MinimizeOptions, ReportOptions, Settings};
pub use error::Error;
pub use potential::{
    CubicTerm, HarmonicTrap, LinearField, Potential, QuarticTerm, SecularFrequencies,
};

use std::cmp::Ordering;

use log::{info, warn};

use crate::model::ion::Ion;
use crate::model::result::ModeSolverResult;
use coulomb::{coulomb_gradient, coulomb_potential};
use hessian::crystal_hessian;
use minimize::minimize;
use modes::normal_modes;

/// A 3×3 block of a Hessian, indexed `[i][j]` over x, y, z.
pub type Block = [[f64; 3]; 3];

/// One `(min, max)` pair per axis, applied to every ion alike (m).
pub type AxisBounds = [(f64, f64); 3];

/// Total crystal energy (V): external potential summed over ions plus Coulomb.
pub fn total_energy(potential: &Potential, x: &[[f64; 3]], masses_amu: &[f64]) -> f64 {
    potential.potential(x, masses_amu) + coulomb_potential(x)
}

/// Gradient of [`total_energy`], flattened ion-major (V/m).
pub fn total_gradient(potential: &Potential, x: &[[f64; 3]], masses_amu: &[f64]) -> Vec<f64> {
    let external = potential.gradient(x, masses_amu);
    let coulomb = coulomb_gradient(x);
    external
        .iter()
        .zip(&coulomb)
        .flat_map(|(e, c)| [e[0] + c[0], e[1] + c[1], e[2] + c[2]])
        .collect()
}

/// Finds the equilibrium of `ions` in `potential` and its normal modes.
///
/// # Arguments
///
/// * `potential` — External potential acting on every ion
/// * `ions` — Ion list; its order fixes the order of every per-ion output
/// * `x0` — Seed positions, one per ion (m)
/// * `bounds` — Optional per-axis box replicated to every ion
/// * `options` — Minimiser budgets and tolerances
///
/// # Returns
///
/// The solved crystal. The result is returned even when the minimiser did
/// not converge; inspect [`ModeSolverResult::diagnostics`].
///
/// # Errors
///
/// Returns an error when the ion list is empty, when `x0` does not hold one
/// position per ion, or when a bound pair is reversed or NaN.
///
/// # Examples
///
/// ```
/// use trapmodes::{
///     HarmonicTrap, MinimizeOptions, Potential, SecularFrequencies, Species, init_crystal,
///     mode_solver,
/// };
///
/// let ca = Species::Ca40.ion();
/// let trap = Potential::from(HarmonicTrap::new(SecularFrequencies::from_mhz(1.0, 1.1, 3.0), &ca));
/// let x0 = init_crystal([0.0; 3], 5e-6, 2);
///
/// let result = mode_solver(&trap, &[ca, ca], &x0, None, &MinimizeOptions::default()).unwrap();
/// assert!(result.diagnostics.success);
/// assert_eq!(result.modes.len(), 6);
/// ```
pub fn mode_solver(
    potential: &Potential,
    ions: &[Ion],
    x0: &[[f64; 3]],
    bounds: Option<&AxisBounds>,
    options: &MinimizeOptions,
) -> Result<ModeSolverResult, Error> {
    if ions.is_empty() {
        return Err(Error::EmptyCrystal);
    }
    if x0.len() != ions.len() {
        return Err(Error::PositionCountMismatch {
            ions: ions.len(),
            positions: x0.len(),
        });
    }
    if let Some(bounds) = bounds {
        validate_bounds(bounds)?;
    }

    let masses: Vec<f64> = ions.iter().map(|ion| ion.mass_amu).collect();
    let replicated: Option<Vec<(f64, f64)>> =
        bounds.map(|b| (0..ions.len()).flat_map(|_| b.iter().copied()).collect());

    let objective = |flat: &[f64]| {
        let x = unflatten(flat);
        (
            total_energy(potential, &x, &masses),
            total_gradient(potential, &x, &masses),
        )
    };

    let flat_x0: Vec<f64> = x0.iter().flatten().copied().collect();
    let minimum = minimize(objective, &flat_x0, replicated.as_deref(), options);

    let x_eq = unflatten(&minimum.x);
    let hess = crystal_hessian(potential, &x_eq, &masses);
    let modes = normal_modes(&hess, &masses);
    let trap_energies = potential.energies(&x_eq, &masses);

    let result = ModeSolverResult {
        ions: ions.to_vec(),
        x0: x0.to_vec(),
        x_eq,
        potential: potential.clone(),
        fun: minimum.fun,
        jac: minimum.jac,
        hess,
        trap_energies,
        modes,
        diagnostics: minimum.diagnostics,
        title: String::new(),
    };

    report_outcome(&result);
    Ok(result)
}

fn validate_bounds(bounds: &AxisBounds) -> Result<(), Error> {
    for (axis, &(min, max)) in bounds.iter().enumerate() {
        match min.partial_cmp(&max) {
            Some(Ordering::Less | Ordering::Equal) => {}
            _ => return Err(Error::invalid_bounds(axis, min, max)),
        }
    }
    Ok(())
}

fn unflatten(flat: &[f64]) -> Vec<[f64; 3]> {
    flat.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect()
}

fn report_outcome(result: &ModeSolverResult) {
    let diag = &result.diagnostics;
    info!(
        "solved {} ions in {} iterations ({} evaluations): energy {:.9e} V, |grad| {:.3e} V/m, {}",
        result.ion_count(),
        diag.iterations,
        diag.evaluations,
        result.fun,
        result.gradient_norm(),
        diag.termination
    );

    if !diag.success {
        warn!("equilibrium search did not converge: {}", diag.termination);
    }
    if !result.is_finite() {
        warn!("crystal energy is not finite; are two ions at the same position?");
    }
    let unstable = result.unstable_modes().count();
    if unstable > 0 {
        warn!("{unstable} mode(s) with negative curvature: the crystal sits at a saddle point");
    }
}
