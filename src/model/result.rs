use std::fmt;

use nalgebra::DMatrix;

use super::ion::Ion;
use crate::solve::Potential;

/// Why the minimiser stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The projected gradient fell below `gtol`.
    GradientConverged,
    /// The energy changed by less than `ftol` over one step.
    EnergyConverged,
    /// The step was smaller than `xtol` relative to the positions.
    StepConverged,
    /// `max_iterations` reached.
    MaxIterations,
    /// `max_evaluations` reached.
    MaxEvaluations,
    /// No step along the search direction decreased the energy.
    LineSearchFailed,
    /// The energy or gradient at the current point is not finite.
    NonFinite,
}

impl Termination {
    pub fn is_converged(&self) -> bool {
        matches!(
            self,
            Termination::GradientConverged
                | Termination::EnergyConverged
                | Termination::StepConverged
        )
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Termination::GradientConverged => "projected gradient below tolerance",
            Termination::EnergyConverged => "energy change below tolerance",
            Termination::StepConverged => "step size below tolerance",
            Termination::MaxIterations => "iteration limit reached",
            Termination::MaxEvaluations => "function evaluation limit reached",
            Termination::LineSearchFailed => "line search failed to decrease the energy",
            Termination::NonFinite => "energy or gradient is not finite",
        };
        f.write_str(msg)
    }
}

/// Bookkeeping reported by the equilibrium search.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostics {
    pub iterations: usize,
    pub evaluations: usize,
    pub success: bool,
    pub termination: Termination,
}

/// One normal mode of the crystal.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalMode {
    /// Eigenvalue of the mass-weighted Hessian (V/m² per amu).
    pub eigenvalue: f64,
    /// Signed frequency in Hz; negative along directions of negative curvature.
    pub frequency: f64,
    /// `(x, y, z)` participation of every ion, in ion order.
    pub shape: Vec<[f64; 3]>,
}

impl NormalMode {
    #[inline]
    pub fn is_unstable(&self) -> bool {
        self.frequency < 0.0
    }
}

/// Everything produced by one call to [`mode_solver`](crate::mode_solver).
///
/// A result is returned even when the minimiser did not converge or the
/// energy diverged; check [`Diagnostics::success`] and
/// [`ModeSolverResult::is_finite`] before trusting the numbers.
#[derive(Debug, Clone)]
pub struct ModeSolverResult {
    /// Ion list, in the order used for every per-ion array.
    pub ions: Vec<Ion>,
    /// Seed positions (m).
    pub x0: Vec<[f64; 3]>,
    /// Equilibrium positions (m).
    pub x_eq: Vec<[f64; 3]>,
    /// External potential the crystal was solved in.
    pub potential: Potential,
    /// Total energy at `x_eq` (V).
    pub fun: f64,
    /// Total gradient at `x_eq`, flattened ion-major (V/m).
    pub jac: Vec<f64>,
    /// Mass-dependent `3N × 3N` Hessian at `x_eq` (V/m²).
    pub hess: DMatrix<f64>,
    /// External-potential energy of each ion at `x_eq` (V).
    pub trap_energies: Vec<f64>,
    /// Normal modes ordered by ascending `|eigenvalue|`.
    pub modes: Vec<NormalMode>,
    pub diagnostics: Diagnostics,
    pub title: String,
}

impl ModeSolverResult {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[inline]
    pub fn ion_count(&self) -> usize {
        self.ions.len()
    }

    /// Mode frequencies in Hz, in mode order.
    pub fn mode_freqs(&self) -> Vec<f64> {
        self.modes.iter().map(|m| m.frequency).collect()
    }

    /// Mode shapes, `mode_vectors()[n][k]` is the displacement of ion `k` in mode `n`.
    pub fn mode_vectors(&self) -> Vec<Vec<[f64; 3]>> {
        self.modes.iter().map(|m| m.shape.clone()).collect()
    }

    /// Euclidean norm of the total gradient at equilibrium.
    pub fn gradient_norm(&self) -> f64 {
        self.jac.iter().map(|g| g * g).sum::<f64>().sqrt()
    }

    /// `false` when the energy, gradient or Hessian contains NaN or infinity,
    /// which happens when two ions coincide.
    pub fn is_finite(&self) -> bool {
        self.fun.is_finite()
            && self.jac.iter().all(|g| g.is_finite())
            && self.hess.iter().all(|h| h.is_finite())
    }

    /// Modes with negative curvature; non-empty at a saddle point.
    pub fn unstable_modes(&self) -> impl Iterator<Item = &NormalMode> {
        self.modes.iter().filter(|m| m.is_unstable())
    }
}
