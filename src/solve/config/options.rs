//! Equilibrium search settings.

use serde::{Deserialize, Serialize};

use crate::model::constants::KAPPA;

/// Options for the bound-constrained quasi-Newton minimiser.
///
/// The defaults tie the energy tolerance to the Coulomb prefactor `κ`, so
/// convergence is judged on the physical energy scale of the crystal.
///
/// # Examples
///
/// ```
/// use trapmodes::MinimizeOptions;
///
/// let opts = MinimizeOptions {
///     max_iterations: 50,
///     ..Default::default()
/// };
/// assert_eq!(opts.history, 10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MinimizeOptions {
    /// Maximum number of quasi-Newton iterations.
    pub max_iterations: usize,

    /// Maximum number of energy/gradient evaluations.
    ///
    /// `None` means `100 × 3N` for a crystal of `N` ions.
    pub max_evaluations: Option<usize>,

    /// Stop when one step lowers the energy by less than this (V).
    pub ftol: f64,

    /// Stop when the largest coordinate change is below `xtol` times the
    /// largest coordinate magnitude.
    pub xtol: f64,

    /// Stop when the largest projected gradient component is at most this (V/m).
    pub gtol: f64,

    /// Number of correction pairs kept for the inverse-Hessian estimate.
    pub history: usize,
}

impl MinimizeOptions {
    /// Evaluation budget for a problem with `dim` coordinates.
    pub fn evaluation_budget(&self, dim: usize) -> usize {
        self.max_evaluations.unwrap_or(100 * dim.max(1))
    }
}

impl Default for MinimizeOptions {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            max_evaluations: None,
            ftol: KAPPA,
            xtol: default_xtol(),
            gtol: 0.0,
            history: default_history(),
        }
    }
}

fn default_max_iterations() -> usize {
    1000
}
fn default_xtol() -> f64 {
    1e-8
}
fn default_history() -> usize {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options() {
        let opts = MinimizeOptions::default();
        assert_eq!(opts.max_iterations, 1000);
        assert_eq!(opts.ftol, KAPPA);
        assert_eq!(opts.xtol, 1e-8);
        assert_eq!(opts.gtol, 0.0);
        assert_eq!(opts.evaluation_budget(6), 600);
    }

    #[test]
    fn explicit_evaluation_budget() {
        let opts = MinimizeOptions {
            max_evaluations: Some(42),
            ..Default::default()
        };
        assert_eq!(opts.evaluation_budget(6), 42);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let opts: MinimizeOptions = toml::from_str("max_iterations = 7").unwrap();
        assert_eq!(opts.max_iterations, 7);
        assert_eq!(opts.history, 10);
        assert_eq!(opts.ftol, KAPPA);
    }
}
