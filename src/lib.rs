//! Equilibrium structure and normal modes of trapped-ion crystals.
//!
//! A crystal of singly charged ions sits in an external potential (a
//! harmonic Paul trap, optionally perturbed by a uniform field and by cubic
//! and quartic anharmonicities) and repels itself through the Coulomb
//! interaction. This crate finds the equilibrium positions by bounded
//! energy minimisation and analyses small oscillations around them.
//!
//! # Features
//!
//! - **Coulomb interaction** — Analytic energy, gradient and Hessian of the
//!   pairwise `κ / r` repulsion
//! - **Composable potentials** — Harmonic trap, linear field, cubic and
//!   quartic terms combined with `+` into a single [`Potential`]
//! - **Equilibrium search** — Bound-constrained quasi-Newton minimisation
//!   with analytic gradients
//! - **Normal modes** — Mass-weighted Hessian eigenpairs converted to signed
//!   frequencies, with per-ion mode shapes
//! - **Reports and settings** — Deterministic text reports and TOML
//!   [`Settings`] describing a whole computation
//!
//! # Quick Start
//!
//! ```
//! use trapmodes::{
//!     HarmonicTrap, MinimizeOptions, Potential, SecularFrequencies, Species, init_crystal,
//!     mode_solver,
//! };
//!
//! // Two calcium ions in a trap with 1 MHz axial frequency
//! let ca = Species::Ca40.ion();
//! let trap = HarmonicTrap::new(SecularFrequencies::from_mhz(1.0, 1.1, 3.0), &ca);
//! let potential = Potential::from(trap);
//!
//! // Seed 5 um apart along the trap axis
//! let x0 = init_crystal([0.0; 3], 5e-6, 2);
//! let result = mode_solver(&potential, &[ca, ca], &x0, None, &MinimizeOptions::default())?;
//!
//! assert!(result.diagnostics.success);
//! // The ions repel each other beyond the seed spacing
//! assert!(result.x_eq[1][0] - result.x_eq[0][0] > 5e-6);
//! // One mode per degree of freedom
//! assert_eq!(result.mode_freqs().len(), 6);
//!
//! println!("{result}");
//! # Ok::<(), trapmodes::Error>(())
//! ```
//!
//! # Module Organization
//!
//! - [`mode_solver`] — Main entry point
//! - [`Settings`] — TOML description of a complete computation
//! - [`constants`] — Physical constants and unit conventions
//!
//! # Data Types
//!
//! ## Input
//!
//! - [`Ion`] — Mass and charge of one trapped ion
//! - [`Species`] — Supported ion species
//! - [`Potential`] — External potential, a sum of elementary terms
//! - [`HarmonicTrap`], [`LinearField`], [`CubicTerm`], [`QuarticTerm`] — Elementary terms
//! - [`MinimizeOptions`] — Minimiser budgets and tolerances
//!
//! ## Output
//!
//! - [`ModeSolverResult`] — Equilibrium, Hessian and normal modes
//! - [`NormalMode`] — Frequency and shape of one mode
//! - [`Diagnostics`] — How the equilibrium search ended
//! - [`ReportTable`] — Formatted normal-mode table

mod model;
mod report;
mod solve;

pub use model::constants;
pub use model::crystal::init_crystal;
pub use model::ion::{Ion, ParseIonError, ParseSpeciesError, Species, parse_ion_list};
pub use model::result::{Diagnostics, ModeSolverResult, NormalMode, Termination};

pub use report::{ReportTable, format_general};

pub use solve::config::{
    CrystalParameters, CubicParameters, FieldParameters, QuarticParameters, TrapParameters,
    default_settings,
};
pub use solve::coulomb::{coulomb_gradient, coulomb_hessian, coulomb_potential};
pub use solve::hessian::crystal_hessian;
pub use solve::minimize::{Minimum, minimize};
pub use solve::modes::{eigenvalue_to_frequency, normal_modes};
pub use solve::potential::{Tensor3, Tensor4};
pub use solve::{
    AxisBounds, Block, CubicTerm, Error, HarmonicTrap, LinearField, MinimizeOptions, Potential,
    QuarticTerm, ReportOptions, SecularFrequencies, Settings, mode_solver, total_energy,
    total_gradient,
};
