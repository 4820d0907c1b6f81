//! Core data structures shared by the solver and its callers.
//!
//! - [`constants`] – Physical constants and the Coulomb prefactor `κ`.
//! - [`ion`] – Ion species, ion records and the `"Ca40 * 2, Be9"` list grammar.
//! - [`crystal`] – Seed positions for linear crystals.
//! - [`result`] – Output of one solve: equilibrium, Hessian, normal modes, diagnostics.

pub mod constants;
pub mod crystal;
pub mod ion;
pub mod result;
