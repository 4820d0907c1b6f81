//! External trapping potentials.
//!
//! A [`Potential`] is one of the elementary terms ([`HarmonicTrap`],
//! [`LinearField`], [`CubicTerm`], [`QuarticTerm`]) or the sum of two
//! potentials. Sums are built with `+` and form a tree; every operation on a
//! sum is the sum of the operation on its operands, evaluated per ion.
//!
//! All terms are evaluated ion by ion, with the ion's mass in amu, and return
//! energies in volts, gradients in V/m and Hessian blocks in V/m².
//!
//! ```
//! use trapmodes::{CubicTerm, HarmonicTrap, LinearField, SecularFrequencies, Species};
//!
//! let trap = HarmonicTrap::new(SecularFrequencies::from_mhz(1.0, 1.1, 3.0), &Species::Ca40.ion());
//! let pot = trap + LinearField::new([0.0, 5.0, 0.0]) + CubicTerm::new(1e12);
//! assert_eq!(pot.terms().len(), 3);
//! ```

mod cubic;
mod harmonic;
mod linear;
mod quartic;

pub use cubic::{CubicTerm, Tensor3};
pub use harmonic::{HarmonicTrap, SecularFrequencies};
pub use linear::LinearField;
pub use quartic::{QuarticTerm, Tensor4};

use std::ops::Add;

use super::Block;

#[derive(Debug, Clone, PartialEq)]
pub enum Potential {
    Harmonic(HarmonicTrap),
    Linear(LinearField),
    Cubic(CubicTerm),
    Quartic(QuarticTerm),
    Sum(Box<Potential>, Box<Potential>),
}

impl Potential {
    /// Energy of one ion at `x`.
    pub fn energy_at(&self, x: &[f64; 3], mass_amu: f64) -> f64 {
        match self {
            Potential::Harmonic(p) => p.energy(x, mass_amu),
            Potential::Linear(p) => p.energy(x, mass_amu),
            Potential::Cubic(p) => p.energy(x, mass_amu),
            Potential::Quartic(p) => p.energy(x, mass_amu),
            Potential::Sum(a, b) => a.energy_at(x, mass_amu) + b.energy_at(x, mass_amu),
        }
    }

    /// Gradient for one ion at `x`.
    pub fn gradient_at(&self, x: &[f64; 3], mass_amu: f64) -> [f64; 3] {
        match self {
            Potential::Harmonic(p) => p.gradient(x, mass_amu),
            Potential::Linear(p) => p.gradient(x, mass_amu),
            Potential::Cubic(p) => p.gradient(x, mass_amu),
            Potential::Quartic(p) => p.gradient(x, mass_amu),
            Potential::Sum(a, b) => {
                let ga = a.gradient_at(x, mass_amu);
                let gb = b.gradient_at(x, mass_amu);
                [ga[0] + gb[0], ga[1] + gb[1], ga[2] + gb[2]]
            }
        }
    }

    /// Hessian block for one ion at `x`.
    pub fn hessian_at(&self, x: &[f64; 3], mass_amu: f64) -> Block {
        match self {
            Potential::Harmonic(p) => p.hessian(x, mass_amu),
            Potential::Linear(p) => p.hessian(x, mass_amu),
            Potential::Cubic(p) => p.hessian(x, mass_amu),
            Potential::Quartic(p) => p.hessian(x, mass_amu),
            Potential::Sum(a, b) => {
                let mut h = a.hessian_at(x, mass_amu);
                let hb = b.hessian_at(x, mass_amu);
                for (row, row_b) in h.iter_mut().zip(&hb) {
                    for (v, vb) in row.iter_mut().zip(row_b) {
                        *v += vb;
                    }
                }
                h
            }
        }
    }

    /// Energy of every ion, in ion order.
    ///
    /// # Panics
    ///
    /// Panics if `x` and `masses_amu` differ in length. The same holds for
    /// [`potential`](Self::potential), [`gradient`](Self::gradient) and
    /// [`hessian`](Self::hessian); [`mode_solver`](crate::mode_solver)
    /// checks the lengths and returns an error instead.
    pub fn energies(&self, x: &[[f64; 3]], masses_amu: &[f64]) -> Vec<f64> {
        check_lengths(x, masses_amu);
        x.iter()
            .zip(masses_amu)
            .map(|(xi, &m)| self.energy_at(xi, m))
            .collect()
    }

    /// Total energy of the crystal in this potential.
    pub fn potential(&self, x: &[[f64; 3]], masses_amu: &[f64]) -> f64 {
        self.energies(x, masses_amu).iter().sum()
    }

    /// Gradient of every ion, shape `(N, 3)`.
    pub fn gradient(&self, x: &[[f64; 3]], masses_amu: &[f64]) -> Vec<[f64; 3]> {
        check_lengths(x, masses_amu);
        x.iter()
            .zip(masses_amu)
            .map(|(xi, &m)| self.gradient_at(xi, m))
            .collect()
    }

    /// Hessian block of every ion, shape `(N, 3, 3)`.
    ///
    /// External potentials act on each ion separately, so there are no
    /// inter-ion blocks.
    pub fn hessian(&self, x: &[[f64; 3]], masses_amu: &[f64]) -> Vec<Block> {
        check_lengths(x, masses_amu);
        x.iter()
            .zip(masses_amu)
            .map(|(xi, &m)| self.hessian_at(xi, m))
            .collect()
    }

    /// Elementary terms of this potential, left to right.
    pub fn terms(&self) -> Vec<&Potential> {
        match self {
            Potential::Sum(a, b) => {
                let mut terms = a.terms();
                terms.extend(b.terms());
                terms
            }
            term => vec![term],
        }
    }

    /// Sums an arbitrary number of potentials; `None` for an empty iterator.
    pub fn sum_of<I>(potentials: I) -> Option<Potential>
    where
        I: IntoIterator,
        I::Item: Into<Potential>,
    {
        potentials.into_iter().map(Into::into).reduce(|acc, p| acc + p)
    }
}

impl<T: Into<Potential>> Add<T> for Potential {
    type Output = Potential;

    fn add(self, rhs: T) -> Potential {
        Potential::Sum(Box::new(self), Box::new(rhs.into()))
    }
}

macro_rules! impl_term {
    ($term:ident, $variant:ident) => {
        impl From<$term> for Potential {
            fn from(term: $term) -> Self {
                Potential::$variant(term)
            }
        }

        impl<T: Into<Potential>> Add<T> for $term {
            type Output = Potential;

            fn add(self, rhs: T) -> Potential {
                Potential::from(self) + rhs
            }
        }
    };
}

impl_term!(HarmonicTrap, Harmonic);
impl_term!(LinearField, Linear);
impl_term!(CubicTerm, Cubic);
impl_term!(QuarticTerm, Quartic);

fn check_lengths(x: &[[f64; 3]], masses_amu: &[f64]) {
    assert_eq!(
        x.len(),
        masses_amu.len(),
        "{} positions for {} ion masses",
        x.len(),
        masses_amu.len()
    );
}
