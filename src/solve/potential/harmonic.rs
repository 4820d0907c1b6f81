use std::f64::consts::PI;

use super::super::Block;
use crate::model::constants::ATOMIC_MASS;
use crate::model::ion::Ion;

/// Secular frequencies of a reference ion, in Hz.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SecularFrequencies {
    pub fx: f64,
    pub fy: f64,
    pub fz: f64,
}

impl SecularFrequencies {
    pub fn new(fx: f64, fy: f64, fz: f64) -> Self {
        Self { fx, fy, fz }
    }

    /// Builds frequencies from values given in MHz.
    pub fn from_mhz(fx: f64, fy: f64, fz: f64) -> Self {
        Self::new(fx * 1e6, fy * 1e6, fz * 1e6)
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.fx, self.fy, self.fz]
    }
}

/// Harmonic Paul-trap potential with x as the trap axis.
///
/// The curvature seen by an ion is the sum of a static part and a
/// pseudopotential part that scales as `1 / mass`. Both are fixed so that
/// the reference ion oscillates at exactly `(fx, fy, fz)`; lighter ions
/// see stiffer radial confinement, heavier ions softer.
#[derive(Debug, Clone, PartialEq)]
pub struct HarmonicTrap {
    frequencies: SecularFrequencies,
    reference: Ion,
    /// Static curvature (V/m²).
    h_dc: Block,
    /// Pseudopotential curvature times mass (kg·V/m²).
    m_h_rf: Block,
    /// Uniform stray field term, in the same convention as [`LinearField`](super::LinearField).
    stray_field: [f64; 3],
}

impl HarmonicTrap {
    /// Creates the trap that confines `ion` at the given secular frequencies.
    ///
    /// # Arguments
    ///
    /// * `frequencies` — Secular frequencies of `ion` (Hz)
    /// * `ion` — Reference species fixing the mass and charge scaling
    pub fn new(frequencies: SecularFrequencies, ion: &Ion) -> Self {
        let [wx2, wy2, wz2] = frequencies.as_array().map(|f| (2.0 * PI * f).powi(2));
        let mass = ion.mass();
        let charge = ion.charge();

        let c_x = mass / charge * wx2;
        let c_dc = mass / charge * (wy2 - wz2) / 2.0;
        let m_c_rf = mass * mass / charge * (wx2 + wy2 + wz2) / 2.0;

        let h_dc = [
            [c_x, 0.0, 0.0],
            [0.0, c_dc - c_x / 2.0, 0.0],
            [0.0, 0.0, -c_dc - c_x / 2.0],
        ];
        let m_h_rf = [[0.0, 0.0, 0.0], [0.0, m_c_rf, 0.0], [0.0, 0.0, m_c_rf]];

        Self {
            frequencies,
            reference: *ion,
            h_dc,
            m_h_rf,
            stray_field: [0.0; 3],
        }
    }

    /// Adds a uniform stray field offset, `energy += E · x`.
    pub fn with_stray_field(mut self, field: [f64; 3]) -> Self {
        self.stray_field = field;
        self
    }

    pub fn frequencies(&self) -> SecularFrequencies {
        self.frequencies
    }

    pub fn reference_ion(&self) -> &Ion {
        &self.reference
    }

    pub fn stray_field(&self) -> [f64; 3] {
        self.stray_field
    }

    /// Total curvature for an ion of the given mass.
    pub fn curvature(&self, mass_amu: f64) -> Block {
        let mass = ATOMIC_MASS * mass_amu;
        let mut h = self.h_dc;
        for (row, rf_row) in h.iter_mut().zip(&self.m_h_rf) {
            for (v, rf) in row.iter_mut().zip(rf_row) {
                *v += rf / mass;
            }
        }
        h
    }

    pub fn energy(&self, x: &[f64; 3], mass_amu: f64) -> f64 {
        let h = self.curvature(mass_amu);
        let mut e = 0.0;
        for i in 0..3 {
            for j in 0..3 {
                e += 0.5 * x[i] * h[i][j] * x[j];
            }
            e += self.stray_field[i] * x[i];
        }
        e
    }

    pub fn gradient(&self, x: &[f64; 3], mass_amu: f64) -> [f64; 3] {
        let h = self.curvature(mass_amu);
        let mut g = self.stray_field;
        for i in 0..3 {
            for j in 0..3 {
                g[i] += h[i][j] * x[j];
            }
        }
        g
    }

    #[inline]
    pub fn hessian(&self, _x: &[f64; 3], mass_amu: f64) -> Block {
        self.curvature(mass_amu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::constants::ELEMENTARY_CHARGE;
    use crate::model::ion::Species;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps * a.abs().max(b.abs())
    }

    fn trap() -> HarmonicTrap {
        HarmonicTrap::new(SecularFrequencies::from_mhz(1.0, 1.1, 3.0), &Species::Ca40.ion())
    }

    fn frequency_of(curvature: f64, ion: &Ion) -> f64 {
        (curvature * ion.charge() / ion.mass()).sqrt() / (2.0 * PI)
    }

    #[test]
    fn reference_ion_recovers_secular_frequencies() {
        let ion = Species::Ca40.ion();
        let h = trap().curvature(ion.mass_amu);

        assert!(approx_eq(frequency_of(h[0][0], &ion), 1.0e6, 1e-12));
        assert!(approx_eq(frequency_of(h[1][1], &ion), 1.1e6, 1e-12));
        assert!(approx_eq(frequency_of(h[2][2], &ion), 3.0e6, 1e-12));
        assert_eq!(h[0][1], 0.0);
        assert_eq!(h[1][2], 0.0);
    }

    #[test]
    fn axial_curvature_is_mass_independent() {
        let t = trap();
        let light = t.curvature(Species::Be9.mass_amu());
        let heavy = t.curvature(Species::Yb171.mass_amu());
        assert_eq!(light[0][0], heavy[0][0]);
        assert!(light[1][1] > heavy[1][1]);
        assert!(light[2][2] > heavy[2][2]);
    }

    #[test]
    fn gradient_and_hessian_of_quadratic_form() {
        let t = trap().with_stray_field([10.0, -5.0, 2.0]);
        let m = Species::Ca40.mass_amu();
        let x = [1e-6, -2e-6, 0.5e-6];
        let h = t.hessian(&x, m);
        let g = t.gradient(&x, m);

        for i in 0..3 {
            let expected = h[i][i] * x[i] + t.stray_field()[i];
            assert!(approx_eq(g[i], expected, 1e-12));
        }

        let e = t.energy(&x, m);
        let expected: f64 = (0..3)
            .map(|i| 0.5 * h[i][i] * x[i] * x[i] + t.stray_field()[i] * x[i])
            .sum();
        assert!(approx_eq(e, expected, 1e-12));
    }

    #[test]
    fn charge_scales_curvature() {
        let mut doubly = Species::Ca40.ion();
        doubly.charge_number = 2.0;
        let freqs = SecularFrequencies::from_mhz(1.0, 1.1, 3.0);
        let single = HarmonicTrap::new(freqs, &Species::Ca40.ion()).curvature(doubly.mass_amu);
        let double = HarmonicTrap::new(freqs, &doubly).curvature(doubly.mass_amu);
        assert!(approx_eq(single[0][0], 2.0 * double[0][0], 1e-12));
        assert!(approx_eq(doubly.charge(), 2.0 * ELEMENTARY_CHARGE, 1e-15));
    }
}
