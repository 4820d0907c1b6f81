//! Physical constants (CODATA 2018, SI units).
//!
//! All energies in this crate are expressed per unit elementary charge,
//! i.e. in volts. With that convention the Coulomb prefactor is
//! `e / (4π ε₀)` in V·m and a curvature `h` in V/m² per amu converts to an
//! angular frequency through `ω² = h · e / u`.

use std::f64::consts::PI;

/// Elementary charge `e` in coulombs.
pub const ELEMENTARY_CHARGE: f64 = 1.602_176_634e-19;

/// Unified atomic mass unit `u` in kilograms.
pub const ATOMIC_MASS: f64 = 1.660_539_066_60e-27;

/// Vacuum permittivity `ε₀` in F/m.
pub const EPSILON_0: f64 = 8.854_187_812_8e-12;

/// Coulomb prefactor `κ = e / (4π ε₀)` in V·m.
///
/// Every pair of ions interacts through `κ / r` regardless of the charge
/// declared on [`Ion`](crate::Ion); only the trap curvature uses the
/// per-ion charge.
pub const KAPPA: f64 = ELEMENTARY_CHARGE / (4.0 * PI * EPSILON_0);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kappa_magnitude() {
        assert!((KAPPA - 1.439_964_5e-9).abs() < 1e-15);
    }
}
