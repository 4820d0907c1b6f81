use nalgebra::DMatrix;

use super::Block;
use super::coulomb::coulomb_hessian;
use super::potential::Potential;

/// Assembles the full `3N × 3N` Hessian of the crystal energy.
///
/// Row and column `3a + i` belong to coordinate `i` of ion `a`. Coulomb
/// blocks fill every ion pair; the external potential only contributes to
/// the diagonal blocks.
pub fn crystal_hessian(potential: &Potential, x: &[[f64; 3]], masses_amu: &[f64]) -> DMatrix<f64> {
    let n = x.len();
    let coulomb = coulomb_hessian(x);
    let external = potential.hessian(x, masses_amu);

    let mut h = DMatrix::zeros(3 * n, 3 * n);
    for a in 0..n {
        for b in 0..n {
            add_block(&mut h, a, b, &coulomb[a][b]);
        }
        add_block(&mut h, a, a, &external[a]);
    }
    h
}

fn add_block(h: &mut DMatrix<f64>, a: usize, b: usize, block: &Block) {
    for i in 0..3 {
        for j in 0..3 {
            h[(3 * a + i, 3 * b + j)] += block[i][j];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ion::Species;
    use crate::solve::coulomb::coulomb_gradient;
    use crate::solve::potential::{CubicTerm, HarmonicTrap, SecularFrequencies};

    fn potential() -> Potential {
        HarmonicTrap::new(SecularFrequencies::from_mhz(1.0, 1.1, 3.0), &Species::Ca40.ion())
            + CubicTerm::new(1e12)
    }

    fn total_gradient(pot: &Potential, x: &[[f64; 3]], m: &[f64]) -> Vec<f64> {
        let gc = coulomb_gradient(x);
        let gp = pot.gradient(x, m);
        gc.iter()
            .zip(&gp)
            .flat_map(|(a, b)| [a[0] + b[0], a[1] + b[1], a[2] + b[2]])
            .collect()
    }

    #[test]
    fn hessian_is_symmetric_and_sized() {
        let x = vec![[-3e-6, 0.1e-6, 0.0], [3e-6, -0.1e-6, 0.2e-6]];
        let m = vec![Species::Ca40.mass_amu(); 2];
        let h = crystal_hessian(&potential(), &x, &m);

        assert_eq!(h.shape(), (6, 6));
        let scale = h.amax();
        for i in 0..6 {
            for j in 0..6 {
                assert!((h[(i, j)] - h[(j, i)]).abs() <= 1e-12 * scale);
            }
        }
    }

    #[test]
    fn hessian_matches_gradient_differences() {
        let pot = potential();
        let x = vec![[-2.8e-6, 0.1e-6, -0.05e-6], [2.9e-6, -0.2e-6, 0.1e-6]];
        let m = vec![Species::Ca40.mass_amu(), Species::Be9.mass_amu()];
        let h = crystal_hessian(&pot, &x, &m);
        let step = 1e-11;

        for col in 0..6 {
            let mut plus = x.clone();
            let mut minus = x.clone();
            plus[col / 3][col % 3] += step;
            minus[col / 3][col % 3] -= step;
            let gp = total_gradient(&pot, &plus, &m);
            let gm = total_gradient(&pot, &minus, &m);
            for row in 0..6 {
                let fd = (gp[row] - gm[row]) / (2.0 * step);
                assert!(
                    (fd - h[(row, col)]).abs() <= 1e-4 * h.amax(),
                    "({row}, {col}): {fd} vs {}",
                    h[(row, col)]
                );
            }
        }
    }

    #[test]
    fn single_ion_hessian_is_trap_curvature() {
        let trap = HarmonicTrap::new(SecularFrequencies::from_mhz(1.0, 1.1, 3.0), &Species::Ca40.ion());
        let m = Species::Ca40.mass_amu();
        let h = crystal_hessian(&Potential::from(trap.clone()), &[[0.0; 3]], &[m]);
        let c = trap.curvature(m);
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(h[(i, j)], c[i][j]);
            }
        }
    }
}
