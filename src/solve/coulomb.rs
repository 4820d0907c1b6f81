//! Pairwise Coulomb repulsion between ions.
//!
//! Every pair interacts through `κ / r` with `κ = e / (4π ε₀)`, independent
//! of the charge declared on the ions. Coincident ions are not guarded
//! against; they produce infinite or NaN values that surface in the result.

use super::Block;
use crate::model::constants::KAPPA;

/// Displacements `r[a][b] = X[a] - X[b]` and distances `|r[a][b]|`, with the
/// self-distances set to infinity so that diagonal terms vanish on division.
struct Separations {
    r: Vec<Vec<[f64; 3]>>,
    dist: Vec<Vec<f64>>,
}

impl Separations {
    fn new(x: &[[f64; 3]]) -> Self {
        let r: Vec<Vec<[f64; 3]>> = x
            .iter()
            .map(|xa| {
                x.iter()
                    .map(|xb| [xa[0] - xb[0], xa[1] - xb[1], xa[2] - xb[2]])
                    .collect()
            })
            .collect();

        let mut dist: Vec<Vec<f64>> = r
            .iter()
            .map(|row| row.iter().map(|d| norm(d)).collect())
            .collect();
        for (a, row) in dist.iter_mut().enumerate() {
            row[a] = f64::INFINITY;
        }

        Self { r, dist }
    }
}

/// Total Coulomb energy `κ Σ_{a<b} 1 / |X[a] - X[b]|` in volts.
pub fn coulomb_potential(x: &[[f64; 3]]) -> f64 {
    if x.len() < 2 {
        return 0.0;
    }

    let mut sum = 0.0;
    for a in 0..x.len() {
        for b in (a + 1)..x.len() {
            let d = [x[a][0] - x[b][0], x[a][1] - x[b][1], x[a][2] - x[b][2]];
            sum += 1.0 / norm(&d);
        }
    }
    KAPPA * sum
}

/// Gradient of [`coulomb_potential`]; `-gradient[a]` is the force on ion `a`.
pub fn coulomb_gradient(x: &[[f64; 3]]) -> Vec<[f64; 3]> {
    let sep = Separations::new(x);

    sep.r
        .iter()
        .zip(&sep.dist)
        .map(|(r_row, d_row)| {
            let mut g = [0.0; 3];
            for (r_ab, &d) in r_row.iter().zip(d_row) {
                let inv3 = 1.0 / (d * d * d);
                for j in 0..3 {
                    g[j] -= KAPPA * r_ab[j] * inv3;
                }
            }
            g
        })
        .collect()
}

/// Hessian blocks `H[a][b][i][j] = ∂²U / ∂X[a,i] ∂X[b,j]`.
///
/// Each diagonal block is minus the sum of the other blocks in its row, so
/// every row of blocks sums to zero (translation invariance).
pub fn coulomb_hessian(x: &[[f64; 3]]) -> Vec<Vec<Block>> {
    let sep = Separations::new(x);
    let n = x.len();

    let mut h: Vec<Vec<Block>> = sep
        .r
        .iter()
        .zip(&sep.dist)
        .map(|(r_row, d_row)| {
            r_row
                .iter()
                .zip(d_row)
                .map(|(r_ab, &d)| pair_block(r_ab, d))
                .collect()
        })
        .collect();

    for a in 0..n {
        let mut diag = [[0.0; 3]; 3];
        for block in &h[a] {
            for i in 0..3 {
                for j in 0..3 {
                    diag[i][j] -= block[i][j];
                }
            }
        }
        h[a][a] = diag;
    }

    h
}

fn pair_block(r_ab: &[f64; 3], d: f64) -> Block {
    let inv3 = 1.0 / (d * d * d);
    let inv5 = inv3 / (d * d);
    let mut block = [[0.0; 3]; 3];
    for i in 0..3 {
        for j in 0..3 {
            let delta = if i == j { 1.0 } else { 0.0 };
            block[i][j] = KAPPA * (delta * inv3 - 3.0 * r_ab[i] * r_ab[j] * inv5);
        }
    }
    block
}

#[inline]
fn norm(v: &[f64; 3]) -> f64 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}
