use super::super::Block;

pub type Tensor4 = [[[[f64; 3]; 3]; 3]; 3];

/// Quartic anharmonicity along the trap axis.
///
/// The symmetric tensor carries `D[xxxx] = a`, `-a / 2` on every permutation
/// of `xxyy` and `xxzz`, `3a / 8` on `yyyy` and `zzzz`, and `a / 8` on the
/// permutations of `yyzz`. The resulting energy
/// `a / 24 · (x⁴ - 3 x² ρ² + 3/8 ρ⁴)` with `ρ² = y² + z²` is harmonic in
/// the Laplace sense, like [`CubicTerm`](super::CubicTerm).
#[derive(Debug, Clone, PartialEq)]
pub struct QuarticTerm {
    coefficient: f64,
    tensor: Tensor4,
}

impl QuarticTerm {
    /// # Arguments
    ///
    /// * `coefficient` — Fourth derivative of the potential along x (V/m⁴)
    pub fn new(coefficient: f64) -> Self {
        let a = coefficient;
        let mut d = [[[[0.0; 3]; 3]; 3]; 3];
        set_symmetric(&mut d, [0, 0, 0, 0], a);
        set_symmetric(&mut d, [0, 0, 1, 1], -a / 2.0);
        set_symmetric(&mut d, [0, 0, 2, 2], -a / 2.0);
        set_symmetric(&mut d, [1, 1, 1, 1], 3.0 * a / 8.0);
        set_symmetric(&mut d, [2, 2, 2, 2], 3.0 * a / 8.0);
        set_symmetric(&mut d, [1, 1, 2, 2], a / 8.0);
        Self {
            coefficient,
            tensor: d,
        }
    }

    pub fn coefficient(&self) -> f64 {
        self.coefficient
    }

    pub fn tensor(&self) -> &Tensor4 {
        &self.tensor
    }

    /// `(1/24) Σ D[a][b][c][d] x_a x_b x_c x_d`
    pub fn energy(&self, x: &[f64; 3], mass_amu: f64) -> f64 {
        let g = self.gradient(x, mass_amu);
        (g[0] * x[0] + g[1] * x[1] + g[2] * x[2]) / 4.0
    }

    /// `(1/6) Σ D[i][a][b][c] x_a x_b x_c`
    pub fn gradient(&self, x: &[f64; 3], mass_amu: f64) -> [f64; 3] {
        let h = self.hessian(x, mass_amu);
        let mut g = [0.0; 3];
        for (i, gi) in g.iter_mut().enumerate() {
            *gi = (h[i][0] * x[0] + h[i][1] * x[1] + h[i][2] * x[2]) / 3.0;
        }
        g
    }

    /// `(1/2) Σ D[i][j][a][b] x_a x_b`
    pub fn hessian(&self, x: &[f64; 3], _mass_amu: f64) -> Block {
        let mut h = [[0.0; 3]; 3];
        for i in 0..3 {
            for j in 0..3 {
                for a in 0..3 {
                    for b in 0..3 {
                        h[i][j] += self.tensor[i][j][a][b] * x[a] * x[b];
                    }
                }
                h[i][j] *= 0.5;
            }
        }
        h
    }
}

fn set_symmetric(d: &mut Tensor4, idx: [usize; 4], value: f64) {
    const PERMUTATIONS: [[usize; 4]; 24] = [
        [0, 1, 2, 3],
        [0, 1, 3, 2],
        [0, 2, 1, 3],
        [0, 2, 3, 1],
        [0, 3, 1, 2],
        [0, 3, 2, 1],
        [1, 0, 2, 3],
        [1, 0, 3, 2],
        [1, 2, 0, 3],
        [1, 2, 3, 0],
        [1, 3, 0, 2],
        [1, 3, 2, 0],
        [2, 0, 1, 3],
        [2, 0, 3, 1],
        [2, 1, 0, 3],
        [2, 1, 3, 0],
        [2, 3, 0, 1],
        [2, 3, 1, 0],
        [3, 0, 1, 2],
        [3, 0, 2, 1],
        [3, 1, 0, 2],
        [3, 1, 2, 0],
        [3, 2, 0, 1],
        [3, 2, 1, 0],
    ];
    for p in PERMUTATIONS {
        d[idx[p[0]]][idx[p[1]]][idx[p[2]]][idx[p[3]]] = value;
    }
}
