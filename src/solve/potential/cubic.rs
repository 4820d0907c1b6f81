use super::super::Block;

pub type Tensor3 = [[[f64; 3]; 3]; 3];

/// Cubic anharmonicity along the trap axis.
///
/// The symmetric coupling tensor has `C[x][x][x] = a` and every permutation
/// of `xyy` and `xzz` equal to `-a / 2`, so the energy
/// `a x³ / 6 - a x (y² + z²) / 4` is a solution of Laplace's equation.
#[derive(Debug, Clone, PartialEq)]
pub struct CubicTerm {
    coefficient: f64,
    tensor: Tensor3,
}

impl CubicTerm {
    /// # Arguments
    ///
    /// * `coefficient` — Third derivative of the potential along x (V/m³)
    pub fn new(coefficient: f64) -> Self {
        let mut c = [[[0.0; 3]; 3]; 3];
        c[0][0][0] = coefficient;
        for r in [1, 2] {
            c[0][r][r] = -coefficient / 2.0;
            c[r][r][0] = -coefficient / 2.0;
            c[r][0][r] = -coefficient / 2.0;
        }
        Self {
            coefficient,
            tensor: c,
        }
    }

    pub fn coefficient(&self) -> f64 {
        self.coefficient
    }

    pub fn tensor(&self) -> &Tensor3 {
        &self.tensor
    }

    /// `(1/6) Σ C[a][b][c] x_a x_b x_c`
    pub fn energy(&self, x: &[f64; 3], _mass_amu: f64) -> f64 {
        let mut e = 0.0;
        for a in 0..3 {
            for b in 0..3 {
                for c in 0..3 {
                    e += self.tensor[a][b][c] * x[a] * x[b] * x[c];
                }
            }
        }
        e / 6.0
    }

    /// `(1/2) Σ C[i][a][b] x_a x_b`
    pub fn gradient(&self, x: &[f64; 3], _mass_amu: f64) -> [f64; 3] {
        let mut g = [0.0; 3];
        for (i, gi) in g.iter_mut().enumerate() {
            for a in 0..3 {
                for b in 0..3 {
                    *gi += self.tensor[i][a][b] * x[a] * x[b];
                }
            }
            *gi *= 0.5;
        }
        g
    }

    /// `Σ C[i][j][a] x_a`
    pub fn hessian(&self, x: &[f64; 3], _mass_amu: f64) -> Block {
        let mut h = [[0.0; 3]; 3];
        for i in 0..3 {
            for j in 0..3 {
                for a in 0..3 {
                    h[i][j] += self.tensor[i][j][a] * x[a];
                }
            }
        }
        h
    }
}
