use super::super::Block;

/// Potential of a uniform field, `energy = E · x` per ion.
///
/// `field` is the gradient of the potential (V/m), i.e. minus the
/// electric field acting on a positive ion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearField {
    pub field: [f64; 3],
}

impl LinearField {
    pub fn new(field: [f64; 3]) -> Self {
        Self { field }
    }

    /// Potential of a measured electric field `(Ex, Ey, Ez)` in V/m.
    pub fn from_electric_field(e: [f64; 3]) -> Self {
        Self::new(e.map(|v| -v))
    }

    pub fn energy(&self, x: &[f64; 3], _mass_amu: f64) -> f64 {
        self.field[0] * x[0] + self.field[1] * x[1] + self.field[2] * x[2]
    }

    pub fn gradient(&self, _x: &[f64; 3], _mass_amu: f64) -> [f64; 3] {
        self.field
    }

    pub fn hessian(&self, _x: &[f64; 3], _mass_amu: f64) -> Block {
        [[0.0; 3]; 3]
    }
}
