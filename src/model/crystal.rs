/// Places `n_ions` ions on a line parallel to the x axis.
///
/// Consecutive ions are `spacing` apart and the chain is centred on
/// `origin`, so the returned positions are a natural seed for the
/// equilibrium search of a linear crystal.
///
/// # Arguments
///
/// * `origin` — Centre of the chain (m)
/// * `spacing` — Distance between neighbouring ions (m)
/// * `n_ions` — Number of ions
pub fn init_crystal(origin: [f64; 3], spacing: f64, n_ions: usize) -> Vec<[f64; 3]> {
    let centre = (n_ions as f64 - 1.0) / 2.0;
    (0..n_ions)
        .map(|k| {
            [
                origin[0] + (k as f64 - centre) * spacing,
                origin[1],
                origin[2],
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_ion_sits_at_origin() {
        let x = init_crystal([1.0, 2.0, 3.0], 5e-6, 1);
        assert_eq!(x, vec![[1.0, 2.0, 3.0]]);
    }

    #[test]
    fn chain_is_centred_with_exact_pitch() {
        let x = init_crystal([0.0, 0.0, 0.0], 2.0, 4);
        assert_eq!(
            x,
            vec![
                [-3.0, 0.0, 0.0],
                [-1.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [3.0, 0.0, 0.0]
            ]
        );
    }

    #[test]
    fn empty_chain() {
        assert!(init_crystal([0.0; 3], 1.0, 0).is_empty());
    }
}
