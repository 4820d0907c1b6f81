//! Error types for the mode solver.
//!
//! Numerical trouble during the equilibrium search (divergent energy,
//! exhausted budgets) is not an error: it is reported through
//! [`Diagnostics`](crate::Diagnostics) on the returned result. The variants
//! here cover inputs that cannot describe a crystal at all.

use thiserror::Error;

use crate::model::ion::ParseIonError;

/// Errors that can occur while setting up or running the mode solver.
#[derive(Debug, Error)]
pub enum Error {
    /// The ion list is empty.
    #[error("ion crystal is empty: at least one ion is required")]
    EmptyCrystal,

    /// Seed positions and ion list disagree in length.
    #[error("got {positions} seed positions for {ions} ions")]
    PositionCountMismatch {
        /// Number of ions.
        ions: usize,
        /// Number of seed positions.
        positions: usize,
    },

    /// A bound pair is reversed or not a number.
    #[error("invalid bounds on axis {axis}: min {min} is not below max {max}")]
    InvalidBounds {
        /// Axis label (`x`, `y` or `z`).
        axis: char,
        /// Lower bound (m).
        min: f64,
        /// Upper bound (m).
        max: f64,
    },

    /// A secular frequency is zero, negative or not finite.
    #[error("invalid secular frequency along {axis}: {value} Hz")]
    InvalidFrequency {
        /// Axis label (`x`, `y` or `z`).
        axis: char,
        /// Offending value (Hz).
        value: f64,
    },

    /// The ion list could not be parsed.
    #[error("invalid ion list: {0}")]
    InvalidIon(#[from] ParseIonError),

    /// Failed to parse solver settings TOML.
    #[error("failed to parse solver settings: {0}")]
    SettingsParse(#[from] toml::de::Error),

    /// Failed to write solver settings TOML.
    #[error("failed to serialize solver settings: {0}")]
    SettingsSerialize(#[from] toml::ser::Error),
}

impl Error {
    /// Creates an [`InvalidBounds`](Error::InvalidBounds) error.
    ///
    /// # Arguments
    ///
    /// * `axis` — Index of the axis, 0 to 2
    /// * `min` — Lower bound
    /// * `max` — Upper bound
    pub fn invalid_bounds(axis: usize, min: f64, max: f64) -> Self {
        Self::InvalidBounds {
            axis: axis_label(axis),
            min,
            max,
        }
    }

    /// Creates an [`InvalidFrequency`](Error::InvalidFrequency) error.
    pub fn invalid_frequency(axis: usize, value: f64) -> Self {
        Self::InvalidFrequency {
            axis: axis_label(axis),
            value,
        }
    }
}

fn axis_label(axis: usize) -> char {
    match axis {
        0 => 'x',
        1 => 'y',
        2 => 'z',
        _ => '?',
    }
}
