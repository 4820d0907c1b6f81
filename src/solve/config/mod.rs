//! Solver settings.
//!
//! A [`Settings`] value describes one complete computation: the ion list,
//! the trap and its perturbations, the seed crystal, optional bounds and
//! the minimiser and report options. It is plain data, read from and
//! written to TOML; every section and field may be omitted, in which case
//! the value from the embedded defaults is used.
//!
//! Units follow the lab convention rather than SI: frequencies in MHz,
//! crystal lengths in µm, cubic and quartic coefficients in units of
//! 1e12 V/m³ and 1e18 V/m⁴. Bounds are the exception and are given in
//! metres, as passed to [`mode_solver`](crate::mode_solver).

mod options;

pub use options::MinimizeOptions;

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use super::error::Error;
use super::potential::{
    CubicTerm, HarmonicTrap, LinearField, Potential, QuarticTerm, SecularFrequencies,
};
use super::{AxisBounds, mode_solver};
use crate::model::crystal::init_crystal;
use crate::model::ion::{Ion, Species, parse_ion_list};
use crate::model::result::ModeSolverResult;

const DEFAULT_SETTINGS_TOML: &str = include_str!("../../../resources/default.settings.toml");

static DEFAULT_SETTINGS: OnceLock<Settings> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Ion list, e.g. `"Ca40 * 2, Be9"`.
    #[serde(default = "default_ions")]
    pub ions: String,
    #[serde(default)]
    pub title: String,
    /// Per-axis `[min, max]` in metres, shared by every ion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<[[f64; 2]; 3]>,
    #[serde(default)]
    pub trap: TrapParameters,
    #[serde(default)]
    pub field: FieldParameters,
    #[serde(default)]
    pub cubic: CubicParameters,
    #[serde(default)]
    pub quartic: QuarticParameters,
    #[serde(default)]
    pub crystal: CrystalParameters,
    #[serde(default)]
    pub minimizer: MinimizeOptions,
    #[serde(default)]
    pub report: ReportOptions,
}

fn default_ions() -> String {
    "Ca40 * 2".to_string()
}

/// Harmonic trap, defined by the secular frequencies of a reference species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrapParameters {
    #[serde(default = "default_fx")]
    pub fx: f64,
    #[serde(default = "default_fy")]
    pub fy: f64,
    #[serde(default = "default_fz")]
    pub fz: f64,
    #[serde(default)]
    pub species: Species,
}

fn default_fx() -> f64 {
    1.0
}
fn default_fy() -> f64 {
    1.1
}
fn default_fz() -> f64 {
    3.0
}

impl Default for TrapParameters {
    fn default() -> Self {
        Self {
            fx: default_fx(),
            fy: default_fy(),
            fz: default_fz(),
            species: Species::default(),
        }
    }
}

/// Uniform electric field. The potential term is built with every
/// component negated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldParameters {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CubicParameters {
    #[serde(default)]
    pub enabled: bool,
    /// In units of 1e12 V/m³.
    #[serde(default)]
    pub coefficient: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuarticParameters {
    #[serde(default)]
    pub enabled: bool,
    /// In units of 1e18 V/m⁴.
    #[serde(default)]
    pub coefficient: f64,
}

/// Seed crystal: a chain along x.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrystalParameters {
    /// Distance between neighbouring ions (µm).
    #[serde(default = "default_spacing")]
    pub spacing: f64,
    /// Centre of the chain (µm).
    #[serde(default)]
    pub origin: [f64; 3],
}

fn default_spacing() -> f64 {
    5.0
}

impl Default for CrystalParameters {
    fn default() -> Self {
        Self {
            spacing: default_spacing(),
            origin: [0.0; 3],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReportOptions {
    /// Significant digits of every number in the report.
    #[serde(default = "default_precision")]
    pub precision: usize,
}

fn default_precision() -> usize {
    4
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            precision: default_precision(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        default_settings().clone()
    }
}

/// Settings parsed from the embedded `default.settings.toml`.
pub fn default_settings() -> &'static Settings {
    DEFAULT_SETTINGS.get_or_init(|| {
        toml::from_str(DEFAULT_SETTINGS_TOML)
            .expect("Failed to parse embedded default settings. This is a library bug.")
    })
}

impl Settings {
    /// Parses settings from TOML text; missing fields take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, Error> {
        Ok(toml::from_str(s)?)
    }

    pub fn to_toml_string(&self) -> Result<String, Error> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Parsed ion list.
    pub fn ion_list(&self) -> Result<Vec<Ion>, Error> {
        Ok(parse_ion_list(&self.ions)?)
    }

    /// The external potential: the trap plus every enabled perturbation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFrequency`] if a secular frequency is not a
    /// positive finite number.
    pub fn potential(&self) -> Result<Potential, Error> {
        let freqs = SecularFrequencies::from_mhz(self.trap.fx, self.trap.fy, self.trap.fz);
        for (axis, value) in freqs.as_array().into_iter().enumerate() {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::invalid_frequency(axis, value));
            }
        }

        let mut pot = Potential::from(HarmonicTrap::new(freqs, &self.trap.species.ion()));
        if self.field.enabled {
            pot = pot + LinearField::from_electric_field([self.field.x, self.field.y, self.field.z]);
        }
        if self.cubic.enabled {
            pot = pot + CubicTerm::new(self.cubic.coefficient * 1e12);
        }
        if self.quartic.enabled {
            pot = pot + QuarticTerm::new(self.quartic.coefficient * 1e18);
        }
        Ok(pot)
    }

    /// Seed positions (m) for `n_ions` ions.
    pub fn seed_positions(&self, n_ions: usize) -> Vec<[f64; 3]> {
        init_crystal(
            self.crystal.origin.map(|v| v * 1e-6),
            self.crystal.spacing * 1e-6,
            n_ions,
        )
    }

    pub fn axis_bounds(&self) -> Option<AxisBounds> {
        self.bounds.map(|b| b.map(|[min, max]| (min, max)))
    }

    /// Runs the whole computation these settings describe.
    pub fn solve(&self) -> Result<ModeSolverResult, Error> {
        let ions = self.ion_list()?;
        let potential = self.potential()?;
        let x0 = self.seed_positions(ions.len());
        let bounds = self.axis_bounds();

        let result = mode_solver(&potential, &ions, &x0, bounds.as_ref(), &self.minimizer)?;
        Ok(result.with_title(self.title.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_defaults_parse() {
        let s = Settings::default();
        assert_eq!(s.ions, "Ca40 * 2");
        assert_eq!(s.trap.fz, 3.0);
        assert_eq!(s.trap.species, Species::Ca40);
        assert_eq!(s.crystal.spacing, 5.0);
        assert_eq!(s.report.precision, 4);
        assert_eq!(s.minimizer, MinimizeOptions::default());
        assert!(s.bounds.is_none());
    }

    #[test]
    fn empty_document_equals_defaults() {
        let s = Settings::from_toml_str("").unwrap();
        assert_eq!(s, Settings::default());
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let s = Settings::from_toml_str(
            r#"
            ions = "Be9, Ca40"

            [trap]
            fx = 0.8
            species = "Be9"

            [cubic]
            enabled = true
            coefficient = 2.5
            "#,
        )
        .unwrap();

        assert_eq!(s.trap.fx, 0.8);
        assert_eq!(s.trap.fy, 1.1);
        assert_eq!(s.trap.species, Species::Be9);
        assert!(s.cubic.enabled);
        assert!(!s.quartic.enabled);
        assert_eq!(s.ion_list().unwrap().len(), 2);
    }

    #[test]
    fn unknown_species_is_a_parse_error() {
        let err = Settings::from_toml_str("[trap]\nspecies = \"Sr88\"").unwrap_err();
        assert!(matches!(err, Error::SettingsParse(_)));
    }

    #[test]
    fn toml_round_trip() {
        let mut s = Settings::default();
        s.title = "round trip".into();
        s.bounds = Some([[-1e-4, 1e-4], [-1e-5, 1e-5], [-1e-5, 1e-5]]);
        s.field.enabled = true;
        s.field.y = 12.5;

        let text = s.to_toml_string().unwrap();
        assert_eq!(Settings::from_toml_str(&text).unwrap(), s);
    }

    #[test]
    fn potential_includes_enabled_terms_only() {
        let mut s = Settings::default();
        assert_eq!(s.potential().unwrap().terms().len(), 1);

        s.field.enabled = true;
        s.quartic.enabled = true;
        let pot = s.potential().unwrap();
        let terms = pot.terms();
        assert_eq!(terms.len(), 3);
        assert!(matches!(terms[1], Potential::Linear(_)));
        assert!(matches!(terms[2], Potential::Quartic(_)));
    }

    #[test]
    fn field_is_negated_and_coefficients_scaled() {
        let mut s = Settings::default();
        s.field = FieldParameters {
            enabled: true,
            x: 10.0,
            y: -2.0,
            z: 0.5,
        };
        s.cubic = CubicParameters {
            enabled: true,
            coefficient: 3.0,
        };
        let pot = s.potential().unwrap();
        let terms = pot.terms();

        match terms[1] {
            Potential::Linear(l) => assert_eq!(l.field, [-10.0, 2.0, -0.5]),
            other => panic!("expected linear term, got {other:?}"),
        }
        match terms[2] {
            Potential::Cubic(c) => assert_eq!(c.coefficient(), 3.0e12),
            other => panic!("expected cubic term, got {other:?}"),
        }
    }

    #[test]
    fn quartic_coefficient_is_scaled_to_si() {
        let mut s = Settings::default();
        s.quartic = QuarticParameters {
            enabled: true,
            coefficient: 2.0,
        };
        let pot = s.potential().unwrap();

        match pot.terms()[1] {
            Potential::Quartic(q) => {
                assert_eq!(q.coefficient(), 2.0e18);
                assert_eq!(q.tensor()[0][0][0][0], 2.0e18);
            }
            other => panic!("expected quartic term, got {other:?}"),
        }
    }

    #[test]
    fn trap_is_built_for_the_reference_species() {
        let mut s = Settings::default();
        s.trap.species = Species::Be9;
        let pot = s.potential().unwrap();

        match pot.terms()[0] {
            Potential::Harmonic(h) => {
                assert_eq!(h.reference_ion(), &Species::Be9.ion());
                assert_eq!(h.frequencies(), SecularFrequencies::from_mhz(1.0, 1.1, 3.0));
            }
            other => panic!("expected harmonic term, got {other:?}"),
        }
    }

    #[test]
    fn non_positive_frequency_is_rejected() {
        let mut s = Settings::default();
        s.trap.fy = 0.0;
        let err = s.potential().unwrap_err();
        assert!(matches!(err, Error::InvalidFrequency { axis: 'y', .. }));
    }

    #[test]
    fn seed_positions_are_in_metres() {
        let mut s = Settings::default();
        s.crystal.origin = [1.0, 0.0, 0.0];
        let x = s.seed_positions(2);
        assert!((x[0][0] - (1.0e-6 - 2.5e-6)).abs() < 1e-18);
        assert!((x[1][0] - (1.0e-6 + 2.5e-6)).abs() < 1e-18);
    }

    #[test]
    fn bounds_convert_to_pairs() {
        let mut s = Settings::default();
        s.bounds = Some([[-1.0, 1.0], [-2.0, 2.0], [-3.0, 3.0]]);
        assert_eq!(s.axis_bounds(), Some([(-1.0, 1.0), (-2.0, 2.0), (-3.0, 3.0)]));
    }
}
