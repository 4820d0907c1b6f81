use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::constants::{ATOMIC_MASS, ELEMENTARY_CHARGE};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid or unsupported ion species: '{0}'")]
pub struct ParseSpeciesError(String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseIonError {
    #[error(transparent)]
    Species(#[from] ParseSpeciesError),

    #[error("invalid ion count in '{0}'")]
    Count(String),

    #[error("malformed ion list entry: '{0}'")]
    Malformed(String),
}

/// Ion species known to the solver.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub enum Species {
    Be9,
    Mg24,
    #[default]
    Ca40,
    Ba137,
    Yb171,
}

impl Species {
    pub const ALL: [Species; 5] = [
        Species::Be9,
        Species::Mg24,
        Species::Ca40,
        Species::Ba137,
        Species::Yb171,
    ];

    /// Isotopic mass in atomic mass units.
    pub fn mass_amu(&self) -> f64 {
        match self {
            Species::Be9 => 9.012_183_1,
            Species::Mg24 => 23.985_041_7,
            Species::Ca40 => 39.962_590_9,
            Species::Ba137 => 136.905_827_1,
            Species::Yb171 => 170.936_325_8,
        }
    }

    /// Charge state in units of the elementary charge.
    pub fn charge_number(&self) -> f64 {
        1.0
    }

    pub fn name(&self) -> &'static str {
        match self {
            Species::Be9 => "Be9",
            Species::Mg24 => "Mg24",
            Species::Ca40 => "Ca40",
            Species::Ba137 => "Ba137",
            Species::Yb171 => "Yb171",
        }
    }

    pub fn ion(&self) -> Ion {
        Ion::from(*self)
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Species {
    type Err = ParseSpeciesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Species::ALL
            .iter()
            .copied()
            .find(|species| species.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseSpeciesError(s.to_string()))
    }
}

impl TryFrom<String> for Species {
    type Error = ParseSpeciesError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Species> for String {
    fn from(species: Species) -> Self {
        species.name().to_string()
    }
}

/// A trapped point charge.
///
/// Two ions compare equal when they describe the same species with the
/// same mass and charge; several entries of one species in a crystal are
/// distinct only by their position in the ion list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ion {
    pub species: Species,
    pub mass_amu: f64,
    pub charge_number: f64,
}

impl Ion {
    pub fn new(species: Species) -> Self {
        Self {
            species,
            mass_amu: species.mass_amu(),
            charge_number: species.charge_number(),
        }
    }

    /// Mass in kilograms.
    #[inline]
    pub fn mass(&self) -> f64 {
        self.mass_amu * ATOMIC_MASS
    }

    /// Charge in coulombs.
    #[inline]
    pub fn charge(&self) -> f64 {
        self.charge_number * ELEMENTARY_CHARGE
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.species.name()
    }
}

impl From<Species> for Ion {
    fn from(species: Species) -> Self {
        Self::new(species)
    }
}

impl fmt::Display for Ion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses a comma-separated ion list such as `"Ca40 * 2, Be9, 3 * Mg24"`.
///
/// Each entry is a species name, optionally multiplied by a count on
/// either side. The order of the returned ions follows the text.
pub fn parse_ion_list(s: &str) -> Result<Vec<Ion>, ParseIonError> {
    let mut ions = Vec::new();

    for entry in s.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (species, count) = parse_entry(entry)?;
        ions.extend(std::iter::repeat_n(species.ion(), count));
    }

    Ok(ions)
}

fn parse_entry(entry: &str) -> Result<(Species, usize), ParseIonError> {
    let parts: Vec<&str> = entry.split('*').map(str::trim).collect();

    match parts.as_slice() {
        [name] => Ok((name.parse()?, 1)),
        [lhs, rhs] => {
            let (name, count) = if lhs.chars().all(|c| c.is_ascii_digit()) {
                (rhs, lhs)
            } else {
                (lhs, rhs)
            };
            let count = count
                .parse::<usize>()
                .map_err(|_| ParseIonError::Count(entry.to_string()))?;
            Ok((name.parse()?, count))
        }
        _ => Err(ParseIonError::Malformed(entry.to_string())),
    }
}
