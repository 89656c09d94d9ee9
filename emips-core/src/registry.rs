//! Closed registries of species, pollutants and sectors.
//!
//! These are the names the pipeline understands out of the box. Lookups of
//! anything else fail with [`EmipsError::UnregisteredName`] instead of
//! inventing a placeholder entry.
//!
//! Mechanism-specific VOC species are not listed here, they come from the
//! mechanism tables (see [`crate::speciation::ChemicalMechanism`]).

use crate::errors::{EmipsError, EmipsResult};
use crate::units::Units;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::LazyLock;

/// A chemical species.
///
/// Species with a molar mass (g/mole) are emitted as molar fluxes; species
/// without one (aerosol components) stay mass fluxes. Two species are equal
/// when their names are.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Species {
    pub name: String,
    pub molar_mass: Option<f64>,
}

impl Species {
    pub fn new(name: impl Into<String>, molar_mass: Option<f64>) -> Self {
        Self {
            name: name.into(),
            molar_mass,
        }
    }

    /// Registered species by name.
    pub fn lookup(name: &str) -> EmipsResult<Self> {
        REGISTRY.species(name)
    }

    /// Output units after speciation: molar when a molar mass is known.
    pub fn output_units(&self) -> Units {
        if self.molar_mass.is_some() {
            Units::mole_m2_s()
        } else {
            Units::g_m2_s()
        }
    }
}

impl PartialEq for Species {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Species {}

impl Hash for Species {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// An inventory pollutant.
///
/// Equality compares name and units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pollutant {
    pub name: String,
    pub units: Units,
    /// Aggregate VOC, eligible for grid speciation and lumping.
    pub is_voc: bool,
    /// Species the pollutant maps to one-to-one when it has no speciation
    /// profile.
    pub pass_through: Option<String>,
}

impl Pollutant {
    /// Registered pollutant by name, in its default inventory units.
    pub fn lookup(name: &str) -> EmipsResult<Self> {
        REGISTRY.pollutant(name)
    }

    pub fn with_units(mut self, units: Units) -> Self {
        self.units = units;
        self
    }

    /// Pollutant name used by speciation reference files.
    pub fn speciation_name(&self) -> &str {
        if self.is_voc {
            "TOG"
        } else {
            &self.name
        }
    }
}

impl PartialEq for Pollutant {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.units == other.units
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Coarse grouping of source categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sector {
    Energy,
    Industry,
    Residential,
    Transport,
    Agriculture,
    Ships,
    Air,
    Biomass,
    WasteTreatment,
}

impl Sector {
    pub const ALL: [Sector; 9] = [
        Sector::Energy,
        Sector::Industry,
        Sector::Residential,
        Sector::Transport,
        Sector::Agriculture,
        Sector::Ships,
        Sector::Air,
        Sector::Biomass,
        Sector::WasteTreatment,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Sector::Energy => "energy",
            Sector::Industry => "industry",
            Sector::Residential => "residential",
            Sector::Transport => "transport",
            Sector::Agriculture => "agriculture",
            Sector::Ships => "ships",
            Sector::Air => "air",
            Sector::Biomass => "biomass",
            Sector::WasteTreatment => "waste_treatment",
        }
    }

    /// Representative source category code of the sector.
    pub fn default_scc(&self) -> &'static str {
        match self {
            Sector::Energy => "10100101",
            Sector::Industry => "30100101",
            Sector::Residential => "2104001000",
            Sector::Transport => "2294000000",
            Sector::Agriculture => "28050000",
            Sector::Ships => "2280000000",
            Sector::Air => "2275000000",
            Sector::Biomass => "2810001000",
            Sector::WasteTreatment => "50100101",
        }
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Sector {
    type Err = EmipsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Sector::ALL
            .into_iter()
            .find(|sector| sector.name() == lower)
            .ok_or_else(|| EmipsError::UnregisteredName {
                kind: "sector",
                name: s.to_string(),
            })
    }
}

/// Molar mass of methane in g/mole.
pub const CH4_MOLAR_MASS: f64 = 16.0;

const MOLAR_SPECIES: [(&str, f64); 7] = [
    ("CO", 28.0),
    ("NO", 30.0),
    ("NO2", 46.0),
    ("NH3", 17.0),
    ("SO2", 64.0),
    ("SULF", 98.0),
    ("CH4", CH4_MOLAR_MASS),
];

const AEROSOL_SPECIES: [&str; 6] = ["PEC", "PMFINE", "PNO3", "POA", "PSO4", "PMC"];

/// The global species and pollutant registry.
pub static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

/// Registry of the inorganic and aerosol species and the inventory pollutants.
#[derive(Debug)]
pub struct Registry {
    species: HashMap<&'static str, Species>,
    pollutants: HashMap<&'static str, Pollutant>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        let mut registry = Self {
            species: HashMap::new(),
            pollutants: HashMap::new(),
        };
        registry.register_species();
        registry.register_pollutants();
        registry
    }

    fn register_species(&mut self) {
        for (name, mass) in MOLAR_SPECIES {
            self.species.insert(name, Species::new(name, Some(mass)));
        }
        for name in AEROSOL_SPECIES {
            self.species.insert(name, Species::new(name, None));
        }
    }

    fn register_pollutants(&mut self) {
        let table: [(&'static str, bool, Option<&str>); 11] = [
            ("BC", false, Some("PEC")),
            ("OC", false, Some("POA")),
            ("CO", false, Some("CO")),
            ("CH4", false, Some("CH4")),
            ("NH3", false, Some("NH3")),
            ("SO2", false, Some("SO2")),
            ("NOx", false, None),
            ("PM2_5", false, None),
            ("PM10", false, Some("PMC")),
            ("NMVOC", true, None),
            ("VOC", true, None),
        ];
        for (name, is_voc, pass_through) in table {
            self.pollutants.insert(
                name,
                Pollutant {
                    name: name.to_string(),
                    units: Units::kg_m2_s(),
                    is_voc,
                    pass_through: pass_through.map(str::to_string),
                },
            );
        }
    }

    pub fn species(&self, name: &str) -> EmipsResult<Species> {
        self.species
            .get(name)
            .cloned()
            .ok_or_else(|| EmipsError::UnregisteredName {
                kind: "species",
                name: name.to_string(),
            })
    }

    pub fn pollutant(&self, name: &str) -> EmipsResult<Pollutant> {
        self.pollutants
            .get(name)
            .cloned()
            .ok_or_else(|| EmipsError::UnregisteredName {
                kind: "pollutant",
                name: name.to_string(),
            })
    }

    /// CO, NO and NO2, which lead the output species list.
    pub fn leading_species(&self) -> Vec<Species> {
        self.ordered(&["CO", "NO", "NO2"])
    }

    /// Inorganic and aerosol species that follow the VOCs in output order.
    pub fn trailing_species(&self) -> Vec<Species> {
        self.ordered(&[
            "NH3", "SO2", "SULF", "PEC", "PMFINE", "PNO3", "POA", "PSO4", "PMC",
        ])
    }

    pub fn methane(&self) -> Species {
        Species::new("CH4", Some(CH4_MOLAR_MASS))
    }

    fn ordered(&self, names: &[&str]) -> Vec<Species> {
        names
            .iter()
            .filter_map(|name| self.species.get(*name).cloned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_species_lookup() {
        let no2 = Species::lookup("NO2").unwrap();
        assert_eq!(no2.molar_mass, Some(46.0));
        assert_eq!(no2.output_units(), Units::mole_m2_s());

        let pec = Species::lookup("PEC").unwrap();
        assert_eq!(pec.molar_mass, None);
        assert_eq!(pec.output_units(), Units::g_m2_s());

        assert!(matches!(
            Species::lookup("XYZ"),
            Err(EmipsError::UnregisteredName { kind: "species", .. })
        ));
    }

    #[test]
    fn test_species_equality_by_name() {
        assert_eq!(Species::new("NO", Some(30.0)), Species::new("NO", None));
        assert_ne!(Species::new("NO", None), Species::new("NO2", None));
    }

    #[test]
    fn test_pollutant_lookup() {
        let bc = Pollutant::lookup("BC").unwrap();
        assert_eq!(bc.pass_through.as_deref(), Some("PEC"));
        assert_eq!(bc.units, Units::kg_m2_s());
        assert_eq!(bc.speciation_name(), "BC");

        let voc = Pollutant::lookup("NMVOC").unwrap();
        assert!(voc.is_voc);
        assert_eq!(voc.speciation_name(), "TOG");

        assert!(Pollutant::lookup("Dust").is_err());
    }

    #[test]
    fn test_pollutant_equality_includes_units() {
        let a = Pollutant::lookup("CO").unwrap();
        let b = a.clone().with_units(Units::g_m2_month());
        assert_ne!(a, b);
        assert_eq!(a, Pollutant::lookup("CO").unwrap());
    }

    #[test]
    fn test_sector_names() {
        assert_eq!("waste_treatment".parse::<Sector>().unwrap(), Sector::WasteTreatment);
        assert_eq!("Energy".parse::<Sector>().unwrap(), Sector::Energy);
        assert_eq!(Sector::Residential.default_scc(), "2104001000");
        assert!("volcano".parse::<Sector>().is_err());
        for sector in Sector::ALL {
            assert_eq!(sector.name().parse::<Sector>().unwrap(), sector);
        }
    }

    #[test]
    fn test_output_order() {
        assert_eq!(REGISTRY.leading_species().len(), 3);
        assert_eq!(REGISTRY.methane(), Species::lookup("CH4").unwrap());
        let names: Vec<String> = REGISTRY
            .trailing_species()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names.first().map(String::as_str), Some("NH3"));
        assert_eq!(names.last().map(String::as_str), Some("PMC"));
    }
}
