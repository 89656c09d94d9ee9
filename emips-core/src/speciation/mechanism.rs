//! Chemical mechanisms as declarative tables.
//!
//! A mechanism is fully described by its name and its NMVOC species, each
//! carrying a molar mass and a lumping table against the reference VOC
//! speciation. Methane and the inorganic species are shared by every
//! mechanism and come from the registry.

use super::retro::RetroSpecies;
use crate::errors::{EmipsError, EmipsResult};
use crate::registry::{Species, REGISTRY};
use std::collections::HashSet;
use std::fmt;

/// One NMVOC species of a mechanism.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LumpedSpecies {
    pub name: &'static str,
    /// g/mole
    pub molar_mass: f64,
    pub description: &'static str,
    /// Reference species and the ratio each contributes.
    pub lumping: &'static [(RetroSpecies, f64)],
}

impl LumpedSpecies {
    pub fn species(&self) -> Species {
        Species::new(self.name, Some(self.molar_mass))
    }
}

/// Species data of one mechanism.
#[derive(Debug, PartialEq)]
pub struct MechanismTable {
    pub name: &'static str,
    pub nmvoc: &'static [LumpedSpecies],
}

/// A reaction mechanism's species vocabulary and lumping rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChemicalMechanism {
    table: &'static MechanismTable,
}

impl ChemicalMechanism {
    pub const fn new(table: &'static MechanismTable) -> Self {
        Self { table }
    }

    pub fn name(&self) -> &'static str {
        self.table.name
    }

    pub fn table(&self) -> &'static MechanismTable {
        self.table
    }

    /// Non-methane VOC species in table order.
    pub fn nmvoc_species(&self) -> Vec<Species> {
        self.table.nmvoc.iter().map(LumpedSpecies::species).collect()
    }

    /// NMVOC species with methane in second position.
    pub fn voc_species(&self) -> Vec<Species> {
        let mut species = self.nmvoc_species();
        species.insert(species.len().min(1), REGISTRY.methane());
        species
    }

    /// CO, NO, NO2, the VOC species, then the inorganic and aerosol species.
    pub fn all_species(&self) -> Vec<Species> {
        let mut species = REGISTRY.leading_species();
        species.extend(self.voc_species());
        species.extend(REGISTRY.trailing_species());
        species
    }

    /// Species of this mechanism by name.
    pub fn species(&self, name: &str) -> Option<Species> {
        self.all_species().into_iter().find(|s| s.name == name)
    }

    /// Species by name, from this mechanism or the registry.
    ///
    /// # Errors
    ///
    /// `UnregisteredName` if neither knows the name.
    pub fn resolve_species(&self, name: &str) -> EmipsResult<Species> {
        match self.species(name) {
            Some(species) => Ok(species),
            None => REGISTRY.species(name),
        }
    }

    /// Reference species lumped into `species`, with their ratios.
    ///
    /// Empty for anything that is not an NMVOC species of this mechanism, and
    /// for NMVOC species the reference speciation cannot express.
    pub fn lump_retro(&self, species: &str) -> &'static [(RetroSpecies, f64)] {
        self.table
            .nmvoc
            .iter()
            .find(|s| s.name == species)
            .map(|s| s.lumping)
            .unwrap_or(&[])
    }

    /// Check the table: unique names, positive molar masses and non-negative
    /// ratios.
    pub fn validate(&self) -> EmipsResult<()> {
        let invalid = |reason: String| EmipsError::InvalidProfile {
            kind: "mechanism".to_string(),
            id: self.name().to_string(),
            reason,
        };
        let mut seen = HashSet::new();
        for entry in self.table.nmvoc {
            if !seen.insert(entry.name) {
                return Err(invalid(format!("duplicate species {}", entry.name)));
            }
            if entry.molar_mass.is_nan() || entry.molar_mass <= 0.0 {
                return Err(invalid(format!("{} has no positive molar mass", entry.name)));
            }
            if let Some((retro, ratio)) = entry.lumping.iter().find(|(_, r)| r.is_nan() || *r < 0.0) {
                return Err(invalid(format!(
                    "{} lumps {retro} with negative ratio {ratio}",
                    entry.name
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for ChemicalMechanism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) static TOY: MechanismTable = MechanismTable {
        name: "TOY",
        nmvoc: &[
            LumpedSpecies {
                name: "ETH",
                molar_mass: 30.0,
                description: "Ethane",
                lumping: &[(RetroSpecies::Ethane, 1.0)],
            },
            LumpedSpecies {
                name: "HC3",
                molar_mass: 44.0,
                description: "Slow alkanes",
                lumping: &[
                    (RetroSpecies::Propane, 1.0),
                    (RetroSpecies::Butanes, 1.0),
                    (RetroSpecies::Ethyne, 0.4),
                ],
            },
            LumpedSpecies {
                name: "MVK",
                molar_mass: 70.0,
                description: "Methyl vinyl ketone",
                lumping: &[],
            },
        ],
    };

    pub(crate) fn toy() -> ChemicalMechanism {
        ChemicalMechanism::new(&TOY)
    }

    #[test]
    fn test_species_lists() {
        let mechanism = toy();
        let voc: Vec<String> = mechanism.voc_species().into_iter().map(|s| s.name).collect();
        assert_eq!(voc, ["ETH", "CH4", "HC3", "MVK"]);

        let all = mechanism.all_species();
        assert_eq!(all.len(), 3 + 4 + 9);
        assert_eq!(all[0].name, "CO");
        assert_eq!(all[3].name, "ETH");
        assert_eq!(all[all.len() - 1].name, "PMC");
    }

    #[test]
    fn test_species_lookup() {
        let mechanism = toy();
        assert_eq!(mechanism.species("HC3").unwrap().molar_mass, Some(44.0));
        assert!(mechanism.species("OLT").is_none());
        assert!(mechanism.resolve_species("PMFINE").is_ok());
        assert!(matches!(
            mechanism.resolve_species("OLT"),
            Err(EmipsError::UnregisteredName { .. })
        ));
    }

    #[test]
    fn test_lump_retro() {
        let mechanism = toy();
        assert_eq!(mechanism.lump_retro("HC3").len(), 3);
        assert!(mechanism.lump_retro("MVK").is_empty());
        assert!(mechanism.lump_retro("NO2").is_empty());
    }

    #[test]
    fn test_validate() {
        assert!(toy().validate().is_ok());

        static BROKEN: MechanismTable = MechanismTable {
            name: "BROKEN",
            nmvoc: &[LumpedSpecies {
                name: "X",
                molar_mass: 10.0,
                description: "",
                lumping: &[(RetroSpecies::Ethane, -1.0)],
            }],
        };
        assert!(ChemicalMechanism::new(&BROKEN).validate().is_err());
    }
}
