//! Chemical speciation.
//!
//! Pollutant fields are split into species with per-source-category
//! [`SpeciationTable`] profiles, or, for aggregate VOC, split with gridded
//! reference ratios and lumped into a [`ChemicalMechanism`]'s species.

pub mod mechanism;
pub mod profile;
pub mod retro;
pub mod speciator;

pub use mechanism::{ChemicalMechanism, LumpedSpecies, MechanismTable};
pub use profile::{PollutantProfile, SpeciationEntry, SpeciationTable};
pub use retro::RetroSpecies;
pub use speciator::{grid_speciate, lump_voc, speciate, SpeciesField};
