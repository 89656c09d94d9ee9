//! Reference VOC speciation (RETRO).
//!
//! Mechanism lumping tables are expressed against this vocabulary: 25
//! anthropogenic VOC classes plus the individual compounds reported for
//! biomass burning.

use crate::errors::EmipsError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! retro_species {
    ($($variant:ident => $name:literal, $biomass:literal;)+) => {
        /// A reference VOC species.
        #[allow(clippy::upper_case_acronyms)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum RetroSpecies {
            $(
                #[serde(rename = $name)]
                $variant,
            )+
        }

        impl RetroSpecies {
            pub const ALL: &'static [RetroSpecies] = &[$(RetroSpecies::$variant),+];

            /// Name as it appears in gridded ratio files.
            pub fn name(&self) -> &'static str {
                match self {
                    $(RetroSpecies::$variant => $name,)+
                }
            }

            /// Whether the species belongs to the biomass burning list.
            pub fn is_biomass(&self) -> bool {
                match self {
                    $(RetroSpecies::$variant => $biomass,)+
                }
            }
        }
    };
}

retro_species! {
    Alcohols => "Alcohols", false;
    Ethane => "Ethane", false;
    Propane => "Propane", false;
    Butanes => "Butanes", false;
    Pentanes => "Pentanes", false;
    HexanesPlusHigherAlkanes => "Hexanes_plus_higher_alkanes", false;
    Ethene => "Ethene", false;
    Propene => "Propene", false;
    Ethyne => "Ethyne", false;
    Isoprene => "Isoprene", false;
    Terpenes => "Terpenes", false;
    OtherAlkenesAndAlkynes => "Other_alkenes_and_alkynes", false;
    Benzene => "Benzene", false;
    Toluene => "Toluene", false;
    Xylene => "Xylene", false;
    Trimethylbenzenes => "Trimethylbenzenes", false;
    OtherAromatics => "Other_aromatics", false;
    Esters => "Esters", false;
    Ethers => "Ethers", false;
    ChlorinatedHydrocarbons => "Chlorinated_hydrocarbons", false;
    Methanal => "Methanal", false;
    OtherAlkanals => "Other_alkanals", false;
    Ketones => "Ketones", false;
    Acids => "Acids", false;
    OtherVoc => "Other_VOC", false;
    C2H2 => "C2H2", true;
    C2H4 => "C2H4", true;
    C2H4O => "C2H4O", true;
    C2H5OH => "C2H5OH", true;
    C2H6 => "C2H6", true;
    C2H6S => "C2H6S", true;
    C3H6 => "C3H6", true;
    C3H6O => "C3H6O", true;
    C3H8 => "C3H8", true;
    C5H8 => "C5H8", true;
    C6H6 => "C6H6", true;
    C7H8 => "C7H8", true;
    C8H10 => "C8H10", true;
    C10H16 => "C10H16", true;
    CH2O => "CH2O", true;
    CH3COCHO => "CH3COCHO", true;
    CH3COOH => "CH3COOH", true;
    CH3OH => "CH3OH", true;
    HCOOH => "HCOOH", true;
    HigherAlkanes => "Higher_Alkanes", true;
    HigherAlkenes => "Higher_Alkenes", true;
    MEK => "MEK", true;
    NMHC => "NMHC", true;
    TolueneLump => "Toluene_lump", true;
}

impl fmt::Display for RetroSpecies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RetroSpecies {
    type Err = EmipsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RetroSpecies::ALL
            .iter()
            .copied()
            .find(|species| species.name() == s)
            .ok_or_else(|| EmipsError::UnregisteredName {
                kind: "reference VOC species",
                name: s.to_string(),
            })
    }
}
