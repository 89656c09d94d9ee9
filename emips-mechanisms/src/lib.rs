//! Chemical mechanisms for emips
//!
//! Each module holds one mechanism's NMVOC species and their lumping against
//! the reference VOC speciation. Mechanisms are picked by name through
//! [`MechanismKind`] or [`by_name`]; names match case-insensitively so that
//! `radm2_wrfchem` and `RADM2_wrfchem` select the same table.

use emips_core::errors::{EmipsError, EmipsResult};
use emips_core::speciation::{ChemicalMechanism, MechanismTable};
use std::fmt;
use std::str::FromStr;

pub mod cb05;
pub mod mozart;
pub mod radm2;
pub mod saprc99;

pub use cb05::CB05_WRFCHEM;
pub use mozart::MOZART_WRFCHEM;
pub use radm2::RADM2_WRFCHEM;
pub use saprc99::SAPRC99_WRFCHEM;

/// The mechanisms shipped with emips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MechanismKind {
    Radm2WrfChem,
    Cb05WrfChem,
    Saprc99WrfChem,
    MozartWrfChem,
}

impl MechanismKind {
    pub const ALL: [MechanismKind; 4] = [
        MechanismKind::Radm2WrfChem,
        MechanismKind::Cb05WrfChem,
        MechanismKind::Saprc99WrfChem,
        MechanismKind::MozartWrfChem,
    ];

    pub fn table(self) -> &'static MechanismTable {
        match self {
            MechanismKind::Radm2WrfChem => &RADM2_WRFCHEM,
            MechanismKind::Cb05WrfChem => &CB05_WRFCHEM,
            MechanismKind::Saprc99WrfChem => &SAPRC99_WRFCHEM,
            MechanismKind::MozartWrfChem => &MOZART_WRFCHEM,
        }
    }

    pub fn mechanism(self) -> ChemicalMechanism {
        ChemicalMechanism::new(self.table())
    }

    pub fn name(self) -> &'static str {
        self.table().name
    }
}

impl fmt::Display for MechanismKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MechanismKind {
    type Err = EmipsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        MechanismKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| EmipsError::UnregisteredName {
                kind: "mechanism",
                name: name.to_string(),
            })
    }
}

/// Mechanism registered under `name`.
///
/// # Errors
///
/// `UnregisteredName` if no shipped mechanism has that name.
pub fn by_name(name: &str) -> EmipsResult<ChemicalMechanism> {
    name.parse::<MechanismKind>().map(MechanismKind::mechanism)
}
