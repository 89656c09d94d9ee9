//! SAPRC-99 as coupled in WRF-Chem.
//!
//! Alkane, aromatic and alkene classes are binned by OH rate constant
//! (ppm-1 min-1).

use emips_core::speciation::{LumpedSpecies, MechanismTable, RetroSpecies::*};

pub static SAPRC99_WRFCHEM: MechanismTable = MechanismTable {
    name: "SAPRC99_wrfchem",
    nmvoc: &[
        LumpedSpecies {
            name: "C2H6",
            molar_mass: 30.0,
            description: "Ethane",
            lumping: &[(Ethane, 1.0)],
        },
        LumpedSpecies {
            name: "C3H8",
            molar_mass: 44.0,
            description: "Propane",
            lumping: &[(Propane, 1.0)],
        },
        LumpedSpecies {
            name: "C2H2",
            molar_mass: 26.0,
            description: "Acetylene",
            lumping: &[(Ethyne, 1.0)],
        },
        LumpedSpecies {
            name: "C3H6",
            molar_mass: 42.0,
            description: "Propene",
            lumping: &[(Propene, 1.0)],
        },
        LumpedSpecies {
            name: "ALK3",
            molar_mass: 58.61,
            description: "Alkanes with kOH between 2.5e3 and 5e3",
            lumping: &[
                (Alcohols, 0.5),
                (Butanes, 1.0),
                (ChlorinatedHydrocarbons, 0.5),
                (OtherVoc, 0.3),
                (Esters, 0.5),
            ],
        },
        LumpedSpecies {
            name: "ALK4",
            molar_mass: 77.6,
            description: "Alkanes with kOH between 5e3 and 1e4",
            lumping: &[
                (Pentanes, 1.0),
                (HexanesPlusHigherAlkanes, 0.5),
                (OtherVoc, 0.3),
                (Esters, 0.5),
                (ChlorinatedHydrocarbons, 0.5),
            ],
        },
        LumpedSpecies {
            name: "ALK5",
            molar_mass: 118.89,
            description: "Alkanes with kOH above 1e4",
            lumping: &[(HexanesPlusHigherAlkanes, 0.5), (Ethers, 1.0), (OtherVoc, 0.3)],
        },
        LumpedSpecies {
            name: "ARO1",
            molar_mass: 95.16,
            description: "Aromatics with kOH below 2e4",
            lumping: &[(Benzene, 1.0), (Toluene, 1.0)],
        },
        LumpedSpecies {
            name: "ARO2",
            molar_mass: 118.72,
            description: "Aromatics with kOH above 2e4",
            lumping: &[(Xylene, 1.0), (Trimethylbenzenes, 1.0), (OtherAromatics, 1.0)],
        },
        LumpedSpecies {
            name: "OLE1",
            molar_mass: 72.34,
            description: "Alkenes other than ethene with kOH below 7e4",
            lumping: &[(OtherAlkenesAndAlkynes, 0.5)],
        },
        LumpedSpecies {
            name: "OLE2",
            molar_mass: 75.78,
            description: "Alkenes with kOH above 7e4",
            lumping: &[(OtherAlkenesAndAlkynes, 0.5)],
        },
        LumpedSpecies {
            name: "TERP",
            molar_mass: 136.24,
            description: "Terpenes",
            lumping: &[(Terpenes, 1.0)],
        },
        LumpedSpecies {
            name: "ETHENE",
            molar_mass: 28.05,
            description: "Ethene",
            lumping: &[(Ethene, 1.0)],
        },
        LumpedSpecies {
            name: "ISOPRENE",
            molar_mass: 68.12,
            description: "Isoprene",
            lumping: &[(Isoprene, 1.0)],
        },
        LumpedSpecies {
            name: "HCHO",
            molar_mass: 30.03,
            description: "Formaldehyde",
            lumping: &[(Methanal, 1.0)],
        },
        LumpedSpecies {
            name: "CCHO",
            molar_mass: 44.05,
            description: "Acetaldehyde",
            lumping: &[(OtherAlkanals, 0.5)],
        },
        LumpedSpecies {
            name: "RCHO",
            molar_mass: 58.08,
            description: "Higher aldehydes",
            lumping: &[(OtherAlkanals, 0.5)],
        },
        LumpedSpecies {
            name: "ACET",
            molar_mass: 58.08,
            description: "Acetone",
            lumping: &[(Ketones, 0.5)],
        },
        LumpedSpecies {
            name: "MEK",
            molar_mass: 72.11,
            description: "Ketones with reactivity below 0.73",
            lumping: &[(Ketones, 0.3)],
        },
        LumpedSpecies {
            name: "MEOH",
            molar_mass: 32.04,
            description: "Methanol",
            lumping: &[(Alcohols, 0.5)],
        },
        LumpedSpecies {
            name: "PROD2",
            molar_mass: 116.16,
            description: "Ketones with reactivity above 0.73",
            lumping: &[(Ketones, 0.2)],
        },
        LumpedSpecies {
            name: "HCOOH",
            molar_mass: 46.03,
            description: "Formic acid",
            lumping: &[(Acids, 0.5)],
        },
        LumpedSpecies {
            name: "CCO_OH",
            molar_mass: 60.05,
            description: "Acetic acid",
            lumping: &[(Acids, 0.5)],
        },
    ],
};
