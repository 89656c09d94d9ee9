//! MOZART-4 as coupled in WRF-Chem.

use emips_core::speciation::{LumpedSpecies, MechanismTable, RetroSpecies::*};

pub static MOZART_WRFCHEM: MechanismTable = MechanismTable {
    name: "MOZART_wrfchem",
    nmvoc: &[
        LumpedSpecies {
            name: "BIGALK",
            molar_mass: 72.0,
            description: "Lumped alkanes C > 3",
            lumping: &[(Butanes, 1.0), (Pentanes, 1.0), (HexanesPlusHigherAlkanes, 1.0)],
        },
        LumpedSpecies {
            name: "BIGENE",
            molar_mass: 56.0,
            description: "Lumped alkenes C > 3",
            lumping: &[(OtherAlkenesAndAlkynes, 1.0)],
        },
        LumpedSpecies {
            name: "C2H4",
            molar_mass: 28.0,
            description: "Ethene",
            lumping: &[(Ethene, 1.0)],
        },
        LumpedSpecies {
            name: "C2H5OH",
            molar_mass: 46.0,
            description: "Ethanol",
            lumping: &[(Alcohols, 0.5)],
        },
        LumpedSpecies {
            name: "C2H6",
            molar_mass: 30.0,
            description: "Ethane",
            lumping: &[(Ethane, 1.0)],
        },
        LumpedSpecies {
            name: "C3H6",
            molar_mass: 42.0,
            description: "Propene",
            lumping: &[(Propene, 1.0)],
        },
        LumpedSpecies {
            name: "C3H8",
            molar_mass: 44.0,
            description: "Propane",
            lumping: &[(Propane, 1.0)],
        },
        LumpedSpecies {
            name: "CH2O",
            molar_mass: 30.0,
            description: "Methanal",
            lumping: &[(Methanal, 1.0)],
        },
        LumpedSpecies {
            name: "CH3CHO",
            molar_mass: 44.0,
            description: "Acetaldehyde",
            lumping: &[(OtherAlkanals, 1.0)],
        },
        LumpedSpecies {
            name: "CH3COCH3",
            molar_mass: 58.0,
            description: "Acetone",
            lumping: &[(Ketones, 0.5)],
        },
        LumpedSpecies {
            name: "CH3OH",
            molar_mass: 32.0,
            description: "Methanol",
            lumping: &[(Alcohols, 0.5)],
        },
        LumpedSpecies {
            name: "MEK",
            molar_mass: 72.0,
            description: "Methyl ethyl ketone",
            lumping: &[(Ketones, 0.5)],
        },
        LumpedSpecies {
            name: "TOLUENE",
            molar_mass: 92.0,
            description: "Lumped aromatics",
            lumping: &[(Toluene, 1.0), (OtherAromatics, 0.25)],
        },
        LumpedSpecies {
            name: "BENZENE",
            molar_mass: 78.0,
            description: "Benzene",
            lumping: &[(Benzene, 1.0)],
        },
        LumpedSpecies {
            name: "XYLENE",
            molar_mass: 106.0,
            description: "Xylene",
            lumping: &[(Xylene, 1.0), (Trimethylbenzenes, 1.0), (OtherAromatics, 0.75)],
        },
        LumpedSpecies {
            name: "ISOP",
            molar_mass: 68.0,
            description: "Isoprene",
            lumping: &[(Isoprene, 1.0)],
        },
        LumpedSpecies {
            name: "APIN",
            molar_mass: 136.0,
            description: "Terpenes",
            lumping: &[(Terpenes, 1.0)],
        },
        LumpedSpecies {
            name: "C2H2",
            molar_mass: 26.0,
            description: "Ethyne",
            lumping: &[(Ethyne, 1.0)],
        },
        LumpedSpecies {
            name: "MGLY",
            molar_mass: 72.0,
            description: "Methylglyoxal",
            lumping: &[(OtherVoc, 1.0)],
        },
        // Unsaturated ketones have no counterpart in the reference speciation.
        LumpedSpecies {
            name: "MVK",
            molar_mass: 70.0,
            description: "Methyl vinyl ketone and unsaturated ketones",
            lumping: &[],
        },
        LumpedSpecies {
            name: "GCOOH",
            molar_mass: 46.0,
            description: "Formic acid",
            lumping: &[(Acids, 1.0)],
        },
        LumpedSpecies {
            name: "CRESOL",
            molar_mass: 108.0,
            description: "Cresol",
            lumping: &[(Esters, 1.0), (Ethers, 1.0)],
        },
    ],
};
