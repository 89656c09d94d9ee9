//! RADM2 as coupled in WRF-Chem.

use emips_core::speciation::{LumpedSpecies, MechanismTable, RetroSpecies::*};

pub static RADM2_WRFCHEM: MechanismTable = MechanismTable {
    name: "RADM2_wrfchem",
    nmvoc: &[
        LumpedSpecies {
            name: "ALD",
            molar_mass: 44.0,
            description: "Acetaldehyde and higher aldehydes",
            lumping: &[(OtherAlkanals, 1.0)],
        },
        LumpedSpecies {
            name: "CSL",
            molar_mass: 108.0,
            description: "Cresol and other hydroxy substituted aromatics",
            lumping: &[(OtherVoc, 1.0)],
        },
        LumpedSpecies {
            name: "ETH",
            molar_mass: 30.0,
            description: "Ethane",
            lumping: &[(Ethane, 1.0)],
        },
        LumpedSpecies {
            name: "HC3",
            molar_mass: 44.0,
            description: "Alkanes, alcohols, esters and alkynes with OH rate below 3.4e-12",
            lumping: &[
                (Propane, 1.0),
                (Butanes, 1.0),
                (Ethyne, 0.4),
                (Alcohols, 0.95),
                (Esters, 0.69),
            ],
        },
        LumpedSpecies {
            name: "HC5",
            molar_mass: 72.0,
            description: "Alkanes, alcohols, esters and alkynes with OH rate between 3.4e-12 and 6.8e-12",
            lumping: &[
                (Alcohols, 0.05),
                (HexanesPlusHigherAlkanes, 0.43),
                (Pentanes, 1.0),
                (Esters, 0.31),
            ],
        },
        LumpedSpecies {
            name: "HC8",
            molar_mass: 114.0,
            description: "Alkanes, alcohols, esters and alkynes with OH rate above 6.8e-12",
            lumping: &[
                (HexanesPlusHigherAlkanes, 0.57),
                (OtherAromatics, 1.0),
                (Ethers, 1.0),
            ],
        },
        LumpedSpecies {
            name: "HCHO",
            molar_mass: 30.0,
            description: "Formaldehyde",
            lumping: &[(Methanal, 1.0)],
        },
        LumpedSpecies {
            name: "ISO",
            molar_mass: 68.0,
            description: "Isoprene",
            lumping: &[(Isoprene, 1.0)],
        },
        LumpedSpecies {
            name: "KET",
            molar_mass: 72.0,
            description: "Ketones",
            lumping: &[(Ketones, 1.0)],
        },
        LumpedSpecies {
            name: "OL2",
            molar_mass: 28.0,
            description: "Ethene",
            lumping: &[(Ethene, 1.0)],
        },
        LumpedSpecies {
            name: "OLI",
            molar_mass: 56.0,
            description: "Internal alkenes",
            lumping: &[(OtherAlkenesAndAlkynes, 1.0), (Terpenes, 1.0)],
        },
        LumpedSpecies {
            name: "OLT",
            molar_mass: 42.0,
            description: "Terminal alkenes",
            lumping: &[(Propene, 1.0)],
        },
        LumpedSpecies {
            name: "ORA1",
            molar_mass: 46.0,
            description: "Formic acid",
            lumping: &[(Acids, 0.44)],
        },
        LumpedSpecies {
            name: "ORA2",
            molar_mass: 60.0,
            description: "Acetic acid and higher acids",
            lumping: &[(Acids, 0.56)],
        },
        LumpedSpecies {
            name: "TOL",
            molar_mass: 92.0,
            description: "Toluene and less reactive aromatics",
            lumping: &[(Toluene, 1.0), (Benzene, 0.293)],
        },
        LumpedSpecies {
            name: "XYL",
            molar_mass: 106.0,
            description: "Xylene and more reactive aromatics",
            lumping: &[(Xylene, 1.0), (Trimethylbenzenes, 1.0), (OtherAromatics, 1.0)],
        },
        LumpedSpecies {
            name: "CH3CL",
            molar_mass: 50.5,
            description: "Methyl chloride",
            lumping: &[(ChlorinatedHydrocarbons, 1.0)],
        },
    ],
};
