//! Carbon Bond 05 as coupled in WRF-Chem.
//!
//! Carbon bond species count bonds rather than molecules, so a single
//! reference species can feed several of them with ratios above one.

use emips_core::speciation::{LumpedSpecies, MechanismTable, RetroSpecies::*};

pub static CB05_WRFCHEM: MechanismTable = MechanismTable {
    name: "CB05_wrfchem",
    nmvoc: &[
        LumpedSpecies {
            name: "ETOH",
            molar_mass: 46.0,
            description: "Ethanol",
            lumping: &[(Alcohols, 0.5)],
        },
        LumpedSpecies {
            name: "ETHA",
            molar_mass: 30.0,
            description: "Ethane",
            lumping: &[(Ethane, 1.0)],
        },
        LumpedSpecies {
            name: "PAR",
            molar_mass: 16.0,
            description: "Paraffin carbon bond",
            lumping: &[
                (Propane, 1.5),
                (Butanes, 4.0),
                (Pentanes, 5.0),
                (HexanesPlusHigherAlkanes, 6.0),
                (Propene, 1.0),
                (Ethyne, 1.0),
                (OtherAlkenesAndAlkynes, 3.5),
                (Benzene, 1.0),
                (Trimethylbenzenes, 1.0),
                (OtherAromatics, 2.25),
                (Esters, 1.0),
                (Ethers, 2.0),
                (Ketones, 3.0),
                (Acids, 0.5),
                (OtherVoc, 1.0),
            ],
        },
        LumpedSpecies {
            name: "NR",
            molar_mass: 16.0,
            description: "Non-reactive carbon",
            lumping: &[
                (Propane, 1.5),
                (Ethyne, 1.0),
                (Benzene, 5.0),
                (Esters, 1.0),
                (Ethers, 1.0),
                (ChlorinatedHydrocarbons, 1.0),
                (Acids, 1.0),
                (OtherVoc, 1.0),
            ],
        },
        LumpedSpecies {
            name: "ETH",
            molar_mass: 28.0,
            description: "Ethene",
            lumping: &[(Ethene, 1.0)],
        },
        LumpedSpecies {
            name: "OLE",
            molar_mass: 27.0,
            description: "Olefinic carbon bond",
            lumping: &[(Propene, 1.0), (OtherAlkenesAndAlkynes, 0.5)],
        },
        LumpedSpecies {
            name: "ALDX",
            molar_mass: 44.0,
            description: "Propionaldehyde and higher aldehydes",
            lumping: &[(OtherAlkenesAndAlkynes, 0.75)],
        },
        LumpedSpecies {
            name: "ISOP",
            molar_mass: 68.0,
            description: "Isoprene",
            lumping: &[(Isoprene, 1.0)],
        },
        LumpedSpecies {
            name: "TERP",
            molar_mass: 136.0,
            description: "Terpenes",
            lumping: &[(Terpenes, 1.0)],
        },
        LumpedSpecies {
            name: "TOL",
            molar_mass: 92.0,
            description: "Toluene",
            lumping: &[(Toluene, 1.0), (OtherAromatics, 0.25)],
        },
        LumpedSpecies {
            name: "XYL",
            molar_mass: 106.0,
            description: "Xylene",
            lumping: &[(Xylene, 1.0), (Trimethylbenzenes, 1.0), (OtherAromatics, 0.75)],
        },
        LumpedSpecies {
            name: "FORM",
            molar_mass: 30.0,
            description: "Formaldehyde",
            lumping: &[(Methanal, 1.0)],
        },
        LumpedSpecies {
            name: "ALD2",
            molar_mass: 44.0,
            description: "Acetaldehyde",
            lumping: &[(OtherAlkanals, 1.0)],
        },
        LumpedSpecies {
            name: "MEOH",
            molar_mass: 32.0,
            description: "Methanol",
            lumping: &[(Alcohols, 0.5)],
        },
        LumpedSpecies {
            name: "IOLE",
            molar_mass: 48.0,
            description: "Internal olefin carbon bond",
            lumping: &[(OtherAlkenesAndAlkynes, 0.75)],
        },
    ],
};
