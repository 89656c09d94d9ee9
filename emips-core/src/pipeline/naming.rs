//! Artifact names.

use crate::registry::Sector;

/// Speciated hourly fields of one pollutant.
pub fn pollutant_artifact(pollutant: &str, sector: Sector, year: i32, month: u32) -> String {
    format!("{pollutant}_emis_{sector}_{year}_{month}_hour")
}

/// Lumped mechanism species of a grid-speciated VOC pollutant.
pub fn lumped_artifact(pollutant: &str, sector: Sector, year: i32, month: u32) -> String {
    format!("{pollutant}_emis_lump_{sector}_{year}_{month}_hour")
}

/// All species of a sector.
pub fn sector_artifact(sector: Sector, year: i32, month: u32) -> String {
    format!("emis_{sector}_{year}_{month}_hour")
}

/// All species of a sector over model layers.
pub fn height_artifact(sector: Sector, year: i32, month: u32) -> String {
    format!("emis_{sector}_{year}_{month}_hour_height")
}
