//! Sector aggregation stages.
//!
//! [`Pipeline::merge_sector`] sums the species of every unit written for a
//! sector into one artifact listing all mechanism species, zero where no unit
//! contributed. [`Pipeline::run_vertical_sector`] spreads that artifact over
//! model layers with the sector's vertical profile.

use super::{naming, Pipeline, Stage, HOURLY_DIMS};
use crate::artifact::{units_attr, Artifact, ArtifactDim, Attributes};
use crate::config::SectorConfig;
use crate::errors::{EmipsError, EmipsResult};
use crate::registry::Sector;
use crate::temporal::vertical_allocation;
use ndarray::{Array3, Ix3};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// What the units of one sector produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorManifest {
    pub sector: Sector,
    /// Artifacts to merge, one per unit that had emission.
    pub written: Vec<String>,
    /// Pollutants the inventory had no field for, and VOC units with no
    /// speciation profile.
    pub empty: Vec<String>,
}

impl SectorManifest {
    pub fn new(sector: Sector) -> Self {
        Self {
            sector,
            written: Vec::new(),
            empty: Vec::new(),
        }
    }
}

struct MergedSpecies {
    name: String,
    attrs: Attributes,
    data: Array3<f64>,
}

impl Pipeline {
    /// Sum every written unit of `manifest` into the sector artifact.
    ///
    /// # Errors
    ///
    /// `MissingUpstreamArtifact` if a unit listed as written cannot be read
    /// back. Units with no emission are not expected and are skipped.
    pub fn merge_sector(&self, manifest: &SectorManifest) -> EmipsResult<Artifact> {
        let sector = manifest.sector;
        info!(sector = %sector, stage = %Stage::MergeSector, units = manifest.written.len(), "stage");
        let (ny, nx) = self.model_grid.shape();
        let mut merged: Vec<MergedSpecies> = self
            .mechanism
            .all_species()
            .into_iter()
            .map(|species| MergedSpecies {
                attrs: units_attr(species.output_units().to_string()),
                name: species.name,
                data: Array3::zeros((24, ny, nx)),
            })
            .collect();

        for name in &manifest.written {
            let artifact = self.store.read(name)?.ok_or_else(|| {
                EmipsError::MissingUpstreamArtifact {
                    sector: sector.to_string(),
                    name: name.clone(),
                }
            })?;
            for variable in artifact.variables() {
                let data = variable
                    .data
                    .view()
                    .into_dimensionality::<Ix3>()
                    .map_err(|_| EmipsError::GridMismatch {
                        expected_y: ny,
                        expected_x: nx,
                        found: variable.data.shape().to_vec(),
                    })?;
                if data.dim() != (24, ny, nx) {
                    return Err(EmipsError::GridMismatch {
                        expected_y: ny,
                        expected_x: nx,
                        found: data.shape().to_vec(),
                    });
                }
                match merged.iter_mut().find(|m| m.name == variable.name) {
                    Some(species) => species.data += &data,
                    None => {
                        warn!(sector = %sector, species = %variable.name, artifact = %name, "species outside the mechanism list, merged as extra variable");
                        merged.push(MergedSpecies {
                            name: variable.name.clone(),
                            attrs: variable.attrs.clone(),
                            data: data.to_owned(),
                        });
                    }
                }
            }
        }

        let mut artifact = self.hourly_artifact(&naming::sector_artifact(sector, self.year, self.month));
        for species in merged {
            artifact.add_variable(species.name, &HOURLY_DIMS, species.data.into_dyn(), species.attrs)?;
        }
        self.store.write(&artifact)?;
        Ok(artifact)
    }

    /// Spread the merged sector artifact over model layers.
    ///
    /// Source categories without a vertical profile emit at the surface
    /// only.
    ///
    /// # Errors
    ///
    /// `MissingUpstreamArtifact` if the sector has not been merged.
    pub fn run_vertical_sector(&self, sector: &SectorConfig) -> EmipsResult<Artifact> {
        info!(sector = %sector.sector, stage = %Stage::VerticalAllocate, "stage");
        let source = naming::sector_artifact(sector.sector, self.year, self.month);
        let merged = self.store.read(&source)?.ok_or_else(|| {
            EmipsError::MissingUpstreamArtifact {
                sector: sector.sector.to_string(),
                name: source.clone(),
            }
        })?;
        let profile = self.vertical.get(sector.scc());
        let layers = profile.layers();

        let mut artifact = Artifact::new(naming::height_artifact(sector.sector, self.year, self.month))
            .with_dim(ArtifactDim::new("hour", (0..24).map(f64::from).collect()))
            .with_dim(ArtifactDim::new("layer", (1..=layers).map(|l| l as f64).collect()))
            .with_dim(ArtifactDim::new("y", self.model_grid.y_coords().to_vec()))
            .with_dim(ArtifactDim::new("x", self.model_grid.x_coords().to_vec()));
        for variable in merged.variables() {
            let hourly = variable
                .data
                .view()
                .into_dimensionality::<Ix3>()
                .map_err(|_| EmipsError::Artifact(format!("{source}: {} is not (hour, y, x)", variable.name)))?
                .to_owned();
            artifact.add_variable(
                variable.name.clone(),
                &["hour", "layer", "y", "x"],
                vertical_allocation(&hourly, &profile).into_dyn(),
                variable.attrs.clone(),
            )?;
        }
        self.store.write(&artifact)?;
        Ok(artifact)
    }
}
