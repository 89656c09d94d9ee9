//! Emission inventory processing for air-quality models
//!
//! Re-exports the processing core and the shipped chemical mechanisms, and
//! wires a [`RunConfig`] into a ready-to-run [`Pipeline`].

pub use emips_core::{
    artifact, config, errors, grid, pipeline, registry, spatial, speciation, temporal, units,
};
pub use emips_core::{EmipsError, EmipsResult};
pub use emips_mechanisms as mechanisms;
pub use emips_mechanisms::MechanismKind;

use emips_core::artifact::ArtifactStore;
use emips_core::config::RunConfig;
use emips_core::pipeline::{EmissionReader, Pipeline};
use emips_core::speciation::ChemicalMechanism;
use std::sync::Arc;
use tracing::info;

/// Shipped mechanism registered under `name`, matched case-insensitively.
pub fn mechanism(name: &str) -> EmipsResult<ChemicalMechanism> {
    emips_mechanisms::by_name(name)
}

/// Pipeline for `config` using the mechanism it names.
///
/// # Errors
///
/// `UnregisteredName` for an unknown mechanism, and anything
/// [`Pipeline::new`] reports about the configuration or its profile files.
pub fn build_pipeline(
    config: &RunConfig,
    reader: Arc<dyn EmissionReader>,
    store: Arc<dyn ArtifactStore>,
) -> EmipsResult<Pipeline> {
    let mechanism = mechanism(&config.mechanism)?;
    info!(
        mechanism = %mechanism,
        year = config.year,
        month = config.month,
        sectors = config.sectors.len(),
        pollutants = config.pollutants.len(),
        "building pipeline"
    );
    Pipeline::new(config, mechanism, reader, store)
}
