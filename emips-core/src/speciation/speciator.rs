//! Expansion of pollutant fields into species fields.

use super::mechanism::ChemicalMechanism;
use super::profile::PollutantProfile;
use super::retro::RetroSpecies;
use crate::errors::{EmipsError, EmipsResult};
use crate::registry::Species;
use ndarray::{Array, Array2, Array3, ArrayBase, Data, Dimension};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// A species and its field.
pub type SpeciesField<D> = (Species, Array<f64, D>);

/// Split a pollutant field into the species of `profile`.
///
/// Each species gets `field * mass_fraction`, divided by the molar mass when
/// the species has one, so molar species come out as mole fluxes. The output
/// follows the profile's entry order.
pub fn speciate<S, D>(field: &ArrayBase<S, D>, profile: &PollutantProfile) -> Vec<SpeciesField<D>>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    profile
        .entries()
        .iter()
        .map(|entry| {
            let mut data = field.mapv(|v| v * entry.mass_fraction);
            if let Some(molar_mass) = entry.species.molar_mass {
                data.mapv_inplace(|v| v / molar_mass);
            }
            (entry.species.clone(), data)
        })
        .collect()
}

/// Lump reference VOC fields into the NMVOC species of `mechanism`.
///
/// For every NMVOC species, the reference fields present in `reference` are
/// summed with the mechanism's lumping ratios and divided by the species'
/// molar mass. Species with no matching reference field get a zero field of
/// `shape`, so the result always has one entry per NMVOC species.
pub fn lump_voc<D: Dimension>(
    mechanism: &ChemicalMechanism,
    reference: &BTreeMap<RetroSpecies, Array<f64, D>>,
    shape: D,
) -> Vec<SpeciesField<D>> {
    mechanism
        .table()
        .nmvoc
        .iter()
        .map(|lumped| {
            let mut data: Option<Array<f64, D>> = None;
            for (retro, ratio) in lumped.lumping {
                let Some(field) = reference.get(retro) else {
                    continue;
                };
                match data.as_mut() {
                    Some(acc) => acc.scaled_add(*ratio, field),
                    None => data = Some(field.mapv(|v| v * ratio)),
                }
            }
            let data = match data {
                Some(mut data) => {
                    data.mapv_inplace(|v| v / lumped.molar_mass);
                    data
                }
                None => {
                    warn!(
                        mechanism = %mechanism,
                        species = lumped.name,
                        "no reference VOC species available, emitting zero field"
                    );
                    Array::zeros(shape.clone())
                }
            };
            (lumped.species(), data)
        })
        .collect()
}

/// Split an hourly VOC field with gridded reference ratios.
///
/// Every ratio grid must already be on the field's grid; the result is
/// `hourly * ratio` per reference species, in g/m2/s when `hourly` is.
pub fn grid_speciate(
    hourly: &Array3<f64>,
    ratios: &BTreeMap<RetroSpecies, Array2<f64>>,
) -> EmipsResult<BTreeMap<RetroSpecies, Array3<f64>>> {
    let (_, ny, nx) = hourly.dim();
    let mut out = BTreeMap::new();
    for (species, ratio) in ratios {
        if ratio.dim() != (ny, nx) {
            return Err(EmipsError::GridMismatch {
                expected_y: ny,
                expected_x: nx,
                found: ratio.shape().to_vec(),
            });
        }
        debug!(species = %species, "grid speciation");
        out.insert(*species, hourly * ratio);
    }
    Ok(out)
}
