//! Processing chain from inventory fields to model-ready species fields.
//!
//! Each (sector, pollutant) unit runs
//!
//! ```text
//! ReadRaw -> ConvertUnits -> SpatialAllocate -> TemporalAllocate
//!         -> ChemicalSpeciate | GridSpeciate -> LumpVoc
//!         -> Persist
//! ```
//!
//! and ends in one artifact holding the unit's mechanism species. Aggregate
//! VOC takes the grid branch when grid speciation is enabled, everything else
//! the profile branch. Once every unit of a sector is done the sector is
//! merged and, optionally, spread over model layers (see [`aggregate`]).
//!
//! Units only share read-only tables, so the pollutants of a sector may run
//! on a worker pool; the merge waits for all of them.

pub mod aggregate;
pub mod io;
pub mod naming;

pub use aggregate::SectorManifest;
pub use io::{EmissionReader, GriddedRatioStore, MemoryInventory, MemoryRatioStore};

use crate::artifact::{units_attr, Artifact, ArtifactDim, ArtifactStore};
use crate::config::{PollutantConfig, RunConfig, SectorConfig, TemporalMode};
use crate::errors::{EmipsError, EmipsResult};
use crate::grid::GridDescriptor;
use crate::registry::{Pollutant, Sector, Species};
use crate::spatial::{pad_field, GeodesyProvider, RegridMethod, SpatialAllocator};
use crate::speciation::{grid_speciate, lump_voc, speciate, ChemicalMechanism, SpeciationTable};
use crate::temporal::{
    month_allocation, month_to_hourly, ProfileStore, TemporalFallback, VerticalProfileStore,
};
use crate::units::{CalendarPeriods, Units};
use ndarray::{Array2, Array3, Axis};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub(crate) const HOURLY_DIMS: [&str; 3] = ["hour", "y", "x"];

/// Processing stages, used in log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ReadRaw,
    ConvertUnits,
    SpatialAllocate,
    TemporalAllocate,
    ChemicalSpeciate,
    GridSpeciate,
    LumpVoc,
    Persist,
    MergeSector,
    VerticalAllocate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::ReadRaw => "read_raw",
            Stage::ConvertUnits => "convert_units",
            Stage::SpatialAllocate => "spatial_allocate",
            Stage::TemporalAllocate => "temporal_allocate",
            Stage::ChemicalSpeciate => "chemical_speciate",
            Stage::GridSpeciate => "grid_speciate",
            Stage::LumpVoc => "lump_voc",
            Stage::Persist => "persist",
            Stage::MergeSector => "merge_sector",
            Stage::VerticalAllocate => "vertical_allocate",
        };
        f.write_str(name)
    }
}

/// Result of one (sector, pollutant) unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollutantOutcome {
    /// Name of the artifact holding the unit's mechanism species.
    Written(String),
    /// The inventory has no field for the unit.
    NoEmission,
    /// A VOC unit with no speciation profile for its source category.
    Unspeciated,
}

fn enter(sector: Sector, pollutant: &Pollutant, stage: Stage) {
    info!(sector = %sector, pollutant = %pollutant, stage = %stage, "stage");
}

/// Runs configured sectors and pollutants against one inventory.
pub struct Pipeline {
    year: i32,
    month: u32,
    model_grid: GridDescriptor,
    mechanism: ChemicalMechanism,
    allocator: SpatialAllocator,
    regrid_method: RegridMethod,
    periods: CalendarPeriods,
    profiles: ProfileStore,
    temporal_fallback: TemporalFallback,
    vertical: VerticalProfileStore,
    speciation: HashMap<String, SpeciationTable>,
    voc_use_grid_spec: bool,
    run_vertical: bool,
    workers: usize,
    sectors: Vec<SectorConfig>,
    pollutants: Vec<PollutantConfig>,
    reader: Arc<dyn EmissionReader>,
    ratios: Option<Arc<dyn GriddedRatioStore>>,
    store: Arc<dyn ArtifactStore>,
}

impl Pipeline {
    /// Build a pipeline, loading every profile and speciation table the
    /// configuration names.
    pub fn new(
        config: &RunConfig,
        mechanism: ChemicalMechanism,
        reader: Arc<dyn EmissionReader>,
        store: Arc<dyn ArtifactStore>,
    ) -> EmipsResult<Self> {
        config.validate()?;
        mechanism.validate()?;

        let mut speciation = HashMap::new();
        for sector in &config.sectors {
            let code = sector.scc();
            if !speciation.contains_key(code) {
                speciation.insert(code.to_string(), config.speciation_table(code, &mechanism)?);
            }
        }

        Ok(Self {
            year: config.year,
            month: config.month,
            model_grid: config.model_grid()?,
            mechanism,
            allocator: SpatialAllocator::new(),
            regrid_method: config.regrid_method,
            periods: config.periods()?,
            profiles: config.profile_store()?,
            temporal_fallback: config.temporal_fallback,
            vertical: config.vertical_store()?,
            speciation,
            voc_use_grid_spec: config.voc_use_grid_spec,
            run_vertical: config.run_vertical,
            workers: config.workers,
            sectors: config.sectors.clone(),
            pollutants: config.pollutants.clone(),
            reader,
            ratios: None,
            store,
        })
    }

    pub fn with_geodesy(mut self, geodesy: Arc<dyn GeodesyProvider>) -> Self {
        self.allocator = SpatialAllocator::with_geodesy(geodesy);
        self
    }

    pub fn with_ratio_store(mut self, ratios: Arc<dyn GriddedRatioStore>) -> Self {
        self.ratios = Some(ratios);
        self
    }

    pub fn with_profile_store(mut self, profiles: ProfileStore) -> Self {
        self.profiles = profiles;
        self
    }

    pub fn with_vertical_store(mut self, vertical: VerticalProfileStore) -> Self {
        self.vertical = vertical;
        self
    }

    /// Replace the speciation table of the table's source category.
    pub fn with_speciation_table(mut self, table: SpeciationTable) -> Self {
        self.speciation.insert(table.code().to_string(), table);
        self
    }

    pub fn mechanism(&self) -> &ChemicalMechanism {
        &self.mechanism
    }

    pub fn model_grid(&self) -> &GridDescriptor {
        &self.model_grid
    }

    pub fn sectors(&self) -> &[SectorConfig] {
        &self.sectors
    }

    pub fn store(&self) -> &Arc<dyn ArtifactStore> {
        &self.store
    }

    /// Process every configured sector in order.
    pub fn process_all(&self) -> EmipsResult<Vec<SectorManifest>> {
        self.sectors
            .iter()
            .map(|sector| self.process_sector(sector))
            .collect()
    }

    /// Process every pollutant of `sector`, then merge the sector and, when
    /// configured, allocate it vertically.
    pub fn process_sector(&self, sector: &SectorConfig) -> EmipsResult<SectorManifest> {
        info!(sector = %sector.sector, scc = sector.scc(), workers = self.workers, "processing sector");
        let outcomes: Vec<EmipsResult<PollutantOutcome>> = if self.workers > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.workers)
                .build()
                .map_err(|e| EmipsError::Config(e.to_string()))?;
            pool.install(|| {
                self.pollutants
                    .par_iter()
                    .map(|pollutant| self.process_pollutant(sector, pollutant))
                    .collect()
            })
        } else {
            self.pollutants
                .iter()
                .map(|pollutant| self.process_pollutant(sector, pollutant))
                .collect()
        };

        let mut manifest = SectorManifest::new(sector.sector);
        for (pollutant, outcome) in self.pollutants.iter().zip(outcomes) {
            match outcome? {
                PollutantOutcome::Written(name) => manifest.written.push(name),
                PollutantOutcome::NoEmission | PollutantOutcome::Unspeciated => {
                    manifest.empty.push(pollutant.name.clone())
                }
            }
        }

        self.merge_sector(&manifest)?;
        if self.run_vertical {
            self.run_vertical_sector(sector)?;
        }
        Ok(manifest)
    }

    /// Run one (sector, pollutant) unit through to its persisted artifact.
    pub fn process_pollutant(
        &self,
        sector: &SectorConfig,
        pollutant: &PollutantConfig,
    ) -> EmipsResult<PollutantOutcome> {
        let unit = pollutant.pollutant()?;
        let name = sector.sector;

        enter(name, &unit, Stage::ReadRaw);
        let Some(raw) = self.reader.read(name, &unit, self.year, self.month)? else {
            warn!(sector = %name, pollutant = %unit, "no emission in inventory, skipping");
            return Ok(PollutantOutcome::NoEmission);
        };
        let grid = self.reader.grid(name)?;
        grid.check_field(raw.shape())?;

        enter(name, &unit, Stage::ConvertUnits);
        let working = match pollutant.temporal {
            TemporalMode::Monthly => Units::g_m2_month(),
            TemporalMode::Yearly => Units::g_m2_year(),
        };
        debug!(from = %unit.units, to = %working, "unit conversion");
        let converted = unit
            .units
            .convert_field(&raw, &working, Some(&grid), &self.periods)?;

        enter(name, &unit, Stage::SpatialAllocate);
        let gridded = self.regrid(&converted, &grid)?;

        enter(name, &unit, Stage::TemporalAllocate);
        let profiles = self.profiles.resolve(sector.scc(), self.temporal_fallback)?;
        let monthly = match pollutant.temporal {
            TemporalMode::Monthly => gridded,
            TemporalMode::Yearly => month_allocation(&gridded, &profiles.month)
                .index_axis(Axis(0), (self.month - 1) as usize)
                .to_owned(),
        };
        let hourly = month_to_hourly(&monthly, &profiles, self.year, self.month)?;

        if unit.is_voc && self.voc_use_grid_spec {
            return Ok(PollutantOutcome::Written(self.grid_branch(sector, &unit, &hourly)?));
        }
        match self.profile_branch(sector, &unit, &hourly) {
            Err(EmipsError::UnknownPollutant { code, .. }) if unit.is_voc => {
                warn!(sector = %name, pollutant = %unit, scc = %code, "no speciation profile for VOC, skipping");
                Ok(PollutantOutcome::Unspeciated)
            }
            result => result.map(PollutantOutcome::Written),
        }
    }

    fn profile_branch(
        &self,
        sector: &SectorConfig,
        pollutant: &Pollutant,
        hourly: &Array3<f64>,
    ) -> EmipsResult<String> {
        enter(sector.sector, pollutant, Stage::ChemicalSpeciate);
        let profile = match self.speciation.get(sector.scc()) {
            Some(table) => table.profile_or_fallback(pollutant, &self.mechanism)?,
            None => SpeciationTable::new(sector.scc())
                .profile_or_fallback(pollutant, &self.mechanism)?,
        };

        let mut fields: Vec<(Species, Array3<f64>)> = Vec::new();
        for (species, field) in speciate(hourly, &profile) {
            match fields.iter_mut().find(|(s, _)| *s == species) {
                Some((_, acc)) => *acc += &field,
                None => fields.push((species, field)),
            }
        }

        enter(sector.sector, pollutant, Stage::Persist);
        let name = naming::pollutant_artifact(&pollutant.name, sector.sector, self.year, self.month);
        let mut artifact = self.hourly_artifact(&name);
        for (species, field) in fields {
            artifact.add_variable(
                species.name.clone(),
                &HOURLY_DIMS,
                field.into_dyn(),
                units_attr(species.output_units().to_string()),
            )?;
        }
        self.store.write(&artifact)?;
        Ok(name)
    }

    fn grid_branch(
        &self,
        sector: &SectorConfig,
        pollutant: &Pollutant,
        hourly: &Array3<f64>,
    ) -> EmipsResult<String> {
        let store = self.ratios.as_ref().ok_or_else(|| {
            EmipsError::Config("grid speciation of VOC needs a gridded ratio store".to_string())
        })?;

        enter(sector.sector, pollutant, Stage::GridSpeciate);
        let ratio_grid = store.grid();
        let mut ratios = BTreeMap::new();
        for species in store.vars(sector.sector)? {
            let ratio = store.read(sector.sector, species)?;
            ratio_grid.check_field(ratio.shape())?;
            ratios.insert(species, self.regrid(&ratio, &ratio_grid)?);
        }
        let speciated = grid_speciate(hourly, &ratios)?;

        let name = naming::pollutant_artifact(&pollutant.name, sector.sector, self.year, self.month);
        let mut artifact = self.hourly_artifact(&name);
        for (species, field) in &speciated {
            artifact.add_variable(
                species.name(),
                &HOURLY_DIMS,
                field.clone().into_dyn(),
                units_attr(Units::g_m2_s().to_string()),
            )?;
        }
        self.store.write(&artifact)?;

        enter(sector.sector, pollutant, Stage::LumpVoc);
        let lumped = lump_voc(&self.mechanism, &speciated, hourly.raw_dim());

        enter(sector.sector, pollutant, Stage::Persist);
        let name = naming::lumped_artifact(&pollutant.name, sector.sector, self.year, self.month);
        let mut artifact = self.hourly_artifact(&name);
        for (species, field) in lumped {
            artifact.add_variable(
                species.name.clone(),
                &HOURLY_DIMS,
                field.into_dyn(),
                units_attr(species.output_units().to_string()),
            )?;
        }
        self.store.write(&artifact)?;
        Ok(name)
    }

    /// Regrid a (y, x) field onto the model grid.
    ///
    /// The source is padded by one cell of edge values first; model cells
    /// still outside the padded source carry no emission.
    fn regrid(&self, field: &Array2<f64>, grid: &GridDescriptor) -> EmipsResult<Array2<f64>> {
        let padded = pad_field(field, 1);
        let mut out = self.allocator.allocate_2d(
            &padded.view(),
            &grid.padded(1),
            &self.model_grid,
            self.regrid_method,
        )?;
        let uncovered = out.iter().filter(|v| v.is_nan()).count();
        if uncovered > 0 {
            debug!(cells = uncovered, "model cells outside inventory coverage set to zero");
            out.mapv_inplace(|v| if v.is_nan() { 0.0 } else { v });
        }
        Ok(out)
    }

    pub(crate) fn hourly_artifact(&self, name: &str) -> Artifact {
        Artifact::new(name)
            .with_dim(ArtifactDim::new("hour", (0..24).map(f64::from).collect()))
            .with_dim(ArtifactDim::new("y", self.model_grid.y_coords().to_vec()))
            .with_dim(ArtifactDim::new("x", self.model_grid.x_coords().to_vec()))
    }
}
