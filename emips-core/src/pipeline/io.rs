//! Collaborators that feed the pipeline.

use crate::errors::{EmipsError, EmipsResult};
use crate::grid::GridDescriptor;
use crate::registry::{Pollutant, Sector};
use crate::speciation::RetroSpecies;
use ndarray::Array2;
use std::collections::{BTreeMap, HashMap};

/// Inventory access for one emission dataset.
pub trait EmissionReader: Send + Sync {
    /// The (y, x) field of `pollutant` for `sector` in the pollutant's units,
    /// or `None` when the inventory has no such emission.
    fn read(
        &self,
        sector: Sector,
        pollutant: &Pollutant,
        year: i32,
        month: u32,
    ) -> EmipsResult<Option<Array2<f64>>>;

    /// Grid the fields of `sector` are on.
    fn grid(&self, sector: Sector) -> EmipsResult<GridDescriptor>;
}

/// Gridded reference VOC ratios used for grid speciation.
pub trait GriddedRatioStore: Send + Sync {
    /// Reference species with a ratio grid for `sector`.
    fn vars(&self, sector: Sector) -> EmipsResult<Vec<RetroSpecies>>;

    fn read(&self, sector: Sector, species: RetroSpecies) -> EmipsResult<Array2<f64>>;

    fn grid(&self) -> GridDescriptor;
}

/// Inventory fields held in memory, independent of year and month.
#[derive(Debug, Clone, Default)]
pub struct MemoryInventory {
    grids: HashMap<Sector, GridDescriptor>,
    fields: HashMap<(Sector, String), Array2<f64>>,
}

impl MemoryInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_grid(mut self, sector: Sector, grid: GridDescriptor) -> Self {
        self.grids.insert(sector, grid);
        self
    }

    pub fn with_field(
        mut self,
        sector: Sector,
        pollutant: impl Into<String>,
        field: Array2<f64>,
    ) -> Self {
        self.fields.insert((sector, pollutant.into()), field);
        self
    }
}

impl EmissionReader for MemoryInventory {
    fn read(
        &self,
        sector: Sector,
        pollutant: &Pollutant,
        _year: i32,
        _month: u32,
    ) -> EmipsResult<Option<Array2<f64>>> {
        Ok(self.fields.get(&(sector, pollutant.name.clone())).cloned())
    }

    fn grid(&self, sector: Sector) -> EmipsResult<GridDescriptor> {
        self.grids
            .get(&sector)
            .cloned()
            .ok_or_else(|| EmipsError::Config(format!("no inventory grid for sector {sector}")))
    }
}

/// Reference VOC ratio grids held in memory.
#[derive(Debug, Clone)]
pub struct MemoryRatioStore {
    grid: GridDescriptor,
    ratios: HashMap<Sector, BTreeMap<RetroSpecies, Array2<f64>>>,
}

impl MemoryRatioStore {
    pub fn new(grid: GridDescriptor) -> Self {
        Self {
            grid,
            ratios: HashMap::new(),
        }
    }

    pub fn with_ratio(mut self, sector: Sector, species: RetroSpecies, ratio: Array2<f64>) -> Self {
        self.ratios.entry(sector).or_default().insert(species, ratio);
        self
    }
}

impl GriddedRatioStore for MemoryRatioStore {
    fn vars(&self, sector: Sector) -> EmipsResult<Vec<RetroSpecies>> {
        Ok(self
            .ratios
            .get(&sector)
            .map(|r| r.keys().copied().collect())
            .unwrap_or_default())
    }

    fn read(&self, sector: Sector, species: RetroSpecies) -> EmipsResult<Array2<f64>> {
        self.ratios
            .get(&sector)
            .and_then(|r| r.get(&species))
            .cloned()
            .ok_or_else(|| EmipsError::UnregisteredName {
                kind: "ratio grid",
                name: format!("{sector}/{species}"),
            })
    }

    fn grid(&self) -> GridDescriptor {
        self.grid.clone()
    }
}
