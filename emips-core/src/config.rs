//! Run configuration.
//!
//! A [`RunConfig`] is read from TOML. Every field has a default, so a file
//! only needs to name what differs from a January 2017 RADM2 run over East
//! Asia at 0.25°.
//!
//! ```toml
//! year = 2019
//! month = 7
//! mechanism = "cb05_wrfchem"
//!
//! [model_grid]
//! x_origin = 100.0
//! x_cell = 0.1
//! x_count = 200
//! y_origin = 20.0
//! y_cell = 0.1
//! y_count = 150
//!
//! [[sectors]]
//! sector = "industry"
//!
//! [[pollutants]]
//! name = "CO"
//! units = "kg/m2/s"
//! ```

use crate::errors::{EmipsError, EmipsResult};
use crate::grid::{GridDescriptor, GridSpec, Projection};
use crate::registry::{Pollutant, Sector};
use crate::spatial::RegridMethod;
use crate::speciation::{ChemicalMechanism, SpeciationTable};
use crate::temporal::{ProfileStore, TemporalFallback, TimeZoneShift, VerticalProfileStore};
use crate::units::{CalendarPeriods, Units};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Period an inventory value covers before temporal allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemporalMode {
    /// The field is the emission rate of the configured month.
    #[default]
    Monthly,
    /// The field is an annual rate, distributed over months first.
    Yearly,
}

/// Month and year lengths used for unit conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarPolicy {
    /// Real lengths of the configured month and year.
    #[default]
    Actual,
    /// 30-day months and 365-day years.
    Nominal,
}

impl CalendarPolicy {
    pub fn periods(&self, year: i32, month: u32) -> EmipsResult<CalendarPeriods> {
        match self {
            CalendarPolicy::Actual => CalendarPeriods::for_month(year, month),
            CalendarPolicy::Nominal => Ok(CalendarPeriods::nominal()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorConfig {
    pub sector: Sector,
    /// Source category used for profile lookups.
    /// default: the sector's representative code
    #[serde(default)]
    pub scc: Option<String>,
}

impl SectorConfig {
    pub fn new(sector: Sector) -> Self {
        Self { sector, scc: None }
    }

    pub fn scc(&self) -> &str {
        self.scc.as_deref().unwrap_or(self.sector.default_scc())
    }
}

fn inventory_units() -> Units {
    Units::kg_m2_s()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollutantConfig {
    pub name: String,
    /// Units of the inventory fields.
    /// default: kg/m2/s
    #[serde(default = "inventory_units")]
    pub units: Units,
    #[serde(default)]
    pub temporal: TemporalMode,
}

impl PollutantConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            units: inventory_units(),
            temporal: TemporalMode::Monthly,
        }
    }

    pub fn with_units(mut self, units: Units) -> Self {
        self.units = units;
        self
    }

    pub fn with_temporal(mut self, temporal: TemporalMode) -> Self {
        self.temporal = temporal;
        self
    }

    /// The registered pollutant in the configured units.
    pub fn pollutant(&self) -> EmipsResult<Pollutant> {
        Ok(Pollutant::lookup(&self.name)?.with_units(self.units))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Emission year
    /// default: 2017
    pub year: i32,

    /// Emission month
    /// unit: 1-12
    /// default: 1
    pub month: u32,

    /// Target simulation grid
    /// default: lon/lat, origin (64, 15), 0.25° cells, 324 x 180
    pub model_grid: GridSpec,

    /// Sectors to process, in order
    /// default: all sectors with their representative codes
    pub sectors: Vec<SectorConfig>,

    /// Pollutants to process per sector
    /// default: BC, CO, NH3, NOx, OC, PM2_5, PM10, SO2, VOC in kg/m2/s
    pub pollutants: Vec<PollutantConfig>,

    /// Chemical mechanism name
    /// default: radm2_wrfchem
    pub mechanism: String,

    /// Speciate aggregate VOC with gridded reference ratios and lump them
    /// default: false
    pub voc_use_grid_spec: bool,

    /// default: auto
    pub regrid_method: RegridMethod,

    /// Temporal reference file (`<code> <monthId> <weekId> <diurnalId>`).
    /// Without it `temporal_profiles` is read as a delimited file keyed by code.
    pub temporal_reference: Option<PathBuf>,
    pub temporal_profiles: Option<PathBuf>,

    /// Local time zone of delimited diurnal profiles
    pub time_zone: Option<TimeZoneShift>,

    /// default: uniform
    pub temporal_fallback: TemporalFallback,

    pub speciation_reference: Option<PathBuf>,
    pub speciation_profiles: Option<PathBuf>,

    /// Block file with `/HEIGHT/` rows
    pub vertical_profiles: Option<PathBuf>,

    /// Run vertical allocation after merging
    /// default: false
    pub run_vertical: bool,

    /// Month and year lengths for unit conversion
    /// default: actual
    pub calendar: CalendarPolicy,

    /// default: output
    pub output_dir: PathBuf,

    /// Pollutants processed concurrently within a sector
    /// default: 1
    pub workers: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            year: 2017,
            month: 1,
            model_grid: GridSpec {
                projection: Projection::lon_lat(),
                x_origin: 64.0,
                x_cell: 0.25,
                x_count: 324,
                y_origin: 15.0,
                y_cell: 0.25,
                y_count: 180,
            },
            sectors: Sector::ALL.into_iter().map(SectorConfig::new).collect(),
            pollutants: ["BC", "CO", "NH3", "NOx", "OC", "PM2_5", "PM10", "SO2", "VOC"]
                .into_iter()
                .map(PollutantConfig::new)
                .collect(),
            mechanism: "radm2_wrfchem".to_string(),
            voc_use_grid_spec: false,
            regrid_method: RegridMethod::Auto,
            temporal_reference: None,
            temporal_profiles: None,
            time_zone: None,
            temporal_fallback: TemporalFallback::Uniform,
            speciation_reference: None,
            speciation_profiles: None,
            vertical_profiles: None,
            run_vertical: false,
            calendar: CalendarPolicy::Actual,
            output_dir: PathBuf::from("output"),
            workers: 1,
        }
    }
}

impl RunConfig {
    pub fn from_toml_str(content: &str) -> EmipsResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| EmipsError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> EmipsResult<Self> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    pub fn to_toml_string(&self) -> EmipsResult<String> {
        toml::to_string(self).map_err(|e| EmipsError::Config(e.to_string()))
    }

    pub fn validate(&self) -> EmipsResult<()> {
        if !(1..=12).contains(&self.month) {
            return Err(EmipsError::InvalidDate {
                year: self.year,
                month: self.month,
            });
        }
        self.model_grid()?;
        if self.sectors.is_empty() {
            return Err(EmipsError::Config("no sectors configured".to_string()));
        }
        if self.pollutants.is_empty() {
            return Err(EmipsError::Config("no pollutants configured".to_string()));
        }
        for pollutant in &self.pollutants {
            pollutant.pollutant()?;
        }
        if self.workers == 0 {
            return Err(EmipsError::Config("workers must be at least 1".to_string()));
        }
        if self.speciation_reference.is_some() != self.speciation_profiles.is_some() {
            return Err(EmipsError::Config(
                "speciation_reference and speciation_profiles go together".to_string(),
            ));
        }
        if self.temporal_reference.is_some() && self.temporal_profiles.is_none() {
            return Err(EmipsError::Config(
                "temporal_reference needs temporal_profiles".to_string(),
            ));
        }
        Ok(())
    }

    pub fn model_grid(&self) -> EmipsResult<GridDescriptor> {
        GridDescriptor::try_from(self.model_grid.clone())
    }

    pub fn periods(&self) -> EmipsResult<CalendarPeriods> {
        self.calendar.periods(self.year, self.month)
    }

    /// Temporal profiles named by the configuration, or an empty store that
    /// resolves everything through the fallback.
    pub fn profile_store(&self) -> EmipsResult<ProfileStore> {
        match (&self.temporal_reference, &self.temporal_profiles) {
            (Some(reference), Some(profiles)) => ProfileStore::from_files(reference, profiles),
            (None, Some(profiles)) => ProfileStore::from_delimited_file(profiles, self.time_zone),
            _ => Ok(ProfileStore::default()),
        }
    }

    pub fn vertical_store(&self) -> EmipsResult<VerticalProfileStore> {
        match &self.vertical_profiles {
            Some(path) => VerticalProfileStore::from_file(path),
            None => Ok(VerticalProfileStore::default()),
        }
    }

    /// Speciation profiles of `code`, empty when no files are configured.
    pub fn speciation_table(
        &self,
        code: &str,
        mechanism: &ChemicalMechanism,
    ) -> EmipsResult<SpeciationTable> {
        match (&self.speciation_reference, &self.speciation_profiles) {
            (Some(reference), Some(profiles)) => {
                SpeciationTable::from_files(reference, profiles, code, mechanism)
            }
            _ => Ok(SpeciationTable::new(code)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = RunConfig::default();
        config.validate().unwrap();
        assert_eq!(config.model_grid().unwrap().shape(), (180, 324));
        assert_eq!(config.sectors.len(), 9);
        assert_eq!(config.periods().unwrap().month_days, 31);
    }

    #[test]
    fn test_partial_toml() {
        let config = RunConfig::from_toml_str(
            r#"
year = 2023
month = 6
calendar = "nominal"
temporal_fallback = "builtin"

[[sectors]]
sector = "residential"
scc = "2104008000"

[[pollutants]]
name = "CH4"
units = "Mg/grid/year"
temporal = "yearly"
"#,
        )
        .unwrap();
        assert_eq!(config.month, 6);
        assert_eq!(config.sectors[0].scc(), "2104008000");
        assert_eq!(config.pollutants[0].temporal, TemporalMode::Yearly);
        assert!(config.pollutants[0].units.is_grid_relative());
        assert_eq!(config.temporal_fallback, TemporalFallback::BuiltIn);
        assert_eq!(config.periods().unwrap(), CalendarPeriods::nominal());
        assert_eq!(config.mechanism, "radm2_wrfchem");
    }

    #[test]
    fn test_invalid_configs() {
        assert!(matches!(
            RunConfig::from_toml_str("month = 13"),
            Err(EmipsError::InvalidDate { .. })
        ));
        assert!(RunConfig::from_toml_str("sectors = []").is_err());
        assert!(RunConfig::from_toml_str("workers = 0").is_err());
        assert!(matches!(
            RunConfig::from_toml_str("[[pollutants]]\nname = \"Dust\""),
            Err(EmipsError::UnregisteredName { .. })
        ));
        assert!(matches!(
            RunConfig::from_toml_str("[[sectors]]\nsector = \"volcano\""),
            Err(EmipsError::Config(_))
        ));
    }

    #[test]
    fn test_round_trip() {
        let config = RunConfig::default();
        let text = config.to_toml_string().unwrap();
        assert_eq!(RunConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_sector_default_scc() {
        let sector = SectorConfig::new(Sector::Transport);
        assert_eq!(sector.scc(), "2294000000");
    }
}
