//! End-to-end runs of the processing chain against in-memory inventories.

use approx::assert_relative_eq;
use emips_core::artifact::{ArtifactSource, JsonArtifactStore, MemoryArtifactStore};
use emips_core::config::{PollutantConfig, RunConfig, SectorConfig, TemporalMode};
use emips_core::grid::{GridDescriptor, GridSpec, Projection};
use emips_core::pipeline::naming::{height_artifact, lumped_artifact, pollutant_artifact, sector_artifact};
use emips_core::pipeline::{MemoryInventory, MemoryRatioStore, Pipeline, PollutantOutcome, SectorManifest};
use emips_core::registry::Sector;
use emips_core::speciation::{ChemicalMechanism, LumpedSpecies, MechanismTable, RetroSpecies};
use emips_core::temporal::store::inline_source;
use emips_core::temporal::{TemporalFallback, VerticalProfileStore};
use emips_core::EmipsError;
use ndarray::Array2;
use std::sync::Arc;

static MINI: MechanismTable = MechanismTable {
    name: "MINI",
    nmvoc: &[
        LumpedSpecies {
            name: "ALK",
            molar_mass: 44.0,
            description: "Alkanes",
            lumping: &[(RetroSpecies::Propane, 1.0), (RetroSpecies::Butanes, 1.0)],
        },
        LumpedSpecies {
            name: "ARO",
            molar_mass: 92.0,
            description: "Aromatics",
            lumping: &[(RetroSpecies::Toluene, 1.0)],
        },
        LumpedSpecies {
            name: "ISO",
            molar_mass: 68.0,
            description: "Isoprene",
            lumping: &[(RetroSpecies::Isoprene, 1.0)],
        },
    ],
};

const CO: f64 = 2.0e-9;
const NOX: f64 = 3.0e-9;
const PM25: f64 = 5.0e-10;
const VOC: f64 = 4.0e-9;

fn grid() -> GridDescriptor {
    GridDescriptor::lon_lat(100.0, 1.0, 4, 20.0, 1.0, 3).unwrap()
}

fn config() -> RunConfig {
    RunConfig {
        year: 2023,
        month: 6,
        model_grid: GridSpec {
            projection: Projection::lon_lat(),
            x_origin: 100.0,
            x_cell: 1.0,
            x_count: 4,
            y_origin: 20.0,
            y_cell: 1.0,
            y_count: 3,
        },
        sectors: vec![SectorConfig::new(Sector::Energy)],
        pollutants: ["CO", "NOx", "PM2_5", "SO2"]
            .into_iter()
            .map(PollutantConfig::new)
            .collect(),
        run_vertical: true,
        ..RunConfig::default()
    }
}

fn inventory() -> MemoryInventory {
    MemoryInventory::new()
        .with_grid(Sector::Energy, grid())
        .with_field(Sector::Energy, "CO", Array2::from_elem((3, 4), CO))
        .with_field(Sector::Energy, "NOx", Array2::from_elem((3, 4), NOX))
        .with_field(Sector::Energy, "PM2_5", Array2::from_elem((3, 4), PM25))
        .with_field(Sector::Energy, "VOC", Array2::from_elem((3, 4), VOC))
        .with_field(Sector::Energy, "CH4", Array2::from_elem((3, 4), CO))
}

fn vertical() -> VerticalProfileStore {
    VerticalProfileStore::parse("/HEIGHT/\n10100101 0.5 0.3 0.2\n/END/\n", &inline_source()).unwrap()
}

fn init_logging() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn pipeline(config: &RunConfig, store: Arc<MemoryArtifactStore>) -> Pipeline {
    init_logging();
    Pipeline::new(config, ChemicalMechanism::new(&MINI), Arc::new(inventory()), store)
        .unwrap()
        .with_vertical_store(vertical())
}

fn value(store: &MemoryArtifactStore, artifact: &str, variable: &str, index: &[usize]) -> f64 {
    let artifact = store.read(artifact).unwrap().unwrap();
    artifact.variable(variable).unwrap().data[index]
}

#[test]
fn test_profile_branch_end_to_end() {
    let store = Arc::new(MemoryArtifactStore::new());
    let manifests = pipeline(&config(), store.clone()).process_all().unwrap();

    assert_eq!(manifests.len(), 1);
    assert_eq!(manifests[0].written.len(), 3);
    assert_eq!(manifests[0].empty, vec!["SO2".to_string()]);

    // Uniform profiles turn a constant rate back into the same rate per second.
    let merged = sector_artifact(Sector::Energy, 2023, 6);
    assert_relative_eq!(value(&store, &merged, "CO", &[5, 1, 2]), CO * 1e3 / 28.0, max_relative = 1e-9);
    assert_relative_eq!(value(&store, &merged, "NO", &[0, 0, 0]), NOX * 1e3 * 0.9 / 30.0, max_relative = 1e-9);
    assert_relative_eq!(value(&store, &merged, "NO2", &[23, 2, 3]), NOX * 1e3 * 0.1 / 46.0, max_relative = 1e-9);
    assert_relative_eq!(value(&store, &merged, "PMFINE", &[12, 1, 1]), PM25 * 1e3, max_relative = 1e-9);
    assert_eq!(value(&store, &merged, "PEC", &[12, 1, 1]), 0.0);
    assert_eq!(value(&store, &merged, "ALK", &[12, 1, 1]), 0.0);

    let artifact = store.read(&merged).unwrap().unwrap();
    assert_eq!(artifact.variable("PMFINE").unwrap().units(), Some("g/m2/s"));
    assert_eq!(artifact.variable("CO").unwrap().units(), Some("mole/m2/s"));

    let height = height_artifact(Sector::Energy, 2023, 6);
    let layered = store.read(&height).unwrap().unwrap();
    assert_eq!(layered.variable("CO").unwrap().data.shape(), &[24, 3, 3, 4]);
    assert_relative_eq!(
        value(&store, &height, "CO", &[5, 0, 1, 2]),
        0.5 * CO * 1e3 / 28.0,
        max_relative = 1e-9
    );
}

#[test]
fn test_unit_outcomes() {
    let store = Arc::new(MemoryArtifactStore::new());
    let pipeline = pipeline(&config(), store.clone());
    let sector = SectorConfig::new(Sector::Energy);

    let outcome = pipeline
        .process_pollutant(&sector, &PollutantConfig::new("SO2"))
        .unwrap();
    assert_eq!(outcome, PollutantOutcome::NoEmission);

    let outcome = pipeline
        .process_pollutant(&sector, &PollutantConfig::new("CO"))
        .unwrap();
    let name = pollutant_artifact("CO", Sector::Energy, 2023, 6);
    assert_eq!(outcome, PollutantOutcome::Written(name.clone()));
    assert_eq!(store.read(&name).unwrap().unwrap().variable_names(), ["CO"]);
}

#[test]
fn test_merge_requires_written_units() {
    let store = Arc::new(MemoryArtifactStore::new());
    let pipeline = pipeline(&config(), store);

    let mut manifest = SectorManifest::new(Sector::Energy);
    manifest
        .written
        .push(pollutant_artifact("CO", Sector::Energy, 2023, 6));
    assert!(matches!(
        pipeline.merge_sector(&manifest),
        Err(EmipsError::MissingUpstreamArtifact { .. })
    ));

    assert!(matches!(
        pipeline.run_vertical_sector(&SectorConfig::new(Sector::Energy)),
        Err(EmipsError::MissingUpstreamArtifact { .. })
    ));

    // Empty units alone merge to zero fields.
    let mut manifest = SectorManifest::new(Sector::Energy);
    manifest.empty.push("SO2".to_string());
    let merged = pipeline.merge_sector(&manifest).unwrap();
    assert!(merged
        .variables()
        .iter()
        .all(|v| v.data.iter().all(|x| *x == 0.0)));
}

#[test]
fn test_grid_branch_lumps_voc() {
    let mut config = config();
    config.voc_use_grid_spec = true;
    config.pollutants = vec![PollutantConfig::new("VOC")];
    config.run_vertical = false;

    let ratios = MemoryRatioStore::new(grid())
        .with_ratio(Sector::Energy, RetroSpecies::Propane, Array2::from_elem((3, 4), 0.5))
        .with_ratio(Sector::Energy, RetroSpecies::Toluene, Array2::from_elem((3, 4), 0.25));
    let store = Arc::new(MemoryArtifactStore::new());
    let manifests = pipeline(&config, store.clone())
        .with_ratio_store(Arc::new(ratios))
        .process_all()
        .unwrap();

    let lumped = lumped_artifact("VOC", Sector::Energy, 2023, 6);
    assert_eq!(manifests[0].written, vec![lumped.clone()]);

    let speciated = pollutant_artifact("VOC", Sector::Energy, 2023, 6);
    assert_relative_eq!(value(&store, &speciated, "Propane", &[3, 0, 0]), VOC * 1e3 * 0.5, max_relative = 1e-9);

    assert_relative_eq!(value(&store, &lumped, "ALK", &[3, 0, 0]), VOC * 1e3 * 0.5 / 44.0, max_relative = 1e-9);
    assert_relative_eq!(value(&store, &lumped, "ARO", &[3, 0, 0]), VOC * 1e3 * 0.25 / 92.0, max_relative = 1e-9);
    assert_eq!(value(&store, &lumped, "ISO", &[3, 0, 0]), 0.0);

    let merged = sector_artifact(Sector::Energy, 2023, 6);
    assert_relative_eq!(value(&store, &merged, "ALK", &[3, 2, 3]), VOC * 1e3 * 0.5 / 44.0, max_relative = 1e-9);
}

#[test]
fn test_grid_branch_needs_ratio_store() {
    let mut config = config();
    config.voc_use_grid_spec = true;
    let store = Arc::new(MemoryArtifactStore::new());
    let result = pipeline(&config, store)
        .process_pollutant(&SectorConfig::new(Sector::Energy), &PollutantConfig::new("VOC"));
    assert!(matches!(result, Err(EmipsError::Config(_))));
}

#[test]
fn test_yearly_pollutant() {
    let mut config = config();
    config.pollutants = vec![PollutantConfig::new("CH4").with_temporal(TemporalMode::Yearly)];
    let store = Arc::new(MemoryArtifactStore::new());
    pipeline(&config, store.clone()).process_all().unwrap();

    // A uniform month profile gives each month a twelfth of the 365-day year.
    let expected = CO * 1e3 * 365.0 / (12.0 * 30.0) / 16.0;
    let merged = sector_artifact(Sector::Energy, 2023, 6);
    assert_relative_eq!(value(&store, &merged, "CH4", &[0, 0, 0]), expected, max_relative = 1e-9);
}

#[test]
fn test_missing_profiles_can_fail() {
    let mut config = config();
    config.temporal_fallback = TemporalFallback::Fail;
    let store = Arc::new(MemoryArtifactStore::new());
    let result = pipeline(&config, store)
        .process_pollutant(&SectorConfig::new(Sector::Energy), &PollutantConfig::new("CO"));
    assert!(matches!(result, Err(EmipsError::ProfileNotFound { .. })));
}

#[test]
fn test_voc_without_profile_is_skipped() {
    let mut config = config();
    config.pollutants = vec![PollutantConfig::new("CO"), PollutantConfig::new("VOC")];
    let store = Arc::new(MemoryArtifactStore::new());
    let pipeline = pipeline(&config, store.clone());

    let outcome = pipeline
        .process_pollutant(&SectorConfig::new(Sector::Energy), &PollutantConfig::new("VOC"))
        .unwrap();
    assert_eq!(outcome, PollutantOutcome::Unspeciated);

    let manifests = pipeline.process_all().unwrap();
    assert_eq!(manifests[0].written, vec![pollutant_artifact("CO", Sector::Energy, 2023, 6)]);
    assert_eq!(manifests[0].empty, vec!["VOC".to_string()]);
    let merged = sector_artifact(Sector::Energy, 2023, 6);
    assert_relative_eq!(value(&store, &merged, "CO", &[3, 0, 0]), CO * 1e3 / 28.0, max_relative = 1e-9);
    assert_eq!(value(&store, &merged, "ALK", &[3, 0, 0]), 0.0);
}

#[test]
fn test_workers_match_sequential() {
    let sequential = Arc::new(MemoryArtifactStore::new());
    pipeline(&config(), sequential.clone()).process_all().unwrap();

    let mut parallel_config = config();
    parallel_config.workers = 3;
    let parallel = Arc::new(MemoryArtifactStore::new());
    pipeline(&parallel_config, parallel.clone()).process_all().unwrap();

    let name = sector_artifact(Sector::Energy, 2023, 6);
    assert_eq!(sequential.read(&name).unwrap(), parallel.read(&name).unwrap());
}

#[test]
fn test_json_store_run() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonArtifactStore::new(dir.path()).unwrap());
    let pipeline = Pipeline::new(
        &config(),
        ChemicalMechanism::new(&MINI),
        Arc::new(inventory()),
        store.clone(),
    )
    .unwrap();
    pipeline.process_all().unwrap();

    let names = store.names().unwrap();
    assert!(names.contains(&sector_artifact(Sector::Energy, 2023, 6)));
    assert!(names.contains(&height_artifact(Sector::Energy, 2023, 6)));
    assert!(store.path(&pollutant_artifact("NOx", Sector::Energy, 2023, 6)).is_file());
}
