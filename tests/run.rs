//! Full runs with the shipped mechanisms.
//!
//! - A TOML configuration naming profile files on disk drives a RADM2 run
//!   into a JSON store
//! - Grid speciation lumps reference VOC ratios into RADM2 species
//! - Every shipped mechanism produces a complete sector artifact

use approx::assert_relative_eq;
use emips::artifact::{ArtifactSource, JsonArtifactStore, MemoryArtifactStore};
use emips::config::{PollutantConfig, RunConfig, SectorConfig};
use emips::grid::{GridDescriptor, GridSpec, Projection};
use emips::pipeline::naming::{lumped_artifact, sector_artifact};
use emips::pipeline::{MemoryInventory, MemoryRatioStore};
use emips::registry::Sector;
use emips::speciation::RetroSpecies;
use emips::{build_pipeline, mechanism, EmipsError, MechanismKind};
use ndarray::Array2;
use std::fs;
use std::sync::Arc;

const NOX: f64 = 3.0e-9;
const VOC: f64 = 4.0e-9;

fn grid() -> GridDescriptor {
    GridDescriptor::lon_lat(100.0, 1.0, 4, 20.0, 1.0, 3).unwrap()
}

fn inventory(sector: Sector) -> MemoryInventory {
    MemoryInventory::new()
        .with_grid(sector, grid())
        .with_field(sector, "NOx", Array2::from_elem((3, 4), NOX))
        .with_field(sector, "VOC", Array2::from_elem((3, 4), VOC))
}

fn config(sector: Sector) -> RunConfig {
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
        sectors: vec![SectorConfig::new(sector)],
        pollutants: vec![PollutantConfig::new("NOx"), PollutantConfig::new("VOC")],
        ..RunConfig::default()
    }
}

const TEMPORAL: &str = "\
/MONTHLY/
2104001000 1 1 1 1 1 1 1 1 1 1 1 1
/END/
/WEEKLY/
2104001000 1 1 1 1 1 1 1
/END/
/HOURLY/
2104001000 2 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1
/END/
";

const GSREF: &str = "\
2104001000 0001 NOX
2104001000 0002 VOC!total organic gases
";

const GSPRO: &str = "\
0001 NOX NO 0.9 1.0 0.9
0001 NOX NO2 0.1 1.0 0.1
0002 TOG ETH 0.4 30.0 0.4
0002 TOG HC3 0.6 44.0 0.6
";

#[test]
fn test_toml_run_with_profile_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("temporal.txt"), TEMPORAL).unwrap();
    fs::write(dir.path().join("gsref.txt"), GSREF).unwrap();
    fs::write(dir.path().join("gspro.txt"), GSPRO).unwrap();
    let output = dir.path().join("output");

    let text = format!(
        r#"
year = 2023
month = 6
mechanism = "RADM2_wrfchem"
temporal_profiles = "{dir}/temporal.txt"
speciation_reference = "{dir}/gsref.txt"
speciation_profiles = "{dir}/gspro.txt"
output_dir = "{output}"

[model_grid]
x_origin = 100.0
x_cell = 1.0
x_count = 4
y_origin = 20.0
y_cell = 1.0
y_count = 3

[[sectors]]
sector = "residential"

[[pollutants]]
name = "NOx"

[[pollutants]]
name = "VOC"
"#,
        dir = dir.path().display(),
        output = output.display(),
    );
    let path = dir.path().join("run.toml");
    fs::write(&path, text).unwrap();

    let config = RunConfig::from_file(&path).unwrap();
    let store = Arc::new(JsonArtifactStore::new(&config.output_dir).unwrap());
    let pipeline = build_pipeline(&config, Arc::new(inventory(Sector::Residential)), store.clone()).unwrap();
    assert_eq!(pipeline.mechanism().name(), "RADM2_wrfchem");

    let manifests = pipeline.process_all().unwrap();
    assert_eq!(manifests[0].written.len(), 2);

    // Uniform month and week; the first hour carries 2 of 25 diurnal weights.
    let first_hour = 24.0 * 2.0 / 25.0;
    let other_hour = 24.0 / 25.0;
    let merged = store
        .read(&sector_artifact(Sector::Residential, 2023, 6))
        .unwrap()
        .unwrap();
    let at = |name: &str, index: [usize; 3]| merged.variable(name).unwrap().data[&index[..]];

    assert_relative_eq!(at("NO", [0, 1, 1]), NOX * 1e3 * first_hour * 0.9 / 30.0, max_relative = 1e-9);
    assert_relative_eq!(at("NO2", [7, 2, 3]), NOX * 1e3 * other_hour * 0.1 / 46.0, max_relative = 1e-9);
    assert_relative_eq!(at("HC3", [0, 0, 0]), VOC * 1e3 * first_hour * 0.6 / 44.0, max_relative = 1e-9);
    assert_relative_eq!(at("ETH", [12, 0, 0]), VOC * 1e3 * other_hour * 0.4 / 30.0, max_relative = 1e-9);
    assert_eq!(at("TOL", [0, 0, 0]), 0.0);
    assert_eq!(merged.variables().len(), MechanismKind::Radm2WrfChem.mechanism().all_species().len());
}

#[test]
fn test_grid_speciation_with_radm2() {
    let mut config = config(Sector::Energy);
    config.voc_use_grid_spec = true;
    config.pollutants = vec![PollutantConfig::new("VOC")];

    let ratios = MemoryRatioStore::new(grid())
        .with_ratio(Sector::Energy, RetroSpecies::Propane, Array2::from_elem((3, 4), 0.5))
        .with_ratio(Sector::Energy, RetroSpecies::Alcohols, Array2::from_elem((3, 4), 0.2))
        .with_ratio(Sector::Energy, RetroSpecies::Acids, Array2::from_elem((3, 4), 0.3));
    let store = Arc::new(MemoryArtifactStore::new());
    build_pipeline(&config, Arc::new(inventory(Sector::Energy)), store.clone())
        .unwrap()
        .with_ratio_store(Arc::new(ratios))
        .process_all()
        .unwrap();

    let lumped = store
        .read(&lumped_artifact("VOC", Sector::Energy, 2023, 6))
        .unwrap()
        .unwrap();
    assert_eq!(lumped.variables().len(), 17);
    let at = |name: &str| lumped.variable(name).unwrap().data[[4, 1, 2].as_slice()];

    let voc = VOC * 1e3;
    assert_relative_eq!(at("HC3"), voc * (0.5 + 0.2 * 0.95) / 44.0, max_relative = 1e-9);
    assert_relative_eq!(at("HC5"), voc * 0.2 * 0.05 / 72.0, max_relative = 1e-9);
    assert_relative_eq!(at("ORA1"), voc * 0.3 * 0.44 / 46.0, max_relative = 1e-9);
    assert_relative_eq!(at("ORA2"), voc * 0.3 * 0.56 / 60.0, max_relative = 1e-9);
    assert_eq!(at("XYL"), 0.0);
}

#[test]
fn test_every_mechanism_runs() {
    for kind in MechanismKind::ALL {
        let mut config = config(Sector::Transport);
        config.mechanism = kind.name().to_lowercase();
        config.pollutants = vec![PollutantConfig::new("NOx")];

        let store = Arc::new(MemoryArtifactStore::new());
        build_pipeline(&config, Arc::new(inventory(Sector::Transport)), store.clone())
            .unwrap()
            .process_all()
            .unwrap();

        let merged = store
            .read(&sector_artifact(Sector::Transport, 2023, 6))
            .unwrap()
            .unwrap();
        let expected = mechanism(kind.name()).unwrap().all_species();
        let names: Vec<&str> = merged.variable_names();
        assert_eq!(names.len(), expected.len(), "{kind}");
        for (name, species) in names.iter().zip(&expected) {
            assert_eq!(*name, species.name);
        }
        assert_relative_eq!(
            merged.variable("NO").unwrap().data[[0, 0, 0].as_slice()],
            NOX * 1e3 * 0.9 / 30.0,
            max_relative = 1e-9
        );
    }
}

#[test]
fn test_unknown_mechanism() {
    let mut config = config(Sector::Energy);
    config.mechanism = "cbm-z".to_string();
    let result = build_pipeline(
        &config,
        Arc::new(inventory(Sector::Energy)),
        Arc::new(MemoryArtifactStore::new()),
    );
    assert!(matches!(result, Err(EmipsError::UnregisteredName { .. })));
}
