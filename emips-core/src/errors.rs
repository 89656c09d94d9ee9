use std::path::PathBuf;
use thiserror::Error;

/// Error type for emission processing operations.
///
/// The first five variants form the processing taxonomy. Configuration errors
/// (`GridMismatch`, `UnitConversionUndefined`) abort the current unit of work,
/// data-completeness gaps (`ProfileNotFound`, `UnknownPollutant`) are usually
/// answered by an explicit fallback in the orchestrator, and
/// `MissingUpstreamArtifact` aborts an aggregation stage.
#[derive(Error, Debug)]
pub enum EmipsError {
    #[error("Field shape {found:?} does not match grid (y={expected_y}, x={expected_x})")]
    GridMismatch {
        expected_y: usize,
        expected_x: usize,
        found: Vec<usize>,
    },
    #[error("No {kind} profile found for source category '{code}'")]
    ProfileNotFound { kind: String, code: String },
    #[error("No speciation profile for pollutant '{pollutant}' under source category '{code}'")]
    UnknownPollutant { pollutant: String, code: String },
    #[error("Cannot convert {from} to {to}: grid-relative area needs the grid cell areas")]
    UnitConversionUndefined { from: String, to: String },
    #[error("Expected artifact '{name}' for sector '{sector}' is missing")]
    MissingUpstreamArtifact { sector: String, name: String },
    #[error("Unregistered {kind} name '{name}'")]
    UnregisteredName { kind: &'static str, name: String },
    #[error("Reprojection from '{from}' to '{to}' requires a geodesy provider")]
    UnsupportedReprojection { from: String, to: String },
    #[error("Invalid {kind} profile '{id}': {reason}")]
    InvalidProfile {
        kind: String,
        id: String,
        reason: String,
    },
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),
    #[error("Invalid date: year={year}, month={month}")]
    InvalidDate { year: i32, month: u32 },
    #[error("Parse error in {}:{line}: {reason}", path.display())]
    ProfileParse {
        path: PathBuf,
        line: usize,
        reason: String,
    },
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Artifact error: {0}")]
    Artifact(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience type for `Result<T, EmipsError>`.
pub type EmipsResult<T> = Result<T, EmipsError>;
