//! Self-describing array containers passed between pipeline stages.
//!
//! An [`Artifact`] is a set of named arrays sharing named dimensions, with
//! attributes on the container and on every array. Stores implement
//! [`ArtifactSink`] for writing and [`ArtifactSource`] for reading back.

use crate::errors::{EmipsError, EmipsResult};
use ndarray::ArrayD;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

pub type Attributes = BTreeMap<String, String>;

/// A named coordinate axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactDim {
    pub name: String,
    pub values: Vec<f64>,
}

impl ArtifactDim {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A named array over some of the artifact's dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactVariable {
    pub name: String,
    pub dims: Vec<String>,
    pub data: ArrayD<f64>,
    pub attrs: Attributes,
}

impl ArtifactVariable {
    pub fn units(&self) -> Option<&str> {
        self.attrs.get("units").map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub name: String,
    pub dims: Vec<ArtifactDim>,
    pub attrs: Attributes,
    variables: Vec<ArtifactVariable>,
}

impl Artifact {
    /// Empty artifact carrying the standard global attributes.
    pub fn new(name: impl Into<String>) -> Self {
        let mut attrs = Attributes::new();
        attrs.insert("Conventions".to_string(), "CF-1.6".to_string());
        attrs.insert("Tools".to_string(), "Created using emips".to_string());
        Self {
            name: name.into(),
            dims: Vec::new(),
            attrs,
            variables: Vec::new(),
        }
    }

    pub fn with_dim(mut self, dim: ArtifactDim) -> Self {
        self.dims.push(dim);
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn dim(&self, name: &str) -> Option<&ArtifactDim> {
        self.dims.iter().find(|d| d.name == name)
    }

    /// Add an array spanning `dims`, replacing any variable of the same name.
    ///
    /// # Errors
    ///
    /// `Artifact` if a dimension is undeclared or the array shape disagrees
    /// with the declared dimension lengths.
    pub fn add_variable(
        &mut self,
        name: impl Into<String>,
        dims: &[&str],
        data: ArrayD<f64>,
        attrs: Attributes,
    ) -> EmipsResult<()> {
        let name = name.into();
        let mut expected = Vec::with_capacity(dims.len());
        for dim in dims {
            let declared = self.dim(dim).ok_or_else(|| {
                EmipsError::Artifact(format!("{}: variable {name} uses undeclared dimension {dim}", self.name))
            })?;
            expected.push(declared.len());
        }
        if data.shape() != expected.as_slice() {
            return Err(EmipsError::Artifact(format!(
                "{}: variable {name} has shape {:?}, dimensions need {:?}",
                self.name,
                data.shape(),
                expected
            )));
        }
        self.variables.retain(|v| v.name != name);
        self.variables.push(ArtifactVariable {
            name,
            dims: dims.iter().map(|d| d.to_string()).collect(),
            data,
            attrs,
        });
        Ok(())
    }

    pub fn variable(&self, name: &str) -> Option<&ArtifactVariable> {
        self.variables.iter().find(|v| v.name == name)
    }

    pub fn variables(&self) -> &[ArtifactVariable] {
        &self.variables
    }

    pub fn variable_names(&self) -> Vec<&str> {
        self.variables.iter().map(|v| v.name.as_str()).collect()
    }

    pub fn into_variables(self) -> Vec<ArtifactVariable> {
        self.variables
    }
}

/// Units attribute set.
pub fn units_attr(units: impl Into<String>) -> Attributes {
    let mut attrs = Attributes::new();
    attrs.insert("units".to_string(), units.into());
    attrs
}

/// Destination for finished artifacts.
pub trait ArtifactSink: Send + Sync {
    /// Persist `artifact` under its name. A successful return means the
    /// artifact is complete and readable.
    fn write(&self, artifact: &Artifact) -> EmipsResult<()>;
}

/// Lookup of previously written artifacts.
pub trait ArtifactSource: Send + Sync {
    /// The artifact called `name`, or `None` if it was never completely
    /// written.
    fn read(&self, name: &str) -> EmipsResult<Option<Artifact>>;
}

/// A store that can both write and read back artifacts.
pub trait ArtifactStore: ArtifactSink + ArtifactSource {}

impl<T: ArtifactSink + ArtifactSource> ArtifactStore for T {}

/// Artifacts held in memory.
#[derive(Debug, Default)]
pub struct MemoryArtifactStore {
    artifacts: Mutex<BTreeMap<String, Artifact>>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn names(&self) -> EmipsResult<Vec<String>> {
        Ok(self.lock()?.keys().cloned().collect())
    }

    pub fn remove(&self, name: &str) -> EmipsResult<Option<Artifact>> {
        Ok(self.lock()?.remove(name))
    }

    fn lock(&self) -> EmipsResult<std::sync::MutexGuard<'_, BTreeMap<String, Artifact>>> {
        self.artifacts
            .lock()
            .map_err(|_| EmipsError::Artifact("artifact store lock poisoned".to_string()))
    }
}

impl ArtifactSink for MemoryArtifactStore {
    fn write(&self, artifact: &Artifact) -> EmipsResult<()> {
        self.lock()?
            .insert(artifact.name.clone(), artifact.clone());
        Ok(())
    }
}

impl ArtifactSource for MemoryArtifactStore {
    fn read(&self, name: &str) -> EmipsResult<Option<Artifact>> {
        Ok(self.lock()?.get(name).cloned())
    }
}

const EXTENSION: &str = "json";
const PARTIAL_SUFFIX: &str = ".partial";

/// Artifacts stored as JSON files in one directory.
///
/// Writes go to a `.partial` sibling that is renamed into place once
/// complete, so an interrupted write never shows up as an artifact.
#[derive(Debug, Clone)]
pub struct JsonArtifactStore {
    dir: PathBuf,
}

impl JsonArtifactStore {
    /// Store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: impl AsRef<Path>) -> EmipsResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{EXTENSION}"))
    }

    /// Names of the complete artifacts in the directory.
    pub fn names(&self) -> EmipsResult<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

impl ArtifactSink for JsonArtifactStore {
    fn write(&self, artifact: &Artifact) -> EmipsResult<()> {
        let path = self.path(&artifact.name);
        let mut partial = path.clone().into_os_string();
        partial.push(PARTIAL_SUFFIX);
        let partial = PathBuf::from(partial);

        let json = serde_json::to_vec(artifact)
            .map_err(|e| EmipsError::Artifact(format!("{}: {e}", artifact.name)))?;
        fs::write(&partial, json)?;
        fs::rename(&partial, &path)?;
        debug!(path = %path.display(), "artifact written");
        Ok(())
    }
}

impl ArtifactSource for JsonArtifactStore {
    fn read(&self, name: &str) -> EmipsResult<Option<Artifact>> {
        let path = self.path(name);
        if !path.is_file() {
            return Ok(None);
        }
        let bytes = fs::read(&path)?;
        let artifact = serde_json::from_slice(&bytes)
            .map_err(|e| EmipsError::Artifact(format!("{}: {e}", path.display())))?;
        Ok(Some(artifact))
    }
}
