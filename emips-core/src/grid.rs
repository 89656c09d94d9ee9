//! Regular georeferenced grids.
//!
//! A [`GridDescriptor`] describes a regular grid by its projection, the
//! coordinate of the first cell centre, the cell size and the number of cells
//! along each axis. Coordinate sequences and cell areas are derived from
//! those scalars, so two descriptors with equal scalars are the same grid.
//!
//! # Examples
//!
//! ```rust
//! use emips_core::grid::{GridDescriptor, Projection};
//!
//! let grid = GridDescriptor::new(Projection::lon_lat(), 70.0, 0.25, 8, 15.0, 0.25, 4).unwrap();
//! assert_eq!(grid.shape(), (4, 8));
//! assert_eq!(grid.x_coords()[1], 70.25);
//! assert_eq!(grid.y_end(), 15.75);
//! ```

use crate::errors::{EmipsError, EmipsResult};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean earth radius in metres, used for lon/lat cell areas.
pub const EARTH_RADIUS: f64 = 6_371_008.8;

/// Map projection of a grid, identified by its PROJ definition string.
///
/// Only the identity of a projection matters to the allocation engine:
/// reprojection itself is delegated to a
/// [`GeodesyProvider`](crate::spatial::GeodesyProvider).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Projection {
    definition: String,
}

impl Projection {
    pub fn new(definition: impl Into<String>) -> Self {
        Self {
            definition: definition.into().trim().to_string(),
        }
    }

    /// Geographic longitude/latitude on WGS84.
    pub fn lon_lat() -> Self {
        Self::new("+proj=longlat +datum=WGS84")
    }

    pub fn definition(&self) -> &str {
        &self.definition
    }

    pub fn is_lon_lat(&self) -> bool {
        self.definition.contains("+proj=longlat") || self.definition.contains("+proj=latlong")
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::lon_lat()
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.definition)
    }
}

/// Raw, unvalidated form of a grid as it appears in configuration files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    #[serde(default)]
    pub projection: Projection,
    pub x_origin: f64,
    pub x_cell: f64,
    pub x_count: usize,
    pub y_origin: f64,
    pub y_cell: f64,
    pub y_count: usize,
}

/// Regular georeferenced grid.
///
/// Immutable once built. Equality requires the projection and all six
/// scalars to match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GridSpec", into = "GridSpec")]
pub struct GridDescriptor {
    projection: Projection,
    x_origin: f64,
    x_cell: f64,
    x_count: usize,
    y_origin: f64,
    y_cell: f64,
    y_count: usize,
}

impl GridDescriptor {
    /// Build a grid from its origin, cell size and cell count per axis.
    ///
    /// # Errors
    ///
    /// `InvalidGrid` when a cell size is not strictly positive and finite or
    /// a count is zero.
    pub fn new(
        projection: Projection,
        x_origin: f64,
        x_cell: f64,
        x_count: usize,
        y_origin: f64,
        y_cell: f64,
        y_count: usize,
    ) -> EmipsResult<Self> {
        for (axis, cell, count) in [("x", x_cell, x_count), ("y", y_cell, y_count)] {
            if !(cell.is_finite() && cell > 0.0) {
                return Err(EmipsError::InvalidGrid(format!(
                    "{axis} cell size must be positive, got {cell}"
                )));
            }
            if count == 0 {
                return Err(EmipsError::InvalidGrid(format!(
                    "{axis} cell count must be at least 1"
                )));
            }
        }
        if !(x_origin.is_finite() && y_origin.is_finite()) {
            return Err(EmipsError::InvalidGrid("origin must be finite".to_string()));
        }
        Ok(Self {
            projection,
            x_origin,
            x_cell,
            x_count,
            y_origin,
            y_cell,
            y_count,
        })
    }

    /// Longitude/latitude grid.
    pub fn lon_lat(
        x_origin: f64,
        x_cell: f64,
        x_count: usize,
        y_origin: f64,
        y_cell: f64,
        y_count: usize,
    ) -> EmipsResult<Self> {
        Self::new(
            Projection::lon_lat(),
            x_origin,
            x_cell,
            x_count,
            y_origin,
            y_cell,
            y_count,
        )
    }

    /// Build a grid from ascending, uniformly spaced coordinate sequences.
    pub fn from_coords(projection: Projection, x: &[f64], y: &[f64]) -> EmipsResult<Self> {
        let (x_origin, x_cell) = uniform_spacing("x", x)?;
        let (y_origin, y_cell) = uniform_spacing("y", y)?;
        Self::new(
            projection,
            x_origin,
            x_cell,
            x.len(),
            y_origin,
            y_cell,
            y.len(),
        )
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn x_origin(&self) -> f64 {
        self.x_origin
    }

    pub fn x_cell(&self) -> f64 {
        self.x_cell
    }

    pub fn x_count(&self) -> usize {
        self.x_count
    }

    pub fn y_origin(&self) -> f64 {
        self.y_origin
    }

    pub fn y_cell(&self) -> f64 {
        self.y_cell
    }

    pub fn y_count(&self) -> usize {
        self.y_count
    }

    /// Field shape `(y_count, x_count)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.y_count, self.x_count)
    }

    /// Cell-centre x coordinates, ascending, `x_count` entries.
    pub fn x_coords(&self) -> Array1<f64> {
        axis_coords(self.x_origin, self.x_cell, self.x_count)
    }

    /// Cell-centre y coordinates, ascending, `y_count` entries.
    pub fn y_coords(&self) -> Array1<f64> {
        axis_coords(self.y_origin, self.y_cell, self.y_count)
    }

    pub fn x_end(&self) -> f64 {
        self.x_origin + (self.x_count - 1) as f64 * self.x_cell
    }

    pub fn y_end(&self) -> f64 {
        self.y_origin + (self.y_count - 1) as f64 * self.y_cell
    }

    /// Cell-edge bounding box `(x_min, x_max, y_min, y_max)`.
    pub fn extent(&self) -> (f64, f64, f64, f64) {
        (
            self.x_origin - self.x_cell / 2.0,
            self.x_end() + self.x_cell / 2.0,
            self.y_origin - self.y_cell / 2.0,
            self.y_end() + self.y_cell / 2.0,
        )
    }

    /// First x coordinate at or beyond `v`, or the last coordinate.
    pub fn nearest_x_value(&self, v: f64) -> f64 {
        first_at_or_beyond(&self.x_coords(), v)
    }

    /// First y coordinate at or beyond `v`, or the last coordinate.
    pub fn nearest_y_value(&self, v: f64) -> f64 {
        first_at_or_beyond(&self.y_coords(), v)
    }

    /// Area of every cell in m², shape `(y_count, x_count)`.
    ///
    /// Lon/lat grids use spherical-earth areas; projected grids are assumed
    /// to be in metres.
    pub fn cell_areas(&self) -> Array2<f64> {
        if !self.projection.is_lon_lat() {
            return Array2::from_elem(self.shape(), self.x_cell * self.y_cell);
        }
        let dlon = self.x_cell.to_radians();
        let half = self.y_cell / 2.0;
        let row_areas: Vec<f64> = self
            .y_coords()
            .iter()
            .map(|lat| {
                let north = (lat + half).clamp(-90.0, 90.0).to_radians();
                let south = (lat - half).clamp(-90.0, 90.0).to_radians();
                EARTH_RADIUS * EARTH_RADIUS * dlon * (north.sin() - south.sin()).abs()
            })
            .collect();
        Array2::from_shape_fn(self.shape(), |(j, _)| row_areas[j])
    }

    /// Check that the trailing two axes of `shape` are `(y_count, x_count)`.
    pub fn check_field(&self, shape: &[usize]) -> EmipsResult<()> {
        let n = shape.len();
        if n < 2 || shape[n - 2] != self.y_count || shape[n - 1] != self.x_count {
            return Err(EmipsError::GridMismatch {
                expected_y: self.y_count,
                expected_x: self.x_count,
                found: shape.to_vec(),
            });
        }
        Ok(())
    }

    /// The same grid grown by `cells` cells on every side.
    pub fn padded(&self, cells: usize) -> Self {
        let pad = cells as f64;
        Self {
            projection: self.projection.clone(),
            x_origin: self.x_origin - pad * self.x_cell,
            x_cell: self.x_cell,
            x_count: self.x_count + 2 * cells,
            y_origin: self.y_origin - pad * self.y_cell,
            y_cell: self.y_cell,
            y_count: self.y_count + 2 * cells,
        }
    }

    pub fn same_projection(&self, other: &Self) -> bool {
        self.projection == other.projection
    }
}

impl TryFrom<GridSpec> for GridDescriptor {
    type Error = EmipsError;

    fn try_from(spec: GridSpec) -> Result<Self, Self::Error> {
        Self::new(
            spec.projection,
            spec.x_origin,
            spec.x_cell,
            spec.x_count,
            spec.y_origin,
            spec.y_cell,
            spec.y_count,
        )
    }
}

impl From<GridDescriptor> for GridSpec {
    fn from(grid: GridDescriptor) -> Self {
        Self {
            projection: grid.projection,
            x_origin: grid.x_origin,
            x_cell: grid.x_cell,
            x_count: grid.x_count,
            y_origin: grid.y_origin,
            y_cell: grid.y_cell,
            y_count: grid.y_count,
        }
    }
}

impl fmt::Display for GridDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Projection: {}", self.projection)?;
        writeln!(
            f,
            "X origin: {}  X number: {}  X cell: {}",
            self.x_origin, self.x_count, self.x_cell
        )?;
        write!(
            f,
            "Y origin: {}  Y number: {}  Y cell: {}",
            self.y_origin, self.y_count, self.y_cell
        )
    }
}

fn axis_coords(origin: f64, cell: f64, count: usize) -> Array1<f64> {
    Array1::from_iter((0..count).map(|i| origin + i as f64 * cell))
}

fn first_at_or_beyond(coords: &Array1<f64>, v: f64) -> f64 {
    coords
        .iter()
        .copied()
        .find(|c| *c >= v)
        .unwrap_or(coords[coords.len() - 1])
}

fn uniform_spacing(axis: &str, coords: &[f64]) -> EmipsResult<(f64, f64)> {
    if coords.len() < 2 {
        return Err(EmipsError::InvalidGrid(format!(
            "{axis} coordinates need at least 2 values"
        )));
    }
    let cell = coords[1] - coords[0];
    let tolerance = cell.abs() * 1e-6;
    for pair in coords.windows(2) {
        if ((pair[1] - pair[0]) - cell).abs() > tolerance {
            return Err(EmipsError::InvalidGrid(format!(
                "{axis} coordinates are not uniformly spaced"
            )));
        }
    }
    Ok((coords[0], cell))
}
