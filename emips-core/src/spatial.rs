//! Regridding between georeferenced grids.
//!
//! Fields on the same projection are resampled directly, one axis at a time:
//! linear interpolation onto destination cell centres along an axis where the
//! source is at least as coarse as the destination, otherwise the mean of all
//! source cells whose centres fall inside each destination cell. Fields on a different projection
//! are handed to a [`GeodesyProvider`].

use crate::errors::{EmipsError, EmipsResult};
use crate::grid::GridDescriptor;
use ndarray::{Array2, Array3, ArrayBase, ArrayD, ArrayView2, Data, Dimension, IxDyn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Resampling method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegridMethod {
    /// Per axis: interpolate when upsampling, average when downsampling.
    #[default]
    Auto,
    /// Bilinear interpolation onto destination cell centres.
    Interpolate,
    /// Mean of source cells whose centres fall in each destination cell.
    Conservative,
}

impl fmt::Display for RegridMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RegridMethod::Auto => "auto",
            RegridMethod::Interpolate => "interpolate",
            RegridMethod::Conservative => "conservative",
        };
        f.write_str(name)
    }
}

/// External reprojection capability.
///
/// Implementations resample a (y, x) field from one projection to another.
pub trait GeodesyProvider: Send + Sync + fmt::Debug {
    fn reproject(
        &self,
        field: ArrayView2<f64>,
        source: &GridDescriptor,
        dest: &GridDescriptor,
    ) -> EmipsResult<Array2<f64>>;

    /// Cell areas of `grid` in m².
    fn cell_areas(&self, grid: &GridDescriptor) -> Array2<f64> {
        grid.cell_areas()
    }
}

/// Regrids fields whose trailing two axes are (y, x) of a source grid.
#[derive(Debug, Clone, Default)]
pub struct SpatialAllocator {
    geodesy: Option<Arc<dyn GeodesyProvider>>,
}

impl SpatialAllocator {
    /// Allocator limited to same-projection regridding.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_geodesy(geodesy: Arc<dyn GeodesyProvider>) -> Self {
        Self {
            geodesy: Some(geodesy),
        }
    }

    /// Methods actually used for `method` between `source` and `dest`, as
    /// (y, x).
    ///
    /// `Auto` decides each axis on its own, so a source that is coarser in x
    /// but finer in y is interpolated along x and averaged along y.
    pub fn resolve_axes(
        source: &GridDescriptor,
        dest: &GridDescriptor,
        method: RegridMethod,
    ) -> (RegridMethod, RegridMethod) {
        let axis = |source_cell: f64, dest_cell: f64| match method {
            RegridMethod::Auto if source_cell >= dest_cell => RegridMethod::Interpolate,
            RegridMethod::Auto => RegridMethod::Conservative,
            explicit => explicit,
        };
        (
            axis(source.y_cell(), dest.y_cell()),
            axis(source.x_cell(), dest.x_cell()),
        )
    }

    /// Regrid `field` from `source` to `dest`.
    ///
    /// Leading axes pass through, so the result has shape
    /// `leading + (dest.y_count, dest.x_count)`. Destination cells outside
    /// the source cell-edge extent are NaN.
    ///
    /// # Errors
    ///
    /// * `GridMismatch` if the trailing axes of `field` are not the source
    ///   grid's shape.
    /// * `UnsupportedReprojection` if the projections differ and no geodesy
    ///   provider is configured.
    pub fn allocate<S, D>(
        &self,
        field: &ArrayBase<S, D>,
        source: &GridDescriptor,
        dest: &GridDescriptor,
        method: RegridMethod,
    ) -> EmipsResult<ArrayD<f64>>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        source.check_field(field.shape())?;
        let shape = field.shape();
        let leading = &shape[..shape.len() - 2];
        let count: usize = leading.iter().product();
        let (sy, sx) = source.shape();
        let (dy, dx) = dest.shape();

        let slices = field
            .to_shape((count, sy, sx))
            .map_err(|_| mismatch(source, shape))?;

        let mut out = Array3::<f64>::zeros((count, dy, dx));
        for (slice, mut target) in slices.outer_iter().zip(out.outer_iter_mut()) {
            target.assign(&self.allocate_2d(&slice, source, dest, method)?);
        }

        let mut out_shape = leading.to_vec();
        out_shape.extend([dy, dx]);
        out.into_shape_with_order(IxDyn(&out_shape))
            .map_err(|_| mismatch(dest, &out_shape))
    }

    /// Regrid a single (y, x) field.
    pub fn allocate_2d(
        &self,
        field: &ArrayView2<f64>,
        source: &GridDescriptor,
        dest: &GridDescriptor,
        method: RegridMethod,
    ) -> EmipsResult<Array2<f64>> {
        source.check_field(field.shape())?;
        if !source.same_projection(dest) {
            let Some(geodesy) = &self.geodesy else {
                return Err(EmipsError::UnsupportedReprojection {
                    from: source.projection().to_string(),
                    to: dest.projection().to_string(),
                });
            };
            debug!(from = %source.projection(), to = %dest.projection(), "reprojecting field");
            let out = geodesy.reproject(field.view(), source, dest)?;
            dest.check_field(out.shape())?;
            return Ok(out);
        }
        let (y_method, x_method) = Self::resolve_axes(source, dest, method);
        let x_coords = source.x_coords();
        let y_coords = source.y_coords();
        let xs = match x_method {
            RegridMethod::Conservative => members(
                x_coords.as_slice().unwrap_or(&[]),
                dest.x_origin(),
                dest.x_cell(),
                dest.x_count(),
            ),
            _ => stencil(
                source.x_origin(),
                source.x_cell(),
                source.x_count(),
                dest.x_coords().as_slice().unwrap_or(&[]),
            ),
        };
        let ys = match y_method {
            RegridMethod::Conservative => members(
                y_coords.as_slice().unwrap_or(&[]),
                dest.y_origin(),
                dest.y_cell(),
                dest.y_count(),
            ),
            _ => stencil(
                source.y_origin(),
                source.y_cell(),
                source.y_count(),
                dest.y_coords().as_slice().unwrap_or(&[]),
            ),
        };
        Ok(resample(field, &ys, &xs, dest))
    }
}

fn mismatch(grid: &GridDescriptor, shape: &[usize]) -> EmipsError {
    EmipsError::GridMismatch {
        expected_y: grid.y_count(),
        expected_x: grid.x_count(),
        found: shape.to_vec(),
    }
}

/// Weighted source indices feeding one destination coordinate. Empty
/// outside the source coverage.
type Taps = Vec<(usize, f64)>;

/// Linear interpolation taps along one axis. Empty outside the source
/// cell-edge extent.
fn stencil(origin: f64, cell: f64, count: usize, coords: &[f64]) -> Vec<Taps> {
    let last = (count - 1) as f64;
    coords
        .iter()
        .map(|c| {
            let pos = (c - origin) / cell;
            if pos < -0.5 || pos > last + 0.5 {
                return Vec::new();
            }
            let pos = pos.clamp(0.0, last);
            let lower = pos.floor() as usize;
            let upper = (lower + 1).min(count - 1);
            let weight = pos - lower as f64;
            vec![(lower, 1.0 - weight), (upper, weight)]
        })
        .collect()
}

/// Averaging taps along one axis: the source indices whose centres fall in
/// each destination cell, half-open on the upper edge.
fn members(source_coords: &[f64], dest_origin: f64, dest_cell: f64, dest_count: usize) -> Vec<Taps> {
    let mut out = vec![Vec::new(); dest_count];
    for (index, c) in source_coords.iter().enumerate() {
        let pos = ((c - dest_origin) / dest_cell + 0.5).floor();
        if pos >= 0.0 && (pos as usize) < dest_count {
            out[pos as usize].push((index, 1.0));
        }
    }
    for taps in &mut out {
        let n = taps.len() as f64;
        taps.iter_mut().for_each(|(_, w)| *w /= n);
    }
    out
}

/// Apply separable per-axis taps. Cells with no taps on either axis are NaN.
fn resample(field: &ArrayView2<f64>, ys: &[Taps], xs: &[Taps], dest: &GridDescriptor) -> Array2<f64> {
    Array2::from_shape_fn(dest.shape(), |(j, i)| {
        if ys[j].is_empty() || xs[i].is_empty() {
            return f64::NAN;
        }
        ys[j]
            .iter()
            .flat_map(|(y, wy)| xs[i].iter().map(move |(x, wx)| field[[*y, *x]] * wy * wx))
            .sum()
    })
}

/// Grow a (y, x) field by `cells` on every side, replicating edge values.
///
/// Pairs with [`GridDescriptor::padded`].
pub fn pad_field(field: &Array2<f64>, cells: usize) -> Array2<f64> {
    let (ny, nx) = field.dim();
    if ny == 0 || nx == 0 {
        return field.clone();
    }
    Array2::from_shape_fn((ny + 2 * cells, nx + 2 * cells), |(j, i)| {
        let y = j.saturating_sub(cells).min(ny - 1);
        let x = i.saturating_sub(cells).min(nx - 1);
        field[[y, x]]
    })
}
