//! Emission flux units and conversion factors.

use super::kinds::{Area, CalendarPeriods, Period, Weight};
use crate::errors::{EmipsError, EmipsResult};
use crate::grid::GridDescriptor;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Units of an emission flux: weight per area per period.
///
/// Written as `weight/area/period`, e.g. `kg/m2/s` or `Mg/grid/year`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Units {
    pub weight: Weight,
    pub area: Area,
    pub period: Period,
}

impl Units {
    pub const fn new(weight: Weight, area: Area, period: Period) -> Self {
        Self {
            weight,
            area,
            period,
        }
    }

    /// The unit inventories are most often delivered in.
    pub const fn kg_m2_s() -> Self {
        Self::new(Weight::Kilogram, Area::SquareMetre, Period::Second)
    }

    /// Working unit of the monthly cascade.
    pub const fn g_m2_month() -> Self {
        Self::new(Weight::Gram, Area::SquareMetre, Period::Month)
    }

    /// Working unit of the yearly cascade.
    pub const fn g_m2_year() -> Self {
        Self::new(Weight::Gram, Area::SquareMetre, Period::Year)
    }

    /// Model-ready mass flux.
    pub const fn g_m2_s() -> Self {
        Self::new(Weight::Gram, Area::SquareMetre, Period::Second)
    }

    /// Model-ready molar flux.
    pub const fn mole_m2_s() -> Self {
        Self::new(Weight::Mole, Area::SquareMetre, Period::Second)
    }

    /// Parses `weight/area/period`.
    pub fn parse(input: &str) -> EmipsResult<Self> {
        let parts: Vec<&str> = input.split('/').collect();
        if parts.len() != 3 {
            return Err(EmipsError::Config(format!(
                "units '{input}' must be written as weight/area/period"
            )));
        }
        let weight = Weight::from_str(parts[0]).map_err(EmipsError::Config)?;
        let area = Area::from_str(parts[1]).map_err(EmipsError::Config)?;
        let period = Period::from_str(parts[2]).map_err(EmipsError::Config)?;
        Ok(Self::new(weight, area, period))
    }

    pub fn is_mole(&self) -> bool {
        self.weight.family() == super::kinds::WeightFamily::Mole
    }

    pub fn is_grid_relative(&self) -> bool {
        self.area == Area::GridCell
    }

    /// Multiplier converting a value in `self` to a value in `other`.
    ///
    /// # Errors
    ///
    /// `UnitConversionUndefined` if either side is grid-relative, or if the
    /// weights belong to different families (mass vs mole).
    pub fn convert_ratio(&self, other: &Self, periods: &CalendarPeriods) -> EmipsResult<f64> {
        let (Some(from_area), Some(to_area)) = (self.area.scale(), other.area.scale()) else {
            return Err(self.undefined(other));
        };
        Ok(self.convert_ratio_ignoring_area(other, periods)? * to_area / from_area)
    }

    /// Multiplier for the weight and period parts only.
    ///
    /// Used for grid-relative inventories, which then divide by the cell-area
    /// field of their grid.
    pub fn convert_ratio_ignoring_area(
        &self,
        other: &Self,
        periods: &CalendarPeriods,
    ) -> EmipsResult<f64> {
        if self.weight.family() != other.weight.family() {
            return Err(self.undefined(other));
        }
        let weight = self.weight.scale() / other.weight.scale();
        let period = other.period.seconds(periods) / self.period.seconds(periods);
        Ok(weight * period)
    }

    /// Converts a (y, x) field from `self` to `target`.
    ///
    /// Grid-relative source units are divided by the cell areas (m²) of
    /// `grid`; `None` for a grid-relative source is an error.
    pub fn convert_field(
        &self,
        field: &Array2<f64>,
        target: &Self,
        grid: Option<&GridDescriptor>,
        periods: &CalendarPeriods,
    ) -> EmipsResult<Array2<f64>> {
        if target.is_grid_relative() {
            return Err(self.undefined(target));
        }
        if !self.is_grid_relative() {
            let ratio = self.convert_ratio(target, periods)?;
            return Ok(field * ratio);
        }
        let grid = grid.ok_or_else(|| self.undefined(target))?;
        grid.check_field(field.shape())?;
        let ratio = self.convert_ratio_ignoring_area(target, periods)?;
        // Areas are in m², rescale if the target is per km².
        let target_scale = target.area.scale().unwrap_or(1.0);
        let areas = grid.cell_areas();
        Ok(field * ratio * target_scale / &areas)
    }

    fn undefined(&self, other: &Self) -> EmipsError {
        EmipsError::UnitConversionUndefined {
            from: self.to_string(),
            to: other.to_string(),
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.weight, self.area, self.period)
    }
}

impl FromStr for Units {
    type Err = EmipsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Units::parse(s)
    }
}

impl TryFrom<String> for Units {
    type Error = EmipsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Units::parse(&value)
    }
}

impl From<Units> for String {
    fn from(value: Units) -> Self {
        value.to_string()
    }
}
