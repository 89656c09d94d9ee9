//! Unit components of an emission flux: weight, area and period.
//!
//! Every kind knows its scale relative to a base unit (gram or mole, square
//! metre, second). Conversion factors are ratios of those scales, which keeps
//! conversion transitive by construction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Seconds per minute.
pub const SECONDS_PER_MINUTE: f64 = 60.0;
/// Seconds per hour.
pub const SECONDS_PER_HOUR: f64 = 3600.0;
/// Seconds per day.
pub const SECONDS_PER_DAY: f64 = 24.0 * 3600.0;
/// Seconds per week.
pub const SECONDS_PER_WEEK: f64 = 7.0 * SECONDS_PER_DAY;

/// Family of a weight unit. Mass and amount of substance never convert into
/// each other without a molar mass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeightFamily {
    Mass,
    Mole,
}

/// Weight part of an emission unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weight {
    #[serde(rename = "g")]
    Gram,
    #[serde(rename = "kg")]
    Kilogram,
    /// Megagram (metric tonne).
    #[serde(rename = "Mg")]
    Megagram,
    #[serde(rename = "mole")]
    Mole,
    #[serde(rename = "kmole")]
    KiloMole,
    #[serde(rename = "Mmole")]
    MillionMole,
}

impl Weight {
    pub fn family(&self) -> WeightFamily {
        match self {
            Weight::Gram | Weight::Kilogram | Weight::Megagram => WeightFamily::Mass,
            Weight::Mole | Weight::KiloMole | Weight::MillionMole => WeightFamily::Mole,
        }
    }

    /// Scale relative to the family base (gram or mole).
    pub fn scale(&self) -> f64 {
        match self {
            Weight::Gram | Weight::Mole => 1.0,
            Weight::Kilogram | Weight::KiloMole => 1e3,
            Weight::Megagram | Weight::MillionMole => 1e6,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Weight::Gram => "g",
            Weight::Kilogram => "kg",
            Weight::Megagram => "Mg",
            Weight::Mole => "mole",
            Weight::KiloMole => "kmole",
            Weight::MillionMole => "Mmole",
        }
    }
}

/// Area part of an emission unit.
///
/// [`Area::GridCell`] means "per grid cell" and has no absolute scale: it can
/// only be reduced to an absolute area with the cell-area field of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Area {
    #[serde(rename = "m2")]
    SquareMetre,
    #[serde(rename = "km2")]
    SquareKilometre,
    #[serde(rename = "grid")]
    GridCell,
}

impl Area {
    /// Scale relative to a square metre, `None` for grid-relative area.
    pub fn scale(&self) -> Option<f64> {
        match self {
            Area::SquareMetre => Some(1.0),
            Area::SquareKilometre => Some(1e6),
            Area::GridCell => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Area::SquareMetre => "m2",
            Area::SquareKilometre => "km2",
            Area::GridCell => "grid",
        }
    }
}

/// Period part of an emission unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "s")]
    Second,
    #[serde(rename = "min")]
    Minute,
    #[serde(rename = "h")]
    Hour,
    #[serde(rename = "d")]
    Day,
    #[serde(rename = "w")]
    Week,
    #[serde(rename = "month")]
    Month,
    #[serde(rename = "year")]
    Year,
}

impl Period {
    /// Length in seconds. Month and year lengths come from `periods`.
    pub fn seconds(&self, periods: &CalendarPeriods) -> f64 {
        match self {
            Period::Second => 1.0,
            Period::Minute => SECONDS_PER_MINUTE,
            Period::Hour => SECONDS_PER_HOUR,
            Period::Day => SECONDS_PER_DAY,
            Period::Week => SECONDS_PER_WEEK,
            Period::Month => SECONDS_PER_DAY * periods.month_days as f64,
            Period::Year => SECONDS_PER_DAY * periods.year_days as f64,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Period::Second => "s",
            Period::Minute => "min",
            Period::Hour => "h",
            Period::Day => "d",
            Period::Week => "w",
            Period::Month => "month",
            Period::Year => "year",
        }
    }
}

/// Calendar lengths used when a conversion crosses a month or year period.
///
/// There is no implicit default: callers either ask for the nominal 30/365
/// convention or for the real lengths of a given month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarPeriods {
    pub month_days: u32,
    pub year_days: u32,
}

impl CalendarPeriods {
    /// Fixed 30-day months and 365-day years.
    pub const fn nominal() -> Self {
        Self {
            month_days: 30,
            year_days: 365,
        }
    }

    /// Actual lengths of `month` in `year` and of `year` itself.
    pub fn for_month(year: i32, month: u32) -> crate::errors::EmipsResult<Self> {
        Ok(Self {
            month_days: crate::temporal::calendar::month_days(year, month)?,
            year_days: crate::temporal::calendar::year_days(year),
        })
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Weight {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "g" => Ok(Weight::Gram),
            "kg" => Ok(Weight::Kilogram),
            "Mg" | "t" => Ok(Weight::Megagram),
            "mole" | "mol" => Ok(Weight::Mole),
            "kmole" | "kmol" => Ok(Weight::KiloMole),
            "Mmole" | "Mmol" => Ok(Weight::MillionMole),
            other => Err(format!("unknown weight unit '{other}'")),
        }
    }
}

impl FromStr for Area {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "m2" | "m^2" => Ok(Area::SquareMetre),
            "km2" | "km^2" => Ok(Area::SquareKilometre),
            "grid" | "cell" => Ok(Area::GridCell),
            other => Err(format!("unknown area unit '{other}'")),
        }
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "s" => Ok(Period::Second),
            "min" => Ok(Period::Minute),
            "h" | "hr" => Ok(Period::Hour),
            "d" | "day" => Ok(Period::Day),
            "w" | "week" => Ok(Period::Week),
            "month" | "mon" => Ok(Period::Month),
            "year" | "yr" | "y" => Ok(Period::Year),
            other => Err(format!("unknown period unit '{other}'")),
        }
    }
}
