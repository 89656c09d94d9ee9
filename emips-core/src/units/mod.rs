//! Emission flux units.
//!
//! Inventories arrive in a variety of units (`kg/m2/s`, `Mg/grid/year`, ...)
//! while the allocation cascade works in `g/m2/month` (or `g/m2/year`) and the
//! model-ready output is `g/m2/s` or `mole/m2/s`.
//!
//! # Quick Start
//!
//! ```
//! use emips_core::units::{CalendarPeriods, Units};
//!
//! let inventory = Units::parse("kg/m2/s").unwrap();
//! let working = Units::g_m2_month();
//! let ratio = inventory
//!     .convert_ratio(&working, &CalendarPeriods::nominal())
//!     .unwrap();
//! assert_eq!(ratio, 1e3 * 86400.0 * 30.0);
//! ```
//!
//! Month and year lengths are always passed explicitly through
//! [`CalendarPeriods`]; grid-relative areas need the cell areas of a grid and
//! are rejected by [`Units::convert_ratio`].

pub mod conversion;
pub mod kinds;

pub use conversion::Units;
pub use kinds::{Area, CalendarPeriods, Period, Weight, WeightFamily, SECONDS_PER_HOUR};
