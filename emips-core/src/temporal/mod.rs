//! Temporal (and vertical) allocation.
//!
//! Inventories are delivered as monthly or yearly totals. The allocation
//! cascade splits them month → week → day → hour using [`profiles`] resolved
//! per source category from a [`store::ProfileStore`].
//!
//! # Quick Start
//!
//! ```
//! use emips_core::temporal::{month_to_hourly, TemporalProfiles};
//! use ndarray::Array2;
//!
//! // 30 days worth of one unit per second, June has 30 days.
//! let monthly = Array2::from_elem((2, 2), 30.0 * 86400.0);
//! let hourly = month_to_hourly(&monthly, &TemporalProfiles::uniform(), 2023, 6).unwrap();
//! assert_eq!(hourly.dim(), (24, 2, 2));
//! assert!((hourly[[12, 0, 0]] - 1.0).abs() < 1e-12);
//! ```

pub mod allocation;
pub mod calendar;
pub mod profiles;
pub mod store;

pub use allocation::{
    blend_week, diurnal_allocation, month_allocation, month_to_hourly, vertical_allocation,
    week_allocation, week_allocation_by_day,
};
pub use profiles::{
    DiurnalProfile, MonthProfile, ProfileKind, ProfileWeights, TemporalProfiles, VerticalProfile,
    WeekProfile,
};
pub use store::{ProfileStore, TemporalFallback, TimeZoneShift, VerticalProfileStore};
