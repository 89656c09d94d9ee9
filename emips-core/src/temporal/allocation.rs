//! Month → week → diurnal allocation of (y, x) fields.
//!
//! Every step preserves the total: a coarse-period field is split into finer
//! periods by profile ratios, so summing the finer fields (weighted by how
//! often each occurs) gives back the coarse field.

use super::calendar;
use super::profiles::{DiurnalProfile, MonthProfile, TemporalProfiles, VerticalProfile, WeekProfile};
use crate::errors::EmipsResult;
use crate::units::SECONDS_PER_HOUR;
use ndarray::{Array, Array2, Array3, Array4, Axis, Dimension};

fn expand(field: &Array2<f64>, ratios: &[f64]) -> Array3<f64> {
    let (ny, nx) = field.dim();
    let mut out = Array3::zeros((ratios.len(), ny, nx));
    for (mut slab, ratio) in out.outer_iter_mut().zip(ratios) {
        slab.assign(&field.mapv(|v| v * ratio));
    }
    out
}

/// Split a yearly total into 12 monthly totals, shape `(12, y, x)`.
pub fn month_allocation(yearly: &Array2<f64>, profile: &MonthProfile) -> Array3<f64> {
    expand(yearly, &profile.get_ratios())
}

/// Split a monthly total into per-day weekday and weekend values.
///
/// With `total = weekday_weight * weekday_days + weekend_weight * weekend_days`
/// the weekday field is `monthly / total * weekday_weight` and the weekend
/// field is `monthly / total * weekend_weight`. A zero total yields zero
/// fields.
pub fn week_allocation(
    monthly: &Array2<f64>,
    profile: &WeekProfile,
    year: i32,
    month: u32,
) -> EmipsResult<(Array2<f64>, Array2<f64>)> {
    let weekend_days = calendar::weekend_days(year, month)? as f64;
    let weekday_days = calendar::month_days(year, month)? as f64 - weekend_days;
    let (wd, we) = (profile.weekday_weight(), profile.weekend_weight());
    let total = wd * weekday_days + we * weekend_days;
    if total <= 0.0 {
        return Ok((Array2::zeros(monthly.dim()), Array2::zeros(monthly.dim())));
    }
    let per_weight = monthly / total;
    Ok((&per_weight * wd, &per_weight * we))
}

/// Split a monthly total into per-day values for each weekday, shape
/// `(7, y, x)`, Monday first.
///
/// Each weekday is weighted by how many times it occurs in the month.
pub fn week_allocation_by_day(
    monthly: &Array2<f64>,
    profile: &WeekProfile,
    year: i32,
    month: u32,
) -> EmipsResult<Array3<f64>> {
    let counts = calendar::weekday_counts(year, month)?;
    let total: f64 = profile
        .weights()
        .iter()
        .zip(counts.iter())
        .map(|(w, n)| w * *n as f64)
        .sum();
    if total <= 0.0 {
        let (ny, nx) = monthly.dim();
        return Ok(Array3::zeros((7, ny, nx)));
    }
    let per_weight: Vec<f64> = profile.weights().iter().map(|w| w / total).collect();
    Ok(expand(monthly, &per_weight))
}

/// Split a daily total into 24 hourly totals, shape `(24, y, x)`.
pub fn diurnal_allocation(daily: &Array2<f64>, profile: &DiurnalProfile) -> Array3<f64> {
    expand(daily, &profile.get_ratios())
}

/// Representative day of the week: 5 weekday-equivalents and 2
/// weekend-equivalents over 7.
pub fn blend_week<D: Dimension>(weekday: &Array<f64, D>, weekend: &Array<f64, D>) -> Array<f64, D> {
    (weekday * 5.0 + weekend * 2.0) / 7.0
}

/// Hourly rates per second, shape `(24, y, x)`, from a monthly total.
///
/// Runs the weekly split, spreads the weekday value over the weekday diurnal
/// curve and the weekend value over the weekend curve, blends the two into a
/// representative day and converts per-hour totals to per-second rates.
pub fn month_to_hourly(
    monthly: &Array2<f64>,
    profiles: &TemporalProfiles,
    year: i32,
    month: u32,
) -> EmipsResult<Array3<f64>> {
    let (weekday, weekend) = week_allocation(monthly, &profiles.week, year, month)?;
    let weekday = diurnal_allocation(&weekday, &profiles.diurnal_weekday);
    let weekend = diurnal_allocation(&weekend, &profiles.diurnal_weekend);
    Ok(blend_week(&weekday, &weekend) / SECONDS_PER_HOUR)
}

/// Distribute hourly fields `(hour, y, x)` over layers, giving
/// `(hour, layer, y, x)`.
pub fn vertical_allocation(hourly: &Array3<f64>, profile: &VerticalProfile) -> Array4<f64> {
    let (nt, ny, nx) = hourly.dim();
    let ratios = profile.get_ratios();
    let mut out = Array4::zeros((nt, ratios.len(), ny, nx));
    for (layer, ratio) in ratios.iter().enumerate() {
        out.index_axis_mut(Axis(1), layer)
            .assign(&hourly.mapv(|v| v * ratio));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;

    #[test]
    fn test_month_allocation_reproduces_weights() {
        let weights = vec![
            112.0, 112.0, 83.0, 83.0, 83.0, 74.0, 74.0, 74.0, 65.0, 65.0, 65.0, 112.0,
        ];
        let total: f64 = weights.iter().sum();
        let profile = MonthProfile::new("462", weights.clone()).unwrap();
        let yearly = Array2::from_elem((2, 3), total);

        let monthly = month_allocation(&yearly, &profile);
        assert_eq!(monthly.dim(), (12, 2, 3));
        for (i, w) in weights.iter().enumerate() {
            assert!(monthly.index_axis(Axis(0), i).iter().all(|v| is_close!(*v, *w)));
        }
    }

    #[test]
    fn test_week_allocation_example() {
        // June 2023: 22 weekdays and 8 weekend days.
        let profile = WeekProfile::from_split("8", 147.0, 132.0).unwrap();
        let monthly = Array2::from_elem((1, 1), 3000.0);
        let (weekday, weekend) = week_allocation(&monthly, &profile, 2023, 6).unwrap();

        let total = 147.0 * 22.0 + 132.0 * 8.0;
        assert!(is_close!(total, 4290.0));
        assert!(is_close!(weekday[[0, 0]], 3000.0 / total * 147.0));
        assert!(is_close!(weekend[[0, 0]], 3000.0 / total * 132.0));
        assert!((weekday[[0, 0]] - 102.80).abs() < 0.01);
        assert!((weekend[[0, 0]] - 92.31).abs() < 0.01);
        assert!(is_close!(weekday[[0, 0]] * 22.0 + weekend[[0, 0]] * 8.0, 3000.0));
    }

    #[test]
    fn test_week_allocation_zero_profile() {
        let profile = WeekProfile::new("0", vec![0.0; 7]).unwrap();
        let monthly = Array2::from_elem((2, 2), 10.0);
        let (weekday, weekend) = week_allocation(&monthly, &profile, 2023, 6).unwrap();
        assert!(weekday.iter().chain(weekend.iter()).all(|v| *v == 0.0));
    }

    #[test]
    fn test_week_allocation_invalid_month() {
        let monthly = Array2::from_elem((1, 1), 1.0);
        assert!(week_allocation(&monthly, &WeekProfile::default(), 2023, 13).is_err());
    }

    #[test]
    fn test_week_allocation_by_day_conserves() {
        let profile = WeekProfile::new("w", vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]).unwrap();
        let monthly = Array2::from_elem((2, 2), 310.0);
        let daily = week_allocation_by_day(&monthly, &profile, 2017, 1).unwrap();
        let counts = calendar::weekday_counts(2017, 1).unwrap();

        let total: f64 = (0..7)
            .map(|d| daily[[d, 0, 0]] * counts[d] as f64)
            .sum();
        assert!(is_close!(total, 310.0));
        assert!(is_close!(daily[[1, 1, 1]], 2.0 * daily[[0, 1, 1]]));
    }

    #[test]
    fn test_diurnal_allocation_conserves() {
        let daily = Array2::from_elem((3, 4), 24.0);
        let hourly = diurnal_allocation(&daily, &DiurnalProfile::default());
        assert_eq!(hourly.dim(), (24, 3, 4));
        assert!(is_close!(hourly.sum_axis(Axis(0))[[2, 3]], 24.0));

        let flat = diurnal_allocation(&daily, &DiurnalProfile::uniform());
        assert!(flat.iter().all(|v| is_close!(*v, 1.0)));
    }

    #[test]
    fn test_month_to_hourly() {
        let monthly = Array2::from_elem((1, 2), 30.0 * 86400.0);
        let hourly = month_to_hourly(&monthly, &TemporalProfiles::uniform(), 2023, 6).unwrap();
        // Flat profiles over a 30-day month: one unit per second.
        assert!(hourly.iter().all(|v| is_close!(*v, 1.0)));
    }

    #[test]
    fn test_month_to_hourly_weekend_curve() {
        let mut weights = vec![0.0; 24];
        weights[0] = 1.0;
        let profiles = TemporalProfiles {
            diurnal_weekend: DiurnalProfile::new("night", weights).unwrap(),
            ..TemporalProfiles::uniform()
        };
        let monthly = Array2::from_elem((1, 1), 30.0 * 86400.0);
        let hourly = month_to_hourly(&monthly, &profiles, 2023, 6).unwrap();

        // Weekdays spread one unit per second; weekends put the whole day in
        // the first hour.
        assert!(is_close!(hourly[[0, 0, 0]], (5.0 + 2.0 * 24.0) / 7.0));
        assert!(is_close!(hourly[[1, 0, 0]], 5.0 / 7.0));
        assert!(is_close!(hourly[[23, 0, 0]], 5.0 / 7.0));
        assert!(is_close!(hourly.sum() * SECONDS_PER_HOUR, 86400.0));
    }

    #[test]
    fn test_vertical_allocation() {
        let hourly = Array3::from_elem((24, 2, 2), 10.0);
        let profile = VerticalProfile::new("industry", vec![0.5, 0.3, 0.2]).unwrap();
        let layered = vertical_allocation(&hourly, &profile);
        assert_eq!(layered.dim(), (24, 3, 2, 2));
        assert!(is_close!(layered[[5, 0, 1, 1]], 5.0));
        assert!(is_close!(layered[[5, 2, 0, 1]], 2.0));
        assert!(is_close!(layered.sum_axis(Axis(1))[[7, 1, 0]], 10.0));

        let surface = vertical_allocation(&hourly, &VerticalProfile::surface());
        assert_eq!(surface.dim(), (24, 1, 2, 2));
        assert!(is_close!(surface[[0, 0, 0, 0]], 10.0));
    }
}
