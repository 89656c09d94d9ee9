//! Conservation tests for the allocation cascade.
//!
//! Every allocation step redistributes mass without creating or losing any:
//! - Month, week and diurnal splits sum back to their input
//! - Speciation with mass fractions summing to one sums back to its input
//! - Regridding a constant field yields the same constant

use approx::assert_relative_eq;
use emips_core::grid::GridDescriptor;
use emips_core::registry::Species;
use emips_core::spatial::{RegridMethod, SpatialAllocator};
use emips_core::speciation::{
    lump_voc, speciate, ChemicalMechanism, LumpedSpecies, MechanismTable, PollutantProfile,
    RetroSpecies, SpeciationEntry,
};
use emips_core::temporal::calendar;
use emips_core::temporal::{
    diurnal_allocation, month_allocation, week_allocation, week_allocation_by_day, DiurnalProfile,
    MonthProfile, ProfileKind, ProfileWeights, WeekProfile,
};
use ndarray::{Array2, Axis, Ix2};
use std::collections::BTreeMap;

fn field() -> Array2<f64> {
    Array2::from_shape_fn((4, 5), |(j, i)| 1.0 + j as f64 * 3.7 + i as f64 * 0.11)
}

mod temporal_conservation {
    use super::*;

    #[test]
    fn test_month_allocation_sums_to_yearly() {
        let yearly = field();
        for profile in [
            MonthProfile::default(),
            MonthProfile::uniform(),
            MonthProfile::new("skewed", vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0])
                .unwrap(),
        ] {
            let months = month_allocation(&yearly, &profile);
            let total = months.sum_axis(Axis(0));
            for (a, b) in total.iter().zip(yearly.iter()) {
                assert_relative_eq!(*a, *b, max_relative = 1e-9);
            }
        }
    }

    #[test]
    fn test_month_allocation_reproduces_weights() {
        let weights = vec![
            112.0, 112.0, 83.0, 83.0, 83.0, 74.0, 74.0, 74.0, 65.0, 65.0, 65.0, 112.0,
        ];
        let total: f64 = weights.iter().sum();
        let profile = MonthProfile::new("462", weights.clone()).unwrap();
        let yearly = Array2::from_elem((1, 1), total);
        let months = month_allocation(&yearly, &profile);
        for (month, weight) in weights.iter().enumerate() {
            assert_relative_eq!(months[[month, 0, 0]], *weight, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_week_allocation_conserves_month() {
        let monthly = field();
        let profile = WeekProfile::default();
        for (year, month) in [(2017, 1), (2020, 2), (2023, 6), (2023, 12)] {
            let (weekday, weekend) = week_allocation(&monthly, &profile, year, month).unwrap();
            let weekend_days = calendar::weekend_days(year, month).unwrap() as f64;
            let weekday_days = calendar::weekday_days(year, month).unwrap() as f64;
            let rebuilt = &weekday * weekday_days + &weekend * weekend_days;
            for (a, b) in rebuilt.iter().zip(monthly.iter()) {
                assert_relative_eq!(*a, *b, max_relative = 1e-9);
            }
        }
    }

    #[test]
    fn test_week_allocation_scenario() {
        // June 2023: 22 weekdays, 8 weekend days
        let monthly = Array2::from_elem((1, 1), 3000.0);
        let profile = WeekProfile::from_split("8", 147.0, 132.0).unwrap();
        let (weekday, weekend) = week_allocation(&monthly, &profile, 2023, 6).unwrap();

        assert_relative_eq!(weekday[[0, 0]], 3000.0 / 4290.0 * 147.0, max_relative = 1e-12);
        assert_relative_eq!(weekend[[0, 0]], 3000.0 / 4290.0 * 132.0, max_relative = 1e-12);
        assert_relative_eq!(
            weekday[[0, 0]] * 22.0 + weekend[[0, 0]] * 8.0,
            3000.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_week_allocation_by_day_conserves_month() {
        let monthly = field();
        let profile = WeekProfile::new("w", vec![1.0, 1.1, 1.2, 1.3, 1.4, 0.6, 0.4]).unwrap();
        let (year, month) = (2017, 1);
        let days = week_allocation_by_day(&monthly, &profile, year, month).unwrap();
        let counts = calendar::weekday_counts(year, month).unwrap();

        let mut rebuilt = Array2::<f64>::zeros(monthly.dim());
        for (day, count) in days.outer_iter().zip(counts) {
            rebuilt = rebuilt + &day * count as f64;
        }
        for (a, b) in rebuilt.iter().zip(monthly.iter()) {
            assert_relative_eq!(*a, *b, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_diurnal_allocation_sums_to_daily() {
        let daily = field();
        for profile in [
            DiurnalProfile::default(),
            DiurnalProfile::uniform(),
            DiurnalProfile::default().shifted(8, true),
        ] {
            let hours = diurnal_allocation(&daily, &profile);
            assert_eq!(hours.len_of(Axis(0)), 24);
            let total = hours.sum_axis(Axis(0));
            for (a, b) in total.iter().zip(daily.iter()) {
                assert_relative_eq!(*a, *b, max_relative = 1e-9);
            }
        }
    }

    #[test]
    fn test_ratios_sum_to_one() {
        let profiles = [
            ProfileWeights::new(ProfileKind::Monthly, "a", vec![3.0; 12]).unwrap(),
            ProfileWeights::new(ProfileKind::Weekly, "b", vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7])
                .unwrap(),
            ProfileWeights::new(ProfileKind::Vertical, "c", vec![0.1, 0.1, 0.3, 0.2, 0.2, 0.1])
                .unwrap(),
            DiurnalProfile::default().into_inner(),
        ];
        for profile in profiles {
            let sum: f64 = profile.get_ratios().iter().sum();
            assert_relative_eq!(sum, 1.0, epsilon = 1e-9);
        }
    }
}

mod speciation_conservation {
    use super::*;

    static MINI: MechanismTable = MechanismTable {
        name: "MINI",
        nmvoc: &[
            LumpedSpecies {
                name: "ALK",
                molar_mass: 44.0,
                description: "Alkanes",
                lumping: &[(RetroSpecies::Propane, 1.0), (RetroSpecies::Butanes, 0.5)],
            },
            LumpedSpecies {
                name: "ARO",
                molar_mass: 92.0,
                description: "Aromatics",
                lumping: &[(RetroSpecies::Toluene, 1.0)],
            },
            LumpedSpecies {
                name: "ISO",
                molar_mass: 68.0,
                description: "Isoprene",
                lumping: &[(RetroSpecies::Isoprene, 1.0)],
            },
        ],
    };

    #[test]
    fn test_speciate_sums_to_pollutant() {
        let entries = vec![
            SpeciationEntry::new("PM2_5", Species::new("PEC", None), 0.1, 1.0, 0.1),
            SpeciationEntry::new("PM2_5", Species::new("POA", None), 0.25, 1.0, 0.25),
            SpeciationEntry::new("PM2_5", Species::new("PSO4", None), 0.15, 1.0, 0.15),
            SpeciationEntry::new("PM2_5", Species::new("PMFINE", None), 0.5, 1.0, 0.5),
        ];
        let profile = PollutantProfile::with_entries("PM2_5", entries);
        let input = field();
        let out = speciate(&input, &profile);

        assert_eq!(out.len(), profile.len());
        let total = out
            .iter()
            .fold(Array2::<f64>::zeros(input.dim()), |acc, (_, f)| acc + f);
        for (a, b) in total.iter().zip(input.iter()) {
            assert_relative_eq!(*a, *b, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_speciate_nox_to_moles() {
        let profile = PollutantProfile::nox().unwrap();
        let input = Array2::from_elem((2, 2), 46.0);
        let out = speciate(&input, &profile);
        assert_relative_eq!(out[0].1[[0, 0]], 1.38, max_relative = 1e-12);
        assert_relative_eq!(out[1].1[[1, 1]], 0.1, max_relative = 1e-12);
    }

    #[test]
    fn test_lump_voc_emits_every_species() {
        let mechanism = ChemicalMechanism::new(&MINI);
        let mut reference = BTreeMap::new();
        reference.insert(RetroSpecies::Butanes, Array2::from_elem((2, 3), 88.0));

        let out = lump_voc(&mechanism, &reference, Ix2(2, 3));
        assert_eq!(out.len(), 3);
        assert_relative_eq!(out[0].1[[1, 2]], 1.0, max_relative = 1e-12);
        assert!(out[1].1.iter().all(|v| *v == 0.0));
        assert!(out[2].1.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_lump_voc_is_deterministic() {
        let mechanism = ChemicalMechanism::new(&MINI);
        let mut reference = BTreeMap::new();
        reference.insert(RetroSpecies::Propane, field());
        reference.insert(RetroSpecies::Butanes, field() * 0.3);
        reference.insert(RetroSpecies::Toluene, field() * 1.7);

        let a = lump_voc(&mechanism, &reference, Ix2(4, 5));
        let b = lump_voc(&mechanism, &reference, Ix2(4, 5));
        assert_eq!(a, b);
    }
}

mod spatial_conservation {
    use super::*;

    #[test]
    fn test_constant_field_upsampled() {
        let source = GridDescriptor::lon_lat(0.0, 1.0, 10, 0.0, 1.0, 10).unwrap();
        let dest = GridDescriptor::lon_lat(0.0, 0.5, 20, 0.0, 0.5, 20).unwrap();
        let field = Array2::from_elem((10, 10), 5.0);

        let out = SpatialAllocator::new()
            .allocate(&field, &source, &dest, RegridMethod::Auto)
            .unwrap();
        assert_eq!(out.shape(), &[20, 20]);
        for v in out.iter() {
            assert_relative_eq!(*v, 5.0, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_constant_field_downsampled() {
        let source = GridDescriptor::lon_lat(0.0, 0.5, 20, 0.0, 0.5, 20).unwrap();
        let dest = GridDescriptor::lon_lat(0.0, 1.0, 10, 0.0, 1.0, 10).unwrap();
        let field = Array2::from_elem((20, 20), 2.5);

        let out = SpatialAllocator::new()
            .allocate(&field, &source, &dest, RegridMethod::Auto)
            .unwrap();
        for v in out.iter() {
            assert_relative_eq!(*v, 2.5, max_relative = 1e-12);
        }
    }
}
