//! Weighting profiles.
//!
//! A profile is an identifier plus a non-negative weight sequence. Its ratios
//! are the weights normalised by their sum. Month, week, diurnal and vertical
//! profiles differ only in their expected length and in a few derived values.

use crate::errors::{EmipsError, EmipsResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

/// Month profile id used when no reference row exists.
pub const DEFAULT_MONTH_ID: &str = "462";
/// Week profile id used when no reference row exists.
pub const DEFAULT_WEEK_ID: &str = "8";
/// Diurnal profile id used when no reference row exists.
pub const DEFAULT_DIURNAL_ID: &str = "33";

const DEFAULT_MONTH_WEIGHTS: [f64; 12] = [
    112.0, 112.0, 83.0, 83.0, 83.0, 74.0, 74.0, 74.0, 65.0, 65.0, 65.0, 112.0,
];
const DEFAULT_WEEKDAY_WEIGHT: f64 = 147.0;
const DEFAULT_WEEKEND_WEIGHT: f64 = 132.0;
const DEFAULT_DIURNAL_WEIGHTS: [f64; 24] = [
    433.0, 457.0, 478.0, 486.0, 494.0, 497.0, 501.0, 500.0, 497.0, 489.0, 477.0, 473.0, 466.0,
    440.0, 397.0, 352.0, 324.0, 300.0, 288.0, 284.0, 292.0, 316.0, 354.0, 403.0,
];

/// Which dimension a profile distributes over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    Monthly,
    Weekly,
    Diurnal,
    Vertical,
}

impl ProfileKind {
    /// Required number of weights, `None` when any non-zero length is valid.
    pub fn expected_len(&self) -> Option<usize> {
        match self {
            ProfileKind::Monthly => Some(12),
            ProfileKind::Weekly => Some(7),
            ProfileKind::Diurnal => Some(24),
            ProfileKind::Vertical => None,
        }
    }
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProfileKind::Monthly => "monthly",
            ProfileKind::Weekly => "weekly",
            ProfileKind::Diurnal => "diurnal",
            ProfileKind::Vertical => "vertical",
        };
        f.write_str(name)
    }
}

/// Unvalidated form of a profile as it appears in serialised data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawProfileWeights {
    pub id: String,
    pub kind: ProfileKind,
    pub weights: Vec<f64>,
}

/// Identifier and ordered, non-negative weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawProfileWeights", into = "RawProfileWeights")]
pub struct ProfileWeights {
    id: String,
    kind: ProfileKind,
    weights: Vec<f64>,
}

impl TryFrom<RawProfileWeights> for ProfileWeights {
    type Error = EmipsError;

    fn try_from(raw: RawProfileWeights) -> Result<Self, Self::Error> {
        ProfileWeights::new(raw.kind, raw.id, raw.weights)
    }
}

impl From<ProfileWeights> for RawProfileWeights {
    fn from(profile: ProfileWeights) -> Self {
        Self {
            id: profile.id,
            kind: profile.kind,
            weights: profile.weights,
        }
    }
}

impl ProfileWeights {
    /// # Errors
    ///
    /// `InvalidProfile` if the length is wrong for `kind` or a weight is
    /// negative or not finite.
    pub fn new(kind: ProfileKind, id: impl Into<String>, weights: Vec<f64>) -> EmipsResult<Self> {
        let id = id.into();
        let invalid = |reason: String| EmipsError::InvalidProfile {
            kind: kind.to_string(),
            id: id.clone(),
            reason,
        };
        match kind.expected_len() {
            Some(n) if weights.len() != n => {
                return Err(invalid(format!(
                    "expected {n} weights, found {}",
                    weights.len()
                )))
            }
            None if weights.is_empty() => return Err(invalid("no weights".to_string())),
            _ => {}
        }
        if let Some(w) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
            return Err(invalid(format!("weight {w} is not a non-negative number")));
        }
        Ok(Self { id, kind, weights })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> ProfileKind {
        self.kind
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn total_weight(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Weights divided by their sum.
    ///
    /// A profile whose weights are all zero has all-zero ratios, so it
    /// allocates nothing rather than producing NaN.
    pub fn get_ratios(&self) -> Vec<f64> {
        let total = self.total_weight();
        if total > 0.0 {
            self.weights.iter().map(|w| w / total).collect()
        } else {
            vec![0.0; self.weights.len()]
        }
    }

    fn uniform(kind: ProfileKind, n: usize) -> Self {
        Self {
            id: "uniform".to_string(),
            kind,
            weights: vec![1.0; n],
        }
    }
}

macro_rules! profile_newtype {
    ($name:ident, $kind:expr) => {
        impl $name {
            pub fn new(id: impl Into<String>, weights: Vec<f64>) -> EmipsResult<Self> {
                ProfileWeights::new($kind, id, weights).map(Self)
            }

            pub fn into_inner(self) -> ProfileWeights {
                self.0
            }
        }

        impl Deref for $name {
            type Target = ProfileWeights;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl TryFrom<ProfileWeights> for $name {
            type Error = EmipsError;

            fn try_from(value: ProfileWeights) -> Result<Self, Self::Error> {
                if value.kind != $kind {
                    return Err(EmipsError::InvalidProfile {
                        kind: $kind.to_string(),
                        id: value.id,
                        reason: format!("profile is {}", value.kind),
                    });
                }
                Ok(Self(value))
            }
        }

        impl From<$name> for ProfileWeights {
            fn from(profile: $name) -> Self {
                profile.0
            }
        }
    };
}

/// Twelve monthly weights, January first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProfileWeights", into = "ProfileWeights")]
pub struct MonthProfile(ProfileWeights);
profile_newtype!(MonthProfile, ProfileKind::Monthly);

impl MonthProfile {
    /// Equal weight for every month.
    pub fn uniform() -> Self {
        Self(ProfileWeights::uniform(ProfileKind::Monthly, 12))
    }
}

impl Default for MonthProfile {
    fn default() -> Self {
        Self(ProfileWeights {
            id: DEFAULT_MONTH_ID.to_string(),
            kind: ProfileKind::Monthly,
            weights: DEFAULT_MONTH_WEIGHTS.to_vec(),
        })
    }
}

/// Seven daily weights, Monday first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProfileWeights", into = "ProfileWeights")]
pub struct WeekProfile(ProfileWeights);
profile_newtype!(WeekProfile, ProfileKind::Weekly);

impl WeekProfile {
    /// Five days at `weekday` and two at `weekend`.
    pub fn from_split(id: impl Into<String>, weekday: f64, weekend: f64) -> EmipsResult<Self> {
        Self::new(
            id,
            vec![weekday, weekday, weekday, weekday, weekday, weekend, weekend],
        )
    }

    pub fn uniform() -> Self {
        Self(ProfileWeights::uniform(ProfileKind::Weekly, 7))
    }

    /// Mean weight of Monday to Friday.
    pub fn weekday_weight(&self) -> f64 {
        self.0.weights[..5].iter().sum::<f64>() / 5.0
    }

    /// Mean weight of Saturday and Sunday.
    pub fn weekend_weight(&self) -> f64 {
        self.0.weights[5..].iter().sum::<f64>() / 2.0
    }
}

impl Default for WeekProfile {
    fn default() -> Self {
        let (wd, we) = (DEFAULT_WEEKDAY_WEIGHT, DEFAULT_WEEKEND_WEIGHT);
        Self(ProfileWeights {
            id: DEFAULT_WEEK_ID.to_string(),
            kind: ProfileKind::Weekly,
            weights: vec![wd, wd, wd, wd, wd, we, we],
        })
    }
}

/// Twenty-four hourly weights, hour 0 first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProfileWeights", into = "ProfileWeights")]
pub struct DiurnalProfile(ProfileWeights);
profile_newtype!(DiurnalProfile, ProfileKind::Diurnal);

impl DiurnalProfile {
    pub fn uniform() -> Self {
        Self(ProfileWeights::uniform(ProfileKind::Diurnal, 24))
    }

    /// Rotate the curve from local time to UTC.
    ///
    /// For a zone `hours` east of UTC, UTC hour `h` takes the local weight of
    /// hour `h + hours`; west of UTC it takes `h - hours`.
    pub fn shifted(&self, hours: usize, east: bool) -> Self {
        let mut weights = self.0.weights.clone();
        let hours = hours % 24;
        if east {
            weights.rotate_left(hours);
        } else {
            weights.rotate_right(hours);
        }
        Self(ProfileWeights {
            id: self.0.id.clone(),
            kind: ProfileKind::Diurnal,
            weights,
        })
    }
}

impl Default for DiurnalProfile {
    fn default() -> Self {
        Self(ProfileWeights {
            id: DEFAULT_DIURNAL_ID.to_string(),
            kind: ProfileKind::Diurnal,
            weights: DEFAULT_DIURNAL_WEIGHTS.to_vec(),
        })
    }
}

/// Per-layer weights, surface layer first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProfileWeights", into = "ProfileWeights")]
pub struct VerticalProfile(ProfileWeights);
profile_newtype!(VerticalProfile, ProfileKind::Vertical);

impl VerticalProfile {
    /// Everything in the surface layer.
    pub fn surface() -> Self {
        Self(ProfileWeights {
            id: "surface".to_string(),
            kind: ProfileKind::Vertical,
            weights: vec![1.0],
        })
    }

    pub fn layers(&self) -> usize {
        self.0.weights.len()
    }

    /// Whether the profile leaves everything in the surface layer.
    pub fn is_surface_only(&self) -> bool {
        let ratios = self.get_ratios();
        ratios.first().is_some_and(|r| *r > 0.0) && ratios.iter().skip(1).all(|r| *r == 0.0)
    }
}

impl Default for VerticalProfile {
    fn default() -> Self {
        Self::surface()
    }
}

/// Month, week and weekday/weekend diurnal profiles for one source category.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TemporalProfiles {
    pub month: MonthProfile,
    pub week: WeekProfile,
    pub diurnal_weekday: DiurnalProfile,
    pub diurnal_weekend: DiurnalProfile,
}

impl TemporalProfiles {
    /// Flat profiles on every dimension.
    pub fn uniform() -> Self {
        Self {
            month: MonthProfile::uniform(),
            week: WeekProfile::uniform(),
            diurnal_weekday: DiurnalProfile::uniform(),
            diurnal_weekend: DiurnalProfile::uniform(),
        }
    }
}
