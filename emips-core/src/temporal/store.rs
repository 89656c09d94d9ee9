//! Temporal and vertical profile tables keyed by source category.
//!
//! Two temporal layouts are understood:
//!
//! * a reference file with rows `<code> <monthId> <weekId> <diurnalId>` plus
//!   a fixed-width profile file with `/MONTHLY/`, `/WEEKLY/`,
//!   `/DIURNAL WEEKDAY/` and `/DIURNAL WEEKEND/` blocks, each row a 5 column
//!   id followed by 4 column weights;
//! * a whitespace-delimited profile file keyed directly by source category
//!   with `/MONTHLY/`, `/WEEKLY/` and `/HOURLY/` blocks.
//!
//! Blocks end with `/END/`. Vertical profiles use a `/HEIGHT/` block in the
//! delimited layout.

use super::profiles::{
    DiurnalProfile, MonthProfile, ProfileKind, ProfileWeights, TemporalProfiles, VerticalProfile,
    WeekProfile, DEFAULT_DIURNAL_ID, DEFAULT_MONTH_ID, DEFAULT_WEEK_ID,
};
use crate::errors::{EmipsError, EmipsResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// What to do when a source category has no temporal profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemporalFallback {
    /// Flat weights on the missing dimension.
    #[default]
    Uniform,
    /// The inventory defaults (month 462, week 8, diurnal 33).
    BuiltIn,
    /// Fail with `ProfileNotFound`.
    Fail,
}

/// Local time zone of a diurnal curve, used to rotate it to UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeZoneShift {
    pub hours: usize,
    pub east: bool,
}

/// Profile ids referenced by one source category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporalReference {
    pub month_id: String,
    pub week_id: String,
    pub diurnal_id: String,
}

impl Default for TemporalReference {
    fn default() -> Self {
        Self {
            month_id: DEFAULT_MONTH_ID.to_string(),
            week_id: DEFAULT_WEEK_ID.to_string(),
            diurnal_id: DEFAULT_DIURNAL_ID.to_string(),
        }
    }
}

/// Parsed temporal profiles, read-only once loaded.
#[derive(Debug, Clone, Default)]
pub struct ProfileStore {
    references: HashMap<String, TemporalReference>,
    monthly: HashMap<String, MonthProfile>,
    weekly: HashMap<String, WeekProfile>,
    diurnal_weekday: HashMap<String, DiurnalProfile>,
    diurnal_weekend: HashMap<String, DiurnalProfile>,
}

#[derive(Clone, Copy, PartialEq)]
enum Block {
    Monthly,
    Weekly,
    DiurnalWeekday,
    DiurnalWeekend,
    Height,
}

impl Block {
    fn from_header(line: &str) -> Option<Self> {
        match line {
            "/MONTHLY/" => Some(Block::Monthly),
            "/WEEKLY/" => Some(Block::Weekly),
            "/DIURNAL WEEKDAY/" | "/HOURLY/" => Some(Block::DiurnalWeekday),
            "/DIURNAL WEEKEND/" => Some(Block::DiurnalWeekend),
            "/HEIGHT/" => Some(Block::Height),
            _ => None,
        }
    }

    fn kind(&self) -> ProfileKind {
        match self {
            Block::Monthly => ProfileKind::Monthly,
            Block::Weekly => ProfileKind::Weekly,
            Block::DiurnalWeekday | Block::DiurnalWeekend => ProfileKind::Diurnal,
            Block::Height => ProfileKind::Vertical,
        }
    }
}

/// Walk block-delimited content, calling `row` for every line inside a block.
fn for_each_block_row(
    content: &str,
    path: &Path,
    mut row: impl FnMut(Block, &str, usize) -> EmipsResult<()>,
) -> EmipsResult<()> {
    let mut current: Option<Block> = None;
    for (index, raw) in content.lines().enumerate() {
        let line_no = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if trimmed == "/END/" {
            current = None;
            continue;
        }
        if let Some(block) = Block::from_header(trimmed) {
            if current.is_some() {
                return Err(parse_error(path, line_no, "block opened before /END/"));
            }
            current = Some(block);
            continue;
        }
        if let Some(block) = current {
            row(block, raw, line_no)?;
        }
    }
    if current.is_some() {
        return Err(parse_error(path, content.lines().count(), "missing /END/"));
    }
    Ok(())
}

fn parse_error(path: &Path, line: usize, reason: impl Into<String>) -> EmipsError {
    EmipsError::ProfileParse {
        path: path.to_path_buf(),
        line,
        reason: reason.into(),
    }
}

fn parse_weight(token: &str, path: &Path, line: usize) -> EmipsResult<f64> {
    token
        .trim()
        .parse::<f64>()
        .map_err(|_| parse_error(path, line, format!("'{}' is not a number", token.trim())))
}

/// Split a fixed-width row into its 5 column id and `n` 4 column weights.
fn fixed_width_row(raw: &str, n: usize, path: &Path, line: usize) -> EmipsResult<(String, Vec<f64>)> {
    let chars: Vec<char> = raw.trim_end().chars().collect();
    if chars.len() < 5 + 4 * n {
        return Err(parse_error(
            path,
            line,
            format!("expected an id and {n} weights of 4 columns"),
        ));
    }
    let id: String = chars[..5].iter().collect::<String>().trim().to_string();
    let weights = chars[5..5 + 4 * n]
        .chunks(4)
        .map(|chunk| parse_weight(&chunk.iter().collect::<String>(), path, line))
        .collect::<EmipsResult<Vec<f64>>>()?;
    Ok((id, weights))
}

/// Split a delimited row into its key and at least `n` weights.
fn delimited_row(
    raw: &str,
    n: Option<usize>,
    path: &Path,
    line: usize,
) -> EmipsResult<(String, Vec<f64>)> {
    let mut tokens = raw.split_whitespace();
    let key = tokens
        .next()
        .ok_or_else(|| parse_error(path, line, "empty row"))?
        .to_string();
    let mut weights = tokens
        .map(|t| parse_weight(t, path, line))
        .collect::<EmipsResult<Vec<f64>>>()?;
    if let Some(n) = n {
        if weights.len() < n {
            return Err(parse_error(
                path,
                line,
                format!("expected {n} weights, found {}", weights.len()),
            ));
        }
        weights.truncate(n);
    }
    Ok((key, weights))
}

fn profile_error(path: &Path, line: usize, err: EmipsError) -> EmipsError {
    parse_error(path, line, err.to_string())
}

fn read_to_string(path: &Path) -> EmipsResult<String> {
    Ok(std::fs::read_to_string(path)?)
}

impl ProfileStore {
    /// Load a reference file and a fixed-width profile file.
    pub fn from_files(reference: impl AsRef<Path>, profiles: impl AsRef<Path>) -> EmipsResult<Self> {
        let (reference, profiles) = (reference.as_ref(), profiles.as_ref());
        let mut store = Self::default();
        store.parse_reference(&read_to_string(reference)?, reference)?;
        store.parse_fixed_width(&read_to_string(profiles)?, profiles)?;
        Ok(store)
    }

    /// Load a delimited profile file keyed by source category.
    pub fn from_delimited_file(
        profiles: impl AsRef<Path>,
        shift: Option<TimeZoneShift>,
    ) -> EmipsResult<Self> {
        let path = profiles.as_ref();
        let mut store = Self::default();
        store.parse_delimited(&read_to_string(path)?, path, shift)?;
        Ok(store)
    }

    /// Parse reference rows. The first row for a code wins.
    pub fn parse_reference(&mut self, content: &str, path: &Path) -> EmipsResult<()> {
        for (index, raw) in content.lines().enumerate() {
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let tokens: Vec<&str> = trimmed.split_whitespace().collect();
            if tokens.len() < 4 {
                return Err(parse_error(
                    path,
                    index + 1,
                    "expected <code> <monthId> <weekId> <diurnalId>",
                ));
            }
            self.references
                .entry(tokens[0].to_string())
                .or_insert_with(|| TemporalReference {
                    month_id: tokens[1].to_string(),
                    week_id: tokens[2].to_string(),
                    diurnal_id: tokens[3].to_string(),
                });
        }
        Ok(())
    }

    /// Parse fixed-width profile blocks. The first row for an id wins.
    pub fn parse_fixed_width(&mut self, content: &str, path: &Path) -> EmipsResult<()> {
        for_each_block_row(content, path, |block, raw, line| {
            let n = block.kind().expected_len().unwrap_or(0);
            if n == 0 {
                return Ok(());
            }
            let (id, weights) = fixed_width_row(raw, n, path, line)?;
            self.insert(block, id, weights)
                .map_err(|err| profile_error(path, line, err))
        })
    }

    /// Parse delimited profile blocks keyed by source category.
    ///
    /// Every code found becomes its own reference, and its hourly curve is
    /// used for both weekdays and weekends.
    pub fn parse_delimited(
        &mut self,
        content: &str,
        path: &Path,
        shift: Option<TimeZoneShift>,
    ) -> EmipsResult<()> {
        for_each_block_row(content, path, |block, raw, line| {
            if block == Block::Height {
                return Ok(());
            }
            let (code, weights) = delimited_row(raw, block.kind().expected_len(), path, line)?;
            self.references
                .entry(code.clone())
                .or_insert_with(|| TemporalReference {
                    month_id: code.clone(),
                    week_id: code.clone(),
                    diurnal_id: code.clone(),
                });
            if block != Block::DiurnalWeekday {
                return self
                    .insert(block, code, weights)
                    .map_err(|err| profile_error(path, line, err));
            }
            let mut profile = DiurnalProfile::new(code.clone(), weights)
                .map_err(|err| profile_error(path, line, err))?;
            if let Some(shift) = shift {
                profile = profile.shifted(shift.hours, shift.east);
            }
            self.diurnal_weekday
                .entry(code.clone())
                .or_insert_with(|| profile.clone());
            self.diurnal_weekend.entry(code).or_insert(profile);
            Ok(())
        })
    }

    fn insert(&mut self, block: Block, id: String, weights: Vec<f64>) -> EmipsResult<()> {
        let profile = ProfileWeights::new(block.kind(), id.clone(), weights)?;
        match block {
            Block::Monthly => {
                self.monthly.entry(id).or_insert(profile.try_into()?);
            }
            Block::Weekly => {
                self.weekly.entry(id).or_insert(profile.try_into()?);
            }
            Block::DiurnalWeekday => {
                self.diurnal_weekday.entry(id).or_insert(profile.try_into()?);
            }
            Block::DiurnalWeekend => {
                self.diurnal_weekend.entry(id).or_insert(profile.try_into()?);
            }
            Block::Height => {}
        }
        Ok(())
    }

    pub fn reference(&self, code: &str) -> Option<&TemporalReference> {
        self.references.get(code)
    }

    pub fn month(&self, id: &str) -> Option<&MonthProfile> {
        self.monthly.get(id)
    }

    pub fn week(&self, id: &str) -> Option<&WeekProfile> {
        self.weekly.get(id)
    }

    pub fn diurnal_weekday(&self, id: &str) -> Option<&DiurnalProfile> {
        self.diurnal_weekday.get(id)
    }

    pub fn diurnal_weekend(&self, id: &str) -> Option<&DiurnalProfile> {
        self.diurnal_weekend.get(id)
    }

    /// Profiles for a source category, applying `fallback` to every gap.
    ///
    /// # Errors
    ///
    /// `ProfileNotFound` when a reference or profile row is missing and
    /// `fallback` is [`TemporalFallback::Fail`].
    pub fn resolve(&self, code: &str, fallback: TemporalFallback) -> EmipsResult<TemporalProfiles> {
        let reference = match self.references.get(code) {
            Some(reference) => reference.clone(),
            None => {
                warn!(code = %code, fallback = ?fallback, "no temporal reference row, using fallback");
                match fallback {
                    TemporalFallback::Fail => {
                        return Err(EmipsError::ProfileNotFound {
                            kind: "temporal reference".to_string(),
                            code: code.to_string(),
                        })
                    }
                    TemporalFallback::Uniform => return Ok(TemporalProfiles::uniform()),
                    TemporalFallback::BuiltIn => TemporalReference::default(),
                }
            }
        };

        let month = match self.monthly.get(&reference.month_id) {
            Some(p) => p.clone(),
            None => missing(code, ProfileKind::Monthly, &reference.month_id, fallback)
                .map(|f| pick(f, MonthProfile::uniform, MonthProfile::default))?,
        };
        let week = match self.weekly.get(&reference.week_id) {
            Some(p) => p.clone(),
            None => missing(code, ProfileKind::Weekly, &reference.week_id, fallback)
                .map(|f| pick(f, WeekProfile::uniform, WeekProfile::default))?,
        };
        let diurnal_weekday = match self.diurnal_weekday.get(&reference.diurnal_id) {
            Some(p) => p.clone(),
            None => missing(code, ProfileKind::Diurnal, &reference.diurnal_id, fallback)
                .map(|f| pick(f, DiurnalProfile::uniform, DiurnalProfile::default))?,
        };
        let diurnal_weekend = match self.diurnal_weekend.get(&reference.diurnal_id) {
            Some(p) => p.clone(),
            None => {
                debug!(code = %code, "no weekend diurnal curve, reusing the weekday curve");
                diurnal_weekday.clone()
            }
        };

        Ok(TemporalProfiles {
            month,
            week,
            diurnal_weekday,
            diurnal_weekend,
        })
    }
}

fn missing(
    code: &str,
    kind: ProfileKind,
    id: &str,
    fallback: TemporalFallback,
) -> EmipsResult<TemporalFallback> {
    warn!(code = %code, kind = %kind, id = %id, fallback = ?fallback, "profile id not found, using fallback");
    if fallback == TemporalFallback::Fail {
        return Err(EmipsError::ProfileNotFound {
            kind: kind.to_string(),
            code: code.to_string(),
        });
    }
    Ok(fallback)
}

fn pick<T>(fallback: TemporalFallback, uniform: fn() -> T, built_in: fn() -> T) -> T {
    match fallback {
        TemporalFallback::BuiltIn => built_in(),
        _ => uniform(),
    }
}

/// Vertical profiles keyed by source category.
#[derive(Debug, Clone, Default)]
pub struct VerticalProfileStore {
    profiles: HashMap<String, VerticalProfile>,
}

impl VerticalProfileStore {
    pub fn from_file(path: impl AsRef<Path>) -> EmipsResult<Self> {
        let path = path.as_ref();
        Self::parse(&read_to_string(path)?, path)
    }

    /// Parse `/HEIGHT/` rows `<code> <w0> <w1> ...`, surface layer first.
    pub fn parse(content: &str, path: &Path) -> EmipsResult<Self> {
        let mut profiles = HashMap::new();
        for_each_block_row(content, path, |block, raw, line| {
            if block != Block::Height {
                return Ok(());
            }
            let (code, weights) = delimited_row(raw, None, path, line)?;
            let profile = VerticalProfile::new(code.clone(), weights)
                .map_err(|err| profile_error(path, line, err))?;
            profiles.entry(code).or_insert(profile);
            Ok(())
        })?;
        Ok(Self { profiles })
    }

    pub fn insert(&mut self, code: impl Into<String>, profile: VerticalProfile) {
        self.profiles.insert(code.into(), profile);
    }

    /// Profile for `code`, or everything in the surface layer.
    pub fn get(&self, code: &str) -> VerticalProfile {
        match self.profiles.get(code) {
            Some(profile) => profile.clone(),
            None => {
                debug!(code = %code, "no vertical profile, keeping emissions at the surface");
                VerticalProfile::surface()
            }
        }
    }
}

/// Placeholder path for content parsed from memory.
pub fn inline_source() -> PathBuf {
    PathBuf::from("<inline>")
}
