//! Speciation profiles.
//!
//! A speciation reference file maps a source category to profile ids per
//! pollutant, rows `<code> <profileId> <pollutant>`, optionally followed by a
//! `!` comment glued to the pollutant. A profile file lists the species of
//! each profile, rows
//! `<profileId> <pollutant> <species> <splitFactor> <divisor> <massFraction>`.
//! `VOC` in a reference file stands for total organic gas (`TOG`).

use super::mechanism::ChemicalMechanism;
use crate::errors::{EmipsError, EmipsResult};
use crate::registry::{Pollutant, Species, REGISTRY};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::warn;

/// One species of a pollutant profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciationEntry {
    pub pollutant: String,
    pub species: Species,
    pub split_factor: f64,
    pub divisor: f64,
    pub mass_fraction: f64,
}

impl SpeciationEntry {
    pub fn new(
        pollutant: impl Into<String>,
        species: Species,
        split_factor: f64,
        divisor: f64,
        mass_fraction: f64,
    ) -> Self {
        Self {
            pollutant: pollutant.into(),
            species,
            split_factor,
            divisor,
            mass_fraction,
        }
    }
}

/// Species a pollutant is split into for one source category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollutantProfile {
    pollutant: String,
    entries: Vec<SpeciationEntry>,
}

impl PollutantProfile {
    pub fn new(pollutant: impl Into<String>) -> Self {
        Self {
            pollutant: pollutant.into(),
            entries: Vec::new(),
        }
    }

    pub fn with_entries(pollutant: impl Into<String>, entries: Vec<SpeciationEntry>) -> Self {
        Self {
            pollutant: pollutant.into(),
            entries,
        }
    }

    /// The whole pollutant emitted as one species.
    pub fn pass_through(pollutant: &str, species: Species) -> Self {
        Self::with_entries(
            pollutant,
            vec![SpeciationEntry::new(pollutant, species, 1.0, 1.0, 1.0)],
        )
    }

    /// PM2.5 as fine particulate matter, with empty companions for the
    /// speciated aerosol components.
    pub fn pm25() -> EmipsResult<Self> {
        let entry = |name: &str, fraction: f64| -> EmipsResult<SpeciationEntry> {
            Ok(SpeciationEntry::new(
                "PM2_5",
                REGISTRY.species(name)?,
                fraction,
                1.0,
                fraction,
            ))
        };
        Ok(Self::with_entries(
            "PM2_5",
            vec![
                entry("PEC", 0.0)?,
                entry("PMFINE", 1.0)?,
                entry("PNO3", 0.0)?,
                entry("POA", 0.0)?,
                entry("PSO4", 0.0)?,
            ],
        ))
    }

    /// NOx as 90 % NO and 10 % NO2 by mass.
    pub fn nox() -> EmipsResult<Self> {
        Ok(Self::with_entries(
            "NOx",
            vec![
                SpeciationEntry::new("NOx", REGISTRY.species("NO")?, 0.9, 1.0, 0.9),
                SpeciationEntry::new("NOx", REGISTRY.species("NO2")?, 0.1, 1.0, 0.1),
            ],
        ))
    }

    pub fn pollutant(&self) -> &str {
        &self.pollutant
    }

    pub fn push(&mut self, entry: SpeciationEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[SpeciationEntry] {
        &self.entries
    }

    pub fn species(&self) -> Vec<Species> {
        self.entries.iter().map(|e| e.species.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn mass_fraction_sum(&self) -> f64 {
        self.entries.iter().map(|e| e.mass_fraction).sum()
    }
}

/// Reference row of a speciation table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ProfileKey {
    profile_id: String,
    pollutant: String,
}

/// Pollutant profiles of one source category.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpeciationTable {
    code: String,
    profiles: Vec<PollutantProfile>,
}

fn parse_error(path: &Path, line: usize, reason: impl Into<String>) -> EmipsError {
    EmipsError::ProfileParse {
        path: path.to_path_buf(),
        line,
        reason: reason.into(),
    }
}

fn normalise_pollutant(raw: &str) -> String {
    let name = raw.split('!').next().unwrap_or(raw).trim();
    if name == "VOC" {
        "TOG".to_string()
    } else {
        name.to_string()
    }
}

impl SpeciationTable {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            profiles: Vec::new(),
        }
    }

    pub fn from_files(
        reference: impl AsRef<Path>,
        profiles: impl AsRef<Path>,
        code: &str,
        mechanism: &ChemicalMechanism,
    ) -> EmipsResult<Self> {
        let (reference, profiles) = (reference.as_ref(), profiles.as_ref());
        Self::parse(
            code,
            &std::fs::read_to_string(reference)?,
            reference,
            &std::fs::read_to_string(profiles)?,
            profiles,
            mechanism,
        )
    }

    /// Parse the rows relevant to `code`.
    ///
    /// Species are resolved through `mechanism`, so a profile naming a
    /// species neither the mechanism nor the registry knows is an
    /// `UnregisteredName` error.
    pub fn parse(
        code: &str,
        reference: &str,
        reference_path: &Path,
        profiles: &str,
        profiles_path: &Path,
        mechanism: &ChemicalMechanism,
    ) -> EmipsResult<Self> {
        let mut keys = HashSet::new();
        for (index, raw) in reference.lines().enumerate() {
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let tokens: Vec<&str> = trimmed.split_whitespace().collect();
            if tokens[0] != code {
                continue;
            }
            if tokens.len() < 3 {
                return Err(parse_error(
                    reference_path,
                    index + 1,
                    "expected <code> <profileId> <pollutant>",
                ));
            }
            keys.insert(ProfileKey {
                profile_id: tokens[1].to_string(),
                pollutant: normalise_pollutant(tokens[2]),
            });
        }

        let mut table = Self::new(code);
        for (index, raw) in profiles.lines().enumerate() {
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let tokens: Vec<&str> = trimmed.split_whitespace().collect();
            if tokens.len() < 2 {
                continue;
            }
            let key = ProfileKey {
                profile_id: tokens[0].to_string(),
                pollutant: tokens[1].to_string(),
            };
            if !keys.contains(&key) {
                continue;
            }
            if tokens.len() < 6 {
                return Err(parse_error(
                    profiles_path,
                    index + 1,
                    "expected <profileId> <pollutant> <species> <split> <divisor> <massFraction>",
                ));
            }
            let number = |token: &str| {
                token.parse::<f64>().map_err(|_| {
                    parse_error(profiles_path, index + 1, format!("'{token}' is not a number"))
                })
            };
            let entry = SpeciationEntry::new(
                key.pollutant.clone(),
                mechanism.resolve_species(tokens[2])?,
                number(tokens[3])?,
                number(tokens[4])?,
                number(tokens[5])?,
            );
            table.push(entry);
        }
        Ok(table)
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Append an entry to the profile of its pollutant.
    pub fn push(&mut self, entry: SpeciationEntry) {
        match self
            .profiles
            .iter_mut()
            .find(|p| p.pollutant == entry.pollutant)
        {
            Some(profile) => profile.push(entry),
            None => {
                let mut profile = PollutantProfile::new(entry.pollutant.clone());
                profile.push(entry);
                self.profiles.push(profile);
            }
        }
    }

    pub fn insert(&mut self, profile: PollutantProfile) {
        self.profiles.retain(|p| p.pollutant != profile.pollutant);
        self.profiles.push(profile);
    }

    pub fn profiles(&self) -> &[PollutantProfile] {
        &self.profiles
    }

    /// Profile of `pollutant`.
    ///
    /// # Errors
    ///
    /// `UnknownPollutant` when the table has no profile for it. Pollutant
    /// names compare case-insensitively (`NOX` serves `NOx`).
    pub fn profile(&self, pollutant: &Pollutant) -> EmipsResult<&PollutantProfile> {
        let name = pollutant.speciation_name();
        self.profiles
            .iter()
            .find(|p| p.pollutant.eq_ignore_ascii_case(name))
            .ok_or_else(|| EmipsError::UnknownPollutant {
                pollutant: pollutant.name.clone(),
                code: self.code.clone(),
            })
    }

    /// Profile of `pollutant`, or the documented substitute.
    ///
    /// PM2.5 always uses the built-in fine particulate profile. When the
    /// table has no profile, NOx falls back to the built-in 90/10 split and
    /// other pollutants to their registered one-to-one species. Each
    /// substitution is logged.
    pub fn profile_or_fallback(
        &self,
        pollutant: &Pollutant,
        mechanism: &ChemicalMechanism,
    ) -> EmipsResult<PollutantProfile> {
        if pollutant.name == "PM2_5" {
            return PollutantProfile::pm25();
        }
        let err = match self.profile(pollutant) {
            Ok(profile) => return Ok(profile.clone()),
            Err(err) => err,
        };
        if pollutant.name == "NOx" {
            warn!(pollutant = %pollutant, code = %self.code, "no speciation profile, using built-in NO/NO2 split");
            return PollutantProfile::nox();
        }
        match &pollutant.pass_through {
            Some(species) => {
                warn!(pollutant = %pollutant, code = %self.code, species = %species, "no speciation profile, passing through");
                Ok(PollutantProfile::pass_through(
                    &pollutant.name,
                    mechanism.resolve_species(species)?,
                ))
            }
            None => Err(err),
        }
    }
}
