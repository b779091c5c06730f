//! Type-safe enumerations for the canonical angiography model.
//!
//! Input data spells these concepts dozens of ways (English abbreviations,
//! Chinese clinical terms, numeric codes); the free-text resolution lives in
//! the normalization crate. Here `FromStr` accepts only the canonical codes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical coronary vessel, ordered by anatomical importance.
///
/// The declaration order (LM first) is load-bearing: deterministic tie-breaks
/// across the scoring engine resolve toward the more important vessel.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Vessel {
    /// Left main.
    Lm,
    /// Left anterior descending.
    Lad,
    /// Left circumflex.
    Lcx,
    /// Right coronary artery.
    Rca,
    /// Obtuse marginal branch.
    Om,
    /// Diagonal branch.
    D,
    /// Posterior descending artery.
    Pda,
    /// Posterior left ventricular branch.
    Plv,
}

impl Vessel {
    pub const ALL: [Vessel; 8] = [
        Vessel::Lm,
        Vessel::Lad,
        Vessel::Lcx,
        Vessel::Rca,
        Vessel::Om,
        Vessel::D,
        Vessel::Pda,
        Vessel::Plv,
    ];

    /// Returns the canonical short code as used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Vessel::Lm => "LM",
            Vessel::Lad => "LAD",
            Vessel::Lcx => "LCX",
            Vessel::Rca => "RCA",
            Vessel::Om => "OM",
            Vessel::D => "D",
            Vessel::Pda => "PDA",
            Vessel::Plv => "PLV",
        }
    }
}

impl fmt::Display for Vessel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Vessel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "LM" => Ok(Vessel::Lm),
            "LAD" => Ok(Vessel::Lad),
            "LCX" => Ok(Vessel::Lcx),
            "RCA" => Ok(Vessel::Rca),
            "OM" => Ok(Vessel::Om),
            "D" => Ok(Vessel::D),
            "PDA" => Ok(Vessel::Pda),
            "PLV" => Ok(Vessel::Plv),
            _ => Err(format!("Unknown vessel code: {s}")),
        }
    }
}

/// Position of a lesion along its vessel.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LesionSite {
    Proximal,
    Mid,
    Distal,
}

impl LesionSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            LesionSite::Proximal => "proximal",
            LesionSite::Mid => "mid",
            LesionSite::Distal => "distal",
        }
    }
}

impl fmt::Display for LesionSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LesionSite {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "proximal" => Ok(LesionSite::Proximal),
            "mid" | "middle" => Ok(LesionSite::Mid),
            "distal" => Ok(LesionSite::Distal),
            _ => Err(format!("Unknown lesion site: {s}")),
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            _ => Err(format!("Unknown gender: {s}")),
        }
    }
}
