//! Score records produced by the calculators.
//!
//! One record per patient per calculator. Each carries the per-lesion
//! contribution breakdown so a reviewer can audit how the total was reached.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::enums::Vessel;

/// SYNTAX risk stratum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyntaxRisk {
    Low,
    Intermediate,
    High,
}

impl SyntaxRisk {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyntaxRisk::Low => "Low",
            SyntaxRisk::Intermediate => "Intermediate",
            SyntaxRisk::High => "High",
        }
    }
}

impl fmt::Display for SyntaxRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Gensini severity grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GensiniSeverity {
    Normal,
    Mild,
    Moderate,
    Severe,
    Critical,
}

impl GensiniSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            GensiniSeverity::Normal => "Normal",
            GensiniSeverity::Mild => "Mild",
            GensiniSeverity::Moderate => "Moderate",
            GensiniSeverity::Severe => "Severe",
            GensiniSeverity::Critical => "Critical",
        }
    }
}

impl fmt::Display for GensiniSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Patient-level risk assessment (CAD-RADS).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Intermediate,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Intermediate => "Intermediate",
            RiskLevel::High => "High",
        }
    }

    /// The next level up; saturates at `High`.
    pub fn escalated(self) -> RiskLevel {
        match self {
            RiskLevel::Low => RiskLevel::Intermediate,
            RiskLevel::Intermediate | RiskLevel::High => RiskLevel::High,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Contribution of a single lesion to a calculator total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LesionContribution {
    pub vessel: Vessel,
    pub stenosis_percent: f64,
    pub base_score: f64,
    pub complexity_score: f64,
    pub contribution: f64,
}

/// SYNTAX score record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntaxScore {
    /// Anatomical total over lesions with stenosis >= 50%.
    pub total: f64,
    /// Additive clinical modifier used by SYNTAX II.
    pub clinical_score: f64,
    /// `total * (1 + clinical_score / 100)`.
    pub syntax_ii: f64,
    pub risk: SyntaxRisk,
    pub lesion_details: Vec<LesionContribution>,
}

/// Contribution of a single lesion to the Gensini total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GensiniLesionDetail {
    pub vessel: Vessel,
    pub stenosis_percent: f64,
    /// Severity points from the half-open stenosis band table.
    pub stenosis_points: f64,
    /// Anatomical multiplier (segment table or vessel x site).
    pub vessel_weight: f64,
    pub contribution: f64,
}

/// Gensini score record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GensiniScore {
    pub total: f64,
    pub vessel_totals: BTreeMap<Vessel, f64>,
    pub severity: GensiniSeverity,
    pub lesion_details: Vec<GensiniLesionDetail>,
}

/// Per-lesion CAD-RADS grading detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LesionGrade {
    pub vessel: Vessel,
    pub stenosis_percent: f64,
    pub grade: u8,
}

/// CAD-RADS score record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CadRadsScore {
    /// Overall 0–5 grade: the maximum per-vessel grade.
    pub grade: u8,
    pub max_stenosis: f64,
    pub vessel_grades: BTreeMap<Vessel, u8>,
    pub dominant_vessel: Option<Vessel>,
    pub risk: RiskLevel,
    pub recommendation: String,
    pub follow_up: String,
    pub clinical_significance: String,
    pub image_quality: String,
    pub lesion_grades: Vec<LesionGrade>,
}
