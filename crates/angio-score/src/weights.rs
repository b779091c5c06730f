//! Weight tables and per-calculator configuration.
//!
//! Each calculator owns an immutable configuration struct whose `Default`
//! carries the canonical values. All of them round-trip through serde so a
//! deployment can override any table from external JSON without code
//! changes. SYNTAX and Gensini keep separate multiplier tables for the same
//! anatomy; the values are intentionally different and never shared.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use angio_model::{LesionSite, Vessel};

/// Site multipliers applied when a weight is inferred from vessel + site
/// (an explicit AHA segment id bypasses them).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SiteFactors {
    pub proximal: f64,
    pub mid: f64,
    pub distal: f64,
}

impl SiteFactors {
    pub fn factor(&self, site: LesionSite) -> f64 {
        match site {
            LesionSite::Proximal => self.proximal,
            LesionSite::Mid => self.mid,
            LesionSite::Distal => self.distal,
        }
    }
}

/// Additive complexity points for SYNTAX.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComplexityPoints {
    pub bifurcation: f64,
    pub ostial: f64,
    pub calcified: f64,
    pub thrombus: f64,
    pub cto: f64,
    pub tortuous: f64,
    pub diffuse: f64,
    /// A lesion longer than this counts as diffuse disease.
    pub diffuse_length_mm: f64,
}

/// SYNTAX weight tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntaxWeights {
    /// Base weight per vessel when no segment id is given.
    pub vessel: BTreeMap<Vessel, f64>,
    /// Weight per AHA segment id (1–16); used verbatim when present.
    pub segment: BTreeMap<u8, f64>,
    pub site: SiteFactors,
    pub complexity: ComplexityPoints,
    /// Fallback for vessels absent from the table.
    pub default_vessel_weight: f64,
}

impl Default for SyntaxWeights {
    fn default() -> Self {
        let vessel = BTreeMap::from([
            (Vessel::Lm, 5.0),
            (Vessel::Lad, 3.5),
            (Vessel::Lcx, 3.5),
            (Vessel::Rca, 3.5),
            (Vessel::Om, 1.0),
            (Vessel::D, 1.0),
            (Vessel::Pda, 1.0),
            (Vessel::Plv, 0.5),
        ]);
        // AHA segments: 1-4 RCA/PDA, 5 LM, 6-10 LAD/diagonals,
        // 11-15 LCX/marginals, 16 PLV.
        let segment = BTreeMap::from([
            (1, 3.5),
            (2, 1.0),
            (3, 1.0),
            (4, 1.0),
            (5, 5.0),
            (6, 3.5),
            (7, 2.5),
            (8, 1.0),
            (9, 1.0),
            (10, 0.5),
            (11, 3.5),
            (12, 1.0),
            (13, 1.0),
            (14, 1.0),
            (15, 0.5),
            (16, 0.5),
        ]);
        Self {
            vessel,
            segment,
            site: SiteFactors {
                proximal: 1.0,
                mid: 0.7,
                distal: 0.4,
            },
            complexity: ComplexityPoints {
                bifurcation: 1.0,
                ostial: 0.5,
                calcified: 2.0,
                thrombus: 1.0,
                cto: 5.0,
                tortuous: 1.0,
                diffuse: 1.0,
                diffuse_length_mm: 20.0,
            },
            default_vessel_weight: 1.0,
        }
    }
}

/// One half-open stenosis band: scores apply to `min < stenosis <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StenosisBand {
    pub min: f64,
    pub max: f64,
    pub points: f64,
}

/// Gensini weight tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GensiniWeights {
    pub vessel: BTreeMap<Vessel, f64>,
    /// Per-segment multipliers (1–16); take precedence over vessel + site.
    pub segment: BTreeMap<u8, f64>,
    pub site: SiteFactors,
    /// Half-open severity bands; exactly 0% falls outside all of them.
    pub stenosis_bands: Vec<StenosisBand>,
    pub default_vessel_weight: f64,
}

impl Default for GensiniWeights {
    fn default() -> Self {
        let vessel = BTreeMap::from([
            (Vessel::Lm, 5.0),
            (Vessel::Lad, 2.5),
            (Vessel::Lcx, 2.5),
            (Vessel::Rca, 1.0),
            (Vessel::Om, 1.0),
            (Vessel::D, 1.0),
            (Vessel::Pda, 1.0),
            (Vessel::Plv, 0.5),
        ]);
        let segment = BTreeMap::from([
            (1, 1.0),
            (2, 1.0),
            (3, 1.0),
            (4, 1.0),
            (5, 5.0),
            (6, 2.5),
            (7, 1.5),
            (8, 1.0),
            (9, 1.0),
            (10, 0.5),
            (11, 2.5),
            (12, 1.0),
            (13, 1.0),
            (14, 1.0),
            (15, 0.5),
            (16, 0.5),
        ]);
        Self {
            vessel,
            segment,
            site: SiteFactors {
                proximal: 1.0,
                mid: 0.8,
                distal: 0.5,
            },
            stenosis_bands: vec![
                StenosisBand { min: 0.0, max: 25.0, points: 1.0 },
                StenosisBand { min: 25.0, max: 50.0, points: 2.0 },
                StenosisBand { min: 50.0, max: 75.0, points: 4.0 },
                StenosisBand { min: 75.0, max: 90.0, points: 8.0 },
                StenosisBand { min: 90.0, max: 99.0, points: 16.0 },
                StenosisBand { min: 99.0, max: 100.0, points: 32.0 },
            ],
            default_vessel_weight: 1.0,
        }
    }
}

/// Static report texts for one CAD-RADS grade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeTexts {
    pub recommendation: String,
    pub follow_up: String,
    pub clinical_significance: String,
    pub image_quality: String,
}

/// CAD-RADS configuration: vessel importance and per-grade report texts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CadRadsConfig {
    /// Importance weights for dominant-vessel selection.
    pub importance: BTreeMap<Vessel, f64>,
    /// Report texts keyed by overall grade 0–5.
    pub grade_texts: BTreeMap<u8, GradeTexts>,
    pub default_importance: f64,
}

impl Default for CadRadsConfig {
    fn default() -> Self {
        let importance = BTreeMap::from([
            (Vessel::Lm, 5.0),
            (Vessel::Lad, 4.0),
            (Vessel::Lcx, 3.0),
            (Vessel::Rca, 3.0),
            (Vessel::Om, 2.0),
            (Vessel::D, 2.0),
            (Vessel::Pda, 2.0),
            (Vessel::Plv, 1.0),
        ]);

        let texts = |rec: &str, fu: &str, sig: &str, iq: &str| GradeTexts {
            recommendation: rec.to_string(),
            follow_up: fu.to_string(),
            clinical_significance: sig.to_string(),
            image_quality: iq.to_string(),
        };

        let grade_texts = BTreeMap::from([
            (
                0,
                texts(
                    "No coronary artery disease; no specific management needed",
                    "Repeat coronary CTA in 5-10 years if risk factors persist",
                    "No atherosclerosis; very low cardiovascular event risk",
                    "Standard acquisition quality is sufficient",
                ),
            ),
            (
                1,
                texts(
                    "Minimal disease; lifestyle intervention and risk-factor control",
                    "Repeat coronary CTA in 3-5 years",
                    "Minimal atherosclerosis; control risk factors to prevent progression",
                    "Standard acquisition quality is sufficient",
                ),
            ),
            (
                2,
                texts(
                    "Mild disease; medical therapy and risk-factor control",
                    "Repeat coronary CTA in 2-3 years or as symptoms dictate",
                    "Mild stenosis; ischemia unlikely but medical therapy indicated",
                    "Standard acquisition quality is sufficient",
                ),
            ),
            (
                3,
                texts(
                    "Moderate stenosis; consider functional testing for ischemia",
                    "Re-evaluate in 1-2 years or per functional test results",
                    "Moderate stenosis; may cause ischemia, functional assessment advised",
                    "High-quality acquisition advised; consider invasive angiography to confirm",
                ),
            ),
            (
                4,
                texts(
                    "Severe stenosis; invasive angiography and revascularization work-up",
                    "Follow revascularization guidelines after treatment",
                    "Severe stenosis; ischemia likely, revascularization usually required",
                    "High-quality acquisition advised; consider invasive angiography to confirm",
                ),
            ),
            (
                5,
                texts(
                    "Total occlusion; invasive angiography and revascularization work-up",
                    "Follow revascularization guidelines after treatment",
                    "Total occlusion; revascularization indicated when viable myocardium remains",
                    "High-quality acquisition advised; consider invasive angiography to confirm",
                ),
            ),
        ]);

        Self {
            importance,
            grade_texts,
            default_importance: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_and_gensini_tables_are_not_shared() {
        let syntax = SyntaxWeights::default();
        let gensini = GensiniWeights::default();
        // LAD proximal: SYNTAX 3.5 vs Gensini 2.5.
        assert_eq!(syntax.vessel[&Vessel::Lad], 3.5);
        assert_eq!(gensini.vessel[&Vessel::Lad], 2.5);
        assert_eq!(syntax.segment[&6], 3.5);
        assert_eq!(gensini.segment[&6], 2.5);
    }

    #[test]
    fn default_tables_cover_all_vessels_and_segments() {
        let syntax = SyntaxWeights::default();
        let gensini = GensiniWeights::default();
        let cadrads = CadRadsConfig::default();
        for vessel in Vessel::ALL {
            assert!(syntax.vessel.contains_key(&vessel));
            assert!(gensini.vessel.contains_key(&vessel));
            assert!(cadrads.importance.contains_key(&vessel));
        }
        for segment in 1..=16u8 {
            assert!(syntax.segment.contains_key(&segment));
            assert!(gensini.segment.contains_key(&segment));
        }
        for grade in 0..=5u8 {
            assert!(cadrads.grade_texts.contains_key(&grade));
        }
    }

    #[test]
    fn weights_round_trip_through_json() {
        let weights = SyntaxWeights::default();
        let json = serde_json::to_string(&weights).expect("serialize weights");
        let round: SyntaxWeights = serde_json::from_str(&json).expect("deserialize weights");
        assert_eq!(round, weights);
    }

    #[test]
    fn partial_json_override_keeps_defaults() {
        // An external config may override just one table.
        let json = r#"{"site": {"proximal": 1.0, "mid": 0.6, "distal": 0.3}}"#;
        let weights: SyntaxWeights = serde_json::from_str(json).expect("partial override");
        assert_eq!(weights.site.mid, 0.6);
        assert_eq!(weights.vessel[&Vessel::Lm], 5.0);
    }
}
