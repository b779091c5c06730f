//! CAD-RADS 0–5 grading.
//!
//! The grade tracks the single worst stenosis: each lesion is bucketed, each
//! vessel takes its worst lesion, and the overall grade is the worst vessel.
//! Report texts are static per-grade configuration, and the risk level
//! combines the grade-derived baseline with clinical risk factors.

use std::collections::BTreeMap;

use angio_model::{CadRadsScore, Gender, LesionGrade, Patient, RiskLevel, Vessel};

use crate::weights::CadRadsConfig;

#[derive(Debug, Clone, Default)]
pub struct CadRadsCalculator {
    config: CadRadsConfig,
}

impl CadRadsCalculator {
    pub fn new(config: CadRadsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CadRadsConfig {
        &self.config
    }

    pub fn score(&self, patient: &Patient) -> CadRadsScore {
        let mut vessel_grades: BTreeMap<Vessel, u8> = BTreeMap::new();
        let mut lesion_grades = Vec::new();
        let mut max_stenosis = 0.0f64;

        for lesion in &patient.lesions {
            let grade = stenosis_grade(lesion.stenosis_percent);
            max_stenosis = max_stenosis.max(lesion.stenosis_percent);
            lesion_grades.push(LesionGrade {
                vessel: lesion.vessel,
                stenosis_percent: lesion.stenosis_percent,
                grade,
            });
            vessel_grades
                .entry(lesion.vessel)
                .and_modify(|g| *g = (*g).max(grade))
                .or_insert(grade);
        }

        let grade = vessel_grades.values().copied().max().unwrap_or(0);
        let texts = self.config.grade_texts.get(&grade);

        CadRadsScore {
            grade,
            max_stenosis,
            dominant_vessel: self.dominant_vessel(patient),
            risk: self.risk_level(grade, patient),
            recommendation: texts.map(|t| t.recommendation.clone()).unwrap_or_default(),
            follow_up: texts.map(|t| t.follow_up.clone()).unwrap_or_default(),
            clinical_significance: texts
                .map(|t| t.clinical_significance.clone())
                .unwrap_or_default(),
            image_quality: texts.map(|t| t.image_quality.clone()).unwrap_or_default(),
            vessel_grades,
            lesion_grades,
        }
    }

    /// Vessel maximizing the importance-weighted stenosis burden.
    ///
    /// Iteration follows the anatomical `Vessel` order and replacement is
    /// strict, so a tied burden resolves to the more important vessel.
    fn dominant_vessel(&self, patient: &Patient) -> Option<Vessel> {
        if patient.lesions.is_empty() {
            return None;
        }

        let mut burdens: BTreeMap<Vessel, f64> = BTreeMap::new();
        for lesion in &patient.lesions {
            let importance = self
                .config
                .importance
                .get(&lesion.vessel)
                .copied()
                .unwrap_or(self.config.default_importance);
            *burdens.entry(lesion.vessel).or_default() +=
                lesion.stenosis_percent / 100.0 * importance;
        }

        let mut dominant: Option<(Vessel, f64)> = None;
        for vessel in Vessel::ALL {
            if let Some(burden) = burdens.get(&vessel)
                && dominant.is_none_or(|(_, best)| *burden > best)
            {
                dominant = Some((vessel, *burden));
            }
        }
        dominant.map(|(vessel, _)| vessel)
    }

    /// Baseline from the grade, escalated by clinical risk-factor count.
    fn risk_level(&self, grade: u8, patient: &Patient) -> RiskLevel {
        let baseline = if grade >= 4 {
            RiskLevel::High
        } else if grade == 3 {
            RiskLevel::Intermediate
        } else {
            RiskLevel::Low
        };

        let mut factors = 0;
        if patient.diabetes {
            factors += 1;
        }
        if patient.hypertension {
            factors += 1;
        }
        if patient.age >= 65 {
            factors += 1;
        }
        if patient.gender == Gender::Male {
            factors += 1;
        }

        if factors >= 3 && baseline == RiskLevel::Low {
            baseline.escalated()
        } else if factors >= 2 && baseline == RiskLevel::Intermediate {
            baseline.escalated()
        } else {
            baseline
        }
    }
}

/// Bucket a stenosis percentage into a 0–5 grade.
///
/// Monotonic step function with breakpoints at 0, 25, 50, 70 and 100.
pub fn stenosis_grade(stenosis_percent: f64) -> u8 {
    if stenosis_percent <= 0.0 {
        0
    } else if stenosis_percent <= 24.0 {
        1
    } else if stenosis_percent <= 49.0 {
        2
    } else if stenosis_percent <= 69.0 {
        3
    } else if stenosis_percent <= 99.0 {
        4
    } else {
        5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use angio_model::{Lesion, LesionSite};

    fn patient_with(lesions: Vec<Lesion>) -> Patient {
        let mut patient = Patient::new("P001", 50, Gender::Female).unwrap();
        for lesion in lesions {
            patient.push_lesion(lesion);
        }
        patient
    }

    fn lesion(vessel: Vessel, stenosis: f64) -> Lesion {
        Lesion::new(vessel, LesionSite::Proximal, stenosis).unwrap()
    }

    #[test]
    fn grade_breakpoints() {
        assert_eq!(stenosis_grade(0.0), 0);
        assert_eq!(stenosis_grade(1.0), 1);
        assert_eq!(stenosis_grade(24.0), 1);
        assert_eq!(stenosis_grade(25.0), 2);
        assert_eq!(stenosis_grade(49.0), 2);
        assert_eq!(stenosis_grade(50.0), 3);
        assert_eq!(stenosis_grade(69.0), 3);
        assert_eq!(stenosis_grade(70.0), 4);
        assert_eq!(stenosis_grade(99.0), 4);
        assert_eq!(stenosis_grade(100.0), 5);
    }

    #[test]
    fn grade_is_monotonic() {
        let mut previous = 0;
        for tenth in 0..=1000 {
            let grade = stenosis_grade(f64::from(tenth) / 10.0);
            assert!(grade >= previous, "grade dropped at {tenth}");
            previous = grade;
        }
    }

    #[test]
    fn overall_grade_is_worst_vessel() {
        let calculator = CadRadsCalculator::default();
        let score = calculator.score(&patient_with(vec![
            lesion(Vessel::Lad, 30.0),
            lesion(Vessel::Lad, 65.0),
            lesion(Vessel::Rca, 100.0),
        ]));
        assert_eq!(score.vessel_grades[&Vessel::Lad], 3);
        assert_eq!(score.vessel_grades[&Vessel::Rca], 5);
        assert_eq!(score.grade, 5);
        assert_eq!(score.max_stenosis, 100.0);
    }

    #[test]
    fn no_lesions_grade_zero() {
        let calculator = CadRadsCalculator::default();
        let score = calculator.score(&patient_with(vec![]));
        assert_eq!(score.grade, 0);
        assert_eq!(score.dominant_vessel, None);
        assert!(!score.recommendation.is_empty());
    }

    #[test]
    fn dominant_vessel_weighs_importance() {
        let calculator = CadRadsCalculator::default();
        // RCA has the worse stenosis but LAD's importance (4 vs 3) carries
        // more burden: 0.9 x 3 = 2.7 < 0.8 x 4 = 3.2.
        let score = calculator.score(&patient_with(vec![
            lesion(Vessel::Rca, 90.0),
            lesion(Vessel::Lad, 80.0),
        ]));
        assert_eq!(score.dominant_vessel, Some(Vessel::Lad));
    }

    #[test]
    fn dominant_vessel_tie_goes_to_more_important() {
        let calculator = CadRadsCalculator::default();
        // LCX and RCA share importance 3 and identical stenosis; LCX wins by
        // anatomical order.
        let score = calculator.score(&patient_with(vec![
            lesion(Vessel::Rca, 70.0),
            lesion(Vessel::Lcx, 70.0),
        ]));
        assert_eq!(score.dominant_vessel, Some(Vessel::Lcx));
    }

    #[test]
    fn risk_escalates_with_factor_count() {
        let calculator = CadRadsCalculator::default();

        // Grade 2 baseline low; 3 factors escalate to intermediate.
        let mut patient = Patient::new("P010", 70, Gender::Male).unwrap();
        patient.diabetes = true;
        patient.push_lesion(lesion(Vessel::Lad, 40.0));
        assert_eq!(calculator.score(&patient).risk, RiskLevel::Intermediate);

        // Grade 3 baseline intermediate; 2 factors escalate to high.
        let mut patient = Patient::new("P011", 70, Gender::Male).unwrap();
        patient.push_lesion(lesion(Vessel::Lad, 60.0));
        assert_eq!(calculator.score(&patient).risk, RiskLevel::High);

        // Grade 2, no factors: stays low.
        let mut patient = Patient::new("P012", 40, Gender::Female).unwrap();
        patient.push_lesion(lesion(Vessel::Lad, 40.0));
        assert_eq!(calculator.score(&patient).risk, RiskLevel::Low);
    }

    #[test]
    fn grade_four_is_high_risk_regardless_of_factors() {
        let calculator = CadRadsCalculator::default();
        let mut patient = Patient::new("P013", 40, Gender::Female).unwrap();
        patient.push_lesion(lesion(Vessel::Lad, 75.0));
        assert_eq!(calculator.score(&patient).risk, RiskLevel::High);
    }

    #[test]
    fn report_texts_track_grade() {
        let calculator = CadRadsCalculator::default();
        let score = calculator.score(&patient_with(vec![lesion(Vessel::Lm, 100.0)]));
        assert_eq!(score.grade, 5);
        assert!(score.recommendation.contains("angiography"));
        assert!(score.clinical_significance.contains("occlusion"));
    }

    #[test]
    fn scoring_is_deterministic() {
        let calculator = CadRadsCalculator::default();
        let patient = patient_with(vec![
            lesion(Vessel::Lad, 80.0),
            lesion(Vessel::Om, 55.0),
        ]);
        assert_eq!(calculator.score(&patient), calculator.score(&patient));
    }
}
