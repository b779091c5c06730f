//! SYNTAX anatomical complexity score.
//!
//! Only lesions with stenosis >= 50% participate. Each qualifying lesion
//! contributes `weight x stenosis_factor + complexity`, where the weight
//! comes from the AHA segment table when the lesion carries a segment id and
//! is otherwise inferred from vessel and site. The clinical modifier and the
//! derived SYNTAX II value follow the published formulation.

use angio_model::{Gender, Lesion, LesionContribution, Patient, SyntaxRisk, SyntaxScore};

use crate::weights::SyntaxWeights;

/// Minimum stenosis for a lesion to enter the SYNTAX total.
pub const SIGNIFICANT_STENOSIS: f64 = 50.0;

#[derive(Debug, Clone, Default)]
pub struct SyntaxCalculator {
    weights: SyntaxWeights,
}

impl SyntaxCalculator {
    pub fn new(weights: SyntaxWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &SyntaxWeights {
        &self.weights
    }

    /// Score a patient snapshot. Pure: identical input yields identical
    /// output.
    pub fn score(&self, patient: &Patient) -> SyntaxScore {
        let mut total = 0.0;
        let mut lesion_details = Vec::new();

        for lesion in &patient.lesions {
            if lesion.stenosis_percent < SIGNIFICANT_STENOSIS {
                continue;
            }
            let base_score = self.base_score(lesion);
            let complexity_score = self.complexity_score(lesion);
            let contribution = base_score + complexity_score;
            total += contribution;
            lesion_details.push(LesionContribution {
                vessel: lesion.vessel,
                stenosis_percent: lesion.stenosis_percent,
                base_score,
                complexity_score,
                contribution,
            });
        }

        let clinical_score = self.clinical_score(patient);
        let syntax_ii = total * (1.0 + clinical_score / 100.0);

        SyntaxScore {
            total,
            clinical_score,
            syntax_ii,
            risk: risk_category(total),
            lesion_details,
        }
    }

    fn base_score(&self, lesion: &Lesion) -> f64 {
        self.lesion_weight(lesion) * stenosis_factor(lesion.stenosis_percent)
    }

    /// Segment-table weight when an AHA segment id is present (the segment
    /// already encodes the site); otherwise vessel weight x site factor.
    fn lesion_weight(&self, lesion: &Lesion) -> f64 {
        if let Some(segment_id) = lesion.segment_id
            && let Some(weight) = self.weights.segment.get(&segment_id)
        {
            return *weight;
        }
        let base = self
            .weights
            .vessel
            .get(&lesion.vessel)
            .copied()
            .unwrap_or(self.weights.default_vessel_weight);
        base * self.weights.site.factor(lesion.site)
    }

    fn complexity_score(&self, lesion: &Lesion) -> f64 {
        let points = &self.weights.complexity;
        let mut score = 0.0;
        if lesion.is_bifurcation {
            score += points.bifurcation;
        }
        if lesion.is_ostial {
            score += points.ostial;
        }
        if lesion.is_calcified {
            score += points.calcified;
        }
        if lesion.thrombus_present {
            score += points.thrombus;
        }
        if lesion.is_cto {
            score += points.cto;
        }
        if lesion.is_tortuous {
            score += points.tortuous;
        }
        if lesion
            .length_mm
            .is_some_and(|length| length > points.diffuse_length_mm)
        {
            score += points.diffuse;
        }
        score
    }

    fn clinical_score(&self, patient: &Patient) -> f64 {
        let mut score = 0.0;
        if patient.age >= 80 {
            score += 10.0;
        } else if patient.age >= 70 {
            score += 5.0;
        } else if patient.age >= 60 {
            score += 2.0;
        }
        if patient.gender == Gender::Female {
            score += 2.0;
        }
        if patient.diabetes {
            score += 3.0;
        }
        if patient.creatinine_mg_dl.is_some_and(|cr| cr > 2.0) {
            score += 4.0;
        }
        if patient.ejection_fraction.is_some_and(|ef| ef < 50.0) {
            score += 3.0;
        }
        score
    }
}

fn stenosis_factor(stenosis_percent: f64) -> f64 {
    if stenosis_percent >= 99.0 {
        5.0
    } else if stenosis_percent >= 90.0 {
        2.0
    } else if stenosis_percent >= 70.0 {
        1.5
    } else {
        1.0
    }
}

fn risk_category(total: f64) -> SyntaxRisk {
    if total <= 22.0 {
        SyntaxRisk::Low
    } else if total <= 32.0 {
        SyntaxRisk::Intermediate
    } else {
        SyntaxRisk::High
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use angio_model::{LesionSite, Vessel};

    fn patient_with(lesions: Vec<Lesion>) -> Patient {
        let mut patient = Patient::new("P001", 55, Gender::Male).unwrap();
        for lesion in lesions {
            patient.push_lesion(lesion);
        }
        patient
    }

    fn lesion(vessel: Vessel, site: LesionSite, stenosis: f64) -> Lesion {
        Lesion::new(vessel, site, stenosis).unwrap()
    }

    #[test]
    fn lesions_below_50_are_excluded_and_50_included() {
        let calculator = SyntaxCalculator::default();
        let below = calculator.score(&patient_with(vec![lesion(
            Vessel::Lad,
            LesionSite::Proximal,
            49.9,
        )]));
        assert_eq!(below.total, 0.0);
        assert!(below.lesion_details.is_empty());

        let at = calculator.score(&patient_with(vec![lesion(
            Vessel::Lad,
            LesionSite::Proximal,
            50.0,
        )]));
        assert_eq!(at.total, 3.5);
        assert_eq!(at.lesion_details.len(), 1);
    }

    #[test]
    fn site_factor_applies_only_to_inferred_weights() {
        let calculator = SyntaxCalculator::default();
        let inferred = calculator.score(&patient_with(vec![lesion(
            Vessel::Lad,
            LesionSite::Mid,
            50.0,
        )]));
        assert!((inferred.total - 3.5 * 0.7).abs() < 1e-9);

        // Same anatomy through segment 7 (LAD mid): table value 2.5, no
        // extra site multiplier.
        let explicit = calculator.score(&patient_with(vec![
            lesion(Vessel::Lad, LesionSite::Mid, 50.0)
                .with_segment_id(7)
                .unwrap(),
        ]));
        assert_eq!(explicit.total, 2.5);
    }

    #[test]
    fn stenosis_factor_thresholds() {
        assert_eq!(stenosis_factor(50.0), 1.0);
        assert_eq!(stenosis_factor(69.9), 1.0);
        assert_eq!(stenosis_factor(70.0), 1.5);
        assert_eq!(stenosis_factor(90.0), 2.0);
        assert_eq!(stenosis_factor(98.9), 2.0);
        assert_eq!(stenosis_factor(99.0), 5.0);
        assert_eq!(stenosis_factor(100.0), 5.0);
    }

    #[test]
    fn complexity_points_accumulate() {
        let calculator = SyntaxCalculator::default();
        let mut l = lesion(Vessel::Lcx, LesionSite::Proximal, 95.0);
        l.is_calcified = true;
        l.is_tortuous = true;
        l = l.with_length_mm(30.0).unwrap();
        let score = calculator.score(&patient_with(vec![l]));
        // 3.5 * 2.0 base + (2 + 1 + 1) complexity.
        assert!((score.total - 11.0).abs() < 1e-9);
        assert_eq!(score.lesion_details[0].complexity_score, 4.0);
    }

    #[test]
    fn length_at_threshold_is_not_diffuse() {
        let calculator = SyntaxCalculator::default();
        let l = lesion(Vessel::Lad, LesionSite::Proximal, 60.0)
            .with_length_mm(20.0)
            .unwrap();
        let score = calculator.score(&patient_with(vec![l]));
        assert_eq!(score.lesion_details[0].complexity_score, 0.0);
    }

    #[test]
    fn clinical_score_and_syntax_ii() {
        let calculator = SyntaxCalculator::default();
        let mut patient = Patient::new("P002", 72, Gender::Female).unwrap();
        patient.diabetes = true;
        patient = patient
            .with_creatinine_mg_dl(2.4)
            .unwrap()
            .with_ejection_fraction(45.0)
            .unwrap();
        patient.push_lesion(lesion(Vessel::Lm, LesionSite::Proximal, 80.0));

        let score = calculator.score(&patient);
        // age 72 -> 5, female -> 2, diabetes -> 3, creatinine -> 4, EF -> 3.
        assert_eq!(score.clinical_score, 17.0);
        assert!((score.total - 7.5).abs() < 1e-9);
        assert!((score.syntax_ii - 7.5 * 1.17).abs() < 1e-9);
    }

    #[test]
    fn risk_boundaries() {
        assert_eq!(risk_category(22.0), SyntaxRisk::Low);
        assert_eq!(risk_category(22.1), SyntaxRisk::Intermediate);
        assert_eq!(risk_category(32.0), SyntaxRisk::Intermediate);
        assert_eq!(risk_category(32.1), SyntaxRisk::High);
    }

    #[test]
    fn scoring_is_deterministic() {
        let calculator = SyntaxCalculator::default();
        let mut l = lesion(Vessel::Rca, LesionSite::Proximal, 100.0);
        l.is_cto = true;
        let patient = patient_with(vec![l]);
        let first = calculator.score(&patient);
        let second = calculator.score(&patient);
        assert_eq!(first, second);
    }
}
