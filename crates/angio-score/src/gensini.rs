//! Gensini severity score.
//!
//! Every lesion participates. The stenosis severity points come from a
//! half-open band table (`min < stenosis <= max`); exactly 0% falls outside
//! all bands and scores 0. The anatomical multiplier is the per-segment
//! table value when a segment id is present, otherwise vessel weight x site
//! factor. Location multipliers are mid x0.8 / distal x0.5.

use std::collections::BTreeMap;

use angio_model::{GensiniLesionDetail, GensiniScore, GensiniSeverity, Lesion, Patient};

use crate::weights::GensiniWeights;

#[derive(Debug, Clone, Default)]
pub struct GensiniCalculator {
    weights: GensiniWeights,
}

impl GensiniCalculator {
    pub fn new(weights: GensiniWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &GensiniWeights {
        &self.weights
    }

    pub fn score(&self, patient: &Patient) -> GensiniScore {
        let mut total = 0.0;
        let mut vessel_totals: BTreeMap<_, f64> = BTreeMap::new();
        let mut lesion_details = Vec::new();

        for lesion in &patient.lesions {
            let stenosis_points = self.stenosis_points(lesion.stenosis_percent);
            let vessel_weight = self.vessel_weight(lesion);
            let contribution = stenosis_points * vessel_weight;

            total += contribution;
            *vessel_totals.entry(lesion.vessel).or_default() += contribution;
            lesion_details.push(GensiniLesionDetail {
                vessel: lesion.vessel,
                stenosis_percent: lesion.stenosis_percent,
                stenosis_points,
                vessel_weight,
                contribution,
            });
        }

        GensiniScore {
            total,
            vessel_totals,
            severity: severity_grade(total),
            lesion_details,
        }
    }

    /// Band lookup over `min < stenosis <= max`; 0 outside all bands.
    fn stenosis_points(&self, stenosis_percent: f64) -> f64 {
        self.weights
            .stenosis_bands
            .iter()
            .find(|band| band.min < stenosis_percent && stenosis_percent <= band.max)
            .map(|band| band.points)
            .unwrap_or(0.0)
    }

    fn vessel_weight(&self, lesion: &Lesion) -> f64 {
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
}

fn severity_grade(total: f64) -> GensiniSeverity {
    if total == 0.0 {
        GensiniSeverity::Normal
    } else if total <= 20.0 {
        GensiniSeverity::Mild
    } else if total <= 40.0 {
        GensiniSeverity::Moderate
    } else if total <= 80.0 {
        GensiniSeverity::Severe
    } else {
        GensiniSeverity::Critical
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use angio_model::{Gender, LesionSite, Vessel};

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
    fn stenosis_bands_are_half_open() {
        let calculator = GensiniCalculator::default();
        assert_eq!(calculator.stenosis_points(0.0), 0.0);
        assert_eq!(calculator.stenosis_points(25.0), 1.0);
        assert_eq!(calculator.stenosis_points(25.01), 2.0);
        assert_eq!(calculator.stenosis_points(50.0), 2.0);
        assert_eq!(calculator.stenosis_points(75.0), 4.0);
        assert_eq!(calculator.stenosis_points(90.0), 8.0);
        assert_eq!(calculator.stenosis_points(99.0), 16.0);
        assert_eq!(calculator.stenosis_points(99.5), 32.0);
        assert_eq!(calculator.stenosis_points(100.0), 32.0);
    }

    #[test]
    fn zero_stenosis_lesion_contributes_nothing() {
        let calculator = GensiniCalculator::default();
        let score = calculator.score(&patient_with(vec![lesion(
            Vessel::Lad,
            LesionSite::Proximal,
            0.0,
        )]));
        assert_eq!(score.total, 0.0);
        assert_eq!(score.severity, GensiniSeverity::Normal);
    }

    #[test]
    fn site_factors_scale_inferred_weights() {
        let calculator = GensiniCalculator::default();
        // LAD 80%: 8 points x 2.5 proximal = 20.
        let proximal = calculator.score(&patient_with(vec![lesion(
            Vessel::Lad,
            LesionSite::Proximal,
            80.0,
        )]));
        assert!((proximal.total - 20.0).abs() < 1e-9);
        // Mid: 8 x 2.5 x 0.8 = 16; distal: 8 x 2.5 x 0.5 = 10.
        let mid = calculator.score(&patient_with(vec![lesion(
            Vessel::Lad,
            LesionSite::Mid,
            80.0,
        )]));
        assert!((mid.total - 16.0).abs() < 1e-9);
        let distal = calculator.score(&patient_with(vec![lesion(
            Vessel::Lad,
            LesionSite::Distal,
            80.0,
        )]));
        assert!((distal.total - 10.0).abs() < 1e-9);
    }

    #[test]
    fn segment_table_beats_site_inference() {
        let calculator = GensiniCalculator::default();
        // Segment 7 (LAD mid) carries 1.5 in the Gensini table, not
        // 2.5 x 0.8.
        let score = calculator.score(&patient_with(vec![
            lesion(Vessel::Lad, LesionSite::Mid, 80.0)
                .with_segment_id(7)
                .unwrap(),
        ]));
        assert!((score.total - 8.0 * 1.5).abs() < 1e-9);
    }

    #[test]
    fn vessel_totals_accumulate_per_vessel() {
        let calculator = GensiniCalculator::default();
        let score = calculator.score(&patient_with(vec![
            lesion(Vessel::Lad, LesionSite::Proximal, 80.0),
            lesion(Vessel::Lad, LesionSite::Distal, 60.0),
            lesion(Vessel::Rca, LesionSite::Proximal, 95.0),
        ]));
        // LAD: 8 x 2.5 + 4 x 2.5 x 0.5 = 25; RCA: 16 x 1.0 = 16.
        assert!((score.vessel_totals[&Vessel::Lad] - 25.0).abs() < 1e-9);
        assert!((score.vessel_totals[&Vessel::Rca] - 16.0).abs() < 1e-9);
        assert!((score.total - 41.0).abs() < 1e-9);
        assert_eq!(score.severity, GensiniSeverity::Severe);
    }

    #[test]
    fn severity_boundaries() {
        assert_eq!(severity_grade(0.0), GensiniSeverity::Normal);
        assert_eq!(severity_grade(0.5), GensiniSeverity::Mild);
        assert_eq!(severity_grade(20.0), GensiniSeverity::Mild);
        assert_eq!(severity_grade(20.1), GensiniSeverity::Moderate);
        assert_eq!(severity_grade(40.0), GensiniSeverity::Moderate);
        assert_eq!(severity_grade(80.0), GensiniSeverity::Severe);
        assert_eq!(severity_grade(80.1), GensiniSeverity::Critical);
    }

    #[test]
    fn scoring_is_deterministic() {
        let calculator = GensiniCalculator::default();
        let patient = patient_with(vec![
            lesion(Vessel::Lm, LesionSite::Proximal, 80.0),
            lesion(Vessel::Plv, LesionSite::Distal, 30.0),
        ]);
        assert_eq!(calculator.score(&patient), calculator.score(&patient));
    }
}
