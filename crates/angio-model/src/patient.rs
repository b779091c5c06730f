//! Canonical patient and lesion records.
//!
//! Records are constructed once from a normalized input batch and passed by
//! reference through aggregation and scoring; the calculators never mutate
//! them. Range invariants are checked at construction and violations are
//! reported as [`ModelError::OutOfRange`].

use serde::{Deserialize, Serialize};

use crate::enums::{Gender, LesionSite, Vessel};
use crate::error::{ModelError, Result};

/// Highest AHA segment id carried by the weight tables.
pub const MAX_SEGMENT_ID: u8 = 16;

/// A single coronary lesion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesion {
    pub vessel: Vessel,
    pub site: LesionSite,
    /// Degree of stenosis, 0–100 inclusive.
    pub stenosis_percent: f64,
    /// Explicit AHA segment (1–16). When present it overrides the
    /// vessel+site weight inference in both SYNTAX and Gensini.
    pub segment_id: Option<u8>,
    pub length_mm: Option<f64>,
    pub is_bifurcation: bool,
    pub is_ostial: bool,
    pub is_calcified: bool,
    pub is_tortuous: bool,
    pub is_cto: bool,
    pub thrombus_present: bool,
}

impl Lesion {
    pub fn new(vessel: Vessel, site: LesionSite, stenosis_percent: f64) -> Result<Self> {
        if !(0.0..=100.0).contains(&stenosis_percent) {
            return Err(ModelError::OutOfRange {
                field: "stenosis_percent",
                value: stenosis_percent,
                min: 0.0,
                max: 100.0,
            });
        }
        Ok(Self {
            vessel,
            site,
            stenosis_percent,
            segment_id: None,
            length_mm: None,
            is_bifurcation: false,
            is_ostial: false,
            is_calcified: false,
            is_tortuous: false,
            is_cto: false,
            thrombus_present: false,
        })
    }

    pub fn with_segment_id(mut self, segment_id: u8) -> Result<Self> {
        if segment_id == 0 || segment_id > MAX_SEGMENT_ID {
            return Err(ModelError::UnknownSegment(segment_id));
        }
        self.segment_id = Some(segment_id);
        Ok(self)
    }

    pub fn with_length_mm(mut self, length_mm: f64) -> Result<Self> {
        if length_mm < 0.0 {
            return Err(ModelError::OutOfRange {
                field: "length_mm",
                value: length_mm,
                min: 0.0,
                max: f64::MAX,
            });
        }
        self.length_mm = Some(length_mm);
        Ok(self)
    }

    /// Soft invariant: a chronic total occlusion should be essentially
    /// occluded. Violations are a data-quality warning, not a hard error.
    pub fn cto_is_consistent(&self) -> bool {
        !self.is_cto || self.stenosis_percent >= 99.0
    }
}

/// A patient with clinical attributes and owned lesions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub patient_id: String,
    /// Age in years, 0–150.
    pub age: u32,
    pub gender: Gender,
    pub diabetes: bool,
    pub hypertension: bool,
    pub hyperlipidemia: bool,
    pub smoking: bool,
    pub family_history: bool,
    /// Left-ventricular ejection fraction, 0–100 when present.
    pub ejection_fraction: Option<f64>,
    pub creatinine_mg_dl: Option<f64>,
    pub lesions: Vec<Lesion>,
}

impl Patient {
    pub fn new(patient_id: impl Into<String>, age: u32, gender: Gender) -> Result<Self> {
        let patient_id = patient_id.into();
        if patient_id.trim().is_empty() {
            return Err(ModelError::MissingIdentifier);
        }
        if age > 150 {
            return Err(ModelError::OutOfRange {
                field: "age",
                value: f64::from(age),
                min: 0.0,
                max: 150.0,
            });
        }
        Ok(Self {
            patient_id,
            age,
            gender,
            diabetes: false,
            hypertension: false,
            hyperlipidemia: false,
            smoking: false,
            family_history: false,
            ejection_fraction: None,
            creatinine_mg_dl: None,
            lesions: Vec::new(),
        })
    }

    pub fn with_ejection_fraction(mut self, ejection_fraction: f64) -> Result<Self> {
        if !(0.0..=100.0).contains(&ejection_fraction) {
            return Err(ModelError::OutOfRange {
                field: "ejection_fraction",
                value: ejection_fraction,
                min: 0.0,
                max: 100.0,
            });
        }
        self.ejection_fraction = Some(ejection_fraction);
        Ok(self)
    }

    pub fn with_creatinine_mg_dl(mut self, creatinine_mg_dl: f64) -> Result<Self> {
        if creatinine_mg_dl < 0.0 {
            return Err(ModelError::OutOfRange {
                field: "creatinine_mg_dl",
                value: creatinine_mg_dl,
                min: 0.0,
                max: f64::MAX,
            });
        }
        self.creatinine_mg_dl = Some(creatinine_mg_dl);
        Ok(self)
    }

    pub fn push_lesion(&mut self, lesion: Lesion) {
        self.lesions.push(lesion);
    }

    pub fn lesions_for_vessel(&self, vessel: Vessel) -> impl Iterator<Item = &Lesion> {
        self.lesions.iter().filter(move |l| l.vessel == vessel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lesion_rejects_stenosis_outside_range() {
        assert!(Lesion::new(Vessel::Lad, LesionSite::Proximal, -1.0).is_err());
        assert!(Lesion::new(Vessel::Lad, LesionSite::Proximal, 100.5).is_err());
        assert!(Lesion::new(Vessel::Lad, LesionSite::Proximal, 0.0).is_ok());
        assert!(Lesion::new(Vessel::Lad, LesionSite::Proximal, 100.0).is_ok());
    }

    #[test]
    fn lesion_rejects_unknown_segment() {
        let lesion = Lesion::new(Vessel::Rca, LesionSite::Mid, 80.0).unwrap();
        assert!(matches!(
            lesion.clone().with_segment_id(17),
            Err(ModelError::UnknownSegment(17))
        ));
        assert!(lesion.with_segment_id(2).is_ok());
    }

    #[test]
    fn cto_consistency_is_soft() {
        let mut lesion = Lesion::new(Vessel::Rca, LesionSite::Proximal, 60.0).unwrap();
        lesion.is_cto = true;
        assert!(!lesion.cto_is_consistent());
        lesion.stenosis_percent = 99.0;
        assert!(lesion.cto_is_consistent());
    }

    #[test]
    fn patient_rejects_blank_identifier_and_bad_age() {
        assert!(matches!(
            Patient::new("  ", 60, Gender::Male),
            Err(ModelError::MissingIdentifier)
        ));
        assert!(Patient::new("P001", 151, Gender::Male).is_err());
        assert!(Patient::new("P001", 150, Gender::Male).is_ok());
    }

    #[test]
    fn patient_validates_optional_clinical_values() {
        let patient = Patient::new("P001", 60, Gender::Female).unwrap();
        assert!(patient.clone().with_ejection_fraction(101.0).is_err());
        assert!(patient.clone().with_creatinine_mg_dl(-0.1).is_err());
        let patient = patient.with_ejection_fraction(55.0).unwrap();
        assert_eq!(patient.ejection_fraction, Some(55.0));
    }
}
